use crate::domain::model::SerialRange;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const NOT_FOUND_TEMPLATE: &str = "{code}
This hologram code could not be found. Please try again or contact support.
A valid hologram code is two English letters followed by 7 or 8 digits, e.g. FA1234567
Sales support: {support_phone}";

const DOUBLE_TEMPLATE: &str = "{code}
This hologram code is verified.
For more information about the product type please contact sales support.
{support_phone}";

const OK_TEMPLATE: &str = "{code}
{reference}
{description}
Hologram date: {date}
Genuine product
Sales support: {support_phone}";

/// 回覆簡訊的樣板，可在設定檔 `[messages]` 中覆寫
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    pub support_phone: String,
    pub ok: String,
    pub failure: String,
    pub double: String,
    pub not_found: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            support_phone: "021-00000000".to_string(),
            ok: OK_TEMPLATE.to_string(),
            // 偽造碼與查無此碼使用相同回覆
            failure: NOT_FOUND_TEMPLATE.to_string(),
            double: DOUBLE_TEMPLATE.to_string(),
            not_found: NOT_FOUND_TEMPLATE.to_string(),
        }
    }
}

impl MessageTemplates {
    pub fn render_failure(&self, code: &str) -> String {
        self.render(&self.failure, code, None)
    }

    pub fn render_double(&self, code: &str) -> String {
        self.render(&self.double, code, None)
    }

    pub fn render_not_found(&self, code: &str) -> String {
        self.render(&self.not_found, code, None)
    }

    pub fn render_ok(&self, code: &str, range: &SerialRange) -> String {
        self.render(&self.ok, code, Some(range))
    }

    fn render(&self, template: &str, code: &str, range: Option<&SerialRange>) -> String {
        placeholder_pattern()
            .replace_all(template, |caps: &Captures| {
                let name = &caps[1];
                match (name, range) {
                    ("code", _) => code.to_string(),
                    ("support_phone", _) => self.support_phone.clone(),
                    ("reference", Some(r)) => r.reference.clone(),
                    ("description", Some(r)) => r.description.clone(),
                    ("date", Some(r)) => r.issued_on.format("%Y-%m-%d").to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"))
}
