use crate::core::canonicalizer::{Canonicalizer, DEFAULT_FIXED_SIZE, MAX_FIXED_SIZE};
use crate::core::messages::MessageTemplates;
use crate::utils::error::{HologramError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub canonicalizer: CanonicalizerConfig,
    pub store: StoreConfig,
    pub transaction_log: Option<TransactionLogConfig>,
    pub notifier: Option<NotifierConfig>,
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub messages: MessageTemplates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalizerConfig {
    pub fixed_size: usize,
}

impl Default for CanonicalizerConfig {
    fn default() -> Self {
        Self {
            fixed_size: DEFAULT_FIXED_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub serials_path: String,
    pub invalids_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLogConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub max_findings: Option<usize>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| HologramError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| HologramError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SMS_API_KEY})，未設定者保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn canonicalizer(&self) -> Result<Canonicalizer> {
        Canonicalizer::new(self.canonicalizer.fixed_size)
    }

    pub fn max_findings(&self) -> usize {
        self.report
            .as_ref()
            .and_then(|r| r.max_findings)
            .unwrap_or(10)
    }

    /// 已啟用的簡訊閘道設定
    pub fn active_notifier(&self) -> Option<&NotifierConfig> {
        self.notifier.as_ref().filter(|n| n.enabled)
    }

    pub fn notifier_timeout_seconds(&self) -> u64 {
        self.notifier
            .as_ref()
            .and_then(|n| n.timeout_seconds)
            .unwrap_or(10)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range(
            "canonicalizer.fixed_size",
            self.canonicalizer.fixed_size,
            1,
            MAX_FIXED_SIZE,
        )?;

        for (field, path) in [
            ("store.serials_path", &self.store.serials_path),
            ("store.invalids_path", &self.store.invalids_path),
        ] {
            validation::validate_path(field, path)?;
            validation::validate_file_extension(field, path, &["csv"])?;
        }

        if let Some(log) = &self.transaction_log {
            validation::validate_path("transaction_log.path", &log.path)?;
            validation::validate_file_extension("transaction_log.path", &log.path, &["csv"])?;
        }

        if let Some(notifier) = self.active_notifier() {
            validation::validate_url("notifier.endpoint", &notifier.endpoint)?;
            validation::validate_positive_number(
                "notifier.timeout_seconds",
                self.notifier_timeout_seconds(),
                1,
            )?;
        }

        validation::validate_positive_number("report.max_findings", self.max_findings() as u64, 1)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
