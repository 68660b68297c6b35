use crate::core::canonicalizer::Canonicalizer;
use crate::core::messages::MessageTemplates;
use crate::domain::model::{ClassificationResult, ClassificationStatus};
use crate::domain::ports::RangeStore;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    canonicalizer: Canonicalizer,
    templates: MessageTemplates,
}

impl Classifier {
    pub fn new(canonicalizer: Canonicalizer, templates: MessageTemplates) -> Self {
        Self {
            canonicalizer,
            templates,
        }
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Classifies one submitted code against `store`.
    ///
    /// The invalid set wins over the ranges. Range bounds are inclusive, and more
    /// than one matching range yields `DOUBLE` rather than picking one of them.
    /// Only an over-long code is an error.
    pub fn classify<S: RangeStore + ?Sized>(
        &self,
        raw_code: &str,
        store: &S,
    ) -> Result<ClassificationResult> {
        let key = self.canonicalizer.normalize(raw_code)?;

        if store.contains_invalid(&key) {
            tracing::debug!("Code {} is in the invalid set", key);
            return Ok(ClassificationResult {
                status: ClassificationStatus::Failure,
                code: raw_code.to_string(),
                message: self.templates.render_failure(raw_code),
                key,
                matched: None,
            });
        }

        let mut matches = store.matching_ranges(&key);
        tracing::debug!("Code {} matched {} range(s)", key, matches.len());

        let (status, message, matched) = match matches.len() {
            0 => (
                ClassificationStatus::NotFound,
                self.templates.render_not_found(raw_code),
                None,
            ),
            1 => {
                let range = matches.remove(0);
                (
                    ClassificationStatus::Ok,
                    self.templates.render_ok(raw_code, &range),
                    Some(range),
                )
            }
            _ => (
                ClassificationStatus::Double,
                self.templates.render_double(raw_code),
                None,
            ),
        };

        Ok(ClassificationResult {
            status,
            code: raw_code.to_string(),
            key,
            message,
            matched,
        })
    }
}
