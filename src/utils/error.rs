use thiserror::Error;

#[derive(Error, Debug)]
pub enum HologramError {
    #[error("Input overflow: {length} letters and digits do not fit a key of width {fixed_size}")]
    InputOverflow { length: usize, fixed_size: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Import failed: {message}")]
    ImportError { message: String },

    #[error("SMS gateway answered with status {status}: {body}")]
    DeliveryError { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Data,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HologramError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HologramError::InputOverflow { .. } => ErrorCategory::Input,
            HologramError::ConfigError { .. }
            | HologramError::ConfigValidationError { .. }
            | HologramError::InvalidConfigValueError { .. }
            | HologramError::MissingConfigError { .. } => ErrorCategory::Configuration,
            HologramError::CsvError(_)
            | HologramError::SerializationError(_)
            | HologramError::ImportError { .. } => ErrorCategory::Data,
            HologramError::HttpError(_) | HologramError::DeliveryError { .. } => {
                ErrorCategory::Network
            }
            HologramError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        if let HologramError::DeliveryError { status, .. } = self {
            // 閘道拒絕 (4xx) 重試無用
            if *status < 500 {
                return ErrorSeverity::High;
            }
        }
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HologramError::InputOverflow { .. } => {
                "Check the submitted code; it has more letters and digits than a hologram code can hold"
            }
            HologramError::ConfigError { .. }
            | HologramError::ConfigValidationError { .. }
            | HologramError::InvalidConfigValueError { .. }
            | HologramError::MissingConfigError { .. } => {
                "Review the TOML configuration file and the environment variables it references"
            }
            HologramError::CsvError(_) | HologramError::ImportError { .. } => {
                "Make sure the serials and invalids files are CSV exports with a header row"
            }
            HologramError::SerializationError(_) => "Report this as a bug together with the input",
            HologramError::HttpError(_) | HologramError::DeliveryError { .. } => {
                "Check the SMS gateway endpoint, API key and network connectivity, then retry"
            }
            HologramError::IoError(_) => "Check that the files exist and are readable and writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HologramError::InputOverflow { fixed_size, .. } => format!(
                "The code is too long to be a hologram code (at most {} letters and digits)",
                fixed_size
            ),
            HologramError::DeliveryError { status, .. } => {
                format!("The reply could not be delivered (gateway status {})", status)
            }
            HologramError::ImportError { message } => format!("Import aborted: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HologramError>;
