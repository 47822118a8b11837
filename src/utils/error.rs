use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Feed request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Feed responded with HTTP {status} from {url}")]
    FeedStatusError { status: u16, url: String },

    #[error("Feed format error: {message}")]
    FeedFormatError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Record #{index} rejected: {reason}")]
    RecordError { index: usize, reason: String },

    #[error("Map provider error: {message}")]
    ProviderError { message: String },

    #[error("Stores are already loaded ({count} on the map)")]
    AlreadyLoaded { count: usize },

    #[error("Unknown store: {reference}")]
    UnknownStore { reference: String },

    #[error("Invalid command: {message}")]
    CommandError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Credentials or settings; fatal at startup.
    Configuration,
    /// Feed fetch or decode; the view shows an empty state and may retry.
    DataLoad,
    /// One malformed store record; skipped.
    Record,
    Provider,
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LocatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LocatorError::ConfigError { .. }
            | LocatorError::MissingConfigError { .. }
            | LocatorError::InvalidConfigValueError { .. }
            | LocatorError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            LocatorError::ApiError(_)
            | LocatorError::IoError(_)
            | LocatorError::SerializationError(_)
            | LocatorError::FeedStatusError { .. }
            | LocatorError::FeedFormatError { .. } => ErrorCategory::DataLoad,
            LocatorError::RecordError { .. } => ErrorCategory::Record,
            LocatorError::ProviderError { .. } => ErrorCategory::Provider,
            LocatorError::AlreadyLoaded { .. }
            | LocatorError::UnknownStore { .. }
            | LocatorError::CommandError { .. } => ErrorCategory::Usage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Provider => ErrorSeverity::High,
            ErrorCategory::DataLoad => ErrorSeverity::Medium,
            ErrorCategory::Record | ErrorCategory::Usage => ErrorSeverity::Low,
        }
    }

    /// 只有資料載入錯誤可以由使用者重試
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::DataLoad
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LocatorError::MissingConfigError { field } if field.contains("api_key") => {
                "Set MAPS_API_KEY, pass --api-key, or fill provider.api_key in the config file"
                    .to_string()
            }
            LocatorError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            LocatorError::InvalidConfigValueError { field, .. }
            | LocatorError::ConfigValidationError { field, .. } => {
                format!("Check the '{}' setting", field)
            }
            LocatorError::ConfigError { .. } => "Check the configuration file".to_string(),
            LocatorError::ApiError(_) | LocatorError::FeedStatusError { .. } => {
                "Check that the store feed URL is reachable, then run 'reload'".to_string()
            }
            LocatorError::IoError(_) => {
                "Check that the store feed file exists and is readable, then run 'reload'"
                    .to_string()
            }
            LocatorError::SerializationError(_) | LocatorError::FeedFormatError { .. } => {
                "The store feed must be a feature collection with a 'features' array".to_string()
            }
            LocatorError::RecordError { .. } => {
                "Fix the record's geometry or properties in the feed".to_string()
            }
            LocatorError::ProviderError { .. } => "Reload the map view".to_string(),
            LocatorError::AlreadyLoaded { .. } => {
                "Stores load once per session; restart to pick up a new feed".to_string()
            }
            LocatorError::UnknownStore { .. } => "Run 'list' to see the store rows".to_string(),
            LocatorError::CommandError { .. } => "Run 'help' to see the commands".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("The store map cannot start. {}", self),
            ErrorCategory::DataLoad => format!("Stores could not be loaded. {}", self),
            ErrorCategory::Record => format!("A store was skipped. {}", self),
            ErrorCategory::Provider => format!("The map is unavailable. {}", self),
            ErrorCategory::Usage => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_follow_taxonomy() {
        let missing = LocatorError::MissingConfigError {
            field: "provider.api_key".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Configuration);
        assert_eq!(missing.severity(), ErrorSeverity::Critical);
        assert!(!missing.is_retryable());
        assert!(missing.recovery_suggestion().contains("MAPS_API_KEY"));

        let status = LocatorError::FeedStatusError {
            status: 503,
            url: "https://example.com/stores.json".to_string(),
        };
        assert_eq!(status.category(), ErrorCategory::DataLoad);
        assert!(status.is_retryable());
        assert!(status.user_friendly_message().starts_with("Stores could not be loaded."));

        let record = LocatorError::RecordError {
            index: 3,
            reason: "missing coordinates".to_string(),
        };
        assert_eq!(record.category(), ErrorCategory::Record);
        assert_eq!(record.severity(), ErrorSeverity::Low);
        assert_eq!(record.to_string(), "Record #3 rejected: missing coordinates");
    }
}
