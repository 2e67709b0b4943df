use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamBuilderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Fetch failed for {url}: HTTP {status}")]
    FetchError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TeamBuilderError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::FetchError { .. } => ErrorCategory::Network,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 目錄回應 404（查無此寶可夢）
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FetchError { status: 404, .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "Could not reach the Pokémon catalog".to_string(),
            Self::FetchError { status, .. } => {
                format!("The Pokémon catalog answered with HTTP {}", status)
            }
            Self::IoError(_) => "Could not read or write the team data".to_string(),
            Self::SerializationError(_) => "Team data could not be encoded".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            Self::ValidationError { message, .. } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check your connection or the --api-base-url setting, then retry"
            }
            ErrorCategory::Storage => "Check that the data directory exists and is writable",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Input => "Correct the input and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, TeamBuilderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_low_severity_input() {
        let err = TeamBuilderError::validation("name", "Team name cannot be empty");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(!err.is_not_found());
        assert_eq!(err.user_friendly_message(), "Team name cannot be empty");
    }

    #[test]
    fn test_fetch_error_is_retryable_network() {
        let err = TeamBuilderError::FetchError {
            url: "http://localhost/pokemon/1".to_string(),
            status: 503,
        };
        assert!(!err.is_not_found());
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("HTTP 503"));

        let missing = TeamBuilderError::FetchError {
            url: "http://localhost/pokemon/99999".to_string(),
            status: 404,
        };
        assert!(missing.is_not_found());
    }
}
