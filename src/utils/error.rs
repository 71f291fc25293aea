use thiserror::Error;

#[derive(Error, Debug)]
pub enum SorterError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponseError { url: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SorterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SorterError::ApiError(_) | SorterError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            SorterError::MalformedResponseError { .. } | SorterError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            SorterError::TomlError(_)
            | SorterError::ConfigError { .. }
            | SorterError::ConfigValidationError { .. }
            | SorterError::MissingConfigError { .. }
            | SorterError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SorterError::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Whether a fresh attempt of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SorterError::ApiError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SorterError::HttpStatusError { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SorterError::ApiError(_) => {
                "Check your network connection and try again".to_string()
            }
            SorterError::HttpStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Verify the Steam API key and that the profile's game details are public"
                    .to_string()
            }
            SorterError::HttpStatusError { .. } => {
                "The remote service is unavailable, retry later or raise --retry-attempts"
                    .to_string()
            }
            SorterError::MalformedResponseError { .. } => {
                "The remote service answered with an unexpected payload, check the endpoint URL"
                    .to_string()
            }
            SorterError::ProcessingError { .. } => {
                "Run again with --concurrent-requests 1".to_string()
            }
            SorterError::TomlError(_) => "Fix the syntax of the TOML configuration file".to_string(),
            SorterError::MissingConfigError { field } => {
                format!("Provide '{}' in the config file, on the command line or via env", field)
            }
            SorterError::ConfigError { .. }
            | SorterError::ConfigValidationError { .. }
            | SorterError::InvalidConfigValueError { .. } => {
                "Review the configuration values and run again".to_string()
            }
            SorterError::IoError(_) => {
                "Check that the output path is writable and the disk is not full".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a remote service: {}", self),
            ErrorCategory::Data => format!("Received unreadable data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
        }
    }

    /// Process exit code for a run that failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SorterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_transience() {
        let unavailable = SorterError::HttpStatusError {
            status: 503,
            url: "http://example.com".to_string(),
        };
        let forbidden = SorterError::HttpStatusError {
            status: 403,
            url: "http://example.com".to_string(),
        };

        assert!(unavailable.is_transient());
        assert!(!forbidden.is_transient());
        assert!(forbidden.recovery_suggestion().contains("Steam API key"));
    }

    #[test]
    fn test_output_errors_are_critical() {
        let err = SorterError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = SorterError::MissingConfigError {
            field: "steam.api_key".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().starts_with("Invalid configuration"));
    }
}
