use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScatterError {
    #[error("API request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unexpected response body from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Page request task failed: {message}")]
    Task { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScatterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScatterError::Network(_) | ScatterError::HttpStatus { .. } => ErrorCategory::Network,
            ScatterError::Parse { .. } | ScatterError::Serialization(_) => ErrorCategory::Data,
            ScatterError::Config { .. }
            | ScatterError::InvalidConfigValue { .. }
            | ScatterError::MissingConfig { .. } => ErrorCategory::Configuration,
            ScatterError::Task { .. } | ScatterError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Errors a catalog fetch swallows: transport, status, body shape, or a lost page task.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ScatterError::Network(_)
                | ScatterError::HttpStatus { .. }
                | ScatterError::Parse { .. }
                | ScatterError::Task { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScatterError::Network(_) => "Check network connectivity and that the API host is reachable",
            ScatterError::HttpStatus { .. } => "Verify the endpoint URL; the catalog API may be down",
            ScatterError::Parse { .. } => {
                "The endpoint did not return a paginated catalog ({count, results}); check the URL"
            }
            ScatterError::Task { .. } => "Re-run the command; a page request was interrupted",
            ScatterError::Io(_) => "Check that the output path exists and is writable",
            ScatterError::Serialization(_) => "Report this as a bug; scene data could not be encoded",
            ScatterError::Config { .. }
            | ScatterError::InvalidConfigValue { .. }
            | ScatterError::MissingConfig { .. } => {
                "Fix the command line flags or the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the catalog API ({})", self),
            ErrorCategory::Data => format!("The catalog API returned unexpected data ({})", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScatterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_fetch_failures() {
        let err = ScatterError::HttpStatus {
            url: "http://localhost/films".to_string(),
            status: 404,
        };
        assert!(err.is_fetch_failure());
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_config_errors_are_not_fetch_failures() {
        let err = ScatterError::MissingConfig {
            field: "source.films_endpoint".to_string(),
        };
        assert!(!err.is_fetch_failure());
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }

    #[test]
    fn test_parse_error_keeps_url() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ScatterError::Parse {
            url: "http://localhost/starships/".to_string(),
            source,
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert!(err.to_string().contains("http://localhost/starships/"));
    }
}
