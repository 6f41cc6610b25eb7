//! Error types for Blogcast

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlogcastError>;

#[derive(Error, Debug)]
pub enum BlogcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BlogcastError {
    /// Returns the appropriate exit code for this error
    ///
    /// Only fatal errors reach the binary. Per-platform and per-post failures
    /// are logged and never turned into a non-zero exit.
    pub fn exit_code(&self) -> i32 {
        match self {
            BlogcastError::InvalidInput(_) => 3,
            BlogcastError::Platform(_) => 1,
            BlogcastError::Config(_) => 1,
            BlogcastError::History(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Invalid template for {platform}: {reason}")]
    InvalidTemplate { platform: String, reason: String },
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to access history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse history file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HistoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HistoryError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("{0} credentials not configured")]
    MissingCredentials(String),

    #[error("{platform} is unavailable: {reason}")]
    Unavailable { platform: String, reason: String },

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}

impl PlatformError {
    /// Map a non-success HTTP status from a platform API
    ///
    /// 401/403 are authentication failures, 429 is rate limiting, everything
    /// else is a posting failure carrying the response body.
    pub fn from_status(platform: &str, operation: &str, status: u16, body: &str) -> Self {
        let detail = format!(
            "{} {} failed (status {}): {}",
            platform, operation, status, body
        );
        match status {
            401 | 403 => PlatformError::Authentication(detail),
            429 => PlatformError::RateLimit(detail),
            _ => PlatformError::Posting(detail),
        }
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        PlatformError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = BlogcastError::InvalidInput("Unknown platform".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_platform_errors() {
        let auth = BlogcastError::Platform(PlatformError::Authentication("bad token".to_string()));
        assert_eq!(auth.exit_code(), 1);

        let unknown = BlogcastError::Platform(PlatformError::UnknownPlatform("myspace".to_string()));
        assert_eq!(unknown.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_and_history() {
        let config = BlogcastError::Config(ConfigError::InvalidTemplate {
            platform: "twitter".to_string(),
            reason: "unknown slot `author`".to_string(),
        });
        assert_eq!(config.exit_code(), 1);

        let history = BlogcastError::History(HistoryError::io(
            "posted_posts.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(history.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting() {
        let error = BlogcastError::Platform(PlatformError::MissingCredentials("Twitter".to_string()));
        assert_eq!(
            error.to_string(),
            "Platform error: Twitter credentials not configured"
        );

        let unavailable = PlatformError::Unavailable {
            platform: "linkedin".to_string(),
            reason: "built without the `linkedin` feature".to_string(),
        };
        assert_eq!(
            unavailable.to_string(),
            "linkedin is unavailable: built without the `linkedin` feature"
        );
    }

    #[test]
    fn test_invalid_template_formatting() {
        let error = ConfigError::InvalidTemplate {
            platform: "twitter".to_string(),
            reason: "unknown slot `author`".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid template for twitter: unknown slot `author`"
        );
    }

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            PlatformError::from_status("Bluesky", "createSession", 401, "nope"),
            PlatformError::Authentication(_)
        ));
        assert!(matches!(
            PlatformError::from_status("Twitter", "create tweet", 403, "forbidden"),
            PlatformError::Authentication(_)
        ));
        assert!(matches!(
            PlatformError::from_status("LinkedIn", "ugcPosts", 429, "slow down"),
            PlatformError::RateLimit(_)
        ));

        let posting = PlatformError::from_status("LinkedIn", "ugcPosts", 422, "bad body");
        match posting {
            PlatformError::Posting(msg) => {
                assert!(msg.contains("LinkedIn"));
                assert!(msg.contains("422"));
                assert!(msg.contains("bad body"));
            }
            other => panic!("Expected posting error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_conversion_from_history_error() {
        let history_error = HistoryError::io(
            "posted_posts.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
        );
        let error: BlogcastError = history_error.into();
        assert!(matches!(error, BlogcastError::History(_)));
        assert!(error.to_string().contains("posted_posts.json"));
    }

    #[test]
    fn test_platform_error_clone() {
        let original = PlatformError::Network("Connection failed".to_string());
        let cloned = original.clone();
        assert_eq!(original.to_string(), cloned.to_string());
    }
}
