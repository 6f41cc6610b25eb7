//! Mock platform for tests
//!
//! A [`MockPlatform`] answers every post according to its [`MockBehavior`] and
//! writes what it saw to a [`MockLog`]. The log is a shared handle, so a test
//! can keep one after the platform has been boxed into a registry.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Accept every post
    Succeed,
    /// Reject every post with this error
    Fail(PlatformError),
    /// Report missing credentials
    Unconfigured,
}

#[derive(Debug, Default)]
struct LogState {
    attempts: usize,
    accepted: Vec<String>,
}

/// Shared record of the calls a mock received
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    state: Arc<Mutex<LogState>>,
}

impl MockLog {
    /// Number of times `post` was called, successful or not
    pub fn attempts(&self) -> usize {
        self.state.lock().map(|s| s.attempts).unwrap_or(0)
    }

    /// Content of every accepted post, in order
    pub fn accepted(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.accepted.clone())
            .unwrap_or_default()
    }
}

pub struct MockPlatform {
    name: String,
    behavior: MockBehavior,
    log: MockLog,
}

impl MockPlatform {
    pub fn new(name: &str, behavior: MockBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            log: MockLog::default(),
        }
    }

    pub fn success(name: &str) -> Self {
        Self::new(name, MockBehavior::Succeed)
    }

    /// Fails with `PlatformError::Posting(message)`
    pub fn post_failure(name: &str, message: &str) -> Self {
        Self::new(
            name,
            MockBehavior::Fail(PlatformError::Posting(message.to_string())),
        )
    }

    pub fn not_configured(name: &str) -> Self {
        Self::new(name, MockBehavior::Unconfigured)
    }

    /// Handle to this mock's call log
    pub fn log(&self) -> MockLog {
        self.log.clone()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        !matches!(self.behavior, MockBehavior::Unconfigured)
    }

    async fn post(&self, content: &str) -> Result<String> {
        let mut state = self
            .log
            .state
            .lock()
            .map_err(|_| PlatformError::Posting("mock log poisoned".to_string()))?;
        state.attempts += 1;

        match &self.behavior {
            MockBehavior::Succeed => {
                state.accepted.push(content.to_string());
                Ok(format!("{}-{}", self.name, state.accepted.len()))
            }
            MockBehavior::Fail(error) => Err(error.clone().into()),
            MockBehavior::Unconfigured => {
                Err(PlatformError::MissingCredentials(self.name.clone()).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlogcastError;

    #[tokio::test]
    async fn test_success_records_content() {
        let platform = MockPlatform::success("twitter");
        assert_eq!(platform.name(), "twitter");
        assert!(platform.is_configured());

        assert_eq!(platform.post("first").await.unwrap(), "twitter-1");
        assert_eq!(platform.post("second").await.unwrap(), "twitter-2");

        assert_eq!(platform.log().attempts(), 2);
        assert_eq!(platform.log().accepted(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failure_returns_configured_error() {
        let platform = MockPlatform::new(
            "bluesky",
            MockBehavior::Fail(PlatformError::RateLimit("slow down".to_string())),
        );
        let err = platform.post("hello").await.unwrap_err();
        assert!(matches!(
            err,
            BlogcastError::Platform(PlatformError::RateLimit(_))
        ));
        assert_eq!(platform.log().attempts(), 1);
        assert!(platform.log().accepted().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_reports_missing_credentials() {
        let platform = MockPlatform::not_configured("linkedin");
        assert!(!platform.is_configured());
        assert!(matches!(
            platform.post("hello").await,
            Err(BlogcastError::Platform(PlatformError::MissingCredentials(_)))
        ));
    }

    #[tokio::test]
    async fn test_log_survives_boxing() {
        let platform = MockPlatform::success("linkedin");
        let log = platform.log();

        let boxed: Box<dyn Platform> = Box::new(platform);
        boxed.post("hello").await.unwrap();

        assert_eq!(log.attempts(), 1);
    }
}
