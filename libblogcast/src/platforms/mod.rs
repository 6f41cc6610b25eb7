//! Platform abstraction and implementations
//!
//! Each platform is a thin client behind the [`Platform`] trait. Clients check
//! their own credentials through [`Platform::is_configured`] so the dispatcher
//! can refuse to call a platform that would certainly fail.
//!
//! # Examples
//!
//! ```no_run
//! use libblogcast::platforms::{Platform, mock::MockPlatform};
//!
//! # async fn example() -> libblogcast::error::Result<()> {
//! let platform = MockPlatform::success("twitter");
//!
//! if platform.is_configured() {
//!     let post_id = platform.post("New blog post: Hello").await?;
//!     println!("Posted: {}", post_id);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;

#[cfg(feature = "bluesky")]
pub mod bluesky;
#[cfg(feature = "linkedin")]
pub mod linkedin;
#[cfg(feature = "twitter")]
pub mod twitter;

// Available in all builds so integration tests can drive the dispatcher
pub mod mock;

/// Uniform interface over social platform clients
#[async_trait]
pub trait Platform: Send + Sync {
    /// Lowercase platform identifier (e.g. "twitter")
    fn name(&self) -> &str;

    /// Whether every credential the platform needs is present
    ///
    /// Checked before [`Platform::post`] is called; no network traffic.
    fn is_configured(&self) -> bool;

    /// Publish `content` and return the platform's id for the new post
    ///
    /// # Errors
    ///
    /// - `PlatformError::MissingCredentials` if credentials are absent
    /// - `PlatformError::Authentication` if the platform rejects them
    /// - `PlatformError::Network` for transport failures
    /// - `PlatformError::Posting` / `PlatformError::RateLimit` for API errors
    async fn post(&self, content: &str) -> Result<String>;
}

/// Built-in platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Twitter,
    Bluesky,
    LinkedIn,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 3] = [
        PlatformKind::Twitter,
        PlatformKind::Bluesky,
        PlatformKind::LinkedIn,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Twitter => "twitter",
            PlatformKind::Bluesky => "bluesky",
            PlatformKind::LinkedIn => "linkedin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Maximum post length in characters
    pub fn character_limit(&self) -> usize {
        match self {
            PlatformKind::Twitter => 280,
            PlatformKind::Bluesky => 300,
            PlatformKind::LinkedIn => 3000,
        }
    }

    /// Cargo feature that compiles the client in
    pub fn feature(&self) -> &'static str {
        self.name()
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared HTTP client with a descriptive user agent
#[cfg(any(feature = "twitter", feature = "bluesky", feature = "linkedin"))]
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("blogcast/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}
