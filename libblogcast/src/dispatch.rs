//! Routing rendered text to platforms
//!
//! The [`PlatformRegistry`] is built once at startup. Each built-in platform
//! is either [`Capability::Available`] with a client, or
//! [`Capability::Unavailable`] with the reason it cannot be used in this
//! build. The [`Dispatcher`] turns every failure into `false` plus a log line.

use std::collections::BTreeMap;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::PlatformError;
use crate::platforms::{Platform, PlatformKind};

/// Whether a platform can be published to
pub enum Capability {
    Available(Box<dyn Platform>),
    Unavailable(String),
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Available(platform) => {
                f.debug_tuple("Available").field(&platform.name()).finish()
            }
            Capability::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Platform name to capability
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    capabilities: BTreeMap<String, Capability>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every built-in platform against this build and `config`
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for kind in PlatformKind::ALL {
            let capability = detect(kind, config);
            if let Capability::Unavailable(reason) = &capability {
                warn!("{} is unavailable: {}", kind.name(), reason);
            }
            registry.register(kind.name(), capability);
        }
        debug!("Available platforms: {}", registry.available().join(", "));
        registry
    }

    /// Add or replace a platform
    pub fn register(&mut self, name: impl Into<String>, capability: Capability) {
        self.capabilities.insert(name.into(), capability);
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.capabilities.get(name)
    }

    /// Names of platforms that can be published to
    pub fn available(&self) -> Vec<&str> {
        self.capabilities
            .iter()
            .filter(|(_, capability)| capability.is_available())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

fn detect(kind: PlatformKind, config: &Config) -> Capability {
    match kind {
        #[cfg(feature = "twitter")]
        PlatformKind::Twitter => Capability::Available(Box::new(
            crate::platforms::twitter::TwitterClient::from_config(config.twitter.as_ref()),
        )),
        #[cfg(feature = "bluesky")]
        PlatformKind::Bluesky => Capability::Available(Box::new(
            crate::platforms::bluesky::BlueskyClient::from_config(config.bluesky.as_ref()),
        )),
        #[cfg(feature = "linkedin")]
        PlatformKind::LinkedIn => Capability::Available(Box::new(
            crate::platforms::linkedin::LinkedInClient::from_config(config.linkedin.as_ref()),
        )),
        #[allow(unreachable_patterns)]
        other => {
            let _ = config;
            Capability::Unavailable(format!("built without the `{}` feature", other.feature()))
        }
    }
}

/// Frame printed for a dry-run post
pub fn dry_run_frame(platform: &str, content: &str) -> String {
    let upper = platform.to_uppercase();
    format!(
        "\n--- {} POST (DRY RUN) ---\n{}\n--- END {} POST ---\n",
        upper, content, upper
    )
}

/// Publishes content, or prints it in dry-run mode
#[derive(Debug)]
pub struct Dispatcher {
    registry: PlatformRegistry,
    dry_run: bool,
}

impl Dispatcher {
    pub fn new(registry: PlatformRegistry, dry_run: bool) -> Self {
        Self { registry, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Publish `content` to `platform`
    ///
    /// Returns `true` on success. Errors are logged with the platform name
    /// and never returned.
    pub async fn publish(&self, platform: &str, content: &str) -> bool {
        if self.dry_run {
            println!("{}", dry_run_frame(platform, content));
            return true;
        }

        match self.try_publish(platform, content).await {
            Ok(post_id) => {
                info!("Posted to {}: {}", platform, post_id);
                true
            }
            Err(e) => {
                error!("Failed to post to {}: {}", platform, e);
                false
            }
        }
    }

    async fn try_publish(&self, platform: &str, content: &str) -> crate::Result<String> {
        let client = match self.registry.get(platform) {
            None => return Err(PlatformError::UnknownPlatform(platform.to_string()).into()),
            Some(Capability::Unavailable(reason)) => {
                return Err(PlatformError::Unavailable {
                    platform: platform.to_string(),
                    reason: reason.clone(),
                }
                .into())
            }
            Some(Capability::Available(client)) => client,
        };

        if !client.is_configured() {
            return Err(PlatformError::MissingCredentials(platform.to_string()).into());
        }

        client.post(content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::mock::MockPlatform;

    #[test]
    fn test_dry_run_frame() {
        assert_eq!(
            dry_run_frame("twitter", "Hello"),
            "\n--- TWITTER POST (DRY RUN) ---\nHello\n--- END TWITTER POST ---\n"
        );
    }

    #[test]
    fn test_registry_covers_all_builtins() {
        let registry = PlatformRegistry::from_config(&Config::default());
        for kind in PlatformKind::ALL {
            assert!(registry.get(kind.name()).is_some());
        }
        assert!(registry.get("mastodon").is_none());
    }

    #[cfg(all(feature = "twitter", feature = "bluesky", feature = "linkedin"))]
    #[test]
    fn test_default_build_has_everything_available() {
        let registry = PlatformRegistry::from_config(&Config::default());
        assert_eq!(registry.available(), vec!["bluesky", "linkedin", "twitter"]);
    }

    #[tokio::test]
    async fn test_dry_run_succeeds_without_calling_platform() {
        let platform = MockPlatform::post_failure("twitter", "should not be called");
        let calls = platform.log();

        let mut registry = PlatformRegistry::new();
        registry.register("twitter", Capability::Available(Box::new(platform)));
        let dispatcher = Dispatcher::new(registry, true);

        assert!(dispatcher.publish("twitter", "content").await);
        assert!(dispatcher.publish("myspace", "content").await);
        assert_eq!(calls.attempts(), 0);
    }

    #[tokio::test]
    async fn test_unknown_platform_fails() {
        let dispatcher = Dispatcher::new(PlatformRegistry::new(), false);
        assert!(!dispatcher.publish("myspace", "content").await);
    }

    #[tokio::test]
    async fn test_unavailable_platform_fails() {
        let mut registry = PlatformRegistry::new();
        registry.register(
            "linkedin",
            Capability::Unavailable("built without the `linkedin` feature".to_string()),
        );
        let dispatcher = Dispatcher::new(registry, false);
        assert!(!dispatcher.publish("linkedin", "content").await);
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_network_call() {
        let platform = MockPlatform::not_configured("bluesky");
        let calls = platform.log();

        let mut registry = PlatformRegistry::new();
        registry.register("bluesky", Capability::Available(Box::new(platform)));
        let dispatcher = Dispatcher::new(registry, false);

        assert!(!dispatcher.publish("bluesky", "content").await);
        assert_eq!(calls.attempts(), 0);
    }

    #[tokio::test]
    async fn test_platform_error_becomes_false() {
        let mut registry = PlatformRegistry::new();
        registry.register(
            "twitter",
            Capability::Available(Box::new(MockPlatform::post_failure("twitter", "503"))),
        );
        let dispatcher = Dispatcher::new(registry, false);
        assert!(!dispatcher.publish("twitter", "content").await);
    }

    #[tokio::test]
    async fn test_success_posts_content() {
        let platform = MockPlatform::success("twitter");
        let posted = platform.log();

        let mut registry = PlatformRegistry::new();
        registry.register("twitter", Capability::Available(Box::new(platform)));
        let dispatcher = Dispatcher::new(registry, false);

        assert!(dispatcher.publish("twitter", "New blog post").await);
        assert_eq!(posted.accepted(), vec!["New blog post".to_string()]);
    }

    #[tokio::test]
    async fn test_real_clients_without_credentials_fail() {
        let dispatcher = Dispatcher::new(PlatformRegistry::from_config(&Config::default()), false);
        for kind in PlatformKind::ALL {
            assert!(!dispatcher.publish(kind.name(), "content").await);
        }
    }
}
