//! Sharing orchestration
//!
//! [`BlogPoster`] picks the posts to share, renders them per platform, hands
//! each rendering to the [`Dispatcher`] and records shared posts in the
//! [`PostedHistory`]. Posts and platforms are processed one at a time.

use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch::{Dispatcher, PlatformRegistry};
use crate::error::Result;
use crate::history::PostedHistory;
use crate::render::Renderer;
use crate::repository::PostRepository;
use crate::types::{Post, PostedRecord};

/// What a single run should do
#[derive(Debug, Clone)]
pub struct ShareOptions {
    /// Platforms to share to, in order
    pub platforms: Vec<String>,
    /// Share the newest eligible post even if it was shared before
    pub force: bool,
    /// How many of the newest posts to consider in normal mode
    pub limit: usize,
}

impl ShareOptions {
    /// Options taken from the `[defaults]` section of `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            platforms: config.defaults.platforms.clone(),
            force: false,
            limit: config.defaults.limit,
        }
    }
}

/// Outcome of sharing one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOutcome {
    pub id: String,
    pub title: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    /// Whether a history entry was written for this post
    pub recorded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareSummary {
    pub posts: Vec<PostOutcome>,
}

impl ShareSummary {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn recorded(&self) -> usize {
        self.posts.iter().filter(|p| p.recorded).count()
    }
}

pub struct BlogPoster {
    repository: PostRepository,
    history: PostedHistory,
    renderer: Renderer,
    dispatcher: Dispatcher,
}

impl BlogPoster {
    pub fn new(
        repository: PostRepository,
        history: PostedHistory,
        renderer: Renderer,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            repository,
            history,
            renderer,
            dispatcher,
        }
    }

    /// Wire every component from configuration
    ///
    /// # Errors
    ///
    /// Fails when a configured template is invalid or the history file
    /// exists but cannot be read.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        let repository = PostRepository::new(config.content_dir(), config.site.base_url.clone());
        let history = PostedHistory::open(config.history_path())?;
        let renderer = Renderer::new(&config.templates)?;
        let dispatcher = Dispatcher::new(PlatformRegistry::from_config(config), dry_run);

        Ok(Self::new(repository, history, renderer, dispatcher))
    }

    pub fn history(&self) -> &PostedHistory {
        &self.history
    }

    /// Posts this run will share
    pub fn candidates(&self, options: &ShareOptions) -> Vec<Post> {
        if options.force {
            return self.repository.latest(1);
        }

        self.repository
            .latest(options.limit)
            .into_iter()
            .filter(|post| !self.history.contains(&post.id))
            .collect()
    }

    /// Share every candidate post to the requested platforms
    ///
    /// Platform failures are logged and reflected in the summary. Only a
    /// failure to persist the history aborts the run.
    pub async fn run(&mut self, options: &ShareOptions) -> Result<ShareSummary> {
        let candidates = self.candidates(options);
        if candidates.is_empty() {
            info!("No new posts to share");
            return Ok(ShareSummary::default());
        }

        if options.platforms.is_empty() {
            warn!("No platforms requested, nothing will be shared");
        }

        let mut summary = ShareSummary::default();
        for post in candidates {
            let outcome = self.share(&post, &options.platforms).await?;
            summary.posts.push(outcome);
        }

        Ok(summary)
    }

    async fn share(&mut self, post: &Post, platforms: &[String]) -> Result<PostOutcome> {
        info!("Sharing post: {}", post.title);

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for platform in platforms {
            let content = self.renderer.render(post, platform);
            if self.dispatcher.publish(platform, &content).await {
                succeeded.push(platform.clone());
            } else {
                failed.push(platform.clone());
            }
        }

        let recorded = !succeeded.is_empty() && !self.dispatcher.is_dry_run();
        if recorded {
            self.history
                .record(post.id.clone(), PostedRecord::new(post, platforms))?;
            info!(
                "Shared '{}' to {}/{} platforms",
                post.title,
                succeeded.len(),
                platforms.len()
            );
        } else if succeeded.is_empty() {
            warn!("Failed to share '{}' to any platform", post.title);
        }

        Ok(PostOutcome {
            id: post.id.clone(),
            title: post.title.clone(),
            succeeded,
            failed,
            recorded,
        })
    }
}
