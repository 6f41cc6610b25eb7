//! blogcast-post - Share new blog posts to social platforms

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use libblogcast::logging::{LogFormat, LoggingConfig};
use libblogcast::{BlogPoster, BlogcastError, Config, ShareOptions};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "blogcast-post")]
#[command(version)]
#[command(about = "Share new blog posts to social platforms")]
#[command(long_about = "\
blogcast-post - Share new blog posts to social platforms

DESCRIPTION:
    Reads the newest posts from the content directory, skips drafts, undated
    posts and posts already listed in the history file, and announces the
    rest on each requested platform. A post is added to the history once at
    least one platform accepted it.

USAGE:
    # Preview what would be posted
    blogcast-post --dry-run

    # Share to Bluesky only
    blogcast-post --platforms bluesky

    # Re-share the newest post
    blogcast-post --force

CONFIGURATION:
    --config, else $BLOGCAST_CONFIG, else ./blogcast.toml, else
    ~/.config/blogcast/config.toml

EXIT CODES:
    0 - Run completed (individual platforms may have failed)
    1 - Configuration or history error
    3 - Invalid input
")]
struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print what would be posted without posting or recording anything
    #[arg(long)]
    dry_run: bool,

    /// Share the newest post even if it was shared before
    #[arg(long)]
    force: bool,

    /// Platforms to share to (default: from config, else all)
    #[arg(long, num_args = 1.., value_parser = ["twitter", "bluesky", "linkedin"])]
    platforms: Option<Vec<String>>,

    /// How many of the newest posts to consider
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Directory containing the Markdown posts
    #[arg(long, value_name = "DIR")]
    content_dir: Option<String>,

    /// History file recording shared posts
    #[arg(long, value_name = "FILE")]
    history: Option<String>,

    /// Log output format
    #[arg(long, env = "BLOGCAST_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Log level or filter directive
    #[arg(long, env = "BLOGCAST_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::new(cli.log_format, cli.log_level.clone(), cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<BlogcastError>()
            .map(BlogcastError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    apply_overrides(&mut config, &cli)?;

    let mut options = ShareOptions::from_config(&config);
    options.force = cli.force;

    let mut poster = BlogPoster::from_config(&config, cli.dry_run)?;
    let summary = poster.run(&options).await?;

    if !summary.is_empty() {
        info!(
            "Processed {} post(s), {} recorded in {}",
            summary.posts.len(),
            summary.recorded(),
            poster.history().path().display()
        );
    }

    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<(), BlogcastError> {
    if let Some(dir) = &cli.content_dir {
        config.site.content_dir = dir.clone();
    }
    if let Some(history) = &cli.history {
        config.site.history_file = history.clone();
    }
    if let Some(platforms) = &cli.platforms {
        config.defaults.platforms = platforms.clone();
    }
    if let Some(limit) = cli.limit {
        if limit == 0 {
            return Err(BlogcastError::InvalidInput(
                "--limit must be at least 1".to_string(),
            ));
        }
        config.defaults.limit = limit;
    }
    Ok(())
}
