//! Blogcast - share new blog posts to social platforms
//!
//! This library reads dated Markdown posts with TOML front matter, renders a
//! per-platform announcement for each post not yet shared, publishes it and
//! remembers what was shared in a JSON history file.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod frontmatter;
pub mod history;
pub mod logging;
pub mod platforms;
pub mod poster;
pub mod render;
pub mod repository;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{Capability, Dispatcher, PlatformRegistry};
pub use error::{BlogcastError, Result};
pub use history::PostedHistory;
pub use poster::{BlogPoster, PostOutcome, ShareOptions, ShareSummary};
pub use render::Renderer;
pub use repository::PostRepository;
pub use types::{Post, PostedRecord};
