//! Core types for Blogcast

use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::frontmatter::{self, FrontMatter};

/// A blog post as found on disk
///
/// Built fresh on every scan and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// File stem, unique per content file
    pub id: String,
    pub title: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub description: String,
    pub tags: Vec<String>,
    pub draft: bool,
    pub url: String,
}

impl Post {
    /// Build a post from a document's text
    ///
    /// The URL depends only on `id`, so it is set even when the header fails
    /// to parse.
    pub fn from_document(id: &str, content: &str, base_url: &str) -> Self {
        let FrontMatter {
            title,
            description,
            tags,
            draft,
            date,
        } = frontmatter::parse(content, id);

        Self {
            id: id.to_string(),
            title,
            date,
            description,
            tags,
            draft,
            url: post_url(base_url, id),
        }
    }

    /// Read and parse a post file
    pub fn from_file(path: &Path, base_url: &str) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_document(&id, &content, base_url))
    }

    /// Non-draft posts with a publication date may be shared
    pub fn is_eligible(&self) -> bool {
        !self.draft && self.date.is_some()
    }
}

/// Canonical URL for a post: `<base>/posts/<id>/`
pub fn post_url(base_url: &str, id: &str) -> String {
    format!("{}/posts/{}/", base_url.trim_end_matches('/'), id)
}

/// Record of a post that has been shared
///
/// Written once on the first successful share and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostedRecord {
    pub title: String,
    pub posted_date: DateTime<Utc>,
    /// Every platform that was requested, including ones that failed
    pub platforms: Vec<String>,
    pub url: String,
}

impl PostedRecord {
    pub fn new(post: &Post, platforms: &[String]) -> Self {
        Self {
            title: post.title.clone(),
            posted_date: Utc::now(),
            platforms: platforms.to_vec(),
            url: post.url.clone(),
        }
    }
}
