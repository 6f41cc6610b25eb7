//! Post discovery in a content directory

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::types::Post;

/// Reads `*.md` posts from a single directory
#[derive(Debug, Clone)]
pub struct PostRepository {
    dir: PathBuf,
    base_url: String,
}

impl PostRepository {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    /// The newest `limit` eligible posts, newest first
    ///
    /// Posts with the same timestamp are ordered by id. A missing directory
    /// is logged and treated as empty.
    pub fn latest(&self, limit: usize) -> Vec<Post> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Posts directory not found: {} ({})", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut posts: Vec<Post> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_markdown(path))
            .filter_map(|path| match Post::from_file(&path, &self.base_url) {
                Ok(post) => Some(post),
                Err(e) => {
                    warn!("Skipping unreadable post {}: {}", path.display(), e);
                    None
                }
            })
            .filter(|post| {
                let eligible = post.is_eligible();
                if !eligible {
                    debug!("Skipping {} (draft or undated)", post.id);
                }
                eligible
            })
            .collect();

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        posts.truncate(limit);
        posts
    }
}

fn is_markdown(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, date: Option<&str>, draft: bool) {
        let date_line = date
            .map(|d| format!("date = \"{}\"\n", d))
            .unwrap_or_default();
        let content = format!(
            "+++\ntitle = \"{}\"\n{}draft = {}\n+++\n\nBody\n",
            name, date_line, draft
        );
        std::fs::write(dir.join(format!("{}.md", name)), content).unwrap();
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_latest_sorted_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        write_post(temp_dir.path(), "old", Some("2023-01-01T00:00:00Z"), false);
        write_post(temp_dir.path(), "new", Some("2024-06-01T00:00:00Z"), false);
        write_post(temp_dir.path(), "mid", Some("2023-08-15T12:00:00+02:00"), false);

        let repo = PostRepository::new(temp_dir.path(), "https://b.example");
        assert_eq!(ids(&repo.latest(5)), vec!["new", "mid", "old"]);
        assert_eq!(ids(&repo.latest(2)), vec!["new", "mid"]);
    }

    #[test]
    fn test_drafts_and_undated_excluded() {
        let temp_dir = TempDir::new().unwrap();
        write_post(temp_dir.path(), "draft", Some("2024-06-01T00:00:00Z"), true);
        write_post(temp_dir.path(), "undated", None, false);
        write_post(temp_dir.path(), "published", Some("2020-01-01T00:00:00Z"), false);

        let repo = PostRepository::new(temp_dir.path(), "https://b.example");
        assert_eq!(ids(&repo.latest(5)), vec!["published"]);
        assert_eq!(ids(&repo.latest(1)), vec!["published"]);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let temp_dir = TempDir::new().unwrap();
        write_post(temp_dir.path(), "zeta", Some("2024-01-01T00:00:00Z"), false);
        write_post(temp_dir.path(), "alpha", Some("2024-01-01T00:00:00Z"), false);
        write_post(temp_dir.path(), "mu", Some("2024-01-01T00:00:00Z"), false);

        let repo = PostRepository::new(temp_dir.path(), "https://b.example");
        assert_eq!(ids(&repo.latest(5)), vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_non_markdown_and_subdirectories_ignored() {
        let temp_dir = TempDir::new().unwrap();
        write_post(temp_dir.path(), "post", Some("2024-01-01T00:00:00Z"), false);
        std::fs::write(
            temp_dir.path().join("notes.txt"),
            "+++\ntitle = \"Not a post\"\ndate = \"2025-01-01\"\n+++\n",
        )
        .unwrap();
        let nested = temp_dir.path().join("bundle");
        std::fs::create_dir(&nested).unwrap();
        write_post(&nested, "index", Some("2025-01-01T00:00:00Z"), false);

        let repo = PostRepository::new(temp_dir.path(), "https://b.example");
        assert_eq!(ids(&repo.latest(5)), vec!["post"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = PostRepository::new(temp_dir.path().join("nope"), "https://b.example");
        assert!(repo.latest(5).is_empty());
    }

    #[test]
    fn test_zero_limit() {
        let temp_dir = TempDir::new().unwrap();
        write_post(temp_dir.path(), "post", Some("2024-01-01T00:00:00Z"), false);
        let repo = PostRepository::new(temp_dir.path(), "https://b.example");
        assert!(repo.latest(0).is_empty());
    }
}
