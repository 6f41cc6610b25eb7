//! Platform text rendering
//!
//! Templates use named slots in braces (`{title}`, `{short_url}`, ...) with
//! `{{` and `}}` for literal braces. They are parsed once, when the
//! [`Renderer`] is built, so an unknown slot is a configuration error at
//! startup rather than a surprise mid-run.
//!
//! Lengths are counted in Unicode scalar values. Every rendered string fits
//! the platform limit: an overflowing post first has its description
//! shortened, and whatever still does not fit is cut off at the limit.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::TemplateConfig;
use crate::error::{ConfigError, Result};
use crate::platforms::PlatformKind;
use crate::types::Post;

/// Stand-in for posts without a description
pub const FALLBACK_DESCRIPTION: &str = "Check out my latest thoughts!";

/// Limit for platforms without a built-in or configured one
pub const DEFAULT_LIMIT: usize = 280;

const MAX_HASHTAGS: usize = 3;

/// Headroom kept when shortening a description, on top of the overflow
const TRUNCATION_SLACK: usize = 10;

const ELLIPSIS: &str = "...";

/// A named substitution slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Title,
    Description,
    Url,
    ShortUrl,
    Hashtags,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Title => "title",
            Slot::Description => "description",
            Slot::Url => "url",
            Slot::ShortUrl => "short_url",
            Slot::Hashtags => "hashtags",
        }
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "title" => Ok(Slot::Title),
            "description" => Ok(Slot::Description),
            "url" => Ok(Slot::Url),
            "short_url" => Ok(Slot::ShortUrl),
            "hashtags" => Ok(Slot::Hashtags),
            other => Err(format!("unknown slot `{}`", other)),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string
    ///
    /// Fails on unknown slot names, unclosed `{` and stray `}`.
    pub fn parse(source: &str) -> std::result::Result<Self, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(format!("unclosed `{{{}`", name)),
                        }
                    }
                    let slot = name.trim().parse::<Slot>()?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err("single `}` outside a slot".to_string()),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Slots referenced by this template, in order of appearance
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(slot) => Some(*slot),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, values: &SlotValues) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(slot) => out.push_str(values.get(*slot)),
            }
        }
        out
    }
}

/// Values substituted into a template
#[derive(Debug, Clone, Default)]
pub struct SlotValues {
    pub title: String,
    pub description: String,
    pub url: String,
    pub short_url: String,
    pub hashtags: String,
}

impl SlotValues {
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Title => &self.title,
            Slot::Description => &self.description,
            Slot::Url => &self.url,
            Slot::ShortUrl => &self.short_url,
            Slot::Hashtags => &self.hashtags,
        }
    }
}

/// Hook for shortening post URLs before they fill `{short_url}`
pub trait UrlShortener: Send + Sync {
    fn shorten(&self, url: &str) -> String;
}

/// Leaves URLs unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityShortener;

impl UrlShortener for IdentityShortener {
    fn shorten(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Built-in template for a platform
pub fn default_template(platform: &str) -> &'static str {
    match PlatformKind::from_name(platform) {
        Some(PlatformKind::Twitter) | Some(PlatformKind::Bluesky) => {
            "📝 New blog post: {title}\n\n{description}\n\n{short_url}\n\n{hashtags}"
        }
        Some(PlatformKind::LinkedIn) => {
            "📝 New blog post: {title}\n\n{description}\n\nRead more: {short_url}\n\n{hashtags}"
        }
        None => "",
    }
}

/// Built-in length limit for a platform
pub fn default_limit(platform: &str) -> usize {
    PlatformKind::from_name(platform)
        .map(|kind| kind.character_limit())
        .unwrap_or(DEFAULT_LIMIT)
}

/// `#Tag` for each of the first three tags, spaces and hyphens removed
pub fn hashtags(tags: &[String]) -> String {
    tags.iter()
        .take(MAX_HASHTAGS)
        .map(|tag| format!("#{}", tag.replace([' ', '-'], "")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `n` characters of `s`
fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[derive(Debug, Clone)]
struct PlatformTemplate {
    template: Template,
    limit: usize,
}

/// Renders posts into per-platform text
pub struct Renderer {
    overrides: HashMap<String, PlatformTemplate>,
    shortener: Box<dyn UrlShortener>,
}

impl Renderer {
    /// Build a renderer from the `[templates]` configuration
    ///
    /// Every configured template is parsed here; an invalid one is reported
    /// as [`ConfigError::InvalidTemplate`].
    pub fn new(templates: &HashMap<String, TemplateConfig>) -> Result<Self> {
        let mut overrides = HashMap::new();

        for (platform, config) in templates {
            let source = config
                .format
                .as_deref()
                .unwrap_or_else(|| default_template(platform));
            let template =
                Template::parse(source).map_err(|reason| ConfigError::InvalidTemplate {
                    platform: platform.clone(),
                    reason,
                })?;
            let limit = config.limit.unwrap_or_else(|| default_limit(platform));
            overrides.insert(platform.clone(), PlatformTemplate { template, limit });
        }

        Ok(Self {
            overrides,
            shortener: Box::new(IdentityShortener),
        })
    }

    /// Replace the URL shortening hook
    pub fn with_shortener(mut self, shortener: impl UrlShortener + 'static) -> Self {
        self.shortener = Box::new(shortener);
        self
    }

    fn template_for(&self, platform: &str) -> Template {
        if let Some(configured) = self.overrides.get(platform) {
            return configured.template.clone();
        }

        // Built-in templates are known to parse
        Template::parse(default_template(platform)).unwrap_or(Template {
            segments: Vec::new(),
        })
    }

    /// Length limit applied for `platform`
    pub fn limit_for(&self, platform: &str) -> usize {
        self.overrides
            .get(platform)
            .map(|t| t.limit)
            .unwrap_or_else(|| default_limit(platform))
    }

    /// Render `post` for `platform`
    ///
    /// The result is never longer than the platform limit.
    pub fn render(&self, post: &Post, platform: &str) -> String {
        let template = self.template_for(platform);
        let limit = self.limit_for(platform);

        let mut values = SlotValues {
            title: post.title.clone(),
            description: if post.description.is_empty() {
                FALLBACK_DESCRIPTION.to_string()
            } else {
                post.description.clone()
            },
            url: post.url.clone(),
            short_url: if template.slots().any(|slot| slot == Slot::ShortUrl) {
                self.shortener.shorten(&post.url)
            } else {
                String::new()
            },
            hashtags: hashtags(&post.tags),
        };

        let mut content = template.render(&values);
        let length = content.chars().count();

        if length > limit {
            let excess = length - limit;
            let description_len = post.description.chars().count();

            if description_len > excess + TRUNCATION_SLACK {
                let keep = description_len - excess - TRUNCATION_SLACK;
                values.description =
                    format!("{}{}", truncate_chars(&post.description, keep), ELLIPSIS);
                content = template.render(&values);
                debug!(
                    "Shortened description of {} for {} by {} characters",
                    post.id,
                    platform,
                    description_len - keep
                );
            }
        }

        truncate_chars(&content, limit).to_string()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
