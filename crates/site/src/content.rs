//! Content management for markdown blog posts.
//!
//! Loads markdown files from the `content/blog` directory at startup, parses
//! YAML frontmatter metadata, and renders markdown to HTML. Posts live in
//! memory for the life of the process; publishing means redeploying.

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when loading content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Metadata for blog posts.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub published_at: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
}

/// A rendered blog post with metadata and HTML content.
#[derive(Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub meta: PostMeta,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

/// Content store that holds all loaded posts in memory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    posts: Arc<Vec<Post>>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read. Individual
    /// malformed posts are logged and skipped.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let posts = Self::load_posts(&content_dir.join("blog"))?;

        Ok(Self {
            posts: Arc::new(posts),
        })
    }

    /// Load all blog posts from the blog directory.
    fn load_posts(dir: &Path) -> Result<Vec<Post>, ContentError> {
        let mut posts = Vec::new();

        if !dir.exists() {
            tracing::info!("Blog directory does not exist yet: {:?}", dir);
            return Ok(posts);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_post(&path) {
                    Ok(post) => {
                        tracing::info!("Loaded post: {}", post.slug);
                        posts.push(post);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Sort posts by published date (newest first)
        posts.sort_by(|a, b| b.meta.published_at.cmp(&a.meta.published_at));

        Ok(posts)
    }

    /// Load a single blog post from a markdown file.
    fn load_post(path: &Path) -> Result<Post, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        // Extract slug from filename (e.g., "2026-01-15-my-post.md" -> "my-post")
        let filename = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?;

        let slug = strip_date_prefix(filename).to_string();

        let matter = Matter::<YAML>::new();
        let parsed: ParsedEntity<PostMeta> = matter
            .parse(&content)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

        let content_html = render_markdown(&parsed.content);
        let reading_time_minutes = estimate_reading_time(&parsed.content);

        Ok(Post {
            slug,
            meta,
            content_html,
            reading_time_minutes,
        })
    }

    /// Get a blog post by slug.
    #[must_use]
    pub fn get_post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Get all published blog posts, newest first (excludes drafts).
    pub fn get_published_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.meta.draft)
    }

    /// Get recent published posts, optionally excluding a specific slug.
    #[must_use]
    pub fn get_recent_posts(&self, limit: usize, exclude_slug: Option<&str>) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| !p.meta.draft && exclude_slug.is_none_or(|s| p.slug != s))
            .take(limit)
            .collect()
    }
}

/// Remove a leading `YYYY-MM-DD-` date prefix from a filename stem.
///
/// Stems without a full date prefix pass through unchanged, so undated
/// filenames still make valid slugs.
fn strip_date_prefix(filename: &str) -> &str {
    fn is_date_prefix(bytes: &[u8]) -> bool {
        bytes.len() == 11
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 | 10 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }

    match (filename.as_bytes().get(..11), filename.get(11..)) {
        (Some(prefix), Some(rest)) if is_date_prefix(prefix) && !rest.is_empty() => rest,
        _ => filename,
    }
}

/// Estimate reading time at an average 200 words per minute, minimum 1.
fn estimate_reading_time(content: &str) -> u32 {
    let word_count = content.split_whitespace().count();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let minutes = ((word_count as f32) / 200.0).ceil() as u32;
    minutes.max(1)
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    markdown_to_html(content, &options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    fn write_post(dir: &Path, name: &str, body: &str) {
        fs::create_dir_all(dir.join("blog")).unwrap();
        fs::write(dir.join("blog").join(name), body).unwrap();
    }

    fn temp_content_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("lmw-content-test-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const POST: &str = "---\n\
title: Meet the Flock\n\
description: Our first heritage breeds\n\
author: LMW Farm\n\
published_at: 2026-02-01\n\
tags: [chickens]\n\
---\n\
We are raising **Black Copper Marans** and Cream Legbars this spring.\n";

    const DRAFT: &str = "---\n\
title: Unfinished\n\
published_at: 2026-03-01\n\
draft: true\n\
---\n\
Not ready yet.\n";

    #[test]
    fn test_load_and_query_posts() {
        let dir = temp_content_dir("load");
        write_post(&dir, "2026-02-01-meet-the-flock.md", POST);
        write_post(&dir, "2026-03-01-unfinished.md", DRAFT);

        let store = ContentStore::load(&dir).unwrap();

        let post = store.get_post("meet-the-flock").unwrap();
        assert_eq!(post.meta.title, "Meet the Flock");
        assert!(post.content_html.contains("<strong>Black Copper Marans</strong>"));
        assert_eq!(post.reading_time_minutes, 1);

        // Drafts are loaded but never published
        assert!(store.get_post("unfinished").is_some());
        let published: Vec<_> = store.get_published_posts().collect();
        assert_eq!(published.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_blog_dir_is_empty_store() {
        let dir = temp_content_dir("empty");
        let store = ContentStore::load(&dir).unwrap();
        assert_eq!(store.get_published_posts().count(), 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_recent_posts_excludes_slug() {
        let dir = temp_content_dir("recent");
        write_post(&dir, "2026-02-01-meet-the-flock.md", POST);
        let store = ContentStore::load(&dir).unwrap();

        assert_eq!(store.get_recent_posts(3, None).len(), 1);
        assert!(store.get_recent_posts(3, Some("meet-the-flock")).is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_strip_date_prefix() {
        assert_eq!(strip_date_prefix("2026-02-01-meet-the-flock"), "meet-the-flock");
        assert_eq!(strip_date_prefix("meet-the-flock"), "meet-the-flock");
        assert_eq!(strip_date_prefix("short"), "short");
        // A date needs all its digits and hyphens to count as a prefix
        assert_eq!(strip_date_prefix("2026-1x-01-wrong"), "2026-1x-01-wrong");
        assert_eq!(strip_date_prefix("2026-02-01-"), "2026-02-01-");
    }

    #[test]
    fn test_estimate_reading_time_minimum_one() {
        assert_eq!(estimate_reading_time("a few words"), 1);
        let long = "word ".repeat(450);
        assert_eq!(estimate_reading_time(&long), 3);
    }
}
