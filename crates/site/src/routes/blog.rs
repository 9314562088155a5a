//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::content::Post;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Blog post display data for templates.
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub published_at: String,
    pub tags: Vec<String>,
    pub reading_time_minutes: u32,
    pub content_html: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.meta.title.clone(),
            description: post.meta.description.clone(),
            author: post.meta.author.clone(),
            published_at: post.meta.published_at.format("%B %-d, %Y").to_string(),
            tags: post.meta.tags.clone(),
            reading_time_minutes: post.reading_time_minutes,
            content_html: post.content_html.clone(),
        }
    }
}

/// Blog index template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub posts: Vec<PostView>,
}

/// Blog post template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub post: PostView,
    pub more_posts: Vec<PostView>,
}

/// Display the blog index, newest posts first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let posts = state
        .content()
        .get_published_posts()
        .map(PostView::from)
        .collect();

    BlogIndexTemplate { posts }
}

/// Display a single blog post.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let post = state
        .content()
        .get_post(&slug)
        .filter(|p| !p.meta.draft)
        .ok_or_else(|| AppError::NotFound(format!("blog post: {slug}")))?;

    let more_posts = state
        .content()
        .get_recent_posts(3, Some(&slug))
        .into_iter()
        .map(PostView::from)
        .collect();

    Ok(BlogShowTemplate {
        post: PostView::from(post),
        more_posts,
    })
}
