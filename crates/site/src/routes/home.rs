//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::content::Post;
use crate::filters;
use crate::state::AppState;

/// A highlight card on the home page.
pub struct Highlight {
    pub title: &'static str,
    pub text: &'static str,
    pub link_url: &'static str,
    pub link_text: &'static str,
}

/// Static highlight cards for the home page.
#[must_use]
pub fn highlights() -> Vec<Highlight> {
    vec![
        Highlight {
            title: "Rainbow Egg Cartons",
            text: "Chocolate, blue, olive, and green eggs from our pasture-raised \
                   heritage flock in the foothills of Mount Airy, NC.",
            link_url: "/animals",
            link_text: "Shop eggs",
        },
        Highlight {
            title: "Heritage Breed Chicks",
            text: "Seasonal hatches of Black Copper Marans, Cream Legbars, and \
                   Olive Eggers, raised on pasture from day one.",
            link_url: "/animals",
            link_text: "Shop chicks",
        },
        Highlight {
            title: "From the Farm Journal",
            text: "What's happening on the farm, from coop builds to hatch-day \
                   notes.",
            link_url: "/blog",
            link_text: "Read the blog",
        },
    ]
}

/// Recent blog post display data.
pub struct RecentPostView {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub published_at: String,
}

impl From<&Post> for RecentPostView {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.meta.title.clone(),
            description: post.meta.description.clone(),
            published_at: post.meta.published_at.format("%B %-d, %Y").to_string(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub highlights: Vec<Highlight>,
    pub recent_posts: Vec<RecentPostView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let recent_posts = state
        .content()
        .get_recent_posts(3, None)
        .into_iter()
        .map(RecentPostView::from)
        .collect();

    HomeTemplate {
        highlights: highlights(),
        recent_posts,
    }
}
