//! Static page route handlers: about and future plans.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate;

/// Display the about page.
#[instrument]
pub async fn about() -> impl IntoResponse {
    AboutTemplate
}

/// A planned addition shown on the future plans page.
pub struct FuturePlan {
    pub title: &'static str,
    pub timeframe: &'static str,
    pub text: &'static str,
}

/// The roadmap of planned farm additions.
#[must_use]
pub fn future_plans() -> Vec<FuturePlan> {
    vec![
        FuturePlan {
            title: "Quail",
            timeframe: "Next spring",
            text: "Coturnix quail for speckled eggs and a faster hatch cycle \
                   than chickens.",
        },
        FuturePlan {
            title: "Meat Birds",
            timeframe: "Next year",
            text: "Pasture-raised broilers moved daily to fresh grass.",
        },
        FuturePlan {
            title: "Market Garden",
            timeframe: "Ongoing",
            text: "Expanding the kitchen garden into a small market plot, with \
                   compost from the coops closing the loop.",
        },
        FuturePlan {
            title: "Farm Stand",
            timeframe: "Down the road",
            text: "A self-serve stand at the end of the driveway for eggs and \
                   seasonal produce.",
        },
    ]
}

/// Future plans page template.
#[derive(Template, WebTemplate)]
#[template(path = "future.html")]
pub struct FutureTemplate {
    pub plans: Vec<FuturePlan>,
}

/// Display the future plans page.
#[instrument]
pub async fn future() -> impl IntoResponse {
    FutureTemplate {
        plans: future_plans(),
    }
}
