//! Animals page route handler.
//!
//! The animals page doubles as the shop: it presents the flock (breed
//! profiles) alongside purchasable products. Products come from the
//! commerce backend's `animal` category, narrowed to the egg and chick
//! subcategories; anything else in the category is not sold through the
//! website.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use lmw_farm_core::ProductId;

use crate::commerce::types::Product;
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.product_name.clone(),
            description: product.description.clone(),
            price: product.unit_price.to_string(),
        }
    }
}

/// A breed profile shown in the flock section.
pub struct BreedProfile {
    pub name: &'static str,
    pub egg_color: &'static str,
    pub blurb: &'static str,
}

/// The breeds currently on the farm.
#[must_use]
pub fn breed_profiles() -> Vec<BreedProfile> {
    vec![
        BreedProfile {
            name: "Black Copper Marans",
            egg_color: "Dark chocolate brown",
            blurb: "A French heritage breed prized for some of the darkest \
                    eggs a chicken can lay. Calm birds that handle our \
                    winters well.",
        },
        BreedProfile {
            name: "Cream Legbar",
            egg_color: "Sky blue",
            blurb: "An auto-sexing British breed with a jaunty crest. \
                    Excellent foragers that keep the pasture bug-free.",
        },
        BreedProfile {
            name: "Olive Egger",
            egg_color: "Olive green",
            blurb: "A Marans-Legbar cross that lays olive-toned eggs. Every \
                    hen's shade is a little different.",
        },
        BreedProfile {
            name: "Americana",
            egg_color: "Blue-green",
            blurb: "Friendly, cold-hardy layers with muffs and beards. The \
                    backbone of our rainbow egg cartons.",
        },
    ]
}

/// Animals page template.
#[derive(Template, WebTemplate)]
#[template(path = "animals.html")]
pub struct AnimalsTemplate {
    pub breeds: Vec<BreedProfile>,
    pub eggs: Vec<ProductView>,
    pub chicks: Vec<ProductView>,
    pub shop_available: bool,
}

/// Display the animals page with the flock and the shop.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let (eggs, chicks, shop_available) =
        match state.commerce().products_by_category("animal").await {
            Ok(products) => {
                let (eggs, chicks) = partition_shop_products(&products);
                (eggs, chicks, true)
            }
            Err(e) => {
                // The flock section still renders; only the shop is down
                tracing::error!("Failed to fetch animal products: {e}");
                sentry::capture_error(&e);
                (Vec::new(), Vec::new(), false)
            }
        };

    AnimalsTemplate {
        breeds: breed_profiles(),
        eggs,
        chicks,
        shop_available,
    }
}

/// Split the animal category into the sellable egg and chick listings.
///
/// Only the `eggs` and `chicks` subcategories are sold through the website;
/// anything else in the category is dropped.
fn partition_shop_products(products: &[Product]) -> (Vec<ProductView>, Vec<ProductView>) {
    let mut eggs = Vec::new();
    let mut chicks = Vec::new();

    for product in products {
        match product.subcategory.as_deref() {
            Some("eggs") => eggs.push(ProductView::from(product)),
            Some("chicks") => chicks.push(ProductView::from(product)),
            _ => {}
        }
    }

    (eggs, chicks)
}
