use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::store::RecipeCatalog;
use crate::cli::ServeArgs;
use crate::core::ingredient::Normalizer;
use crate::core::pantry::Pantry;
use crate::core::recipe::Recipe;
use crate::core::types::SortKey;
use crate::matching::engine::{MatchingConfig, MatchingEngine};
use crate::matching::preference::Preferences;
use crate::matching::ranking::RecipeFilter;
use crate::matching::scoring::{ScoredRecipe, ScoringWeights};
use crate::matching::staples::StaplesPolicy;
use crate::providers::file::CatalogSource;
use crate::providers::memory::{InlineInventory, InlinePreferences, InlineRecipes};
use crate::providers::{InventoryProvider, PreferenceProvider, RecipeProvider};

/// Request bodies above this are rejected before parsing
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Shared application state
pub struct AppState {
    pub catalog: Arc<RecipeCatalog>,
}

impl AppState {
    pub fn new(catalog: RecipeCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

/// Enhanced error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Body of `POST /api/suggest`
///
/// `inventory` rows are read leniently (strings or objects keyed by `name`,
/// `food_name`, ...). When `recipes` is given it replaces the server catalog
/// for this request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SuggestRequest {
    #[serde(alias = "items")]
    inventory: Vec<serde_json::Value>,
    recipes: Option<Vec<Recipe>>,
    filter: RecipeFilter,
    sort: SortKey,
    weights: ScoringWeights,
    preferences: Option<serde_json::Value>,
    staples: Vec<String>,
    #[serde(alias = "noStaples")]
    no_staples: bool,
    #[serde(alias = "noAliases")]
    no_aliases: bool,
}

impl SuggestRequest {
    fn config(&self) -> MatchingConfig {
        let normalizer = if self.no_aliases {
            Normalizer::without_aliases()
        } else {
            Normalizer::default()
        };
        let staples = if self.no_staples {
            StaplesPolicy::none()
        } else {
            let mut staples = StaplesPolicy::defaults(&normalizer);
            staples.extend(&normalizer, &self.staples);
            staples
        };
        MatchingConfig {
            weights: self.weights.clone(),
            staples,
            normalizer,
        }
    }
}

#[derive(Serialize)]
struct SuggestResponse {
    count: usize,
    sort: SortKey,
    pantry_size: usize,
    scoring_weights: ScoringWeights,
    results: Vec<ScoredRecipe>,
    processing_time_ms: u64,
}

#[derive(Deserialize)]
struct NormalizeQuery {
    name: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn bad_request(error_type: &str, user_message: &str, internal_error: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(create_safe_error_response(
            error_type,
            user_message,
            Some(internal_error),
        )),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the catalog
/// cannot be loaded, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes and the non-rate-limited middleware.
///
/// The rate limiter keys on the peer address, which only exists behind a
/// real listener; [`create_router`] adds it on top.
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/suggest", post(suggest_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/normalize", get(normalize_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("cache-control"),
                    HeaderValue::from_static("no-store"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

/// Create the application router with all routes and middleware configured.
#[allow(clippy::missing_panics_doc)] // Panics only on invalid governor config (constants are valid)
pub fn create_router(state: Arc<AppState>) -> Router {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50)
        .finish()
        .unwrap();

    build_routes(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    })
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let catalog = CatalogSource::from_option(args.catalog.as_deref()).recipes()?;
    tracing::info!("serving {} recipes", catalog.len());

    let app = create_router(Arc::new(AppState::new(catalog)));

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting pantry-match API at http://{addr}");

    if args.open {
        if let Err(e) = open::that(format!("http://{addr}/api/catalog")) {
            tracing::warn!("could not open browser: {e}");
        }
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run the full pipeline on an inline pantry
async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SuggestRequest>, JsonRejection>,
) -> Response {
    let start_time = std::time::Instant::now();

    let mut request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return bad_request(
                "invalid_request",
                "Request body must be a JSON object with an `inventory` array.",
                &rejection.body_text(),
            );
        }
    };

    let inventory = InlineInventory(std::mem::take(&mut request.inventory));
    let entries = match inventory.inventory() {
        Ok(entries) => entries,
        Err(e) => {
            return bad_request(
                "invalid_inventory",
                "Unable to read the inventory. Please check the item list and try again.",
                &e.to_string(),
            );
        }
    };

    let inline_catalog;
    let catalog: &RecipeCatalog = match request.recipes.take() {
        Some(recipes) => match InlineRecipes(recipes).recipes() {
            Ok(c) => {
                inline_catalog = c;
                &inline_catalog
            }
            Err(e) => {
                return bad_request(
                    "invalid_recipes",
                    "Unable to read the recipe list.",
                    &e.to_string(),
                );
            }
        },
        None => state.catalog.as_ref(),
    };

    let config = request.config();

    let preferences = match request.preferences.take() {
        Some(document) => {
            let provider = InlinePreferences::new(document, config.normalizer.clone());
            match provider.preferences(catalog) {
                Ok(preferences) => preferences,
                Err(e) => {
                    return bad_request(
                        "invalid_preferences",
                        "Unable to read the preference data.",
                        &e.to_string(),
                    );
                }
            }
        }
        None => Preferences::default(),
    };

    let pantry = Pantry::from_entries(entries, &config.normalizer);
    let engine = MatchingEngine::with_config(catalog, config);
    let results = engine.suggest(&pantry, &preferences, &request.filter, request.sort);

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time = start_time.elapsed().as_millis() as u64;

    Json(SuggestResponse {
        count: results.len(),
        sort: request.sort,
        pantry_size: pantry.len(),
        scoring_weights: request.weights,
        results,
        processing_time_ms: processing_time,
    })
    .into_response()
}

/// Return list of recipes in catalog
async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let recipes: Vec<serde_json::Value> = state
        .catalog
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id.0,
                "title": r.title,
                "required_ingredients": r.required_ingredients,
                "optional_ingredients": r.optional_ingredients,
                "prep_time_minutes": r.prep_time_minutes,
                "calories": r.calories,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": recipes.len(),
        "recipes": recipes,
    }))
}

async fn normalize_handler(Query(query): Query<NormalizeQuery>) -> Response {
    let Some(name) = query.name.filter(|n| !n.trim().is_empty()) else {
        return bad_request(
            "missing_name",
            "Query parameter `name` is required.",
            "normalize called without a name",
        );
    };

    let normalizer = Normalizer::default();
    let normalized = normalizer.normalize(&name);
    let is_staple = StaplesPolicy::defaults(&normalizer).contains(&normalized);

    Json(serde_json::json!({
        "input": name,
        "normalized": normalized,
        "is_staple": is_staple,
    }))
    .into_response()
}
