pub mod api;
pub mod config;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::GatewayConfig;
use crate::services::media_store::MediaStore;
use crate::services::upload_service::UploadService;
use crate::utils::display_url::DisplayUrlResolver;
use crate::utils::validation::AcceptancePolicy;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_single,
        api::handlers::upload::upload_multiple,
        api::handlers::upload::upload_menu_image,
        api::handlers::upload::delete_asset,
        api::handlers::upload::get_policy,
        api::handlers::display::resolve_display_url,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::types::SingleUploadResponse,
            api::handlers::types::UploadedFile,
            api::handlers::types::MultipleUploadResponse,
            api::handlers::types::MenuImageResponse,
            api::handlers::types::MessageResponse,
            api::handlers::types::SingleUploadForm,
            api::handlers::types::MultipleUploadForm,
            api::handlers::types::MenuImageForm,
            api::handlers::display::DisplayUrlResponse,
            api::handlers::health::HealthResponse,
            utils::validation::AcceptancePolicy,
        )
    ),
    tags(
        (name = "upload", description = "File upload endpoints"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub upload_service: Arc<UploadService>,
    pub policy: AcceptancePolicy,
    pub display_urls: DisplayUrlResolver,
    pub config: GatewayConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn MediaStore>, config: GatewayConfig) -> Self {
        Self {
            upload_service: Arc::new(UploadService::new(store)),
            policy: config.acceptance_policy(),
            display_urls: DisplayUrlResolver::new(config.public_api_url.clone()),
            config,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let allow_origin = if origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.request_body_limit();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/display-url",
            get(api::handlers::display::resolve_display_url),
        )
        .route(
            "/upload/policy",
            get(api::handlers::upload::get_policy)
                .delete(api::handlers::upload::delete_reserved_segment),
        )
        .route(
            "/upload/single",
            post(api::handlers::upload::upload_single)
                .delete(api::handlers::upload::delete_reserved_segment),
        )
        .route(
            "/upload/multiple",
            post(api::handlers::upload::upload_multiple)
                .delete(api::handlers::upload::delete_reserved_segment),
        )
        .route(
            "/upload/menu-image",
            post(api::handlers::upload::upload_menu_image)
                .delete(api::handlers::upload::delete_reserved_segment),
        )
        .route(
            "/upload/:public_id",
            delete(api::handlers::upload::delete_asset),
        )
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
