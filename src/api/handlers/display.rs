use crate::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DisplayUrlQuery {
    /// Stored reference: an absolute URL or a path relative to the public API origin
    pub raw: Option<String>,
    /// Returned when `raw` is empty or missing
    pub fallback: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DisplayUrlResponse {
    pub url: Option<String>,
}

#[utoipa::path(
    get,
    path = "/display-url",
    params(DisplayUrlQuery),
    responses(
        (status = 200, description = "Resolved display URL", body = DisplayUrlResponse)
    ),
    tag = "upload"
)]
pub async fn resolve_display_url(
    State(state): State<AppState>,
    Query(query): Query<DisplayUrlQuery>,
) -> Json<DisplayUrlResponse> {
    let raw = query.raw.as_deref();
    let url = match query.fallback.as_deref() {
        Some(fallback) => Some(state.display_urls.resolve_or(raw, fallback)),
        None => state.display_urls.resolve(raw),
    };

    Json(DisplayUrlResponse { url })
}
