//! Flavor catalog endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use shisha_common::models::{FlavorTag, FlavorWithBrand};

use crate::db::catalog::FlavorFilter;
use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// Query parameters for flavor listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorQuery {
    pub brand_id: Option<i64>,
    pub tag: Option<FlavorTag>,
    pub search: Option<String>,
}

/// GET /api/flavors
///
/// Available flavors, optionally filtered by brand, profile tag or name
/// substring.
pub async fn list_flavors(
    State(state): State<AppState>,
    Query(query): Query<FlavorQuery>,
) -> ApiResult<Json<Vec<FlavorWithBrand>>> {
    let filter = FlavorFilter {
        brand_id: query.brand_id,
        tag: query.tag,
        search: query.search,
    };
    let flavors = db::catalog::list_flavors(&state.db, &filter).await?;
    Ok(Json(flavors))
}

/// GET /api/flavors/:id
pub async fn get_flavor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<FlavorWithBrand>> {
    let flavor = db::catalog::get_flavor(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flavor {}", id)))?;
    Ok(Json(flavor))
}

/// Build flavor routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flavors", get(list_flavors))
        .route("/api/flavors/:id", get(get_flavor))
}
