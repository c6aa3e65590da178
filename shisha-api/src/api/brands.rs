//! Brand catalog endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use shisha_common::models::{BrandDetail, BrandInfo};

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// GET /api/brands
///
/// Active brands sorted by name, with available-flavor counts.
pub async fn list_brands(State(state): State<AppState>) -> ApiResult<Json<Vec<BrandInfo>>> {
    let brands = db::catalog::list_brands(&state.db).await?;
    Ok(Json(brands))
}

/// GET /api/brands/:slug
///
/// Brand detail with its available flavors.
pub async fn get_brand(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<BrandDetail>> {
    let brand = db::catalog::get_brand_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("brand {}", slug)))?;
    Ok(Json(brand))
}

/// Build brand routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/brands", get(list_brands))
        .route("/api/brands/:slug", get(get_brand))
}
