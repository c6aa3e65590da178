//! Mix endpoints: listing, detail, creation, actions
//!
//! Creation is gatekept here: required fields present, at most
//! [`MAX_INGREDIENTS`] distinct flavors, percentages in range and summing
//! to exactly 100 (integer equality, no tolerance). The storage layer then
//! persists mix + ingredients atomically.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shisha_common::composer::MAX_INGREDIENTS;
use shisha_common::models::{ActionType, MixActionRecord, MixDetail, Strength};
use tracing::{debug, info};

use crate::db::mixes::{MixSort, NewMix};
use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// Query parameters for the mix listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMixesQuery {
    #[serde(default)]
    pub sort: MixSort,
    pub strength: Option<Strength>,
    pub author_id: Option<i64>,
}

/// One ingredient in a creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInput {
    pub flavor_id: i64,
    pub percentage: i64,
}

/// POST /api/mixes request
///
/// Absent fields deserialize to empty defaults and are rejected by
/// validation with a 400, matching the wire contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMixRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default)]
    pub strength: Option<Strength>,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
}

/// POST /api/mixes/:id/action request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: Option<ActionType>,
    pub table_number: Option<i64>,
    pub comment: Option<String>,
}

/// GET /api/mixes
pub async fn list_mixes(
    State(state): State<AppState>,
    Query(query): Query<ListMixesQuery>,
) -> ApiResult<Json<Vec<MixDetail>>> {
    let mixes =
        db::mixes::list_mixes(&state.db, query.sort, query.strength, query.author_id).await?;
    Ok(Json(mixes))
}

/// GET /api/mixes/:id
pub async fn get_mix(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MixDetail>> {
    let mix = db::mixes::get_mix(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("mix {}", id)))?;
    Ok(Json(mix))
}

/// POST /api/mixes
///
/// Validates and persists a new mix; 201 with the created mix or 400 on a
/// validation failure.
pub async fn create_mix(
    State(state): State<AppState>,
    Json(request): Json<CreateMixRequest>,
) -> ApiResult<(StatusCode, Json<MixDetail>)> {
    let new = validate_create(request, state.settings.default_strength)?;

    let mix_id = db::mixes::create_mix(&state.db, &new).await?;
    info!("Mix \"{}\" created by user {} (id {})", new.name, new.author_id, mix_id);

    let mix = db::mixes::get_mix(&state.db, mix_id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("created mix {} not readable", mix_id)))?;
    Ok((StatusCode::CREATED, Json(mix)))
}

/// POST /api/mixes/:id/action
///
/// Records a LIKE/DISLIKE/ORDER. Duplicate votes are absorbed silently
/// without touching the counters; orders always append.
pub async fn record_action(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<(StatusCode, Json<MixActionRecord>)> {
    if request.user_id <= 0 || request.kind.is_none() {
        return Err(ApiError::BadRequest("Missing userId or type".to_string()));
    }
    let kind = request.kind.unwrap_or(ActionType::Like);

    if kind == ActionType::Order && request.table_number.is_none() {
        return Err(ApiError::BadRequest(
            "tableNumber is required for ORDER".to_string(),
        ));
    }

    let recorded = db::actions::record_action(
        &state.db,
        id,
        request.user_id,
        kind,
        request.table_number,
        request.comment.as_deref(),
    )
    .await?;

    if !recorded.inserted {
        debug!(
            "Duplicate {} from user {} on mix {} absorbed",
            kind.as_str(),
            request.user_id,
            id
        );
    }

    if kind == ActionType::Order {
        info!(
            "New order: mix \"{}\" for table {}",
            recorded.mix_name,
            request.table_number.unwrap_or_default()
        );

        if state.settings.order_notifications_enabled {
            if let Some(notifier) = state.notifier.clone() {
                let mix_name = recorded.mix_name.clone();
                let table_number = request.table_number.unwrap_or_default();
                let comment = request.comment.clone();
                tokio::spawn(async move {
                    notifier
                        .notify_order(&mix_name, table_number, comment.as_deref())
                        .await;
                });
            }
        }
    }

    Ok((StatusCode::CREATED, Json(recorded.action)))
}

/// Gatekeeper for mix creation
fn validate_create(request: CreateMixRequest, default_strength: Strength) -> ApiResult<NewMix> {
    let name = request.name.trim().to_string();
    if name.is_empty() || request.author_id <= 0 || request.ingredients.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    if request.ingredients.len() > MAX_INGREDIENTS {
        return Err(ApiError::BadRequest(format!(
            "a mix holds at most {} ingredients",
            MAX_INGREDIENTS
        )));
    }

    let mut seen = Vec::with_capacity(request.ingredients.len());
    for ingredient in &request.ingredients {
        if seen.contains(&ingredient.flavor_id) {
            return Err(ApiError::BadRequest(format!(
                "duplicate flavor in ingredients: {}",
                ingredient.flavor_id
            )));
        }
        seen.push(ingredient.flavor_id);

        if !(1..=100).contains(&ingredient.percentage) {
            return Err(ApiError::BadRequest(
                "ingredient percentage must be between 1 and 100".to_string(),
            ));
        }
    }

    let total: i64 = request.ingredients.iter().map(|i| i.percentage).sum();
    if total != 100 {
        return Err(ApiError::BadRequest(
            "Ingredients percentage must sum to 100".to_string(),
        ));
    }

    Ok(NewMix {
        name,
        description: request.description,
        author_id: request.author_id,
        strength: request.strength.unwrap_or(default_strength),
        ingredients: request
            .ingredients
            .iter()
            .map(|i| (i.flavor_id, i.percentage))
            .collect(),
    })
}

/// Build mix routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/mixes", get(list_mixes).post(create_mix))
        .route("/api/mixes/:id", get(get_mix))
        .route("/api/mixes/:id/action", post(record_action))
}
