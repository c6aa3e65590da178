//! Flavor profile tag list for client-side filters

use axum::{routing::get, Json, Router};
use serde::Serialize;
use shisha_common::models::FlavorTag;

use crate::AppState;

/// One selectable filter tag
#[derive(Debug, Serialize)]
pub struct TagEntry {
    pub value: FlavorTag,
    pub label: &'static str,
}

/// GET /api/tags
pub async fn list_tags() -> Json<Vec<TagEntry>> {
    Json(
        FlavorTag::ALL
            .iter()
            .map(|tag| TagEntry {
                value: *tag,
                label: tag.label(),
            })
            .collect(),
    )
}

/// Build tag routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/tags", get(list_tags))
}
