//! shisha-api library - HTTP server for the hookah lounge mini-app
//!
//! Exposes the catalog (brands, flavors, tags), the mix engine boundary
//! (create mix, record like/dislike/order actions) and user activity views.

use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use shisha_common::db::get_setting;
use shisha_common::models::Strength;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod notify;

/// Settings read once from the database at startup
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// Whether the client should show the onboarding flow
    pub onboarding_enabled: bool,
    /// Whether ORDER actions push a Telegram notification
    pub order_notifications_enabled: bool,
    /// Strength assigned to mixes submitted without one
    pub default_strength: Strength,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            onboarding_enabled: true,
            order_notifications_enabled: true,
            default_strength: Strength::Medium,
        }
    }
}

impl RuntimeSettings {
    /// Load from the settings table; missing or unparsable values fall back
    /// to the compiled defaults
    pub async fn load(pool: &SqlitePool) -> shisha_common::Result<Self> {
        let defaults = Self::default();

        let onboarding_enabled = get_setting(pool, "onboarding_enabled")
            .await?
            .map(|v| v == "true")
            .unwrap_or(defaults.onboarding_enabled);

        let order_notifications_enabled = get_setting(pool, "order_notifications_enabled")
            .await?
            .map(|v| v == "true")
            .unwrap_or(defaults.order_notifications_enabled);

        let default_strength = get_setting(pool, "default_mix_strength")
            .await?
            .and_then(|v| Strength::from_str(&v).ok())
            .unwrap_or(defaults.default_strength);

        Ok(Self {
            onboarding_enabled,
            order_notifications_enabled,
            default_strength,
        })
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Startup settings snapshot
    pub settings: RuntimeSettings,
    /// Optional Telegram order notifier (None when no bot is configured)
    pub notifier: Option<Arc<notify::OrderNotifier>>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        settings: RuntimeSettings,
        notifier: Option<Arc<notify::OrderNotifier>>,
    ) -> Self {
        Self {
            db,
            settings,
            notifier,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health::routes())
        .merge(api::brands::routes())
        .merge(api::flavors::routes())
        .merge(api::tags::routes())
        .merge(api::mixes::routes())
        .merge(api::users::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
