//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently (CREATE TABLE IF NOT EXISTS). The partial unique index on
//! mix_actions is the storage-level guard against duplicate LIKE/DISLIKE
//! rows; application code relies on it rather than check-then-insert.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer, which matters
    // during like/order bursts on a popular mix
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema (idempotent - safe to call multiple times)
    create_users_table(&pool).await?;
    create_brands_table(&pool).await?;
    create_flavors_table(&pool).await?;
    create_mixes_table(&pool).await?;
    create_mix_ingredients_table(&pool).await?;
    create_mix_actions_table(&pool).await?;
    create_settings_table(&pool).await?;

    init_default_settings(&pool).await?;

    Ok(pool)
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    // id is the Telegram numeric user id supplied by the client
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            role TEXT NOT NULL DEFAULT 'GUEST' CHECK (role IN ('GUEST', 'STAFF', 'ADMIN')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_brands_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS brands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_brands_slug ON brands(slug)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_flavors_table(pool: &SqlitePool) -> Result<()> {
    // flavor_profile is a JSON array of tag names (e.g. ["MINT","ICE"])
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS flavors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            brand_id INTEGER NOT NULL REFERENCES brands(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT,
            flavor_profile TEXT NOT NULL DEFAULT '[]',
            strength TEXT NOT NULL DEFAULT 'MEDIUM' CHECK (strength IN ('LIGHT', 'MEDIUM', 'STRONG')),
            is_available INTEGER NOT NULL DEFAULT 1,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (brand_id, slug)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_flavors_brand ON flavors(brand_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_mixes_table(pool: &SqlitePool) -> Result<()> {
    // Counters only move via SQL-level increments; rating tracks
    // likes_count - dislikes_count in the same statement
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mixes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            author_id INTEGER NOT NULL REFERENCES users(id),
            strength TEXT NOT NULL DEFAULT 'MEDIUM' CHECK (strength IN ('LIGHT', 'MEDIUM', 'STRONG')),
            likes_count INTEGER NOT NULL DEFAULT 0,
            dislikes_count INTEGER NOT NULL DEFAULT 0,
            orders_count INTEGER NOT NULL DEFAULT 0,
            rating INTEGER NOT NULL DEFAULT 0,
            is_published INTEGER NOT NULL DEFAULT 1,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (likes_count >= 0),
            CHECK (dislikes_count >= 0),
            CHECK (orders_count >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_mixes_author ON mixes(author_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_mixes_created ON mixes(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_mix_ingredients_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mix_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mix_id INTEGER NOT NULL REFERENCES mixes(id) ON DELETE CASCADE,
            flavor_id INTEGER NOT NULL REFERENCES flavors(id),
            percentage INTEGER NOT NULL CHECK (percentage >= 1 AND percentage <= 100),
            UNIQUE (mix_id, flavor_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_mix_ingredients_mix ON mix_ingredients(mix_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_mix_actions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mix_actions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            mix_id INTEGER NOT NULL REFERENCES mixes(id) ON DELETE CASCADE,
            type TEXT NOT NULL CHECK (type IN ('LIKE', 'DISLIKE', 'ORDER')),
            table_number INTEGER,
            comment TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one LIKE and one DISLIKE per (user, mix); ORDER rows are an
    // unconstrained append log. Enforced here, not in application code, so
    // simultaneous double-submission cannot slip through a check-then-act
    // race window.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_mix_actions_unique_vote
        ON mix_actions(user_id, mix_id, type)
        WHERE type IN ('LIKE', 'DISLIKE')
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_mix_actions_user ON mix_actions(user_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_mix_actions_mix ON mix_actions(mix_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// Ensures all required settings exist; NULL values are reset to defaults.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // Client onboarding flag, read once at startup instead of living in
    // ambient browser storage
    ensure_setting(pool, "onboarding_enabled", "true").await?;

    ensure_setting(pool, "order_notifications_enabled", "true").await?;
    ensure_setting(pool, "default_mix_strength", "MEDIUM").await?;

    info!("Default settings initialized");
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if !exists {
        // INSERT OR IGNORE handles concurrent initialization races: multiple
        // connections may pass the exists check simultaneously
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(default_value)
            .execute(pool)
            .await?;

        info!("Initialized setting '{}' with default value: {}", key, default_value);
        return Ok(());
    }

    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if value.is_none() {
        sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
            .bind(default_value)
            .bind(key)
            .execute(pool)
            .await?;

        warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
    }

    Ok(())
}

/// Read a setting value, if present
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(value.flatten())
}
