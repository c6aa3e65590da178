//! Mix persistence: listing, detail, atomic creation
//!
//! Creation is all-or-nothing: the mix row and its ingredient rows go
//! through one transaction, so a partial mix-without-ingredients is never
//! observable.

use serde::Deserialize;
use shisha_common::models::{
    parse_flavor_profile, BrandSummary, Flavor, FlavorWithBrand, MixDetail, ResolvedIngredient,
    Strength, UserSummary,
};
use shisha_common::{slug, Error, Result};
use sqlx::SqlitePool;

use super::strength_from_db;

/// Sort orders for the mix listing
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MixSort {
    /// Most ordered first
    #[default]
    Popular,
    /// Newest first
    New,
    /// Highest rating first
    Rating,
}

/// Validated payload for mix creation
#[derive(Debug)]
pub struct NewMix {
    pub name: String,
    pub description: Option<String>,
    pub author_id: i64,
    pub strength: Strength,
    /// (flavor_id, percentage) pairs, already validated to sum to 100
    pub ingredients: Vec<(i64, i64)>,
}

type MixRow = (
    i64,            // m.id
    String,         // m.slug
    String,         // m.name
    Option<String>, // m.description
    i64,            // m.author_id
    String,         // m.strength
    i64,            // m.likes_count
    i64,            // m.dislikes_count
    i64,            // m.orders_count
    i64,            // m.rating
    String,         // m.created_at
    Option<String>, // u.username
    Option<String>, // u.first_name
);

const MIX_SELECT: &str = r#"
    SELECT m.id, m.slug, m.name, m.description, m.author_id, m.strength,
           m.likes_count, m.dislikes_count, m.orders_count, m.rating, m.created_at,
           u.username, u.first_name
    FROM mixes m
    JOIN users u ON u.id = m.author_id
"#;

async fn resolve_ingredients(pool: &SqlitePool, mix_id: i64) -> Result<Vec<ResolvedIngredient>> {
    let rows = sqlx::query_as::<
        _,
        (
            i64,            // mi.percentage
            i64,            // f.id
            String,         // f.name
            String,         // f.slug
            Option<String>, // f.description
            String,         // f.flavor_profile
            String,         // f.strength
            bool,           // f.is_available
            i64,            // b.id
            String,         // b.name
            String,         // b.slug
        ),
    >(
        r#"
        SELECT mi.percentage, f.id, f.name, f.slug, f.description, f.flavor_profile,
               f.strength, f.is_available, b.id, b.name, b.slug
        FROM mix_ingredients mi
        JOIN flavors f ON f.id = mi.flavor_id
        JOIN brands b ON b.id = f.brand_id
        WHERE mi.mix_id = ?
        ORDER BY mi.id ASC
        "#,
    )
    .bind(mix_id)
    .fetch_all(pool)
    .await?;

    let mut ingredients = Vec::with_capacity(rows.len());
    for (percentage, id, name, slug, description, profile, strength, is_available, b_id, b_name, b_slug) in
        rows
    {
        ingredients.push(ResolvedIngredient {
            percentage,
            flavor: FlavorWithBrand {
                flavor: Flavor {
                    id,
                    name,
                    slug,
                    description,
                    flavor_profile: parse_flavor_profile(&profile)?,
                    strength: strength_from_db(&strength)?,
                    is_available,
                },
                brand: BrandSummary {
                    id: b_id,
                    name: b_name,
                    slug: b_slug,
                },
            },
        });
    }
    Ok(ingredients)
}

async fn mix_from_row(pool: &SqlitePool, row: MixRow) -> Result<MixDetail> {
    let (
        id,
        slug,
        name,
        description,
        author_id,
        strength,
        likes_count,
        dislikes_count,
        orders_count,
        rating,
        created_at,
        username,
        first_name,
    ) = row;

    Ok(MixDetail {
        id,
        slug,
        name,
        description,
        author: UserSummary {
            id: author_id,
            username,
            first_name,
        },
        strength: strength_from_db(&strength)?,
        likes_count,
        dislikes_count,
        orders_count,
        rating,
        created_at,
        ingredients: resolve_ingredients(pool, id).await?,
    })
}

/// Published, non-deleted mixes with ingredients and author summary
pub async fn list_mixes(
    pool: &SqlitePool,
    sort: MixSort,
    strength: Option<Strength>,
    author_id: Option<i64>,
) -> Result<Vec<MixDetail>> {
    let mut sql = format!("{} WHERE m.is_published = 1 AND m.is_deleted = 0", MIX_SELECT);

    if strength.is_some() {
        sql.push_str(" AND m.strength = ?");
    }
    if author_id.is_some() {
        sql.push_str(" AND m.author_id = ?");
    }
    sql.push_str(match sort {
        MixSort::Popular => " ORDER BY m.orders_count DESC, m.id DESC",
        MixSort::New => " ORDER BY m.created_at DESC, m.id DESC",
        MixSort::Rating => " ORDER BY m.rating DESC, m.id DESC",
    });

    let mut query = sqlx::query_as::<_, MixRow>(&sql);
    if let Some(strength) = strength {
        query = query.bind(strength.as_str());
    }
    if let Some(author_id) = author_id {
        query = query.bind(author_id);
    }

    let rows = query.fetch_all(pool).await?;
    let mut mixes = Vec::with_capacity(rows.len());
    for row in rows {
        mixes.push(mix_from_row(pool, row).await?);
    }
    Ok(mixes)
}

/// Mix by id; soft-deleted mixes read as absent
pub async fn get_mix(pool: &SqlitePool, id: i64) -> Result<Option<MixDetail>> {
    fetch_mix(pool, id, false).await
}

/// Mix by id including soft-deleted rows (profile activity keeps showing
/// actions whose mix has since been taken down)
pub async fn get_mix_any(pool: &SqlitePool, id: i64) -> Result<Option<MixDetail>> {
    fetch_mix(pool, id, true).await
}

async fn fetch_mix(pool: &SqlitePool, id: i64, include_deleted: bool) -> Result<Option<MixDetail>> {
    let sql = if include_deleted {
        format!("{} WHERE m.id = ?", MIX_SELECT)
    } else {
        format!("{} WHERE m.id = ? AND m.is_deleted = 0", MIX_SELECT)
    };

    let row = sqlx::query_as::<_, MixRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Some(mix_from_row(pool, row).await?)),
        None => Ok(None),
    }
}

/// Persist a validated mix and its ingredients atomically, returning the
/// new mix id
pub async fn create_mix(pool: &SqlitePool, new: &NewMix) -> Result<i64> {
    let mut tx = pool.begin().await?;

    // The author may never have talked to the bot; create a bare user row
    // so the FK holds
    sqlx::query("INSERT OR IGNORE INTO users (id) VALUES (?)")
        .bind(new.author_id)
        .execute(&mut *tx)
        .await?;

    for (flavor_id, _) in &new.ingredients {
        let known: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM flavors WHERE id = ? AND is_deleted = 0 AND is_available = 1)",
        )
        .bind(flavor_id)
        .fetch_one(&mut *tx)
        .await?;

        if !known {
            return Err(Error::InvalidInput(format!(
                "unknown or unavailable flavor id: {}",
                flavor_id
            )));
        }
    }

    let mix_slug = slug::unique_slug(&new.name);
    let result = sqlx::query(
        r#"
        INSERT INTO mixes (slug, name, description, author_id, strength)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&mix_slug)
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.author_id)
    .bind(new.strength.as_str())
    .execute(&mut *tx)
    .await?;

    let mix_id = result.last_insert_rowid();

    for (flavor_id, percentage) in &new.ingredients {
        sqlx::query("INSERT INTO mix_ingredients (mix_id, flavor_id, percentage) VALUES (?, ?, ?)")
            .bind(mix_id)
            .bind(flavor_id)
            .bind(percentage)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(mix_id)
}
