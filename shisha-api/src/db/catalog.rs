//! Brand and flavor catalog queries
//!
//! The catalog is read-only from the engine's perspective: brands and
//! flavors are seeded or administered externally.

use shisha_common::models::{
    parse_flavor_profile, BrandDetail, BrandInfo, BrandSummary, Flavor, FlavorTag, FlavorWithBrand,
};
use shisha_common::Result;
use sqlx::SqlitePool;

use super::strength_from_db;

/// Optional filters for flavor listing
#[derive(Debug, Default)]
pub struct FlavorFilter {
    pub brand_id: Option<i64>,
    pub tag: Option<FlavorTag>,
    pub search: Option<String>,
}

type FlavorRow = (
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
);

fn flavor_with_brand(row: FlavorRow) -> Result<FlavorWithBrand> {
    let (id, name, slug, description, profile, strength, is_available, b_id, b_name, b_slug) = row;

    Ok(FlavorWithBrand {
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
    })
}

/// Active brands sorted by name, each with its available-flavor count
pub async fn list_brands(pool: &SqlitePool) -> Result<Vec<BrandInfo>> {
    let rows = sqlx::query_as::<_, (i64, String, String, Option<String>, bool, i64)>(
        r#"
        SELECT b.id, b.name, b.slug, b.description, b.is_active,
               (SELECT COUNT(*) FROM flavors f
                WHERE f.brand_id = b.id AND f.is_deleted = 0 AND f.is_available = 1)
        FROM brands b
        WHERE b.is_active = 1
        ORDER BY b.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, name, slug, description, is_active, flavor_count)| BrandInfo {
                id,
                name,
                slug,
                description,
                is_active,
                flavor_count,
            },
        )
        .collect())
}

/// Brand by slug with its available flavors, sorted by name
pub async fn get_brand_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<BrandDetail>> {
    let brand = sqlx::query_as::<_, (i64, String, String, Option<String>, bool)>(
        "SELECT id, name, slug, description, is_active FROM brands WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    let Some((id, name, slug, description, is_active)) = brand else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, (i64, String, String, Option<String>, String, String, bool)>(
        r#"
        SELECT id, name, slug, description, flavor_profile, strength, is_available
        FROM flavors
        WHERE brand_id = ? AND is_deleted = 0 AND is_available = 1
        ORDER BY name ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut flavors = Vec::with_capacity(rows.len());
    for (f_id, f_name, f_slug, f_description, profile, strength, is_available) in rows {
        flavors.push(Flavor {
            id: f_id,
            name: f_name,
            slug: f_slug,
            description: f_description,
            flavor_profile: parse_flavor_profile(&profile)?,
            strength: strength_from_db(&strength)?,
            is_available,
        });
    }

    Ok(Some(BrandDetail {
        id,
        name,
        slug,
        description,
        is_active,
        flavors,
    }))
}

/// Available flavors with optional brand/tag/name filters, sorted by name
pub async fn list_flavors(pool: &SqlitePool, filter: &FlavorFilter) -> Result<Vec<FlavorWithBrand>> {
    let mut sql = String::from(
        r#"
        SELECT f.id, f.name, f.slug, f.description, f.flavor_profile, f.strength, f.is_available,
               b.id, b.name, b.slug
        FROM flavors f
        JOIN brands b ON b.id = f.brand_id
        WHERE f.is_deleted = 0 AND f.is_available = 1
        "#,
    );

    if filter.brand_id.is_some() {
        sql.push_str(" AND f.brand_id = ?");
    }
    if filter.tag.is_some() {
        sql.push_str(" AND f.flavor_profile LIKE ?");
    }
    if filter.search.is_some() {
        sql.push_str(" AND f.name LIKE ?");
    }
    sql.push_str(" ORDER BY f.name ASC");

    let mut query = sqlx::query_as::<_, FlavorRow>(&sql);
    if let Some(brand_id) = filter.brand_id {
        query = query.bind(brand_id);
    }
    if let Some(tag) = filter.tag {
        // profile column stores a JSON array, so the quoted tag name is an
        // exact-token match
        query = query.bind(format!("%\"{}\"%", tag.as_str()));
    }
    if let Some(search) = &filter.search {
        query = query.bind(format!("%{}%", search));
    }

    let rows = query.fetch_all(pool).await?;
    rows.into_iter().map(flavor_with_brand).collect()
}

/// Flavor by id with brand detail; soft-deleted flavors read as absent
pub async fn get_flavor(pool: &SqlitePool, id: i64) -> Result<Option<FlavorWithBrand>> {
    let row = sqlx::query_as::<_, FlavorRow>(
        r#"
        SELECT f.id, f.name, f.slug, f.description, f.flavor_profile, f.strength, f.is_available,
               b.id, b.name, b.slug
        FROM flavors f
        JOIN brands b ON b.id = f.brand_id
        WHERE f.id = ? AND f.is_deleted = 0
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(flavor_with_brand).transpose()
}
