//! Idempotent catalog seed data
//!
//! Brands and flavors are administered externally in production; this seed
//! gives a fresh install a browsable menu. Every insert is INSERT OR IGNORE
//! keyed on slug, so re-running the seed never duplicates rows.

use crate::models::{FlavorTag, Strength};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

struct SeedFlavor {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    profile: &'static [FlavorTag],
    strength: Strength,
}

struct SeedBrand {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    flavors: &'static [SeedFlavor],
}

const CATALOG: &[SeedBrand] = &[
    SeedBrand {
        name: "Darkside",
        slug: "darkside",
        description: "Premium tobacco with rich, saturated flavors",
        flavors: &[
            SeedFlavor {
                name: "Grape Core",
                slug: "grape-core",
                description: "Saturated grape with a light tartness",
                profile: &[FlavorTag::Sweet, FlavorTag::Fruity],
                strength: Strength::Medium,
            },
            SeedFlavor {
                name: "Kalee Grapefruit",
                slug: "kalee-grapefruit",
                description: "Juicy grapefruit with a bitter edge",
                profile: &[FlavorTag::Citrus, FlavorTag::Sour, FlavorTag::Fresh],
                strength: Strength::Medium,
            },
            SeedFlavor {
                name: "Supernova",
                slug: "supernova",
                description: "An icy blast of freshness",
                profile: &[FlavorTag::Ice, FlavorTag::Fresh, FlavorTag::Mint],
                strength: Strength::Strong,
            },
            SeedFlavor {
                name: "Polar Cream",
                slug: "polar-cream",
                description: "Mint ice cream with heavy cream",
                profile: &[
                    FlavorTag::Mint,
                    FlavorTag::Ice,
                    FlavorTag::Creamy,
                    FlavorTag::Dessert,
                ],
                strength: Strength::Light,
            },
        ],
    },
    SeedBrand {
        name: "Musthave",
        slug: "musthave",
        description: "A popular brand with bright, ready-made blends",
        flavors: &[
            SeedFlavor {
                name: "Pinkman",
                slug: "pinkman",
                description: "Grapefruit, raspberry and lemon candy",
                profile: &[FlavorTag::Citrus, FlavorTag::Berry, FlavorTag::Sweet],
                strength: Strength::Medium,
            },
            SeedFlavor {
                name: "Cheesecake",
                slug: "cheesecake",
                description: "Classic dessert with a vanilla crust",
                profile: &[FlavorTag::Dessert, FlavorTag::Creamy, FlavorTag::Vanilla],
                strength: Strength::Light,
            },
            SeedFlavor {
                name: "Coconut Milk",
                slug: "coconut-milk",
                description: "Soft tropical coconut cream",
                profile: &[FlavorTag::Tropical, FlavorTag::Creamy, FlavorTag::Exotic],
                strength: Strength::Light,
            },
        ],
    },
    SeedBrand {
        name: "BlackBurn",
        slug: "blackburn",
        description: "Strong tobacco for seasoned smokers",
        flavors: &[
            SeedFlavor {
                name: "Almost Cola",
                slug: "almost-cola",
                description: "Cola with a spicy cinnamon note",
                profile: &[FlavorTag::Sweet, FlavorTag::Spicy],
                strength: Strength::Strong,
            },
            SeedFlavor {
                name: "Ice Baby",
                slug: "ice-baby",
                description: "Pure cold without sweetness",
                profile: &[FlavorTag::Ice, FlavorTag::Mint, FlavorTag::Fresh],
                strength: Strength::Strong,
            },
            SeedFlavor {
                name: "Overdose Tobacco",
                slug: "overdose-tobacco",
                description: "Undiluted burley leaf",
                profile: &[FlavorTag::Tobacco],
                strength: Strength::Strong,
            },
        ],
    },
];

/// Populate brands and flavors if they are not present yet
pub async fn seed_catalog(pool: &SqlitePool) -> Result<()> {
    let mut inserted = 0u32;

    for brand in CATALOG {
        sqlx::query("INSERT OR IGNORE INTO brands (name, slug, description) VALUES (?, ?, ?)")
            .bind(brand.name)
            .bind(brand.slug)
            .bind(brand.description)
            .execute(pool)
            .await?;

        let brand_id: i64 = sqlx::query_scalar("SELECT id FROM brands WHERE slug = ?")
            .bind(brand.slug)
            .fetch_one(pool)
            .await?;

        for flavor in brand.flavors {
            let profile = serde_json::to_string(flavor.profile)
                .map_err(|e| crate::Error::Internal(e.to_string()))?;

            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO flavors
                    (brand_id, name, slug, description, flavor_profile, strength)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(brand_id)
            .bind(flavor.name)
            .bind(flavor.slug)
            .bind(flavor.description)
            .bind(&profile)
            .bind(flavor.strength.as_str())
            .execute(pool)
            .await?;

            inserted += result.rows_affected() as u32;
        }
    }

    info!("Catalog seed complete ({} new flavors)", inserted);
    Ok(())
}
