//! Domain model and API types shared between crates
//!
//! JSON field names use camelCase to match the wire contract consumed by the
//! mini-app client ({authorId, flavorId, tableNumber, ...}).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Coarse intensity classification for a flavor or mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strength {
    Light,
    Medium,
    Strong,
}

impl Strength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Light => "LIGHT",
            Strength::Medium => "MEDIUM",
            Strength::Strong => "STRONG",
        }
    }
}

impl FromStr for Strength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LIGHT" => Ok(Strength::Light),
            "MEDIUM" => Ok(Strength::Medium),
            "STRONG" => Ok(Strength::Strong),
            other => Err(Error::InvalidInput(format!("unknown strength: {}", other))),
        }
    }
}

/// Kind of a mix action event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Like,
    Dislike,
    Order,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Like => "LIKE",
            ActionType::Dislike => "DISLIKE",
            ActionType::Order => "ORDER",
        }
    }
}

impl FromStr for ActionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LIKE" => Ok(ActionType::Like),
            "DISLIKE" => Ok(ActionType::Dislike),
            "ORDER" => Ok(ActionType::Order),
            other => Err(Error::InvalidInput(format!("unknown action type: {}", other))),
        }
    }
}

/// Flavor profile tag attached to a flavor for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlavorTag {
    Sweet,
    Sour,
    Fresh,
    Spicy,
    Fruity,
    Berry,
    Citrus,
    Mint,
    Ice,
    Creamy,
    Nutty,
    Floral,
    Herbal,
    Exotic,
    Dessert,
    Tobacco,
    Coffee,
    Chocolate,
    Vanilla,
    Tropical,
}

impl FlavorTag {
    /// Every tag, in menu display order
    pub const ALL: [FlavorTag; 20] = [
        FlavorTag::Sweet,
        FlavorTag::Sour,
        FlavorTag::Fresh,
        FlavorTag::Spicy,
        FlavorTag::Fruity,
        FlavorTag::Berry,
        FlavorTag::Citrus,
        FlavorTag::Mint,
        FlavorTag::Ice,
        FlavorTag::Creamy,
        FlavorTag::Nutty,
        FlavorTag::Floral,
        FlavorTag::Herbal,
        FlavorTag::Exotic,
        FlavorTag::Dessert,
        FlavorTag::Tobacco,
        FlavorTag::Coffee,
        FlavorTag::Chocolate,
        FlavorTag::Vanilla,
        FlavorTag::Tropical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlavorTag::Sweet => "SWEET",
            FlavorTag::Sour => "SOUR",
            FlavorTag::Fresh => "FRESH",
            FlavorTag::Spicy => "SPICY",
            FlavorTag::Fruity => "FRUITY",
            FlavorTag::Berry => "BERRY",
            FlavorTag::Citrus => "CITRUS",
            FlavorTag::Mint => "MINT",
            FlavorTag::Ice => "ICE",
            FlavorTag::Creamy => "CREAMY",
            FlavorTag::Nutty => "NUTTY",
            FlavorTag::Floral => "FLORAL",
            FlavorTag::Herbal => "HERBAL",
            FlavorTag::Exotic => "EXOTIC",
            FlavorTag::Dessert => "DESSERT",
            FlavorTag::Tobacco => "TOBACCO",
            FlavorTag::Coffee => "COFFEE",
            FlavorTag::Chocolate => "CHOCOLATE",
            FlavorTag::Vanilla => "VANILLA",
            FlavorTag::Tropical => "TROPICAL",
        }
    }

    /// Human-readable label for menu filters
    pub fn label(&self) -> &'static str {
        match self {
            FlavorTag::Sweet => "Sweet",
            FlavorTag::Sour => "Sour",
            FlavorTag::Fresh => "Fresh",
            FlavorTag::Spicy => "Spicy",
            FlavorTag::Fruity => "Fruity",
            FlavorTag::Berry => "Berry",
            FlavorTag::Citrus => "Citrus",
            FlavorTag::Mint => "Mint",
            FlavorTag::Ice => "Ice",
            FlavorTag::Creamy => "Creamy",
            FlavorTag::Nutty => "Nutty",
            FlavorTag::Floral => "Floral",
            FlavorTag::Herbal => "Herbal",
            FlavorTag::Exotic => "Exotic",
            FlavorTag::Dessert => "Dessert",
            FlavorTag::Tobacco => "Tobacco",
            FlavorTag::Coffee => "Coffee",
            FlavorTag::Chocolate => "Chocolate",
            FlavorTag::Vanilla => "Vanilla",
            FlavorTag::Tropical => "Tropical",
        }
    }
}

impl FromStr for FlavorTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FlavorTag::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| Error::InvalidInput(format!("unknown flavor tag: {}", s)))
    }
}

/// Parse a flavor_profile column (JSON array of tag names) into tags
pub fn parse_flavor_profile(raw: &str) -> Result<Vec<FlavorTag>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Internal(format!("corrupt flavor_profile '{}': {}", raw, e)))
}

/// Short brand reference nested inside flavor responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Brand listing entry with the number of available flavors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInfo {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub flavor_count: i64,
}

/// A purchasable tobacco product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flavor {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub flavor_profile: Vec<FlavorTag>,
    pub strength: Strength,
    pub is_available: bool,
}

/// Flavor with its owning brand resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorWithBrand {
    #[serde(flatten)]
    pub flavor: Flavor,
    pub brand: BrandSummary,
}

/// Brand detail with its available flavors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandDetail {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub flavors: Vec<Flavor>,
}

/// Author reference nested inside mix responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// Full user row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub created_at: String,
}

/// One (flavor, percentage) pair within a persisted mix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIngredient {
    pub percentage: i64,
    pub flavor: FlavorWithBrand,
}

/// A user-authored mix with resolved ingredients and counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixDetail {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub author: UserSummary,
    pub strength: Strength,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub orders_count: i64,
    pub rating: i64,
    pub created_at: String,
    pub ingredients: Vec<ResolvedIngredient>,
}

/// A stored LIKE/DISLIKE/ORDER event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixActionRecord {
    pub id: i64,
    pub user_id: i64,
    pub mix_id: i64,
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub table_number: Option<i64>,
    pub comment: Option<String>,
    pub created_at: String,
}

/// Action with the acted-on mix resolved, for profile activity views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionDetail {
    #[serde(flatten)]
    pub action: MixActionRecord,
    pub mix: Option<MixDetail>,
}
