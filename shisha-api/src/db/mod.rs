//! Query layer over the shared schema

pub mod actions;
pub mod catalog;
pub mod mixes;
pub mod users;

use shisha_common::models::Strength;
use shisha_common::Error;
use std::str::FromStr;

/// Decode a strength column; a value outside the CHECK constraint means the
/// row was tampered with, so it surfaces as an internal error
pub(crate) fn strength_from_db(raw: &str) -> shisha_common::Result<Strength> {
    Strength::from_str(raw).map_err(|_| Error::Internal(format!("corrupt strength column: {}", raw)))
}
