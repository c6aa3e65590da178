//! # Shisha Common Library
//!
//! Shared code for the hookah lounge mini-app backend:
//! - Mix composition engine (ingredient set + percentage normalizer)
//! - Database schema, models and seed data
//! - Configuration loading
//! - Common error types

pub mod composer;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod slug;

pub use error::{Error, Result};
