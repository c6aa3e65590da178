//! HTTP API handlers

pub mod brands;
pub mod flavors;
pub mod health;
pub mod mixes;
pub mod tags;
pub mod users;
