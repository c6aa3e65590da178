//! Database access layer: schema initialization and seed data

mod init;
mod seed;

pub use init::{ensure_setting, get_setting, init_database};
pub use seed::seed_catalog;
