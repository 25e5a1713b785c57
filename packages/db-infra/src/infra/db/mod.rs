pub mod core;

pub use core::{connect, migrate_pool, orchestrate_migration, sanitize_db_url};
