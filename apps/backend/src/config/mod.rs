//! Runtime configuration. Database settings are shared with the migration CLI.

pub use db_infra::config::db;
