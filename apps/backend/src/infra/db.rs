use db_infra::config::db::{DbKind, DbOwner, RuntimeEnv};
use db_infra::{connect, migrate_pool, orchestrate_migration};
use migration::MigrationCommand;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppError;

/// Migrate the schema to the latest version and return an application pool.
///
/// Persistent databases are migrated through a separate owner connection.
/// An in-memory SQLite database lives only as long as its single pooled
/// connection, so it is migrated on the very pool that is returned.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = match db_kind {
        DbKind::SqliteMemory => {
            let conn = connect(env, db_kind, DbOwner::App).await?;
            migrate_pool(&conn, db_kind, MigrationCommand::Up).await?;
            conn
        }
        DbKind::Postgres | DbKind::SqliteFile => {
            orchestrate_migration(env, db_kind, MigrationCommand::Up).await?;
            connect(env, db_kind, DbOwner::App).await?
        }
    };

    info!(env = ?env, db_kind = ?db_kind, "database ready");
    Ok(conn)
}
