use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand, Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr,
    Statement,
};
use tracing::{info, trace, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::db::{make_conn_spec, pool_size, DbKind, DbOwner, RuntimeEnv};
use crate::error::DbInfraError;

const PG_CONNECT_ATTEMPTS: u32 = 5;
const PG_CONNECT_INTERVAL_MS: u64 = 500;

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(
                        attempt,
                        max_attempts, interval_ms, "connection_retry=failed"
                    );
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DbInfraError::Connect {
        message: "no error recorded after max attempts".to_string(),
    }))
}

/// Open a pool for `owner` against the configured database.
///
/// Postgres connections are retried a few times so the service survives a
/// database that is still starting; SQLite connects once.
pub async fn connect(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = make_conn_spec(env, db_kind, owner)?;
    let size = pool_size(db_kind, owner);

    let mut opt = ConnectOptions::new(url.clone());
    opt.min_connections(size.min)
        .max_connections(size.max)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    info!(
        env = ?env,
        db_kind = ?db_kind,
        owner = ?owner,
        url = %sanitize_db_url(&url),
        max_connections = size.max,
        "connecting to database"
    );

    let connect_once = || {
        let opt = opt.clone();
        async move {
            Database::connect(opt)
                .await
                .map_err(|e| DbInfraError::Connect {
                    message: format!("failed to connect to {db_kind:?} ({owner:?}): {e}"),
                })
        }
    };

    match db_kind {
        DbKind::Postgres => {
            retry_connection(connect_once, PG_CONNECT_ATTEMPTS, PG_CONNECT_INTERVAL_MS).await
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => connect_once().await,
    }
}

/// Mask the password of a connection string for logs and lock keys.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth_part.rfind(':') {
        Some(colon) if auth_part[..colon].contains("://") => {
            format!("{}:***@{}", &auth_part[..colon], host_part)
        }
        _ => url.to_string(),
    }
}

/// True when every defined migration is already applied, in order.
async fn schema_is_current(conn: &DatabaseConnection) -> Result<bool, DbInfraError> {
    let expected_count = Migrator::migrations().len();
    let expected_last = Migrator::migrations()
        .last()
        .map(|m| m.name().to_string())
        .unwrap_or_default();

    let applied = match Migrator::get_applied_migrations(conn).await {
        Ok(migrations) => migrations,
        Err(DbErr::Exec(_)) => {
            trace!(fastpath = "miss", reason = "migration_table_missing");
            return Ok(false);
        }
        Err(e) => {
            return Err(DbInfraError::Migration {
                message: format!("failed to read applied migrations: {e}"),
            })
        }
    };

    let current_last = applied.last().map(|m| m.name().to_string());
    let current = applied.len() == expected_count
        && !expected_last.is_empty()
        && current_last.as_deref() == Some(expected_last.as_str());

    trace!(
        fastpath = if current { "hit" } else { "miss" },
        applied = applied.len(),
        expected = expected_count,
        current_last = %current_last.as_deref().unwrap_or("None"),
        expected_last = %expected_last
    );
    Ok(current)
}

async fn pg_advisory(
    conn: &DatabaseConnection,
    sql: &str,
    key: i64,
) -> Result<(), DbInfraError> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        sql,
        vec![key.into()],
    ))
    .await
    .map(|_| ())
    .map_err(|e| DbInfraError::Migration {
        message: format!("advisory lock statement failed: {e}"),
    })
}

/// Run `command` on an already-open pool.
///
/// `Up` is skipped when the schema is current. On Postgres the run is fenced
/// by a session-level advisory lock so concurrently starting instances apply
/// migrations once; the owner pool has a single connection, so lock and
/// unlock share a session.
pub async fn migrate_pool(
    conn: &DatabaseConnection,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    if command == MigrationCommand::Up && schema_is_current(conn).await? {
        info!("migrate=skipped up_to_date=true");
        return Ok(());
    }

    let lock_key = match db_kind {
        DbKind::Postgres => {
            let key = xxh3_64(b"simulation:migrate") as i64;
            pg_advisory(conn, "SELECT pg_advisory_lock($1)", key).await?;
            Some(key)
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => None,
    };

    let result = migrate(conn, command)
        .await
        .map_err(|e| DbInfraError::Migration {
            message: format!("migration {command:?} failed: {e}"),
        });

    if let Some(key) = lock_key {
        if let Err(e) = pg_advisory(conn, "SELECT pg_advisory_unlock($1)", key).await {
            warn!(error = %e, "failed to release migration advisory lock");
        }
    }

    result
}

/// Connect with owner credentials and run a migration command (used by the CLI
/// and by backend bootstrap for persistent databases).
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    info!(env = ?env, db_kind = ?db_kind, cmd = ?command, "migrate=start");
    let owner_pool = connect(env, db_kind, DbOwner::Owner).await?;
    let result = migrate_pool(&owner_pool, db_kind, command).await;
    owner_pool.close().await.ok();
    info!(ok = result.is_ok(), "migrate=done");
    result
}
