//! Database connection bootstrap: connect with retry, apply per-engine
//! session settings, then bring the schema up to date.

use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind, DbOwner, DbProfile};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

fn engine_name(kind: DbKind) -> &'static str {
    match kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry a connection attempt with fixed interval delays.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, interval_ms, error = %e, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn connect_options(kind: DbKind, url: String) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    match kind {
        // Every pooled connection to `sqlite::memory:` is its own database.
        DbKind::SqliteMemory => {
            opts.max_connections(1).min_connections(1);
        }
        DbKind::SqliteFile => {
            opts.max_connections(4);
        }
        DbKind::Postgres => {
            opts.max_connections(16)
                .connect_timeout(Duration::from_secs(5))
                .acquire_timeout(Duration::from_secs(5));
        }
    }
    opts
}

async fn apply_session_settings(conn: &DatabaseConnection, kind: DbKind) -> Result<(), AppError> {
    let statements: &[&str] = match kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            &["PRAGMA foreign_keys = ON;", "PRAGMA busy_timeout = 5000;"]
        }
        // Timestamps are written as timestamptz; no session settings needed.
        DbKind::Postgres => &[],
    };
    for stmt in statements {
        conn.execute_unprepared(stmt).await?;
    }
    Ok(())
}

/// Open a connection without touching the schema.
pub async fn connect_db(
    kind: DbKind,
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind, profile, owner)?;
    let conn = retry_connection(
        || {
            let opts = connect_options(kind, url.clone());
            async move { Database::connect(opts).await.map_err(AppError::from) }
        },
        CONNECT_ATTEMPTS,
        CONNECT_INTERVAL_MS,
    )
    .await?;
    apply_session_settings(&conn, kind).await?;
    info!(engine = engine_name(kind), profile = ?profile, "database connected");
    Ok(conn)
}

/// Connect and run pending migrations. The single entry point used by the
/// service and the integration tests.
pub async fn bootstrap_db(
    kind: DbKind,
    profile: DbProfile,
) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind, profile, DbOwner::App).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;
    Ok(conn)
}
