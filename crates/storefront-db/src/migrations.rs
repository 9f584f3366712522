//! # Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary, so a
//! fresh machine gets its `local_storage` table on first start.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_local_storage.sql   local_storage(key PK, value, updated_at)
//! ```
//!
//! New schema goes in a new numbered file; applied files are checksummed
//! by sqlx and must not change.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever has not run yet on this database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, applied) = migration_status(pool).await?;
    if applied >= total {
        debug!(total, "Session schema up to date");
        return Ok(());
    }

    info!(pending = total - applied, "Migrating session database");
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// `(embedded, applied)` migration counts. A brand-new file has applied 0.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.iter().count();

    // the bookkeeping table only exists after the first run
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}
