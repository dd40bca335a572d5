//! Applies the embedded schema migrations.

use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

/// Outcome of [`run_pending_migrations`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct MigrationReport {
    /// Versions applied by this run, oldest first.
    pub applied: Vec<String>,
    /// Wall time spent applying them.
    pub duration: Duration,
}

impl MigrationReport {
    /// Returns `true` if the schema was already current.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Applies every migration that has not run yet.
///
/// The diesel migration harness is synchronous, so it runs on the blocking
/// pool over a wrapped async connection.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationReport> {
    let start = Instant::now();
    let conn: PooledConnection = pg.get_connection().await?.into_inner();
    let mut conn: AsyncConnectionWrapper<PooledConnection> = conn.into();

    let applied = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|version| version.to_string())
                .collect::<Vec<_>>()
        })
    })
    .await
    .map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "migration task panicked"
        );
        PgError::Migration(err.into())
    })?
    .map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "failed to apply migrations"
        );
        PgError::Migration(err)
    })?;

    let report = MigrationReport {
        applied,
        duration: start.elapsed(),
    };

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        applied = ?report.applied,
        duration = ?report.duration,
        "database schema is up to date"
    );

    Ok(report)
}
