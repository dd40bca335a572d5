//! Liveness and database health endpoints.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use reminders_postgres::PgClient;

use crate::extract::Json;
use crate::handler::response::{Greeting, HealthStatus};
use crate::service::ServiceState;

/// Tracing target for monitor endpoints.
const TRACING_TARGET: &str = "reminders_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn greeting() -> Json<Greeting> {
    Json(Greeting::default())
}

/// Pings the database and reports pool statistics.
///
/// Answers `503` with `status: "down"` when the ping fails.
#[tracing::instrument(skip_all)]
async fn health_status(State(pg_client): State<PgClient>) -> (StatusCode, Json<HealthStatus>) {
    match pg_client.ping().await {
        Ok(()) => {
            let status = HealthStatus::up(pg_client.pool_status());
            tracing::trace!(
                target: TRACING_TARGET,
                open_connections = status.open_connections,
                waiting = status.waiting,
                "database is healthy"
            );

            (StatusCode::OK, Json(status))
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "database health check failed"
            );

            let status = HealthStatus::down(pg_client.pool_status());
            (StatusCode::SERVICE_UNAVAILABLE, Json(status))
        }
    }
}

/// Returns a [`Router`] with the unauthenticated monitor routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/", get(greeting))
        .route("/health", get(health_status))
}
