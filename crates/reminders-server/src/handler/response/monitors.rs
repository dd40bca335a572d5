//! Monitor response types.

use reminders_postgres::PgPoolStatus;
use serde::{Deserialize, Serialize};

/// Response for `GET /`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
}

impl Default for Greeting {
    fn default() -> Self {
        Self {
            message: "Hello World".to_owned(),
        }
    }
}

/// Reachability of the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Up,
    Down,
}

/// Response for `GET /health`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: DatabaseStatus,
    /// Configured upper bound of the connection pool.
    pub max_connections: usize,
    /// Connections currently open, idle or checked out.
    pub open_connections: usize,
    pub idle: usize,
    /// Callers queued for a connection.
    pub waiting: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    /// Reports a reachable database along with pool statistics.
    pub fn up(pool: PgPoolStatus) -> Self {
        let message = if pool.waiting > 0 {
            "The database has callers waiting for connections, indicating potential bottlenecks."
        } else if pool.is_under_pressure() {
            "The database is experiencing heavy load."
        } else {
            "It's healthy"
        };

        Self::with_pool(DatabaseStatus::Up, pool, message)
    }

    /// Reports an unreachable database.
    pub fn down(pool: PgPoolStatus) -> Self {
        Self::with_pool(DatabaseStatus::Down, pool, "The database is unreachable.")
    }

    fn with_pool(status: DatabaseStatus, pool: PgPoolStatus, message: &str) -> Self {
        Self {
            status,
            max_connections: pool.max_size,
            open_connections: pool.size,
            idle: pool.available,
            waiting: pool.waiting,
            message: Some(message.to_owned()),
        }
    }

    /// Returns `true` if the database answered.
    #[inline]
    pub fn is_up(&self) -> bool {
        self.status == DatabaseStatus::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(size: usize, available: usize, waiting: usize) -> PgPoolStatus {
        PgPoolStatus {
            max_size: 10,
            size,
            available,
            waiting,
        }
    }

    #[test]
    fn healthy_pool() {
        let status = HealthStatus::up(pool(2, 2, 0));
        assert!(status.is_up());
        assert_eq!(status.message.as_deref(), Some("It's healthy"));
        assert_eq!(status.idle, 2);
    }

    #[test]
    fn busy_pool_reports_load() {
        let status = HealthStatus::up(pool(10, 1, 0));
        assert_eq!(
            status.message.as_deref(),
            Some("The database is experiencing heavy load.")
        );
    }

    #[test]
    fn down_serializes_lowercase() -> anyhow::Result<()> {
        let json = serde_json::to_value(HealthStatus::down(pool(0, 0, 0)))?;
        assert_eq!(json["status"], "down");
        assert_eq!(json["max_connections"], 10);
        Ok(())
    }
}
