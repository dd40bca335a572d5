//! Reminder endpoints.
//!
//! Every route here sits behind the session gate. The owner of a reminder
//! is always the caller's [`Identity`], and a reminder owned by someone
//! else is reported as missing.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use reminders_postgres::PgClient;
use reminders_postgres::query::ReminderRepository;

use crate::extract::{Identity, Json, Path, ValidateJson};
use crate::handler::request::{CreateReminder, ReminderPathParams};
use crate::handler::response::{ReminderResponse, RemindersResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for reminder operations.
const TRACING_TARGET: &str = "reminders_server::handler::reminders";

#[tracing::instrument(skip_all, fields(user_id = identity.id))]
async fn create_reminder(
    State(pg_client): State<PgClient>,
    identity: Identity,
    ValidateJson(request): ValidateJson<CreateReminder>,
) -> Result<(StatusCode, Json<ReminderResponse>)> {
    let mut conn = pg_client.get_connection().await?;
    let reminder = conn.create_reminder(request.into_model(&identity)).await?;

    tracing::info!(
        target: TRACING_TARGET,
        reminder_id = reminder.id,
        "reminder created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ReminderResponse::created(reminder)),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = identity.id))]
async fn list_reminders(
    State(pg_client): State<PgClient>,
    identity: Identity,
) -> Result<Json<RemindersResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let reminders = conn.list_user_reminders(identity.id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = reminders.len(),
        "reminders listed"
    );

    Ok(Json(RemindersResponse::listed(reminders)))
}

#[tracing::instrument(skip_all, fields(user_id = identity.id))]
async fn read_reminder(
    State(pg_client): State<PgClient>,
    identity: Identity,
    Path(path_params): Path<ReminderPathParams>,
) -> Result<Json<ReminderResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let reminder = conn
        .find_user_reminder(identity.id, path_params.reminder_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(
                target: TRACING_TARGET,
                reminder_id = path_params.reminder_id,
                "reminder not found"
            );
            ErrorKind::NotFound
                .with_message("Reminder not found")
                .with_resource("reminder")
        })?;

    Ok(Json(ReminderResponse::retrieved(reminder)))
}

/// Returns a [`Router`] with the reminder routes.
///
/// The routes do not check the session themselves; mount them behind
/// [`RouterAuthExt::with_authentication`].
///
/// [`RouterAuthExt::with_authentication`]: crate::middleware::RouterAuthExt::with_authentication
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(
            "/api/v1/reminders",
            get(list_reminders).post(create_reminder),
        )
        .route("/api/v1/reminders/{reminderId}", get(read_reminder))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::{AUTHORIZATION, COOKIE};
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{
        bearer_for, create_database_test_server, create_test_server, register_and_login,
        test_identity, unique_email,
    };

    #[tokio::test]
    async fn requires_session() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let list = server.get("/api/v1/reminders").await;
        list.assert_status_unauthorized();

        let read = server.get("/api/v1/reminders/1").await;
        read.assert_status_unauthorized();
        assert_eq!(list.text(), read.text());

        Ok(())
    }

    #[tokio::test]
    async fn rejects_non_numeric_id() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .get("/api/v1/reminders/abc")
            .add_header(AUTHORIZATION, bearer_for(&test_identity())?)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn rejects_reminder_without_name() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/api/v1/reminders")
            .add_header(AUTHORIZATION, bearer_for(&test_identity())?)
            .json(&json!({
                "name": "",
                "status": "active",
                "description": "",
                "category": "home",
                "reminder_interval": "daily",
                "reminder_end": "never",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn authenticated_request_reaches_database() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .get("/api/v1/reminders")
            .add_header(AUTHORIZATION, bearer_for(&test_identity())?)
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a database at POSTGRES_URL"]
    async fn reminders_are_visible_only_to_their_owner() -> anyhow::Result<()> {
        let server = create_database_test_server().await?;
        let owner = register_and_login(&server, &unique_email("owner")).await?;
        let stranger = register_and_login(&server, &unique_email("stranger")).await?;

        let response = server
            .post("/api/v1/reminders")
            .add_header(COOKIE, owner.clone())
            .json(&json!({
                "name": "Water the plants",
                "status": "active",
                "description": "Twice a week",
                "category": "home",
                "reminder_interval": "weekly",
                "reminder_end": "never",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let created = response.json::<Value>();
        assert_eq!(created["message"], "Reminder created successfully");
        assert_eq!(created["data"]["reminder"]["name"], "Water the plants");
        let reminder_id = created["data"]["reminder"]["id"].clone();
        let path = format!("/api/v1/reminders/{reminder_id}");

        let response = server.get(&path).add_header(COOKIE, owner.clone()).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["reminder"]["id"], reminder_id);

        let response = server.get(&path).add_header(COOKIE, stranger.clone()).await;
        response.assert_status_not_found();

        let response = server
            .get("/api/v1/reminders")
            .add_header(COOKIE, stranger)
            .await;
        response.assert_status_ok();
        let listed = response.json::<Value>();
        let reminders = listed["data"]["reminders"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        assert!(reminders.iter().all(|r| r["id"] != reminder_id));

        Ok(())
    }
}
