//! Login and registration.
//!
//! Login answers the same bare `401` for an unknown email and for a wrong
//! password, and runs a dummy verification for unknown emails so both take
//! comparable time. The issued session token is returned only as an
//! `HttpOnly` cookie.

use axum::Router;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::routing::post;
use reminders_postgres::PgClient;
use reminders_postgres::model::NewUser;
use reminders_postgres::query::UserRepository;
use tokio::task::{JoinError, spawn_blocking};

use crate::extract::{Identity, Json, ValidateJson};
use crate::handler::request::{Login, Register};
use crate::handler::response::AccountEmail;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{CookiePolicy, PasswordHasher, ServiceState, SessionKeys};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "reminders_server::handler::authentication";

fn password_task_failed(error: JoinError) -> Error<'static> {
    tracing::error!(
        target: TRACING_TARGET,
        error = %error,
        "password task did not complete"
    );

    ErrorKind::InternalServerError
        .with_message("Password processing failed")
        .with_resource("authentication")
}

/// Verifies the credentials and sets the session cookie.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    State(cookie_policy): State<CookiePolicy>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(StatusCode, [(HeaderName, HeaderValue); 1], Json<AccountEmail>)> {
    tracing::trace!(target: TRACING_TARGET, "login attempt");

    // The connection goes back to the pool before the slow verification.
    let user = {
        let mut conn = pg_client.get_connection().await?;
        conn.find_user_by_email(&request.email).await?
    };

    let password = request.pass;
    let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
    let password_valid = spawn_blocking(move || match stored_hash {
        Some(stored_hash) => password_hasher.verify_password(&password, &stored_hash),
        None => password_hasher.verify_dummy_password(&password),
    })
    .await
    .map_err(password_task_failed)?;

    let Some(user) = user.filter(|_| password_valid) else {
        tracing::warn!(target: TRACING_TARGET, "login failed");
        return Err(ErrorKind::Unauthorized.into_error());
    };

    let payload = Identity::from(&user).to_payload().map_err(|error| {
        tracing::error!(
            target: TRACING_TARGET,
            user_id = user.id,
            error = %error,
            "failed to encode session payload"
        );
        ErrorKind::InternalServerError.with_resource("authentication")
    })?;

    let token = session_keys.issue(&payload)?;
    let cookie = cookie_policy.session_cookie(&token).ok_or_else(|| {
        tracing::error!(
            target: TRACING_TARGET,
            user_id = user.id,
            "session token is not a valid cookie value"
        );
        ErrorKind::InternalServerError.with_resource("authentication")
    })?;

    tracing::info!(target: TRACING_TARGET, user_id = user.id, "login succeeded");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(AccountEmail::new(user.email)),
    ))
}

/// Creates an account with an argon2 password hash.
#[tracing::instrument(skip_all)]
async fn register(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, Json<AccountEmail>)> {
    let Register {
        email,
        pass,
        fname,
        lname,
    } = request;

    let password_hash = spawn_blocking(move || password_hasher.hash_password(&pass))
        .await
        .map_err(password_task_failed)??;

    let new_user = NewUser {
        email,
        password_hash,
        fname,
        lname,
    };

    let mut conn = pg_client.get_connection().await?;
    let user = conn.create_user(new_user).await?;

    tracing::info!(target: TRACING_TARGET, user_id = user.id, "account registered");

    Ok((StatusCode::CREATED, Json(AccountEmail::new(user.email))))
}

/// Returns a [`Router`] with the unauthenticated account routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/v1/login", post(login))
        .route("/api/v1/register", post(register))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::COOKIE;
    use serde_json::json;

    use super::*;
    use crate::handler::test::{
        create_database_test_server, create_test_server_with_router, register_and_login,
        session_cookie, unique_email,
    };

    #[tokio::test]
    async fn register_rejects_invalid_body() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .post("/api/v1/register")
            .json(&json!({
                "email": "not-an-email",
                "pass": "short",
                "fname": "A",
                "lname": "B",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "bad_request");

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_missing_fields() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .post("/api/v1/login")
            .json(&json!({ "email": "a@x.com" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn login_without_database_is_unavailable() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .post("/api/v1/login")
            .json(&json!({ "email": "a@x.com", "pass": "password123" }))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert!(!response.headers().contains_key(SET_COOKIE));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a database at POSTGRES_URL"]
    async fn register_then_login_opens_a_session() -> anyhow::Result<()> {
        let server = create_database_test_server().await?;
        let email = unique_email("session");

        let response = server
            .post("/api/v1/register")
            .json(&json!({
                "email": email,
                "pass": "correct-horse-battery",
                "fname": "Ada",
                "lname": "Lovelace",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({ "email": email }));

        let response = server
            .post("/api/v1/login")
            .json(&json!({ "email": email, "pass": "correct-horse-battery" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "email": email }));

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .map(|value| value.to_str())
            .transpose()?
            .unwrap_or_default()
            .to_owned();
        assert!(set_cookie.starts_with("token="));
        assert!(set_cookie.contains("HttpOnly"));

        let cookie = session_cookie(&response)?;
        let response = server.get("/api/v1/reminders").add_header(COOKIE, cookie).await;
        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a database at POSTGRES_URL"]
    async fn duplicate_email_conflicts() -> anyhow::Result<()> {
        let server = create_database_test_server().await?;
        let body = json!({
            "email": unique_email("duplicate"),
            "pass": "correct-horse-battery",
            "fname": "First",
            "lname": "User",
        });

        let response = server.post("/api/v1/register").json(&body).await;
        response.assert_status(StatusCode::CREATED);

        let response = server.post("/api/v1/register").json(&body).await;
        response.assert_status_conflict();

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a database at POSTGRES_URL"]
    async fn unknown_email_and_wrong_password_look_the_same() -> anyhow::Result<()> {
        let server = create_database_test_server().await?;
        let email = unique_email("failure");
        register_and_login(&server, &email).await?;

        let wrong_password = server
            .post("/api/v1/login")
            .json(&json!({ "email": email, "pass": "not-the-password" }))
            .await;
        wrong_password.assert_status_unauthorized();
        assert!(!wrong_password.headers().contains_key(SET_COOKIE));

        let unknown_email = server
            .post("/api/v1/login")
            .json(&json!({ "email": unique_email("nobody"), "pass": "not-the-password" }))
            .await;
        unknown_email.assert_status_unauthorized();
        assert!(!unknown_email.headers().contains_key(SET_COOKIE));

        assert_eq!(wrong_password.text(), unknown_email.text());

        Ok(())
    }
}
