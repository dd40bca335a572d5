use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use reminders_postgres::model::User;
use serde::{Deserialize, Serialize};

use super::SessionToken;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// The authenticated caller.
///
/// This is also the session token payload: login serializes it to JSON and
/// the gate decodes it back, so handlers receive exactly what was signed.
/// Extracting it from a request without valid credentials rejects with
/// `401 unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i32,
    pub email: String,
    pub fname: String,
    pub lname: String,
}

impl Identity {
    /// Serializes the identity into a token payload.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes a token payload.
    pub fn from_payload(payload: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(payload)
    }

    /// Verifies `session_token` and decodes the identity it carries.
    ///
    /// Every failure maps to a bare [`ErrorKind::Unauthorized`].
    pub fn resolve(session_keys: &SessionKeys, session_token: &SessionToken) -> Result<Self> {
        let payload = session_keys
            .extract_payload(session_token.as_str())
            .map_err(|error| {
                tracing::debug!(
                    target: TRACING_TARGET,
                    source = ?session_token.source(),
                    reason = %error,
                    "session token rejected"
                );
                Error::from(error)
            })?;

        Self::from_payload(&payload).map_err(|error| {
            tracing::debug!(
                target: TRACING_TARGET,
                source = ?session_token.source(),
                reason = %error,
                "session payload is not an identity"
            );
            ErrorKind::Unauthorized.into_error()
        })
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            fname: user.fname.clone(),
            lname: user.lname.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Self>() {
            return Ok(identity.clone());
        }

        let session_token = SessionToken::from_request_parts(parts, state).await?;
        let session_keys = SessionKeys::from_ref(state);
        let identity = Self::resolve(&session_keys, &session_token)?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = identity.id,
            source = ?session_token.source(),
            "request authenticated"
        );

        parts.extensions.insert(identity.clone());
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::TokenSource;

    fn keys() -> SessionKeys {
        SessionKeys::from_secret("identity-test-secret-with-enough-bytes").expect("valid secret")
    }

    fn identity() -> Identity {
        Identity {
            id: 1,
            email: "a@x.com".into(),
            fname: "A".into(),
            lname: "B".into(),
        }
    }

    #[test]
    fn resolves_issued_identity() -> anyhow::Result<()> {
        let keys = keys();
        let token = keys.issue(&identity().to_payload()?)?;

        let resolved = Identity::resolve(&keys, &SessionToken::new(token, TokenSource::Bearer))?;
        assert_eq!(resolved, identity());
        Ok(())
    }

    #[test]
    fn payload_that_is_not_an_identity_is_unauthorized() -> anyhow::Result<()> {
        let keys = keys();
        let token = keys.issue(br#"{"hello":"world"}"#)?;

        let error = Identity::resolve(&keys, &SessionToken::new(token, TokenSource::Cookie))
            .expect_err("not an identity");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn invalid_token_is_unauthorized() {
        let error = Identity::resolve(&keys(), &SessionToken::new("x.y.z", TokenSource::Bearer))
            .expect_err("garbage token");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
    }
}
