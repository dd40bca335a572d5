use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, Cookie, HeaderMapExt};
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::handler::{Error, ErrorKind};
use crate::service::SESSION_COOKIE_NAME;
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Where a [`SessionToken`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// The `token` cookie.
    Cookie,
    /// An `Authorization: Bearer` header.
    Bearer,
}

/// Raw, unverified session token taken from the request.
///
/// A non-empty `token` cookie wins over the `Authorization` header; the
/// header is not consulted at all when the cookie is present.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    token: String,
    source: TokenSource,
}

impl SessionToken {
    #[inline]
    pub fn new(token: impl Into<String>, source: TokenSource) -> Self {
        Self {
            token: token.into(),
            source,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    #[inline]
    pub fn source(&self) -> TokenSource {
        self.source
    }

    fn from_cookie(headers: &HeaderMap) -> Option<Self> {
        let cookie = headers.typed_get::<Cookie>()?;
        let token = cookie.get(SESSION_COOKIE_NAME)?;
        (!token.is_empty()).then(|| Self::new(token, TokenSource::Cookie))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Sync + Send,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session_token) = Self::from_cookie(&parts.headers) {
            return Ok(session_token);
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                Ok(Self::new(bearer.token(), TokenSource::Bearer))
            }
            Err(rejection) => {
                let reason = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => "no session cookie or bearer token",
                    TypedHeaderRejectionReason::Error(_) => "malformed authorization header",
                    _ => "unreadable authorization header",
                };

                tracing::debug!(target: TRACING_TARGET, reason, "request is not authenticated");
                Err(ErrorKind::Unauthorized.into_error())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use axum::http::header::{AUTHORIZATION, COOKIE};

    use super::*;

    async fn extract(request: Request<()>) -> Result<SessionToken, Error<'static>> {
        let (mut parts, ()) = request.into_parts();
        SessionToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_bearer_header() -> anyhow::Result<()> {
        let request = Request::builder()
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())?;

        let token = extract(request).await?;
        assert_eq!(token.as_str(), "abc.def.ghi");
        assert_eq!(token.source(), TokenSource::Bearer);
        Ok(())
    }

    #[tokio::test]
    async fn cookie_wins_over_header() -> anyhow::Result<()> {
        let request = Request::builder()
            .header(COOKIE, "theme=dark; token=from-cookie")
            .header(AUTHORIZATION, "Bearer from-header")
            .body(())?;

        let token = extract(request).await?;
        assert_eq!(token.as_str(), "from-cookie");
        assert_eq!(token.source(), TokenSource::Cookie);
        Ok(())
    }

    #[tokio::test]
    async fn empty_cookie_falls_back_to_header() -> anyhow::Result<()> {
        let request = Request::builder()
            .header(COOKIE, "token=")
            .header(AUTHORIZATION, "Bearer from-header")
            .body(())?;

        assert_eq!(extract(request).await?.source(), TokenSource::Bearer);
        Ok(())
    }

    #[tokio::test]
    async fn missing_or_malformed_credentials_are_unauthorized() -> anyhow::Result<()> {
        let missing = extract(Request::builder().body(())?).await;
        let basic = extract(
            Request::builder()
                .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(())?,
        )
        .await;
        let other_cookie = extract(Request::builder().header(COOKIE, "session=x").body(())?).await;

        for result in [missing, basic, other_cookie] {
            let error = result.expect_err("no usable token");
            assert_eq!(error.kind(), ErrorKind::Unauthorized);
            assert!(error.message().is_none());
            assert!(error.context().is_none());
        }
        Ok(())
    }

    #[test]
    fn debug_hides_token() {
        let token = SessionToken::new("secret-token", TokenSource::Cookie);
        assert!(!format!("{token:?}").contains("secret-token"));
    }
}
