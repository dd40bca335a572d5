//! HS256 session tokens.
//!
//! A token wraps an opaque payload (the caller's identity serialized as
//! JSON) in the `data` claim, next to `iat` and `exp`. Tokens are valid
//! for [`SESSION_LIFETIME`] after issuance and there is no server-side
//! session record: anything signed with the secret and not yet expired is
//! accepted.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::Timestamp;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// How long an issued token stays valid.
pub const SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Where the token signing secret comes from.
///
/// Exactly one of the two sources must be set.
#[derive(Clone, Default, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Secret used to sign session tokens (at least 32 bytes).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_SECRET", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub auth_secret: Option<String>,

    /// File holding the secret used to sign session tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_SECRET_FILEPATH", conflicts_with = "auth_secret")
    )]
    pub auth_secret_filepath: Option<PathBuf>,
}

impl SessionKeysConfig {
    /// Configuration with an inline secret.
    pub fn from_secret(secret: impl Into<String>) -> Self {
        Self {
            auth_secret: Some(secret.into()),
            auth_secret_filepath: None,
        }
    }

    /// Configuration reading the secret from a file.
    pub fn from_filepath(path: impl Into<PathBuf>) -> Self {
        Self {
            auth_secret: None,
            auth_secret_filepath: Some(path.into()),
        }
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "[REDACTED]"))
            .field("auth_secret_filepath", &self.auth_secret_filepath)
            .finish()
    }
}

/// Reasons a token could not be issued or accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The signature does not match, or the token uses another algorithm.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The token's `exp` is at or before the current time.
    #[error("token has expired")]
    Expired,
    /// The token is not a well-formed JWT or lacks required claims.
    #[error("token is malformed")]
    Malformed,
    /// The token could not be produced.
    #[error("failed to sign token: {0}")]
    Signing(Cow<'static, str>),
}

impl From<JwtError> for TokenError {
    fn from(error: JwtError) -> Self {
        match error.kind() {
            JwtErrorKind::ExpiredSignature => Self::Expired,
            JwtErrorKind::InvalidSignature
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::InvalidAlgorithmName => Self::InvalidSignature,
            _ => Self::Malformed,
        }
    }
}

/// Maps a decoding failure to a [`TokenError`].
///
/// The signature is checked before the claims are decoded, so a base64
/// failure behind a readable header comes from the signature segment.
fn classify_decode_error(token: &str, error: JwtError) -> TokenError {
    if matches!(error.kind(), JwtErrorKind::Base64(_)) && decode_header(token).is_ok() {
        return TokenError::InvalidSignature;
    }

    TokenError::from(error)
}

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The payload handed to [`SessionKeys::issue`].
    pub data: String,
    /// Issued at, in seconds since the Unix epoch.
    pub iat: i64,
    /// Expires at, in seconds since the Unix epoch.
    pub exp: i64,
}

impl SessionClaims {
    /// Whether the token is expired at `now`.
    ///
    /// A token is already invalid at the exact second of its `exp`.
    #[inline]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_second() >= self.exp
    }
}

/// Signs and verifies session tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionKeys {
    /// Loads the secret from configuration.
    pub async fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        let secret = match (&config.auth_secret, &config.auth_secret_filepath) {
            (Some(_), Some(_)) => {
                return Err(Error::config(
                    "set either AUTH_SECRET or AUTH_SECRET_FILEPATH, not both",
                ));
            }
            (Some(secret), None) => secret.trim().as_bytes().to_vec(),
            (None, Some(path)) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    path = %path.display(),
                    "loading session secret from file"
                );

                let contents = tokio::fs::read(path).await.map_err(|e| {
                    tracing::error!(
                        target: TRACING_TARGET,
                        path = %path.display(),
                        error = %e,
                        "failed to read session secret file"
                    );
                    Error::file_system(format!(
                        "cannot read session secret from {}",
                        path.display()
                    ))
                    .with_source(e)
                })?;

                contents.trim_ascii().to_vec()
            }
            (None, None) => {
                return Err(Error::config(
                    "session secret is missing, set AUTH_SECRET or AUTH_SECRET_FILEPATH",
                ));
            }
        };

        let keys = Self::from_secret(&secret)?;
        tracing::info!(target: TRACING_TARGET, "session keys loaded");
        Ok(keys)
    }

    /// Builds keys from a raw secret of at least [`MIN_SECRET_LEN`] bytes.
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "session secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["exp", "iat"]);

        let inner = SessionKeysInner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Issues a token carrying `payload`, valid for [`SESSION_LIFETIME`].
    ///
    /// The payload must be UTF-8 (it is normally JSON).
    pub fn issue(&self, payload: &[u8]) -> Result<String, TokenError> {
        self.issue_at(payload, Timestamp::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub(crate) fn issue_at(&self, payload: &[u8], issued_at: Timestamp) -> Result<String, TokenError> {
        let data = std::str::from_utf8(payload)
            .map_err(|_| TokenError::Signing("payload is not valid UTF-8".into()))?;

        let iat = issued_at.as_second();
        let claims = SessionClaims {
            data: data.to_owned(),
            iat,
            exp: iat + SESSION_LIFETIME.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to sign session token"
            );
            TokenError::Signing(e.to_string().into())
        })
    }

    /// Checks signature, algorithm and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Timestamp::now())
    }

    fn verify_at(&self, token: &str, now: Timestamp) -> Result<SessionClaims, TokenError> {
        let token_data = decode::<SessionClaims>(token, &self.inner.decoding_key, &self.inner.validation)
            .map_err(|error| classify_decode_error(token, error))?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verifies `token` and returns the payload it carries.
    ///
    /// Fails exactly when [`verify`] fails, so a payload is never returned
    /// for an unverified token.
    ///
    /// [`verify`]: Self::verify
    pub fn extract_payload(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        self.verify(token).map(|claims| claims.data.into_bytes())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("algorithm", &Algorithm::HS256)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use jiff::SignedDuration;

    use super::*;

    const SECRET: &str = "a-test-secret-that-is-long-enough-for-hs256";
    const PAYLOAD: &[u8] = br#"{"id":1,"email":"a@x.com","fname":"A","lname":"B"}"#;

    fn keys() -> SessionKeys {
        SessionKeys::from_secret(SECRET).expect("valid secret")
    }

    const BASE64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    fn flip(c: u8) -> u8 {
        if c == b'A' { b'B' } else { b'A' }
    }

    /// Flips one of the six bits a base64url character encodes.
    fn flip_bit(c: u8, bit: u32) -> u8 {
        let value = BASE64URL
            .iter()
            .position(|&b| b == c)
            .expect("base64url character");
        BASE64URL[value ^ (1 << bit)]
    }

    #[test]
    fn payload_round_trips() -> anyhow::Result<()> {
        let keys = keys();
        let token = keys.issue(PAYLOAD)?;

        assert_eq!(keys.extract_payload(&token)?, PAYLOAD);
        Ok(())
    }

    #[test]
    fn claims_expire_after_one_day() -> anyhow::Result<()> {
        let keys = keys();
        let token = keys.issue(PAYLOAD)?;
        let claims = keys.verify(&token)?;

        assert_eq!(claims.exp - claims.iat, 86_400);
        Ok(())
    }

    #[test]
    fn token_issued_a_day_ago_is_expired() -> anyhow::Result<()> {
        let keys = keys();
        let issued_at = Timestamp::now() - SignedDuration::from_secs(86_401);
        let token = keys.issue_at(PAYLOAD, issued_at)?;

        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
        assert_eq!(keys.extract_payload(&token), Err(TokenError::Expired));
        Ok(())
    }

    #[test]
    fn token_is_invalid_at_exactly_exp() -> anyhow::Result<()> {
        let keys = keys();
        let issued_at = Timestamp::now();
        let token = keys.issue_at(PAYLOAD, issued_at)?;

        let just_before = issued_at + SignedDuration::from_secs(86_399);
        let at_exp = issued_at + SignedDuration::from_secs(86_400);

        assert!(keys.verify_at(&token, just_before).is_ok());
        assert_eq!(keys.verify_at(&token, at_exp), Err(TokenError::Expired));
        Ok(())
    }

    #[test]
    fn tampered_signature_is_rejected() -> anyhow::Result<()> {
        let keys = keys();
        let token = keys.issue(PAYLOAD)?;

        let mut bytes = token.into_bytes();
        let signature_start = bytes
            .iter()
            .rposition(|&b| b == b'.')
            .map(|i| i + 1)
            .expect("three segments");
        bytes[signature_start] = flip(bytes[signature_start]);
        let tampered = String::from_utf8(bytes)?;

        assert_eq!(keys.verify(&tampered), Err(TokenError::InvalidSignature));
        Ok(())
    }

    #[test]
    fn tampered_claims_are_rejected() -> anyhow::Result<()> {
        let keys = keys();
        let token = keys.issue(PAYLOAD)?;

        let segments: Vec<&str> = token.split('.').collect();
        let claims = segments[1].as_bytes();

        for index in 0..claims.len() {
            for bit in 0..6 {
                let mut tampered_claims = claims.to_vec();
                tampered_claims[index] = flip_bit(tampered_claims[index], bit);
                let tampered = format!(
                    "{}.{}.{}",
                    segments[0],
                    String::from_utf8(tampered_claims)?,
                    segments[2]
                );

                assert_eq!(keys.verify(&tampered), Err(TokenError::InvalidSignature));
                assert_eq!(
                    keys.extract_payload(&tampered),
                    Err(TokenError::InvalidSignature)
                );
            }
        }
        Ok(())
    }

    #[test]
    fn every_signature_bit_flip_is_an_invalid_signature() -> anyhow::Result<()> {
        let keys = keys();
        let token = keys.issue(PAYLOAD)?;

        let signature_start = token.rfind('.').map(|i| i + 1).expect("three segments");
        let (message, signature) = token.split_at(signature_start);

        // Includes the unused trailing bits of the last character.
        for index in 0..signature.len() {
            for bit in 0..6 {
                let mut tampered_signature = signature.as_bytes().to_vec();
                tampered_signature[index] = flip_bit(tampered_signature[index], bit);
                let tampered = format!("{message}{}", String::from_utf8(tampered_signature)?);

                assert_eq!(keys.verify(&tampered), Err(TokenError::InvalidSignature));
            }
        }
        Ok(())
    }

    #[test]
    fn token_from_another_secret_is_rejected() -> anyhow::Result<()> {
        let other = SessionKeys::from_secret("another-secret-that-is-also-long-enough")?;
        let token = other.issue(PAYLOAD)?;

        assert_eq!(keys().verify(&token), Err(TokenError::InvalidSignature));
        Ok(())
    }

    #[test]
    fn other_algorithms_are_rejected() -> anyhow::Result<()> {
        let claims = SessionClaims {
            data: String::from_utf8(PAYLOAD.to_vec())?,
            iat: Timestamp::now().as_second(),
            exp: Timestamp::now().as_second() + 3_600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )?;

        assert_eq!(keys().verify(&token), Err(TokenError::InvalidSignature));
        Ok(())
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = keys();

        assert_eq!(keys.verify(""), Err(TokenError::Malformed));
        assert_eq!(keys.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(keys.verify("a.b.c"), Err(TokenError::Malformed));
    }

    #[test]
    fn non_utf8_payload_cannot_be_signed() {
        let result = keys().issue(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(TokenError::Signing(_))));
    }

    #[test]
    fn short_secret_is_rejected() {
        let error = SessionKeys::from_secret("too-short").expect_err("short secret");
        assert_eq!(error.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn debug_redacts_secret() {
        let config = SessionKeysConfig::from_secret(SECRET);

        assert!(!format!("{config:?}").contains(SECRET));
        assert!(!format!("{:?}", keys()).contains(SECRET));
    }

    #[tokio::test]
    async fn loads_secret_from_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "{SECRET}")?;

        let from_file = SessionKeys::from_config(&SessionKeysConfig::from_filepath(file.path())).await?;
        let token = from_file.issue(PAYLOAD)?;

        assert_eq!(keys().extract_payload(&token)?, PAYLOAD);
        Ok(())
    }

    #[tokio::test]
    async fn missing_secret_is_a_config_error() {
        let error = SessionKeys::from_config(&SessionKeysConfig::default())
            .await
            .expect_err("no secret configured");
        assert_eq!(error.kind(), crate::ErrorKind::Config);
    }
}
