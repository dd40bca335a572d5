use axum::http::HeaderValue;

use super::session_keys::SESSION_LIFETIME;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "token";

/// Attributes of the session cookie set on login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Adds the `Secure` attribute. Only disable for plain-HTTP local setups.
    pub secure: bool,
}

impl CookiePolicy {
    pub const fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Renders the `Set-Cookie` value for `token`.
    ///
    /// Returns `None` if the token contains bytes not allowed in a header.
    pub fn session_cookie(&self, token: &str) -> Option<HeaderValue> {
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            SESSION_LIFETIME.as_secs()
        );

        if self.secure {
            cookie.push_str("; Secure");
        }

        HeaderValue::from_str(&cookie).ok()
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_cookie_attributes() {
        let value = CookiePolicy::default()
            .session_cookie("abc.def.ghi")
            .expect("valid header");

        assert_eq!(
            value.to_str().ok(),
            Some("token=abc.def.ghi; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax; Secure")
        );
    }

    #[test]
    fn insecure_cookie_omits_secure() {
        let value = CookiePolicy::new(false)
            .session_cookie("abc")
            .expect("valid header");

        assert!(!value.to_str().unwrap_or_default().contains("Secure"));
    }

    #[test]
    fn rejects_header_breaking_token() {
        assert!(CookiePolicy::default().session_cookie("a\nb").is_none());
    }
}
