use crate::handler::{Error, ErrorKind};
use crate::service::TokenError;

impl From<TokenError> for Error<'static> {
    /// Verification failures collapse into a bare `401`; the reason is only logged.
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Signing(_) => ErrorKind::InternalServerError.into_error(),
            TokenError::InvalidSignature | TokenError::Expired | TokenError::Malformed => {
                ErrorKind::Unauthorized.into_error()
            }
        }
    }
}
