use axum::Router;
use axum::extract::Request;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::Identity;
use crate::service::ServiceState;

/// Extension trait for `axum::`[`Router`] to require a session.
pub trait RouterAuthExt<S> {
    /// Rejects requests to every route added so far unless they carry a
    /// valid session token.
    ///
    /// Uses `route_layer`, so unmatched paths still fall through to the
    /// router's fallback instead of answering `401`.
    fn with_authentication(self, state: ServiceState) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_authentication(self, state: ServiceState) -> Self {
        self.route_layer(from_fn_with_state(state, require_authentication))
    }
}

/// Runs the [`Identity`] extractor before the handler.
///
/// On failure the extractor's `401` is returned and the handler never runs.
/// On success the identity stays cached in the request extensions, so the
/// handler's own `Identity` argument does not verify the token again.
pub async fn require_authentication(_: Identity, request: Request, next: Next) -> Response {
    next.run(request).await
}
