//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod custom_routes;
mod error;
mod monitors;
mod reminders;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::custom_routes::CustomRoutes;
pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::ErrorResponse;
use crate::middleware::RouterAuthExt;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

fn private_routes(additional_routes: Option<Router<ServiceState>>) -> Router<ServiceState> {
    let mut router = Router::new().merge(reminders::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

fn public_routes(additional_routes: Option<Router<ServiceState>>) -> Router<ServiceState> {
    let mut router = Router::new()
        .merge(authentication::routes())
        .merge(monitors::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns the complete API router.
///
/// Private routes are wrapped with the session gate before the public ones
/// are merged in, and unmatched paths answer `404`.
pub fn routes(routes: CustomRoutes, state: ServiceState) -> Router<ServiceState> {
    let private_router = private_routes(routes.private_routes).with_authentication(state);
    let public_router = public_routes(routes.public_routes);

    Router::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(handler)
}
