//! Extra routes merged into the API router by embedders.

use axum::Router;

use crate::service::ServiceState;

/// Routes added next to the built-in ones.
///
/// Private routes sit behind the session gate, public routes do not.
///
/// ```rust
/// use axum::Router;
/// use axum::routing::get;
/// use reminders_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new()
///     .with_public_routes(Router::new().route("/version", get(|| async { "1" })));
/// assert!(!custom.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct CustomRoutes {
    /// Routes that require a session.
    pub private_routes: Option<Router<ServiceState>>,
    /// Routes reachable without a session.
    pub public_routes: Option<Router<ServiceState>>,
}

impl CustomRoutes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the private routes, replacing any set before.
    pub fn with_private_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.private_routes = Some(routes);
        self
    }

    /// Sets the public routes, replacing any set before.
    pub fn with_public_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.public_routes = Some(routes);
        self
    }

    /// Merges `routes` into the private routes.
    pub fn add_private_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.private_routes = Some(match self.private_routes {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Merges `routes` into the public routes.
    pub fn add_public_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.public_routes = Some(match self.public_routes {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Returns `true` if no routes were added.
    pub fn is_empty(&self) -> bool {
        self.private_routes.is_none() && self.public_routes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;

    use super::*;

    #[test]
    fn empty_by_default() {
        assert!(CustomRoutes::new().is_empty());
    }

    #[test]
    fn add_routes_merges() {
        let custom = CustomRoutes::new()
            .add_private_routes(Router::new().route("/a", get(|| async {})))
            .add_private_routes(Router::new().route("/b", get(|| async {})));

        assert!(custom.private_routes.is_some());
        assert!(custom.public_routes.is_none());
    }
}
