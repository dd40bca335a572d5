//! HTTP server startup, graceful shutdown and lifecycle logging.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

pub use error::{ServerError, ServerResult};
pub use http_server::serve_http as serve;
pub(crate) use lifecycle::serve_with_shutdown;
pub(crate) use shutdown::shutdown_signal;
