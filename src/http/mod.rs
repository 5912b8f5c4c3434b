//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → dispatch_handler (strip leading '/', snapshot table, dispatch)
//!     → endpoint.rs (matched endpoint produces the response)
//!     → response.rs (shared response shapes, 404)
//!     → Send to client
//! ```

pub mod endpoint;
pub mod response;
pub mod server;

pub use endpoint::{RequestContext, SiteEndpoint};
pub use server::{apply_config, AppState, HttpServer};
