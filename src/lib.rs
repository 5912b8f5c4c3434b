//! Prefix-based request routing for a small site.
//!
//! The core is [`routing`]: ordered tables of (pattern, handler, name)
//! rules, first-match dispatch with transparent delegation to nested
//! tables, reverse lookup by name, and an atomically replaceable holder for
//! reloads. The rest of the crate is the service around it.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod site;

pub use config::schema::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Dispatch, Handler, RouteMatch, RoutingTable, SharedRoutes};
