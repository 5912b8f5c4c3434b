//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → table.rs (scan rules in declaration order)
//!     → pattern.rs (match a prefix, capture params)
//!     → SubRouter? strip prefix, continue in the child table
//!     → Return: matched endpoint + remaining path, or NotFound
//!
//! Table construction (at startup and on reload):
//!     (pattern, handler, name)[]
//!     → Compile patterns (errors abort construction)
//!     → Freeze as immutable RoutingTable
//!     → Publish through SharedRoutes (atomic swap)
//! ```
//!
//! # Design Decisions
//! - Tables compiled up front, immutable at runtime
//! - Deterministic: same path and table always give the same match
//! - First match wins (declaration order, not specificity)
//! - Delegation is transparent: the caller cannot tell how many
//!   sub-routers a match passed through
//! - No path normalization; callers normalize before dispatch

pub mod converter;
pub mod error;
pub mod params;
pub mod pattern;
pub mod reverse;
pub mod shared;
pub mod table;

pub use converter::Converter;
pub use error::{BuildError, PatternError, ReverseError};
pub use params::Params;
pub use pattern::PathPattern;
pub use reverse::NamedRoute;
pub use shared::SharedRoutes;
pub use table::{Dispatch, Handler, RouteMatch, RoutingTable, RoutingTableBuilder, Rule};
