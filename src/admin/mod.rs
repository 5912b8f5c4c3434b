//! Administrative sub-router.
//!
//! Mounted by [`crate::site`] under `admin.prefix` with the `admin`
//! namespace. Its pages are read-only views of the live routing table.

pub mod handlers;

use crate::http::endpoint::SiteEndpoint;
use crate::routing::{BuildError, RoutingTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEndpoint {
    /// Status summary (`admin:index`).
    Index,
    /// Catalogue of named routes (`admin:routes`).
    Routes,
    /// Dispatch an arbitrary path and report the outcome (`admin:resolve`).
    Resolve,
}

/// The admin routing table. The index rule is an empty prefix and
/// therefore comes last.
pub fn routes() -> Result<RoutingTable<SiteEndpoint>, BuildError> {
    RoutingTable::builder()
        .route_named("routes/", SiteEndpoint::Admin(AdminEndpoint::Routes), "routes")
        .route_named(
            "resolve/{target:path}",
            SiteEndpoint::Admin(AdminEndpoint::Resolve),
            "resolve",
        )
        .route_named("", SiteEndpoint::Admin(AdminEndpoint::Index), "index")
        .build()
}
