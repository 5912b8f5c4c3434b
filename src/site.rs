//! Root routing table of the site.
//!
//! ```text
//! admin.prefix ("admin/")  → admin::routes()      namespace "admin"
//! app.prefix   ("")        → [[app.routes]]       namespace app.namespace
//! ```
//!
//! The admin mount comes first; the application mount is usually the empty
//! prefix and takes everything else.

use crate::admin;
use crate::config::{AppConfig, SiteConfig};
use crate::http::endpoint::SiteEndpoint;
use crate::routing::{BuildError, Handler, RoutingTable};

/// Compose the root table from configuration.
pub fn build_routes(config: &SiteConfig) -> Result<RoutingTable<SiteEndpoint>, BuildError> {
    let app = app_routes(&config.app)?;
    let mut builder = RoutingTable::builder();

    if config.admin.enabled {
        builder = builder.include_namespaced(config.admin.prefix.clone(), admin::routes()?, "admin");
    }

    builder = match &config.app.namespace {
        Some(namespace) => builder.include_namespaced(config.app.prefix.clone(), app, namespace.clone()),
        None => builder.include(config.app.prefix.clone(), app),
    };

    let table = builder.build()?;
    tracing::debug!(
        rules = table.len(),
        admin = config.admin.enabled,
        app_routes = config.app.routes.len(),
        "Site routes composed"
    );
    Ok(table)
}

/// The application table, in declaration order.
pub fn app_routes(config: &AppConfig) -> Result<RoutingTable<SiteEndpoint>, BuildError> {
    config
        .routes
        .iter()
        .fold(RoutingTable::builder(), |builder, route| {
            builder.rule(
                route.pattern.clone(),
                Handler::Endpoint(SiteEndpoint::from_config(&route.respond)),
                route.name.clone(),
            )
        })
        .build()
}
