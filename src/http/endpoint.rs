//! Endpoints the site's routing table resolves to.
//!
//! The router treats these as opaque values; this module is where they
//! turn into responses.

use axum::{http::Method, response::Response};
use serde_json::{json, Map, Value};

use crate::admin::{self, AdminEndpoint};
use crate::config::ResponseConfig;
use crate::http::response;
use crate::routing::{RouteMatch, RoutingTable};

#[derive(Debug, Clone, PartialEq)]
pub enum SiteEndpoint {
    Admin(AdminEndpoint),
    Text { status: u16, body: String },
    Json { status: u16, body: Value },
    Echo,
    Redirect { route: String },
}

/// Everything an endpoint may look at while answering one request.
pub struct RequestContext<'a> {
    pub method: &'a Method,
    /// The dispatched path (without the leading `/`).
    pub path: &'a str,
    pub route: &'a RouteMatch<'a, SiteEndpoint>,
    /// The table the request was dispatched against.
    pub table: &'a RoutingTable<SiteEndpoint>,
}

impl SiteEndpoint {
    pub fn from_config(respond: &ResponseConfig) -> Self {
        match respond {
            ResponseConfig::Text { body, status } => SiteEndpoint::Text {
                status: *status,
                body: body.clone(),
            },
            ResponseConfig::Json { body, status } => SiteEndpoint::Json {
                status: *status,
                body: body.clone(),
            },
            ResponseConfig::Echo => SiteEndpoint::Echo,
            ResponseConfig::Redirect { route } => SiteEndpoint::Redirect {
                route: route.clone(),
            },
        }
    }

    pub fn respond(&self, ctx: &RequestContext<'_>) -> Response {
        match self {
            SiteEndpoint::Admin(endpoint) => admin::handlers::respond(*endpoint, ctx),
            SiteEndpoint::Text { status, body } => response::text(response::status(*status), body),
            SiteEndpoint::Json { status, body } => response::json(response::status(*status), body),
            SiteEndpoint::Echo => response::json(axum::http::StatusCode::OK, &echo(ctx)),
            SiteEndpoint::Redirect { route } => {
                match ctx.table.reverse(route, ctx.route.params.as_pairs()) {
                    Ok(path) => response::redirect(&format!("/{path}")),
                    Err(e) => {
                        tracing::error!(route = %route, error = %e, "Redirect target cannot be reversed");
                        response::internal_error()
                    }
                }
            }
        }
    }
}

fn echo(ctx: &RequestContext<'_>) -> Value {
    let params: Map<String, Value> = ctx
        .route
        .params
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(v)))
        .collect();

    json!({
        "method": ctx.method.as_str(),
        "path": ctx.path,
        "route": ctx.route.qualified_name(),
        "params": params,
        "remaining": ctx.route.remaining,
    })
}
