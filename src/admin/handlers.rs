use axum::{http::StatusCode, response::Response};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::admin::AdminEndpoint;
use crate::http::endpoint::RequestContext;
use crate::http::response;
use crate::routing::Dispatch;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub rules: usize,
    pub named_routes: usize,
}

#[derive(Serialize)]
pub struct NamedRouteEntry {
    pub name: String,
    pub pattern: String,
}

#[derive(Serialize)]
pub struct Resolution {
    pub path: String,
    pub matched: bool,
    pub route: Option<String>,
    pub params: BTreeMap<String, String>,
    pub remaining: Option<String>,
    pub trail: Vec<usize>,
}

pub fn respond(endpoint: AdminEndpoint, ctx: &RequestContext<'_>) -> Response {
    match endpoint {
        AdminEndpoint::Index => get_status(ctx),
        AdminEndpoint::Routes => get_routes(ctx),
        AdminEndpoint::Resolve => get_resolution(ctx),
    }
}

/// The index sits on an empty prefix, so it sees every admin path nothing
/// else claimed. Only the bare prefix is the index page.
fn get_status(ctx: &RequestContext<'_>) -> Response {
    if !ctx.route.remaining.is_empty() {
        return response::not_found();
    }

    response::json(
        StatusCode::OK,
        &SystemStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "operational",
            rules: ctx.table.len(),
            named_routes: ctx.table.named_routes().len(),
        },
    )
}

fn get_routes(ctx: &RequestContext<'_>) -> Response {
    let routes: Vec<NamedRouteEntry> = ctx
        .table
        .named_routes()
        .into_iter()
        .map(|r| NamedRouteEntry {
            name: r.name,
            pattern: r.pattern,
        })
        .collect();

    response::json(StatusCode::OK, &routes)
}

fn get_resolution(ctx: &RequestContext<'_>) -> Response {
    let target = ctx.route.params.get("target").unwrap_or_default();

    let resolution = match ctx.table.dispatch(target) {
        Dispatch::Matched(m) => Resolution {
            path: target.to_string(),
            matched: true,
            route: m.qualified_name(),
            params: m.params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            remaining: Some(m.remaining.to_string()),
            trail: m.trail,
        },
        Dispatch::NotFound => Resolution {
            path: target.to_string(),
            matched: false,
            route: None,
            params: BTreeMap::new(),
            remaining: None,
            trail: Vec::new(),
        },
    };

    response::json(StatusCode::OK, &resolution)
}
