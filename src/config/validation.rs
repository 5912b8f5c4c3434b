//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check referential integrity (redirects name an existing route and
//!   capture exactly the parameters that route needs)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Pattern syntax is not checked here; building the routing table
//!   rejects bad patterns with the offending rule index

use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;

use thiserror::Error;

use crate::admin;
use crate::config::schema::{ResponseConfig, SiteConfig};
use crate::routing::PathPattern;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("admin.prefix must not be empty when the admin interface is enabled")]
    EmptyAdminPrefix,

    #[error("app.routes[{index}] has status {status}, expected 100..=599")]
    InvalidStatus { index: usize, status: u16 },

    #[error("app.routes[{index}] redirects to unknown route {route:?}")]
    UnknownRedirect { index: usize, route: String },

    #[error("app.routes[{index}] redirects to {route:?}, which takes parameters {expected:?}, but the route captures {found:?}")]
    RedirectParams {
        index: usize,
        route: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Check everything about `config` that serde cannot.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    // An empty admin prefix would swallow every application route.
    if config.admin.enabled && config.admin.prefix.is_empty() {
        errors.push(ValidationError::EmptyAdminPrefix);
    }

    let targets = redirect_targets(config);

    for (index, route) in config.app.routes.iter().enumerate() {
        match &route.respond {
            ResponseConfig::Text { status, .. } | ResponseConfig::Json { status, .. }
                if !(100..=599).contains(status) =>
            {
                errors.push(ValidationError::InvalidStatus {
                    index,
                    status: *status,
                });
            }
            ResponseConfig::Redirect { route: target } => {
                let Some(candidates) = targets.get(target) else {
                    errors.push(ValidationError::UnknownRedirect {
                        index,
                        route: target.clone(),
                    });
                    continue;
                };
                // The redirect reverses the target with the request's own captures.
                let Some(found) = captured(&[config.app.prefix.as_str(), route.pattern.as_str()]) else {
                    continue;
                };
                let fits = candidates
                    .iter()
                    .any(|expected| expected.as_ref().map_or(true, |expected| *expected == found));
                if !fits {
                    let expected = candidates.iter().flatten().next().cloned().unwrap_or_default();
                    errors.push(ValidationError::RedirectParams {
                        index,
                        route: target.clone(),
                        expected: expected.into_iter().collect(),
                        found: found.into_iter().collect(),
                    });
                }
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every name a redirect may target, with the parameter set of each
/// candidate route. `None` stands for a pattern that does not compile; the
/// table build reports those.
fn redirect_targets(config: &SiteConfig) -> HashMap<String, Vec<Option<BTreeSet<String>>>> {
    let mut targets: HashMap<String, Vec<_>> = HashMap::new();

    for route in &config.app.routes {
        let Some(name) = &route.name else {
            continue;
        };
        let qualified = match &config.app.namespace {
            Some(ns) => format!("{ns}:{name}"),
            None => name.clone(),
        };
        targets
            .entry(qualified)
            .or_default()
            .push(captured(&[config.app.prefix.as_str(), route.pattern.as_str()]));
    }

    if config.admin.enabled {
        if let Ok(table) = admin::routes() {
            for route in table.named_routes() {
                targets
                    .entry(format!("admin:{}", route.name))
                    .or_default()
                    .push(captured(&[config.admin.prefix.as_str(), route.pattern.as_str()]));
            }
        }
    }

    targets
}

/// Placeholder names captured along a chain of patterns.
fn captured(patterns: &[&str]) -> Option<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for pattern in patterns {
        let pattern = PathPattern::parse(pattern).ok()?;
        names.extend(pattern.param_names().into_iter().map(str::to_string));
    }
    Some(names)
}
