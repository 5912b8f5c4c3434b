//! Reverse lookup: building a path from a route name and parameters.
//!
//! # Naming
//! - An endpoint rule's name is addressed directly (`"item-detail"`)
//! - A named sub-router is a namespace; its routes are addressed as
//!   `"namespace:name"`, nesting as `"outer:inner:name"`
//! - An unnamed sub-router is transparent; its routes keep their bare names
//!
//! # Candidate selection
//! Candidates are visited depth-first in declaration order. The first one
//! whose full chain of patterns requires exactly the supplied parameter
//! names, and whose converters accept every value, produces the path. That
//! is the same order dispatch uses, so a reversed path resolves back to the
//! rule it came from unless an earlier rule shadows it.

use std::collections::HashSet;

use crate::routing::error::ReverseError;
use crate::routing::pattern::PathPattern;
use crate::routing::table::{Handler, RoutingTable};

/// A reachable named endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRoute {
    /// Qualified name, e.g. `admin:index`.
    pub name: String,
    /// Every pattern on the way to the endpoint, concatenated.
    pub pattern: String,
}

impl<E> RoutingTable<E> {
    /// Build the path for the route called `name`.
    ///
    /// ```
    /// use site_router::routing::RoutingTable;
    ///
    /// let table = RoutingTable::builder()
    ///     .route_named("items/{id:int}/", (), "item-detail")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(table.reverse("item-detail", &[("id", "42")]).unwrap(), "items/42/");
    /// ```
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, ReverseError> {
        let (namespaces, leaf) = match name.rsplit_once(':') {
            Some((namespaces, leaf)) => (namespaces.split(':').collect(), leaf),
            None => (Vec::new(), name),
        };

        let mut chain = Vec::new();
        let mut candidates = 0;
        if let Some(path) = reverse_in(self, &namespaces, leaf, params, &mut chain, &mut candidates) {
            return Ok(path);
        }

        if candidates == 0 {
            Err(ReverseError::UnknownRoute {
                name: name.to_string(),
            })
        } else {
            Err(ReverseError::NoMatch {
                name: name.to_string(),
                params: params
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }

    /// Every named endpoint reachable from this table, in declaration order.
    pub fn named_routes(&self) -> Vec<NamedRoute> {
        let mut out = Vec::new();
        collect_named(self, "", "", &mut out);
        out
    }
}

fn reverse_in<'t, E>(
    table: &'t RoutingTable<E>,
    namespaces: &[&str],
    leaf: &str,
    params: &[(&str, &str)],
    chain: &mut Vec<&'t PathPattern>,
    candidates: &mut usize,
) -> Option<String> {
    for rule in table.rules() {
        match rule.handler() {
            Handler::Endpoint(_) => {
                if !namespaces.is_empty() || rule.name() != Some(leaf) {
                    continue;
                }
                *candidates += 1;
                chain.push(rule.pattern());
                let built = fill_chain(chain, params);
                chain.pop();
                if built.is_some() {
                    return built;
                }
            }
            Handler::SubRouter(inner) => {
                let remaining = match (rule.name(), namespaces.split_first()) {
                    (None, _) => namespaces,
                    (Some(namespace), Some((first, rest))) if namespace == *first => rest,
                    _ => continue,
                };
                chain.push(rule.pattern());
                let built = reverse_in(inner, remaining, leaf, params, chain, candidates);
                chain.pop();
                if built.is_some() {
                    return built;
                }
            }
        }
    }
    None
}

fn fill_chain(chain: &[&PathPattern], params: &[(&str, &str)]) -> Option<String> {
    let required: HashSet<&str> = chain.iter().flat_map(|p| p.param_names()).collect();
    let supplied: HashSet<&str> = params.iter().map(|&(k, _)| k).collect();
    if required != supplied {
        return None;
    }
    chain.iter().map(|p| p.fill(params)).collect()
}

fn collect_named<E>(table: &RoutingTable<E>, namespace: &str, prefix: &str, out: &mut Vec<NamedRoute>) {
    for rule in table.rules() {
        let pattern = format!("{prefix}{}", rule.pattern());
        match (rule.handler(), rule.name()) {
            (Handler::Endpoint(_), Some(name)) => out.push(NamedRoute {
                name: format!("{namespace}{name}"),
                pattern,
            }),
            (Handler::Endpoint(_), None) => {}
            (Handler::SubRouter(inner), Some(ns)) => {
                collect_named(inner, &format!("{namespace}{ns}:"), &pattern, out);
            }
            (Handler::SubRouter(inner), None) => collect_named(inner, namespace, &pattern, out),
        }
    }
}
