//! Routing tables and dispatch.
//!
//! # Responsibilities
//! - Store ordered rules (pattern, handler, optional name)
//! - Resolve a path to an endpoint, descending through sub-routers
//! - Return the matched endpoint or an explicit `NotFound`
//!
//! # Design Decisions
//! - Immutable after construction (shared across threads without locks)
//! - First match wins: declaration order is the only priority
//! - O(n) scan per level; rule counts are small
//! - Sub-routers are held by `Arc`, so one child can be mounted under
//!   several prefixes and a rebuilt table can reuse unchanged children
//! - Shadowing is the caller's concern and is not detected

use std::fmt;
use std::sync::Arc;

use crate::routing::error::{BuildError, PatternError};
use crate::routing::params::Params;
use crate::routing::pattern::PathPattern;

/// What a rule hands the remaining path to.
pub enum Handler<E> {
    /// Terminal: the endpoint receives the remaining path as-is.
    Endpoint(E),
    /// Non-terminal: the remaining path is dispatched against another table.
    SubRouter(Arc<RoutingTable<E>>),
}

impl<E> Handler<E> {
    pub fn is_endpoint(&self) -> bool {
        matches!(self, Handler::Endpoint(_))
    }
}

impl<E: fmt::Debug> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Endpoint(endpoint) => f.debug_tuple("Endpoint").field(endpoint).finish(),
            Handler::SubRouter(table) => f.debug_tuple("SubRouter").field(table).finish(),
        }
    }
}

impl<E> Clone for Handler<E>
where
    E: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Handler::Endpoint(endpoint) => Handler::Endpoint(endpoint.clone()),
            Handler::SubRouter(table) => Handler::SubRouter(Arc::clone(table)),
        }
    }
}

/// One entry of a routing table.
#[derive(Debug, Clone)]
pub struct Rule<E> {
    pattern: PathPattern,
    handler: Handler<E>,
    name: Option<String>,
}

impl<E> Rule<E> {
    /// Compile `pattern` into a rule.
    pub fn new(pattern: &str, handler: Handler<E>, name: Option<String>) -> Result<Self, PatternError> {
        Ok(Self::from_pattern(PathPattern::parse(pattern)?, handler, name))
    }

    pub fn from_pattern(pattern: PathPattern, handler: Handler<E>, name: Option<String>) -> Self {
        Self {
            pattern,
            handler,
            name,
        }
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &Handler<E> {
        &self.handler
    }

    /// Route name on an endpoint rule, namespace on a sub-router rule.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// An ordered, immutable list of rules.
#[derive(Debug, Clone)]
pub struct RoutingTable<E> {
    rules: Vec<Rule<E>>,
}

/// Outcome of [`RoutingTable::dispatch`].
#[derive(Debug)]
pub enum Dispatch<'a, E> {
    Matched(RouteMatch<'a, E>),
    NotFound,
}

impl<'a, E> Dispatch<'a, E> {
    pub fn is_match(&self) -> bool {
        matches!(self, Dispatch::Matched(_))
    }

    pub fn into_match(self) -> Option<RouteMatch<'a, E>> {
        match self {
            Dispatch::Matched(m) => Some(m),
            Dispatch::NotFound => None,
        }
    }
}

/// A resolved endpoint together with everything dispatch learned on the way.
#[derive(Debug)]
pub struct RouteMatch<'a, E> {
    pub endpoint: &'a E,
    /// The part of the path no pattern consumed, possibly empty.
    pub remaining: &'a str,
    pub params: Params<'a>,
    /// Name of the endpoint rule, if it has one.
    pub name: Option<&'a str>,
    /// Namespaces of the sub-routers passed through, outermost first.
    pub namespaces: Vec<&'a str>,
    /// Index of the matched rule at each level, outermost first.
    pub trail: Vec<usize>,
}

impl<E> RouteMatch<'_, E> {
    /// `ns:...:name`, or `None` for an unnamed endpoint.
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.name?;
        if self.namespaces.is_empty() {
            return Some(name.to_string());
        }
        let mut qualified = self.namespaces.join(":");
        qualified.push(':');
        qualified.push_str(name);
        Some(qualified)
    }
}

impl<E> RoutingTable<E> {
    pub fn builder() -> RoutingTableBuilder<E> {
        RoutingTableBuilder::new()
    }

    /// A table from already-compiled rules.
    pub fn from_rules(rules: Vec<Rule<E>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule<E>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve `path` to an endpoint.
    ///
    /// Rules are tried in declaration order and the first whose pattern
    /// matches a prefix of the path is taken. A sub-router receives the
    /// unconsumed suffix and its outcome is the outcome of the whole
    /// dispatch: if nothing inside it matches, the result is `NotFound`
    /// and later rules of the outer table are not consulted.
    pub fn dispatch<'a>(&'a self, path: &'a str) -> Dispatch<'a, E> {
        let mut table = self;
        let mut rest = path;
        let mut params = Params::new();
        let mut namespaces = Vec::new();
        let mut trail = Vec::new();

        'levels: loop {
            for (index, rule) in table.rules.iter().enumerate() {
                let Some(remaining) = rule.pattern.match_prefix(rest, &mut params) else {
                    continue;
                };
                trail.push(index);

                match &rule.handler {
                    Handler::Endpoint(endpoint) => {
                        return Dispatch::Matched(RouteMatch {
                            endpoint,
                            remaining,
                            params,
                            name: rule.name.as_deref(),
                            namespaces,
                            trail,
                        });
                    }
                    Handler::SubRouter(inner) => {
                        if let Some(namespace) = rule.name.as_deref() {
                            namespaces.push(namespace);
                        }
                        table = inner.as_ref();
                        rest = remaining;
                        continue 'levels;
                    }
                }
            }

            tracing::trace!(path = %path, depth = trail.len(), "No rule matched");
            return Dispatch::NotFound;
        }
    }
}

impl<E> Default for RoutingTable<E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

/// Collects rule declarations and compiles them in one step.
///
/// Pattern and name errors are reported by [`build`](Self::build), tagged
/// with the index of the offending declaration.
pub struct RoutingTableBuilder<E> {
    declarations: Vec<Declaration<E>>,
}

struct Declaration<E> {
    pattern: String,
    literal: bool,
    handler: Handler<E>,
    name: Option<String>,
}

impl<E> RoutingTableBuilder<E> {
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Declare a rule with any handler.
    pub fn rule(mut self, pattern: impl Into<String>, handler: Handler<E>, name: Option<String>) -> Self {
        self.declarations.push(Declaration {
            pattern: pattern.into(),
            literal: false,
            handler,
            name,
        });
        self
    }

    pub fn route(self, pattern: impl Into<String>, endpoint: E) -> Self {
        self.rule(pattern, Handler::Endpoint(endpoint), None)
    }

    pub fn route_named(self, pattern: impl Into<String>, endpoint: E, name: impl Into<String>) -> Self {
        self.rule(pattern, Handler::Endpoint(endpoint), Some(name.into()))
    }

    /// An endpoint rule whose pattern is matched verbatim, braces included.
    pub fn literal_route(mut self, prefix: impl Into<String>, endpoint: E) -> Self {
        self.declarations.push(Declaration {
            pattern: prefix.into(),
            literal: true,
            handler: Handler::Endpoint(endpoint),
            name: None,
        });
        self
    }

    /// Mount `table` under `pattern`. Its route names stay reachable unqualified.
    pub fn include(self, pattern: impl Into<String>, table: impl Into<Arc<RoutingTable<E>>>) -> Self {
        self.rule(pattern, Handler::SubRouter(table.into()), None)
    }

    /// Mount `table` under `pattern`; its routes reverse as `namespace:name`.
    pub fn include_namespaced(
        self,
        pattern: impl Into<String>,
        table: impl Into<Arc<RoutingTable<E>>>,
        namespace: impl Into<String>,
    ) -> Self {
        self.rule(pattern, Handler::SubRouter(table.into()), Some(namespace.into()))
    }

    pub fn build(self) -> Result<RoutingTable<E>, BuildError> {
        let mut rules = Vec::with_capacity(self.declarations.len());

        for (index, declaration) in self.declarations.into_iter().enumerate() {
            if let Some(name) = &declaration.name {
                if name.is_empty() || name.contains(':') {
                    return Err(BuildError::InvalidName {
                        index,
                        name: name.clone(),
                    });
                }
            }

            let pattern = if declaration.literal {
                PathPattern::literal(declaration.pattern)
            } else {
                PathPattern::parse(&declaration.pattern).map_err(|source| BuildError::InvalidPattern {
                    index,
                    pattern: declaration.pattern.clone(),
                    source,
                })?
            };

            rules.push(Rule::from_pattern(pattern, declaration.handler, declaration.name));
        }

        Ok(RoutingTable { rules })
    }
}

impl<E> Default for RoutingTableBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
