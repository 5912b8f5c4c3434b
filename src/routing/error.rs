//! Routing error types.
//!
//! Every error here is raised while a table is being built or while a path
//! is being reconstructed from a route name. Dispatch itself has no error
//! path: an unmatched request is a [`Dispatch::NotFound`](super::Dispatch)
//! value.

use thiserror::Error;

/// A pattern string that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unclosed '{{' starting at byte {position}")]
    UnclosedBrace { position: usize },

    #[error("unexpected '}}' at byte {position}")]
    UnexpectedCloseBrace { position: usize },

    #[error("placeholder at byte {position} has no parameter name")]
    EmptyParameterName { position: usize },

    #[error("invalid parameter name {name:?}")]
    InvalidParameterName { name: String },

    #[error("unknown converter {converter:?} for parameter {name:?}")]
    UnknownConverter { name: String, converter: String },

    #[error("parameter {name:?} appears more than once")]
    DuplicateParameter { name: String },

    #[error("parameters {first:?} and {second:?} are adjacent with no literal between them")]
    AdjacentParameters { first: String, second: String },
}

/// A routing table declaration that cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("rule #{index} ({pattern:?}): {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("rule #{index}: invalid name {name:?} (names must be non-empty and must not contain ':')")]
    InvalidName { index: usize, name: String },
}

/// Failure to construct a path from a route name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReverseError {
    #[error("no route named {name:?}")]
    UnknownRoute { name: String },

    #[error("route {name:?} exists but no declaration accepts parameters [{params}]")]
    NoMatch { name: String, params: String },
}
