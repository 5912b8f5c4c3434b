//! Path pattern compilation and prefix matching.
//!
//! # Responsibilities
//! - Compile pattern strings (`"admin/"`, `"items/{id:int}/"`) once, at
//!   table construction
//! - Match a pattern against a prefix of a request path
//! - Capture placeholder values into [`Params`]
//! - Fill placeholders back in for reverse lookup
//!
//! # Design Decisions
//! - Matching is case-sensitive and works on the raw path
//! - A pattern only ever matches a prefix; the rest of the path is returned
//! - Placeholders try their longest span first and backtrack within the
//!   one pattern, never across rules
//! - No regex: literals are compared with `starts_with`, placeholders scan
//!   characters through their [`Converter`]

use std::collections::HashSet;
use std::fmt;

use crate::routing::converter::Converter;
use crate::routing::error::PatternError;
use crate::routing::params::Params;

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches iff the path starts with the string. The empty literal
    /// matches every path.
    Literal(String),
    /// Literal text interleaved with `{name}` / `{name:converter}` placeholders.
    Parametrized(ParamPattern),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPattern {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, converter: Converter },
}

impl PathPattern {
    /// Compile a pattern string.
    ///
    /// Strings without braces become [`PathPattern::Literal`].
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.contains(|c: char| c == '{' || c == '}') {
            Ok(PathPattern::Parametrized(ParamPattern::parse(source)?))
        } else {
            Ok(PathPattern::Literal(source.to_string()))
        }
    }

    /// A literal prefix, taken verbatim even if it contains braces.
    pub fn literal(prefix: impl Into<String>) -> Self {
        PathPattern::Literal(prefix.into())
    }

    /// The pattern as it was declared.
    pub fn as_str(&self) -> &str {
        match self {
            PathPattern::Literal(prefix) => prefix,
            PathPattern::Parametrized(pattern) => &pattern.source,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, PathPattern::Literal(_))
    }

    /// Names of the placeholders, in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        match self {
            PathPattern::Literal(_) => Vec::new(),
            PathPattern::Parametrized(pattern) => pattern
                .segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Param { name, .. } => Some(name.as_str()),
                    Segment::Literal(_) => None,
                })
                .collect(),
        }
    }

    /// Match the pattern against a prefix of `path`.
    ///
    /// On success the captures are appended to `params` and the unconsumed
    /// suffix is returned. On failure `params` is left untouched.
    pub fn match_prefix<'a>(&'a self, path: &'a str, params: &mut Params<'a>) -> Option<&'a str> {
        match self {
            PathPattern::Literal(prefix) => path.strip_prefix(prefix.as_str()),
            PathPattern::Parametrized(pattern) => pattern.match_prefix(path, params),
        }
    }

    /// Substitute values for every placeholder.
    ///
    /// Returns `None` if a placeholder has no value or its converter rejects
    /// the value.
    pub(crate) fn fill(&self, values: &[(&str, &str)]) -> Option<String> {
        match self {
            PathPattern::Literal(prefix) => Some(prefix.clone()),
            PathPattern::Parametrized(pattern) => pattern.fill(values),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParamPattern {
    fn parse(source: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut seen = HashSet::new();
        let mut pos = 0;

        while pos < source.len() {
            let tail = &source[pos..];
            let Some(offset) = tail.find(|c: char| c == '{' || c == '}') else {
                literal.push_str(tail);
                break;
            };
            literal.push_str(&tail[..offset]);

            let open = pos + offset;
            if source.as_bytes()[open] == b'}' {
                return Err(PatternError::UnexpectedCloseBrace { position: open });
            }

            let body_start = open + 1;
            let close = match source[body_start..].find(|c: char| c == '{' || c == '}') {
                Some(i) if source.as_bytes()[body_start + i] == b'}' => body_start + i,
                _ => return Err(PatternError::UnclosedBrace { position: open }),
            };

            let body = &source[body_start..close];
            let (name, converter) = match body.split_once(':') {
                Some((name, converter)) => (name, Some(converter)),
                None => (body, None),
            };

            if name.is_empty() {
                return Err(PatternError::EmptyParameterName { position: open });
            }
            if !is_identifier(name) {
                return Err(PatternError::InvalidParameterName {
                    name: name.to_string(),
                });
            }
            let converter = match converter {
                None => Converter::default(),
                Some(c) => Converter::from_name(c).ok_or_else(|| PatternError::UnknownConverter {
                    name: name.to_string(),
                    converter: c.to_string(),
                })?,
            };
            if !seen.insert(name) {
                return Err(PatternError::DuplicateParameter {
                    name: name.to_string(),
                });
            }

            if literal.is_empty() {
                if let Some(Segment::Param { name: previous, .. }) = segments.last() {
                    return Err(PatternError::AdjacentParameters {
                        first: previous.clone(),
                        second: name.to_string(),
                    });
                }
            } else {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Param {
                name: name.to_string(),
                converter,
            });

            pos = close + 1;
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    fn match_prefix<'a>(&'a self, path: &'a str, params: &mut Params<'a>) -> Option<&'a str> {
        let mut spans = Vec::new();
        let mut dead_ends = DeadEnds::new(self.segments.len(), path.len());
        let end = match_segments(&self.segments, 0, path, 0, &mut spans, &mut dead_ends)?;

        let names = self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        });
        for (name, (start, stop)) in names.zip(spans) {
            params.push(name, &path[start..stop]);
        }

        Some(&path[end..])
    }

    fn fill(&self, values: &[(&str, &str)]) -> Option<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param { name, converter } => {
                    let value = values.iter().rfind(|(k, _)| *k == name.as_str()).map(|&(_, v)| v)?;
                    if !converter.accepts(value) {
                        return None;
                    }
                    out.push_str(value);
                }
            }
        }
        Some(out)
    }
}

/// Match `segments[index..]` against `path` starting at byte `offset`.
///
/// Returns the end offset of the match. `spans` receives one `(start, end)`
/// pair per placeholder and is restored on failure. Whether a suffix of the
/// pattern matches from a given offset never depends on earlier captures, so
/// a failed `(index, offset)` is recorded in `dead_ends` and never retried.
/// Each placeholder is expanded at most once per offset.
fn match_segments(
    segments: &[Segment],
    index: usize,
    path: &str,
    offset: usize,
    spans: &mut Vec<(usize, usize)>,
    dead_ends: &mut DeadEnds,
) -> Option<usize> {
    let Some(segment) = segments.get(index) else {
        return Some(offset);
    };

    match segment {
        Segment::Literal(text) => {
            if path[offset..].starts_with(text.as_str()) {
                match_segments(segments, index + 1, path, offset + text.len(), spans, dead_ends)
            } else {
                None
            }
        }
        Segment::Param { converter, .. } => {
            if dead_ends.contains(index, offset) {
                return None;
            }
            let mark = spans.len();
            for len in converter.spans(&path[offset..]) {
                spans.push((offset, offset + len));
                if let Some(end) = match_segments(segments, index + 1, path, offset + len, spans, dead_ends) {
                    return Some(end);
                }
                spans.truncate(mark);
            }
            dead_ends.insert(index, offset);
            None
        }
    }
}

/// `(segment index, offset)` pairs known not to lead to a match.
///
/// Allocated on the first failure, so patterns that match straight away
/// never pay for it.
struct DeadEnds {
    width: usize,
    cells: usize,
    failed: Vec<bool>,
}

impl DeadEnds {
    fn new(segments: usize, path_len: usize) -> Self {
        Self {
            width: path_len + 1,
            cells: segments * (path_len + 1),
            failed: Vec::new(),
        }
    }

    fn contains(&self, index: usize, offset: usize) -> bool {
        self.failed.get(index * self.width + offset).copied().unwrap_or(false)
    }

    fn insert(&mut self, index: usize, offset: usize) {
        if self.failed.is_empty() {
            self.failed.resize(self.cells, false);
        }
        self.failed[index * self.width + offset] = true;
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched<'a>(pattern: &'a PathPattern, path: &'a str) -> Option<(&'a str, Params<'a>)> {
        let mut params = Params::new();
        pattern
            .match_prefix(path, &mut params)
            .map(|rest| (rest, params))
    }

    #[test]
    fn test_literal_prefix() {
        let pattern = PathPattern::parse("admin/").unwrap();
        assert!(pattern.is_literal());

        let (rest, params) = matched(&pattern, "admin/users/").unwrap();
        assert_eq!(rest, "users/");
        assert!(params.is_empty());

        assert_eq!(matched(&pattern, "admin/").unwrap().0, "");
        assert!(matched(&pattern, "Admin/").is_none()); // case-sensitive
        assert!(matched(&pattern, "admin").is_none());
    }

    #[test]
    fn test_empty_literal_matches_everything() {
        let pattern = PathPattern::parse("").unwrap();
        assert_eq!(matched(&pattern, "anything/else").unwrap().0, "anything/else");
        assert_eq!(matched(&pattern, "").unwrap().0, "");
    }

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("items/{id:int}/").unwrap();
        let (rest, params) = matched(&pattern, "items/42/edit").unwrap();
        assert_eq!(rest, "edit");
        assert_eq!(params.get("id"), Some("42"));

        assert!(matched(&pattern, "items/abc/").is_none());
    }

    #[test]
    fn test_trailing_param_is_prefix() {
        let pattern = PathPattern::parse("users/{name}").unwrap();
        let (rest, params) = matched(&pattern, "users/ada/posts").unwrap();
        assert_eq!(params.get("name"), Some("ada"));
        assert_eq!(rest, "/posts");
    }

    #[test]
    fn test_backtracking_within_pattern() {
        let pattern = PathPattern::parse("{a}-{b}/").unwrap();
        let (rest, params) = matched(&pattern, "x-y-z/tail").unwrap();
        assert_eq!(params.get("a"), Some("x-y"));
        assert_eq!(params.get("b"), Some("z"));
        assert_eq!(rest, "tail");
    }

    #[test]
    fn test_path_converter_spans_slashes() {
        let pattern = PathPattern::parse("files/{rest:path}/raw").unwrap();
        let (rest, params) = matched(&pattern, "files/a/b/c/raw").unwrap();
        assert_eq!(params.get("rest"), Some("a/b/c"));
        assert_eq!(rest, "");
    }

    #[test]
    fn test_failed_match_leaves_params_untouched() {
        let pattern = PathPattern::parse("{a}/{b:int}/").unwrap();
        let mut params = Params::new();
        params.push("outer", "1");
        assert!(pattern.match_prefix("x/y/", &mut params).is_none());
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_literal_constructor_keeps_braces() {
        let pattern = PathPattern::literal("{raw}/");
        assert!(pattern.is_literal());
        assert_eq!(matched(&pattern, "{raw}/x").unwrap().0, "x");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            PathPattern::parse("items/{id"),
            Err(PatternError::UnclosedBrace { position: 6 })
        );
        assert_eq!(
            PathPattern::parse("items/{a{b}}"),
            Err(PatternError::UnclosedBrace { position: 6 })
        );
        assert_eq!(
            PathPattern::parse("items/}"),
            Err(PatternError::UnexpectedCloseBrace { position: 6 })
        );
        assert_eq!(
            PathPattern::parse("{}/"),
            Err(PatternError::EmptyParameterName { position: 0 })
        );
        assert_eq!(
            PathPattern::parse("{:int}/"),
            Err(PatternError::EmptyParameterName { position: 0 })
        );
        assert!(matches!(
            PathPattern::parse("{1d}/"),
            Err(PatternError::InvalidParameterName { .. })
        ));
        assert!(matches!(
            PathPattern::parse("{id:float}/"),
            Err(PatternError::UnknownConverter { .. })
        ));
        assert!(matches!(
            PathPattern::parse("{id}/{id}/"),
            Err(PatternError::DuplicateParameter { .. })
        ));
        assert!(matches!(
            PathPattern::parse("{a}{b}/"),
            Err(PatternError::AdjacentParameters { .. })
        ));
    }

    #[test]
    fn test_fill() {
        let pattern = PathPattern::parse("items/{id:int}/{slug:slug}/").unwrap();
        assert_eq!(
            pattern.fill(&[("id", "42"), ("slug", "hello-world")]),
            Some("items/42/hello-world/".to_string())
        );
        assert_eq!(pattern.fill(&[("id", "x"), ("slug", "ok")]), None);
        assert_eq!(pattern.fill(&[("id", "42")]), None);
        assert_eq!(pattern.param_names(), vec!["id", "slug"]);
    }

    #[test]
    fn test_backtracking_after_dead_ends() {
        let pattern = PathPattern::parse("{a}-{b}-{c}/end").unwrap();

        let (rest, params) = matched(&pattern, "x-y-z-w/end/more").unwrap();
        assert_eq!(rest, "/more");
        assert_eq!(params.get("a"), Some("x-y"));
        assert_eq!(params.get("b"), Some("z"));
        assert_eq!(params.get("c"), Some("w"));

        let long = "x-".repeat(300);
        assert!(matched(&pattern, &long).is_none());
        let hit = format!("{long}z/end");
        let (_, params) = matched(&pattern, &hit).unwrap();
        assert_eq!(params.get("c"), Some("z"));
    }
}
