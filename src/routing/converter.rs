//! Placeholder converters.
//!
//! A converter decides which spans of the path a `{name:converter}`
//! placeholder may capture, and whether a value supplied for reverse lookup
//! is acceptable.

use std::fmt;

/// Length of a canonical hyphenated UUID.
const UUID_LEN: usize = 36;

/// The set of characters a placeholder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Converter {
    /// One or more characters, excluding `/`.
    #[default]
    Str,
    /// One or more ASCII digits.
    Int,
    /// One or more ASCII letters, digits, hyphens or underscores.
    Slug,
    /// A lowercase hyphenated UUID (`8-4-4-4-12` hex digits).
    Uuid,
    /// One or more characters, `/` included.
    Path,
}

impl Converter {
    /// Look up a converter by the name used in pattern strings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Converter::Str),
            "int" => Some(Converter::Int),
            "slug" => Some(Converter::Slug),
            "uuid" => Some(Converter::Uuid),
            "path" => Some(Converter::Path),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Converter::Str => "str",
            Converter::Int => "int",
            Converter::Slug => "slug",
            Converter::Uuid => "uuid",
            Converter::Path => "path",
        }
    }

    fn accepts_char(self, c: char) -> bool {
        match self {
            Converter::Str => c != '/',
            Converter::Int => c.is_ascii_digit(),
            Converter::Slug => c.is_ascii_alphanumeric() || c == '-' || c == '_',
            Converter::Uuid => (c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) || c == '-',
            Converter::Path => true,
        }
    }

    /// Returns true if `value` could have been captured by this converter.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Converter::Uuid => is_uuid(value),
            _ => !value.is_empty() && value.chars().all(|c| self.accepts_char(c)),
        }
    }

    /// Byte lengths this converter may consume from the start of `input`,
    /// longest first.
    pub(crate) fn spans(self, input: &str) -> impl Iterator<Item = usize> + '_ {
        let end = match self {
            Converter::Uuid => match input.get(..UUID_LEN) {
                Some(head) if is_uuid(head) => UUID_LEN,
                _ => 0,
            },
            _ => input
                .char_indices()
                .find(|&(_, c)| !self.accepts_char(c))
                .map(|(i, _)| i)
                .unwrap_or(input.len()),
        };
        // A uuid has exactly one admissible length.
        let count = if self == Converter::Uuid { 1 } else { end };

        input[..end]
            .char_indices()
            .rev()
            .map(|(i, c)| i + c.len_utf8())
            .take(count)
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_uuid(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == UUID_LEN
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_digit() || (b'a'..=b'f').contains(&b),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_stops_at_slash() {
        assert_eq!(Converter::Str.spans("abc/def").collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(Converter::Str.spans("/abc").count(), 0);
    }

    #[test]
    fn test_int_spans() {
        assert_eq!(Converter::Int.spans("42/").collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(Converter::Int.spans("x42").count(), 0);
        assert!(Converter::Int.accepts("007"));
        assert!(!Converter::Int.accepts("-1"));
        assert!(!Converter::Int.accepts(""));
    }

    #[test]
    fn test_path_spans_include_slash() {
        assert_eq!(Converter::Path.spans("a/b").collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_multibyte_boundaries() {
        // "é" is two bytes; spans must land on char boundaries.
        assert_eq!(Converter::Str.spans("é/").collect::<Vec<_>>(), vec![2]);
        assert_eq!(Converter::Slug.spans("ab-é").collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_uuid() {
        let id = "0f8fad5b-d9cb-469f-a165-70867728950e";
        assert!(Converter::Uuid.accepts(id));
        assert!(!Converter::Uuid.accepts(&id.to_uppercase()));
        assert_eq!(Converter::Uuid.spans(&format!("{id}/rest")).collect::<Vec<_>>(), vec![36]);
        assert_eq!(Converter::Uuid.spans("0f8fad5b").count(), 0);
    }

    #[test]
    fn test_names_round_trip() {
        for c in [
            Converter::Str,
            Converter::Int,
            Converter::Slug,
            Converter::Uuid,
            Converter::Path,
        ] {
            assert_eq!(Converter::from_name(c.name()), Some(c));
        }
        assert_eq!(Converter::from_name("float"), None);
    }
}
