//! Query path grammar
//!
//! A query path is a `/`-separated list of segments:
//!
//! ```text
//! path        := segment ("/" segment)*
//! segment     := identifier | identifier "[" index "]"
//! index       := integer | mapKey
//! ```
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `name` | Object property | `value` |
//! | `name[n]` | Array element | `items[2]` |
//! | `name[key]` | Map entry | `mapStr[keyExists]` |
//!
//! Whether an index addresses an array or a map is decided by the schema in
//! scope when the segment is consumed, not by the grammar.
//!
//! # Examples
//!
//! ```
//! use schemapath_core::path::{parse_path, Segment};
//!
//! let segments = parse_path("/value/items[2]").unwrap();
//! assert_eq!(segments[0], Segment::new("value"));
//! assert_eq!(segments[1], Segment::indexed("items", "2"));
//! ```

use crate::error::{PathError, PathErrorReason};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between path segments
pub const PATH_SEPARATOR: char = '/';

/// Error type for segment parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Nothing between two separators
    #[error("empty segment")]
    EmptySegment,
    /// Index given without a property name, e.g. `[1]`
    #[error("empty property name")]
    EmptyName,
    /// `name[]`
    #[error("empty index")]
    EmptyIndex,
    /// `[` without a matching `]`
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Stray bracket or trailing text after `]`
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

/// One step of a query path
///
/// # Examples
///
/// ```
/// use schemapath_core::path::Segment;
///
/// let seg: Segment = "abc[1]".parse().unwrap();
/// assert_eq!(seg.name(), "abc");
/// assert_eq!(seg.index(), Some("1"));
///
/// assert!("abc[]".parse::<Segment>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    name: String,
    index: Option<String>,
}

impl Segment {
    /// Plain property segment
    pub fn new(name: impl Into<String>) -> Self {
        Segment {
            name: name.into(),
            index: None,
        }
    }

    /// Indexed property segment
    pub fn indexed(name: impl Into<String>, index: impl Into<String>) -> Self {
        Segment {
            name: name.into(),
            index: Some(index.into()),
        }
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw index text, if any
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Check if the segment carries an index
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }
}

impl FromStr for Segment {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::EmptySegment);
        }

        let open = match s.find('[') {
            Some(open) => open,
            None => {
                if let Some(pos) = s.find(']') {
                    return Err(PathParseError::UnexpectedChar(']', pos));
                }
                return Ok(Segment::new(s));
            }
        };

        let name = &s[..open];
        if name.is_empty() {
            return Err(PathParseError::EmptyName);
        }
        if let Some(pos) = name.find(']') {
            return Err(PathParseError::UnexpectedChar(']', pos));
        }

        let close = match s[open + 1..].find(']') {
            Some(offset) => open + 1 + offset,
            None => return Err(PathParseError::UnclosedBracket(open)),
        };

        let index = &s[open + 1..close];
        if let Some(offset) = index.find('[') {
            return Err(PathParseError::UnexpectedChar('[', open + 1 + offset));
        }
        if let Some(c) = s[close + 1..].chars().next() {
            return Err(PathParseError::UnexpectedChar(c, close + 1));
        }
        if index.is_empty() {
            return Err(PathParseError::EmptyIndex);
        }

        Ok(Segment::indexed(name, index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Parse an index as an array position
///
/// Only plain decimal digits are accepted; signs, whitespace and values that
/// overflow `usize` return `None`.
pub fn array_index(index: &str) -> Option<usize> {
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok()
}

/// Parse a `/`-separated path into segments
///
/// One leading and one trailing separator are ignored, so `/value/value2`
/// and `value/value2` are equivalent. An empty path yields no segments.
///
/// On failure the returned [`PathError`] carries the segments consumed
/// before the malformed one as its prefix.
pub fn parse_path(path: &str) -> Result<Vec<Segment>, PathError> {
    let trimmed = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
    let trimmed = trimmed.strip_suffix(PATH_SEPARATOR).unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    let mut consumed = String::new();
    for raw in trimmed.split(PATH_SEPARATOR) {
        let segment = raw
            .parse::<Segment>()
            .map_err(|e| PathError::new(consumed.clone(), raw, PathErrorReason::Syntax(e)))?;
        consumed = join_path(&consumed, raw);
        segments.push(segment);
    }
    Ok(segments)
}

/// Split off the first component of a path
///
/// Returns `(head, rest)`; a leading separator is ignored and `rest` is empty
/// when the path has a single component.
///
/// ```
/// use schemapath_core::path::split_path;
///
/// assert_eq!(split_path("/schema1/data1/value"), ("schema1", "data1/value"));
/// assert_eq!(split_path("schema1"), ("schema1", ""));
/// ```
pub fn split_path(path: &str) -> (&str, &str) {
    let trimmed = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
    match trimmed.split_once(PATH_SEPARATOR) {
        Some((head, rest)) => (head, rest),
        None => (trimmed, ""),
    }
}

/// Join two path fragments with a separator, skipping empty sides
pub fn join_path(base: &str, tail: &str) -> String {
    match (base.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{}{}{}", base, PATH_SEPARATOR, tail),
    }
}
