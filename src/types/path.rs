use std::fmt;
use std::str::FromStr;

use super::error::PathError;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named object member.
    Key(String),
    /// `*`: every element of an array.
    Wildcard,
}

impl Segment {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }

    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Wildcard => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Wildcard => f.write_str("*"),
        }
    }
}

/// A resolved field address such as `items.*.name`.
///
/// Always has at least one segment and always starts with a key, since the
/// root of every inferred schema is an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Resolve a dotted or bracketed path string.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for empty paths, empty segments, unterminated
    /// brackets or a leading wildcard.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        crate::parse::parse_path(input)
    }

    pub(crate) fn from_segments(segments: Vec<Segment>) -> Self {
        debug_assert!(matches!(segments.first(), Some(Segment::Key(_))));
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments. Never zero.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The top-level field name.
    #[must_use]
    pub fn root_key(&self) -> &str {
        match self.segments.first() {
            Some(Segment::Key(k)) => k,
            _ => "",
        }
    }

    /// Whether `self` is a strict prefix of `other`.
    #[must_use]
    pub fn is_parent_of(&self, other: &FieldPath) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// Append `child` below this path.
    #[must_use]
    pub fn join(&self, child: &FieldPath) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());
        FieldPath { segments }
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}
