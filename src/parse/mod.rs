mod error;
mod grammar;
mod parser;

pub use error::UnrecognizedToken;
pub(crate) use parser::{resolve_entries, Limits};

use crate::{
    DEFAULT_MAX_PATH_DEPTH, ExtractionFailure, FieldPath, PathError, RawRules, RuleToken, Segment,
};

/// Parse a single rule token such as `required`, `max:255` or `in:a,b`.
///
/// # Errors
///
/// Returns [`UnrecognizedToken`] for anything outside the known vocabulary,
/// including known names with arguments of the wrong shape.
pub fn parse_token(input: &str) -> Result<RuleToken, UnrecognizedToken> {
    use winnow::Parser;
    let input = input.trim();
    match grammar::rule_token.parse(input) {
        Ok((name, args)) => grammar::classify(name, &args).ok_or_else(|| {
            UnrecognizedToken::new(name, args.iter().map(|a| a.trim().to_owned()).collect())
        }),
        Err(_) => Err(UnrecognizedToken::new(input, Vec::new())),
    }
}

/// Normalize raw rules into an ordered token list.
///
/// `"required|string"` and `["required", "string"]` produce the same list.
/// Unrecognized tokens are kept as [`RuleToken::Unknown`]; blank tokens are
/// dropped. Nested validators become a single [`RuleToken::Nested`].
///
/// # Errors
///
/// Returns [`ExtractionFailure`] when a nested validator contains a malformed
/// path, nests deeper than `max_depth`, or holds a path longer than
/// [`DEFAULT_MAX_PATH_DEPTH`] segments.
pub fn parse_rules(raw: &RawRules, max_depth: usize) -> Result<Vec<RuleToken>, ExtractionFailure> {
    let limits = Limits {
        nesting: max_depth,
        path: DEFAULT_MAX_PATH_DEPTH,
    };
    parser::normalize_detached(raw, limits)
}

/// Resolve a dotted or bracketed field path.
///
/// `a.b`, `tags.*`, `tags[]`, `tags[*]` and `meta[key]` are accepted. A path
/// without separators is a single top-level field.
///
/// # Errors
///
/// Returns [`PathError`] for the empty path, empty segments, unterminated
/// brackets and paths starting with a wildcard.
pub fn parse_path(input: &str) -> Result<FieldPath, PathError> {
    use winnow::Parser;

    if input.is_empty() {
        return Err(PathError::Empty);
    }
    let components = grammar::field_path.parse(input).map_err(|_| {
        if input.matches('[').count() > input.matches(']').count() {
            PathError::UnclosedBracket {
                path: input.to_owned(),
            }
        } else {
            PathError::Malformed {
                path: input.to_owned(),
            }
        }
    })?;

    let mut segments = Vec::new();
    for component in components {
        if component.head.is_empty() {
            return Err(PathError::EmptySegment {
                path: input.to_owned(),
                index: segments.len(),
            });
        }
        segments.push(segment(component.head));
        for inner in component.brackets {
            if inner.is_empty() {
                segments.push(Segment::Wildcard);
            } else {
                segments.push(segment(inner));
            }
        }
    }

    if segments.first().is_some_and(Segment::is_wildcard) {
        return Err(PathError::LeadingWildcard {
            path: input.to_owned(),
        });
    }
    Ok(FieldPath::from_segments(segments))
}

fn segment(text: &str) -> Segment {
    if text == "*" {
        Segment::Wildcard
    } else {
        Segment::Key(text.to_owned())
    }
}
