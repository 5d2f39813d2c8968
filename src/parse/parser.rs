use tracing::debug;
use winnow::Parser;

use crate::{ExtractionFailure, RawRules, RuleSet, RuleToken};

use super::{grammar, parse_path, parse_token};

/// How deep rules may go before resolution gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limits {
    /// Nested validators stacked inside each other.
    pub nesting: usize,
    /// Segments of a field path, counted from the top-level object through
    /// any nested validators.
    pub path: usize,
}

/// Resolve one source's raw entries into a [`RuleSet`].
pub(crate) fn resolve_entries(
    entries: &[(String, RawRules)],
    limits: Limits,
) -> Result<RuleSet, ExtractionFailure> {
    resolve_at(entries, &Owner::root(), limits)
}

/// The field a nested validator belongs to.
struct Owner<'a> {
    /// Full dotted path, used in errors and logs.
    name: &'a str,
    /// Segments of that path, nesting included.
    segments: usize,
    /// Nested validators enclosing it.
    depth: usize,
}

impl Owner<'_> {
    fn root() -> Owner<'static> {
        Owner {
            name: "",
            segments: 0,
            depth: 0,
        }
    }
}

fn resolve_at(
    entries: &[(String, RawRules)],
    owner: &Owner<'_>,
    limits: Limits,
) -> Result<RuleSet, ExtractionFailure> {
    let mut set = RuleSet::new();
    for (raw_path, raw) in entries {
        let full = if owner.name.is_empty() {
            raw_path.clone()
        } else {
            format!("{}.{raw_path}", owner.name)
        };
        let path = parse_path(raw_path).map_err(|source| ExtractionFailure::Path {
            path: full.clone(),
            source,
        })?;
        let segments = owner.segments + path.depth();
        if segments > limits.path {
            return Err(ExtractionFailure::PathTooDeep {
                path: full,
                limit: limits.path,
            });
        }
        let field = Owner {
            name: &full,
            segments,
            depth: owner.depth,
        };
        let tokens = normalize(raw, &field, limits)?;
        set.insert(path, tokens);
    }
    Ok(set)
}

/// Normalize raw rules for one field into tokens.
fn normalize(
    raw: &RawRules,
    owner: &Owner<'_>,
    limits: Limits,
) -> Result<Vec<RuleToken>, ExtractionFailure> {
    match raw {
        RawRules::Joined(text) => {
            let parts = grammar::rule_list
                .parse(text.as_str())
                .unwrap_or_else(|_| vec![text.as_str()]);
            Ok(tokens(owner.name, parts))
        }
        RawRules::Split(parts) => Ok(tokens(owner.name, parts.iter().map(String::as_str))),
        RawRules::Nested(entries) => {
            if owner.depth >= limits.nesting {
                return Err(ExtractionFailure::NestingTooDeep {
                    path: owner.name.to_owned(),
                    limit: limits.nesting,
                });
            }
            let inner = Owner {
                depth: owner.depth + 1,
                ..*owner
            };
            let nested = resolve_at(entries, &inner, limits)?;
            Ok(vec![RuleToken::Nested(nested)])
        }
    }
}

/// Normalize rules that belong to no particular field.
pub(crate) fn normalize_detached(
    raw: &RawRules,
    limits: Limits,
) -> Result<Vec<RuleToken>, ExtractionFailure> {
    normalize(raw, &Owner::root(), limits)
}

fn tokens<'a>(owner: &str, parts: impl IntoIterator<Item = &'a str>) -> Vec<RuleToken> {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            parse_token(part).unwrap_or_else(|unrecognized| {
                debug!(field = owner, "{unrecognized}; ignored for schema inference");
                unrecognized.into_token()
            })
        })
        .collect()
}
