use tracing::debug;

use crate::{RuleSet, RuleToken};

/// How `required`/`nullable`/`sometimes` combine when several sources
/// describe the same field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PresencePolicy {
    /// The latest source that mentions a field decides its presence. Its
    /// type, format and bound tokens still accumulate with earlier ones.
    #[default]
    LatestSource,
    /// Every presence token from every source is kept.
    Accumulate,
}

/// Merge rule sets given in precedence order (structured validators first,
/// inline calls second).
///
/// The result is the path-wise union in first-seen order. When a later set
/// repeats a path, its tokens are appended after the earlier ones so the
/// usual last-type-wins and cumulative-bounds rules apply. An empty input
/// gives an empty set; a single set is returned unchanged.
#[must_use]
pub fn merge(sets: Vec<RuleSet>, policy: PresencePolicy) -> RuleSet {
    let mut sets = sets.into_iter();
    let Some(mut merged) = sets.next() else {
        return RuleSet::new();
    };

    for set in sets {
        for (path, tokens) in set {
            if policy == PresencePolicy::LatestSource {
                if let Some(existing) = merged.get_mut(&path) {
                    let before = existing.len();
                    existing.retain(|t| !matches!(t, RuleToken::Presence(_)));
                    if existing.len() != before {
                        debug!(field = %path, "later rule source overrides presence");
                    }
                }
            }
            merged.insert(path, tokens);
        }
    }
    merged
}
