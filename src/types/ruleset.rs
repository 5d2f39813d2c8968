use std::fmt;

use indexmap::IndexMap;

use super::error::ExtractionFailure;
use crate::parse::Limits;
use crate::Config;
use super::path::FieldPath;
use super::token::RuleToken;

/// Where a raw rule set was found. Sources are merged in this order, so
/// inline rules refine structured ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleOrigin {
    /// A reusable validator object (a form request, a rules class).
    Structured,
    /// An inline validation call inside the handler body.
    Inline,
}

/// Rules for one field as a [`RuleSource`](crate::RuleSource) found them,
/// before any parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRules {
    /// `"required|string|max:255"`
    Joined(String),
    /// `["required", "string", "max:255"]`
    Split(Vec<String>),
    /// A nested validator whose paths are relative to the owning field.
    Nested(Vec<(String, RawRules)>),
}

impl From<&str> for RawRules {
    fn from(v: &str) -> Self {
        RawRules::Joined(v.to_owned())
    }
}

impl From<String> for RawRules {
    fn from(v: String) -> Self {
        RawRules::Joined(v)
    }
}

impl From<Vec<String>> for RawRules {
    fn from(v: Vec<String>) -> Self {
        RawRules::Split(v)
    }
}

impl From<Vec<&str>> for RawRules {
    fn from(v: Vec<&str>) -> Self {
        RawRules::Split(v.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RawRules {
    fn from(v: [&str; N]) -> Self {
        RawRules::Split(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// One source's unparsed path → rules mapping.
///
/// # Example
///
/// ```
/// use rulescribe::RawRuleSet;
///
/// let raw = RawRuleSet::structured()
///     .provenance("StoreUserRequest::rules")
///     .field("name", "required|string|max:255")
///     .field("tags.*", ["string"]);
/// let rules = raw.resolve(32).unwrap();
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawRuleSet {
    pub origin: RuleOrigin,
    /// Free-form location of the declaration, used in log output.
    pub provenance: Option<String>,
    pub entries: Vec<(String, RawRules)>,
}

impl RawRuleSet {
    #[must_use]
    pub fn new(origin: RuleOrigin) -> Self {
        Self {
            origin,
            provenance: None,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn structured() -> Self {
        Self::new(RuleOrigin::Structured)
    }

    #[must_use]
    pub fn inline() -> Self {
        Self::new(RuleOrigin::Inline)
    }

    #[must_use]
    pub fn provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    #[must_use]
    pub fn field(mut self, path: impl Into<String>, rules: impl Into<RawRules>) -> Self {
        self.entries.push((path.into(), rules.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve paths and parse rule tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionFailure`] when a path is malformed or nested rules
    /// go deeper than `max_depth`. Paths are capped at
    /// [`DEFAULT_MAX_PATH_DEPTH`](crate::DEFAULT_MAX_PATH_DEPTH) segments.
    pub fn resolve(&self, max_depth: usize) -> Result<RuleSet, ExtractionFailure> {
        let limits = Limits {
            nesting: max_depth,
            path: crate::DEFAULT_MAX_PATH_DEPTH,
        };
        crate::parse::resolve_entries(&self.entries, limits)
    }

    /// Like [`resolve`](Self::resolve), with both limits taken from `config`.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve), plus
    /// [`ExtractionFailure::PathTooDeep`] for paths longer than
    /// [`Config::max_path_depth`].
    pub fn resolve_with(&self, config: &Config) -> Result<RuleSet, ExtractionFailure> {
        let limits = Limits {
            nesting: config.max_nesting_depth(),
            path: config.max_path_depth(),
        };
        crate::parse::resolve_entries(&self.entries, limits)
    }
}

/// Parsed rules for one endpoint: field path → ordered tokens.
///
/// Paths keep the order in which they were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: IndexMap<FieldPath, Vec<RuleToken>>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add tokens for a path. Tokens for a path already present are appended
    /// after the existing ones.
    pub fn insert(&mut self, path: FieldPath, tokens: impl IntoIterator<Item = RuleToken>) {
        self.entries.entry(path).or_default().extend(tokens);
    }

    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&[RuleToken]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub(crate) fn get_mut(&mut self, path: &FieldPath) -> Option<&mut Vec<RuleToken>> {
        self.entries.get_mut(path)
    }

    #[must_use]
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.entries.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[RuleToken])> {
        self.entries.iter().map(|(p, t)| (p, t.as_slice()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.entries.keys()
    }

    /// Merge several sets in precedence order with the default presence
    /// policy. See [`merge`](crate::merge).
    #[must_use]
    pub fn merged(sets: Vec<RuleSet>) -> RuleSet {
        crate::merge::merge(sets, crate::PresencePolicy::default())
    }
}

impl FromIterator<(FieldPath, Vec<RuleToken>)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (FieldPath, Vec<RuleToken>)>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for (path, tokens) in iter {
            set.insert(path, tokens);
        }
        set
    }
}

impl IntoIterator for RuleSet {
    type Item = (FieldPath, Vec<RuleToken>);
    type IntoIter = indexmap::map::IntoIter<FieldPath, Vec<RuleToken>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({} fields)", self.entries.len())
    }
}
