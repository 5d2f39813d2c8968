use std::collections::HashMap;
use std::fmt;

use tracing::{debug, instrument, warn};

use crate::config::{Config, Environment, ProcessEnvironment};
use crate::error::InferenceError;
use crate::{
    BodyDescriptor, ExtractionFailure, Input, JSON_MEDIA_TYPE, Method, OperationDescriptor,
    RawRuleSet, SourceError, build, decide, merge,
};

/// Prefix of the text appended to a description when inference fails.
pub const WARNING_MARKER: &str = "⚠️Cannot generate request documentation: ";

/// Doc-comment attribute holding the one-line summary.
pub const SUMMARY_ATTRIBUTE: &str = "summary";
/// Doc-comment attribute holding the long description.
pub const DESCRIPTION_ATTRIBUTE: &str = "description";
/// Doc-comment tag overriding the request body media type.
pub const MEDIA_TYPE_TAG: &str = "@mediaType";

/// The endpoint being documented.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub method: Method,
    pub uri: String,
}

impl Route {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`InferenceError::Method`] for an unknown method name.
    pub fn parse(method: &str, uri: impl Into<String>) -> Result<Self, InferenceError> {
        Ok(Self::new(method.parse()?, uri))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// Finds validation rules attached to a route handler.
///
/// Implementations return every rule set they find; the [`Inferrer`] orders
/// them by [`RuleOrigin`](crate::RuleOrigin) before merging.
pub trait RuleSource {
    /// # Errors
    ///
    /// Returns [`SourceError`] when the handler's rules cannot be read.
    fn extract(&self, route: &Route) -> Result<Vec<RawRuleSet>, SourceError>;
}

impl RuleSource for [RawRuleSet] {
    fn extract(&self, _route: &Route) -> Result<Vec<RawRuleSet>, SourceError> {
        Ok(self.to_vec())
    }
}

impl<T: RuleSource + ?Sized> RuleSource for &T {
    fn extract(&self, route: &Route) -> Result<Vec<RawRuleSet>, SourceError> {
        (**self).extract(route)
    }
}

impl RuleSource for Vec<RawRuleSet> {
    fn extract(&self, route: &Route) -> Result<Vec<RawRuleSet>, SourceError> {
        self.as_slice().extract(route)
    }
}

/// Parsed documentation comment of a route handler.
pub trait DocComment {
    fn attribute(&self, name: &str) -> Option<&str>;

    /// The value of the first tag with this name.
    fn tag(&self, name: &str) -> Option<&str>;
}

/// In-memory [`DocComment`].
#[derive(Debug, Clone, Default)]
pub struct DocBlock {
    attributes: HashMap<String, String>,
    tags: Vec<(String, String)>,
}

impl DocBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn summary(self, text: impl Into<String>) -> Self {
        self.with_attribute(SUMMARY_ATTRIBUTE, text)
    }

    #[must_use]
    pub fn description(self, text: impl Into<String>) -> Self {
        self.with_attribute(DESCRIPTION_ATTRIBUTE, text)
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((name.into(), value.into()));
        self
    }
}

impl DocComment for DocBlock {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Runs rule extraction, merging, tree building and placement for one route
/// at a time, and is the only place inference failures are handled.
///
/// Holds no per-route state, so one instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Inferrer<E = ProcessEnvironment> {
    config: Config,
    env: E,
}

impl<E: Environment> Inferrer<E> {
    pub fn new(config: Config, env: E) -> Self {
        Self { config, env }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Describe one route's input.
    ///
    /// In strict mode an [`ExtractionFailure`] is returned as
    /// [`InferenceError::Extraction`]. Otherwise the description gets a
    /// warning with the failure message and the input falls back to an
    /// untyped object body.
    ///
    /// # Errors
    ///
    /// Only in strict mode; see above.
    #[instrument(skip_all, fields(route = %route))]
    pub fn describe(
        &self,
        route: &Route,
        source: &dyn RuleSource,
        doc: &dyn DocComment,
    ) -> Result<OperationDescriptor, InferenceError> {
        let summary = doc
            .attribute(SUMMARY_ATTRIBUTE)
            .unwrap_or_default()
            .trim_end_matches('.')
            .to_owned();
        let mut description = doc
            .attribute(DESCRIPTION_ATTRIBUTE)
            .unwrap_or_default()
            .to_owned();
        let media_override = doc
            .tag(MEDIA_TYPE_TAG)
            .map(str::trim)
            .filter(|m| !m.is_empty());

        let input = match self.infer(route, source, media_override) {
            Ok(input) => input,
            Err(failure) if self.env.is_strict() => {
                return Err(InferenceError::Extraction {
                    route: route.to_string(),
                    source: failure,
                });
            }
            Err(failure) => {
                warn!(error = %failure, "request inference failed, documenting an untyped body");
                if !description.is_empty() {
                    description.push_str("\n\n");
                }
                description.push_str(WARNING_MARKER);
                description.push_str(&failure.to_string());
                Some(Input::Body(BodyDescriptor::untyped(
                    media_override.unwrap_or(JSON_MEDIA_TYPE),
                )))
            }
        };

        Ok(OperationDescriptor {
            summary,
            description,
            input,
        })
    }

    fn infer(
        &self,
        route: &Route,
        source: &dyn RuleSource,
        media_override: Option<&str>,
    ) -> Result<Option<Input>, ExtractionFailure> {
        let mut raw_sets = source.extract(route)?;
        raw_sets.sort_by_key(|set| set.origin);

        let mut sets = Vec::with_capacity(raw_sets.len());
        for raw in &raw_sets {
            debug!(
                origin = ?raw.origin,
                provenance = ?raw.provenance,
                fields = raw.entries.len(),
                "resolving rule set"
            );
            sets.push(raw.resolve_with(&self.config)?);
        }

        let merged = merge(sets, self.config.presence_policy());
        let root = build(&merged);
        Ok(decide(route.method, root.as_ref(), media_override))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MULTIPART_MEDIA_TYPE, RawRules, ScalarType};

    struct Failing;

    impl RuleSource for Failing {
        fn extract(&self, _route: &Route) -> Result<Vec<RawRuleSet>, SourceError> {
            Err(SourceError::new("form request class not found"))
        }
    }

    fn lenient() -> Inferrer<bool> {
        Inferrer::new(Config::default(), false)
    }

    fn strict() -> Inferrer<bool> {
        Inferrer::new(Config::default(), true)
    }

    #[test]
    fn summary_trims_trailing_periods() {
        let doc = DocBlock::new().summary("Create a user...").description("Body.");
        let op = lenient()
            .describe(&Route::new(Method::Get, "/users"), &Vec::<RawRuleSet>::new(), &doc)
            .unwrap();
        assert_eq!(op.summary, "Create a user");
        assert_eq!(op.description, "Body.");
        assert_eq!(op.input, None);
    }

    #[test]
    fn structured_rules_sort_before_inline() {
        let sources = vec![
            RawRuleSet::inline().field("x", "integer"),
            RawRuleSet::structured().field("x", "string"),
        ];
        let op = lenient()
            .describe(&Route::new(Method::Post, "/x"), &sources, &DocBlock::new())
            .unwrap();
        let body = op.body().unwrap();
        let x = body.schema.as_object().unwrap().get("x").unwrap();
        assert_eq!(x.schema.as_scalar().unwrap().ty, ScalarType::Integer);
    }

    #[test]
    fn failure_degrades_when_lenient() {
        let doc = DocBlock::new().summary("Upload").description("Stores a file.");
        let op = lenient()
            .describe(&Route::new(Method::Get, "/files"), &Failing, &doc)
            .unwrap();
        assert_eq!(op.summary, "Upload");
        assert!(op.description.starts_with("Stores a file."));
        assert!(op.description.contains(WARNING_MARKER));
        assert!(op.description.contains("form request class not found"));
        let body = op.body().expect("fallback is always a body");
        assert_eq!(body.media_type, JSON_MEDIA_TYPE);
        assert_eq!(body.schema, crate::SchemaNode::empty_object());
    }

    #[test]
    fn failure_propagates_when_strict() {
        let err = strict()
            .describe(&Route::new(Method::Post, "/files"), &Failing, &DocBlock::new())
            .unwrap_err();
        match err {
            InferenceError::Extraction { route, source } => {
                assert_eq!(route, "POST /files");
                assert!(matches!(source, ExtractionFailure::Source(_)));
            }
            other => panic!("expected an extraction error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_path_is_an_extraction_failure() {
        let sources = vec![RawRuleSet::structured().field("items..name", "string")];
        let op = lenient()
            .describe(&Route::new(Method::Post, "/orders"), &sources, &DocBlock::new())
            .unwrap();
        assert!(op.description.starts_with(WARNING_MARKER));
        assert!(op.description.contains("items..name"));
    }

    #[test]
    fn media_type_tag_overrides() {
        let sources = vec![RawRuleSet::structured().field("doc", "file")];
        let doc = DocBlock::new().with_tag(MEDIA_TYPE_TAG, "  application/pdf ");
        let op = lenient()
            .describe(&Route::new(Method::Put, "/doc"), &sources, &doc)
            .unwrap();
        assert_eq!(op.body().unwrap().media_type, "application/pdf");
    }

    #[test]
    fn multipart_for_uploads() {
        let sources = vec![RawRuleSet::inline().field("scan", RawRules::from("required|file"))];
        let op = lenient()
            .describe(&Route::new(Method::Post, "/scan"), &sources, &DocBlock::new())
            .unwrap();
        assert_eq!(op.body().unwrap().media_type, MULTIPART_MEDIA_TYPE);
    }

    #[test]
    fn route_parse_and_display() {
        let route = Route::parse("delete", "/users/{id}").unwrap();
        assert_eq!(route.to_string(), "DELETE /users/{id}");
        assert!(matches!(
            Route::parse("brew", "/pot"),
            Err(InferenceError::Method(_))
        ));
    }
}
