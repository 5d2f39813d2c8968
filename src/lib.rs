//! Infer request schemas for API documentation from declarative validation
//! rules.
//!
//! Rules such as `"required|string|max:255"` keyed by field paths such as
//! `items.*.name` are parsed into [`RuleToken`]s, merged across sources,
//! folded into a [`SchemaNode`] tree and placed either in the request body or
//! in query parameters.
//!
//! ```
//! use rulescribe::{Config, DocBlock, Inferrer, Method, RawRuleSet, Route};
//!
//! let rules = vec![RawRuleSet::structured()
//!     .field("avatar", "file|image")
//!     .field("name", "required|string")];
//! let inferrer = Inferrer::new(Config::default(), false);
//! let op = inferrer
//!     .describe(&Route::new(Method::Post, "/profile"), &rules, &DocBlock::new())
//!     .unwrap();
//! assert_eq!(op.body().unwrap().media_type, "multipart/form-data");
//! ```

mod build;
mod config;
mod error;
mod merge;
pub mod parse;
mod pipeline;
mod placement;
#[cfg(feature = "serde")]
mod serial;
mod types;

pub use build::build;
pub use config::{
    Config, ConfigBuilder, DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_PATH_DEPTH, Environment,
    ProcessEnvironment, STRICT_ENV_VAR,
};
pub use error::InferenceError;
pub use merge::{PresencePolicy, merge};
pub use parse::{UnrecognizedToken, parse_path, parse_rules, parse_token};
pub use pipeline::{
    DESCRIPTION_ATTRIBUTE, DocBlock, DocComment, Inferrer, MEDIA_TYPE_TAG, Route, RuleSource,
    SUMMARY_ATTRIBUTE, WARNING_MARKER,
};
pub use placement::decide;
pub use types::{
    ArrayNode, BodyDescriptor, Bound, Bounds, ExtractionFailure, FieldPath, FieldType, Format,
    Input, JSON_MEDIA_TYPE, MULTIPART_MEDIA_TYPE, Method, Number, ObjectNode, OperationDescriptor,
    ParameterDescriptor, ParameterLocation, PathError, Presence, Property, RawRuleSet, RawRules,
    RuleOrigin, RuleSet, RuleToken, Scalar, ScalarType, SchemaNode, Segment, SourceError,
    UnknownMethod,
};
