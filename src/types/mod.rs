mod descriptor;
mod error;
mod method;
mod number;
mod path;
mod ruleset;
mod schema;
mod token;

pub use descriptor::{
    BodyDescriptor, Input, JSON_MEDIA_TYPE, MULTIPART_MEDIA_TYPE, OperationDescriptor,
    ParameterDescriptor, ParameterLocation,
};
pub use error::{ExtractionFailure, PathError, SourceError, UnknownMethod};
pub use method::Method;
pub use number::Number;
pub use path::{FieldPath, Segment};
pub use ruleset::{RawRuleSet, RawRules, RuleOrigin, RuleSet};
pub use schema::{ArrayNode, Bounds, ObjectNode, Property, Scalar, ScalarType, SchemaNode};
pub use token::{Bound, FieldType, Format, Presence, RuleToken};
