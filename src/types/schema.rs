use indexmap::IndexMap;

use super::number::Number;
use super::token::Format;

/// Inclusive lower/upper limits. Their meaning depends on the node: length
/// for strings, value for numbers, item count for arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<Number>,
    pub max: Option<Number>,
}

impl Bounds {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Primitive JSON types a leaf can have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Also used for fields whose rules declare no type.
    #[default]
    String,
    Integer,
    Number,
    Boolean,
}

impl ScalarType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Number => "number",
            ScalarType::Boolean => "boolean",
        }
    }
}

/// A leaf of the schema tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scalar {
    pub ty: ScalarType,
    pub format: Option<Format>,
    pub enum_values: Option<Vec<String>>,
    pub bounds: Bounds,
}

impl Scalar {
    #[must_use]
    pub fn new(ty: ScalarType) -> Self {
        Self {
            ty,
            ..Self::default()
        }
    }

    /// An uploaded file: a string in binary format.
    #[must_use]
    pub fn binary() -> Self {
        Self {
            format: Some(Format::Binary),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.format == Some(Format::Binary)
    }
}

/// One named member of an [`ObjectNode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub schema: SchemaNode,
    pub required: bool,
    pub nullable: bool,
}

impl Property {
    #[must_use]
    pub fn new(schema: SchemaNode) -> Self {
        Self {
            schema,
            required: false,
            nullable: false,
        }
    }
}

/// An object with named properties in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    pub properties: IndexMap<String, Property>,
}

impl ObjectNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Names of the required properties, in order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, p)| p.required)
            .map(|(name, _)| name.as_str())
    }
}

/// An array whose elements all follow `items`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub items: Box<SchemaNode>,
    /// Limits on the element count.
    pub bounds: Bounds,
}

impl ArrayNode {
    #[must_use]
    pub fn new(items: SchemaNode) -> Self {
        Self {
            items: Box::new(items),
            bounds: Bounds::default(),
        }
    }
}

impl Default for ArrayNode {
    fn default() -> Self {
        Self::new(SchemaNode::Scalar(Scalar::default()))
    }
}

/// The inferred type tree for an endpoint's input.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Scalar(Scalar),
    Object(ObjectNode),
    Array(ArrayNode),
}

impl SchemaNode {
    /// An object with no properties; the "accepts a JSON object" default.
    #[must_use]
    pub fn empty_object() -> Self {
        SchemaNode::Object(ObjectNode::new())
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            SchemaNode::Object(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            SchemaNode::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            SchemaNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The leaf format, if this node is a scalar that has one.
    #[must_use]
    pub fn format(&self) -> Option<Format> {
        self.as_scalar().and_then(|s| s.format)
    }

    /// Whether any scalar at any depth is binary.
    #[must_use]
    pub fn contains_binary(&self) -> bool {
        match self {
            SchemaNode::Scalar(s) => s.is_binary(),
            SchemaNode::Object(o) => o.properties.values().any(|p| p.schema.contains_binary()),
            SchemaNode::Array(a) => a.items.contains_binary(),
        }
    }

    /// Short name of the node kind, for log output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Scalar(_) => "scalar",
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
        }
    }
}

impl From<ObjectNode> for SchemaNode {
    fn from(v: ObjectNode) -> Self {
        SchemaNode::Object(v)
    }
}

impl From<ArrayNode> for SchemaNode {
    fn from(v: ArrayNode) -> Self {
        SchemaNode::Array(v)
    }
}

impl From<Scalar> for SchemaNode {
    fn from(v: Scalar) -> Self {
        SchemaNode::Scalar(v)
    }
}
