use std::fmt;

use super::number::Number;
use super::ruleset::RuleSet;

/// Presence markers. `required` makes a property required unless the same
/// field is also `nullable` or `sometimes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Required,
    Nullable,
    Sometimes,
}

/// Type-declaring tokens. The last one seen for a field wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// An uploaded file, documented as a binary string.
    File,
}

/// String formats a scalar leaf can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Email,
    Uri,
    Uuid,
    Date,
    DateTime,
    Ipv4,
    Ipv6,
    Binary,
}

impl Format {
    /// The OpenAPI `format` keyword for this format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::Uri => "uri",
            Format::Uuid => "uuid",
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
            Format::Binary => "binary",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size constraints. What they limit depends on the node they end up on:
/// length for strings, value for numbers, item count for arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Min(Number),
    Max(Number),
    Size(Number),
    Between(Number, Number),
}

/// One parsed validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleToken {
    Presence(Presence),
    Type(FieldType),
    Format(Format),
    Bound(Bound),
    /// `in:a,b,c`
    Membership(Vec<String>),
    /// The field is validated by its own rule set, with paths relative to
    /// the field.
    Nested(RuleSet),
    /// Vocabulary this crate does not understand. Kept so callers can see
    /// it, ignored when building schemas.
    Unknown { name: String, args: Vec<String> },
}

impl RuleToken {
    /// Whether this token affects the inferred schema.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, RuleToken::Unknown { .. })
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleToken::Presence(p) => match p {
                Presence::Required => f.write_str("required"),
                Presence::Nullable => f.write_str("nullable"),
                Presence::Sometimes => f.write_str("sometimes"),
            },
            RuleToken::Type(t) => match t {
                FieldType::String => f.write_str("string"),
                FieldType::Integer => f.write_str("integer"),
                FieldType::Number => f.write_str("numeric"),
                FieldType::Boolean => f.write_str("boolean"),
                FieldType::Array => f.write_str("array"),
                FieldType::Object => f.write_str("object"),
                FieldType::File => f.write_str("file"),
            },
            RuleToken::Format(fmt) => write!(f, "{fmt}"),
            RuleToken::Bound(b) => match b {
                Bound::Min(n) => write!(f, "min:{n}"),
                Bound::Max(n) => write!(f, "max:{n}"),
                Bound::Size(n) => write!(f, "size:{n}"),
                Bound::Between(lo, hi) => write!(f, "between:{lo},{hi}"),
            },
            RuleToken::Membership(values) => write!(f, "in:{}", values.join(",")),
            RuleToken::Nested(rules) => write!(f, "nested({} fields)", rules.len()),
            RuleToken::Unknown { name, args } if args.is_empty() => f.write_str(name),
            RuleToken::Unknown { name, args } => write!(f, "{name}:{}", args.join(",")),
        }
    }
}
