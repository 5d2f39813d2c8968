use std::fmt;

use super::schema::SchemaNode;

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";

/// Where a parameter is sent. Only query parameters are inferred from rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    #[default]
    Query,
}

impl ParameterLocation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
        }
    }
}

/// A top-level field documented as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
    pub location: ParameterLocation,
}

/// Request body content.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDescriptor {
    pub media_type: String,
    pub schema: SchemaNode,
}

impl BodyDescriptor {
    #[must_use]
    pub fn new(media_type: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            media_type: media_type.into(),
            schema,
        }
    }

    /// A body of any JSON object under the given media type.
    #[must_use]
    pub fn untyped(media_type: impl Into<String>) -> Self {
        Self::new(media_type, SchemaNode::empty_object())
    }
}

/// Where an endpoint's input was placed.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Body(BodyDescriptor),
    Parameters(Vec<ParameterDescriptor>),
}

impl Input {
    #[must_use]
    pub fn as_body(&self) -> Option<&BodyDescriptor> {
        match self {
            Input::Body(b) => Some(b),
            Input::Parameters(_) => None,
        }
    }

    #[must_use]
    pub fn as_parameters(&self) -> Option<&[ParameterDescriptor]> {
        match self {
            Input::Parameters(p) => Some(p),
            Input::Body(_) => None,
        }
    }
}

/// Everything inferred about one endpoint's input, handed to the document
/// assembler.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct OperationDescriptor {
    pub summary: String,
    pub description: String,
    pub input: Option<Input>,
}

impl OperationDescriptor {
    #[must_use]
    pub fn body(&self) -> Option<&BodyDescriptor> {
        self.input.as_ref().and_then(Input::as_body)
    }

    #[must_use]
    pub fn parameters(&self) -> Option<&[ParameterDescriptor]> {
        self.input.as_ref().and_then(Input::as_parameters)
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "summary: {:?}", self.summary)?;
        match &self.input {
            None => write!(f, ", input: none"),
            Some(Input::Body(b)) => write!(f, ", input: body ({})", b.media_type),
            Some(Input::Parameters(p)) => {
                let names: Vec<&str> = p.iter().map(|d| d.name.as_str()).collect();
                write!(f, ", input: query [{}]", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_body_is_empty_object() {
        let body = BodyDescriptor::untyped(JSON_MEDIA_TYPE);
        assert_eq!(body.media_type, "application/json");
        assert!(body.schema.as_object().unwrap().is_empty());
    }

    #[test]
    fn display_variants() {
        let mut op = OperationDescriptor {
            summary: "List users".into(),
            description: String::new(),
            input: None,
        };
        assert_eq!(op.to_string(), "summary: \"List users\", input: none");

        op.input = Some(Input::Body(BodyDescriptor::untyped(MULTIPART_MEDIA_TYPE)));
        assert!(op.to_string().ends_with("input: body (multipart/form-data)"));

        op.input = Some(Input::Parameters(vec![ParameterDescriptor {
            name: "page".into(),
            schema: SchemaNode::empty_object(),
            required: false,
            location: ParameterLocation::Query,
        }]));
        assert!(op.to_string().ends_with("input: query [page]"));
        assert_eq!(op.parameters().unwrap().len(), 1);
        assert!(op.body().is_none());
    }
}
