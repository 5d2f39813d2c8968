//! OpenAPI-shaped serialization of inferred schemas and descriptors.
//!
//! Enabled with the `serde` feature. Output follows OpenAPI 3.0 keywords:
//!
//! ```text
//! Scalar   {"type", "format"?, "enum"?, "minLength"/"maxLength" | "minimum"/"maximum"}
//! Object   {"type": "object", "properties"?, "required"?}
//! Array    {"type": "array", "items", "minItems"?, "maxItems"?}
//! Property  schema fields + "nullable": true when nullable
//! Body     {"content": {<media type>: {"schema"}}}
//! Param    {"name", "in", "required", "schema"}
//! ```
//!
//! Bounds on binary strings are file sizes, not lengths, and are left out.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::{
    ArrayNode, BodyDescriptor, Input, ObjectNode, OperationDescriptor, ParameterDescriptor,
    Property, Scalar, ScalarType, SchemaNode,
};

fn write_schema<M: SerializeMap>(map: &mut M, node: &SchemaNode) -> Result<(), M::Error> {
    match node {
        SchemaNode::Scalar(scalar) => write_scalar(map, scalar),
        SchemaNode::Object(obj) => write_object(map, obj),
        SchemaNode::Array(arr) => write_array(map, arr),
    }
}

fn write_scalar<M: SerializeMap>(map: &mut M, scalar: &Scalar) -> Result<(), M::Error> {
    map.serialize_entry("type", scalar.ty.as_str())?;
    if let Some(format) = scalar.format {
        map.serialize_entry("format", format.as_str())?;
    }
    if let Some(values) = &scalar.enum_values {
        map.serialize_entry("enum", values)?;
    }
    let (min_key, max_key) = match scalar.ty {
        ScalarType::String if scalar.is_binary() => return Ok(()),
        ScalarType::String => ("minLength", "maxLength"),
        ScalarType::Integer | ScalarType::Number => ("minimum", "maximum"),
        ScalarType::Boolean => return Ok(()),
    };
    if let Some(min) = scalar.bounds.min {
        map.serialize_entry(min_key, &min)?;
    }
    if let Some(max) = scalar.bounds.max {
        map.serialize_entry(max_key, &max)?;
    }
    Ok(())
}

fn write_object<M: SerializeMap>(map: &mut M, obj: &ObjectNode) -> Result<(), M::Error> {
    map.serialize_entry("type", "object")?;
    if !obj.is_empty() {
        map.serialize_entry("properties", &obj.properties)?;
    }
    let required: Vec<&str> = obj.required().collect();
    if !required.is_empty() {
        map.serialize_entry("required", &required)?;
    }
    Ok(())
}

fn write_array<M: SerializeMap>(map: &mut M, arr: &ArrayNode) -> Result<(), M::Error> {
    map.serialize_entry("type", "array")?;
    map.serialize_entry("items", arr.items.as_ref())?;
    if let Some(min) = arr.bounds.min {
        map.serialize_entry("minItems", &min)?;
    }
    if let Some(max) = arr.bounds.max {
        map.serialize_entry("maxItems", &max)?;
    }
    Ok(())
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        write_schema(&mut map, self)?;
        map.end()
    }
}

impl Serialize for Property {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        write_schema(&mut map, &self.schema)?;
        if self.nullable {
            map.serialize_entry("nullable", &true)?;
        }
        map.end()
    }
}

impl Serialize for ParameterDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("in", self.location.as_str())?;
        map.serialize_entry("required", &self.required)?;
        map.serialize_entry("schema", &self.schema)?;
        map.end()
    }
}

struct MediaTypeObject<'a>(&'a SchemaNode);

impl Serialize for MediaTypeObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("schema", self.0)?;
        map.end()
    }
}

struct Content<'a>(&'a BodyDescriptor);

impl Serialize for Content<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0.media_type, &MediaTypeObject(&self.0.schema))?;
        map.end()
    }
}

impl Serialize for BodyDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("content", &Content(self))?;
        map.end()
    }
}

impl Serialize for OperationDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.summary.is_empty() {
            map.serialize_entry("summary", &self.summary)?;
        }
        if !self.description.is_empty() {
            map.serialize_entry("description", &self.description)?;
        }
        match &self.input {
            Some(Input::Body(body)) => map.serialize_entry("requestBody", body)?,
            Some(Input::Parameters(params)) => map.serialize_entry("parameters", params)?,
            None => {}
        }
        map.end()
    }
}
