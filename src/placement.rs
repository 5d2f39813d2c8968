use crate::{
    BodyDescriptor, Input, JSON_MEDIA_TYPE, MULTIPART_MEDIA_TYPE, Method, ObjectNode,
    ParameterDescriptor, ParameterLocation, SchemaNode,
};

/// Decide where an endpoint's inferred input goes.
///
/// * no tree, method without a body: `None`
/// * no tree, method with a body: an untyped object body
/// * tree, method without a body: one query parameter per top-level field
/// * tree, method with a body: a single body, multipart when any leaf is
///   binary, JSON otherwise
///
/// A `media_override` always names the body's media type when one is
/// emitted.
#[must_use]
pub fn decide(method: Method, root: Option<&ObjectNode>, media_override: Option<&str>) -> Option<Input> {
    match (root, method.allows_body()) {
        (None, false) => None,
        (None, true) => Some(Input::Body(BodyDescriptor::untyped(
            media_override.unwrap_or(JSON_MEDIA_TYPE),
        ))),
        (Some(root), false) => Some(Input::Parameters(query_parameters(root))),
        (Some(root), true) => {
            let schema = SchemaNode::Object(root.clone());
            let media_type = media_override.unwrap_or_else(|| {
                if schema.contains_binary() {
                    MULTIPART_MEDIA_TYPE
                } else {
                    JSON_MEDIA_TYPE
                }
            });
            Some(Input::Body(BodyDescriptor::new(media_type, schema)))
        }
    }
}

/// Flatten the top level of the tree. Nested objects and arrays stay as the
/// parameter's schema.
fn query_parameters(root: &ObjectNode) -> Vec<ParameterDescriptor> {
    root.properties
        .iter()
        .map(|(name, prop)| ParameterDescriptor {
            name: name.clone(),
            schema: prop.schema.clone(),
            required: prop.required,
            location: ParameterLocation::Query,
        })
        .collect()
}
