use std::collections::HashSet;

use tracing::debug;

use crate::{
    ArrayNode, Bound, Bounds, FieldPath, FieldType, Format, ObjectNode, Presence, Property,
    RuleSet, RuleToken, Scalar, ScalarType, SchemaNode, Segment,
};

/// Segments leading from the root to a node.
type Location = Vec<Segment>;

/// Fold a rule set into a schema tree rooted at an object.
///
/// Returns `None` for an empty rule set. Shorter paths are applied before
/// longer ones, so `a` is typed before `a.b` attaches to it regardless of the
/// order the rules were declared in. A node whose kind does not fit a later
/// rule is replaced by what that rule implies. Properties appear in the order
/// their first rule was declared.
#[must_use]
pub fn build(rules: &RuleSet) -> Option<ObjectNode> {
    build_with_conflicts(rules).map(|(root, _)| root)
}

/// [`build`], also returning the path of every rule that replaced a node a
/// previous rule had typed as another kind.
fn build_with_conflicts(rules: &RuleSet) -> Option<(ObjectNode, Vec<FieldPath>)> {
    if rules.is_empty() {
        return None;
    }
    let mut builder = Builder::default();
    let mut root = ObjectNode::new();
    builder.apply_all(&mut root, &[], rules);
    Some((root, builder.conflicts))
}

#[derive(Debug, Default)]
struct Builder {
    /// Nodes that exist only because a path passes through them, or whose
    /// rules declare no type. Replacing them is not a conflict.
    untyped: HashSet<Location>,
    conflicts: Vec<FieldPath>,
}

impl Builder {
    fn apply_all(&mut self, target: &mut ObjectNode, base: &[Segment], rules: &RuleSet) {
        for path in rules.paths() {
            self.reserve(target, &mut base.to_vec(), path.segments());
        }

        let mut ordered: Vec<(&FieldPath, &[RuleToken])> = rules.iter().collect();
        ordered.sort_by_key(|(path, _)| path.depth());

        for (path, tokens) in ordered {
            let field = FieldRules::from_tokens(tokens);
            self.apply_in_object(target, &mut base.to_vec(), path.segments(), &field, path);
        }
    }

    /// Insert untyped entries along `segments` without changing any node that
    /// already carries information. `at` is the location of `obj`.
    fn reserve(&mut self, obj: &mut ObjectNode, at: &mut Location, segments: &[Segment]) {
        let Some((Segment::Key(key), rest)) = segments.split_first() else {
            return;
        };
        at.push(Segment::Key(key.clone()));
        let untyped = &mut self.untyped;
        let prop = obj.properties.entry(key.clone()).or_insert_with(|| {
            untyped.insert(at.clone());
            Property::new(Scalar::default().into())
        });
        self.reserve_below(&mut prop.schema, at, rest);
    }

    fn reserve_below(&mut self, node: &mut SchemaNode, at: &mut Location, segments: &[Segment]) {
        let Some(first) = segments.first() else {
            return;
        };
        if matches!(node, SchemaNode::Scalar(_)) && self.untyped.contains(at.as_slice()) {
            let container = container_for(first);
            adopt(&mut self.untyped, at, &container);
            *node = container;
        }
        match node {
            SchemaNode::Object(obj) => self.reserve(obj, at, segments),
            SchemaNode::Array(arr) if first.is_wildcard() => {
                at.push(Segment::Wildcard);
                self.reserve_below(&mut arr.items, at, &segments[1..]);
            }
            _ => {}
        }
    }

    fn apply_in_object(
        &mut self,
        obj: &mut ObjectNode,
        at: &mut Location,
        segments: &[Segment],
        field: &FieldRules,
        path: &FieldPath,
    ) {
        let Some((Segment::Key(key), rest)) = segments.split_first() else {
            return;
        };
        at.push(Segment::Key(key.clone()));
        let untyped = &mut self.untyped;
        match rest.first() {
            None => {
                let prop = obj.properties.entry(key.clone()).or_insert_with(|| {
                    untyped.insert(at.clone());
                    Property::new(Scalar::default().into())
                });
                self.apply_terminal(&mut prop.schema, at, field, path);
                prop.required = field.is_required();
                prop.nullable = field.nullable;
            }
            Some(next) => {
                let prop = obj.properties.entry(key.clone()).or_insert_with(|| {
                    let container = container_for(next);
                    untyped.insert(at.clone());
                    adopt(untyped, at.as_slice(), &container);
                    Property::new(container)
                });
                self.ensure_container(&mut prop.schema, at, next, path);
                self.descend(&mut prop.schema, at, rest, field, path);
            }
        }
    }

    fn apply_in_array(
        &mut self,
        arr: &mut ArrayNode,
        at: &mut Location,
        segments: &[Segment],
        field: &FieldRules,
        path: &FieldPath,
    ) {
        at.push(Segment::Wildcard);
        let rest = segments.get(1..).unwrap_or_default();
        match rest.first() {
            None => self.apply_terminal(&mut arr.items, at, field, path),
            Some(next) => {
                self.ensure_container(&mut arr.items, at, next, path);
                self.descend(&mut arr.items, at, rest, field, path);
            }
        }
    }

    fn descend(
        &mut self,
        node: &mut SchemaNode,
        at: &mut Location,
        segments: &[Segment],
        field: &FieldRules,
        path: &FieldPath,
    ) {
        match node {
            SchemaNode::Object(obj) => self.apply_in_object(obj, at, segments, field, path),
            SchemaNode::Array(arr) => self.apply_in_array(arr, at, segments, field, path),
            SchemaNode::Scalar(_) => {}
        }
    }

    fn ensure_container(
        &mut self,
        node: &mut SchemaNode,
        at: &Location,
        next: &Segment,
        path: &FieldPath,
    ) {
        let fits = matches!(
            (&*node, next),
            (SchemaNode::Object(_), Segment::Key(_)) | (SchemaNode::Array(_), Segment::Wildcard)
        );
        if !fits {
            self.replace(node, at, container_for(next), path);
        }
    }

    /// Put `with` at `at`. The new node counts as typed.
    fn replace(&mut self, node: &mut SchemaNode, at: &Location, with: SchemaNode, path: &FieldPath) {
        if !self.untyped.contains(at) && node.kind() != with.kind() {
            debug!(
                field = %path,
                from = node.kind(),
                to = with.kind(),
                "conflicting node kinds, last rule wins"
            );
            self.conflicts.push(path.clone());
        }
        self.untyped.retain(|loc| !loc.starts_with(at));
        adopt(&mut self.untyped, at, &with);
        *node = with;
    }

    fn apply_terminal(
        &mut self,
        node: &mut SchemaNode,
        at: &Location,
        field: &FieldRules,
        path: &FieldPath,
    ) {
        match field.ty {
            Some(FieldType::Array) => {
                if !matches!(node, SchemaNode::Array(_)) {
                    self.replace(node, at, ArrayNode::default().into(), path);
                }
                self.untyped.remove(at.as_slice());
                if let SchemaNode::Array(arr) = node {
                    merge_bounds(&mut arr.bounds, field.bounds);
                }
            }
            Some(FieldType::Object) => {
                if !matches!(node, SchemaNode::Object(_)) {
                    self.replace(node, at, SchemaNode::empty_object(), path);
                }
                self.untyped.remove(at.as_slice());
                if let SchemaNode::Object(obj) = node {
                    for nested in &field.nested {
                        self.apply_all(obj, at, nested);
                    }
                }
            }
            Some(ty) => {
                let mut scalar = Scalar::default();
                refine_scalar(&mut scalar, Some(ty), field);
                self.replace(node, at, scalar.into(), path);
            }
            None => match node {
                SchemaNode::Scalar(scalar) => {
                    refine_scalar(scalar, None, field);
                    if field.format.is_some() {
                        self.untyped.remove(at.as_slice());
                    }
                }
                SchemaNode::Array(arr) => merge_bounds(&mut arr.bounds, field.bounds),
                SchemaNode::Object(_) => {}
            },
        }
    }
}

/// The node a segment needs as its parent: objects hold keys, arrays hold
/// wildcards.
fn container_for(next: &Segment) -> SchemaNode {
    match next {
        Segment::Key(_) => SchemaNode::empty_object(),
        Segment::Wildcard => SchemaNode::Array(ArrayNode::default()),
    }
}

/// A fresh array's items exist before any rule types them.
fn adopt(untyped: &mut HashSet<Location>, at: &[Segment], node: &SchemaNode) {
    if let SchemaNode::Array(_) = node {
        let mut items = at.to_vec();
        items.push(Segment::Wildcard);
        untyped.insert(items);
    }
}

/// Everything the tokens of one path say, after last-wins and accumulation.
#[derive(Debug, Default)]
struct FieldRules<'a> {
    ty: Option<FieldType>,
    format: Option<Format>,
    bounds: Bounds,
    enum_values: Option<&'a [String]>,
    required: bool,
    nullable: bool,
    sometimes: bool,
    nested: Vec<&'a RuleSet>,
}

impl<'a> FieldRules<'a> {
    fn from_tokens(tokens: &'a [RuleToken]) -> Self {
        let mut rules = FieldRules::default();
        for token in tokens {
            match token {
                RuleToken::Presence(Presence::Required) => rules.required = true,
                RuleToken::Presence(Presence::Nullable) => rules.nullable = true,
                RuleToken::Presence(Presence::Sometimes) => rules.sometimes = true,
                RuleToken::Type(ty) => rules.ty = Some(*ty),
                RuleToken::Format(format) => rules.format = Some(*format),
                RuleToken::Bound(bound) => match *bound {
                    Bound::Min(n) => rules.bounds.min = Some(n),
                    Bound::Max(n) => rules.bounds.max = Some(n),
                    Bound::Size(n) => {
                        rules.bounds.min = Some(n);
                        rules.bounds.max = Some(n);
                    }
                    Bound::Between(lo, hi) => {
                        rules.bounds.min = Some(lo);
                        rules.bounds.max = Some(hi);
                    }
                },
                RuleToken::Membership(values) => rules.enum_values = Some(values.as_slice()),
                RuleToken::Nested(set) => {
                    rules.ty = Some(FieldType::Object);
                    rules.nested.push(set);
                }
                RuleToken::Unknown { .. } => {}
            }
        }
        rules
    }

    fn is_required(&self) -> bool {
        self.required && !self.nullable && !self.sometimes
    }
}

fn refine_scalar(scalar: &mut Scalar, ty: Option<FieldType>, field: &FieldRules) {
    if let Some(format) = field.format {
        scalar.format = Some(format);
    }
    match ty {
        Some(FieldType::String) => scalar.ty = ScalarType::String,
        Some(FieldType::Integer) => scalar.ty = ScalarType::Integer,
        Some(FieldType::Number) => scalar.ty = ScalarType::Number,
        Some(FieldType::Boolean) => scalar.ty = ScalarType::Boolean,
        Some(FieldType::File) => {
            scalar.ty = ScalarType::String;
            scalar.format = Some(Format::Binary);
        }
        Some(FieldType::Array | FieldType::Object) | None => {}
    }
    if let Some(values) = field.enum_values {
        scalar.enum_values = Some(values.to_vec());
    }
    merge_bounds(&mut scalar.bounds, field.bounds);
}

fn merge_bounds(into: &mut Bounds, from: Bounds) {
    if from.min.is_some() {
        into.min = from.min;
    }
    if from.max.is_some() {
        into.max = from.max;
    }
}
