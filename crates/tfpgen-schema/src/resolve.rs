//! # Type Resolution
//!
//! Walks a schema subtree and produces the property tree for it. Each node
//! is classified by its `type`:
//!
//! - `string` / `integer` / `number` / `boolean` → scalar leaf;
//! - `object` with `properties` → struct, fields resolved recursively;
//! - `object` with an `additionalProperties` schema → map of scalars, or
//!   map of structs whose fields become the property's children;
//! - `array` with `items` → list of scalars or list of structs.
//!
//! Maps of maps, maps of arrays, arrays of arrays and arrays of maps have no
//! provider equivalent and are rejected as shape errors, as are objects
//! declaring both `properties` and `additionalProperties`.
//!
//! An object property with neither `properties` nor an
//! `additionalProperties` schema is a shape error. The same fieldless object
//! used as an array element or map value (typically one carrying
//! `x-kubernetes-preserve-unknown-fields`) resolves to a struct with no
//! children.

use tfpgen_core::{
    to_identifier, to_snake_case, CompileError, CompileResult, NodePath, Property, ScalarKind,
    TypeDescriptor,
};

use crate::crd::SchemaNode;
use crate::metadata::derive_metadata;
use crate::order::sort_siblings;

/// Default nesting ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Resolves one subtree (`spec` or `status`).
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    computed: bool,
    max_depth: usize,
}

impl Resolver {
    /// Create a resolver. `computed` marks every property of the subtree
    /// as server-populated; `max_depth` bounds struct nesting.
    pub fn new(computed: bool, max_depth: usize) -> Self {
        Self {
            computed,
            max_depth,
        }
    }

    /// Resolve the named properties of `node`, sorted by name.
    ///
    /// # Errors
    ///
    /// Shape errors for unsupported structures, value errors for
    /// undecodable defaults, enums and bounds. The first error wins.
    pub fn resolve_properties(
        &self,
        node: &SchemaNode,
        path: &NodePath,
    ) -> CompileResult<Vec<Property>> {
        self.properties_at(node, path, 0)
    }

    /// Resolve the shape of a single node, returning its descriptor and,
    /// for struct-bearing shapes, its fields.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve_properties`].
    pub fn resolve_type(
        &self,
        node: &SchemaNode,
        path: &NodePath,
    ) -> CompileResult<(TypeDescriptor, Vec<Property>)> {
        self.type_at(node, path, 0)
    }

    fn properties_at(
        &self,
        node: &SchemaNode,
        path: &NodePath,
        depth: usize,
    ) -> CompileResult<Vec<Property>> {
        if depth >= self.max_depth {
            return Err(CompileError::shape(
                path,
                format!("nesting exceeds the maximum depth of {}", self.max_depth),
            ));
        }

        let mut properties = Vec::with_capacity(node.properties.len());
        for (name, child) in &node.properties {
            let child_path = path.child(name.as_str());
            let (ty, children) = self.type_at(child, &child_path, depth)?;
            let meta = derive_metadata(name, child, node, ty.scalar_kind(), &child_path)?;

            properties.push(Property {
                name: name.clone(),
                normalized_name: to_identifier(name),
                attribute_name: to_snake_case(name),
                description: meta.description,
                ty,
                required: meta.required,
                optional: !meta.required,
                computed: self.computed || meta.default.is_some(),
                immutable: meta.immutable,
                default: meta.default,
                validators: meta.validators,
                children,
            });
        }

        Ok(sort_siblings(properties))
    }

    fn type_at(
        &self,
        node: &SchemaNode,
        path: &NodePath,
        depth: usize,
    ) -> CompileResult<(TypeDescriptor, Vec<Property>)> {
        let schema_type = node
            .schema_type
            .as_deref()
            .ok_or_else(|| CompileError::shape(path, "node has no type"))?;

        if let Some(kind) = ScalarKind::from_schema_type(schema_type) {
            return Ok((TypeDescriptor::scalar(kind), Vec::new()));
        }

        match schema_type {
            "object" => self.object_at(node, path, depth),
            "array" => self.array_at(node, path, depth),
            other => Err(CompileError::shape(
                path,
                format!("unrecognized type '{other}'"),
            )),
        }
    }

    fn object_at(
        &self,
        node: &SchemaNode,
        path: &NodePath,
        depth: usize,
    ) -> CompileResult<(TypeDescriptor, Vec<Property>)> {
        let values = node.additional_properties_schema(path)?;

        match (values, node.properties.is_empty()) {
            (Some(_), false) => Err(CompileError::shape(
                path,
                "object declares both properties and additionalProperties",
            )),
            (None, true) => Err(CompileError::shape(
                path,
                "object declares neither properties nor additionalProperties",
            )),
            (None, false) => Ok((
                TypeDescriptor::Struct,
                self.properties_at(node, path, depth + 1)?,
            )),
            (Some(values), true) => {
                let (value_type, children) = self.element_at(values, path, depth)?;
                match value_type {
                    TypeDescriptor::Scalar { .. } | TypeDescriptor::Struct => {
                        Ok((TypeDescriptor::map_of(value_type), children))
                    }
                    _ => Err(CompileError::shape(
                        path,
                        "map values must be scalars or objects with properties",
                    )),
                }
            }
        }
    }

    fn array_at(
        &self,
        node: &SchemaNode,
        path: &NodePath,
        depth: usize,
    ) -> CompileResult<(TypeDescriptor, Vec<Property>)> {
        let items = node
            .items
            .as_deref()
            .ok_or_else(|| CompileError::shape(path, "array node has no items"))?;

        let (element_type, children) = self.element_at(items, path, depth)?;
        match element_type {
            TypeDescriptor::Scalar { .. } | TypeDescriptor::Struct => {
                Ok((TypeDescriptor::array_of(element_type), children))
            }
            _ => Err(CompileError::shape(
                path,
                "array items must be scalars or objects with properties",
            )),
        }
    }

    /// Resolve an array element or map value schema.
    fn element_at(
        &self,
        node: &SchemaNode,
        path: &NodePath,
        depth: usize,
    ) -> CompileResult<(TypeDescriptor, Vec<Property>)> {
        let fieldless = node.schema_type.as_deref() == Some("object")
            && node.properties.is_empty()
            && node.additional_properties_schema(path)?.is_none();
        if fieldless {
            return Ok((TypeDescriptor::Struct, Vec::new()));
        }
        self.type_at(node, path, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfpgen_core::{AttributeKind, Constraint, Literal};

    fn node(yaml: &str) -> SchemaNode {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn resolve(yaml: &str, computed: bool) -> CompileResult<Vec<Property>> {
        Resolver::new(computed, DEFAULT_MAX_DEPTH).resolve_properties(&node(yaml), &NodePath::root("spec"))
    }

    fn find<'a>(props: &'a [Property], name: &str) -> &'a Property {
        props
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("property {name} missing"))
    }

    #[test]
    fn scalars_resolve_to_kinds() {
        let props = resolve(
            r#"
type: object
properties:
  name: {type: string}
  size: {type: integer}
  ratio: {type: number}
  enabled: {type: boolean}
"#,
            false,
        )
        .unwrap();
        assert_eq!(find(&props, "name").ty, TypeDescriptor::scalar(ScalarKind::String));
        assert_eq!(find(&props, "size").ty, TypeDescriptor::scalar(ScalarKind::Int64));
        assert_eq!(find(&props, "ratio").ty, TypeDescriptor::scalar(ScalarKind::Float64));
        assert_eq!(find(&props, "enabled").ty, TypeDescriptor::scalar(ScalarKind::Bool));
        assert!(props.iter().all(|p| p.children.is_empty()));
    }

    #[test]
    fn nested_struct_has_sorted_children() {
        let props = resolve(
            r#"
type: object
properties:
  forProvider:
    type: object
    required: [region]
    properties:
      zone: {type: string}
      region: {type: string}
"#,
            false,
        )
        .unwrap();
        let fp = find(&props, "forProvider");
        assert_eq!(fp.ty, TypeDescriptor::Struct);
        assert_eq!(fp.attribute_name, "for_provider");
        assert_eq!(fp.normalized_name, "ForProvider");
        let names: Vec<_> = fp.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["region", "zone"]);
        assert!(fp.children[0].required);
        assert!(fp.children[1].optional);
    }

    #[test]
    fn map_of_scalars() {
        let props = resolve(
            "type: object\nproperties:\n  tags:\n    type: object\n    additionalProperties: {type: string}\n",
            false,
        )
        .unwrap();
        let tags = find(&props, "tags");
        assert_eq!(
            tags.attribute_kind(),
            AttributeKind::Map {
                element: ScalarKind::String
            }
        );
        assert!(tags.children.is_empty());
    }

    #[test]
    fn map_of_structs_carries_value_fields() {
        let props = resolve(
            r#"
type: object
properties:
  rules:
    type: object
    additionalProperties:
      type: object
      properties:
        days: {type: integer}
        action: {type: string}
"#,
            false,
        )
        .unwrap();
        let rules = find(&props, "rules");
        assert_eq!(rules.ty, TypeDescriptor::map_of(TypeDescriptor::Struct));
        let names: Vec<_> = rules.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["action", "days"]);
    }

    #[test]
    fn arrays_of_scalars_and_structs() {
        let props = resolve(
            r#"
type: object
properties:
  zones:
    type: array
    items: {type: string}
  grants:
    type: array
    items:
      type: object
      properties:
        permission:
          type: string
          enum: [READ, WRITE]
"#,
            false,
        )
        .unwrap();
        assert_eq!(
            find(&props, "zones").attribute_kind(),
            AttributeKind::List {
                element: ScalarKind::String
            }
        );
        let grants = find(&props, "grants");
        assert_eq!(grants.attribute_kind(), AttributeKind::ListNested);
        assert!(matches!(
            grants.children[0].validators[0],
            Constraint::OneOf { .. }
        ));
    }

    #[test]
    fn array_of_key_value_objects() {
        let props = resolve(
            r#"
type: object
properties:
  labels:
    type: array
    items:
      type: object
      required: [key]
      properties:
        value: {type: string}
        key: {type: string}
"#,
            false,
        )
        .unwrap();
        let labels = find(&props, "labels");
        assert_eq!(labels.ty, TypeDescriptor::array_of(TypeDescriptor::Struct));
        assert_eq!(labels.children.len(), 2);
        assert_eq!(labels.children[0].name, "key");
        assert!(labels.children[0].required);
        assert_eq!(labels.children[1].name, "value");
        assert!(labels.children[1].optional);
    }

    #[test]
    fn additional_properties_false_is_a_struct() {
        let props = resolve(
            r#"
type: object
properties:
  owner:
    type: object
    additionalProperties: false
    properties:
      id: {type: string}
"#,
            false,
        )
        .unwrap();
        assert_eq!(find(&props, "owner").ty, TypeDescriptor::Struct);
    }

    #[test]
    fn computed_subtree_marks_everything() {
        let props = resolve(
            "type: object\nproperties:\n  endpoint:\n    type: object\n    properties:\n      host: {type: string}\n",
            true,
        )
        .unwrap();
        let endpoint = find(&props, "endpoint");
        assert!(endpoint.computed);
        assert!(endpoint.children[0].computed);
    }

    #[test]
    fn default_makes_property_computed() {
        let props = resolve(
            "type: object\nproperties:\n  region: {type: string, default: us-east-1}\n  zone: {type: string}\n",
            false,
        )
        .unwrap();
        let region = find(&props, "region");
        assert!(region.computed);
        assert_eq!(region.default, Some(Literal::String("us-east-1".into())));
        assert!(!find(&props, "zone").computed);
    }

    #[test]
    fn both_properties_and_additional_properties_is_shape_error() {
        let err = resolve(
            r#"
type: object
properties:
  labels:
    type: object
    properties:
      a: {type: string}
    additionalProperties: {type: string}
"#,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::SchemaShape { .. }));
        assert_eq!(err.path().unwrap().to_string(), "spec.labels");
    }

    #[test]
    fn empty_object_is_shape_error() {
        let err = resolve("type: object\nproperties:\n  blob: {type: object}\n", false).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "spec.blob");
        assert!(err.to_string().contains("neither properties nor additionalProperties"));
    }

    #[test]
    fn fieldless_array_items_resolve_to_empty_struct() {
        let (ty, children) = Resolver::new(false, DEFAULT_MAX_DEPTH)
            .resolve_type(
                &node("type: array\nitems:\n  type: object\n  x-kubernetes-preserve-unknown-fields: true\n"),
                &NodePath::root("spec").child("x"),
            )
            .unwrap();
        assert_eq!(ty, TypeDescriptor::array_of(TypeDescriptor::Struct));
        assert!(children.is_empty());
    }

    #[test]
    fn fieldless_map_values_resolve_to_empty_struct() {
        let (ty, children) = Resolver::new(false, DEFAULT_MAX_DEPTH)
            .resolve_type(
                &node("type: object\nadditionalProperties:\n  type: object\n  x-kubernetes-preserve-unknown-fields: true\n"),
                &NodePath::root("spec").child("x"),
            )
            .unwrap();
        assert_eq!(ty, TypeDescriptor::map_of(TypeDescriptor::Struct));
        assert!(children.is_empty());
    }

    #[test]
    fn element_with_both_field_kinds_is_still_shape_error() {
        let err = resolve(
            r#"
type: object
properties:
  rules:
    type: array
    items:
      type: object
      properties:
        a: {type: string}
      additionalProperties: {type: string}
"#,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("both properties and additionalProperties"));
        assert_eq!(err.path().unwrap().to_string(), "spec.rules");
    }

    #[test]
    fn array_without_items_is_shape_error() {
        let err = resolve("type: object\nproperties:\n  zones: {type: array}\n", false).unwrap_err();
        assert!(err.to_string().contains("array node has no items"));
    }

    #[test]
    fn unrecognized_type_is_shape_error() {
        let err = resolve("type: object\nproperties:\n  x: {type: 'null'}\n", false).unwrap_err();
        assert!(err.to_string().contains("unrecognized type 'null'"));
    }

    #[test]
    fn missing_type_is_shape_error() {
        let err = resolve("type: object\nproperties:\n  x: {description: untyped}\n", false).unwrap_err();
        assert!(err.to_string().contains("node has no type"));
    }

    #[test]
    fn nested_collections_are_shape_errors() {
        let array_of_arrays = "type: object\nproperties:\n  m:\n    type: array\n    items: {type: array, items: {type: string}}\n";
        assert!(matches!(
            resolve(array_of_arrays, false).unwrap_err(),
            CompileError::SchemaShape { .. }
        ));

        let map_of_arrays = "type: object\nproperties:\n  m:\n    type: object\n    additionalProperties: {type: array, items: {type: string}}\n";
        assert!(matches!(
            resolve(map_of_arrays, false).unwrap_err(),
            CompileError::SchemaShape { .. }
        ));

        let map_of_maps = "type: object\nproperties:\n  m:\n    type: object\n    additionalProperties:\n      type: object\n      additionalProperties: {type: string}\n";
        assert!(matches!(
            resolve(map_of_maps, false).unwrap_err(),
            CompileError::SchemaShape { .. }
        ));
    }

    #[test]
    fn value_error_reports_deep_path() {
        let err = resolve(
            r#"
type: object
properties:
  forProvider:
    type: object
    properties:
      size: {type: integer, default: big}
"#,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::SchemaValue { .. }));
        assert_eq!(err.path().unwrap().to_string(), "spec.forProvider.size");
    }

    #[test]
    fn depth_ceiling_is_enforced() {
        let mut leaf = SchemaNode::of_type("object");
        leaf.properties.insert("v".into(), SchemaNode::of_type("string"));
        let mut current = leaf;
        for _ in 0..4 {
            let mut parent = SchemaNode::of_type("object");
            parent.properties.insert("n".into(), current);
            current = parent;
        }

        let shallow = Resolver::new(false, 3).resolve_properties(&current, &NodePath::root("spec"));
        assert!(matches!(shallow.unwrap_err(), CompileError::SchemaShape { .. }));

        let deep = Resolver::new(false, 8).resolve_properties(&current, &NodePath::root("spec"));
        assert!(deep.is_ok());
    }

    #[test]
    fn resolve_type_on_single_node() {
        let (ty, children) = Resolver::new(false, DEFAULT_MAX_DEPTH)
            .resolve_type(
                &node("type: array\nitems:\n  type: object\n  properties:\n    k: {type: boolean}\n"),
                &NodePath::root("spec").child("list"),
            )
            .unwrap();
        assert_eq!(ty, TypeDescriptor::array_of(TypeDescriptor::Struct));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "k");
    }
}
