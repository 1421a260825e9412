//! Data-source schema declaration
//!
//! Static description of every field the protection rules data source
//! exposes, with the engine's presence markers, plus a conformance check of
//! flattened output against it.

use serde_json::Value;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Map,
    List,
    Set,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Map => "map",
            FieldType::List => "list",
            FieldType::Set => "set",
        }
    }
}

/// How the engine treats a field during change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Computed,
    Optional,
}

impl Presence {
    pub fn as_str(self) -> &'static str {
        match self {
            Presence::Required => "required",
            Presence::Computed => "computed",
            Presence::Optional => "optional",
        }
    }
}

/// Element type of a collection field
#[derive(Debug, Clone, Copy)]
pub enum Elem {
    Scalar(FieldType),
    Resource(&'static [FieldSchema]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub name: &'static str,
    pub ty: FieldType,
    pub presence: Presence,
    pub max_items: Option<usize>,
    pub elem: Option<Elem>,
}

const fn scalar(name: &'static str, ty: FieldType, presence: Presence) -> FieldSchema {
    FieldSchema {
        name,
        ty,
        presence,
        max_items: None,
        elem: None,
    }
}

const fn nested(
    name: &'static str,
    ty: FieldType,
    presence: Presence,
    elem: Elem,
) -> FieldSchema {
    FieldSchema {
        name,
        ty,
        presence,
        max_items: None,
        elem: Some(elem),
    }
}

const METADATA_FIELDS: &[FieldSchema] = &[
    scalar("last_update_time", FieldType::String, Presence::Computed),
    scalar("kind", FieldType::String, Presence::Computed),
    scalar("uuid", FieldType::String, Presence::Computed),
    scalar("creation_time", FieldType::String, Presence::Computed),
    scalar("spec_version", FieldType::String, Presence::Computed),
    scalar("spec_hash", FieldType::String, Presence::Computed),
    scalar("name", FieldType::String, Presence::Computed),
];

const REFERENCE_FIELDS: &[FieldSchema] = &[
    scalar("kind", FieldType::String, Presence::Optional),
    scalar("uuid", FieldType::String, Presence::Optional),
    scalar("name", FieldType::String, Presence::Optional),
];

const RETENTION_POLICY_FIELDS: &[FieldSchema] = &[
    scalar("num_snapshots", FieldType::Int, Presence::Computed),
    scalar("rollup_retention_policy_multiple", FieldType::Int, Presence::Computed),
    scalar(
        "rollup_retention_policy_snapshot_interval_type",
        FieldType::Int,
        Presence::Computed,
    ),
];

const SNAPSHOT_SCHEDULE_FIELDS: &[FieldSchema] = &[
    scalar("recovery_point_objective_secs", FieldType::Int, Presence::Required),
    nested(
        "local_snapshot_retention_policy",
        FieldType::Map,
        Presence::Computed,
        Elem::Resource(RETENTION_POLICY_FIELDS),
    ),
    scalar("auto_suspend_timeout_secs", FieldType::Int, Presence::Computed),
    scalar("snapshot_type", FieldType::String, Presence::Computed),
    nested(
        "remote_snapshot_retention_policy",
        FieldType::Map,
        Presence::Computed,
        Elem::Resource(RETENTION_POLICY_FIELDS),
    ),
];

const AZ_CONNECTIVITY_FIELDS: &[FieldSchema] = &[
    scalar("destination_availability_zone_index", FieldType::Int, Presence::Computed),
    scalar("source_availability_zone_index", FieldType::Int, Presence::Computed),
    nested(
        "snapshot_schedule_list",
        FieldType::List,
        Presence::Computed,
        Elem::Resource(SNAPSHOT_SCHEDULE_FIELDS),
    ),
];

const ORDERED_AZ_FIELDS: &[FieldSchema] = &[
    scalar("cluster_uuid", FieldType::String, Presence::Computed),
    scalar("availability_zone_url", FieldType::String, Presence::Computed),
];

const CATEGORY_PARAM_FIELDS: &[FieldSchema] = &[
    scalar("name", FieldType::String, Presence::Required),
    nested(
        "values",
        FieldType::List,
        Presence::Required,
        Elem::Scalar(FieldType::String),
    ),
];

const CATEGORY_FILTER_FIELDS: &[FieldSchema] = &[
    scalar("type", FieldType::String, Presence::Computed),
    nested(
        "kind_list",
        FieldType::List,
        Presence::Computed,
        Elem::Scalar(FieldType::String),
    ),
    nested(
        "params",
        FieldType::Set,
        Presence::Computed,
        Elem::Resource(CATEGORY_PARAM_FIELDS),
    ),
];

const ENTITY_FIELDS: &[FieldSchema] = &[
    scalar("api_version", FieldType::String, Presence::Computed),
    scalar("description", FieldType::String, Presence::Computed),
    nested(
        "metadata",
        FieldType::Map,
        Presence::Computed,
        Elem::Resource(METADATA_FIELDS),
    ),
    nested(
        "categories",
        FieldType::Map,
        Presence::Computed,
        Elem::Scalar(FieldType::String),
    ),
    nested(
        "owner_reference",
        FieldType::Map,
        Presence::Computed,
        Elem::Resource(REFERENCE_FIELDS),
    ),
    nested(
        "project_reference",
        FieldType::Map,
        Presence::Computed,
        Elem::Resource(REFERENCE_FIELDS),
    ),
    scalar("name", FieldType::String, Presence::Required),
    scalar("start_time", FieldType::String, Presence::Computed),
    nested(
        "availability_zone_connectivity_list",
        FieldType::List,
        Presence::Required,
        Elem::Resource(AZ_CONNECTIVITY_FIELDS),
    ),
    nested(
        "ordered_availability_zone_list",
        FieldType::List,
        Presence::Required,
        Elem::Resource(ORDERED_AZ_FIELDS),
    ),
    FieldSchema {
        name: "category_filter",
        ty: FieldType::List,
        presence: Presence::Computed,
        max_items: Some(1),
        elem: Some(Elem::Resource(CATEGORY_FILTER_FIELDS)),
    },
    scalar("state", FieldType::String, Presence::Computed),
];

const DATA_SOURCE_FIELDS: &[FieldSchema] = &[
    scalar("api_version", FieldType::String, Presence::Computed),
    nested(
        "entities",
        FieldType::List,
        Presence::Computed,
        Elem::Resource(ENTITY_FIELDS),
    ),
];

/// Top-level schema of the protection rules data source
pub fn protection_rules_schema() -> &'static [FieldSchema] {
    DATA_SOURCE_FIELDS
}

/// Check a serialized object against a schema
///
/// Returns one message per violation, each prefixed with the field path.
/// An empty result means the value conforms.
pub fn check_conformance(value: &Value, fields: &[FieldSchema]) -> Vec<String> {
    let mut violations = Vec::new();
    check_object(value, fields, "", &mut violations);
    violations
}

fn check_object(value: &Value, fields: &[FieldSchema], path: &str, out: &mut Vec<String>) {
    let Some(object) = value.as_object() else {
        out.push(format!("{}: expected object", display_path(path)));
        return;
    };

    for field in fields {
        let field_path = join_path(path, field.name);
        match object.get(field.name) {
            Some(v) => check_field(v, field, &field_path, out),
            None if field.presence != Presence::Optional => {
                out.push(format!("{}: missing {} field", field_path, field.presence.as_str()));
            }
            None => {}
        }
    }

    for key in object.keys() {
        if !fields.iter().any(|f| f.name == key.as_str()) {
            out.push(format!("{}: unexpected field", join_path(path, key)));
        }
    }
}

fn check_field(value: &Value, field: &FieldSchema, path: &str, out: &mut Vec<String>) {
    match field.ty {
        FieldType::String | FieldType::Int => check_scalar(value, field.ty, path, out),
        FieldType::Map => {
            let Some(map) = value.as_object() else {
                out.push(format!("{}: expected map", path));
                return;
            };
            match field.elem {
                Some(Elem::Resource(inner)) => check_object(value, inner, path, out),
                Some(Elem::Scalar(ty)) => {
                    for (key, v) in map {
                        check_scalar(v, ty, &join_path(path, key), out);
                    }
                }
                None => {}
            }
        }
        FieldType::List | FieldType::Set => {
            let Some(items) = value.as_array() else {
                out.push(format!("{}: expected {}", path, field.ty.as_str()));
                return;
            };
            if let Some(max) = field.max_items {
                if items.len() > max {
                    out.push(format!(
                        "{}: {} items exceeds maximum of {}",
                        path,
                        items.len(),
                        max
                    ));
                }
            }
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}.{}", path, i);
                match field.elem {
                    Some(Elem::Resource(inner)) => check_object(item, inner, &item_path, out),
                    Some(Elem::Scalar(ty)) => check_scalar(item, ty, &item_path, out),
                    None => {}
                }
            }
        }
    }
}

fn check_scalar(value: &Value, ty: FieldType, path: &str, out: &mut Vec<String>) {
    let ok = match ty {
        FieldType::String => value.is_string(),
        FieldType::Int => value.is_i64() || value.is_u64(),
        _ => false,
    };
    if !ok {
        out.push(format!("{}: expected {}", path, ty.as_str()));
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Render a schema as an indented tree
pub fn render_schema(fields: &[FieldSchema]) -> String {
    let mut out = String::new();
    render_fields(fields, 0, &mut out);
    out
}

fn render_fields(fields: &[FieldSchema], depth: usize, out: &mut String) {
    for field in fields {
        let indent = "  ".repeat(depth);
        let mut line = format!(
            "{}{} ({}, {}",
            indent,
            field.name,
            field.ty.as_str(),
            field.presence.as_str()
        );
        if let Some(max) = field.max_items {
            let _ = write!(line, ", max {}", max);
        }
        if let Some(Elem::Scalar(ty)) = field.elem {
            let _ = write!(line, ", of {}", ty.as_str());
        }
        line.push(')');
        out.push_str(&line);
        out.push('\n');

        if let Some(Elem::Resource(inner)) = field.elem {
            render_fields(inner, depth + 1, out);
        }
    }
}
