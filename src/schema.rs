//! Fixed family schema and the recursive checker that walks it.

use std::fmt;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::config::OPTIONAL_FIELDS;

/// JSON value kinds, used both for accepted types and in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
}

impl PrimitiveType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Value must be one of these types.
    Leaf(&'static [PrimitiveType]),
    /// Required sub-object; `null` is accepted in its place.
    Nested(Vec<(&'static str, SchemaNode)>),
}

const STRING: &[PrimitiveType] = &[PrimitiveType::String];
const STRING_OR_NULL: &[PrimitiveType] = &[PrimitiveType::String, PrimitiveType::Null];
const NUMBER_OR_NULL: &[PrimitiveType] = &[PrimitiveType::Number, PrimitiveType::Null];

fn nested(fields: Vec<(&'static str, SchemaNode)>) -> SchemaNode {
    SchemaNode::Nested(fields)
}

fn string_fields(names: &[&'static str]) -> Vec<(&'static str, SchemaNode)> {
    names
        .iter()
        .map(|name| (*name, SchemaNode::Leaf(STRING_OR_NULL)))
        .collect()
}

fn nullable_strings(names: &[&'static str]) -> SchemaNode {
    nested(string_fields(names))
}

/// `{ main: inner, pre: inner }`
fn main_and_pre(inner: SchemaNode) -> SchemaNode {
    nested(vec![("main", inner.clone()), ("pre", inner)])
}

fn ethnicity_period() -> SchemaNode {
    let mut fields = string_fields(&["native", "english", "russian"]);
    fields.push(("sub", nullable_strings(&["native", "english", "russian"])));
    nested(fields)
}

fn build_family_schema() -> SchemaNode {
    let coordinates = nested(vec![
        ("latitude", SchemaNode::Leaf(NUMBER_OR_NULL)),
        ("longitude", SchemaNode::Leaf(NUMBER_OR_NULL)),
    ]);
    let place = || main_and_pre(nullable_strings(&["native", "russian", "english"]));

    nested(vec![
        ("id", SchemaNode::Leaf(STRING)),
        ("date", SchemaNode::Leaf(STRING)),
        ("gender", SchemaNode::Leaf(STRING)),
        (
            "familyName",
            main_and_pre(nullable_strings(&["native", "english", "russian"])),
        ),
        ("ethnicity", main_and_pre(ethnicity_period())),
        (
            "location",
            nested(vec![
                ("coordinates", main_and_pre(coordinates)),
                ("village", place()),
                ("region", place()),
                ("state", place()),
            ]),
        ),
        (
            "yDnaHaplogroup",
            nullable_strings(&["root", "clade", "subclade", "terminalSnp", "SnpList"]),
        ),
        (
            "mtDnaHaplogroup",
            nullable_strings(&["root", "clade", "terminalSnp"]),
        ),
    ])
}

/// Shape every family record must have.
pub static FAMILY_SCHEMA: Lazy<SchemaNode> = Lazy::new(build_family_schema);

/// Check `value` against `node`, returning every violation found.
///
/// `path` is the dotted path of `value` itself ("" for a record root).
/// Names in `optional` may be absent at any level.
pub fn check_schema(
    value: &Value,
    node: &SchemaNode,
    path: &str,
    optional: &[&str],
) -> Vec<String> {
    let mut errors = Vec::new();
    walk(value, node, path, optional, &mut errors);
    errors
}

fn walk(
    value: &Value,
    node: &SchemaNode,
    path: &str,
    optional: &[&str],
    errors: &mut Vec<String>,
) {
    match node {
        SchemaNode::Leaf(accepted) => {
            let actual = PrimitiveType::of(value);
            if !accepted.contains(&actual) {
                let expected: Vec<&str> = accepted.iter().map(|t| t.name()).collect();
                errors.push(format!(
                    "Wrong type at {}: expected {}, got {actual}",
                    display_path(path),
                    expected.join(" or ")
                ));
            }
        }
        SchemaNode::Nested(fields) => {
            let obj = match value {
                Value::Object(obj) => obj,
                Value::Null => return,
                other => {
                    errors.push(format!(
                        "Wrong type at {}: expected object, got {}",
                        display_path(path),
                        PrimitiveType::of(other)
                    ));
                    return;
                }
            };
            for (key, child) in fields {
                let child_path = if path.is_empty() {
                    (*key).to_string()
                } else {
                    format!("{path}.{key}")
                };
                match obj.get(*key) {
                    Some(v) => walk(v, child, &child_path, optional, errors),
                    None if optional.contains(key) => {}
                    None => errors.push(format!("Missing key: {child_path}")),
                }
            }
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Check one family record against `FAMILY_SCHEMA`.
///
/// A record that is `null` or not an object is itself a violation.
pub fn check_record(record: &Value) -> Vec<String> {
    if !record.is_object() {
        return vec![format!(
            "Wrong type at <root>: expected object, got {}",
            PrimitiveType::of(record)
        )];
    }
    check_schema(record, &FAMILY_SCHEMA, "", &OPTIONAL_FIELDS)
}

/// A record with every required field present and null where allowed.
#[cfg(test)]
pub(crate) fn minimal_record(id: &str, date: &str) -> Value {
    fn fill(node: &SchemaNode) -> Value {
        match node {
            SchemaNode::Leaf(_) => Value::Null,
            SchemaNode::Nested(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, child)| ((*k).to_string(), fill(child)))
                    .collect(),
            ),
        }
    }

    let mut record = fill(&FAMILY_SCHEMA);
    if let Some(obj) = record.as_object_mut() {
        obj.insert("id".into(), Value::from(id));
        obj.insert("date".into(), Value::from(date));
        obj.insert("gender".into(), Value::from("male"));
    }
    record
}
