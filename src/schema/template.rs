//! Renders a commented TOML skeleton from an object schema.
//!
//! Keys with a default of the schema's type are written out, other keys are
//! left commented with a type placeholder. Nested object schemas become
//! `[dotted.table]` sections after the scalar keys of their parent.

use std::fmt::Write;

use super::Schema;
use crate::value::ValueType;

pub fn render(schema: &Schema) -> String {
    let mut out = String::new();
    push_comment(&mut out, schema.description());
    render_table(&mut out, &[], schema);
    out
}

fn render_table(out: &mut String, prefix: &[&str], schema: &Schema) {
    for (key, child) in schema.property_schemas() {
        if child.value_type() != ValueType::Object {
            render_entry(out, key, child);
        }
    }

    for (key, child) in schema.property_schemas() {
        if child.value_type() != ValueType::Object {
            continue;
        }
        let mut path = prefix.to_vec();
        path.push(key);

        if !out.is_empty() {
            out.push('\n');
        }
        push_comment(out, child.description());
        let header: Vec<String> = path.iter().map(|segment| toml_key(segment)).collect();
        let _ = writeln!(out, "[{}]", header.join("."));
        render_table(out, &path, child);
    }
}

fn render_entry(out: &mut String, key: &str, schema: &Schema) {
    push_comment(out, schema.description());
    for constraint in schema.constraints() {
        push_comment(out, &constraint.description());
    }
    if schema.is_required() {
        push_comment(out, "required");
    }

    let key = toml_key(key);
    let default = schema
        .default_value()
        .filter(|value| value.value_type() == schema.value_type());
    match default {
        Some(value) => {
            let _ = writeln!(out, "{key} = {}", value.to_toml());
        }
        None => {
            let _ = writeln!(out, "# {key} = <{}>", placeholder(schema));
        }
    }
}

fn placeholder(schema: &Schema) -> String {
    match (schema.value_type(), schema.item_schema()) {
        (ValueType::Array, Some(item)) => format!("array of {}", item.value_type()),
        (value_type, _) => value_type.to_string(),
    }
}

fn push_comment(out: &mut String, text: &str) {
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let _ = writeln!(out, "# {line}");
    }
}

fn toml_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        toml::Value::String(key.to_string()).to_string()
    }
}
