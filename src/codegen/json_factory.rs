//! Factory decoding a bean from a `QJsonObject`.
//!
//! Each class record becomes a parse function. Its body first walks the
//! scope's `json_tree`, binding one `QJsonObject` per nested object in plan
//! order, then reads every property from the object its `json_prefix` names.
//! A missing key of a required property makes the whole decode return
//! `std::nullopt`; optional properties fall back to their default value.
//!
//! Generated locals live in disjoint namespaces so that no JSON key or
//! property name can collide with them:
//! - `json_root` is the object handed in, `json_<n>_<key>` the n-th plan entry
//! - `json_value` and `json_parsed` are loop and decode temporaries
//! - `field_<name>` holds a decoded property
//! - `parse_<n>_<Class>` is the parse function of the n-th nested class

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use super::{RenderedFile, include_guard};
use crate::ir::{BeanIr, ClassRecord, JsonProperty, PropertyRecord};
use crate::json_path::{JsonKind, ROOT_SEGMENT};
use crate::naming::{setter_impl, to_identifier};

/// Parameter of every parse function.
const ROOT_LOCAL: &str = "json_root";

/// Parse function names keyed by the qualified class name.
type ParseFunctions<'a> = BTreeMap<&'a str, String>;

/// Object locals of one scope keyed by the segments leading to them.
type ObjectLocals = BTreeMap<Vec<String>, String>;

pub(super) fn render(ir: &BeanIr, stem: &str) -> Result<Vec<RenderedFile>, fmt::Error> {
    Ok(vec![
        RenderedFile {
            name: format!("{stem}jsonfactory.h"),
            contents: header(ir, stem)?,
        },
        RenderedFile {
            name: format!("{stem}jsonfactory.cpp"),
            contents: source(ir, stem)?,
        },
    ])
}

fn factory_name(ir: &BeanIr) -> String {
    format!("{}JsonFactory", ir.root.name)
}

fn field_local(name: &str) -> String {
    format!("field_{name}")
}

/// C++ string literal for `text`, quotes included.
///
/// `we"ird` → `"we\"ird"`. Control characters become octal escapes, which
/// never swallow a following character.
fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for c in text.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() && (c as u32) < 0x100 => {
                literal.push_str(&format!("\\{:03o}", c as u32));
            }
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

fn key_expression(key: &str) -> String {
    format!("QLatin1String({})", string_literal(key))
}

/// Nested classes, children before parents.
fn nested_classes(class: &ClassRecord) -> Vec<&ClassRecord> {
    class
        .classes
        .iter()
        .flat_map(|nested| {
            let mut classes = nested_classes(nested);
            classes.push(nested);
            classes
        })
        .collect()
}

fn parse_functions<'a>(classes: &[&'a ClassRecord]) -> ParseFunctions<'a> {
    classes
        .iter()
        .enumerate()
        .map(|(index, class)| {
            (
                class.nested_name.as_str(),
                format!("parse_{index}_{}", to_identifier(&class.name)),
            )
        })
        .collect()
}

/// Every prefix used by the scope's properties is either the root or one of
/// its plan entries.
fn object_locals(class: &ClassRecord) -> ObjectLocals {
    let mut locals = ObjectLocals::new();
    locals.insert(vec![ROOT_SEGMENT.to_string()], ROOT_LOCAL.to_string());
    for (index, lookup) in class.json_tree.iter().flatten().enumerate() {
        let mut segments = lookup.parents.clone();
        segments.push(lookup.key.clone());
        locals.insert(segments, format!("json_{index}_{}", to_identifier(&lookup.key)));
    }
    locals
}

fn header(ir: &BeanIr, stem: &str) -> Result<String, fmt::Error> {
    let guard = include_guard(stem, "JSONFACTORY_H");
    let module = &ir.root.module;
    let root = &ir.root.name;
    let mut out = String::new();

    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include <optional>")?;
    writeln!(out, "#include <QJsonObject>")?;
    writeln!(out, "#include \"{stem}.h\"")?;
    writeln!(out)?;
    writeln!(out, "namespace {module} {{")?;
    writeln!(out)?;
    writeln!(out, "class {}", factory_name(ir))?;
    writeln!(out, "{{")?;
    writeln!(out, "public:")?;
    writeln!(
        out,
        "    static std::optional<{root}> fromJson(const QJsonObject &{ROOT_LOCAL});"
    )?;
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "}} // namespace {module}")?;
    writeln!(out)?;
    writeln!(out, "#endif // {guard}")?;

    Ok(out)
}

fn source(ir: &BeanIr, stem: &str) -> Result<String, fmt::Error> {
    let module = &ir.root.module;
    let nested = nested_classes(&ir.root);
    let functions = parse_functions(&nested);
    let mut out = String::new();

    writeln!(out, "#include \"{stem}jsonfactory.h\"")?;
    for include in &ir.includes {
        writeln!(out, "#include <{include}>")?;
    }
    writeln!(out, "#include <QJsonValue>")?;
    writeln!(out)?;
    writeln!(out, "namespace {module} {{")?;
    writeln!(out)?;

    if !nested.is_empty() {
        writeln!(out, "namespace {{")?;
        writeln!(out)?;
        for class in &nested {
            let function = functions.get(class.nested_name.as_str()).ok_or(fmt::Error)?;
            writeln!(
                out,
                "std::optional<{0}> {function}(const QJsonObject &{ROOT_LOCAL})",
                class.nested_name
            )?;
            write_body(&mut out, class, &functions)?;
            writeln!(out)?;
        }
        writeln!(out, "}} // namespace")?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "std::optional<{0}> {1}::fromJson(const QJsonObject &{ROOT_LOCAL})",
        ir.root.name,
        factory_name(ir)
    )?;
    write_body(&mut out, &ir.root, &functions)?;
    writeln!(out)?;
    writeln!(out, "}} // namespace {module}")?;

    Ok(out)
}

fn write_body(out: &mut String, class: &ClassRecord, functions: &ParseFunctions<'_>) -> fmt::Result {
    let locals = object_locals(class);
    writeln!(out, "{{")?;

    for lookup in class.json_tree.iter().flatten() {
        let parent = locals.get(&lookup.parents).ok_or(fmt::Error)?;
        let mut segments = lookup.parents.clone();
        segments.push(lookup.key.clone());
        let local = locals.get(&segments).ok_or(fmt::Error)?;
        writeln!(
            out,
            "    const QJsonObject {local} {{{parent}.value({}).toObject()}};",
            key_expression(&lookup.key)
        )?;
    }

    for prop in &class.properties {
        if let Some(json) = &prop.json {
            let object = locals.get(&json.json_prefix).ok_or(fmt::Error)?;
            write_property(out, prop, json, object, functions)?;
        }
    }

    if class.properties.is_empty() {
        writeln!(out, "    return {} {{}};", class.nested_name)?;
    } else {
        let arguments: Vec<String> = class
            .properties
            .iter()
            .map(|prop| setter_impl(&prop.member_type, &field_local(&prop.name)))
            .collect();
        writeln!(out, "    return {} {{", class.nested_name)?;
        writeln!(out, "        {}", arguments.join(",\n        "))?;
        writeln!(out, "    }};")?;
    }
    writeln!(out, "}}")?;

    Ok(())
}

fn write_property(
    out: &mut String,
    prop: &PropertyRecord,
    json: &JsonProperty,
    object: &str,
    functions: &ParseFunctions<'_>,
) -> fmt::Result {
    let key = key_expression(&json.json_suffix);
    let local = field_local(&prop.name);
    let local_type = &prop.nested_member_type;
    let method = &json.json_conversion_method;

    if !json.json_optional {
        writeln!(out, "    if (!{object}.contains({key})) {{")?;
        writeln!(out, "        return std::nullopt;")?;
        writeln!(out, "    }}")?;
    }

    match json.json_type {
        JsonKind::Simple => {
            writeln!(out, "    {local_type} {local} {{{object}.value({key}).{method}()}};")?;
        }
        JsonKind::Array => {
            writeln!(out, "    {local_type} {local} {{}};")?;
            writeln!(
                out,
                "    for (const QJsonValue &json_value : {object}.value({key}).toArray()) {{"
            )?;
            writeln!(out, "        {local}.push_back(json_value.{method}());")?;
            writeln!(out, "    }}")?;
        }
        JsonKind::Object => {
            let function = functions.get(prop.nested_type.as_str()).ok_or(fmt::Error)?;
            writeln!(out, "    {local_type} {local} {{}};")?;
            writeln!(out, "    if ({object}.contains({key})) {{")?;
            writeln!(
                out,
                "        const auto json_parsed = {function}({object}.value({key}).toObject());"
            )?;
            writeln!(out, "        if (!json_parsed) {{")?;
            writeln!(out, "            return std::nullopt;")?;
            writeln!(out, "        }}")?;
            writeln!(out, "        {local} = *json_parsed;")?;
            writeln!(out, "    }}")?;
        }
        JsonKind::ObjectArray => {
            let function = functions.get(prop.nested_type.as_str()).ok_or(fmt::Error)?;
            writeln!(out, "    {local_type} {local} {{}};")?;
            writeln!(
                out,
                "    for (const QJsonValue &json_value : {object}.value({key}).toArray()) {{"
            )?;
            writeln!(
                out,
                "        const auto json_parsed = {function}(json_value.toObject());"
            )?;
            writeln!(out, "        if (!json_parsed) {{")?;
            writeln!(out, "            return std::nullopt;")?;
            writeln!(out, "        }}")?;
            writeln!(out, "        {local}.push_back(*json_parsed);")?;
            writeln!(out, "    }}")?;
        }
    }

    Ok(())
}
