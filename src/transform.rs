//! Enrichment of a validated schema into the IR.
//!
//! One pass serves all targets; the target's [`Capabilities`] decide how
//! lists are spelled, whether nested class names are flattened, and whether
//! Qt wrapper or JSON decode details are recorded. Enrichment cannot fail:
//! everything it relies on was established by [`crate::validate`].

use std::collections::BTreeSet;

use crate::error::Result;
use crate::ir::{BeanIr, ClassRecord, JsonProperty, PropertyRecord, QtProperty, TypeKind};
use crate::json_path::{JsonKind, decode_plan, split_rooted_path};
use crate::naming::{
    conversion_method, initial_value, is_qt_type, is_simple_type, list_of, make_getter,
    make_setter, setter_impl, setter_type,
};
use crate::schema::{Access, ClassDecl, PropertyDecl, Schema, SchemaDocument};
use crate::target::{Capabilities, ClassNaming, Target};
use crate::validate::validate;

/// Validate `document` for `target` and enrich it.
pub fn transform(document: &SchemaDocument, target: Target) -> Result<BeanIr> {
    let schema = validate(document, target)?;
    Ok(enrich(&schema, target))
}

/// Build the IR for an already validated schema.
pub fn enrich(schema: &Schema, target: Target) -> BeanIr {
    let caps = target.capabilities();
    let enricher = Enricher {
        schema,
        caps: &caps,
    };
    let root = enricher.class_record(
        schema.name.clone(),
        schema.name.clone(),
        &schema.properties,
        &[schema.name.clone()],
    );
    let ir = BeanIr {
        target,
        includes: includes(&schema.properties, &caps),
        has_list: has_list(&schema.properties),
        root,
    };
    tracing::debug!(
        bean = %schema.name,
        %target,
        classes = ir.class_count(),
        includes = ?ir.includes,
        "schema enriched"
    );
    ir
}

struct Enricher<'a> {
    schema: &'a Schema,
    caps: &'a Capabilities,
}

impl Enricher<'_> {
    /// `scope` is the chain of declared class names enclosing `properties`.
    fn class_record(
        &self,
        name: String,
        nested_name: String,
        properties: &[PropertyDecl],
        scope: &[String],
    ) -> ClassRecord {
        let records = properties
            .iter()
            .map(|decl| self.property(decl, scope))
            .collect();
        let classes = properties
            .iter()
            .filter_map(|decl| decl.class.as_ref())
            .map(|class| self.nested_class(class, scope))
            .collect();

        let json_tree = self.caps.json_plan.then(|| {
            decode_plan(
                properties
                    .iter()
                    .filter_map(|decl| decl.json.as_ref())
                    .map(|binding| binding.path.as_str()),
            )
        });

        ClassRecord {
            name,
            module: self.schema.module.clone(),
            nested_name,
            properties: records,
            classes,
            is_const: is_const(properties),
            root_name: self.caps.json_plan.then(|| self.schema.name.clone()),
            json_tree,
        }
    }

    fn nested_class(&self, class: &ClassDecl, parents: &[String]) -> ClassRecord {
        let name = match self.caps.class_naming {
            ClassNaming::Nested => class.class_name.clone(),
            ClassNaming::Flattened => format!("{}{}", parents.concat(), class.class_name),
        };
        let mut scope = parents.to_vec();
        scope.push(class.class_name.clone());
        self.class_record(
            name,
            qualify(parents, &class.class_name),
            &class.properties,
            &scope,
        )
    }

    fn property(&self, decl: &PropertyDecl, parents: &[String]) -> PropertyRecord {
        let (type_name, nested_type) = match &decl.class {
            Some(class) => (
                class.class_name.clone(),
                qualify(parents, &class.class_name),
            ),
            None => (decl.type_name.clone(), decl.type_name.clone()),
        };
        let (member_type, nested_member_type) = if decl.list {
            (
                list_of(self.caps.list_container, &type_name),
                list_of(self.caps.list_container, &nested_type),
            )
        } else {
            (type_name.clone(), nested_type.clone())
        };

        let type_type = if decl.list {
            TypeKind::List
        } else if is_simple_type(&decl.type_name) {
            TypeKind::Simple
        } else {
            TypeKind::Object
        };
        let initial = if decl.list {
            ""
        } else {
            initial_value(&decl.type_name)
        };

        let qt = self.caps.qt_wrappers.then(|| {
            let qt_class = decl
                .class
                .as_ref()
                .map(|class| format!("{}{}Object", parents.concat(), class.class_name));
            QtProperty {
                qt_type: match &qt_class {
                    Some(class) => format!("{class} *"),
                    None => decl.type_name.clone(),
                },
                is_qt_object: qt_class.is_some(),
                qt_class,
                nested_name: qualify(parents, &decl.name),
            }
        });

        let json = decl
            .json
            .as_ref()
            .filter(|_| self.caps.json_plan)
            .map(|binding| {
                let (prefix, suffix) = split_rooted_path(&binding.path);
                JsonProperty {
                    json_path: binding.path.clone(),
                    json_optional: binding.optional,
                    json_type: JsonKind::classify(decl.is_class(), decl.list),
                    json_prefix: prefix,
                    json_suffix: suffix,
                    json_conversion_method: conversion_method(&decl.type_name)
                        .unwrap_or_default()
                        .to_string(),
                }
            });

        PropertyRecord {
            name: decl.name.clone(),
            access: decl.access,
            type_name,
            nested_type,
            type_type,
            getter: make_getter(&decl.type_name, &decl.name),
            setter: (decl.access == Access::ReadWrite).then(|| make_setter(&decl.name)),
            initial_value: initial.to_string(),
            setter_type: setter_type(&member_type),
            setter_impl: setter_impl(&member_type, &decl.name),
            member_type,
            nested_member_type,
            qt,
            json,
        }
    }
}

fn qualify(parents: &[String], name: &str) -> String {
    format!("{}::{name}", parents.join("::"))
}

/// A class is const when every one of its own properties is; nested classes
/// do not count.
fn is_const(properties: &[PropertyDecl]) -> bool {
    properties.iter().all(|decl| decl.access == Access::Const)
}

fn has_list(properties: &[PropertyDecl]) -> bool {
    properties.iter().any(|decl| {
        decl.list
            || decl
                .class
                .as_ref()
                .is_some_and(|class| has_list(&class.properties))
    })
}

/// Qt leaf types referenced anywhere in the tree.
fn qt_types(properties: &[PropertyDecl]) -> BTreeSet<String> {
    let mut types = BTreeSet::new();
    for decl in properties {
        if is_qt_type(&decl.type_name) {
            types.insert(decl.type_name.clone());
        }
        if let Some(class) = &decl.class {
            types.extend(qt_types(&class.properties));
        }
    }
    types
}

fn includes(properties: &[PropertyDecl], caps: &Capabilities) -> Vec<String> {
    let mut includes = Vec::new();
    if has_list(properties) {
        includes.push(caps.list_include.to_string());
    }
    if caps.qt_type_includes {
        includes.extend(qt_types(properties));
    }
    includes
}
