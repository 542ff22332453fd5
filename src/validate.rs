//! Structural checks run before any enrichment.
//!
//! [`validate`] walks the whole declaration tree and either returns a typed
//! [`Schema`] or the first [`Error::SchemaCheck`] it meets. Declarations are
//! checked in order; a nested class scope is fully checked before its next
//! sibling. Name and class-name uniqueness is tracked per scope, so a nested
//! class may reuse names from its parent.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::naming::conversion_method;
use crate::schema::{
    Access, CLASS_TYPE, ClassDecl, JsonBinding, PropertyDecl, PropertyDocument, Schema,
    SchemaDocument,
};
use crate::target::{Capabilities, Target};

/// Location reported for errors in the root fields themselves.
const SCHEMA_LOCATION: &str = "<schema>";

/// Check a schema document for `target` and convert it to a [`Schema`].
pub fn validate(document: &SchemaDocument, target: Target) -> Result<Schema> {
    let caps = target.capabilities();

    let name = document
        .name
        .as_deref()
        .ok_or_else(|| Error::check(SCHEMA_LOCATION, "\"name\" is a mandatory field"))?;
    let module = document
        .module
        .as_deref()
        .ok_or_else(|| Error::check(name, "\"module\" is a mandatory field"))?;
    let declarations = document
        .properties
        .as_deref()
        .ok_or_else(|| Error::check(name, "\"properties\" is a mandatory field"))?;

    if caps.json_plan {
        match document.source.as_deref() {
            None => return Err(Error::check(name, "\"source\" is a mandatory field")),
            Some("json") => {}
            Some(other) => {
                return Err(Error::check(
                    name,
                    format!("only json \"source\" is currently supported, got \"{other}\""),
                ));
            }
        }
    }
    if caps.qt_wrappers && document.no_qt {
        return Err(Error::check(name, "cannot generate Qt beans with \"no_qt\""));
    }

    let properties = check_scope(declarations, name, &caps)?;
    tracing::debug!(bean = name, %target, "schema validated");

    Ok(Schema {
        name: name.to_string(),
        module: module.to_string(),
        properties,
    })
}

/// Check one scope with fresh uniqueness sets.
fn check_scope(
    declarations: &[PropertyDocument],
    scope: &str,
    caps: &Capabilities,
) -> Result<Vec<PropertyDecl>> {
    let mut names = HashSet::new();
    let mut classes = HashSet::new();
    declarations
        .iter()
        .enumerate()
        .map(|(index, decl)| check_property(decl, index, scope, caps, &mut names, &mut classes))
        .collect()
}

fn check_property<'a>(
    decl: &'a PropertyDocument,
    index: usize,
    scope: &str,
    caps: &Capabilities,
    names: &mut HashSet<&'a str>,
    classes: &mut HashSet<&'a str>,
) -> Result<PropertyDecl> {
    let location = match &decl.name {
        Some(name) => format!("{scope}/{name}"),
        None => format!("{scope}/properties[{index}]"),
    };

    let name = decl
        .name
        .as_deref()
        .ok_or_else(|| Error::check(&location, "\"name\" is a mandatory property field"))?;
    if !names.insert(name) {
        return Err(Error::check(
            &location,
            format!("name \"{name}\" is already defined"),
        ));
    }
    let type_name = decl
        .type_name
        .as_deref()
        .ok_or_else(|| Error::check(&location, "\"type\" is a mandatory property field"))?;
    let access = decl
        .access
        .as_deref()
        .ok_or_else(|| Error::check(&location, "\"access\" is a mandatory property field"))?;
    let access = Access::parse(access).ok_or_else(|| {
        Error::check(
            &location,
            format!("\"access\" must be c, r or rw, got \"{access}\""),
        )
    })?;

    let json = if caps.json_plan {
        Some(check_json_binding(decl, type_name, &location)?)
    } else {
        None
    };

    let class = if type_name == CLASS_TYPE {
        let class_name = decl.class_name.as_deref().ok_or_else(|| {
            Error::check(&location, "\"class_name\" is a mandatory property field")
        })?;
        let nested = decl.properties.as_deref().ok_or_else(|| {
            Error::check(&location, "\"properties\" is a mandatory property field")
        })?;
        if !classes.insert(class_name) {
            return Err(Error::check(
                &location,
                format!("type \"{class_name}\" is already defined"),
            ));
        }
        let nested_scope = format!("{scope}::{class_name}");
        Some(ClassDecl {
            class_name: class_name.to_string(),
            properties: check_scope(nested, &nested_scope, caps)?,
        })
    } else {
        None
    };

    Ok(PropertyDecl {
        name: name.to_string(),
        type_name: type_name.to_string(),
        access,
        list: decl.list,
        class,
        json,
    })
}

fn check_json_binding(
    decl: &PropertyDocument,
    type_name: &str,
    location: &str,
) -> Result<JsonBinding> {
    let path = decl
        .json_path
        .as_deref()
        .ok_or_else(|| Error::check(location, "\"json_path\" is a mandatory property field"))?;
    if path.starts_with('/') {
        return Err(Error::check(location, "\"json_path\" must not start with a /"));
    }
    if path.split('/').any(str::is_empty) {
        return Err(Error::check(
            location,
            format!("\"json_path\" \"{path}\" is empty or contains an empty segment"),
        ));
    }
    if conversion_method(type_name).is_none() {
        return Err(Error::check(
            location,
            format!("type \"{type_name}\" cannot be handled by JSON"),
        ));
    }
    Ok(JsonBinding {
        path: path.to_string(),
        optional: decl.json_optional,
    })
}
