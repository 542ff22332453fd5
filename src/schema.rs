//! Bean schema types and YAML loading.
//!
//! A schema is read in two stages. [`SchemaDocument`] mirrors the YAML
//! document as written, with every field optional so that missing keys can be
//! reported by the validator instead of by serde. [`crate::validate`] then
//! turns a document into a [`Schema`], whose fields are guaranteed present.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The `type` sentinel marking a nested class declaration.
pub const CLASS_TYPE: &str = "class";

/// A bean schema as it appears in the YAML file.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaDocument {
    /// Root class name (e.g., `"Person"`).
    #[serde(default)]
    pub name: Option<String>,

    /// Namespace the generated code lives in.
    #[serde(default)]
    pub module: Option<String>,

    /// Data source for the factory target. Only `"json"` is supported.
    #[serde(default)]
    pub source: Option<String>,

    /// Forbids Qt object wrappers for this bean.
    #[serde(default)]
    pub no_qt: bool,

    /// Root property declarations.
    #[serde(default)]
    pub properties: Option<Vec<PropertyDocument>>,
}

/// One property declaration as written in the YAML file.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyDocument {
    #[serde(default)]
    pub name: Option<String>,

    /// Primitive tag, compound type name, or `class`.
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,

    /// `c`, `r` or `rw`.
    #[serde(default)]
    pub access: Option<String>,

    #[serde(default)]
    pub list: bool,

    /// Required when `type` is `class`.
    #[serde(default)]
    pub class_name: Option<String>,

    /// Nested declarations, required when `type` is `class`.
    #[serde(default)]
    pub properties: Option<Vec<PropertyDocument>>,

    /// Slash-delimited location of the value in a JSON document.
    #[serde(default)]
    pub json_path: Option<String>,

    #[serde(default)]
    pub json_optional: bool,
}

/// Property access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Access {
    /// Set once at construction.
    #[serde(rename = "c")]
    Const,
    /// Read-only.
    #[serde(rename = "r")]
    Read,
    /// Read-write; gets a setter.
    #[serde(rename = "rw")]
    ReadWrite,
}

impl Access {
    /// Parse the schema spelling of an access mode.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "c" => Some(Access::Const),
            "r" => Some(Access::Read),
            "rw" => Some(Access::ReadWrite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Access::Const => "c",
            Access::Read => "r",
            Access::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated bean schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub module: String,
    pub properties: Vec<PropertyDecl>,
}

/// A validated property declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub type_name: String,
    pub access: Access,
    pub list: bool,
    /// Present iff `type_name` is [`CLASS_TYPE`].
    pub class: Option<ClassDecl>,
    /// Present iff the schema was validated for the factory target.
    pub json: Option<JsonBinding>,
}

impl PropertyDecl {
    pub fn is_class(&self) -> bool {
        self.class.is_some()
    }
}

/// A nested class declared inline by a `class`-typed property.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub class_name: String,
    pub properties: Vec<PropertyDecl>,
}

/// Where a property lives in the JSON source document.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBinding {
    pub path: String,
    pub optional: bool,
}

/// Parse a schema document from YAML text.
pub fn parse_schema(content: &str) -> Result<SchemaDocument> {
    let document: SchemaDocument = serde_yaml::from_str(content)?;
    Ok(document)
}

/// Load a schema document from a YAML file.
pub fn load_schema(path: &Path) -> Result<SchemaDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let document = parse_schema(&content)?;
    tracing::debug!(
        path = %path.display(),
        properties = document.properties.as_ref().map_or(0, Vec::len),
        "loaded schema"
    );
    Ok(document)
}
