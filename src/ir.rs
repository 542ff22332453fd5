//! Enriched intermediate representation handed to the renderer.
//!
//! The IR mirrors the schema tree, but each node carries every value the
//! renderer needs, so rendering is pure string assembly. All types serialize
//! with serde for `--emit-ir` dumps.

use serde::Serialize;

use crate::json_path::{JsonKind, JsonLookup};
use crate::schema::Access;
use crate::target::Target;

/// One generation target's view of a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeanIr {
    pub target: Target,
    /// Headers the generated code needs. The list header, if any, comes
    /// first; the rest are sorted.
    pub includes: Vec<String>,
    /// Whether any property at any depth is a list.
    pub has_list: bool,
    pub root: ClassRecord,
}

impl BeanIr {
    /// Number of class records in the tree, root included.
    pub fn class_count(&self) -> usize {
        self.root.class_count()
    }
}

/// A generated class: the root bean or a nested class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRecord {
    /// Declared name; flattened with its parents for the Qt target.
    pub name: String,
    pub module: String,
    /// `::`-qualified name from the root bean down.
    pub nested_name: String,
    pub properties: Vec<PropertyRecord>,
    pub classes: Vec<ClassRecord>,
    /// All direct properties are construction-only.
    #[serde(rename = "const")]
    pub is_const: bool,
    /// Root bean name (factory target only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_name: Option<String>,
    /// Scope-local JSON lookup plan (factory target only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_tree: Option<Vec<JsonLookup>>,
}

impl ClassRecord {
    pub fn class_count(&self) -> usize {
        1 + self.classes.iter().map(ClassRecord::class_count).sum::<usize>()
    }
}

/// Storage shape of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Simple,
    List,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub name: String,
    pub access: Access,
    /// Declared type: the class name for nested classes, the bare type
    /// otherwise. Never wrapped in a list container.
    #[serde(rename = "type")]
    pub type_name: String,
    /// `type` qualified with every enclosing class name (`Root::Item`).
    pub nested_type: String,
    /// Member type as spelled inside the owning class, list container
    /// included (`std::vector<Item>`).
    pub member_type: String,
    /// Member type as spelled outside the owning class
    /// (`std::vector<Root::Item>`).
    pub nested_member_type: String,
    pub type_type: TypeKind,
    pub getter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setter: Option<String>,
    pub initial_value: String,
    pub setter_type: String,
    pub setter_impl: String,
    #[serde(flatten)]
    pub qt: Option<QtProperty>,
    #[serde(flatten)]
    pub json: Option<JsonProperty>,
}

/// Qt wrapper details of a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QtProperty {
    /// Pointer to the wrapper for class-typed properties, the declared type
    /// otherwise.
    pub qt_type: String,
    /// Wrapper class for class-typed properties, lists included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qt_class: Option<String>,
    pub is_qt_object: bool,
    pub nested_name: String,
}

/// JSON decode details of a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonProperty {
    pub json_path: String,
    pub json_optional: bool,
    pub json_type: JsonKind,
    /// Objects to walk through, starting at `root`.
    pub json_prefix: Vec<String>,
    /// Key holding the value.
    pub json_suffix: String,
    pub json_conversion_method: String,
}
