//! JSON path trees and decode plans for the factory target.
//!
//! Every property of a scope carries a slash-delimited `json_path`. The
//! segments before the last one name the objects to walk through; the last
//! one is the key holding the value. All paths are rooted at a synthetic
//! [`ROOT_SEGMENT`] standing for the document object handed to the factory.
//!
//! The navigation prefixes of a scope are merged into a [`PathTree`], which
//! flattens into a [`JsonLookup`] plan: each nested object is looked up once,
//! after its parent, in the order the schema first mentions it.

use indexmap::IndexMap;
use serde::Serialize;

/// Synthetic first segment of every rooted path.
pub const ROOT_SEGMENT: &str = "root";

/// How a property value is pulled out of JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    /// A scalar converted in place.
    Simple,
    /// An array of scalars.
    Array,
    /// A nested object decoded as a class.
    Object,
    /// An array of nested objects.
    ObjectArray,
}

impl JsonKind {
    pub fn classify(is_class: bool, is_list: bool) -> Self {
        match (is_class, is_list) {
            (true, true) => JsonKind::ObjectArray,
            (false, true) => JsonKind::Array,
            (true, false) => JsonKind::Object,
            (false, false) => JsonKind::Simple,
        }
    }
}

/// One step of a decode plan: look up `key` in the object reached via
/// `parents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonLookup {
    pub parents: Vec<String>,
    pub key: String,
}

/// Split a path into its navigation prefix and final key.
///
/// - `"test/hello/world"` → `(["test", "hello"], "world")`
/// - `"test"` → `([], "test")`
pub fn split_path(path: &str) -> (Vec<String>, String) {
    let mut segments: Vec<String> = path.split('/').map(str::to_string).collect();
    let suffix = segments.pop().unwrap_or_default();
    (segments, suffix)
}

/// Split a path after rooting it at [`ROOT_SEGMENT`]; the prefix is never
/// empty.
///
/// `"a/b"` → `(["root", "a"], "b")`, `"b"` → `(["root"], "b")`.
pub fn split_rooted_path(path: &str) -> (Vec<String>, String) {
    split_path(&format!("{ROOT_SEGMENT}/{path}"))
}

/// Insertion-ordered tree of path segments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathTree {
    children: IndexMap<String, PathTree>,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a sequence of segment paths.
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut tree = Self::new();
        for path in paths {
            tree.insert(path);
        }
        tree
    }

    /// Merge a segment path into the tree, sharing any existing prefix.
    pub fn insert(&mut self, segments: &[String]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        self.children.entry(first.clone()).or_default().insert(rest);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Flatten depth-first into the lookup plan.
    ///
    /// Every node yields `(ancestors, child)` before its own subtree. Top-level
    /// nodes have no ancestors and are never emitted themselves.
    pub fn flatten(&self) -> Vec<JsonLookup> {
        self.flatten_below(&[])
    }

    fn flatten_below(&self, hierarchy: &[String]) -> Vec<JsonLookup> {
        self.children
            .iter()
            .flat_map(|(key, child)| {
                let mut lookups = Vec::new();
                if !hierarchy.is_empty() {
                    lookups.push(JsonLookup {
                        parents: hierarchy.to_vec(),
                        key: key.clone(),
                    });
                }
                let mut below = hierarchy.to_vec();
                below.push(key.clone());
                lookups.extend(child.flatten_below(&below));
                lookups
            })
            .collect()
    }
}

/// Decode plan for one scope from the `json_path` of each of its properties.
pub fn decode_plan<'a, I>(json_paths: I) -> Vec<JsonLookup>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefixes: Vec<Vec<String>> = json_paths
        .into_iter()
        .map(|path| split_rooted_path(path).0)
        .collect();
    PathTree::from_paths(prefixes.iter().map(Vec::as_slice)).flatten()
}
