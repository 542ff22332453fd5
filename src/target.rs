//! Generation targets and the capabilities each one switches on.
//!
//! The enricher runs a single pass for every target; what differs between a
//! plain bean, a Qt object wrapper and a JSON factory is captured by a
//! [`Capabilities`] value.

use std::fmt;

use serde::Serialize;

/// What to generate from a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Plain C++ record with getters and setters.
    Bean,
    /// `QObject` wrapper exposing the bean as Qt properties.
    QtBean,
    /// Factory decoding the bean from a JSON document.
    Factory,
}

/// How nested class names appear in the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassNaming {
    /// `Test` stays `Test`, nested inside its parent.
    Nested,
    /// `Test` inside `Root` becomes `RootTest`; Qt's meta-object model
    /// cannot declare nested `QObject` types.
    Flattened,
}

/// Per-target switches for the enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Template wrapping list properties (e.g., `std::vector`).
    pub list_container: &'static str,
    /// Header required as soon as any property is a list.
    pub list_include: &'static str,
    /// Whether `Q*` leaf types are added to the include list.
    pub qt_type_includes: bool,
    pub class_naming: ClassNaming,
    /// Record Qt wrapper types on properties.
    pub qt_wrappers: bool,
    /// Require JSON bindings and build the JSON decode plan.
    pub json_plan: bool,
}

impl Target {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Target::Bean => Capabilities {
                list_container: "std::vector",
                list_include: "vector",
                qt_type_includes: true,
                class_naming: ClassNaming::Nested,
                qt_wrappers: false,
                json_plan: false,
            },
            Target::QtBean => Capabilities {
                list_container: "std::vector",
                list_include: "vector",
                qt_type_includes: true,
                class_naming: ClassNaming::Flattened,
                qt_wrappers: true,
                json_plan: false,
            },
            Target::Factory => Capabilities {
                list_container: "std::vector",
                list_include: "QJsonArray",
                qt_type_includes: false,
                class_naming: ClassNaming::Nested,
                qt_wrappers: false,
                json_plan: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Bean => "bean",
            Target::QtBean => "qtbean",
            Target::Factory => "factory",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_factory_builds_json_plan() {
        assert!(!Target::Bean.capabilities().json_plan);
        assert!(!Target::QtBean.capabilities().json_plan);
        assert!(Target::Factory.capabilities().json_plan);
    }

    #[test]
    fn qtbean_flattens_and_wraps() {
        let caps = Target::QtBean.capabilities();
        assert_eq!(caps.class_naming, ClassNaming::Flattened);
        assert!(caps.qt_wrappers);
        assert_eq!(Target::Bean.capabilities().class_naming, ClassNaming::Nested);
    }

    #[test]
    fn list_headers() {
        assert_eq!(Target::Bean.capabilities().list_include, "vector");
        assert_eq!(Target::Factory.capabilities().list_include, "QJsonArray");
        assert!(!Target::Factory.capabilities().qt_type_includes);
    }

    #[test]
    fn display_names() {
        assert_eq!(Target::QtBean.to_string(), "qtbean");
        assert_eq!(
            serde_json::to_string(&Target::Factory).unwrap(),
            "\"factory\""
        );
    }
}
