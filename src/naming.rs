//! Naming and typing rules for generated C++ members.
//!
//! # Type Table
//!
//! | Schema type | Classification | Initial value | JSON conversion |
//! |-------------|----------------|---------------|-----------------|
//! | `int`       | simple         | `0`           | `toInt`         |
//! | `double`    | simple         | `0.`          | `toDouble`      |
//! | `bool`      | simple         | `false`       | `toBool`        |
//! | `QString`   | object         | (empty)       | `toString`      |
//! | `class`     | object         | (empty)       | `toObject`      |
//! | other       | object         | (empty)       | none            |
//!
//! An empty initial value means the member is default-constructed.

use crate::schema::CLASS_TYPE;

/// Upper-case the first character: `"helloWorld"` → `"HelloWorld"`.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}

/// Getter name: `is<Name>` for `bool`, the bare name otherwise.
pub fn make_getter(type_name: &str, name: &str) -> String {
    if type_name == "bool" {
        format!("is{}", upper_first(name))
    } else {
        name.to_string()
    }
}

/// Setter name: `"hello"` → `"setHello"`.
pub fn make_setter(name: &str) -> String {
    format!("set{}", upper_first(name))
}

/// Whether a type is one of the primitive tags passed by value.
pub fn is_simple_type(type_name: &str) -> bool {
    matches!(type_name, "int" | "double" | "bool")
}

/// Default member initializer for a type.
pub fn initial_value(type_name: &str) -> &'static str {
    match type_name {
        "int" => "0",
        "double" => "0.",
        "bool" => "false",
        _ => "",
    }
}

/// Parameter type prefix for setters and constructors.
///
/// Simple types are taken by value, everything else by rvalue reference:
/// `"int"` → `"int "`, `"QString"` → `"QString &&"`.
pub fn setter_type(type_name: &str) -> String {
    if is_simple_type(type_name) {
        format!("{type_name} ")
    } else {
        format!("{type_name} &&")
    }
}

/// Expression storing a setter parameter: the name, or `std::move(name)`.
pub fn setter_impl(type_name: &str, name: &str) -> String {
    if is_simple_type(type_name) {
        name.to_string()
    } else {
        format!("std::move({name})")
    }
}

/// Whether a type belongs to the Qt family and needs its own include.
pub fn is_qt_type(type_name: &str) -> bool {
    type_name.starts_with('Q')
}

/// `QJsonValue` conversion for a schema type, or `None` when JSON cannot
/// carry it.
pub fn conversion_method(type_name: &str) -> Option<&'static str> {
    let method = match type_name {
        "QString" => "toString",
        "int" => "toInt",
        "double" => "toDouble",
        "bool" => "toBool",
        CLASS_TYPE => "toObject",
        _ => return None,
    };
    Some(method)
}

/// Wrap an element type in a list container: `std::vector<QString>`.
pub fn list_of(container: &str, element: &str) -> String {
    format!("{container}<{element}>")
}

/// Turn an arbitrary JSON key into a C++ identifier fragment.
///
/// Non-alphanumeric characters become `_`:
/// - `"user-name"` → `"user_name"`
/// - `"a.b"` → `"a_b"`
pub fn to_identifier(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_first_conversion() {
        assert_eq!(upper_first("hello"), "Hello");
        assert_eq!(upper_first("helloWorld"), "HelloWorld");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn getter_names() {
        assert_eq!(make_getter("bool", "hello"), "isHello");
        assert_eq!(make_getter("int", "hello"), "hello");
        assert_eq!(make_getter("QString", "hello"), "hello");
    }

    #[test]
    fn setter_names() {
        assert_eq!(make_setter("hello"), "setHello");
        assert_eq!(make_setter("firstName"), "setFirstName");
    }

    #[test]
    fn simple_type_classification() {
        assert!(is_simple_type("bool"));
        assert!(is_simple_type("int"));
        assert!(is_simple_type("double"));
        assert!(!is_simple_type("QString"));
        assert!(!is_simple_type("std::vector<bool>"));
    }

    #[test]
    fn initial_values() {
        assert_eq!(initial_value("bool"), "false");
        assert_eq!(initial_value("int"), "0");
        assert_eq!(initial_value("double"), "0.");
        assert_eq!(initial_value("QString"), "");
        assert_eq!(initial_value("std::vector<bool>"), "");
    }

    #[test]
    fn setter_parameter_types() {
        assert_eq!(setter_type("bool"), "bool ");
        assert_eq!(setter_type("int"), "int ");
        assert_eq!(setter_type("double"), "double ");
        assert_eq!(setter_type("QString"), "QString &&");
    }

    #[test]
    fn setter_store_expressions() {
        assert_eq!(setter_impl("bool", "value"), "value");
        assert_eq!(setter_impl("double", "value"), "value");
        assert_eq!(setter_impl("QString", "value"), "std::move(value)");
    }

    #[test]
    fn qt_type_family() {
        assert!(is_qt_type("QString"));
        assert!(is_qt_type("QDateTime"));
        assert!(!is_qt_type("int"));
        assert!(!is_qt_type("class"));
    }

    #[test]
    fn conversion_methods() {
        assert_eq!(conversion_method("QString"), Some("toString"));
        assert_eq!(conversion_method("int"), Some("toInt"));
        assert_eq!(conversion_method("double"), Some("toDouble"));
        assert_eq!(conversion_method("bool"), Some("toBool"));
        assert_eq!(conversion_method("class"), Some("toObject"));
        assert_eq!(conversion_method("QDateTime"), None);
    }

    #[test]
    fn identifier_sanitizing() {
        assert_eq!(to_identifier("user-name"), "user_name");
        assert_eq!(to_identifier("a.b"), "a_b");
        assert_eq!(to_identifier("plain"), "plain");
    }
}
