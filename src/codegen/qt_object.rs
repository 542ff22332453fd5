//! `QObject` wrappers exposing a bean through Qt properties.
//!
//! Every class record gets its own top-level wrapper named after its
//! flattened class name. A wrapper owns a copy of the bean plus one child
//! wrapper per nested-object property; `update()` replaces the data and emits
//! change signals for the properties whose value moved.

use std::fmt::{self, Write};

use super::{RenderedFile, include_guard};
use crate::ir::{BeanIr, ClassRecord, PropertyRecord, TypeKind};
use crate::schema::Access;

pub(super) fn render(ir: &BeanIr, stem: &str) -> Result<Vec<RenderedFile>, fmt::Error> {
    Ok(vec![
        RenderedFile {
            name: format!("{stem}object.h"),
            contents: header(ir, stem)?,
        },
        RenderedFile {
            name: format!("{stem}object.cpp"),
            contents: source(ir, stem)?,
        },
    ])
}

/// Wrapped classes, children before parents.
fn wrapped_classes(class: &ClassRecord) -> Vec<&ClassRecord> {
    let mut classes: Vec<&ClassRecord> = class.classes.iter().flat_map(wrapped_classes).collect();
    classes.push(class);
    classes
}

fn wrapper_name(class: &ClassRecord) -> String {
    format!("{}Object", class.name)
}

fn bean_type(class: &ClassRecord) -> String {
    format!("::{}::{}", class.module, class.nested_name)
}

/// Properties held as a child wrapper. Lists of classes are exposed as plain
/// values even though their element type has a wrapper.
fn is_object(prop: &PropertyRecord) -> bool {
    prop.type_type != TypeKind::List && prop.qt.as_ref().is_some_and(|qt| qt.is_qt_object)
}

/// Type exposed through `Q_PROPERTY` and the getter.
fn qt_type(prop: &PropertyRecord) -> &str {
    match &prop.qt {
        Some(qt) if prop.type_type != TypeKind::List => &qt.qt_type,
        _ => &prop.nested_member_type,
    }
}

/// Properties that announce changes through a `<name>Changed` signal.
fn notifies(prop: &PropertyRecord) -> bool {
    !is_object(prop) && prop.access != Access::Const
}

fn setter_parameter(prop: &PropertyRecord) -> String {
    if prop.type_type == TypeKind::Simple {
        format!("{} {}", prop.nested_member_type, prop.name)
    } else {
        format!("{} &&{}", prop.nested_member_type, prop.name)
    }
}

fn header(ir: &BeanIr, stem: &str) -> Result<String, fmt::Error> {
    let guard = include_guard(stem, "OBJECT_H");
    let module = &ir.root.module;
    let mut out = String::new();

    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include <QObject>")?;
    if ir.has_list {
        writeln!(out, "#include <vector>")?;
    }
    writeln!(out, "#include \"{stem}.h\"")?;
    writeln!(out)?;
    writeln!(out, "namespace {module}::qt {{")?;

    for class in wrapped_classes(&ir.root) {
        writeln!(out)?;
        write_declaration(&mut out, class)?;
    }

    writeln!(out)?;
    writeln!(out, "}} // namespace {module}::qt")?;
    writeln!(out)?;
    writeln!(out, "#endif // {guard}")?;

    Ok(out)
}

fn write_declaration(out: &mut String, class: &ClassRecord) -> fmt::Result {
    let wrapper = wrapper_name(class);
    let bean = bean_type(class);

    writeln!(out, "class {wrapper} : public QObject")?;
    writeln!(out, "{{")?;
    writeln!(out, "    Q_OBJECT")?;
    for prop in &class.properties {
        let mut line = format!("    Q_PROPERTY({} {} READ {}", qt_type(prop), prop.name, prop.getter);
        if let Some(setter) = prop.setter.as_ref().filter(|_| !is_object(prop)) {
            write!(line, " WRITE {setter}")?;
        }
        if notifies(prop) {
            write!(line, " NOTIFY {}Changed", prop.name)?;
        } else {
            line.push_str(" CONSTANT");
        }
        writeln!(out, "{line})")?;
    }
    writeln!(out, "public:")?;
    writeln!(out, "    explicit {wrapper}(QObject *parent = nullptr);")?;
    writeln!(out, "    explicit {wrapper}({bean} &&data, QObject *parent = nullptr);")?;
    for prop in &class.properties {
        writeln!(out, "    {} {}() const;", qt_type(prop), prop.getter)?;
        if let Some(setter) = prop.setter.as_ref().filter(|_| !is_object(prop)) {
            writeln!(out, "    void {setter}({});", setter_parameter(prop))?;
        }
    }
    writeln!(out, "    {bean} data() const;")?;
    writeln!(out, "    void update({bean} &&data);")?;

    if class.properties.iter().any(notifies) {
        writeln!(out, "Q_SIGNALS:")?;
        for prop in class.properties.iter().filter(|prop| notifies(prop)) {
            writeln!(out, "    void {}Changed();", prop.name)?;
        }
    }

    writeln!(out, "private:")?;
    writeln!(out, "    {bean} m_data {{}};")?;
    for prop in class.properties.iter().filter(|prop| is_object(prop)) {
        writeln!(out, "    {} m_{} {{nullptr}};", qt_type(prop), prop.name)?;
    }
    writeln!(out, "}};")?;

    Ok(())
}

fn source(ir: &BeanIr, stem: &str) -> Result<String, fmt::Error> {
    let module = &ir.root.module;
    let mut out = String::new();

    writeln!(out, "#include \"{stem}object.h\"")?;
    writeln!(out)?;
    writeln!(out, "namespace {module}::qt {{")?;

    for class in wrapped_classes(&ir.root) {
        writeln!(out)?;
        write_definitions(&mut out, class)?;
    }

    writeln!(out)?;
    writeln!(out, "}} // namespace {module}::qt")?;

    Ok(out)
}

fn write_definitions(out: &mut String, class: &ClassRecord) -> fmt::Result {
    let wrapper = wrapper_name(class);
    let bean = bean_type(class);
    let objects: Vec<&PropertyRecord> = class.properties.iter().filter(|prop| is_object(prop)).collect();

    writeln!(out, "{wrapper}::{wrapper}(QObject *parent)")?;
    writeln!(out, "    : {wrapper}({bean}(), parent)")?;
    writeln!(out, "{{")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "{wrapper}::{wrapper}({bean} &&data, QObject *parent)")?;
    writeln!(out, "    : QObject(parent)")?;
    writeln!(out, "    , m_data {{std::move(data)}}")?;
    for prop in &objects {
        let child = prop.qt.as_ref().and_then(|qt| qt.qt_class.as_deref()).unwrap_or_default();
        writeln!(
            out,
            "    , m_{} {{new {child}(m_data.{}(), this)}}",
            prop.name, prop.getter
        )?;
    }
    writeln!(out, "{{")?;
    writeln!(out, "}}")?;

    for prop in &class.properties {
        writeln!(out)?;
        writeln!(out, "{} {wrapper}::{}() const", qt_type(prop), prop.getter)?;
        writeln!(out, "{{")?;
        if is_object(prop) {
            writeln!(out, "    return m_{};", prop.name)?;
        } else {
            writeln!(out, "    return m_data.{}();", prop.getter)?;
        }
        writeln!(out, "}}")?;

        if let Some(setter) = prop.setter.as_ref().filter(|_| !is_object(prop)) {
            writeln!(out)?;
            writeln!(out, "void {wrapper}::{setter}({})", setter_parameter(prop))?;
            writeln!(out, "{{")?;
            writeln!(out, "    if (m_data.{}() == {}) {{", prop.getter, prop.name)?;
            writeln!(out, "        return;")?;
            writeln!(out, "    }}")?;
            writeln!(out, "    m_data.{setter}({});", prop.setter_impl)?;
            writeln!(out, "    Q_EMIT {}Changed();", prop.name)?;
            writeln!(out, "}}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{bean} {wrapper}::data() const")?;
    writeln!(out, "{{")?;
    if class.properties.is_empty() {
        writeln!(out, "    return {bean} {{}};")?;
    } else {
        let values: Vec<String> = class
            .properties
            .iter()
            .map(|prop| {
                if is_object(prop) {
                    format!("m_{}->data()", prop.name)
                } else {
                    format!("m_data.{}()", prop.getter)
                }
            })
            .collect();
        writeln!(out, "    return {bean} {{")?;
        writeln!(out, "        {}", values.join(",\n        "))?;
        writeln!(out, "    }};")?;
    }
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(out, "void {wrapper}::update({bean} &&data)")?;
    writeln!(out, "{{")?;
    let notifying: Vec<&PropertyRecord> = class.properties.iter().filter(|prop| notifies(prop)).collect();
    if !notifying.is_empty() {
        writeln!(out, "    const {bean} previous {{m_data}};")?;
    }
    writeln!(out, "    m_data = std::move(data);")?;
    for prop in &objects {
        writeln!(out, "    m_{}->update(m_data.{}());", prop.name, prop.getter)?;
    }
    for prop in &notifying {
        writeln!(out, "    if (previous.{0}() != m_data.{0}()) {{", prop.getter)?;
        writeln!(out, "        Q_EMIT {}Changed();", prop.name)?;
        writeln!(out, "    }}")?;
    }
    writeln!(out, "}}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassDecl, PropertyDecl, Schema};
    use crate::target::Target;
    use crate::transform::enrich;

    fn decl(name: &str, type_name: &str, access: Access) -> PropertyDecl {
        PropertyDecl {
            name: name.to_string(),
            type_name: type_name.to_string(),
            access,
            list: false,
            class: None,
            json: None,
        }
    }

    fn object_test_ir() -> BeanIr {
        let content = |name: &str, class_name: &str| PropertyDecl {
            class: Some(ClassDecl {
                class_name: class_name.to_string(),
                properties: vec![
                    decl("constant", "QString", Access::Const),
                    decl("readOnly", "QString", Access::Read),
                    decl("readWrite", "QString", Access::ReadWrite),
                ],
            }),
            ..decl(name, "class", Access::Const)
        };
        let schema = Schema {
            name: "ObjectTest".to_string(),
            module: "microcore::test".to_string(),
            properties: vec![
                content("readWriteContent", "ReadWriteContent"),
                content("constantContent", "ConstantContent"),
            ],
        };
        enrich(&schema, Target::QtBean)
    }

    #[test]
    fn file_names() {
        let files = render(&object_test_ir(), "object_test").unwrap();
        assert_eq!(files[0].name, "object_testobject.h");
        assert_eq!(files[1].name, "object_testobject.cpp");
    }

    #[test]
    fn wrappers_declared_children_first() {
        let files = render(&object_test_ir(), "object_test").unwrap();
        let header = &files[0].contents;

        assert!(header.contains("#include \"object_test.h\""));
        assert!(header.contains("namespace microcore::test::qt {"));
        let child_at = header.find("class ObjectTestReadWriteContentObject : public QObject").unwrap();
        let root_at = header.find("class ObjectTestObject : public QObject").unwrap();
        assert!(child_at < root_at);
        assert!(!header.contains("#include <vector>"));
    }

    #[test]
    fn property_declarations() {
        let files = render(&object_test_ir(), "object_test").unwrap();
        let header = &files[0].contents;

        assert!(header.contains(
            "    Q_PROPERTY(ObjectTestReadWriteContentObject * readWriteContent READ readWriteContent CONSTANT)"
        ));
        assert!(header.contains("    Q_PROPERTY(QString constant READ constant CONSTANT)"));
        assert!(header.contains("    Q_PROPERTY(QString readOnly READ readOnly NOTIFY readOnlyChanged)"));
        assert!(header.contains(
            "    Q_PROPERTY(QString readWrite READ readWrite WRITE setReadWrite NOTIFY readWriteChanged)"
        ));
        assert!(header.contains("    void setReadWrite(QString &&readWrite);"));
        assert!(header.contains("    ::microcore::test::ObjectTest data() const;"));
        assert!(header.contains("    void update(::microcore::test::ObjectTest::ConstantContent &&data);"));
        assert!(header.contains("    ObjectTestConstantContentObject * m_constantContent {nullptr};"));
    }

    #[test]
    fn definitions() {
        let files = render(&object_test_ir(), "object_test").unwrap();
        let source = &files[1].contents;

        assert!(source.starts_with("#include \"object_testobject.h\""));
        assert!(source.contains(
            "    , m_readWriteContent {new ObjectTestReadWriteContentObject(m_data.readWriteContent(), this)}"
        ));
        assert!(source.contains("    return m_data.readOnly();"));
        assert!(source.contains("    m_data.setReadWrite(std::move(readWrite));\n    Q_EMIT readWriteChanged();"));
        assert!(source.contains("        m_readWriteContent->data(),\n        m_constantContent->data()"));
        assert!(source.contains("    m_constantContent->update(m_data.constantContent());"));
        assert!(source.contains("    if (previous.readOnly() != m_data.readOnly()) {"));
    }

    #[test]
    fn list_support_included_when_needed() {
        let schema = Schema {
            name: "Tags".to_string(),
            module: "app".to_string(),
            properties: vec![PropertyDecl {
                list: true,
                ..decl("values", "int", Access::ReadWrite)
            }],
        };
        let files = render(&enrich(&schema, Target::QtBean), "tags").unwrap();
        assert!(files[0].contents.contains("#include <vector>"));
        assert!(files[0].contents.contains("    void setValues(std::vector<int> &&values);"));
    }

    #[test]
    fn list_of_classes_exposed_as_value() {
        let schema = Schema {
            name: "Order".to_string(),
            module: "shop".to_string(),
            properties: vec![PropertyDecl {
                list: true,
                class: Some(ClassDecl {
                    class_name: "Line".to_string(),
                    properties: vec![decl("sku", "QString", Access::Const)],
                }),
                ..decl("lines", "class", Access::ReadWrite)
            }],
        };
        let ir = enrich(&schema, Target::QtBean);
        let qt = ir.root.properties[0].qt.as_ref().unwrap();
        assert_eq!(qt.qt_class.as_deref(), Some("OrderLineObject"));

        let files = render(&ir, "order").unwrap();
        let header = &files[0].contents;
        assert!(header.contains(
            "    Q_PROPERTY(std::vector<Order::Line> lines READ lines WRITE setLines NOTIFY linesChanged)"
        ));
        assert!(header.contains("    void setLines(std::vector<Order::Line> &&lines);"));
        assert!(!header.contains("m_lines"));
        assert!(files[1].contents.contains("    return m_data.lines();"));
    }
}
