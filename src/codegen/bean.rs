//! Plain C++ value classes.

use std::fmt::{self, Write};

use super::{RenderedFile, include_guard, indent};
use crate::ir::{BeanIr, ClassRecord};

/// Header providing `DEFAULT_COPY_DEFAULT_MOVE`.
const GLOBALS_INCLUDE: &str = "microcore/core/globals.h";

pub(super) fn render(ir: &BeanIr, stem: &str) -> Result<Vec<RenderedFile>, fmt::Error> {
    Ok(vec![
        RenderedFile {
            name: format!("{stem}.h"),
            contents: header(ir, stem)?,
        },
        RenderedFile {
            name: format!("{stem}.cpp"),
            contents: source(ir, stem)?,
        },
    ])
}

fn header(ir: &BeanIr, stem: &str) -> Result<String, fmt::Error> {
    let guard = include_guard(stem, "H");
    let module = &ir.root.module;
    let mut out = String::new();

    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include <{GLOBALS_INCLUDE}>")?;
    for include in &ir.includes {
        writeln!(out, "#include <{include}>")?;
    }
    writeln!(out)?;
    writeln!(out, "namespace {module} {{")?;
    writeln!(out)?;
    write!(out, "{}", class_declaration(&ir.root)?)?;
    writeln!(out)?;
    writeln!(out, "}} // namespace {module}")?;
    writeln!(out)?;
    writeln!(out, "#endif // {guard}")?;

    Ok(out)
}

fn source(ir: &BeanIr, stem: &str) -> Result<String, fmt::Error> {
    let module = &ir.root.module;
    let mut out = String::new();

    writeln!(out, "#include \"{stem}.h\"")?;
    writeln!(out)?;
    writeln!(out, "namespace {module} {{")?;
    writeln!(out)?;
    write!(out, "{}", class_definitions(&ir.root)?)?;
    writeln!(out, "}} // namespace {module}")?;

    Ok(out)
}

/// Constructor parameters, one per property.
fn parameters(class: &ClassRecord) -> Vec<String> {
    class
        .properties
        .iter()
        .map(|prop| format!("{}{}", prop.setter_type, prop.name))
        .collect()
}

/// Class declaration with nested classes indented into it.
pub(super) fn class_declaration(class: &ClassRecord) -> Result<String, fmt::Error> {
    let name = &class.name;
    let mut out = String::new();

    writeln!(out, "class {name}")?;
    writeln!(out, "{{")?;
    writeln!(out, "public:")?;
    for nested in &class.classes {
        writeln!(out, "{}", indent(&class_declaration(nested)?))?;
    }
    writeln!(out, "    explicit {name}() = default;")?;
    if !class.properties.is_empty() {
        writeln!(out, "    explicit {name}")?;
        writeln!(out, "    (")?;
        writeln!(out, "        {}", parameters(class).join(",\n        "))?;
        writeln!(out, "    );")?;
    }
    writeln!(out, "    DEFAULT_COPY_DEFAULT_MOVE({name});")?;
    writeln!(out, "    bool operator==(const {name} &other) const;")?;
    writeln!(out, "    bool operator!=(const {name} &other) const;")?;
    for prop in &class.properties {
        writeln!(out, "    {} {}() const;", prop.member_type, prop.getter)?;
        if let Some(setter) = &prop.setter {
            writeln!(out, "    void {setter}({}{});", prop.setter_type, prop.name)?;
        }
    }
    if !class.properties.is_empty() {
        writeln!(out, "private:")?;
        for prop in &class.properties {
            writeln!(
                out,
                "    {} m_{} {{{}}};",
                prop.member_type, prop.name, prop.initial_value
            )?;
        }
    }
    writeln!(out, "}};")?;

    Ok(out)
}

/// Out-of-class member definitions, nested classes first.
pub(super) fn class_definitions(class: &ClassRecord) -> Result<String, fmt::Error> {
    let name = &class.name;
    let qualified = &class.nested_name;
    let mut out = String::new();

    for nested in &class.classes {
        out.push_str(&class_definitions(nested)?);
    }

    if !class.properties.is_empty() {
        writeln!(out, "{qualified}::{name}")?;
        writeln!(out, "(")?;
        writeln!(out, "    {}", parameters(class).join(",\n    "))?;
        writeln!(out, ")")?;
        for (index, prop) in class.properties.iter().enumerate() {
            let lead = if index == 0 { ":" } else { "," };
            writeln!(out, "    {lead} m_{} {{{}}}", prop.name, prop.setter_impl)?;
        }
        writeln!(out, "{{")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
    }

    writeln!(out, "bool {qualified}::operator==(const {name} &other) const")?;
    writeln!(out, "{{")?;
    if class.properties.is_empty() {
        writeln!(out, "    static_cast<void>(other);")?;
    }
    for prop in &class.properties {
        writeln!(out, "    if (m_{0} != other.m_{0}) {{", prop.name)?;
        writeln!(out, "        return false;")?;
        writeln!(out, "    }}")?;
    }
    writeln!(out, "    return true;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "bool {qualified}::operator!=(const {name} &other) const")?;
    writeln!(out, "{{")?;
    writeln!(out, "    return !(*this == other);")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    for prop in &class.properties {
        writeln!(out, "{} {qualified}::{}() const", prop.nested_member_type, prop.getter)?;
        writeln!(out, "{{")?;
        writeln!(out, "    return m_{};", prop.name)?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        if let Some(setter) = &prop.setter {
            writeln!(
                out,
                "void {qualified}::{setter}({}{})",
                prop.setter_type, prop.name
            )?;
            writeln!(out, "{{")?;
            writeln!(out, "    m_{} = {};", prop.name, prop.setter_impl)?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Access, ClassDecl, PropertyDecl, Schema};
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

    fn nested_ir() -> BeanIr {
        let schema = Schema {
            name: "name_test".to_string(),
            module: "module_test".to_string(),
            properties: vec![
                decl("property", "QString", Access::Const),
                PropertyDecl {
                    class: Some(ClassDecl {
                        class_name: "Test".to_string(),
                        properties: vec![decl("sub_property", "QString", Access::Const)],
                    }),
                    ..decl("test", "class", Access::Const)
                },
            ],
        };
        enrich(&schema, Target::Bean)
    }

    #[test]
    fn nested_declaration_block() {
        let ir = nested_ir();
        let expected = "    class Test
    {
    public:
        explicit Test() = default;
        explicit Test
        (
            QString &&sub_property
        );
        DEFAULT_COPY_DEFAULT_MOVE(Test);
        bool operator==(const Test &other) const;
        bool operator!=(const Test &other) const;
        QString sub_property() const;
    private:
        QString m_sub_property {};
    };";
        assert_eq!(indent(&class_declaration(&ir.root.classes[0]).unwrap()), expected);
    }

    #[test]
    fn nested_definitions_block() {
        let ir = nested_ir();
        let expected = "name_test::Test::Test
(
    QString &&sub_property
)
    : m_sub_property {std::move(sub_property)}
{
}

bool name_test::Test::operator==(const Test &other) const
{
    if (m_sub_property != other.m_sub_property) {
        return false;
    }
    return true;
}

bool name_test::Test::operator!=(const Test &other) const
{
    return !(*this == other);
}

QString name_test::Test::sub_property() const
{
    return m_sub_property;
}

";
        assert_eq!(class_definitions(&ir.root.classes[0]).unwrap(), expected);
    }

    #[test]
    fn parent_embeds_nested_class() {
        let ir = nested_ir();
        let decl = class_declaration(&ir.root).unwrap();
        assert!(decl.starts_with("class name_test\n{\npublic:\n    class Test\n"));
        assert!(decl.contains("    Test test() const;"));
        assert!(decl.contains("    Test m_test {};"));

        let defs = class_definitions(&ir.root).unwrap();
        let nested_at = defs.find("name_test::Test::Test").unwrap();
        let root_at = defs.find("name_test::name_test").unwrap();
        assert!(nested_at < root_at);
        assert!(defs.contains("name_test::Test name_test::test() const"));
        assert!(defs.contains("    , m_test {std::move(test)}"));
    }

    #[test]
    fn setters_for_read_write_properties() {
        let schema = Schema {
            name: "Counter".to_string(),
            module: "app".to_string(),
            properties: vec![
                decl("value", "int", Access::ReadWrite),
                decl("enabled", "bool", Access::Read),
            ],
        };
        let ir = enrich(&schema, Target::Bean);

        let decl = class_declaration(&ir.root).unwrap();
        assert!(decl.contains("    void setValue(int value);"));
        assert!(decl.contains("    bool isEnabled() const;"));
        assert!(!decl.contains("setEnabled"));
        assert!(decl.contains("    int m_value {0};"));
        assert!(decl.contains("    bool m_enabled {false};"));

        let defs = class_definitions(&ir.root).unwrap();
        assert!(defs.contains("void Counter::setValue(int value)\n{\n    m_value = value;\n}\n"));
    }

    #[test]
    fn empty_class_has_no_value_constructor() {
        let schema = Schema {
            name: "Empty".to_string(),
            module: "app".to_string(),
            properties: vec![],
        };
        let ir = enrich(&schema, Target::Bean);
        let decl = class_declaration(&ir.root).unwrap();
        assert!(!decl.contains("explicit Empty\n"));
        assert!(!decl.contains("private:"));
        let defs = class_definitions(&ir.root).unwrap();
        assert!(defs.contains("static_cast<void>(other);"));
    }

    #[test]
    fn list_of_classes_members() {
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
        let ir = enrich(&schema, Target::Bean);

        let decl = class_declaration(&ir.root).unwrap();
        assert!(decl.contains("    std::vector<Line> lines() const;"));
        assert!(decl.contains("    void setLines(std::vector<Line> &&lines);"));
        assert!(decl.contains("    std::vector<Line> m_lines {};"));

        let defs = class_definitions(&ir.root).unwrap();
        assert!(defs.contains("std::vector<Order::Line> Order::lines() const"));
        assert!(defs.contains("    m_lines = std::move(lines);"));
    }

    #[test]
    fn header_lists_includes() {
        let schema = Schema {
            name: "Tags".to_string(),
            module: "app::model".to_string(),
            properties: vec![PropertyDecl {
                list: true,
                ..decl("tags", "QString", Access::Const)
            }],
        };
        let files = render(&enrich(&schema, Target::Bean), "tags").unwrap();
        assert_eq!(files[0].name, "tags.h");
        assert_eq!(files[1].name, "tags.cpp");

        let header = &files[0].contents;
        assert!(header.starts_with("#ifndef TAGS_H\n#define TAGS_H\n"));
        let vector_at = header.find("#include <vector>").unwrap();
        let qstring_at = header.find("#include <QString>").unwrap();
        assert!(vector_at < qstring_at);
        assert!(header.contains("namespace app::model {"));
        assert!(header.contains("std::vector<QString> m_tags {};"));

        assert!(files[1].contents.starts_with("#include \"tags.h\""));
    }
}
