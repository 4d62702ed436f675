//! A small model of the Elm declarations we emit, and its rendering to source text.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ElmType {
    Name(String),
    List(Box<ElmType>),
    Nullable(Box<ElmType>),
    /// `{ row | field : T }`. A record with a row variable and no fields is the bare variable.
    Record {
        row: Option<String>,
        fields: Vec<ElmField>,
    },
    Application(String, Vec<ElmType>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmField {
    pub name: String,
    pub field_type: ElmType,
}

impl ElmField {
    pub fn new(name: &str, field_type: ElmType) -> ElmField {
        ElmField {
            name: name.to_string(),
            field_type,
        }
    }
}

impl ElmType {
    pub fn name(name: &str) -> ElmType {
        ElmType::Name(name.to_string())
    }

    pub fn list(inner: ElmType) -> ElmType {
        ElmType::List(Box::new(inner))
    }

    pub fn nullable(inner: ElmType) -> ElmType {
        ElmType::Nullable(Box::new(inner))
    }

    pub fn record(fields: Vec<ElmField>) -> ElmType {
        ElmType::Record { row: None, fields }
    }

    pub fn application(name: &str, args: Vec<ElmType>) -> ElmType {
        ElmType::Application(name.to_string(), args)
    }

    fn is_atom(&self) -> bool {
        match self {
            ElmType::Name(_) | ElmType::Record { .. } => true,
            ElmType::Application(_, args) => args.is_empty(),
            ElmType::List(_) | ElmType::Nullable(_) => false,
        }
    }

    fn render_atom(&self) -> String {
        if self.is_atom() {
            self.to_string()
        } else {
            format!("({})", self)
        }
    }
}

impl fmt::Display for ElmType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ElmType::Name(name) => write!(f, "{}", name),
            ElmType::List(inner) => write!(f, "List {}", inner.render_atom()),
            ElmType::Nullable(inner) => write!(f, "Maybe {}", inner.render_atom()),
            ElmType::Record { row, fields } => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|field| format!("{} : {}", field.name, field.field_type))
                    .collect();
                match (row, fields.is_empty()) {
                    (Some(row), true) => write!(f, "{}", row),
                    (None, true) => write!(f, "{{}}"),
                    (Some(row), false) => write!(f, "{{ {} | {} }}", row, fields.join(", ")),
                    (None, false) => write!(f, "{{ {} }}", fields.join(", ")),
                }
            }
            ElmType::Application(name, args) => {
                write!(f, "{}", name)?;
                for arg in args {
                    write!(f, " {}", arg.render_atom())?;
                }
                Ok(())
            }
        }
    }
}

/// A pre-rendered Elm expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ElmExpr {
    pub expr: String,
}

impl ElmExpr {
    pub fn new<S: Into<String>>(expr: S) -> ElmExpr {
        ElmExpr { expr: expr.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmConstructor {
    pub name: String,
    pub arguments: Vec<ElmType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmTypeDecl {
    pub name: String,
    pub parameters: Vec<String>,
    pub constructors: Vec<ElmConstructor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmTypeAliasDecl {
    pub name: String,
    pub parameters: Vec<String>,
    pub aliased: ElmType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmParameter {
    pub name: String,
    pub parameter_type: ElmType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmFunctionDecl {
    pub name: String,
    pub parameters: Vec<ElmParameter>,
    pub return_type: ElmType,
    pub body: ElmExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElmDecl {
    Type(ElmTypeDecl),
    TypeAlias(ElmTypeAliasDecl),
    Function(ElmFunctionDecl),
}

impl ElmDecl {
    pub fn name(&self) -> &str {
        match self {
            ElmDecl::Type(decl) => &decl.name,
            ElmDecl::TypeAlias(decl) => &decl.name,
            ElmDecl::Function(decl) => &decl.name,
        }
    }
}

fn header(keyword: &str, name: &str, parameters: &[String]) -> String {
    let mut header = format!("{} {}", keyword, name);
    for parameter in parameters {
        header.push(' ');
        header.push_str(parameter);
    }
    header
}

impl fmt::Display for ElmTypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", header("type", &self.name, &self.parameters))?;
        for (i, constructor) in self.constructors.iter().enumerate() {
            let separator = if i == 0 { "=" } else { "|" };
            write!(f, "\n    {} {}", separator, constructor.name)?;
            for argument in &constructor.arguments {
                write!(f, " {}", argument.render_atom())?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ElmTypeAliasDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} =", header("type alias", &self.name, &self.parameters))?;
        match &self.aliased {
            ElmType::Record { row, fields } if !fields.is_empty() => {
                for (i, field) in fields.iter().enumerate() {
                    let opening = match (i, row) {
                        (0, Some(row)) => format!("{{ {} | ", row),
                        (0, None) => "{ ".to_string(),
                        _ => ", ".to_string(),
                    };
                    writeln!(f, "    {}{} : {}", opening, field.name, field.field_type)?;
                }
                write!(f, "    }}")
            }
            other => write!(f, "    {}", other),
        }
    }
}

impl fmt::Display for ElmFunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} : ", self.name)?;
        // Parameters are never functions, so they need no parentheses left of an arrow.
        for parameter in &self.parameters {
            write!(f, "{} -> ", parameter.parameter_type)?;
        }
        writeln!(f, "{}", self.return_type)?;

        write!(f, "{}", self.name)?;
        for parameter in &self.parameters {
            write!(f, " {}", parameter.name)?;
        }
        write!(f, " =")?;
        for line in self.body.expr.lines() {
            if line.is_empty() {
                writeln!(f)?;
            } else {
                write!(f, "\n    {}", line)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ElmDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ElmDecl::Type(decl) => decl.fmt(f),
            ElmDecl::TypeAlias(decl) => decl.fmt(f),
            ElmDecl::Function(decl) => decl.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmModule {
    pub name: String,
    pub exposing: Vec<String>,
    pub imports: Vec<String>,
    pub declarations: Vec<ElmDecl>,
}

impl fmt::Display for ElmModule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "module {} exposing ({})",
            self.name,
            self.exposing.join(", ")
        )?;
        writeln!(f)?;
        for import in &self.imports {
            writeln!(f, "import {}", import)?;
        }
        for declaration in &self.declarations {
            write!(f, "\n\n{}\n", declaration)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_parentheses() {
        let ty = ElmType::nullable(ElmType::list(ElmType::name("String")));
        assert_eq!(ty.to_string(), "Maybe (List String)");

        let ty = ElmType::list(ElmType::name("Episode"));
        assert_eq!(ty.to_string(), "List Episode");

        let ty = ElmType::application(
            "Task",
            vec![ElmType::name("Http.Error"), ElmType::name("HeroResult")],
        );
        assert_eq!(ty.to_string(), "Task Http.Error HeroResult");

        let ty = ElmType::application(
            "FriendsResult_",
            vec![ElmType::record(vec![ElmField::new(
                "id",
                ElmType::name("ID"),
            )])],
        );
        assert_eq!(ty.to_string(), "FriendsResult_ { id : ID }");

        let ty = ElmType::list(ElmType::application(
            "Foo",
            vec![ElmType::record(vec![]), ElmType::record(vec![])],
        ));
        assert_eq!(ty.to_string(), "List (Foo {} {})");
    }

    #[test]
    fn records_with_rows() {
        let open = ElmType::Record {
            row: Some("a".to_string()),
            fields: vec![ElmField::new("name", ElmType::name("String"))],
        };
        assert_eq!(open.to_string(), "{ a | name : String }");

        let bare = ElmType::Record {
            row: Some("a".to_string()),
            fields: vec![],
        };
        assert_eq!(bare.to_string(), "a");
        assert_eq!(ElmType::record(vec![]).to_string(), "{}");
    }

    #[test]
    fn record_alias_renders_one_field_per_line() {
        let alias = ElmTypeAliasDecl {
            name: "HeroResult".to_string(),
            parameters: vec![],
            aliased: ElmType::record(vec![
                ElmField::new("name", ElmType::nullable(ElmType::name("String"))),
                ElmField::new("appearsIn", ElmType::list(ElmType::name("Episode"))),
            ]),
        };

        assert_eq!(
            alias.to_string(),
            "type alias HeroResult =\n    { name : Maybe String\n    , appearsIn : List Episode\n    }"
        );
    }

    #[test]
    fn union_type_declaration() {
        let decl = ElmTypeDecl {
            name: "Foo".to_string(),
            parameters: vec!["list".to_string(), "task".to_string()],
            constructors: vec![
                ElmConstructor {
                    name: "FooList".to_string(),
                    arguments: vec![ElmType::name("list")],
                },
                ElmConstructor {
                    name: "FooTask".to_string(),
                    arguments: vec![ElmType::name("task")],
                },
            ],
        };

        assert_eq!(
            decl.to_string(),
            "type Foo list task\n    = FooList list\n    | FooTask task"
        );
    }

    #[test]
    fn function_declaration() {
        let decl = ElmFunctionDecl {
            name: "episodeEncoder".to_string(),
            parameters: vec![ElmParameter {
                name: "item".to_string(),
                parameter_type: ElmType::name("Episode"),
            }],
            return_type: ElmType::name("Json.Encode.Value"),
            body: ElmExpr::new("case item of\n    JEDI -> Json.Encode.string \"JEDI\""),
        };

        assert_eq!(
            decl.to_string(),
            "episodeEncoder : Episode -> Json.Encode.Value\nepisodeEncoder item =\n    case item of\n        JEDI -> Json.Encode.string \"JEDI\""
        );
    }
}
