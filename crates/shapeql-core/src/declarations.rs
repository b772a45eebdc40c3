//! Declaration source model.
//!
//! A `CompilationUnit` is what a host front-end hands to the compiler: the
//! ordered, top-level interface and type-alias declarations of one source
//! file, with their type expressions already parsed. No semantic analysis is
//! expected from the front-end beyond structural shape and names.
//!
//! Every type here is `serde` (de)serializable so a front-end written in any
//! language can ship a unit as JSON.
//!
//! # Example
//!
//! ```
//! use shapeql_core::declarations::{CompilationUnit, InterfaceDecl, TypeExpr};
//!
//! let unit = CompilationUnit::new()
//!     .interface(InterfaceDecl::new("Query").property("foo", TypeExpr::string()));
//! assert_eq!(unit.declarations.len(), 1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// One parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Top-level declarations in source order.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl CompilationUnit {
    /// Creates an empty unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interface declaration.
    #[must_use]
    pub fn interface(mut self, decl: InterfaceDecl) -> Self {
        self.declarations.push(Declaration::Interface(decl));
        self
    }

    /// Appends a type-alias declaration.
    #[must_use]
    pub fn alias(mut self, decl: TypeAliasDecl) -> Self {
        self.declarations.push(Declaration::TypeAlias(decl));
        self
    }

    /// Finds a top-level declaration by name.
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name() == name)
    }
}

/// A top-level named declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Declaration {
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
}

impl Declaration {
    /// Declared identifier.
    pub fn name(&self) -> &str {
        match self {
            Self::Interface(decl) => &decl.name,
            Self::TypeAlias(decl) => &decl.name,
        }
    }

    /// Documentation text attached to the declaration.
    pub fn doc(&self) -> Option<&str> {
        match self {
            Self::Interface(decl) => decl.doc.as_deref(),
            Self::TypeAlias(decl) => decl.doc.as_deref(),
        }
    }
}

/// `interface Name extends Base { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default)]
    pub members: Vec<PropertyDecl>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            extends: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.extends.push(base.into());
        self
    }

    #[must_use]
    pub fn member(mut self, member: PropertyDecl) -> Self {
        self.members.push(member);
        self
    }

    /// Shorthand for a required property.
    #[must_use]
    pub fn property(self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.member(PropertyDecl::new(name, ty))
    }

    /// Shorthand for a property marked with `?`.
    #[must_use]
    pub fn optional_property(self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.member(PropertyDecl::new(name, ty).optional())
    }
}

/// `type Name = <ty>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub ty: TypeExpr,
    /// Requests enum classification for a string-literal union alias.
    #[serde(default)]
    pub enum_hint: bool,
}

impl TypeAliasDecl {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            doc: None,
            ty,
            enum_hint: false,
        }
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn as_enum(mut self) -> Self {
        self.enum_hint = true;
        self
    }
}

/// A property or method signature inside an interface or inline record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Marked with `?`.
    #[serde(default)]
    pub optional: bool,
    pub ty: TypeExpr,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            doc: None,
            optional: false,
            ty,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A positional parameter of a call signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeExpr,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Built-in keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    String,
    Number,
    Boolean,
    Bigint,
    Null,
    Undefined,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Bigint => "bigint",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }

    /// `null` and `undefined` only widen nullability.
    pub fn is_nullish(self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }
}

/// A single-value literal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form used for materialized default values.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Number(n) if is_integral(*n) => serde_json::Value::from(*n as i64),
            Self::Number(n) => serde_json::json!(n),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) if is_integral(*n) => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeExpr {
    Keyword {
        keyword: Keyword,
    },
    Literal {
        value: Literal,
    },
    /// A named type, optionally generic: `Foo`, `Default<Int, 12>`.
    Reference {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_args: Vec<TypeExpr>,
    },
    Array {
        element: Box<TypeExpr>,
    },
    Union {
        types: Vec<TypeExpr>,
    },
    /// Inline record shape `{ a: string; b?: number }`.
    Object {
        members: Vec<PropertyDecl>,
    },
    /// Call signature `(args: {...}) => Ret`.
    Function {
        #[serde(default)]
        params: Vec<ParamDecl>,
        returns: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn string() -> Self {
        Self::Keyword {
            keyword: Keyword::String,
        }
    }

    pub fn number() -> Self {
        Self::Keyword {
            keyword: Keyword::Number,
        }
    }

    pub fn boolean() -> Self {
        Self::Keyword {
            keyword: Keyword::Boolean,
        }
    }

    pub fn bigint() -> Self {
        Self::Keyword {
            keyword: Keyword::Bigint,
        }
    }

    pub fn null() -> Self {
        Self::Keyword {
            keyword: Keyword::Null,
        }
    }

    pub fn undefined() -> Self {
        Self::Keyword {
            keyword: Keyword::Undefined,
        }
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, type_args: Vec<TypeExpr>) -> Self {
        Self::Reference {
            name: name.into(),
            type_args,
        }
    }

    pub fn array(element: TypeExpr) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    pub fn union(types: Vec<TypeExpr>) -> Self {
        Self::Union { types }
    }

    /// `T | null`
    pub fn nullable(inner: TypeExpr) -> Self {
        Self::Union {
            types: vec![inner, Self::null()],
        }
    }

    pub fn object(members: Vec<PropertyDecl>) -> Self {
        Self::Object { members }
    }

    pub fn function(params: Vec<ParamDecl>, returns: TypeExpr) -> Self {
        Self::Function {
            params,
            returns: Box::new(returns),
        }
    }

    /// `Default<ty, value>`
    pub fn with_default(ty: TypeExpr, value: impl Into<Literal>) -> Self {
        Self::generic("Default", vec![ty, Self::literal(value)])
    }

    /// Source-like text of the annotation, used as the raw-type hint.
    pub fn annotation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword { keyword } => f.write_str(keyword.as_str()),
            Self::Literal {
                value: Literal::String(s),
            } => write!(f, "'{s}'"),
            Self::Literal { value } => write!(f, "{value}"),
            Self::Reference { name, type_args } => {
                f.write_str(name)?;
                if !type_args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in type_args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array { element } => match element.as_ref() {
                Self::Union { .. } | Self::Function { .. } => write!(f, "({element})[]"),
                _ => write!(f, "{element}[]"),
            },
            Self::Union { types } => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{ty}")?;
                }
                Ok(())
            }
            Self::Object { members } => {
                f.write_str("{")?;
                for member in members {
                    let mark = if member.optional { "?" } else { "" };
                    write!(f, " {}{}: {};", member.name, mark, member.ty)?;
                }
                f.write_str(" }")
            }
            Self::Function { params, returns } => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", param.name, param.ty)?;
                }
                write!(f, ") => {returns}")
            }
        }
    }
}
