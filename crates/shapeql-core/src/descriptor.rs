//! Type descriptors.
//!
//! Descriptors live in an arena ([`TypeGraph`]) and refer to each other by
//! [`DescriptorId`]. Two references to the same underlying declaration carry
//! the same id, which is what makes cyclic graphs traversable and lets the
//! synthesizer memoize per descriptor.

use std::fmt;

use indexmap::IndexMap;

pub use crate::declarations::Literal;

/// Index of a descriptor inside its [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(pub(crate) usize);

impl DescriptorId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scalar keyword a primitive descriptor is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveName {
    String,
    Number,
    Boolean,
    /// No built-in GraphQL mapping; needs a custom scalar.
    BigInt,
}

impl PrimitiveName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
        }
    }
}

impl fmt::Display for PrimitiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: PrimitiveName,
    /// Annotation as written at the use site (`Int`, `ID`, `Email`, `string`).
    pub raw_type: String,
    /// Present when the declared type is a single literal.
    pub literal: Option<Literal>,
}

impl Primitive {
    /// Raw hint `ID`.
    pub fn is_identifier(&self) -> bool {
        self.raw_type == "ID"
    }

    /// Raw hint `Int`.
    pub fn is_integer(&self) -> bool {
        self.raw_type == "Int"
    }

    pub fn string_literal(&self) -> Option<&str> {
        self.literal.as_ref().and_then(Literal::as_str)
    }
}

/// Built-in composite or opaque types.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Array { element: DescriptorId },
    Date,
}

/// A field of a record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub doc: Option<String>,
    pub ty: DescriptorId,
    /// Property marked with `?`.
    pub is_optional: bool,
    /// Declared type included `null` or `undefined`.
    pub is_nullable: bool,
    /// Captured from a `Default<T, V>` annotation.
    pub default: Option<Literal>,
    /// Members of the single parameter bag when this member is a resolver.
    pub args: Option<Vec<Member>>,
}

impl Member {
    /// Whether the materialized field drops the non-null wrapper.
    pub fn is_nullable_field(&self) -> bool {
        self.is_optional || self.is_nullable
    }
}

/// Top-level named record declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub doc: Option<String>,
    pub members: Vec<Member>,
}

/// Unnamed inline record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceLiteral {
    pub doc: Option<String>,
    pub members: Vec<Member>,
}

/// Named or inline alternation.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub name: Option<String>,
    pub doc: Option<String>,
    pub members: Vec<DescriptorId>,
}

/// Fixed set of string-literal primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub doc: Option<String>,
    pub members: Vec<DescriptorId>,
}

/// Closed set of descriptor shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Primitive(Primitive),
    Native(Native),
    InterfaceNamed(Interface),
    InterfaceLiteral(InterfaceLiteral),
    Union(Union),
    Enum(Enum),
}

impl Descriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Native(Native::Array { .. }) => "array",
            Self::Native(Native::Date) => "date",
            Self::InterfaceNamed(_) => "interface",
            Self::InterfaceLiteral(_) => "interface literal",
            Self::Union(_) => "union",
            Self::Enum(_) => "enum",
        }
    }

    /// Declared name, if the shape has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::InterfaceNamed(i) => Some(&i.name),
            Self::Union(u) => u.name.as_deref(),
            Self::Enum(e) => Some(&e.name),
            Self::Primitive(_) | Self::Native(_) | Self::InterfaceLiteral(_) => None,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            Self::InterfaceNamed(i) => i.doc.as_deref(),
            Self::InterfaceLiteral(i) => i.doc.as_deref(),
            Self::Union(u) => u.doc.as_deref(),
            Self::Enum(e) => e.doc.as_deref(),
            Self::Primitive(_) | Self::Native(_) => None,
        }
    }

    /// Record members for interface shapes.
    pub fn members(&self) -> Option<&[Member]> {
        match self {
            Self::InterfaceNamed(i) => Some(&i.members),
            Self::InterfaceLiteral(i) => Some(&i.members),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::InterfaceNamed(_) | Self::InterfaceLiteral(_))
    }
}

/// Flat, deduplicated descriptor arena produced by the extractor.
///
/// Descriptors are stored in first-visited order. The graph is immutable
/// once extraction returns.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    pub(crate) descriptors: Vec<Descriptor>,
    /// Top-level declaration name -> descriptor.
    pub(crate) top_level: IndexMap<String, DescriptorId>,
}

impl TypeGraph {
    /// Returns the descriptor for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different graph.
    pub fn get(&self, id: DescriptorId) -> &Descriptor {
        &self.descriptors[id.0]
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors in first-visited order.
    pub fn iter(&self) -> impl Iterator<Item = (DescriptorId, &Descriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (DescriptorId(i), d))
    }

    /// Descriptor a top-level declaration resolved to.
    pub fn top_level(&self, name: &str) -> Option<DescriptorId> {
        self.top_level.get(name).copied()
    }

    /// Top-level declaration names in source order.
    pub fn top_level_names(&self) -> impl Iterator<Item = &str> {
        self.top_level.keys().map(String::as_str)
    }

    /// A top-level interface declaration by name.
    pub fn interface(&self, name: &str) -> Option<(DescriptorId, &Interface)> {
        let id = self.top_level(name)?;
        match self.get(id) {
            Descriptor::InterfaceNamed(i) if i.name == name => Some((id, i)),
            _ => None,
        }
    }

    /// String literal carried by the member called `field`, if any.
    ///
    /// This is how anonymous shapes pin their materialized name
    /// (`__typename: 'Coord'`).
    pub fn discriminant<'a>(&'a self, members: &[Member], field: &str) -> Option<&'a str> {
        let member = members.iter().find(|m| m.name == field)?;
        self.get(member.ty).as_primitive()?.string_literal()
    }

    /// Human-readable label used in diagnostics.
    pub fn display_name(&self, id: DescriptorId) -> String {
        let descriptor = self.get(id);
        match descriptor {
            Descriptor::Primitive(p) => match &p.literal {
                Some(Literal::String(s)) => format!("'{s}'"),
                Some(lit) => lit.to_string(),
                None => p.raw_type.clone(),
            },
            Descriptor::Native(Native::Array { element }) => {
                format!("{}[]", self.display_name(*element))
            }
            Descriptor::Native(Native::Date) => "Date".to_string(),
            Descriptor::Union(Union { name: None, members, .. }) => members
                .iter()
                .map(|m| self.display_name(*m))
                .collect::<Vec<_>>()
                .join(" | "),
            _ => match descriptor.name() {
                Some(name) => name.to_string(),
                None => format!("anonymous {} {id}", descriptor.kind()),
            },
        }
    }
}
