//! Type-graph extractor.
//!
//! Walks the declarations of one [`CompilationUnit`] and produces a flat,
//! deduplicated [`TypeGraph`]. Every reference to the same underlying
//! declaration resolves to the same [`DescriptorId`].
//!
//! ## Cycle handling
//!
//! Records, unions and enums are pushed into the arena with empty members and
//! registered in the identity map *before* their members are resolved. A
//! member that refers back to a shape still under construction therefore
//! resolves to the partially filled descriptor instead of recursing again.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::declarations::{
    CompilationUnit, Declaration, InterfaceDecl, Keyword, Literal, ParamDecl, PropertyDecl,
    TypeAliasDecl, TypeExpr,
};
use crate::descriptor::{
    Descriptor, DescriptorId, Enum, Interface, InterfaceLiteral, Member, Native, Primitive,
    PrimitiveName, TypeGraph, Union,
};
use crate::error::{ExtractError, Result};

/// Name of the two-parameter default-value sentinel.
pub const DEFAULT_SENTINEL: &str = "Default";

/// Extraction options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Classify every alias whose alternatives are all string literals as an
    /// enum instead of a union.
    #[serde(default)]
    pub string_literal_unions_as_enums: bool,
}

/// Extracts the descriptor graph of `unit`.
///
/// # Errors
///
/// Fails fast on the first declaration shape that cannot be represented.
pub fn extract(unit: &CompilationUnit, config: &ExtractorConfig) -> Result<TypeGraph> {
    Extractor::new(unit, config)?.run()
}

/// Identity of an underlying declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DeclKey {
    /// Top-level declaration, by name.
    Declaration(String),
    /// Inline record, by the path of the site that declares it.
    Inline(String),
    /// Inline union, by its sorted, deduplicated alternatives.
    Union(Vec<DescriptorId>),
    /// Leaf shapes (primitives, dates, arrays), by value.
    Leaf(String),
}

/// A resolved type expression.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    id: DescriptorId,
    nullable: bool,
}

/// How a type alias is materialized.
enum AliasShape<'a> {
    Union(Vec<&'a TypeExpr>),
    Enum(Vec<&'a TypeExpr>),
    Record(&'a [PropertyDecl]),
    /// The alias is a plain rename of its right-hand side.
    Transparent,
}

/// Single-use extraction state for one compilation unit.
pub struct Extractor<'a> {
    config: &'a ExtractorConfig,
    unit: &'a CompilationUnit,
    declarations: HashMap<&'a str, &'a Declaration>,
    graph: TypeGraph,
    identity: HashMap<DeclKey, DescriptorId>,
    /// Transparent aliases currently being expanded.
    expanding: Vec<String>,
}

impl<'a> Extractor<'a> {
    /// Indexes the unit's declarations.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DuplicateDeclaration`] when two top-level
    /// declarations share a name.
    pub fn new(unit: &'a CompilationUnit, config: &'a ExtractorConfig) -> Result<Self> {
        let mut declarations = HashMap::with_capacity(unit.declarations.len());
        for decl in &unit.declarations {
            if declarations.insert(decl.name(), decl).is_some() {
                return Err(ExtractError::DuplicateDeclaration(decl.name().to_string()));
            }
        }

        Ok(Self {
            config,
            unit,
            declarations,
            graph: TypeGraph::default(),
            identity: HashMap::new(),
            expanding: Vec::new(),
        })
    }

    /// Resolves every top-level declaration and returns the graph.
    pub fn run(mut self) -> Result<TypeGraph> {
        let unit = self.unit;
        debug!(declarations = unit.declarations.len(), "Extracting type graph");

        for decl in &unit.declarations {
            let name = decl.name();
            let resolved = self.resolve_declaration(name, name)?;
            self.graph.top_level.insert(name.to_string(), resolved.id);
        }

        debug!(
            descriptors = self.graph.len(),
            "Type graph extraction complete"
        );
        Ok(self.graph)
    }

    fn allocate(&mut self, key: DeclKey, placeholder: Descriptor) -> DescriptorId {
        let id = DescriptorId(self.graph.descriptors.len());
        trace!(id = %id, kind = placeholder.kind(), key = ?key, "Allocating descriptor");
        self.graph.descriptors.push(placeholder);
        self.identity.insert(key, id);
        id
    }

    fn fill(&mut self, id: DescriptorId, descriptor: Descriptor) {
        self.graph.descriptors[id.0] = descriptor;
    }

    fn intern_leaf(&mut self, descriptor: Descriptor) -> DescriptorId {
        let key = DeclKey::Leaf(leaf_key(&descriptor));
        match self.identity.get(&key) {
            Some(id) => *id,
            None => self.allocate(key, descriptor),
        }
    }

    fn primitive(&mut self, name: PrimitiveName, raw_type: String, literal: Option<Literal>) -> Resolved {
        let id = self.intern_leaf(Descriptor::Primitive(Primitive {
            name,
            raw_type,
            literal,
        }));
        Resolved {
            id,
            nullable: false,
        }
    }

    /// Resolves a top-level declaration by name.
    fn resolve_declaration(&mut self, name: &str, location: &str) -> Result<Resolved> {
        let decl = *self
            .declarations
            .get(name)
            .ok_or_else(|| ExtractError::UnknownType {
                name: name.to_string(),
                location: location.to_string(),
            })?;

        match decl {
            Declaration::Interface(interface) => {
                let id = self.resolve_interface(interface)?;
                Ok(Resolved {
                    id,
                    nullable: false,
                })
            }
            Declaration::TypeAlias(alias) => self.resolve_alias(alias, location),
        }
    }

    fn resolve_interface(&mut self, decl: &'a InterfaceDecl) -> Result<DescriptorId> {
        let key = DeclKey::Declaration(decl.name.clone());
        if let Some(id) = self.identity.get(&key) {
            return Ok(*id);
        }

        let id = self.allocate(
            key,
            Descriptor::InterfaceNamed(Interface {
                name: decl.name.clone(),
                doc: decl.doc.clone(),
                members: Vec::new(),
            }),
        );
        let members = self.interface_members(decl, &mut Vec::new())?;
        trace!(name = %decl.name, members = members.len(), "Resolved interface");
        self.fill(
            id,
            Descriptor::InterfaceNamed(Interface {
                name: decl.name.clone(),
                doc: decl.doc.clone(),
                members,
            }),
        );
        Ok(id)
    }

    /// Own and inherited members of an interface.
    ///
    /// Inherited members are resolved in the context of the interface that
    /// declares them so that inline shapes keep a single identity.
    fn interface_members(
        &mut self,
        decl: &'a InterfaceDecl,
        chain: &mut Vec<String>,
    ) -> Result<Vec<Member>> {
        if chain.contains(&decl.name) {
            return Err(ExtractError::InheritanceCycle(decl.name.clone()));
        }
        chain.push(decl.name.clone());

        let mut members: IndexMap<String, Member> = IndexMap::new();
        for base in &decl.extends {
            let base_decl = match self.declarations.get(base.as_str()).copied() {
                Some(Declaration::Interface(base_decl)) => base_decl,
                Some(Declaration::TypeAlias(_)) => {
                    return Err(ExtractError::UnsupportedShape {
                        location: decl.name.clone(),
                        detail: format!("cannot extend type alias '{base}'"),
                    });
                }
                None => {
                    return Err(ExtractError::UnknownType {
                        name: base.clone(),
                        location: decl.name.clone(),
                    });
                }
            };
            for member in self.interface_members(base_decl, chain)? {
                members.insert(member.name.clone(), member);
            }
        }

        for prop in &decl.members {
            let member = self.resolve_member(prop, &decl.name)?;
            members.insert(member.name.clone(), member);
        }

        chain.pop();
        Ok(members.into_values().collect())
    }

    fn resolve_members(&mut self, props: &'a [PropertyDecl], owner: &str) -> Result<Vec<Member>> {
        props
            .iter()
            .map(|prop| self.resolve_member(prop, owner))
            .collect()
    }

    /// Resolves one property or method signature.
    fn resolve_member(&mut self, prop: &'a PropertyDecl, owner: &str) -> Result<Member> {
        let location = format!("{owner}.{}", prop.name);
        let (ty, default) = unwrap_default(&prop.ty, &location)?;

        let (ty, args) = match ty {
            TypeExpr::Function { params, returns } => {
                let args = match params.as_slice() {
                    [] => None,
                    [param] => Some(self.resolve_args(param, &location)?),
                    _ => {
                        return Err(ExtractError::MultipleResolverParameters {
                            location,
                            count: params.len(),
                        });
                    }
                };
                (returns.as_ref(), args)
            }
            other => (other, None),
        };

        let resolved = self.resolve_type(ty, &location, None)?;
        Ok(Member {
            name: prop.name.clone(),
            doc: prop.doc.clone(),
            ty: resolved.id,
            is_optional: prop.optional,
            is_nullable: resolved.nullable,
            default,
            args,
        })
    }

    /// Members of a resolver's single parameter bag.
    fn resolve_args(&mut self, param: &'a ParamDecl, location: &str) -> Result<Vec<Member>> {
        let bag = format!("{location}({})", param.name);
        match &param.ty {
            TypeExpr::Object { members } => self.resolve_members(members, &bag),
            TypeExpr::Reference { name, type_args } if type_args.is_empty() => {
                match self.declarations.get(name.as_str()).copied() {
                    Some(Declaration::Interface(decl)) => {
                        self.interface_members(decl, &mut Vec::new())
                    }
                    Some(Declaration::TypeAlias(TypeAliasDecl {
                        name,
                        ty: TypeExpr::Object { members },
                        ..
                    })) => self.resolve_members(members, name),
                    _ => Err(ExtractError::InvalidResolverParameter {
                        location: bag,
                        found: param.ty.annotation(),
                    }),
                }
            }
            other => Err(ExtractError::InvalidResolverParameter {
                location: bag,
                found: other.annotation(),
            }),
        }
    }

    /// Resolves a type expression at `location`.
    ///
    /// `raw_hint` carries the outermost annotation name through transparent
    /// aliases so primitives remember what they were declared as.
    fn resolve_type(
        &mut self,
        expr: &'a TypeExpr,
        location: &str,
        raw_hint: Option<&str>,
    ) -> Result<Resolved> {
        match expr {
            TypeExpr::Keyword { keyword } => {
                let name = match keyword {
                    Keyword::String => PrimitiveName::String,
                    Keyword::Number => PrimitiveName::Number,
                    Keyword::Boolean => PrimitiveName::Boolean,
                    Keyword::Bigint => PrimitiveName::BigInt,
                    Keyword::Null | Keyword::Undefined => {
                        return Err(ExtractError::UnsupportedShape {
                            location: location.to_string(),
                            detail: format!("bare '{}' type", keyword.as_str()),
                        });
                    }
                };
                let raw = raw_hint.unwrap_or(keyword.as_str()).to_string();
                Ok(self.primitive(name, raw, None))
            }
            TypeExpr::Literal { value } => {
                let name = match value {
                    Literal::String(_) => PrimitiveName::String,
                    Literal::Number(_) => PrimitiveName::Number,
                    Literal::Boolean(_) => PrimitiveName::Boolean,
                };
                let raw = raw_hint.map_or_else(|| expr.annotation(), str::to_string);
                Ok(self.primitive(name, raw, Some(value.clone())))
            }
            TypeExpr::Reference { name, type_args } => {
                self.resolve_reference(name, type_args, location, raw_hint)
            }
            TypeExpr::Array { element } => self.resolve_array(element, location),
            TypeExpr::Union { types } => self.resolve_union(types, location, raw_hint),
            TypeExpr::Object { members } => {
                let id = self.resolve_literal(members, location)?;
                Ok(Resolved {
                    id,
                    nullable: false,
                })
            }
            TypeExpr::Function { .. } => Err(ExtractError::UnsupportedShape {
                location: location.to_string(),
                detail: "call signatures are only supported as interface members".to_string(),
            }),
        }
    }

    fn resolve_reference(
        &mut self,
        name: &str,
        type_args: &'a [TypeExpr],
        location: &str,
        raw_hint: Option<&str>,
    ) -> Result<Resolved> {
        if self.declarations.contains_key(name) {
            if !type_args.is_empty() {
                return Err(ExtractError::UnsupportedShape {
                    location: location.to_string(),
                    detail: format!("generic reference '{name}' to a local declaration"),
                });
            }
            return match self.declarations.get(name).copied() {
                Some(Declaration::TypeAlias(alias)) => {
                    let raw = raw_hint.unwrap_or(name);
                    self.resolve_alias_reference(alias, location, raw)
                }
                _ => self.resolve_declaration(name, location),
            };
        }

        let raw = raw_hint.unwrap_or(name).to_string();
        match (name, type_args) {
            ("ID", []) => Ok(self.primitive(PrimitiveName::String, raw, None)),
            ("Int" | "Float", []) => Ok(self.primitive(PrimitiveName::Number, raw, None)),
            ("Date", []) => Ok(Resolved {
                id: self.intern_leaf(Descriptor::Native(Native::Date)),
                nullable: false,
            }),
            ("Array" | "ReadonlyArray", [element]) => self.resolve_array(element, location),
            (DEFAULT_SENTINEL, _) => Err(ExtractError::MalformedDefault {
                location: location.to_string(),
                detail: "Default<Type, Value> is only allowed as a member annotation".to_string(),
            }),
            _ => Err(ExtractError::UnknownType {
                name: name.to_string(),
                location: location.to_string(),
            }),
        }
    }

    fn resolve_array(&mut self, element: &'a TypeExpr, location: &str) -> Result<Resolved> {
        let element = self.resolve_type(element, &format!("{location}[]"), None)?;
        let id = self.intern_leaf(Descriptor::Native(Native::Array {
            element: element.id,
        }));
        Ok(Resolved {
            id,
            nullable: false,
        })
    }

    /// Inline union; `null` / `undefined` alternatives only widen nullability.
    fn resolve_union(
        &mut self,
        types: &'a [TypeExpr],
        location: &str,
        raw_hint: Option<&str>,
    ) -> Result<Resolved> {
        let nullable = types.iter().any(is_nullish);
        let alternatives: Vec<&TypeExpr> = types.iter().filter(|t| !is_nullish(t)).collect();

        match alternatives.as_slice() {
            [] => Err(ExtractError::UnsupportedShape {
                location: location.to_string(),
                detail: "union of only null/undefined".to_string(),
            }),
            [single] => {
                let resolved = self.resolve_type(single, location, raw_hint)?;
                Ok(Resolved {
                    id: resolved.id,
                    nullable: nullable || resolved.nullable,
                })
            }
            _ => {
                // Every alternative carries its own identity, so resolving
                // them first cannot reach this union again.
                let members = self.resolve_alternatives(&alternatives, location)?;
                let mut key = members.clone();
                key.sort_unstable();
                key.dedup();
                let key = DeclKey::Union(key);

                let id = match self.identity.get(&key) {
                    Some(id) => *id,
                    None => self.allocate(
                        key,
                        Descriptor::Union(Union {
                            name: None,
                            doc: None,
                            members,
                        }),
                    ),
                };
                Ok(Resolved { id, nullable })
            }
        }
    }

    fn resolve_alternatives(
        &mut self,
        alternatives: &[&'a TypeExpr],
        location: &str,
    ) -> Result<Vec<DescriptorId>> {
        alternatives
            .iter()
            .enumerate()
            .map(|(i, alt)| {
                self.resolve_type(alt, &format!("{location}|{i}"), None)
                    .map(|r| r.id)
            })
            .collect()
    }

    /// Inline record shape.
    fn resolve_literal(&mut self, members: &'a [PropertyDecl], location: &str) -> Result<DescriptorId> {
        let key = DeclKey::Inline(location.to_string());
        if let Some(id) = self.identity.get(&key) {
            return Ok(*id);
        }

        let id = self.allocate(
            key,
            Descriptor::InterfaceLiteral(InterfaceLiteral {
                doc: None,
                members: Vec::new(),
            }),
        );
        let members = self.resolve_members(members, location)?;
        self.fill(
            id,
            Descriptor::InterfaceLiteral(InterfaceLiteral { doc: None, members }),
        );
        Ok(id)
    }

    /// A reference to a type alias from a use site.
    fn resolve_alias_reference(
        &mut self,
        alias: &'a TypeAliasDecl,
        location: &str,
        raw: &str,
    ) -> Result<Resolved> {
        match self.alias_shape(alias)? {
            AliasShape::Transparent => self.expand_alias(alias, raw),
            _ => self.resolve_alias(alias, location),
        }
    }

    /// A type alias as a declaration in its own right.
    fn resolve_alias(&mut self, alias: &'a TypeAliasDecl, location: &str) -> Result<Resolved> {
        let nullable = match &alias.ty {
            TypeExpr::Union { types } => types.iter().any(is_nullish),
            _ => false,
        };
        let key = DeclKey::Declaration(alias.name.clone());
        if let Some(id) = self.identity.get(&key) {
            return Ok(Resolved { id: *id, nullable });
        }

        let id = match self.alias_shape(alias)? {
            AliasShape::Transparent => return self.expand_alias(alias, &alias.name),
            AliasShape::Record(members) => {
                let id = self.allocate(
                    key,
                    Descriptor::InterfaceNamed(Interface {
                        name: alias.name.clone(),
                        doc: alias.doc.clone(),
                        members: Vec::new(),
                    }),
                );
                let members = self.resolve_members(members, &alias.name)?;
                self.fill(
                    id,
                    Descriptor::InterfaceNamed(Interface {
                        name: alias.name.clone(),
                        doc: alias.doc.clone(),
                        members,
                    }),
                );
                id
            }
            AliasShape::Union(alternatives) => {
                let id = self.allocate(
                    key,
                    Descriptor::Union(Union {
                        name: Some(alias.name.clone()),
                        doc: alias.doc.clone(),
                        members: Vec::new(),
                    }),
                );
                let members = self.resolve_alternatives(&alternatives, &alias.name)?;
                self.fill(
                    id,
                    Descriptor::Union(Union {
                        name: Some(alias.name.clone()),
                        doc: alias.doc.clone(),
                        members,
                    }),
                );
                id
            }
            AliasShape::Enum(alternatives) => {
                let id = self.allocate(
                    key,
                    Descriptor::Enum(Enum {
                        name: alias.name.clone(),
                        doc: alias.doc.clone(),
                        members: Vec::new(),
                    }),
                );
                let members = self.resolve_alternatives(&alternatives, &alias.name)?;
                self.fill(
                    id,
                    Descriptor::Enum(Enum {
                        name: alias.name.clone(),
                        doc: alias.doc.clone(),
                        members,
                    }),
                );
                id
            }
        };

        trace!(name = %alias.name, location = %location, "Resolved type alias");
        Ok(Resolved { id, nullable })
    }

    /// Expands a transparent alias to its right-hand side.
    fn expand_alias(&mut self, alias: &'a TypeAliasDecl, raw: &str) -> Result<Resolved> {
        if self.expanding.contains(&alias.name) {
            return Err(ExtractError::AliasCycle(alias.name.clone()));
        }
        self.expanding.push(alias.name.clone());
        let resolved = self.resolve_type(&alias.ty, &alias.name, Some(raw));
        self.expanding.pop();
        resolved
    }

    /// Decides at declaration time how an alias is classified.
    fn alias_shape(&self, alias: &'a TypeAliasDecl) -> Result<AliasShape<'a>> {
        let types: Vec<&'a TypeExpr> = match &alias.ty {
            TypeExpr::Object { members } if !alias.enum_hint => {
                return Ok(AliasShape::Record(members));
            }
            TypeExpr::Union { types } => types.iter().collect(),
            other => vec![other],
        };

        let alternatives: Vec<&'a TypeExpr> = types.into_iter().filter(|t| !is_nullish(t)).collect();
        let offending = alternatives.iter().find(|t| !is_string_literal(t));

        if alias.enum_hint {
            if let Some(member) = offending {
                return Err(ExtractError::InvalidEnum {
                    name: alias.name.clone(),
                    member: member.annotation(),
                });
            }
            if alternatives.is_empty() {
                return Err(ExtractError::InvalidEnum {
                    name: alias.name.clone(),
                    member: alias.ty.annotation(),
                });
            }
            return Ok(AliasShape::Enum(alternatives));
        }

        if alternatives.len() < 2 {
            return Ok(AliasShape::Transparent);
        }
        if offending.is_none() && self.config.string_literal_unions_as_enums {
            return Ok(AliasShape::Enum(alternatives));
        }
        Ok(AliasShape::Union(alternatives))
    }
}

/// Splits `Default<Type, Value>` into the actual type and its literal.
fn unwrap_default<'e>(
    expr: &'e TypeExpr,
    location: &str,
) -> Result<(&'e TypeExpr, Option<Literal>)> {
    match expr {
        TypeExpr::Reference { name, type_args } if name == DEFAULT_SENTINEL => {
            match type_args.as_slice() {
                [actual, TypeExpr::Literal { value }] => Ok((actual, Some(value.clone()))),
                [_, other] => Err(ExtractError::MalformedDefault {
                    location: location.to_string(),
                    detail: format!("default value must be a literal, found '{other}'"),
                }),
                args => Err(ExtractError::MalformedDefault {
                    location: location.to_string(),
                    detail: format!("expected 2 type arguments, found {}", args.len()),
                }),
            }
        }
        other => Ok((other, None)),
    }
}

fn is_nullish(expr: &TypeExpr) -> bool {
    matches!(expr, TypeExpr::Keyword { keyword } if keyword.is_nullish())
}

fn is_string_literal(expr: &TypeExpr) -> bool {
    matches!(
        expr,
        TypeExpr::Literal {
            value: Literal::String(_)
        }
    )
}

fn leaf_key(descriptor: &Descriptor) -> String {
    match descriptor {
        Descriptor::Primitive(p) => format!("{}|{}|{:?}", p.name, p.raw_type, p.literal),
        Descriptor::Native(Native::Array { element }) => format!("array|{element}"),
        Descriptor::Native(Native::Date) => "date".to_string(),
        other => format!("{}|{:?}", other.kind(), other.name()),
    }
}
