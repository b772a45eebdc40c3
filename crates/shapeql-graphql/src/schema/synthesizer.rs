//! Descriptor -> GraphQL type synthesis.
//!
//! A [`Synthesizer`] materializes descriptors of one [`TypeGraph`] into
//! async-graphql dynamic types, once per `(descriptor, mode)` pair. The
//! cached [`TypeRef`] is inserted *before* a record's or union's members are
//! visited, so self-referencing and mutually recursive declarations resolve
//! to the type under construction instead of recursing forever.
//!
//! Materialized types are kept in creation order and handed to the schema
//! builder by [`Synthesizer::into_types`].

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use async_graphql::Value;
use async_graphql::dynamic::{Enum, EnumItem, InputObject, InputValue, Object, Type, TypeRef, Union};
use regex::Regex;
use shapeql_core::descriptor::{Enum as EnumDescriptor, Union as UnionDescriptor};
use shapeql_core::{Descriptor, DescriptorId, Literal, Member, Native, Primitive, PrimitiveName, TypeGraph};
use tracing::{debug, trace};

use crate::config::SchemaOptions;
use crate::error::{Mode, Result, SynthesisError};
use crate::resolvers::{self, ValueShape};
use crate::types::{DATE_SCALAR, ScalarDef, Timestamp, literal_union_name, literal_union_scalar};

static GRAPHQL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("Invalid GraphQL name regex"));

/// Scalars every schema provides without registration.
const BUILTIN_SCALARS: [&str; 5] = [
    TypeRef::STRING,
    TypeRef::INT,
    TypeRef::FLOAT,
    TypeRef::BOOLEAN,
    TypeRef::ID,
];

/// Checks if a string is a usable GraphQL type, field or enum value name.
///
/// Names starting with `__` are reserved for introspection.
pub fn is_valid_graphql_name(name: &str) -> bool {
    GRAPHQL_NAME.is_match(name) && !name.starts_with("__")
}

/// What produced a registered type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameOwner {
    Builtin,
    /// Shared scalars; any number of primitives may map onto one.
    Scalar,
    Descriptor(DescriptorId, Mode),
}

/// Materializes descriptors into GraphQL types.
pub struct Synthesizer<'g> {
    graph: &'g TypeGraph,
    options: &'g SchemaOptions,
    /// Named custom scalars, keyed by the raw annotation they replace.
    scalars: HashMap<String, ScalarDef>,
    cache: HashMap<(DescriptorId, Mode), TypeRef>,
    names: HashMap<String, NameOwner>,
    union_names: HashSet<String>,
    enum_names: HashSet<String>,
    types: Vec<Type>,
    anonymous_count: usize,
}

impl<'g> Synthesizer<'g> {
    /// Creates a synthesizer over `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured scalar has an invalid pattern.
    pub fn new(graph: &'g TypeGraph, options: &'g SchemaOptions) -> Result<Self> {
        let mut scalars = HashMap::new();
        for config in &options.config.scalars {
            let def = ScalarDef::from_config(config)?;
            scalars.insert(def.name.clone(), def);
        }
        for def in &options.custom_scalars {
            scalars.insert(def.name.clone(), def.clone());
        }

        let names = BUILTIN_SCALARS
            .iter()
            .map(|name| ((*name).to_string(), NameOwner::Builtin))
            .collect();

        Ok(Self {
            graph,
            options,
            scalars,
            cache: HashMap::new(),
            names,
            union_names: HashSet::new(),
            enum_names: HashSet::new(),
            types: Vec::new(),
            anonymous_count: 0,
        })
    }

    /// Type reference previously materialized for `id` in `mode`.
    pub fn type_ref(&self, id: DescriptorId, mode: Mode) -> Option<&TypeRef> {
        self.cache.get(&(id, mode))
    }

    /// Names of all registered types, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .names
            .iter()
            .filter(|(_, owner)| **owner != NameOwner::Builtin)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Materialized types in creation order.
    pub fn into_types(self) -> Vec<Type> {
        self.types
    }

    /// Materializes `id` in `mode`, returning a nullable reference to it.
    ///
    /// # Errors
    ///
    /// Fails on the first descriptor that has no GraphQL form in `mode`.
    pub fn synthesize(&mut self, id: DescriptorId, mode: Mode) -> Result<TypeRef> {
        if let Some(type_ref) = self.cache.get(&(id, mode)) {
            return Ok(type_ref.clone());
        }

        let graph = self.graph;
        let type_ref = match graph.get(id) {
            Descriptor::Primitive(primitive) => self.primitive(primitive)?,
            Descriptor::Native(Native::Date) => self.date()?,
            Descriptor::Native(Native::Array { element }) => {
                let inner = self.synthesize(*element, mode)?;
                TypeRef::List(Box::new(non_null(inner)))
            }
            Descriptor::InterfaceNamed(interface) => {
                let name = match mode {
                    Mode::Output => interface.name.clone(),
                    Mode::Input => self.input_name(&interface.name),
                };
                return self.record(id, mode, name, interface.doc.as_deref(), &interface.members);
            }
            Descriptor::InterfaceLiteral(literal) => {
                let name = self.literal_name(&literal.members, mode);
                return self.record(id, mode, name, literal.doc.as_deref(), &literal.members);
            }
            Descriptor::Union(union) => {
                return match mode {
                    Mode::Output => self.output_union(id, union),
                    Mode::Input => self.input_union(id, union),
                };
            }
            Descriptor::Enum(enumeration) => return self.enumeration(id, enumeration),
        };

        self.cache.insert((id, mode), type_ref.clone());
        Ok(type_ref)
    }

    fn input_name(&self, base: &str) -> String {
        format!("{base}{}", self.options.config.input_suffix)
    }

    /// Name for an inline record: the discriminant literal when present,
    /// otherwise the next anonymous placeholder.
    fn literal_name(&mut self, members: &[Member], mode: Mode) -> String {
        let (graph, options) = (self.graph, self.options);
        let config = &options.config;
        if let Some(pinned) = graph.discriminant(members, &config.discriminant_field) {
            return match mode {
                Mode::Output => pinned.to_string(),
                Mode::Input => self.input_name(pinned),
            };
        }

        self.anonymous_count += 1;
        match mode {
            Mode::Output => format!("{}{}", config.anonymous_prefix, self.anonymous_count),
            Mode::Input => format!(
                "{}{}{}",
                config.anonymous_prefix, config.input_suffix, self.anonymous_count
            ),
        }
    }

    /// Registers `name` for `owner`.
    ///
    /// Returns `false` when a shared scalar of that name already exists.
    fn claim(&mut self, name: &str, owner: NameOwner, context: &str) -> Result<bool> {
        if !is_valid_graphql_name(name) {
            return Err(SynthesisError::InvalidName {
                name: name.to_string(),
                context: context.to_string(),
            });
        }
        match self.names.get(name) {
            Some(existing) if *existing == owner && owner == NameOwner::Scalar => Ok(false),
            Some(_) => Err(SynthesisError::DuplicateTypeName {
                name: name.to_string(),
            }),
            None => {
                self.names.insert(name.to_string(), owner);
                Ok(true)
            }
        }
    }

    fn primitive(&mut self, primitive: &Primitive) -> Result<TypeRef> {
        if primitive.is_identifier() {
            return Ok(TypeRef::named(TypeRef::ID));
        }
        if let Some(def) = self.scalars.get(&primitive.raw_type).cloned() {
            return self.register_scalar(&def);
        }
        if let Some(factory) = &self.options.custom_scalar_factory
            && let Some(def) = factory(primitive)
        {
            trace!(raw_type = %primitive.raw_type, scalar = %def.name, "Scalar supplied by factory");
            return self.register_scalar(&def);
        }

        let builtin = match primitive.name {
            PrimitiveName::String => TypeRef::STRING,
            PrimitiveName::Number if primitive.is_integer() => TypeRef::INT,
            PrimitiveName::Number => TypeRef::FLOAT,
            PrimitiveName::Boolean => TypeRef::BOOLEAN,
            PrimitiveName::BigInt => {
                return Err(SynthesisError::UnresolvedScalar {
                    raw_type: primitive.raw_type.clone(),
                    primitive: primitive.name.to_string(),
                });
            }
        };
        Ok(TypeRef::named(builtin))
    }

    fn register_scalar(&mut self, def: &ScalarDef) -> Result<TypeRef> {
        if self.claim(&def.name, NameOwner::Scalar, "custom scalar")? {
            debug!(scalar = %def.name, "Registering custom scalar");
            self.types.push(def.to_scalar().into());
        }
        Ok(TypeRef::named(&def.name))
    }

    /// The `Date` scalar, unless a custom scalar of that name overrides it.
    fn date(&mut self) -> Result<TypeRef> {
        if let Some(def) = self.scalars.get(DATE_SCALAR).cloned() {
            return self.register_scalar(&def);
        }
        if self.claim(DATE_SCALAR, NameOwner::Scalar, "date scalar")? {
            self.types.push(Timestamp::dynamic_scalar().into());
        }
        Ok(TypeRef::named(DATE_SCALAR))
    }

    fn record(
        &mut self,
        id: DescriptorId,
        mode: Mode,
        name: String,
        doc: Option<&str>,
        members: &[Member],
    ) -> Result<TypeRef> {
        let context = self.graph.display_name(id);
        self.claim(&name, NameOwner::Descriptor(id, mode), &context)?;
        let type_ref = TypeRef::named(&name);
        self.cache.insert((id, mode), type_ref.clone());
        debug!(type_name = %name, %mode, members = members.len(), "Synthesizing record");

        let ty = match mode {
            Mode::Output => Type::from(self.output_object(&name, doc, members)?),
            Mode::Input => Type::from(self.input_object(&name, doc, members)?),
        };
        self.types.push(ty);
        Ok(type_ref)
    }

    fn output_object(&mut self, name: &str, doc: Option<&str>, members: &[Member]) -> Result<Object> {
        let options = self.options;
        let discriminant = &options.config.discriminant_field;

        let mut object = Object::new(name);
        if let Some(doc) = doc {
            object = object.description(doc);
        }

        let mut fields = 0;
        for member in members.iter().filter(|m| &m.name != discriminant) {
            self.check_field_name(&member.name, name)?;
            let type_ref = self.member_type(member, Mode::Output)?;

            let base = base_type_name(&type_ref);
            let shape = if self.union_names.contains(base) {
                ValueShape::Tagged {
                    discriminant: discriminant.clone(),
                }
            } else if self.enum_names.contains(base) {
                ValueShape::Enum
            } else {
                ValueShape::Plain
            };

            let mut field =
                resolvers::build_field(&options.resolvers, name, &member.name, type_ref, shape);
            if let Some(doc) = &member.doc {
                field = field.description(doc);
            }
            if let Some(args) = &member.args {
                for arg in args {
                    field = field.argument(self.argument(arg, name)?);
                }
            }
            object = object.field(field);
            fields += 1;
        }

        if fields == 0 {
            return Err(SynthesisError::EmptyRecord(name.to_string()));
        }
        Ok(object)
    }

    fn input_object(&mut self, name: &str, doc: Option<&str>, members: &[Member]) -> Result<InputObject> {
        let options = self.options;
        let discriminant = &options.config.discriminant_field;

        let mut input = InputObject::new(name);
        if let Some(doc) = doc {
            input = input.description(doc);
        }

        let mut fields = 0;
        for member in members.iter().filter(|m| &m.name != discriminant) {
            if member.args.is_some() {
                trace!(type_name = name, field = %member.name, "Dropping resolver member from input type");
                continue;
            }
            input = input.field(self.argument(member, name)?);
            fields += 1;
        }

        if fields == 0 {
            return Err(SynthesisError::EmptyRecord(name.to_string()));
        }
        Ok(input)
    }

    /// Input value for an argument or input-object field.
    fn argument(&mut self, member: &Member, owner: &str) -> Result<InputValue> {
        self.check_field_name(&member.name, owner)?;
        let type_ref = self.member_type(member, Mode::Input)?;

        let mut value = InputValue::new(&member.name, type_ref);
        if let Some(doc) = &member.doc {
            value = value.description(doc);
        }
        if let Some(default) = &member.default {
            value = value.default_value(literal_value(default));
        }
        Ok(value)
    }

    /// Member type wrapped non-null unless the member is optional or nullable.
    fn member_type(&mut self, member: &Member, mode: Mode) -> Result<TypeRef> {
        let type_ref = self.synthesize(member.ty, mode)?;
        if member.is_nullable_field() {
            Ok(type_ref)
        } else {
            Ok(non_null(type_ref))
        }
    }

    fn check_field_name(&self, field: &str, owner: &str) -> Result<()> {
        if is_valid_graphql_name(field) {
            Ok(())
        } else {
            Err(SynthesisError::InvalidName {
                name: field.to_string(),
                context: owner.to_string(),
            })
        }
    }

    fn output_union(&mut self, id: DescriptorId, union: &UnionDescriptor) -> Result<TypeRef> {
        let graph = self.graph;

        let primitives: Option<Vec<&Primitive>> = union
            .members
            .iter()
            .map(|m| graph.get(*m).as_primitive())
            .collect();
        if let Some(primitives) = primitives {
            let type_ref = collapse_literals(&primitives).ok_or_else(|| SynthesisError::ModeMismatch {
                descriptor: graph.display_name(id),
                mode: Mode::Output,
                detail: "a union of primitives is only supported when every member is a string \
                         literal or every member is a number literal"
                    .to_string(),
            })?;
            self.cache.insert((id, Mode::Output), type_ref.clone());
            return Ok(type_ref);
        }

        if let Some(member) = union.members.iter().find(|m| !graph.get(**m).is_record()) {
            return Err(SynthesisError::ModeMismatch {
                descriptor: graph.display_name(id),
                mode: Mode::Output,
                detail: format!(
                    "union member '{}' is not a record type",
                    graph.display_name(*member)
                ),
            });
        }

        let name = match &union.name {
            Some(name) => name.clone(),
            None => {
                self.anonymous_count += 1;
                format!(
                    "{}Union{}",
                    self.options.config.anonymous_prefix, self.anonymous_count
                )
            }
        };
        self.claim(&name, NameOwner::Descriptor(id, Mode::Output), &graph.display_name(id))?;
        self.union_names.insert(name.clone());
        let type_ref = TypeRef::named(&name);
        self.cache.insert((id, Mode::Output), type_ref.clone());
        debug!(type_name = %name, members = union.members.len(), "Synthesizing union");

        let mut materialized = Union::new(&name);
        if let Some(doc) = &union.doc {
            materialized = materialized.description(doc);
        }
        for member in &union.members {
            let member_ref = self.synthesize(*member, Mode::Output)?;
            materialized = materialized.possible_type(base_type_name(&member_ref));
        }
        self.types.push(materialized.into());
        Ok(type_ref)
    }

    /// Input-mode unions become a closed scalar over their string literals.
    fn input_union(&mut self, id: DescriptorId, union: &UnionDescriptor) -> Result<TypeRef> {
        let graph = self.graph;

        let literals: Option<Vec<&str>> = union
            .members
            .iter()
            .map(|m| graph.get(*m).as_primitive().and_then(Primitive::string_literal))
            .collect();
        let Some(literals) = literals else {
            return Err(SynthesisError::ModeMismatch {
                descriptor: graph.display_name(id),
                mode: Mode::Input,
                detail: "input unions are only supported when every member is a string literal"
                    .to_string(),
            });
        };

        let name = union
            .name
            .clone()
            .unwrap_or_else(|| literal_union_name(&literals));
        let context = format!("input union {}", graph.display_name(id));
        self.claim(&name, NameOwner::Descriptor(id, Mode::Input), &context)?;
        debug!(scalar = %name, "Synthesizing literal union scalar");

        let scalar = literal_union_scalar(&name, union.doc.as_deref(), &literals);
        self.types.push(scalar.to_scalar().into());

        let type_ref = TypeRef::named(&name);
        self.cache.insert((id, Mode::Input), type_ref.clone());
        Ok(type_ref)
    }

    /// Enums are valid in both modes and materialize once.
    fn enumeration(&mut self, id: DescriptorId, enumeration: &EnumDescriptor) -> Result<TypeRef> {
        let graph = self.graph;
        let name = &enumeration.name;
        self.claim(name, NameOwner::Descriptor(id, Mode::Output), name)?;

        let mut materialized = Enum::new(name);
        if let Some(doc) = &enumeration.doc {
            materialized = materialized.description(doc);
        }
        for member in &enumeration.members {
            let value = graph
                .get(*member)
                .as_primitive()
                .and_then(Primitive::string_literal)
                .filter(|v| is_valid_graphql_name(v) && !matches!(*v, "true" | "false" | "null"))
                .ok_or_else(|| SynthesisError::InvalidEnumValue {
                    name: name.clone(),
                    value: graph.display_name(*member),
                })?;
            materialized = materialized.item(EnumItem::new(value));
        }
        debug!(type_name = %name, values = enumeration.members.len(), "Synthesized enum");

        self.enum_names.insert(name.clone());
        self.types.push(materialized.into());
        let type_ref = TypeRef::named(name);
        self.cache.insert((id, Mode::Output), type_ref.clone());
        self.cache.insert((id, Mode::Input), type_ref.clone());
        Ok(type_ref)
    }
}

fn non_null(type_ref: TypeRef) -> TypeRef {
    match type_ref {
        TypeRef::NonNull(_) => type_ref,
        other => TypeRef::NonNull(Box::new(other)),
    }
}

/// Innermost named type of a reference.
fn base_type_name(type_ref: &TypeRef) -> &str {
    match type_ref {
        TypeRef::Named(name) => name,
        TypeRef::NonNull(inner) | TypeRef::List(inner) => base_type_name(inner),
    }
}

/// Output form of a union made only of primitives.
fn collapse_literals(primitives: &[&Primitive]) -> Option<TypeRef> {
    let all = |f: fn(&Literal) -> bool| {
        primitives
            .iter()
            .all(|p| p.literal.as_ref().is_some_and(f))
    };

    if all(|l| matches!(l, Literal::String(_))) {
        Some(TypeRef::named(TypeRef::STRING))
    } else if all(|l| matches!(l, Literal::Number(_))) {
        if primitives.iter().all(|p| p.is_integer()) {
            Some(TypeRef::named(TypeRef::INT))
        } else {
            Some(TypeRef::named(TypeRef::FLOAT))
        }
    } else {
        None
    }
}

fn literal_value(literal: &Literal) -> Value {
    Value::from_json(literal.to_json()).unwrap_or(Value::Null)
}
