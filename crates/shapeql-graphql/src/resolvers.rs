//! Field resolvers.
//!
//! Every materialized output field gets a resolver. Fields listed in the
//! caller's [`ResolverMap`] use the supplied function; every other field
//! falls back to reading the property of the same name from the parent
//! value, so plain JSON-shaped data can be served without writing any
//! resolvers beyond the root fields.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, ResolverContext, TypeRef};
use async_graphql::{Name, Value};
use tracing::trace;

/// A user-supplied resolver function.
pub type FieldResolver = Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

/// Resolver functions keyed by `Type.field`.
#[derive(Clone, Default)]
pub struct ResolverMap {
    resolvers: HashMap<String, FieldResolver>,
}

impl ResolverMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolver for `type_name.field_name`, replacing any previous one.
    #[must_use]
    pub fn with(
        mut self,
        type_name: &str,
        field_name: &str,
        resolver: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) -> Self {
        self.insert(type_name, field_name, resolver);
        self
    }

    pub fn insert(
        &mut self,
        type_name: &str,
        field_name: &str,
        resolver: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) {
        self.resolvers
            .insert(format!("{type_name}.{field_name}"), Arc::new(resolver));
    }

    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&FieldResolver> {
        self.resolvers.get(&format!("{type_name}.{field_name}"))
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl fmt::Debug for ResolverMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.resolvers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ResolverMap").field("fields", &keys).finish()
    }
}

/// How the default resolver hands values to async-graphql.
#[derive(Debug, Clone)]
pub(crate) enum ValueShape {
    /// Return the parent's property as-is.
    Plain,
    /// The field is union-typed: objects carrying the discriminant are
    /// tagged with the concrete type it names.
    Tagged { discriminant: String },
    /// The field is enum-typed: strings become enum values.
    Enum,
}

/// Creates the field for `type_name.field_name`.
pub(crate) fn build_field(
    resolvers: &ResolverMap,
    type_name: &str,
    field_name: &str,
    type_ref: TypeRef,
    shape: ValueShape,
) -> Field {
    if let Some(resolver) = resolvers.get(type_name, field_name) {
        trace!(type_name, field_name, "Using supplied resolver");
        let resolver = Arc::clone(resolver);
        return Field::new(field_name, type_ref, move |ctx| resolver(ctx));
    }
    default_field(field_name, type_ref, shape)
}

/// Field that reads `field_name` from the parent object value.
fn default_field(field_name: &str, type_ref: TypeRef, shape: ValueShape) -> Field {
    let json_field_name = field_name.to_string();

    Field::new(field_name, type_ref, move |ctx| {
        let field_name = json_field_name.clone();
        let shape = shape.clone();
        FieldFuture::new(async move {
            if let Some(parent) = ctx.parent_value.as_value()
                && let Value::Object(obj) = parent
                && let Some(value) = obj.get(&Name::new(&field_name))
            {
                let value = match &shape {
                    ValueShape::Plain => FieldValue::value(value.clone()),
                    ValueShape::Tagged { discriminant } => tag_value(value.clone(), discriminant),
                    ValueShape::Enum => FieldValue::value(enum_value(value.clone())),
                };
                return Ok(Some(value));
            }
            Ok(None)
        })
    })
}

/// Tags objects with the type named by their `discriminant` property.
///
/// Lists are tagged element-wise. Values without a string discriminant are
/// passed through untouched.
pub fn tag_value(value: Value, discriminant: &str) -> FieldValue<'static> {
    match value {
        Value::List(items) => {
            let discriminant = discriminant.to_string();
            FieldValue::list(items.into_iter().map(move |item| tag_value(item, &discriminant)))
        }
        Value::Object(obj) => {
            let type_name = match obj.get(&Name::new(discriminant)) {
                Some(Value::String(name)) => Some(name.clone()),
                _ => None,
            };
            let value = FieldValue::value(Value::Object(obj));
            match type_name {
                Some(name) => value.with_type(name),
                None => value,
            }
        }
        other => FieldValue::value(other),
    }
}

/// Converts strings (element-wise for lists) into enum values.
fn enum_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::Enum(Name::new(s)),
        Value::List(items) => Value::List(items.into_iter().map(enum_value).collect()),
        other => other,
    }
}
