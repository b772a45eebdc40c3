//! # shapeql-graphql
//!
//! GraphQL schema synthesis for the shapeql schema compiler.
//!
//! Takes the [`TypeGraph`](shapeql_core::TypeGraph) produced by
//! `shapeql-core` and materializes it into an executable
//! [`async_graphql::dynamic::Schema`]:
//!
//! - Named interfaces become object types, and `<Name>Input` input objects
//!   when used as arguments
//! - Resolver members (`(args: {...}) => T`) become fields with arguments
//! - Unions of records become GraphQL unions; unions of string literals become
//!   `String` on output and a closed scalar on input
//! - Enum aliases become enums, `Date` becomes a validated timestamp scalar
//! - Non-optional, non-nullable members are wrapped non-null
//!
//! ## Modules
//!
//! - [`config`] - Compiler configuration and schema options
//! - [`error`] - Synthesis and compile errors
//! - [`resolvers`] - Supplied and default field resolvers
//! - [`schema`] - Type synthesis and schema assembly
//! - [`types`] - Built-in and custom scalars

pub mod config;
pub mod error;
pub mod resolvers;
pub mod schema;
pub mod types;

pub use config::{CompilerConfig, CustomScalarFactory, ScalarConfig, SchemaOptions};
pub use error::{CompileError, Mode, Result, SynthesisError};
pub use resolvers::{FieldResolver, ResolverMap, tag_value};
pub use schema::{Roots, Synthesizer, build_schema, create_schema};
pub use types::{ScalarDef, Timestamp};
