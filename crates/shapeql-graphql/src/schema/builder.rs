//! Schema assembly.
//!
//! [`create_schema`] is the whole pipeline: validate the configuration,
//! extract the type graph, synthesize the `Query` and `Mutation` roots, and
//! hand every materialized type to async-graphql's dynamic schema builder.

use async_graphql::dynamic::{Schema, Type};
use shapeql_core::{CompilationUnit, DescriptorId, TypeGraph, extract};
use tracing::{debug, info};

use crate::config::{CompilerConfig, SchemaOptions};
use crate::error::{CompileError, Mode, Result, SynthesisError};
use crate::schema::synthesizer::Synthesizer;

/// Name of the query root interface.
pub const QUERY_ROOT: &str = "Query";

/// Name of the mutation root interface.
pub const MUTATION_ROOT: &str = "Mutation";

/// Root descriptors of a type graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roots {
    pub query: DescriptorId,
    pub mutation: Option<DescriptorId>,
}

impl Roots {
    /// Finds the `Query` and `Mutation` interfaces among top-level declarations.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::RootNotFound`] when there is no `Query`.
    pub fn locate(graph: &TypeGraph) -> Result<Self> {
        let query = graph.interface(QUERY_ROOT).map(|(id, _)| id);
        let mutation = graph.interface(MUTATION_ROOT).map(|(id, _)| id);

        match (query, mutation) {
            (Some(query), mutation) => Ok(Self { query, mutation }),
            (None, Some(_)) => Err(SynthesisError::RootNotFound(QUERY_ROOT.to_string())),
            (None, None) => Err(SynthesisError::RootNotFound(format!(
                "{QUERY_ROOT}' or '{MUTATION_ROOT}"
            ))),
        }
    }
}

/// Compiles declarations into an executable GraphQL schema.
///
/// # Example
///
/// ```
/// use shapeql_core::{CompilationUnit, InterfaceDecl, TypeExpr};
/// use shapeql_graphql::{SchemaOptions, create_schema};
///
/// let unit = CompilationUnit::new()
///     .interface(InterfaceDecl::new("Query").property("foo", TypeExpr::string()));
/// let schema = create_schema(&unit, &SchemaOptions::default()).unwrap();
/// assert!(schema.sdl().contains("foo: String!"));
/// ```
///
/// # Errors
///
/// Returns the first configuration, extraction or synthesis error.
pub fn create_schema(unit: &CompilationUnit, options: &SchemaOptions) -> Result<Schema, CompileError> {
    options.config.validate().map_err(CompileError::Config)?;

    debug!(declarations = unit.declarations.len(), "Extracting type graph");
    let graph = extract(unit, &options.config.extractor_config())?;

    Ok(build_schema(&graph, options)?)
}

/// Synthesizes a schema from an already extracted type graph.
///
/// # Errors
///
/// Returns the first synthesis error.
pub fn build_schema(graph: &TypeGraph, options: &SchemaOptions) -> Result<Schema> {
    let roots = Roots::locate(graph)?;
    debug!(descriptors = graph.len(), has_mutation = roots.mutation.is_some(), "Starting schema synthesis");

    let mut synthesizer = Synthesizer::new(graph, options)?;
    synthesizer.synthesize(roots.query, Mode::Output)?;
    if let Some(mutation) = roots.mutation {
        synthesizer.synthesize(mutation, Mode::Output)?;
    }

    let types = synthesizer.into_types();
    assemble(types, roots.mutation.is_some(), &options.config)
}

/// Registers `types` and applies limits from `config`.
fn assemble(types: Vec<Type>, has_mutation: bool, config: &CompilerConfig) -> Result<Schema> {
    let type_count = types.len();
    let mutation = has_mutation.then_some(MUTATION_ROOT);

    let mut schema_builder = Schema::build(QUERY_ROOT, mutation, None);
    for ty in types {
        schema_builder = schema_builder.register(ty);
    }

    // Configure limits
    schema_builder = schema_builder
        .limit_depth(config.max_depth)
        .limit_complexity(config.max_complexity);

    if !config.introspection {
        schema_builder = schema_builder.disable_introspection();
    }

    let schema = schema_builder
        .finish()
        .map_err(|e| SynthesisError::Schema(e.to_string()))?;

    info!(types = type_count, "GraphQL schema synthesized");
    Ok(schema)
}
