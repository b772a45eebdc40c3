//! Schema synthesis.
//!
//! - [`synthesizer`] - per-descriptor GraphQL type materialization
//! - [`builder`] - root lookup and schema assembly

pub mod builder;
pub mod synthesizer;

pub use builder::{MUTATION_ROOT, QUERY_ROOT, Roots, build_schema, create_schema};
pub use synthesizer::{Synthesizer, is_valid_graphql_name};
