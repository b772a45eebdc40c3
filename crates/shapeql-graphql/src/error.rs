//! Error types for schema synthesis.
//!
//! Extraction failures come from [`shapeql_core::ExtractError`]; everything
//! that goes wrong while materializing GraphQL types is a [`SynthesisError`].
//! [`CompileError`] wraps both so callers of [`crate::create_schema`] see a
//! single error type.

use std::fmt;

use shapeql_core::ExtractError;
use thiserror::Error;

/// Direction a descriptor is materialized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Object, union and scalar types returned from fields.
    Output,
    /// Input objects and scalars accepted as arguments.
    Input,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output => f.write_str("output"),
            Self::Input => f.write_str("input"),
        }
    }
}

/// Errors raised while turning a type graph into a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    #[error("No '{0}' root interface found among top-level declarations")]
    RootNotFound(String),

    #[error("Type '{descriptor}' cannot be used in {mode} position: {detail}")]
    ModeMismatch {
        descriptor: String,
        mode: Mode,
        detail: String,
    },

    #[error("No scalar mapping for '{raw_type}' ({primitive}); register a custom scalar for it")]
    UnresolvedScalar { raw_type: String, primitive: String },

    #[error("GraphQL type name '{name}' is produced by more than one declaration")]
    DuplicateTypeName { name: String },

    #[error("Type '{0}' has no fields left to materialize")]
    EmptyRecord(String),

    #[error("Enum '{name}' value '{value}' is not a valid GraphQL name")]
    InvalidEnumValue { name: String, value: String },

    #[error("'{name}' is not a valid GraphQL name (in {context})")]
    InvalidName { name: String, context: String },

    #[error("Invalid custom scalar '{name}': {detail}")]
    InvalidScalar { name: String, detail: String },

    #[error("Failed to build GraphQL schema: {0}")]
    Schema(String),
}

impl SynthesisError {
    /// Returns a stable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RootNotFound(_) => "ROOT_NOT_FOUND",
            Self::ModeMismatch { .. } => "MODE_MISMATCH",
            Self::UnresolvedScalar { .. } => "UNRESOLVED_SCALAR",
            Self::DuplicateTypeName { .. } => "DUPLICATE_TYPE_NAME",
            Self::EmptyRecord(_) => "EMPTY_RECORD",
            Self::InvalidEnumValue { .. } => "INVALID_ENUM_VALUE",
            Self::InvalidName { .. } => "INVALID_NAME",
            Self::InvalidScalar { .. } => "INVALID_SCALAR",
            Self::Schema(_) => "SCHEMA_BUILD_FAILED",
        }
    }
}

/// Any failure of the declaration -> schema pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("Invalid compiler configuration: {0}")]
    Config(String),
}

impl CompileError {
    /// Returns a stable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Extract(err) => err.error_code(),
            Self::Synthesis(err) => err.error_code(),
            Self::Config(_) => "INVALID_CONFIG",
        }
    }
}

pub type Result<T, E = SynthesisError> = std::result::Result<T, E>;
