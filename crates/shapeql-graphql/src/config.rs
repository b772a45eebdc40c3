//! Compiler configuration.
//!
//! [`CompilerConfig`] holds the serializable knobs of the compiler and can be
//! loaded from a `shapeql.toml` file. [`SchemaOptions`] adds the parts that
//! only exist in code: custom scalar definitions, the scalar factory, and
//! resolver functions.
//!
//! # Example Configuration
//!
//! ```toml
//! input_suffix = "Input"
//! anonymous_prefix = "Anonymous"
//! string_literal_unions_as_enums = false
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//!
//! [[scalars]]
//! name = "Email"
//! description = "An e-mail address"
//! pattern = "^[^@]+@[^@]+$"
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shapeql_core::{ExtractorConfig, Primitive};

use crate::error::CompileError;
use crate::resolvers::ResolverMap;
use crate::types::ScalarDef;

/// Serializable compiler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Suffix appended to every input-mode type name.
    /// Default: "Input"
    #[serde(default = "default_input_suffix")]
    pub input_suffix: String,

    /// Prefix for names of anonymous record and union types.
    /// Default: "Anonymous"
    #[serde(default = "default_anonymous_prefix")]
    pub anonymous_prefix: String,

    /// Member whose string-literal type names an anonymous record. The member
    /// itself is never materialized as a field.
    /// Default: "__typename"
    #[serde(default = "default_discriminant_field")]
    pub discriminant_field: String,

    /// Classify every aliased union of string literals as an enum, not only
    /// aliases carrying the enum hint.
    /// Default: false
    #[serde(default)]
    pub string_literal_unions_as_enums: bool,

    /// Maximum query depth allowed by the built schema.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed by the built schema.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,

    /// Custom scalars declared in configuration.
    #[serde(default)]
    pub scalars: Vec<ScalarConfig>,
}

/// A custom scalar declared in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarConfig {
    /// Raw annotation this scalar replaces, and its GraphQL name.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Regular expression string inputs must match.
    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub specified_by_url: Option<String>,
}

fn default_input_suffix() -> String {
    "Input".to_string()
}

fn default_anonymous_prefix() -> String {
    "Anonymous".to_string()
}

fn default_discriminant_field() -> String {
    "__typename".to_string()
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            input_suffix: default_input_suffix(),
            anonymous_prefix: default_anonymous_prefix(),
            discriminant_field: default_discriminant_field(),
            string_literal_unions_as_enums: false,
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
            scalars: Vec::new(),
        }
    }
}

impl CompilerConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Config`] if the document does not parse or
    /// fails [`validate`](Self::validate).
    pub fn from_toml_str(source: &str) -> Result<Self, CompileError> {
        let config: Self = toml::from_str(source).map_err(|e| CompileError::Config(e.to_string()))?;
        config.validate().map_err(CompileError::Config)?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.input_suffix.is_empty() {
            return Err("input_suffix must not be empty".into());
        }
        if self.anonymous_prefix.is_empty() {
            return Err("anonymous_prefix must not be empty".into());
        }
        if self.discriminant_field.is_empty() {
            return Err("discriminant_field must not be empty".into());
        }
        if self.max_depth == 0 {
            return Err("max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("max_complexity must be > 0".into());
        }
        for scalar in &self.scalars {
            if scalar.name.is_empty() {
                return Err("scalars[].name must not be empty".into());
            }
            if let Some(pattern) = &scalar.pattern
                && let Err(e) = regex::Regex::new(pattern)
            {
                return Err(format!("scalars '{}' pattern is invalid: {e}", scalar.name));
            }
        }
        Ok(())
    }

    /// Settings forwarded to the type-graph extractor.
    #[must_use]
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            string_literal_unions_as_enums: self.string_literal_unions_as_enums,
        }
    }
}

/// Fallback hook consulted for primitives with no named custom scalar.
pub type CustomScalarFactory = Arc<dyn Fn(&Primitive) -> Option<ScalarDef> + Send + Sync>;

/// Everything [`crate::create_schema`] needs besides the declarations.
#[derive(Clone, Default)]
pub struct SchemaOptions {
    /// Custom scalars keyed by the raw annotation they replace.
    pub custom_scalars: Vec<ScalarDef>,

    pub custom_scalar_factory: Option<CustomScalarFactory>,

    /// Field resolvers keyed by `Type.field`.
    pub resolvers: ResolverMap,

    pub config: CompilerConfig,
}

impl SchemaOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_custom_scalar(mut self, scalar: ScalarDef) -> Self {
        self.custom_scalars.push(scalar);
        self
    }

    #[must_use]
    pub fn with_custom_scalar_factory(
        mut self,
        factory: impl Fn(&Primitive) -> Option<ScalarDef> + Send + Sync + 'static,
    ) -> Self {
        self.custom_scalar_factory = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn with_resolvers(mut self, resolvers: ResolverMap) -> Self {
        self.resolvers = resolvers;
        self
    }
}

impl fmt::Debug for SchemaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaOptions")
            .field("custom_scalars", &self.custom_scalars)
            .field("custom_scalar_factory", &self.custom_scalar_factory.is_some())
            .field("resolvers", &self.resolvers)
            .field("config", &self.config)
            .finish()
    }
}
