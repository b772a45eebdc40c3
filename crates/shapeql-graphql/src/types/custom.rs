//! User-supplied and generated custom scalars.
//!
//! A [`ScalarDef`] is a description of a GraphQL scalar that has not been
//! registered yet. Definitions come from three places: the
//! `custom_scalars` table of [`crate::SchemaOptions`], the `[[scalars]]`
//! entries of a [`crate::CompilerConfig`], and string-literal unions used as
//! input, which become a closed scalar accepting exactly their literals.

use std::fmt;
use std::sync::{Arc, LazyLock};

use async_graphql::Value;
use async_graphql::dynamic::Scalar;
use regex::Regex;

use crate::config::ScalarConfig;
use crate::error::SynthesisError;

/// Runs of characters dropped from literal text when naming a union scalar.
static NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z]+").expect("Invalid non-letter regex"));

/// Predicate deciding whether an input value is accepted by a scalar.
pub type ScalarValidator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A custom GraphQL scalar waiting to be registered.
#[derive(Clone)]
pub struct ScalarDef {
    pub name: String,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
    validator: Option<ScalarValidator>,
}

impl ScalarDef {
    /// Creates a scalar that accepts any value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            specified_by_url: None,
            validator: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<String>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }

    /// Restricts accepted input values.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Accepts only strings matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn with_pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(self.with_validator(move |value| match value {
            Value::String(s) => regex.is_match(s),
            _ => false,
        }))
    }

    /// Builds a definition from a `[[scalars]]` config entry.
    pub fn from_config(config: &ScalarConfig) -> Result<Self, SynthesisError> {
        let mut def = Self::new(&config.name);
        if let Some(description) = &config.description {
            def = def.description(description);
        }
        if let Some(url) = &config.specified_by_url {
            def = def.specified_by_url(url);
        }
        if let Some(pattern) = &config.pattern {
            def = def
                .with_pattern(pattern)
                .map_err(|e| SynthesisError::InvalidScalar {
                    name: config.name.clone(),
                    detail: e.to_string(),
                })?;
        }
        Ok(def)
    }

    /// Whether `value` passes this scalar's validator.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.as_ref().is_none_or(|validate| validate(value))
    }

    /// Converts to a dynamic scalar ready for registration.
    pub(crate) fn to_scalar(&self) -> Scalar {
        let mut scalar = Scalar::new(&self.name);
        if let Some(description) = &self.description {
            scalar = scalar.description(description);
        }
        if let Some(url) = &self.specified_by_url {
            scalar = scalar.specified_by_url(url);
        }
        if let Some(validator) = &self.validator {
            let validator = Arc::clone(validator);
            scalar = scalar.validator(move |value| validator(value));
        }
        scalar
    }
}

impl fmt::Debug for ScalarDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("specified_by_url", &self.specified_by_url)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// Scalar accepting exactly the given string literals.
pub fn literal_union_scalar(name: &str, doc: Option<&str>, literals: &[&str]) -> ScalarDef {
    let accepted: Vec<String> = literals.iter().map(|s| (*s).to_string()).collect();
    let description = match doc {
        Some(doc) => doc.to_string(),
        None => format!(
            "One of: {}",
            literals
                .iter()
                .map(|l| format!("'{l}'"))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    ScalarDef::new(name)
        .description(description)
        .with_validator(move |value| match value {
            Value::String(s) => accepted.iter().any(|a| a == s),
            _ => false,
        })
}

/// Name for an anonymous literal-union scalar: each literal with non-letter
/// runs replaced by `_`, joined by `__`.
pub fn literal_union_name(literals: &[&str]) -> String {
    literals
        .iter()
        .map(|l| NON_LETTERS.replace_all(l, "_").into_owned())
        .collect::<Vec<_>>()
        .join("__")
}
