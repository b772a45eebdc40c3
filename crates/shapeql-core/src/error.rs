use thiserror::Error;

/// Declaration-shape errors raised while extracting the type graph.
///
/// Every variant names the offending declaration or member location
/// (`Query.foo`, `Baz.retInt(args).a`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("Unknown type '{name}' referenced at {location}")]
    UnknownType { name: String, location: String },

    #[error("Duplicate declaration '{0}'")]
    DuplicateDeclaration(String),

    #[error("Unsupported type shape at {location}: {detail}")]
    UnsupportedShape { location: String, detail: String },

    #[error("Resolver {location} declares {count} parameters; only a single argument bag is supported")]
    MultipleResolverParameters { location: String, count: usize },

    #[error("Resolver argument at {location} must be a record type, found '{found}'")]
    InvalidResolverParameter { location: String, found: String },

    #[error("Malformed Default<Type, Value> annotation at {location}: {detail}")]
    MalformedDefault { location: String, detail: String },

    #[error("Enum '{name}' only supports string literal members, found '{member}'")]
    InvalidEnum { name: String, member: String },

    #[error("Type alias '{0}' refers to itself")]
    AliasCycle(String),

    #[error("Interface '{0}' inherits from itself")]
    InheritanceCycle(String),
}

impl ExtractError {
    /// Returns a stable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType { .. } => "UNKNOWN_TYPE",
            Self::DuplicateDeclaration(_) => "DUPLICATE_DECLARATION",
            Self::UnsupportedShape { .. } => "UNSUPPORTED_SHAPE",
            Self::MultipleResolverParameters { .. } => "MULTIPLE_RESOLVER_PARAMETERS",
            Self::InvalidResolverParameter { .. } => "INVALID_RESOLVER_PARAMETER",
            Self::MalformedDefault { .. } => "MALFORMED_DEFAULT",
            Self::InvalidEnum { .. } => "INVALID_ENUM",
            Self::AliasCycle(_) => "ALIAS_CYCLE",
            Self::InheritanceCycle(_) => "INHERITANCE_CYCLE",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
