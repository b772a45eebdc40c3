//! # shapeql-core
//!
//! Declaration model and type-graph extractor for the shapeql schema compiler.
//!
//! A host front-end parses source text into a [`CompilationUnit`] of
//! interface and type-alias declarations. [`extract`] walks that unit and
//! produces a [`TypeGraph`]: a flat, deduplicated, possibly cyclic arena of
//! [`Descriptor`]s that the GraphQL synthesizer consumes.
//!
//! ## Modules
//!
//! - [`declarations`] - Declaration source model handed over by the front-end
//! - [`descriptor`] - Type descriptors and the descriptor arena
//! - [`extractor`] - Type-graph extraction
//! - [`error`] - Declaration-shape errors

pub mod declarations;
pub mod descriptor;
pub mod error;
pub mod extractor;

pub use declarations::{
    CompilationUnit, Declaration, InterfaceDecl, Keyword, Literal, ParamDecl, PropertyDecl,
    TypeAliasDecl, TypeExpr,
};
pub use descriptor::{
    Descriptor, DescriptorId, Enum, Interface, InterfaceLiteral, Member, Native, Primitive,
    PrimitiveName, TypeGraph, Union,
};
pub use error::{ExtractError, Result};
pub use extractor::{Extractor, ExtractorConfig, extract};
