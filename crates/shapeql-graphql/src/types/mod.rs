//! Scalar types used by synthesized schemas.
//!
//! - [`scalars`] - the built-in `Date` scalar
//! - [`custom`] - user-supplied scalars and closed string-literal scalars

pub mod custom;
pub mod scalars;

pub use custom::{ScalarDef, ScalarValidator, literal_union_name, literal_union_scalar};
pub use scalars::{DATE_SCALAR, Timestamp};
