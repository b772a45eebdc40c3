//! Built-in `Date` scalar.
//!
//! Dates cross the wire as UTC timestamps in the fixed 24-character form
//! `YYYY-MM-DDThh:mm:ss.sssZ` (ISO-8601 with millisecond precision).
//! Anything else is rejected on input.

use async_graphql::dynamic::Scalar;
use async_graphql::{InputValueError, InputValueResult, ScalarType, Value};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// GraphQL name of the date scalar.
pub const DATE_SCALAR: &str = "Date";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// A UTC instant, e.g. `2024-01-15T10:30:00.000Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    /// Parses the canonical 24-character form.
    pub fn parse_str(s: &str) -> Option<Self> {
        if s.len() != 24 {
            return None;
        }
        PrimitiveDateTime::parse(s, TIMESTAMP_FORMAT)
            .ok()
            .map(|dt| Self(dt.assume_utc()))
    }

    /// Canonical text form, normalized to UTC.
    ///
    /// `None` for instants outside years 0000-9999, which have no
    /// 24-character form.
    pub fn to_rfc_string(&self) -> Option<String> {
        let utc = self.0.to_offset(UtcOffset::UTC);
        if !(0..=9999).contains(&utc.year()) {
            return None;
        }
        utc.format(TIMESTAMP_FORMAT).ok()
    }

    /// Dynamic scalar registered whenever a declaration uses `Date`.
    pub fn dynamic_scalar() -> Scalar {
        Scalar::new(DATE_SCALAR)
            .description("A UTC timestamp in the form YYYY-MM-DDThh:mm:ss.sssZ")
            .validator(|value| <Timestamp as ScalarType>::parse(value.clone()).is_ok())
    }
}

#[async_graphql::Scalar(name = "Date")]
impl ScalarType for Timestamp {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => Timestamp::parse_str(&s).ok_or_else(|| {
                InputValueError::custom(format!(
                    "Invalid Date: '{s}'. Expected format: YYYY-MM-DDThh:mm:ss.sssZ"
                ))
            }),
            _ => Err(InputValueError::expected_type(value)),
        }
    }

    fn to_value(&self) -> Value {
        self.to_rfc_string().map_or(Value::Null, Value::String)
    }
}
