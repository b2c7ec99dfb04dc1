//! Custom scalars: `UUID` and `MemberTypeId`
//!
//! Each scalar has exactly one predicate. async-graphql funnels both query
//! literals and variable values through [`ScalarType::parse`]; values read from
//! the database go through the same predicate before they are emitted (see
//! [`output_uuid`] and [`output_member_type_id`]).

use std::fmt;

use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::errors::ApiError;

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("UUID pattern compiles")
});

/// Rejections raised by the scalar predicates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    #[error("Invalid UUID.")]
    InvalidUuid { value: String },
    #[error("Invalid MemberTypeId.")]
    InvalidMemberTypeId { value: String },
}

impl ScalarError {
    /// Name of the scalar that rejected the value
    pub fn scalar(&self) -> &'static str {
        match self {
            ScalarError::InvalidUuid { .. } => "UUID",
            ScalarError::InvalidMemberTypeId { .. } => "MemberTypeId",
        }
    }

    /// The rejected input
    pub fn value(&self) -> &str {
        match self {
            ScalarError::InvalidUuid { value } | ScalarError::InvalidMemberTypeId { value } => value,
        }
    }
}

// ============================================================================
// UUID
// ============================================================================

/// A 36-character lower-case hyphenated UUID string (8-4-4-4-12)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uuid(String);

/// Check `value` against the UUID layout
pub fn is_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

/// Validate a UUID, returning it unchanged on success
pub fn validate_uuid(value: impl Into<String>) -> Result<Uuid, ScalarError> {
    let value = value.into();
    if is_uuid(&value) {
        Ok(Uuid(value))
    } else {
        Err(ScalarError::InvalidUuid { value })
    }
}

impl Uuid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Uuid {
    type Error = ScalarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_uuid(value)
    }
}

impl TryFrom<&str> for Uuid {
    type Error = ScalarError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_uuid(value)
    }
}

#[Scalar(name = "UUID")]
impl ScalarType for Uuid {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => Ok(validate_uuid(s)?),
            other => Err(InputValueError::custom(ScalarError::InvalidUuid {
                value: other.to_string(),
            })),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

// ============================================================================
// MemberTypeId
// ============================================================================

/// Membership tier identifier. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberTypeId {
    Basic,
    Business,
}

impl MemberTypeId {
    pub const ALL: [MemberTypeId; 2] = [MemberTypeId::Basic, MemberTypeId::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberTypeId::Basic => "basic",
            MemberTypeId::Business => "business",
        }
    }
}

/// Validate a membership tier identifier
pub fn validate_member_type_id(value: &str) -> Result<MemberTypeId, ScalarError> {
    MemberTypeId::ALL
        .into_iter()
        .find(|id| id.as_str() == value)
        .ok_or_else(|| ScalarError::InvalidMemberTypeId {
            value: value.to_string(),
        })
}

impl fmt::Display for MemberTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MemberTypeId {
    type Error = ScalarError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_member_type_id(value)
    }
}

#[Scalar(name = "MemberTypeId")]
impl ScalarType for MemberTypeId {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => Ok(validate_member_type_id(&s)?),
            other => Err(InputValueError::custom(ScalarError::InvalidMemberTypeId {
                value: other.to_string(),
            })),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

// ============================================================================
// Output boundary
// ============================================================================

/// Validate a stored identifier before it leaves the API
pub(crate) fn output_uuid(raw: &str) -> async_graphql::Result<Uuid> {
    validate_uuid(raw).map_err(|e| ApiError::from(e).into_graphql())
}

/// Validate a stored membership tier before it leaves the API
pub(crate) fn output_member_type_id(raw: &str) -> async_graphql::Result<MemberTypeId> {
    validate_member_type_id(raw).map_err(|e| ApiError::from(e).into_graphql())
}
