//! Dynamically-typed scalar values and foreign-key tuples
//!
//! Backends return rows of loosely-typed column values; this module
//! defines the scalar vocabulary those values are expressed in, plus the
//! [`Key`] tuple used to identify a parent entity from a relationship's
//! perspective. Keys participate in hash maps and in batch dedup, so
//! scalars implement `Eq`/`Hash` by value (floats by bit pattern).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dynamically-typed column value
///
/// Serde round-trips are exact for every variant, which is what makes
/// keyset cursors (JSON payloads of sort-column values) reversible.
/// Non-finite floats are not representable in JSON and must not be used
/// as sort-key values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScalarValue {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// Text string
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// UUID value
    Uuid(Uuid),
    /// Timestamp with timezone (UTC)
    Timestamp(DateTime<Utc>),
}

impl ScalarValue {
    /// Check if this value is NULL
    pub const fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Compare two scalar values of the same variant
    ///
    /// Returns `None` for mismatched variants. Floats compare by total
    /// order so that sorting is never ambiguous.
    pub fn compare(&self, other: &ScalarValue) -> Option<Ordering> {
        use ScalarValue::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Float(a), Float(b)) => Some(a.total_cmp(b)),
            (Text(a), Text(b)) => Some(a.cmp(b)),
            (Bytes(a), Bytes(b)) => Some(a.cmp(b)),
            (Uuid(a), Uuid(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        use ScalarValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            // Bit equality keeps Eq/Hash consistent for NaN values
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Text(a), Text(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use ScalarValue::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Null => {}
            Bool(v) => v.hash(state),
            Int(v) => v.hash(state),
            Float(v) => v.to_bits().hash(state),
            Text(v) => v.hash(state),
            Bytes(v) => v.hash(state),
            Uuid(v) => v.hash(state),
            Timestamp(v) => v.hash(state),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ScalarValue::*;
        match self {
            Null => write!(f, "NULL"),
            Bool(v) => write!(f, "{}", v),
            Int(v) => write!(f, "{}", v),
            Float(v) => write!(f, "{}", v),
            Text(v) => write!(f, "{}", v),
            Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Uuid(v) => write!(f, "{}", v),
            Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Int(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::Text(v)
    }
}

impl From<Uuid> for ScalarValue {
    fn from(v: Uuid) -> Self {
        ScalarValue::Uuid(v)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(v: DateTime<Utc>) -> Self {
        ScalarValue::Timestamp(v)
    }
}

/// An ordered tuple of scalar values identifying one parent entity
///
/// Composite foreign keys produce multi-element tuples. Keys compare by
/// value equality and hash cheaply, so they can be used directly as
/// batch and cache map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key(Vec<ScalarValue>);

impl Key {
    /// Create a key from an ordered list of scalar values
    pub fn new(values: Vec<ScalarValue>) -> Self {
        Self(values)
    }

    /// Create a single-column key
    pub fn single(value: impl Into<ScalarValue>) -> Self {
        Self(vec![value.into()])
    }

    /// The ordered components of this key
    pub fn values(&self) -> &[ScalarValue] {
        &self.0
    }

    /// Number of components in this key
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this key has no components
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any component of this key is NULL
    ///
    /// A parent with a NULL foreign-key component cannot have related
    /// rows; loaders short-circuit such keys without touching the backend.
    pub fn has_null(&self) -> bool {
        self.0.iter().any(ScalarValue::is_null)
    }
}

impl From<Vec<ScalarValue>> for Key {
    fn from(values: Vec<ScalarValue>) -> Self {
        Self(values)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}
