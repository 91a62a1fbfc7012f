//! Cell values.
//!
//! CSV sources arrive as text; `Scalar::infer` upgrades numeric-looking text
//! when type inference is enabled. Operators compare cells with
//! `Scalar::key_eq` (or hash them through `ScalarKey`) so that `Int(3)` and
//! `Float(3.0)` land in the same group and match in a join.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Parse a raw text field, preferring integers, then finite floats, then text.
    pub fn infer(raw: &str) -> Scalar {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Scalar::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Scalar::Float(f);
            }
        }
        Scalar::Str(raw.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Text is parsed, so CSV columns loaded
    /// without type inference still take part in arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Str(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            Scalar::Null | Scalar::Bool(_) => None,
        }
    }

    /// Equality used by joins and grouping: numeric variants compare by value,
    /// `Null` matches `Null`.
    pub fn key_eq(&self, other: &Scalar) -> bool {
        self.key() == other.key()
    }

    pub fn key(&self) -> ScalarKey {
        match self {
            Scalar::Null => ScalarKey::Null,
            Scalar::Bool(b) => ScalarKey::Bool(*b),
            Scalar::Int(i) => ScalarKey::Int(*i),
            Scalar::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    ScalarKey::Int(*f as i64)
                } else {
                    ScalarKey::Float(f.to_bits())
                }
            }
            Scalar::Str(s) => ScalarKey::Str(s.clone()),
        }
    }
}

/// Hashable identity of a `Scalar`. Integral floats collapse onto `Int`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

/// Counts beyond `i64::MAX` become floats instead of wrapping negative.
impl From<u64> for Scalar {
    fn from(i: u64) -> Self {
        i64::try_from(i).map_or(Scalar::Float(i as f64), Scalar::Int)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}
