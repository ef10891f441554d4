//! Parameter values and their semantic types
//!
//! Callers bind loosely typed [`Value`]s; the validator coerces them to the
//! [`ValueType`] a descriptor declares before anything is rendered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Semantic type a parameter value must coerce to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Integer,
    Real,
    Boolean,
    Path,
}

impl ValueType {
    /// Human-readable type name used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real number",
            Self::Boolean => "boolean",
            Self::Path => "path",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Path(PathBuf),
    List(Vec<Value>),
}

impl Value {
    /// Coerce a scalar value to the given type.
    ///
    /// Lists are never coerced here; callers iterate elements themselves.
    /// Returns `None` when the conversion is not possible.
    pub fn coerce(&self, target: ValueType) -> Option<Self> {
        match (target, self) {
            (_, Self::List(_)) => None,

            (ValueType::Text, Self::Text(s)) => Some(Self::Text(s.clone())),
            (ValueType::Text, Self::Path(p)) => p.to_str().map(|s| Self::Text(s.to_string())),
            (ValueType::Text, other) => Some(Self::Text(other.to_arg())),

            (ValueType::Integer, Self::Integer(i)) => Some(Self::Integer(*i)),
            (ValueType::Integer, Self::Real(r)) if is_exact_i64(*r) => Some(Self::Integer(*r as i64)),
            (ValueType::Integer, Self::Text(s)) => s.trim().parse().ok().map(Self::Integer),
            (ValueType::Integer, _) => None,

            (ValueType::Real, Self::Real(r)) => Some(Self::Real(*r)),
            (ValueType::Real, Self::Integer(i)) => Some(Self::Real(*i as f64)),
            (ValueType::Real, Self::Text(s)) => s.trim().parse().ok().map(Self::Real),
            (ValueType::Real, _) => None,

            (ValueType::Boolean, Self::Boolean(b)) => Some(Self::Boolean(*b)),
            (ValueType::Boolean, Self::Integer(0)) => Some(Self::Boolean(false)),
            (ValueType::Boolean, Self::Integer(1)) => Some(Self::Boolean(true)),
            (ValueType::Boolean, Self::Text(s)) => parse_bool(s).map(Self::Boolean),
            (ValueType::Boolean, _) => None,

            // Tokens are passed to the tool as UTF-8 strings
            (ValueType::Path, Self::Path(p)) if p.to_str().is_some() => Some(Self::Path(p.clone())),
            (ValueType::Path, Self::Text(s)) if !s.is_empty() => Some(Self::Path(PathBuf::from(s))),
            (ValueType::Path, _) => None,
        }
    }

    /// Render the value as a single command-line token.
    ///
    /// Booleans render as `1`/`0`, the convention MMseqs2 uses for boolean
    /// option values. Lists render comma-joined; the command-line builder
    /// expands them element by element instead.
    pub fn to_arg(&self) -> String {
        match self {
            Self::Boolean(true) => "1".to_string(),
            Self::Boolean(false) => "0".to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Text(s) => s.clone(),
            Self::Path(p) => p.to_string_lossy().into_owned(),
            Self::List(items) => items
                .iter()
                .map(Self::to_arg)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Elements of a list value, or the value itself as a one-element slice
    pub fn as_slice(&self) -> &[Self] {
        match self {
            Self::List(items) => items,
            single => std::slice::from_ref(single),
        }
    }

    /// The flag of a `Boolean` value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The path of a `Path` value
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Short description of the value's shape for error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Boolean(b) => format!("boolean {b}"),
            Self::Integer(i) => format!("integer {i}"),
            Self::Real(r) => format!("real number {r}"),
            Self::Text(s) => format!("text {s:?}"),
            Self::Path(p) if p.to_str().is_none() => {
                format!("non-UTF-8 path {:?}", p.display().to_string())
            }
            Self::Path(p) => format!("path {:?}", p.display().to_string()),
            Self::List(items) => format!("list of {} value(s)", items.len()),
        }
    }
}

/// Integral, finite and inside the `i64` range, so the cast is exact
fn is_exact_i64(r: f64) -> bool {
    r.is_finite() && r.fract() == 0.0 && r >= i64::MIN as f64 && r < i64::MAX as f64
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for Value {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
