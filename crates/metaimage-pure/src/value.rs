use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;

use crate::error::{Error, Result};

/// A MetaImage header value.
///
/// Well-known numeric tags are parsed into typed sequences on read; every
/// other tag keeps its raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw tag text, trimmed.
    Text(String),
    /// Whitespace-separated floating-point components.
    Floats(Vec<f64>),
    /// Whitespace-separated integer components.
    Ints(Vec<i64>),
    /// A single integer.
    Int(i64),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Value::Floats(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Value::Ints(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a single integer, parsing `Text` if needed.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Ints(v) if v.len() == 1 => Some(v[0]),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Floats(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Ints(v)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Floats(v) => f.write_str(&join_floats(v)),
            Value::Ints(v) => f.write_str(&join(v)),
            Value::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Space-join a sequence of components, the way every list-valued tag is written.
pub fn join<T: core::fmt::Display>(items: &[T]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{item}");
    }
    out
}

/// Space-join floats, keeping a trailing `.0` on integral components.
pub fn join_floats(items: &[f64]) -> String {
    let mut out = String::new();
    for (i, x) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let start = out.len();
        let _ = write!(out, "{x}");
        if x.is_finite() && !out[start..].contains('.') {
            out.push_str(".0");
        }
    }
    out
}

/// Parse whitespace-separated floats for the named tag.
pub fn parse_floats(text: &str, tag: &'static str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|s| s.parse::<f64>().map_err(|_| Error::InvalidValue(tag)))
        .collect()
}

/// Parse whitespace-separated integers for the named tag.
pub fn parse_ints(text: &str, tag: &'static str) -> Result<Vec<i64>> {
    text.split_whitespace()
        .map(|s| s.parse::<i64>().map_err(|_| Error::InvalidValue(tag)))
        .collect()
}

/// Parse whitespace-separated non-negative extents for the named tag.
pub fn parse_extents(text: &str, tag: &'static str) -> Result<Vec<usize>> {
    text.split_whitespace()
        .map(|s| s.parse::<usize>().map_err(|_| Error::InvalidValue(tag)))
        .collect()
}
