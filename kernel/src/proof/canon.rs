//! Canonical JSON bytes: the one serialisation used before hashing.
//!
//! Rules:
//!
//! 1. Object keys sorted lexicographically (byte order), recursively.
//! 2. Compact form, no whitespace.
//! 3. Numbers must be integers. Floats are rejected so that digests never
//!    depend on float formatting; callers carry costs and epsilon values as
//!    strings (see `Cost::canonical_repr`).
//!
//! The value is rebuilt with sorted keys before handing it to `serde_json`'s
//! compact writer, so the output does not depend on whether some crate in the
//! build enables `serde_json/preserve_order`.

/// Error type for canonical JSON serialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A JSON number was not an integer.
    NonIntegerNumber { path: String, raw: String },
    /// The writer failed (not expected for in-memory buffers).
    Write { detail: String },
}

impl std::fmt::Display for CanonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonIntegerNumber { path, raw } => {
                write!(f, "non-integer number at {path} in canonical JSON: {raw}")
            }
            Self::Write { detail } => write!(f, "canonical JSON write failed: {detail}"),
        }
    }
}

impl std::error::Error for CanonError {}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number is not an `i64` or
/// `u64`.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    let sorted = sorted_copy(value, "$")?;
    serde_json::to_vec(&sorted).map_err(|e| CanonError::Write {
        detail: e.to_string(),
    })
}

fn sorted_copy(value: &serde_json::Value, path: &str) -> Result<serde_json::Value, CanonError> {
    use serde_json::Value;

    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        Value::Number(n) => Err(CanonError::NonIntegerNumber {
            path: path.to_string(),
            raw: n.to_string(),
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| sorted_copy(item, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for key in keys {
                let child = sorted_copy(&map[key.as_str()], &format!("{path}.{key}"))?;
                out.insert(key.clone(), child);
            }
            Ok(Value::Object(out))
        }
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value.clone()),
    }
}
