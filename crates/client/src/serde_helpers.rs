//! Serde helpers for Splunk's inconsistent JSON typing.
//!
//! Responsibilities:
//! - Provide deserializers that accept the several encodings Splunk uses for
//!   the same logical field across endpoints and versions.
//!
//! Explicitly does NOT handle:
//! - Validating higher-level semantics (ranges, required/optional business rules).
//!
//! Invariants / assumptions:
//! - Splunk may return boolean flags as `true`, `1` or `"1"`/`"true"` depending on endpoint/version.
//! - These helpers must not log or print secrets; errors should be generic parse errors.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoolOrNumberOrString {
    Bool(bool),
    U64(u64),
    I64(i64),
    String(String),
}

/// Deserialize an optional boolean that may be encoded as a bool, a number or a string.
///
/// Numbers are true when non-zero. Strings accept `0`/`1`, `true`/`false` and
/// `t`/`f` in any case; any other string is treated as absent.
pub fn opt_bool_from_flexible<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<BoolOrNumberOrString>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(BoolOrNumberOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrNumberOrString::U64(n)) => Ok(Some(n != 0)),
        Some(BoolOrNumberOrString::I64(n)) => Ok(Some(n != 0)),
        Some(BoolOrNumberOrString::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "t" => Ok(Some(true)),
            "0" | "false" | "f" => Ok(Some(false)),
            _ => Ok(None),
        },
    }
}
