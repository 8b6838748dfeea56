//! Canonical registry keys derived from JSON identifier values.

use std::fmt;

use serde_json::Value;

/// Canonical form of a record identifier, usable as a hash-map key.
///
/// JSON identifiers are heterogeneous (strings, numbers, booleans), so keys
/// normalize to a single string representation: strings key by their content,
/// numbers and booleans by their display form. Number `1` and string `"1"`
/// therefore share a key, matching property-key lookup semantics. Composite
/// values fall back to their JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey(String);

impl NodeKey {
    /// Derive a key from an identifier value.
    ///
    /// Returns `None` for null or missing identifiers, which never
    /// participate in any registry.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(Self(s.clone())),
            Some(Value::Number(n)) => Some(Self(n.to_string())),
            Some(Value::Bool(b)) => Some(Self(b.to_string())),
            Some(composite) => Some(Self(composite.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
