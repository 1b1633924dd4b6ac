//! Operation parameter sets
//!
//! A parameter set is what one invocation of a named operation receives:
//! either positional values (bound in the operation's declared order) or a
//! name-to-value mapping. Values are JSON values so that callers can mix
//! integers, strings and string lists without a bespoke value type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Positional tuple or named mapping of operation arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamSet {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl ParamSet {
    /// Parameter set with no arguments (for list-style operations).
    #[must_use]
    pub fn empty() -> Self {
        Self::Positional(Vec::new())
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Named(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Number of supplied arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ParamSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Value>> for ParamSet {
    fn from(values: Vec<Value>) -> Self {
        Self::Positional(values)
    }
}

impl From<Map<String, Value>> for ParamSet {
    fn from(map: Map<String, Value>) -> Self {
        Self::Named(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_constructors() {
        let positional = ParamSet::positional([json!("Azralon"), json!("Thrall")]);
        assert_eq!(positional.len(), 2);

        let named = ParamSet::named([("item_id", json!(19019))]);
        assert_eq!(named.len(), 1);
        assert!(ParamSet::empty().is_empty());
    }

    #[test]
    fn test_untagged_deserialization() {
        let positional: ParamSet = serde_json::from_value(json!(["realm", "name"])).unwrap();
        assert!(matches!(positional, ParamSet::Positional(ref v) if v.len() == 2));

        let named: ParamSet = serde_json::from_value(json!({"boss_id": 24723})).unwrap();
        assert!(matches!(named, ParamSet::Named(ref m) if m["boss_id"] == 24723));
    }
}
