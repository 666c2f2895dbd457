// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts build args either as KEY=VALUE strings or as a mapping.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Deserialize build args from either a list or a mapping into `KEY=VALUE` strings.
pub fn deserialize_build_args<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entry = Option::<BuildArgsEntry>::deserialize(deserializer)?;
    Ok(match entry {
        None => Vec::new(),
        Some(BuildArgsEntry::List(values)) => values,
        Some(BuildArgsEntry::Map(map)) => map
            .into_iter()
            .map(|(k, v)| format!("{k}={}", v.into_string()))
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BuildArgsEntry {
    List(Vec<String>),
    Map(BTreeMap<String, ScalarValue>),
}

/// YAML scalars that users commonly write unquoted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl ScalarValue {
    fn into_string(self) -> String {
        match self {
            ScalarValue::Text(s) => s,
            ScalarValue::Integer(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
        }
    }
}
