//! Conversion of JSON and YAML text into document trees.
//!
//! Text parsing itself is delegated to `serde_json` and `serde_yaml`; this
//! module only maps their values onto [`Node`]s.
//!
//! # Example
//!
//! ```
//! use polydecode::document::parser::parse_json;
//!
//! let doc = parse_json(r#"{"name": "horsey", "specifics": {"type": "horse"}}"#).unwrap();
//! assert_eq!(doc.get("name").and_then(|n| n.as_str()), Some("horsey"));
//! ```

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use super::node::{Node, Scalar};

/// Parses a JSON string into a document tree.
pub fn parse_json(content: &str) -> Result<Node, serde_json::Error> {
    let value: JsonValue = serde_json::from_str(content)?;
    Ok(Node::from(value))
}

/// Parses a YAML string into a document tree.
///
/// Mapping keys must be strings, numbers or booleans; numbers and booleans
/// are converted to their textual form.
pub fn parse_yaml(content: &str) -> Result<Node> {
    let value: YamlValue = serde_yaml::from_str(content).context("Failed to parse YAML")?;
    convert_yaml(value)
}

fn convert_number(number: &serde_json::Number) -> Scalar {
    match number.as_i64() {
        Some(i) => Scalar::Integer(i),
        None => Scalar::Float(number.as_f64().unwrap_or(f64::NAN)),
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::Null,
            JsonValue::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => Node::Scalar(convert_number(&n)),
            JsonValue::String(s) => Node::Scalar(Scalar::String(s)),
            JsonValue::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            JsonValue::Object(map) => Node::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

fn convert_yaml(value: YamlValue) -> Result<Node> {
    Ok(match value {
        YamlValue::Null => Node::Null,
        YamlValue::Bool(b) => Node::Scalar(Scalar::Bool(b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Scalar(Scalar::Integer(i))
            } else {
                let f = n
                    .as_f64()
                    .ok_or_else(|| anyhow!("Unsupported YAML number: {}", n))?;
                Node::Scalar(Scalar::Float(f))
            }
        }
        YamlValue::String(s) => Node::Scalar(Scalar::String(s)),
        YamlValue::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(convert_yaml)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                out.insert(yaml_key(key)?, convert_yaml(value)?);
            }
            Node::Mapping(out)
        }
        YamlValue::Tagged(tagged) => convert_yaml(tagged.value)?,
    })
}

fn yaml_key(key: YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        other => bail!("Unsupported YAML mapping key: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_numbers() {
        let doc = parse_json(r#"{"int": 4, "float": 1.5, "big": 18446744073709551615}"#).unwrap();
        assert_eq!(doc.get("int"), Some(&Node::from(4)));
        assert_eq!(doc.get("float"), Some(&Node::from(1.5)));
        assert!(matches!(
            doc.get("big"),
            Some(Node::Scalar(Scalar::Float(_)))
        ));
    }

    #[test]
    fn test_parse_json_preserves_key_order() {
        let doc = parse_json(r#"{"b": 1, "a": 2}"#).unwrap();
        let keys: Vec<_> = doc.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(parse_json("{").is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let doc = parse_yaml("name: horsey\nspecifics:\n  type: horse\n  shoes: 4\n").unwrap();
        let specifics = doc.get("specifics").unwrap();
        assert_eq!(specifics.get("type").and_then(Node::as_str), Some("horse"));
        assert_eq!(specifics.get("shoes").and_then(Node::as_i64), Some(4));
    }

    #[test]
    fn test_parse_yaml_non_string_keys() {
        let doc = parse_yaml("1: one\ntrue: yes\n").unwrap();
        assert_eq!(doc.get("1").and_then(Node::as_str), Some("one"));
        assert!(doc.get("true").is_some());
    }

    #[test]
    fn test_parse_yaml_rejects_sequence_keys() {
        assert!(parse_yaml("? [a, b]\n: value\n").is_err());
    }
}
