//! YAML decoder for rule files.
//!
//! This module turns the rule file into a `RuleSet` using the saphyr YAML
//! library. Decoding is structural only: it checks that required keys exist and
//! carry the right YAML type, but performs no semantic validation of ports,
//! CIDR blocks or names.

use saphyr::{LoadableYamlNode, Yaml};
use thiserror::Error;

use super::{Direction, Rule, RuleSet};

/// Errors that can occur while decoding a rule file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("Empty YAML document")]
    Empty,

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("rules[{index}]: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("rules[{index}]: field '{field}' must be {expected}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

/// Decodes rule file content into a `RuleSet`.
///
/// The root document must be a mapping. Its `rules` key holds a sequence of
/// rule mappings; a missing or null `rules` key produces an empty set.
///
/// # Example
///
/// ```ignore
/// let yaml = r#"
/// rules:
///   - name: ssh
///     type: ingress
///     from_port: 22
///     to_port: 22
///     protocol: tcp
///     cidr_blocks: ["10.0.0.0/24"]
///     description: SSH
/// "#;
///
/// let rules = decode(yaml).unwrap();
/// assert_eq!(rules.len(), 1);
/// ```
pub fn decode(content: &str) -> Result<RuleSet, DecodeError> {
    let docs = Yaml::load_from_str(content).map_err(|e| DecodeError::Yaml(e.to_string()))?;

    let doc = docs.first().ok_or(DecodeError::Empty)?;

    let mapping = doc.as_mapping().ok_or_else(|| {
        DecodeError::InvalidStructure("Root document must be a mapping".to_string())
    })?;

    let rules_node = match find_value(mapping, "rules") {
        Some(node) if !node.is_null() => node,
        _ => return Ok(RuleSet::default()),
    };

    let entries = rules_node.as_sequence().ok_or_else(|| {
        DecodeError::InvalidStructure("'rules' must be a sequence".to_string())
    })?;

    let rules = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_rule(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RuleSet::new(rules))
}

/// Parses one entry of the `rules` sequence.
fn parse_rule(index: usize, entry: &Yaml) -> Result<Rule, DecodeError> {
    let mapping = entry.as_mapping().ok_or_else(|| {
        DecodeError::InvalidStructure(format!("rules[{}] must be a mapping", index))
    })?;

    let fields = RuleFields { index, mapping };

    let type_str = fields.required_str("type")?;
    let direction = type_str.parse::<Direction>().map_err(|_| DecodeError::InvalidField {
        index,
        field: "type",
        expected: "'ingress' or 'egress'",
    })?;

    Ok(Rule {
        name: fields.required_str("name")?.to_string(),
        direction,
        from_port: fields.required_int("from_port")?,
        to_port: fields.required_int("to_port")?,
        protocol: fields.required_str("protocol")?.to_string(),
        cidr_blocks: fields.required_string_list("cidr_blocks")?,
        description: fields.required_str("description")?.to_string(),
        lxc_forward: fields.optional_int("lxc_forward")?,
    })
}

/// Typed field access on a single rule mapping.
struct RuleFields<'a, 'y> {
    index: usize,
    mapping: &'a saphyr::Mapping<'y>,
}

impl<'a, 'y> RuleFields<'a, 'y> {
    fn get(&self, field: &str) -> Option<&'a Yaml<'y>> {
        find_value(self.mapping, field).filter(|v| !v.is_null())
    }

    fn missing(&self, field: &'static str) -> DecodeError {
        DecodeError::MissingField {
            index: self.index,
            field,
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::InvalidField {
            index: self.index,
            field,
            expected,
        }
    }

    fn required_str(&self, field: &'static str) -> Result<&'a str, DecodeError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        value.as_str().ok_or_else(|| self.invalid(field, "a string"))
    }

    fn required_int(&self, field: &'static str) -> Result<i64, DecodeError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        value.as_integer().ok_or_else(|| self.invalid(field, "an integer"))
    }

    fn optional_int(&self, field: &'static str) -> Result<Option<i64>, DecodeError> {
        match self.get(field) {
            Some(value) => value
                .as_integer()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "an integer")),
            None => Ok(None),
        }
    }

    /// An explicit empty sequence is accepted; an absent key is not.
    fn required_string_list(&self, field: &'static str) -> Result<Vec<String>, DecodeError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;

        let items = value
            .as_sequence()
            .ok_or_else(|| self.invalid(field, "a sequence of strings"))?;

        items
            .iter()
            .map(|item: &Yaml| {
                item.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| self.invalid(field, "a sequence of strings"))
            })
            .collect()
    }
}

fn find_value<'a, 'y>(mapping: &'a saphyr::Mapping<'y>, key: &str) -> Option<&'a Yaml<'y>> {
    mapping
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}
