//! Grammar definition documents.
//!
//! Grammars can be declared at run time in YAML or JSON:
//!
//! ```yaml
//! name: mine
//! start: E
//! fallback: A
//! rules:
//!   - name: A
//!     alternatives:
//!       - { name: a, weight: 0.5 }
//!       - { name: x, weight: 0.5, emit: get_x }
//!   - name: E
//!     alternatives:
//!       - { name: E, args: [A, A, A], weight: 1.0 }
//! ```
//!
//! Rules are a list rather than a mapping so that a rule declared twice is
//! reported instead of silently overwritten.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RandomartError, Result};

use super::{Grammar, GrammarBuilder, RuleAlternative, DEFAULT_FALLBACK, DEFAULT_START};

/// Serialisation format of a definition document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// One or more YAML documents separated by `---`.
    Yaml,
    /// A single JSON object or an array of objects.
    Json,
}

impl DefinitionFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(RandomartError::Parse {
                message: format!("Unsupported grammar file: {}", path.display()),
                help: Some("Use a .yaml, .yml or .json extension".to_string()),
            }),
        }
    }
}

/// A grammar as written in a definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDefinition {
    pub name: String,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_fallback")]
    pub fallback: String,
    pub rules: Vec<RuleDefinition>,
}

/// A named rule and its alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub name: String,
    pub alternatives: Vec<AlternativeDefinition>,
}

/// One alternative; `emit` defaults to `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternativeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit: Option<String>,
}

fn default_start() -> String {
    DEFAULT_START.to_string()
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

impl GrammarDefinition {
    /// Describe an existing grammar.
    pub fn from_grammar(grammar: &Grammar) -> Self {
        let rules = grammar
            .rules()
            .map(|(name, alternatives)| RuleDefinition {
                name: name.to_string(),
                alternatives: alternatives
                    .iter()
                    .map(|alt| AlternativeDefinition {
                        name: alt.name.clone(),
                        args: alt.argument_types.clone(),
                        weight: alt.weight,
                        emit: (alt.emit_name != alt.name).then(|| alt.emit_name.clone()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: grammar.name().to_string(),
            start: grammar.start_symbol().to_string(),
            fallback: grammar.fallback_symbol().to_string(),
            rules,
        }
    }

    /// Validate and build the grammar.
    pub fn build(self) -> Result<Grammar> {
        let mut builder = GrammarBuilder::new(self.name);
        builder.start_symbol(self.start).fallback(self.fallback);

        for rule in self.rules {
            let alternatives = rule
                .alternatives
                .into_iter()
                .map(|alt| {
                    let emit = alt.emit.unwrap_or_else(|| alt.name.clone());
                    RuleAlternative::composite(alt.name, alt.args, alt.weight, emit)
                })
                .collect();
            builder.rule(rule.name, alternatives)?;
        }

        builder.build()
    }
}

/// Parse and build every grammar in a definition document.
pub fn parse_grammar_definitions(source: &str, format: DefinitionFormat) -> Result<Vec<Grammar>> {
    let definitions = match format {
        DefinitionFormat::Yaml => parse_yaml(source)?,
        DefinitionFormat::Json => parse_json(source)?,
    };

    definitions.into_iter().map(GrammarDefinition::build).collect()
}

fn parse_yaml(source: &str) -> Result<Vec<GrammarDefinition>> {
    let mut definitions = Vec::new();
    for document in serde_yaml::Deserializer::from_str(source) {
        let value = serde_yaml::Value::deserialize(document).map_err(|e| RandomartError::Parse {
            message: format!("Invalid YAML in grammar definition: {}", e),
            help: None,
        })?;
        // Empty documents, e.g. a trailing `---`
        if value.is_null() {
            continue;
        }
        let definition = serde_yaml::from_value(value).map_err(|e| RandomartError::Parse {
            message: format!("Invalid grammar definition: {}", e),
            help: Some("Expected name, rules and optional start/fallback".to_string()),
        })?;
        definitions.push(definition);
    }
    Ok(definitions)
}

fn parse_json(source: &str) -> Result<Vec<GrammarDefinition>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(GrammarDefinition),
        Many(Vec<GrammarDefinition>),
    }

    let parsed: OneOrMany = serde_json::from_str(source).map_err(|e| RandomartError::Parse {
        message: format!("Invalid JSON grammar definition: {}", e),
        help: Some("Expected an object or an array of objects".to_string()),
    })?;

    Ok(match parsed {
        OneOrMany::One(definition) => vec![definition],
        OneOrMany::Many(definitions) => definitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::BuiltinGrammars;

    #[test]
    fn test_parse_yaml_defaults() {
        let source = "\
name: mini
rules:
  - name: A
    alternatives:
      - { name: a, weight: 0.5 }
      - { name: x, weight: 0.5, emit: get_x }
  - name: E
    alternatives:
      - { name: E, args: [A, A, A], weight: 1.0 }
";
        let grammars = parse_grammar_definitions(source, DefinitionFormat::Yaml).unwrap();
        assert_eq!(grammars.len(), 1);

        let grammar = &grammars[0];
        assert_eq!(grammar.start_symbol(), "E");
        assert_eq!(grammar.fallback_symbol(), "A");

        let a = grammar.rule("A").unwrap();
        assert!(a[0].is_scalar_constant());
        assert_eq!(a[0].emit_name, "a");
        assert_eq!(a[1].emit_name, "get_x");
    }

    #[test]
    fn test_parse_yaml_multiple_documents() {
        let source = "\
name: one
rules:
  - name: A
    alternatives: [{ name: x, weight: 1.0 }]
  - name: E
    alternatives: [{ name: E, args: [A], weight: 1.0 }]
---
name: two
start: S
fallback: T
rules:
  - name: T
    alternatives: [{ name: y, weight: 1.0 }]
  - name: S
    alternatives: [{ name: S, args: [T], weight: 1.0 }]
";
        let grammars = parse_grammar_definitions(source, DefinitionFormat::Yaml).unwrap();
        let names: Vec<_> = grammars.iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(grammars[1].fallback_symbol(), "T");
    }

    #[test]
    fn test_parse_json_array() {
        let source = r#"[
            {
                "name": "j",
                "rules": [
                    { "name": "A", "alternatives": [{ "name": "x", "weight": 1.0, "emit": "get_x" }] },
                    { "name": "E", "alternatives": [{ "name": "E", "args": ["A"], "weight": 1.0 }] }
                ]
            }
        ]"#;
        let grammars = parse_grammar_definitions(source, DefinitionFormat::Json).unwrap();
        assert_eq!(grammars[0].name(), "j");
    }

    #[test]
    fn test_duplicate_rule_in_document() {
        let source = "\
name: dup
rules:
  - name: A
    alternatives: [{ name: x, weight: 1.0 }]
  - name: A
    alternatives: [{ name: y, weight: 1.0 }]
  - name: E
    alternatives: [{ name: E, args: [A], weight: 1.0 }]
";
        let err = parse_grammar_definitions(source, DefinitionFormat::Yaml).unwrap_err();
        assert!(matches!(err, RandomartError::Config { .. }));
    }

    #[test]
    fn test_bad_weights_in_document() {
        let source = r#"{"name": "w", "rules": [
            {"name": "A", "alternatives": [{"name": "x", "weight": 0.99}]},
            {"name": "E", "alternatives": [{"name": "E", "args": ["A"], "weight": 1.0}]}
        ]}"#;
        assert!(parse_grammar_definitions(source, DefinitionFormat::Json).is_err());
    }

    #[test]
    fn test_branching_fallback_in_document() {
        let source = "\
name: runaway
rules:
  - name: T
    alternatives: [{ name: x, weight: 1.0, emit: get_x }]
  - name: A
    alternatives:
      - { name: y, weight: 0.1, emit: get_y }
      - { name: pair, args: [T, T], weight: 0.9 }
  - name: E
    alternatives: [{ name: E, args: [A, A, A], weight: 1.0 }]
";
        let err = parse_grammar_definitions(source, DefinitionFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("Fallback rule A"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let source = "name: x\nrules: []\ncolour: red\n";
        let err = parse_grammar_definitions(source, DefinitionFormat::Yaml).unwrap_err();
        assert!(matches!(err, RandomartError::Parse { .. }));
    }

    #[test]
    fn test_builtin_definition_rebuilds() {
        let tsoding = BuiltinGrammars::tsoding().unwrap();
        let definition = GrammarDefinition::from_grammar(&tsoding);
        let json = serde_json::to_string(&definition).unwrap();

        let rebuilt = parse_grammar_definitions(&json, DefinitionFormat::Json).unwrap();
        let rebuilt = &rebuilt[0];
        assert_eq!(rebuilt.name(), "tsoding");
        assert_eq!(rebuilt.rule_names().collect::<Vec<_>>(), vec!["A", "C", "E"]);
        assert_eq!(rebuilt.emit_names(), tsoding.emit_names());
        for (name, alternatives) in tsoding.rules() {
            let other = rebuilt.rule(name).unwrap();
            for (a, b) in alternatives.iter().zip(other) {
                assert_eq!(a.argument_types, b.argument_types);
                assert!((a.weight - b.weight).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DefinitionFormat::from_path(Path::new("g.yml")).unwrap(),
            DefinitionFormat::Yaml
        );
        assert_eq!(
            DefinitionFormat::from_path(Path::new("g.json")).unwrap(),
            DefinitionFormat::Json
        );
        assert!(DefinitionFormat::from_path(Path::new("g.toml")).is_err());
    }
}
