//! Named grammar lookup.
//!
//! The registry maps grammar identifiers to shared, read-only grammars. The
//! builtin set is constructed once per process on first use.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::{RandomartError, Result};

use super::definition::{parse_grammar_definitions, DefinitionFormat};
use super::{BuiltinGrammars, Grammar};

static BUILTIN_REGISTRY: OnceLock<std::result::Result<GrammarRegistry, String>> = OnceLock::new();

/// Grammars addressable by identifier.
#[derive(Debug, Clone, Default)]
pub struct GrammarRegistry {
    grammars: HashMap<String, Arc<Grammar>>,
}

impl GrammarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the builtin grammars.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for grammar in BuiltinGrammars::all()? {
            registry.insert(grammar)?;
        }
        Ok(registry)
    }

    /// Process-wide builtin registry, built on first use.
    pub fn builtin() -> Result<&'static GrammarRegistry> {
        BUILTIN_REGISTRY
            .get_or_init(|| Self::with_builtins().map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|message| RandomartError::config(message.clone()))
    }

    /// Register a grammar under its own name.
    pub fn insert(&mut self, grammar: Grammar) -> Result<&mut Self> {
        let name = grammar.name().to_string();
        if self.grammars.contains_key(&name) {
            return Err(RandomartError::Config {
                message: format!("Grammar {} is already registered", name),
                help: Some("Give the grammar a distinct name".to_string()),
            });
        }
        self.grammars.insert(name, Arc::new(grammar));
        Ok(self)
    }

    /// Look up a grammar by identifier.
    pub fn get(&self, name: &str) -> Result<Arc<Grammar>> {
        self.grammars
            .get(name)
            .cloned()
            .ok_or_else(|| RandomartError::UnknownGrammar {
                name: name.to_string(),
                help: Some(format!("Available grammars: {}", self.names().join(", "))),
            })
    }

    /// Check if a grammar is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.grammars.contains_key(name)
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.grammars.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered grammars.
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Register every grammar defined in `source`.
    ///
    /// Returns the identifiers that were added.
    pub fn load_str(&mut self, source: &str, format: DefinitionFormat) -> Result<Vec<String>> {
        let grammars = parse_grammar_definitions(source, format)?;
        let mut added = Vec::with_capacity(grammars.len());
        for grammar in grammars {
            added.push(grammar.name().to_string());
            self.insert(grammar)?;
        }
        tracing::debug!(grammars = ?added, "loaded grammar definitions");
        Ok(added)
    }

    /// Register every grammar defined in a YAML or JSON file.
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<String>> {
        let format = DefinitionFormat::from_path(path)?;
        let source = fs::read_to_string(path).map_err(|e| RandomartError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read grammar definitions: {}", e),
        })?;
        self.load_str(&source, format)
    }
}
