//! Weighted grammars for expression synthesis.
//!
//! A grammar maps rule names to weighted alternatives. Terminal alternatives
//! become zero-argument calls (or a random constant), composite alternatives
//! expand into other rules and lower to an n-ary call.
//!
//! # Example
//!
//! ```
//! use randomart::grammar::{GrammarBuilder, RuleAlternative};
//!
//! let mut builder = GrammarBuilder::new("tiny");
//! builder.rule("A", vec![
//!     RuleAlternative::terminal("x", 0.5, "get_x"),
//!     RuleAlternative::terminal("y", 0.5, "get_y"),
//! ])?;
//! builder.rule("E", vec![
//!     RuleAlternative::composite("E", ["A", "A", "A"], 1.0, "E"),
//! ])?;
//! let grammar = builder.build()?;
//! assert_eq!(grammar.start_symbol(), "E");
//! # Ok::<(), randomart::RandomartError>(())
//! ```

mod builtin;
pub mod definition;
pub mod graph;
pub mod registry;

use std::collections::{BTreeSet, HashMap};

use crate::error::{RandomartError, Result};

pub use builtin::BuiltinGrammars;
pub use definition::{parse_grammar_definitions, DefinitionFormat, GrammarDefinition};
pub use graph::RuleGraph;
pub use registry::GrammarRegistry;

/// Name of the terminal that lowers to a random scalar literal.
pub const SCALAR_CONSTANT: &str = "a";

/// Rule used once the depth budget is exhausted, unless a grammar says otherwise.
pub const DEFAULT_FALLBACK: &str = "A";

/// Rule synthesis starts from, unless a grammar says otherwise.
pub const DEFAULT_START: &str = "E";

/// Allowed distance of a rule's weight sum from 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// One producible form of a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleAlternative {
    /// Symbol name. `"a"` marks the scalar constant terminal.
    pub name: String,
    /// Rules this alternative expands into; empty for terminals.
    pub argument_types: Vec<String>,
    /// Selection weight within the rule.
    pub weight: f64,
    /// Function name used when lowering into shader code.
    pub emit_name: String,
}

impl RuleAlternative {
    /// Create a terminal (leaf) alternative.
    pub fn terminal(name: impl Into<String>, weight: f64, emit_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument_types: Vec::new(),
            weight,
            emit_name: emit_name.into(),
        }
    }

    /// Create an alternative that expands into other rules.
    pub fn composite<I, S>(
        name: impl Into<String>,
        argument_types: I,
        weight: f64,
        emit_name: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            argument_types: argument_types.into_iter().map(Into::into).collect(),
            weight,
            emit_name: emit_name.into(),
        }
    }

    /// Check if this alternative is a leaf.
    pub fn is_terminal(&self) -> bool {
        self.argument_types.is_empty()
    }

    /// Check if this alternative lowers to a random literal.
    pub fn is_scalar_constant(&self) -> bool {
        self.is_terminal() && self.name == SCALAR_CONSTANT
    }

    /// Number of recursive arguments.
    pub fn arity(&self) -> usize {
        self.argument_types.len()
    }
}

/// An immutable, validated grammar.
///
/// Built with [`GrammarBuilder`]; shared read-only between synthesis calls.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    rules: HashMap<String, Vec<RuleAlternative>>,
    /// Rule names in registration order.
    order: Vec<String>,
    start_symbol: String,
    fallback: String,
}

impl Grammar {
    /// Grammar identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule synthesis begins from.
    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    /// Rule sampled once depth is exhausted.
    pub fn fallback_symbol(&self) -> &str {
        &self.fallback
    }

    /// Alternatives of a rule.
    pub fn rule(&self, name: &str) -> Option<&[RuleAlternative]> {
        self.rules.get(name).map(Vec::as_slice)
    }

    /// Alternatives of a rule, or a lookup error.
    pub fn require_rule(&self, name: &str) -> Result<&[RuleAlternative]> {
        self.rule(name).ok_or_else(|| RandomartError::UnknownRule {
            name: name.to_string(),
            grammar: self.name.clone(),
        })
    }

    /// Rule names in registration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Rules with their alternatives, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &[RuleAlternative])> {
        self.order
            .iter()
            .filter_map(|name| self.rule(name).map(|alts| (name.as_str(), alts)))
    }

    /// Every function name this grammar can emit.
    ///
    /// The scalar constant is excluded: it lowers to a literal, not a call.
    pub fn emit_names(&self) -> BTreeSet<&str> {
        self.rules
            .values()
            .flatten()
            .filter(|alt| !alt.is_scalar_constant())
            .map(|alt| alt.emit_name.as_str())
            .collect()
    }

    /// Reference graph between the rules.
    pub fn graph(&self) -> RuleGraph {
        RuleGraph::from_rules(self.rules())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the grammar has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for constructing grammars.
///
/// Rule-local checks (duplicates, weights) fail as soon as the rule is added;
/// cross-rule checks run in [`GrammarBuilder::build`].
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    name: String,
    rules: HashMap<String, Vec<RuleAlternative>>,
    order: Vec<String>,
    start_symbol: String,
    fallback: String,
}

impl GrammarBuilder {
    /// Create a builder with the default start (`E`) and fallback (`A`) rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: HashMap::new(),
            order: Vec::new(),
            start_symbol: DEFAULT_START.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }

    /// Set the start symbol.
    pub fn start_symbol(&mut self, symbol: impl Into<String>) -> &mut Self {
        self.start_symbol = symbol.into();
        self
    }

    /// Set the fallback rule.
    pub fn fallback(&mut self, symbol: impl Into<String>) -> &mut Self {
        self.fallback = symbol.into();
        self
    }

    /// Add a rule.
    ///
    /// Fails if the rule already exists, has no alternatives, or its weights
    /// are negative or do not sum to 1.
    pub fn rule(
        &mut self,
        name: impl Into<String>,
        alternatives: Vec<RuleAlternative>,
    ) -> Result<&mut Self> {
        let name = name.into();

        if self.rules.contains_key(&name) {
            return Err(RandomartError::Config {
                message: format!("Rule {} already exists in grammar {}", name, self.name),
                help: Some("Each rule may be registered only once".to_string()),
            });
        }

        if alternatives.is_empty() {
            return Err(RandomartError::Config {
                message: format!("Rule {} in grammar {} has no alternatives", name, self.name),
                help: None,
            });
        }

        if let Some(bad) = alternatives
            .iter()
            .find(|alt| !alt.weight.is_finite() || alt.weight < 0.0)
        {
            return Err(RandomartError::Config {
                message: format!(
                    "Alternative {} of rule {} has invalid weight {}",
                    bad.name, name, bad.weight
                ),
                help: Some("Weights must be finite and non-negative".to_string()),
            });
        }

        let total: f64 = alternatives.iter().map(|alt| alt.weight).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RandomartError::Config {
                message: format!("Total weight for rule {} must equal 1, but got {}", name, total),
                help: Some("Adjust the alternative weights so they sum to 1".to_string()),
            });
        }

        self.order.push(name.clone());
        self.rules.insert(name, alternatives);
        Ok(self)
    }

    /// Validate cross-rule references and produce the grammar.
    pub fn build(self) -> Result<Grammar> {
        if !self.rules.contains_key(&self.start_symbol) {
            return Err(RandomartError::Config {
                message: format!(
                    "Start symbol {} is not a rule of grammar {}",
                    self.start_symbol, self.name
                ),
                help: None,
            });
        }

        if !self.rules.contains_key(&self.fallback) {
            return Err(RandomartError::Config {
                message: format!("Rule {} not found in grammar {}", self.fallback, self.name),
                help: Some("The fallback rule is required to end synthesis".to_string()),
            });
        }

        for name in &self.order {
            for alt in self.rules.get(name).into_iter().flatten() {
                if let Some(missing) = alt
                    .argument_types
                    .iter()
                    .find(|arg| !self.rules.contains_key(*arg))
                {
                    return Err(RandomartError::Config {
                        message: format!(
                            "Alternative {} of rule {} references unknown rule {}",
                            alt.name, name, missing
                        ),
                        help: None,
                    });
                }
            }
        }

        // Past the depth limit every expansion, arguments included, samples
        // the fallback rule again, so a selectable composite there can grow without bound.
        if let Some(composite) = self
            .rules
            .get(&self.fallback)
            .into_iter()
            .flatten()
            .find(|alt| !alt.is_terminal() && alt.weight > 0.0)
        {
            return Err(RandomartError::Config {
                message: format!(
                    "Fallback rule {} of grammar {} has composite alternative {}, which can recurse forever",
                    self.fallback, self.name, composite.name
                ),
                help: Some("The fallback rule must only contain terminal alternatives".to_string()),
            });
        }

        let grammar = Grammar {
            name: self.name,
            rules: self.rules,
            order: self.order,
            start_symbol: self.start_symbol,
            fallback: self.fallback,
        };

        Ok(grammar)
    }
}
