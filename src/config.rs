//! Generation options.

use serde::{Deserialize, Serialize};

use crate::error::{RandomartError, Result};

/// Default seed string.
pub const DEFAULT_SEED: &str = "default";

/// Default grammar identifier.
pub const DEFAULT_GRAMMAR: &str = "perrig";

/// Default maximum expression depth.
pub const DEFAULT_DEPTH: u32 = 15;

/// Default coordinate scale: `x, y ∈ [-2, 2]`.
pub const DEFAULT_SCALE: f32 = 2.0;

/// What to generate. Canvas size is passed separately at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomartOptions {
    /// Arbitrary text; equal seeds give equal expressions.
    pub seed: String,
    /// Grammar identifier looked up in the registry.
    pub grammar: String,
    /// Maximum expression depth.
    pub depth: u32,
    /// Coordinate scale handed to the backend.
    pub scale: f32,
    /// Log the synthesized expression at info level.
    pub debug: bool,
}

impl Default for RandomartOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            grammar: DEFAULT_GRAMMAR.to_string(),
            depth: DEFAULT_DEPTH,
            scale: DEFAULT_SCALE,
            debug: false,
        }
    }
}

impl RandomartOptions {
    /// Options with every default and the given seed.
    pub fn new(seed: impl Into<String>) -> Self {
        Self::default().with_seed(seed)
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_grammar(mut self, grammar: impl Into<String>) -> Self {
        self.grammar = grammar.into();
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse options from YAML. Missing fields take their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| RandomartError::Parse {
            message: format!("Invalid options: {}", e),
            help: Some("Known fields: seed, grammar, depth, scale, debug".to_string()),
        })
    }

    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| RandomartError::Parse {
            message: format!("Invalid options: {}", e),
            help: Some("Known fields: seed, grammar, depth, scale, debug".to_string()),
        })
    }

    /// Reject values no backend can draw with.
    pub(crate) fn check(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(RandomartError::InvalidInput {
                message: format!("Scale must be a positive finite number, got {}", self.scale),
            });
        }
        Ok(())
    }
}
