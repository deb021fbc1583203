//! randomart - seeded procedural art from weighted grammars
//!
//! A seed string drives a small PRNG, which drives a weighted grammar that
//! expands into a nested function-call expression. The expression is
//! substituted into a fragment shader template and drawn by a rendering
//! backend supplied by the caller. The same seed, grammar and depth always
//! produce the same expression.

pub mod config;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod render;
pub mod rng;
pub mod sampler;
pub mod shader;
pub mod synth;
pub mod validation;

pub use config::RandomartOptions;
pub use engine::{randomart, Randomart};
pub use error::{RandomartError, Result};
pub use grammar::{
    BuiltinGrammars, DefinitionFormat, Grammar, GrammarBuilder, GrammarDefinition,
    GrammarRegistry, RuleAlternative,
};
pub use render::{ContextPool, RenderBackend, RenderRequest, SoftwareBackend, SoftwareError};
pub use rng::{seed_to_u32, Mulberry32, RandomSource};
pub use sampler::pick;
pub use shader::{ShaderSource, ShaderTemplate};
pub use synth::{synthesize, synthesize_from_seed};
pub use validation::{validate_grammar, Diagnostic, Severity, ValidationResult};
