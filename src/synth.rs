//! Expression synthesis.
//!
//! Expands a grammar symbol into a shader expression, drawing every random
//! decision from one ordered stream. For a fixed grammar, symbol, depth and
//! seed the output is byte-for-byte reproducible.
//!
//! Generation cost grows exponentially with the initial depth: every
//! composite expansion may spawn as many recursive calls as its arity.

use std::fmt::Write as _;

use crate::error::{RandomartError, Result};
use crate::grammar::Grammar;
use crate::rng::{Mulberry32, RandomSource};
use crate::sampler::pick;

/// Separator between call arguments in the emitted expression.
pub const ARGUMENT_SEPARATOR: &str = ", ";

/// Expand `symbol` into an expression string.
///
/// Once `depth <= 0` only the grammar's fallback rule is sampled. Before
/// expanding a composite alternative, depth decays by one while a fresh draw
/// is below 0.5 (and depth is still non-negative); every argument is then
/// expanded with the same decayed depth minus one.
pub fn synthesize<R>(grammar: &Grammar, symbol: &str, depth: i64, rng: &mut R) -> Result<String>
where
    R: RandomSource + ?Sized,
{
    let mut out = String::new();
    expand(grammar, symbol, depth, rng, &mut out)?;
    Ok(out)
}

/// Expand the grammar's start symbol with a fresh generator seeded from `seed`.
pub fn synthesize_from_seed(grammar: &Grammar, depth: u32, seed: &str) -> Result<String> {
    let mut rng = Mulberry32::from_seed(seed);
    let expression = synthesize(grammar, grammar.start_symbol(), i64::from(depth), &mut rng)?;
    tracing::debug!(
        grammar = grammar.name(),
        seed,
        depth,
        length = expression.len(),
        "synthesized expression"
    );
    Ok(expression)
}

fn expand<R>(grammar: &Grammar, symbol: &str, depth: i64, rng: &mut R, out: &mut String) -> Result<()>
where
    R: RandomSource + ?Sized,
{
    let rule = grammar.require_rule(symbol)?;
    let fallback = grammar
        .rule(grammar.fallback_symbol())
        .ok_or_else(|| RandomartError::Config {
            message: format!(
                "Rule {} not found in grammar {}",
                grammar.fallback_symbol(),
                grammar.name()
            ),
            help: Some("The fallback rule is required to end synthesis".to_string()),
        })?;

    let chosen = pick(if depth <= 0 { fallback } else { rule }, rng)?;

    if chosen.is_terminal() {
        if chosen.is_scalar_constant() {
            write_literal(out, rng.next_f64());
        } else {
            out.push_str(&chosen.emit_name);
            out.push_str("()");
        }
        return Ok(());
    }

    let mut depth = depth;
    while depth >= 0 && rng.next_f64() < 0.5 {
        depth -= 1;
    }
    let child_depth = depth - 1;

    out.push_str(&chosen.emit_name);
    out.push('(');
    for (i, argument) in chosen.argument_types.iter().enumerate() {
        if i > 0 {
            out.push_str(ARGUMENT_SEPARATOR);
        }
        expand(grammar, argument, child_depth, rng, out)?;
    }
    out.push(')');
    Ok(())
}

/// Write a scalar in `[0, 1)` as a float literal.
///
/// `Debug` gives the shortest round-trip form and always keeps a decimal point
/// or exponent (`0.0`, `0.25`, `1e-5`), so the literal stays a float in GLSL.
fn write_literal(out: &mut String, value: f64) {
    let _ = write!(out, "{:?}", value);
}
