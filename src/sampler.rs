//! Weighted choice between rule alternatives.

use crate::error::{RandomartError, Result};
use crate::grammar::RuleAlternative;
use crate::rng::RandomSource;

/// Pick one alternative with probability proportional to its weight.
///
/// Draws a single value `u`, scales it by the total weight and returns the
/// first alternative whose cumulative weight strictly exceeds the scaled
/// draw. Falling off the end is a broken invariant, never a normal outcome.
pub fn pick<'a, R>(alternatives: &'a [RuleAlternative], rng: &mut R) -> Result<&'a RuleAlternative>
where
    R: RandomSource + ?Sized,
{
    let total: f64 = alternatives.iter().map(|alt| alt.weight).sum();
    let target = rng.next_f64() * total;

    let mut cumulative = 0.0;
    for alternative in alternatives {
        cumulative += alternative.weight;
        if target < cumulative {
            return Ok(alternative);
        }
    }

    Err(RandomartError::Invariant {
        message: format!(
            "no alternative selected among {} (draw {} of total weight {})",
            alternatives.len(),
            target,
            total
        ),
    })
}
