//! Grammars shipped with the library.

use crate::error::Result;

use super::{Grammar, GrammarBuilder, RuleAlternative};

/// Collection of builtin grammars.
pub struct BuiltinGrammars;

impl BuiltinGrammars {
    /// Identifiers of every builtin grammar.
    pub const NAMES: [&'static str; 3] = ["perrig", "tsoding", "oswald"];

    /// The grammar from Perrig & Song (1999): coordinates, a constant, add and mul.
    pub fn perrig() -> Result<Grammar> {
        let mut builder = GrammarBuilder::new("perrig");
        builder.rule(
            "A",
            vec![
                RuleAlternative::terminal("a", 0.34, "get_a"),
                RuleAlternative::terminal("x", 0.33, "get_x"),
                RuleAlternative::terminal("y", 0.33, "get_y"),
            ],
        )?;
        builder.rule(
            "C",
            vec![
                RuleAlternative::composite("A", ["A"], 0.25, "A"),
                RuleAlternative::composite("add", ["C", "C"], 0.375, "add"),
                RuleAlternative::composite("mul", ["C", "C"], 0.375, "mul"),
            ],
        )?;
        builder.rule("E", colour_rule())?;
        builder.build()
    }

    /// Time-free subset of tsoding's randomart grammar.
    pub fn tsoding() -> Result<Grammar> {
        let mut builder = GrammarBuilder::new("tsoding");
        builder.rule("A", rich_terminals())?;
        builder.rule(
            "C",
            vec![
                RuleAlternative::composite("A", ["A"], 0.2, "A"),
                RuleAlternative::composite("add", ["C", "C"], 0.2, "add"),
                RuleAlternative::composite("mul", ["C", "C"], 0.2, "mul"),
                RuleAlternative::composite("sqrt", ["C"], 0.2, "sqrt_abs"),
                RuleAlternative::composite("sin", ["C"], 0.2, "csin"),
            ],
        )?;
        builder.rule("E", colour_rule())?;
        builder.build()
    }

    /// tsoding's vocabulary plus cos, tan and reflection.
    pub fn oswald() -> Result<Grammar> {
        let mut builder = GrammarBuilder::new("oswald");
        builder.rule("A", rich_terminals())?;
        builder.rule(
            "C",
            vec![
                RuleAlternative::composite("A", ["A"], 0.125, "A"),
                RuleAlternative::composite("add", ["C", "C"], 0.125, "add"),
                RuleAlternative::composite("mul", ["C", "C"], 0.125, "mul"),
                RuleAlternative::composite("sqrt", ["C"], 0.125, "sqrt_abs"),
                RuleAlternative::composite("sin", ["C"], 0.125, "csin"),
                RuleAlternative::composite("cos", ["C"], 0.125, "ccos"),
                RuleAlternative::composite("tan", ["C"], 0.125, "ctan"),
                RuleAlternative::composite("refl", ["C"], 0.125, "refl"),
            ],
        )?;
        builder.rule("E", colour_rule())?;
        builder.build()
    }

    /// Get all builtin grammars.
    pub fn all() -> Result<Vec<Grammar>> {
        Ok(vec![Self::perrig()?, Self::tsoding()?, Self::oswald()?])
    }

    /// Get a builtin grammar by identifier.
    pub fn get(name: &str) -> Option<Result<Grammar>> {
        match name {
            "perrig" => Some(Self::perrig()),
            "tsoding" => Some(Self::tsoding()),
            "oswald" => Some(Self::oswald()),
            _ => None,
        }
    }
}

/// `E -> E(C, C, C)`: one channel expression per colour component.
fn colour_rule() -> Vec<RuleAlternative> {
    vec![RuleAlternative::composite("E", ["C", "C", "C"], 1.0, "E")]
}

fn rich_terminals() -> Vec<RuleAlternative> {
    vec![
        RuleAlternative::terminal("a", 0.20, "get_a"),
        RuleAlternative::terminal("x", 0.16, "get_x"),
        RuleAlternative::terminal("y", 0.16, "get_y"),
        RuleAlternative::terminal("abs_x", 0.16, "get_abs_x"),
        RuleAlternative::terminal("abs_y", 0.16, "get_abs_y"),
        RuleAlternative::terminal("distance", 0.16, "get_distance"),
    ]
}
