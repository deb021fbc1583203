//! Individual grammar lints.
//!
//! Each check inspects a built grammar (so structural rules such as weight
//! sums and dangling references already hold) and returns its findings.

use crate::grammar::Grammar;
use crate::shader::ShaderTemplate;

use super::warning::{codes, Diagnostic};

/// Every emit name must be a function the fragment template defines.
pub fn check_emit_names(grammar: &Grammar, template: &ShaderTemplate) -> Vec<Diagnostic> {
    grammar
        .emit_names()
        .into_iter()
        .filter(|name| !template.defines_function(name))
        .map(|name| {
            Diagnostic::error(
                codes::MISSING_FUNCTION,
                format!(
                    "Grammar {} emits {}() but the fragment template does not define it",
                    grammar.name(),
                    name
                ),
            )
            .with_help(format!("Add a `{}` function to the fragment template", name))
        })
        .collect()
}

/// Rules that neither the start symbol nor the fallback rule lead to.
pub fn check_unreachable_rules(grammar: &Grammar) -> Vec<Diagnostic> {
    let graph = grammar.graph();
    let mut reachable = graph.reachable_from(grammar.start_symbol());
    reachable.extend(graph.reachable_from(grammar.fallback_symbol()));

    grammar
        .rule_names()
        .filter(|name| !reachable.contains(*name))
        .map(|name| {
            Diagnostic::warning(
                codes::UNREACHABLE_RULE,
                format!("Rule {} in grammar {} is never expanded", name, grammar.name()),
            )
            .with_help(format!(
                "Reference it from {} or remove it",
                grammar.start_symbol()
            ))
        })
        .collect()
}

/// Alternatives with zero weight are dead entries.
pub fn check_zero_weights(grammar: &Grammar) -> Vec<Diagnostic> {
    grammar
        .rules()
        .flat_map(|(rule, alternatives)| {
            alternatives
                .iter()
                .filter(|alternative| alternative.weight == 0.0)
                .map(move |alternative| {
                    Diagnostic::warning(
                        codes::ZERO_WEIGHT,
                        format!(
                            "Alternative {} of rule {} has weight 0 and is never chosen",
                            alternative.name, rule
                        ),
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{BuiltinGrammars, GrammarBuilder, RuleAlternative};

    fn template_with(functions: &[&str]) -> ShaderTemplate {
        let mut fragment = String::new();
        for name in functions {
            fragment.push_str(&format!("float {}() {{\n    return 0.0;\n}}\n", name));
        }
        fragment.push_str("void main() {\n    gl_FragColor = EXPRESSION;\n}\n");
        ShaderTemplate::new("", fragment, "EXPRESSION").unwrap()
    }

    #[test]
    fn test_emit_names_all_defined() {
        let grammar = BuiltinGrammars::oswald().unwrap();
        assert!(check_emit_names(&grammar, &ShaderTemplate::glsl()).is_empty());
    }

    #[test]
    fn test_emit_names_missing() {
        let grammar = BuiltinGrammars::perrig().unwrap();
        let template = template_with(&["get_x", "get_y", "A", "E", "add"]);

        let diagnostics = check_emit_names(&grammar, &template);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::MISSING_FUNCTION);
        assert!(diagnostics[0].message.contains("mul()"));
    }

    #[test]
    fn test_unreachable_rule() {
        let mut builder = GrammarBuilder::new("orphan");
        builder
            .rule("A", vec![RuleAlternative::terminal("x", 1.0, "get_x")])
            .unwrap()
            .rule("B", vec![RuleAlternative::terminal("y", 1.0, "get_y")])
            .unwrap()
            .rule("E", vec![RuleAlternative::composite("E", ["A", "A", "A"], 1.0, "E")])
            .unwrap();
        let grammar = builder.build().unwrap();

        let diagnostics = check_unreachable_rules(&grammar);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.starts_with("Rule B "));
    }

    #[test]
    fn test_builtins_fully_reachable() {
        for grammar in BuiltinGrammars::all().unwrap() {
            assert!(check_unreachable_rules(&grammar).is_empty(), "{}", grammar.name());
        }
    }

    #[test]
    fn test_zero_weight() {
        let mut builder = GrammarBuilder::new("dead");
        builder
            .rule(
                "A",
                vec![
                    RuleAlternative::terminal("x", 1.0, "get_x"),
                    RuleAlternative::terminal("y", 0.0, "get_y"),
                ],
            )
            .unwrap()
            .rule("E", vec![RuleAlternative::composite("E", ["A", "A", "A"], 1.0, "E")])
            .unwrap();
        let grammar = builder.build().unwrap();

        let diagnostics = check_zero_weights(&grammar);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Alternative y of rule A"));
    }
}
