//! Grammar lint.
//!
//! Building a grammar already rejects anything that would break synthesis.
//! Linting goes further and checks the grammar against the shader template it
//! will be emitted into, and flags rules and alternatives that are dead
//! weight.

mod checks;
mod warning;

pub use warning::{codes, Diagnostic, Severity, ValidationResult};

use crate::grammar::Grammar;
use crate::shader::ShaderTemplate;

/// Run every check against a grammar and the template it targets.
pub fn validate_grammar(grammar: &Grammar, template: &ShaderTemplate) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.extend(checks::check_emit_names(grammar, template));
    result.extend(checks::check_unreachable_rules(grammar));
    result.extend(checks::check_zero_weights(grammar));

    tracing::debug!(
        grammar = grammar.name(),
        errors = result.error_count(),
        warnings = result.warning_count(),
        "validated grammar"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{BuiltinGrammars, GrammarRegistry};

    #[test]
    fn test_builtins_are_clean() {
        let template = ShaderTemplate::glsl();
        for grammar in BuiltinGrammars::all().unwrap() {
            let result = validate_grammar(&grammar, &template);
            assert!(result.is_clean(), "{}: {:?}", grammar.name(), result);
        }
    }

    #[test]
    fn test_loaded_grammar_with_problems() {
        let source = r#"
name: sloppy
rules:
  - name: A
    alternatives:
      - { name: a, weight: 1.0 }
      - { name: q, weight: 0.0, emit: get_q }
  - name: Unused
    alternatives:
      - { name: x, weight: 1.0, emit: get_x }
  - name: E
    alternatives:
      - { name: E, args: [A, A, A], weight: 1.0 }
"#;
        let mut registry = GrammarRegistry::new();
        registry
            .load_str(source, crate::grammar::DefinitionFormat::Yaml)
            .unwrap();
        let grammar = registry.get("sloppy").unwrap();

        let result = validate_grammar(&grammar, &ShaderTemplate::glsl());
        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.with_code(codes::MISSING_FUNCTION).count(), 1);
        assert_eq!(result.with_code(codes::ZERO_WEIGHT).count(), 1);
        assert_eq!(result.with_code(codes::UNREACHABLE_RULE).count(), 1);
        assert_eq!(result.warning_count(), 2);
    }
}
