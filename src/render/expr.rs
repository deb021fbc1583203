//! Parsing of synthesized expressions.
//!
//! Expressions use plain call syntax:
//! - `get_x()` - zero-argument call
//! - `add(get_x(), 0.25)` - call with comma-separated arguments
//! - `0.25`, `1e-5` - float literal

use super::software::SoftwareError;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A float literal.
    Number(f32),
    /// A function call.
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    /// Parse an expression from a string.
    pub fn parse(input: &str) -> Result<Self, SoftwareError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(SoftwareError::Parse {
                message: "Empty expression".to_string(),
            });
        }

        // Literal
        if input.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
            let value: f32 = input.parse().map_err(|_| SoftwareError::Parse {
                message: format!("Invalid number: {}", input),
            })?;
            return Ok(Expr::Number(value));
        }

        // Function call: name(args)
        let Some(paren_pos) = input.find('(') else {
            return Err(SoftwareError::Parse {
                message: format!("Expected a call or a number, found: {}", input),
            });
        };

        if !input.ends_with(')') {
            return Err(SoftwareError::Parse {
                message: format!("Unclosed function call: {}", input),
            });
        }

        let name = input[..paren_pos].trim();
        if !is_identifier(name) {
            return Err(SoftwareError::Parse {
                message: format!("Invalid function name: {:?}", name),
            });
        }

        let args = parse_args(&input[paren_pos + 1..input.len() - 1])?;

        Ok(Expr::Call {
            name: name.to_string(),
            args,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse comma-separated arguments, handling nested parentheses.
fn parse_args(input: &str) -> Result<Vec<Expr>, SoftwareError> {
    if input.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut args = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| SoftwareError::Parse {
                    message: format!("Unbalanced parentheses in: {}", input),
                })?;
            }
            ',' if depth == 0 => {
                args.push(Expr::parse(&input[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SoftwareError::Parse {
            message: format!("Unbalanced parentheses in: {}", input),
        });
    }

    args.push(Expr::parse(&input[start..])?);
    Ok(args)
}
