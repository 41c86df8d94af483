//! Placeholder expressions for columns that cannot bind a bare `$n`.
//!
//! Templates are restricted to two shapes so that nothing but a function call
//! or a cast can ever reach the generated INSERT text:
//!
//! - `func(arg, ...)` where each `arg` is `{index}`, `{srid}` or an integer
//! - `{index}::type`
//!
//! `func` and `type` are plain ASCII identifiers and `{index}` appears exactly once.

use std::fmt;

use thiserror::Error;

const INDEX: &str = "{index}";
const SRID: &str = "{srid}";

/// Rejected template text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value template '{template}': {reason}")]
pub struct TemplateError {
    pub template: String,
    pub reason: &'static str,
}

/// A validated placeholder template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTemplate {
    text: String,
}

impl ValueTemplate {
    /// Parse and validate a template.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let fail = |reason| TemplateError {
            template: text.to_string(),
            reason,
        };

        let text = text.trim();
        if text.matches(INDEX).count() != 1 {
            return Err(fail("template must contain {index} exactly once"));
        }

        if let Some(ty) = text.strip_prefix(INDEX).and_then(|t| t.strip_prefix("::")) {
            if !is_ident(ty) {
                return Err(fail("cast target must be an identifier"));
            }
            return Ok(Self {
                text: text.to_string(),
            });
        }

        let open = text.find('(').ok_or_else(|| fail("expected func(args) or {index}::type"))?;
        let func = &text[..open];
        if !is_ident(func) {
            return Err(fail("function name must be an identifier"));
        }
        let args = text[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| fail("missing closing parenthesis"))?;

        for arg in args.split(',').map(str::trim) {
            let ok = arg == INDEX
                || arg == SRID
                || (!arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()));
            if !ok {
                return Err(fail("arguments must be {index}, {srid} or integers"));
            }
        }

        let normalized = args
            .split(',')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Self {
            text: format!("{}({})", func, normalized),
        })
    }

    /// Render the placeholder for a 1-based parameter position.
    pub fn render(&self, index: usize, srid: i32) -> String {
        self.text
            .replace(INDEX, &format!("${}", index))
            .replace(SRID, &srid.to_string())
    }

    /// The validated template text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ValueTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
