//! Expression snippets and the naming helpers shared by both passes.
//!
//! Directive values are parsed with Oxc so that invalid code fails at
//! translation time instead of surfacing in the generated component. The
//! original text is kept; only its precedence class is recorded so the
//! renderer knows when an operand needs parentheses.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, LogicalOperator};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;

lazy_static! {
    static ref HYPHEN_RE: Regex = Regex::new(r"-(\w)").unwrap();
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

/// Binding strength of a parsed expression, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    Coalesce,
    LogicalOr,
    LogicalAnd,
    Binary,
    Unary,
    /// Identifiers, literals, member access and calls.
    Member,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub code: String,
    pub precedence: Precedence,
}

/// Parse a fragment of source text as a single expression.
pub fn parse_snippet(code: &str) -> Result<Snippet, String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err("expected an expression, found nothing".to_string());
    }

    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_typescript(true)
        .with_module(true)
        .with_jsx(true);

    match Parser::new(&allocator, trimmed, source_type).parse_expression() {
        Ok(expr) => Ok(Snippet {
            code: trimmed.to_string(),
            precedence: classify(&expr),
        }),
        Err(errors) => {
            let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            Err(format!(
                "Failed to parse source text \"{}\": {}",
                trimmed,
                details.join("; ")
            ))
        }
    }
}

/// Whether `code` is a bare number such as `5` or `(10)`.
pub fn is_numeric_literal(code: &str) -> bool {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_typescript(true).with_module(true);
    match Parser::new(&allocator, code.trim(), source_type).parse_expression() {
        Ok(expr) => matches!(expr.without_parentheses(), Expression::NumericLiteral(_)),
        Err(_) => false,
    }
}

fn classify(expr: &Expression) -> Precedence {
    match expr {
        Expression::SequenceExpression(_) => Precedence::Sequence,
        Expression::AssignmentExpression(_)
        | Expression::ArrowFunctionExpression(_)
        | Expression::YieldExpression(_) => Precedence::Assignment,
        Expression::ConditionalExpression(_) => Precedence::Conditional,
        Expression::LogicalExpression(logical) => match logical.operator {
            LogicalOperator::Or => Precedence::LogicalOr,
            LogicalOperator::And => Precedence::LogicalAnd,
            LogicalOperator::Coalesce => Precedence::Coalesce,
        },
        Expression::BinaryExpression(_)
        | Expression::PrivateInExpression(_)
        | Expression::TSAsExpression(_)
        | Expression::TSSatisfiesExpression(_) => Precedence::Binary,
        Expression::UnaryExpression(_)
        | Expression::AwaitExpression(_)
        | Expression::UpdateExpression(_)
        | Expression::TSTypeAssertion(_)
        | Expression::NewExpression(_) => Precedence::Unary,
        _ => Precedence::Member,
    }
}

/// `add-todo` -> `addTodo`. Hyphens are the only thing transformed.
pub fn camelize(s: &str) -> String {
    HYPHEN_RE
        .replace_all(s, |caps: &regex::Captures| caps[1].to_uppercase())
        .to_string()
}

/// Upper-case the first character, leave the rest alone.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `editing` -> `setEditing`.
pub fn setter_name(name: &str) -> String {
    format!("set{}", capitalize(name))
}

/// Event prop for a `v-on` argument: `click` -> `onClick`.
pub fn event_prop_name(argument: &str) -> String {
    camelize(&format!("on-{}", argument))
}

pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER_RE.is_match(s)
}
