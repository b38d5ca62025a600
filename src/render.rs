//! Compact JSX printer for the output tree.
//!
//! Formatting is left to downstream tooling: everything is emitted on one
//! line. Parentheses are only added where an operand binds weaker than its
//! position requires.

use crate::expression::Precedence;
use crate::ir::{ArrowBody, Expr, JsxElement, JsxNode, JsxProp, PropValue};

/// Render `node` in markup position (as a child of an element or fragment).
pub fn render(node: &JsxNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Render `node` in expression position, e.g. `return (<node>);`.
pub fn render_expression(node: &JsxNode) -> String {
    match node {
        JsxNode::Element(_) | JsxNode::Fragment(_) => render(node),
        JsxNode::Text(text) => string_literal(text),
        JsxNode::Expression(expr) => expr_at(expr, Precedence::Assignment),
    }
}

fn write_node(out: &mut String, node: &JsxNode) {
    match node {
        JsxNode::Element(el) => write_element(out, el),
        JsxNode::Fragment(frag) => {
            out.push_str("<>");
            for child in &frag.children {
                write_node(out, child);
            }
            out.push_str("</>");
        }
        JsxNode::Text(text) => write_text(out, text),
        JsxNode::Expression(Expr::CommentPlaceholder(content)) => {
            out.push_str("{/*");
            out.push_str(&sanitize_comment(content));
            out.push_str("*/}");
        }
        JsxNode::Expression(expr) => {
            out.push('{');
            out.push_str(&expr_at(expr, Precedence::Assignment));
            out.push('}');
        }
    }
}

fn write_element(out: &mut String, el: &JsxElement) {
    out.push('<');
    out.push_str(&el.tag);
    for prop in &el.props {
        out.push(' ');
        write_prop(out, prop);
    }

    if el.children.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &el.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn write_prop(out: &mut String, prop: &JsxProp) {
    out.push_str(&prop.name);
    match &prop.value {
        None => {}
        Some(PropValue::Literal(value)) => {
            out.push('=');
            if !value.contains('"') {
                out.push('"');
                out.push_str(value);
                out.push('"');
            } else if !value.contains('\'') {
                out.push('\'');
                out.push_str(value);
                out.push('\'');
            } else {
                out.push('{');
                out.push_str(&string_literal(value));
                out.push('}');
            }
        }
        Some(PropValue::Expression(expr)) => {
            out.push_str("={");
            out.push_str(&expr_at(expr, Precedence::Assignment));
            out.push('}');
        }
    }
}

/// JSX text cannot hold `{`, `}`, `<` or `>`; those go through string containers.
fn write_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '{' | '}' | '<' | '>' => {
                out.push_str("{\"");
                out.push(ch);
                out.push_str("\"}");
            }
            _ => out.push(ch),
        }
    }
}

fn sanitize_comment(content: &str) -> String {
    content.replace("*/", "* /")
}

fn string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.replace('"', "\\\"")))
}

/// Render `expr`, parenthesised if it binds weaker than `min`.
fn expr_at(expr: &Expr, min: Precedence) -> String {
    let (code, precedence) = render_expr(expr);
    if precedence < min {
        format!("({})", code)
    } else {
        code
    }
}

fn render_expr(expr: &Expr) -> (String, Precedence) {
    match expr {
        Expr::Snippet(snippet) => (snippet.code.clone(), snippet.precedence),
        Expr::Identifier(name) => (name.clone(), Precedence::Member),
        Expr::Member { object, property } => (
            format!("{}.{}", expr_at(object, Precedence::Member), property),
            Precedence::Member,
        ),
        Expr::Call { callee, arguments } => {
            let args: Vec<String> = arguments
                .iter()
                .map(|arg| expr_at(arg, Precedence::Assignment))
                .collect();
            (
                format!("{}({})", expr_at(callee, Precedence::Member), args.join(", ")),
                Precedence::Member,
            )
        }
        Expr::Arrow { params, body } => {
            let body = match body {
                ArrowBody::Expression(expr) => expr_at(expr, Precedence::Assignment),
                ArrowBody::Block(statements) => {
                    let statements: Vec<String> = statements
                        .iter()
                        .map(|stmt| format!("{};", expr_at(stmt, Precedence::Sequence)))
                        .collect();
                    format!("{{ {} }}", statements.join(" "))
                }
            };
            (
                format!("({}) => {}", params.join(", "), body),
                Precedence::Assignment,
            )
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => (
            format!(
                "{} ? {} : {}",
                expr_at(test, Precedence::Coalesce),
                expr_at(consequent, Precedence::Assignment),
                expr_at(alternate, Precedence::Assignment)
            ),
            Precedence::Conditional,
        ),
        Expr::LogicalAnd { left, right } => (
            format!(
                "{} && {}",
                expr_at(left, Precedence::LogicalAnd),
                expr_at(right, Precedence::Binary)
            ),
            Precedence::LogicalAnd,
        ),
        Expr::Assign { target, value } => (
            format!(
                "{} = {}",
                target.code,
                expr_at(value, Precedence::Assignment)
            ),
            Precedence::Assignment,
        ),
        Expr::Jsx(node) => (render_expression(node), Precedence::Member),
        Expr::CommentPlaceholder(content) => (
            format!("null /*{}*/", sanitize_comment(content)),
            Precedence::Member,
        ),
    }
}
