//! Structural template translation.
//!
//! Lowers the markup tree into the output tree:
//!
//! - `v-if` / `v-else-if` / `v-else` siblings become `cond && node` or a
//!   right-nested ternary, in source order.
//! - `v-for` becomes `source.map((value, key) => node)`.
//! - `<template>` containers become fragments.
//! - Bindings become props (`:x` -> `x`, `@x` -> `onX`, `v-model` -> value
//!   plus `onUpdate:` callback).
//!
//! Any construct that cannot be lowered faithfully aborts the whole
//! translation with a [`CompilerError`]; there is no partial output.

use tracing::{debug, trace};

use crate::diagnostics::{
    CompilerError, ERR_INVALID_EXPRESSION, ERR_MALFORMED_FOR, ERR_OBJECT_ITERATION,
    ERR_ORPHAN_BRANCH, ERR_RANGE_ITERATION, ERR_UNSUPPORTED_NODE,
};
use crate::directives::{
    classify_props, find_chain_continuation, find_conditional, find_loop, ClassifiedProp,
    ControlFlow,
};
use crate::expression::{
    camelize, event_prop_name, is_identifier, is_numeric_literal, parse_snippet, Snippet,
};
use crate::ir::{
    ArrowBody, Directive, ElementKind, ElementNode, Expr, JsxElement, JsxFragment, JsxNode,
    JsxProp, MarkupNode, PropValue,
};

/// Placeholder parameter used when a loop binds a key but no value.
const VALUE_PLACEHOLDER: &str = "_value";
const DEFAULT_MODEL_PROP: &str = "modelValue";

/// Translate root-level markup into a single output node.
///
/// One resulting node is returned as-is; anything else is wrapped in a
/// fragment.
pub fn translate_template(nodes: &[MarkupNode]) -> Result<JsxNode, CompilerError> {
    let mut children = translate_children(nodes)?;
    if children.len() == 1 {
        if let Some(only) = children.pop() {
            return Ok(only);
        }
    }
    Ok(JsxNode::Fragment(JsxFragment { children }))
}

struct Branch<'n> {
    flow: ControlFlow,
    element: &'n ElementNode,
    directive: &'n Directive,
}

/// Translate a sibling list, folding conditional chains as they are met.
fn translate_children(children: &[MarkupNode]) -> Result<Vec<JsxNode>, CompilerError> {
    let mut out = Vec::with_capacity(children.len());
    let mut i = 0;

    while i < children.len() {
        let child = &children[i];
        let MarkupNode::Element(element) = child else {
            out.push(translate_node(child)?);
            i += 1;
            continue;
        };

        let Some((flow, directive)) = find_conditional(element) else {
            out.push(translate_element(element, false)?);
            i += 1;
            continue;
        };

        if flow != ControlFlow::If {
            return Err(CompilerError::at_node(
                ERR_ORPHAN_BRANCH,
                &format!("v-{} should be a sibling of v-if", directive.name),
                &element.location,
                &element.source,
            ));
        }

        let mut branches = vec![Branch {
            flow,
            element,
            directive,
        }];
        i += 1;

        // Comments and blank text between branches are dropped with the chain.
        while let Some(next) = next_chain_member(children, i) {
            let (index, element, flow, directive) = next;
            branches.push(Branch {
                flow,
                element,
                directive,
            });
            i = index + 1;
        }

        out.push(translate_if_chain(&branches)?);
    }

    Ok(out)
}

/// Index and element of the next `v-else-if`/`v-else` sibling at or after
/// `from`, skipping comments and whitespace-only text.
fn next_chain_member(
    children: &[MarkupNode],
    from: usize,
) -> Option<(usize, &ElementNode, ControlFlow, &Directive)> {
    for (index, node) in children.iter().enumerate().skip(from) {
        match node {
            MarkupNode::Comment(_) => continue,
            MarkupNode::Text(text) if text.content.trim().is_empty() => continue,
            MarkupNode::Element(element) => {
                return find_chain_continuation(element)
                    .map(|(flow, directive)| (index, element, flow, directive));
            }
            _ => return None,
        }
    }
    None
}

fn translate_node(node: &MarkupNode) -> Result<JsxNode, CompilerError> {
    match node {
        MarkupNode::Element(element) => translate_element(element, false),
        MarkupNode::Text(text) => Ok(JsxNode::Text(text.content.clone())),
        MarkupNode::Comment(comment) => Ok(JsxNode::Expression(Expr::CommentPlaceholder(
            comment.content.clone(),
        ))),
        other => Err(CompilerError::at_node(
            ERR_UNSUPPORTED_NODE,
            &format!(
                "Unsupported node kind {} ({})",
                other.kind_name(),
                other.source()
            ),
            other.location(),
            other.source(),
        )),
    }
}

/// Lower one element. `skip_for` is set while lowering a loop body so the
/// `v-for` on the same element is not detected again.
fn translate_element(element: &ElementNode, skip_for: bool) -> Result<JsxNode, CompilerError> {
    if !skip_for {
        if let Some(directive) = find_loop(element) {
            return translate_for(element, directive);
        }
    }

    let props = translate_props(element)?;
    let children = translate_children(&element.children)?;

    if element.kind == ElementKind::Container {
        return Ok(JsxNode::Fragment(JsxFragment { children }));
    }

    Ok(JsxNode::Element(JsxElement {
        tag: element.tag.clone(),
        props,
        children,
    }))
}

fn translate_if_chain(branches: &[Branch<'_>]) -> Result<JsxNode, CompilerError> {
    let Some((last, leading)) = branches.split_last() else {
        return Err(CompilerError::new(
            ERR_ORPHAN_BRANCH,
            "Conditional chain has no branches",
            "",
            0,
            0,
        ));
    };

    if leading.is_empty() {
        // {cond && <div>...</div>}
        let test = branch_condition(last)?;
        let body = translate_element(last.element, false)?.into_expr();
        return Ok(JsxNode::Expression(Expr::LogicalAnd {
            left: Box::new(Expr::Snippet(test)),
            right: Box::new(body),
        }));
    }

    if last.flow != ControlFlow::Else {
        // No fallback arm exists; the last guard is dropped like every other
        // chain's default arm.
        debug!(
            "conditional chain ends in v-{}; its guard is not applied",
            last.directive.name
        );
    }

    // a ? b : c ? d : e
    let mut acc = translate_element(last.element, false)?.into_expr();
    for branch in leading.iter().rev() {
        let test = branch_condition(branch)?;
        let consequent = translate_element(branch.element, false)?.into_expr();
        acc = Expr::Conditional {
            test: Box::new(Expr::Snippet(test)),
            consequent: Box::new(consequent),
            alternate: Box::new(acc),
        };
    }
    trace!("lowered conditional chain of {} branches", branches.len());

    Ok(JsxNode::Expression(acc))
}

fn branch_condition(branch: &Branch<'_>) -> Result<Snippet, CompilerError> {
    directive_snippet(branch.directive, branch.directive.expression.as_deref())
}

fn translate_for(element: &ElementNode, directive: &Directive) -> Result<JsxNode, CompilerError> {
    let Some(binding) = &directive.for_binding else {
        return Err(CompilerError::at_node(
            ERR_MALFORMED_FOR,
            "v-for has no parsed binding",
            &directive.location,
            &directive.source,
        ));
    };

    if binding.index_name.is_some() {
        return Err(CompilerError::at_node(
            ERR_OBJECT_ITERATION,
            "object iteration is not supported",
            &directive.location,
            &directive.source,
        )
        .with_hint("Iterate `Object.entries(source)` with `([key, value], index) in ...` instead."));
    }

    let mut params = Vec::new();
    if binding.value_name.is_some() || binding.key_name.is_some() {
        params.push(
            binding
                .value_name
                .clone()
                .unwrap_or_else(|| VALUE_PLACEHOLDER.to_string()),
        );
    }
    if let Some(key) = &binding.key_name {
        params.push(key.clone());
    }

    let source = directive_snippet(directive, Some(&binding.source_expr))?;
    if is_numeric_literal(&source.code) {
        return Err(CompilerError::at_node(
            ERR_RANGE_ITERATION,
            "range iteration is not supported",
            &directive.location,
            &directive.source,
        )
        .with_hint("Iterate an array such as `Array.from({ length: n }, (_, i) => i + 1)` instead."));
    }
    let body = translate_element(element, true)?.into_expr();
    trace!("lowered v-for over `{}` with {} params", source.code, params.len());

    // {source.map((value, key) => <div>...</div>)}
    Ok(JsxNode::Expression(Expr::Call {
        callee: Box::new(Expr::Member {
            object: Box::new(Expr::Snippet(source)),
            property: "map".to_string(),
        }),
        arguments: vec![Expr::Arrow {
            params,
            body: ArrowBody::Expression(Box::new(body)),
        }],
    }))
}

fn translate_props(element: &ElementNode) -> Result<Vec<JsxProp>, CompilerError> {
    let mut props = Vec::new();

    for prop in classify_props(&element.props)? {
        match prop {
            ClassifiedProp::Plain(attr) => props.push(JsxProp {
                name: attr.name.clone(),
                value: attr.value.clone().map(PropValue::Literal),
            }),
            ClassifiedProp::Bind {
                argument,
                directive,
            } => {
                // `:id` alone is the same-name shorthand for `:id="id"`.
                let code = directive
                    .expression
                    .clone()
                    .unwrap_or_else(|| camelize(argument));
                let value = directive_snippet(directive, Some(&code))?;
                props.push(JsxProp {
                    name: argument.to_string(),
                    value: Some(PropValue::Expression(Expr::Snippet(value))),
                });
            }
            ClassifiedProp::On {
                argument,
                directive,
            } => {
                let handler = directive_snippet(directive, directive.expression.as_deref())?;
                props.push(JsxProp {
                    name: event_prop_name(argument),
                    value: Some(PropValue::Expression(Expr::Snippet(handler))),
                });
            }
            ClassifiedProp::Model(directive) => {
                props.extend(translate_model(directive)?);
            }
            ClassifiedProp::Show(directive) => {
                debug!(
                    "v-show is not lowered; dropping `{}` on <{}>",
                    directive.source, element.tag
                );
            }
            ClassifiedProp::ControlFlow(..) => {}
        }
    }

    Ok(props)
}

/// `v-model:name="exp"` -> `name={exp}` and `onUpdate:name={(name) => { exp = name }}`.
fn translate_model(directive: &Directive) -> Result<[JsxProp; 2], CompilerError> {
    let name = directive
        .argument
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL_PROP.to_string());
    let value = directive_snippet(directive, directive.expression.as_deref())?;

    let mut param = camelize(&name);
    if !is_identifier(&param) {
        param = "value".to_string();
    }
    if mentions_identifier(&value.code, &param) {
        param = format!("_{}", param);
    }

    // The bound expression must be assignable.
    directive_snippet(directive, Some(&format!("{} = {}", value.code, param)))?;

    let handler = Expr::Arrow {
        params: vec![param.clone()],
        body: ArrowBody::Block(vec![Expr::Assign {
            target: value.clone(),
            value: Box::new(Expr::Identifier(param)),
        }]),
    };

    Ok([
        JsxProp {
            name: name.clone(),
            value: Some(PropValue::Expression(Expr::Snippet(value))),
        },
        JsxProp {
            name: camelize(&format!("onUpdate:{}", name)),
            value: Some(PropValue::Expression(handler)),
        },
    ])
}

fn mentions_identifier(code: &str, name: &str) -> bool {
    code.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .any(|word| word == name)
}

fn directive_snippet(directive: &Directive, code: Option<&str>) -> Result<Snippet, CompilerError> {
    let code = code.unwrap_or("");
    parse_snippet(code).map_err(|message| {
        CompilerError::at_node(
            ERR_INVALID_EXPRESSION,
            &message,
            &directive.location,
            &directive.source,
        )
    })
}
