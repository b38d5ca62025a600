//! Directive classification.
//!
//! Sorts an element's props into the buckets the translator lowers, keeping
//! source order. Anything the translator cannot express faithfully is rejected
//! here so no partial output is ever produced for it.

use crate::diagnostics::{
    CompilerError, ERR_BIND_SHORTHAND, ERR_DYNAMIC_BINDING, ERR_MODIFIERS, ERR_ON_SHORTHAND,
    ERR_ORPHAN_BRANCH, ERR_UNKNOWN_DIRECTIVE,
};
use crate::ir::{Directive, ElementNode, Prop, StaticAttribute};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    If,
    ElseIf,
    Else,
    For,
}

impl ControlFlow {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(ControlFlow::If),
            "else-if" => Some(ControlFlow::ElseIf),
            "else" => Some(ControlFlow::Else),
            "for" => Some(ControlFlow::For),
            _ => None,
        }
    }

    fn is_conditional(self) -> bool {
        matches!(self, ControlFlow::If | ControlFlow::ElseIf | ControlFlow::Else)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ClassifiedProp<'n> {
    Plain(&'n StaticAttribute),
    /// `:argument="expression"`
    Bind {
        argument: &'n str,
        directive: &'n Directive,
    },
    /// `@argument="expression"`
    On {
        argument: &'n str,
        directive: &'n Directive,
    },
    /// `v-model[:argument]="expression"`
    Model(&'n Directive),
    Show(&'n Directive),
    ControlFlow(ControlFlow, &'n Directive),
}

fn reject(code: &str, message: &str, directive: &Directive) -> CompilerError {
    CompilerError::at_node(code, message, &directive.location, &directive.source)
}

/// Classify every prop of `props`, in order.
///
/// An element carries at most one of `v-if`/`v-else-if`/`v-else`.
pub fn classify_props(props: &[Prop]) -> Result<Vec<ClassifiedProp<'_>>, CompilerError> {
    let classified: Vec<ClassifiedProp<'_>> =
        props.iter().map(classify_prop).collect::<Result<_, _>>()?;

    let mut conditionals = classified.iter().filter_map(|prop| match prop {
        ClassifiedProp::ControlFlow(flow, directive) if flow.is_conditional() => Some(directive),
        _ => None,
    });
    if let (Some(first), Some(second)) = (conditionals.next(), conditionals.next()) {
        return Err(reject(
            ERR_ORPHAN_BRANCH,
            &format!(
                "v-{} and v-{} cannot be used on the same element",
                first.name, second.name
            ),
            second,
        ));
    }

    Ok(classified)
}

fn classify_prop(prop: &Prop) -> Result<ClassifiedProp<'_>, CompilerError> {
    let directive = match prop {
        Prop::Attribute(attr) => return Ok(ClassifiedProp::Plain(attr)),
        Prop::Directive(d) => d,
    };

    if let Some(flow) = ControlFlow::from_name(&directive.name) {
        return Ok(ClassifiedProp::ControlFlow(flow, directive));
    }

    if !directive.modifiers.is_empty() {
        return Err(reject(
            ERR_MODIFIERS,
            &format!(
                "Directive modifiers are not supported (.{})",
                directive.modifiers.join(".")
            ),
            directive,
        ));
    }
    if directive.dynamic_argument {
        return Err(reject(
            ERR_DYNAMIC_BINDING,
            "Dynamic directive arguments are not supported",
            directive,
        ));
    }

    match directive.name.as_str() {
        "bind" => match directive.argument.as_deref() {
            None => Err(reject(
                ERR_BIND_SHORTHAND,
                "v-bind=\"...\" syntax is not implemented",
                directive,
            )),
            Some("is") => Err(reject(
                ERR_DYNAMIC_BINDING,
                "Dynamic components (:is) are not supported",
                directive,
            )),
            Some(argument) => Ok(ClassifiedProp::Bind {
                argument,
                directive,
            }),
        },
        "on" => match directive.argument.as_deref() {
            None => Err(reject(
                ERR_ON_SHORTHAND,
                "v-on=\"...\" syntax is not supported",
                directive,
            )),
            Some(argument) => Ok(ClassifiedProp::On {
                argument,
                directive,
            }),
        },
        "model" => Ok(ClassifiedProp::Model(directive)),
        "show" => Ok(ClassifiedProp::Show(directive)),
        other => Err(reject(
            ERR_UNKNOWN_DIRECTIVE,
            &format!("Unsupported directive {}", other),
            directive,
        )
        .with_hint("Supported directives: v-bind, v-on, v-model, v-show, v-if, v-else-if, v-else, v-for.")),
    }
}

/// The conditional directive (`if`/`else-if`/`else`) governing `element`, if any.
pub fn find_conditional(element: &ElementNode) -> Option<(ControlFlow, &Directive)> {
    element
        .find_directive(&["if", "else-if", "else"])
        .and_then(|d| ControlFlow::from_name(&d.name).map(|flow| (flow, d)))
}

/// A `v-else-if`/`v-else` that may continue an open chain.
pub fn find_chain_continuation(element: &ElementNode) -> Option<(ControlFlow, &Directive)> {
    element
        .find_directive(&["else-if", "else"])
        .and_then(|d| ControlFlow::from_name(&d.name).map(|flow| (flow, d)))
}

pub fn find_loop(element: &ElementNode) -> Option<&Directive> {
    element.find_directive(&["for"])
}
