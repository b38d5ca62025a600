//! Markup and output trees.
//!
//! Markup nodes come from the template parser and are read-only input to the
//! translator. Output nodes are built fresh per translation and handed to the
//! renderer; neither tree carries identity beyond one pass.

use serde::{Deserialize, Serialize};

use crate::expression::Snippet;

// ═══════════════════════════════════════════════════════════════════════════════
// MARKUP TREE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MarkupNode {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
    Interpolation(InterpolationNode),
}

impl MarkupNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            MarkupNode::Element(_) => "element",
            MarkupNode::Text(_) => "text",
            MarkupNode::Comment(_) => "comment",
            MarkupNode::Interpolation(_) => "interpolation",
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            MarkupNode::Element(n) => &n.location,
            MarkupNode::Text(n) => &n.location,
            MarkupNode::Comment(n) => &n.location,
            MarkupNode::Interpolation(n) => &n.location,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            MarkupNode::Element(n) => &n.source,
            MarkupNode::Text(n) => &n.source,
            MarkupNode::Comment(n) => &n.source,
            MarkupNode::Interpolation(n) => &n.source,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Ordinary,
    /// `<template>` carrying a structural directive; never emitted as a tag.
    Container,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    pub kind: ElementKind,
    pub props: Vec<Prop>,
    pub children: Vec<MarkupNode>,
    #[serde(default)]
    pub location: SourceLocation,
    #[serde(default)]
    pub source: String,
}

impl ElementNode {
    /// First directive whose name is one of `names`.
    pub fn find_directive(&self, names: &[&str]) -> Option<&Directive> {
        self.props.iter().find_map(|prop| match prop {
            Prop::Directive(d) if names.contains(&d.name.as_str()) => Some(d),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Prop {
    Attribute(StaticAttribute),
    Directive(Directive),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticAttribute {
    pub name: String,
    pub value: Option<String>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    /// Directive name without the `v-` prefix (`bind`, `on`, `model`, `if`, ...).
    pub name: String,
    pub argument: Option<String>,
    /// `:[key]` style arguments.
    #[serde(default)]
    pub dynamic_argument: bool,
    pub expression: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub for_binding: Option<ForBinding>,
    #[serde(default)]
    pub location: SourceLocation,
    /// Raw attribute text, e.g. `@click.prevent="save"`.
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForBinding {
    pub source_expr: String,
    pub value_name: Option<String>,
    pub key_name: Option<String>,
    /// Present only for `(value, key, index) in object`.
    pub index_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub content: String,
    #[serde(default)]
    pub location: SourceLocation,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub content: String,
    #[serde(default)]
    pub location: SourceLocation,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationNode {
    pub expression: String,
    #[serde(default)]
    pub location: SourceLocation,
    #[serde(default)]
    pub source: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TREE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum JsxNode {
    Element(JsxElement),
    Fragment(JsxFragment),
    Text(String),
    /// An arbitrary expression in markup position (`{expr}`).
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    pub tag: String,
    pub props: Vec<JsxProp>,
    pub children: Vec<JsxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsxFragment {
    pub children: Vec<JsxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsxProp {
    pub name: String,
    pub value: Option<PropValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Literal(String),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Source text parsed by the snippet parser, kept verbatim.
    Snippet(Snippet),
    Identifier(String),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Arrow {
        params: Vec<String>,
        body: ArrowBody,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    LogicalAnd {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        target: Snippet,
        value: Box<Expr>,
    },
    /// Markup in expression position (a branch or a loop body).
    Jsx(Box<JsxNode>),
    /// Rendered as `/*content*/` inside `{}`.
    CommentPlaceholder(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expression(Box<Expr>),
    Block(Vec<Expr>),
}

impl JsxNode {
    /// View of this node as an expression, unwrapping `{expr}`.
    pub fn into_expr(self) -> Expr {
        match self {
            JsxNode::Expression(expr) => expr,
            other => Expr::Jsx(Box::new(other)),
        }
    }
}
