//! Parse Module
//!
//! Turns template text into the markup tree and splits single-file components
//! into their template and script blocks. Tag and attribute names keep their
//! casing because directive arguments (`v-model:modelValue`) are
//! case-sensitive.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::diagnostics::{line_column, CompilerError, ERR_MALFORMED_FOR, ERR_TEMPLATE_SYNTAX};
use crate::ir::{
    CommentNode, Directive, ElementKind, ElementNode, ForBinding, InterpolationNode, MarkupNode,
    Prop, SourceLocation, StaticAttribute, TextNode,
};

lazy_static! {
    static ref VOID_TAGS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("area");
        s.insert("base");
        s.insert("br");
        s.insert("col");
        s.insert("embed");
        s.insert("hr");
        s.insert("img");
        s.insert("input");
        s.insert("link");
        s.insert("meta");
        s.insert("source");
        s.insert("track");
        s.insert("wbr");
        s
    };

    /// Attributes with one of these prefixes are directives.
    static ref DIRECTIVE_PREFIX_RE: Regex = Regex::new(r"^(v-[A-Za-z0-9-]|:|\.|@|#)").unwrap();

    /// `v-name:arg.mod`, `:arg`, `.arg`, `@arg`, `#arg`
    static ref DIRECTIVE_RE: Regex =
        Regex::new(r"(?i)^(?:v-([a-z0-9-]+))?(?:(?::|^\.|^@|^#)(\[[^\]]+\]|[^\.]+))?(.+)?$").unwrap();

    static ref FOR_ALIAS_RE: Regex = Regex::new(r"^([\s\S]*?)\s+(?:in|of)\s+(\S[\s\S]*)$").unwrap();
    static ref FOR_ITERATOR_RE: Regex = Regex::new(r",([^,\}\]]*)(?:,([^,\}\]]*))?$").unwrap();
    static ref WHITESPACE_RUN_RE: Regex = Regex::new(r"[\t\r\n\x0C ]+").unwrap();

    static ref TEMPLATE_TAG_RE: Regex = Regex::new(r"(?i)<(/?)template\b[^>]*>").unwrap();
    static ref SCRIPT_REGEX: Regex = Regex::new(r"(?is)<script\b([^>]*)>([\s\S]*?)</script>").unwrap();
    static ref ATTR_REGEX: Regex = Regex::new(r#"(?i)([a-z0-9-]+)(?:=(?:"([^"]*)"|'([^']*)'|([^>\s]+)))?"#).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE PARSER
// ═══════════════════════════════════════════════════════════════════════════════

struct TemplateParser<'s> {
    src: &'s str,
    pos: usize,
    file: &'s str,
}

impl<'s> TemplateParser<'s> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn location_at(&self, offset: usize) -> SourceLocation {
        let (line, column) = line_column(self.src, offset);
        SourceLocation { line, column }
    }

    fn error_at(&self, offset: usize, message: &str) -> CompilerError {
        let (line, column) = line_column(self.src, offset);
        let context: String = self.src[offset..].chars().take(40).collect();
        CompilerError::with_details(
            ERR_TEMPLATE_SYNTAX,
            message,
            self.file,
            line,
            column,
            Some(context),
            vec![],
        )
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Read while `keep` holds, returning the consumed slice.
    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !keep(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    fn at_tag_open(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    fn parse_children(&mut self, parent: Option<(&str, usize)>) -> Result<Vec<MarkupNode>, CompilerError> {
        let mut nodes = Vec::new();

        loop {
            if self.eof() {
                if let Some((tag, start)) = parent {
                    return Err(self.error_at(start, &format!("Element <{}> is missing its end tag", tag)));
                }
                break;
            }

            if self.rest().starts_with("</") {
                let start = self.pos;
                self.pos += 2;
                let name = self.read_while(|c| !c.is_whitespace() && c != '>');
                self.skip_whitespace();
                if self.peek() == Some('>') {
                    self.pos += 1;
                }
                match parent {
                    Some((tag, _)) if tag == name => return Ok(nodes),
                    Some((tag, _)) => {
                        return Err(self.error_at(
                            start,
                            &format!("Unexpected end tag </{}> while <{}> is open", name, tag),
                        ))
                    }
                    None => {
                        return Err(self.error_at(start, &format!("Unexpected end tag </{}>", name)))
                    }
                }
            }

            if self.rest().starts_with("<!--") {
                nodes.push(self.parse_comment()?);
            } else if self.at_tag_open() {
                nodes.push(self.parse_element()?);
            } else if self.rest().starts_with("{{") {
                nodes.push(self.parse_interpolation()?);
            } else {
                nodes.push(self.parse_text());
            }
        }

        Ok(nodes)
    }

    fn parse_comment(&mut self) -> Result<MarkupNode, CompilerError> {
        let start = self.pos;
        let body_start = start + 4;
        let Some(len) = self.src[body_start..].find("-->") else {
            return Err(self.error_at(start, "Comment is not closed"));
        };
        self.pos = body_start + len + 3;
        Ok(MarkupNode::Comment(CommentNode {
            content: self.src[body_start..body_start + len].to_string(),
            location: self.location_at(start),
            source: self.src[start..self.pos].to_string(),
        }))
    }

    fn parse_interpolation(&mut self) -> Result<MarkupNode, CompilerError> {
        let start = self.pos;
        let body_start = start + 2;
        let Some(len) = self.src[body_start..].find("}}") else {
            return Err(self.error_at(start, "Interpolation is not closed"));
        };
        self.pos = body_start + len + 2;
        Ok(MarkupNode::Interpolation(InterpolationNode {
            expression: self.src[body_start..body_start + len].trim().to_string(),
            location: self.location_at(start),
            source: self.src[start..self.pos].to_string(),
        }))
    }

    fn parse_text(&mut self) -> MarkupNode {
        let start = self.pos;
        // Always consume at least one char so a stray `<` cannot stall the loop.
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
        while !self.eof() {
            let rest = self.rest();
            if rest.starts_with("</")
                || rest.starts_with("<!--")
                || rest.starts_with("{{")
                || self.at_tag_open()
            {
                break;
            }
            if let Some(c) = self.peek() {
                self.pos += c.len_utf8();
            }
        }
        let text = &self.src[start..self.pos];
        MarkupNode::Text(TextNode {
            content: text.to_string(),
            location: self.location_at(start),
            source: text.to_string(),
        })
    }

    fn parse_element(&mut self) -> Result<MarkupNode, CompilerError> {
        let start = self.pos;
        self.pos += 1;
        let tag = self
            .read_while(|c| !c.is_whitespace() && c != '/' && c != '>')
            .to_string();

        let mut props = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error_at(start, &format!("Start tag <{}> is not closed", tag)));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            props.push(self.parse_attribute()?);
        }

        let is_void = VOID_TAGS.contains(tag.to_ascii_lowercase().as_str());
        let children = if self_closing || is_void {
            Vec::new()
        } else {
            let parsed = self.parse_children(Some((tag.as_str(), start)))?;
            if tag == "pre" {
                parsed
            } else {
                condense_whitespace(parsed)
            }
        };

        let is_container = tag == "template"
            && props.iter().any(|p| {
                matches!(p, Prop::Directive(d)
                    if matches!(d.name.as_str(), "if" | "else-if" | "else" | "for" | "slot"))
            });

        Ok(MarkupNode::Element(ElementNode {
            tag,
            kind: if is_container {
                ElementKind::Container
            } else {
                ElementKind::Ordinary
            },
            props,
            children,
            location: self.location_at(start),
            source: self.src[start..self.pos].to_string(),
        }))
    }

    fn parse_attribute(&mut self) -> Result<Prop, CompilerError> {
        let start = self.pos;
        let name = self
            .read_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
            .to_string();
        if name.is_empty() {
            return Err(self.error_at(start, "Expected an attribute name"));
        }

        let save = self.pos;
        self.skip_whitespace();
        let mut value = None;
        if self.peek() == Some('=') {
            self.pos += 1;
            self.skip_whitespace();
            value = Some(self.parse_attribute_value(start)?);
        } else {
            self.pos = save;
        }

        let location = self.location_at(start);
        let source = self.src[start..self.pos].to_string();

        if DIRECTIVE_PREFIX_RE.is_match(&name) {
            parse_directive(&name, value, location, source, self.file).map(Prop::Directive)
        } else {
            Ok(Prop::Attribute(StaticAttribute {
                name,
                value,
                location,
            }))
        }
    }

    fn parse_attribute_value(&mut self, attr_start: usize) -> Result<String, CompilerError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let body_start = self.pos + 1;
                let Some(len) = self.src[body_start..].find(quote) else {
                    return Err(self.error_at(attr_start, "Attribute value is not closed"));
                };
                self.pos = body_start + len + 1;
                Ok(self.src[body_start..body_start + len].to_string())
            }
            _ => Ok(self
                .read_while(|c| !c.is_whitespace() && c != '>')
                .to_string()),
        }
    }
}

/// Drop or collapse whitespace the way the template compiler does by default.
fn condense_whitespace(nodes: Vec<MarkupNode>) -> Vec<MarkupNode> {
    let is_comment = |n: Option<&MarkupNode>| matches!(n, Some(MarkupNode::Comment(_)));
    let is_element = |n: Option<&MarkupNode>| matches!(n, Some(MarkupNode::Element(_)));

    let mut keep = vec![true; nodes.len()];
    let mut condensed: Vec<Option<String>> = vec![None; nodes.len()];

    for (i, node) in nodes.iter().enumerate() {
        let MarkupNode::Text(text) = node else {
            continue;
        };
        let prev = if i == 0 { None } else { nodes.get(i - 1) };
        let next = nodes.get(i + 1);

        if text.content.trim().is_empty() {
            let has_newline = text.content.contains('\n') || text.content.contains('\r');
            let removable = prev.is_none()
                || next.is_none()
                || (is_comment(prev) && is_comment(next))
                || (is_comment(prev) && is_element(next))
                || (is_element(prev) && is_comment(next))
                || (is_element(prev) && is_element(next) && has_newline);
            if removable {
                keep[i] = false;
            } else {
                condensed[i] = Some(" ".to_string());
            }
        } else {
            condensed[i] = Some(WHITESPACE_RUN_RE.replace_all(&text.content, " ").to_string());
        }
    }

    nodes
        .into_iter()
        .zip(keep)
        .zip(condensed)
        .filter_map(|((node, keep), condensed)| {
            if !keep {
                return None;
            }
            match (node, condensed) {
                (MarkupNode::Text(mut text), Some(content)) => {
                    text.content = content;
                    Some(MarkupNode::Text(text))
                }
                (node, _) => Some(node),
            }
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIRECTIVES
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_directive(
    raw_name: &str,
    expression: Option<String>,
    location: SourceLocation,
    source: String,
    file: &str,
) -> Result<Directive, CompilerError> {
    let caps = DIRECTIVE_RE.captures(raw_name);

    let explicit_name = caps.as_ref().and_then(|c| c.get(1)).map(|m| m.as_str().to_string());
    let name = explicit_name.unwrap_or_else(|| {
        if raw_name.starts_with(':') || raw_name.starts_with('.') {
            "bind".to_string()
        } else if raw_name.starts_with('@') {
            "on".to_string()
        } else {
            "slot".to_string()
        }
    });

    let mut argument = caps
        .as_ref()
        .and_then(|c| c.get(2))
        .map(|m| m.as_str().to_string());
    let mut dynamic_argument = false;
    if let Some(arg) = &argument {
        if arg.starts_with('[') && arg.ends_with(']') && arg.len() >= 2 {
            dynamic_argument = true;
            argument = Some(arg[1..arg.len() - 1].to_string());
        }
    }

    let mut modifiers: Vec<String> = caps
        .as_ref()
        .and_then(|c| c.get(3))
        .map(|m| {
            m.as_str()
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if raw_name.starts_with('.') {
        modifiers.insert(0, "prop".to_string());
    }

    let for_binding = if name == "for" {
        let exp = expression.as_deref().unwrap_or("");
        match parse_for_expression(exp) {
            Some(binding) => Some(binding),
            None => {
                return Err(CompilerError::with_details(
                    ERR_MALFORMED_FOR,
                    &format!("v-for has invalid expression \"{}\"", exp),
                    file,
                    location.line,
                    location.column,
                    Some(source),
                    vec!["Use `item in items` or `(item, index) in items`.".to_string()],
                ))
            }
        }
    } else {
        None
    };

    Ok(Directive {
        name,
        argument,
        dynamic_argument,
        expression,
        modifiers,
        for_binding,
        location,
        source,
    })
}

/// Split `(value, key, index) in source` into its parts.
pub fn parse_for_expression(exp: &str) -> Option<ForBinding> {
    let caps = FOR_ALIAS_RE.captures(exp.trim())?;
    let lhs = caps.get(1)?.as_str().trim();
    let source_expr = caps.get(2)?.as_str().trim().to_string();

    let lhs = lhs.strip_prefix('(').unwrap_or(lhs);
    let lhs = lhs.strip_suffix(')').unwrap_or(lhs).trim();

    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    let (value_name, key_name, index_name) = match FOR_ITERATOR_RE.captures(lhs) {
        Some(iter) => {
            let value = FOR_ITERATOR_RE.replace(lhs, "");
            (
                non_empty(value.as_ref()),
                iter.get(1).and_then(|m| non_empty(m.as_str())),
                iter.get(2).and_then(|m| non_empty(m.as_str())),
            )
        }
        None => (non_empty(lhs), None, None),
    };

    Some(ForBinding {
        source_expr,
        value_name,
        key_name,
        index_name,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN PARSING FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse template markup into root-level nodes.
pub fn parse_template(html: &str, file_path: &str) -> Result<Vec<MarkupNode>, CompilerError> {
    let mut parser = TemplateParser {
        src: html,
        pos: 0,
        file: file_path,
    };
    let nodes = parser.parse_children(None)?;
    Ok(condense_whitespace(nodes))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptBlock {
    pub content: String,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SfcBlocks {
    /// Inner markup of the outermost `<template>` block.
    pub template: Option<String>,
    pub script: Option<ScriptBlock>,
}

/// Split a single-file component into its template and script blocks.
pub fn split_sfc(source: &str) -> SfcBlocks {
    let mut template = None;
    let mut template_range = None;
    let mut depth = 0usize;
    let mut open_end = 0usize;
    let mut open_start = 0usize;

    for caps in TEMPLATE_TAG_RE.captures_iter(source) {
        let Some(m) = caps.get(0) else { continue };
        let closing = caps.get(1).is_some_and(|c| !c.as_str().is_empty());
        if !closing {
            if depth == 0 {
                open_start = m.start();
                open_end = m.end();
            }
            depth += 1;
        } else if depth > 0 {
            depth -= 1;
            if depth == 0 {
                template = Some(source[open_end..m.start()].to_string());
                template_range = Some(open_start..m.end());
                break;
            }
        }
    }

    // Scripts inside the template block are markup, not component code.
    let outside_template = match &template_range {
        Some(range) => format!("{}{}", &source[..range.start], &source[range.end..]),
        None => source.to_string(),
    };

    SfcBlocks {
        template,
        script: parse_script(&outside_template),
    }
}

/// Collect `<script>` blocks, joining their bodies.
pub fn parse_script(html: &str) -> Option<ScriptBlock> {
    let mut scripts = Vec::new();
    let mut attributes = HashMap::new();

    for caps in SCRIPT_REGEX.captures_iter(html) {
        let attr_string = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let content = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        for attr_caps in ATTR_REGEX.captures_iter(attr_string) {
            if let Some(name) = attr_caps.get(1) {
                let value = attr_caps
                    .get(2)
                    .or_else(|| attr_caps.get(3))
                    .or_else(|| attr_caps.get(4))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "true".to_string());
                attributes.insert(name.as_str().to_string(), value);
            }
        }

        if !content.trim().is_empty() {
            scripts.push(content.trim().to_string());
        }
    }

    if scripts.is_empty() {
        return None;
    }

    Some(ScriptBlock {
        content: scripts.join("\n\n"),
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_for_expression_value_only() {
        let binding = parse_for_expression("todo in todos").unwrap();
        assert_eq!(binding.source_expr, "todos");
        assert_eq!(binding.value_name.as_deref(), Some("todo"));
        assert_eq!(binding.key_name, None);
        assert_eq!(binding.index_name, None);
    }

    #[test]
    fn test_parse_for_expression_value_and_key() {
        let binding = parse_for_expression("(todo, index) of filteredTodos.value").unwrap();
        assert_eq!(binding.source_expr, "filteredTodos.value");
        assert_eq!(binding.value_name.as_deref(), Some("todo"));
        assert_eq!(binding.key_name.as_deref(), Some("index"));
    }

    #[test]
    fn test_parse_for_expression_object_entry() {
        let binding = parse_for_expression("(value, key, index) in object").unwrap();
        assert_eq!(binding.index_name.as_deref(), Some("index"));
    }

    #[test]
    fn test_parse_for_expression_key_without_value() {
        let binding = parse_for_expression("(, i) in list").unwrap();
        assert_eq!(binding.value_name, None);
        assert_eq!(binding.key_name.as_deref(), Some("i"));
    }

    #[test]
    fn test_parse_for_expression_destructured_value() {
        let binding = parse_for_expression("({ id, name }, i) in rows").unwrap();
        assert_eq!(binding.value_name.as_deref(), Some("{ id, name }"));
        assert_eq!(binding.key_name.as_deref(), Some("i"));
    }

    #[test]
    fn test_parse_for_expression_malformed() {
        assert!(parse_for_expression("todos").is_none());
    }

    #[test]
    fn test_parse_script() {
        let html = r#"<script setup lang="ts">const x = 1;</script>"#;
        let script = parse_script(html).unwrap();
        assert!(script.content.contains("const x = 1"));
        assert_eq!(script.attributes.get("setup"), Some(&"true".to_string()));
        assert_eq!(script.attributes.get("lang"), Some(&"ts".to_string()));
    }
}
