#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use crate::ir::SourceLocation;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_UNSUPPORTED_NODE: &str = "MIG-ERR-NODE-001";
pub const ERR_ORPHAN_BRANCH: &str = "MIG-ERR-CHAIN-001";
pub const ERR_BIND_SHORTHAND: &str = "MIG-ERR-BIND-001";
pub const ERR_ON_SHORTHAND: &str = "MIG-ERR-ON-001";
pub const ERR_OBJECT_ITERATION: &str = "MIG-ERR-FOR-001";
pub const ERR_MALFORMED_FOR: &str = "MIG-ERR-FOR-002";
pub const ERR_RANGE_ITERATION: &str = "MIG-ERR-FOR-003";
pub const ERR_UNKNOWN_DIRECTIVE: &str = "MIG-ERR-DIR-001";
pub const ERR_MODIFIERS: &str = "MIG-ERR-DIR-002";
pub const ERR_DYNAMIC_BINDING: &str = "MIG-ERR-DIR-003";
pub const ERR_INVALID_EXPRESSION: &str = "MIG-ERR-EXPR-001";
pub const ERR_TEMPLATE_SYNTAX: &str = "MIG-ERR-PARSE-001";
pub const ERR_SCRIPT_SYNTAX: &str = "MIG-ERR-SCRIPT-001";
pub const ERR_CHAINED_ASSIGNMENT: &str = "MIG-ERR-SCRIPT-002";
pub const ERR_DEFAULT_IMPORT: &str = "MIG-ERR-IMPORT-001";
pub const ERR_OVERLAPPING_EDITS: &str = "MIG-ERR-PATCH-001";
pub const ERR_READ_FAILED: &str = "MIG-ERR-IO-001";

// ═══════════════════════════════════════════════════════════════════════════════
// GUARANTEES
// ═══════════════════════════════════════════════════════════════════════════════

fn get_guarantee(code: &str) -> &'static str {
    match code {
        ERR_UNSUPPORTED_NODE => "Only elements, text and comments are translated.",
        ERR_ORPHAN_BRANCH => "v-else-if and v-else directly follow a v-if sibling.",
        ERR_BIND_SHORTHAND => "Every v-bind names the attribute it binds.",
        ERR_ON_SHORTHAND => "Every v-on names the event it listens to.",
        ERR_OBJECT_ITERATION => "v-for iterates arrays with at most (value, key) aliases.",
        ERR_MALFORMED_FOR => "v-for reads `alias in source`.",
        ERR_RANGE_ITERATION => "v-for sources are arrays, never numeric ranges.",
        ERR_UNKNOWN_DIRECTIVE => "Unknown directives abort the translation instead of being dropped.",
        ERR_MODIFIERS => "Directive modifiers abort the translation instead of being dropped.",
        ERR_DYNAMIC_BINDING => "Bound attribute names are static.",
        ERR_INVALID_EXPRESSION => "Directive values are valid expressions.",
        ERR_TEMPLATE_SYNTAX => "Templates are well-formed markup.",
        ERR_SCRIPT_SYNTAX => "Scripts are valid TypeScript/JSX.",
        ERR_CHAINED_ASSIGNMENT => "A state write is a statement; its value is never read.",
        ERR_DEFAULT_IMPORT => "Only named imports are tracked.",
        ERR_OVERLAPPING_EDITS => "Source edits never overlap.",
        ERR_READ_FAILED => "Component files are readable UTF-8 text.",
        _ => "Unknown invariant.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message} ({file}:{line}:{column})")]
pub struct CompilerError {
    pub code: String,
    pub error_type: String,
    pub message: String,
    pub guarantee: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Original source text of the offending node.
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        Self::with_details(code, message, file, line, column, None, vec![])
    }

    pub fn with_details(
        code: &str,
        message: &str,
        file: &str,
        line: u32,
        column: u32,
        context: Option<String>,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: code.to_string(),
            error_type: "MIGRATION_UNSUPPORTED".to_string(),
            message: message.to_string(),
            guarantee: get_guarantee(code).to_string(),
            file: file.to_string(),
            line,
            column,
            context,
            hints,
        }
    }

    /// Error anchored at a markup node, carrying its source text.
    pub fn at_node(code: &str, message: &str, location: &SourceLocation, source: &str) -> Self {
        Self::with_details(
            code,
            message,
            "",
            location.line,
            location.column,
            Some(source.to_string()),
            vec![],
        )
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hints.push(hint.to_string());
        self
    }

    pub fn in_file(mut self, file: &str) -> Self {
        if self.file.is_empty() {
            self.file = file.to_string();
        }
        self
    }
}

/// Line and column (both 1-based) of a byte offset.
pub fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32 + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() as u32 + 1,
        None => before.chars().count() as u32 + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column() {
        let src = "ab\ncd\nef";
        assert_eq!(line_column(src, 0), (1, 1));
        assert_eq!(line_column(src, 4), (2, 2));
        assert_eq!(line_column(src, 6), (3, 1));
    }

    #[test]
    fn test_display_includes_code_and_position() {
        let err = CompilerError::new(ERR_ON_SHORTHAND, "v-on=\"...\" syntax is not supported", "App.vue", 3, 7);
        assert_eq!(
            err.to_string(),
            "[MIG-ERR-ON-001] v-on=\"...\" syntax is not supported (App.vue:3:7)"
        );
        assert_eq!(err.guarantee, "Every v-on names the event it listens to.");
    }

    #[test]
    fn test_in_file_keeps_existing_file() {
        let err = CompilerError::new(ERR_SCRIPT_SYNTAX, "bad", "a.vue", 1, 1).in_file("b.vue");
        assert_eq!(err.file, "a.vue");
        let err = CompilerError::new(ERR_SCRIPT_SYNTAX, "bad", "", 1, 1).in_file("b.vue");
        assert_eq!(err.file, "b.vue");
    }
}
