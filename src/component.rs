//! Single-file component migration.
//!
//! Splits the component, lowers its template, wraps script and markup into a
//! function component and runs the reactive-variable rewrite over the
//! result.

use std::path::Path;

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{CompilerError, ERR_SCRIPT_SYNTAX};
use crate::expression::{camelize, capitalize, is_identifier};
use crate::parse::{parse_template, split_sfc};
use crate::refs::{rewrite_script, RewrittenDeclaration};
use crate::render::render_expression;
use crate::template::translate_template;

const DEFAULT_COMPONENT_NAME: &str = "Component";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase", default)]
pub struct MigrateOptions {
    /// Module the reactive primitive is imported from.
    pub source_module: String,
    pub primitive: String,
    /// Module the state hook is imported from.
    pub target_module: String,
    pub hook: String,
    pub component_name: Option<String>,
    pub file_path: String,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        MigrateOptions {
            source_module: "vue".to_string(),
            primitive: "ref".to_string(),
            target_module: "react".to_string(),
            hook: "useState".to_string(),
            component_name: None,
            file_path: String::new(),
        }
    }
}

impl MigrateOptions {
    pub fn for_file(path: &Path) -> Self {
        MigrateOptions {
            component_name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string()),
            file_path: path.to_string_lossy().to_string(),
            ..Default::default()
        }
    }

    /// `todo-item` -> `TodoItem`; anything unusable falls back to `Component`.
    pub fn resolved_component_name(&self) -> String {
        let name = self
            .component_name
            .as_deref()
            .map(|name| capitalize(&camelize(name)))
            .unwrap_or_default();
        if is_identifier(&name) {
            name
        } else {
            DEFAULT_COMPONENT_NAME.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MigrationOutput {
    pub code: String,
    pub rewritten_declarations: Vec<RewrittenDeclaration>,
    /// `module:name` for every import that was added.
    pub added_imports: Vec<String>,
}

/// Translate template markup into compact JSX text.
pub fn migrate_template(template: &str, options: &MigrateOptions) -> Result<String, CompilerError> {
    let nodes = parse_template(template, &options.file_path)?;
    let jsx = translate_template(&nodes).map_err(|e| e.in_file(&options.file_path))?;
    Ok(render_expression(&jsx))
}

/// Rewrite the reactive declarations of a script.
pub fn migrate_script(script: &str, options: &MigrateOptions) -> Result<MigrationOutput, CompilerError> {
    rewrite_script(script, options)
}

/// Migrate a whole single-file component into a function component.
pub fn migrate_component(source: &str, options: &MigrateOptions) -> Result<MigrationOutput, CompilerError> {
    let blocks = split_sfc(source);

    let jsx = match &blocks.template {
        Some(template) if !template.trim().is_empty() => migrate_template(template, options)?,
        _ => "null".to_string(),
    };

    let script = blocks
        .script
        .as_ref()
        .map(|block| block.content.as_str())
        .unwrap_or("");
    let (imports, body) = hoist_imports(script, &options.file_path)?;

    let name = options.resolved_component_name();
    debug!("composing component {} from {}", name, options.file_path);

    let mut composed = String::new();
    if !imports.is_empty() {
        composed.push_str(&imports);
        composed.push_str("\n\n");
    }
    composed.push_str(&format!("export default function {}() {{\n", name));
    if !body.trim().is_empty() {
        composed.push_str(body.trim());
        composed.push_str("\n\n");
    }
    composed.push_str(&format!("return ({});\n}}\n", jsx));

    rewrite_script(&composed, options)
}

/// Split a script into its import declarations and everything else, both
/// kept as original text.
fn hoist_imports(script: &str, file_path: &str) -> Result<(String, String), CompilerError> {
    if script.trim().is_empty() {
        return Ok((String::new(), String::new()));
    }

    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true);
    let ret = Parser::new(&allocator, script, source_type)
        .with_options(ParseOptions {
            allow_return_outside_function: true,
            ..ParseOptions::default()
        })
        .parse();
    if !ret.errors.is_empty() {
        let details: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
        return Err(CompilerError::new(
            ERR_SCRIPT_SYNTAX,
            &format!("Failed to parse script: {}", details.join("; ")),
            file_path,
            0,
            0,
        ));
    }

    let mut imports = Vec::new();
    let mut body = String::new();
    let mut cursor = 0usize;
    for stmt in &ret.program.body {
        if let Statement::ImportDeclaration(decl) = stmt {
            let (start, end) = (decl.span.start as usize, decl.span.end as usize);
            imports.push(&script[start..end]);
            body.push_str(&script[cursor..start]);
            cursor = end;
        }
    }
    body.push_str(&script[cursor..]);

    Ok((imports.join("\n"), body))
}
