//! # Vue to React component migration
//!
//! Two source-to-source passes:
//!
//! 1. **Template translation**: a Vue template is parsed into a markup tree
//!    (`parse`), its props classified (`directives`), and lowered into a JSX
//!    tree (`template`) that `render` prints as compact JSX text.
//!    - `v-if` / `v-else-if` / `v-else` become `&&` or nested ternaries.
//!    - `v-for` becomes `.map((value, key) => ...)`.
//!    - Unsupported constructs abort with a [`CompilerError`], never with
//!      partial output.
//!
//! 2. **Reactive-variable rewrite** (`refs`): `const x = ref(v)` becomes
//!    `const [x, setX] = useState(v)`, with `x.value` reads and writes
//!    rewritten through resolved symbols (`resolver`). Edits are span based
//!    (`patch`), so comments and formatting survive, and the hook import is
//!    added once per file (`imports`).
//!
//! `component` ties both together for a single-file component and
//! `discovery` runs it over a directory tree.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod component;
mod diagnostics;
mod directives;
mod discovery;
mod expression;
mod imports;
mod ir;
mod parse;
mod patch;
mod refs;
mod render;
mod resolver;
mod template;

#[cfg(test)]
mod imports_tests;
#[cfg(test)]
mod parse_tests;
#[cfg(test)]
mod refs_tests;

pub use component::{migrate_component, migrate_script, migrate_template, MigrateOptions, MigrationOutput};
pub use diagnostics::*;
pub use directives::{classify_props, ClassifiedProp, ControlFlow};
pub use discovery::{find_component_files, migrate_directory, FileMigration};
pub use expression::{camelize, parse_snippet, setter_name, Precedence, Snippet};
pub use imports::{ensure_named_import, RequiredImports};
pub use ir::*;
pub use parse::{parse_for_expression, parse_template, split_sfc, ScriptBlock, SfcBlocks};
pub use patch::SourcePatch;
pub use refs::{rewrite_reactive_declarations, rewrite_script, RewrittenDeclaration};
pub use render::{render, render_expression};
pub use resolver::{ImportedBinding, SemanticResolver, SymbolResolver};
pub use template::translate_template;

// ═══════════════════════════════════════════════════════════════════════════════
// NODE BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn to_napi_error(err: CompilerError) -> napi::Error {
    let payload = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
    napi::Error::from_reason(payload)
}

/// Migrate a single-file component. `options_json` is a JSON-encoded
/// [`MigrateOptions`]; missing fields take their defaults.
#[cfg(feature = "napi")]
#[napi]
pub fn migrate_component_native(
    source: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let options: MigrateOptions = match options_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| napi::Error::from_reason(format!("Invalid options: {}", e)))?,
        None => MigrateOptions::default(),
    };

    let output = migrate_component(&source, &options).map_err(to_napi_error)?;
    serde_json::to_value(output).map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Translate template markup into JSX text.
#[cfg(feature = "napi")]
#[napi]
pub fn translate_template_native(template: String, file_path: Option<String>) -> napi::Result<String> {
    let options = MigrateOptions {
        file_path: file_path.unwrap_or_default(),
        ..Default::default()
    };
    migrate_template(&template, &options).map_err(to_napi_error)
}
