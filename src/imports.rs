//! Named-import augmentation.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use oxc_ast::ast::{ImportDeclaration, ImportDeclarationSpecifier, Program, Statement};
use tracing::debug;

use crate::patch::SourcePatch;
use crate::resolver::imported_name;

/// Imports a pass needs, applied once per file after all rewrites.
#[derive(Debug, Default, Clone)]
pub struct RequiredImports {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl RequiredImports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, module: &str, name: &str) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(name.to_string());
    }

    /// Record the import edits. Returns `module:name` for every name added.
    pub fn apply(&self, program: &Program<'_>, patch: &mut SourcePatch) -> Vec<String> {
        let mut added = Vec::new();
        for (module, names) in &self.modules {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            for name in ensure_named_import(program, patch, module, &names) {
                added.push(format!("{}:{}", module, name));
            }
        }
        added
    }
}

/// Make `names` importable from `module`, reusing an existing declaration
/// when one can take named specifiers. Returns the names that were added.
pub fn ensure_named_import(
    program: &Program<'_>,
    patch: &mut SourcePatch,
    module: &str,
    names: &[&str],
) -> Vec<String> {
    let declarations: Vec<&ImportDeclaration<'_>> = program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ImportDeclaration(decl) => Some(&**decl),
            _ => None,
        })
        .collect();

    let module_imports: Vec<&ImportDeclaration<'_>> = declarations
        .iter()
        .copied()
        .filter(|decl| decl.source.value.as_str() == module && !decl.import_kind.is_type())
        .collect();

    // Aliased specifiers do not count: `import { useState as s }` leaves
    // `useState` itself unbound.
    let mut existing: HashSet<&str> = HashSet::new();
    for decl in &module_imports {
        for spec in decl.specifiers.iter().flatten() {
            if let ImportDeclarationSpecifier::ImportSpecifier(spec) = spec {
                if !spec.import_kind.is_type()
                    && imported_name(&spec.imported) == Some(spec.local.name.as_str())
                {
                    existing.insert(spec.local.name.as_str());
                }
            }
        }
    }

    let mut missing: Vec<String> = Vec::new();
    for name in names {
        if !existing.contains(name) && !missing.iter().any(|m| m.as_str() == *name) {
            missing.push(name.to_string());
        }
    }
    if missing.is_empty() {
        return missing;
    }
    let list = missing.join(", ");

    for decl in &module_imports {
        let Some(specifiers) = &decl.specifiers else {
            continue;
        };

        let last_named = specifiers.iter().rev().find_map(|spec| match spec {
            ImportDeclarationSpecifier::ImportSpecifier(spec) => Some(spec.span.end),
            _ => None,
        });
        if let Some(end) = last_named {
            patch.insert(end, format!(", {}", list));
            debug!("extended import from \"{}\" with {}", module, list);
            return missing;
        }

        if let [ImportDeclarationSpecifier::ImportDefaultSpecifier(default)] = &specifiers[..] {
            patch.insert(default.span.end, format!(", {{ {} }}", list));
            debug!("extended default import from \"{}\" with {}", module, list);
            return missing;
        }
    }

    let statement = format!("import {{ {} }} from \"{}\";", list, module);
    match declarations.last() {
        Some(last) => patch.insert(last.span.end, format!("\n{}", statement)),
        None => patch.insert(0, format!("{}\n", statement)),
    }
    debug!("added `{}`", statement);

    missing
}
