//! Symbol resolution over a parsed program.
//!
//! Identity is decided by resolved symbols, never by spelling: an aliased
//! import is found under its local name and a shadowing local of the same
//! name never matches.

use oxc_ast::ast::{
    BindingIdentifier, IdentifierReference, ImportDeclarationSpecifier, ModuleExportName,
    Program, Statement,
};
use oxc_ast_visit::{walk, Visit};
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::{GetSpan, Span};
use oxc_syntax::symbol::SymbolId;
use tracing::trace;

use crate::diagnostics::{CompilerError, ERR_DEFAULT_IMPORT};

/// The local binding an import introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedBinding {
    pub symbol_id: SymbolId,
    /// Name in this file (`r` for `import { ref as r }`).
    pub local_name: String,
}

/// Resolution queries the rewriter depends on.
pub trait SymbolResolver {
    /// Local binding of `name` imported from `module`, if any.
    fn find_imported_binding(
        &self,
        module: &str,
        name: &str,
    ) -> Result<Option<ImportedBinding>, CompilerError>;

    fn symbol_of_reference(&self, ident: &IdentifierReference<'_>) -> Option<SymbolId>;

    fn symbol_of_binding(&self, ident: &BindingIdentifier<'_>) -> Option<SymbolId>;

    /// Spans of every identifier reference resolving to `symbol`.
    fn find_references(&self, symbol: SymbolId) -> Vec<Span>;

    fn resolves_to(&self, ident: &IdentifierReference<'_>, symbol: SymbolId) -> bool {
        self.symbol_of_reference(ident) == Some(symbol)
    }
}

pub struct SemanticResolver<'p, 'a> {
    program: &'p Program<'a>,
    scoping: Scoping,
}

impl<'p, 'a> SemanticResolver<'p, 'a> {
    pub fn new(program: &'p Program<'a>) -> Self {
        // Semantic errors (redeclarations and the like) do not affect lookups.
        let scoping = SemanticBuilder::new().build(program).semantic.into_scoping();
        Self { program, scoping }
    }
}

impl SymbolResolver for SemanticResolver<'_, '_> {
    fn find_imported_binding(
        &self,
        module: &str,
        name: &str,
    ) -> Result<Option<ImportedBinding>, CompilerError> {
        if name == "default" {
            return Err(CompilerError::new(
                ERR_DEFAULT_IMPORT,
                "tracking a default import is not implemented",
                "",
                0,
                0,
            ));
        }

        // Last matching declaration wins.
        for stmt in self.program.body.iter().rev() {
            let Statement::ImportDeclaration(decl) = stmt else {
                continue;
            };
            if decl.source.value.as_str() != module || decl.import_kind.is_type() {
                continue;
            }
            let Some(specifiers) = &decl.specifiers else {
                continue;
            };

            for spec in specifiers.iter().rev() {
                let ImportDeclarationSpecifier::ImportSpecifier(spec) = spec else {
                    continue;
                };
                if spec.import_kind.is_type() || imported_name(&spec.imported) != Some(name) {
                    continue;
                }
                let Some(symbol_id) = spec.local.symbol_id.get() else {
                    continue;
                };
                trace!(
                    "resolved `{}` from \"{}\" to local `{}`",
                    name,
                    module,
                    spec.local.name
                );
                return Ok(Some(ImportedBinding {
                    symbol_id,
                    local_name: spec.local.name.to_string(),
                }));
            }
        }

        Ok(None)
    }

    fn symbol_of_reference(&self, ident: &IdentifierReference<'_>) -> Option<SymbolId> {
        let reference_id = ident.reference_id.get()?;
        self.scoping.get_reference(reference_id).symbol_id()
    }

    fn symbol_of_binding(&self, ident: &BindingIdentifier<'_>) -> Option<SymbolId> {
        ident.symbol_id.get()
    }

    fn find_references(&self, symbol: SymbolId) -> Vec<Span> {
        let mut collector = ReferenceCollector {
            resolver: self,
            symbol,
            spans: Vec::new(),
        };
        collector.visit_program(self.program);
        collector.spans
    }
}

pub(crate) fn imported_name<'n>(name: &'n ModuleExportName<'_>) -> Option<&'n str> {
    match name {
        ModuleExportName::IdentifierName(id) => Some(id.name.as_str()),
        ModuleExportName::StringLiteral(lit) => Some(lit.value.as_str()),
        _ => None,
    }
}

struct ReferenceCollector<'r, R: SymbolResolver> {
    resolver: &'r R,
    symbol: SymbolId,
    spans: Vec<Span>,
}

impl<'a, R: SymbolResolver> Visit<'a> for ReferenceCollector<'_, R> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        if self.resolver.resolves_to(ident, self.symbol) {
            self.spans.push(ident.span());
        }
        walk::walk_identifier_reference(self, ident);
    }
}
