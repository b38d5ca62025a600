//! Reactive-variable rewriting.
//!
//! `const x = ref(v)` becomes `const [x, setX] = useState(v)`; every
//! `x.value` read becomes `x` and every `x.value = e` becomes `setX(e)`.
//! Identity goes through the resolver, so `import { ref as r }` is followed
//! and shadowed names are left alone.
//!
//! Edits are recorded against the original text, so nothing outside the
//! rewritten spans changes.

use std::collections::HashMap;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    AssignmentExpression, AssignmentOperator, AssignmentTarget, BindingPattern, Expression,
    Program, StaticMemberExpression, VariableDeclarator,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::{ParseOptions, Parser};
use oxc_span::{GetSpan, SourceType, Span};
use oxc_syntax::symbol::SymbolId;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::component::{MigrateOptions, MigrationOutput};
use crate::diagnostics::{line_column, CompilerError, ERR_CHAINED_ASSIGNMENT, ERR_SCRIPT_SYNTAX};
use crate::expression::setter_name;
use crate::imports::RequiredImports;
use crate::patch::SourcePatch;
use crate::resolver::{SemanticResolver, SymbolResolver};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RewrittenDeclaration {
    pub name: String,
    pub setter: String,
    pub line: u32,
}

/// Parse `source`, rewrite its reactive declarations and add the hook import.
pub fn rewrite_script(source: &str, options: &MigrateOptions) -> Result<MigrationOutput, CompilerError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true);
    let ret = Parser::new(&allocator, source, source_type)
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
            &options.file_path,
            0,
            0,
        ));
    }

    let program = ret.program;
    let resolver = SemanticResolver::new(&program);
    let mut patch = SourcePatch::new();
    let mut required = RequiredImports::new();

    let rewritten = rewrite_reactive_declarations(
        source,
        &program,
        &resolver,
        options,
        &mut patch,
        &mut required,
    )
    .map_err(|e| e.in_file(&options.file_path))?;

    let added_imports = required.apply(&program, &mut patch);
    let code = patch.apply(source).map_err(|e| e.in_file(&options.file_path))?;

    Ok(MigrationOutput {
        code,
        rewritten_declarations: rewritten,
        added_imports,
    })
}

/// Record the rewrite of every candidate declaration into `patch`.
///
/// Declarations with a destructuring name, or whose initializer is not a
/// direct call of the primitive, are skipped and logged. The hook import is
/// requested once if anything was rewritten.
pub fn rewrite_reactive_declarations<R: SymbolResolver>(
    source: &str,
    program: &Program<'_>,
    resolver: &R,
    options: &MigrateOptions,
    patch: &mut SourcePatch,
    required: &mut RequiredImports,
) -> Result<Vec<RewrittenDeclaration>, CompilerError> {
    let Some(primitive) = resolver.find_imported_binding(&options.source_module, &options.primitive)? else {
        trace!(
            "`{}` is not imported from \"{}\"; nothing to rewrite",
            options.primitive,
            options.source_module
        );
        return Ok(Vec::new());
    };

    let mut collector = CandidateCollector {
        resolver,
        primitive: primitive.symbol_id,
        candidates: Vec::new(),
    };
    collector.visit_program(program);
    let candidates = collector.candidates;

    for span in resolver.find_references(primitive.symbol_id) {
        if !candidates.iter().any(|c| c.callee_span == span) {
            debug!(
                "skipping `{}` at {}: not the initializer call of a plain declaration",
                primitive.local_name,
                span.start
            );
        }
    }

    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut targets = HashMap::new();
    let mut rewritten = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        let setter = setter_name(&candidate.name);
        patch.replace(
            candidate.id_span.start,
            candidate.id_span.end,
            format!("[{}, {}]", candidate.name, setter),
        );
        patch.replace(
            candidate.callee_span.start,
            candidate.callee_span.end,
            options.hook.clone(),
        );

        let (line, _) = line_column(source, candidate.id_span.start as usize);
        debug!("rewriting `{}` to [{}, {}] at line {}", candidate.name, candidate.name, setter, line);
        rewritten.push(RewrittenDeclaration {
            name: candidate.name.clone(),
            setter: setter.clone(),
            line,
        });
        targets.insert(
            candidate.symbol_id,
            Target {
                name: candidate.name.clone(),
                setter,
            },
        );
    }

    let mut sites = SiteRewriter {
        resolver,
        targets,
        patch,
        chained: None,
    };
    sites.visit_program(program);
    if let Some(span) = sites.chained {
        let (line, column) = line_column(source, span.start as usize);
        return Err(CompilerError::with_details(
            ERR_CHAINED_ASSIGNMENT,
            "the value of a state assignment cannot be reused",
            &options.file_path,
            line,
            column,
            Some(span.source_text(source).to_string()),
            vec!["Split the chained assignment into separate statements.".to_string()],
        ));
    }

    required.require(&options.target_module, &options.hook);
    Ok(rewritten)
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANDIDATES
// ═══════════════════════════════════════════════════════════════════════════════

struct Candidate {
    symbol_id: SymbolId,
    name: String,
    id_span: Span,
    callee_span: Span,
}

struct CandidateCollector<'r, R: SymbolResolver> {
    resolver: &'r R,
    primitive: SymbolId,
    candidates: Vec<Candidate>,
}

impl<'a, R: SymbolResolver> Visit<'a> for CandidateCollector<'_, R> {
    fn visit_variable_declarator(&mut self, decl: &VariableDeclarator<'a>) {
        // Only `name = primitive(...)`; wrapped or cast calls do not qualify.
        if let Some(Expression::CallExpression(call)) = &decl.init {
            if let Expression::Identifier(callee) = &call.callee {
                if self.resolver.resolves_to(callee, self.primitive) {
                    match &decl.id {
                        BindingPattern::BindingIdentifier(id) => {
                            if let Some(symbol_id) = self.resolver.symbol_of_binding(id) {
                                self.candidates.push(Candidate {
                                    symbol_id,
                                    name: id.name.to_string(),
                                    id_span: id.span,
                                    callee_span: callee.span,
                                });
                            }
                        }
                        _ => debug!(
                            "skipping destructured declaration at {}",
                            decl.span.start
                        ),
                    }
                }
            }
        }
        walk::walk_variable_declarator(self, decl);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFERENCE SITES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
struct Target {
    name: String,
    setter: String,
}

struct SiteRewriter<'r, R: SymbolResolver> {
    resolver: &'r R,
    targets: HashMap<SymbolId, Target>,
    patch: &'r mut SourcePatch,
    /// First `a.value = b.value = e` seen; the inner setter returns nothing.
    chained: Option<Span>,
}

impl<R: SymbolResolver> SiteRewriter<'_, R> {
    /// The target if `member` is `<tracked>.value`.
    fn value_access(&self, member: &StaticMemberExpression<'_>) -> Option<Target> {
        if member.property.name != "value" {
            return None;
        }
        let Expression::Identifier(ident) = &member.object else {
            return None;
        };
        let symbol = self.resolver.symbol_of_reference(ident)?;
        self.targets.get(&symbol).cloned()
    }
}

impl<'a, R: SymbolResolver> Visit<'a> for SiteRewriter<'_, R> {
    fn visit_assignment_expression(&mut self, assign: &AssignmentExpression<'a>) {
        if let AssignmentTarget::StaticMemberExpression(member) = &assign.left {
            if let Some(target) = self.value_access(member) {
                if let Expression::AssignmentExpression(inner) = assign.right.without_parentheses() {
                    if let AssignmentTarget::StaticMemberExpression(inner_member) = &inner.left {
                        if self.chained.is_none() && self.value_access(inner_member).is_some() {
                            self.chained = Some(assign.span);
                        }
                    }
                }
                let right = assign.right.span();
                if assign.operator == AssignmentOperator::Assign {
                    // x.value = e  ->  setX(e)
                    self.patch
                        .replace(assign.span.start, right.start, format!("{}(", target.setter));
                    self.patch.insert(right.end, ")");
                } else {
                    // x.value += e  ->  setX(x + (e))
                    let operator = assign.operator.as_str().trim_end_matches('=');
                    self.patch.replace(
                        assign.span.start,
                        right.start,
                        format!("{}({} {} (", target.setter, target.name, operator),
                    );
                    self.patch.insert(right.end, "))");
                }
                self.visit_expression(&assign.right);
                return;
            }
        }
        walk::walk_assignment_expression(self, assign);
    }

    fn visit_static_member_expression(&mut self, member: &StaticMemberExpression<'a>) {
        if self.value_access(member).is_some() {
            // x.value  ->  x
            self.patch.replace(member.object.span().end, member.span.end, "");
            return;
        }
        walk::walk_static_member_expression(self, member);
    }
}
