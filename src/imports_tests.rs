#[cfg(test)]
mod tests {
    use crate::imports::{ensure_named_import, RequiredImports};
    use crate::patch::SourcePatch;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;
    use pretty_assertions::assert_eq;

    fn ensure(source: &str, module: &str, names: &[&str]) -> (String, Vec<String>) {
        let allocator = Allocator::default();
        let source_type = SourceType::default().with_typescript(true).with_module(true);
        let ret = Parser::new(&allocator, source, source_type).parse();
        assert!(ret.errors.is_empty());

        let mut patch = SourcePatch::new();
        let added = ensure_named_import(&ret.program, &mut patch, module, names);
        (patch.apply(source).unwrap(), added)
    }

    #[test]
    fn test_no_imports_inserts_at_top() {
        let (code, added) = ensure("const a = 1;\n", "react", &["useState"]);
        assert_eq!(code, "import { useState } from \"react\";\nconst a = 1;\n");
        assert_eq!(added, vec!["useState".to_string()]);
    }

    #[test]
    fn test_inserts_after_last_import() {
        let (code, _) = ensure("import a from 'a';\nimport b from 'b';\nx();\n", "react", &["useState"]);
        assert_eq!(
            code,
            "import a from 'a';\nimport b from 'b';\nimport { useState } from \"react\";\nx();\n"
        );
    }

    #[test]
    fn test_extends_named_import() {
        let (code, _) = ensure("import { useEffect } from \"react\";\n", "react", &["useState"]);
        assert_eq!(code, "import { useEffect, useState } from \"react\";\n");
    }

    #[test]
    fn test_extends_default_import() {
        let (code, _) = ensure("import React from \"react\";\n", "react", &["useState"]);
        assert_eq!(code, "import React, { useState } from \"react\";\n");
    }

    #[test]
    fn test_namespace_import_gets_new_declaration() {
        let (code, _) = ensure("import * as React from \"react\";\n", "react", &["useState"]);
        assert_eq!(
            code,
            "import * as React from \"react\";\nimport { useState } from \"react\";\n"
        );
    }

    #[test]
    fn test_type_only_import_is_not_reused() {
        let (code, _) = ensure("import type { FC } from \"react\";\n", "react", &["useState"]);
        assert_eq!(
            code,
            "import type { FC } from \"react\";\nimport { useState } from \"react\";\n"
        );
    }

    #[test]
    fn test_existing_name_is_not_duplicated() {
        let source = "import { useState } from \"react\";\n";
        let (code, added) = ensure(source, "react", &["useState"]);
        assert_eq!(code, source);
        assert!(added.is_empty());
    }

    #[test]
    fn test_aliased_name_does_not_count() {
        let (code, _) = ensure("import { useState as s } from \"react\";\n", "react", &["useState"]);
        assert_eq!(code, "import { useState as s, useState } from \"react\";\n");
    }

    #[test]
    fn test_names_are_deduplicated() {
        let (code, added) = ensure("", "react", &["useState", "useEffect", "useState"]);
        assert_eq!(code, "import { useState, useEffect } from \"react\";\n");
        assert_eq!(added.len(), 2);
    }

    #[test]
    fn test_required_imports_apply_once() {
        let source = "import { ref } from \"vue\";\n";
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();

        let mut required = RequiredImports::new();
        required.require("react", "useState");
        required.require("react", "useState");

        let mut patch = SourcePatch::new();
        let added = required.apply(&ret.program, &mut patch);
        assert_eq!(added, vec!["react:useState".to_string()]);
        assert_eq!(
            patch.apply(source).unwrap(),
            "import { ref } from \"vue\";\nimport { useState } from \"react\";\n"
        );
    }
}
