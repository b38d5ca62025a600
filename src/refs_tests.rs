#[cfg(test)]
mod tests {
    use crate::component::{MigrateOptions, MigrationOutput};
    use crate::diagnostics::{ERR_CHAINED_ASSIGNMENT, ERR_SCRIPT_SYNTAX};
    use crate::refs::{rewrite_script, RewrittenDeclaration};
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str) -> MigrationOutput {
        rewrite_script(source, &MigrateOptions::default()).unwrap()
    }

    #[test]
    fn test_use_state_keeps_comments_and_formatting() {
        let source = r#"import { ref } from "vue";

const editing = ref(false);
const editInput = ref<string | null>(null);
const editText = ref("");

return (
  <button
    onClick={() => {
      // keep comment
      editing.value = true;
    }}
  >
    {/* Keep comment */}
    Edit
  </button>
);
"#;
        let expected = r#"import { ref } from "vue";
import { useState } from "react";

const [editing, setEditing] = useState(false);
const [editInput, setEditInput] = useState<string | null>(null);
const [editText, setEditText] = useState("");

return (
  <button
    onClick={() => {
      // keep comment
      setEditing(true);
    }}
  >
    {/* Keep comment */}
    Edit
  </button>
);
"#;
        let output = rewrite(source);
        assert_eq!(output.code, expected);
        assert_eq!(output.added_imports, vec!["react:useState".to_string()]);

        let setters: Vec<&str> = output
            .rewritten_declarations
            .iter()
            .map(|d| d.setter.as_str())
            .collect();
        assert_eq!(setters, vec!["setEditing", "setEditInput", "setEditText"]);
        assert_eq!(
            output.rewritten_declarations[0],
            RewrittenDeclaration {
                name: "editing".to_string(),
                setter: "setEditing".to_string(),
                line: 3,
            }
        );
    }

    #[test]
    fn test_aliased_import() {
        let source = r#"import { ref as vueRef } from "vue";

const editing = vueRef(false);

return <button onClick={() => editing.value = true}>Edit</button>;
"#;
        let expected = r#"import { ref as vueRef } from "vue";
import { useState } from "react";

const [editing, setEditing] = useState(false);

return <button onClick={() => setEditing(true)}>Edit</button>;
"#;
        assert_eq!(rewrite(source).code, expected);
    }

    #[test]
    fn test_end_to_end_setter() {
        let source = "import { ref } from \"vue\";\nconst editing = ref(false);\nfunction edit() {\n  editing.value = true;\n}\n";
        let expected = "import { ref } from \"vue\";\nimport { useState } from \"react\";\nconst [editing, setEditing] = useState(false);\nfunction edit() {\n  setEditing(true);\n}\n";
        assert_eq!(rewrite(source).code, expected);
    }

    #[test]
    fn test_reads_drop_value() {
        let source = "import { ref } from \"vue\";\nconst count = ref(0);\nconsole.log(count.value + 1, `${count.value}`);\n";
        let output = rewrite(source);
        assert!(output.code.contains("console.log(count + 1, `${count}`);"));
    }

    #[test]
    fn test_assignment_value_reads_are_rewritten() {
        let source = "import { ref } from \"vue\";\nconst a = ref(1);\nconst b = ref(2);\na.value = b.value * 2;\n";
        let output = rewrite(source);
        assert!(output.code.ends_with("setA(b * 2);\n"));
    }

    #[test]
    fn test_compound_assignment() {
        let source = "import { ref } from \"vue\";\nconst count = ref(0);\ncount.value += step;\n";
        let output = rewrite(source);
        assert!(output.code.ends_with("setCount(count + (step));\n"));
    }

    #[test]
    fn test_chained_state_write_fails() {
        let options = MigrateOptions {
            file_path: "Chain.vue".to_string(),
            ..Default::default()
        };
        let source = "import { ref } from \"vue\";\nconst a = ref(0);\nconst b = ref(0);\na.value = (b.value = 1);\n";
        let err = rewrite_script(source, &options).unwrap_err();
        assert_eq!(err.code, ERR_CHAINED_ASSIGNMENT);
        assert_eq!((err.file.as_str(), err.line), ("Chain.vue", 4));
        assert_eq!(err.context.as_deref(), Some("a.value = (b.value = 1)"));

        let plain = "import { ref } from \"vue\";\nconst a = ref(0);\nlet n;\na.value = n = 1;\n";
        assert!(rewrite(plain).code.ends_with("setA(n = 1);\n"));
    }

    #[test]
    fn test_shadowed_local_is_untouched() {
        let source = "import { ref } from \"vue\";\nconst count = ref(0);\nfunction show(count) {\n  return count.value;\n}\ncount.value = 1;\n";
        let output = rewrite(source);
        assert!(output.code.contains("function show(count) {\n  return count.value;\n}"));
        assert!(output.code.ends_with("setCount(1);\n"));
    }

    #[test]
    fn test_shadowed_primitive_is_not_a_candidate() {
        let source = "import { ref } from \"vue\";\nfunction make(ref) {\n  const box = ref(1);\n  return box.value;\n}\n";
        let output = rewrite(source);
        assert_eq!(output.code, source);
        assert!(output.rewritten_declarations.is_empty());
        assert!(output.added_imports.is_empty());
    }

    #[test]
    fn test_destructuring_is_byte_identical() {
        let source = "import { ref } from \"vue\";\nconst { a } = ref({ a: 1 });\nconst [b] = ref([1]);\n";
        let output = rewrite(source);
        assert_eq!(output.code, source);
        assert!(output.added_imports.is_empty());
    }

    #[test]
    fn test_wrapped_initializers_are_skipped() {
        let source = "import { ref } from \"vue\";\nconst a = (ref(1));\nconst b = ref(2) as any;\nconst c = ref(3);\n";
        let output = rewrite(source);
        assert!(output.code.contains("const a = (ref(1));"));
        assert!(output.code.contains("const b = ref(2) as any;"));
        assert!(output.code.contains("const [c, setC] = useState(3);"));
        assert_eq!(output.rewritten_declarations.len(), 1);
    }

    #[test]
    fn test_other_module_is_ignored() {
        let source = "import { ref } from \"./store\";\nconst a = ref(1);\na.value = 2;\n";
        assert_eq!(rewrite(source).code, source);
    }

    #[test]
    fn test_only_identifier_rooted_access() {
        let source = "import { ref } from \"vue\";\nconst a = ref(1);\nstore.a.value = 3;\nfoo(a);\n";
        let output = rewrite(source);
        assert!(output.code.contains("store.a.value = 3;"));
        assert!(output.code.contains("foo(a);"));
    }

    #[test]
    fn test_single_import_for_many_declarations() {
        let source = "import { ref } from \"vue\";\nconst a = ref(1);\nconst b = ref(2);\nconst c = ref(3);\n";
        let output = rewrite(source);
        assert_eq!(output.code.matches("useState }").count(), 1);
        assert_eq!(output.added_imports.len(), 1);
    }

    #[test]
    fn test_existing_react_import_is_extended() {
        let source = "import { useEffect } from \"react\";\nimport { ref } from \"vue\";\nconst a = ref(1);\n";
        let output = rewrite(source);
        assert!(output.code.starts_with("import { useEffect, useState } from \"react\";\n"));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let source = "import { ref } from \"vue\";\nconst a = ref(1);\na.value = a.value + 1;\n";
        let once = rewrite(source);
        let twice = rewrite(&once.code);
        assert_eq!(twice.code, once.code);
        assert!(twice.rewritten_declarations.is_empty());
    }

    #[test]
    fn test_custom_names() {
        let options = MigrateOptions {
            primitive: "shallowRef".to_string(),
            hook: "useSignal".to_string(),
            target_module: "@preact/signals-react".to_string(),
            ..Default::default()
        };
        let source = "import { shallowRef } from \"vue\";\nconst a = shallowRef(1);\n";
        let output = rewrite_script(source, &options).unwrap();
        assert_eq!(
            output.code,
            "import { shallowRef } from \"vue\";\nimport { useSignal } from \"@preact/signals-react\";\nconst [a, setA] = useSignal(1);\n"
        );
    }

    #[test]
    fn test_syntax_error() {
        let options = MigrateOptions {
            file_path: "Broken.vue".to_string(),
            ..Default::default()
        };
        let err = rewrite_script("const = ;", &options).unwrap_err();
        assert_eq!(err.code, ERR_SCRIPT_SYNTAX);
        assert_eq!(err.file, "Broken.vue");
    }
}
