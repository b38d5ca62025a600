#[cfg(test)]
mod tests {
    use crate::diagnostics::{ERR_MALFORMED_FOR, ERR_TEMPLATE_SYNTAX};
    use crate::ir::{ElementKind, ElementNode, MarkupNode, Prop};
    use crate::parse::{parse_template, split_sfc};
    use pretty_assertions::assert_eq;

    fn roots(markup: &str) -> Vec<MarkupNode> {
        parse_template(markup, "test.vue").unwrap()
    }

    fn element(node: &MarkupNode) -> &ElementNode {
        match node {
            MarkupNode::Element(el) => el,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_static_attributes() {
        let nodes = roots(r#"<input class="new-todo" autofocus placeholder="What needs to be done?" />"#);
        assert_eq!(nodes.len(), 1);
        let input = element(&nodes[0]);
        assert_eq!(input.tag, "input");
        assert_eq!(input.kind, ElementKind::Ordinary);
        assert!(input.children.is_empty());

        let attrs: Vec<(String, Option<String>)> = input
            .props
            .iter()
            .map(|p| match p {
                Prop::Attribute(a) => (a.name.clone(), a.value.clone()),
                Prop::Directive(d) => panic!("unexpected directive {:?}", d),
            })
            .collect();
        assert_eq!(
            attrs,
            vec![
                ("class".to_string(), Some("new-todo".to_string())),
                ("autofocus".to_string(), None),
                ("placeholder".to_string(), Some("What needs to be done?".to_string())),
            ]
        );
    }

    #[test]
    fn test_directive_shorthands() {
        let nodes = roots(
            r#"<TodoItem :todoItem="t" @keyup.enter="add" v-model:title="form.title" #header .inner-html="raw" />"#,
        );
        let item = element(&nodes[0]);
        assert_eq!(item.tag, "TodoItem");

        let directives: Vec<_> = item
            .props
            .iter()
            .filter_map(|p| match p {
                Prop::Directive(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(directives.len(), 5);

        assert_eq!(directives[0].name, "bind");
        assert_eq!(directives[0].argument.as_deref(), Some("todoItem"));
        assert_eq!(directives[0].expression.as_deref(), Some("t"));

        assert_eq!(directives[1].name, "on");
        assert_eq!(directives[1].argument.as_deref(), Some("keyup"));
        assert_eq!(directives[1].modifiers, vec!["enter".to_string()]);
        assert_eq!(directives[1].source, r#"@keyup.enter="add""#);

        assert_eq!(directives[2].name, "model");
        assert_eq!(directives[2].argument.as_deref(), Some("title"));

        assert_eq!(directives[3].name, "slot");
        assert_eq!(directives[3].argument.as_deref(), Some("header"));
        assert_eq!(directives[3].expression, None);

        assert_eq!(directives[4].name, "bind");
        assert_eq!(directives[4].argument.as_deref(), Some("inner-html"));
        assert_eq!(directives[4].modifiers, vec!["prop".to_string()]);
    }

    #[test]
    fn test_dynamic_argument() {
        let nodes = roots(r#"<a v-bind:[attr]="value"></a>"#);
        let Prop::Directive(d) = &element(&nodes[0]).props[0] else {
            panic!("expected directive");
        };
        assert!(d.dynamic_argument);
        assert_eq!(d.argument.as_deref(), Some("attr"));
    }

    #[test]
    fn test_for_binding_is_parsed() {
        let nodes = roots(r#"<li v-for="(todo, index) in filteredTodos.value"></li>"#);
        let li = element(&nodes[0]);
        let d = li.find_directive(&["for"]).unwrap();
        let binding = d.for_binding.as_ref().unwrap();
        assert_eq!(binding.source_expr, "filteredTodos.value");
        assert_eq!(binding.value_name.as_deref(), Some("todo"));
        assert_eq!(binding.key_name.as_deref(), Some("index"));
        assert_eq!(binding.index_name, None);
    }

    #[test]
    fn test_malformed_for_fails() {
        let err = parse_template(r#"<li v-for="todos"></li>"#, "List.vue").unwrap_err();
        assert_eq!(err.code, ERR_MALFORMED_FOR);
        assert_eq!(err.file, "List.vue");
        assert_eq!(err.context.as_deref(), Some(r#"v-for="todos""#));
    }

    #[test]
    fn test_whitespace_between_elements_is_dropped() {
        let nodes = roots("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
        let ul = element(&nodes[0]);
        assert_eq!(ul.children.len(), 2);
        assert!(ul.children.iter().all(|c| matches!(c, MarkupNode::Element(_))));
    }

    #[test]
    fn test_inline_whitespace_is_condensed() {
        let nodes = roots("<p>  hello\n   world </p><b>x</b> <i>y</i>");
        assert_eq!(nodes.len(), 4);
        match &element(&nodes[0]).children[0] {
            MarkupNode::Text(text) => assert_eq!(text.content, " hello world "),
            other => panic!("expected text, got {:?}", other),
        }
        match &nodes[2] {
            MarkupNode::Text(text) => assert_eq!(text.content, " "),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_pre_keeps_whitespace() {
        let nodes = roots("<pre>  a\n  b</pre>");
        match &element(&nodes[0]).children[0] {
            MarkupNode::Text(text) => assert_eq!(text.content, "  a\n  b"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_void_elements_have_no_children() {
        let nodes = roots(r#"<input type="text"><span>x</span>"#);
        assert_eq!(nodes.len(), 2);
        assert_eq!(element(&nodes[0]).tag, "input");
        assert_eq!(element(&nodes[1]).tag, "span");
    }

    #[test]
    fn test_template_container_kind() {
        let nodes = roots(r#"<template v-if="ok"><a /></template><template><b /></template>"#);
        assert_eq!(element(&nodes[0]).kind, ElementKind::Container);
        assert_eq!(element(&nodes[1]).kind, ElementKind::Ordinary);
    }

    #[test]
    fn test_comments_and_interpolation() {
        let nodes = roots("<!-- note --><p>{{ message }}</p>");
        match &nodes[0] {
            MarkupNode::Comment(c) => assert_eq!(c.content, " note "),
            other => panic!("expected comment, got {:?}", other),
        }
        match &element(&nodes[1]).children[0] {
            MarkupNode::Interpolation(i) => {
                assert_eq!(i.expression, "message");
                assert_eq!(i.source, "{{ message }}");
            }
            other => panic!("expected interpolation, got {:?}", other),
        }
    }

    #[test]
    fn test_locations_are_one_based() {
        let nodes = roots("<div>\n  <span :a=\"b\"></span>\n</div>");
        let span = element(&element(&nodes[0]).children[0]);
        assert_eq!((span.location.line, span.location.column), (2, 3));
        let Prop::Directive(d) = &span.props[0] else {
            panic!("expected directive");
        };
        assert_eq!((d.location.line, d.location.column), (2, 9));
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = parse_template("<div><span></div>", "test.vue").unwrap_err();
        assert_eq!(err.code, ERR_TEMPLATE_SYNTAX);
        assert!(err.message.contains("</div>"));
    }

    #[test]
    fn test_unclosed_element() {
        let err = parse_template("<div>\n<p>text</p>", "test.vue").unwrap_err();
        assert_eq!(err.code, ERR_TEMPLATE_SYNTAX);
        assert_eq!((err.line, err.column), (1, 1));
    }

    #[test]
    fn test_unexpected_end_tag() {
        let err = parse_template("</div>", "test.vue").unwrap_err();
        assert_eq!(err.code, ERR_TEMPLATE_SYNTAX);
    }

    #[test]
    fn test_split_sfc_outer_template() {
        let source = r#"<template>
  <div>
    <template v-if="ok"><a /></template>
  </div>
</template>

<script setup lang="ts">
import { ref } from "vue";
const ok = ref(true);
</script>

<style scoped>
div { color: red; }
</style>
"#;
        let blocks = split_sfc(source);
        let template = blocks.template.unwrap();
        assert!(template.contains(r#"<template v-if="ok"><a /></template>"#));
        assert!(template.trim_end().ends_with("</div>"));

        let script = blocks.script.unwrap();
        assert_eq!(script.content, "import { ref } from \"vue\";\nconst ok = ref(true);");
        assert_eq!(script.attributes.get("lang").map(String::as_str), Some("ts"));
        assert_eq!(script.attributes.get("setup").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_split_sfc_without_template() {
        let blocks = split_sfc("<script>export const a = 1;</script>");
        assert_eq!(blocks.template, None);
        assert_eq!(blocks.script.unwrap().content, "export const a = 1;");
    }
}
