use super::common::{base_compile, compile_with};
use compiler::{
    compile, compile_bytes,
    error::{CompilationErrorKind, Severity},
    parser::WhitespaceStrategy,
    CompileOption, Diagnostic,
};

const COMPLEX: &str = r#"
<div id="app" :class="cls">
  <header><h1>Title</h1></header>
  <p v-if="ok" @click="toggle">{{ msg }}</p>
  <p v-else>none</p>
  <ul>
    <li v-for="(item, i) in items" :key="item.id" @click="pick(item)">{{ i }}: {{ item.name }}</li>
  </ul>
  <my-comp v-once :data="data"/>
  <input v-model="text" @keyup="log">
</div>"#;

#[test]
fn test_determinism() {
    let option = CompileOption {
        cache_bindings: true,
        ..Default::default()
    };
    let a = compile(COMPLEX, &option);
    let b = compile(COMPLEX, &option);
    assert_eq!(a.code, b.code);
    assert_eq!(a.diagnostics.len(), b.diagnostics.len());
}

#[test]
fn test_empty_returns_null() {
    for src in ["", "   ", "\n\n"] {
        let code = base_compile(src);
        assert!(code.contains("return null"), "{}", code);
        assert!(!code.contains("_hoisted_"));
        assert!(!code.contains("_cache = Array"));
        assert!(!code.contains("import"));
    }
}

#[test]
fn test_event_prop_priority() {
    let a = base_compile(r#"<div :onClick="a" @click="b"></div>"#);
    let b = base_compile(r#"<div @click="b" :onClick="a"></div>"#);
    assert_eq!(a, b);
    // bound value first, listener second
    let bound = a.find("_ctx.a").unwrap();
    let listener = a.find("_ctx.b").unwrap();
    assert!(bound < listener);
}

#[test]
fn test_handler_cache() {
    let option = CompileOption {
        cache_bindings: true,
        ..Default::default()
    };
    let code = compile_with(
        r#"<div @click="go"><p v-for="i in l" @click="pick(i)"></p></div>"#,
        option,
    );
    assert!(code.contains("_cache = Array(1)"), "{}", code);
    assert!(code.contains("_cache[0] || (_cache[0] = "), "{}", code);
    // handlers using a v-for alias are never cached
    assert!(code.contains("onClick: $event => (_ctx.pick(i))"), "{}", code);
}

#[test]
fn test_no_hoist_option() {
    let option = CompileOption {
        hoist_static: false,
        ..Default::default()
    };
    let code = compile_with(r#"<div class="a"><p>x</p></div>"#, option);
    assert!(!code.contains("_hoisted_"));
    assert!(code.contains(r#"_createElementBlock("div", { class: "a" }, ["#));
}

#[test]
fn test_custom_delimiters() {
    let option = CompileOption {
        delimiters: ("${".into(), "}".into()),
        ..Default::default()
    };
    let code = compile_with("<p>${ a } {{ b }}</p>", option);
    assert!(code.contains(r#"_toDisplayString(_ctx.a) + " {{ b }}""#), "{}", code);
}

#[test]
fn test_preserve_options() {
    let option = CompileOption {
        preserve_comments: true,
        whitespace: WhitespaceStrategy::Preserve,
        ..Default::default()
    };
    let code = compile_with("<div>\n  <!-- c -->\n  <p>{{ a }}</p></div>", option);
    assert!(code.contains(r#"_createCommentVNode(" c ")"#), "{}", code);
    assert!(code.contains(r#"_createTextVNode("\n  ")"#), "{}", code);
}

#[test]
fn test_custom_element() {
    let option = CompileOption {
        is_custom_element: |tag| tag.starts_with("x-"),
        ..Default::default()
    };
    let code = compile_with("<x-foo>{{ a }}</x-foo>", option);
    assert!(code.contains(r#"_createElementBlock("x-foo""#), "{}", code);
    assert!(!code.contains("_resolveComponent"));
}

#[test]
fn test_recovered_diagnostics() {
    let out = compile(
        r#"<div v-else></div><p v-for="x"></p><span></div>"#,
        &CompileOption::default(),
    );
    assert!(out.diagnostics.len() >= 3);
    assert!(out.diagnostics.iter().all(|d| d.severity < Severity::Fatal));
    let first = &out.diagnostics[0];
    assert!(first.range.start <= first.range.end);
    assert!(first.location.start.line >= 1);
    // output is still produced
    assert!(out.code.contains("export function render"));
}

#[test]
fn test_unbalanced_brackets_recover() {
    let is_invalid_expr = |d: &Diagnostic| d.message.starts_with("Error parsing JavaScript expression");
    for src in ["{{ } }}", r#"<div :a="}"></div>"#, r#"<div v-if="}"></div>"#] {
        let out = compile(src, &CompileOption::default());
        assert!(out.diagnostics.iter().any(is_invalid_expr), "{}", src);
        assert!(out.code.contains("export function render"));
    }
    let option = CompileOption {
        delimiters: ("[[".into(), "]]".into()),
        ..Default::default()
    };
    for src in ["[[}", "[[ } ]]", "<p>[[ a) ]]</p>"] {
        let out = compile(src, &option);
        assert!(out.code.contains("export function render"), "{}", src);
    }
}

#[test]
fn test_fatal_encoding() {
    let err = compile_bytes(b"<p>\xc3\x28</p>", &CompileOption::default()).unwrap_err();
    assert_eq!(err.kind, CompilationErrorKind::InvalidEncoding);
    assert_eq!(err.severity(), Severity::Fatal);
    assert_eq!(err.location.start.offset, 3);
    let ok = compile_bytes("<p>héllo</p>".as_bytes(), &CompileOption::default()).unwrap();
    assert!(ok.code.contains("héllo"));
}

#[test]
fn test_source_map() {
    let option = CompileOption {
        source_map: true,
        ..Default::default()
    };
    let out = compile("<div>{{ msg }}</div>", &option);
    let mappings = out.source_map.unwrap();
    assert!(!mappings.is_empty());
    let lines: Vec<_> = out.code.lines().collect();
    for m in &mappings {
        assert!(m.generated_line >= 1 && m.generated_line <= lines.len());
        assert!(m.source.start.offset <= m.source.end.offset);
    }
    assert!(compile("<p/>", &CompileOption::default()).source_map.is_none());
}
