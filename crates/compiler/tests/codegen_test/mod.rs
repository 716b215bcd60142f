use super::common::{
    assert_helpers_declared, assert_valid_function, assert_valid_module, base_compile, compile_with,
};
use compiler::{codegen::ScriptMode, CompileOption};
use insta::assert_snapshot;

#[test]
fn test_hoisted_root() {
    let code = base_compile(r#"<div class="a"></div>"#);
    assert_snapshot!(code.trim_end(), @r###"
    import { createElementVNode as _createElementVNode } from "vue"

    const _hoisted_0 = /*#__PURE__*/_createElementVNode("div", { class: "a" }, null, -1 /* HOISTED */)

    export function render(_ctx, _cache) {
      return _hoisted_0
    }
    "###);
}

#[test]
fn test_interpolation() {
    let code = base_compile("<div>{{ msg }}</div>");
    assert_snapshot!(code.trim_end(), @r###"
    import { openBlock as _openBlock, createElementBlock as _createElementBlock, toDisplayString as _toDisplayString } from "vue"

    export function render(_ctx, _cache) {
      return (_openBlock(), _createElementBlock("div", null, _toDisplayString(_ctx.msg), 1 /* TEXT */))
    }
    "###);
}

#[test]
fn test_if_else() {
    let code = base_compile(r#"<div v-if="ok">A</div><div v-else>B</div>"#);
    assert_snapshot!(code.trim_end(), @r###"
    import { openBlock as _openBlock, createElementBlock as _createElementBlock } from "vue"

    export function render(_ctx, _cache) {
      return (_ctx.ok)
        ? (_openBlock(), _createElementBlock("div", { key: 0 }, "A"))
        : (_openBlock(), _createElementBlock("div", { key: 1 }, "B"))
    }
    "###);
}

#[test]
fn test_for() {
    let code = base_compile(r#"<div v-for="item in list">{{item}}</div>"#);
    assert_snapshot!(code.trim_end(), @r###"
    import { Fragment as _Fragment, openBlock as _openBlock, createElementBlock as _createElementBlock, renderList as _renderList, toDisplayString as _toDisplayString } from "vue"

    export function render(_ctx, _cache) {
      return (_openBlock(true), _createElementBlock(_Fragment, null, _renderList(_ctx.list, (item) => {
        return (_openBlock(), _createElementBlock("div", null, _toDisplayString(item), 1 /* TEXT */))
      }), 256 /* UNKEYED_FRAGMENT */))
    }
    "###);
}

#[test]
fn test_once() {
    let code = base_compile("<div v-once>{{ heavy() }}</div>");
    assert_snapshot!(code.trim_end(), @r###"
    import { createElementVNode as _createElementVNode, toDisplayString as _toDisplayString, setBlockTracking as _setBlockTracking } from "vue"

    export function render(_ctx, _cache = Array(1)) {
      return _cache[0] || (
        _setBlockTracking(-1),
        _cache[0] = _createElementVNode("div", null, _toDisplayString(_ctx.heavy()), 1 /* TEXT */),
        _setBlockTracking(1),
        _cache[0]
      )
    }
    "###);
}

#[test]
fn test_function_mode() {
    let option = CompileOption {
        mode: ScriptMode::Function {
            runtime_global_name: "Vue".into(),
        },
        expression_prefix: String::new(),
        ..Default::default()
    };
    let code = compile_with("<div>{{ msg }}</div>", option);
    assert_snapshot!(code.trim_end(), @r###"
    const { openBlock: _openBlock, createElementBlock: _createElementBlock, toDisplayString: _toDisplayString } = Vue

    return function render(_ctx, _cache) {
      with (_ctx) {
        return (_openBlock(), _createElementBlock("div", null, _toDisplayString(msg), 1 /* TEXT */))
      }
    }
    "###);
}

#[test]
fn test_empty() {
    let code = base_compile("");
    assert_snapshot!(code.trim_end(), @r###"
    export function render(_ctx, _cache) {
      return null
    }
    "###);
}

#[test]
fn test_component_and_directive_assets() {
    let code = base_compile(r#"<my-comp v-focus>hi</my-comp><my-comp/>"#);
    assert_eq!(code.matches("_resolveComponent(\"my-comp\")").count(), 1);
    assert!(code.contains(r#"const _directive_focus = _resolveDirective("focus")"#));
    assert!(code.contains("_withDirectives("));
    assert!(code.contains("default: _withCtx(() => ["));
    assert!(code.contains("resolveComponent as _resolveComponent"));
    assert!(code.contains("resolveDirective as _resolveDirective"));
    assert_helpers_declared(&code);
    assert_valid_module(&code);
}

#[test]
fn test_fragment_root() {
    let code = base_compile("<p>{{ a }}</p><p>{{ b }}</p>");
    assert!(code.contains("return (_openBlock(), _createElementBlock(_Fragment, null, ["));
    assert!(code.contains("64 /* STABLE_FRAGMENT */"));
    assert_valid_module(&code);
}

#[test]
fn test_custom_runtime_names() {
    let option = CompileOption {
        runtime_module_name: "my-runtime".into(),
        ..Default::default()
    };
    let code = compile_with("<p>{{ a }}</p>", option);
    assert!(code.contains(r#"} from "my-runtime""#));
    let option = CompileOption {
        mode: ScriptMode::Function {
            runtime_global_name: String::new(),
        },
        runtime_global_name: "MyRuntime".into(),
        ..Default::default()
    };
    let code = compile_with("<p>{{ a }}</p>", option);
    assert!(code.contains("} = MyRuntime\n"));
    assert!(!code.contains("with (_ctx)"));
    assert_valid_function(&code);
}

#[test]
fn test_generated_code_parses() {
    let cases = [
        "hello {{ world }}",
        r#"<div :class="{ a: ok }" :style="s" id="x">text</div>"#,
        r#"<input v-model="text"><input type="checkbox" v-model="checked">"#,
        r#"<select v-model.number="sel" multiple><option>1</option></select>"#,
        r#"<button @click="count++" @keyup.enter="submit($event)">+</button>"#,
        r#"<div v-bind="attrs" v-on="handlers"></div>"#,
        r#"<p v-if="a">a</p><p v-else-if="b">b</p><p v-else>c</p>"#,
        r#"<template v-if="a"><i>1</i><i>2</i></template>"#,
        r#"<li v-for="(item, key, index) in obj" :key="key">{{ index }}</li>"#,
        r#"<li v-for="{ id, name } of list" :key="id">{{ name }}</li>"#,
        r#"<div v-for="item in list" :key="item.id" v-memo="[item.ok]">{{ item.ok }}</div>"#,
        r#"<div v-memo="[a]">{{ a }}</div>"#,
        r#"<component :is="view" :msg="m"/>"#,
        r#"<KeepAlive><comp/></KeepAlive><Teleport to="body"><p>x</p></Teleport>"#,
        r#"<div :[key]="v" @[ev]="h"></div>"#,
        "<div><!-- comment --><p>static</p><span>{{ dyn }}</span></div>",
        "<my-comp/>",
        r#"<div v-focus:top.once="a"></div>"#,
        r#"<my-comp v-for="i in list" :key="i"><p v-tip="i">{{ i }}</p></my-comp>"#,
        r#"<form @submit.prevent><input @keyup.enter.exact="send" @click.right="menu"></form>"#,
        r#"<div @[ev].stop.once="h"></div>"#,
    ];
    for case in cases {
        let code = base_compile(case);
        assert_valid_module(&code);
        assert_helpers_declared(&code);
    }
    let option = CompileOption {
        mode: ScriptMode::Function {
            runtime_global_name: "Vue".into(),
        },
        cache_bindings: true,
        ..Default::default()
    };
    for case in cases {
        let code = compile_with(case, option.clone());
        assert_valid_function(&code);
        assert_helpers_declared(&code);
    }
}
