use super::common::{base_transform, get_errors, transform_with};
use compiler::{
    error::CompilationErrorKind as K,
    flags::{PatchFlag, StaticLevel},
    ir::{CacheKind, CodegenNode, IrRoot, JsExpr as Js, RootCodegen},
    parser::{AstNode, NodeId},
    transformer::{hoist_static, inject_cache, TransformOption},
};

fn root_node<'a, 'b>(ir: &'b IrRoot<'a>) -> &'b CodegenNode<'a> {
    match &ir.root {
        RootCodegen::Single(id) => ir.codegen.get(*id).unwrap(),
        r => panic!("not single root {:?}", r),
    }
}

fn ctx_names<'a>(e: &Js<'a>, out: &mut Vec<&'a str>) {
    match e {
        Js::Ctx(n) => out.push(n),
        Js::Compound(v) | Js::Array(v) | Js::Call(_, v) => v.iter().for_each(|e| ctx_names(e, out)),
        Js::Props(ps) => ps.iter().for_each(|(k, v)| {
            ctx_names(k, out);
            ctx_names(v, out);
        }),
        Js::Handler(h) => ctx_names(&h.body, out),
        _ => {}
    }
}

fn has_param(e: &Js) -> bool {
    match e {
        Js::Param(_) => true,
        Js::Compound(v) | Js::Array(v) | Js::Call(_, v) => v.iter().any(has_param),
        Js::Props(ps) => ps.iter().any(|(k, v)| has_param(k) || has_param(v)),
        Js::Handler(h) => has_param(&h.body),
        _ => false,
    }
}

/// every expression a hoisted node carries, children included
fn assert_hoist_sound(ir: &IrRoot, node: &CodegenNode) {
    match node {
        CodegenNode::VNodeCall(v) => {
            assert!(!v.is_component);
            assert!(v.directives.is_empty());
            if let Some(props) = &v.props {
                assert!(props.static_level() >= StaticLevel::CanHoist);
                assert!(!has_param(props));
            }
            for child in &v.children {
                let n = ir.codegen.get(*child).unwrap();
                assert_hoist_sound(ir, n);
            }
        }
        CodegenNode::TextCall(t) => {
            for text in &t.texts {
                assert!(text.static_level() >= StaticLevel::CanHoist);
            }
        }
        CodegenNode::CommentCall(_) => {}
        n => panic!("unexpected node in hoist {:?}", n),
    }
}

#[test]
fn test_scenario_interpolation() {
    let ir = base_transform("<div>{{ msg }}</div>");
    assert!(ir.hoists.is_empty());
    let v = root_node(&ir).as_vnode().unwrap();
    assert_eq!(v.patch_flag, PatchFlag::TEXT);
    let text = match ir.codegen.get(v.children[0]) {
        Some(CodegenNode::TextCall(t)) => t,
        n => panic!("not text {:?}", n),
    };
    let mut names = vec![];
    text.texts.iter().for_each(|t| ctx_names(t, &mut names));
    assert_eq!(names, vec!["msg"]);
}

#[test]
fn test_scenario_hoist() {
    let ir = base_transform(r#"<div class="a"></div>"#);
    assert_eq!(ir.hoists.len(), 1);
    assert!(matches!(root_node(&ir), CodegenNode::HoistRef(0)));
}

#[test]
fn test_scenario_if() {
    let ir = base_transform(r#"<div v-if="ok">A</div><div v-else>B</div>"#);
    assert_eq!(ir.ast.children.len(), 1);
    match ir.ast.node(ir.ast.children[0]) {
        AstNode::If(i) => assert_eq!(i.branches.len(), 2),
        n => panic!("not if {:?}", n),
    }
    assert!(matches!(root_node(&ir), CodegenNode::ConditionalExpr { .. }));
}

#[test]
fn test_scenario_for() {
    let ir = base_transform(r#"<div v-for="item in list">{{item}}</div>"#);
    let f = match ir.ast.node(ir.ast.children[0]) {
        AstNode::For(f) => f,
        n => panic!("not for {:?}", n),
    };
    assert_eq!(f.source.content.raw, "list");
    assert_eq!(f.value, Some("item"));
    match root_node(&ir) {
        CodegenNode::ForExpr { source, .. } => assert!(matches!(source, Js::Ctx("list"))),
        n => panic!("not for {:?}", n),
    }
}

#[test]
fn test_scenario_once() {
    let ir = base_transform("<div v-once>{{ heavy() }}</div>");
    assert_eq!(ir.cache_size(), 1);
    match root_node(&ir) {
        CodegenNode::CacheExpr { slot, kind, inner } => {
            assert_eq!(*slot, 0);
            assert!(matches!(kind, CacheKind::Once));
            assert!(inner.as_vnode().is_some());
        }
        n => panic!("not cache {:?}", n),
    }
}

#[test]
fn test_empty_template() {
    let ir = base_transform("");
    assert!(matches!(ir.root, RootCodegen::Empty));
    assert!(ir.hoists.is_empty());
    assert_eq!(ir.cache_size(), 0);
    let ir = base_transform("   \n  ");
    assert!(matches!(ir.root, RootCodegen::Empty));
}

#[test]
fn test_hoist_soundness() {
    let src = r#"
<div :id="a">
  <p class="x"><b>static</b> text</p>
  <ul><li v-for="i in list"><span>{{ i }}</span><em>fixed</em></li></ul>
  <comp><i>in slot</i></comp>
  <p>{{ Math.max(1, 2) }}</p>
  <div v-focus>dir</div>
</div>"#;
    let ir = base_transform(src);
    assert!(!ir.hoists.is_empty());
    for hoist in &ir.hoists {
        assert_eq!(hoist.as_vnode().unwrap().patch_flag, PatchFlag::HOISTED);
        assert_hoist_sound(&ir, hoist);
    }
    // nothing inside v-for is extracted
    let div = ir.ast.element(ir.ast.children[0]).unwrap();
    let ul = ir.ast.element(div.children[1]).unwrap();
    let li = match ir.ast.node(ul.children[0]) {
        AstNode::For(f) => ir.ast.element(f.child).unwrap(),
        n => panic!("not for {:?}", n),
    };
    for child in &li.children {
        assert!(!matches!(ir.codegen.get(*child), Some(CodegenNode::HoistRef(_))));
    }
    // static child of a plain element is
    assert!(matches!(ir.codegen.get(div.children[0]), Some(CodegenNode::HoistRef(_))));
}

#[test]
fn test_scope_isolation() {
    let src = r#"<div v-for="(item, i) in items" :key="item.id" @click="pick(item, i)">{{ item.name }}{{ other }}</div>"#;
    let ir = base_transform(src);
    let body = match ir.ast.node(ir.ast.children[0]) {
        AstNode::For(f) => f.child,
        n => panic!("not for {:?}", n),
    };
    let v = ir.codegen.get(body).unwrap().as_vnode().unwrap();
    let mut names = vec![];
    ctx_names(v.props.as_ref().unwrap(), &mut names);
    for child in &v.children {
        if let Some(CodegenNode::TextCall(t)) = ir.codegen.get(*child) {
            t.texts.iter().for_each(|t| ctx_names(t, &mut names));
        }
    }
    names.sort_unstable();
    assert_eq!(names, vec!["other", "pick"]);
    // the source is resolved outside the new scope
    match root_node(&ir) {
        CodegenNode::ForExpr { source, .. } => assert!(matches!(source, Js::Ctx("items"))),
        n => panic!("not for {:?}", n),
    }
}

#[test]
fn test_alias_does_not_leak() {
    let ir = base_transform(r#"<p v-for="item in list"/><p :title="item"/>"#);
    let second = ir.ast.children[1];
    let v = ir.codegen.get(second).unwrap().as_vnode().unwrap();
    let mut names = vec![];
    ctx_names(v.props.as_ref().unwrap(), &mut names);
    assert_eq!(names, vec!["item"]);
}

#[test]
fn test_idempotent_numbering() {
    let option = TransformOption {
        hoist_static: true,
        cache_bindings: true,
    };
    let src = r#"<div :id="a" @click="go"><p>s</p><i v-once>{{ b }}</i><em>t</em></div>"#;
    let mut ir = transform_with(src, option);
    let hoists = ir.hoists.len();
    let slots = ir.cache_slots.clone();
    hoist_static(&mut ir);
    inject_cache(&mut ir);
    assert_eq!(ir.hoists.len(), hoists);
    assert_eq!(ir.cache_slots, slots);
}

#[test]
fn test_numbering_follows_source_order() {
    let src = r#"<div :id="a"><p>first</p><span>{{ x }}</span><p>second</p></div>"#;
    let ir = base_transform(src);
    let div = ir.ast.element(ir.ast.children[0]).unwrap();
    let refs: Vec<Option<usize>> = div
        .children
        .iter()
        .map(|id: &NodeId| match ir.codegen.get(*id) {
            Some(CodegenNode::HoistRef(i)) => Some(*i),
            _ => None,
        })
        .collect();
    assert_eq!(refs, vec![Some(0), None, Some(1)]);
}

#[test]
fn test_transform_errors() {
    assert_eq!(get_errors(r#"<div v-else></div>"#), vec![K::VElseNoAdjacentIf]);
    assert_eq!(get_errors(r#"<div v-for></div>"#), vec![K::VForNoExpression]);
    assert_eq!(get_errors(r#"<div v-for="x"></div>"#), vec![K::VForMalformedExpression]);
    assert_eq!(get_errors(r#"<div v-memo></div>"#), vec![K::VMemoNoExpression]);
    assert_eq!(get_errors(r#"<div v-model="a"></div>"#), vec![K::VModelOnInvalidElement]);
    assert!(get_errors(r#"<p>{{ a + }}</p>"#).contains(&K::InvalidExpression));
}

#[test]
fn test_unbalanced_expression() {
    let cases = [
        "{{ } }}",
        r#"<div :a="}"></div>"#,
        r#"<div v-if="}"></div>"#,
        r#"<div @click="a)"></div>"#,
        r#"<div v-for="x in ]"></div>"#,
    ];
    for case in cases {
        assert!(get_errors(case).contains(&K::InvalidExpression), "{}", case);
    }
}
