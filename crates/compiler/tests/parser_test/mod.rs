use super::common::{base_parse, get_errors};
use compiler::error::CompilationErrorKind as K;
use compiler::parser::{AstNode, DirectiveArg, ElemProp, ElementType};

#[test]
fn test_tree_shape() {
    let ast = base_parse("<div><p>a</p><br><span>{{ b }}</span></div>");
    assert_eq!(ast.children.len(), 1);
    let div = ast.element(ast.children[0]).unwrap();
    assert_eq!(div.children.len(), 3);
    let br = ast.element(div.children[1]).unwrap();
    assert_eq!(br.tag_name, "br");
    assert!(br.children.is_empty());
}

#[test]
fn test_directive_forms() {
    let ast = base_parse(r#"<div v-on:click.stop="a" :[key]="b" #default .c="d"></div>"#);
    let div = ast.element(ast.children[0]).unwrap();
    let dirs: Vec<_> = div
        .properties
        .iter()
        .filter_map(|p| match p {
            ElemProp::Dir(d) => Some(d),
            ElemProp::Attr(_) => None,
        })
        .collect();
    assert_eq!(dirs.len(), 4);
    assert_eq!(dirs[0].name, "on");
    assert!(matches!(dirs[0].argument, Some(DirectiveArg::Static("click"))));
    assert_eq!(dirs[0].modifiers, vec!["stop"]);
    assert_eq!(dirs[1].name, "bind");
    assert!(matches!(dirs[1].argument, Some(DirectiveArg::Dynamic("key"))));
    assert_eq!(dirs[2].name, "slot");
    assert_eq!(dirs[3].name, "bind");
    assert_eq!(dirs[3].modifiers, vec!["prop"]);
}

#[test]
fn test_classification() {
    let ast = base_parse("<component/><Foo/><svg/><teleport/>");
    let types: Vec<_> = ast
        .children
        .iter()
        .map(|id| ast.element(*id).unwrap().tag_type)
        .collect();
    use ElementType::*;
    assert_eq!(types, vec![Component, Component, Plain, Component]);
}

#[test]
fn test_unmatched_end_tags() {
    assert_eq!(get_errors("<div></span></div>"), vec![K::InvalidEndTag]);
    assert_eq!(get_errors("<div><span></div>"), vec![K::MissingEndTag]);
    // optional end tags close silently
    assert!(get_errors("<ul><li>a<li>b</ul>").is_empty());
}

#[test]
fn test_text_children() {
    let ast = base_parse("a &amp; b");
    match ast.node(ast.children[0]) {
        AstNode::Text(t) => assert_eq!(t.text.into_string(), "a & b"),
        n => panic!("not text {:?}", n),
    }
}
