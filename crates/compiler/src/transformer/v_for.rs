//! v-for wraps the element in a `For` node and opens an alias scope
//! for its subtree. Frames are kept on a stack since v-for nests.
use super::{Continuation, TransformContext, TransformPass};
use crate::{
    error::{CompilationError, CompilationErrorKind as ErrorKind},
    flags::{PatchFlag, StaticLevel},
    ir::{CodegenNode, ForParams, JsExpr as Js},
    parser::{AstNode, AttributeValue, ElementType, ForNode, NodeId, SourceNode},
    util::{
        find_prop, is_simple_identifier,
        rslint::{collect_local_names, parse_js_expr},
        take_dir, VStr,
    },
    SourceLocation,
};
use smallvec::SmallVec;

struct ForFrame<'a> {
    id: NodeId,
    source: Js<'a>,
    aliases: Vec<&'a str>,
}

#[derive(Default)]
pub struct VFor<'a> {
    frames: Vec<ForFrame<'a>>,
}

impl<'a> TransformPass<'a> for VFor<'a> {
    fn name(&self) -> &'static str {
        "v_for"
    }

    fn enter(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) -> Continuation {
        let dir = match ctx.ir.ast.element_mut(id).and_then(|e| take_dir(e, "for")) {
            Some(dir) => dir,
            None => return Continuation::Done,
        };
        let location = ctx.ir.ast.node(id).get_location().clone();
        if let Some(error) = dir.check_empty_expr(ErrorKind::VForNoExpression) {
            ctx.emit_error(error);
            return degrade(location, ctx);
        }
        let expr = match dir.expression {
            Some(expr) => expr,
            None => return degrade(location, ctx),
        };
        let parsed = match parse_for_expr(expr.content.raw) {
            Some(parsed) => parsed,
            None => {
                let error = CompilationError::new(ErrorKind::VForMalformedExpression)
                    .with_location(expr.location.clone());
                ctx.emit_error(error);
                return degrade(location, ctx);
            }
        };
        check_template_v_for_key(id, ctx);
        // the source is evaluated outside of the loop scope
        let source = ctx.process_expression(parsed.source, &expr.location);
        let for_id = ctx.ir.ast.alloc(AstNode::For(ForNode {
            source: AttributeValue {
                content: VStr::raw(parsed.source),
                location: expr.location,
            },
            value: parsed.value,
            key: parsed.key,
            index: parsed.index,
            child: id,
            location,
        }));
        ctx.replace_node(for_id);
        let aliases: Vec<_> = [parsed.value, parsed.key, parsed.index]
            .into_iter()
            .flatten()
            .flat_map(alias_names)
            .collect();
        for &alias in &aliases {
            ctx.add_alias(alias);
        }
        self.frames.push(ForFrame {
            id: for_id,
            source,
            aliases,
        });
        Continuation::Exit
    }

    fn exit(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) {
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => return,
        };
        debug_assert_eq!(frame.id, id);
        for &alias in &frame.aliases {
            ctx.remove_alias(alias);
        }
        let node = match ctx.ir.ast.node(id) {
            AstNode::For(n) => n.clone(),
            _ => return,
        };
        let is_stable = frame.source.static_level() >= StaticLevel::CanHoist;
        let has_key = ctx
            .ir
            .ast
            .element(node.child)
            .map_or(false, |e| find_prop(e, "key").is_some());
        if let Some(CodegenNode::VNodeCall(v)) = ctx.ir.codegen.get_mut(node.child) {
            v.is_block = !is_stable;
        }
        let fragment_flag = if is_stable {
            PatchFlag::STABLE_FRAGMENT
        } else if has_key {
            PatchFlag::KEYED_FRAGMENT
        } else {
            PatchFlag::UNKEYED_FRAGMENT
        };
        let params = ForParams {
            value: node.value.map(Js::Param),
            key: node.key.map(Js::Param),
            index: node.index.map(Js::Param),
        };
        ctx.ir.codegen.set(
            id,
            CodegenNode::ForExpr {
                source: frame.source,
                params,
                body: node.child,
                is_stable,
                fragment_flag,
            },
        );
    }
}

/// Replaces the element with a placeholder comment.
fn degrade<'a>(location: SourceLocation, ctx: &mut TransformContext<'a>) -> Continuation {
    let id = ctx.ir.ast.alloc(AstNode::Comment(SourceNode {
        source: "v-for",
        location,
    }));
    ctx.replace_node(id);
    Continuation::Done
}

// check <template v-for> key placement
fn check_template_v_for_key(id: NodeId, ctx: &TransformContext) {
    let elem = match ctx.ir.ast.element(id) {
        Some(e) if e.tag_type == ElementType::Template => e,
        _ => return,
    };
    let first_wrong = elem
        .children
        .iter()
        .filter_map(|&child| ctx.ir.ast.element(child))
        .find_map(|child| find_prop(child, "key"));
    if let Some(wrong) = first_wrong {
        let loc = match wrong {
            crate::parser::ElemProp::Attr(a) => &a.location,
            crate::parser::ElemProp::Dir(d) => &d.location,
        };
        ctx.emit(ErrorKind::VForTemplateKeyPlacement, loc);
    }
}

/// Names bound by one alias pattern, e.g. `{ a, b: [c] }` binds a and c.
fn alias_names(pat: &str) -> Vec<&str> {
    if pat.is_empty() {
        return vec![];
    }
    if is_simple_identifier(VStr::raw(pat)) {
        return vec![pat];
    }
    // parse the pattern as an arrow parameter, `(` shifts offsets by one
    let wrapped = format!("({}) => 0", pat);
    let expr = match parse_js_expr(&wrapped) {
        Some(expr) => expr,
        None => return vec![],
    };
    collect_local_names(&expr)
        .into_iter()
        .filter(|r| r.start >= 1 && r.end <= pat.len() + 1)
        .map(|r| &pat[r.start - 1..r.end - 1])
        .collect()
}

#[derive(Debug)]
struct ParsedFor<'a> {
    source: &'a str,
    value: Option<&'a str>,
    key: Option<&'a str>,
    index: Option<&'a str>,
}

const PARENS: &[char] = &['(', ')'];

fn parse_for_expr(expr: &str) -> Option<ParsedFor> {
    // split source and binding
    let (lhs, rhs) = expr
        .split_once(" in ")
        .or_else(|| expr.split_once(" of "))
        .map(|(l, r)| (l.trim().trim_matches(PARENS), r.trim()))?;
    if rhs.is_empty() {
        return None;
    }
    let non_empty = |s: &str| !s.is_empty();
    let (val, key, idx) = split_v_for_iter(lhs);
    Some(ParsedFor {
        source: rhs,
        value: Some(val).filter(|s| non_empty(s)),
        key: key.filter(|s| non_empty(s)),
        index: idx.filter(|s| non_empty(s)),
    })
}

const DESTRUCTING: &[char] = &['}', ']'];
fn split_v_for_iter(mut lhs: &str) -> (&str, Option<&str>, Option<&str>) {
    let mut split = SmallVec::<[&str; 3]>::new();
    while let Some((pre, post)) = lhs.rsplit_once(',') {
        if post.contains(DESTRUCTING) || split.len() == 2 {
            break;
        }
        lhs = pre;
        split.push(post.trim());
    }
    split.push(lhs.trim());
    split.reverse();
    match split.len() {
        2 => (split[0], Some(split[1]), None),
        3 => (split[0], Some(split[1]), Some(split[2])),
        _ => (split[0], None, None),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transformer::test::{base_transform, transform_errors};

    fn check_equal(src: &str, expect: (&str, Option<&str>, Option<&str>, Option<&str>)) {
        let ret = parse_for_expr(src).expect("should parse");
        assert_eq!(ret.source, expect.0);
        assert_eq!(ret.value, expect.1);
        assert_eq!(ret.key, expect.2);
        assert_eq!(ret.index, expect.3);
    }

    #[test]
    fn test_parse_for_expr() {
        for &(src, expect) in &[
            ("a in [123]", ("[123]", Some("a"), None, None)),
            ("   in [123]", ("[123]", None, None, None)),
            ("   a      in     [123]    ", ("[123]", Some("a"), None, None)),
            ("a, b, c   in p ", ("p", Some("a"), Some("b"), Some("c"))),
            ("{a, b, c} in p ", ("p", Some("{a, b, c}"), None, None)),
            ("{a, b}, c in p ", ("p", Some("{a, b}"), Some("c"), None)),
            ("(a,b) of p ", ("p", Some("a"), Some("b"), None)),
            ("(,k) in p ", ("p", None, Some("k"), None)),
        ] {
            check_equal(src, expect);
        }
    }

    #[test]
    fn test_parse_invalid_for() {
        for src in &["", "           in             ", "a", "a in   "] {
            assert!(parse_for_expr(src).is_none());
        }
    }

    #[test]
    fn test_alias_names() {
        assert_eq!(alias_names("item"), vec!["item"]);
        assert_eq!(alias_names("[x, y]"), vec!["x", "y"]);
    }

    #[test]
    fn test_for_codegen() {
        let ir = base_transform(r#"<div v-for="(item, i) in list">{{ item }}</div>"#);
        let id = ir.ast.children[0];
        assert!(matches!(ir.ast.node(id), AstNode::For(f) if f.value == Some("item")));
        match ir.codegen.get(id) {
            Some(CodegenNode::ForExpr {
                source: Js::Ctx("list"),
                params,
                is_stable: false,
                fragment_flag,
                body,
            }) => {
                assert_eq!(*fragment_flag, PatchFlag::UNKEYED_FRAGMENT);
                assert!(matches!(params.key, Some(Js::Param("i"))));
                let body = ir.codegen.get(*body).and_then(|n| n.as_vnode()).unwrap();
                assert!(body.is_block);
            }
            n => panic!("wrong codegen {:?}", n),
        }
    }

    #[test]
    fn test_keyed_and_stable() {
        let ir = base_transform(r#"<p v-for="i in list" :key="i"/>"#);
        let flag = match ir.codegen.get(ir.ast.children[0]) {
            Some(CodegenNode::ForExpr { fragment_flag, .. }) => *fragment_flag,
            _ => panic!("not for"),
        };
        assert_eq!(flag, PatchFlag::KEYED_FRAGMENT);
        let ir = base_transform(r#"<p v-for="i in 10">{{ i }}</p>"#);
        match ir.codegen.get(ir.ast.children[0]) {
            Some(CodegenNode::ForExpr {
                is_stable,
                fragment_flag,
                ..
            }) => {
                assert!(*is_stable);
                assert_eq!(*fragment_flag, PatchFlag::STABLE_FRAGMENT);
            }
            _ => panic!("not for"),
        }
    }

    #[test]
    fn test_scope_ends_with_subtree() {
        let ir = base_transform(r#"<div><p v-for="item in list">{{ item }}</p>{{ item }}</div>"#);
        let div = ir.ast.element(ir.ast.children[0]).unwrap();
        let text = ir.codegen.get(div.children[1]).unwrap();
        match text {
            CodegenNode::TextCall(t) => {
                assert!(matches!(&t.texts[0], Js::Call(_, args) if matches!(args[0], Js::Ctx("item"))));
            }
            n => panic!("wrong codegen {:?}", n),
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(transform_errors("<p v-for/>"), vec![ErrorKind::VForNoExpression]);
        assert_eq!(
            transform_errors(r#"<p v-for="items"/>"#),
            vec![ErrorKind::VForMalformedExpression]
        );
        let ir = base_transform(r#"<p v-for="items"/>"#);
        assert!(matches!(ir.ast.node(ir.ast.children[0]), AstNode::Comment(_)));
        assert_eq!(
            transform_errors(r#"<template v-for="i in l"><p :key="i"/></template>"#),
            vec![ErrorKind::VForTemplateKeyPlacement]
        );
    }
}
