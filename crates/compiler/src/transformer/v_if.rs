//! v-if/v-else-if/v-else grouping.
//!
//! Enter on a `v-if` element absorbs the following `v-else-if`/`v-else`
//! siblings into one `If` node, so the siblings are never visited on
//! their own. Whitespace text and comments between branches are dropped.
//! Exit builds the nested conditional once every branch is transformed.
use super::{Continuation, TransformContext, TransformPass};
use crate::{
    error::{CompilationError, CompilationErrorKind as ErrorKind},
    flags::RuntimeHelper as RH,
    ir::{Alternate, CodegenNode, JsExpr as Js, Prop},
    parser::{AstNode, AttributeValue, ElemProp, IfBranch, IfNode, NodeId},
    util::{find_dir, find_prop, has_dir, take_dir, VStr},
};
use rustc_hash::FxHashSet;

pub struct VIf;

impl<'a> TransformPass<'a> for VIf {
    fn name(&self) -> &'static str {
        "v_if"
    }
    fn enter(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) -> Continuation {
        let elem = match ctx.ir.ast.element(id) {
            Some(e) => e,
            None => return Continuation::Done,
        };
        if has_dir(elem, "if") {
            group_branches(id, ctx);
            return Continuation::Exit;
        }
        if let Some(dir) = find_dir(elem, ["else-if", "else"]) {
            let error =
                CompilationError::new(ErrorKind::VElseNoAdjacentIf).with_location(dir.location.clone());
            ctx.emit_error(error);
            ctx.remove_node();
        }
        Continuation::Done
    }

    fn exit(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) {
        let branches = match ctx.ir.ast.node(id) {
            AstNode::If(i) => i.branches.clone(),
            _ => return,
        };
        for branch in &branches {
            inject_branch_key(branch, ctx);
        }
        let mut alternate = Alternate::Comment;
        for branch in branches.iter().rev() {
            alternate = match &branch.condition {
                None => Alternate::Node(branch.child),
                Some(cond) => {
                    let test = ctx.process_expression(cond.content.raw, &cond.location);
                    Alternate::Conditional(Box::new(CodegenNode::ConditionalExpr {
                        test,
                        consequent: branch.child,
                        alternate,
                    }))
                }
            };
        }
        if let Alternate::Conditional(node) = alternate {
            ctx.ir.codegen.set(id, *node);
        }
    }
}

/// Default branch keys continue after the branches of earlier
/// `If` siblings in the same parent.
fn next_key(ctx: &TransformContext) -> usize {
    ctx.siblings()[..ctx.cursor_index()]
        .iter()
        .map(|&s| match ctx.ir.ast.node(s) {
            AstNode::If(i) => i.branches.len(),
            _ => 0,
        })
        .sum()
}

fn take_condition<'a>(
    id: NodeId,
    name: &str,
    ctx: &mut TransformContext<'a>,
) -> Option<AttributeValue<'a>> {
    let dir = ctx.ir.ast.element_mut(id).and_then(|e| take_dir(e, name))?;
    if let Some(error) = dir.check_empty_expr(ErrorKind::VIfNoExpression) {
        let location = error.location.clone();
        ctx.emit_error(error);
        return Some(AttributeValue {
            content: VStr::raw("true"),
            location,
        });
    }
    dir.expression
}

fn group_branches(id: NodeId, ctx: &mut TransformContext) {
    let mut key = next_key(ctx);
    let location = ctx.ir.ast.node(id).get_location().clone();
    let condition = take_condition(id, "if", ctx);
    let mut branches = vec![IfBranch {
        condition,
        child: id,
        key,
        location: location.clone(),
    }];
    let mut skipped = 0;
    loop {
        let next = match ctx.siblings().get(ctx.cursor_index() + 1 + skipped) {
            Some(&n) => n,
            None => break,
        };
        let is_else = match ctx.ir.ast.node(next) {
            AstNode::Text(t) if t.is_all_whitespace() => {
                skipped += 1;
                continue;
            }
            AstNode::Comment(_) => {
                skipped += 1;
                continue;
            }
            AstNode::Element(e) if has_dir(e, "else-if") => false,
            AstNode::Element(e) if has_dir(e, "else") => true,
            _ => break,
        };
        for _ in 0..=skipped {
            ctx.remove_next_sibling(1);
        }
        skipped = 0;
        key += 1;
        let condition = if is_else {
            if let Some(e) = ctx.ir.ast.element_mut(next) {
                take_dir(e, "else");
            }
            None
        } else {
            take_condition(next, "else-if", ctx)
        };
        branches.push(IfBranch {
            condition,
            child: next,
            key,
            location: ctx.ir.ast.node(next).get_location().clone(),
        });
        if is_else {
            break;
        }
    }
    check_same_key(&branches, ctx);
    let location = branches
        .last()
        .map_or(location.clone(), |b| location.merge(&b.location));
    let if_id = ctx.ir.ast.alloc(AstNode::If(IfNode {
        branches,
        location,
    }));
    ctx.replace_node(if_id);
}

fn check_same_key(branches: &[IfBranch], ctx: &TransformContext) {
    let mut attrs = FxHashSet::default();
    let mut dirs = FxHashSet::default();
    for branch in branches {
        let elem = match ctx.ir.ast.element(branch.child) {
            Some(e) => e,
            None => continue,
        };
        let (value, seen) = match find_prop(elem, "key") {
            Some(ElemProp::Attr(attr)) => (attr.value.as_ref(), &mut attrs),
            Some(ElemProp::Dir(dir)) => (dir.expression.as_ref(), &mut dirs),
            None => continue,
        };
        if let Some(v) = value {
            if !seen.insert(v.content.raw) {
                ctx.emit(ErrorKind::VIfSameKey, &v.location);
            }
        }
    }
}

fn inject_branch_key(branch: &IfBranch, ctx: &mut TransformContext) {
    let has_user_key = ctx
        .ir
        .ast
        .element(branch.child)
        .map_or(false, |e| find_prop(e, "key").is_some());
    let vnode = match ctx.ir.codegen.get_mut(branch.child) {
        Some(CodegenNode::VNodeCall(v)) => v,
        _ => return,
    };
    vnode.is_block = true;
    if has_user_key {
        return;
    }
    let key_prop: Prop = (Js::str_lit("key"), Js::Num(branch.key));
    vnode.props = Some(match vnode.props.take() {
        None => Js::Props(vec![key_prop]),
        Some(Js::Props(mut props)) => {
            props.insert(0, key_prop);
            Js::Props(props)
        }
        Some(Js::Call(RH::MergeProps, mut args)) => {
            match args.first_mut() {
                Some(Js::Props(props)) => props.insert(0, key_prop),
                _ => args.insert(0, Js::Props(vec![key_prop])),
            }
            Js::Call(RH::MergeProps, args)
        }
        Some(other) => Js::Call(RH::MergeProps, vec![Js::Props(vec![key_prop]), other]),
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transformer::test::{base_transform, transform_errors};

    fn if_node<'a, 'b>(ir: &'b crate::ir::IrRoot<'a>, i: usize) -> &'b IfNode<'a> {
        match ir.ast.node(ir.ast.children[i]) {
            AstNode::If(n) => n,
            n => panic!("not an if node: {:?}", n),
        }
    }

    #[test]
    fn test_group_branches() {
        let ir = base_transform(
            r#"<p v-if="a"/>
            <!-- comment -->
            <p v-else-if="b"/> <p v-else/>"#,
        );
        assert_eq!(ir.ast.children.len(), 1);
        let n = if_node(&ir, 0);
        assert_eq!(n.branches.len(), 3);
        assert!(n.branches[2].condition.is_none());
        let keys: Vec<_> = n.branches.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec![0, 1, 2]);
    }

    #[test]
    fn test_conditional_codegen() {
        let ir = base_transform(r#"<p v-if="a"/><i v-else-if="b"/>"#);
        let id = ir.ast.children[0];
        let (consequent, alternate) = match ir.codegen.get(id) {
            Some(CodegenNode::ConditionalExpr {
                test: Js::Ctx("a"),
                consequent,
                alternate,
            }) => (*consequent, alternate),
            n => panic!("wrong codegen {:?}", n),
        };
        let vnode = ir.codegen.get(consequent).and_then(|n| n.as_vnode()).unwrap();
        assert!(vnode.is_block);
        assert!(matches!(&vnode.props, Some(Js::Props(p)) if matches!(p[0].1, Js::Num(0))));
        match alternate {
            Alternate::Conditional(inner) => {
                assert!(matches!(
                    **inner,
                    CodegenNode::ConditionalExpr {
                        alternate: Alternate::Comment,
                        ..
                    }
                ));
            }
            _ => panic!("should nest"),
        }
    }

    #[test]
    fn test_key_continues_across_groups() {
        let ir = base_transform(r#"<p v-if="a"/><p v-else/><p v-if="b"/>"#);
        assert_eq!(ir.ast.children.len(), 2);
        assert_eq!(if_node(&ir, 1).branches[0].key, 2);
    }

    #[test]
    fn test_text_stops_group() {
        let ir = base_transform(r#"<p v-if="a"/>text<p v-else/>"#);
        assert_eq!(ir.ast.children.len(), 2);
        let errors = transform_errors(r#"<p v-if="a"/>text<p v-else/>"#);
        assert_eq!(errors, vec![ErrorKind::VElseNoAdjacentIf]);
    }

    #[test]
    fn test_errors() {
        let errors = transform_errors(r#"<p v-else/>"#);
        assert_eq!(errors, vec![ErrorKind::VElseNoAdjacentIf]);
        let ir = base_transform(r#"<p v-else/>"#);
        assert!(ir.ast.children.is_empty());
        let errors = transform_errors(r#"<p v-if/>"#);
        assert_eq!(errors, vec![ErrorKind::VIfNoExpression]);
        let errors = transform_errors(r#"<p v-if="a" key="x"/><p v-else key="x"/>"#);
        assert_eq!(errors, vec![ErrorKind::VIfSameKey]);
    }

    #[test]
    fn test_user_key_kept() {
        let ir = base_transform(r#"<p v-if="a" :key="k"/>"#);
        let n = if_node(&ir, 0);
        let vnode = ir.codegen.get(n.branches[0].child).and_then(|n| n.as_vnode()).unwrap();
        match &vnode.props {
            Some(Js::Props(p)) => {
                assert_eq!(p.len(), 1);
                assert!(matches!(p[0].1, Js::Ctx("k")));
            }
            p => panic!("wrong props {:?}", p),
        }
    }
}
