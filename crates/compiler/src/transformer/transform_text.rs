//! Merges adjacent text and interpolation children into one `TextCall`.
//! The first node of a run keeps the call, the rest leave the children list.
use super::{Continuation, TransformContext, TransformPass};
use crate::{
    flags::{RuntimeHelper as RH, StaticLevel},
    ir::{CodegenNode, JsExpr as Js, TextCall},
    parser::{AstNode, ElementType, NodeId},
    util::VStr,
};
use smallvec::SmallVec;

pub struct TransformText;

impl<'a> TransformPass<'a> for TransformText {
    fn name(&self) -> &'static str {
        "transform_text"
    }
    fn enter(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) -> Continuation {
        match ctx.ir.ast.node(id) {
            AstNode::Element(_) => Continuation::Exit,
            _ => Continuation::Done,
        }
    }
    fn exit(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) {
        merge_children(Some(id), ctx);
    }
    fn exit_root(&mut self, ctx: &mut TransformContext<'a>) {
        merge_children(None, ctx);
    }
}

fn is_text_like(n: &AstNode) -> bool {
    matches!(n, AstNode::Text(_) | AstNode::Interpolation(_))
}

fn merge_children<'a>(parent: Option<NodeId>, ctx: &mut TransformContext<'a>) {
    let ast = &ctx.ir.ast;
    let (children, fast_parent) = match parent {
        None => (ast.children.clone(), true),
        Some(p) => match ast.element(p) {
            // component children are slots and fragments need vnodes
            Some(e) => (e.children.clone(), e.tag_type == ElementType::Plain),
            None => return,
        },
    };
    if !children.iter().any(|c| is_text_like(ast.node(*c))) {
        return;
    }
    let mut kept = Vec::with_capacity(children.len());
    let mut runs: Vec<Vec<NodeId>> = vec![];
    let mut run = vec![];
    for id in children {
        if is_text_like(ctx.ir.ast.node(id)) {
            run.push(id);
            continue;
        }
        if !run.is_empty() {
            kept.push(run[0]);
            runs.push(std::mem::take(&mut run));
        }
        kept.push(id);
    }
    if !run.is_empty() {
        kept.push(run[0]);
        runs.push(run);
    }
    let fast_path = fast_parent && kept.len() == 1;
    for run in runs {
        let texts: SmallVec<[Js<'a>; 1]> = run.iter().map(|id| text_part(*id, ctx)).collect();
        let need_patch = texts
            .iter()
            .any(|t| t.static_level() == StaticLevel::NotStatic);
        let call = TextCall {
            fast_path,
            need_patch,
            texts,
        };
        ctx.ir.codegen.set(run[0], CodegenNode::TextCall(call));
    }
    match parent {
        None => ctx.ir.ast.children = kept,
        Some(p) => {
            if let Some(e) = ctx.ir.ast.element_mut(p) {
                e.children = kept;
            }
        }
    }
}

fn text_part<'a>(id: NodeId, ctx: &TransformContext<'a>) -> Js<'a> {
    match ctx.ir.ast.node(id) {
        AstNode::Text(t) => Js::StrLit(t.text),
        AstNode::Interpolation(s) if s.source.trim().is_empty() => Js::StrLit(VStr::raw("")),
        AstNode::Interpolation(s) => {
            let exp = ctx.process_expression(s.source, &s.location);
            Js::Call(RH::ToDisplayString, vec![exp])
        }
        _ => Js::str_lit(""),
    }
}
