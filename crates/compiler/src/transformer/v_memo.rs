//! v-memo records its dependency array. The cache injector wraps
//! the node later; inside v-for the aliases are already in scope.
use super::{Continuation, TransformContext, TransformPass};
use crate::{
    error::CompilationErrorKind as ErrorKind, ir::CacheMark, parser::NodeId, util::take_dir,
};

pub struct VMemo;

impl<'a> TransformPass<'a> for VMemo {
    fn name(&self) -> &'static str {
        "v_memo"
    }
    fn enter(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) -> Continuation {
        let dir = match ctx.ir.ast.element_mut(id).and_then(|e| take_dir(e, "memo")) {
            Some(dir) => dir,
            None => return Continuation::Done,
        };
        if let Some(error) = dir.check_empty_expr(ErrorKind::VMemoNoExpression) {
            ctx.emit_error(error);
            return Continuation::Done;
        }
        if ctx.in_v_once() {
            return Continuation::Done;
        }
        let (raw, loc) = match &dir.expression {
            Some(v) => (v.content.raw, v.location.clone()),
            None => return Continuation::Done,
        };
        let deps = ctx.process_expression(raw, &loc);
        ctx.ir.memo_deps.insert(id, deps);
        ctx.ir.cache_marks.entry(id).or_insert(CacheMark::Memo);
        Continuation::Done
    }
}
