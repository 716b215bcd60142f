//! v-once renders the subtree once and caches it.
//! The mark is placed on the node that ends up in the slot, so
//! `v-if`/`v-for` on the same element are cached as a whole.
use super::{Continuation, TransformContext, TransformPass};
use crate::{ir::CacheMark, parser::NodeId, util::has_dir};

pub struct VOnce;

impl<'a> TransformPass<'a> for VOnce {
    fn name(&self) -> &'static str {
        "v_once"
    }
    fn enter(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) -> Continuation {
        let has_once = ctx.ir.ast.element(id).map_or(false, |e| has_dir(e, "once"));
        // nested v-once is already covered by the outer cache
        if !has_once || ctx.in_v_once() {
            return Continuation::Done;
        }
        ctx.enter_once(id);
        Continuation::Exit
    }
    fn exit(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) {
        ctx.ir.cache_marks.insert(id, CacheMark::Once);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{parser::AstNode, transformer::test::base_transform};

    #[test]
    fn test_mark_element() {
        let ir = base_transform("<div v-once>{{ a }}</div>");
        let id = ir.ast.children[0];
        assert_eq!(ir.cache_marks.get(&id), Some(&CacheMark::Once));
    }

    #[test]
    fn test_mark_structural_node() {
        let ir = base_transform(r#"<div v-if="a" v-once/><p v-for="i in l" v-once/>"#);
        assert_eq!(ir.cache_marks.len(), 2);
        for id in &ir.ast.children {
            assert!(matches!(ir.ast.node(*id), AstNode::If(_) | AstNode::For(_)));
            assert_eq!(ir.cache_marks.get(id), Some(&CacheMark::Once));
        }
    }

    #[test]
    fn test_nested_once() {
        let ir = base_transform("<div v-once><p v-once>{{ a }}</p></div>");
        assert_eq!(ir.cache_marks.len(), 1);
    }
}
