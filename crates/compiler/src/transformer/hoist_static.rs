//! hoist static element like `<div class="static">static text</div>`
//! to a top level const. This improves runtime performance by reducing dom diffing.
//!
//! Static levels are computed post-order and memoized, then maximal
//! static subtrees are extracted pre-order. `If`/`For` subtrees and
//! nodes marked for caching are never entered.
use crate::{
    flags::{PatchFlag, StaticLevel},
    ir::{CodegenNode, IrRoot},
    parser::{AstNode, ElementType, NodeId},
};
use rustc_hash::FxHashMap;

pub fn hoist_static(ir: &mut IrRoot) {
    let mut hoister = HoistStatic::default();
    let children = ir.ast.children.clone();
    for child in children {
        hoister.walk(ir, child);
    }
}

#[derive(Default)]
struct HoistStatic {
    levels: FxHashMap<NodeId, StaticLevel>,
}

impl HoistStatic {
    fn walk(&mut self, ir: &mut IrRoot, id: NodeId) {
        if ir.cache_marks.contains_key(&id) {
            return;
        }
        let children = match ir.ast.node(id) {
            AstNode::Element(e) => e.children.clone(),
            // If/For are dynamic by nature and never entered
            _ => return,
        };
        if self.static_level(ir, id) >= StaticLevel::CanHoist {
            hoist(ir, id);
            return;
        }
        for child in children {
            self.walk(ir, child);
        }
    }

    fn static_level(&mut self, ir: &IrRoot, id: NodeId) -> StaticLevel {
        if let Some(level) = self.levels.get(&id) {
            return *level;
        }
        let level = self.compute_level(ir, id);
        self.levels.insert(id, level);
        level
    }

    fn compute_level(&mut self, ir: &IrRoot, id: NodeId) -> StaticLevel {
        use StaticLevel as S;
        if ir.cache_marks.contains_key(&id) {
            return S::NotStatic;
        }
        match (ir.ast.node(id), ir.codegen.get(id)) {
            (AstNode::Element(e), Some(CodegenNode::VNodeCall(v))) => {
                if e.tag_type != ElementType::Plain || v.is_component {
                    return S::NotStatic;
                }
                if !v.patch_flag.is_empty() || !v.directives.is_empty() {
                    return S::NotStatic;
                }
                let mut level = v.props.as_ref().map_or(S::CanStringify, |p| p.static_level());
                for child in &v.children {
                    if level == S::NotStatic {
                        break;
                    }
                    level = level.min(self.static_level(ir, *child));
                }
                level
            }
            (AstNode::Text(_), Some(CodegenNode::TextCall(t)))
            | (AstNode::Interpolation(_), Some(CodegenNode::TextCall(t))) => t
                .texts
                .iter()
                .map(|t| t.static_level())
                .min()
                .unwrap_or(S::CanStringify),
            (AstNode::Comment(_), _) => S::CanStringify,
            // already hoisted, cached, or structural
            _ => S::NotStatic,
        }
    }
}

fn hoist(ir: &mut IrRoot, id: NodeId) {
    let mut vnode = match ir.codegen.take(id) {
        Some(CodegenNode::VNodeCall(v)) => v,
        Some(other) => {
            ir.codegen.set(id, other);
            return;
        }
        None => return,
    };
    vnode.patch_flag = PatchFlag::HOISTED;
    vnode.is_block = false;
    ir.hoists.push(CodegenNode::VNodeCall(vnode));
    ir.codegen.set(id, CodegenNode::HoistRef(ir.hoists.len() - 1));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transformer::test::{base_transform, transform_with};
    use crate::transformer::TransformOption;

    fn hoist_ref(ir: &IrRoot, id: NodeId) -> Option<usize> {
        match ir.codegen.get(id) {
            Some(CodegenNode::HoistRef(i)) => Some(*i),
            _ => None,
        }
    }

    #[test]
    fn test_hoist_root_element() {
        let ir = base_transform(r#"<div class="a"></div>"#);
        assert_eq!(ir.hoists.len(), 1);
        assert_eq!(hoist_ref(&ir, ir.ast.children[0]), Some(0));
        let v = ir.hoists[0].as_vnode().unwrap();
        assert_eq!(v.patch_flag, PatchFlag::HOISTED);
        assert!(!v.is_block);
    }

    #[test]
    fn test_not_hoist_dynamic() {
        let ir = base_transform("<div>{{ msg }}</div>");
        assert!(ir.hoists.is_empty());
        let ir = base_transform(r#"<div :id="a"></div>"#);
        assert!(ir.hoists.is_empty());
        let ir = base_transform("<comp/>");
        assert!(ir.hoists.is_empty());
        let ir = base_transform("<div v-foo></div>");
        assert!(ir.hoists.is_empty());
    }

    #[test]
    fn test_hoist_maximal_subtree() {
        let ir = base_transform(r#"<div :id="a"><p><b>x</b></p><span>{{ a }}</span></div>"#);
        assert_eq!(ir.hoists.len(), 1);
        let div = ir.ast.element(ir.ast.children[0]).unwrap();
        assert_eq!(hoist_ref(&ir, div.children[0]), Some(0));
        assert_eq!(hoist_ref(&ir, div.children[1]), None);
    }

    #[test]
    fn test_skip_structural_and_cached() {
        let ir = base_transform(r#"<div v-if="ok"><p>static</p></div>"#);
        assert!(ir.hoists.is_empty());
        let ir = base_transform(r#"<ul><li v-for="i in l"><p>static</p></li></ul>"#);
        assert!(ir.hoists.is_empty());
        let ir = base_transform("<div v-once><p>static</p></div>");
        assert!(ir.hoists.is_empty());
    }

    #[test]
    fn test_rerun_is_stable() {
        let mut ir = base_transform(r#"<div :id="a"><p>x</p><i>y</i></div>"#);
        assert_eq!(ir.hoists.len(), 2);
        hoist_static(&mut ir);
        assert_eq!(ir.hoists.len(), 2);
    }

    #[test]
    fn test_option_off() {
        let option = TransformOption {
            hoist_static: false,
            ..Default::default()
        };
        let ir = transform_with(r#"<div class="a"></div>"#, option);
        assert!(ir.hoists.is_empty());
    }
}
