//! v-once / v-memo / cached handlers
//! Slots are numbered in one pre-order walk: a node's own mark first,
//! then its handlers, then its children.
use crate::{
    flags::RuntimeHelper as RH,
    ir::{
        CacheKind, CacheMark, CacheSlot, CodegenNode, IrRoot, JsExpr as Js, SlotKind, VNodeCall,
    },
    parser::{AstNode, NodeId},
};

pub fn inject_cache(ir: &mut IrRoot) {
    let children = ir.ast.children.clone();
    for child in children {
        visit(ir, child, None);
    }
}

fn visit(ir: &mut IrRoot, id: NodeId, parent: Option<NodeId>) {
    if let Some(mark) = ir.cache_marks.get(&id).copied() {
        wrap_node(ir, id, mark, parent);
    }
    cache_handlers(ir, id);
    for child in ir.ast.node(id).child_ids() {
        visit(ir, child, Some(id));
    }
}

fn wrap_node(ir: &mut IrRoot, id: NodeId, mark: CacheMark, parent: Option<NodeId>) {
    let mut inner = match ir.codegen.take(id) {
        Some(CodegenNode::CacheExpr { slot, kind, inner }) => {
            ir.codegen.set(id, CodegenNode::CacheExpr { slot, kind, inner });
            return;
        }
        Some(node) => node,
        None => return,
    };
    let in_v_for = matches!(parent.map(|p| ir.ast.node(p)), Some(AstNode::For(_)));
    let (kind, slot_kind) = match mark {
        CacheMark::Once => {
            if let Some(v) = inner.as_vnode_mut() {
                v.is_block = false;
            }
            (CacheKind::Once, SlotKind::Once)
        }
        CacheMark::Memo => {
            let expr = ir.memo_deps.get(&id).cloned().unwrap_or_default();
            let key = inner.as_vnode().and_then(item_key);
            if let Some(v) = inner.as_vnode_mut() {
                if !v.is_component {
                    v.is_block = true;
                }
            }
            let kind = if in_v_for {
                CacheKind::MemoInVFor { expr, key }
            } else {
                CacheKind::Memo(expr)
            };
            (kind, SlotKind::Memo)
        }
    };
    let slot = ir.cache_slots.len();
    ir.cache_slots.push(CacheSlot {
        kind: slot_kind,
        node: id,
    });
    ir.codegen.set(
        id,
        CodegenNode::CacheExpr {
            slot,
            kind,
            inner: Box::new(inner),
        },
    );
}

/// value of the `key` prop, looked up in merged props too
fn item_key<'a>(v: &VNodeCall<'a>) -> Option<Js<'a>> {
    fn find<'a>(e: &Js<'a>) -> Option<Js<'a>> {
        match e {
            Js::Props(ps) => ps
                .iter()
                .find(|(k, _)| k.static_key().as_deref() == Some("key"))
                .map(|(_, v)| v.clone()),
            Js::Call(RH::MergeProps, args) => args.iter().find_map(find),
            _ => None,
        }
    }
    find(v.props.as_ref()?)
}

fn cache_handlers(ir: &mut IrRoot, id: NodeId) {
    let IrRoot {
        codegen,
        cache_slots,
        ..
    } = ir;
    let vnode = match codegen.get_mut(id) {
        Some(CodegenNode::VNodeCall(v)) => v,
        Some(CodegenNode::CacheExpr { inner, .. }) => match inner.as_vnode_mut() {
            Some(v) => v,
            None => return,
        },
        _ => return,
    };
    if let Some(props) = vnode.props.as_mut() {
        assign_slots(props, id, cache_slots);
    }
}

fn assign_slots(e: &mut Js, node: NodeId, slots: &mut Vec<CacheSlot>) {
    match e {
        Js::Handler(h) => {
            if h.cacheable && h.cache_slot.is_none() {
                h.cache_slot = Some(slots.len());
                slots.push(CacheSlot {
                    kind: SlotKind::Handler,
                    node,
                });
            }
        }
        Js::Props(ps) => {
            for (_, v) in ps.iter_mut() {
                assign_slots(v, node, slots);
            }
        }
        Js::Call(_, args) | Js::Array(args) | Js::Compound(args) => {
            for arg in args.iter_mut() {
                assign_slots(arg, node, slots);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transformer::{
        test::{base_transform, transform_with},
        TransformOption,
    };

    fn cache_expr<'a, 'b>(ir: &'b IrRoot<'a>, id: NodeId) -> (usize, &'b CacheKind<'a>) {
        match ir.codegen.get(id) {
            Some(CodegenNode::CacheExpr { slot, kind, .. }) => (*slot, kind),
            n => panic!("not cache {:?}", n),
        }
    }

    #[test]
    fn test_once_root() {
        let ir = base_transform("<div v-once>{{ heavy() }}</div>");
        let (slot, kind) = cache_expr(&ir, ir.ast.children[0]);
        assert_eq!(slot, 0);
        assert!(matches!(kind, CacheKind::Once));
        assert_eq!(ir.cache_size(), 1);
    }

    #[test]
    fn test_memo_in_v_for() {
        let ir = base_transform(r#"<div v-for="item in list" :key="item.id" v-memo="[item.ok]"/>"#);
        let item = match ir.ast.node(ir.ast.children[0]) {
            AstNode::For(f) => f.child,
            _ => panic!("not for"),
        };
        let (_, kind) = cache_expr(&ir, item);
        assert!(matches!(kind, CacheKind::MemoInVFor { key: Some(_), .. }));
        match ir.codegen.get(item) {
            Some(CodegenNode::CacheExpr { inner, .. }) => {
                assert!(inner.as_vnode().unwrap().is_block)
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_slot_order() {
        let option = TransformOption {
            cache_bindings: true,
            hoist_static: true,
        };
        let src = r#"<div @click="a"><p v-once>{{ b }}</p><i @click="c"></i></div>"#;
        let ir = transform_with(src, option);
        let kinds: Vec<_> = ir.cache_slots.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SlotKind::Handler, SlotKind::Once, SlotKind::Handler]);
    }

    #[test]
    fn test_rerun_keeps_slots() {
        let option = TransformOption {
            cache_bindings: true,
            hoist_static: false,
        };
        let mut ir = transform_with(r#"<div v-once @click="a"></div><p @click="b"/>"#, option);
        assert_eq!(ir.cache_size(), 2);
        inject_cache(&mut ir);
        assert_eq!(ir.cache_size(), 2);
    }
}
