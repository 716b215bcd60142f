//! Builds the `VNodeCall` of elements on exit, when children,
//! text merging and structural passes are done. Also creates the
//! root codegen on root exit.
use super::{
    build_props::{build_props, BuildProps},
    Continuation, TransformContext, TransformPass,
};
use crate::{
    flags::{PatchFlag, RuntimeHelper as RH, StaticLevel},
    ir::{CodegenNode, JsExpr as Js, RootCodegen, VNodeCall},
    parser::{AstNode, Directive, ElemProp, Element, ElementType, NodeId},
    util::{find_prop, get_core_component, is_component_tag, VStr},
};

pub struct TransformElement;

impl<'a> TransformPass<'a> for TransformElement {
    fn name(&self) -> &'static str {
        "transform_element"
    }
    fn enter(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) -> Continuation {
        match ctx.ir.ast.node(id) {
            AstNode::Comment(c) => {
                let source = c.source;
                ctx.ir.codegen.set(id, CodegenNode::CommentCall(source));
                Continuation::Done
            }
            AstNode::Element(_) => Continuation::Exit,
            _ => Continuation::Done,
        }
    }

    fn exit(&mut self, id: NodeId, ctx: &mut TransformContext<'a>) {
        let elem = match ctx.ir.ast.element(id) {
            Some(e) => e.clone(),
            None => return,
        };
        let vnode = if elem.tag_type == ElementType::Template {
            convert_template(&elem, ctx)
        } else {
            convert_element(&elem, ctx)
        };
        ctx.ir.codegen.set(id, CodegenNode::VNodeCall(vnode));
    }

    fn exit_root(&mut self, ctx: &mut TransformContext<'a>) {
        let children = ctx.ir.ast.children.clone();
        ctx.ir.root = match children.len() {
            0 => RootCodegen::Empty,
            1 => {
                let child = children[0];
                if let Some(CodegenNode::VNodeCall(v)) = ctx.ir.codegen.get_mut(child) {
                    v.is_block = true;
                }
                RootCodegen::Single(child)
            }
            _ => RootCodegen::Fragment(VNodeCall {
                tag: Js::Symbol(RH::Fragment),
                children,
                patch_flag: PatchFlag::STABLE_FRAGMENT,
                is_block: true,
                ..VNodeCall::default()
            }),
        };
    }
}

fn convert_element<'a>(e: &Element<'a>, ctx: &mut TransformContext<'a>) -> VNodeCall<'a> {
    let tag = resolve_element_tag(e, ctx);
    let is_block = should_use_block(e, &tag);
    let raw_children = matches!(tag, Js::Symbol(RH::KeepAlive) | Js::Symbol(RH::Teleport));
    let BuildProps {
        props,
        directives,
        mut patch_flag,
        dynamic_props,
    } = build_props(ctx, e);
    patch_flag |= children_flag(e, raw_children, ctx);
    VNodeCall {
        tag,
        props,
        children: e.children.clone(),
        patch_flag,
        dynamic_props,
        directives,
        is_block,
        is_component: e.is_component(),
        raw_children,
    }
}

// template here is purely a fragment that groups elements.
fn convert_template<'a>(e: &Element<'a>, ctx: &mut TransformContext<'a>) -> VNodeCall<'a> {
    let BuildProps { props, .. } = build_props(ctx, e);
    VNodeCall {
        tag: Js::Symbol(RH::Fragment),
        props,
        children: e.children.clone(),
        patch_flag: PatchFlag::STABLE_FRAGMENT,
        ..VNodeCall::default()
    }
}

fn children_flag(e: &Element, raw_children: bool, ctx: &TransformContext) -> PatchFlag {
    if e.is_component() {
        // slot content may capture v-for aliases
        if !raw_children && !e.children.is_empty() && ctx.has_alias_in_scope() {
            return PatchFlag::DYNAMIC_SLOTS;
        }
        return PatchFlag::empty();
    }
    match e.children.as_slice() {
        [only] => match ctx.ir.codegen.get(*only) {
            Some(CodegenNode::TextCall(t)) if t.fast_path && t.need_patch => PatchFlag::TEXT,
            _ => PatchFlag::empty(),
        },
        _ => PatchFlag::empty(),
    }
}

/// Returns a expression for createVNode's first argument. It can be
/// 1. Js::Call for dynamic component
/// 2. Js::Symbol for builtin component
/// 3. Js::Simple for user component resolved at runtime
/// 4. Js::StrLit for plain element
fn resolve_element_tag<'a>(e: &Element<'a>, ctx: &mut TransformContext<'a>) -> Js<'a> {
    if e.tag_type == ElementType::Plain {
        return Js::StrLit(VStr::raw(e.tag_name));
    }
    // 1. resolve dynamic component
    if is_component_tag(e.tag_name) {
        if let Some(exp) = resolve_dynamic_component(e, ctx) {
            return Js::Call(RH::ResolveDynamicComponent, vec![exp]);
        }
    }
    // 2. built-in components (Teleport, KeepAlive, Suspense...)
    if let Some(builtin) = get_core_component(e.tag_name) {
        return Js::Symbol(builtin);
    }
    // 3. user component
    ctx.ir.add_component(VStr::raw(e.tag_name));
    Js::Simple(*VStr::raw(e.tag_name).be_component(), StaticLevel::NotStatic)
}

fn resolve_dynamic_component<'a>(e: &Element<'a>, ctx: &TransformContext<'a>) -> Option<Js<'a>> {
    match find_prop(e, "is")? {
        ElemProp::Attr(attr) => {
            let val = attr.value.as_ref()?;
            Some(Js::StrLit(val.content))
        }
        ElemProp::Dir(Directive {
            expression: Some(exp),
            ..
        }) => Some(ctx.process_expression(exp.content.raw, &exp.location)),
        ElemProp::Dir(_) => None,
    }
}

fn should_use_block<'a>(e: &Element<'a>, tag: &Js<'a>) -> bool {
    match tag {
        // dynamic component may resolve to plain element
        Js::Call(RH::ResolveDynamicComponent, _) => return true,
        // Force teleport/suspense into a block so their children
        // are not collected by a parent block.
        Js::Symbol(RH::Teleport) | Js::Symbol(RH::Suspense) => return true,
        Js::Symbol(RH::KeepAlive) => return !e.children.is_empty(),
        _ => {
            if e.is_component() {
                return false;
            }
        }
    }
    // <svg> and <foreignObject> must be forced into blocks so that block
    // updates inside get proper isSVG flag at runtime.
    e.tag_name == "svg" || e.tag_name == "foreignObject" ||
    // elements with dynamic keys should be forced into blocks
    matches!(find_prop(e, "key"), Some(ElemProp::Dir(_)))
}
