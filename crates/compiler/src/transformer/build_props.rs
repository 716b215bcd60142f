use super::{
    v_bind::transform_v_bind, v_model::transform_v_model, v_on::transform_v_on, TransformContext,
};
use crate::{
    error::CompilationErrorKind as ErrorKind,
    flags::{PatchFlag, RuntimeHelper, StaticLevel},
    ir::{JsExpr as Js, Prop, RuntimeDir},
    parser::{Attribute, Directive, DirectiveArg, ElemProp, Element},
    util::{is_bind_key, is_component_tag, is_mergeable_prop, is_reserved_prop, VStr},
};
use rustc_hash::FxHashMap;
use std::mem;

/// What a directive transform contributes to the props object.
pub enum DirectiveTransformResult<'a> {
    /// `Js::Props` is merged into the pending object,
    /// anything else is spread as a whole, e.g. `v-bind="obj"`
    Converted(Js<'a>),
    Dropped,
}

pub struct BuildProps<'a> {
    pub props: Option<Js<'a>>,
    pub directives: Vec<RuntimeDir<'a>>,
    pub patch_flag: PatchFlag,
    pub dynamic_props: Vec<Js<'a>>,
}

#[derive(Default)]
struct PropFlags {
    is_component: bool,
    has_ref: bool,
    has_class_binding: bool,
    has_style_binding: bool,
    has_hydration_event_binding: bool,
    has_dynamic_keys: bool,
    has_vnode_hook: bool,
}

#[derive(Default)]
/// collecting props object for vnode call. e.g:
/// <:prop="val" v-bind="obj"/> becomes mergeProps({prop: val}, obj)
struct PropArgs<'a> {
    /// pending properties, e.g. (prop, val)
    pending_props: Vec<Prop<'a>>,
    /// merged prop argument, e.g. obj
    merge_args: Vec<Js<'a>>,
}

#[derive(Default)]
struct CollectProps<'a> {
    prop_args: PropArgs<'a>,
    runtime_dirs: Vec<RuntimeDir<'a>>,
    /// dynamic prop names in first seen order
    dynamic_props: Vec<String>,
    prop_flags: PropFlags,
}

/// handled before props are built, or by the element itself
const BUILTIN_DIRS: &[&str] = &["once", "memo", "if", "else", "else-if", "for", "is"];

/// Props are collected in a fixed class order: static attributes and
/// v-bind in source order, then v-on, then v-model, then custom
/// directives. Output does not depend on how the classes interleave.
pub fn build_props<'a>(ctx: &mut TransformContext<'a>, e: &Element<'a>) -> BuildProps<'a> {
    let mut cp = CollectProps::default();
    cp.prop_flags.is_component = e.is_component();
    for prop in &e.properties {
        match prop {
            ElemProp::Attr(attr) => collect_attr(e, attr, &mut cp),
            ElemProp::Dir(dir) if dir.name == "bind" => {
                // skip <component :is="c"/>
                if is_bind_key(&dir.argument, "is") && is_component_tag(e.tag_name) {
                    continue;
                }
                cp.collect(transform_v_bind(dir, ctx));
            }
            _ => (),
        }
    }
    for dir in dirs_named(e, "on") {
        cp.collect(transform_v_on(dir, ctx));
    }
    for dir in dirs_named(e, "model") {
        cp.collect(transform_v_model(dir, e, ctx));
    }
    for prop in &e.properties {
        let dir = match prop {
            ElemProp::Dir(dir) => dir,
            ElemProp::Attr(_) => continue,
        };
        if matches!(dir.name, "bind" | "on" | "model") || BUILTIN_DIRS.contains(&dir.name) {
            continue;
        }
        if dir.name == "slot" {
            ctx.emit(ErrorKind::VSlotUnsupported, &dir.location);
            continue;
        }
        let runtime_dir = build_runtime_dir(dir, ctx);
        cp.runtime_dirs.push(runtime_dir);
    }
    let CollectProps {
        prop_args,
        runtime_dirs,
        dynamic_props,
        prop_flags,
    } = cp;
    let props = compute_prop_expr(prop_args);
    let patch_flag = build_patch_flag(prop_flags, &runtime_dirs, &dynamic_props);
    BuildProps {
        props,
        directives: runtime_dirs,
        patch_flag,
        dynamic_props: dynamic_props.into_iter().map(Js::OwnedLit).collect(),
    }
}

fn dirs_named<'a, 'b>(
    e: &'b Element<'a>,
    name: &'static str,
) -> impl Iterator<Item = &'b Directive<'a>> {
    e.properties.iter().filter_map(move |p| match p {
        ElemProp::Dir(dir) if dir.name == name => Some(dir),
        _ => None,
    })
}

fn collect_attr<'a>(e: &Element<'a>, attr: &Attribute<'a>, cp: &mut CollectProps<'a>) {
    let name = attr.name;
    let val = match &attr.value {
        Some(v) => v.content,
        None => VStr::raw(""),
    };
    // skip dynamic component is
    if name == "is" && (is_component_tag(e.tag_name) || val.raw.starts_with("vue:")) {
        return;
    }
    if name == "ref" {
        cp.prop_flags.has_ref = true;
    }
    cp.prop_args
        .pending_props
        .push((Js::StrLit(VStr::raw(name)), Js::StrLit(val)));
}

fn build_runtime_dir<'a>(dir: &Directive<'a>, ctx: &mut TransformContext<'a>) -> RuntimeDir<'a> {
    ctx.ir.add_directive(VStr::raw(dir.name));
    let name = Js::Simple(*VStr::raw(dir.name).be_directive(), StaticLevel::NotStatic);
    let expr = dir
        .expression
        .as_ref()
        .filter(|v| !v.content.trim().is_empty())
        .map(|v| ctx.process_expression(v.content.raw, &v.location));
    let arg = dir.argument.as_ref().map(|arg| match arg {
        DirectiveArg::Static(s) => Js::str_lit(*s),
        DirectiveArg::Dynamic(d) => ctx.process_expression(*d, &dir.head_loc),
    });
    let mods = if dir.modifiers.is_empty() {
        None
    } else {
        let props = dir
            .modifiers
            .iter()
            .map(|m| (Js::str_lit(*m), Js::Src("true")))
            .collect();
        Some(Js::Props(props))
    };
    RuntimeDir {
        name,
        expr,
        arg,
        mods,
    }
}

impl<'a> CollectProps<'a> {
    fn collect(&mut self, result: DirectiveTransformResult<'a>) {
        let value = match result {
            DirectiveTransformResult::Converted(value) => value,
            DirectiveTransformResult::Dropped => return,
        };
        if let Js::Props(props) = value {
            for p in &props {
                self.analyze_patch_flag(p);
            }
            self.prop_args.pending_props.extend(props);
            return;
        }
        flush_pending_props(&mut self.prop_args);
        // if dir returns an object, dynamic key must be true
        self.prop_flags.has_dynamic_keys = true;
        self.prop_args.merge_args.push(value);
    }

    fn analyze_patch_flag(&mut self, p: &Prop<'a>) {
        let is_component = self.prop_flags.is_component;
        let flags = &mut self.prop_flags;
        let name = match p.0.static_key() {
            Some(name) => name,
            None => return flags.has_dynamic_keys = true,
        };
        let is_event_handler = VStr::is_handler(&VStr::raw(&name));
        if !is_component &&
            is_event_handler &&
            // omit click because hydration gives click fast path
            !name.eq_ignore_ascii_case("onclick") &&
            name != "onUpdate:modelValue" && // omit v-model
            !is_reserved_prop(&name)
        // vnode hooks
        {
            flags.has_hydration_event_binding = true;
        }
        if is_event_handler && is_reserved_prop(&name) {
            flags.has_vnode_hook = true;
        }
        // cached handlers never change
        if matches!(&p.1, Js::Handler(h) if h.cacheable) {
            return;
        }
        if p.1.static_level() > StaticLevel::NotStatic {
            return;
        }
        let is_class_or_style = name == "class" || name == "style";
        match name.as_str() {
            "ref" => flags.has_ref = true,
            "class" => flags.has_class_binding = true,
            "style" => flags.has_style_binding = true,
            "key" => (),
            _ => self.add_dynamic_prop(name.clone()),
        }
        if is_component && is_class_or_style {
            self.add_dynamic_prop(name);
        }
    }

    fn add_dynamic_prop(&mut self, name: String) {
        if !self.dynamic_props.contains(&name) {
            self.dynamic_props.push(name);
        }
    }
}

fn flush_pending_props(prop_args: &mut PropArgs) {
    // flush existing props to an object
    if prop_args.pending_props.is_empty() {
        return;
    }
    let arg = mem::take(&mut prop_args.pending_props);
    let arg = dedupe_properties(arg);
    prop_args.merge_args.push(Js::Props(arg));
}

/// class, style and handlers are merged into an array, later
/// duplicates of other keys are dropped
fn dedupe_properties(props: Vec<Prop>) -> Vec<Prop> {
    let mut known_props = FxHashMap::default();
    let mut ret = vec![];
    for (key, val) in props {
        let name = match key.static_key() {
            Some(name) => name,
            None => {
                ret.push((key, val));
                continue;
            }
        };
        if let Some(&i) = known_props.get(&name) {
            if is_mergeable_prop(&name) {
                merge_as_array(&mut ret[i], val);
            }
        } else {
            known_props.insert(name, ret.len());
            ret.push((key, val));
        }
    }
    ret
}

fn merge_as_array<'a>(existing: &mut Prop<'a>, incoming: Js<'a>) {
    let val = &mut existing.1;
    if let Js::Array(arr) = val {
        arr.push(incoming);
    } else {
        let v = mem::take(val);
        *val = Js::Array(vec![v, incoming]);
    }
}

fn compute_prop_expr(mut prop_args: PropArgs) -> Option<Js> {
    flush_pending_props(&mut prop_args);
    let PropArgs {
        pending_props,
        merge_args,
    } = prop_args;
    debug_assert!(pending_props.is_empty());
    if merge_args.len() <= 1 {
        merge_args.into_iter().next()
    } else {
        Some(Js::Call(RuntimeHelper::MergeProps, merge_args))
    }
}

fn build_patch_flag(f: PropFlags, runtime_dirs: &[RuntimeDir], dynamic_names: &[String]) -> PatchFlag {
    if f.has_dynamic_keys {
        return PatchFlag::FULL_PROPS;
    }
    let mut patch_flag = PatchFlag::empty();
    let is_plain = !f.is_component;
    if f.has_class_binding && is_plain {
        patch_flag |= PatchFlag::CLASS;
    }
    if f.has_style_binding && is_plain {
        patch_flag |= PatchFlag::STYLE;
    }
    if !dynamic_names.is_empty() {
        patch_flag |= PatchFlag::PROPS;
    }
    if f.has_hydration_event_binding {
        patch_flag |= PatchFlag::HYDRATE_EVENTS;
    }
    let no_prop_patch = patch_flag == PatchFlag::empty() || patch_flag == PatchFlag::HYDRATE_EVENTS;
    if no_prop_patch && (f.has_ref || f.has_vnode_hook || !runtime_dirs.is_empty()) {
        patch_flag |= PatchFlag::NEED_PATCH;
    }
    patch_flag
}
