use super::{
    flags::RuntimeHelper,
    ir::VNodeCall,
    parser::{Directive, DirectiveArg, ElemProp, Element},
};

mod decode_html;
pub mod html_tags;
mod json;
mod named_chars;
pub mod rslint;
mod v_str;

pub use json::write_json_string;
pub use v_str::{StrOps, VStr};

pub fn non_whitespace(c: char) -> bool {
    !c.is_ascii_whitespace()
}

pub fn get_core_component(tag: &str) -> Option<RuntimeHelper> {
    use RuntimeHelper as RH;
    Some(match tag {
        "Teleport" | "teleport" => RH::Teleport,
        "Suspense" | "suspense" => RH::Suspense,
        "KeepAlive" | "keep-alive" => RH::KeepAlive,
        "BaseTransition" | "base-transition" => RH::BaseTransition,
        _ => return None,
    })
}

pub fn is_core_component(tag: &str) -> bool {
    get_core_component(tag).is_some()
}

fn is_event_prop(prop: &str) -> bool {
    let bytes = prop.as_bytes();
    // equivalent to /^on[^a-z]/
    bytes.len() > 2 && bytes.starts_with(b"on") && !bytes[2].is_ascii_lowercase()
}

pub fn is_mergeable_prop(prop: &str) -> bool {
    prop == "class" || prop == "style" || is_event_prop(prop)
}

pub fn is_simple_identifier(s: VStr) -> bool {
    let is_ident = |c: char| c == '$' || c == '_' || c.is_ascii_alphanumeric();
    let raw = s.raw;
    !raw.is_empty() && raw.chars().all(is_ident) && !raw.starts_with(|c: char| c.is_ascii_digit())
}

macro_rules! make_list {
    ( $($id: ident),* ) => {
        &[
            $(stringify!($id)),*
        ]
    }
}

// use simple contains for small str array
// benchmark shows linear scan takes at most 10ns
// while phf or bsearch takes 30ns
const ALLOWED_GLOBALS: &[&str] = make_list!(
    Infinity,
    undefined,
    NaN,
    isFinite,
    isNaN,
    parseFloat,
    parseInt,
    decodeURI,
    decodeURIComponent,
    encodeURI,
    encodeURIComponent,
    Math,
    Number,
    Date,
    Array,
    Object,
    Boolean,
    String,
    RegExp,
    Map,
    Set,
    JSON,
    Intl,
    BigInt
);
pub fn is_global_allow_listed(s: &str) -> bool {
    ALLOWED_GLOBALS.contains(&s)
}

/// Words that are never identifier references.
const LITERAL_KEYWORDS: &[&str] = make_list!(true, false, null, this);
pub fn is_literal_keyword(s: &str) -> bool {
    LITERAL_KEYWORDS.contains(&s)
}

// https://github.com/vuejs/rfcs/blob/master/active-rfcs/0008-render-function-api-change.md#special-reserved-props
const RESERVED: &[&str] = make_list!(
    key,
    ref,
    onVnodeMounted,
    onVnodeUpdated,
    onVnodeUnmounted,
    onVnodeBeforeMount,
    onVnodeBeforeUpdate,
    onVnodeBeforeUnmount
);

#[inline]
pub fn is_reserved_prop(tag: &str) -> bool {
    RESERVED.contains(&tag)
}

pub fn is_component_tag(tag: &str) -> bool {
    tag == "component" || tag == "Component"
}

pub const fn no(_: &str) -> bool {
    false
}

pub fn get_vnode_call_helper(v: &VNodeCall) -> RuntimeHelper {
    use RuntimeHelper as RH;
    if v.is_block {
        return if v.is_component {
            RH::CreateBlock
        } else {
            RH::CreateElementBlock
        };
    }
    if v.is_component {
        RH::CreateVNode
    } else {
        RH::CreateElementVNode
    }
}

pub trait PropPattern {
    fn matches(&self, name: &str) -> bool;
}
impl PropPattern for &str {
    fn matches(&self, name: &str) -> bool {
        name == *self
    }
}

impl<F> PropPattern for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, name: &str) -> bool {
        self(name)
    }
}

impl<const N: usize> PropPattern for [&'static str; N] {
    fn matches(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

pub fn is_bind_key(arg: &Option<DirectiveArg<'_>>, name: &str) -> bool {
    get_bind_key(arg).map_or(false, |v| v == name)
}

fn get_bind_key<'a>(arg: &Option<DirectiveArg<'a>>) -> Option<&'a str> {
    if let DirectiveArg::Static(name) = arg.as_ref()? {
        Some(name)
    } else {
        None
    }
}

/// Static attribute or `v-bind` with a static argument matching `pat`.
/// `v-bind` must carry an expression.
pub fn find_prop<'a, 'b, P: PropPattern>(
    elem: &'b Element<'a>,
    pat: P,
) -> Option<&'b ElemProp<'a>> {
    elem.properties.iter().find(|prop| match prop {
        ElemProp::Attr(attr) => pat.matches(attr.name),
        ElemProp::Dir(dir @ Directive { name: "bind", .. }) => {
            get_bind_key(&dir.argument).map_or(false, |k| pat.matches(k))
                && dir.expression.as_ref().map_or(false, |e| !e.content.trim().is_empty())
        }
        _ => false,
    })
}

pub fn has_dir<P: PropPattern>(elem: &Element<'_>, pat: P) -> bool {
    find_dir(elem, pat).is_some()
}

pub fn find_dir<'a, 'b, P: PropPattern>(
    elem: &'b Element<'a>,
    pat: P,
) -> Option<&'b Directive<'a>> {
    elem.properties.iter().find_map(|prop| match prop {
        ElemProp::Dir(dir) if pat.matches(dir.name) => Some(dir),
        _ => None,
    })
}

/// Remove the first directive matching `pat` from the element.
pub fn take_dir<'a, P: PropPattern>(elem: &mut Element<'a>, pat: P) -> Option<Directive<'a>> {
    let pos = elem
        .properties
        .iter()
        .position(|prop| matches!(prop, ElemProp::Dir(dir) if pat.matches(dir.name)))?;
    match elem.properties.remove(pos) {
        ElemProp::Dir(dir) => Some(dir),
        ElemProp::Attr(_) => None,
    }
}
