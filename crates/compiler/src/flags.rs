//! Flags shared by the transformer and codegen: vnode patch flags,
//! runtime helpers the generated code imports, and static levels.

use bitflags::bitflags;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

bitflags! {
    /// Hints for the runtime diffing. Positive values are bit flags,
    /// `HOISTED` and `BAIL` are special negative markers.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct PatchFlag: i32 {
        /// element with dynamic text content
        const TEXT = 1;
        /// element with dynamic class binding
        const CLASS = 1 << 1;
        /// element with dynamic style binding
        const STYLE = 1 << 2;
        /// element with dynamic props other than class/style,
        /// names are listed in dynamic_props
        const PROPS = 1 << 3;
        /// element with props whose keys are dynamic
        const FULL_PROPS = 1 << 4;
        /// element with event listeners that must be attached on hydration
        const HYDRATE_EVENTS = 1 << 5;
        /// fragment whose children order never changes
        const STABLE_FRAGMENT = 1 << 6;
        /// fragment with keyed children
        const KEYED_FRAGMENT = 1 << 7;
        /// fragment with unkeyed children
        const UNKEYED_FRAGMENT = 1 << 8;
        /// element needs non-props patch, e.g. ref or directives
        const NEED_PATCH = 1 << 9;
        /// component with dynamic slots
        const DYNAMIC_SLOTS = 1 << 10;
    }
}

impl PatchFlag {
    /// static vnode hoisted out of render
    pub const HOISTED: Self = Self::from_bits_retain(-1);
    /// exit optimized mode in diffing
    pub const BAIL: Self = Self::from_bits_retain(-2);

    pub fn is_hoisted(&self) -> bool {
        *self == Self::HOISTED
    }
}

/// Writes the flag as it appears in generated code: `9 /* TEXT, PROPS */`.
impl fmt::Display for PatchFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::HOISTED {
            return write!(f, "-1 /* HOISTED */");
        }
        if *self == Self::BAIL {
            return write!(f, "-2 /* BAIL */");
        }
        write!(f, "{} /* ", self.bits())?;
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        write!(f, " */")
    }
}

/// Runtime helpers the generated code may import.
/// Declaration order is import order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[repr(u8)]
pub enum RuntimeHelper {
    Fragment = 0,
    Teleport,
    Suspense,
    KeepAlive,
    BaseTransition,
    OpenBlock,
    CreateBlock,
    CreateElementBlock,
    CreateVNode,
    CreateElementVNode,
    CreateComment,
    CreateText,
    ResolveComponent,
    ResolveDynamicComponent,
    ResolveDirective,
    WithDirectives,
    RenderList,
    ToDisplayString,
    MergeProps,
    ToHandlers,
    Camelize,
    ToHandlerKey,
    SetBlockTracking,
    WithCtx,
    WithMemo,
    IsMemoSame,
    LooseEqual,
    LooseToNumber,
    WithModifiers,
    WithKeys,
}

const HELPERS: [RuntimeHelper; 30] = {
    use RuntimeHelper::*;
    [
        Fragment,
        Teleport,
        Suspense,
        KeepAlive,
        BaseTransition,
        OpenBlock,
        CreateBlock,
        CreateElementBlock,
        CreateVNode,
        CreateElementVNode,
        CreateComment,
        CreateText,
        ResolveComponent,
        ResolveDynamicComponent,
        ResolveDirective,
        WithDirectives,
        RenderList,
        ToDisplayString,
        MergeProps,
        ToHandlers,
        Camelize,
        ToHandlerKey,
        SetBlockTracking,
        WithCtx,
        WithMemo,
        IsMemoSame,
        LooseEqual,
        LooseToNumber,
        WithModifiers,
        WithKeys,
    ]
};

impl RuntimeHelper {
    pub fn helper_str(&self) -> &'static str {
        use RuntimeHelper::*;
        match *self {
            Fragment => "Fragment",
            Teleport => "Teleport",
            Suspense => "Suspense",
            KeepAlive => "KeepAlive",
            BaseTransition => "BaseTransition",
            OpenBlock => "openBlock",
            CreateBlock => "createBlock",
            CreateElementBlock => "createElementBlock",
            CreateVNode => "createVNode",
            CreateElementVNode => "createElementVNode",
            CreateComment => "createCommentVNode",
            CreateText => "createTextVNode",
            ResolveComponent => "resolveComponent",
            ResolveDynamicComponent => "resolveDynamicComponent",
            ResolveDirective => "resolveDirective",
            WithDirectives => "withDirectives",
            RenderList => "renderList",
            ToDisplayString => "toDisplayString",
            MergeProps => "mergeProps",
            ToHandlers => "toHandlers",
            Camelize => "camelize",
            ToHandlerKey => "toHandlerKey",
            SetBlockTracking => "setBlockTracking",
            WithCtx => "withCtx",
            WithMemo => "withMemo",
            IsMemoSame => "isMemoSame",
            LooseEqual => "looseEqual",
            LooseToNumber => "looseToNumber",
            WithModifiers => "withModifiers",
            WithKeys => "withKeys",
        }
    }
}

/// A set of runtime helpers backed by a bitmask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HelperCollector(u64);

impl HelperCollector {
    pub fn new() -> Self {
        Self(0)
    }
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
    pub fn collect(&mut self, helper: RuntimeHelper) {
        self.0 |= 1 << (helper as u8);
    }
    pub fn contains(&self, helper: RuntimeHelper) -> bool {
        (self.0 & (1 << helper as u8)) != 0
    }
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0 | other.0)
    }
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0 & !other.0)
    }
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
    /// helpers in declaration order
    pub fn iter(&self) -> impl Iterator<Item = RuntimeHelper> + '_ {
        HELPERS.iter().copied().filter(move |h| self.contains(*h))
    }
}

/// How much of an expression or a node is known at compile time.
/// The order matters: a compound is as static as its least static part.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum StaticLevel {
    NotStatic,
    CanHoist,
    CanStringify,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_helper_table_order() {
        for (i, h) in HELPERS.iter().enumerate() {
            assert_eq!(*h as usize, i);
        }
    }

    #[test]
    fn test_collector_order() {
        let mut helpers = HelperCollector::new();
        helpers.collect(RuntimeHelper::ToDisplayString);
        helpers.collect(RuntimeHelper::OpenBlock);
        helpers.collect(RuntimeHelper::OpenBlock);
        let v: Vec<_> = helpers.iter().collect();
        assert_eq!(
            v,
            vec![RuntimeHelper::OpenBlock, RuntimeHelper::ToDisplayString]
        );
        assert_eq!(helpers.len(), 2);
    }

    #[test]
    fn test_patch_flag_display() {
        assert_eq!(PatchFlag::TEXT.to_string(), "1 /* TEXT */");
        let flag = PatchFlag::CLASS | PatchFlag::PROPS;
        assert_eq!(flag.to_string(), "10 /* CLASS, PROPS */");
        assert_eq!(PatchFlag::HOISTED.to_string(), "-1 /* HOISTED */");
    }

    #[test]
    fn test_static_level_order() {
        assert!(StaticLevel::NotStatic < StaticLevel::CanHoist);
        assert!(StaticLevel::CanHoist < StaticLevel::CanStringify);
    }
}
