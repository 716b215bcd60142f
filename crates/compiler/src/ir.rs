//! Codegen IR. The AST is never annotated in place; every node that
//! renders something gets a [`CodegenNode`] in the [`CodegenTable`],
//! indexed by the node's [`NodeId`].
use crate::{
    flags::{HelperCollector, PatchFlag, RuntimeHelper, StaticLevel},
    parser::{AstRoot, NodeId},
    util::VStr,
    Name,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
/// Records how v-on handler is written in the template.
/// Variants will be compiled differently (also depends on `cache_bindings`).
pub enum HandlerType {
    /// e.g. @click="c++"
    InlineStmt,
    /// e.g. @click="obj.method"
    MemberExpr,
    /// e.g. @click="() => func()"
    FuncExpr,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HandlerExpr<'a> {
    pub body: JsExpr<'a>,
    pub ty: HandlerType,
    /// handler can be cached: caching enabled, no v-for alias
    /// reference and not inside a v-once subtree
    pub cacheable: bool,
    pub cache_slot: Option<usize>,
    /// references a v-for alias
    pub scope_ref: bool,
    /// `.stop`, `.prevent` and the like, wrapped by `withModifiers`
    pub modifiers: Vec<&'a str>,
    /// `.enter`, `.esc` and the like, wrapped by `withKeys`
    pub key_modifiers: Vec<&'a str>,
}

pub type Prop<'a> = (JsExpr<'a>, JsExpr<'a>);

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum JsExpr<'a> {
    /// Source. output to generated code as is.
    Src(&'a str),
    /// representing a number, either id or key
    Num(usize),
    /// String Literal. output after quoted, used by attr/static arg.
    StrLit(VStr<'a>),
    /// String literal computed at compile time, e.g. `onClickOnce`
    OwnedLit(String),
    /// js expression kept verbatim
    Simple(VStr<'a>, StaticLevel),
    /// v-for alias or function parameter
    Param(Name<'a>),
    /// identifier resolved on the render context, written with prefix
    Ctx(Name<'a>),
    /// alternative to join string as JsExpr
    Compound(Vec<JsExpr<'a>>),
    Props(Vec<Prop<'a>>),
    /// for calling runtime helper, e.g. resolveComponent()
    Call(RuntimeHelper, Vec<JsExpr<'a>>),
    /// for builtin component called as symbol
    Symbol(RuntimeHelper),
    /// array of JsExpr
    Array(Vec<JsExpr<'a>>),
    /// event handler function
    Handler(Box<HandlerExpr<'a>>),
}

impl<'a> Default for JsExpr<'a> {
    fn default() -> Self {
        Self::Src("")
    }
}

impl<'a> JsExpr<'a> {
    /// a convenient util for creating JsExpr::Simple
    pub fn simple<V: Into<VStr<'a>>>(v: V) -> Self {
        JsExpr::Simple(v.into(), StaticLevel::NotStatic)
    }
    pub fn str_lit<V: Into<VStr<'a>>>(v: V) -> Self {
        JsExpr::StrLit(v.into())
    }
    pub fn static_level(&self) -> StaticLevel {
        use JsExpr::*;
        use StaticLevel as S;
        match self {
            Num(_) | StrLit(_) | OwnedLit(_) | Src(_) => S::CanStringify,
            Simple(_, level) => *level,
            Symbol(_) => S::CanHoist,
            Param(_) | Ctx(_) | Handler(_) => S::NotStatic,
            Compound(v) | Array(v) | Call(_, v) => v
                .iter()
                .map(Self::static_level)
                .min()
                .unwrap_or(S::CanStringify),
            Props(ps) => {
                let prop_level = |prop: &Prop<'a>| {
                    let key_level = Self::static_level(&prop.0);
                    let val_level = Self::static_level(&prop.1);
                    key_level.min(val_level)
                };
                ps.iter().map(prop_level).min().unwrap_or(S::CanStringify)
            }
        }
    }
    /// name of a literal prop key
    pub fn static_key(&self) -> Option<String> {
        match self {
            JsExpr::StrLit(v) => Some(v.into_string()),
            JsExpr::OwnedLit(s) => Some(s.clone()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RuntimeDir<'a> {
    pub name: JsExpr<'a>,
    pub expr: Option<JsExpr<'a>>,
    pub arg: Option<JsExpr<'a>>,
    pub mods: Option<JsExpr<'a>>,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VNodeCall<'a> {
    pub tag: JsExpr<'a>,
    pub props: Option<JsExpr<'a>>,
    pub children: Vec<NodeId>,
    pub patch_flag: PatchFlag,
    pub dynamic_props: Vec<JsExpr<'a>>,
    pub directives: Vec<RuntimeDir<'a>>,
    pub is_block: bool,
    pub is_component: bool,
    /// children are passed as a plain array, e.g. Teleport and KeepAlive
    pub raw_children: bool,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextCall<'a> {
    /// written without createTextVNode
    pub fast_path: bool,
    /// PatchFlag::TEXT
    pub need_patch: bool,
    pub texts: SmallVec<[JsExpr<'a>; 1]>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Alternate<'a> {
    Node(NodeId),
    Conditional(Box<CodegenNode<'a>>),
    /// `_createCommentVNode("v-if", true)`
    Comment,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ForParams<'a> {
    pub value: Option<JsExpr<'a>>,
    pub key: Option<JsExpr<'a>>,
    pub index: Option<JsExpr<'a>>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CacheKind<'a> {
    Once,
    /// dependency array
    Memo(JsExpr<'a>),
    /// v-memo on a v-for item, compared against the cached item by key
    MemoInVFor {
        expr: JsExpr<'a>,
        key: Option<JsExpr<'a>>,
    },
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CodegenNode<'a> {
    /// component/template/plain element
    VNodeCall(VNodeCall<'a>),
    /// interpolation or text node
    TextCall(TextCall<'a>),
    CommentCall(&'a str),
    /// v-if, else-if, else
    ConditionalExpr {
        test: JsExpr<'a>,
        consequent: NodeId,
        alternate: Alternate<'a>,
    },
    /// v-for
    ForExpr {
        source: JsExpr<'a>,
        params: ForParams<'a>,
        body: NodeId,
        is_stable: bool,
        fragment_flag: PatchFlag,
    },
    CacheExpr {
        slot: usize,
        kind: CacheKind<'a>,
        inner: Box<CodegenNode<'a>>,
    },
    /// `_hoisted_{index}`
    HoistRef(usize),
}

impl<'a> CodegenNode<'a> {
    pub fn as_vnode(&self) -> Option<&VNodeCall<'a>> {
        match self {
            Self::VNodeCall(v) => Some(v),
            _ => None,
        }
    }
    pub fn as_vnode_mut(&mut self) -> Option<&mut VNodeCall<'a>> {
        match self {
            Self::VNodeCall(v) => Some(v),
            _ => None,
        }
    }
}

/// CodegenNode of each AstNode, indexed by NodeId
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CodegenTable<'a>(Vec<Option<CodegenNode<'a>>>);

impl<'a> CodegenTable<'a> {
    pub fn get(&self, id: NodeId) -> Option<&CodegenNode<'a>> {
        self.0.get(id.index())?.as_ref()
    }
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CodegenNode<'a>> {
        self.0.get_mut(id.index())?.as_mut()
    }
    pub fn set(&mut self, id: NodeId, node: CodegenNode<'a>) {
        let i = id.index();
        if self.0.len() <= i {
            self.0.resize_with(i + 1, || None);
        }
        self.0[i] = Some(node);
    }
    pub fn take(&mut self, id: NodeId) -> Option<CodegenNode<'a>> {
        self.0.get_mut(id.index())?.take()
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RootCodegen<'a> {
    Empty,
    Single(NodeId),
    Fragment(VNodeCall<'a>),
}

impl<'a> Default for RootCodegen<'a> {
    fn default() -> Self {
        Self::Empty
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CacheMark {
    Once,
    Memo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SlotKind {
    Once,
    Memo,
    Handler,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CacheSlot {
    pub kind: SlotKind,
    pub node: NodeId,
}

#[derive(Default, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IrRoot<'a> {
    pub ast: AstRoot<'a>,
    pub codegen: CodegenTable<'a>,
    pub root: RootCodegen<'a>,
    pub helpers: HelperCollector,
    /// components to resolve, in first use order
    pub components: Vec<VStr<'a>>,
    /// custom directives to resolve, in first use order
    pub directives: Vec<VStr<'a>>,
    pub hoists: Vec<CodegenNode<'a>>,
    pub cache_slots: Vec<CacheSlot>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cache_marks: FxHashMap<NodeId, CacheMark>,
    /// v-memo dependency arrays keyed by the marked node
    #[cfg_attr(feature = "serde", serde(skip))]
    pub memo_deps: FxHashMap<NodeId, JsExpr<'a>>,
}

impl<'a> IrRoot<'a> {
    pub fn new(ast: AstRoot<'a>) -> Self {
        Self {
            ast,
            ..Default::default()
        }
    }
    pub fn add_component(&mut self, name: VStr<'a>) {
        if !self.components.iter().any(|c| c.raw == name.raw) {
            self.components.push(name);
        }
    }
    pub fn add_directive(&mut self, name: VStr<'a>) {
        if !self.directives.iter().any(|d| d.raw == name.raw) {
            self.directives.push(name);
        }
    }
    pub fn cache_size(&self) -> usize {
        self.cache_slots.len()
    }
}
