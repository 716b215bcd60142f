/*!
Transform the AST into codegen IR.

One depth-first traversal runs every registered [`TransformPass`].
On each node the passes' `enter` run in registration order; a pass
that returns [`Continuation::Exit`] has its `exit` called after the
children are done, in reverse order. Exit always receives the node
that occupies the slot when the frame finishes, which is the
replacement if a structural pass swapped the node.

## Passes, in order
* v_once: marks subtrees rendered once
* v_if: groups v-if/else-if/else siblings into an `If` node
* v_for: wraps v-for elements in a `For` node, tracks aliases
* v_memo: records v-memo dependencies
* transform_element: builds `VNodeCall`/`CommentCall`, root codegen
* transform_text: merges adjacent text and interpolations

Then `hoist_static` and `cache_dir` run over the finished table.
 */

mod build_props;
mod cache_dir;
mod hoist_static;
mod transform_element;
mod transform_expression;
mod transform_text;
mod v_bind;
mod v_for;
mod v_if;
mod v_memo;
mod v_model;
mod v_on;
mod v_once;

pub use cache_dir::inject_cache;
pub use hoist_static::hoist_static;
pub use transform_element::TransformElement;
pub use transform_text::TransformText;
pub use v_for::VFor;
pub use v_if::VIf;
pub use v_memo::VMemo;
pub use v_once::VOnce;

use crate::{
    error::{CompilationError, ErrorHandler},
    ir::IrRoot,
    parser::{AstNode, AstRoot, NodeId},
    SourceLocation,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

#[derive(Clone, Debug)]
pub struct TransformOption {
    pub hoist_static: bool,
    pub cache_bindings: bool,
}

impl Default for TransformOption {
    fn default() -> Self {
        Self {
            hoist_static: true,
            cache_bindings: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    Done,
    /// call `exit` of the pass when the frame finishes
    Exit,
}

pub trait TransformPass<'a> {
    fn name(&self) -> &'static str;
    fn enter(&mut self, _id: NodeId, _ctx: &mut TransformContext<'a>) -> Continuation {
        Continuation::Done
    }
    fn exit(&mut self, _id: NodeId, _ctx: &mut TransformContext<'a>) {}
    fn exit_root(&mut self, _ctx: &mut TransformContext<'a>) {}
}

/// Position of the node being transformed.
/// `parent == None` means the node is a root child.
#[derive(Clone, Copy, Debug)]
struct Cursor {
    parent: Option<NodeId>,
    index: usize,
    removed: bool,
}

pub struct TransformContext<'a> {
    pub ir: IrRoot<'a>,
    pub option: TransformOption,
    err_handle: Box<dyn ErrorHandler + 'a>,
    /// v-for aliases in scope, with shadowing counts
    scope: FxHashMap<&'a str, usize>,
    ancestors: Vec<NodeId>,
    cursor: Cursor,
    once_nodes: FxHashSet<NodeId>,
    entered: FxHashSet<(usize, NodeId)>,
}

impl<'a> TransformContext<'a> {
    pub fn new(ast: AstRoot<'a>, option: TransformOption, eh: Box<dyn ErrorHandler + 'a>) -> Self {
        Self {
            ir: IrRoot::new(ast),
            option,
            err_handle: eh,
            scope: FxHashMap::default(),
            ancestors: vec![],
            cursor: Cursor {
                parent: None,
                index: 0,
                removed: false,
            },
            once_nodes: FxHashSet::default(),
            entered: FxHashSet::default(),
        }
    }

    pub fn emit_error(&self, error: CompilationError) {
        self.err_handle.on_error(error);
    }

    pub fn emit(&self, kind: crate::error::CompilationErrorKind, loc: &SourceLocation) {
        self.emit_error(CompilationError::new(kind).with_location(loc.clone()));
    }

    /// The node in the cursor slot, None if it was removed.
    pub fn current(&self) -> Option<NodeId> {
        if self.cursor.removed {
            return None;
        }
        self.slot(self.cursor.parent, self.cursor.index)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.cursor.parent
    }

    /// Outermost first, excluding the current node.
    pub fn ancestors(&self) -> &[NodeId] {
        &self.ancestors
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor.index
    }

    fn slot(&self, parent: Option<NodeId>, index: usize) -> Option<NodeId> {
        let ast = &self.ir.ast;
        match parent {
            None => ast.children.get(index).copied(),
            Some(p) => match ast.node(p) {
                AstNode::Element(e) => e.children.get(index).copied(),
                AstNode::If(i) => i.branches.get(index).map(|b| b.child),
                AstNode::For(f) => (index == 0).then(|| f.child),
                _ => None,
            },
        }
    }

    fn slot_mut(&mut self, parent: Option<NodeId>, index: usize) -> Option<&mut NodeId> {
        let ast = &mut self.ir.ast;
        match parent {
            None => ast.children.get_mut(index),
            Some(p) => match ast.node_mut(p) {
                AstNode::Element(e) => e.children.get_mut(index),
                AstNode::If(i) => i.branches.get_mut(index).map(|b| &mut b.child),
                AstNode::For(f) => (index == 0).then(|| &mut f.child),
                _ => None,
            },
        }
    }

    /// Children list of root or an element. If/For have no list.
    pub fn siblings(&self) -> &[NodeId] {
        match self.cursor.parent {
            None => self.ir.ast.children.as_slice(),
            Some(p) => self.ir.ast.element(p).map_or(&[][..], |e| e.children.as_slice()),
        }
    }

    fn siblings_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self.cursor.parent {
            None => Some(&mut self.ir.ast.children),
            Some(p) => self.ir.ast.element_mut(p).map(|e| &mut e.children),
        }
    }

    pub fn replace_node(&mut self, new_node: NodeId) {
        let Cursor { parent, index, .. } = self.cursor;
        if let Some(slot) = self.slot_mut(parent, index) {
            *slot = new_node;
        }
    }

    /// Removes the current node. Its frame is abandoned.
    pub fn remove_node(&mut self) {
        let index = self.cursor.index;
        if let Some(siblings) = self.siblings_mut() {
            if index < siblings.len() {
                siblings.remove(index);
                self.cursor.removed = true;
            }
        }
    }

    /// Removes a sibling after the current node.
    pub fn remove_next_sibling(&mut self, offset: usize) -> Option<NodeId> {
        let index = self.cursor.index + offset;
        let siblings = self.siblings_mut()?;
        (index < siblings.len()).then(|| siblings.remove(index))
    }

    pub fn add_alias(&mut self, name: &'a str) {
        *self.scope.entry(name).or_default() += 1;
    }

    pub fn remove_alias(&mut self, name: &'a str) {
        if let Some(count) = self.scope.get_mut(name) {
            *count -= 1;
            if *count == 0 {
                self.scope.remove(name);
            }
        }
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.scope.contains_key(name)
    }

    pub fn has_alias_in_scope(&self) -> bool {
        !self.scope.is_empty()
    }

    pub fn enter_once(&mut self, id: NodeId) {
        self.once_nodes.insert(id);
    }

    /// whether the current node is a v-once node or inside one
    pub fn in_v_once(&self) -> bool {
        self.current()
            .into_iter()
            .chain(self.ancestors.iter().copied())
            .any(|id| self.once_nodes.contains(&id))
    }

    fn mark_entered(&mut self, pass: usize, id: NodeId) -> bool {
        self.entered.insert((pass, id))
    }
}

pub fn default_passes<'a>() -> Vec<Box<dyn TransformPass<'a> + 'a>> {
    vec![
        Box::new(VOnce),
        Box::new(VIf),
        Box::new(VFor::default()),
        Box::new(VMemo),
        Box::new(TransformElement),
        Box::new(TransformText),
    ]
}

pub struct Transformer<'a> {
    passes: Vec<Box<dyn TransformPass<'a> + 'a>>,
    option: TransformOption,
}

impl<'a> Transformer<'a> {
    pub fn new(option: TransformOption) -> Self {
        Self::with_passes(default_passes(), option)
    }

    pub fn with_passes(passes: Vec<Box<dyn TransformPass<'a> + 'a>>, option: TransformOption) -> Self {
        Self { passes, option }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Runs the passes, then hoisting and cache injection.
    pub fn transform<E>(&mut self, ast: AstRoot<'a>, err_handle: E) -> IrRoot<'a>
    where
        E: ErrorHandler + 'a,
    {
        let mut ctx = TransformContext::new(ast, self.option.clone(), Box::new(err_handle));
        self.traverse_children(&mut ctx, None);
        for pass in self.passes.iter_mut().rev() {
            pass.exit_root(&mut ctx);
        }
        let mut ir = ctx.ir;
        if self.option.hoist_static {
            hoist_static(&mut ir);
        }
        inject_cache(&mut ir);
        ir
    }

    fn traverse_children(&mut self, ctx: &mut TransformContext<'a>, parent: Option<NodeId>) {
        let mut i = 0;
        while ctx.slot(parent, i).is_some() {
            ctx.cursor = Cursor {
                parent,
                index: i,
                removed: false,
            };
            self.traverse_node(ctx);
            i = if ctx.cursor.removed {
                ctx.cursor.index
            } else {
                ctx.cursor.index + 1
            };
        }
    }

    fn traverse_node(&mut self, ctx: &mut TransformContext<'a>) {
        let mut exits: SmallVec<[usize; 8]> = SmallVec::new();
        for (i, pass) in self.passes.iter_mut().enumerate() {
            let id = match ctx.current() {
                Some(id) => id,
                None => return,
            };
            if !ctx.mark_entered(i, id) {
                continue;
            }
            if pass.enter(id, ctx) == Continuation::Exit {
                exits.push(i);
            }
        }
        let id = match ctx.current() {
            Some(id) => id,
            None => return,
        };
        let frame = ctx.cursor;
        ctx.ancestors.push(id);
        self.traverse_children(ctx, Some(id));
        ctx.ancestors.pop();
        ctx.cursor = frame;
        let id = match ctx.current() {
            Some(id) => id,
            None => return,
        };
        for &i in exits.iter().rev() {
            self.passes[i].exit(id, ctx);
        }
    }
}
