//! Builds the template AST from the token stream.
//! Nodes live in one arena owned by [`AstRoot`] and refer to
//! each other by [`NodeId`]. The parser keeps an explicit stack
//! of open elements and recovers from malformed markup.

use super::{
    error::{CompilationError, CompilationErrorKind as ErrorKind, ErrorHandler},
    scanner::{Token, TokenKind},
    util::{
        html_tags::{closes_implicitly, has_optional_end_tag, is_native_tag, is_pre_tag, is_void_tag},
        is_component_tag, is_core_component, no, VStr,
    },
    Name, Position, SourceLocation,
};
use rustc_hash::FxHashSet;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Index of a node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AttributeValue<'a> {
    pub content: VStr<'a>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Attribute<'a> {
    pub name: Name<'a>,
    pub value: Option<AttributeValue<'a>>,
    pub name_loc: SourceLocation,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DirectiveArg<'a> {
    // :static="val"
    Static(Name<'a>),
    Dynamic(Name<'a>), // :[dynamic]="val"
}

/// Directive supports two forms
/// static and dynamic
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Directive<'a> {
    // v-bind:arg.prop=expr
    pub name: Name<'a>,
    pub argument: Option<DirectiveArg<'a>>,
    pub modifiers: Vec<&'a str>,
    pub expression: Option<AttributeValue<'a>>,
    pub head_loc: SourceLocation,
    pub location: SourceLocation,
}

impl<'a> Directive<'a> {
    pub fn has_empty_expr(&self) -> bool {
        self.expression
            .as_ref()
            .map_or(true, |v| v.content.trim().is_empty())
    }
    pub fn check_empty_expr(&self, kind: ErrorKind) -> Option<CompilationError> {
        if !self.has_empty_expr() {
            return None;
        }
        let loc = self
            .expression
            .as_ref()
            .map(|e| e.location.clone())
            .unwrap_or_else(|| self.head_loc.clone());
        Some(CompilationError::new(kind).with_location(loc))
    }
    pub fn has_modifier(&self, m: &str) -> bool {
        self.modifiers.contains(&m)
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ElemProp<'a> {
    Attr(Attribute<'a>),
    Dir(Directive<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ElementType {
    Plain,
    Component,
    /// `<template>` carrying a structural directive
    Template,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Element<'a> {
    pub tag_name: Name<'a>,
    pub tag_type: ElementType,
    pub properties: Vec<ElemProp<'a>>,
    pub children: Vec<NodeId>,
    pub location: SourceLocation,
}

impl<'a> Element<'a> {
    pub fn is_component(&self) -> bool {
        self.tag_type == ElementType::Component
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextNode<'a> {
    pub text: VStr<'a>,
    pub location: SourceLocation,
}

impl<'a> TextNode<'a> {
    pub fn is_all_whitespace(&self) -> bool {
        self.text.raw.chars().all(|c| c.is_ascii_whitespace())
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SourceNode<'a> {
    pub source: &'a str,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IfBranch<'a> {
    /// None for v-else
    pub condition: Option<AttributeValue<'a>>,
    pub child: NodeId,
    /// key injected into the branch vnode
    pub key: usize,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IfNode<'a> {
    pub branches: Vec<IfBranch<'a>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ForNode<'a> {
    pub source: AttributeValue<'a>,
    pub value: Option<&'a str>,
    pub key: Option<&'a str>,
    pub index: Option<&'a str>,
    pub child: NodeId,
    pub location: SourceLocation,
}

impl<'a> ForNode<'a> {
    /// value, key, index patterns in order
    pub fn aliases(&self) -> impl Iterator<Item = &'a str> {
        [self.value, self.key, self.index].into_iter().flatten()
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AstNode<'a> {
    Element(Element<'a>),
    Text(TextNode<'a>),
    Interpolation(SourceNode<'a>),
    Comment(SourceNode<'a>),
    If(IfNode<'a>),
    For(ForNode<'a>),
}

impl<'a> AstNode<'a> {
    pub fn get_location(&self) -> &SourceLocation {
        match self {
            Self::Element(e) => &e.location,
            Self::Text(t) => &t.location,
            Self::Interpolation(s) | Self::Comment(s) => &s.location,
            Self::If(i) => &i.location,
            Self::For(f) => &f.location,
        }
    }
    pub fn get_element(&self) -> Option<&Element<'a>> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }
    pub fn get_element_mut(&mut self) -> Option<&mut Element<'a>> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }
    /// ids of direct children, branches for v-if and the item for v-for
    pub fn child_ids(&self) -> Vec<NodeId> {
        match self {
            Self::Element(e) => e.children.clone(),
            Self::If(i) => i.branches.iter().map(|b| b.child).collect(),
            Self::For(f) => vec![f.child],
            _ => vec![],
        }
    }
}

/// The template root. It owns every node.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AstRoot<'a> {
    pub nodes: Vec<AstNode<'a>>,
    pub children: Vec<NodeId>,
    pub location: SourceLocation,
}

impl<'a> AstRoot<'a> {
    pub fn alloc(&mut self, node: AstNode<'a>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
    pub fn node(&self, id: NodeId) -> &AstNode<'a> {
        &self.nodes[id.index()]
    }
    pub fn node_mut(&mut self, id: NodeId) -> &mut AstNode<'a> {
        &mut self.nodes[id.index()]
    }
    pub fn element(&self, id: NodeId) -> Option<&Element<'a>> {
        self.node(id).get_element()
    }
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element<'a>> {
        self.node_mut(id).get_element_mut()
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WhitespaceStrategy {
    Preserve,
    Condense,
}

impl Default for WhitespaceStrategy {
    fn default() -> Self {
        WhitespaceStrategy::Condense
    }
}

#[derive(Clone)]
pub struct ParseOption {
    pub whitespace: WhitespaceStrategy,
    pub preserve_comments: bool,
    pub is_pre_tag: fn(&str) -> bool,
    pub is_void_tag: fn(&str) -> bool,
    pub is_native_tag: fn(&str) -> bool,
    /// tags that look like components but are left to the platform
    pub is_custom_element: fn(&str) -> bool,
}

impl Default for ParseOption {
    fn default() -> Self {
        Self {
            whitespace: WhitespaceStrategy::Condense,
            preserve_comments: false,
            is_pre_tag,
            is_void_tag,
            is_native_tag,
            is_custom_element: no,
        }
    }
}

pub struct Parser {
    option: ParseOption,
}

impl Parser {
    pub fn new(option: ParseOption) -> Self {
        Self { option }
    }

    pub fn parse<'a, Ts, E>(&self, tokens: Ts, err_handle: E) -> AstRoot<'a>
    where
        Ts: Iterator<Item = Token<'a>>,
        E: ErrorHandler,
    {
        let mut builder = AstBuilder {
            option: &self.option,
            err_handle,
            root: AstRoot::default(),
            open_elems: vec![],
            pending_tag: None,
            pre_depth: 0,
            end: Position::default(),
        };
        for token in tokens {
            builder.end = token.location.end;
            builder.handle_token(token);
        }
        builder.finish()
    }
}

struct RawAttr<'a> {
    name: Name<'a>,
    value: Option<AttributeValue<'a>>,
    name_loc: SourceLocation,
    location: SourceLocation,
}

struct PendingTag<'a> {
    name: Name<'a>,
    attrs: Vec<RawAttr<'a>>,
    start: Position,
}

struct AstBuilder<'a, 'o, E: ErrorHandler> {
    option: &'o ParseOption,
    err_handle: E,
    root: AstRoot<'a>,
    open_elems: Vec<NodeId>,
    pending_tag: Option<PendingTag<'a>>,
    pre_depth: usize,
    end: Position,
}

// parse token
impl<'a, 'o, E: ErrorHandler> AstBuilder<'a, 'o, E> {
    fn handle_token(&mut self, token: Token<'a>) {
        let Token { kind, location } = token;
        match kind {
            TokenKind::TagOpen(name) => self.open_tag(name, location),
            TokenKind::AttrName(name) => {
                if let Some(tag) = self.pending_tag.as_mut() {
                    tag.attrs.push(RawAttr {
                        name,
                        value: None,
                        name_loc: location.clone(),
                        location,
                    });
                }
            }
            TokenKind::AttrValue(content) => {
                let attr = self
                    .pending_tag
                    .as_mut()
                    .and_then(|tag| tag.attrs.last_mut());
                if let Some(attr) = attr {
                    attr.location.end = location.end;
                    attr.value = Some(AttributeValue { content, location });
                }
            }
            TokenKind::TagEnd { self_closing } => self.finish_start_tag(self_closing, location),
            TokenKind::TagClose(name) => self.close_tag(name, location),
            TokenKind::Text(text) => {
                let node = AstNode::Text(TextNode { text, location });
                self.insert_node(node);
            }
            TokenKind::Interpolation(source) => {
                let node = AstNode::Interpolation(SourceNode { source, location });
                self.insert_node(node);
            }
            TokenKind::Comment(source) => {
                if self.option.preserve_comments {
                    let node = AstNode::Comment(SourceNode { source, location });
                    self.insert_node(node);
                }
            }
        }
    }

    fn open_tag(&mut self, name: Name<'a>, location: SourceLocation) {
        // end tag of p/li/td... can be omitted
        while let Some(&top) = self.open_elems.last() {
            let top_tag = self.tag_of(top);
            if !closes_implicitly(top_tag, name) {
                break;
            }
            self.open_elems.pop();
            self.close_element(top, location.start);
        }
        self.pending_tag = Some(PendingTag {
            name,
            attrs: vec![],
            start: location.start,
        });
    }

    fn finish_start_tag(&mut self, self_closing: bool, location: SourceLocation) {
        let tag = match self.pending_tag.take() {
            Some(tag) => tag,
            None => return,
        };
        let properties = self.build_props(tag.attrs);
        let tag_type = self.element_type(tag.name, &properties);
        let element = Element {
            tag_name: tag.name,
            tag_type,
            properties,
            children: vec![],
            location: SourceLocation::new(tag.start, location.end),
        };
        let id = self.insert_node(AstNode::Element(element));
        if self_closing || (self.option.is_void_tag)(tag.name) {
            return;
        }
        if (self.option.is_pre_tag)(tag.name) {
            self.pre_depth += 1;
        }
        self.open_elems.push(id);
    }

    fn close_tag(&mut self, name: Name<'a>, location: SourceLocation) {
        let found = self
            .open_elems
            .iter()
            .rposition(|&id| self.tag_of(id).eq_ignore_ascii_case(name));
        let pos = match found {
            Some(pos) => pos,
            None => {
                let err = CompilationError::new(ErrorKind::InvalidEndTag).with_location(location);
                self.err_handle.on_error(err);
                return;
            }
        };
        // elements above the matching one lack their end tags
        while self.open_elems.len() > pos + 1 {
            if let Some(id) = self.open_elems.pop() {
                self.report_missing_end(id);
                self.close_element(id, location.start);
            }
        }
        if let Some(id) = self.open_elems.pop() {
            self.close_element(id, location.end);
        }
    }

    fn insert_node(&mut self, node: AstNode<'a>) -> NodeId {
        let id = self.root.alloc(node);
        match self.open_elems.last() {
            Some(&parent) => {
                if let Some(elem) = self.root.element_mut(parent) {
                    elem.children.push(id);
                }
            }
            None => self.root.children.push(id),
        }
        id
    }

    fn close_element(&mut self, id: NodeId, end: Position) {
        let is_pre = (self.option.is_pre_tag)(self.tag_of(id));
        let children = match self.root.element_mut(id) {
            Some(elem) => {
                elem.location.end = end;
                std::mem::take(&mut elem.children)
            }
            None => return,
        };
        let children = if is_pre {
            self.trim_pre_newline(&children);
            children
        } else if self.pre_depth == 0 {
            self.condense_whitespace(children)
        } else {
            children
        };
        if let Some(elem) = self.root.element_mut(id) {
            elem.children = children;
        }
        if is_pre {
            self.pre_depth = self.pre_depth.saturating_sub(1);
        }
    }

    fn report_missing_end(&self, id: NodeId) {
        let tag = self.tag_of(id);
        if has_optional_end_tag(tag) {
            return;
        }
        let loc = self.root.node(id).get_location().clone();
        let err = CompilationError::new(ErrorKind::MissingEndTag).with_location(loc);
        self.err_handle.on_error(err);
    }

    fn finish(mut self) -> AstRoot<'a> {
        let end = self.end;
        while let Some(id) = self.open_elems.pop() {
            self.report_missing_end(id);
            self.close_element(id, end);
        }
        let children = std::mem::take(&mut self.root.children);
        self.root.children = self.condense_whitespace(children);
        self.root.location = SourceLocation::new(Position::default(), end);
        self.root
    }

    fn tag_of(&self, id: NodeId) -> &'a str {
        self.root.element(id).map_or("", |e| e.tag_name)
    }
}

// whitespace handling
impl<'a, 'o, E: ErrorHandler> AstBuilder<'a, 'o, E> {
    fn condense_whitespace(&mut self, children: Vec<NodeId>) -> Vec<NodeId> {
        if self.option.whitespace == WhitespaceStrategy::Preserve {
            return children;
        }
        let mut kept = Vec::with_capacity(children.len());
        for (i, &id) in children.iter().enumerate() {
            let is_blank = match self.root.node(id) {
                AstNode::Text(t) => t.is_all_whitespace(),
                _ => {
                    kept.push(id);
                    continue;
                }
            };
            if !is_blank {
                if let AstNode::Text(t) = self.root.node_mut(id) {
                    t.text.compress_whitespace();
                }
                kept.push(id);
                continue;
            }
            let prev = i.checked_sub(1).map(|p| self.root.node(children[p]));
            let next = children.get(i + 1).map(|&n| self.root.node(n));
            if self.should_remove_blank(id, prev, next) {
                continue;
            }
            if let AstNode::Text(t) = self.root.node_mut(id) {
                t.text = VStr::raw(" ");
            }
            kept.push(id);
        }
        kept
    }

    fn should_remove_blank(
        &self,
        id: NodeId,
        prev: Option<&AstNode<'a>>,
        next: Option<&AstNode<'a>>,
    ) -> bool {
        use AstNode as N;
        let (prev, next) = match (prev, next) {
            (Some(p), Some(n)) => (p, n),
            _ => return true,
        };
        match (prev, next) {
            (N::Comment(_), N::Comment(_) | N::Element(_)) | (N::Element(_), N::Comment(_)) => true,
            (N::Element(_), N::Element(_)) => match self.root.node(id) {
                N::Text(t) => t.text.raw.contains(&['\r', '\n'][..]),
                _ => false,
            },
            _ => false,
        }
    }

    fn trim_pre_newline(&mut self, children: &[NodeId]) {
        let first = match children.first() {
            Some(&id) => id,
            None => return,
        };
        if let AstNode::Text(t) = self.root.node_mut(first) {
            let raw = t.text.raw;
            if let Some(rest) = raw.strip_prefix('\n') {
                t.text.raw = rest;
            } else if let Some(rest) = raw.strip_prefix("\r\n") {
                t.text.raw = rest;
            }
        }
    }
}

// attribute and directive handling
impl<'a, 'o, E: ErrorHandler> AstBuilder<'a, 'o, E> {
    fn build_props(&self, attrs: Vec<RawAttr<'a>>) -> Vec<ElemProp<'a>> {
        let mut seen = FxHashSet::default();
        let mut props = Vec::with_capacity(attrs.len());
        for attr in attrs {
            if !seen.insert(attr.name) {
                // later duplicates are dropped
                let err = CompilationError::new(ErrorKind::DuplicateAttribute)
                    .with_location(attr.location);
                self.err_handle.on_error(err);
                continue;
            }
            if is_directive(attr.name) {
                if let Some(dir) = self.parse_directive(&attr) {
                    props.push(ElemProp::Dir(dir));
                    continue;
                }
            }
            props.push(ElemProp::Attr(Attribute {
                name: attr.name,
                value: attr.value,
                name_loc: attr.name_loc,
                location: attr.location,
            }));
        }
        props
    }

    // https://v3.vuejs.org/api/directives.html#v-bind
    fn parse_directive(&self, attr: &RawAttr<'a>) -> Option<Directive<'a>> {
        let name = attr.name;
        // (dir name, arg part, modifier part, extra modifiers)
        let (dir_name, rest, is_prop) = if let Some(s) = name.strip_prefix("v-") {
            let end = s.find(|c| c == ':' || c == '.').unwrap_or(s.len());
            let (dir_name, rest) = s.split_at(end);
            if dir_name.is_empty() {
                self.emit(ErrorKind::MissingDirectiveName, &attr.name_loc);
                return None;
            }
            (dir_name, rest, false)
        } else {
            let (head, rest) = name.split_at(1);
            let dir_name = match head {
                ":" | "." => "bind",
                "@" => "on",
                _ => "slot",
            };
            // prepend a colon so arg handling is shared with v- form
            (dir_name, rest, head == ".")
        };
        let (argument, modifier_src) = if let Some(arg_src) = rest.strip_prefix(':') {
            self.parse_dir_arg(arg_src, attr)
        } else if name.starts_with("v-") {
            // v-name.mod or v-name
            (None, rest.strip_prefix('.'))
        } else {
            self.parse_dir_arg(rest, attr)
        };
        let mut modifiers = vec![];
        if is_prop {
            modifiers.push("prop");
        }
        if let Some(mods) = modifier_src {
            for m in mods.split('.') {
                if m.is_empty() {
                    self.emit(ErrorKind::MissingDirectiveMod, &attr.name_loc);
                } else {
                    modifiers.push(m);
                }
            }
        }
        let expression = attr.value.as_ref().map(|v| AttributeValue {
            // expressions are JavaScript, not HTML text
            content: VStr::raw(v.content.raw),
            location: v.location.clone(),
        });
        Some(Directive {
            name: dir_name,
            argument,
            modifiers,
            expression,
            head_loc: attr.name_loc.clone(),
            location: attr.location.clone(),
        })
    }

    fn parse_dir_arg(
        &self,
        arg_src: &'a str,
        attr: &RawAttr<'a>,
    ) -> (Option<DirectiveArg<'a>>, Option<&'a str>) {
        if let Some(dynamic) = arg_src.strip_prefix('[') {
            let end = match dynamic.find(']') {
                Some(end) => end,
                None => {
                    self.emit(ErrorKind::MissingDynamicDirectiveArgumentEnd, &attr.name_loc);
                    return (Some(DirectiveArg::Dynamic(dynamic)), None);
                }
            };
            let arg = DirectiveArg::Dynamic(&dynamic[..end]);
            let after = &dynamic[end + 1..];
            if after.is_empty() {
                return (Some(arg), None);
            }
            if let Some(mods) = after.strip_prefix('.') {
                return (Some(arg), Some(mods));
            }
            self.emit(ErrorKind::UnexpectedContentAfterDynamicDirective, &attr.name_loc);
            let mods = after.find('.').map(|i| &after[i + 1..]);
            return (Some(arg), mods);
        }
        let (arg, mods) = match arg_src.find('.') {
            Some(i) => (&arg_src[..i], Some(&arg_src[i + 1..])),
            None => (arg_src, None),
        };
        if arg.is_empty() {
            self.emit(ErrorKind::MissingDirectiveArg, &attr.name_loc);
            return (None, mods);
        }
        (Some(DirectiveArg::Static(arg)), mods)
    }

    fn element_type(&self, tag: &str, props: &[ElemProp<'a>]) -> ElementType {
        if tag == "template" {
            let is_structural = props.iter().any(|p| {
                matches!(p, ElemProp::Dir(Directive { name, .. })
                    if matches!(*name, "if" | "else-if" | "else" | "for" | "slot"))
            });
            if is_structural {
                return ElementType::Template;
            }
        }
        if (self.option.is_custom_element)(tag) {
            return ElementType::Plain;
        }
        if is_component_tag(tag)
            || is_core_component(tag)
            || tag.starts_with(|c: char| c.is_ascii_uppercase())
            || !(self.option.is_native_tag)(tag)
        {
            return ElementType::Component;
        }
        ElementType::Plain
    }

    fn emit(&self, kind: ErrorKind, loc: &SourceLocation) {
        let err = CompilationError::new(kind).with_location(loc.clone());
        self.err_handle.on_error(err);
    }
}

// Vue: /^(v-[A-Za-z0-9-]|:|\.|@|#)/
fn is_directive(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("v-") {
        return rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == ':');
    }
    name.starts_with(&[':', '.', '@', '#'][..])
}
