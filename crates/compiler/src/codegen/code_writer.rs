use super::{CodeGenerateOption, GenerateResult, Mapping, ScriptMode};
use crate::{
    flags::{HelperCollector, PatchFlag, RuntimeHelper as RH},
    ir::{
        Alternate, CacheKind, CodegenNode, ForParams, HandlerExpr, HandlerType, IrRoot,
        JsExpr as Js, RootCodegen, RuntimeDir, TextCall, VNodeCall,
    },
    parser::{AstNode, NodeId},
    util::{get_vnode_call_helper, is_simple_identifier, write_json_string, VStr},
    SourceLocation,
};

use std::fmt::{self, Write};

type Output = fmt::Result;

/// A chunk of generated code that tracks its own position,
/// so mappings can be shifted when chunks are joined.
#[derive(Default)]
struct Section {
    code: String,
    /// 0-based
    line: usize,
    /// 0-based, in chars
    column: usize,
    helpers: HelperCollector,
    mappings: Vec<Mapping>,
}

impl fmt::Write for Section {
    fn write_str(&mut self, s: &str) -> Output {
        for c in s.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.code.push_str(s);
        Ok(())
    }
}

impl Section {
    fn append(&mut self, other: Section) {
        let (line, column) = (self.line, self.column);
        for mut m in other.mappings {
            if m.generated_line == 1 {
                m.generated_column += column;
            }
            m.generated_line += line;
            self.mappings.push(m);
        }
        self.helpers = self.helpers.union(&other.helpers);
        // String never fails
        let _ = self.write_str(&other.code);
    }
}

pub struct CodeWriter<'a, 'b> {
    ir: &'b IrRoot<'a>,
    option: &'b CodeGenerateOption,
    out: Section,
    indent_level: usize,
    closing_brackets: usize,
}

impl<'a, 'b> CodeWriter<'a, 'b> {
    pub fn new(ir: &'b IrRoot<'a>, option: &'b CodeGenerateOption) -> Self {
        Self {
            ir,
            option,
            out: Section::default(),
            indent_level: 0,
            closing_brackets: 0,
        }
    }

    pub fn generate_root(mut self) -> GenerateResult {
        // writing into String never fails
        let _ = self.write_sections();
        let Section { code, mappings, .. } = self.out;
        let mappings = if self.option.source_map {
            Some(mappings)
        } else {
            None
        };
        GenerateResult { code, mappings }
    }

    fn write_sections(&mut self) -> Output {
        let hoists = self.section(|gen| gen.gen_hoists())?;
        self.indent_level = 1 + self.option.use_with_scope() as usize;
        let assets = self.section(|gen| gen.generate_assets())?;
        let body = self.section(|gen| gen.gen_render_body())?;
        self.indent_level = 0;
        let helpers = hoists
            .helpers
            .union(&assets.helpers)
            .union(&body.helpers);
        self.generate_preamble(helpers)?;
        self.out.append(hoists);
        self.generate_function_signature()?;
        self.generate_with_scope()?;
        self.out.append(assets);
        self.write_str("return ")?;
        self.out.append(body);
        self.generate_epilogue()
    }

    /// write into a fresh section and hand it back
    fn section<F>(&mut self, f: F) -> Result<Section, fmt::Error>
    where
        F: FnOnce(&mut Self) -> Output,
    {
        let saved = std::mem::take(&mut self.out);
        let ret = f(self);
        let section = std::mem::replace(&mut self.out, saved);
        ret.map(|_| section)
    }

    /// for import helpers or hoist that not in function
    fn generate_preamble(&mut self, helpers: HelperCollector) -> Output {
        if helpers.is_empty() {
            return Ok(());
        }
        let option = self.option;
        match &option.mode {
            ScriptMode::Module {
                runtime_module_name,
            } => {
                self.write_str("import { ")?;
                self.gen_helper_import_list(helpers, " as ")?;
                self.write_str(" } from ")?;
                write_json_string(runtime_module_name, &mut self.out)?;
            }
            ScriptMode::Function {
                runtime_global_name,
            } => {
                self.write_str("const { ")?;
                self.gen_helper_import_list(helpers, ": ")?;
                self.write_str(" } = ")?;
                self.write_str(runtime_global_name)?;
            }
        }
        self.write_str("\n\n")
    }

    fn gen_helper_import_list(&mut self, helpers: HelperCollector, sep: &str) -> Output {
        for (i, rh) in helpers.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.write_str(rh.helper_str())?;
            self.write_str(sep)?;
            self.write_str("_")?;
            self.write_str(rh.helper_str())?;
        }
        Ok(())
    }

    fn gen_hoists(&mut self) -> Output {
        let ir = self.ir;
        if ir.hoists.is_empty() {
            return Ok(());
        }
        for (i, hoist) in ir.hoists.iter().enumerate() {
            write!(self.out, "const _hoisted_{} = /*#__PURE__*/", i)?;
            self.gen_codegen(hoist)?;
            self.write_str("\n")?;
        }
        self.write_str("\n")
    }

    /// render() and its parameters
    fn generate_function_signature(&mut self) -> Output {
        let prefix = match self.option.mode {
            ScriptMode::Module { .. } => "export function render(_ctx, _cache",
            ScriptMode::Function { .. } => "return function render(_ctx, _cache",
        };
        self.write_str(prefix)?;
        let cache_size = self.ir.cache_size();
        if cache_size > 0 {
            write!(self.out, " = Array({})", cache_size)?;
        }
        self.write_str(") {")?;
        self.closing_brackets += 1;
        self.indent()
    }

    /// with (ctx) for unprefixed identifiers
    fn generate_with_scope(&mut self) -> Output {
        if !self.option.use_with_scope() {
            return Ok(());
        }
        self.write_str("with (_ctx) {")?;
        self.closing_brackets += 1;
        self.indent()
    }

    /// component/directive resolution inside render
    fn generate_assets(&mut self) -> Output {
        let ir = self.ir;
        if ir.components.is_empty() && ir.directives.is_empty() {
            return Ok(());
        }
        let comps = ir.components.iter().map(|c| (*c, RH::ResolveComponent));
        let dirs = ir.directives.iter().map(|d| (*d, RH::ResolveDirective));
        for (i, (asset, resolver)) in comps.chain(dirs).enumerate() {
            if i > 0 {
                self.newline()?;
            }
            self.gen_asset(asset, resolver)?;
        }
        // blank line before return
        self.write_str("\n")?;
        self.newline()
    }

    fn gen_asset(&mut self, asset: VStr<'a>, resolver: RH) -> Output {
        let mut name = asset;
        if resolver == RH::ResolveComponent {
            name.be_component();
        } else {
            name.be_directive();
        }
        self.write_str("const ")?;
        name.write_to(&mut self.out)?;
        self.write_str(" = ")?;
        self.write_helper(resolver)?;
        self.write_str("(")?;
        write_json_string(asset.raw, &mut self.out)?;
        self.write_str(")")
    }

    fn generate_epilogue(&mut self) -> Output {
        for _ in 0..self.closing_brackets {
            self.deindent()?;
            self.write_str("}")?;
        }
        debug_assert_eq!(self.indent_level, 0);
        self.write_str("\n")
    }

    fn gen_render_body(&mut self) -> Output {
        let ir = self.ir;
        match &ir.root {
            RootCodegen::Empty => self.write_str("null"),
            RootCodegen::Single(id) => self.gen_node(*id),
            RootCodegen::Fragment(v) => self.gen_vnode(v),
        }
    }

    fn gen_node(&mut self, id: NodeId) -> Output {
        let ir = self.ir;
        self.add_mapping(ir.ast.node(id));
        match ir.codegen.get(id) {
            Some(node) => self.gen_codegen(node),
            None => self.write_str("null"),
        }
    }

    fn add_mapping(&mut self, node: &AstNode) {
        if !self.option.source_map {
            return;
        }
        let source: SourceLocation = node.get_location().clone();
        self.out.mappings.push(Mapping {
            generated_line: self.out.line + 1,
            generated_column: self.out.column + 1,
            source,
        });
    }

    fn gen_codegen(&mut self, node: &CodegenNode<'a>) -> Output {
        match node {
            CodegenNode::VNodeCall(v) => self.gen_vnode(v),
            CodegenNode::TextCall(t) => self.gen_text(t),
            CodegenNode::CommentCall(c) => {
                self.write_helper(RH::CreateComment)?;
                self.write_str("(")?;
                write_json_string(c, &mut self.out)?;
                self.write_str(")")
            }
            CodegenNode::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => self.gen_conditional(test, *consequent, alternate),
            CodegenNode::ForExpr {
                source,
                params,
                body,
                is_stable,
                fragment_flag,
            } => {
                // unstable fragments must not track their dynamic children
                self.gen_open_block(!is_stable, |gen| {
                    gen.write_helper(RH::CreateElementBlock)?;
                    gen.write_str("(")?;
                    gen.write_helper(RH::Fragment)?;
                    gen.write_str(", null, ")?;
                    gen.gen_render_list(source, params, *body)?;
                    write!(gen.out, ", {})", fragment_flag)
                })
            }
            CodegenNode::CacheExpr { slot, kind, inner } => self.gen_cache(*slot, kind, inner),
            CodegenNode::HoistRef(i) => write!(self.out, "_hoisted_{}", i),
        }
    }

    fn gen_text(&mut self, t: &TextCall<'a>) -> Output {
        if t.fast_path {
            return self.gen_concate_str(&t.texts);
        }
        self.write_helper(RH::CreateText)?;
        self.write_str("(")?;
        self.gen_concate_str(&t.texts)?;
        if t.need_patch {
            write!(self.out, ", {}", PatchFlag::TEXT)?;
        }
        self.write_str(")")
    }

    fn gen_concate_str(&mut self, texts: &[Js<'a>]) -> Output {
        for (i, t) in texts.iter().enumerate() {
            if i > 0 {
                self.write_str(" + ")?;
            }
            self.generate_js_expr(t)?;
        }
        Ok(())
    }

    fn gen_conditional(
        &mut self,
        test: &Js<'a>,
        consequent: NodeId,
        alternate: &Alternate<'a>,
    ) -> Output {
        self.write_str("(")?;
        self.generate_js_expr(test)?;
        self.write_str(")")?;
        self.indent()?;
        self.write_str("? ")?;
        self.gen_node(consequent)?;
        self.newline()?;
        self.write_str(": ")?;
        match alternate {
            Alternate::Node(id) => self.gen_node(*id)?,
            Alternate::Conditional(c) => self.gen_codegen(c)?,
            Alternate::Comment => {
                self.write_helper(RH::CreateComment)?;
                self.write_str("(\"v-if\", true)")?;
            }
        }
        self.flush_deindent(1)
    }

    fn gen_render_list(&mut self, source: &Js<'a>, params: &ForParams<'a>, body: NodeId) -> Output {
        let ir = self.ir;
        let memo = match ir.codegen.get(body) {
            Some(CodegenNode::CacheExpr {
                slot,
                kind: CacheKind::MemoInVFor { expr, key },
                inner,
            }) => Some((*slot, expr, key, inner)),
            _ => None,
        };
        self.write_helper(RH::RenderList)?;
        self.write_str("(")?;
        self.generate_js_expr(source)?;
        self.write_str(", ")?;
        let cached = Js::Src("_cached");
        let mut ps = vec![params.value.as_ref(), params.key.as_ref(), params.index.as_ref()];
        let (slot, expr, key, inner) = match memo {
            Some(memo) => memo,
            None => {
                self.gen_func_params(&ps)?;
                self.write_str(" => {")?;
                self.indent()?;
                self.write_str("return ")?;
                self.gen_node(body)?;
                self.deindent()?;
                return self.write_str("})");
            }
        };
        ps.push(Some(&cached));
        self.gen_func_params(&ps)?;
        self.write_str(" => {")?;
        self.indent()?;
        self.write_str("const _memo = (")?;
        self.generate_js_expr(expr)?;
        self.write_str(")")?;
        self.newline()?;
        self.write_str("if (_cached")?;
        if let Some(key) = key {
            self.write_str(" && _cached.key === ")?;
            self.generate_js_expr(key)?;
        }
        self.write_str(" && ")?;
        self.write_helper(RH::IsMemoSame)?;
        self.write_str("(_cached, _memo)) return _cached")?;
        self.newline()?;
        self.write_str("const _item = ")?;
        self.add_mapping(ir.ast.node(body));
        self.gen_codegen(inner)?;
        self.newline()?;
        self.write_str("_item.memo = _memo")?;
        self.newline()?;
        self.write_str("return _item")?;
        self.deindent()?;
        write!(self.out, "}}, _cache, {})", slot)
    }

    fn gen_func_params(&mut self, params: &[Option<&Js<'a>>]) -> Output {
        let last = params
            .iter()
            .rposition(Option::is_some)
            .map(|i| i + 1)
            .unwrap_or(0);
        // skipped params are named `_`, `__`, ... in order
        let mut skipped = 0;
        self.write_str("(")?;
        for (i, p) in params.iter().take(last).enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            match p {
                Some(p) => self.generate_js_expr(p)?,
                None => {
                    skipped += 1;
                    self.write_str(&"_".repeat(skipped))?;
                }
            }
        }
        self.write_str(")")
    }

    fn gen_cache(&mut self, slot: usize, kind: &CacheKind<'a>, inner: &CodegenNode<'a>) -> Output {
        match kind {
            CacheKind::Once => {
                write!(self.out, "_cache[{}] || (", slot)?;
                self.indent()?;
                self.write_helper(RH::SetBlockTracking)?;
                self.write_str("(-1),")?;
                self.newline()?;
                write!(self.out, "_cache[{}] = ", slot)?;
                self.gen_codegen(inner)?;
                self.write_str(",")?;
                self.newline()?;
                self.write_helper(RH::SetBlockTracking)?;
                self.write_str("(1),")?;
                self.newline()?;
                write!(self.out, "_cache[{}]", slot)?;
                self.deindent()?;
                self.write_str(")")
            }
            // v-memo inside v-for is written by the render list
            CacheKind::Memo(expr) | CacheKind::MemoInVFor { expr, .. } => {
                self.write_helper(RH::WithMemo)?;
                self.write_str("(")?;
                self.generate_js_expr(expr)?;
                self.write_str(", () => ")?;
                self.gen_codegen(inner)?;
                write!(self.out, ", _cache, {})", slot)
            }
        }
    }

    fn gen_vnode(&mut self, v: &VNodeCall<'a>) -> Output {
        if v.directives.is_empty() {
            return self.gen_vnode_with_block(v);
        }
        self.write_helper(RH::WithDirectives)?;
        self.write_str("(")?;
        self.gen_vnode_with_block(v)?;
        self.write_str(", [")?;
        for (i, dir) in v.directives.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.gen_runtime_dir(dir)?;
        }
        self.write_str("])")
    }

    fn gen_runtime_dir(&mut self, dir: &RuntimeDir<'a>) -> Output {
        let arr = [Some(&dir.name), dir.expr.as_ref(), dir.arg.as_ref(), dir.mods.as_ref()];
        let last = arr.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        self.write_str("[")?;
        for (i, e) in arr.iter().take(last).enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            match e {
                Some(e) => self.generate_js_expr(e)?,
                None => self.write_str("void 0")?,
            }
        }
        self.write_str("]")
    }

    fn gen_vnode_with_block(&mut self, v: &VNodeCall<'a>) -> Output {
        if !v.is_block {
            return self.gen_vnode_real(v);
        }
        self.gen_open_block(false, |gen| gen.gen_vnode_real(v))
    }

    fn gen_open_block<K>(&mut self, no_track: bool, cont: K) -> Output
    where
        K: FnOnce(&mut Self) -> Output,
    {
        self.write_str("(")?;
        self.write_helper(RH::OpenBlock)?;
        self.write_str("(")?;
        if no_track {
            self.write_str("true")?;
        }
        self.write_str("), ")?;
        cont(self)?;
        self.write_str(")")
    }

    fn gen_vnode_real(&mut self, v: &VNodeCall<'a>) -> Output {
        let call_helper = get_vnode_call_helper(v);
        self.write_helper(call_helper)?;
        self.write_str("(")?;
        gen_vnode_call_args(self, v)?;
        self.write_str(")")
    }

    fn gen_vnode_children(&mut self, v: &VNodeCall<'a>) -> Output {
        if v.is_component && !v.raw_children {
            return self.gen_default_slot(v);
        }
        self.generate_children(&v.children)
    }

    /// `{ default: _withCtx(() => [..]), _: 1 }`
    fn gen_default_slot(&mut self, v: &VNodeCall<'a>) -> Output {
        self.write_str("{")?;
        self.indent()?;
        self.write_str("default: ")?;
        self.write_helper(RH::WithCtx)?;
        self.write_str("(() => ")?;
        self.gen_children_array(&v.children)?;
        self.write_str("),")?;
        self.newline()?;
        if v.patch_flag.contains(PatchFlag::DYNAMIC_SLOTS) {
            self.write_str("_: 2 /* DYNAMIC */")?;
        } else {
            self.write_str("_: 1 /* STABLE */")?;
        }
        self.deindent()?;
        self.write_str("}")
    }

    fn generate_children(&mut self, children: &[NodeId]) -> Output {
        debug_assert!(!children.is_empty());
        let ir = self.ir;
        if let [only] = children {
            if let Some(CodegenNode::TextCall(t)) = ir.codegen.get(*only) {
                if t.fast_path {
                    // generate sole text node without []
                    return self.gen_node(*only);
                }
            }
        }
        self.gen_children_array(children)
    }

    fn gen_children_array(&mut self, children: &[NodeId]) -> Output {
        self.write_str("[")?;
        self.indent()?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.write_str(",")?;
                self.newline()?;
            }
            self.gen_node(*child)?;
        }
        self.deindent()?;
        self.write_str("]")
    }

    fn generate_js_expr(&mut self, expr: &Js<'a>) -> Output {
        match expr {
            Js::Src(s) | Js::Param(s) => self.write_str(s),
            Js::Num(n) => write!(self.out, "{}", n),
            Js::StrLit(l) => {
                let mut l = *l;
                l.be_js_str().write_to(&mut self.out)
            }
            Js::OwnedLit(s) => write_json_string(s, &mut self.out),
            Js::Simple(e, _) => e.write_to(&mut self.out),
            Js::Ctx(name) => {
                let option = self.option;
                self.write_str(&option.expression_prefix)?;
                self.write_str(name)
            }
            Js::Symbol(s) => self.write_helper(*s),
            Js::Props(p) => self.gen_obj_props(p),
            Js::Compound(v) => {
                for e in v {
                    self.generate_js_expr(e)?;
                }
                Ok(())
            }
            Js::Array(a) => {
                self.write_str("[")?;
                self.gen_list(a)?;
                self.write_str("]")
            }
            Js::Call(c, args) => {
                self.write_helper(*c)?;
                self.write_str("(")?;
                self.gen_list(args)?;
                self.write_str(")")
            }
            Js::Handler(h) => self.gen_handler(h),
        }
    }

    fn gen_handler(&mut self, h: &HandlerExpr<'a>) -> Output {
        if let Some(slot) = h.cache_slot {
            write!(self.out, "_cache[{0}] || (_cache[{0}] = ", slot)?;
        }
        // withKeys(withModifiers(fn, mods), keys)
        if !h.key_modifiers.is_empty() {
            self.write_helper(RH::WithKeys)?;
            self.write_str("(")?;
        }
        if !h.modifiers.is_empty() {
            self.write_helper(RH::WithModifiers)?;
            self.write_str("(")?;
        }
        self.gen_handler_fn(h)?;
        if !h.modifiers.is_empty() {
            self.write_str(", ")?;
            self.gen_str_array(&h.modifiers)?;
            self.write_str(")")?;
        }
        if !h.key_modifiers.is_empty() {
            self.write_str(", ")?;
            self.gen_str_array(&h.key_modifiers)?;
            self.write_str(")")?;
        }
        if h.cache_slot.is_some() {
            self.write_str(")")?;
        }
        Ok(())
    }

    fn gen_str_array(&mut self, items: &[&str]) -> Output {
        self.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            write_json_string(item, &mut self.out)?;
        }
        self.write_str("]")
    }

    fn gen_handler_fn(&mut self, h: &HandlerExpr<'a>) -> Output {
        match h.ty {
            HandlerType::FuncExpr => self.generate_js_expr(&h.body),
            // the member is looked up on every call
            HandlerType::MemberExpr if h.cache_slot.is_some() => {
                self.write_str("(...args) => ")?;
                self.generate_js_expr(&h.body)?;
                self.write_str("?.(...args)")
            }
            HandlerType::MemberExpr => self.generate_js_expr(&h.body),
            HandlerType::InlineStmt => {
                self.write_str("$event => (")?;
                self.generate_js_expr(&h.body)?;
                self.write_str(")")
            }
        }
    }

    /// generate a comma separated list
    fn gen_list(&mut self, exprs: &[Js<'a>]) -> Output {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.generate_js_expr(e)?;
        }
        Ok(())
    }

    fn gen_obj_props(&mut self, props: &[(Js<'a>, Js<'a>)]) -> Output {
        if props.is_empty() {
            return self.write_str("{}");
        }
        self.write_str("{ ")?;
        for (i, (key, val)) in props.iter().enumerate() {
            if i > 0 {
                self.write_str(", ")?;
            }
            self.gen_obj_key(key)?;
            self.write_str(": ")?;
            self.generate_js_expr(val)?;
        }
        self.write_str(" }")
    }

    fn gen_obj_key(&mut self, key: &Js<'a>) -> Output {
        match key {
            Js::StrLit(k) if is_simple_identifier(*k) => k.write_to(&mut self.out),
            Js::OwnedLit(k) if is_simple_identifier(VStr::raw(k)) => self.write_str(k),
            // dynamic keys carry their own brackets
            _ => self.generate_js_expr(key),
        }
    }

    fn newline(&mut self) -> Output {
        self.write_str("\n")?;
        for _ in 0..self.indent_level {
            self.write_str("  ")?;
        }
        Ok(())
    }
    fn indent(&mut self) -> Output {
        self.indent_level += 1;
        self.newline()
    }
    fn deindent(&mut self) -> Output {
        debug_assert!(self.indent_level > 0);
        self.indent_level -= 1;
        self.newline()
    }
    fn flush_deindent(&mut self, mut indent: usize) -> Output {
        debug_assert!(self.indent_level >= indent);
        while indent > 0 {
            self.indent_level -= 1;
            indent -= 1;
        }
        Ok(())
    }

    #[inline(always)]
    fn write_str(&mut self, s: &str) -> Output {
        self.out.write_str(s)
    }

    #[inline(always)]
    fn write_helper(&mut self, h: RH) -> Output {
        self.out.helpers.collect(h);
        self.write_str("_")?;
        self.write_str(h.helper_str())
    }
}

// no, repeating myself is good. macro is bad
/// Takes generator and, condition/generation code pairs.
/// It first finds the last index to write.
/// then generate code for each arg, filling null if empty
/// util the last index to write is reached.
macro_rules! gen_vnode_args {
    (
    $gen:ident,
    $(
        $condition: expr, { $($generate: tt)* }
    )*) => {
        // 1. find the last index to write
        let mut i = 0;
        let mut j = 0;
        $(
            j += 1;
            if $condition {
                i = j;
            }
        )*
        // 2. write code
        j = -1;
        $(
            j += 1;
            if $condition {
                // write comma separator
                if j > 0 {
                    $gen.write_str(", ")?;
                }
                $($generate)*
            } else if i > j {
                // fill null, add comma since first condition must be true
                $gen.write_str(", null")?;
            } else {
                return Ok(())
            }
        )*
    }
}

/// Generate variadic vnode call argument list separated by comma.
/// VNode arg is a heterogeneous list we need hard code the generation.
fn gen_vnode_call_args<'a>(gen: &mut CodeWriter<'a, '_>, v: &VNodeCall<'a>) -> Output {
    let VNodeCall {
        tag,
        props,
        children,
        patch_flag,
        dynamic_props,
        ..
    } = v;
    gen_vnode_args!(
        gen,
        true, { gen.generate_js_expr(tag)?; }
        props.is_some(), {
            if let Some(props) = props {
                gen.generate_js_expr(props)?;
            }
        }
        !children.is_empty(), { gen.gen_vnode_children(v)?; }
        !patch_flag.is_empty(), { write!(gen.out, "{}", patch_flag)?; }
        !dynamic_props.is_empty(), {
            gen.write_str("[")?;
            gen.gen_list(dynamic_props)?;
            gen.write_str("]")?;
        }
    );
    Ok(())
}
