// 1. validate expression with the js sub-parser
// 2. prefix identifiers that resolve on the render context
// 3. compute static level
use super::TransformContext;
use crate::{
    error::{CompilationError, CompilationErrorKind as ErrorKind},
    flags::StaticLevel,
    ir::JsExpr as Js,
    util::{
        is_global_allow_listed, is_literal_keyword, is_simple_identifier,
        rslint::{collect_identifiers, collect_local_names, parse_js_expr},
        VStr,
    },
    SourceLocation,
};

impl<'a> TransformContext<'a> {
    pub fn process_expression(&self, raw: &'a str, loc: &SourceLocation) -> Js<'a> {
        self.process_expression_with(raw, loc, &[])
    }

    /// `locals` are names bound by the surrounding generated code,
    /// e.g. `$event` in inline handlers.
    pub fn process_expression_with(
        &self,
        raw: &'a str,
        loc: &SourceLocation,
        locals: &[&str],
    ) -> Js<'a> {
        let text = raw.trim();
        if text.is_empty() {
            return Js::Simple(VStr::raw(text), StaticLevel::CanStringify);
        }
        if is_simple_identifier(VStr::raw(text)) {
            return self.rewrite_identifier(text, locals);
        }
        let expr = match parse_js_expr(text) {
            Some(expr) => expr,
            None => {
                let error = CompilationError::new(ErrorKind::InvalidExpression)
                    .with_location(loc.clone())
                    .with_additional_message(text.to_string());
                self.emit_error(error);
                return Js::Simple(VStr::raw(text), StaticLevel::NotStatic);
            }
        };
        let bound: Vec<&str> = collect_local_names(&expr)
            .into_iter()
            .map(|r| &text[r])
            .collect();
        let mut level = StaticLevel::CanStringify;
        let mut parts = vec![];
        let mut last = 0;
        for ident in collect_identifiers(&expr) {
            let name = &text[ident.range.clone()];
            if bound.contains(&name) {
                continue;
            }
            let rewritten = self.rewrite_identifier(name, locals);
            if let Js::Simple(_, l) = rewritten {
                level = level.min(l);
                continue;
            }
            level = StaticLevel::NotStatic;
            parts.push(Js::Src(&text[last..ident.range.start]));
            if ident.is_shorthand {
                // { a } => { a: _ctx.a }
                parts.push(Js::Src(name));
                parts.push(Js::Src(": "));
            }
            parts.push(rewritten);
            last = ident.range.end;
        }
        if parts.is_empty() {
            return Js::Simple(VStr::raw(text), level);
        }
        parts.push(Js::Src(&text[last..]));
        parts.retain(|p| !matches!(p, Js::Src("")));
        Js::Compound(parts)
    }

    fn rewrite_identifier(&self, name: &'a str, locals: &[&str]) -> Js<'a> {
        if locals.contains(&name) {
            Js::Simple(VStr::raw(name), StaticLevel::CanStringify)
        } else if self.is_alias(name) {
            Js::Param(name)
        } else if is_literal_keyword(name) {
            Js::Simple(VStr::raw(name), StaticLevel::CanStringify)
        } else if is_global_allow_listed(name) {
            Js::Simple(VStr::raw(name), StaticLevel::CanHoist)
        } else {
            Js::Ctx(name)
        }
    }
}

/// whether the expression references a v-for alias
pub fn has_scope_ref(expr: &Js) -> bool {
    match expr {
        Js::Param(_) => true,
        Js::Compound(v) | Js::Array(v) | Js::Call(_, v) => v.iter().any(has_scope_ref),
        Js::Props(ps) => ps.iter().any(|(k, v)| has_scope_ref(k) || has_scope_ref(v)),
        Js::Handler(h) => h.scope_ref,
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::VecErrorHandler,
        parser::AstRoot,
        transformer::TransformOption,
    };

    fn ctx<'a>(eh: VecErrorHandler) -> TransformContext<'a> {
        TransformContext::new(AstRoot::default(), TransformOption::default(), Box::new(eh))
    }

    fn ctx_names<'a>(e: &Js<'a>) -> Vec<&'a str> {
        match e {
            Js::Ctx(n) => vec![*n],
            Js::Compound(v) => v.iter().flat_map(ctx_names).collect(),
            _ => vec![],
        }
    }

    #[test]
    fn test_simple_identifier() {
        let c = ctx(VecErrorHandler::default());
        let loc = SourceLocation::default();
        assert!(matches!(c.process_expression("msg", &loc), Js::Ctx("msg")));
        assert!(matches!(
            c.process_expression("true", &loc),
            Js::Simple(_, StaticLevel::CanStringify)
        ));
        assert!(matches!(
            c.process_expression("Math", &loc),
            Js::Simple(_, StaticLevel::CanHoist)
        ));
    }

    #[test]
    fn test_prefix_compound() {
        let c = ctx(VecErrorHandler::default());
        let loc = SourceLocation::default();
        let e = c.process_expression("a + b.c(d, Math.max(1, e))", &loc);
        assert_eq!(ctx_names(&e), vec!["a", "b", "d", "e"]);
        assert_eq!(e.static_level(), StaticLevel::NotStatic);
        let e = c.process_expression("(x) => x + y", &loc);
        assert_eq!(ctx_names(&e), vec!["y"]);
        let e = c.process_expression("1 + 2", &loc);
        assert!(matches!(e, Js::Simple(_, StaticLevel::CanStringify)));
    }

    #[test]
    fn test_alias_is_param() {
        let mut c = ctx(VecErrorHandler::default());
        let loc = SourceLocation::default();
        c.add_alias("item");
        let e = c.process_expression("item.id + other", &loc);
        assert!(has_scope_ref(&e));
        assert_eq!(ctx_names(&e), vec!["other"]);
        c.remove_alias("item");
        let e = c.process_expression("item.id", &loc);
        assert!(!has_scope_ref(&e));
    }

    #[test]
    fn test_shorthand() {
        let c = ctx(VecErrorHandler::default());
        let e = c.process_expression("{ a }", &SourceLocation::default());
        let parts = match e {
            Js::Compound(parts) => parts,
            _ => panic!("not compound"),
        };
        assert!(matches!(parts[1], Js::Src("a")));
        assert!(matches!(parts[2], Js::Src(": ")));
        assert!(matches!(parts[3], Js::Ctx("a")));
    }

    #[test]
    fn test_invalid_expression() {
        let eh = VecErrorHandler::default();
        let c = ctx(eh.clone());
        let e = c.process_expression("a b", &SourceLocation::default());
        assert!(matches!(e, Js::Simple(v, StaticLevel::NotStatic) if v.raw == "a b"));
        let errors = eh.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::InvalidExpression);
    }
}
