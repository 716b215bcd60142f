use super::{build_props::DirectiveTransformResult, TransformContext};
use crate::{
    error::CompilationErrorKind as ErrorKind,
    flags::RuntimeHelper,
    ir::JsExpr as Js,
    parser::{Directive, DirectiveArg},
    util::VStr,
};

// this module process v-bind without arg and with arg.
pub fn transform_v_bind<'a>(
    dir: &Directive<'a>,
    ctx: &TransformContext<'a>,
) -> DirectiveTransformResult<'a> {
    let value = match dir.check_empty_expr(ErrorKind::VBindNoExpression) {
        Some(error) => {
            ctx.emit_error(error);
            if dir.argument.is_none() {
                return DirectiveTransformResult::Dropped;
            }
            // <p :test> becomes {test: ""}
            Js::str_lit("")
        }
        None => match &dir.expression {
            Some(v) => ctx.process_expression(v.content.raw, &v.location),
            None => return DirectiveTransformResult::Dropped,
        },
    };
    let arg = match &dir.argument {
        Some(arg) => arg,
        // v-bind="obj" is spread into props
        None => return DirectiveTransformResult::Converted(value),
    };
    let is_camel = dir.has_modifier("camel");
    let prefix = if dir.has_modifier("prop") {
        Some(".")
    } else if dir.has_modifier("attr") {
        Some("^")
    } else {
        None
    };
    let key = match arg {
        DirectiveArg::Static(name) => {
            let mut name = VStr::raw(*name);
            if is_camel {
                name.camelize();
            }
            match prefix {
                Some(p) => Js::OwnedLit(format!("{}{}", p, name.into_string())),
                None => Js::StrLit(name),
            }
        }
        DirectiveArg::Dynamic(expr) => {
            let expr = ctx.process_expression(*expr, &dir.head_loc);
            let expr = Js::Compound(vec![expr, Js::Src(r#" || """#)]);
            let expr = if is_camel {
                Js::Call(RuntimeHelper::Camelize, vec![expr])
            } else {
                expr
            };
            let mut parts = vec![Js::Src("[")];
            if let Some(p) = prefix {
                parts.push(Js::Src(if p == "." { r#""." + "# } else { r#""^" + "# }));
            }
            parts.push(expr);
            parts.push(Js::Src("]"));
            Js::Compound(parts)
        }
    };
    DirectiveTransformResult::Converted(Js::Props(vec![(key, value)]))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ir::CodegenNode,
        transformer::test::{transform_errors, transform_no_hoist},
    };

    fn first_props<'a>(src: &'a str) -> Vec<(Js<'a>, Js<'a>)> {
        let ir = transform_no_hoist(src);
        match ir.codegen.get(ir.ast.children[0]) {
            Some(CodegenNode::VNodeCall(v)) => match &v.props {
                Some(Js::Props(ps)) => ps.clone(),
                p => panic!("not props {:?}", p),
            },
            n => panic!("not vnode {:?}", n),
        }
    }

    #[test]
    fn test_static_arg() {
        let props = first_props(r#"<div :foo-bar.camel="a"/>"#);
        assert_eq!(props[0].0.static_key().unwrap(), "fooBar");
        assert!(matches!(props[0].1, Js::Ctx("a")));
        let props = first_props(r#"<div :inner-html.prop="a" :id.attr="b"/>"#);
        assert_eq!(props[0].0.static_key().unwrap(), ".inner-html");
        assert_eq!(props[1].0.static_key().unwrap(), "^id");
        let props = first_props(r#"<div .text-content="a"/>"#);
        assert_eq!(props[0].0.static_key().unwrap(), ".text-content");
    }

    #[test]
    fn test_dynamic_arg() {
        let props = first_props(r#"<div :[key]="a"/>"#);
        match &props[0].0 {
            Js::Compound(parts) => {
                assert!(matches!(parts[0], Js::Src("[")));
                assert!(matches!(&parts[1], Js::Compound(inner) if matches!(inner[0], Js::Ctx("key"))));
            }
            k => panic!("wrong key {:?}", k),
        }
    }

    #[test]
    fn test_no_expression() {
        assert_eq!(transform_errors("<div :id/>"), vec![ErrorKind::VBindNoExpression]);
        let props = first_props("<div :id/>");
        assert!(matches!(&props[0].1, Js::StrLit(v) if v.raw.is_empty()));
        assert_eq!(transform_errors("<div v-bind/>"), vec![ErrorKind::VBindNoExpression]);
    }
}
