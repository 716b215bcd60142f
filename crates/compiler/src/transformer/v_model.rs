//! v-model is desugared into a value prop and an update handler.
//! The shape depends on the target: components, text inputs,
//! checkboxes, radios and selects each bind differently.
use super::{build_props::DirectiveTransformResult, v_on::handler, TransformContext};
use crate::{
    error::CompilationErrorKind as ErrorKind,
    flags::RuntimeHelper as RH,
    ir::{HandlerType, JsExpr as Js, Prop},
    parser::{Directive, DirectiveArg, ElemProp, Element},
    util::{find_prop, is_simple_identifier, rslint::is_member_expression, VStr},
};

const SELECTED_VALUES: &str = "Array.prototype.filter.call($event.target.options, o => o.selected).map(o => ";

pub fn transform_v_model<'a>(
    dir: &Directive<'a>,
    e: &Element<'a>,
    ctx: &TransformContext<'a>,
) -> DirectiveTransformResult<'a> {
    if let Some(error) = dir.check_empty_expr(ErrorKind::VModelNoExpression) {
        ctx.emit_error(error);
        return DirectiveTransformResult::Dropped;
    }
    let (raw, loc) = match &dir.expression {
        Some(v) => (v.content.raw.trim(), &v.location),
        None => return DirectiveTransformResult::Dropped,
    };
    if ctx.is_alias(raw) {
        ctx.emit(ErrorKind::VModelOnScopeVariable, loc);
        return DirectiveTransformResult::Dropped;
    }
    if !is_simple_identifier(VStr::raw(raw)) && !is_member_expression(raw) {
        ctx.emit(ErrorKind::VModelMalformedExpression, loc);
        return DirectiveTransformResult::Dropped;
    }
    let exp = ctx.process_expression(raw, loc);
    let props = if e.is_component() {
        component_model(dir, exp, ctx)
    } else {
        if dir.argument.is_some() {
            ctx.emit(ErrorKind::VModelArgOnElement, &dir.head_loc);
            return DirectiveTransformResult::Dropped;
        }
        match element_model(dir, e, exp, ctx) {
            Some(props) => props,
            None => return DirectiveTransformResult::Dropped,
        }
    };
    DirectiveTransformResult::Converted(Js::Props(props))
}

/// `$event => ((exp) = rhs)`
fn assign<'a>(exp: &Js<'a>, rhs: Js<'a>, ctx: &TransformContext<'a>) -> Js<'a> {
    let body = Js::Compound(vec![Js::Src("("), exp.clone(), Js::Src(") = "), rhs]);
    handler(body, HandlerType::InlineStmt, ctx)
}

fn modifiers_prop<'a>(dir: &Directive<'a>) -> Js<'a> {
    let mods = dir
        .modifiers
        .iter()
        .map(|m| (Js::str_lit(*m), Js::Src("true")))
        .collect();
    Js::Props(mods)
}

fn component_model<'a>(
    dir: &Directive<'a>,
    exp: Js<'a>,
    ctx: &TransformContext<'a>,
) -> Vec<Prop<'a>> {
    let (prop_name, event_name, mods_name) = match &dir.argument {
        None => (
            Js::str_lit("modelValue"),
            Js::str_lit("onUpdate:modelValue"),
            Js::str_lit("modelModifiers"),
        ),
        Some(DirectiveArg::Static(name)) => (
            Js::str_lit(*name),
            Js::OwnedLit(format!("onUpdate:{}", name)),
            Js::OwnedLit(format!("{}Modifiers", name)),
        ),
        Some(DirectiveArg::Dynamic(name)) => {
            let arg = ctx.process_expression(*name, &dir.head_loc);
            let prop = Js::Compound(vec![Js::Src("["), arg.clone(), Js::Src("]")]);
            let event =
                Js::Compound(vec![Js::Src(r#"["onUpdate:" + "#), arg.clone(), Js::Src("]")]);
            let mods = Js::Compound(vec![Js::Src("["), arg, Js::Src(r#" + "Modifiers"]"#)]);
            (prop, event, mods)
        }
    };
    let on_update = assign(&exp, Js::Src("$event"), ctx);
    let mut props = vec![(prop_name, exp), (event_name, on_update)];
    if !dir.modifiers.is_empty() {
        props.push((mods_name, modifiers_prop(dir)));
    }
    props
}

/// static or bound value of an attribute
fn attr_value<'a>(e: &Element<'a>, name: &str, ctx: &TransformContext<'a>) -> Option<Js<'a>> {
    match find_prop(e, name)? {
        ElemProp::Attr(attr) => Some(
            attr.value
                .as_ref()
                .map_or(Js::str_lit(""), |v| Js::StrLit(v.content)),
        ),
        ElemProp::Dir(dir) => {
            let v = dir.expression.as_ref()?;
            Some(ctx.process_expression(v.content.raw, &v.location))
        }
    }
}

fn element_model<'a>(
    dir: &Directive<'a>,
    e: &Element<'a>,
    exp: Js<'a>,
    ctx: &TransformContext<'a>,
) -> Option<Vec<Prop<'a>>> {
    let number = dir.has_modifier("number");
    let to_number = |v: Js<'a>| {
        if number {
            Js::Call(RH::LooseToNumber, vec![v])
        } else {
            v
        }
    };
    let props = match e.tag_name {
        "input" => {
            let ty = match find_prop(e, "type") {
                Some(ElemProp::Attr(attr)) => attr.value.as_ref().map(|v| v.content.raw),
                _ => None,
            };
            match ty {
                Some("file") => {
                    ctx.emit(ErrorKind::VModelOnFileInputElement, &dir.location);
                    return None;
                }
                Some("checkbox") => {
                    let rhs = Js::Src("$event.target.checked");
                    let on_change = assign(&exp, rhs, ctx);
                    vec![
                        (Js::str_lit("checked"), exp),
                        (Js::str_lit("onChange"), on_change),
                    ]
                }
                Some("radio") => {
                    let value = attr_value(e, "value", ctx).unwrap_or(Js::Src("undefined"));
                    let checked = Js::Call(RH::LooseEqual, vec![exp.clone(), value.clone()]);
                    let on_change = assign(&exp, to_number(value), ctx);
                    vec![
                        (Js::str_lit("checked"), checked),
                        (Js::str_lit("onChange"), on_change),
                    ]
                }
                _ => text_model(dir, exp, to_number, ctx),
            }
        }
        "textarea" => text_model(dir, exp, to_number, ctx),
        "select" => {
            let multiple = find_prop(e, "multiple").is_some();
            let rhs = if multiple {
                Js::Compound(vec![
                    Js::Src(SELECTED_VALUES),
                    to_number(Js::Src("o.value")),
                    Js::Src(")"),
                ])
            } else {
                to_number(Js::Src("$event.target.value"))
            };
            let on_change = assign(&exp, rhs, ctx);
            vec![
                (Js::str_lit("value"), exp),
                (Js::str_lit("onChange"), on_change),
            ]
        }
        _ => {
            ctx.emit(ErrorKind::VModelOnInvalidElement, &dir.location);
            return None;
        }
    };
    Some(props)
}

fn text_model<'a, F>(
    dir: &Directive<'a>,
    exp: Js<'a>,
    to_number: F,
    ctx: &TransformContext<'a>,
) -> Vec<Prop<'a>>
where
    F: Fn(Js<'a>) -> Js<'a>,
{
    let event = if dir.has_modifier("lazy") {
        "onChange"
    } else {
        "onInput"
    };
    let value = if dir.has_modifier("trim") {
        Js::Src("$event.target.value.trim()")
    } else {
        Js::Src("$event.target.value")
    };
    let handler = assign(&exp, to_number(value), ctx);
    vec![
        (Js::str_lit("value"), exp),
        (Js::str_lit(event), handler),
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ir::{CodegenNode, IrRoot},
        transformer::test::{base_transform, transform_errors},
    };

    fn keys(ir: &IrRoot) -> Vec<String> {
        match ir.codegen.get(ir.ast.children[0]) {
            Some(CodegenNode::VNodeCall(v)) => match &v.props {
                Some(Js::Props(ps)) => ps.iter().filter_map(|p| p.0.static_key()).collect(),
                p => panic!("not props {:?}", p),
            },
            n => panic!("not vnode {:?}", n),
        }
    }

    #[test]
    fn test_text_input() {
        let ir = base_transform(r#"<input v-model="msg">"#);
        assert_eq!(keys(&ir), vec!["value", "onInput"]);
        let ir = base_transform(r#"<textarea v-model.lazy="msg"></textarea>"#);
        assert_eq!(keys(&ir), vec!["value", "onChange"]);
    }

    #[test]
    fn test_checkbox_radio_select() {
        let ir = base_transform(r#"<input type="checkbox" v-model="ok">"#);
        assert_eq!(keys(&ir), vec!["type", "checked", "onChange"]);
        let ir = base_transform(r#"<input type="radio" value="a" v-model="pick">"#);
        assert_eq!(keys(&ir), vec!["type", "value", "checked", "onChange"]);
        let ir = base_transform(r#"<select v-model="sel" multiple></select>"#);
        assert_eq!(keys(&ir), vec!["multiple", "value", "onChange"]);
    }

    #[test]
    fn test_component() {
        let ir = base_transform(r#"<comp v-model.trim="msg"/>"#);
        assert_eq!(
            keys(&ir),
            vec!["modelValue", "onUpdate:modelValue", "modelModifiers"]
        );
        let ir = base_transform(r#"<comp v-model:title="t"/>"#);
        assert_eq!(keys(&ir), vec!["title", "onUpdate:title"]);
    }

    #[test]
    fn test_errors() {
        let cases = [
            (r#"<input v-model>"#, ErrorKind::VModelNoExpression),
            (r#"<input v-model="a + b">"#, ErrorKind::VModelMalformedExpression),
            (r#"<input type="file" v-model="f">"#, ErrorKind::VModelOnFileInputElement),
            (r#"<input v-model:foo="a">"#, ErrorKind::VModelArgOnElement),
            (r#"<div v-model="a"></div>"#, ErrorKind::VModelOnInvalidElement),
            (
                r#"<div v-for="i in l"><input v-model="i"></div>"#,
                ErrorKind::VModelOnScopeVariable,
            ),
        ];
        for (src, kind) in cases {
            assert_eq!(transform_errors(src), vec![kind], "{}", src);
        }
    }
}
