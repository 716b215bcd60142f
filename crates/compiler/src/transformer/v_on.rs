use super::{
    build_props::DirectiveTransformResult, transform_expression::has_scope_ref, TransformContext,
};
use crate::{
    error::CompilationErrorKind as ErrorKind,
    flags::RuntimeHelper,
    ir::{HandlerExpr, HandlerType, JsExpr as Js},
    parser::{AttributeValue, Directive, DirectiveArg},
    util::{
        is_simple_identifier,
        rslint::{is_fn_expression, is_member_expression, parse_js_expr},
        VStr,
    },
};

/// Event listener options, appended to the handler key: `onClickOnce`
const EVENT_OPTIONS: &[&str] = &["once", "capture", "passive"];
/// Guards checked by `withModifiers` at runtime
const NON_KEY_MODIFIERS: &[&str] = &[
    "stop", "prevent", "self", "ctrl", "shift", "alt", "meta", "exact", "middle",
];

fn is_keyboard_event(name: &str) -> bool {
    matches!(name, "keyup" | "keydown" | "keypress")
}

/// Modifiers of one `v-on`, split by where they end up.
#[derive(Debug, Default, PartialEq, Eq)]
struct ResolvedMods<'a> {
    event_options: Vec<&'a str>,
    key_modifiers: Vec<&'a str>,
    non_key_modifiers: Vec<&'a str>,
}

/// `static_event` is `None` for a dynamic event name.
fn resolve_modifiers<'a>(mods: &[&'a str], static_event: Option<&str>) -> ResolvedMods<'a> {
    let mut resolved = ResolvedMods::default();
    for &m in mods {
        if EVENT_OPTIONS.contains(&m) {
            resolved.event_options.push(m);
        } else if m == "left" || m == "right" {
            // mouse button or arrow key, depending on the event
            match static_event {
                Some(e) if is_keyboard_event(e) => resolved.key_modifiers.push(m),
                Some(_) => resolved.non_key_modifiers.push(m),
                None => {
                    resolved.key_modifiers.push(m);
                    resolved.non_key_modifiers.push(m);
                }
            }
        } else if NON_KEY_MODIFIERS.contains(&m) {
            resolved.non_key_modifiers.push(m);
        } else {
            resolved.key_modifiers.push(m);
        }
    }
    resolved
}

/// Moves runtime guards onto the handler. Key guards only apply to
/// keyboard events, or to dynamic events that might be one.
fn apply_modifiers<'a>(
    handler: Js<'a>,
    resolved: &ResolvedMods<'a>,
    static_event: Option<&str>,
) -> Js<'a> {
    let mut handler = match handler {
        Js::Handler(h) => h,
        other => return other,
    };
    handler.modifiers = resolved.non_key_modifiers.clone();
    let checks_keys = static_event.map_or(true, is_keyboard_event);
    if checks_keys {
        handler.key_modifiers = resolved.key_modifiers.clone();
    }
    Js::Handler(handler)
}

/// `@click.right` and `@click.middle` never fire `click` in browsers
fn event_name<'s>(name: &'s str, resolved: &ResolvedMods) -> &'s str {
    if !name.eq_ignore_ascii_case("click") {
        return name;
    }
    let mods = &resolved.non_key_modifiers;
    if mods.contains(&"right") {
        "contextmenu"
    } else if mods.contains(&"middle") {
        "mouseup"
    } else {
        name
    }
}

// this module process v-on without arg and with arg.
pub fn transform_v_on<'a>(
    dir: &Directive<'a>,
    ctx: &TransformContext<'a>,
) -> DirectiveTransformResult<'a> {
    if let Some(error) = dir.check_empty_expr(ErrorKind::VOnNoExpression) {
        // no argument no expr, just return
        if dir.argument.is_none() {
            ctx.emit_error(error);
            return DirectiveTransformResult::Dropped;
        }
        // allow @click.stop like
        if dir.modifiers.is_empty() {
            ctx.emit_error(error);
        }
    }
    let arg = match &dir.argument {
        Some(arg) => arg,
        None => {
            // bare v-on="obj" does not have mods
            let obj = match &dir.expression {
                Some(v) => ctx.process_expression(v.content.raw, &v.location),
                None => return DirectiveTransformResult::Dropped,
            };
            return DirectiveTransformResult::Converted(Js::Call(RuntimeHelper::ToHandlers, vec![obj]));
        }
    };
    let static_event = match arg {
        DirectiveArg::Static(s) => Some(*s),
        DirectiveArg::Dynamic(_) => None,
    };
    let resolved = resolve_modifiers(&dir.modifiers, static_event);
    let suffix: String = resolved
        .event_options
        .iter()
        .map(|m| VStr::raw(m).capitalize().into_string())
        .collect();
    let event_key = match arg {
        DirectiveArg::Static(s) => {
            let mut name = VStr::raw(event_name(*s, &resolved));
            name.be_handler().camelize();
            if suffix.is_empty() {
                Js::StrLit(name)
            } else {
                Js::OwnedLit(name.into_string() + &suffix)
            }
        }
        DirectiveArg::Dynamic(s) => {
            let e = ctx.process_expression(*s, &dir.head_loc);
            let mut parts = vec![Js::Src("["), Js::Call(RuntimeHelper::ToHandlerKey, vec![e])];
            if !suffix.is_empty() {
                parts.push(Js::Src(" + "));
                parts.push(Js::OwnedLit(suffix));
            }
            parts.push(Js::Src("]"));
            Js::Compound(parts)
        }
    };
    let handler = match &dir.expression {
        Some(v) if !v.content.trim().is_empty() => process_handler(v, ctx),
        // still a handler, so guards like `.prevent` apply
        _ => handler(Js::Src("() => {}"), HandlerType::FuncExpr, ctx),
    };
    let handler = apply_modifiers(handler, &resolved, static_event);
    DirectiveTransformResult::Converted(Js::Props(vec![(event_key, handler)]))
}

pub fn get_handler_type(raw: &str) -> HandlerType {
    if is_simple_identifier(VStr::raw(raw)) || is_member_expression(raw) {
        HandlerType::MemberExpr
    } else if is_fn_expression(raw) {
        HandlerType::FuncExpr
    } else {
        HandlerType::InlineStmt
    }
}

/// Wraps the handler expression. Whether the handler can be cached
/// is settled here so patch flags agree with the cache injector.
pub fn process_handler<'a>(value: &AttributeValue<'a>, ctx: &TransformContext<'a>) -> Js<'a> {
    let raw = value.content.raw.trim();
    let loc = &value.location;
    let ty = get_handler_type(raw);
    let body = match ty {
        HandlerType::MemberExpr | HandlerType::FuncExpr => ctx.process_expression(raw, loc),
        HandlerType::InlineStmt if raw.contains(';') && parse_js_expr(raw).is_none() => {
            // a; b  =>  a, b
            let stmts: Vec<_> = raw
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            let mut parts = vec![];
            for (i, stmt) in stmts.into_iter().enumerate() {
                if i > 0 {
                    parts.push(Js::Src(", "));
                }
                parts.push(ctx.process_expression_with(stmt, loc, &["$event"]));
            }
            Js::Compound(parts)
        }
        HandlerType::InlineStmt => ctx.process_expression_with(raw, loc, &["$event"]),
    };
    handler(body, ty, ctx)
}

pub fn handler<'a>(body: Js<'a>, ty: HandlerType, ctx: &TransformContext<'a>) -> Js<'a> {
    let scope_ref = has_scope_ref(&body);
    let cacheable = ctx.option.cache_bindings && !scope_ref && !ctx.in_v_once();
    Js::Handler(Box::new(HandlerExpr {
        body,
        ty,
        cacheable,
        cache_slot: None,
        scope_ref,
        modifiers: vec![],
        key_modifiers: vec![],
    }))
}
