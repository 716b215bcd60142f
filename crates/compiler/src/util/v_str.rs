//! Strings borrowed from the template with pending rewrites.
//! Transform passes only flip bits on a [`VStr`]; the rewrite itself
//! happens once, when codegen writes the string out.
use super::{decode_html::decode_entities, is_event_prop, json::write_json_string, non_whitespace};
use bitflags::bitflags;
use std::fmt::{self, Write};
use std::ops::Deref;

bitflags! {
    /// Pending rewrites. They run from the lowest bit upward, so
    /// `CAMEL_CASE | HANDLER_KEY` on `foo-bar` gives `onFooBar`.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct StrOps: u16 {
        const COMPRESS_WHITESPACE = 1 << 0;
        const DECODE_ENTITY       = 1 << 1;
        const CAMEL_CASE          = 1 << 2;
        const CAPITALIZED         = 1 << 3;
        const HANDLER_KEY         = 1 << 4;
        const COMPONENT_ID        = 1 << 5;
        const DIRECTIVE_ID        = 1 << 6;
        const JS_STRING           = 1 << 7;
        /// not a rewrite, switches entity decoding to attribute rules
        const IN_ATTR             = 1 << 8;
    }
}

/// `foo-bar` to `fooBar`, a dash not followed by `[A-Za-z0-9]` is kept
fn write_camelized<W: Write>(s: &str, w: &mut W) -> fmt::Result {
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '-' && next.is_ascii_alphanumeric() => {
                w.write_char(next.to_ascii_uppercase())?;
                chars.next();
            }
            _ => w.write_char(c)?,
        }
    }
    Ok(())
}

fn write_capitalized<W: Write>(s: &str, w: &mut W) -> fmt::Result {
    let mut chars = s.chars();
    if let Some(first) = chars.next() {
        first.to_uppercase().try_for_each(|c| w.write_char(c))?;
    }
    w.write_str(chars.as_str())
}

fn write_compressed<W: Write>(s: &str, w: &mut W) -> fmt::Result {
    let mut rest = s;
    while let Some(start) = rest.find(|c: char| c.is_ascii_whitespace()) {
        w.write_str(&rest[..start])?;
        w.write_char(' ')?;
        let run = &rest[start..];
        rest = run.find(non_whitespace).map_or("", |end| &run[end..]);
    }
    w.write_str(rest)
}

/// `my-comp` to `_component_my_comp`, other non identifier chars
/// become their code point
fn write_asset_id<W: Write>(s: &str, w: &mut W, kind: &str) -> fmt::Result {
    write!(w, "_{}_", kind)?;
    for c in s.chars() {
        match c {
            '-' => w.write_char('_')?,
            c if c.is_alphanumeric() || c == '$' || c == '_' => w.write_char(c)?,
            c => write!(w, "{}", c as u32)?,
        }
    }
    Ok(())
}

impl StrOps {
    fn apply<W: Write>(self, s: &str, w: &mut W, in_attr: bool) -> fmt::Result {
        match self {
            StrOps::COMPRESS_WHITESPACE => write_compressed(s, w),
            StrOps::DECODE_ENTITY => decode_entities(s, w, in_attr),
            StrOps::CAMEL_CASE => write_camelized(s, w),
            StrOps::CAPITALIZED => write_capitalized(s, w),
            StrOps::HANDLER_KEY => {
                w.write_str("on")?;
                write_capitalized(s, w)
            }
            StrOps::COMPONENT_ID => write_asset_id(s, w, "component"),
            StrOps::DIRECTIVE_ID => write_asset_id(s, w, "directive"),
            StrOps::JS_STRING => write_json_string(s, w),
            _ => w.write_str(s),
        }
    }

    fn write<W: Write>(self, s: &str, w: &mut W) -> fmt::Result {
        let in_attr = self.contains(StrOps::IN_ATTR);
        let pending = self.difference(StrOps::IN_ATTR);
        let count = pending.bits().count_ones() as usize;
        if count == 0 {
            return w.write_str(s);
        }
        // all but the last op go through a scratch buffer
        let mut current = s.to_string();
        for (i, op) in pending.iter().enumerate() {
            if i + 1 == count {
                return op.apply(&current, w, in_attr);
            }
            let mut next = String::with_capacity(current.len());
            op.apply(&current, &mut next, in_attr)?;
            current = next;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct VStr<'a> {
    pub raw: &'a str,
    pub ops: StrOps,
}

macro_rules! pending_op {
    ($($(#[$doc:meta])* $name:ident => $op:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&mut self) -> &mut Self {
                self.ops |= $op;
                self
            }
        )*
    };
}

impl<'a> VStr<'a> {
    pub fn raw(raw: &'a str) -> Self {
        Self {
            raw,
            ops: StrOps::empty(),
        }
    }

    pub fn is_handler(s: &VStr) -> bool {
        s.ops.contains(StrOps::HANDLER_KEY) || is_event_prop(s.raw)
    }

    pending_op! {
        camelize => StrOps::CAMEL_CASE;
        capitalize => StrOps::CAPITALIZED;
        compress_whitespace => StrOps::COMPRESS_WHITESPACE;
        /// `click` to `onClick`
        be_handler => StrOps::HANDLER_KEY;
        be_component => StrOps::COMPONENT_ID;
        be_directive => StrOps::DIRECTIVE_ID;
        be_js_str => StrOps::JS_STRING;
    }

    pub fn decode(&mut self, in_attr: bool) -> &mut Self {
        self.ops |= StrOps::DECODE_ENTITY;
        self.ops.set(StrOps::IN_ATTR, in_attr);
        self
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> fmt::Result {
        self.ops.write(self.raw, &mut w)
    }

    pub fn into_string(self) -> String {
        let mut out = String::with_capacity(self.raw.len());
        // String as fmt::Write is infallible
        let _ = self.write_to(&mut out);
        out
    }
}

impl<'a> Deref for VStr<'a> {
    type Target = str;
    fn deref(&self) -> &str {
        self.raw
    }
}

impl<'a> From<&'a str> for VStr<'a> {
    fn from(s: &'a str) -> Self {
        VStr::raw(s)
    }
}

#[cfg(feature = "serde")]
impl<'a> serde::Serialize for VStr<'a> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.into_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rewrite(s: &str, ops: StrOps) -> String {
        VStr { raw: s, ops }.into_string()
    }

    #[test]
    fn test_rewrites() {
        let cases = [
            ("plain", StrOps::empty(), "plain"),
            ("a\"b", StrOps::JS_STRING, r#""a\"b""#),
            ("click", StrOps::HANDLER_KEY, "onClick"),
            ("update:modelValue", StrOps::HANDLER_KEY, "onUpdate:modelValue"),
            ("foo-bar", StrOps::CAMEL_CASE | StrOps::HANDLER_KEY, "onFooBar"),
            ("foo-bar", StrOps::CAMEL_CASE, "fooBar"),
            ("foo-bar", StrOps::CAPITALIZED, "Foo-bar"),
            ("foo-bar", StrOps::CAMEL_CASE | StrOps::CAPITALIZED, "FooBar"),
            ("ébène", StrOps::CAPITALIZED, "Ébène"),
            ("", StrOps::CAPITALIZED, ""),
            ("-x-y", StrOps::CAMEL_CASE, "XY"),
            ("x--y", StrOps::CAMEL_CASE, "x-Y"),
            ("trailing-", StrOps::CAMEL_CASE, "trailing-"),
            ("my-comp", StrOps::COMPONENT_ID, "_component_my_comp"),
            ("a.b", StrOps::COMPONENT_ID, "_component_a46b"),
            ("focus-trap", StrOps::DIRECTIVE_ID, "_directive_focus_trap"),
            (" a \n\t b ", StrOps::COMPRESS_WHITESPACE, " a b "),
        ];
        for (src, ops, expected) in cases {
            assert_eq!(rewrite(src, ops), expected, "{:?} on {:?}", ops, src);
        }
    }

    #[test]
    fn test_decode_then_quote() {
        let mut text = VStr::raw("x &lt; y");
        text.decode(false).be_js_str();
        assert_eq!(text.into_string(), r#""x < y""#);
        let mut attr = VStr::raw("?a=1&copy=2");
        attr.decode(true);
        assert_eq!(attr.into_string(), "?a=1&copy=2");
    }

    #[test]
    fn test_is_handler() {
        assert!(VStr::is_handler(&VStr::raw("onClick")));
        assert!(VStr::is_handler(VStr::raw("click").be_handler()));
        assert!(!VStr::is_handler(&VStr::raw("online")));
    }
}
