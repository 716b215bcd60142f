//! HTML character reference decoding for text and attribute values.
//! Unknown or malformed references are written back untouched.
use super::named_chars::NAMED_CHAR_REF;
use lazy_static::lazy_static;
use std::fmt::{self, Write};

lazy_static! {
    static ref LONGEST_NAME: usize = NAMED_CHAR_REF.keys().map(|k| k.len()).max().unwrap_or(0);
}

/// Writes `s` with every character reference replaced.
/// In attributes a legacy named reference without `;` followed by
/// `=` or an alphanumeric is left alone, e.g. `?a=1&copy=2`.
pub fn decode_entities<W: Write>(s: &str, mut w: W, as_attr: bool) -> fmt::Result {
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        w.write_str(&rest[..amp])?;
        let reference = &rest[amp..];
        rest = match reference.strip_prefix("&#") {
            Some(num) => write_numeric(num, &mut w)?,
            None => write_named(&reference[1..], &mut w, as_attr)?,
        };
    }
    w.write_str(rest)
}

/// `src` starts right after `&`, returns the unconsumed tail
fn write_named<'s, W: Write>(src: &'s str, w: &mut W, as_attr: bool) -> Result<&'s str, fmt::Error> {
    let upper = LONGEST_NAME.min(src.len());
    // `&notin;` wins over `&not`
    let found = (2..=upper)
        .rev()
        .filter(|&len| src.is_char_boundary(len))
        .find_map(|len| NAMED_CHAR_REF.get_entry(&src[..len]));
    let (name, value) = match found {
        Some(entry) => entry,
        None => {
            w.write_char('&')?;
            return Ok(src);
        }
    };
    let tail = &src[name.len()..];
    let ambiguous = !name.ends_with(';')
        && tail.starts_with(|c: char| c == '=' || c.is_ascii_alphanumeric());
    if as_attr && ambiguous {
        w.write_char('&')?;
        w.write_str(name)?;
    } else {
        w.write_str(value)?;
    }
    Ok(tail)
}

/// `src` starts right after `&#`
fn write_numeric<'s, W: Write>(src: &'s str, w: &mut W) -> Result<&'s str, fmt::Error> {
    let (digits, radix, prefix) = match src.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => (hex, 16, "&#x"),
        None => (src, 10, "&#"),
    };
    let len = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let code = match u32::from_str_radix(&digits[..len], radix) {
        Ok(code) => code,
        // no digits or overflow
        Err(_) if len == 0 => {
            w.write_str(prefix)?;
            return Ok(digits);
        }
        Err(_) => u32::MAX,
    };
    let tail = &digits[len..];
    let tail = tail.strip_prefix(';').unwrap_or(tail);
    if let Some(c) = char::from_u32(normalize_code_point(code)) {
        w.write_char(c)?;
    }
    Ok(tail)
}

// https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state
fn normalize_code_point(code: u32) -> u32 {
    match code {
        0 | 0xd800..=0xdfff => 0xfffd,
        n if n > 0x10ffff => 0xfffd,
        0x80..=0x9f => WINDOWS_1252[(code - 0x80) as usize],
        n => n,
    }
}

/// C1 controls remapped the way browsers do, unmapped ones kept
const WINDOWS_1252: [u32; 32] = [
    0x20ac, 0x81, 0x201a, 0x0192, 0x201e, 0x2026, 0x2020, 0x2021, //
    0x02c6, 0x2030, 0x0160, 0x2039, 0x0152, 0x8d, 0x017d, 0x8f, //
    0x90, 0x2018, 0x2019, 0x201c, 0x201d, 0x2022, 0x2013, 0x2014, //
    0x02dc, 0x2122, 0x0161, 0x203a, 0x0153, 0x9d, 0x017e, 0x0178, //
];

#[cfg(test)]
mod test {
    use super::*;

    fn decode(s: &str, as_attr: bool) -> String {
        let mut out = String::new();
        decode_entities(s, &mut out, as_attr).unwrap();
        out
    }

    #[test]
    fn test_attr_legacy_ref() {
        assert_eq!(decode("?a=1&copy=2", true), "?a=1&copy=2");
        assert_eq!(decode("?a=1&copy=2", false), "?a=1\u{a9}=2");
        assert_eq!(decode("&amp;x", true), "&x");
    }

    #[test]
    fn test_html_decode() {
        let data = [
            ("", ""),
            ("Håll älgen, Örjan!", "Håll älgen, Örjan!"),
            ("&lt;p&gt;hej!&lt;/p&gt;", "<p>hej!</p>"),
            ("hej&#x3B;&#x20;hå", "hej; hå"),
            ("&quot;width&#x3A;&#32;3px&#59;&quot;", "\"width: 3px;\""),
            ("&#x2b;", "+"),
            ("&#128;", "\u{20ac}"),
            ("a &amp b", "a & b"),
            ("&unknown;", "&unknown;"),
            ("& b", "& b"),
            ("&#0;", "\u{fffd}"),
            ("&#;", "&#;"),
            ("&#x;", "&#x;"),
            ("&#99999999999;", "\u{fffd}"),
            ("&copy 2024", "\u{a9} 2024"),
        ];
        for (input, expected) in data {
            assert_eq!(decode(input, false), expected, "{}", input);
        }
    }
}
