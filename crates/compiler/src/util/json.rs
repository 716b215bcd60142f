//! JSON string literal writer for fmt::Write sinks.
use std::fmt::{Result as Ret, Write};

/// Escape char for a byte, `None` if the byte is written as is.
#[inline]
fn escape_of(b: u8) -> Option<char> {
    Some(match b {
        b'"' => '"',
        b'\\' => '\\',
        b'\n' => 'n',
        b'\r' => 'r',
        b'\t' => 't',
        0x08 => 'b',
        0x0c => 'f',
        0..=0x1f => 'u',
        _ => return None,
    })
}

#[inline(never)]
fn write_escaped<W: Write>(w: &mut W, string: &str, mut start: usize) -> Ret {
    w.write_str(&string[..start])?;
    for (index, b) in string.bytes().enumerate().skip(start) {
        let escape = match escape_of(b) {
            Some(e) => e,
            None => continue,
        };
        w.write_str(&string[start..index])?;
        w.write_char('\\')?;
        w.write_char(escape)?;
        if escape == 'u' {
            write!(w, "{:04x}", b)?;
        }
        start = index + 1;
    }
    w.write_str(&string[start..])
}

pub fn write_json_string<W: Write>(string: &str, mut w: W) -> Ret {
    w.write_char('"')?;
    match string.bytes().position(|b| escape_of(b).is_some()) {
        Some(index) => write_escaped(&mut w, string, index)?,
        None => w.write_str(string)?,
    }
    w.write_char('"')
}
