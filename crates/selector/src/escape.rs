//! CSS identifier escaping.
//!
//! Implements the CSSOM "serialize an identifier" rules (the algorithm
//! behind `CSS.escape`), so arbitrary ids and class tokens become
//! syntactically safe selector fragments.

use std::fmt::Write;

/// Escape `raw` for use as a CSS identifier.
pub fn escape_ident(raw: &str) -> String {
    let length = raw.chars().count();
    let mut out = String::with_capacity(raw.len());

    for (index, ch) in raw.chars().enumerate() {
        let code = ch as u32;
        if code == 0 {
            out.push('\u{FFFD}');
        } else if (0x01..=0x1f).contains(&code) || code == 0x7f {
            push_hex_escape(&mut out, code);
        } else if index == 0 && ch.is_ascii_digit() {
            // An identifier cannot start with a digit
            push_hex_escape(&mut out, code);
        } else if index == 1 && ch.is_ascii_digit() && raw.starts_with('-') {
            push_hex_escape(&mut out, code);
        } else if index == 0 && ch == '-' && length == 1 {
            out.push('\\');
            out.push('-');
        } else if code >= 0x80 || ch == '-' || ch == '_' || ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }

    out
}

/// Hex escape with its terminating space, e.g. `\31 `.
fn push_hex_escape(out: &mut String, code: u32) {
    // String formatting is infallible
    let _ = write!(out, "\\{code:x} ");
}
