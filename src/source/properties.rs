//! Java-style `.properties` parsing
//!
//! Supported syntax:
//! - `#` and `!` comment lines, blank lines
//! - `key=value`, `key:value` and `key value` separators
//! - a trailing odd number of backslashes continues the line; leading
//!   whitespace of the continuation is dropped
//! - escapes `\t \n \r \f \\ \uXXXX` (including surrogate pairs); any other
//!   escaped character stands for itself, so `\=`, `\:` and `\ ` can appear in keys
//!
//! A later duplicate key replaces the earlier value.

use super::{RawSettings, SourceFormat};
use crate::error::{Error, Result};

/// Whitespace characters that may separate a key from its value
const WHITESPACE: [char; 3] = [' ', '\t', '\u{c}'];

/// `.properties` source format
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesFormat;

impl SourceFormat for PropertiesFormat {
    fn extension(&self) -> &str {
        "properties"
    }

    fn parse(&self, content: &str, origin: &str) -> Result<RawSettings> {
        parse_properties(content, origin)
    }
}

/// Parse properties text into raw settings.
///
/// `origin` names the input in error messages (usually the file path).
pub fn parse_properties(content: &str, origin: &str) -> Result<RawSettings> {
    let mut settings = RawSettings::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let trimmed = line.trim_start_matches(WHITESPACE);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let line_no = index + 1;
        let mut logical = String::new();
        let mut current = trimmed;
        loop {
            if ends_with_continuation(current) {
                logical.push_str(&current[..current.len() - 1]);
                match lines.next() {
                    Some((_, next)) => current = next.trim_start_matches(WHITESPACE),
                    None => break,
                }
            } else {
                logical.push_str(current);
                break;
            }
        }

        let (key, value) = split_key_value(&logical);
        let parse_error = |reason: String| Error::Parse {
            origin: origin.to_string(),
            line: line_no,
            reason,
        };
        let key = unescape(key).map_err(parse_error)?;
        let value = unescape(value).map_err(parse_error)?;
        settings.set(key, value);
    }

    Ok(settings)
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line at the first unescaped separator
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if WHITESPACE.contains(&c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(WHITESPACE);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(WHITESPACE);
    }
    (key, rest)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let high = read_hex4(&mut chars)?;
                let code = if (0xD800..=0xDBFF).contains(&high) {
                    let rest = chars.as_str();
                    let low = rest
                        .strip_prefix("\\u")
                        .and_then(|r| r.get(..4))
                        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                        .filter(|low| (0xDC00..=0xDFFF).contains(low))
                        .ok_or_else(|| "Unpaired surrogate in \\uxxxx escape".to_string())?;
                    chars = rest[6..].chars();
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("Invalid character \\u{code:04X}"))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            // A lone trailing backslash is dropped
            None => {}
        }
    }

    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> std::result::Result<u32, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Malformed \\uxxxx encoding: \\u{hex}"));
    }
    u32::from_str_radix(&hex, 16).map_err(|e| format!("Malformed \\uxxxx encoding: {e}"))
}
