//! Entry-level editing of RON text
//!
//! Splits RON structs and lists into the text of their values, using the
//! `ron` parser to find where each value ends. Scene loading uses this to
//! check list entries one at a time before the typed parse.

use ron::Deserializer;
use serde::de::IgnoredAny;
use serde::Deserialize;

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `text` without leading whitespace, comments or extension attributes
fn skip_blank(text: &str) -> Option<&str> {
    let de = Deserializer::from_str(text).ok()?;
    let remaining = de.remainder().len();
    text.get(text.len() - remaining..)
}

/// Split the value at the start of `text` from what follows it
fn split_value(text: &str) -> Option<(&str, &str)> {
    let mut de = Deserializer::from_str(text).ok()?;
    IgnoredAny::deserialize(&mut de).ok()?;
    let end = text.len() - de.remainder().len();
    Some((text.get(..end)?.trim_end(), text.get(end..)?))
}

/// Rewrite the value of `field` in the RON struct `text`
///
/// Returns `None` when `text` isn't a struct, has no such field, or `edit`
/// returns `None`.
pub(crate) fn edit_field(
    text: &str,
    field: &str,
    mut edit: impl FnMut(&str) -> Option<String>,
) -> Option<String> {
    // Optional struct name
    let body = skip_blank(text)?.trim_start_matches(is_ident_char);
    let mut rest = skip_blank(body)?.strip_prefix('(')?;

    loop {
        rest = skip_blank(rest)?;
        let name_len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        let (name, after) = rest.split_at(name_len);
        let value_text = skip_blank(skip_blank(after)?.strip_prefix(':')?)?;
        let (value, tail) = split_value(value_text)?;

        if name == field {
            let start = text.len() - value_text.len();
            let end = start + value.len();
            let replaced = edit(value)?;
            return Some(format!("{}{}{}", &text[..start], replaced, &text[end..]));
        }

        rest = skip_blank(tail)?.strip_prefix(',')?;
    }
}

/// Rebuild the RON list `text` from the entries `keep` accepts
///
/// `keep` gets each entry's index and text and returns the text to keep, or
/// `None` to drop the entry. Returns `None` when `text` isn't a list.
pub(crate) fn retain_entries(
    text: &str,
    mut keep: impl FnMut(usize, &str) -> Option<String>,
) -> Option<String> {
    let mut rest = skip_blank(text)?.strip_prefix('[')?;
    let mut kept = Vec::new();
    let mut index = 0;

    loop {
        rest = skip_blank(rest)?;
        if rest.starts_with(']') {
            break;
        }
        let (entry, tail) = split_value(rest)?;
        if let Some(entry) = keep(index, entry) {
            kept.push(entry);
        }
        index += 1;

        rest = skip_blank(tail)?;
        match rest.strip_prefix(',') {
            Some(after) => rest = after,
            None if rest.starts_with(']') => break,
            None => return None,
        }
    }

    Some(format!("[{}]", kept.join(", ")))
}
