//! `{name}` placeholder substitution for prompt templates.
//!
//! A placeholder is `{` + identifier + `}` where the identifier matches
//! `[A-Za-z_][A-Za-z0-9_]*`. `{{` and `}}` produce literal braces. Any other
//! brace is kept as literal text.
//!
//! Substitution is all-or-nothing: it stops at the first placeholder whose
//! key is missing. Strict rendering reports that key; lenient rendering
//! returns the original template untouched, even if earlier placeholders
//! could have been filled.

use std::collections::HashMap;

use crate::error::{DiscuteError, Result};

/// Runtime values substituted into templates.
pub type Variables = HashMap<String, String>;

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                push_text(&mut segments, template, text_start, i);
                segments.push(Segment::Brace('{'));
                i += 2;
                text_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                push_text(&mut segments, template, text_start, i);
                segments.push(Segment::Brace('}'));
                i += 2;
                text_start = i;
            }
            b'{' => {
                let close = template[i + 1..].find('}').map(|off| i + 1 + off);
                match close {
                    Some(end) if is_identifier(&template[i + 1..end]) => {
                        push_text(&mut segments, template, text_start, i);
                        segments.push(Segment::Placeholder(&template[i + 1..end]));
                        i = end + 1;
                        text_start = i;
                    }
                    _ => i += 1,
                }
            }
            _ => i += 1,
        }
    }

    push_text(&mut segments, template, text_start, bytes.len());
    segments
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, template: &'a str, start: usize, end: usize) {
    if start < end {
        segments.push(Segment::Text(&template[start..end]));
    }
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in parse(template) {
        if let Segment::Placeholder(key) = segment {
            if !names.iter().any(|n| n == key) {
                names.push(key.to_string());
            }
        }
    }
    names
}

/// Substitute `variables` into `template`.
///
/// `program` only names the template in error messages.
pub fn render(template: &str, variables: &Variables, program: &str, strict: bool) -> Result<String> {
    let mut out = String::with_capacity(template.len());

    for segment in parse(template) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Brace(c) => out.push(c),
            Segment::Placeholder(key) => match variables.get(key) {
                Some(value) => out.push_str(value),
                None if strict => {
                    return Err(DiscuteError::MissingVariable {
                        key: key.to_string(),
                        program: program.to_string(),
                    })
                }
                None => return Ok(template.to_string()),
            },
        }
    }

    Ok(out)
}
