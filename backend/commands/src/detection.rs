/// Structured block detection: find a command block inside model output.
///
/// The model is taught to embed commands like
/// `{'request': 'file_exists', 'filename': 'setup.py'}` anywhere in its
/// reply, with whatever quoting it happens to produce. This module scans the
/// text for the first block that parses cleanly and names a command.
///
/// ```text
/// object = "{" ws [ field { ws "," ws field } [ ws "," ] ] ws "}"
/// field  = key ws ":" ws value
/// key    = quoted | ident
/// value  = quoted | bare
/// ```
///
/// A bare `null` value means the key is absent; a quoted `'null'` is text.
use std::collections::{BTreeMap, BTreeSet};

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, take_while1},
    character::complete::{char, multispace0, none_of},
    combinator::{map, opt, value, verify},
    multi::separated_list0,
    sequence::{delimited, pair, separated_pair, terminated},
    IResult,
};
use tracing::trace;

use crate::types::REQUEST_KEY;

/// An untyped command pulled out of free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCandidate {
    /// Value of the `request` key.
    pub name: String,
    /// Every other key, with its raw (unquoted) value. Keys given a bare
    /// `null` are left out.
    pub fields: BTreeMap<String, String>,
}

impl ParsedCandidate {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|s| s.as_str())
    }
}

/// Detect the first well-formed command block in `text`.
///
/// Returns `None` when there is no block, when every block is malformed
/// (unterminated, nested, duplicate keys), or when no block carries a
/// non-empty `request` key. An unterminated `{` in the prose is skipped
/// and the scan goes on after it. Never fails.
pub fn detect_candidate(text: &str) -> Option<ParsedCandidate> {
    let mut offset = 0;
    while let Some(rel) = text[offset..].find('{') {
        let start = offset + rel;
        let block = &text[start..];

        if let Ok((_, pairs)) = object(block) {
            if let Some(candidate) = into_candidate(pairs) {
                return Some(candidate);
            }
        }

        // Skip the whole block, including anything nested inside it.
        match matching_close(block) {
            Some(end) => offset = start + end + 1,
            None => {
                trace!(at = start, "unterminated brace; skipping it");
                offset = start + 1;
            }
        }
    }
    None
}

fn into_candidate(pairs: Vec<(String, Option<String>)>) -> Option<ParsedCandidate> {
    let mut seen = BTreeSet::new();
    let mut name = None;
    let mut fields = BTreeMap::new();
    for (key, val) in pairs {
        if !seen.insert(key.clone()) {
            return None;
        }
        match val {
            Some(val) if key == REQUEST_KEY => name = Some(val),
            Some(val) => {
                fields.insert(key, val);
            }
            None => {}
        }
    }
    let name = name.filter(|n: &String| !n.trim().is_empty())?;
    Some(ParsedCandidate {
        name: name.trim().to_string(),
        fields,
    })
}

/// Byte index of the `}` closing the `{` at the start of `block`.
///
/// Braces inside quoted strings do not count.
fn matching_close(block: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in block.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

fn object(input: &str) -> IResult<&str, Vec<(String, Option<String>)>> {
    delimited(
        pair(char('{'), multispace0),
        terminated(
            separated_list0(delimited(multispace0, char(','), multispace0), field),
            opt(pair(multispace0, char(','))),
        ),
        pair(multispace0, char('}')),
    )(input)
}

fn field(input: &str) -> IResult<&str, (String, Option<String>)> {
    separated_pair(
        key,
        delimited(multispace0, char(':'), multispace0),
        field_value,
    )(input)
}

fn key(input: &str) -> IResult<&str, String> {
    alt((
        quoted,
        map(
            take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')),
            str::to_string,
        ),
    ))(input)
}

/// `None` for a bare `null`.
fn field_value(input: &str) -> IResult<&str, Option<String>> {
    alt((
        map(quoted, Some),
        map(bare, |raw| (raw != "null").then_some(raw)),
    ))(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    alt((quoted_with('\''), quoted_with('"')))(input)
}

fn quoted_with(quote: char) -> impl FnMut(&str) -> IResult<&str, String> {
    let stop: &'static str = if quote == '\'' { "'\\" } else { "\"\\" };
    move |input| {
        delimited(
            char(quote),
            map(
                opt(escaped_transform(
                    none_of(stop),
                    '\\',
                    alt((
                        value('\n', char('n')),
                        value('\r', char('r')),
                        value('\t', char('t')),
                        value('\\', char('\\')),
                        value('\'', char('\'')),
                        value('"', char('"')),
                    )),
                )),
                Option::unwrap_or_default,
            ),
            char(quote),
        )(input)
    }
}

fn bare(input: &str) -> IResult<&str, String> {
    verify(
        map(
            take_while1(|c: char| !matches!(c, ',' | '{' | '}' | '\'' | '"' | '\n' | '\r')),
            |raw: &str| raw.trim_end().to_string(),
        ),
        |v: &str| !v.is_empty(),
    )(input)
}
