//! Fenced code blocks.
//!
//! One tokenizer handles both backtick and tilde fences. The text after the
//! opening marker is read as JSON attributes
//! (`{"language":"js","title":"app.js","showLineNumbers":true}`) and falls
//! back to a bare language name.

use crate::ast::{CodeFence, Node};
use crate::engine::{
    BlockTokenizer, Context, Interrupt, NEWLINE, Plugin, RegistryBuilder, TokenizeResult, eat,
    probe,
};
use crate::indentation::{leading_whitespace_len, parse_indentation, strip_leading_whitespace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Registry name of the code fence tokenizer.
pub const CODE_FENCE: &str = "code_fence";

static INLINE_LANGUAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#!(.*)$").unwrap());
static ESCAPED_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)\\([`~]{3,}.*)$").unwrap());

/// Marker character and run length of a fence opener, after indentation.
pub(crate) fn fence_marker(after_indent: &str) -> Option<(char, usize)> {
    let first = after_indent.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run = after_indent.chars().take_while(|c| *c == first).count();
    (run >= 3).then_some((first, run))
}

/// A closing fence: at least `length` markers and nothing but whitespace after.
fn is_closing_fence(line: &str, marker: char, length: usize) -> bool {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let run = trimmed.chars().take_while(|c| *c == marker).count();
    run >= length && trimmed[run..].trim().is_empty()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MaxHeight {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FenceAttributes {
    language: Option<String>,
    title: Option<String>,
    max_height: Option<MaxHeight>,
    show_line_numbers: Option<bool>,
    no_collapse: Option<bool>,
    auto_collapse: Option<bool>,
    tabs_to_spaces: Option<usize>,
}

fn parse_header(info: &str) -> FenceAttributes {
    let info = info.trim();
    match serde_json::from_str::<FenceAttributes>(info) {
        Ok(attrs) => attrs,
        Err(err) => {
            if info.starts_with('{') {
                log::debug!("code fence header is not valid JSON, using it as the language: {err}");
            }
            FenceAttributes {
                language: (!info.is_empty()).then(|| info.to_string()),
                ..FenceAttributes::default()
            }
        }
    }
}

fn resolve_alias(language: String) -> String {
    if language.eq_ignore_ascii_case("sh") {
        "shell".to_string()
    } else {
        language
    }
}

struct FenceSpan<'a> {
    indent: &'a str,
    info: &'a str,
    body: &'a str,
    len: usize,
}

/// Skips leading blank lines, then finds an opening fence and its close.
fn scan(value: &str) -> Option<FenceSpan<'_>> {
    let mut offset = 0;
    for line in value.split_inclusive('\n') {
        if !line.ends_with('\n') || !line.trim().is_empty() {
            break;
        }
        offset += line.len();
    }

    let rest = &value[offset..];
    let opener = rest.split_inclusive('\n').next()?;
    let opener_text = opener.strip_suffix('\n')?;
    let indent_len = leading_whitespace_len(opener_text);
    let (marker, length) = fence_marker(&opener_text[indent_len..])?;
    let info = &opener_text[indent_len + length..];
    if marker == '`' && info.contains('`') {
        return None;
    }

    let body_start = offset + opener.len();
    let mut position = body_start;
    for line in value[body_start..].split_inclusive('\n') {
        if is_closing_fence(line.strip_suffix('\n').unwrap_or(line), marker, length) {
            return Some(FenceSpan {
                indent: &opener_text[..indent_len],
                info,
                body: &value[body_start..position],
                len: position + line.len(),
            });
        }
        position += line.len();
    }
    None
}

/// Widest `tabsToSpaces` value that is honoured.
const MAX_TAB_WIDTH: usize = 16;

fn tab_expansion(width: Option<usize>) -> Option<String> {
    match width? {
        width if width > MAX_TAB_WIDTH => {
            log::debug!("ignoring tabsToSpaces {width}, above {MAX_TAB_WIDTH}");
            None
        }
        width => Some(" ".repeat(width)),
    }
}

fn build(span: &FenceSpan<'_>) -> CodeFence {
    let mut attrs = parse_header(span.info);
    let mut lines: Vec<&str> = span
        .body
        .split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
        .collect();

    if let Some(first) = lines.first()
        && let Some(captures) = INLINE_LANGUAGE.captures(first)
    {
        attrs.language = Some(captures[1].trim().to_string());
        lines.remove(0);
    }

    let tabs = tab_expansion(attrs.tabs_to_spaces);
    let mut value = String::with_capacity(span.body.len());
    for line in lines {
        let line = strip_leading_whitespace(line, span.indent.len());
        let line = match &tabs {
            Some(spaces) if line.contains('\t') => line.replace('\t', spaces),
            _ => line.to_string(),
        };
        value.push_str(&ESCAPED_FENCE.replace(&line, "${1}${2}"));
        value.push('\n');
    }

    CodeFence {
        value,
        language: attrs.language.map(resolve_alias),
        title: attrs.title,
        max_height: attrs.max_height.map(|height| match height {
            MaxHeight::Text(text) => text,
            MaxHeight::Number(number) => number.to_string(),
        }),
        show_line_numbers: attrs.show_line_numbers,
        no_collapse: attrs.no_collapse,
        auto_collapse: attrs.auto_collapse,
        indentation: parse_indentation(span.indent).depth,
    }
}

/// Matches an opening fence through its closing fence line.
pub struct CodeFenceTokenizer;

impl BlockTokenizer for CodeFenceTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let Some(span) = scan(value) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }
        eat(value, &value[..span.len], Some(Node::CodeFence(build(&span))))
    }
}

/// Installs [`CodeFenceTokenizer`] right after blank lines; fences end
/// paragraphs, lists and blockquotes.
pub struct CodeFencePlugin;

impl Plugin for CodeFencePlugin {
    fn name(&self) -> &'static str {
        "code-fence"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.insert_block_after(NEWLINE, CODE_FENCE, CodeFenceTokenizer);
        registry.interrupt(Interrupt::Paragraph, CODE_FENCE);
        registry.interrupt(Interrupt::List, CODE_FENCE);
        registry.interrupt(Interrupt::Blockquote, CODE_FENCE);
    }
}
