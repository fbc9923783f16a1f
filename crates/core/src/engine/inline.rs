//! Built-in inline tokenizers.

use super::{Context, InlineTokenizer, TokenizeResult, eat, probe};
use crate::ast::{Container, Link, Node, Text};

/// Registry name of the backslash-escape tokenizer.
pub const ESCAPE: &str = "escape";
/// Registry name of the code span tokenizer.
pub const INLINE_CODE: &str = "inline_code";
/// Registry name of the strong span tokenizer.
pub const STRONG: &str = "strong";
/// Registry name of the emphasis span tokenizer.
pub const EMPHASIS: &str = "emphasis";
/// Registry name of the link tokenizer.
pub const LINK: &str = "link";
/// Registry name of the plain text tokenizer.
pub const TEXT: &str = "text";

/// Byte offset of `pattern` in `value`, searching from `from`.
pub(crate) fn find_from(value: &str, from: usize, pattern: &str) -> Option<usize> {
    value
        .get(from..)?
        .find(pattern)
        .map(|index| index + from)
}

/// `\*` and friends: the escaped character as literal text.
pub struct EscapeTokenizer;

impl InlineTokenizer for EscapeTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let mut chars = value.chars();
        if chars.next() != Some('\\') {
            return Ok(None);
        }
        let Some(escaped) = chars.next().filter(char::is_ascii_punctuation) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }
        eat(value, &value[..2], Some(Node::text(escaped)))
    }

    fn locate(&self, value: &str, from: usize) -> Option<usize> {
        find_from(value, from, "\\")
    }
}

/// Backtick code spans. The closing run must be as long as the opening one.
pub struct InlineCodeTokenizer;

impl InlineTokenizer for InlineCodeTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let ticks = value.bytes().take_while(|b| *b == b'`').count();
        if ticks == 0 {
            return Ok(None);
        }

        let mut index = ticks;
        let close = loop {
            let Some(start) = find_from(value, index, "`") else {
                return Ok(None);
            };
            let run = value[start..].bytes().take_while(|b| *b == b'`').count();
            if run == ticks {
                break start;
            }
            index = start + run;
        };

        if silent {
            return probe();
        }
        let code = value[ticks..close].trim();
        eat(
            value,
            &value[..close + ticks],
            Some(Node::InlineCode(Text { value: code.to_string() })),
        )
    }

    fn locate(&self, value: &str, from: usize) -> Option<usize> {
        find_from(value, from, "`")
    }
}

/// `**strong**` and `__strong__`.
pub struct StrongTokenizer;

impl InlineTokenizer for StrongTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let marker = match value.get(..2) {
            Some(marker @ ("**" | "__")) => marker,
            _ => return Ok(None),
        };
        let Some(close) = closing_marker(value, marker) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let children = cx.tokenize_inline(&value[2..close])?;
        eat(
            value,
            &value[..close + 2],
            Some(Node::Strong(Container { children })),
        )
    }

    fn locate(&self, value: &str, from: usize) -> Option<usize> {
        earliest(find_from(value, from, "**"), find_from(value, from, "__"))
    }
}

/// `*emphasis*` and `_emphasis_`.
pub struct EmphasisTokenizer;

impl InlineTokenizer for EmphasisTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let marker = match value.get(..1) {
            Some(marker @ ("*" | "_")) => marker,
            _ => return Ok(None),
        };
        let Some(close) = closing_marker(value, marker) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let children = cx.tokenize_inline(&value[1..close])?;
        eat(
            value,
            &value[..close + 1],
            Some(Node::Emphasis(Container { children })),
        )
    }

    fn locate(&self, value: &str, from: usize) -> Option<usize> {
        earliest(find_from(value, from, "*"), find_from(value, from, "_"))
    }
}

/// Finds where the closing `marker` of a span opened at the start of
/// `value` begins.
///
/// Content must not start with whitespace or end with it. A closer inside a
/// longer delimiter run sits at the end of the run, so `**a *b***` closes
/// the strong span after the emphasis. An `_` closer must not sit inside a
/// word (`snake_case_name` is not emphasis).
fn closing_marker(value: &str, marker: &str) -> Option<usize> {
    let open = marker.len();
    let delimiter = marker.chars().next()?;
    let body = &value[open..];
    let first = body.chars().next()?;
    if first.is_whitespace() || first == delimiter {
        return None;
    }

    let mut from = open + first.len_utf8();
    while let Some(start) = value.get(from..)?.find(delimiter).map(|index| index + from) {
        let run = value[start..].chars().take_while(|ch| *ch == delimiter).count();
        let end = start + run;
        from = end;

        if run < open || (open == 1 && run == 2) {
            continue;
        }
        let before = value[..start].chars().next_back();
        let after = value[end..].chars().next();
        let intraword = delimiter == '_' && after.is_some_and(char::is_alphanumeric);
        if before.is_some_and(|ch| !ch.is_whitespace()) && !intraword {
            return Some(end - open);
        }
    }
    None
}

fn earliest(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// `[label](url "title")`.
pub struct LinkTokenizer;

impl InlineTokenizer for LinkTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let Some(parts) = split_link(value) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let children = cx.tokenize_inline(parts.label)?;
        eat(
            value,
            &value[..parts.len],
            Some(Node::Link(Link {
                url: parts.url.to_string(),
                title: parts.title.map(str::to_string),
                children,
            })),
        )
    }

    fn locate(&self, value: &str, from: usize) -> Option<usize> {
        find_from(value, from, "[")
    }
}

struct LinkParts<'a> {
    label: &'a str,
    url: &'a str,
    title: Option<&'a str>,
    len: usize,
}

fn split_link(value: &str) -> Option<LinkParts<'_>> {
    if !value.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut label_end = None;
    for (index, ch) in value.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    label_end = Some(index);
                    break;
                }
            }
            '\n' if value[..index].ends_with('\n') => return None,
            _ => {}
        }
    }
    let label_end = label_end?;

    let destination_start = label_end + 2;
    if value.get(label_end + 1..destination_start) != Some("(") {
        return None;
    }
    let close = find_from(value, destination_start, ")")?;
    let inside = value[destination_start..close].trim();
    if inside.contains('\n') {
        return None;
    }

    let (url, title) = match inside.split_once(char::is_whitespace) {
        Some((url, rest)) => {
            let rest = rest.trim();
            let quoted = rest
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .or_else(|| rest.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')))?;
            (url, Some(quoted))
        }
        None => (inside, None),
    };

    Some(LinkParts {
        label: &value[1..label_end],
        url,
        title,
        len: close + 1,
    })
}

/// Plain text up to the next place another inline tokenizer could start.
pub struct TextTokenizer;

impl InlineTokenizer for TextTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        if value.is_empty() {
            return Ok(None);
        }
        if silent {
            return probe();
        }
        let end = cx.next_inline_boundary(value).unwrap_or(value.len());
        eat(value, &value[..end], Some(Node::text(&value[..end])))
    }

    fn locate(&self, _value: &str, _from: usize) -> Option<usize> {
        None
    }
}
