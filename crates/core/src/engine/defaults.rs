//! Built-in block tokenizers: blank lines, blockquotes and thematic breaks.

use super::registry::Interrupt;
use super::{BlockTokenizer, Context, TokenizeResult, eat, probe};
use crate::ast::{Blockquote, Node};

/// Registry name of the blank-line tokenizer.
pub const NEWLINE: &str = "newline";
/// Registry name of the blockquote tokenizer.
pub const BLOCKQUOTE: &str = "blockquote";
/// Registry name of the thematic break tokenizer.
pub const THEMATIC_BREAK: &str = "thematic_break";

/// Swallows blank lines without producing a node.
pub struct NewlineTokenizer;

impl BlockTokenizer for NewlineTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let mut len = 0;
        for line in value.split_inclusive('\n') {
            let is_last = len + line.len() == value.len();
            if !line.trim().is_empty() || (!line.ends_with('\n') && !is_last) {
                break;
            }
            len += line.len();
        }

        if len == 0 {
            return Ok(None);
        }
        if silent {
            return probe();
        }
        eat(value, &value[..len], None)
    }
}

/// `---`, `***` or `___` on a line of its own.
pub struct ThematicBreakTokenizer;

impl BlockTokenizer for ThematicBreakTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let line = first_line(value);
        if !is_thematic_break(line) {
            return Ok(None);
        }
        if silent {
            return probe();
        }
        eat(value, line_with_newline(value), Some(Node::ThematicBreak))
    }
}

fn is_thematic_break(line: &str) -> bool {
    let indent = line.bytes().take_while(|b| *b == b' ').count();
    if indent > 3 {
        return false;
    }
    let body = line[indent..].trim_end();
    let Some(marker) = body.chars().next() else {
        return false;
    };
    if !matches!(marker, '-' | '*' | '_') {
        return false;
    }

    let mut count = 0;
    for ch in body.chars() {
        if ch == marker {
            count += 1;
        } else if ch != ' ' && ch != '\t' {
            return false;
        }
    }
    count >= 3
}

/// `>`-prefixed lines plus lazy continuation lines.
pub struct BlockquoteTokenizer;

impl BlockTokenizer for BlockquoteTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        if !value.trim_start_matches([' ', '\t']).starts_with('>') {
            return Ok(None);
        }
        if silent {
            return probe();
        }

        let mut consumed = 0;
        let mut inner = String::new();
        for line in value.split_inclusive('\n') {
            let trimmed = line.trim_start_matches([' ', '\t']);
            if let Some(quoted) = trimmed.strip_prefix('>') {
                inner.push_str(quoted.strip_prefix(' ').unwrap_or(quoted));
            } else if line.trim().is_empty()
                || cx.interrupts(Interrupt::Blockquote, &value[consumed..])
            {
                break;
            } else {
                inner.push_str(line);
            }
            consumed += line.len();
        }

        let children = cx.tokenize_block(&inner)?;
        eat(
            value,
            &value[..consumed],
            Some(Node::Blockquote(Blockquote { children })),
        )
    }
}

/// First line of `value` without its line break.
pub(crate) fn first_line(value: &str) -> &str {
    value.split('\n').next().unwrap_or_default()
}

/// First line of `value` including its line break, if any.
pub(crate) fn line_with_newline(value: &str) -> &str {
    value
        .find('\n')
        .map_or(value, |index| &value[..index + 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules() {
        assert!(is_thematic_break("---"));
        assert!(is_thematic_break(" * * *"));
        assert!(is_thematic_break("___   "));
        assert!(!is_thematic_break("--"));
        assert!(!is_thematic_break("-*-"));
        assert!(!is_thematic_break("    ---"));
        assert!(!is_thematic_break("--- x"));
    }

    #[test]
    fn line_helpers() {
        assert_eq!(first_line("a\nb"), "a");
        assert_eq!(line_with_newline("a\nb"), "a\n");
        assert_eq!(line_with_newline("a"), "a");
    }
}
