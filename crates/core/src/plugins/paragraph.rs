//! Paragraphs.
//!
//! A paragraph runs until a blank line or until a construct on the
//! paragraph interrupt list could start on the next line. Input with fewer
//! than two line breaks is taken whole.

use super::list::LIST;
use crate::ast::{Node, Paragraph};
use crate::engine::{
    BlockTokenizer, Context, Interrupt, Plugin, RegistryBuilder, TokenizeResult, eat, first_line,
    probe,
};
use crate::indentation::parse_indentation;

/// Registry name of the paragraph tokenizer.
pub const PARAGRAPH: &str = "paragraph";

/// Bytes of `value` the paragraph covers, trailing blank lines included.
fn paragraph_len(cx: &Context<'_>, value: &str) -> usize {
    if value.matches('\n').nth(1).is_none() {
        return value.len();
    }

    let mut len = 0;
    let mut after_break = false;
    for line in value.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        if after_break {
            if !blank {
                break;
            }
        } else if blank {
            after_break = true;
        } else if len > 0 && cx.interrupts(Interrupt::Paragraph, &value[len..]) {
            break;
        }
        len += line.len();
    }
    len
}

/// Matches a paragraph at the start of the buffer.
pub struct ParagraphTokenizer;

impl BlockTokenizer for ParagraphTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let len = paragraph_len(cx, value);
        let text = value[..len].trim();
        if text.is_empty() {
            return Ok(None);
        }
        if silent {
            return probe();
        }

        let node = Paragraph {
            indentation: parse_indentation(first_line(value)).depth,
            children: cx.tokenize_inline(text)?,
        };
        eat(value, &value[..len], Some(Node::Paragraph(node)))
    }
}

/// Replaces the paragraph tokenizer and lets lists end paragraphs.
pub struct ParagraphPlugin;

impl Plugin for ParagraphPlugin {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.set_block(PARAGRAPH, ParagraphTokenizer);
        registry.interrupt(Interrupt::Paragraph, LIST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Tokenized;
    use crate::plugins::testing::{eaten, parse_blocks, run_block};

    fn paragraph(value: &str) -> (&str, Paragraph) {
        match eaten(value, run_block(&ParagraphTokenizer, value, false)) {
            Some((consumed, Node::Paragraph(paragraph))) => (consumed, paragraph),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn short_input_is_one_paragraph() {
        let (consumed, para) = paragraph("  single\nline");
        assert_eq!(consumed, "  single\nline");
        assert_eq!(para.indentation, 1);
        assert_eq!(para.children, vec![Node::text("single\nline")]);
    }

    #[test]
    fn blank_line_ends_paragraph() {
        let (consumed, para) = paragraph("one\ntwo\n\n\nthree\n");
        assert_eq!(consumed, "one\ntwo\n\n\n");
        assert_eq!(para.children, vec![Node::text("one\ntwo")]);
    }

    #[test]
    fn interrupting_constructs_end_paragraph() {
        assert_eq!(paragraph("text\n# Head\nmore\n").0, "text\n");
        assert_eq!(paragraph("text\n- item\n- item\n").0, "text\n");
        assert_eq!(paragraph("text\n```\ncode\n```\n").0, "text\n");
        assert_eq!(paragraph("text\n> quote\nmore\n").0, "text\n");
    }

    #[test]
    fn final_line_without_newline_is_kept() {
        assert_eq!(paragraph("a\nb\nc").0, "a\nb\nc");
    }

    #[test]
    fn whitespace_only_declines() {
        assert_eq!(run_block(&ParagraphTokenizer, "   ", false), Ok(None));
        assert_eq!(run_block(&ParagraphTokenizer, "\n \n\n", true), Ok(None));
        assert_eq!(
            run_block(&ParagraphTokenizer, "words", true),
            Ok(Some(Tokenized::Probe))
        );
    }

    #[test]
    fn paragraph_then_fence() {
        let nodes = parse_blocks("para\n```\ncode\n```\n");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(nodes[0], Node::Paragraph(_)));
        assert!(matches!(nodes[1], Node::CodeFence(_)));
    }
}
