//! Tokenizer dispatch.
//!
//! The engine walks the input with a cursor and offers the remaining text to
//! each registered tokenizer in priority order. A tokenizer either declines
//! (`Ok(None)`), answers a silent probe (`Tokenized::Probe`), or eats a prefix
//! and hands back the node it built.
//!
//! - `registry` - ordered tokenizer tables, interrupt lists and plugins
//! - `context` - recursion entry points handed to every tokenizer
//! - `defaults` - blank lines, blockquotes and rules
//! - `inline` - text, escapes, code spans, emphasis and links

mod context;
mod defaults;
mod inline;
mod registry;

pub use context::Context;
pub use defaults::{BLOCKQUOTE, NEWLINE, THEMATIC_BREAK};
pub(crate) use defaults::{first_line, line_with_newline};
pub use inline::{EMPHASIS, ESCAPE, INLINE_CODE, LINK, STRONG, TEXT};
pub(crate) use inline::find_from;
pub use registry::{Interrupt, Plugin, Registry, RegistryBuilder};

use crate::ast::{Document, Node};
use crate::error::{ParseDiagnostics, TokenizeError};
use crate::parse::ParseOptions;
use std::cell::RefCell;

/// Successful tokenizer answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Tokenized {
    /// Silent probe matched; nothing was consumed.
    Probe,
    /// `len` bytes were consumed, optionally producing a node.
    Eaten {
        /// Bytes consumed from the front of the input.
        len: usize,
        /// Node built from the consumed text.
        node: Option<Node>,
    },
}

/// What a tokenizer returns. `Ok(None)` means "not my syntax".
pub type TokenizeResult = Result<Option<Tokenized>, TokenizeError>;

/// A block-level tokenizer.
pub trait BlockTokenizer: Send + Sync {
    /// Try to consume a prefix of `value`. With `silent` set, only report
    /// whether a match would happen.
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult;
}

/// An inline-level tokenizer.
pub trait InlineTokenizer: Send + Sync {
    /// Try to consume a prefix of `value`.
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult;

    /// Byte offset at or after `from` where this tokenizer might match.
    /// Plain text stops there.
    fn locate(&self, value: &str, from: usize) -> Option<usize>;
}

/// Commits `subvalue` as consumed, checking it is a non-empty prefix of `value`.
pub fn eat(value: &str, subvalue: &str, node: Option<Node>) -> TokenizeResult {
    if subvalue.is_empty() {
        return Err(TokenizeError::EmptyMatch);
    }
    if !value.starts_with(subvalue) {
        return Err(TokenizeError::NotAPrefix {
            eaten: subvalue.len(),
            available: value.len(),
        });
    }
    Ok(Some(Tokenized::Eaten {
        len: subvalue.len(),
        node,
    }))
}

/// Answer for a successful silent probe.
pub fn probe() -> TokenizeResult {
    Ok(Some(Tokenized::Probe))
}

/// Parsed document plus everything that went wrong on the way.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// The tree.
    pub document: Document,
    /// Swallowed tokenizer failures.
    pub diagnostics: ParseDiagnostics,
}

/// A configured tokenizer engine. Immutable once built; one instance can
/// parse any number of documents.
pub struct Engine {
    registry: Registry,
    options: ParseOptions,
}

impl Engine {
    /// Creates an engine from a built registry.
    pub fn new(registry: Registry, options: ParseOptions) -> Self {
        Self { registry, options }
    }

    /// Engine with only the built-in tokenizers.
    pub fn bare(options: ParseOptions) -> Self {
        Self::new(RegistryBuilder::with_defaults().build(), options)
    }

    /// Tokenizer tables.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Options the engine was built with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses a whole document into block nodes.
    pub fn parse(&self, input: &str) -> ParseOutput {
        let diagnostics = RefCell::new(ParseDiagnostics::new());
        let children = {
            let cx = Context::root(self, &diagnostics);
            cx.run_block(input)
        };

        ParseOutput {
            document: Document { children },
            diagnostics: diagnostics.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eat_rejects_non_prefix() {
        let result = eat("abc", "bc", None);
        assert_eq!(
            result,
            Err(TokenizeError::NotAPrefix {
                eaten: 2,
                available: 3
            })
        );
    }

    #[test]
    fn eat_rejects_empty() {
        assert_eq!(eat("abc", "", None), Err(TokenizeError::EmptyMatch));
    }

    #[test]
    fn eat_reports_length() {
        let result = eat("abc\ndef", "abc\n", Some(Node::text("abc")));
        assert_eq!(
            result,
            Ok(Some(Tokenized::Eaten {
                len: 4,
                node: Some(Node::text("abc"))
            }))
        );
    }

    #[test]
    fn bare_engine_parses_quotes_and_rules() {
        let engine = Engine::bare(ParseOptions::default());
        let output = engine.parse("> quoted\n\n---\ntext");
        let kinds: Vec<_> = output
            .document
            .children
            .iter()
            .map(|node| match node {
                Node::Blockquote(_) => "blockquote",
                Node::ThematicBreak => "rule",
                Node::Paragraph(_) => "paragraph",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["blockquote", "rule", "paragraph"]);
        assert!(!output.diagnostics.has_any());
    }
}
