use super::registry::Interrupt;
use super::{Engine, Tokenized};
use crate::ast::{Node, Paragraph};
use crate::error::{ParseDiagnostics, RecoverableError, TokenizeError};
use crate::indentation::parse_indentation;
use crate::parse::ParseOptions;
use std::cell::RefCell;

/// Handle given to tokenizers for recursing back into the engine.
///
/// Each recursive call runs one level deeper; past
/// [`ParseOptions::max_nesting_depth`] the call fails with
/// [`TokenizeError::NestingTooDeep`] and the construct that asked for it
/// declines.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    engine: &'a Engine,
    depth: usize,
    diagnostics: &'a RefCell<ParseDiagnostics>,
}

impl<'a> Context<'a> {
    pub(crate) fn root(engine: &'a Engine, diagnostics: &'a RefCell<ParseDiagnostics>) -> Self {
        Self {
            engine,
            depth: 0,
            diagnostics,
        }
    }

    /// Current nesting depth (0 at the document root).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Options of the running engine.
    pub fn options(&self) -> &'a ParseOptions {
        self.engine.options()
    }

    /// Parses `text` as block content one level deeper.
    pub fn tokenize_block(&self, text: &str) -> Result<Vec<Node>, TokenizeError> {
        Ok(self.nested()?.run_block(text))
    }

    /// Parses `text` as inline content one level deeper.
    pub fn tokenize_inline(&self, text: &str) -> Result<Vec<Node>, TokenizeError> {
        Ok(self.nested()?.run_inline(text))
    }

    /// Whether any tokenizer registered to interrupt `kind` matches at the
    /// start of `value`. Only silent probes are made.
    pub fn interrupts(&self, kind: Interrupt, value: &str) -> bool {
        let registry = self.engine.registry();
        registry.interrupters(kind).iter().any(|name| {
            let Some(tokenizer) = registry.block_tokenizer(name) else {
                return false;
            };
            match tokenizer.tokenize(self, value, true) {
                Ok(answer) => answer.is_some(),
                Err(err) => {
                    log::debug!("interrupt probe `{name}` failed: {err}");
                    false
                }
            }
        })
    }

    /// Byte offset of the next position after the first character where
    /// an inline tokenizer other than plain text could start.
    pub fn next_inline_boundary(&self, value: &str) -> Option<usize> {
        let from = value.chars().next()?.len_utf8();
        self.engine
            .registry()
            .inline()
            .filter_map(|(_, tokenizer)| tokenizer.locate(value, from))
            .filter(|&index| index >= from)
            .min()
    }

    /// Records a swallowed failure and logs it.
    pub fn report(&self, tokenizer: &'static str, err: TokenizeError) {
        log::warn!(
            "tokenizer `{}` failed at depth {}; treating as no match: {}",
            tokenizer,
            self.depth,
            err
        );
        self.diagnostics
            .borrow_mut()
            .push(RecoverableError::error(tokenizer, err.to_string(), self.depth));
    }

    /// Records a non-fatal oddity.
    pub fn warn(&self, tokenizer: &'static str, message: impl Into<String>) {
        let message = message.into();
        log::debug!("tokenizer `{tokenizer}`: {message}");
        self.diagnostics
            .borrow_mut()
            .push(RecoverableError::warning(tokenizer, message, self.depth));
    }

    fn nested(&self) -> Result<Context<'a>, TokenizeError> {
        let depth = self.depth + 1;
        let limit = self.options().max_nesting_depth;
        if depth > limit {
            return Err(TokenizeError::NestingTooDeep { depth, limit });
        }
        Ok(Context { depth, ..*self })
    }

    pub(crate) fn run_block(&self, text: &str) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut rest = text;

        'cursor: while !rest.is_empty() {
            for (name, tokenizer) in self.engine.registry().block() {
                if let Some((len, node)) =
                    self.attempt(name, rest, tokenizer.tokenize(self, rest, false))
                {
                    nodes.extend(node);
                    rest = &rest[len..];
                    continue 'cursor;
                }
            }

            // Nothing claimed the line; keep it as a plain paragraph so the cursor moves.
            let end = rest.find('\n').map_or(rest.len(), |index| index + 1);
            let line = &rest[..end];
            if !line.trim().is_empty() {
                log::trace!("no block tokenizer matched; keeping line as paragraph");
                nodes.push(Node::Paragraph(Paragraph {
                    indentation: parse_indentation(line).depth,
                    children: self.run_inline(line.trim()),
                }));
            }
            rest = &rest[end..];
        }

        nodes
    }

    pub(crate) fn run_inline(&self, text: &str) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut rest = text;

        'cursor: while !rest.is_empty() {
            for (name, tokenizer) in self.engine.registry().inline() {
                if let Some((len, node)) =
                    self.attempt(name, rest, tokenizer.tokenize(self, rest, false))
                {
                    if let Some(node) = node {
                        push_inline(&mut nodes, node);
                    }
                    rest = &rest[len..];
                    continue 'cursor;
                }
            }

            let end = rest.chars().next().map_or(rest.len(), char::len_utf8);
            push_inline(&mut nodes, Node::text(&rest[..end]));
            rest = &rest[end..];
        }

        nodes
    }

    fn attempt(
        &self,
        name: &'static str,
        rest: &str,
        result: Result<Option<Tokenized>, TokenizeError>,
    ) -> Option<(usize, Option<Node>)> {
        match result {
            Ok(Some(Tokenized::Eaten { len, node })) => {
                if len == 0 {
                    self.report(name, TokenizeError::EmptyMatch);
                    None
                } else if len > rest.len() || !rest.is_char_boundary(len) {
                    self.report(
                        name,
                        TokenizeError::NotAPrefix {
                            eaten: len,
                            available: rest.len(),
                        },
                    );
                    None
                } else {
                    log::trace!("`{name}` consumed {len} bytes at depth {}", self.depth);
                    Some((len, node))
                }
            }
            Ok(Some(Tokenized::Probe)) => {
                self.report(
                    name,
                    TokenizeError::pattern("answered a probe to a committing call"),
                );
                None
            }
            Ok(None) => None,
            Err(err) => {
                self.report(name, err);
                None
            }
        }
    }
}

/// Appends an inline node, merging adjacent text runs.
fn push_inline(nodes: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node
        && let Some(Node::Text(last)) = nodes.last_mut()
    {
        last.value.push_str(&text.value);
        return;
    }
    nodes.push(node);
}
