//! Tokenizer tables, built once and read-only while parsing.

use super::defaults::{
    BLOCKQUOTE, BlockquoteTokenizer, NEWLINE, NewlineTokenizer, THEMATIC_BREAK,
    ThematicBreakTokenizer,
};
use super::inline::{
    EMPHASIS, ESCAPE, EmphasisTokenizer, EscapeTokenizer, INLINE_CODE, InlineCodeTokenizer, LINK,
    LinkTokenizer, STRONG, StrongTokenizer, TEXT, TextTokenizer,
};
use super::{BlockTokenizer, InlineTokenizer};

/// Constructs that may end another block early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// Ends a paragraph.
    Paragraph,
    /// Ends a list.
    List,
    /// Ends a blockquote's lazy continuation.
    Blockquote,
}

/// Something that installs tokenizers into a registry.
pub trait Plugin {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Adds, replaces or reorders tokenizers.
    fn install(&self, registry: &mut RegistryBuilder);
}

type Entry<T> = (&'static str, Box<T>);

/// Ordered tokenizer tables and interrupt lists.
pub struct Registry {
    block: Vec<Entry<dyn BlockTokenizer>>,
    inline: Vec<Entry<dyn InlineTokenizer>>,
    interrupt_paragraph: Vec<&'static str>,
    interrupt_list: Vec<&'static str>,
    interrupt_blockquote: Vec<&'static str>,
}

impl Registry {
    /// Block tokenizers in the order they are tried.
    pub fn block(&self) -> impl Iterator<Item = (&'static str, &dyn BlockTokenizer)> {
        self.block.iter().map(|(name, tok)| (*name, tok.as_ref()))
    }

    /// Inline tokenizers in the order they are tried.
    pub fn inline(&self) -> impl Iterator<Item = (&'static str, &dyn InlineTokenizer)> {
        self.inline.iter().map(|(name, tok)| (*name, tok.as_ref()))
    }

    /// Block tokenizer registered under `name`.
    pub fn block_tokenizer(&self, name: &str) -> Option<&dyn BlockTokenizer> {
        self.block
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, tok)| tok.as_ref())
    }

    /// Names of the block tokenizers, in order.
    pub fn block_names(&self) -> Vec<&'static str> {
        self.block.iter().map(|(name, _)| *name).collect()
    }

    /// Names of the inline tokenizers, in order.
    pub fn inline_names(&self) -> Vec<&'static str> {
        self.inline.iter().map(|(name, _)| *name).collect()
    }

    /// Names registered to interrupt `kind`.
    pub fn interrupters(&self, kind: Interrupt) -> &[&'static str] {
        match kind {
            Interrupt::Paragraph => &self.interrupt_paragraph,
            Interrupt::List => &self.interrupt_list,
            Interrupt::Blockquote => &self.interrupt_blockquote,
        }
    }
}

/// Mutable form of [`Registry`] used while plugins install themselves.
#[derive(Default)]
pub struct RegistryBuilder {
    block: Vec<Entry<dyn BlockTokenizer>>,
    inline: Vec<Entry<dyn InlineTokenizer>>,
    interrupt_paragraph: Vec<&'static str>,
    interrupt_list: Vec<&'static str>,
    interrupt_blockquote: Vec<&'static str>,
}

impl RegistryBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder holding the engine's built-in tokenizers.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.set_block(NEWLINE, NewlineTokenizer);
        builder.set_block(BLOCKQUOTE, BlockquoteTokenizer);
        builder.set_block(THEMATIC_BREAK, ThematicBreakTokenizer);

        builder.set_inline(ESCAPE, EscapeTokenizer);
        builder.set_inline(INLINE_CODE, InlineCodeTokenizer);
        builder.set_inline(STRONG, StrongTokenizer);
        builder.set_inline(EMPHASIS, EmphasisTokenizer);
        builder.set_inline(LINK, LinkTokenizer);
        builder.set_inline(TEXT, TextTokenizer);

        builder.interrupt(Interrupt::Paragraph, THEMATIC_BREAK);
        builder.interrupt(Interrupt::Paragraph, BLOCKQUOTE);
        builder.interrupt(Interrupt::List, THEMATIC_BREAK);
        builder.interrupt(Interrupt::Blockquote, THEMATIC_BREAK);
        builder
    }

    /// Runs a plugin's installation.
    pub fn install(mut self, plugin: &dyn Plugin) -> Self {
        log::debug!("installing markdown plugin `{}`", plugin.name());
        plugin.install(&mut self);
        self
    }

    /// Freezes the tables.
    pub fn build(self) -> Registry {
        Registry {
            block: self.block,
            inline: self.inline,
            interrupt_paragraph: self.interrupt_paragraph,
            interrupt_list: self.interrupt_list,
            interrupt_blockquote: self.interrupt_blockquote,
        }
    }

    /// Replaces the block tokenizer called `name` in place, or appends it.
    pub fn set_block<T: BlockTokenizer + 'static>(&mut self, name: &'static str, tokenizer: T) {
        let boxed: Box<dyn BlockTokenizer> = Box::new(tokenizer);
        set_entry(&mut self.block, name, boxed);
    }

    /// Inserts a block tokenizer before `anchor` (appends if `anchor` is missing).
    pub fn insert_block_before<T: BlockTokenizer + 'static>(
        &mut self,
        anchor: &str,
        name: &'static str,
        tokenizer: T,
    ) {
        let boxed: Box<dyn BlockTokenizer> = Box::new(tokenizer);
        remove_entry(&mut self.block, name);
        let index = position(&self.block, anchor);
        insert_entry(&mut self.block, index, anchor, name, boxed);
    }

    /// Inserts a block tokenizer after `anchor` (appends if `anchor` is missing).
    pub fn insert_block_after<T: BlockTokenizer + 'static>(
        &mut self,
        anchor: &str,
        name: &'static str,
        tokenizer: T,
    ) {
        let boxed: Box<dyn BlockTokenizer> = Box::new(tokenizer);
        remove_entry(&mut self.block, name);
        let index = position(&self.block, anchor).map(|i| i + 1);
        insert_entry(&mut self.block, index, anchor, name, boxed);
    }

    /// Makes a block tokenizer the first one tried.
    pub fn push_block_front<T: BlockTokenizer + 'static>(
        &mut self,
        name: &'static str,
        tokenizer: T,
    ) {
        let boxed: Box<dyn BlockTokenizer> = Box::new(tokenizer);
        remove_entry(&mut self.block, name);
        self.block.insert(0, (name, boxed));
    }

    /// Drops a block tokenizer. Returns whether it was present.
    pub fn remove_block(&mut self, name: &str) -> bool {
        remove_entry(&mut self.block, name)
    }

    /// Replaces the inline tokenizer called `name` in place, or appends it.
    pub fn set_inline<T: InlineTokenizer + 'static>(&mut self, name: &'static str, tokenizer: T) {
        let boxed: Box<dyn InlineTokenizer> = Box::new(tokenizer);
        set_entry(&mut self.inline, name, boxed);
    }

    /// Inserts an inline tokenizer before `anchor` (appends if `anchor` is missing).
    pub fn insert_inline_before<T: InlineTokenizer + 'static>(
        &mut self,
        anchor: &str,
        name: &'static str,
        tokenizer: T,
    ) {
        let boxed: Box<dyn InlineTokenizer> = Box::new(tokenizer);
        remove_entry(&mut self.inline, name);
        let index = position(&self.inline, anchor);
        insert_entry(&mut self.inline, index, anchor, name, boxed);
    }

    /// Inserts an inline tokenizer after `anchor` (appends if `anchor` is missing).
    pub fn insert_inline_after<T: InlineTokenizer + 'static>(
        &mut self,
        anchor: &str,
        name: &'static str,
        tokenizer: T,
    ) {
        let boxed: Box<dyn InlineTokenizer> = Box::new(tokenizer);
        remove_entry(&mut self.inline, name);
        let index = position(&self.inline, anchor).map(|i| i + 1);
        insert_entry(&mut self.inline, index, anchor, name, boxed);
    }

    /// Makes an inline tokenizer the first one tried.
    pub fn push_inline_front<T: InlineTokenizer + 'static>(
        &mut self,
        name: &'static str,
        tokenizer: T,
    ) {
        let boxed: Box<dyn InlineTokenizer> = Box::new(tokenizer);
        remove_entry(&mut self.inline, name);
        self.inline.insert(0, (name, boxed));
    }

    /// Drops an inline tokenizer. Returns whether it was present.
    pub fn remove_inline(&mut self, name: &str) -> bool {
        remove_entry(&mut self.inline, name)
    }

    /// Registers `name` as able to interrupt `kind`.
    pub fn interrupt(&mut self, kind: Interrupt, name: &'static str) {
        let list = match kind {
            Interrupt::Paragraph => &mut self.interrupt_paragraph,
            Interrupt::List => &mut self.interrupt_list,
            Interrupt::Blockquote => &mut self.interrupt_blockquote,
        };
        if !list.contains(&name) {
            list.push(name);
        }
    }
}

fn position<T: ?Sized>(entries: &[Entry<T>], name: &str) -> Option<usize> {
    entries.iter().position(|(entry, _)| *entry == name)
}

fn set_entry<T: ?Sized>(entries: &mut Vec<Entry<T>>, name: &'static str, tokenizer: Box<T>) {
    match position(entries, name) {
        Some(index) => entries[index].1 = tokenizer,
        None => entries.push((name, tokenizer)),
    }
}

fn insert_entry<T: ?Sized>(
    entries: &mut Vec<Entry<T>>,
    index: Option<usize>,
    anchor: &str,
    name: &'static str,
    tokenizer: Box<T>,
) {
    match index {
        Some(index) => entries.insert(index, (name, tokenizer)),
        None => {
            log::debug!("anchor tokenizer `{anchor}` not registered; appending `{name}`");
            entries.push((name, tokenizer));
        }
    }
}

fn remove_entry<T: ?Sized>(entries: &mut Vec<Entry<T>>, name: &str) -> bool {
    match position(entries, name) {
        Some(index) => {
            entries.remove(index);
            true
        }
        None => false,
    }
}
