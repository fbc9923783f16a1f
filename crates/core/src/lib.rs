#![deny(missing_docs)]
//! dxmd core: block and inline tokenizer plugins for developer-portal
//! Markdown (alerts, JSON-attributed code fences, pipe tables, nested lists,
//! tab groups, `<dxui:...>` components and heading anchors).

/// Syntax tree types.
pub mod ast;
/// Tokenizer engine, registry and built-in tokenizers.
pub mod engine;
/// Core error and diagnostic types.
pub mod error;
/// Heading anchor de-duplication.
pub mod heading_ids;
/// Indentation depth helpers.
pub mod indentation;
/// Parse options and the parser pipeline.
pub mod parse;
/// Tokenizer plugins.
pub mod plugins;
/// Slug generation utilities.
pub mod slug;

pub use ast::{Document, Node};
pub use engine::{
    BlockTokenizer, Context, Engine, InlineTokenizer, Interrupt, ParseOutput, Plugin, Registry,
    RegistryBuilder, TokenizeResult, Tokenized, eat, probe,
};
pub use error::{ErrorSeverity, MarkdownError, ParseDiagnostics, RecoverableError, TokenizeError};
pub use heading_ids::{HeadingIdTransform, dedupe_heading_ids};
pub use parse::{
    AstTransform, ParseOptions, ParserPipeline, TextTransform, normalize_line_endings,
    parse_document,
};
pub use plugins::{build_engine, build_registry, default_plugins};
pub use slug::{HeadingIds, legacy_slug, slugify};
