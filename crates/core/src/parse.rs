//! Parse options and the text-transform, tokenize, tree-transform pipeline.

use crate::ast::Document;
use crate::engine::{Engine, ParseOutput};
use crate::error::MarkdownError;
use crate::heading_ids::HeadingIdTransform;
use crate::plugins;
use serde::Deserialize;
use std::borrow::Cow;

/// Parser options, loadable from camelCase JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// Cap for recursive block and inline parsing.
    pub max_nesting_depth: usize,
    /// List items deeper than this are clamped to it.
    pub max_list_depth: usize,
    /// Install the legacy `[toc]` tokenizer.
    pub table_of_contents: bool,
    /// Let the heading-id pass descend into alerts, quotes and lists.
    pub dedupe_nested_headings: bool,
    /// Rewrite `\r\n` and lone `\r` to `\n` before tokenizing.
    pub normalize_line_endings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: 32,
            max_list_depth: 16,
            table_of_contents: true,
            dedupe_nested_headings: false,
            normalize_line_endings: true,
        }
    }
}

impl ParseOptions {
    /// Reads options from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, MarkdownError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Trait for preprocessing raw markdown text before parsing.
pub trait TextTransform {
    /// Transform the input markdown text, returning an owned or borrowed string.
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

impl<F> TextTransform for F
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str>,
{
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str> {
        (self)(input)
    }
}

/// Trait for mutating the parsed tree after tokenizing.
pub trait AstTransform {
    /// Mutate the document in place.
    fn transform(&self, document: &mut Document);
}

impl<F> AstTransform for F
where
    F: Fn(&mut Document),
{
    fn transform(&self, document: &mut Document) {
        (self)(document)
    }
}

/// Configurable parsing pipeline with optional transforms.
pub struct ParserPipeline {
    engine: Engine,
    text_transforms: Vec<Box<dyn TextTransform>>,
    ast_transforms: Vec<Box<dyn AstTransform>>,
}

impl ParserPipeline {
    /// Create a pipeline around an engine, with no transforms.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            text_transforms: Vec::new(),
            ast_transforms: Vec::new(),
        }
    }

    /// The standard pipeline: every plugin, line-ending normalization when
    /// enabled, then heading-id de-duplication.
    pub fn from_options(options: ParseOptions) -> Self {
        let normalize = options.normalize_line_endings;
        let heading_ids = HeadingIdTransform {
            nested: options.dedupe_nested_headings,
        };

        let mut pipeline = Self::new(plugins::build_engine(options));
        if normalize {
            pipeline.add_text_transform(normalize_line_endings);
        }
        pipeline.add_ast_transform(heading_ids);
        pipeline
    }

    /// Add a text preprocessor transform.
    pub fn add_text_transform<T: TextTransform + 'static>(&mut self, transform: T) {
        self.text_transforms.push(Box::new(transform));
    }

    /// Add an AST transform.
    pub fn add_ast_transform<T: AstTransform + 'static>(&mut self, transform: T) {
        self.ast_transforms.push(Box::new(transform));
    }

    /// The engine used for tokenizing.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Parse markdown into a document using the configured pipeline.
    pub fn parse(&self, input: &str) -> ParseOutput {
        let mut current = Cow::Borrowed(input);
        for transform in &self.text_transforms {
            let next = transform.transform(current.as_ref());
            current = Cow::Owned(next.into_owned());
        }

        let mut output = self.engine.parse(&current);
        for transform in &self.ast_transforms {
            transform.transform(&mut output.document);
        }

        output
    }
}

impl Default for ParserPipeline {
    fn default() -> Self {
        Self::from_options(ParseOptions::default())
    }
}

/// Parse a document with the standard pipeline.
pub fn parse_document(input: &str, options: &ParseOptions) -> ParseOutput {
    ParserPipeline::from_options(options.clone()).parse(input)
}

/// Rewrites `\r\n` and lone `\r` line breaks to `\n`.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}
