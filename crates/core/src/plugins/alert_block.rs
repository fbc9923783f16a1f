//! `:::` admonitions.
//!
//! ```text
//! :::warning
//! Body, parsed as blocks.
//! :::
//! ```
//!
//! The header after the colons is either a JSON object
//! (`{"alert":"info","title":"Note","collapsible":true}`) or a bare kind.
//! Alerts nest: a `:::kind` line opens another level and only a bare `:::`
//! line closes one.

use crate::ast::{AlertBlock, AlertKind, Node};
use crate::engine::{
    BLOCKQUOTE, BlockTokenizer, Context, Interrupt, Plugin, RegistryBuilder, TokenizeResult, eat,
    probe,
};
use crate::indentation::{leading_whitespace_len, parse_indentation, strip_leading_whitespace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Registry name of the alert tokenizer.
pub const ALERT_BLOCK: &str = "alert_block";

static OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*:{3,}(.*)$").unwrap());
static CLOSER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*:{3,}[ \t]*$").unwrap());

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertAttributes {
    alert: Option<String>,
    title: Option<String>,
    auto_collapse: Option<bool>,
    collapsible: Option<bool>,
}

fn parse_header(header: &str) -> AlertAttributes {
    match serde_json::from_str::<AlertAttributes>(header) {
        Ok(attrs) => attrs,
        Err(err) => {
            let kind = header.trim();
            if kind.starts_with('{') {
                log::debug!("alert header is not valid JSON, using it as the kind: {err}");
            }
            AlertAttributes {
                alert: Some(if kind.is_empty() { "vanilla" } else { kind }.to_string()),
                ..AlertAttributes::default()
            }
        }
    }
}

/// Header of an opening line. `:::toc:::` style markers are not openers.
fn opener_header(line: &str) -> Option<&str> {
    let header = OPENER.captures(line)?.get(1)?.as_str();
    if header.trim_end().ends_with(':') {
        return None;
    }
    Some(header)
}

struct AlertSpan<'a> {
    opener: &'a str,
    header: &'a str,
    body: &'a str,
    len: usize,
}

/// Finds the opener, the body and the matching close line.
fn scan(value: &str) -> Option<AlertSpan<'_>> {
    let mut lines = value.split_inclusive('\n');
    let first = lines.next()?;
    let opener = first.strip_suffix('\n')?;
    let header = opener_header(opener)?;

    let body_start = first.len();
    let mut offset = body_start;
    let mut depth = 1usize;
    for line in lines {
        let content = line.strip_suffix('\n').unwrap_or(line);
        if CLOSER.is_match(content) {
            depth -= 1;
            if depth == 0 {
                return Some(AlertSpan {
                    opener,
                    header,
                    body: &value[body_start..offset],
                    len: offset + content.len(),
                });
            }
        } else if opener_header(content).is_some_and(|header| !header.trim().is_empty()) {
            depth += 1;
        }
        offset += line.len();
    }
    None
}

/// Removes the opener's indentation from every body line.
fn dedent(body: &str, indent: usize) -> String {
    body.split_inclusive('\n')
        .map(|line| strip_leading_whitespace(line, indent))
        .collect()
}

/// Matches a whole alert block, close line included.
pub struct AlertBlockTokenizer;

impl BlockTokenizer for AlertBlockTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let Some(span) = scan(value) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let attrs = parse_header(span.header);
        let indent = leading_whitespace_len(span.opener);
        let children = if indent > 0 {
            cx.tokenize_block(&dedent(span.body, indent))?
        } else {
            cx.tokenize_block(span.body)?
        };

        let node = AlertBlock {
            kind: AlertKind::normalize(attrs.alert.as_deref().unwrap_or_default()),
            title: attrs.title,
            auto_collapse: attrs.auto_collapse,
            collapsible: attrs.collapsible,
            indentation: parse_indentation(span.opener).depth,
            children,
        };
        eat(value, &value[..span.len], Some(Node::AlertBlock(node)))
    }
}

/// Installs [`AlertBlockTokenizer`] ahead of blockquotes.
pub struct AlertBlockPlugin;

impl Plugin for AlertBlockPlugin {
    fn name(&self) -> &'static str {
        "alert-block"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.insert_block_before(BLOCKQUOTE, ALERT_BLOCK, AlertBlockTokenizer);
        registry.interrupt(Interrupt::Paragraph, ALERT_BLOCK);
    }
}
