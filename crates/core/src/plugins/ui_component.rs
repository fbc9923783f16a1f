//! `<dxui:Name key="value" .../>` component tags.
//!
//! Tags are recognized both on a line of their own (a block) and inside
//! running text (inline). Attribute values are kept as written; `disabled`
//! without a value maps to an empty string.

use crate::ast::{Node, UiComponent};
use crate::engine::{
    BlockTokenizer, Context, InlineTokenizer, Interrupt, Plugin, RegistryBuilder, TokenizeResult,
    eat, line_with_newline, probe,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Registry name of the component tokenizer, in both lists.
pub const UI_COMPONENT: &str = "ui_component";

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^<dxui:([^\s/>]+)(.*?)/>").unwrap());

const TAG_OPEN: &str = "<dxui:";

/// Splits off one attribute value, quoted or bare.
fn split_value(source: &str) -> (&str, &str) {
    if let Some(quote) = source.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let inner = &source[1..];
        return match inner.find(quote) {
            Some(end) => (&inner[..end], &inner[end + 1..]),
            None => (inner, ""),
        };
    }
    let end = source.find(char::is_whitespace).unwrap_or(source.len());
    (&source[..end], &source[end..])
}

/// Reads `key="value"`, `key='value'`, `key=value` and bare `key` pairs.
pub fn parse_props(source: &str) -> BTreeMap<String, String> {
    let mut props = BTreeMap::new();
    let mut rest = source.trim_start();

    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let mut value = "";
        if let Some(after) = rest.strip_prefix('=') {
            let (found, remainder) = split_value(after.trim_start());
            value = found;
            rest = remainder.trim_start();
        }

        if key.is_empty() {
            log::debug!("ui component attribute without a name: ={value:?}");
            continue;
        }
        props.insert(key.to_string(), value.to_string());
    }
    props
}

fn component(value: &str, inline: bool) -> Option<(usize, UiComponent)> {
    let captures = TAG.captures(value)?;
    let node = UiComponent {
        component: captures.get(1)?.as_str().to_string(),
        inline,
        props: parse_props(captures.get(2)?.as_str()),
    };
    Some((captures.get(0)?.end(), node))
}

/// Matches a component tag, as a block or inside text.
pub struct UiComponentTokenizer;

impl BlockTokenizer for UiComponentTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let line = line_with_newline(value);
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        let Some((end, node)) = component(&line[indent..], false) else {
            return Ok(None);
        };
        if !line[indent + end..].trim().is_empty() {
            // Text after the tag makes it part of a paragraph.
            return Ok(None);
        }
        if silent {
            return probe();
        }
        eat(value, line, Some(Node::UiComponent(node)))
    }
}

impl InlineTokenizer for UiComponentTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let Some((end, node)) = component(value, true) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }
        eat(value, &value[..end], Some(Node::UiComponent(node)))
    }

    fn locate(&self, value: &str, from: usize) -> Option<usize> {
        value
            .get(from..)?
            .match_indices('<')
            .map(|(index, _)| index + from)
            .find(|&index| {
                value
                    .get(index..index + TAG_OPEN.len())
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(TAG_OPEN))
            })
    }
}

/// Puts [`UiComponentTokenizer`] first in both lists and lets a tag line
/// end a paragraph.
pub struct UiComponentPlugin;

impl Plugin for UiComponentPlugin {
    fn name(&self) -> &'static str {
        "ui-component"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.push_block_front(UI_COMPONENT, UiComponentTokenizer);
        registry.push_inline_front(UI_COMPONENT, UiComponentTokenizer);
        registry.interrupt(Interrupt::Paragraph, UI_COMPONENT);
    }
}
