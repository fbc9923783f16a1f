//! `%%%` tab groups.
//!
//! ```text
//! %%% npm
//! npm install dxmd
//! %%% yarn
//! yarn add dxmd
//! %%%
//! ```
//!
//! Pane bodies are kept as source; the renderer parses the active one.

use crate::ast::{Node, TabTitle, TabbedContent};
use crate::engine::{BlockTokenizer, Context, Plugin, RegistryBuilder, TokenizeResult, eat, probe};
use once_cell::sync::Lazy;
use regex::Regex;

/// Registry name of the tab group tokenizer.
pub const TABBED_CONTENT: &str = "tabbed_content";

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^%{3,}[ \t]*(\S.*?)[ \t]*$").unwrap());
static CLOSER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^%{3,}[ \t]*$").unwrap());

struct Tab<'a> {
    raw: &'a str,
    title: &'a str,
    body: String,
}

/// Tabs up to the closing line, and the bytes they cover.
fn scan(value: &str) -> Option<(Vec<Tab<'_>>, usize)> {
    let mut tabs: Vec<Tab<'_>> = Vec::new();
    let mut offset = 0;

    for line in value.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        if tabs.is_empty() || !CLOSER.is_match(content) {
            if let Some(captures) = TITLE.captures(content) {
                tabs.push(Tab {
                    raw: content,
                    title: captures.get(1)?.as_str(),
                    body: String::new(),
                });
            } else {
                tabs.last_mut()?.body.push_str(line);
            }
        } else {
            return Some((tabs, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

/// Matches a tab group through its bare `%%%` line.
pub struct TabbedContentTokenizer;

impl BlockTokenizer for TabbedContentTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let Some((tabs, len)) = scan(value) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let mut node = TabbedContent {
            titles: Vec::with_capacity(tabs.len()),
            panes: Vec::with_capacity(tabs.len()),
        };
        for tab in tabs {
            node.titles.push(TabTitle {
                raw: tab.raw.to_string(),
                text: tab.title.to_string(),
                children: cx.tokenize_inline(tab.title)?,
            });
            node.panes.push(tab.body);
        }
        eat(value, &value[..len], Some(Node::TabbedContent(node)))
    }
}

/// Puts [`TabbedContentTokenizer`] first in the block list.
pub struct TabbedContentPlugin;

impl Plugin for TabbedContentPlugin {
    fn name(&self) -> &'static str {
        "tabbed-content"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.push_block_front(TABBED_CONTENT, TabbedContentTokenizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Container;
    use crate::plugins::testing::{eaten, run_block};

    fn tabs(value: &str) -> (&str, TabbedContent) {
        match eaten(value, run_block(&TabbedContentTokenizer, value, false)) {
            Some((consumed, Node::TabbedContent(tabs))) => (consumed, tabs),
            other => panic!("expected tabbed content, got {other:?}"),
        }
    }

    #[test]
    fn titles_and_panes() {
        let (consumed, group) = tabs("%%% One\na\n\n- b\n%%%% Two\nc\n%%%\nafter");
        assert_eq!(consumed, "%%% One\na\n\n- b\n%%%% Two\nc\n%%%\n");
        let titles: Vec<_> = group.titles.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert_eq!(group.titles[1].raw, "%%%% Two");
        assert_eq!(group.panes, vec!["a\n\n- b\n".to_string(), "c\n".to_string()]);
    }

    #[test]
    fn titles_are_inline_parsed() {
        let (_, group) = tabs("%%% **Bold** tab\nx\n%%%");
        assert_eq!(
            group.titles[0].children,
            vec![
                Node::Strong(Container {
                    children: vec![Node::text("Bold")],
                }),
                Node::text(" tab"),
            ]
        );
    }

    #[test]
    fn duplicate_titles_stay_separate() {
        let (_, group) = tabs("%%% Same\n1\n%%% Same\n2\n%%%\n");
        assert_eq!(group.titles.len(), 2);
        assert_eq!(group.panes, vec!["1\n".to_string(), "2\n".to_string()]);
    }

    #[test]
    fn needs_title_and_close() {
        assert_eq!(run_block(&TabbedContentTokenizer, "%%%\nx\n%%%\n", false), Ok(None));
        assert_eq!(run_block(&TabbedContentTokenizer, "%%% Open\nx\n", false), Ok(None));
        assert_eq!(run_block(&TabbedContentTokenizer, "text\n%%%\n", true), Ok(None));
    }
}
