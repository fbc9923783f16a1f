//! Legacy `[toc]` / `:::toc:::` marker.
//!
//! The marker line expands to links for every heading in the rest of the
//! document, found by scanning the raw text. Headings inside code fences
//! are skipped. The links carry the plain slug of each heading; they are
//! not adjusted when the heading-id pass renames a duplicate.

use super::alert_block::ALERT_BLOCK;
use super::heading::match_heading;
use crate::ast::{Node, TableOfContents, TocLink};
use crate::engine::{BlockTokenizer, Context, Plugin, RegistryBuilder, TokenizeResult, eat, probe};
use crate::error::TokenizeError;
use crate::slug::slugify;
use once_cell::sync::Lazy;
use regex::Regex;

/// Registry name of the table of contents tokenizer.
pub const TOC: &str = "toc";

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ \t]*(?:\[toc\]|:::toc:::)[ \t]*(?:\n|$)").unwrap());

fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// One link per heading line in `text`, outside fenced code.
fn collect_links(cx: &Context<'_>, text: &str) -> Result<Vec<Node>, TokenizeError> {
    let mut links = Vec::new();
    let mut in_fence = false;
    for line in text.lines() {
        if is_fence_line(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, label)) = match_heading(line) {
            links.push(Node::TocLink(TocLink {
                level,
                name: slugify(label),
                children: cx.tokenize_inline(label)?,
            }));
        }
    }
    Ok(links)
}

/// Matches the marker line and builds links from the text after it.
pub struct TableOfContentsTokenizer;

impl BlockTokenizer for TableOfContentsTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let Some(marker) = MARKER.find(value) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let children = collect_links(cx, &value[marker.end()..])?;
        log::trace!("table of contents with {} links", children.len());
        eat(
            value,
            marker.as_str(),
            Some(Node::TableOfContents(TableOfContents { children })),
        )
    }
}

/// Installs [`TableOfContentsTokenizer`] ahead of alert blocks, so the
/// `:::toc:::` form is claimed first.
pub struct TableOfContentsPlugin;

impl Plugin for TableOfContentsPlugin {
    fn name(&self) -> &'static str {
        "table-of-contents"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.insert_block_before(ALERT_BLOCK, TOC, TableOfContentsTokenizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::{eaten, run_block};

    fn links(value: &str) -> (&str, Vec<(u8, String)>) {
        match eaten(value, run_block(&TableOfContentsTokenizer, value, false)) {
            Some((consumed, Node::TableOfContents(toc))) => {
                let links = toc
                    .children
                    .iter()
                    .map(|child| match child {
                        Node::TocLink(link) => (link.level, link.name.clone()),
                        other => panic!("expected toc link, got {other:?}"),
                    })
                    .collect();
                (consumed, links)
            }
            other => panic!("expected table of contents, got {other:?}"),
        }
    }

    #[test]
    fn scans_rest_of_document() {
        let (consumed, found) = links("[TOC]\n# Getting Started\ntext\n\n## API: Reference\n");
        assert_eq!(consumed, "[TOC]\n");
        assert_eq!(
            found,
            vec![
                (1, "getting-started".to_string()),
                (2, "api-reference".to_string()),
            ]
        );
    }

    #[test]
    fn fenced_headings_are_skipped() {
        let (_, found) = links(":::toc:::\n```sh\n# comment\n```\n# Real\n");
        assert_eq!(found, vec![(1, "real".to_string())]);
    }

    #[test]
    fn marker_must_be_alone() {
        assert_eq!(run_block(&TableOfContentsTokenizer, "[toc] here\n", false), Ok(None));
        assert_eq!(run_block(&TableOfContentsTokenizer, "see [toc]\n", true), Ok(None));
        let (consumed, found) = links("  [toc]  ");
        assert_eq!(consumed, "  [toc]  ");
        assert!(found.is_empty());
    }

    #[test]
    fn duplicate_headings_keep_plain_slug() {
        let (_, found) = links("[toc]\n# Intro\n# Intro\n");
        assert_eq!(found, vec![(1, "intro".to_string()), (1, "intro".to_string())]);
    }
}
