//! `#`-style headings.

use crate::ast::{Heading, Node};
use crate::engine::{
    BlockTokenizer, Context, Interrupt, Plugin, RegistryBuilder, THEMATIC_BREAK, TokenizeResult,
    eat, first_line, probe,
};
use crate::slug::{legacy_slug, slugify};
use once_cell::sync::Lazy;
use regex::Regex;

/// Registry name of the heading tokenizer.
pub const HEADING: &str = "heading";

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(#{1,6})[ \t]*(.+?)[ \t]*#*[ \t]*$").unwrap());

/// Level and text of a heading line.
pub(crate) fn match_heading(line: &str) -> Option<(u8, &str)> {
    let captures = HEADING_LINE.captures(line)?;
    let level = captures.get(1)?.as_str().len() as u8;
    Some((level, captures.get(2)?.as_str()))
}

/// Matches one heading line. The line break after it is left to the
/// blank-line tokenizer.
pub struct HeadingTokenizer;

impl BlockTokenizer for HeadingTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let line = first_line(value);
        let Some((level, text)) = match_heading(line) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let node = Heading {
            level,
            name: slugify(text),
            legacy_name: legacy_slug(text),
            children: cx.tokenize_inline(text)?,
        };
        eat(value, line, Some(Node::Heading(node)))
    }
}

/// Installs [`HeadingTokenizer`] ahead of thematic breaks and lets it end
/// paragraphs, lists and blockquotes.
pub struct HeadingsPlugin;

impl Plugin for HeadingsPlugin {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.insert_block_before(THEMATIC_BREAK, HEADING, HeadingTokenizer);
        registry.interrupt(Interrupt::Paragraph, HEADING);
        registry.interrupt(Interrupt::List, HEADING);
        registry.interrupt(Interrupt::Blockquote, HEADING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_lines() {
        assert_eq!(match_heading("# Title"), Some((1, "Title")));
        assert_eq!(match_heading("  ### Spaced out ###  "), Some((3, "Spaced out")));
        assert_eq!(match_heading("######Tight"), Some((6, "Tight")));
        assert_eq!(match_heading("plain"), None);
        assert_eq!(match_heading("#"), None);
    }
}
