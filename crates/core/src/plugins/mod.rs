//! Developer-portal Markdown extensions, one plugin per construct.
//!
//! Plugins are installed into a [`RegistryBuilder`] in a fixed order; later
//! plugins position themselves relative to the names earlier ones added.
//!
//! - `alert_block` - `:::kind` admonitions
//! - `heading` - `#` headings with anchor slugs
//! - `paragraph` - paragraphs that stop at interrupting constructs
//! - `toc` - legacy `[toc]` marker
//! - `code_fence` - fenced code with a JSON attribute header
//! - `table` - pipe tables with alignment, wrapping and colspans
//! - `image` - `![title](src "alt")`
//! - `list` - nested bullet and numbered lists
//! - `tabbed_content` - `%%%` tab groups
//! - `ui_component` - `<dxui:Name .../>` tags

pub mod alert_block;
pub mod code_fence;
pub mod heading;
pub mod image;
pub mod list;
pub mod paragraph;
pub mod table;
pub mod tabbed_content;
pub mod toc;
pub mod ui_component;

pub use alert_block::{ALERT_BLOCK, AlertBlockPlugin, AlertBlockTokenizer};
pub use code_fence::{CODE_FENCE, CodeFencePlugin, CodeFenceTokenizer};
pub use heading::{HEADING, HeadingTokenizer, HeadingsPlugin};
pub use image::{IMAGE, ImagePlugin, ImageTokenizer};
pub use list::{LIST, ListPlugin, ListTokenizer};
pub use paragraph::{PARAGRAPH, ParagraphPlugin, ParagraphTokenizer};
pub use table::{TABLE, TablePlugin, TableTokenizer, parse_row};
pub use tabbed_content::{TABBED_CONTENT, TabbedContentPlugin, TabbedContentTokenizer};
pub use toc::{TOC, TableOfContentsPlugin, TableOfContentsTokenizer};
pub use ui_component::{UI_COMPONENT, UiComponentPlugin, UiComponentTokenizer};

use crate::engine::{Engine, Plugin, Registry, RegistryBuilder};
use crate::parse::ParseOptions;

/// Plugins in installation order. The `[toc]` plugin is left out when
/// `table_of_contents` is off.
pub fn default_plugins(options: &ParseOptions) -> Vec<Box<dyn Plugin>> {
    let mut plugins: Vec<Box<dyn Plugin>> = vec![
        Box::new(AlertBlockPlugin),
        Box::new(HeadingsPlugin),
        Box::new(ParagraphPlugin),
    ];
    if options.table_of_contents {
        plugins.push(Box::new(TableOfContentsPlugin));
    }
    plugins.push(Box::new(CodeFencePlugin));
    plugins.push(Box::new(TablePlugin));
    plugins.push(Box::new(ImagePlugin));
    plugins.push(Box::new(ListPlugin));
    plugins.push(Box::new(TabbedContentPlugin));
    plugins.push(Box::new(UiComponentPlugin));
    plugins
}

/// Built-in tokenizers plus every default plugin.
pub fn build_registry(options: &ParseOptions) -> Registry {
    default_plugins(options)
        .iter()
        .fold(RegistryBuilder::with_defaults(), |builder, plugin| {
            builder.install(plugin.as_ref())
        })
        .build()
}

/// Engine with every default plugin installed.
pub fn build_engine(options: ParseOptions) -> Engine {
    let registry = build_registry(&options);
    Engine::new(registry, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        BLOCKQUOTE, Context, EMPHASIS, ESCAPE, INLINE_CODE, Interrupt, LINK, NEWLINE, STRONG, TEXT,
        THEMATIC_BREAK, Tokenized,
    };
    use crate::error::ParseDiagnostics;
    use std::cell::RefCell;

    #[test]
    fn block_order_after_install() {
        let registry = build_registry(&ParseOptions::default());
        assert_eq!(
            registry.block_names(),
            vec![
                UI_COMPONENT,
                TABBED_CONTENT,
                NEWLINE,
                CODE_FENCE,
                TOC,
                ALERT_BLOCK,
                BLOCKQUOTE,
                HEADING,
                THEMATIC_BREAK,
                LIST,
                TABLE,
                PARAGRAPH,
            ]
        );
    }

    #[test]
    fn inline_order_after_install() {
        let registry = build_registry(&ParseOptions::default());
        assert_eq!(
            registry.inline_names(),
            vec![UI_COMPONENT, ESCAPE, INLINE_CODE, STRONG, EMPHASIS, IMAGE, LINK, TEXT]
        );
    }

    #[test]
    fn interrupt_lists() {
        let registry = build_registry(&ParseOptions::default());
        assert_eq!(
            registry.interrupters(Interrupt::Paragraph),
            &[
                THEMATIC_BREAK,
                BLOCKQUOTE,
                ALERT_BLOCK,
                HEADING,
                LIST,
                CODE_FENCE,
                UI_COMPONENT,
            ]
        );
        assert_eq!(
            registry.interrupters(Interrupt::List),
            &[THEMATIC_BREAK, HEADING, CODE_FENCE]
        );
        assert_eq!(
            registry.interrupters(Interrupt::Blockquote),
            &[THEMATIC_BREAK, HEADING, CODE_FENCE]
        );
    }

    #[test]
    fn probes_agree_with_commits() {
        let engine = build_engine(ParseOptions::default());
        let diagnostics = RefCell::new(ParseDiagnostics::new());
        let cx = Context::root(&engine, &diagnostics);
        let samples = [
            "# Title\nbody\n",
            ":::info\nx\n:::\n",
            ":::info\nunclosed\n",
            "```js\ncode\n```\n",
            "a|b\n-|-\n1|2",
            "- a\n  - b\n",
            "> quote\nlazy\n\nafter",
            "%%% A\nx\n%%%\n",
            "<dxui:Tag a=\"1\"/>\n",
            "[toc]\n# A\n",
            "---\n",
            "\n\n  \n",
            "plain text\nmore\n\nnext",
            "ünï | cödé\n--|--\nß | ø\n",
        ];

        for value in samples {
            for (name, tokenizer) in engine.registry().block() {
                let probed = tokenizer.tokenize(&cx, value, true);
                match tokenizer.tokenize(&cx, value, false) {
                    Ok(Some(Tokenized::Eaten { len, .. })) => {
                        assert!(len > 0 && len <= value.len(), "{name} on {value:?}");
                        assert!(value.is_char_boundary(len), "{name} on {value:?}");
                        assert_eq!(probed, Ok(Some(Tokenized::Probe)), "{name} on {value:?}");
                    }
                    Ok(None) => assert_eq!(probed, Ok(None), "{name} on {value:?}"),
                    other => panic!("{name} on {value:?}: {other:?}"),
                }
            }
        }
        assert!(!diagnostics.borrow().has_any());
    }

    #[test]
    fn toc_plugin_is_optional() {
        let options = ParseOptions {
            table_of_contents: false,
            ..ParseOptions::default()
        };
        assert!(!build_registry(&options).block_names().contains(&TOC));
    }
}
