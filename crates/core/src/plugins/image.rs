//! `![title](src "alt")` images.

use crate::ast::{Image, Node};
use crate::engine::{
    Context, InlineTokenizer, LINK, Plugin, RegistryBuilder, TokenizeResult, eat, find_from, probe,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Registry name of the image tokenizer.
pub const IMAGE: &str = "image";

static IMAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^!\[(.*?)\]\((.+?)(?:\s+["'](.*?)["'])?\)"#).unwrap());

/// Matches an image at the start of the text.
pub struct ImageTokenizer;

impl InlineTokenizer for ImageTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let Some(captures) = IMAGE_TAG.captures(value) else {
            return Ok(None);
        };
        if silent {
            return probe();
        }

        let title = captures.get(1).map_or("", |m| m.as_str());
        let image = Image {
            title: if title.is_empty() { "image" } else { title }.to_string(),
            src: captures[2].to_string(),
            alt: captures.get(3).map(|m| m.as_str().to_string()),
        };
        eat(value, &captures[0], Some(Node::Image(image)))
    }

    fn locate(&self, value: &str, from: usize) -> Option<usize> {
        find_from(value, from, "![")
    }
}

/// Installs [`ImageTokenizer`] ahead of links.
pub struct ImagePlugin;

impl Plugin for ImagePlugin {
    fn name(&self) -> &'static str {
        "image"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.insert_inline_before(LINK, IMAGE, ImageTokenizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Paragraph;
    use crate::plugins::testing::parse_blocks;

    fn inline(input: &str) -> Vec<Node> {
        match parse_blocks(input).as_slice() {
            [Node::Paragraph(Paragraph { children, .. })] => children.clone(),
            other => panic!("expected one paragraph, got {other:?}"),
        }
    }

    #[test]
    fn title_source_and_alt() {
        assert_eq!(
            inline(r#"See ![Diagram](/img/flow.png "Request flow") here"#),
            vec![
                Node::text("See "),
                Node::Image(Image {
                    title: "Diagram".into(),
                    src: "/img/flow.png".into(),
                    alt: Some("Request flow".into()),
                }),
                Node::text(" here"),
            ]
        );
    }

    #[test]
    fn empty_title_defaults() {
        assert_eq!(
            inline("![](a.png)"),
            vec![Node::Image(Image {
                title: "image".into(),
                src: "a.png".into(),
                alt: None,
            })]
        );
    }

    #[test]
    fn bang_without_image_is_text() {
        assert_eq!(inline("Wow! [x] done"), vec![Node::text("Wow! [x] done")]);
    }
}
