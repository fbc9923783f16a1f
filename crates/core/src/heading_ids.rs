//! Post-pass that makes heading anchors unique within a document.

use crate::ast::{Document, Node};
use crate::parse::AstTransform;
use crate::slug::HeadingIds;

/// Rewrites colliding heading slugs in document order.
///
/// Only direct children of the document are visited unless `nested` is
/// set. Table-of-contents links are never rewritten, so a `[toc]` entry
/// for a repeated heading keeps pointing at the first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingIdTransform {
    /// Also visit headings inside alerts, blockquotes and list items.
    pub nested: bool,
}

impl AstTransform for HeadingIdTransform {
    fn transform(&self, document: &mut Document) {
        dedupe_heading_ids(document, self.nested);
    }
}

/// De-duplicates heading `name`s in place: `intro`, `intro-1`, `intro-2`.
pub fn dedupe_heading_ids(document: &mut Document, nested: bool) {
    let mut ids = HeadingIds::new();
    visit(&mut document.children, &mut ids, nested);
}

fn visit(nodes: &mut [Node], ids: &mut HeadingIds, nested: bool) {
    for node in nodes {
        if let Node::Heading(heading) = node {
            if heading.name.is_empty() {
                continue;
            }
            let id = ids.next_id(&heading.name);
            if id != heading.name {
                log::trace!("renaming duplicate heading `{}` to `{}`", heading.name, id);
                heading.name = id;
            }
        } else if nested && let Some(children) = node.children_mut() {
            visit(children, ids, nested);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AlertBlock, AlertKind, Heading};

    fn heading(name: &str) -> Node {
        Node::Heading(Heading {
            level: 2,
            name: name.to_string(),
            legacy_name: name.replace('-', "_"),
            children: vec![Node::text(name)],
        })
    }

    fn names(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|node| match node {
                Node::Heading(heading) => Some(heading.name.clone()),
                _ => None,
            })
            .collect()
    }

    fn alert(children: Vec<Node>) -> Node {
        Node::AlertBlock(AlertBlock {
            kind: AlertKind::Info,
            title: None,
            auto_collapse: None,
            collapsible: None,
            indentation: 0,
            children,
        })
    }

    #[test]
    fn repeated_slugs_get_suffixes() {
        let mut document = Document {
            children: vec![heading("intro"), heading("intro"), heading("intro")],
        };
        dedupe_heading_ids(&mut document, false);
        assert_eq!(names(&document.children), ["intro", "intro-1", "intro-2"]);
    }

    #[test]
    fn suffixes_skip_existing_slugs() {
        let mut document = Document {
            children: vec![heading("intro"), heading("intro-1"), heading("intro")],
        };
        dedupe_heading_ids(&mut document, false);
        assert_eq!(names(&document.children), ["intro", "intro-1", "intro-2"]);
    }

    #[test]
    fn nested_headings_only_when_enabled() {
        let build = || Document {
            children: vec![heading("setup"), alert(vec![heading("setup")])],
        };

        let mut shallow = build();
        dedupe_heading_ids(&mut shallow, false);
        assert_eq!(names(shallow.children[1].children()), ["setup"]);

        let mut deep = build();
        HeadingIdTransform { nested: true }.transform(&mut deep);
        assert_eq!(names(deep.children[1].children()), ["setup-1"]);
    }

    #[test]
    fn legacy_name_is_left_alone() {
        let mut document = Document {
            children: vec![heading("a-b"), heading("a-b")],
        };
        dedupe_heading_ids(&mut document, false);
        match &document.children[1] {
            Node::Heading(heading) => {
                assert_eq!(heading.name, "a-b-1");
                assert_eq!(heading.legacy_name, "a_b");
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }
}
