//! Syntax tree produced by the tokenizers.
//!
//! Every node kind is a variant of [`Node`]; serialized with a `type`
//! discriminator and camelCase fields so a renderer can walk it as JSON.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Root of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Top-level block nodes in document order.
    pub children: Vec<Node>,
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// `#`-style heading with anchor slugs.
    Heading(Heading),
    /// `:::` admonition.
    AlertBlock(AlertBlock),
    /// Fenced code block.
    CodeFence(CodeFence),
    /// Pipe table.
    Table(Table),
    /// Ordered or unordered list.
    List(List),
    /// One list entry.
    ListItem(ListItem),
    /// Paragraph of inline content.
    Paragraph(Paragraph),
    /// `%%%` tab group.
    TabbedContent(TabbedContent),
    /// `<dxui:Name .../>` tag.
    UiComponent(UiComponent),
    /// Legacy `[toc]` marker.
    TableOfContents(TableOfContents),
    /// One entry of a table of contents.
    TocLink(TocLink),
    /// `>` quotation.
    Blockquote(Blockquote),
    /// `---` rule.
    ThematicBreak,
    /// Plain text run.
    Text(Text),
    /// `**strong**` span.
    Strong(Container),
    /// `*emphasis*` span.
    Emphasis(Container),
    /// `` `code` `` span.
    InlineCode(Text),
    /// `[label](url)` link.
    Link(Link),
    /// `![title](src "alt")` image.
    Image(Image),
}

impl Node {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text {
            value: value.into(),
        })
    }

    /// Child nodes, for kinds that have any.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading(n) => &n.children,
            Node::AlertBlock(n) => &n.children,
            Node::List(n) => &n.children,
            Node::ListItem(n) => &n.children,
            Node::Paragraph(n) => &n.children,
            Node::TableOfContents(n) => &n.children,
            Node::TocLink(n) => &n.children,
            Node::Blockquote(n) => &n.children,
            Node::Strong(n) | Node::Emphasis(n) => &n.children,
            Node::Link(n) => &n.children,
            Node::CodeFence(_)
            | Node::Table(_)
            | Node::TabbedContent(_)
            | Node::UiComponent(_)
            | Node::ThematicBreak
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Image(_) => &[],
        }
    }

    /// Mutable child nodes, for kinds that have any.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Heading(n) => Some(&mut n.children),
            Node::AlertBlock(n) => Some(&mut n.children),
            Node::List(n) => Some(&mut n.children),
            Node::ListItem(n) => Some(&mut n.children),
            Node::Paragraph(n) => Some(&mut n.children),
            Node::TableOfContents(n) => Some(&mut n.children),
            Node::TocLink(n) => Some(&mut n.children),
            Node::Blockquote(n) => Some(&mut n.children),
            Node::Strong(n) | Node::Emphasis(n) => Some(&mut n.children),
            Node::Link(n) => Some(&mut n.children),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) | Node::InlineCode(text) => out.push_str(&text.value),
        other => {
            for child in other.children() {
                collect_text(child, out);
            }
        }
    }
}

/// Heading node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    /// 1 through 6.
    pub level: u8,
    /// Anchor slug; rewritten by the heading-id pass on collisions.
    pub name: String,
    /// `_`-joined slug kept for old anchor links.
    pub legacy_name: String,
    /// Inline content.
    pub children: Vec<Node>,
}

/// Kind of an alert block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertKind {
    /// `info`, also the target of `vanilla`, `secondary` and `primary`.
    Info,
    /// `critical`, also the target of `error` and `danger`.
    Critical,
    /// `warning`.
    Warning,
    /// `success`.
    Success,
    /// Anything else, lowercased.
    Other(String),
}

impl AlertKind {
    /// Normalizes a user-supplied kind, folding legacy aliases.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "error" | "danger" | "critical" => AlertKind::Critical,
            "vanilla" | "secondary" | "primary" | "info" => AlertKind::Info,
            "warning" => AlertKind::Warning,
            "success" => AlertKind::Success,
            _ => AlertKind::Other(lowered),
        }
    }

    /// Kind as written in the tree.
    pub fn as_str(&self) -> &str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Critical => "critical",
            AlertKind::Warning => "warning",
            AlertKind::Success => "success",
            AlertKind::Other(kind) => kind,
        }
    }
}

impl Serialize for AlertKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Alert block node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBlock {
    /// Normalized kind.
    pub kind: AlertKind,
    /// Optional title from the JSON header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Start collapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_collapse: Option<bool>,
    /// Allow collapsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
    /// Indentation depth of the opening line.
    pub indentation: usize,
    /// Block content.
    pub children: Vec<Node>,
}

/// Fenced code node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFence {
    /// Code text, one newline-terminated line per body line.
    pub value: String,
    /// Language after alias resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Caption shown above the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// CSS max height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<String>,
    /// Render line numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_line_numbers: Option<bool>,
    /// Never collapse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_collapse: Option<bool>,
    /// Start collapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_collapse: Option<bool>,
    /// Indentation depth of the opening fence.
    pub indentation: usize,
}

/// Column alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// `:---` or `---`.
    #[default]
    Left,
    /// `:---:`.
    Center,
    /// `---:`.
    Right,
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCell {
    /// Raw Markdown content; wrapped lines are joined with `\n`.
    pub content: String,
    /// Column alignment.
    pub align: Align,
    /// Number of columns covered, when more than one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colspan: Option<usize>,
}

/// A table row. `None` cells are covered by an earlier cell's colspan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Source lines of the row.
    pub raw: String,
    /// Cells in column order.
    pub cells: Vec<Option<TableCell>>,
}

impl TableRow {
    /// Cells that carry content, skipping colspan placeholders.
    pub fn real_cells(&self) -> impl Iterator<Item = &TableCell> {
        self.cells.iter().flatten()
    }
}

/// Table node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// `table` plus any class from a trailing `{: class="..."}` line.
    pub class_name: String,
    /// Header row when an alignment row follows the first line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_row: Option<TableRow>,
    /// Alignment per column.
    pub align: Vec<Align>,
    /// Data rows.
    pub rows: Vec<TableRow>,
    /// Indentation depth of the first line.
    pub indentation: usize,
}

/// List node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    /// Numbered list.
    pub ordered: bool,
    /// First number of an ordered list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// `ListItem` children.
    pub children: Vec<Node>,
}

/// List item node: inline content, then any nested lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListItem {
    /// Inline nodes followed by nested `List` nodes.
    pub children: Vec<Node>,
}

impl ListItem {
    /// Nested lists of this item.
    pub fn sublists(&self) -> impl Iterator<Item = &List> {
        self.children.iter().filter_map(|child| match child {
            Node::List(list) => Some(list),
            _ => None,
        })
    }
}

/// Paragraph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    /// Indentation depth of the first line.
    pub indentation: usize,
    /// Inline content.
    pub children: Vec<Node>,
}

/// Title of one tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabTitle {
    /// Full `%%%` line.
    pub raw: String,
    /// Title text.
    pub text: String,
    /// Title parsed as inline content.
    pub children: Vec<Node>,
}

/// Tab group node. `titles[i]` labels `panes[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabbedContent {
    /// Tab titles.
    pub titles: Vec<TabTitle>,
    /// Unparsed pane sources.
    pub panes: Vec<String>,
}

/// UI component tag node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiComponent {
    /// Component name after `dxui:`.
    pub component: String,
    /// Matched inside a paragraph rather than as its own block.
    pub inline: bool,
    /// Attribute values, verbatim.
    pub props: BTreeMap<String, String>,
}

/// Table of contents node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableOfContents {
    /// `TocLink` children.
    pub children: Vec<Node>,
}

/// Table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocLink {
    /// Heading level.
    pub level: u8,
    /// Heading slug.
    pub name: String,
    /// Label parsed as inline content.
    pub children: Vec<Node>,
}

/// Blockquote node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blockquote {
    /// Block content.
    pub children: Vec<Node>,
}

/// Literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    /// The text.
    pub value: String,
}

/// Node that only wraps children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    /// Inline content.
    pub children: Vec<Node>,
}

/// Link node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// Destination.
    pub url: String,
    /// Optional quoted title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Label.
    pub children: Vec<Node>,
}

/// Image node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Bracket text, `image` when empty.
    pub title: String,
    /// Source path or URL.
    pub src: String,
    /// Quoted text after the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_aliases_fold() {
        assert_eq!(AlertKind::normalize("danger"), AlertKind::Critical);
        assert_eq!(AlertKind::normalize("Error"), AlertKind::Critical);
        assert_eq!(AlertKind::normalize("vanilla"), AlertKind::Info);
        assert_eq!(AlertKind::normalize("PRIMARY"), AlertKind::Info);
        assert_eq!(AlertKind::normalize("Warning"), AlertKind::Warning);
        assert_eq!(
            AlertKind::normalize("Tip"),
            AlertKind::Other("tip".to_string())
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let node = Node::Heading(Heading {
            level: 2,
            name: "intro".into(),
            legacy_name: "intro".into(),
            children: vec![Node::text("Intro")],
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["legacyName"], "intro");
        assert_eq!(json["children"][0]["type"], "text");
    }

    #[test]
    fn alert_kind_serializes_as_string() {
        let json = serde_json::to_value(AlertKind::Other("tip".into())).unwrap();
        assert_eq!(json, "tip");
    }

    #[test]
    fn plain_text_walks_children() {
        let node = Node::Paragraph(Paragraph {
            indentation: 0,
            children: vec![
                Node::text("a "),
                Node::Strong(Container {
                    children: vec![Node::text("b")],
                }),
                Node::InlineCode(Text { value: "c".into() }),
            ],
        });
        assert_eq!(node.plain_text(), "a bc");
    }
}
