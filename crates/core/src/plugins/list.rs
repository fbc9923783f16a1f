//! Bullet and numbered lists.
//!
//! Items are collected line by line, then assembled into a tree by
//! indentation level: two spaces (or one tab) per level. A nested list hangs
//! off the item right above it. Lines that merely start with emphasis
//! (`*word*`, `**word**`) or a decimal number (`3.14`) end the list.

use crate::ast::{List, ListItem, Node};
use crate::engine::{
    BlockTokenizer, Context, Interrupt, Plugin, RegistryBuilder, THEMATIC_BREAK, TokenizeResult,
    eat, probe,
};
use crate::error::TokenizeError;
use crate::indentation::parse_indentation;
use once_cell::sync::Lazy;
use regex::Regex;

/// Registry name of the list tokenizer.
pub const LIST: &str = "list";

static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*+]|\d+[.)])\s*(.+)\s*$").unwrap());
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*\*(?:[^* ].*\S|[^* ])\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\*(?:[^* ].*\S|[^* ])\*").unwrap());
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[0-9]+\.[0-9]+\s*").unwrap());

#[derive(Debug, PartialEq)]
struct ItemLine<'a> {
    level: usize,
    marker: &'a str,
    text: &'a str,
}

fn match_item(line: &str) -> Option<ItemLine<'_>> {
    if BOLD.is_match(line) || ITALIC.is_match(line) || DECIMAL.is_match(line) {
        return None;
    }
    let captures = ITEM.captures(line)?;
    Some(ItemLine {
        level: parse_indentation(captures.get(1)?.as_str()).depth,
        marker: captures.get(2)?.as_str(),
        text: captures.get(3)?.as_str().trim_end(),
    })
}

/// Item lines at the start of `value` and the bytes they cover.
fn scan<'a>(cx: &Context<'_>, value: &'a str) -> (Vec<ItemLine<'a>>, usize) {
    let mut items = Vec::new();
    let mut consumed = 0;
    for line in value.split_inclusive('\n') {
        if !items.is_empty() && cx.interrupts(Interrupt::List, &value[consumed..]) {
            break;
        }
        let Some(item) = match_item(line.strip_suffix('\n').unwrap_or(line)) else {
            break;
        };
        items.push(item);
        consumed += line.len();
    }
    (items, consumed)
}

fn new_list(marker: &str) -> List {
    let digits: String = marker.chars().take_while(char::is_ascii_digit).collect();
    List {
        ordered: !digits.is_empty(),
        start: digits.parse().ok(),
        children: Vec::new(),
    }
}

/// Makes sure `list` ends with an item a nested list can hang off.
fn ensure_item(list: &mut List) {
    if !matches!(list.children.last(), Some(Node::ListItem(_))) {
        list.children.push(Node::ListItem(ListItem::default()));
    }
}

/// Moves the innermost open list into the last item of its parent.
fn close_innermost(root: &mut List, open: &mut Vec<List>) {
    let Some(list) = open.pop() else {
        return;
    };
    let parent = open.last_mut().unwrap_or(root);
    if let Some(Node::ListItem(item)) = parent.children.last_mut() {
        item.children.push(Node::List(list));
    }
}

/// Assembles item lines into a tree with an explicit stack of open lists.
fn build_list(cx: &Context<'_>, items: &[ItemLine<'_>]) -> Result<List, TokenizeError> {
    let first = items
        .first()
        .ok_or_else(|| TokenizeError::pattern("list without items"))?;
    let max_level = cx.options().max_list_depth;
    let mut root = new_list(first.marker);
    let mut open: Vec<List> = Vec::new();

    for item in items {
        if item.level > max_level {
            cx.warn(
                LIST,
                format!("item at level {} clamped to {max_level}", item.level),
            );
        }
        let level = item.level.min(max_level);
        while open.len() < level {
            ensure_item(open.last_mut().unwrap_or(&mut root));
            open.push(new_list(item.marker));
        }
        while open.len() > level {
            close_innermost(&mut root, &mut open);
        }

        let children = cx.tokenize_inline(item.text)?;
        open.last_mut()
            .unwrap_or(&mut root)
            .children
            .push(Node::ListItem(ListItem { children }));
    }

    while !open.is_empty() {
        close_innermost(&mut root, &mut open);
    }
    Ok(root)
}

/// Matches consecutive list item lines.
pub struct ListTokenizer;

impl BlockTokenizer for ListTokenizer {
    fn tokenize(&self, cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let (items, consumed) = scan(cx, value);
        if items.is_empty() {
            return Ok(None);
        }
        if silent {
            return probe();
        }

        let list = build_list(cx, &items)?;
        eat(value, &value[..consumed], Some(Node::List(list)))
    }
}

/// Installs [`ListTokenizer`] after thematic breaks, so `---` and `* * *`
/// stay rules, and lets lists end paragraphs.
pub struct ListPlugin;

impl Plugin for ListPlugin {
    fn name(&self) -> &'static str {
        "list"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.insert_block_after(THEMATIC_BREAK, LIST, ListTokenizer);
        registry.interrupt(Interrupt::Paragraph, LIST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::error::ParseDiagnostics;
    use crate::parse::ParseOptions;
    use crate::plugins::build_engine;
    use crate::plugins::testing::{eaten, run_block};
    use std::cell::RefCell;

    fn parse_list(value: &str) -> (&str, List) {
        match eaten(value, run_block(&ListTokenizer, value, false)) {
            Some((consumed, Node::List(list))) => (consumed, list),
            other => panic!("expected list, got {other:?}"),
        }
    }

    fn item(node: &Node) -> &ListItem {
        match node {
            Node::ListItem(item) => item,
            other => panic!("expected list item, got {other:?}"),
        }
    }

    #[test]
    fn nested_items_hang_off_previous_item() {
        let (consumed, list) = parse_list("- a\n  - b\n  - c\n- d\n");
        assert_eq!(consumed, "- a\n  - b\n  - c\n- d\n");
        assert!(!list.ordered);
        assert_eq!(list.children.len(), 2);

        let first = item(&list.children[0]);
        assert_eq!(first.children[0], Node::text("a"));
        let nested: Vec<_> = first.sublists().collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].children.len(), 2);

        let second = item(&list.children[1]);
        assert_eq!(second.children, vec![Node::text("d")]);
        assert_eq!(second.sublists().count(), 0);
    }

    #[test]
    fn ordered_lists_take_start_from_first_item() {
        let (consumed, list) = parse_list("12. x\n13) y");
        assert_eq!(consumed, "12. x\n13) y");
        assert!(list.ordered);
        assert_eq!(list.start, Some(12));

        let (_, list) = parse_list("- a\n  1. b\n  2. c\n");
        let nested = item(&list.children[0]).sublists().next().expect("sublist");
        assert!(nested.ordered);
        assert_eq!(nested.start, Some(1));
    }

    #[test]
    fn emphasis_and_decimals_are_not_items() {
        assert_eq!(run_block(&ListTokenizer, "**bold** text\n", false), Ok(None));
        assert_eq!(run_block(&ListTokenizer, "*lean* text\n", false), Ok(None));
        assert_eq!(run_block(&ListTokenizer, "3.14 is pi\n", true), Ok(None));

        let (consumed, list) = parse_list("- a\n*b*\n");
        assert_eq!(consumed, "- a\n");
        assert_eq!(list.children.len(), 1);
    }

    #[test]
    fn rule_ends_list() {
        let (consumed, _) = parse_list("- a\n---\n");
        assert_eq!(consumed, "- a\n");
    }

    #[test]
    fn deep_first_item_gets_empty_parents() {
        let (_, list) = parse_list("    - deep\n- top");
        assert_eq!(list.children.len(), 2);
        let synthetic = item(&list.children[0]);
        assert_eq!(synthetic.children.len(), 1);
        let level_one = synthetic.sublists().next().expect("level one");
        let level_two = item(&level_one.children[0]).sublists().next().expect("level two");
        assert_eq!(
            item(&level_two.children[0]).children,
            vec![Node::text("deep")]
        );
    }

    #[test]
    fn levels_are_clamped() {
        let engine: Engine = build_engine(ParseOptions {
            max_list_depth: 1,
            ..ParseOptions::default()
        });
        let diagnostics = RefCell::new(ParseDiagnostics::new());
        let cx = Context::root(&engine, &diagnostics);
        let value = "- a\n  - b\n      - c\n";
        let list = match eaten(value, ListTokenizer.tokenize(&cx, value, false)) {
            Some((_, Node::List(list))) => list,
            other => panic!("expected list, got {other:?}"),
        };
        let nested = item(&list.children[0]).sublists().next().expect("sublist");
        assert_eq!(nested.children.len(), 2);
        assert_eq!(diagnostics.borrow().warnings.len(), 1);
    }
}
