//! Pipe tables.
//!
//! ```text
//! | Name | Type   |
//! |:-----|-------:|
//! | id   | string |
//! | key  | more \
//! {: class="compact"}
//! ```
//!
//! A line whose cells end with `\` is folded into the previous row. An empty
//! cell written as a bare `|` widens the cell before it (`a||b` spans two
//! columns). `\|` is a literal pipe.

use super::paragraph::PARAGRAPH;
use crate::ast::{Align, Node, Table, TableCell, TableRow};
use crate::engine::{BlockTokenizer, Context, Plugin, RegistryBuilder, TokenizeResult, eat, probe};
use crate::indentation::parse_indentation;
use once_cell::sync::Lazy;
use regex::Regex;

/// Registry name of the table tokenizer.
pub const TABLE: &str = "table";

/// Stand-in for `\|` while splitting cells.
const ESCAPED_PIPE: &str = "\u{1a}";

static ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(.+?)\s*\|\s*(.+)(?:\||$)").unwrap());
static LEADING_PIPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\|?").unwrap());
static CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([^|]+?)\s*(\||\\\s*$|$)").unwrap());
static ALIGNMENT_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*\s*:*-+:*\s*\|\s*:*-+:*\s*\|?$").unwrap());
static ALIGNMENT_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|?\s*(:*)-+(:*)\s*(?:\||$)").unwrap());
static CLASS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*\{:\s*class\s*=\s*["'](.+?)["']\s*\}"#).unwrap()
});

fn protect_pipes(line: &str) -> String {
    line.replace("\\|", ESCAPED_PIPE)
}

/// Whether a line has at least two pipe-separated cells.
fn looks_tabular(line: &str) -> bool {
    ROW.is_match(&protect_pipes(line))
}

/// Column alignments of an alignment row such as `:--|:-:|--:`.
pub fn parse_alignment(line: &str) -> Option<Vec<Align>> {
    if !ALIGNMENT_ROW.is_match(line) {
        return None;
    }

    let mut alignment = Vec::new();
    let mut rest = line;
    while let Some(captures) = ALIGNMENT_CELL.captures(rest) {
        let left = !captures[1].is_empty();
        let right = !captures[2].is_empty();
        alignment.push(match (left, right) {
            (true, true) => Align::Center,
            (_, true) => Align::Right,
            _ => Align::Left,
        });
        rest = &rest[captures[0].len()..];
    }
    Some(alignment)
}

/// A parsed line: its cells and whether it continues the previous row.
struct ParsedRow {
    row: TableRow,
    wraps: bool,
}

/// Splits one line into cells. Returns `None` for lines that are not rows.
pub fn parse_row(line: &str, alignment: Option<&[Align]>) -> Option<TableRow> {
    parse_line(line, alignment).map(|parsed| parsed.row)
}

fn parse_line(line: &str, alignment: Option<&[Align]>) -> Option<ParsedRow> {
    let protected = protect_pipes(line);
    if !ROW.is_match(&protected) {
        return None;
    }

    let content = parse_indentation(&protected).content;
    let mut rest = &content[LEADING_PIPE.find(content).map_or(0, |m| m.end())..];
    let mut cells: Vec<Option<TableCell>> = Vec::new();
    let mut last_real: Option<usize> = None;
    let mut wraps = false;

    loop {
        if let Some(after) = rest.strip_prefix('|') {
            match last_real {
                Some(index) => {
                    if let Some(cell) = cells[index].as_mut() {
                        cell.colspan = Some(cell.colspan.unwrap_or(1) + 1);
                    }
                    cells.push(None);
                }
                None => {
                    let column = cells.len();
                    cells.push(Some(empty_cell(alignment, column)));
                    last_real = Some(column);
                }
            }
            rest = after;
            continue;
        }

        let Some(captures) = CELL.captures(rest) else {
            break;
        };
        let column = cells.len();
        cells.push(Some(TableCell {
            content: captures[1].trim().replace(ESCAPED_PIPE, "|"),
            align: column_align(alignment, column),
            colspan: None,
        }));
        last_real = Some(column);
        if captures[2].starts_with('\\') {
            wraps = true;
        }
        rest = &rest[captures[0].len()..];
    }

    if let Some(alignment) = alignment {
        fit_to_columns(&mut cells, alignment);
    }

    Some(ParsedRow {
        row: TableRow {
            raw: format!("{line}\n"),
            cells,
        },
        wraps,
    })
}

/// Pads or truncates `cells` to one slot per alignment column. A colspan
/// that ran past the last column is shortened to end there.
fn fit_to_columns(cells: &mut Vec<Option<TableCell>>, alignment: &[Align]) {
    let columns = alignment.len();
    if cells.len() > columns {
        log::trace!("dropping {} cells past column {columns}", cells.len() - columns);
        cells.truncate(columns);
        for (index, cell) in cells.iter_mut().enumerate() {
            if let Some(cell) = cell
                && let Some(span) = cell.colspan
            {
                let span = span.min(columns - index);
                cell.colspan = (span > 1).then_some(span);
            }
        }
    }
    for column in cells.len()..columns {
        cells.push(Some(empty_cell(Some(alignment), column)));
    }
}

fn column_align(alignment: Option<&[Align]>, column: usize) -> Align {
    alignment
        .and_then(|alignment| alignment.get(column).copied())
        .unwrap_or_default()
}

fn empty_cell(alignment: Option<&[Align]>, column: usize) -> TableCell {
    TableCell {
        content: String::new(),
        align: column_align(alignment, column),
        colspan: None,
    }
}

/// Appends a wrapped line's cells to the row it continues.
fn fold_into(row: &mut TableRow, wrapped: TableRow) {
    row.raw.push_str(&wrapped.raw);
    for (target, cell) in row.cells.iter_mut().zip(wrapped.cells) {
        if let (Some(target), Some(cell)) = (target, cell)
            && !cell.content.is_empty()
        {
            target.content.push('\n');
            target.content.push_str(&cell.content);
        }
    }
}

/// Matches a table starting at the first line.
pub struct TableTokenizer;

impl BlockTokenizer for TableTokenizer {
    fn tokenize(&self, _cx: &Context<'_>, value: &str, silent: bool) -> TokenizeResult {
        let mut head = value.splitn(3, '\n');
        let (Some(first), Some(second)) = (head.next(), head.next()) else {
            return Ok(None);
        };
        if !looks_tabular(first) || !looks_tabular(second) {
            return Ok(None);
        }
        if silent {
            return probe();
        }

        let lines: Vec<&str> = value.split('\n').collect();
        let mut header_row = None;
        let mut next = 0;
        let alignment = match parse_alignment(lines[1]) {
            Some(alignment) => {
                header_row = parse_row(lines[0], Some(alignment.as_slice()));
                next = 2;
                Some(alignment)
            }
            None => {
                let alignment = parse_alignment(lines[0]);
                if alignment.is_some() {
                    next = 1;
                }
                alignment
            }
        };

        let mut rows: Vec<TableRow> = Vec::new();
        while let Some(line) = lines.get(next) {
            let Some(parsed) = parse_line(line, alignment.as_deref()) else {
                break;
            };
            if parsed.wraps
                && let Some(previous) = rows.last_mut()
            {
                fold_into(previous, parsed.row);
            } else {
                rows.push(parsed.row);
            }
            next += 1;
        }

        if next == lines.len()
            && let Some(last) = rows.last_mut()
            && last.raw.ends_with('\n')
        {
            last.raw.pop();
        }

        let mut class_name = String::from("table");
        if let Some(captures) = lines.get(next).and_then(|line| CLASS_LINE.captures(line)) {
            class_name.push(' ');
            class_name.push_str(&captures[1]);
            next += 1;
        }

        let consumed = lines[..next].join("\n");
        let table = Table {
            class_name,
            header_row,
            align: alignment.unwrap_or_default(),
            rows,
            indentation: parse_indentation(lines[0]).depth,
        };
        eat(value, &consumed, Some(Node::Table(table)))
    }
}

/// Installs [`TableTokenizer`] just ahead of paragraphs.
pub struct TablePlugin;

impl Plugin for TablePlugin {
    fn name(&self) -> &'static str {
        "table"
    }

    fn install(&self, registry: &mut RegistryBuilder) {
        registry.insert_block_before(PARAGRAPH, TABLE, TableTokenizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::{eaten, run_block};

    fn table(value: &str) -> (&str, Table) {
        match eaten(value, run_block(&TableTokenizer, value, false)) {
            Some((consumed, Node::Table(table))) => (consumed, table),
            other => panic!("expected table, got {other:?}"),
        }
    }

    fn contents(row: &TableRow) -> Vec<Option<&str>> {
        row.cells
            .iter()
            .map(|cell| cell.as_ref().map(|cell| cell.content.as_str()))
            .collect()
    }

    #[test]
    fn header_alignment_and_rows() {
        let (consumed, table) = table("a|b\n:--|--:\n1|2\n");
        assert_eq!(consumed, "a|b\n:--|--:\n1|2");
        assert_eq!(table.align, vec![Align::Left, Align::Right]);
        let header = table.header_row.expect("header row");
        assert_eq!(contents(&header), vec![Some("a"), Some("b")]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(contents(&table.rows[0]), vec![Some("1"), Some("2")]);
        assert_eq!(table.rows[0].cells[1].as_ref().map(|c| c.align), Some(Align::Right));
        assert_eq!(table.class_name, "table");
    }

    #[test]
    fn headerless_alignment_row_is_skipped() {
        let (_, table) = table("|:-:|:-:|\n| x | y |\n| z | w |");
        assert_eq!(table.header_row, None);
        assert_eq!(table.align, vec![Align::Center, Align::Center]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].raw, "| z | w |");
    }

    #[test]
    fn no_alignment_defaults_left() {
        let (_, table) = table("a | b\nc | d\n\nafter");
        assert_eq!(table.header_row, None);
        assert!(table.align.is_empty());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[0].as_ref().map(|c| c.align), Some(Align::Left));
    }

    #[test]
    fn colspan_extends_previous_cell() {
        let row = parse_row("a||b", None).expect("row");
        assert_eq!(row.cells.len(), 3);
        assert_eq!(row.cells[0].as_ref().and_then(|c| c.colspan), Some(2));
        assert_eq!(row.cells[1], None);
        assert_eq!(row.cells[2].as_ref().map(|c| c.content.as_str()), Some("b"));
        assert_eq!(row.real_cells().count(), 2);
    }

    #[test]
    fn escaped_pipe_is_literal() {
        let row = parse_row(r"a \| b | c", None).expect("row");
        assert_eq!(contents(&row), vec![Some("a | b"), Some("c")]);
        assert!(parse_row(r"a \| b", None).is_none());
    }

    #[test]
    fn wrapped_lines_fold_into_previous_row() {
        let (_, table) = table("h1|h2\n--|--\nlong|x\ntext|y \\\nnext|z\n");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(contents(&table.rows[0]), vec![Some("long\ntext"), Some("x\ny")]);
        assert_eq!(table.rows[0].raw, "long|x\ntext|y \\\n");
        assert_eq!(contents(&table.rows[1]), vec![Some("next"), Some("z")]);
    }

    #[test]
    fn short_rows_are_padded() {
        let alignment = [Align::Left, Align::Left, Align::Right];
        let row = parse_row("a|b", Some(&alignment[..])).expect("row");
        assert_eq!(contents(&row), vec![Some("a"), Some("b"), Some("")]);
        assert_eq!(row.cells[2].as_ref().map(|c| c.align), Some(Align::Right));
    }

    #[test]
    fn long_rows_are_truncated() {
        let alignment = [Align::Left, Align::Right];
        let row = parse_row("a|b|c|d", Some(&alignment[..])).expect("row");
        assert_eq!(contents(&row), vec![Some("a"), Some("b")]);
        assert_eq!(row.raw, "a|b|c|d\n");

        let row = parse_row("a|||b", Some(&alignment[..])).expect("row");
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cells[0].as_ref().and_then(|c| c.colspan), Some(2));
        assert!(row.cells[1].is_none());

        let (_, table) = table("h1|h2\n--|--\n1|2|3\n");
        assert_eq!(contents(&table.rows[0]), vec![Some("1"), Some("2")]);
    }

    #[test]
    fn class_line_is_consumed() {
        let (consumed, table) = table("a|b\n-|-\n1|2\n{: class=\"compact\"}\nnext");
        assert_eq!(consumed, "a|b\n-|-\n1|2\n{: class=\"compact\"}");
        assert_eq!(table.class_name, "table compact");
    }

    #[test]
    fn single_tabular_line_declines() {
        assert_eq!(run_block(&TableTokenizer, "a|b\nplain", false), Ok(None));
        assert_eq!(run_block(&TableTokenizer, "a|b", true), Ok(None));
    }
}
