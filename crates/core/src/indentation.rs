//! Leading-whitespace depth shared by the block tokenizers.

/// Indentation depth of a line plus its trimmed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indentation<'a> {
    /// Depth in levels: two columns per level, a tab counts as two columns.
    pub depth: usize,
    /// First line of the input with leading and trailing blanks removed.
    pub content: &'a str,
}

/// Measures the indentation of the first line of `line`.
///
/// One stray space is noise; two spaces (or one tab) signal a level.
///
/// ```
/// use dxmd_core::indentation::parse_indentation;
///
/// let parsed = parse_indentation("    - item\nnext");
/// assert_eq!(parsed.depth, 2);
/// assert_eq!(parsed.content, "- item");
/// ```
pub fn parse_indentation(line: &str) -> Indentation<'_> {
    let first = line.split('\n').next().unwrap_or_default();
    let columns = leading_columns(first);
    let content = first
        .trim_start_matches([' ', '\t'])
        .trim_end_matches([' ', '\t', '\r']);

    Indentation {
        depth: columns / 2,
        content,
    }
}

/// Columns covered by leading spaces and tabs, tabs expanded to two spaces.
pub fn leading_columns(line: &str) -> usize {
    line.bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .map(|b| if b == b'\t' { 2 } else { 1 })
        .sum()
}

/// Number of leading space/tab bytes.
pub fn leading_whitespace_len(line: &str) -> usize {
    line.bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count()
}

/// Removes at most `count` leading spaces or tabs from `line`.
pub fn strip_leading_whitespace(line: &str, count: usize) -> &str {
    let strip = leading_whitespace_len(line).min(count);
    &line[strip..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_indentation() {
        let parsed = parse_indentation("hello");
        assert_eq!(parsed.depth, 0);
        assert_eq!(parsed.content, "hello");
    }

    #[test]
    fn single_space_is_noise() {
        assert_eq!(parse_indentation(" hello").depth, 0);
        assert_eq!(parse_indentation("   hello").depth, 1);
    }

    #[test]
    fn tabs_count_as_two_spaces() {
        assert_eq!(parse_indentation("\thello").depth, 1);
        assert_eq!(parse_indentation("\t\t hello").depth, 2);
        assert_eq!(parse_indentation(" \thello").depth, 1);
    }

    #[test]
    fn only_first_line_is_considered() {
        let parsed = parse_indentation("  a  \n      b");
        assert_eq!(parsed.depth, 1);
        assert_eq!(parsed.content, "a");
    }

    #[test]
    fn empty_input() {
        let parsed = parse_indentation("");
        assert_eq!(parsed.depth, 0);
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn strip_never_eats_content() {
        assert_eq!(strip_leading_whitespace("    code", 2), "  code");
        assert_eq!(strip_leading_whitespace(" x", 4), "x");
        assert_eq!(strip_leading_whitespace("  ", 4), "");
    }
}
