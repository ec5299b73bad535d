//! Reading a table from delimited text.
//!
//! The first non-blank line holds the headers, every following non-blank line
//! one body row. A header starting with `!` opts its column out of filtering.
//! Cells are taken verbatim, so markup separators like `<br>` survive and are
//! split later by the filters. Rows may be shorter than the header.
use itertools::Itertools;

use crate::config::DEFAULT_NO_FILTER_MARKER;
use crate::surface::HeaderCell;

use super::MemoryTable;

const NO_FILTER_PREFIX: char = '!';

/// Parses `text` into a [`MemoryTable`]. Text without any non-blank line
/// yields a table without a header section.
pub fn parse_delimited(text: &str, delimiter: char) -> MemoryTable {
    let mut lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return MemoryTable::without_header(vec![]);
    };

    let headers = header_line
        .split(delimiter)
        .map(|label| {
            let label = label.trim();
            match label.strip_prefix(NO_FILTER_PREFIX) {
                Some(label) => HeaderCell::new(label.trim()).with_class(DEFAULT_NO_FILTER_MARKER),
                None => HeaderCell::new(label),
            }
        })
        .collect_vec();

    lines.fold(MemoryTable::new(headers), |table, line| {
        table.with_row(line.split(delimiter))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::TableSource;

    #[test]
    fn first_line_is_the_header() {
        let table = parse_delimited("Name,Colour\nApple,Red\nPlum,Blue\n", ',');
        assert_eq!(table.header_labels(), vec!["Name", "Colour"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 1).map(|c| c.markup), Some("Blue".to_string()));
    }

    #[test]
    fn bang_prefix_marks_header_as_unfiltered() {
        let table = parse_delimited("!Id;Name\n1;a\n", ';');
        let headers = table.headers("thead th");
        assert_eq!(headers[0].label, "Id");
        assert!(headers[0].has_class(DEFAULT_NO_FILTER_MARKER));
        assert!(!headers[1].has_class(DEFAULT_NO_FILTER_MARKER));
    }

    #[test]
    fn blank_lines_and_carriage_returns_are_ignored() {
        let table = parse_delimited("A\tB\r\n\r\nx\ty<br>z\r\n\n", '\t');
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.cell(0, 1).map(|c| c.markup),
            Some("y<br>z".to_string())
        );
    }

    #[test]
    fn short_rows_lack_trailing_cells() {
        let table = parse_delimited("A,B,C\n1\n", ',');
        assert!(table.cell(0, 0).is_some());
        assert!(table.cell(0, 2).is_none());
    }

    #[test]
    fn empty_text_has_no_header() {
        let table = parse_delimited("  \n", ',');
        assert!(!table.has_header());
        assert!(table.has_body());
    }
}
