use super::*;

pub(super) const NAME: usize = 0;
pub(super) const COLOUR: FilterId = FilterId(1);
pub(super) const NOTES: FilterId = FilterId(2);

/// Name is opted out, Colour gets a selection control, Notes a free-text one.
pub(super) fn fruit_table() -> MemoryTable {
    MemoryTable::new([
        HeaderCell::new("Name").with_class("noFilter"),
        HeaderCell::new("Colour"),
        HeaderCell::new("Notes"),
    ])
    .with_row(["Apple", "Red", "Crisp and sweet, a classic for every lunchbox"])
    .with_row(["Banana", "Yellow", "Soft"])
    .with_row(["Cherry", "Red", "Small<br>Dark"])
    .with_row(["Plum", "Blue", "juicy"])
    .with_row(["Lime", "Green", "SOUR and sharp"])
    .with_row(["Coal", "Black", ""])
}

pub(super) fn attached_fruit_table() -> TableFilter<MemoryTable> {
    TableFilter::attach(fruit_table(), FilterConfig::default())
}

pub(super) fn extracted(values: &[&str]) -> ExtractedCell {
    ExtractedCell::from_values(values.iter().copied())
}

pub(super) fn raw(text: &str) -> ExtractedCell {
    ExtractedCell::from_content(&CellContent::new(text), &SeparatorPattern::default())
}

pub(super) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[test]
fn fruit_table_has_expected_shape() {
    let table = fruit_table();
    assert_eq!(table.row_count(), 6);
    assert_eq!(
        table.cell(0, NAME).map(|cell| cell.markup),
        Some("Apple".to_string())
    );
}
