use super::support::*;
use super::*;

fn selection_filter(selection: Selection) -> FilterState {
    let mut filter = FilterState::enumerable(0, ["Red", "Blue", "Green", "Yellow", "Black"]);
    filter.select(selection).expect("selection filter");
    filter
}

fn text_filter(pattern: &str) -> FilterState {
    let mut filter = FilterState::free_text(0);
    filter.set_pattern(pattern).expect("free-text filter");
    filter
}

#[test]
fn all_matches_everything() {
    let filter = selection_filter(Selection::All);
    assert!(filter.matches(&extracted(&[])));
    assert!(filter.matches(&extracted(&[""])));
    assert!(filter.matches(&extracted(&["anything"])));
    assert!(!filter.is_active());
}

#[test]
fn empty_only_is_or_within_a_cell() {
    let filter = selection_filter(Selection::EmptyOnly);
    assert!(filter.matches(&extracted(&[""])));
    assert!(filter.matches(&extracted(&["", "", ""])));
    assert!(!filter.matches(&extracted(&["x"])));
    assert!(filter.matches(&extracted(&["", "x"])));
    assert!(filter.is_active());
}

#[test]
fn not_empty_needs_one_non_empty_value() {
    let filter = selection_filter(Selection::NotEmpty);
    assert!(!filter.matches(&extracted(&[""])));
    assert!(filter.matches(&extracted(&["", "x"])));
}

#[test]
fn value_selection_is_exact_and_case_sensitive() {
    let filter = selection_filter(Selection::Value("Red".to_string()));
    assert!(filter.matches(&extracted(&["Red"])));
    assert!(filter.matches(&extracted(&["Blue", "Red"])));
    assert!(!filter.matches(&extracted(&["red"])));
    assert!(!filter.matches(&extracted(&["Redder"])));
}

#[test]
fn free_text_is_case_insensitive() {
    let filter = text_filter("abc");
    assert!(filter.matches(&raw("XYZ ABC")));
    assert!(!filter.matches(&raw("XYZ AB C")));

    let upper = text_filter("ABC");
    assert!(upper.matches(&raw("xyz abc")));
}

#[test]
fn free_text_searches_raw_cell_text() {
    let filter = text_filter("small<br>d");
    assert!(filter.matches(&raw("Small<br>Dark")));
}

#[test]
fn free_text_pattern_is_not_a_regex() {
    let filter = text_filter("a.c");
    assert!(!filter.matches(&raw("abc")));
    assert!(filter.matches(&raw("xa.cx")));
}

#[test]
fn empty_pattern_matches_everything() {
    let filter = text_filter("");
    assert!(filter.matches(&raw("")));
    assert!(filter.matches(&raw("text")));
    assert!(!filter.is_active());
}

#[test]
fn options_start_with_fixed_entries() {
    let filter = FilterState::enumerable(3, ["Red", "Blue", "Green", "Yellow", "Black"]);
    assert_eq!(
        filter.options(),
        strings(&[
            "All",
            "Not Empty",
            "Empty Only",
            "Red",
            "Blue",
            "Green",
            "Yellow",
            "Black"
        ])
    );
    assert_eq!(filter.id(), FilterId(3));
    assert!(FilterState::free_text(1).options().is_empty());
}

#[test]
fn control_kind_follows_strategy() {
    let select = FilterState::enumerable(0, ["a"]).control();
    assert!(matches!(select.kind, ControlKind::Select { ref options } if options.len() == 4));
    assert_eq!(FilterState::free_text(2).control().kind, ControlKind::Text);
}

#[test]
fn changes_of_the_wrong_kind_are_rejected() {
    let mut selection = FilterState::enumerable(1, ["a"]);
    assert!(matches!(
        selection.set_pattern("x"),
        Err(TableFilterError::StrategyMismatch {
            id: FilterId(1),
            actual: FilterStrategy::Enumerable
        })
    ));

    let mut text = FilterState::free_text(2);
    assert!(matches!(
        text.select(Selection::All),
        Err(TableFilterError::StrategyMismatch {
            id: FilterId(2),
            actual: FilterStrategy::FreeText
        })
    ));
}

#[test]
fn every_pattern_change_gets_a_new_revision() {
    let mut filter = FilterState::free_text(0);
    let first = filter.set_pattern("a").expect("revision");
    let second = filter.set_pattern("ab").expect("revision");
    assert!(second > first);
    assert_eq!(filter.pattern(), Some("ab"));
}

#[test]
fn reset_restores_neutral_state() {
    let mut selection = selection_filter(Selection::Value("Red".to_string()));
    selection.reset();
    assert_eq!(selection.selection(), Some(&Selection::All));

    let mut text = text_filter("abc");
    text.reset();
    assert_eq!(text.pattern(), Some(""));
    assert!(!text.is_active());
}

#[test]
fn non_filterable_profile_creates_no_filter() {
    let profile = ColumnProfile::build(
        0,
        ["a", "b", "a"].map(CellContent::new),
        &FilterConfig::default(),
    );
    assert!(FilterState::from_profile(&profile).is_none());
}
