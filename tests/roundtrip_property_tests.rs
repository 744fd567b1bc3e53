use std::collections::HashSet;
use std::path::Path;

use lockit::traits::FormatHandler;
use lockit::types::{LocalizationEntry, LocalizationFile};
use lockit::{extract_placeholders, formats, get_regex};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    // Printable text without trailing whitespace so writers that trim do not
    // break equality.
    "[ -~]{0,40}".prop_map(|s| s.trim().to_string())
}

fn entries_strategy() -> impl Strategy<Value = Vec<LocalizationEntry>> {
    proptest::collection::vec((key_strategy(), value_strategy()), 1..12).prop_map(|pairs| {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|(key, _)| seen.insert(key.clone()))
            .map(|(key, value)| LocalizationEntry::new(key, value))
            .collect()
    })
}

fn assert_round_trips(handler: &dyn FormatHandler, entries: Vec<LocalizationEntry>) {
    let file_name = format!("prop{}", handler.extensions()[0]);
    let file = LocalizationFile::new(&file_name, None, handler.format_id(), entries);

    let mut buffer = Vec::new();
    handler.write(&file, &mut buffer).expect("write");
    let text = String::from_utf8(buffer).expect("utf8 output");
    let reparsed = handler.parse(&text, Path::new(&file_name)).expect("reparse");

    assert_eq!(file.entries, reparsed.entries, "via {}", handler.format_id());
}

proptest! {
    #[test]
    fn prop_csv_round_trips(entries in entries_strategy()) {
        assert_round_trips(&formats::CsvHandler, entries);
    }

    #[test]
    fn prop_json_round_trips(entries in entries_strategy()) {
        assert_round_trips(&formats::JsonHandler, entries);
    }

    #[test]
    fn prop_po_round_trips(entries in entries_strategy()) {
        assert_round_trips(&formats::PoHandler, entries);
    }

    #[test]
    fn prop_resx_round_trips(entries in entries_strategy()) {
        assert_round_trips(&formats::ResxHandler, entries);
    }

    #[test]
    fn prop_extracted_placeholders_are_sorted_and_stable(value in "[ -~{}]{0,60}") {
        let regex = get_regex(None).unwrap();
        let first = extract_placeholders(Some(&value), &regex);
        let second = extract_placeholders(Some(&value), &regex);
        prop_assert_eq!(&first, &second);

        let mut sorted = first.clone();
        sorted.sort();
        prop_assert_eq!(first, sorted);
    }
}
