use technique::formatting::*;
use technique::parsing;

use super::{files_in, show_diff};

/// Golden test for the format command. The files in tests/golden/ are in
/// their canonical form; if one of them fails this test either the parser
/// and formatter are wrong, or the file needs reformatting after a
/// deliberate change of style.
#[test]
fn ensure_identical_output() {
    let files = files_in("tests/golden/");

    let mut failures = Vec::new();

    for file in &files {
        let original = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let document = parsing::parse(&file, &original)
            .unwrap_or_else(|e| panic!("Failed to parse file {:?}: {:?}", file, e));

        let result = format_with_renderer(&document, &Identity);

        if result != original {
            show_diff(&original, &result, &file);
            failures.push(file.clone());
        }
    }

    if !failures.is_empty() {
        panic!(
            "All golden files must format unchanged, but {} differed",
            failures.len()
        );
    }
}

#[test]
fn terminal_output_only_adds_escapes() {
    for file in files_in("tests/golden/") {
        let original = parsing::load(&file).unwrap();
        let document = parsing::parse(&file, &original).unwrap();

        let styled = format_with_renderer(&document, &Terminal);
        assert_ne!(styled, original);
        assert_eq!(strip_escapes(&styled), original);
    }
}

/// Remove ANSI SGR sequences, ESC '[' ... 'm'.
fn strip_escapes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
