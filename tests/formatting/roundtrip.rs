use serde_json::Value;
use technique::formatting::format;
use technique::parsing;

use super::{files_in, show_diff};

fn is_span(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.len() == 2 && map.contains_key("start") && map.contains_key("end")
        }
        _ => false,
    }
}

/// Null out every source span in a serialized tree, so that trees parsed
/// from differently laid out text can be compared.
fn erase_spans(value: &mut Value) {
    if is_span(value) {
        *value = Value::Null;
        return;
    }

    match value {
        Value::Object(map) => {
            for (_, field) in map.iter_mut() {
                erase_spans(field);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                erase_spans(item);
            }
        }
        _ => {}
    }
}

fn shape<T: serde::Serialize>(tree: &T) -> Value {
    let mut value = serde_json::to_value(tree).expect("Failed to serialize document");
    erase_spans(&mut value);
    value
}

/// Formatting is idempotent, and the formatted text parses to the same
/// document as it was formatted from, spans aside.
#[test]
fn format_parse_format() {
    for file in files_in("tests/samples/") {
        let original = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let document = parsing::parse(&file, &original)
            .unwrap_or_else(|e| panic!("Failed to parse file {:?}: {:?}", file, e));
        let first = format(&document);

        let reparsed = parsing::parse_with_recovery(&first)
            .unwrap_or_else(|e| panic!("Formatted {:?} failed to parse: {:?}", file, e));

        assert_eq!(
            shape(&reparsed),
            shape(&document),
            "{:?}: formatted text parses to a different tree",
            file
        );

        let second = format(&reparsed);
        if first != second {
            show_diff(&first, &second, &file);
            panic!("Formatting {:?} is not stable", file);
        }
    }
}

#[test]
fn spans_are_what_differ() {
    let original = "make :\n1. Check { x }\n   and { y }\n";
    let document = parsing::parse_with_recovery(original).unwrap();

    let first = format(&document);
    let reparsed = parsing::parse_with_recovery(&first).unwrap();

    // the continuation was joined onto one line, so positions moved
    assert_ne!(
        serde_json::to_value(&reparsed).unwrap(),
        serde_json::to_value(&document).unwrap()
    );
    assert_eq!(shape(&reparsed), shape(&document));
}
