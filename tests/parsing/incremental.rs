use technique::parsing::{self, classify, reparse, Edit};

use super::files_in;

/// Replace `start..end` of `before` with `insert`, returning the new text
/// and the Edit describing the change.
fn apply(before: &str, start: usize, end: usize, insert: &str) -> (String, Edit) {
    let mut after = String::with_capacity(before.len() + insert.len());
    after.push_str(&before[..start]);
    after.push_str(insert);
    after.push_str(&before[end..]);
    (after, Edit::new(start, end, start + insert.len()))
}

/// Byte offsets at which edits are tried: the start of every line, plus a
/// few positions within lines, all on character boundaries.
fn positions(content: &str) -> Vec<usize> {
    let mut positions = vec![0];

    for (i, c) in content.char_indices() {
        if c == '\n' {
            positions.push(i + 1);
        } else if c == '{' || c == '(' {
            positions.push(i);
        }
    }
    positions.push(content.len());

    positions.dedup();
    positions
}

#[test]
fn insertions_match_full_parse() {
    let fragments = ["x", "{ ", "\"", "\n", "1. New step\n", "```", "    "];

    for file in files_in("tests/samples/") {
        let before = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));
        let previous = classify(&before);

        for at in positions(&before) {
            for fragment in fragments {
                let (after, edit) = apply(&before, at, at, fragment);

                let incremental = reparse(&after, &previous, &edit);

                assert_eq!(
                    incremental.classification,
                    classify(&after),
                    "{:?}: inserting {:?} at {}",
                    file,
                    fragment,
                    at
                );
                assert_eq!(
                    incremental.document,
                    parsing::parse_with_recovery(&after),
                    "{:?}: inserting {:?} at {}",
                    file,
                    fragment,
                    at
                );
            }
        }
    }
}

#[test]
fn deletions_match_full_parse() {
    for file in files_in("tests/samples/") {
        let before = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));
        let previous = classify(&before);

        let positions = positions(&before);
        for pair in positions.windows(2) {
            let (after, edit) = apply(&before, pair[0], pair[1], "");

            let (classification, _) = previous.reclassify(&after, &edit);
            assert_eq!(
                classification,
                classify(&after),
                "{:?}: deleting {}..{}",
                file,
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn edits_stay_local() {
    let before = parsing::load(std::path::Path::new("tests/samples/coffee.tq")).unwrap();
    let previous = classify(&before);

    let at = before
        .find("Grind finely")
        .unwrap();
    let (after, edit) = apply(&before, at, at + 5, "Mill");

    let incremental = reparse(&after, &previous, &edit);

    assert!(incremental.reclassified <= 2);
    assert!(incremental
        .document
        .is_ok());

    // only the second procedure was touched
    let line = incremental
        .classification
        .line_at(at);
    assert!(incremental
        .affected
        .contains(&line));
    assert!(incremental
        .affected
        .start
        > 5);
}
