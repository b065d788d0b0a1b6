use std::fs;
use std::path::{Path, PathBuf};

mod golden;
mod roundtrip;

fn files_in(dir: &str) -> Vec<PathBuf> {
    let dir = Path::new(dir);

    assert!(dir.exists(), "{:?} directory missing", dir);

    let entries = fs::read_dir(dir).expect("Failed to read directory");

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("tq")
        {
            files.push(path);
        }
    }

    assert!(!files.is_empty(), "No .tq files found in {:?}", dir);

    files.sort();
    files
}

/// Simple diff function to show line-by-line differences
fn show_diff(original: &str, formatted: &str, file_path: &Path) {
    let original_lines: Vec<&str> = original
        .lines()
        .collect();
    let formatted_lines: Vec<&str> = formatted
        .lines()
        .collect();

    let max_lines = original_lines
        .len()
        .max(formatted_lines.len());

    println!("\nDifferences found in file: {:?}", file_path);
    println!("--- Original");
    println!("+++ Formatted");

    for i in 0..max_lines {
        let orig_line = original_lines
            .get(i)
            .unwrap_or(&"");
        let fmt_line = formatted_lines
            .get(i)
            .unwrap_or(&"");

        if orig_line != fmt_line {
            println!("@@ Line {} @@", i + 1);
            println!("- {}", orig_line);
            println!("+ {}", fmt_line);
        }
    }
}
