use std::fs;
use std::path::{Path, PathBuf};

mod coverage;
mod errors;
mod incremental;
mod numbers;
mod samples;
mod threads;

/// The Technique files in the given directory, in a stable order.
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
