use std::{fmt, path::Path};

/// Failure to get the source text of a document off disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> LoadingError<'i> {
    pub fn from_io(filename: &'i Path, error: &std::io::Error) -> LoadingError<'i> {
        let problem = match error.kind() {
            std::io::ErrorKind::NotFound => "File not found",
            std::io::ErrorKind::PermissionDenied => "Permission denied",
            std::io::ErrorKind::InvalidData => "File is not valid UTF-8",
            _ => "Unable to read file",
        };

        LoadingError {
            problem: problem.to_string(),
            details: error.to_string(),
            filename,
        }
    }
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.filename
                .display(),
            self.problem,
            self.details
        )
    }
}

impl std::error::Error for LoadingError<'_> {}
