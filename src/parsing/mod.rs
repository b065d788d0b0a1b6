//! parser for the Technique language

use std::path::Path;
use tracing::debug;

use crate::language::{Document, LoadingError, Technique};

pub mod assembler;
pub mod classifier;
mod error;
mod expression;
pub mod incremental;
pub mod lexer;
mod nesting;
pub(crate) mod parser;

pub use assembler::parse_with_recovery;
pub use classifier::{classify, Classification};
pub use error::{Construct, ErrorKind, ParsingError};
pub use incremental::{reparse, Edit, Reparse};

/// Read a file and return an owned String. We pass that ownership back to the
/// main function so that the Document object created by parse() below can
/// have the same lifetime.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            Err(LoadingError::from_io(filename, &error))
        }
    }
}

/// Parse text into a Document object, or return the list of errors
/// encountered.
pub fn parse<'i>(
    filename: &Path,
    content: &'i str,
) -> Result<Document<'i>, Vec<ParsingError<'i>>> {
    debug!(filename = %filename.display(), bytes = content.len());

    let result = parse_with_recovery(content);

    match result {
        Ok(document) => {
            match &document.body {
                Technique::Procedures(procedures) => {
                    debug!(
                        "Found {} procedure{}",
                        procedures.len(),
                        if procedures.len() == 1 { "" } else { "s" }
                    );
                }
                Technique::Steps(steps) => {
                    debug!(
                        "Found {} step{}",
                        steps.len(),
                        if steps.len() == 1 { "" } else { "s" }
                    );
                }
                Technique::Empty => {
                    debug!("Empty");
                }
            }
            Ok(document)
        }
        Err(errors) => {
            debug!("errors: {}", errors.len());
            Err(errors)
        }
    }
}
