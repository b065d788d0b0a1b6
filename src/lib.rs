//! The Technique procedures language: document model, parser, and canonical
//! formatter.

#[macro_use]
mod regex;

pub mod formatting;
pub mod language;
pub mod parsing;
