//! Canonical reprinting of Technique documents, as a sequence of syntax
//! tagged fragments which a renderer then styles.

mod formatter;
mod syntax;
mod terminal;

pub use formatter::{format, format_with_renderer};
pub use syntax::{render, Identity, Render, Syntax};
pub use terminal::Terminal;
