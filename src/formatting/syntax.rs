//! Tags for the fragments of formatted Technique, and the trait renderers
//! implement to style them.

/// Types of content that can be rendered with different styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Neutral, // default
    Indent,
    Newline,
    Header,
    Declaration,
    Description,
    Forma,
    StepItem,
    Variable,
    Section,
    String,
    Numeric,
    Response,
    Invocation,
    Title,
    Keyword,
    Function,
    Multiline,
    Label,
    Quote,
    Language,
    Attribute,
    Structure,
}

/// Trait for different rendering backends (the no-op no-markup one, and ANSI
/// escapes for terminal colouring)
pub trait Render {
    /// Apply styling to content with the specified syntax type
    fn style(&self, syntax: Syntax, content: &str) -> String;
}

/// Returns content unchanged, with no markup applied
pub struct Identity;

impl Render for Identity {
    fn style(&self, _syntax: Syntax, content: &str) -> String {
        content.to_string()
    }
}

/// Apply a renderer to a sequence of fragments, producing the final text.
pub fn render(renderer: &impl Render, fragments: &[(Syntax, String)]) -> String {
    let mut result = String::new();

    for (syntax, content) in fragments {
        result.push_str(&renderer.style(*syntax, content));
    }

    result
}
