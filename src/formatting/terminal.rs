//! ANSI colouring of formatted Technique for display in a terminal.

use owo_colors::OwoColorize;

use super::syntax::{Render, Syntax};

/// Embellish fragments with ANSI escapes to create syntax highlighting in
/// terminal output.
pub struct Terminal;

impl Render for Terminal {
    fn style(&self, syntax: Syntax, content: &str) -> String {
        match syntax {
            Syntax::Neutral | Syntax::Indent | Syntax::Description => content.to_string(),
            Syntax::Newline => "\n".to_string(),
            Syntax::Header => content
                .color(owo_colors::Rgb(0x75, 0x50, 0x7b))
                .to_string(),
            Syntax::Declaration | Syntax::Function => content // blue, bold
                .color(owo_colors::Rgb(0x34, 0x65, 0xa4))
                .bold()
                .to_string(),
            Syntax::Forma => content // brown
                .color(owo_colors::Rgb(0x8f, 0x59, 0x02))
                .bold()
                .to_string(),
            Syntax::StepItem | Syntax::Title | Syntax::Attribute => content
                .bright_white()
                .bold()
                .to_string(),
            Syntax::Variable => content // light blue
                .color(owo_colors::Rgb(0x72, 0x9f, 0xcf))
                .bold()
                .to_string(),
            Syntax::Section => content
                .bold()
                .to_string(),
            Syntax::String | Syntax::Multiline => content // green
                .color(owo_colors::Rgb(0x4e, 0x9a, 0x06))
                .bold()
                .to_string(),
            Syntax::Numeric => content // purple
                .color(owo_colors::Rgb(0xad, 0x7f, 0xa8))
                .bold()
                .to_string(),
            Syntax::Response => content // orange
                .color(owo_colors::Rgb(0xf5, 0x79, 0x00))
                .bold()
                .to_string(),
            Syntax::Invocation => content
                .color(owo_colors::Rgb(0x3b, 0x5d, 0x7d))
                .bold()
                .to_string(),
            Syntax::Keyword => content
                .color(owo_colors::Rgb(0x75, 0x50, 0x7b))
                .bold()
                .to_string(),
            Syntax::Label => content
                .color(owo_colors::Rgb(0x60, 0x98, 0x9a))
                .bold()
                .to_string(),
            Syntax::Language => content
                .color(owo_colors::Rgb(0xc4, 0xa0, 0x00))
                .bold()
                .to_string(),
            Syntax::Quote | Syntax::Structure => content // grey
                .color(owo_colors::Rgb(0x99, 0x99, 0x99))
                .bold()
                .to_string(),
        }
    }
}
