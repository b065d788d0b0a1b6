//! Line classification. Each line is tested against an ordered list of
//! rules, first match wins:
//!
//! 1. header lines (`%`, `!`, `&`), only in the leading block;
//! 2. procedure declarations;
//! 3. step markers (numeric, lettered, roman, parallel), then sections;
//! 4. titles (`#`);
//! 5. attributes (`@`);
//! 6. responses (`'`);
//! 7. continuations, code blocks, and plain text;
//! 8. blank lines.
//!
//! A line beginning inside a construct left open by the line before it is
//! not classified at all; it is carried as part of that line.
//!
//! Classifying a line depends only on its text and the State carried out of
//! the line before, which is what makes incremental re-classification
//! possible.

use tracing::trace;

use crate::language::Level;
use crate::parsing::lexer::*;
use crate::parsing::nesting::Nesting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Magic,
    License,
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Blank,
    Header(Header),
    Declaration,
    /// a step, and how deeply it is nested (0 being top level)
    Step {
        level: Level,
        depth: usize,
    },
    Section,
    Title,
    Attribute,
    Response,
    CodeBlock,
    /// indented text directly following a step or another continuation
    Continuation,
    /// text; `follows` if it directly follows another text line
    Text {
        follows: bool,
    },
    Carried,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Previous {
    Start,
    Header,
    Blank,
    Declaration,
    Step,
    Continuation,
    Text,
    Other,
}

/// What is carried from one line to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    previous: Previous,
    nesting: Nesting,
    open: Vec<Open>,
}

impl Default for State {
    fn default() -> Self {
        State {
            previous: Previous::Start,
            nesting: Nesting::new(),
            open: vec![],
        }
    }
}

impl State {
    /// Constructs still open at the end of the line.
    pub fn open(&self) -> &[Open] {
        &self.open
    }

    /// The same state as it would be had the text before it grown or shrunk
    /// by `delta` bytes; only the recorded offsets of open constructs move.
    pub(crate) fn shifted(&self, delta: isize) -> State {
        let open = self
            .open
            .iter()
            .map(|o| Open {
                construct: o.construct,
                offset: o
                    .offset
                    .saturating_add_signed(delta),
            })
            .collect();

        State {
            previous: self.previous,
            nesting: self
                .nesting
                .clone(),
            open,
        }
    }
}

/// A classified line. `end` is the offset of the terminating newline (or
/// the end of input); `state` is what the line leaves for the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub start: usize,
    pub end: usize,
    pub class: Class,
    pub state: State,
}

impl Line {
    /// Where the following line starts.
    pub fn next(&self, source: &str) -> usize {
        if self.end < source.len() {
            self.end + 1
        } else {
            self.end
        }
    }
}

/// Classify one line given the state carried out of the line before it.
pub fn classify_line(line: &str, offset: usize, before: &State) -> (Class, State) {
    let mut state = before.clone();
    let line = line.trim_end_matches('\r');

    if !before
        .open
        .is_empty()
    {
        scan_delimiters(line, offset, &mut state.open);
        return (Class::Carried, state);
    }

    let indented = line.starts_with([' ', '\t']);

    let class = if line
        .trim()
        .is_empty()
    {
        Class::Blank
    } else if matches!(before.previous, Previous::Start | Previous::Header)
        && is_header_line(line)
    {
        if is_magic_line(line) {
            Class::Header(Header::Magic)
        } else if is_license_line(line) {
            Class::Header(Header::License)
        } else {
            Class::Header(Header::Template)
        }
    } else if !indented && is_declaration(line) {
        state
            .nesting
            .reset();
        Class::Declaration
    } else if let Some(marker) = step_marker(line) {
        let depth = state
            .nesting
            .enter(marker.level);
        Class::Step {
            level: marker.level,
            depth,
        }
    } else if section_marker(line).is_some() {
        state
            .nesting
            .reset();
        Class::Section
    } else if is_title(line) {
        Class::Title
    } else if is_attribute(line) {
        Class::Attribute
    } else if is_response(line) {
        Class::Response
    } else if indented && matches!(before.previous, Previous::Step | Previous::Continuation) {
        Class::Continuation
    } else if line
        .trim_start()
        .starts_with('{')
    {
        Class::CodeBlock
    } else {
        Class::Text {
            follows: before.previous == Previous::Text,
        }
    };

    state.previous = match class {
        Class::Blank => Previous::Blank,
        Class::Header(_) => Previous::Header,
        Class::Declaration => Previous::Declaration,
        Class::Step { .. } => Previous::Step,
        Class::Continuation => Previous::Continuation,
        Class::Text { .. } => Previous::Text,
        _ => Previous::Other,
    };

    if !matches!(class, Class::Blank | Class::Header(_)) {
        scan_delimiters(line, offset, &mut state.open);
    }

    (class, state)
}

/// The lines of a document, each with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub lines: Vec<Line>,
}

impl Classification {
    /// The state at the end of the document.
    pub fn state(&self) -> State {
        match self
            .lines
            .last()
        {
            Some(line) => line
                .state
                .clone(),
            None => State::default(),
        }
    }
}

/// Split text into lines, giving the start and end offsets of each. A
/// trailing newline does not begin another line.
pub(crate) fn line_ranges(content: &str, from: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut start = from;

    std::iter::from_fn(move || {
        if start >= content.len() {
            return None;
        }
        let end = match content[start..].find('\n') {
            Some(i) => start + i,
            None => content.len(),
        };
        let range = (start, end);
        start = end + 1;
        Some(range)
    })
}

pub fn classify(content: &str) -> Classification {
    let mut lines = vec![];
    let mut state = State::default();

    for (start, end) in line_ranges(content, 0) {
        let (class, after) = classify_line(&content[start..end], start, &state);
        trace!(start, ?class);

        lines.push(Line {
            start,
            end,
            class,
            state: after.clone(),
        });
        state = after;
    }

    Classification { lines }
}
