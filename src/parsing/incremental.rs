//! Re-classification after an edit. Lines before the edit keep their
//! classification; lines from the edit onward are classified afresh until a
//! line is reached that is past the edit and classifies exactly as it did
//! before, from exactly the same state. Everything after that point is
//! unchanged apart from its position.
//!
//! Only classification is incremental. A Document borrows from the text it
//! was parsed from, so nodes can't be carried over from the previous text
//! and assembly always runs over the whole of the new one.

use std::ops::Range;
use tracing::debug;

use crate::language::Document;
use crate::parsing::assembler::assemble;
use crate::parsing::classifier::{classify_line, line_ranges, Class, Classification, Line, State};
use crate::parsing::error::ParsingError;

/// A change to the source: the bytes `start..old_end` of the previous text
/// were replaced, and the replacement occupies `start..new_end` of the new
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl Edit {
    pub fn new(start: usize, old_end: usize, new_end: usize) -> Edit {
        Edit {
            start,
            old_end,
            new_end,
        }
    }

    /// How far text after the edit has moved.
    pub fn delta(&self) -> isize {
        self.new_end as isize - self.old_end as isize
    }
}

impl Classification {
    /// Classify `content`, the text after `edit` was applied to the text
    /// this Classification was made from. Returns the new Classification
    /// and the number of lines which had to be classified again.
    pub fn reclassify(&self, content: &str, edit: &Edit) -> (Classification, usize) {
        let delta = edit.delta();
        let old = &self.lines;

        // the line containing the start of the edit; a preceding line could
        // only be affected by an edit that removed its newline, which starts
        // on that line.
        let first = old
            .iter()
            .rposition(|line| line.start <= edit.start)
            .unwrap_or(0);

        let mut lines: Vec<Line> = old[..first].to_vec();
        let mut state = match lines.last() {
            Some(line) => line
                .state
                .clone(),
            None => State::default(),
        };

        let from = old
            .get(first)
            .map_or(0, |line| line.start);

        let mut reclassified = 0;
        let mut resume = None;

        for (start, end) in line_ranges(content, from) {
            let (class, after) = classify_line(&content[start..end], start, &state);
            reclassified += 1;

            if start >= edit.new_end {
                let was = start as isize - delta;
                if let Some(i) = old
                    .iter()
                    .position(|line| line.start as isize == was)
                {
                    let previous = &old[i];
                    if previous.start >= edit.old_end
                        && previous.class == class
                        && previous
                            .state
                            .shifted(delta)
                            == after
                    {
                        lines.push(Line {
                            start,
                            end,
                            class,
                            state: after,
                        });
                        resume = Some(i + 1);
                        break;
                    }
                }
            }

            lines.push(Line {
                start,
                end,
                class,
                state: after.clone(),
            });
            state = after;
        }

        if let Some(i) = resume {
            for line in &old[i..] {
                lines.push(Line {
                    start: line
                        .start
                        .saturating_add_signed(delta),
                    end: line
                        .end
                        .saturating_add_signed(delta),
                    class: line.class,
                    state: line
                        .state
                        .shifted(delta),
                });
            }
        }

        debug!(reclassified, total = lines.len(), "reclassified");

        (Classification { lines }, reclassified)
    }

    /// The range of lines making up the procedure which contains `line`:
    /// from its declaration up to the next declaration. Outside of any
    /// procedure that's the whole document.
    pub fn enclosing_procedure(&self, line: usize) -> Range<usize> {
        let lines = &self.lines;
        let line = line.min(
            lines
                .len()
                .saturating_sub(1),
        );

        let start = lines
            .get(..=line)
            .and_then(|before| {
                before
                    .iter()
                    .rposition(|l| l.class == Class::Declaration)
            });

        let start = match start {
            Some(start) => start,
            None => return 0..lines.len(),
        };

        let end = lines
            .iter()
            .enumerate()
            .skip(line + 1)
            .find(|(_, l)| l.class == Class::Declaration)
            .map_or(lines.len(), |(i, _)| i);

        start..end
    }

    /// Index of the line containing `offset`.
    pub fn line_at(&self, offset: usize) -> usize {
        self.lines
            .iter()
            .rposition(|line| line.start <= offset)
            .unwrap_or(0)
    }
}

/// The outcome of re-parsing after an edit.
#[derive(Debug)]
pub struct Reparse<'i> {
    pub classification: Classification,
    /// lines of the procedure(s) touched by the edit
    pub affected: Range<usize>,
    /// how many lines were classified again
    pub reclassified: usize,
    pub document: Result<Document<'i>, Vec<ParsingError<'i>>>,
}

/// Re-parse `content` following `edit`, reusing as much of the previous
/// classification as possible. The document is assembled afresh from all
/// of `content` and is identical to parsing it from scratch; `affected`
/// tells the caller which procedures' lines the edit could have changed.
pub fn reparse<'i>(content: &'i str, previous: &Classification, edit: &Edit) -> Reparse<'i> {
    let (classification, reclassified) = previous.reclassify(content, edit);

    let first = classification.line_at(edit.start);
    let last = classification.line_at(edit.new_end);

    let before = classification.enclosing_procedure(first);
    let after = classification.enclosing_procedure(last);
    let affected = before
        .start
        .min(after.start)
        ..before
            .end
            .max(after.end);

    debug!(?affected, "reparse");

    let document = assemble(content, &classification);

    Reparse {
        classification,
        affected,
        reclassified,
        document,
    }
}
