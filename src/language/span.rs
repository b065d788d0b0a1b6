//! Source positions attached to nodes of the document tree.

use serde::Serialize;

/// A point in the source text. The offset is in bytes from the start of the
/// input; line and column are 1-origin, the column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Compute the line and column of a byte offset within the source.
    pub fn of(source: &str, offset: usize) -> Location {
        let offset = offset.min(source.len());
        let before = &source[..offset];

        let line = before
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1;

        let column = match before.rfind('\n') {
            Some(i) => before[i + 1..]
                .chars()
                .count(),
            None => before
                .chars()
                .count(),
        } + 1;

        Location {
            offset,
            line,
            column,
        }
    }
}

/// The half-open range of source text a node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(source: &str, start: usize, end: usize) -> Span {
        Span {
            start: Location::of(source, start),
            end: Location::of(source, end),
        }
    }

    /// Recover the span of a slice that was borrowed from `source`. Leaf
    /// nodes in the tree (identifiers, ordinals, labels) are such slices,
    /// which is why they don't carry a Span of their own. Returns None if
    /// the slice does not point into `source`.
    pub fn locate(source: &str, slice: &str) -> Option<Span> {
        let base = source.as_ptr() as usize;
        let here = slice.as_ptr() as usize;

        if here < base || here + slice.len() > base + source.len() {
            return None;
        }

        let start = here - base;
        Some(Span::new(source, start, start + slice.len()))
    }

    /// Widen this span so that it ends where `other` ends.
    pub fn extend(&mut self, other: &Span) {
        if other.end.offset > self.end.offset {
            self.end = other.end;
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }

    /// The text this span covers.
    pub fn text<'i>(&self, source: &'i str) -> &'i str {
        &source[self.range()]
    }
}

/// Converts offsets to Locations without rescanning the source each time.
#[derive(Debug, Clone)]
pub struct Locator<'i> {
    source: &'i str,
    starts: Vec<usize>,
}

impl<'i> Locator<'i> {
    pub fn new(source: &'i str) -> Locator<'i> {
        let mut starts = vec![0];
        starts.extend(
            source
                .match_indices('\n')
                .map(|(i, _)| i + 1),
        );

        Locator { source, starts }
    }

    pub fn locate(&self, offset: usize) -> Location {
        let offset = offset.min(
            self.source
                .len(),
        );

        let i = match self
            .starts
            .binary_search(&offset)
        {
            Ok(i) => i,
            Err(i) => i - 1,
        };

        let column = self.source[self.starts[i]..offset]
            .chars()
            .count()
            + 1;

        Location {
            offset,
            line: i + 1,
            column,
        }
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start: self.locate(start),
            end: self.locate(end),
        }
    }
}
