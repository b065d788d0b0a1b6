//! Errors encountered while parsing Technique source.

use std::fmt;

/// The broad category a ParsingError falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// no token matches at a position where one is required
    Lexical,
    /// a line matches no rule where it appears, or delimiters don't balance
    Structural,
    /// content that needs an enclosing step or mode it doesn't have
    Nesting,
    /// a construct still open at end of input
    Unterminated,
}

/// Something that has an opening delimiter and must be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Brace,
    Parenthesis,
    Bracket,
    Quote,
    Fence,
}

impl Construct {
    pub fn describe(&self) -> &'static str {
        match self {
            Construct::Brace => "code block",
            Construct::Parenthesis => "parameter list",
            Construct::Bracket => "tablet",
            Construct::Quote => "string",
            Construct::Fence => "multiline block",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError<'i> {
    InvalidHeader(usize),
    MisplacedHeader(usize),
    InvalidCharacter(usize, char),
    InvalidIdentifier(usize, &'i str),
    InvalidForma(usize),
    InvalidGenus(usize),
    InvalidSignature(usize),
    InvalidDeclaration(usize),
    InvalidParameters(usize),
    DuplicateProcedure(usize, &'i str),
    InvalidInvocation(usize),
    InvalidResponse(usize),
    InvalidAttribute(usize),
    TrailingText(usize, &'i str),
    NumberOutOfRange(usize, &'i str),
    Expected(usize, &'static str),
    UnexpectedText(usize),
    MisplacedTitle(usize),
    Unbalanced(usize, char),
    TooDeep(usize),
    ContinuationWithoutStep(usize),
    MixedModes(usize),
    Unterminated(usize, Construct),
}

impl<'i> ParsingError<'i> {
    pub fn offset(&self) -> usize {
        match self {
            ParsingError::InvalidHeader(offset) => *offset,
            ParsingError::MisplacedHeader(offset) => *offset,
            ParsingError::InvalidCharacter(offset, _) => *offset,
            ParsingError::InvalidIdentifier(offset, _) => *offset,
            ParsingError::InvalidForma(offset) => *offset,
            ParsingError::InvalidGenus(offset) => *offset,
            ParsingError::InvalidSignature(offset) => *offset,
            ParsingError::InvalidDeclaration(offset) => *offset,
            ParsingError::InvalidParameters(offset) => *offset,
            ParsingError::DuplicateProcedure(offset, _) => *offset,
            ParsingError::InvalidInvocation(offset) => *offset,
            ParsingError::InvalidResponse(offset) => *offset,
            ParsingError::InvalidAttribute(offset) => *offset,
            ParsingError::TrailingText(offset, _) => *offset,
            ParsingError::NumberOutOfRange(offset, _) => *offset,
            ParsingError::Expected(offset, _) => *offset,
            ParsingError::UnexpectedText(offset) => *offset,
            ParsingError::MisplacedTitle(offset) => *offset,
            ParsingError::Unbalanced(offset, _) => *offset,
            ParsingError::TooDeep(offset) => *offset,
            ParsingError::ContinuationWithoutStep(offset) => *offset,
            ParsingError::MixedModes(offset) => *offset,
            ParsingError::Unterminated(offset, _) => *offset,
        }
    }

    /// How many bytes of source the error covers, where that is known.
    pub fn width(&self) -> Option<usize> {
        match self {
            ParsingError::InvalidIdentifier(_, text) => Some(text.len()),
            ParsingError::DuplicateProcedure(_, name) => Some(name.len()),
            ParsingError::TrailingText(_, text) => Some(text.len()),
            ParsingError::NumberOutOfRange(_, text) => Some(text.len()),
            ParsingError::InvalidCharacter(_, c) => Some(c.len_utf8()),
            ParsingError::Unbalanced(_, c) => Some(c.len_utf8()),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParsingError::InvalidHeader(_)
            | ParsingError::InvalidCharacter(_, _)
            | ParsingError::InvalidIdentifier(_, _)
            | ParsingError::InvalidForma(_)
            | ParsingError::InvalidGenus(_)
            | ParsingError::InvalidResponse(_)
            | ParsingError::InvalidAttribute(_)
            | ParsingError::TrailingText(_, _)
            | ParsingError::NumberOutOfRange(_, _)
            | ParsingError::Expected(_, _) => ErrorKind::Lexical,

            ParsingError::MisplacedHeader(_)
            | ParsingError::InvalidSignature(_)
            | ParsingError::InvalidDeclaration(_)
            | ParsingError::InvalidParameters(_)
            | ParsingError::DuplicateProcedure(_, _)
            | ParsingError::InvalidInvocation(_)
            | ParsingError::UnexpectedText(_)
            | ParsingError::MisplacedTitle(_)
            | ParsingError::Unbalanced(_, _)
            | ParsingError::TooDeep(_) => ErrorKind::Structural,

            ParsingError::ContinuationWithoutStep(_) | ParsingError::MixedModes(_) => {
                ErrorKind::Nesting
            }

            ParsingError::Unterminated(_, _) => ErrorKind::Unterminated,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::InvalidHeader(_) => "invalid header".to_string(),
            ParsingError::MisplacedHeader(_) => {
                "header line outside the header block".to_string()
            }
            ParsingError::InvalidCharacter(_, c) => format!("invalid character '{}'", c),
            ParsingError::InvalidIdentifier(_, text) => {
                format!("invalid identifier \"{}\"", text)
            }
            ParsingError::InvalidForma(_) => "invalid forma".to_string(),
            ParsingError::InvalidGenus(_) => "invalid genus".to_string(),
            ParsingError::InvalidSignature(_) => "invalid signature".to_string(),
            ParsingError::InvalidDeclaration(_) => "invalid procedure declaration".to_string(),
            ParsingError::InvalidParameters(_) => "invalid parameter list".to_string(),
            ParsingError::DuplicateProcedure(_, name) => {
                format!("procedure \"{}\" declared more than once", name)
            }
            ParsingError::InvalidInvocation(_) => "invalid procedure invocation".to_string(),
            ParsingError::InvalidResponse(_) => "invalid response literal".to_string(),
            ParsingError::InvalidAttribute(_) => "invalid attribute".to_string(),
            ParsingError::TrailingText(_, text) => {
                format!("unexpected \"{}\" following number", text)
            }
            ParsingError::NumberOutOfRange(_, text) => {
                format!("number {} is out of range", text)
            }
            ParsingError::Expected(_, value) => format!("expected {}", value),
            ParsingError::UnexpectedText(_) => "text not allowed here".to_string(),
            ParsingError::MisplacedTitle(_) => {
                "title must directly follow a procedure declaration".to_string()
            }
            ParsingError::Unbalanced(_, c) => format!("unmatched '{}'", c),
            ParsingError::TooDeep(_) => "expressions nested too deeply".to_string(),
            ParsingError::ContinuationWithoutStep(_) => {
                "indented text with no step to belong to".to_string()
            }
            ParsingError::MixedModes(_) => {
                "bare steps and procedure declarations cannot be mixed".to_string()
            }
            ParsingError::Unterminated(_, construct) => {
                format!("unterminated {}", construct.describe())
            }
        }
    }
}

impl fmt::Display for ParsingError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message(), self.offset())
    }
}

impl std::error::Error for ParsingError<'_> {}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            ParsingError::InvalidIdentifier(0, "Foo").kind(),
            ErrorKind::Lexical
        );
        assert_eq!(
            ParsingError::DuplicateProcedure(0, "foo").kind(),
            ErrorKind::Structural
        );
        assert_eq!(ParsingError::MixedModes(0).kind(), ErrorKind::Nesting);
        assert_eq!(
            ParsingError::Unterminated(0, Construct::Fence).kind(),
            ErrorKind::Unterminated
        );
    }

    #[test]
    fn widths() {
        assert_eq!(
            ParsingError::InvalidIdentifier(0, "Foo").width(),
            Some(3)
        );
        assert_eq!(ParsingError::InvalidGenus(0).width(), None);
    }
}
