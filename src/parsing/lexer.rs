//! Lexical primitives: recognizing markers at the start of lines, atomic
//! literals, and tracking which delimited constructs are still open at the
//! end of a line.

use crate::language::{scan_number, scan_quantity, Level, Numeric};
use crate::parsing::error::Construct;

/// How deeply delimited constructs (and expressions) may nest before the
/// input is rejected.
pub const MAXIMUM_DEPTH: usize = 64;

pub(crate) fn is_magic_line(content: &str) -> bool {
    let re = regex!(r"^%\s*technique\b");

    re.is_match(content)
}

pub(crate) fn is_license_line(content: &str) -> bool {
    content.starts_with('!')
}

pub(crate) fn is_template_line(content: &str) -> bool {
    content.starts_with('&')
}

pub(crate) fn is_header_line(content: &str) -> bool {
    is_magic_line(content) || is_license_line(content) || is_template_line(content)
}

/// Declarations are of the form
///
/// ```text
/// name : signature
/// ```
///
/// where the name is either `identifier` or `identifier(parameters)` and
/// the optional signature is `genus -> genus`. They must start at the left
/// margin. Something after the colon is only a signature if it has an
/// arrow; "warning: Hot water ahead." and "note: check twice" are prose. A
/// word-like name with a colon and an arrow is claimed even when the name
/// is malformed, so that it gets reported rather than read as prose.
pub(crate) fn is_declaration(content: &str) -> bool {
    let re = regex!(r"^[a-z][a-z0-9_]*\s*(?:\([^)]*\))?\s*:(.*)$");

    if let Some(cap) = re.captures(content) {
        let after = cap
            .get(1)
            .map(|one| one.as_str().trim())
            .unwrap_or("");

        if after.is_empty() || after.contains("->") {
            return true;
        }
    }

    // something word-like, then a colon, then an arrow: a declaration with a
    // bad name.
    let re = regex!(r"^[A-Za-z_][A-Za-z0-9_\-]*\s*(?:\([^)]*\))?\s*:.*->");

    re.is_match(content)
}

/// A recognized step marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Marker<'i> {
    pub level: Level,
    pub ordinal: &'i str,
    /// offset within the line of the step's content, after the marker and
    /// any whitespace following it.
    pub content: usize,
}

/// Recognize a step marker. The order of these tests matters: a single `i`,
/// `l`, `v`, or `x` followed by a period is a roman numeral, never a letter.
pub(crate) fn step_marker(content: &str) -> Option<Marker> {
    let numeric = regex!(r"^\s*([0-9]+)\.(?:\s+|$)");
    let lettered = regex!(r"^\s*([a-hj-km-uwyz])\.(?:\s+|$)");
    let roman = regex!(r"^\s*([ivxl]+)\.(?:\s+|$)");
    let parallel = regex!(r"^\s*(-)(?:\s+|$)");

    let candidates = [
        (Level::Numeric, numeric),
        (Level::Lettered, lettered),
        (Level::Roman, roman),
        (Level::Parallel, parallel),
    ];

    for (level, re) in candidates {
        if let Some(cap) = re.captures(content) {
            let ordinal = cap
                .get(1)?
                .as_str();
            let whole = cap.get(0)?;

            return Some(Marker {
                level,
                ordinal,
                content: whole.end(),
            });
        }
    }

    None
}

/// Recognize a section heading, an upper case roman numeral at the left
/// margin. Returns the numeral and the offset of the heading's title.
pub(crate) fn section_marker(content: &str) -> Option<(&str, usize)> {
    let re = regex!(r"^([IVXL]+)\.(?:[ \t]+|$)");

    let cap = re.captures(content)?;
    let numeral = cap
        .get(1)?
        .as_str();
    let whole = cap.get(0)?;

    Some((numeral, whole.end()))
}

pub(crate) fn is_title(content: &str) -> bool {
    content
        .trim_start()
        .starts_with('#')
}

pub(crate) fn is_attribute(content: &str) -> bool {
    content
        .trim_start()
        .starts_with('@')
}

pub(crate) fn is_response(content: &str) -> bool {
    content
        .trim_start()
        .starts_with('\'')
}

/// Width of the invocation target at the start of the input, `<name>` or
/// `<https://…>`, including the angle brackets.
pub(crate) fn scan_target(content: &str) -> Option<usize> {
    let re = regex!(r"^<(?:[a-z][a-z0-9_]*|https?://[^>\s]+)>");

    re.find(content)
        .map(|found| found.end())
}

/// Width of an identifier at the start of the input.
pub(crate) fn scan_identifier(content: &str) -> Option<usize> {
    let re = regex!(r"^[a-z][a-z0-9_]*");

    re.find(content)
        .map(|found| found.end())
}

pub(crate) fn is_keyword(content: &str, keyword: &str) -> bool {
    match content.strip_prefix(keyword) {
        Some(rest) => rest.starts_with([' ', '\t']),
        None => false,
    }
}

/// The pieces a numeric literal lexes into.
#[derive(Debug, PartialEq, Eq)]
pub enum Lexeme<'i> {
    Number(Numeric<'i>),
    Text(&'i str),
}

/// Characters that end a run of trailing text after a number.
fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ')' | ']' | '}' | '~' | '"')
}

/// Read a numeric literal from the start of the input. A number followed by
/// whitespace and a unit symbol is a quantity; without a valid unit the
/// match degrades to the bare number. Returns the numeric, the bytes it
/// occupied, and any text running on from the number up to the next
/// boundary, as in `2.5x`.
pub(crate) fn read_numeric(content: &str) -> Option<(Numeric, usize, &str)> {
    let (numeric, width) = match scan_quantity(content) {
        Some((quantity, width)) => (Numeric::Scientific(quantity), width),
        None => scan_number(content)?,
    };

    let rest = &content[width..];
    let trailing = match rest.find(is_boundary) {
        Some(i) => &rest[..i],
        None => rest,
    };

    Some((numeric, width, trailing))
}

/// The digits of a number at the start of the input, whether or not they
/// fit in a Numeric.
pub(crate) fn scan_digits(content: &str) -> Option<&str> {
    let re = regex!(r"^[-+]?[0-9]+(?:\.[0-9]+)?");

    re.find(content)
        .map(|found| found.as_str())
}

/// Lex a numeric token: a Number, followed by a Text lexeme if characters
/// ran on after it.
pub fn lex_numeric(content: &str) -> Vec<Lexeme> {
    let mut lexemes = vec![];

    match read_numeric(content) {
        Some((numeric, _, trailing)) => {
            lexemes.push(Lexeme::Number(numeric));
            if !trailing.is_empty() {
                lexemes.push(Lexeme::Text(trailing));
            }
        }
        None => {
            if !content.is_empty() {
                lexemes.push(Lexeme::Text(content));
            }
        }
    }

    lexemes
}

/// A delimited construct left open, and the offset of its opening delimiter
/// in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Open {
    pub construct: Construct,
    pub offset: usize,
}

fn closer(construct: Construct) -> char {
    match construct {
        Construct::Brace => '}',
        Construct::Parenthesis => ')',
        Construct::Bracket => ']',
        Construct::Quote => '"',
        Construct::Fence => '`',
    }
}

fn push(open: &mut Vec<Open>, construct: Construct, offset: usize) {
    // past the limit we stop tracking; the expression parser reports it.
    if open.len() < MAXIMUM_DEPTH {
        open.push(Open { construct, offset });
    }
}

/// Scan one line, updating the stack of constructs open at its end. What
/// opens a construct depends on what is already open: in prose only `{`
/// and `<target>(` do; in code all of braces, parenthesis, brackets,
/// quotes, and fences do; inside a string only `{` (interpolation); inside
/// a fence nothing but the closing fence matters. A closing delimiter that
/// doesn't match the innermost construct closes back to the nearest one it
/// does match, or is ignored; the expression parser reports the mismatch.
pub(crate) fn scan_delimiters(line: &str, offset: usize, open: &mut Vec<Open>) {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &line[i..];
        let c = bytes[i];

        match open
            .last()
            .map(|o| o.construct)
        {
            Some(Construct::Fence) => {
                if c == b'\\' && rest[1..].starts_with("```") {
                    i += 4;
                    continue;
                }
                if rest.starts_with("```") {
                    open.pop();
                    i += 3;
                    continue;
                }
            }
            Some(Construct::Quote) => match c {
                b'\\' => {
                    i += 1 + rest[1..]
                        .chars()
                        .next()
                        .map_or(0, char::len_utf8);
                    continue;
                }
                b'"' => {
                    open.pop();
                }
                b'{' => push(open, Construct::Brace, offset + i),
                _ => {}
            },
            Some(_) => {
                if rest.starts_with("```") {
                    push(open, Construct::Fence, offset + i);
                    i += 3;
                    continue;
                }
                match c {
                    b'"' => push(open, Construct::Quote, offset + i),
                    b'{' => push(open, Construct::Brace, offset + i),
                    b'(' => push(open, Construct::Parenthesis, offset + i),
                    b'[' => push(open, Construct::Bracket, offset + i),
                    b'}' | b')' | b']' => close(open, c as char),
                    _ => {}
                }
            }
            None => match c {
                b'{' => push(open, Construct::Brace, offset + i),
                b'<' => {
                    if let Some(width) = scan_target(rest) {
                        if rest[width..].starts_with('(') {
                            push(open, Construct::Parenthesis, offset + i + width);
                            i += width + 1;
                            continue;
                        }
                        i += width;
                        continue;
                    }
                }
                _ => {}
            },
        }

        i += rest
            .chars()
            .next()
            .map_or(1, char::len_utf8);
    }
}

fn close(open: &mut Vec<Open>, c: char) {
    let found = open
        .iter()
        .rposition(|o| closer(o.construct) == c);

    if let Some(i) = found {
        // don't unwind past an enclosing string or fence
        let crossing = open[i + 1..]
            .iter()
            .any(|o| matches!(o.construct, Construct::Quote | Construct::Fence));
        if !crossing {
            open.truncate(i);
        }
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::language::{Decimal, Quantity};

    #[test]
    fn header_lines() {
        assert!(is_magic_line("% technique v1"));
        assert!(is_magic_line("%technique v1"));
        assert!(!is_magic_line("%technical v1"));
        assert!(is_license_line("! MIT; (c) ACME"));
        assert!(is_template_line("& checklist"));
        assert!(!is_header_line("1. Step"));
    }

    #[test]
    fn declarations() {
        assert!(is_declaration("making_coffee :"));
        assert!(is_declaration("making_coffee : Beans -> Coffee"));
        assert!(is_declaration("make(e) : ()  -> Coffee"));
        assert!(is_declaration("Make_Coffee : A -> B"));
        assert!(is_declaration("make-coffee : A -> B"));

        assert!(!is_declaration("  make_coffee :"));
        assert!(!is_declaration("note: check twice"));
        assert!(!is_declaration("warning: Hot water ahead."));
        assert!(!is_declaration("make_coffee : Beans"));
        assert!(!is_declaration("Proceed with: the following"));
        assert!(!is_declaration("1. Do this: then that"));
    }

    #[test]
    fn step_markers() {
        let marker = step_marker("1. First").unwrap();
        assert_eq!(marker.level, Level::Numeric);
        assert_eq!(marker.ordinal, "1");
        assert_eq!(marker.content, 3);

        let marker = step_marker("    b. Second").unwrap();
        assert_eq!(marker.level, Level::Lettered);
        assert_eq!(marker.ordinal, "b");

        let marker = step_marker("    - Whatever").unwrap();
        assert_eq!(marker.level, Level::Parallel);
        assert_eq!(marker.ordinal, "-");

        let marker = step_marker("12.").unwrap();
        assert_eq!(marker.ordinal, "12");

        assert_eq!(step_marker("1.5 kg of flour"), None);
        assert_eq!(step_marker("e.g. this"), None);
        assert_eq!(step_marker("-5 degrees"), None);
        assert_eq!(step_marker("Hello"), None);
    }

    #[test]
    fn roman_before_lettered() {
        for letter in ["i", "l", "v", "x"] {
            let line = format!("  {}. something", letter);
            let marker = step_marker(&line).unwrap();
            assert_eq!(marker.level, Level::Roman);
        }

        assert_eq!(
            step_marker("  iv. something")
                .unwrap()
                .level,
            Level::Roman
        );
        assert_eq!(
            step_marker("  j. something")
                .unwrap()
                .level,
            Level::Lettered
        );
    }

    #[test]
    fn sections() {
        assert_eq!(section_marker("I. Preparation"), Some(("I", 3)));
        assert_eq!(section_marker("IV."), Some(("IV", 3)));
        assert_eq!(section_marker(" I. Preparation"), None);
        assert_eq!(section_marker("A. Preparation"), None);
    }

    #[test]
    fn targets() {
        assert_eq!(scan_target("<make_coffee>(x)"), Some(13));
        assert_eq!(scan_target("<https://example.com/proc>"), Some(26));
        assert_eq!(scan_target("<Make>"), None);
        assert_eq!(scan_target("< make>"), None);
    }

    #[test]
    fn keywords() {
        assert!(is_keyword("foreach x in xs", "foreach"));
        assert!(!is_keyword("foreachx in xs", "foreach"));
        assert!(!is_keyword("repeat", "repeat"));
    }

    #[test]
    fn numeric_lexemes() {
        assert_eq!(
            lex_numeric("2.5 ± 0.1 kg"),
            vec![Lexeme::Number(Numeric::Scientific(Quantity {
                mantissa: Decimal {
                    number: 25,
                    precision: 1
                },
                uncertainty: Some(Decimal {
                    number: 1,
                    precision: 1
                }),
                magnitude: None,
                symbol: "kg"
            }))]
        );

        assert_eq!(
            lex_numeric("2.5"),
            vec![Lexeme::Number(Numeric::Decimal(Decimal {
                number: 25,
                precision: 1
            }))]
        );

        assert_eq!(
            lex_numeric("2.5x"),
            vec![
                Lexeme::Number(Numeric::Decimal(Decimal {
                    number: 25,
                    precision: 1
                })),
                Lexeme::Text("x")
            ]
        );

        assert_eq!(
            lex_numeric("42"),
            vec![Lexeme::Number(Numeric::Integral(42))]
        );
    }

    fn constructs(open: &[Open]) -> Vec<Construct> {
        open.iter()
            .map(|o| o.construct)
            .collect()
    }

    #[test]
    fn delimiters_in_prose() {
        let mut open = vec![];
        scan_delimiters("Grind (coarsely) the beans", 0, &mut open);
        assert!(open.is_empty());

        scan_delimiters("Say \"hello\" {", 0, &mut open);
        assert_eq!(constructs(&open), vec![Construct::Brace]);
        assert_eq!(open[0].offset, 12);

        let mut open = vec![];
        scan_delimiters("Call <fetch>(a,", 100, &mut open);
        assert_eq!(constructs(&open), vec![Construct::Parenthesis]);
        assert_eq!(open[0].offset, 112);

        scan_delimiters("    b)", 0, &mut open);
        assert!(open.is_empty());
    }

    #[test]
    fn delimiters_in_code() {
        let mut open = vec![];
        scan_delimiters("{ exec(```bash", 0, &mut open);
        assert_eq!(
            constructs(&open),
            vec![
                Construct::Brace,
                Construct::Parenthesis,
                Construct::Fence
            ]
        );

        // nothing but the fence closes a fence
        scan_delimiters("echo \"} ) ]", 0, &mut open);
        assert_eq!(open.len(), 3);

        // and an escaped one doesn't count
        scan_delimiters("\\```", 0, &mut open);
        assert_eq!(open.len(), 3);

        scan_delimiters("```) }", 0, &mut open);
        assert!(open.is_empty());
    }

    #[test]
    fn delimiters_in_strings() {
        let mut open = vec![];
        scan_delimiters("{ \"a {b} \\\" c", 0, &mut open);
        assert_eq!(
            constructs(&open),
            vec![Construct::Brace, Construct::Quote]
        );

        scan_delimiters("d\" }", 0, &mut open);
        assert!(open.is_empty());
    }

    #[test]
    fn mismatched_closers_recover() {
        let mut open = vec![];
        scan_delimiters("{ f(x] }", 0, &mut open);
        assert!(open.is_empty());
    }
}
