//! A cursor over a fragment of the input, and the readers for the
//! single-line constructs: header lines, procedure declarations, titles,
//! attributes, and responses. The expression readers build on this in
//! expression.rs.

use crate::language::*;
use crate::parsing::error::ParsingError;
use crate::parsing::lexer::MAXIMUM_DEPTH;

#[derive(Debug, Clone)]
pub(crate) struct Parser<'i> {
    pub(crate) source: &'i str,
    pub(crate) offset: usize,
    pub(crate) depth: usize,
    base: &'i str,
    origin: Location,
}

impl<'i> Parser<'i> {
    /// A parser over `content`, which begins at `offset` in the document.
    /// Line numbers are counted from the start of `content`.
    pub(crate) fn new(content: &'i str, offset: usize) -> Parser<'i> {
        Parser::at(
            content,
            Location {
                offset,
                line: 1,
                column: 1,
            },
        )
    }

    /// A parser over `content`, which begins at `origin` in the document.
    pub(crate) fn at(content: &'i str, origin: Location) -> Parser<'i> {
        Parser {
            source: content,
            offset: origin.offset,
            depth: 0,
            base: content,
            origin,
        }
    }

    /// The Location of a document offset within this parser's content.
    pub(crate) fn location(&self, offset: usize) -> Location {
        let i = offset
            .saturating_sub(
                self.origin
                    .offset,
            )
            .min(
                self.base
                    .len(),
            );
        let before = &self.base[..i];

        match before.rfind('\n') {
            Some(newline) => Location {
                offset,
                line: self
                    .origin
                    .line
                    + before
                        .bytes()
                        .filter(|&b| b == b'\n')
                        .count(),
                column: before[newline + 1..]
                    .chars()
                    .count()
                    + 1,
            },
            None => Location {
                offset,
                line: self
                    .origin
                    .line,
                column: self
                    .origin
                    .column
                    + before
                        .chars()
                        .count(),
            },
        }
    }

    /// The span from `start` up to where the parser is now.
    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span {
            start: self.location(start),
            end: self.location(self.offset),
        }
    }

    pub(crate) fn advance(&mut self, width: usize) {
        // advance the parser position
        self.source = &self.source[width..];
        self.offset += width;
    }

    pub(crate) fn entire(&self) -> &'i str {
        self.source
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    pub(crate) fn peek_next_char(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    /// Document offset of a slice borrowed from this parser's source.
    pub(crate) fn offset_of(&self, slice: &str) -> usize {
        let base = self
            .source
            .as_ptr() as usize;
        let here = slice.as_ptr() as usize;

        self.offset + here.saturating_sub(base)
    }

    /// Trim spaces and tabs; newlines are significant and are left alone.
    pub(crate) fn trim_whitespace(&mut self) {
        let l = self.source.len()
            - self
                .source
                .trim_start_matches([' ', '\t'])
                .len();
        self.advance(l);
    }

    /// Trim any leading whitespace (space, tab, newline) from the front of
    /// the current parser text.
    pub(crate) fn trim_newlines(&mut self) {
        let l = self.source.len()
            - self
                .source
                .trim_start()
                .len();
        self.advance(l);
    }

    pub(crate) fn require(&mut self, c: char, what: &'static str) -> Result<(), ParsingError<'i>> {
        match self.peek_next_char() {
            Some(found) if found == c => {
                self.advance(c.len_utf8());
                Ok(())
            }
            Some(found) if is_closer(c) && is_closer(found) => {
                Err(ParsingError::Unbalanced(self.offset, found))
            }
            _ => Err(ParsingError::Expected(self.offset, what)),
        }
    }

    /// A closing delimiter where a separator or a different closer was
    /// wanted is reported as unbalanced.
    pub(crate) fn unexpected(&self, what: &'static str) -> ParsingError<'i> {
        match self.peek_next_char() {
            Some(found) if is_closer(found) => ParsingError::Unbalanced(self.offset, found),
            _ => ParsingError::Expected(self.offset, what),
        }
    }

    /// Guard against pathological nesting, rather than overflow the stack.
    pub(crate) fn descend(&mut self) -> Result<(), ParsingError<'i>> {
        self.depth += 1;
        if self.depth > MAXIMUM_DEPTH {
            Err(ParsingError::TooDeep(self.offset))
        } else {
            Ok(())
        }
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self
            .depth
            .saturating_sub(1);
    }

    /// Fork a parser over a slice of this one's source. Does NOT advance
    /// the parent's state.
    pub(crate) fn subparser(&self, content: &'i str) -> Parser<'i> {
        Parser {
            source: content,
            offset: self.offset_of(content),
            depth: self.depth,
            base: self.base,
            origin: self.origin,
        }
    }

    // hard wire the version for now. If we ever grow to supporting multiple
    // major versions then this will be a lot more complicated than just
    // dealing with a different natural number here.
    pub(crate) fn read_magic_line(&mut self) -> Result<u8, ParsingError<'i>> {
        let re = regex!(r"^%\s*technique\s+v([0-9]+)\s*$");

        let cap = re
            .captures(self.source)
            .ok_or(ParsingError::InvalidHeader(self.offset))?;

        let version = cap
            .get(1)
            .and_then(|one| {
                one.as_str()
                    .parse::<u8>()
                    .ok()
            })
            .ok_or(ParsingError::InvalidHeader(self.offset))?;

        if version != 1 {
            return Err(ParsingError::InvalidHeader(self.offset));
        }

        self.advance(self.source.len());
        Ok(version)
    }

    // This one is awkward because if a license line is present, then it
    // really needs to have a license, whereas the copyright part is
    // optional.
    pub(crate) fn read_license_line(
        &mut self,
    ) -> Result<(&'i str, Option<&'i str>), ParsingError<'i>> {
        let re = regex!(r"^!\s*([^;]+?)\s*(?:;\s*(?:\(c\)|\(C\)|©)\s*(.+?))?\s*$");

        let cap = re
            .captures(self.source)
            .ok_or(ParsingError::InvalidHeader(self.offset))?;

        let one = cap
            .get(1)
            .ok_or(ParsingError::Expected(self.offset, "the license name"))?;

        let license = validate_license(one.as_str())
            .ok_or(ParsingError::InvalidHeader(self.offset + one.start()))?;

        let copyright = match cap.get(2) {
            Some(two) => Some(
                validate_copyright(two.as_str())
                    .ok_or(ParsingError::InvalidHeader(self.offset + two.start()))?,
            ),
            None => None,
        };

        self.advance(self.source.len());
        Ok((license, copyright))
    }

    pub(crate) fn read_template_line(&mut self) -> Result<&'i str, ParsingError<'i>> {
        let re = regex!(r"^&\s*(.+?)\s*$");

        let cap = re
            .captures(self.source)
            .ok_or(ParsingError::Expected(self.offset, "a template name"))?;

        let one = cap
            .get(1)
            .ok_or(ParsingError::Expected(self.offset, "a template name"))?;

        let template = validate_template(one.as_str())
            .ok_or(ParsingError::InvalidHeader(self.offset + one.start()))?;

        self.advance(self.source.len());
        Ok(template)
    }

    pub(crate) fn read_signature(&mut self) -> Result<Signature<'i>, ParsingError<'i>> {
        let content = self.entire();

        let (before, after) = content
            .split_once("->")
            .ok_or(ParsingError::InvalidSignature(self.offset))?;

        let domain = validate_genus(before)
            .ok_or(ParsingError::InvalidGenus(self.offset_of(before.trim_start())))?;
        let range = validate_genus(after)
            .ok_or(ParsingError::InvalidGenus(self.offset_of(after.trim_start())))?;

        self.advance(content.len());
        Ok(Signature { domain, range })
    }

    fn read_parameter_names(
        &mut self,
        list: &'i str,
    ) -> Result<Vec<Identifier<'i>>, ParsingError<'i>> {
        let mut parameters = vec![];

        if list
            .trim()
            .is_empty()
        {
            return Ok(parameters);
        }

        for part in list.split(',') {
            let name = part.trim();
            if name.is_empty() {
                return Err(ParsingError::InvalidParameters(self.offset_of(part)));
            }
            let identifier = validate_identifier(name)
                .ok_or(ParsingError::InvalidIdentifier(self.offset_of(name), name))?;
            parameters.push(identifier);
        }

        Ok(parameters)
    }

    /// Read a procedure declaration line,
    ///
    /// ```text
    /// name(parameters) : Domain -> Range
    /// ```
    ///
    /// where both the parameters and the signature are optional.
    #[allow(clippy::type_complexity)]
    pub(crate) fn read_declaration(
        &mut self,
    ) -> Result<(Identifier<'i>, Vec<Identifier<'i>>, Option<Signature<'i>>), ParsingError<'i>>
    {
        let content = self.entire();

        let (before, after) = content
            .split_once(':')
            .ok_or(ParsingError::InvalidDeclaration(self.offset))?;

        let before = before.trim();

        let (name, parameters) = match before.split_once('(') {
            Some((name, list)) => {
                let name = name.trim_end();
                let list = list
                    .strip_suffix(')')
                    .ok_or(ParsingError::InvalidParameters(self.offset_of(list)))?;
                (name, self.read_parameter_names(list)?)
            }
            None => (before, vec![]),
        };

        let name = validate_identifier(name)
            .ok_or(ParsingError::InvalidIdentifier(self.offset_of(name), name))?;

        let after = after.trim();
        let signature = if after.is_empty() {
            None
        } else {
            let mut inner = self.subparser(after);
            Some(inner.read_signature()?)
        };

        self.advance(content.len());
        Ok((name, parameters, signature))
    }

    pub(crate) fn read_title(&mut self) -> Result<&'i str, ParsingError<'i>> {
        self.trim_whitespace();
        self.require('#', "a title")?;

        let title = self
            .source
            .trim();
        if title.is_empty() {
            return Err(ParsingError::Expected(self.offset, "the title text"));
        }

        self.advance(self.source.len());
        Ok(title)
    }

    /// Parse role assignments like @surgeon, @nurse, or @marketing + @sales
    pub(crate) fn read_attributes(&mut self) -> Result<Vec<Identifier<'i>>, ParsingError<'i>> {
        let content = self.entire();
        let mut roles = vec![];

        for part in content.split('+') {
            let part = part.trim();

            let name = part
                .strip_prefix('@')
                .ok_or(ParsingError::InvalidAttribute(self.offset_of(part)))?;

            let role = validate_identifier(name)
                .ok_or(ParsingError::InvalidIdentifier(self.offset_of(name), name))?;

            roles.push(role);
        }

        self.advance(content.len());
        Ok(roles)
    }

    /// Parse enum responses like 'Yes' | 'No' | 'Not Applicable'
    pub(crate) fn read_responses(&mut self) -> Result<Vec<Response<'i>>, ParsingError<'i>> {
        let content = self.entire();
        let mut responses = vec![];

        for part in content.split('|') {
            let part = part.trim();

            let response = validate_response(part)
                .ok_or(ParsingError::InvalidResponse(self.offset_of(part)))?;

            responses.push(response);
        }

        self.advance(content.len());
        Ok(responses)
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

#[cfg(test)]
#[path = "checks/parser.rs"]
mod check;
