//! The expression sub-language found inside code blocks, parameter lists,
//! string interpolations and tablets; and the descriptive parser which finds
//! inline code, invocations, and bindings within prose.
//!
//! Binding with `~` has the lowest precedence and chains left to right:
//! `<fetch>(x) ~ y ~ z` binds the result of the invocation to both y and z.
//! `foreach` and `repeat` bind more tightly. Newlines end an expression
//! except inside parameter lists, tablets, and multiline fences, and around
//! the expression just inside `{` and `}`.

use std::borrow::Cow;

use crate::language::*;
use crate::parsing::error::ParsingError;
use crate::parsing::lexer::{is_keyword, read_numeric, scan_digits, scan_identifier, scan_target};
use crate::parsing::parser::Parser;

impl<'i> Parser<'i> {
    /// Parse prose, picking out inline code blocks and invocations (with any
    /// binding following them) from amongst the text.
    pub(crate) fn read_descriptive(&mut self) -> Result<Vec<Descriptive<'i>>, ParsingError<'i>> {
        let mut results = vec![];

        while !self.is_finished() {
            let content = self.entire();
            let start = self.offset;

            if content.starts_with('{') {
                if let Some(mut fallback) = self.read_run_on_number() {
                    results.append(&mut fallback);
                    continue;
                }
                let expression = self.read_code_inline()?;
                let descriptive = Descriptive::CodeInline(expression, self.span_from(start));
                results.push(self.read_binding_suffix(descriptive, start)?);
            } else if scan_target(content).is_some() {
                let invocation = self.read_invocation()?;
                let descriptive = Descriptive::Invocation(invocation, self.span_from(start));
                results.push(self.read_binding_suffix(descriptive, start)?);
            } else {
                let mut end = content.len();
                for (i, c) in content.char_indices() {
                    if i == 0 {
                        continue;
                    }
                    if c == '{' || (c == '<' && scan_target(&content[i..]).is_some()) {
                        end = i;
                        break;
                    }
                }

                let text = &content[..end];
                self.advance(end);
                results.push(Descriptive::Text(Cow::Borrowed(text), self.span_from(start)));
            }
        }

        Ok(results)
    }

    /// Inline code holding nothing but a number with text running on from
    /// it, as in `{ 2.5x }`, is read as the bare number followed by that
    /// text. Leaves the parser where it was if that's not what is here.
    fn read_run_on_number(&mut self) -> Option<Vec<Descriptive<'i>>> {
        let start = self.offset;
        let mut parser = self.clone();

        parser.require('{', "'{'").ok()?;
        parser.trim_newlines();

        let begin = parser.offset;
        let (numeric, width, trailing) = read_numeric(parser.entire())?;
        if trailing.is_empty() {
            return None;
        }
        parser.advance(width);
        let number = Expression::Number(numeric, parser.span_from(begin));

        let at = parser.offset;
        parser.advance(trailing.len());
        let text = Descriptive::Text(Cow::Borrowed(trailing), parser.span_from(at));

        parser.trim_newlines();
        parser.require('}', "'}'").ok()?;

        let code = Descriptive::CodeInline(number, parser.span_from(start));
        *self = parser;

        Some(vec![code, text])
    }

    /// Having read a code block or invocation in prose, look for `~ name`.
    fn read_binding_suffix(
        &mut self,
        descriptive: Descriptive<'i>,
        start: usize,
    ) -> Result<Descriptive<'i>, ParsingError<'i>> {
        let targets = self.read_binding_targets()?;

        if targets.is_empty() {
            Ok(descriptive)
        } else {
            Ok(Descriptive::Binding(Box::new(descriptive), targets, self.span_from(start)))
        }
    }

    /// Zero or more `~ targets`, flattened. Leaves the parser where it was
    /// if there is no binding operator.
    fn read_binding_targets(&mut self) -> Result<Vec<Identifier<'i>>, ParsingError<'i>> {
        let mut targets = vec![];

        loop {
            let saved = (self.source, self.offset);

            self.trim_whitespace();
            if self.peek_next_char() == Some('~') {
                self.advance(1);
                self.trim_whitespace();
                let mut identifiers = self.read_identifiers()?;
                targets.append(&mut identifiers);
            } else {
                self.source = saved.0;
                self.offset = saved.1;
                break;
            }
        }

        Ok(targets)
    }

    /// An inline code block, `{ expression }`.
    pub(crate) fn read_code_inline(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        self.require('{', "'{'")?;
        self.descend()?;
        self.trim_newlines();

        if self.peek_next_char() == Some('}') {
            return Err(ParsingError::Expected(self.offset, "an expression"));
        }

        let expression = self.read_expression()?;

        self.trim_newlines();
        self.require('}', "'}'")?;
        self.ascend();

        Ok(expression)
    }

    pub(crate) fn read_expression(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        self.descend()?;
        let start = self.offset;

        let expression = self.read_prefix()?;
        let targets = self.read_binding_targets()?;

        self.ascend();

        if targets.is_empty() {
            Ok(expression)
        } else {
            Ok(Expression::Binding(Box::new(expression), targets, self.span_from(start)))
        }
    }

    fn read_prefix(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        self.descend()?;
        let content = self.entire();
        let start = self.offset;

        let expression = if is_keyword(content, "foreach") {
            self.read_foreach_expression()?
        } else if is_keyword(content, "repeat") {
            self.advance(6);
            self.trim_whitespace();
            let expression = self.read_prefix()?;
            Expression::Repeat(Box::new(expression), self.span_from(start))
        } else {
            self.read_primary()?
        };

        self.ascend();
        Ok(expression)
    }

    fn read_foreach_expression(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        // Parse "foreach <pattern> in <expression>" where pattern is either
        // an identifier or a parenthesized list of them.
        let start = self.offset;
        self.advance(7);
        self.trim_whitespace();

        let identifiers = self.read_identifiers()?;

        self.trim_whitespace();
        if !is_keyword(self.entire(), "in") {
            return Err(ParsingError::Expected(self.offset, "'in'"));
        }
        self.advance(2);
        self.trim_whitespace();

        let expression = self.read_prefix()?;

        Ok(Expression::Foreach(identifiers, Box::new(expression), self.span_from(start)))
    }

    fn read_primary(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        let content = self.entire();
        let start = self.offset;

        let c = match self.peek_next_char() {
            Some(c) => c,
            None => return Err(ParsingError::Expected(self.offset, "an expression")),
        };

        match c {
            '"' => self.read_string(),
            '`' if content.starts_with("```") => self.read_multiline(),
            '[' => self.read_tablet(),
            '<' => {
                let invocation = self.read_invocation()?;
                Ok(Expression::Invocation(invocation, self.span_from(start)))
            }
            '0'..='9' | '-' | '+' => self.read_number(),
            'a'..='z' => {
                let target = self.read_identifier()?;
                if self.peek_next_char() == Some('(') {
                    let parameters = self.read_parameters()?;
                    let application = Application { target, parameters };
                    Ok(Expression::Application(application, self.span_from(start)))
                } else {
                    Ok(Expression::Variable(target, self.span_from(start)))
                }
            }
            _ => Err(ParsingError::InvalidCharacter(self.offset, c)),
        }
    }

    fn read_number(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        let content = self.entire();
        let start = self.offset;

        let (numeric, width, trailing) = match read_numeric(content) {
            Some(result) => result,
            None => {
                if let Some(digits) = scan_digits(content) {
                    return Err(ParsingError::NumberOutOfRange(self.offset, digits));
                }
                let c = self
                    .peek_next_char()
                    .unwrap_or(' ');
                return Err(ParsingError::InvalidCharacter(self.offset, c));
            }
        };

        // in code "2.5x" is a mistake, unless the number is all there is
        // between the braces; see read_run_on_number().
        if !trailing.is_empty() {
            return Err(ParsingError::TrailingText(self.offset + width, trailing));
        }

        self.advance(width);
        Ok(Expression::Number(numeric, self.span_from(start)))
    }

    /// Consume an identifier. It has to end cleanly; we report the whole
    /// word if it doesn't, as in "pizZa".
    pub(crate) fn read_identifier(&mut self) -> Result<Identifier<'i>, ParsingError<'i>> {
        let content = self.entire();

        let word = match content.find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-')) {
            Some(i) => &content[..i],
            None => content,
        };

        match scan_identifier(content) {
            Some(width) if width == word.len() => {
                self.advance(width);
                Ok(Identifier(word))
            }
            _ => {
                if word.is_empty() {
                    Err(ParsingError::Expected(self.offset, "an identifier"))
                } else {
                    Err(ParsingError::InvalidIdentifier(self.offset, word))
                }
            }
        }
    }

    /// Either a single identifier or a parenthesized list of them, as found
    /// after `foreach` or `~`.
    fn read_identifiers(&mut self) -> Result<Vec<Identifier<'i>>, ParsingError<'i>> {
        if self.peek_next_char() != Some('(') {
            return Ok(vec![self.read_identifier()?]);
        }

        self.advance(1);
        let mut identifiers = vec![];

        loop {
            self.trim_whitespace();
            identifiers.push(self.read_identifier()?);
            self.trim_whitespace();

            match self.peek_next_char() {
                Some(',') => self.advance(1),
                Some(')') => {
                    self.advance(1);
                    break;
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }

        Ok(identifiers)
    }

    /// Parse a target like <procedure_name> or <https://example.com/proc>,
    /// and the parameters to it if present.
    pub(crate) fn read_invocation(&mut self) -> Result<Invocation<'i>, ParsingError<'i>> {
        let content = self.entire();

        let width = scan_target(content).ok_or(ParsingError::InvalidInvocation(self.offset))?;

        let inner = &content[1..width - 1];
        let target = if inner.starts_with("http") {
            Target::Remote(External(inner))
        } else {
            Target::Local(Identifier(inner))
        };

        self.advance(width);

        let parameters = if self.peek_next_char() == Some('(') {
            Some(self.read_parameters()?)
        } else {
            None
        };

        Ok(Invocation { target, parameters })
    }

    /// Consume parameters to an invocation or function. Specifically, look
    /// for the form
    ///
    /// ( one, 2, "three", ```bash echo "four"``` )
    ///
    /// and return a Vec with an Expression for each parameter in the list.
    /// Newlines between parameters are not significant.
    fn read_parameters(&mut self) -> Result<Vec<Expression<'i>>, ParsingError<'i>> {
        self.require('(', "'('")?;
        self.descend()?;

        let mut parameters = vec![];

        loop {
            self.trim_newlines();

            if self.peek_next_char() == Some(')') {
                self.advance(1);
                break;
            }

            parameters.push(self.read_expression()?);

            self.trim_newlines();
            match self.peek_next_char() {
                Some(',') => self.advance(1),
                Some(')') => {
                    self.advance(1);
                    break;
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }

        self.ascend();
        Ok(parameters)
    }

    /// A string literal, with `{…}` interpolations. Escapes are left in the
    /// text as written.
    fn read_string(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        let start = self.offset;
        self.require('"', "'\"'")?;
        self.descend()?;

        let mut pieces = vec![];

        loop {
            let content = self.entire();
            let mut end = None;
            let mut chars = content.char_indices();

            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        chars.next();
                    }
                    '"' | '{' => {
                        end = Some((i, c));
                        break;
                    }
                    _ => {}
                }
            }

            let (i, c) = end.ok_or(ParsingError::Expected(self.offset, "a closing '\"'"))?;

            if i > 0 {
                pieces.push(Piece::Text(&content[..i]));
            }
            self.advance(i);

            if c == '"' {
                self.advance(1);
                break;
            }

            let expression = self.read_code_inline()?;
            pieces.push(Piece::Interpolation(expression));
        }

        self.ascend();
        Ok(Expression::String(pieces, self.span_from(start)))
    }

    /// A fenced block of some other language. The language tag is only
    /// recognized when it is alone on the opening line; the content is kept
    /// verbatim. A backslash before a fence keeps it in the content.
    fn read_multiline(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        let start = self.offset;
        self.advance(3);

        let re = regex!(r"^([A-Za-z0-9_+.\-]+)[ \t]*\r?\n");
        let lang = match re.captures(self.source) {
            Some(cap) => {
                let whole = cap
                    .get(0)
                    .map_or(0, |m| m.end());
                let lang = cap
                    .get(1)
                    .map(|one| one.as_str());
                self.advance(whole);
                lang
            }
            None => None,
        };

        let content = self.entire();
        let mut search = 0;
        let end = loop {
            match content[search..].find("```") {
                Some(i) => {
                    let at = search + i;
                    if at > 0 && content.as_bytes()[at - 1] == b'\\' {
                        search = at + 3;
                        continue;
                    }
                    break at;
                }
                None => return Err(ParsingError::Expected(start, "a closing ```")),
            }
        };

        let raw = &content[..end];
        self.advance(end + 3);

        Ok(Expression::Multiline(lang, raw, self.span_from(start)))
    }

    /// A tablet, `[ "label" = value, … ]`. Entries are separated by commas
    /// or newlines; labels may repeat.
    fn read_tablet(&mut self) -> Result<Expression<'i>, ParsingError<'i>> {
        let start = self.offset;
        self.require('[', "'['")?;
        self.descend()?;

        let mut pairs = vec![];

        loop {
            self.trim_newlines();

            if self.peek_next_char() == Some(']') {
                self.advance(1);
                break;
            }

            let label = self.read_label()?;

            self.trim_whitespace();
            self.require('=', "'=' after the label")?;
            self.trim_whitespace();

            let value = self.read_expression()?;
            pairs.push(Pair { label, value });

            self.trim_newlines();
            match self.peek_next_char() {
                Some(',') => self.advance(1),
                Some(_) => {}
                None => return Err(ParsingError::Expected(self.offset, "']'")),
            }
        }

        self.ascend();
        Ok(Expression::Tablet(pairs, self.span_from(start)))
    }

    fn read_label(&mut self) -> Result<&'i str, ParsingError<'i>> {
        self.require('"', "a quoted label")?;

        let content = self.entire();
        let mut end = None;
        let mut chars = content.char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => {
                    end = Some(i);
                    break;
                }
                '\n' => break,
                _ => {}
            }
        }

        let i = end.ok_or(ParsingError::Expected(self.offset, "a closing '\"'"))?;

        let label = &content[..i];
        self.advance(i + 1);
        Ok(label)
    }
}

#[cfg(test)]
#[path = "checks/expression.rs"]
mod check;
