//! Folds classified lines into a Document: the header, then either a
//! sequence of bare steps or a list of procedures, each with its title,
//! description, and body of nested scopes.
//!
//! An error is fatal only to the procedure it occurs in (or, for a document
//! of bare steps, to the top level step it occurs in). Assembly resumes at
//! the next declaration (or next top level step or section) so that as many
//! problems as possible are reported in one pass.

use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::language::*;
use crate::parsing::classifier::{classify, Class, Classification, Header};
use crate::parsing::error::ParsingError;
use crate::parsing::lexer::{is_magic_line, section_marker, step_marker};
use crate::parsing::parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    ExpectMetadata,
    ExpectBodyOrDeclaration,
    InProcedure,
    InBareScope,
    Done,
}

#[derive(Debug, Default)]
struct HeaderDraft<'i> {
    version: Option<u8>,
    license: Option<&'i str>,
    copyright: Option<&'i str>,
    template: Option<&'i str>,
    seen: Vec<Header>,
    end: usize,
}

#[derive(Debug)]
struct ProcedureDraft<'i> {
    name: Identifier<'i>,
    parameters: Vec<Identifier<'i>>,
    signature: Option<Signature<'i>>,
    title: Option<&'i str>,
    description: Vec<Paragraph<'i>>,
    body: Vec<Scope<'i>>,
    begun: bool,
    start: usize,
}

struct Assembler<'i> {
    source: &'i str,
    locator: Locator<'i>,
    mode: Mode,
    header: HeaderDraft<'i>,
    metadata: Option<Metadata<'i>>,
    procedures: Vec<Procedure<'i>>,
    scopes: Vec<Scope<'i>>,
    draft: Option<ProcedureDraft<'i>>,
    steps: Vec<Scope<'i>>,
    section: Option<Scope<'i>>,
    names: HashSet<&'i str>,
    skipping: bool,
    last_end: usize,
    errors: Vec<ParsingError<'i>>,
}

/// Parse text into a Document, or return all the errors encountered.
pub fn parse_with_recovery(content: &str) -> Result<Document, Vec<ParsingError>> {
    let classification = classify(content);
    assemble(content, &classification)
}

/// Assemble a Document from the classified lines of `content`.
pub fn assemble<'i>(
    content: &'i str,
    classification: &Classification,
) -> Result<Document<'i>, Vec<ParsingError<'i>>> {
    let lines = &classification.lines;
    let mut assembler = Assembler::new(content);

    let mut i = 0;
    while i < lines.len() {
        let first = &lines[i];

        let mut j = i + 1;
        while j < lines.len() && lines[j].class == Class::Carried {
            j += 1;
        }
        let last = &lines[j - 1];

        // a construct opened here and never closed; there's no point trying
        // to make sense of the rest of the document.
        if j == lines.len() {
            if let Some(open) = last
                .state
                .open()
                .last()
            {
                debug!(offset = open.offset, "unterminated construct");
                assembler
                    .errors
                    .push(ParsingError::Unterminated(open.offset, open.construct));
                break;
            }
        }

        let text = &content[first.start..last.end];
        assembler.line(first.class, text, first.start, last.end);

        i = j;
    }

    assembler.finish()
}

impl<'i> Assembler<'i> {
    fn new(source: &'i str) -> Assembler<'i> {
        Assembler {
            source,
            locator: Locator::new(source),
            mode: Mode::ExpectMetadata,
            header: HeaderDraft::default(),
            metadata: None,
            procedures: vec![],
            scopes: vec![],
            draft: None,
            steps: vec![],
            section: None,
            names: HashSet::new(),
            skipping: false,
            last_end: 0,
            errors: vec![],
        }
    }

    fn line(&mut self, class: Class, text: &'i str, start: usize, end: usize) {
        trace!(start, ?class);

        if let Class::Header(kind) = class {
            if let Err(error) = self.header_line(kind, text, start, end) {
                self.errors
                    .push(error);
            }
            return;
        }

        if self.mode == Mode::ExpectMetadata {
            self.finish_header();
        }

        if class == Class::Blank {
            return;
        }

        if self.skipping {
            let resume = match class {
                Class::Declaration => true,
                Class::Step { depth: 0, .. } | Class::Section => self.mode != Mode::InProcedure,
                _ => false,
            };
            if !resume {
                return;
            }
            self.skipping = false;
        }

        let result = match class {
            Class::Declaration => self.declaration(text, start),
            Class::Step { level, depth } => self.step(level, depth, text, start, end),
            Class::Section => self.section(text, start, end),
            Class::Title => self.title(text, start),
            Class::Attribute => self.attribute(text, start, end),
            Class::Response => self.response(text, start, end),
            Class::CodeBlock => self.code_block(text, start, end),
            Class::Continuation => self.continuation(text, start),
            Class::Text { follows } => self.text(follows, text, start),
            Class::Blank | Class::Header(_) | Class::Carried => Ok(()),
        };

        if let Err(error) = result {
            self.recover(error);
        }

        self.last_end = end;
    }

    fn recover(&mut self, error: ParsingError<'i>) {
        debug!(offset = error.offset(), "recovering from {}", error.message());

        self.errors
            .push(error);

        match self.mode {
            Mode::InProcedure => {
                self.steps
                    .clear();
                self.section = None;
                self.draft = None;
            }
            _ => {
                self.steps
                    .clear();
            }
        }

        self.skipping = true;
    }

    fn header_line(
        &mut self,
        kind: Header,
        text: &'i str,
        start: usize,
        end: usize,
    ) -> Result<(), ParsingError<'i>> {
        self.header
            .end = end;

        if self
            .header
            .seen
            .contains(&kind)
        {
            return Err(ParsingError::InvalidHeader(start));
        }
        self.header
            .seen
            .push(kind);

        let mut parser = Parser::new(text.trim_end(), start);

        match kind {
            Header::Magic => {
                self.header
                    .version = Some(parser.read_magic_line()?);
            }
            Header::License => {
                let (license, copyright) = parser.read_license_line()?;
                self.header
                    .license = Some(license);
                self.header
                    .copyright = copyright;
            }
            Header::Template => {
                self.header
                    .template = Some(parser.read_template_line()?);
            }
        }

        Ok(())
    }

    fn finish_header(&mut self) {
        self.mode = Mode::ExpectBodyOrDeclaration;

        let header = std::mem::take(&mut self.header);
        if header
            .seen
            .is_empty()
        {
            return;
        }

        match header.version {
            Some(version) => {
                self.metadata = Some(Metadata {
                    version,
                    license: header.license,
                    copyright: header.copyright,
                    template: header.template,
                    span: self
                        .locator
                        .span(0, header.end),
                });
            }
            None => {
                // a license or template line, but no magic line; if there
                // was a magic line that didn't parse, that's already been
                // reported.
                if !header
                    .seen
                    .contains(&Header::Magic)
                {
                    self.errors
                        .push(ParsingError::InvalidHeader(0));
                }
            }
        }
    }

    /// A scope line has been encountered; note that the body has begun.
    fn enter_body(&mut self) {
        match self.mode {
            Mode::ExpectMetadata | Mode::ExpectBodyOrDeclaration => {
                debug!("document of bare steps");
                self.mode = Mode::InBareScope;
            }
            Mode::InProcedure => {
                if let Some(draft) = self
                    .draft
                    .as_mut()
                {
                    draft.begun = true;
                }
            }
            Mode::InBareScope | Mode::Done => {}
        }
    }

    fn descriptive(&self, text: &'i str, start: usize) -> Result<Vec<Descriptive<'i>>, ParsingError<'i>> {
        let trimmed = text.trim();
        let offset = start + (text.len() - text.trim_start().len());

        let mut parser = Parser::at(
            trimmed,
            self.locator
                .locate(offset),
        );
        parser.read_descriptive()
    }

    fn declaration(&mut self, text: &'i str, start: usize) -> Result<(), ParsingError<'i>> {
        if self.mode == Mode::InBareScope {
            return Err(ParsingError::MixedModes(start));
        }

        self.close_procedure();
        self.mode = Mode::InProcedure;

        let mut parser = Parser::new(text.trim_end(), start);
        let (name, parameters, signature) = parser.read_declaration()?;

        if !self
            .names
            .insert(name.0)
        {
            return Err(ParsingError::DuplicateProcedure(start, name.0));
        }

        debug!(name = name.0, "procedure");

        self.draft = Some(ProcedureDraft {
            name,
            parameters,
            signature,
            title: None,
            description: vec![],
            body: vec![],
            begun: false,
            start,
        });

        Ok(())
    }

    fn title(&mut self, text: &'i str, start: usize) -> Result<(), ParsingError<'i>> {
        let draft = match self
            .draft
            .as_mut()
        {
            Some(draft)
                if draft
                    .title
                    .is_none()
                    && !draft.begun
                    && draft
                        .description
                        .is_empty() =>
            {
                draft
            }
            _ => return Err(ParsingError::MisplacedTitle(start)),
        };

        let mut parser = Parser::new(text.trim_end(), start);
        draft.title = Some(parser.read_title()?);

        Ok(())
    }

    fn step(
        &mut self,
        level: Level,
        depth: usize,
        text: &'i str,
        start: usize,
        end: usize,
    ) -> Result<(), ParsingError<'i>> {
        self.enter_body();

        let marker = step_marker(text).ok_or(ParsingError::UnexpectedText(start))?;

        let rest = &text[marker.content..];
        let content = if rest
            .trim()
            .is_empty()
        {
            vec![]
        } else {
            vec![Paragraph(self.descriptive(rest, start + marker.content)?)]
        };

        while self
            .steps
            .len()
            > depth
        {
            self.close_step();
        }

        self.steps
            .push(Scope::Step {
                level,
                ordinal: marker.ordinal,
                content,
                subscopes: vec![],
                span: self
                    .locator
                    .span(start, end),
            });

        Ok(())
    }

    fn section(&mut self, text: &'i str, start: usize, end: usize) -> Result<(), ParsingError<'i>> {
        self.enter_body();

        self.close_steps();
        self.close_section();

        let (numeral, at) = section_marker(text).ok_or(ParsingError::UnexpectedText(start))?;

        let rest = &text[at..];
        let title = if rest
            .trim()
            .is_empty()
        {
            None
        } else {
            Some(Paragraph(self.descriptive(rest, start + at)?))
        };

        self.section = Some(Scope::Section {
            numeral,
            title,
            body: vec![],
            span: self
                .locator
                .span(start, end),
        });

        Ok(())
    }

    fn attribute(&mut self, text: &'i str, start: usize, end: usize) -> Result<(), ParsingError<'i>> {
        self.enter_body();

        let offset = start + (text.len() - text.trim_start().len());
        let mut parser = Parser::new(text.trim(), offset);
        let roles = parser.read_attributes()?;

        self.attach(Scope::Attribute {
            roles,
            span: self
                .locator
                .span(start, end),
        });

        Ok(())
    }

    fn response(&mut self, text: &'i str, start: usize, end: usize) -> Result<(), ParsingError<'i>> {
        self.enter_body();

        let offset = start + (text.len() - text.trim_start().len());
        let mut parser = Parser::new(text.trim(), offset);
        let responses = parser.read_responses()?;

        self.attach(Scope::Response {
            responses,
            span: self
                .locator
                .span(start, end),
        });

        Ok(())
    }

    /// A line that is a single `{…}` is a code block scope in its own right;
    /// anything more than that and it's prose which happens to begin with
    /// some inline code.
    fn code_block(&mut self, text: &'i str, start: usize, end: usize) -> Result<(), ParsingError<'i>> {
        let mut descriptives = self.descriptive(text, start)?;

        if descriptives.len() == 1 {
            if let Some(Descriptive::CodeInline(..)) = descriptives.last() {
                if let Some(Descriptive::CodeInline(expression, _)) = descriptives.pop() {
                    self.enter_body();
                    self.attach(Scope::CodeBlock {
                        expression,
                        span: self
                            .locator
                            .span(start, end),
                    });
                    return Ok(());
                }
            }
        }

        let indented = text.starts_with([' ', '\t']);
        self.prose(false, indented, descriptives, start)
    }

    fn continuation(&mut self, text: &'i str, start: usize) -> Result<(), ParsingError<'i>> {
        let descriptives = self.descriptive(text, start)?;

        match self
            .steps
            .last_mut()
        {
            Some(Scope::Step { content, .. }) => {
                match content.last_mut() {
                    Some(paragraph) => join(paragraph, descriptives),
                    None => content.push(Paragraph(descriptives)),
                }
                Ok(())
            }
            _ => Err(ParsingError::ContinuationWithoutStep(start)),
        }
    }

    fn text(&mut self, follows: bool, text: &'i str, start: usize) -> Result<(), ParsingError<'i>> {
        if is_magic_line(text) {
            return Err(ParsingError::MisplacedHeader(start));
        }

        let descriptives = self.descriptive(text, start)?;
        let indented = text.starts_with([' ', '\t']);

        self.prose(follows, indented, descriptives, start)
    }

    fn prose(
        &mut self,
        follows: bool,
        indented: bool,
        descriptives: Vec<Descriptive<'i>>,
        start: usize,
    ) -> Result<(), ParsingError<'i>> {
        match self.mode {
            Mode::ExpectMetadata | Mode::ExpectBodyOrDeclaration | Mode::Done => {
                return Err(ParsingError::UnexpectedText(start));
            }
            Mode::InProcedure => {
                if let Some(draft) = self
                    .draft
                    .as_mut()
                {
                    if !draft.begun {
                        let description = &mut draft.description;
                        match description.last_mut() {
                            Some(paragraph) if follows => join(paragraph, descriptives),
                            _ => description.push(Paragraph(descriptives)),
                        }
                        return Ok(());
                    }
                }
            }
            Mode::InBareScope => {}
        }

        // once the body has begun, prose belongs to a step
        if !indented {
            return Err(ParsingError::UnexpectedText(start));
        }

        match self
            .steps
            .last_mut()
        {
            Some(Scope::Step { content, .. }) => {
                match content.last_mut() {
                    Some(paragraph) if follows => join(paragraph, descriptives),
                    _ => content.push(Paragraph(descriptives)),
                }
                Ok(())
            }
            _ => Err(ParsingError::ContinuationWithoutStep(start)),
        }
    }

    /// Attach a free standing scope to the innermost open step, or failing
    /// that to the top level.
    fn attach(&mut self, scope: Scope<'i>) {
        match self
            .steps
            .last_mut()
        {
            Some(Scope::Step { subscopes, .. }) => subscopes.push(scope),
            _ => self.attach_top(scope),
        }
    }

    fn attach_top(&mut self, scope: Scope<'i>) {
        if let Some(Scope::Section { body, .. }) = self
            .section
            .as_mut()
        {
            body.push(scope);
        } else if let Some(draft) = self
            .draft
            .as_mut()
        {
            draft
                .body
                .push(scope);
        } else {
            self.scopes
                .push(scope);
        }
    }

    fn finalize_span(&self, span: &mut Span) {
        if self.last_end
            > span
                .end
                .offset
        {
            span.end = self
                .locator
                .locate(self.last_end);
        }
    }

    fn close_step(&mut self) {
        if let Some(mut step) = self
            .steps
            .pop()
        {
            self.finalize_span(step.span_mut());

            match self
                .steps
                .last_mut()
            {
                Some(Scope::Step { subscopes, .. }) => subscopes.push(step),
                _ => self.attach_top(step),
            }
        }
    }

    fn close_steps(&mut self) {
        while !self
            .steps
            .is_empty()
        {
            self.close_step();
        }
    }

    fn close_section(&mut self) {
        if let Some(mut section) = self
            .section
            .take()
        {
            self.finalize_span(section.span_mut());
            self.attach_top(section);
        }
    }

    fn close_procedure(&mut self) {
        self.close_steps();
        self.close_section();

        if let Some(draft) = self
            .draft
            .take()
        {
            let mut span = self
                .locator
                .span(draft.start, draft.start);
            self.finalize_span(&mut span);

            self.procedures
                .push(Procedure {
                    name: draft.name,
                    parameters: draft.parameters,
                    signature: draft.signature,
                    title: draft.title,
                    description: draft.description,
                    body: draft.body,
                    span,
                });
        }
    }

    fn finish(mut self) -> Result<Document<'i>, Vec<ParsingError<'i>>> {
        if self.mode == Mode::ExpectMetadata {
            self.finish_header();
        }

        self.close_procedure();
        self.close_steps();
        self.close_section();

        let mode = self.mode;
        self.mode = Mode::Done;

        let body = match mode {
            Mode::InProcedure => Technique::Procedures(self.procedures),
            Mode::InBareScope => Technique::Steps(self.scopes),
            _ => Technique::Empty,
        };

        if !self
            .errors
            .is_empty()
        {
            let mut errors = self.errors;
            errors.sort_by_key(|error| error.offset());
            errors.dedup_by_key(|error| error.offset());
            return Err(errors);
        }

        Ok(Document {
            header: self.metadata,
            body,
            span: self
                .locator
                .span(
                    0,
                    self.source
                        .len(),
                ),
        })
    }
}

/// Append the content of another line to a paragraph. Text runs on with a
/// single space between lines, and its span grows to cover both.
fn join<'i>(paragraph: &mut Paragraph<'i>, more: Vec<Descriptive<'i>>) {
    let last_is_text = matches!(paragraph.0.last(), Some(Descriptive::Text(..)));
    let gap = paragraph
        .0
        .last()
        .map(|last| {
            last.span()
                .end
        });

    let mut more = more.into_iter();
    let first = match more.next() {
        Some(first) => first,
        None => return,
    };

    match first {
        Descriptive::Text(next, next_span) if last_is_text => {
            if let Some(Descriptive::Text(last, span)) = paragraph
                .0
                .last_mut()
            {
                let joined = format!("{} {}", last, next);
                *last = Cow::Owned(joined);
                span.extend(&next_span);
            }
        }
        first if last_is_text => {
            if let Some(Descriptive::Text(last, _)) = paragraph
                .0
                .last_mut()
            {
                last.to_mut()
                    .push(' ');
            }
            paragraph
                .0
                .push(first);
        }
        Descriptive::Text(next, span) if gap.is_some() => {
            paragraph
                .0
                .push(Descriptive::Text(Cow::Owned(format!(" {}", next)), span));
        }
        first => {
            if let Some(start) = gap {
                let end = first
                    .span()
                    .start;
                paragraph
                    .0
                    .push(Descriptive::Text(Cow::Borrowed(" "), Span { start, end }));
            }
            paragraph
                .0
                .push(first);
        }
    }

    paragraph
        .0
        .extend(more);
}

#[cfg(test)]
#[path = "checks/assembler.rs"]
mod check;
