//! Code formatter for the Technique language

use crate::formatting::*;
use crate::language::*;

/// Reprint a Document in canonical form.
pub fn format(document: &Document) -> String {
    format_with_renderer(document, &Identity)
}

/// Reprint a Document in canonical form, styled by the given renderer.
pub fn format_with_renderer(document: &Document, renderer: &impl Render) -> String {
    let fragments = fragments(document);
    render(renderer, &fragments)
}

/// The canonical form of a Document as a sequence of syntax tagged
/// fragments.
pub(crate) fn fragments(document: &Document) -> Vec<(Syntax, String)> {
    let mut output = Formatter::new();

    if let Some(metadata) = &document.header {
        output.format_header(metadata);
    }

    output.format_technique(&document.body);

    output.fragments
}

struct Formatter {
    fragments: Vec<(Syntax, String)>,
    nesting: usize,
}

impl Formatter {
    fn new() -> Formatter {
        Formatter {
            fragments: Vec::new(),
            nesting: 0,
        }
    }

    fn append(&mut self, syntax: Syntax, content: &str) {
        if content.is_empty() {
            return;
        }
        self.fragments
            .push((syntax, content.to_string()));
    }

    fn newline(&mut self) {
        self.fragments
            .push((Syntax::Newline, "\n".to_string()));
    }

    fn ends_with_newlines(&self, count: usize) -> bool {
        let mut seen = 0;
        for (_, content) in self
            .fragments
            .iter()
            .rev()
        {
            for c in content
                .chars()
                .rev()
            {
                if c != '\n' {
                    return false;
                }
                seen += 1;
                if seen >= count {
                    return true;
                }
            }
        }
        false
    }

    /// Separate what follows from what came before with an empty line, unless
    /// this is the start of the output or there already is one.
    fn blank_line(&mut self) {
        if self
            .fragments
            .is_empty()
        {
            return;
        }
        while !self.ends_with_newlines(2) {
            self.newline();
        }
    }

    fn indent(&mut self) {
        if self.nesting > 0 {
            let spaces = " ".repeat(self.nesting);
            self.append(Syntax::Indent, &spaces);
        }
    }

    fn increase(&mut self) {
        self.nesting += 4;
    }

    fn decrease(&mut self) {
        self.nesting = self
            .nesting
            .saturating_sub(4);
    }

    fn format_header(&mut self, metadata: &Metadata) {
        self.append(Syntax::Header, &format!("% technique v{}", metadata.version));
        self.newline();

        if let Some(license) = metadata.license {
            self.append(Syntax::Header, "! ");
            self.append(Syntax::Header, license);

            if let Some(copyright) = metadata.copyright {
                self.append(Syntax::Header, "; © ");
                self.append(Syntax::Header, copyright);
            }
            self.newline();
        }

        if let Some(template) = metadata.template {
            self.append(Syntax::Header, "& ");
            self.append(Syntax::Header, template);
            self.newline();
        }
    }

    fn format_technique(&mut self, technique: &Technique) {
        match technique {
            Technique::Steps(scopes) => {
                self.blank_line();
                self.append_scopes(scopes);
            }
            Technique::Procedures(procedures) => {
                for procedure in procedures {
                    self.format_procedure(procedure);
                }
            }
            Technique::Empty => {}
        }
    }

    fn format_procedure(&mut self, procedure: &Procedure) {
        // if a header or another procedure has already been added,
        // separate the upcoming one with a blank line.
        self.blank_line();

        self.append(Syntax::Declaration, procedure.name.0);

        if !procedure
            .parameters
            .is_empty()
        {
            self.append_parameters(&procedure.parameters);
        }

        self.append(Syntax::Neutral, " ");
        self.append(Syntax::Structure, ":");

        if let Some(signature) = &procedure.signature {
            self.append(Syntax::Neutral, " ");
            self.append_signature(signature);
        }
        self.newline();

        if let Some(title) = procedure.title {
            self.blank_line();
            self.append(Syntax::Header, "# ");
            self.append(Syntax::Title, title);
            self.newline();
        }

        for paragraph in &procedure.description {
            self.blank_line();
            self.append_descriptives(Syntax::Description, &paragraph.0);
            self.newline();
        }

        if !procedure
            .body
            .is_empty()
        {
            self.blank_line();
            self.append_scopes(&procedure.body);
        }
    }

    fn append_signature(&mut self, signature: &Signature) {
        self.append_genus(&signature.domain);
        self.append(Syntax::Structure, " -> ");
        self.append_genus(&signature.range);
    }

    fn append_formas(&mut self, formas: &[Forma]) {
        for (i, forma) in formas
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.append(Syntax::Structure, ", ");
            }
            self.append(Syntax::Forma, forma.0);
        }
    }

    fn append_genus(&mut self, genus: &Genus) {
        match genus {
            Genus::Unit => self.append(Syntax::Forma, "()"),
            Genus::Single(forma) => self.append(Syntax::Forma, forma.0),
            Genus::Tuple(formas) => {
                self.append(Syntax::Structure, "(");
                self.append_formas(formas);
                self.append(Syntax::Structure, ")");
            }
            Genus::Naked(formas) => self.append_formas(formas),
            Genus::List(forma) => {
                self.append(Syntax::Structure, "[");
                self.append(Syntax::Forma, forma.0);
                self.append(Syntax::Structure, "]");
            }
        }
    }

    // Output names surrounded by parenthesis
    fn append_parameters(&mut self, variables: &[Identifier]) {
        self.append(Syntax::Structure, "(");
        for (i, variable) in variables
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.append(Syntax::Structure, ", ");
            }
            self.append(Syntax::Variable, variable.0);
        }
        self.append(Syntax::Structure, ")");
    }

    fn append_descriptives(&mut self, syntax: Syntax, descriptives: &[Descriptive]) {
        for descriptive in descriptives {
            self.append_descriptive(syntax, descriptive);
        }
    }

    fn append_descriptive(&mut self, syntax: Syntax, descriptive: &Descriptive) {
        match descriptive {
            Descriptive::Text(text, _) => self.append(syntax, text),
            Descriptive::CodeInline(expression, _) => {
                self.append(Syntax::Structure, "{ ");
                self.append_expression(expression);
                self.append(Syntax::Structure, " }");
            }
            Descriptive::Invocation(invocation, _) => self.append_invocation(invocation),
            Descriptive::Binding(inner, variables, _) => {
                self.append_descriptive(syntax, inner);
                self.append(Syntax::Structure, " ~ ");
                self.append_variables(variables);
            }
        }
    }

    fn append_scopes(&mut self, scopes: &[Scope]) {
        for scope in scopes {
            self.append_scope(scope);
        }
    }

    fn append_scope(&mut self, scope: &Scope) {
        match scope {
            Scope::Step {
                ordinal,
                content,
                subscopes,
                ..
            } => {
                self.indent();

                let marker = if *ordinal == "-" {
                    ordinal.to_string()
                } else {
                    format!("{}.", ordinal)
                };
                self.append(Syntax::StepItem, &marker);

                // content lines up on the next tab stop
                let pad = 4usize.saturating_sub(marker.len()).max(1);

                let mut paragraphs = content.iter();
                if let Some(first) = paragraphs.next() {
                    self.append(Syntax::Neutral, &" ".repeat(pad));
                    self.append_descriptives(Syntax::Description, &first.0);
                }
                self.newline();

                self.increase();
                for paragraph in paragraphs {
                    self.blank_line();
                    self.indent();
                    self.append_descriptives(Syntax::Description, &paragraph.0);
                    self.newline();
                }
                self.append_scopes(subscopes);
                self.decrease();
            }
            Scope::CodeBlock { expression, .. } => {
                // directly after a step it would be read as a continuation
                self.blank_line();
                self.indent();
                self.append(Syntax::Structure, "{ ");
                self.append_expression(expression);
                self.append(Syntax::Structure, " }");
                self.newline();
            }
            Scope::Attribute { roles, .. } => {
                self.indent();
                for (i, role) in roles
                    .iter()
                    .enumerate()
                {
                    if i > 0 {
                        self.append(Syntax::Structure, " + ");
                    }
                    self.append(Syntax::Attribute, "@");
                    self.append(Syntax::Attribute, role.0);
                }
                self.newline();
            }
            Scope::Response { responses, .. } => {
                self.indent();
                self.append_responses(responses);
                self.newline();
            }
            Scope::Section {
                numeral,
                title,
                body,
                ..
            } => {
                // sections always reset back to left margin
                let saved = self.nesting;
                self.nesting = 0;

                self.blank_line();
                self.append(Syntax::StepItem, numeral);
                self.append(Syntax::StepItem, ".");
                if let Some(paragraph) = title {
                    self.append(Syntax::Neutral, " ");
                    self.append_descriptives(Syntax::Section, &paragraph.0);
                }
                self.newline();

                if !body.is_empty() {
                    self.blank_line();
                    self.append_scopes(body);
                }

                self.nesting = saved;
            }
        }
    }

    fn append_responses(&mut self, responses: &[Response]) {
        for (i, response) in responses
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.append(Syntax::Structure, " | ");
            }
            self.append(Syntax::Quote, "'");
            self.append(Syntax::Response, response.value);
            self.append(Syntax::Quote, "'");

            if let Some(condition) = response.condition {
                self.append(Syntax::Neutral, " ");
                self.append(Syntax::Description, condition);
            }
        }
    }

    fn append_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Variable(identifier, _) => self.append(Syntax::Variable, identifier.0),
            Expression::Number(numeric, _) => self.append(Syntax::Numeric, &numeric.to_string()),
            Expression::String(pieces, _) => {
                self.append(Syntax::Quote, "\"");
                for piece in pieces {
                    match piece {
                        // preserve string content exactly as written
                        Piece::Text(text) => self.append(Syntax::String, text),
                        Piece::Interpolation(inner) => {
                            self.append(Syntax::Structure, "{");
                            self.append_expression(inner);
                            self.append(Syntax::Structure, "}");
                        }
                    }
                }
                self.append(Syntax::Quote, "\"");
            }
            Expression::Multiline(lang, raw, _) => {
                self.append(Syntax::Quote, "```");
                if let Some(which) = lang {
                    self.append(Syntax::Language, which);
                    self.newline();
                }
                self.append(Syntax::Multiline, raw);
                self.append(Syntax::Quote, "```");
            }
            Expression::Invocation(invocation, _) => self.append_invocation(invocation),
            Expression::Application(application, _) => {
                self.append(Syntax::Function, application.target.0);
                self.append_arguments(&application.parameters);
            }
            Expression::Foreach(variables, inner, _) => {
                self.append(Syntax::Keyword, "foreach ");
                self.append_variables(variables);
                self.append(Syntax::Keyword, " in ");
                self.append_expression(inner);
            }
            Expression::Repeat(inner, _) => {
                self.append(Syntax::Keyword, "repeat ");
                self.append_expression(inner);
            }
            Expression::Binding(inner, variables, _) => {
                self.append_expression(inner);
                self.append(Syntax::Structure, " ~ ");
                self.append_variables(variables);
            }
            Expression::Tablet(pairs, _) => self.append_tablet(pairs),
        }
    }

    // When binding we omit the parenthesis in the most common case of there
    // only being one name being bound to.
    fn append_variables(&mut self, variables: &[Identifier]) {
        if variables.len() == 1 {
            self.append(Syntax::Variable, variables[0].0);
        } else {
            self.append_parameters(variables);
        }
    }

    fn append_invocation(&mut self, invocation: &Invocation) {
        self.append(Syntax::Quote, "<");
        match &invocation.target {
            Target::Local(identifier) => self.append(Syntax::Invocation, identifier.0),
            Target::Remote(external) => self.append(Syntax::Invocation, external.0),
        }
        self.append(Syntax::Quote, ">");
        if let Some(parameters) = &invocation.parameters {
            self.append_arguments(parameters);
        }
    }

    fn append_arguments(&mut self, parameters: &[Expression]) {
        self.append(Syntax::Structure, "(");
        for (i, parameter) in parameters
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.append(Syntax::Structure, ", ");
            }
            self.append_expression(parameter);
        }
        self.append(Syntax::Structure, ")");
    }

    fn append_tablet(&mut self, pairs: &[Pair]) {
        if pairs.is_empty() {
            self.append(Syntax::Structure, "[]");
            return;
        }

        self.append(Syntax::Structure, "[ ");
        for (i, pair) in pairs
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.append(Syntax::Structure, ", ");
            }
            self.append(Syntax::Quote, "\"");
            self.append(Syntax::Label, pair.label);
            self.append(Syntax::Quote, "\"");
            self.append(Syntax::Structure, " = ");
            self.append_expression(&pair.value);
        }
        self.append(Syntax::Structure, " ]");
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::parsing::parse_with_recovery;

    fn reformat(content: &str) -> String {
        let document = parse_with_recovery(content).unwrap();
        format(&document)
    }

    #[test]
    fn header() {
        assert_eq!(
            reformat("%technique v1\n!MIT;(c) ACME\n&checklist\n"),
            "% technique v1\n! MIT; © ACME\n& checklist\n"
        );
    }

    #[test]
    fn procedure_layout() {
        let content = r#"make_coffee(beans) :   Beans,Water ->  [Coffee]
# Making Coffee
First
line.
1. Grind
    a. Finely
"#;
        assert_eq!(
            reformat(content),
            r#"make_coffee(beans) : Beans, Water -> [Coffee]

# Making Coffee

First line.

1.  Grind
    a.  Finely
"#
        );
    }

    #[test]
    fn scopes_under_steps() {
        let content = r#"1. Check {temperature}
   @chef+@waiter
   'Yes'|'No' if unsure
   {repeat <check>(x)~y}
10. Done
"#;
        assert_eq!(
            reformat(content),
            r#"1.  Check { temperature }
    @chef + @waiter
    'Yes' | 'No' if unsure

    { repeat <check>(x) ~ y }
10. Done
"#
        );
    }

    #[test]
    fn expressions() {
        let content =
            "1. { exec(\"ls {dir}\", [\"a\" = 1\n\"b\" = 2.50], ```bash\nls\n```) }\n";
        assert_eq!(
            reformat(content),
            "1.  { exec(\"ls {dir}\", [ \"a\" = 1, \"b\" = 2.50 ], ```bash\nls\n```) }\n"
        );
    }

    #[test]
    fn numbers_running_into_text() {
        let once = reformat("1. Add { 2.5x } of flour\n");
        assert_eq!(once, "1.  Add { 2.5 }x of flour\n");
        assert_eq!(reformat(&once), once);
    }

    #[test]
    fn sections() {
        let content = "I. First\n1. One\nII. Second\n1. Two\n";
        assert_eq!(
            reformat(content),
            "I. First\n\n1.  One\n\nII. Second\n\n1.  Two\n"
        );
    }

    #[test]
    fn styled_fragments() {
        let document = parse_with_recovery("make :\n").unwrap();
        let fragments = fragments(&document);

        assert_eq!(
            fragments[0],
            (Syntax::Declaration, "make".to_string())
        );
        assert_eq!(
            format_with_renderer(&document, &Identity),
            "make :\n"
        );
    }
}
