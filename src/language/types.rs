//! Types representing an Abstract Syntax Tree for the Technique language

use serde::Serialize;
use std::borrow::Cow;

use super::quantity::Numeric;
use super::span::Span;

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Document<'i> {
    pub header: Option<Metadata<'i>>,
    pub body: Technique<'i>,
    pub span: Span,
}

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Metadata<'i> {
    pub version: u8,
    pub license: Option<&'i str>,
    pub copyright: Option<&'i str>,
    pub template: Option<&'i str>,
    pub span: Span,
}

/// The body of a document is either a sequence of bare steps (an implicit,
/// anonymous procedure) or a list of declared procedures. The two never mix.
#[derive(Eq, Debug, PartialEq, Serialize)]
pub enum Technique<'i> {
    Steps(Vec<Scope<'i>>),
    Procedures(Vec<Procedure<'i>>),
    Empty,
}

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Procedure<'i> {
    pub name: Identifier<'i>,
    pub parameters: Vec<Identifier<'i>>,
    pub signature: Option<Signature<'i>>,
    pub title: Option<&'i str>,
    pub description: Vec<Paragraph<'i>>,
    pub body: Vec<Scope<'i>>,
    pub span: Span,
}

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Identifier<'i>(pub &'i str);

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct External<'i>(pub &'i str);

#[derive(Eq, Debug, PartialEq, Serialize)]
pub enum Target<'i> {
    Local(Identifier<'i>),
    Remote(External<'i>),
}

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Forma<'i>(pub &'i str);

#[derive(Eq, Debug, PartialEq, Serialize)]
pub enum Genus<'i> {
    Unit,
    Single(Forma<'i>),
    Tuple(Vec<Forma<'i>>),
    Naked(Vec<Forma<'i>>),
    List(Forma<'i>),
}

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Signature<'i> {
    pub domain: Genus<'i>,
    pub range: Genus<'i>,
}

// types for descriptive content

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Paragraph<'i>(pub Vec<Descriptive<'i>>);

#[derive(Eq, Debug, PartialEq, Serialize)]
pub enum Descriptive<'i> {
    /// Prose. Borrowed when it came from a single line, owned when lines
    /// were joined together; the span covers every line it was joined from.
    Text(Cow<'i, str>, Span),
    CodeInline(Expression<'i>, Span),
    Invocation(Invocation<'i>, Span),
    Binding(Box<Descriptive<'i>>, Vec<Identifier<'i>>, Span),
}

impl<'i> Descriptive<'i> {
    pub fn span(&self) -> &Span {
        match self {
            Descriptive::Text(_, span) => span,
            Descriptive::CodeInline(_, span) => span,
            Descriptive::Invocation(_, span) => span,
            Descriptive::Binding(_, _, span) => span,
        }
    }
}

// types for Steps within procedures

#[derive(Eq, Debug, PartialEq, Clone, Copy, Serialize)]
pub enum Level {
    Numeric,
    Lettered,
    Roman,
    Parallel,
}

#[derive(Eq, Debug, PartialEq, Serialize)]
pub enum Scope<'i> {
    Step {
        level: Level,
        ordinal: &'i str,
        content: Vec<Paragraph<'i>>,
        subscopes: Vec<Scope<'i>>,
        span: Span,
    },
    CodeBlock {
        expression: Expression<'i>,
        span: Span,
    },
    Attribute {
        roles: Vec<Identifier<'i>>,
        span: Span,
    },
    Response {
        responses: Vec<Response<'i>>,
        span: Span,
    },
    Section {
        numeral: &'i str,
        title: Option<Paragraph<'i>>,
        body: Vec<Scope<'i>>,
        span: Span,
    },
}

impl<'i> Scope<'i> {
    pub fn span(&self) -> &Span {
        match self {
            Scope::Step { span, .. } => span,
            Scope::CodeBlock { span, .. } => span,
            Scope::Attribute { span, .. } => span,
            Scope::Response { span, .. } => span,
            Scope::Section { span, .. } => span,
        }
    }

    pub(crate) fn span_mut(&mut self) -> &mut Span {
        match self {
            Scope::Step { span, .. } => span,
            Scope::CodeBlock { span, .. } => span,
            Scope::Attribute { span, .. } => span,
            Scope::Response { span, .. } => span,
            Scope::Section { span, .. } => span,
        }
    }

    /// Child scopes: substeps of a step, or the contents of a section.
    pub fn children(&self) -> &[Scope<'i>] {
        match self {
            Scope::Step { subscopes, .. } => subscopes,
            Scope::Section { body, .. } => body,
            _ => &[],
        }
    }

    /// All the descriptive elements of a step's content, across paragraphs.
    pub fn descriptives(&self) -> impl Iterator<Item = &Descriptive<'i>> {
        let paragraphs: &[Paragraph<'i>] = match self {
            Scope::Step { content, .. } => content,
            _ => &[],
        };
        paragraphs
            .iter()
            .flat_map(|paragraph| paragraph.0.iter())
    }
}

// enum responses like 'Yes' | 'No'

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Response<'i> {
    pub value: &'i str,
    pub condition: Option<&'i str>,
}

// now types used within code blocks

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Invocation<'i> {
    pub target: Target<'i>,
    pub parameters: Option<Vec<Expression<'i>>>,
}

#[derive(Eq, Debug, PartialEq, Serialize)]
pub struct Application<'i> {
    pub target: Identifier<'i>,
    pub parameters: Vec<Expression<'i>>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Pair<'i> {
    pub label: &'i str,
    pub value: Expression<'i>,
}

/// The parts of a string literal: literal text, and `{…}` interpolations.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub enum Piece<'i> {
    Text(&'i str),
    Interpolation(Expression<'i>),
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub enum Expression<'i> {
    Variable(Identifier<'i>, Span),
    Number(Numeric<'i>, Span),
    String(Vec<Piece<'i>>, Span),
    Multiline(Option<&'i str>, &'i str, Span),
    Invocation(Invocation<'i>, Span),
    Application(Application<'i>, Span),
    Foreach(Vec<Identifier<'i>>, Box<Expression<'i>>, Span),
    Repeat(Box<Expression<'i>>, Span),
    Binding(Box<Expression<'i>>, Vec<Identifier<'i>>, Span),
    Tablet(Vec<Pair<'i>>, Span),
}

impl<'i> Expression<'i> {
    pub fn span(&self) -> &Span {
        match self {
            Expression::Variable(_, span) => span,
            Expression::Number(_, span) => span,
            Expression::String(_, span) => span,
            Expression::Multiline(_, _, span) => span,
            Expression::Invocation(_, span) => span,
            Expression::Application(_, span) => span,
            Expression::Foreach(_, _, span) => span,
            Expression::Repeat(_, span) => span,
            Expression::Binding(_, _, span) => span,
            Expression::Tablet(_, span) => span,
        }
    }
}

// the validate functions all need to have start and end anchors, which seems
// like it should be abstracted away.

pub fn validate_license(input: &str) -> Option<&str> {
    let re = regex!(r"^[A-Za-z0-9.,\-_ +/\(\)\[\]]+$");

    if re.is_match(input) {
        Some(input)
    } else {
        None
    }
}

pub fn validate_copyright(input: &str) -> Option<&str> {
    let re = regex!(r"^[A-Za-z0-9.,\-_ &'\(\)\[\]]+$");

    if re.is_match(input) {
        Some(input)
    } else {
        None
    }
}

pub fn validate_template(input: &str) -> Option<&str> {
    let re = regex!(r"^[A-Za-z0-9.,\-]+$");

    if re.is_match(input) {
        Some(input)
    } else {
        None
    }
}

pub fn validate_identifier(input: &str) -> Option<Identifier> {
    let re = regex!(r"^[a-z][a-z0-9_]*$");

    if re.is_match(input) {
        Some(Identifier(input))
    } else {
        None
    }
}

pub fn validate_forma(input: &str) -> Option<Forma> {
    let mut cs = input.chars();

    if !cs
        .next()?
        .is_ascii_uppercase()
    {
        return None;
    }

    for c in cs {
        if !c.is_ascii_alphanumeric() {
            return None;
        }
    }

    Some(Forma(input))
}

// a tuple has at least two members; "(A)" is just a badly written "A", and
// we don't guess.
fn parse_tuple(input: &str) -> Option<Vec<Forma>> {
    let mut formas: Vec<Forma> = Vec::new();

    for text in input.split(',') {
        let text = text.trim_ascii();
        let forma = validate_forma(text)?;
        formas.push(forma);
    }

    if formas.len() < 2 {
        return None;
    }

    Some(formas)
}

/// This one copes with (and discards) any internal whitespace encountered.
pub fn validate_genus(input: &str) -> Option<Genus> {
    let input = input.trim_ascii();
    let first = input
        .chars()
        .next()?;

    match first {
        '[' => {
            // consume up to closing bracket
            if !input.ends_with(']') {
                return None;
            }

            let content = input[1..input.len() - 1].trim_ascii();

            let forma = validate_forma(content)?;

            Some(Genus::List(forma))
        }
        '(' => {
            // first trim off the parenthesis and whitespace
            if !input.ends_with(')') {
                return None;
            }

            let content = input[1..input.len() - 1].trim_ascii();

            if content.is_empty() {
                return Some(Genus::Unit);
            }

            let formas = parse_tuple(content)?;
            Some(Genus::Tuple(formas))
        }
        _ => {
            // a bare tuple (comma-separated but non-parenthesized)
            if input.contains(',') {
                let formas = parse_tuple(input)?;
                Some(Genus::Naked(formas))
            } else {
                let forma = validate_forma(input)?;
                Some(Genus::Single(forma))
            }
        }
    }
}

pub fn validate_response(input: &str) -> Option<Response> {
    // Handle conditions like 'Yes and equipment available'
    let re = regex!(r"^'([^']+)'(?:\s+(.+?))?\s*$");
    let cap = re.captures(input)?;

    let value = cap
        .get(1)?
        .as_str();

    let condition = cap
        .get(2)
        .map(|two| two.as_str());

    Some(Response { value, condition })
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn identifier_rules() {
        assert_eq!(validate_identifier("a"), Some(Identifier("a")));
        assert_eq!(validate_identifier("ab"), Some(Identifier("ab")));
        assert_eq!(validate_identifier("johnny5"), Some(Identifier("johnny5")));
        assert_eq!(validate_identifier("Pizza"), None);
        assert_eq!(validate_identifier("pizZa"), None);
        assert_eq!(validate_identifier(""), None);
        assert!(validate_identifier("0trust").is_none());
        assert_eq!(
            validate_identifier("make_dinner"),
            Some(Identifier("make_dinner"))
        );
        assert!(validate_identifier("MakeDinner").is_none());
        assert!(validate_identifier("make-dinner").is_none());
    }

    #[test]
    fn forma_rules() {
        assert_eq!(validate_forma("A"), Some(Forma("A")));
        assert_eq!(validate_forma("Beans"), Some(Forma("Beans")));
        assert_eq!(validate_forma("lower"), None);
        assert_eq!(validate_forma(""), None);
        assert_eq!(validate_forma("Hot_Water"), None);
    }

    #[test]
    fn genus_rules_single() {
        assert_eq!(validate_genus("A"), Some(Genus::Single(Forma("A"))));
        assert_eq!(validate_genus(" Beans "), Some(Genus::Single(Forma("Beans"))));
        assert_eq!(validate_genus(""), None);
    }

    #[test]
    fn genus_rules_list() {
        assert_eq!(validate_genus("[A]"), Some(Genus::List(Forma("A"))));
        assert_eq!(
            validate_genus("[ Input ]"),
            Some(Genus::List(Forma("Input")))
        );
        assert_eq!(validate_genus("[]"), None);
        assert_eq!(validate_genus("[Input"), None);
        assert_eq!(validate_genus("Input]"), None);
    }

    #[test]
    fn genus_rules_tuple_parens() {
        assert_eq!(
            validate_genus("(A, B)"),
            Some(Genus::Tuple(vec![Forma("A"), Forma("B")]))
        );
        assert_eq!(
            validate_genus("( A , B )"),
            Some(Genus::Tuple(vec![Forma("A"), Forma("B")]))
        );

        // a parenthesized single type is not a tuple
        assert_eq!(validate_genus("(A)"), None);

        assert_eq!(validate_genus("(Input"), None);
        assert_eq!(validate_genus("Input)"), None);
        assert_eq!(validate_genus("(A, b)"), None);
    }

    #[test]
    fn genus_rules_tuple_bare() {
        assert_eq!(
            validate_genus("A, B"),
            Some(Genus::Naked(vec![Forma("A"), Forma("B")]))
        );
        assert_eq!(
            validate_genus("Input, Data, Config"),
            Some(Genus::Naked(vec![
                Forma("Input"),
                Forma("Data"),
                Forma("Config")
            ]))
        );
        assert_eq!(
            validate_genus("A,B"),
            Some(Genus::Naked(vec![Forma("A"), Forma("B")]))
        );
        assert_eq!(validate_genus("A,"), None);
    }

    #[test]
    fn genus_rules_unit() {
        assert_eq!(validate_genus("()"), Some(Genus::Unit));
        assert_eq!(validate_genus("(   )"), Some(Genus::Unit));
        assert_eq!(validate_genus("(\t)"), Some(Genus::Unit));
    }

    #[test]
    fn license_rules() {
        assert_eq!(validate_license("MIT"), Some("MIT"));
        assert_eq!(validate_license("Public Domain"), Some("Public Domain"));
        assert_eq!(
            validate_license("CC BY-SA 3.0 IGO"),
            Some("CC BY-SA 3.0 IGO")
        );
        assert_eq!(validate_license("MIT; (c) ACME"), None);
    }

    #[test]
    fn copyright_rules() {
        assert_eq!(validate_copyright("ACME"), Some("ACME"));
        assert_eq!(validate_copyright("ACME, Inc"), Some("ACME, Inc"));
        assert_eq!(
            validate_copyright("2024 ACME, Inc."),
            Some("2024 ACME, Inc.")
        );
    }

    #[test]
    fn template_rules() {
        assert_eq!(validate_template("checklist"), Some("checklist"));
        assert_eq!(validate_template("checklist,v1"), Some("checklist,v1"));
        assert_eq!(validate_template("checklist-v1.0"), Some("checklist-v1.0"));
        assert_eq!(validate_template("check list"), None);
    }

    #[test]
    fn response_rules() {
        assert_eq!(
            validate_response("'Yes'"),
            Some(Response {
                value: "Yes",
                condition: None
            })
        );
        assert_eq!(
            validate_response("'Yes' and equipment available"),
            Some(Response {
                value: "Yes",
                condition: Some("and equipment available")
            })
        );
        assert_eq!(validate_response("''"), None);
        assert_eq!(validate_response("Yes"), None);
    }
}
