use technique::{
    formatting::{Render, Syntax},
    parsing::ParsingError,
};

/// Generate problem and detail messages for parsing errors.
pub fn generate_error_message(error: &ParsingError, renderer: &dyn Render) -> (String, String) {
    match error {
        ParsingError::InvalidHeader(_) => {
            let mut example = String::new();
            example.push_str(&renderer.style(Syntax::Header, "% technique v1\n"));
            example.push_str(&renderer.style(Syntax::Header, "! «license»; © «copyright»\n"));
            example.push_str(&renderer.style(Syntax::Header, "& «template»"));

            (
                "Invalid header".to_string(),
                format!(
                    r#"
The metadata describing a Technique file must follow this format:

{}

The first line identifies the file as Technique and gives the language
version; only version 1 is understood. The license and template lines are
optional, but each may appear at most once, and if either is present the
first line must be too. A license is conventionally an SPDX identifier like
{} or {}.
                    "#,
                    example,
                    renderer.style(Syntax::Header, "MIT"),
                    renderer.style(Syntax::Header, "CC-BY 4.0"),
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParsingError::MisplacedHeader(_) => (
            "Header line outside the header".to_string(),
            r#"
The metadata lines must be the first lines of the file, before any blank
line, procedure declaration, or step.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::InvalidCharacter(_, c) => (
            format!("Invalid character '{}'", c),
            "This character is not allowed here.".to_string(),
        ),
        ParsingError::InvalidIdentifier(_, text) => (
            format!("Invalid identifier \"{}\"", text),
            format!(
                r#"
Identifiers must start with a lower case letter and contain only lower case
letters, numbers, and underscores. Valid examples include {}, {}, and
{}.
                "#,
                renderer.style(Syntax::Declaration, "make_coffee"),
                renderer.style(Syntax::Declaration, "attempt1"),
                renderer.style(Syntax::Declaration, "i"),
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::InvalidForma(_) | ParsingError::InvalidGenus(_) => (
            "Invalid type".to_string(),
            format!(
                r#"
Types are capitalized names like {}. They can be listed as {}, grouped as
a tuple like {}, or be the unit type {}.
                "#,
                renderer.style(Syntax::Forma, "Coffee"),
                renderer.style(Syntax::Forma, "[Beans]"),
                renderer.style(Syntax::Forma, "(Cup, Saucer)"),
                renderer.style(Syntax::Forma, "()"),
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::InvalidSignature(_) => (
            "Invalid signature".to_string(),
            format!(
                "A signature gives the input and output types of a procedure, as in {} {} {}.",
                renderer.style(Syntax::Forma, "Beans"),
                renderer.style(Syntax::Structure, "->"),
                renderer.style(Syntax::Forma, "Coffee"),
            ),
        ),
        ParsingError::InvalidDeclaration(_) => (
            "Invalid procedure declaration".to_string(),
            format!(
                "Procedures are declared with their name and a colon, as in {} {}.",
                renderer.style(Syntax::Declaration, "make_coffee"),
                renderer.style(Syntax::Structure, ":"),
            ),
        ),
        ParsingError::InvalidParameters(_) => (
            "Invalid parameters".to_string(),
            "Parameters are a comma separated list of identifiers within parentheses."
                .to_string(),
        ),
        ParsingError::DuplicateProcedure(_, name) => (
            format!("Procedure {} declared more than once", name),
            "Each procedure in a file must have a different name.".to_string(),
        ),
        ParsingError::InvalidInvocation(_) => (
            "Invalid procedure invocation".to_string(),
            format!(
                "Invoke a procedure by putting its name in angle brackets, as in {}.",
                renderer.style(Syntax::Invocation, "<make_coffee>(beans)"),
            ),
        ),
        ParsingError::InvalidResponse(_) => (
            "Invalid response".to_string(),
            format!(
                "Responses are single quoted values separated by '|', as in {} | {}.",
                renderer.style(Syntax::Response, "'Yes'"),
                renderer.style(Syntax::Response, "'No'"),
            ),
        ),
        ParsingError::InvalidAttribute(_) => (
            "Invalid attribute".to_string(),
            format!(
                "Roles are written with a leading '@' and joined with '+', as in {}.",
                renderer.style(Syntax::Attribute, "@chef + @waiter"),
            ),
        ),
        ParsingError::TrailingText(_, text) => (
            format!("Unexpected \"{}\" following number", text),
            r#"
Within an expression a number must stand alone; only inline code holding
nothing but the number lets text run on from it. A quantity needs a space
between the number and its unit, as in 5 kg.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::NumberOutOfRange(_, text) => (
            format!("Number {} is out of range", text),
            r#"
Numbers are held as 64 bit integers, with any decimal places counted
separately, so at most 18 digits can be written. Larger magnitudes can be
given in scientific notation, as in 6.02 × 10^23 mol.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Expected(_, value) => (
            format!("Expected {}", value),
            format!(
                "The parser was looking for {} but found something else.",
                value
            ),
        ),
        ParsingError::UnexpectedText(_) => (
            "Text not allowed here".to_string(),
            r#"
Descriptive text belongs either in the description of a procedure, before
its first step, or indented beneath a step.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::MisplacedTitle(_) => (
            "Misplaced title".to_string(),
            format!(
                "A {} title may only appear directly after a procedure declaration.",
                renderer.style(Syntax::Header, "#"),
            ),
        ),
        ParsingError::Unbalanced(_, c) => (
            format!("Unmatched '{}'", c),
            "This closing delimiter has nothing to close.".to_string(),
        ),
        ParsingError::TooDeep(_) => (
            "Nested too deeply".to_string(),
            "Expressions may not be nested more than 64 levels deep.".to_string(),
        ),
        ParsingError::ContinuationWithoutStep(_) => (
            "Indented text without a step".to_string(),
            "Indented text continues the step above it, but there is no step here."
                .to_string(),
        ),
        ParsingError::MixedModes(_) => (
            "Steps and procedures mixed".to_string(),
            r#"
A file either consists of bare steps, or of declared procedures each with
their own steps. Once steps have been given at the top level, procedures
cannot be declared.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Unterminated(_, construct) => (
            format!("Unterminated {}", construct.describe()),
            "The file ended before this was closed.".to_string(),
        ),
    }
}
