use super::messages::generate_error_message;
use owo_colors::OwoColorize;
use std::path::Path;
use technique::{
    formatting::Render,
    language::{LoadingError, Location},
    parsing::ParsingError,
};

/// Format a parsing error with full details including source code context
pub fn full_parsing_error<'i>(
    error: &ParsingError,
    filename: &'i Path,
    source: &'i str,
    renderer: &dyn Render,
) -> String {
    let (problem, details) = generate_error_message(error, renderer);
    let location = Location::of(source, error.offset());

    let code = source
        .lines()
        .nth(location.line - 1)
        .unwrap_or("?");
    let line = location.line;
    let column = location.column;
    let width = 3.max(
        line.to_string()
            .len(),
    );

    // underline the whole of the offending text where its extent is known
    let carets = "^".repeat(
        error
            .width()
            .and_then(|width| {
                source
                    .get(error.offset()..)
                    .and_then(|rest| rest.get(..width))
            })
            .map_or(1, |text| {
                text.chars()
                    .count()
            })
            .max(1),
    );

    format!(
        r#"
{}: {}:{}:{} {}

{:width$} {}
{:width$} {} {}
{:width$} {} {:>column$}{}

{}
        "#,
        "error".bright_red(),
        filename.to_string_lossy(),
        line,
        column,
        problem.bold(),
        ' ',
        '|'.bright_blue(),
        line.bright_blue(),
        '|'.bright_blue(),
        code,
        ' ',
        '|'.bright_blue(),
        '^'.bright_red(),
        (&carets[1..]).bright_red(),
        details
    )
    .trim_ascii()
    .to_string()
}

/// Format a parsing error with concise single-line output
pub fn concise_parsing_error<'i>(
    error: &ParsingError,
    filename: &'i Path,
    source: &'i str,
    renderer: &dyn Render,
) -> String {
    let (problem, _) = generate_error_message(error, renderer);
    let location = Location::of(source, error.offset());

    format!(
        "{}: {}:{}:{} {}",
        "error".bright_red(),
        filename.to_string_lossy(),
        location.line,
        location.column,
        problem.bold(),
    )
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    )
}
