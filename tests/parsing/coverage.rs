use std::ops::Range;

use technique::language::*;
use technique::parsing;

use super::files_in;

/// The top level units of a document: its header, then each procedure, or
/// each top level scope of a document of bare steps.
fn units(document: &Document) -> Vec<Range<usize>> {
    let mut units = vec![];

    if let Some(header) = &document.header {
        units.push(
            header
                .span
                .range(),
        );
    }

    match &document.body {
        Technique::Procedures(procedures) => {
            for procedure in procedures {
                units.push(
                    procedure
                        .span
                        .range(),
                );
            }
        }
        Technique::Steps(scopes) => {
            for scope in scopes {
                units.push(
                    scope
                        .span()
                        .range(),
                );
            }
        }
        Technique::Empty => {}
    }

    units
}

#[test]
fn spans_tile_the_source() {
    for file in files_in("tests/samples/") {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let document = parsing::parse(&file, &content)
            .unwrap_or_else(|e| panic!("Failed to parse file {:?}: {:?}", file, e));

        assert_eq!(
            document
                .span
                .range(),
            0..content.len()
        );

        // units are in order and don't overlap, and anything between them
        // is only blank lines
        let mut previous = 0;
        for unit in units(&document) {
            assert!(
                unit.start >= previous,
                "{:?}: unit {:?} overlaps what came before",
                file,
                unit
            );
            assert!(unit.start < unit.end, "{:?}: empty unit {:?}", file, unit);

            let gap = &content[previous..unit.start];
            assert!(
                gap.trim()
                    .is_empty(),
                "{:?}: text {:?} not covered by any unit",
                file,
                gap
            );

            previous = unit.end;
        }

        assert!(
            content[previous..]
                .trim()
                .is_empty(),
            "{:?}: trailing text not covered",
            file
        );
    }
}

#[test]
fn step_spans_locate_their_text() {
    let content = parsing::load(std::path::Path::new("tests/samples/sharpening.tq")).unwrap();
    let document = parsing::parse_with_recovery(&content).unwrap();

    let procedure = match &document.body {
        Technique::Procedures(procedures) => &procedures[0],
        _ => panic!("expected a procedure"),
    };

    let first = procedure.body[0].span();
    assert_eq!(first.start.line, 5);
    assert!(first
        .text(&content)
        .starts_with("1. Soak the stone"));
    assert!(first
        .text(&content)
        .ends_with("Wait until bubbles stop"));

    // leaf text borrowed from the source can be found again
    let name = Span::locate(&content, procedure.name.0).unwrap();
    assert_eq!(name.range(), 0..13);
}

/// Check that a span lies within its parent, and that its line and column
/// agree with its offsets.
fn check_span(content: &str, span: &Span, parent: &Range<usize>) {
    let range = span.range();
    assert!(
        range.start >= parent.start && range.end <= parent.end,
        "{:?} lies outside {:?}",
        range,
        parent
    );
    assert_eq!(span.start, Location::of(content, range.start));
    assert_eq!(span.end, Location::of(content, range.end));
}

fn check_expression(content: &str, expression: &Expression, parent: &Range<usize>) {
    let span = expression.span();
    check_span(content, span, parent);

    let text = span.text(content);
    let range = span.range();

    match expression {
        Expression::Variable(identifier, _) => assert_eq!(text, identifier.0),
        Expression::Number(_, _) => {}
        Expression::String(pieces, _) => {
            assert!(text.starts_with('"') && text.ends_with('"'));
            for piece in pieces {
                if let Piece::Interpolation(inner) = piece {
                    check_expression(content, inner, &range);
                }
            }
        }
        Expression::Multiline(_, raw, _) => {
            assert!(text.starts_with("```") && text.ends_with("```"));
            assert!(text.contains(raw));
        }
        Expression::Invocation(invocation, _) => {
            assert!(text.starts_with('<'));
            for parameter in invocation
                .parameters
                .iter()
                .flatten()
            {
                check_expression(content, parameter, &range);
            }
        }
        Expression::Application(application, _) => {
            assert!(text.starts_with(
                application
                    .target
                    .0
            ));
            for parameter in &application.parameters {
                check_expression(content, parameter, &range);
            }
        }
        Expression::Foreach(_, inner, _) => {
            assert!(text.starts_with("foreach"));
            check_expression(content, inner, &range);
        }
        Expression::Repeat(inner, _) => {
            assert!(text.starts_with("repeat"));
            check_expression(content, inner, &range);
        }
        Expression::Binding(inner, _, _) => {
            assert!(text.contains('~'));
            check_expression(content, inner, &range);
        }
        Expression::Tablet(pairs, _) => {
            assert!(text.starts_with('[') && text.ends_with(']'));
            for pair in pairs {
                check_expression(content, &pair.value, &range);
            }
        }
    }
}

fn check_descriptive(content: &str, descriptive: &Descriptive, parent: &Range<usize>) {
    let span = descriptive.span();
    check_span(content, span, parent);

    let text = span.text(content);
    let range = span.range();

    match descriptive {
        // joined text reads back the same words, whatever the line breaks
        Descriptive::Text(words, _) => assert!(
            words
                .split_whitespace()
                .eq(text.split_whitespace()),
            "{:?} does not read back as {:?}",
            text,
            words
        ),
        Descriptive::CodeInline(expression, _) => {
            assert!(text.starts_with('{') && text.ends_with('}'));
            check_expression(content, expression, &range);
        }
        Descriptive::Invocation(invocation, _) => {
            assert!(text.starts_with('<'));
            for parameter in invocation
                .parameters
                .iter()
                .flatten()
            {
                check_expression(content, parameter, &range);
            }
        }
        Descriptive::Binding(inner, _, _) => {
            assert!(text.contains('~'));
            check_descriptive(content, inner, &range);
        }
    }
}

fn check_scope(content: &str, scope: &Scope, parent: &Range<usize>) {
    check_span(content, scope.span(), parent);
    let range = scope
        .span()
        .range();

    match scope {
        Scope::Step { content: paragraphs, .. } => {
            for descriptive in paragraphs
                .iter()
                .flat_map(|paragraph| paragraph.0.iter())
            {
                check_descriptive(content, descriptive, &range);
            }
        }
        Scope::CodeBlock { expression, .. } => check_expression(content, expression, &range),
        Scope::Section {
            title: Some(title), ..
        } => {
            for descriptive in &title.0 {
                check_descriptive(content, descriptive, &range);
            }
        }
        _ => {}
    }

    for child in scope.children() {
        check_scope(content, child, &range);
    }
}

#[test]
fn every_node_reads_back_its_source() {
    for file in files_in("tests/samples/") {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let document = parsing::parse(&file, &content)
            .unwrap_or_else(|e| panic!("Failed to parse file {:?}: {:?}", file, e));
        let whole = document
            .span
            .range();

        match &document.body {
            Technique::Procedures(procedures) => {
                for procedure in procedures {
                    check_span(&content, &procedure.span, &whole);
                    let range = procedure
                        .span
                        .range();

                    for descriptive in procedure
                        .description
                        .iter()
                        .flat_map(|paragraph| paragraph.0.iter())
                    {
                        check_descriptive(&content, descriptive, &range);
                    }
                    for scope in &procedure.body {
                        check_scope(&content, scope, &range);
                    }
                }
            }
            Technique::Steps(scopes) => {
                for scope in scopes {
                    check_scope(&content, scope, &whole);
                }
            }
            Technique::Empty => {}
        }
    }
}
