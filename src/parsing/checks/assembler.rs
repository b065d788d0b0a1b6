use super::*;
use crate::parsing::error::Construct;

fn procedures<'i>(document: &'i Document<'i>) -> &'i [Procedure<'i>] {
    match &document.body {
        Technique::Procedures(procedures) => procedures,
        _ => panic!("expected procedures, got {:?}", document.body),
    }
}

/// The span from the first occurrence of `from` up to the end of the first
/// occurrence of `to` after that.
fn between(content: &str, from: &str, to: &str) -> Span {
    let start = content
        .find(from)
        .unwrap();
    let end = start
        + content[start..]
            .find(to)
            .unwrap()
        + to.len();
    Span::new(content, start, end)
}

/// Text that appears verbatim in `content`.
fn text<'i>(content: &str, s: &'i str) -> Descriptive<'i> {
    Descriptive::Text(Cow::Borrowed(s), between(content, s, s))
}

/// Bytes `start..end` of a single line of plain ASCII.
fn at(start: usize, end: usize) -> Span {
    Span {
        start: Location {
            offset: start,
            line: 1,
            column: start + 1,
        },
        end: Location {
            offset: end,
            line: 1,
            column: end + 1,
        },
    }
}

#[test]
fn empty_document() {
    let document = parse_with_recovery("").unwrap();
    assert_eq!(document.header, None);
    assert_eq!(document.body, Technique::Empty);

    let document = parse_with_recovery("\n\n  \n").unwrap();
    assert_eq!(document.body, Technique::Empty);
}

#[test]
fn header_only() {
    let content = "% technique v1\n! MIT; (c) ACME, Inc.\n& checklist\n";
    let document = parse_with_recovery(content).unwrap();

    let header = document
        .header
        .unwrap();
    assert_eq!(header.version, 1);
    assert_eq!(header.license, Some("MIT"));
    assert_eq!(header.copyright, Some("ACME, Inc."));
    assert_eq!(header.template, Some("checklist"));
    assert_eq!(
        header
            .span
            .start
            .offset,
        0
    );
    assert_eq!(document.body, Technique::Empty);
}

#[test]
fn header_problems() {
    // no magic line
    let errors = parse_with_recovery("! MIT\n\nmake :\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::InvalidHeader(0)]);

    // repeated
    let errors = parse_with_recovery("% technique v1\n! MIT\n! PD\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::InvalidHeader(21)]);

    // out of place
    let errors = parse_with_recovery("make :\n\n% technique v1\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::MisplacedHeader(8)]);
}

#[test]
fn procedure_with_title_and_description() {
    let content = r#"
make_coffee : Beans -> Coffee

# Making Coffee

Good coffee takes
a little patience.

Be careful with { temperature }.

1. Grind the beans
2. Brew
"#;
    let document = parse_with_recovery(content).unwrap();
    let procedures = procedures(&document);
    assert_eq!(procedures.len(), 1);

    let procedure = &procedures[0];
    assert_eq!(procedure.name, Identifier("make_coffee"));
    assert_eq!(procedure.title, Some("Making Coffee"));
    assert_eq!(
        procedure.description,
        vec![
            Paragraph(vec![Descriptive::Text(
                Cow::Owned("Good coffee takes a little patience.".to_string()),
                between(content, "Good", "patience.")
            )]),
            Paragraph(vec![
                text(content, "Be careful with "),
                Descriptive::CodeInline(
                    Expression::Variable(
                        Identifier("temperature"),
                        between(content, "temperature", "temperature")
                    ),
                    between(content, "{ temperature", "}")
                ),
                Descriptive::Text(Cow::Borrowed("."), between(content, ".\n\n1.", ".")),
            ]),
        ]
    );
    assert_eq!(
        procedure
            .body
            .len(),
        2
    );
}

#[test]
fn nested_steps() {
    let content = r#"
1. Prepare
    a. Gather tools
    b. Clean the bench
        - Wipe
        - Dry
2. Build
    i. Frame
"#;
    let document = parse_with_recovery(content).unwrap();

    let steps = match &document.body {
        Technique::Steps(steps) => steps,
        _ => panic!("expected steps"),
    };
    assert_eq!(steps.len(), 2);

    let first = steps[0].children();
    assert_eq!(first.len(), 2);
    assert!(matches!(
        first[1],
        Scope::Step {
            level: Level::Lettered,
            ordinal: "b",
            ..
        }
    ));

    let parallel = first[1].children();
    assert_eq!(parallel.len(), 2);
    assert!(matches!(
        parallel[0],
        Scope::Step {
            level: Level::Parallel,
            ..
        }
    ));

    let second = steps[1].children();
    assert_eq!(second.len(), 1);
    assert!(matches!(
        second[0],
        Scope::Step {
            level: Level::Roman,
            ordinal: "i",
            ..
        }
    ));
}

#[test]
fn continuations_join() {
    let content = "1. Do the first\n   part then the\n   rest\n\n   A second paragraph.\n";
    let document = parse_with_recovery(content).unwrap();

    let steps = match &document.body {
        Technique::Steps(steps) => steps,
        _ => panic!("expected steps"),
    };

    match &steps[0] {
        Scope::Step { content: body, .. } => {
            assert_eq!(
                body,
                &vec![
                    Paragraph(vec![Descriptive::Text(
                        Cow::Owned("Do the first part then the rest".to_string()),
                        between(content, "Do", "rest")
                    )]),
                    Paragraph(vec![text(content, "A second paragraph.")]),
                ]
            );
        }
        _ => panic!("expected a step"),
    }
}

#[test]
fn joining_around_code() {
    let code = || {
        Descriptive::CodeInline(
            Expression::Variable(Identifier("x"), at(8, 9)),
            at(6, 11),
        )
    };

    let mut paragraph = Paragraph(vec![Descriptive::Text(Cow::Borrowed("Check"), at(0, 5))]);
    join(&mut paragraph, vec![code()]);
    join(
        &mut paragraph,
        vec![Descriptive::Text(Cow::Borrowed("then stop"), at(12, 21))],
    );

    assert_eq!(
        paragraph,
        Paragraph(vec![
            Descriptive::Text(Cow::Owned("Check ".to_string()), at(0, 5)),
            code(),
            Descriptive::Text(Cow::Owned(" then stop".to_string()), at(12, 21)),
        ])
    );

    // between two pieces of code, the space spans the line break
    let mut paragraph = Paragraph(vec![code()]);
    let invocation = Descriptive::Invocation(
        Invocation {
            target: Target::Local(Identifier("next")),
            parameters: None,
        },
        at(14, 20),
    );
    join(&mut paragraph, vec![invocation]);

    assert_eq!(
        paragraph.0[1],
        Descriptive::Text(Cow::Borrowed(" "), at(11, 14))
    );
    assert_eq!(
        paragraph
            .0
            .len(),
        3
    );
}

#[test]
fn attributes_responses_and_code() {
    let content = r#"
inspect :

1. Check the seals
    @engineer + @pilot
    'Yes' | 'No'
    { <record>(seals) }
"#;
    let document = parse_with_recovery(content).unwrap();
    let procedure = &procedures(&document)[0];

    let subscopes = procedure.body[0].children();
    assert_eq!(subscopes.len(), 3);
    assert!(matches!(subscopes[0], Scope::Attribute { .. }));
    assert!(matches!(subscopes[1], Scope::Response { .. }));
    assert!(matches!(subscopes[2], Scope::CodeBlock { .. }));
}

#[test]
fn sections() {
    let content = r#"
I. Preparation
1. Wash hands
2. Gown up
II. Procedure
1. Incision
"#;
    let document = parse_with_recovery(content).unwrap();

    let scopes = match &document.body {
        Technique::Steps(scopes) => scopes,
        _ => panic!("expected steps"),
    };
    assert_eq!(scopes.len(), 2);

    match &scopes[0] {
        Scope::Section {
            numeral,
            title,
            body,
            ..
        } => {
            assert_eq!(*numeral, "I");
            assert_eq!(
                title,
                &Some(Paragraph(vec![text(content, "Preparation")]))
            );
            assert_eq!(body.len(), 2);
        }
        _ => panic!("expected a section"),
    }
    assert_eq!(scopes[1].children().len(), 1);
}

#[test]
fn mixed_modes() {
    let errors = parse_with_recovery("1. Step\n\nmake :\n1. Other\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::MixedModes(9)]);
}

#[test]
fn duplicate_procedures() {
    let errors = parse_with_recovery("make :\n1. A\n\nmake :\n1. B\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::DuplicateProcedure(13, "make")]);
}

#[test]
fn misplaced_title() {
    let errors = parse_with_recovery("make :\n1. A\n# Late\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::MisplacedTitle(12)]);

    let errors = parse_with_recovery("# Orphan\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::MisplacedTitle(0)]);
}

#[test]
fn stray_text() {
    let errors = parse_with_recovery("Some words\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::UnexpectedText(0)]);

    // indented text with no step before it
    let errors = parse_with_recovery("make :\n@chef\n   loose\n").unwrap_err();
    assert_eq!(errors, vec![ParsingError::ContinuationWithoutStep(13)]);
}

#[test]
fn unterminated_construct() {
    let content = "make :\n1. Run { exec(```bash\nls\n";
    let errors = parse_with_recovery(content).unwrap_err();

    assert_eq!(
        errors,
        vec![ParsingError::Unterminated(21, Construct::Fence)]
    );
}

#[test]
fn recovery_reports_each_procedure() {
    let content = r#"
first :
1. Fine

second :
1. Broken { $ }
2. Never looked at { $ }

third :
1. Also { pizZa }
"#;
    let errors = parse_with_recovery(content).unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ParsingError::InvalidCharacter(_, '$')));
    assert!(matches!(
        errors[1],
        ParsingError::InvalidIdentifier(_, "pizZa")
    ));
}

#[test]
fn recovery_in_bare_steps() {
    let content = "1. Broken { $ }\n    a. skipped { $ }\n2. Fine\n3. { Pizza }\n";
    let errors = parse_with_recovery(content).unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ParsingError::InvalidCharacter(12, '$')));
    assert!(matches!(errors[1], ParsingError::InvalidCharacter(_, 'P')));
}

#[test]
fn spans_cover_scopes() {
    let content = "make :\n1. One\n   more\n2. Two\n";
    let document = parse_with_recovery(content).unwrap();

    let procedure = &procedures(&document)[0];
    assert_eq!(
        procedure
            .span
            .range(),
        0..28
    );

    let first = procedure.body[0].span();
    assert_eq!(first.text(content), "1. One\n   more");
    assert_eq!(first.start.line, 2);
    assert_eq!(first.end.line, 3);

    assert_eq!(
        document
            .span
            .range(),
        0..content.len()
    );
}

#[test]
fn colons_in_description() {
    let content = "make :\n\nwarning: Hot water ahead.\n\n1. Pour\n";
    let document = parse_with_recovery(content).unwrap();

    let procedure = &procedures(&document)[0];
    assert_eq!(
        procedure.description,
        vec![Paragraph(vec![text(content, "warning: Hot water ahead.")])]
    );
    assert_eq!(
        procedure
            .body
            .len(),
        1
    );
}

#[test]
fn spans_locate_descriptives() {
    let content = "make :\n\n1. Pour { amount } into\n   the { vessel }\n";
    let document = parse_with_recovery(content).unwrap();
    let procedure = &procedures(&document)[0];

    let pieces: Vec<&str> = procedure.body[0]
        .descriptives()
        .map(|descriptive| {
            descriptive
                .span()
                .text(content)
        })
        .collect();

    assert_eq!(
        pieces,
        vec!["Pour ", "{ amount }", " into\n   the ", "{ vessel }"]
    );

    match procedure.body[0]
        .descriptives()
        .nth(3)
    {
        Some(Descriptive::CodeInline(expression, span)) => {
            assert_eq!(
                expression
                    .span()
                    .text(content),
                "vessel"
            );
            assert_eq!(span.start.line, 4);
            assert_eq!(span.start.column, 8);
        }
        other => panic!("expected inline code, got {:?}", other),
    };
}
