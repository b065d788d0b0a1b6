use super::*;

fn expression(content: &str) -> Result<Expression<'_>, ParsingError<'_>> {
    let mut input = Parser::new(content, 0);
    input.read_expression()
}

fn descriptive(content: &str) -> Result<Vec<Descriptive<'_>>, ParsingError<'_>> {
    let mut input = Parser::new(content, 0);
    input.read_descriptive()
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
fn variables_and_applications() {
    assert_eq!(
        expression("count"),
        Ok(Expression::Variable(Identifier("count"), at(0, 5)))
    );

    assert_eq!(
        expression("exec(\"ls\", dir)"),
        Ok(Expression::Application(
            Application {
                target: Identifier("exec"),
                parameters: vec![
                    Expression::String(vec![Piece::Text("ls")], at(5, 9)),
                    Expression::Variable(Identifier("dir"), at(11, 14))
                ]
            },
            at(0, 15)
        ))
    );

    assert_eq!(
        expression("pizZa"),
        Err(ParsingError::InvalidIdentifier(0, "pizZa"))
    );
}

#[test]
fn numbers() {
    assert_eq!(
        expression("42"),
        Ok(Expression::Number(Numeric::Integral(42), at(0, 2)))
    );

    assert_eq!(
        expression("-0.5"),
        Ok(Expression::Number(
            Numeric::Decimal(Decimal {
                number: -5,
                precision: 1
            }),
            at(0, 4)
        ))
    );

    // a quantity has its unit
    let result = expression("5.9722 × 10^24 kg");
    match result {
        Ok(Expression::Number(Numeric::Scientific(quantity), _)) => {
            assert_eq!(quantity.symbol, "kg");
            assert_eq!(quantity.magnitude, Some(24));
        }
        _ => panic!("expected a quantity, got {:?}", result),
    }

    // within an expression, text stuck to a number is a mistake
    assert_eq!(
        expression("2.5x"),
        Err(ParsingError::TrailingText(3, "x"))
    );

    // too many digits for an i64
    assert_eq!(
        expression("99999999999999999999"),
        Err(ParsingError::NumberOutOfRange(0, "99999999999999999999"))
    );
    assert_eq!(
        expression("-12345678901234567890.5"),
        Err(ParsingError::NumberOutOfRange(0, "-12345678901234567890.5"))
    );
    assert_eq!(
        expression("-x"),
        Err(ParsingError::InvalidCharacter(0, '-'))
    );
}

#[test]
fn numbers_running_into_text() {
    assert_eq!(
        descriptive("Add { 2.5x } of flour"),
        Ok(vec![
            Descriptive::Text(Cow::Borrowed("Add "), at(0, 4)),
            Descriptive::CodeInline(
                Expression::Number(
                    Numeric::Decimal(Decimal {
                        number: 25,
                        precision: 1
                    }),
                    at(6, 9)
                ),
                at(4, 12)
            ),
            Descriptive::Text(Cow::Borrowed("x"), at(9, 10)),
            Descriptive::Text(Cow::Borrowed(" of flour"), at(12, 21))
        ])
    );

    // only when the number is all there is between the braces
    assert_eq!(
        descriptive("Add <weigh>(2.5x)"),
        Err(ParsingError::TrailingText(15, "x"))
    );
    assert_eq!(
        descriptive("Add { f(2.5x) }"),
        Err(ParsingError::TrailingText(11, "x"))
    );
}

#[test]
fn strings() {
    assert_eq!(
        expression("\"Hello\""),
        Ok(Expression::String(vec![Piece::Text("Hello")], at(0, 7)))
    );

    assert_eq!(
        expression("\"Hello {name}, welcome\""),
        Ok(Expression::String(
            vec![
                Piece::Text("Hello "),
                Piece::Interpolation(Expression::Variable(Identifier("name"), at(8, 12))),
                Piece::Text(", welcome")
            ],
            at(0, 23)
        ))
    );

    // escapes are kept as written
    assert_eq!(
        expression(r#""say \"hi\"""#),
        Ok(Expression::String(vec![Piece::Text(r#"say \"hi\""#)], at(0, 12)))
    );

    assert!(matches!(
        expression("\"unterminated"),
        Err(ParsingError::Expected(_, _))
    ));
}

#[test]
fn multiline() {
    let content = "```bash\nls -l\necho done\n```";
    assert_eq!(
        expression(content),
        Ok(Expression::Multiline(
            Some("bash"),
            "ls -l\necho done\n",
            Span::new(content, 0, content.len())
        ))
    );

    // a word on the fence line with more after it isn't a language tag
    assert_eq!(
        expression("```echo hello```"),
        Ok(Expression::Multiline(None, "echo hello", at(0, 16)))
    );

    let content = "```\nprint \\``` here\n```";
    assert_eq!(
        expression(content),
        Ok(Expression::Multiline(
            None,
            "\nprint \\``` here\n",
            Span::new(content, 0, content.len())
        ))
    );

    assert_eq!(
        expression("```bash\nls"),
        Err(ParsingError::Expected(0, "a closing ```"))
    );
}

#[test]
fn tablets() {
    assert_eq!(
        expression("[ \"Name\" = name, \"Age\" = 42 ]"),
        Ok(Expression::Tablet(
            vec![
                Pair {
                    label: "Name",
                    value: Expression::Variable(Identifier("name"), at(11, 15))
                },
                Pair {
                    label: "Age",
                    value: Expression::Number(Numeric::Integral(42), at(25, 27))
                }
            ],
            at(0, 29)
        ))
    );

    // newline separated, and labels may repeat
    let content = "[\n    \"x\" = 1\n    \"x\" = 2\n]";
    assert_eq!(
        expression(content),
        Ok(Expression::Tablet(
            vec![
                Pair {
                    label: "x",
                    value: Expression::Number(Numeric::Integral(1), Span::new(content, 12, 13))
                },
                Pair {
                    label: "x",
                    value: Expression::Number(Numeric::Integral(2), Span::new(content, 24, 25))
                }
            ],
            Span::new(content, 0, 27)
        ))
    );

    assert_eq!(
        expression("[]"),
        Ok(Expression::Tablet(vec![], at(0, 2)))
    );

    assert!(matches!(
        expression("[ \"x\" 1 ]"),
        Err(ParsingError::Expected(_, "'=' after the label"))
    ));
}

#[test]
fn invocations() {
    assert_eq!(
        expression("<make_coffee>"),
        Ok(Expression::Invocation(
            Invocation {
                target: Target::Local(Identifier("make_coffee")),
                parameters: None
            },
            at(0, 13)
        ))
    );

    assert_eq!(
        expression("<https://example.com/brew>(beans)"),
        Ok(Expression::Invocation(
            Invocation {
                target: Target::Remote(External("https://example.com/brew")),
                parameters: Some(vec![Expression::Variable(
                    Identifier("beans"),
                    at(27, 32)
                )])
            },
            at(0, 33)
        ))
    );

    // parameter lists may span lines
    let content = "<brew>(\n    beans,\n    water\n)";
    assert_eq!(
        expression(content),
        Ok(Expression::Invocation(
            Invocation {
                target: Target::Local(Identifier("brew")),
                parameters: Some(vec![
                    Expression::Variable(Identifier("beans"), Span::new(content, 12, 17)),
                    Expression::Variable(Identifier("water"), Span::new(content, 23, 28))
                ])
            },
            Span::new(content, 0, 30)
        ))
    );
}

#[test]
fn binding_chains() {
    assert_eq!(
        expression("<fetch>(x) ~ y ~ z"),
        Ok(Expression::Binding(
            Box::new(Expression::Invocation(
                Invocation {
                    target: Target::Local(Identifier("fetch")),
                    parameters: Some(vec![Expression::Variable(Identifier("x"), at(8, 9))])
                },
                at(0, 10)
            )),
            vec![Identifier("y"), Identifier("z")],
            at(0, 18)
        ))
    );

    assert_eq!(
        expression("now() ~ (hours, minutes)"),
        Ok(Expression::Binding(
            Box::new(Expression::Application(
                Application {
                    target: Identifier("now"),
                    parameters: vec![]
                },
                at(0, 5)
            )),
            vec![Identifier("hours"), Identifier("minutes")],
            at(0, 24)
        ))
    );
}

#[test]
fn foreach_and_repeat() {
    assert_eq!(
        expression("foreach design in designs"),
        Ok(Expression::Foreach(
            vec![Identifier("design")],
            Box::new(Expression::Variable(Identifier("designs"), at(18, 25))),
            at(0, 25)
        ))
    );

    assert_eq!(
        expression("foreach (key, value) in pairs ~ seen"),
        Ok(Expression::Binding(
            Box::new(Expression::Foreach(
                vec![Identifier("key"), Identifier("value")],
                Box::new(Expression::Variable(Identifier("pairs"), at(24, 29))),
                at(0, 29)
            )),
            vec![Identifier("seen")],
            at(0, 36)
        ))
    );

    assert_eq!(
        expression("repeat <check>"),
        Ok(Expression::Repeat(
            Box::new(Expression::Invocation(
                Invocation {
                    target: Target::Local(Identifier("check")),
                    parameters: None
                },
                at(7, 14)
            )),
            at(0, 14)
        ))
    );

    // a variable that merely starts with a keyword
    assert_eq!(
        expression("repeated"),
        Ok(Expression::Variable(Identifier("repeated"), at(0, 8)))
    );

    assert!(matches!(
        expression("foreach x of xs"),
        Err(ParsingError::Expected(_, "'in'"))
    ));
}

#[test]
fn nesting_limit() {
    let content = format!("{}x", "repeat ".repeat(100));
    assert!(matches!(
        expression(&content),
        Err(ParsingError::TooDeep(_))
    ));

    let content = format!("{}x{}", "f(".repeat(40), ")".repeat(40));
    assert!(matches!(
        expression(&content),
        Err(ParsingError::TooDeep(_))
    ));
}

#[test]
fn bad_characters() {
    assert_eq!(
        expression("$money"),
        Err(ParsingError::InvalidCharacter(0, '$'))
    );

    let mut input = Parser::new("{ }", 0);
    assert_eq!(
        input.read_code_inline(),
        Err(ParsingError::Expected(2, "an expression"))
    );
}

#[test]
fn prose_with_code() {
    assert_eq!(
        descriptive("Check the { temperature } now"),
        Ok(vec![
            Descriptive::Text(Cow::Borrowed("Check the "), at(0, 10)),
            Descriptive::CodeInline(
                Expression::Variable(Identifier("temperature"), at(12, 23)),
                at(10, 25)
            ),
            Descriptive::Text(Cow::Borrowed(" now"), at(25, 29))
        ])
    );

    assert_eq!(
        descriptive("Call <ask_for_help> if stuck"),
        Ok(vec![
            Descriptive::Text(Cow::Borrowed("Call "), at(0, 5)),
            Descriptive::Invocation(
                Invocation {
                    target: Target::Local(Identifier("ask_for_help")),
                    parameters: None
                },
                at(5, 19)
            ),
            Descriptive::Text(Cow::Borrowed(" if stuck"), at(19, 28))
        ])
    );

    // angle brackets that aren't a target are just text
    assert_eq!(
        descriptive("Keep x < 5 and y > 2"),
        Ok(vec![Descriptive::Text(
            Cow::Borrowed("Keep x < 5 and y > 2"),
            at(0, 20)
        )])
    );
}

#[test]
fn prose_with_binding() {
    assert_eq!(
        descriptive("Weigh { <scale>() } ~ weight first"),
        Ok(vec![
            Descriptive::Text(Cow::Borrowed("Weigh "), at(0, 6)),
            Descriptive::Binding(
                Box::new(Descriptive::CodeInline(
                    Expression::Invocation(
                        Invocation {
                            target: Target::Local(Identifier("scale")),
                            parameters: Some(vec![])
                        },
                        at(8, 17)
                    ),
                    at(6, 19)
                )),
                vec![Identifier("weight")],
                at(6, 28)
            ),
            Descriptive::Text(Cow::Borrowed(" first"), at(28, 34))
        ])
    );

    // a tilde in ordinary text is not a binding
    assert_eq!(
        descriptive("roughly ~ 5 minutes"),
        Ok(vec![Descriptive::Text(
            Cow::Borrowed("roughly ~ 5 minutes"),
            at(0, 19)
        )])
    );
}

#[test]
fn code_inline_spanning_lines() {
    let content = "{\n    exec(```bash\nls\n```)\n}";
    let mut input = Parser::new(content, 0);
    assert_eq!(
        input.read_code_inline(),
        Ok(Expression::Application(
            Application {
                target: Identifier("exec"),
                parameters: vec![Expression::Multiline(
                    Some("bash"),
                    "ls\n",
                    Span::new(content, 11, 25)
                )]
            },
            Span::new(content, 6, 26)
        ))
    );
    assert!(input.is_finished());
}

#[test]
fn locations_from_an_origin() {
    // a parser over the third line of a document, indented by four
    let origin = Location {
        offset: 20,
        line: 3,
        column: 5,
    };
    let mut input = Parser::at("{ count }", origin);

    let expression = input
        .read_code_inline()
        .unwrap();
    let span = expression.span();

    assert_eq!(span.start.offset, 22);
    assert_eq!(span.start.line, 3);
    assert_eq!(span.start.column, 7);
    assert_eq!(span.end.column, 12);

    let content = "[\n    \"x\" = 1\n]";
    let mut input = Parser::at(content, origin);
    let expression = input
        .read_expression()
        .unwrap();
    match expression {
        Expression::Tablet(pairs, span) => {
            let inner = pairs[0]
                .value
                .span();
            assert_eq!(inner.start.line, 4);
            assert_eq!(inner.start.column, 11);
            assert_eq!(span.end.line, 5);
            assert_eq!(span.end.column, 2);
        }
        _ => panic!("expected a tablet"),
    }
}

#[test]
fn mismatched_closers() {
    let mut input = Parser::new("{ total) }", 0);
    assert_eq!(
        input.read_code_inline(),
        Err(ParsingError::Unbalanced(7, ')'))
    );

    assert_eq!(
        expression("f(a, b]"),
        Err(ParsingError::Unbalanced(6, ']'))
    );
}
