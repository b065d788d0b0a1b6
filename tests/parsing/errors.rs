use technique::language::{Decimal, Descriptive, Expression, Numeric, Technique};
use technique::parsing::{parse_with_recovery, Construct, ErrorKind, ParsingError};

/// Check that parsing produces the expected error, comparing only the
/// variant and not its payload.
fn expect_error(content: &str, expected: ParsingError) {
    let result = parse_with_recovery(content);
    match result {
        Ok(_) => panic!(
            "Expected parsing to fail, but it succeeded for input: {}",
            content
        ),
        Err(errors) => {
            let found_expected = errors
                .iter()
                .any(|error| std::mem::discriminant(error) == std::mem::discriminant(&expected));

            if !found_expected {
                panic!(
                    "Expected error type like {:?} but got: {:?} for input '{}'",
                    expected, errors, content
                );
            }
        }
    }
}

#[test]
fn invalid_identifier_uppercase_start() {
    expect_error(
        r#"
Making_Coffee : Ingredients -> Coffee
        "#
        .trim_ascii(),
        ParsingError::InvalidIdentifier(0, ""),
    );
}

#[test]
fn invalid_identifier_mixed_case() {
    expect_error(
        r#"
makeCoffee : Ingredients -> Coffee
        "#
        .trim_ascii(),
        ParsingError::InvalidIdentifier(0, ""),
    );
}

#[test]
fn missing_range_in_signature() {
    expect_error(
        r#"
make_coffee : Beans ->
        "#
        .trim_ascii(),
        ParsingError::InvalidGenus(0),
    );
}

#[test]
fn invalid_genus_lowercase() {
    expect_error(
        r#"
make_coffee : beans -> Coffee
        "#
        .trim_ascii(),
        ParsingError::InvalidGenus(0),
    );
}

#[test]
fn invalid_version() {
    expect_error(
        r#"
% technique v0
        "#
        .trim_ascii(),
        ParsingError::InvalidHeader(0),
    );
}

#[test]
fn invalid_response() {
    expect_error(
        r#"
check :

1. Is it on?
    'Yes | 'No'
        "#
        .trim_ascii(),
        ParsingError::InvalidResponse(0),
    );
}

#[test]
fn invalid_attribute() {
    expect_error(
        r#"
serve :

1. Take the order
    @waiter + chef
        "#
        .trim_ascii(),
        ParsingError::InvalidAttribute(0),
    );
}

#[test]
fn invalid_invocation() {
    expect_error(
        r#"
serve :

1. Hand over to { <> }
        "#
        .trim_ascii(),
        ParsingError::InvalidInvocation(0),
    );
}

#[test]
fn trailing_text_after_number() {
    expect_error(
        r#"
measure :

1. Add <weigh>(2.5x) of flour
        "#
        .trim_ascii(),
        ParsingError::TrailingText(0, ""),
    );
}

#[test]
fn number_running_into_text_in_prose() {
    let content = "measure :\n\n1. Add { 2.5x } of flour\n";
    let document = parse_with_recovery(content).unwrap();

    let procedures = match &document.body {
        Technique::Procedures(procedures) => procedures,
        _ => panic!("expected procedures"),
    };

    let pieces: Vec<&Descriptive> = procedures[0].body[0]
        .descriptives()
        .collect();

    assert!(matches!(
        pieces[1],
        Descriptive::CodeInline(
            Expression::Number(
                Numeric::Decimal(Decimal {
                    number: 25,
                    precision: 1
                }),
                _
            ),
            _
        )
    ));
    assert!(matches!(pieces[2], Descriptive::Text(text, _) if text == "x"));
    assert!(matches!(pieces[3], Descriptive::Text(text, _) if text == " of flour"));
}

#[test]
fn number_out_of_range() {
    let content = "measure :\n\n1. Add { 99999999999999999999 } grains\n";
    let errors = parse_with_recovery(content).unwrap_err();

    assert_eq!(
        errors,
        vec![ParsingError::NumberOutOfRange(
            content
                .find('9')
                .unwrap(),
            "99999999999999999999"
        )]
    );
    assert_eq!(errors[0].kind(), ErrorKind::Lexical);
    assert_eq!(errors[0].width(), Some(20));
}

#[test]
fn unbalanced_delimiters() {
    expect_error(
        r#"
count :

1. Tally { total) }
        "#
        .trim_ascii(),
        ParsingError::Unbalanced(0, ' '),
    );
}

#[test]
fn unterminated_string() {
    let errors = parse_with_recovery("greet :\n\n1. Say { \"hello }\n").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], ParsingError::Unterminated(18, Construct::Quote));
    assert_eq!(errors[0].kind(), ErrorKind::Unterminated);
}

#[test]
fn misplaced_header() {
    expect_error(
        r#"
make :

% technique v1
        "#
        .trim_ascii(),
        ParsingError::MisplacedHeader(0),
    );
}

#[test]
fn error_kinds() {
    let errors = parse_with_recovery("1. Step\n\nmake :\n").unwrap_err();
    assert_eq!(errors[0].kind(), ErrorKind::Nesting);

    let errors = parse_with_recovery("Loose words\n").unwrap_err();
    assert_eq!(errors[0].kind(), ErrorKind::Structural);

    let errors = parse_with_recovery("1. Pay { $5 }\n").unwrap_err();
    assert_eq!(errors[0].kind(), ErrorKind::Lexical);
}

#[test]
fn errors_are_ordered() {
    let content = r#"
first :
1. Pay { $5 }

Second : A -> B
1. Fine

third :
1. { <> }
"#;
    let errors = parse_with_recovery(content).unwrap_err();

    assert_eq!(errors.len(), 3);
    let offsets: Vec<usize> = errors
        .iter()
        .map(|error| error.offset())
        .collect();
    let mut sorted = offsets.clone();
    sorted.sort();
    assert_eq!(offsets, sorted);
}
