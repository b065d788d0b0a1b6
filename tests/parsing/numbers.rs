use technique::language::*;
use technique::parsing::lexer::{lex_numeric, Lexeme};

#[test]
fn plain_numbers() {
    assert_eq!(lex_numeric("42"), vec![Lexeme::Number(Numeric::Integral(42))]);

    assert_eq!(
        lex_numeric("2.5"),
        vec![Lexeme::Number(Numeric::Decimal(Decimal {
            number: 25,
            precision: 1
        }))]
    );
}

#[test]
fn number_with_trailing_text() {
    assert_eq!(
        lex_numeric("2.5x"),
        vec![
            Lexeme::Number(Numeric::Decimal(Decimal {
                number: 25,
                precision: 1
            })),
            Lexeme::Text("x")
        ]
    );
}

#[test]
fn quantities() {
    let lexemes = lex_numeric("9.81 m/s");
    assert_eq!(lexemes.len(), 1);

    match &lexemes[0] {
        Lexeme::Number(Numeric::Scientific(quantity)) => {
            assert_eq!(
                quantity.mantissa,
                Decimal {
                    number: 981,
                    precision: 2
                }
            );
        }
        other => panic!("expected a quantity, got {:?}", other),
    }

    let lexemes = lex_numeric("1.5 ± 0.1 × 10^3 kg");
    match &lexemes[..] {
        [Lexeme::Number(Numeric::Scientific(quantity))] => {
            assert_eq!(quantity.magnitude, Some(3));
            assert_eq!(quantity.symbol, "kg");
            assert_eq!(quantity.to_string(), "1.5 ± 0.1 × 10^3 kg");
        }
        other => panic!("expected a quantity, got {:?}", other),
    }
}

#[test]
fn not_a_number() {
    assert_eq!(lex_numeric("abc"), vec![Lexeme::Text("abc")]);
    assert!(lex_numeric("").is_empty());
}
