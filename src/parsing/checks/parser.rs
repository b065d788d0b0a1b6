use super::*;

#[test]
fn magic_line() {
    let mut input = Parser::new("% technique v1", 0);
    assert_eq!(input.read_magic_line(), Ok(1));
    assert!(input.is_finished());

    let mut input = Parser::new("%technique v1", 0);
    assert_eq!(input.read_magic_line(), Ok(1));

    // missing the space before the version
    let mut input = Parser::new("%techniquev1", 0);
    assert!(input
        .read_magic_line()
        .is_err());

    // only version 1 is understood
    let mut input = Parser::new("% technique v2", 0);
    assert_eq!(input.read_magic_line(), Err(ParsingError::InvalidHeader(0)));

    let mut input = Parser::new("% technique v1.0", 0);
    assert!(input
        .read_magic_line()
        .is_err());
}

#[test]
fn license_line() {
    let mut input = Parser::new("! PD", 0);
    assert_eq!(input.read_license_line(), Ok(("PD", None)));

    let mut input = Parser::new("! MIT; (c) ACME, Inc.", 0);
    assert_eq!(input.read_license_line(), Ok(("MIT", Some("ACME, Inc."))));

    let mut input = Parser::new("! MIT; (C) 2024 ACME, Inc.", 0);
    assert_eq!(
        input.read_license_line(),
        Ok(("MIT", Some("2024 ACME, Inc.")))
    );

    let mut input = Parser::new("! CC BY-SA 3.0 [IGO]; © 2024 ACME, Inc.", 0);
    assert_eq!(
        input.read_license_line(),
        Ok(("CC BY-SA 3.0 [IGO]", Some("2024 ACME, Inc.")))
    );

    let mut input = Parser::new("! Proprietary; (c) Smith & Sons", 0);
    assert_eq!(
        input.read_license_line(),
        Ok(("Proprietary", Some("Smith & Sons")))
    );

    // nothing after the bang
    let mut input = Parser::new("!", 0);
    assert!(input
        .read_license_line()
        .is_err());
}

#[test]
fn license_line_error_offsets() {
    let mut input = Parser::new("! MIT*; (c) ACME", 100);
    assert_eq!(
        input.read_license_line(),
        Err(ParsingError::InvalidHeader(102))
    );
}

#[test]
fn template_line() {
    let mut input = Parser::new("& checklist", 0);
    assert_eq!(input.read_template_line(), Ok("checklist"));

    let mut input = Parser::new("&nasa-flight-plan,v4.0", 0);
    assert_eq!(input.read_template_line(), Ok("nasa-flight-plan,v4.0"));

    let mut input = Parser::new("& not valid!", 0);
    assert_eq!(
        input.read_template_line(),
        Err(ParsingError::InvalidHeader(2))
    );
}

#[test]
fn signatures() {
    let mut input = Parser::new("A -> B", 0);
    assert_eq!(
        input.read_signature(),
        Ok(Signature {
            domain: Genus::Single(Forma("A")),
            range: Genus::Single(Forma("B"))
        })
    );

    let mut input = Parser::new("Beans, Water -> [Coffee]", 0);
    assert_eq!(
        input.read_signature(),
        Ok(Signature {
            domain: Genus::Naked(vec![Forma("Beans"), Forma("Water")]),
            range: Genus::List(Forma("Coffee"))
        })
    );

    let mut input = Parser::new("() -> (Cup, Saucer)", 0);
    assert_eq!(
        input.read_signature(),
        Ok(Signature {
            domain: Genus::Unit,
            range: Genus::Tuple(vec![Forma("Cup"), Forma("Saucer")])
        })
    );

    // the offending side is reported
    let mut input = Parser::new("A -> b", 10);
    assert_eq!(input.read_signature(), Err(ParsingError::InvalidGenus(15)));

    let mut input = Parser::new("A B", 0);
    assert_eq!(
        input.read_signature(),
        Err(ParsingError::InvalidSignature(0))
    );
}

#[test]
fn declaration_simple() {
    let mut input = Parser::new("making_coffee :", 0);
    let (name, parameters, signature) = input
        .read_declaration()
        .unwrap();

    assert_eq!(name, Identifier("making_coffee"));
    assert!(parameters.is_empty());
    assert_eq!(signature, None);
    assert!(input.is_finished());
}

#[test]
fn declaration_with_signature() {
    let mut input = Parser::new("make_coffee : Beans, Milk -> Coffee", 0);
    let (name, parameters, signature) = input
        .read_declaration()
        .unwrap();

    assert_eq!(name, Identifier("make_coffee"));
    assert!(parameters.is_empty());
    assert_eq!(
        signature,
        Some(Signature {
            domain: Genus::Naked(vec![Forma("Beans"), Forma("Milk")]),
            range: Genus::Single(Forma("Coffee"))
        })
    );
}

#[test]
fn declaration_with_parameters() {
    let mut input = Parser::new("brew(beans, water) : Beans -> Coffee", 0);
    let (name, parameters, _) = input
        .read_declaration()
        .unwrap();

    assert_eq!(name, Identifier("brew"));
    assert_eq!(parameters, vec![Identifier("beans"), Identifier("water")]);

    let mut input = Parser::new("brew() :", 0);
    let (_, parameters, _) = input
        .read_declaration()
        .unwrap();
    assert!(parameters.is_empty());
}

#[test]
fn declaration_errors() {
    let mut input = Parser::new("Make_Coffee : A -> B", 0);
    assert_eq!(
        input.read_declaration(),
        Err(ParsingError::InvalidIdentifier(0, "Make_Coffee"))
    );

    let mut input = Parser::new("brew(beans, Water) :", 0);
    assert_eq!(
        input.read_declaration(),
        Err(ParsingError::InvalidIdentifier(12, "Water"))
    );

    let mut input = Parser::new("brew(beans, ) :", 0);
    assert!(matches!(
        input.read_declaration(),
        Err(ParsingError::InvalidParameters(_))
    ));

    let mut input = Parser::new("brew : (A) -> B", 0);
    assert_eq!(
        input.read_declaration(),
        Err(ParsingError::InvalidGenus(7))
    );

    let mut input = Parser::new("brew", 0);
    assert_eq!(
        input.read_declaration(),
        Err(ParsingError::InvalidDeclaration(0))
    );
}

#[test]
fn titles() {
    let mut input = Parser::new("# Making Coffee", 0);
    assert_eq!(input.read_title(), Ok("Making Coffee"));

    let mut input = Parser::new("#Brewing", 0);
    assert_eq!(input.read_title(), Ok("Brewing"));

    let mut input = Parser::new("#   ", 0);
    assert!(matches!(
        input.read_title(),
        Err(ParsingError::Expected(1, _))
    ));
}

#[test]
fn attributes() {
    let mut input = Parser::new("@chef", 0);
    assert_eq!(input.read_attributes(), Ok(vec![Identifier("chef")]));

    let mut input = Parser::new("@marketing + @sales", 0);
    assert_eq!(
        input.read_attributes(),
        Ok(vec![Identifier("marketing"), Identifier("sales")])
    );

    let mut input = Parser::new("@chef + waiter", 0);
    assert_eq!(
        input.read_attributes(),
        Err(ParsingError::InvalidAttribute(8))
    );

    let mut input = Parser::new("@Chef", 0);
    assert_eq!(
        input.read_attributes(),
        Err(ParsingError::InvalidIdentifier(1, "Chef"))
    );
}

#[test]
fn responses() {
    let mut input = Parser::new("'Yes' | 'No'", 0);
    assert_eq!(
        input.read_responses(),
        Ok(vec![
            Response {
                value: "Yes",
                condition: None
            },
            Response {
                value: "No",
                condition: None
            }
        ])
    );

    let mut input = Parser::new("'Yes' and equipment available | 'Not Applicable'", 0);
    assert_eq!(
        input.read_responses(),
        Ok(vec![
            Response {
                value: "Yes",
                condition: Some("and equipment available")
            },
            Response {
                value: "Not Applicable",
                condition: None
            }
        ])
    );

    let mut input = Parser::new("'Yes' | No", 0);
    assert_eq!(
        input.read_responses(),
        Err(ParsingError::InvalidResponse(8))
    );
}

#[test]
fn whitespace_handling() {
    let mut input = Parser::new(" \t\n  rest", 0);
    input.trim_whitespace();
    assert_eq!(input.entire(), "\n  rest");
    assert_eq!(input.offset, 2);

    input.trim_newlines();
    assert_eq!(input.entire(), "rest");
    assert_eq!(input.offset, 5);
}

#[test]
fn depth_limit() {
    let mut input = Parser::new("x", 0);
    for _ in 0..MAXIMUM_DEPTH {
        assert!(input
            .descend()
            .is_ok());
    }
    assert_eq!(input.descend(), Err(ParsingError::TooDeep(0)));
}
