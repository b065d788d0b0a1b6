//! Name resolution. The parser records the shape of invocations and
//! variable references; deciding what a name refers to is left to whoever
//! consumes the tree, through the Resolve trait.

use std::collections::HashMap;

use super::types::*;

#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a, 'i> {
    Procedure(&'a Procedure<'i>),
    Parameter(&'a Identifier<'i>),
    NotFound,
}

pub trait Resolve<'a, 'i> {
    fn resolve(&self, name: &str) -> Resolution<'a, 'i>;
}

/// A symbol table over the procedures of a Document. Parameters are only in
/// view once a procedure has been entered with `within()`, and shadow
/// procedures of the same name.
#[derive(Debug, Clone)]
pub struct Symbols<'a, 'i> {
    procedures: HashMap<&'i str, &'a Procedure<'i>>,
    parameters: &'a [Identifier<'i>],
}

impl<'a, 'i> Symbols<'a, 'i> {
    pub fn new(document: &'a Document<'i>) -> Symbols<'a, 'i> {
        let mut procedures = HashMap::new();

        if let Technique::Procedures(list) = &document.body {
            for procedure in list {
                procedures
                    .entry(procedure.name.0)
                    .or_insert(procedure);
            }
        }

        Symbols {
            procedures,
            parameters: &[],
        }
    }

    /// The view of names from inside the named procedure, or None if there
    /// is no such procedure.
    pub fn within(&self, name: &str) -> Option<Symbols<'a, 'i>> {
        let procedure: &'a Procedure<'i> = *self
            .procedures
            .get(name)?;

        Some(Symbols {
            procedures: self
                .procedures
                .clone(),
            parameters: &procedure.parameters,
        })
    }

    pub fn procedures(&self) -> impl Iterator<Item = &&'a Procedure<'i>> {
        self.procedures
            .values()
    }
}

impl<'a, 'i> Resolve<'a, 'i> for Symbols<'a, 'i> {
    fn resolve(&self, name: &str) -> Resolution<'a, 'i> {
        let parameters: &'a [Identifier<'i>] = self.parameters;
        if let Some(parameter) = parameters
            .iter()
            .find(|parameter| parameter.0 == name)
        {
            return Resolution::Parameter(parameter);
        }

        match self
            .procedures
            .get(name)
        {
            Some(procedure) => Resolution::Procedure(*procedure),
            None => Resolution::NotFound,
        }
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::language::span::Span;

    fn procedure<'i>(name: &'i str, parameters: Vec<Identifier<'i>>) -> Procedure<'i> {
        Procedure {
            name: Identifier(name),
            parameters,
            signature: None,
            title: None,
            description: vec![],
            body: vec![],
            span: Span::new("", 0, 0),
        }
    }

    #[test]
    fn resolving_names() {
        let document = Document {
            header: None,
            body: Technique::Procedures(vec![
                procedure("make_coffee", vec![Identifier("beans")]),
                procedure("grind", vec![Identifier("beans"), Identifier("grind")]),
            ]),
            span: Span::new("", 0, 0),
        };

        let symbols = Symbols::new(&document);

        assert!(matches!(
            symbols.resolve("grind"),
            Resolution::Procedure(Procedure {
                name: Identifier("grind"),
                ..
            })
        ));
        assert_eq!(symbols.resolve("beans"), Resolution::NotFound);
        assert_eq!(symbols.resolve("nothing"), Resolution::NotFound);

        let inner = symbols
            .within("make_coffee")
            .unwrap();
        assert_eq!(
            inner.resolve("beans"),
            Resolution::Parameter(&Identifier("beans"))
        );

        // a parameter shadows a procedure of the same name
        let inner = symbols
            .within("grind")
            .unwrap();
        assert_eq!(
            inner.resolve("grind"),
            Resolution::Parameter(&Identifier("grind"))
        );

        assert!(symbols
            .within("missing")
            .is_none());
    }

    #[test]
    fn bare_documents_have_no_procedures() {
        let document = Document {
            header: None,
            body: Technique::Steps(vec![]),
            span: Span::new("", 0, 0),
        };

        let symbols = Symbols::new(&document);
        assert_eq!(symbols.resolve("anything"), Resolution::NotFound);
        assert_eq!(
            symbols
                .procedures()
                .count(),
            0
        );
    }
}
