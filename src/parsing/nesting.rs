//! Resolving step markers into a hierarchy. Depth follows the kind of
//! marker, not how far the line is indented.

use crate::language::Level;

// Lettered and roman substeps share a rank; parallel steps have none of
// their own and hang off whatever dependent step is open.
fn rank(level: Level) -> u8 {
    match level {
        Level::Numeric => 0,
        Level::Lettered | Level::Roman => 1,
        Level::Parallel => 2,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Nesting {
    stack: Vec<Level>,
}

impl Nesting {
    pub(crate) fn new() -> Nesting {
        Nesting { stack: vec![] }
    }

    pub(crate) fn current(&self) -> Option<Level> {
        self.stack
            .last()
            .copied()
    }

    /// Open a step of the given kind, closing whatever it is a sibling of or
    /// outranks. Returns the depth of the new step, 0 being top level.
    pub(crate) fn enter(&mut self, level: Level) -> usize {
        match level {
            Level::Parallel => {
                if self.current() == Some(Level::Parallel) {
                    self.stack
                        .pop();
                }
            }
            _ => {
                while let Some(top) = self.current() {
                    if rank(top) >= rank(level) {
                        self.stack
                            .pop();
                    } else {
                        break;
                    }
                }
            }
        }

        self.stack
            .push(level);

        self.stack
            .len()
            - 1
    }

    pub(crate) fn reset(&mut self) {
        self.stack
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_stack_operations() {
        let mut nesting = Nesting::new();
        assert_eq!(nesting.current(), None);

        assert_eq!(nesting.enter(Level::Numeric), 0);
        assert_eq!(nesting.enter(Level::Lettered), 1);
        assert_eq!(nesting.enter(Level::Lettered), 1);
        assert_eq!(nesting.enter(Level::Numeric), 0);
        assert_eq!(nesting.current(), Some(Level::Numeric));

        nesting.reset();
        assert_eq!(nesting.current(), None);
    }

    #[test]
    fn roman_shares_depth_with_lettered() {
        let mut nesting = Nesting::new();

        assert_eq!(nesting.enter(Level::Numeric), 0);
        assert_eq!(nesting.enter(Level::Lettered), 1);
        assert_eq!(nesting.enter(Level::Roman), 1);
        assert_eq!(nesting.enter(Level::Lettered), 1);
        assert_eq!(nesting.current(), Some(Level::Lettered));
    }

    #[test]
    fn parallel_steps() {
        let mut nesting = Nesting::new();

        // at the top level with nothing open
        assert_eq!(nesting.enter(Level::Parallel), 0);
        assert_eq!(nesting.enter(Level::Parallel), 0);

        // a numeric step replaces them
        assert_eq!(nesting.enter(Level::Numeric), 0);

        // under the innermost open dependent step, siblings of each other
        assert_eq!(nesting.enter(Level::Parallel), 1);
        assert_eq!(nesting.enter(Level::Parallel), 1);
        assert_eq!(nesting.enter(Level::Lettered), 1);
        assert_eq!(nesting.enter(Level::Parallel), 2);
        assert_eq!(nesting.enter(Level::Parallel), 2);
        assert_eq!(nesting.enter(Level::Numeric), 0);
    }
}
