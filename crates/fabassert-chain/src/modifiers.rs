/// Direction a context-free storage check applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// Modifiers set by connectives and consumed by the next predicate.
///
/// `read` and `write` are mutually exclusive; setting one clears the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub negate: bool,
    pub only: bool,
    pub read: bool,
    pub write: bool,
}

impl Modifiers {
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn exact(mut self) -> Self {
        self.only = true;
        self
    }

    pub fn reading(mut self) -> Self {
        self.read = true;
        self.write = false;
        self
    }

    pub fn writing(mut self) -> Self {
        self.write = true;
        self.read = false;
        self
    }

    pub fn direction(&self) -> Option<Direction> {
        match (self.read, self.write) {
            (_, true) => Some(Direction::Write),
            (true, false) => Some(Direction::Read),
            (false, false) => None,
        }
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    /// Whether an observed condition satisfies the predicate under negation.
    pub fn accepts(&self, holds: bool) -> bool {
        holds != self.negate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_flips_acceptance() {
        let plain = Modifiers::default();
        assert!(plain.accepts(true));
        assert!(!plain.accepts(false));

        let negated = plain.negated();
        assert!(!negated.accepts(true));
        assert!(negated.accepts(false));
    }

    #[test]
    fn last_direction_wins() {
        assert_eq!(Modifiers::default().direction(), None);
        assert_eq!(Modifiers::default().reading().direction(), Some(Direction::Read));
        assert_eq!(
            Modifiers::default().reading().writing().direction(),
            Some(Direction::Write)
        );
        assert_eq!(
            Modifiers::default().writing().reading().direction(),
            Some(Direction::Read)
        );
    }

    #[test]
    fn default_is_clear() {
        assert!(Modifiers::default().is_clear());
        assert!(!Modifiers::default().exact().is_clear());
    }
}
