use std::fmt;

/// Percentage of correctly answered questions, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    /// `round(100 * correct / total)`, rounding halves up.
    ///
    /// An empty test scores 0. `correct` is clamped to `total`.
    #[must_use]
    pub fn from_ratio(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Self(0);
        }
        let correct = correct.min(total) as u128;
        let total = total as u128;
        let rounded = (200 * correct + total) / (2 * total);
        // rounded <= 100 because correct <= total
        Self(u8::try_from(rounded).unwrap_or(Self::MAX))
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_three_rounds_down() {
        assert_eq!(Score::from_ratio(1, 3).value(), 33);
    }

    #[test]
    fn two_of_three_rounds_up() {
        assert_eq!(Score::from_ratio(2, 3).value(), 67);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(Score::from_ratio(1, 8).value(), 13);
        assert_eq!(Score::from_ratio(1, 2).value(), 50);
    }

    #[test]
    fn empty_test_scores_zero() {
        assert_eq!(Score::from_ratio(0, 0).value(), 0);
        assert_eq!(Score::from_ratio(5, 0).value(), 0);
    }

    #[test]
    fn matches_percentage_for_every_ratio_up_to_twenty() {
        for total in 1..=20_usize {
            for correct in 0..=total {
                let expected = (100.0 * correct as f64 / total as f64 + 0.5).floor() as u8;
                assert_eq!(
                    Score::from_ratio(correct, total).value(),
                    expected,
                    "{correct}/{total}"
                );
            }
        }
    }

    #[test]
    fn display_as_percentage() {
        assert_eq!(Score::from_ratio(3, 3).to_string(), "100%");
    }
}
