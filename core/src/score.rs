//! Score values and the kinds of score inputs a question can ask for.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::ScoreRangeError;

/// A user-selected score, always within `0..=100`.
///
/// The only way to obtain a `Score` is through a range-checked constructor,
/// so holding one is proof the value is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const VALID_RANGE: RangeInclusive<i64> = 0..=100;
    pub const MIN: Score = Score(0);
    pub const MAX: Score = Score(100);

    pub fn new(value: i64) -> Result<Self, ScoreRangeError> {
        if Self::VALID_RANGE.contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(ScoreRangeError(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreRangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a score input is presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScoreKind {
    /// Five smilies.
    #[default]
    Smilies5,
    /// Three smilies.
    Smilies3,
    /// Thumbs up and down.
    Thumbs,
    /// Net promoter score, 0 through 10 with labels at both ends.
    Nps {
        leading_text: String,
        trailing_text: String,
    },
}

impl ScoreKind {
    /// Wire tag stored in `scoreType`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ScoreKind::Smilies5 => "smilies5",
            ScoreKind::Smilies3 => "smilies3",
            ScoreKind::Thumbs => "thumbs",
            ScoreKind::Nps { .. } => "nps",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(Score::new(0).unwrap().value(), 0);
        assert_eq!(Score::new(100).unwrap().value(), 100);
        assert_eq!(Score::new(-1), Err(ScoreRangeError(-1)));
        assert_eq!(Score::new(101), Err(ScoreRangeError(101)));
    }

    #[test]
    fn try_from_matches_new() {
        assert_eq!(Score::try_from(42), Score::new(42));
        assert!(Score::try_from(1000).is_err());
    }

    #[test]
    fn default_kind_is_smilies5() {
        assert_eq!(ScoreKind::default(), ScoreKind::Smilies5);
        assert_eq!(ScoreKind::default().wire_name(), "smilies5");
    }
}
