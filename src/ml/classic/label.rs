use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Sentiment class of a document.
///
/// The declaration order is the fixed class ordering used for confusion-matrix
/// cells and macro averages: Positive, Neutral, Negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    /// Number of classes.
    pub const COUNT: usize = 3;

    /// All classes in their fixed order.
    pub const ALL: [Label; Label::COUNT] = [Label::Positive, Label::Neutral, Label::Negative];

    /// Position of the class in the fixed ordering.
    pub fn index(self) -> usize {
        match self {
            Label::Positive => 0,
            Label::Neutral => 1,
            Label::Negative => 2,
        }
    }

    /// Inverse of [`Label::index`].
    pub fn from_index(index: usize) -> Result<Self> {
        Label::ALL
            .get(index)
            .copied()
            .ok_or_else(|| Error::UnknownLabel(index.to_string()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Neutral => "neutral",
            Label::Negative => "negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    /// Parses the sentiment column of a labeled dataset, ignoring case and
    /// surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Label::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}
