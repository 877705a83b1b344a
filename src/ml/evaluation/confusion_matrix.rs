use std::fmt;

use crate::error::Result;
use crate::ml::classic::label::Label;

/// Accumulates (gold, predicted) outcomes for one evaluation pass.
///
/// Cells are keyed directly by label, so a pair that never occurs simply
/// stays at zero.
#[derive(Debug, Clone, Default)]
pub struct ConfusionMatrixBuilder {
    counts: [[usize; Label::COUNT]; Label::COUNT],
}

impl ConfusionMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the `(gold, predicted)` cell.
    pub fn record(&mut self, gold: Label, predicted: Label) {
        self.counts[gold.index()][predicted.index()] += 1;
    }

    /// Records an outcome given as dataset label strings.
    ///
    /// # Errors
    ///
    /// `UnknownLabel` if either string is not one of the three classes. The
    /// matrix is left untouched in that case.
    pub fn record_raw(&mut self, gold: &str, predicted: &str) -> Result<()> {
        let gold: Label = gold.parse()?;
        let predicted: Label = predicted.parse()?;
        self.record(gold, predicted);
        Ok(())
    }

    /// Freezes the counts.
    pub fn finish(self) -> ConfusionMatrix {
        ConfusionMatrix {
            counts: self.counts,
        }
    }
}

/// A finalized 3x3 count table, rows = gold class, columns = predicted class,
/// both in [`Label::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    counts: [[usize; Label::COUNT]; Label::COUNT],
}

impl ConfusionMatrix {
    /// Builds a matrix from an iterator of `(gold, predicted)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Label, Label)>,
    {
        let mut builder = ConfusionMatrixBuilder::new();
        for (gold, predicted) in pairs {
            builder.record(gold, predicted);
        }
        builder.finish()
    }

    pub fn get(&self, gold: Label, predicted: Label) -> usize {
        self.counts[gold.index()][predicted.index()]
    }

    pub fn counts(&self) -> &[[usize; Label::COUNT]; Label::COUNT] {
        &self.counts
    }

    /// Correct predictions for `label` (the diagonal cell).
    pub fn true_positives(&self, label: Label) -> usize {
        self.get(label, label)
    }

    /// Number of examples whose gold class is `label` (row sum).
    pub fn gold_total(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    /// Number of examples predicted as `label` (column sum).
    pub fn predicted_total(&self, label: Label) -> usize {
        self.counts.iter().map(|row| row[label.index()]).sum()
    }

    /// Sum of the diagonal.
    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|&l| self.true_positives(l)).sum()
    }

    /// Sum of all nine cells.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<18}", "gold \\ predicted")?;
        for label in Label::ALL {
            write!(f, "{:>10}", label.as_str())?;
        }
        for gold in Label::ALL {
            writeln!(f)?;
            write!(f, "{:<18}", gold.as_str())?;
            for predicted in Label::ALL {
                write!(f, "{:>10}", self.get(gold, predicted))?;
            }
        }
        Ok(())
    }
}
