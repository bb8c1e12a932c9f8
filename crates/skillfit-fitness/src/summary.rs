//! Descriptive statistics over per-trial scores.
//!
//! Purely diagnostic: the optimizer only ever sees the mean written by the
//! [`FitnessRecord`](crate::FitnessRecord). The spread is still worth logging
//! because a single penalty trial (−100) can dominate the mean of ten.

use serde::Serialize;

/// Summary of a set of trial scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    /// Number of scores summarized.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Upper median for even counts.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Number of scores at or below the given penalty floor, see [`ScoreSummary::with_penalty_floor`].
    pub penalized: usize,
}

impl ScoreSummary {
    /// Summarizes unsorted scores. Returns `None` for an empty set.
    ///
    /// ```
    /// use skillfit_fitness::ScoreSummary;
    ///
    /// let summary = ScoreSummary::new([2.0, -100.0, 4.0]).unwrap();
    /// assert_eq!(summary.min, -100.0);
    /// assert_eq!(summary.median, 2.0);
    /// assert_eq!(summary.mean, -94.0 / 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut scores = scores.into_iter().collect::<Vec<_>>();
        scores.sort_by(f64::total_cmp);

        let min = *scores.first()?;
        let max = *scores.last()?;
        let count = scores.len();
        let n = count as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let median = scores[count / 2];
        let variance = scores.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
            penalized: 0,
        })
    }

    /// Counts how many of `scores` sit at or below `floor`.
    #[must_use]
    pub fn with_penalty_floor<I>(mut self, scores: I, floor: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.penalized = scores.into_iter().filter(|s| *s <= floor).count();
        self
    }
}
