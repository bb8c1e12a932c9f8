use chrono::{DateTime, Utc};
use serde::Serialize;
use skillfit_evaluator::{EvaluationHarness, TrialReport, strategy::TrialStrategy};
use skillfit_fitness::{FitnessSink, ScoreSummary};

/// Outcome of one `run` invocation, written with `--report`
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Timestamp when the input stream ended (ISO 8601 format)
    pub evaluated_at: DateTime<Utc>,
    /// Evaluated skill variant
    pub variant: String,
    /// Whether every trial was counted
    pub finished: bool,
    /// Mean trial score, present once the run finished
    pub fitness: Option<f64>,
    /// Whether the fitness reached the output file
    pub fitness_written: bool,
    /// Failed reset verifications, including retried ones
    pub verification_failures: usize,
    /// Statistics over the counted trial scores
    pub summary: Option<ScoreSummary>,
    /// Counted trials in order
    pub trials: Vec<TrialRecord>,
}

/// A single counted trial
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    /// Trial ordinal (0-indexed)
    pub index: usize,
    /// Course or skill label
    pub tag: String,
    pub score: f64,
    /// Why the trial got its score, e.g. `measured` or `fell`
    pub outcome: String,
    /// Simulation time at which the trial was scored
    pub completed_at: f64,
    /// Distance banked by the walk strategy
    pub distance: f64,
    /// Time measured by the stand strategy
    pub duration: f64,
    pub fell: bool,
}

impl From<&TrialReport> for TrialRecord {
    fn from(report: &TrialReport) -> Self {
        Self {
            index: report.index,
            tag: report.tag.to_owned(),
            score: report.score,
            outcome: report.outcome.to_string(),
            completed_at: report.completed_at,
            distance: report.distance,
            duration: report.duration,
            fell: report.fell,
        }
    }
}

impl RunReport {
    pub fn from_harness<S, K>(variant: impl Into<String>, harness: &EvaluationHarness<S, K>) -> Self
    where
        S: TrialStrategy,
        K: FitnessSink,
    {
        Self {
            evaluated_at: Utc::now(),
            variant: variant.into(),
            finished: harness.is_finished(),
            fitness: harness.fitness().mean(),
            fitness_written: harness.fitness().is_written(),
            verification_failures: harness.verification_failures(),
            summary: harness.summary(),
            trials: harness.reports().iter().map(TrialRecord::from).collect(),
        }
    }
}
