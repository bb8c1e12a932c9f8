use std::io;

use crate::sink::FitnessSink;

/// State of the one-shot output latch.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum WriteLatch {
    /// Nothing has been written yet.
    Open,
    /// The fitness was written successfully; further writes are no-ops.
    Written(f64),
    /// Writing failed twice; the value was not persisted.
    Failed(f64),
}

/// Outcome of a successful [`FitnessRecord::persist`] call.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum PersistStatus {
    /// Fewer than the configured number of trials have completed; no I/O happened.
    Pending,
    /// The fitness was written by this call.
    Written(f64),
    /// The fitness had been written by an earlier call; no I/O happened.
    AlreadyWritten(f64),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistError {
    #[display("failed to write fitness {fitness} (retried once): {source}")]
    WriteFailed { fitness: f64, source: io::Error },
    #[display("fitness {fitness} was lost by an earlier failed write")]
    PreviouslyFailed { fitness: f64 },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("all {total} trials have already been recorded")]
pub struct RecordError {
    total: usize,
}

/// Running fitness of one evaluation run.
///
/// Tracks the sum of trial scores, how many trials completed, and whether the
/// mean has been written. The record accepts exactly `total` scores; the mean
/// is only available, and only persisted, once all of them are in.
#[derive(Debug, Clone)]
pub struct FitnessRecord {
    sum: f64,
    completed: usize,
    total: usize,
    latch: WriteLatch,
}

impl FitnessRecord {
    /// Creates an empty record expecting `total` trials.
    ///
    /// # Panics
    ///
    /// Panics if `total` is zero.
    #[must_use]
    pub fn new(total: usize) -> Self {
        assert!(total > 0, "a run needs at least one trial");
        Self {
            sum: 0.0,
            completed: 0,
            total,
            latch: WriteLatch::Open,
        }
    }

    /// Folds one completed trial's score into the record.
    pub fn record(&mut self, score: f64) -> Result<(), RecordError> {
        if self.is_complete() {
            return Err(RecordError { total: self.total });
        }
        self.sum += score;
        self.completed += 1;
        Ok(())
    }

    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.sum
    }

    #[must_use]
    pub const fn completed(&self) -> usize {
        self.completed
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed >= self.total
    }

    #[must_use]
    pub const fn latch(&self) -> WriteLatch {
        self.latch
    }

    /// Returns `true` once the fitness has been written successfully.
    #[must_use]
    pub const fn is_written(&self) -> bool {
        self.latch.is_written()
    }

    /// Mean score over all trials, available once every trial is recorded.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        self.is_complete()
            .then(|| self.sum / self.total as f64)
    }

    /// Running mean over the trials completed so far, for progress output.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn running_mean(&self) -> Option<f64> {
        (self.completed > 0).then(|| self.sum / self.completed as f64)
    }

    /// Writes the mean through `sink`, at most once per record.
    ///
    /// Before every trial is recorded this returns [`PersistStatus::Pending`]
    /// without touching the sink. A failed write is retried once; if the retry
    /// fails too the latch records the failure and every later call reports
    /// [`PersistError::PreviouslyFailed`] without further I/O.
    pub fn persist<S>(&mut self, sink: &mut S) -> Result<PersistStatus, PersistError>
    where
        S: FitnessSink + ?Sized,
    {
        match self.latch {
            WriteLatch::Written(fitness) => return Ok(PersistStatus::AlreadyWritten(fitness)),
            WriteLatch::Failed(fitness) => return Err(PersistError::PreviouslyFailed { fitness }),
            WriteLatch::Open => {}
        }
        let Some(fitness) = self.mean() else {
            return Ok(PersistStatus::Pending);
        };

        if let Err(err) = sink.write_fitness(fitness) {
            tracing::warn!(fitness, error = %err, "failed to write fitness, retrying once");
            if let Err(source) = sink.write_fitness(fitness) {
                tracing::error!(fitness, error = %source, "fitness could not be written");
                self.latch = WriteLatch::Failed(fitness);
                return Err(PersistError::WriteFailed { fitness, source });
            }
        }

        self.latch = WriteLatch::Written(fitness);
        tracing::info!(fitness, trials = self.total, "fitness written");
        Ok(PersistStatus::Written(fitness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that fails a fixed number of times before succeeding.
    #[derive(Debug, Default)]
    struct FlakySink {
        failures_left: usize,
        attempts: usize,
        written: Vec<f64>,
    }

    impl FlakySink {
        fn failing(failures: usize) -> Self {
            Self {
                failures_left: failures,
                ..Self::default()
            }
        }
    }

    impl FitnessSink for FlakySink {
        fn write_fitness(&mut self, fitness: f64) -> io::Result<()> {
            self.attempts += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(io::Error::other("disk full"));
            }
            self.written.push(fitness);
            Ok(())
        }
    }

    #[test]
    fn test_no_write_before_all_trials() {
        let mut record = FitnessRecord::new(10);
        let mut sink = FlakySink::default();
        for k in 0..10 {
            assert_eq!(record.completed(), k);
            assert!(record.persist(&mut sink).unwrap().is_pending());
            assert_eq!(sink.attempts, 0);
            record.record(1.0).unwrap();
        }
        assert!(record.persist(&mut sink).unwrap().is_written());
        assert_eq!(sink.attempts, 1);
    }

    #[test]
    fn test_persist_is_idempotent() {
        let mut record = FitnessRecord::new(2);
        record.record(3.0).unwrap();
        record.record(-1.0).unwrap();

        let mut sink = FlakySink::default();
        assert_eq!(record.persist(&mut sink).unwrap(), PersistStatus::Written(1.0));
        for _ in 0..5 {
            assert_eq!(
                record.persist(&mut sink).unwrap(),
                PersistStatus::AlreadyWritten(1.0)
            );
        }
        assert_eq!(sink.attempts, 1);
        assert_eq!(sink.written, vec![1.0]);
        assert!(record.is_written());
    }

    #[test]
    fn test_single_failure_is_retried() {
        let mut record = FitnessRecord::new(1);
        record.record(2.0).unwrap();
        let mut sink = FlakySink::failing(1);
        assert_eq!(record.persist(&mut sink).unwrap(), PersistStatus::Written(2.0));
        assert_eq!(sink.attempts, 2);
        assert_eq!(sink.written, vec![2.0]);
    }

    #[test]
    fn test_double_failure_is_surfaced() {
        let mut record = FitnessRecord::new(1);
        record.record(2.0).unwrap();
        let mut sink = FlakySink::failing(5);

        let err = record.persist(&mut sink).unwrap_err();
        assert!(matches!(err, PersistError::WriteFailed { fitness, .. } if fitness == 2.0));
        assert_eq!(sink.attempts, 2);
        assert!(record.latch().is_failed());

        let err = record.persist(&mut sink).unwrap_err();
        assert!(matches!(err, PersistError::PreviouslyFailed { .. }));
        assert_eq!(sink.attempts, 2);
        assert!(!record.is_written());
    }

    #[test]
    fn test_recording_past_total_is_rejected() {
        let mut record = FitnessRecord::new(1);
        record.record(1.0).unwrap();
        assert!(record.record(1.0).is_err());
        assert_eq!(record.completed(), 1);
        assert_eq!(record.sum(), 1.0);
    }

    #[test]
    fn test_running_mean() {
        let mut record = FitnessRecord::new(4);
        assert_eq!(record.running_mean(), None);
        record.record(1.0).unwrap();
        record.record(2.0).unwrap();
        assert_eq!(record.running_mean(), Some(1.5));
        assert_eq!(record.mean(), None);
    }
}
