/// What to do after a failed reset verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RetryDecision {
    /// First failure of this trial: beam again without penalty.
    Retry,
    /// Second consecutive failure: score the trial with the verification penalty.
    Penalize,
}

/// One-retry debounce for reset verification.
///
/// The simulator occasionally drops the agent a little off the commanded
/// pose. One failure is absorbed by re-beaming; a second consecutive failure
/// of the same trial ordinal means something is actually wrong (the agent
/// cannot stand, say) and is converted into a penalty.
///
/// ```
/// use skillfit_evaluator::harness::{RetryDecision, VerifyRetry};
///
/// let mut retry = VerifyRetry::new();
/// assert_eq!(retry.record_failure(), RetryDecision::Retry);
/// assert_eq!(retry.record_failure(), RetryDecision::Penalize);
/// assert_eq!(retry.record_failure(), RetryDecision::Retry);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyRetry {
    failed_last: bool,
    total_failures: usize,
}

impl VerifyRetry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failed_last: false,
            total_failures: 0,
        }
    }

    pub const fn record_failure(&mut self) -> RetryDecision {
        self.total_failures += 1;
        if self.failed_last {
            self.failed_last = false;
            RetryDecision::Penalize
        } else {
            self.failed_last = true;
            RetryDecision::Retry
        }
    }

    pub const fn record_success(&mut self) {
        self.failed_last = false;
    }

    /// Forgets the pending failure when a trial is counted.
    pub const fn reset(&mut self) {
        self.failed_last = false;
    }

    #[must_use]
    pub const fn failed_last(&self) -> bool {
        self.failed_last
    }

    /// Failed verifications over the whole run.
    #[must_use]
    pub const fn total_failures(&self) -> usize {
        self.total_failures
    }
}
