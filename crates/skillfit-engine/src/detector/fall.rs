use crate::core::WorldState;

/// Samples the simulator's fallen predicate.
///
/// The detector itself is not sticky: [`FallDetector::sample`] reports the
/// predicate for the current tick only. Keeping a trial marked as fallen is
/// the harness's job. The detector only counts fallen ticks, which shows up
/// in diagnostics.
#[derive(Debug, Clone, Default)]
pub struct FallDetector {
    fallen_ticks: usize,
}

impl FallDetector {
    #[must_use]
    pub const fn new() -> Self {
        Self { fallen_ticks: 0 }
    }

    pub const fn reset(&mut self) {
        self.fallen_ticks = 0;
    }

    pub const fn sample(&mut self, world: &WorldState) -> bool {
        if world.fallen {
            self.fallen_ticks += 1;
        }
        world.fallen
    }

    /// Number of sampled ticks on which the predicate was true since the last reset.
    #[must_use]
    pub const fn fallen_ticks(&self) -> usize {
        self.fallen_ticks
    }
}
