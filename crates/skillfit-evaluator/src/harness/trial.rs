use skillfit_engine::BeamRequest;

/// Failure flags latched during a trial. Once set they stay set until the
/// next trial starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialFlags {
    /// The fallen predicate was observed while executing.
    pub fell: bool,
    /// The object moved backward past the allowed limit.
    pub backward: bool,
    /// The agent touched the object before the skill was issued.
    pub contact: bool,
}

/// One evaluation attempt.
///
/// A trial is created each time the harness enters Idle and is dropped once
/// its score has been folded into the fitness record. A failed reset
/// verification also creates a fresh trial, with the same ordinal.
#[derive(Debug, Clone)]
pub struct Trial {
    index: usize,
    tag: &'static str,
    start_time: f64,
    target: BeamRequest,
    execution_start: Option<f64>,
    distance: f64,
    duration: f64,
    flags: TrialFlags,
}

impl Trial {
    #[must_use]
    pub const fn new(index: usize, tag: &'static str, target: BeamRequest, start_time: f64) -> Self {
        Self {
            index,
            tag,
            start_time,
            target,
            execution_start: None,
            distance: 0.0,
            duration: 0.0,
            flags: TrialFlags {
                fell: false,
                backward: false,
                contact: false,
            },
        }
    }

    /// Zero-based ordinal of this trial within the run.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Short label naming the trial shape, e.g. `kick` or `forward-arc`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Simulation time at which the beam was issued.
    #[must_use]
    pub const fn start_time(&self) -> f64 {
        self.start_time
    }

    #[must_use]
    pub const fn target(&self) -> &BeamRequest {
        &self.target
    }

    /// Seconds since the beam.
    #[must_use]
    pub fn elapsed(&self, time: f64) -> f64 {
        time - self.start_time
    }

    /// Seconds since the settle period ended.
    #[must_use]
    pub fn elapsed_since_settle(&self, time: f64, settle_time: f64) -> f64 {
        self.elapsed(time) - settle_time
    }

    #[must_use]
    pub const fn execution_start(&self) -> Option<f64> {
        self.execution_start
    }

    pub(crate) const fn start_execution(&mut self, time: f64) {
        self.execution_start = Some(time);
    }

    /// Distance accumulated so far, in meters.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub fn add_distance(&mut self, distance: f64) {
        self.distance += distance;
    }

    /// Time measured by the strategy (e.g. time to recover), in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    #[must_use]
    pub const fn flags(&self) -> &TrialFlags {
        &self.flags
    }

    pub const fn flags_mut(&mut self) -> &mut TrialFlags {
        &mut self.flags
    }
}
