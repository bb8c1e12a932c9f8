//! The tick-driven evaluation state machine.
//!
//! ```text
//! Idle ─beam─▶ Beaming ─▶ Settling ─▶ Verifying ─ok─▶ Executing ─▶ Measuring ─▶ Idle
//!   ▲                                     │                                   │
//!   └──────────── failed verification ────┘                    count == N ─▶ Finished
//! ```
//!
//! Idle and Measuring never survive a tick: entering Idle issues the beam in
//! the same tick, and a completed trial is scored, folded in and followed by
//! the next beam in the tick that observed completion.

use skillfit_engine::{Command, FallDetector, ResetVerifier, WorldState};
use skillfit_fitness::{FitnessRecord, FitnessSink, PersistError, PersistStatus, ScoreSummary};

use crate::strategy::{TrialOutcome, TrialScore, TrialStrategy};

pub use self::{retry::*, trial::*};

mod retry;
mod trial;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum EpisodePhase {
    #[display("idle")]
    Idle,
    #[display("beaming")]
    Beaming,
    #[display("settling")]
    Settling,
    #[display("verifying")]
    Verifying,
    #[display("executing")]
    Executing,
    #[display("measuring")]
    Measuring,
    #[display("finished")]
    Finished,
}

/// Record of one counted trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialReport {
    pub index: usize,
    pub tag: &'static str,
    pub score: f64,
    pub outcome: TrialOutcome,
    /// Simulation time at which the trial was scored.
    pub completed_at: f64,
    pub distance: f64,
    pub duration: f64,
    pub fell: bool,
}

/// Runs `N` trials of a strategy and writes their mean fitness once.
#[derive(Debug)]
pub struct EvaluationHarness<S, K> {
    strategy: S,
    sink: K,
    verifier: ResetVerifier,
    phase: EpisodePhase,
    trial: Option<Trial>,
    retry: VerifyRetry,
    fall_detector: FallDetector,
    fitness: FitnessRecord,
    reports: Vec<TrialReport>,
    persist_error: Option<PersistError>,
}

impl<S, K> EvaluationHarness<S, K>
where
    S: TrialStrategy,
    K: FitnessSink,
{
    /// Creates a harness in the Idle phase. The first [`tick`](Self::tick)
    /// beams the agent for trial 0.
    #[must_use]
    pub fn new(strategy: S, sink: K) -> Self {
        let verifier = ResetVerifier::new(strategy.tolerance());
        let fitness = FitnessRecord::new(strategy.trial_count());
        Self {
            strategy,
            sink,
            verifier,
            phase: EpisodePhase::Idle,
            trial: None,
            retry: VerifyRetry::new(),
            fall_detector: FallDetector::new(),
            fitness,
            reports: vec![],
            persist_error: None,
        }
    }

    /// Advances the run by one simulation step and returns its command.
    pub fn tick(&mut self, world: &WorldState) -> Command {
        match self.phase {
            EpisodePhase::Idle | EpisodePhase::Measuring => self.enter_idle(world),
            EpisodePhase::Beaming => {
                self.set_phase(EpisodePhase::Settling);
                self.settle(world)
            }
            EpisodePhase::Settling => self.settle(world),
            EpisodePhase::Verifying => self.verify(world),
            EpisodePhase::Executing => self.execute(world),
            EpisodePhase::Finished => Command::STAND,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> EpisodePhase {
        self.phase
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    #[must_use]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    #[must_use]
    pub const fn fitness(&self) -> &FitnessRecord {
        &self.fitness
    }

    /// Trial currently in progress, if any.
    #[must_use]
    pub const fn trial(&self) -> Option<&Trial> {
        self.trial.as_ref()
    }

    /// Counted trials, in order.
    #[must_use]
    pub fn reports(&self) -> &[TrialReport] {
        &self.reports
    }

    /// Failed reset verifications over the whole run, retried ones included.
    #[must_use]
    pub const fn verification_failures(&self) -> usize {
        self.retry.total_failures()
    }

    /// Error from writing the fitness, if the write failed after its retry.
    #[must_use]
    pub const fn persist_error(&self) -> Option<&PersistError> {
        self.persist_error.as_ref()
    }

    /// Summary of the counted trial scores, `None` before the first one.
    #[must_use]
    pub fn summary(&self) -> Option<ScoreSummary> {
        let scores = || self.reports.iter().map(|r| r.score);
        ScoreSummary::new(scores())
            .map(|s| s.with_penalty_floor(scores(), self.strategy.verification_penalty()))
    }

    fn set_phase(&mut self, phase: EpisodePhase) {
        tracing::debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    fn enter_idle(&mut self, world: &WorldState) -> Command {
        self.set_phase(EpisodePhase::Idle);
        if self.fitness.is_complete() {
            return self.finish();
        }

        let index = self.fitness.completed();
        let target = self.strategy.beam_target(index);
        let trial = Trial::new(index, self.strategy.trial_tag(index), target, world.time);
        self.strategy.begin_trial(&trial, world);
        self.fall_detector.reset();
        self.trial = Some(trial);

        self.set_phase(EpisodePhase::Beaming);
        Command::Beam(target)
    }

    fn settle(&mut self, world: &WorldState) -> Command {
        let settle_time = self.strategy.settle_time();
        let settled = self
            .trial
            .as_ref()
            .is_none_or(|trial| trial.elapsed(world.time) >= settle_time);
        if !settled {
            return Command::STAND;
        }
        self.set_phase(EpisodePhase::Verifying);
        self.verify(world)
    }

    fn verify(&mut self, world: &WorldState) -> Command {
        let Some(trial) = self.trial.as_mut() else {
            return self.enter_idle(world);
        };
        let verification = self.verifier.verify(trial.target(), &world.agent, world.ball);
        if verification.passed() {
            self.retry.record_success();
            trial.start_execution(world.time);
            self.set_phase(EpisodePhase::Executing);
            return Command::environment(self.strategy.begin_play_message());
        }

        let index = trial.index();
        let decision = self.retry.record_failure();
        tracing::warn!(
            strategy = self.strategy.name(),
            trial = index,
            position_error = verification.position_error,
            heading_error = verification.heading_error,
            ball_error = verification.ball_error,
            retry = decision.is_retry(),
            "reset verification failed"
        );
        match decision {
            RetryDecision::Retry => self.enter_idle(world),
            RetryDecision::Penalize => {
                let penalty = self.strategy.verification_penalty();
                self.count_trial(
                    TrialScore::penalty(penalty, TrialOutcome::VerificationFailed),
                    world,
                );
                self.enter_idle(world)
            }
        }
    }

    fn execute(&mut self, world: &WorldState) -> Command {
        let Some(trial) = self.trial.as_mut() else {
            return self.enter_idle(world);
        };
        if self.fall_detector.sample(world) {
            trial.flags_mut().fell = true;
        }
        let command = self.strategy.execute(trial, world);
        if !self.strategy.is_complete(trial, world) {
            return command;
        }
        self.set_phase(EpisodePhase::Measuring);
        self.finish_trial(world)
    }

    fn finish_trial(&mut self, world: &WorldState) -> Command {
        if let Some(trial) = &self.trial {
            let score = self.strategy.score(trial, world);
            self.count_trial(score, world);
        }
        self.enter_idle(world)
    }

    fn count_trial(&mut self, score: TrialScore, world: &WorldState) {
        let Some(trial) = self.trial.take() else {
            return;
        };
        if let Err(err) = self.fitness.record(score.score) {
            tracing::error!(trial = trial.index(), error = %err, "trial score dropped");
            return;
        }
        self.retry.reset();

        tracing::info!(
            strategy = self.strategy.name(),
            trial = trial.index(),
            tag = trial.tag(),
            score = score.score,
            outcome = %score.outcome,
            completed = self.fitness.completed(),
            total = self.fitness.total(),
            running_mean = self.fitness.running_mean(),
            fallen_ticks = self.fall_detector.fallen_ticks(),
            "trial complete"
        );
        self.reports.push(TrialReport {
            index: trial.index(),
            tag: trial.tag(),
            score: score.score,
            outcome: score.outcome,
            completed_at: world.time,
            distance: trial.distance(),
            duration: trial.duration(),
            fell: trial.flags().fell,
        });
    }

    fn finish(&mut self) -> Command {
        self.set_phase(EpisodePhase::Finished);
        if let Some(summary) = self.summary() {
            tracing::info!(
                strategy = self.strategy.name(),
                trials = summary.count,
                min = summary.min,
                max = summary.max,
                median = summary.median,
                std_dev = summary.std_dev,
                penalized = summary.penalized,
                verification_failures = self.retry.total_failures(),
                "run summary"
            );
        }
        match self.fitness.persist(&mut self.sink) {
            Ok(PersistStatus::Written(fitness)) => {
                tracing::info!(strategy = self.strategy.name(), fitness, "run finished");
            }
            Ok(PersistStatus::Pending | PersistStatus::AlreadyWritten(_)) => {}
            Err(err) => self.persist_error = Some(err),
        }
        Command::STAND
    }
}
