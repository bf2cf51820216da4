//! Trial lifecycle for the chart-reading task.
//!
//! `Idle → Running → Answered → Idle`. Every transition goes through
//! [`ChartEngine::dispatch`]; actions that do not fit the current phase are
//! reported as [`Transition::Ignored`] and leave the state untouched.

use std::time::Duration;

use api::ResponseRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::config::TaskConfig;
use crate::core::timing::InstantStamp;

/// Chart presentation shown for a trial. The discriminant is what lands in the `ID` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChartVariant {
    /// Single stacked column with a legend.
    Stacked = 0,
    /// Bars sorted by amount with value and rank labels.
    Ranked = 1,
}

impl ChartVariant {
    pub const ALL: [ChartVariant; 2] = [ChartVariant::Stacked, ChartVariant::Ranked];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Stacked),
            1 => Some(Self::Ranked),
            _ => None,
        }
    }

    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_range(0..=1) == 0 {
            Self::Stacked
        } else {
            Self::Ranked
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stacked => "Easy to spot",
            Self::Ranked => "Hard to spot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Answered,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrialState {
    pub phase: Phase,
    pub elapsed: Duration,
    /// Set exactly while `phase == Running`.
    pub last_tick: Option<InstantStamp>,
    pub variant: Option<ChartVariant>,
    pub wrong_answers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    /// Index into the configured answers.
    Answer(usize),
    /// Leave the answered screen for the next trial.
    Acknowledge,
    /// External reset, e.g. navigating away mid-trial.
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Started {
        trial_id: u64,
        variant: ChartVariant,
    },
    Incorrect {
        choice: usize,
        attempts: u32,
    },
    Completed(Completion),
    Acknowledged,
    Reset,
    Ignored(IgnoredReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub trial_id: u64,
    pub variant: ChartVariant,
    pub elapsed: Duration,
    pub wrong_answers: u32,
    pub record: ResponseRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    NotIdle(Phase),
    NotRunning(Phase),
    NotAnswered(Phase),
    UnknownChoice(usize),
}

#[derive(Debug, Clone)]
pub struct ChartEngine {
    pub state: TrialState,
    /// Bumped on every start and reset; tick loops compare against it.
    pub trial_id: u64,
    answer_count: usize,
    correct_answer: usize,
    auto_reset: bool,
    rng: StdRng,
}

impl ChartEngine {
    pub fn new(config: &TaskConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: TrialState::default(),
            trial_id: 0,
            answer_count: config.answers.len(),
            correct_answer: config.correct_answer,
            auto_reset: config.auto_reset,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn dispatch(&mut self, action: Action, now: InstantStamp) -> Transition {
        let transition = match action {
            Action::Start => self.start(now),
            Action::Answer(choice) => self.answer(choice, now),
            Action::Acknowledge => self.acknowledge(),
            Action::Reset => self.reset(),
        };
        if let Transition::Ignored(reason) = &transition {
            tracing::debug!(?action, ?reason, "action ignored");
        }
        transition
    }

    pub fn start(&mut self, now: InstantStamp) -> Transition {
        if self.state.phase != Phase::Idle {
            return Transition::Ignored(IgnoredReason::NotIdle(self.state.phase));
        }

        let variant = match self.state.variant {
            Some(variant) => variant,
            None => ChartVariant::draw(&mut self.rng),
        };
        self.trial_id += 1;
        self.state = TrialState {
            phase: Phase::Running,
            elapsed: Duration::ZERO,
            last_tick: Some(now),
            variant: Some(variant),
            wrong_answers: 0,
        };

        Transition::Started {
            trial_id: self.trial_id,
            variant,
        }
    }

    /// Accumulate the time since the previous tick. Returns whether anything was counted.
    pub fn tick(&mut self, now: InstantStamp) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }
        if let Some(last) = self.state.last_tick {
            self.state.elapsed += now.saturating_duration_since(last);
        }
        self.state.last_tick = Some(now);
        true
    }

    pub fn answer(&mut self, choice: usize, now: InstantStamp) -> Transition {
        if self.state.phase != Phase::Running {
            return Transition::Ignored(IgnoredReason::NotRunning(self.state.phase));
        }
        if choice >= self.answer_count {
            return Transition::Ignored(IgnoredReason::UnknownChoice(choice));
        }
        if choice != self.correct_answer {
            self.state.wrong_answers = self.state.wrong_answers.saturating_add(1);
            tracing::info!(
                choice,
                attempts = self.state.wrong_answers,
                "incorrect answer; trial continues"
            );
            return Transition::Incorrect {
                choice,
                attempts: self.state.wrong_answers,
            };
        }
        self.complete(now)
    }

    /// Finish the running trial with a final tick at `now`.
    pub fn complete(&mut self, now: InstantStamp) -> Transition {
        if self.state.phase != Phase::Running {
            return Transition::Ignored(IgnoredReason::NotRunning(self.state.phase));
        }
        self.tick(now);

        let finished = std::mem::take(&mut self.state);
        let variant = finished.variant.unwrap_or(ChartVariant::Stacked);
        let record = ResponseRecord::new(variant.id(), finished.elapsed.as_secs_f64());

        self.state.phase = if self.auto_reset {
            Phase::Idle
        } else {
            Phase::Answered
        };

        tracing::info!(
            trial_id = self.trial_id,
            variant = variant.id(),
            elapsed_s = record.elapsed_seconds,
            wrong_answers = finished.wrong_answers,
            "trial completed"
        );

        Transition::Completed(Completion {
            trial_id: self.trial_id,
            variant,
            elapsed: finished.elapsed,
            wrong_answers: finished.wrong_answers,
            record,
        })
    }

    pub fn acknowledge(&mut self) -> Transition {
        if self.state.phase != Phase::Answered {
            return Transition::Ignored(IgnoredReason::NotAnswered(self.state.phase));
        }
        self.state = TrialState::default();
        Transition::Acknowledged
    }

    pub fn reset(&mut self) -> Transition {
        self.state = TrialState::default();
        self.trial_id += 1;
        Transition::Reset
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new(&TaskConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRECT: usize = 1;

    fn ms(value: u64) -> InstantStamp {
        InstantStamp::from_millis(value)
    }

    fn engine() -> ChartEngine {
        ChartEngine::new(&TaskConfig {
            seed: Some(42),
            ..TaskConfig::default()
        })
    }

    fn manual_engine() -> ChartEngine {
        ChartEngine::new(&TaskConfig {
            seed: Some(42),
            auto_reset: false,
            ..TaskConfig::default()
        })
    }

    fn assert_tick_invariant(engine: &ChartEngine) {
        assert_eq!(
            engine.state.last_tick.is_some(),
            engine.state.phase == Phase::Running
        );
    }

    #[test]
    fn start_enters_running_with_a_variant() {
        let mut engine = engine();
        let transition = engine.dispatch(Action::Start, ms(0));

        assert!(matches!(transition, Transition::Started { trial_id: 1, .. }));
        assert_eq!(engine.phase(), Phase::Running);
        assert!(engine.state.variant.is_some());
        assert_eq!(engine.state.elapsed, Duration::ZERO);
        assert_tick_invariant(&engine);
    }

    #[test]
    fn elapsed_is_independent_of_tick_rate() {
        let mut coarse = engine();
        let mut fine = engine();
        coarse.start(ms(0));
        fine.start(ms(0));

        coarse.tick(ms(1_000));
        for t in (7..=1_000).step_by(7) {
            fine.tick(ms(t));
        }
        fine.tick(ms(1_000));

        assert_eq!(coarse.state.elapsed, Duration::from_secs(1));
        assert_eq!(fine.state.elapsed, coarse.state.elapsed);
    }

    #[test]
    fn repeated_ticks_at_same_instant_do_not_double_count() {
        let mut engine = engine();
        engine.start(ms(0));
        engine.tick(ms(250));
        engine.tick(ms(250));
        engine.tick(ms(250));
        assert_eq!(engine.state.elapsed, Duration::from_millis(250));
    }

    #[test]
    fn tick_outside_running_is_a_no_op() {
        let mut engine = manual_engine();
        assert!(!engine.tick(ms(100)));
        assert_eq!(engine.state, TrialState::default());

        engine.start(ms(0));
        engine.answer(CORRECT, ms(300));
        assert_eq!(engine.phase(), Phase::Answered);
        assert!(!engine.tick(ms(900)));
        assert_eq!(engine.state.elapsed, Duration::ZERO);
        assert_tick_invariant(&engine);
    }

    #[test]
    fn second_start_keeps_variant_and_elapsed() {
        let mut engine = engine();
        engine.start(ms(0));
        let variant = engine.state.variant;
        engine.tick(ms(100));

        let second = engine.dispatch(Action::Start, ms(150));
        assert_eq!(
            second,
            Transition::Ignored(IgnoredReason::NotIdle(Phase::Running))
        );
        assert_eq!(engine.trial_id, 1);
        assert_eq!(engine.state.variant, variant);

        engine.tick(ms(200));
        assert_eq!(engine.state.elapsed, Duration::from_millis(200));
    }

    #[test]
    fn start_while_answered_is_ignored() {
        let mut engine = manual_engine();
        engine.start(ms(0));
        engine.answer(CORRECT, ms(10));

        let transition = engine.start(ms(20));
        assert_eq!(
            transition,
            Transition::Ignored(IgnoredReason::NotIdle(Phase::Answered))
        );
        assert_eq!(engine.state.variant, None);
    }

    #[test]
    fn complete_records_variant_and_elapsed() {
        let mut engine = engine();
        let Transition::Started { variant, .. } = engine.start(ms(0)) else {
            panic!("expected start");
        };
        for t in (10..=500).step_by(10) {
            engine.tick(ms(t));
        }

        let Transition::Completed(done) = engine.dispatch(Action::Answer(CORRECT), ms(500)) else {
            panic!("expected completion");
        };
        assert_eq!(done.record.subject_category, variant.id());
        assert!((done.record.elapsed_seconds - 0.5).abs() < 1e-9);
        assert_eq!(done.variant, variant);

        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.state.elapsed, Duration::ZERO);
        assert_eq!(engine.state.variant, None);
        assert_tick_invariant(&engine);
    }

    #[test]
    fn completion_includes_time_since_last_tick() {
        let mut engine = manual_engine();
        engine.start(ms(0));
        engine.tick(ms(480));

        let Transition::Completed(done) = engine.answer(CORRECT, ms(500)) else {
            panic!("expected completion");
        };
        assert_eq!(done.elapsed, Duration::from_millis(500));
        assert_eq!(engine.phase(), Phase::Answered);
    }

    #[test]
    fn wrong_answers_do_not_end_the_trial() {
        let mut engine = engine();
        engine.start(ms(0));

        assert_eq!(
            engine.answer(0, ms(100)),
            Transition::Incorrect {
                choice: 0,
                attempts: 1
            }
        );
        assert_eq!(
            engine.answer(3, ms(200)),
            Transition::Incorrect {
                choice: 3,
                attempts: 2
            }
        );
        assert_eq!(engine.phase(), Phase::Running);

        let Transition::Completed(done) = engine.answer(CORRECT, ms(300)) else {
            panic!("expected completion");
        };
        assert_eq!(done.wrong_answers, 2);
        assert_eq!(done.elapsed, Duration::from_millis(300));
    }

    #[test]
    fn answers_outside_running_are_ignored() {
        let mut engine = engine();
        assert_eq!(
            engine.answer(CORRECT, ms(0)),
            Transition::Ignored(IgnoredReason::NotRunning(Phase::Idle))
        );
        engine.start(ms(0));
        assert_eq!(
            engine.answer(9, ms(10)),
            Transition::Ignored(IgnoredReason::UnknownChoice(9))
        );
    }

    #[test]
    fn acknowledge_returns_to_idle() {
        let mut engine = manual_engine();
        assert!(matches!(engine.acknowledge(), Transition::Ignored(_)));

        engine.start(ms(0));
        engine.answer(CORRECT, ms(10));
        assert_eq!(engine.dispatch(Action::Acknowledge, ms(20)), Transition::Acknowledged);
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(matches!(engine.start(ms(30)), Transition::Started { trial_id: 2, .. }));
    }

    #[test]
    fn reset_cancels_a_running_trial() {
        let mut engine = engine();
        engine.start(ms(0));
        engine.tick(ms(50));

        assert_eq!(engine.dispatch(Action::Reset, ms(60)), Transition::Reset);
        assert_eq!(engine.state, TrialState::default());
        assert_eq!(engine.trial_id, 2);
    }

    #[test]
    fn seeded_engines_draw_the_same_variants() {
        let draws = |mut engine: ChartEngine| {
            (0..8)
                .map(|i| {
                    engine.start(ms(i));
                    let variant = engine.state.variant;
                    engine.answer(CORRECT, ms(i + 1));
                    variant
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(draws(engine()), draws(engine()));
    }

    #[test]
    fn variant_ids_round_trip() {
        for variant in ChartVariant::ALL {
            assert_eq!(ChartVariant::from_id(variant.id()), Some(variant));
        }
        assert_eq!(ChartVariant::from_id(2), None);
    }
}
