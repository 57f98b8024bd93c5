use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{SessionError, StoreError};
use crate::leaderboard::{self, LeaderboardEntry};
use crate::placement::{Position, TargetPlacer};
use crate::record::{RecordId, ScoreRecord};
use crate::session::{Phase, SessionConfig, SessionState};
use crate::store::ScoreStore;
use crate::time_series::{reaction_series, ReactionPoint};
use crate::util::{mean_ms, ms_to_secs, std_dev_ms};

/// What the rendering layer should show next
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ShowCountdown(u32),
    DrawTarget { x: u32, y: u32, size: u32 },
    ClearTarget,
    UpdateScore(u32),
    UpdateTimeRemaining(f64),
    FlashMiss,
    ShowEndScreen(EndScreen),
}

/// Final results, shown even when the leaderboard is not
#[derive(Debug, Clone, PartialEq)]
pub struct EndScreen {
    pub final_score: u32,
    pub accuracy: f64,
    /// `None` when nothing was hit
    pub avg_reaction_secs: Option<f64>,
    pub leaderboard: LeaderboardView,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardView {
    Ready(Vec<LeaderboardEntry>),
    Unavailable(String),
}

impl LeaderboardView {
    pub fn entries(&self) -> Option<&[LeaderboardEntry]> {
        match self {
            LeaderboardView::Ready(entries) => Some(entries),
            LeaderboardView::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Hit { reaction_ms: u64 },
    Miss,
    /// Clicks outside the running phase change nothing
    Ignored,
}

#[derive(Debug)]
pub struct ClickResult {
    pub outcome: ClickOutcome,
    pub commands: Vec<RenderCommand>,
}

/// Result of one tick. `store_error` is set only on the tick that ends the
/// session, when saving the record or reading the leaderboard failed.
#[derive(Debug, Default)]
pub struct TickResult {
    pub commands: Vec<RenderCommand>,
    pub store_error: Option<StoreError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub score: u32,
    pub misses: u32,
    pub accuracy: f64,
    pub avg_reaction_ms: Option<f64>,
    pub reaction_std_dev_ms: Option<f64>,
    pub best_reaction_ms: Option<u64>,
}

/// Countdown, then a timed run of hits and misses, then a saved and ranked result.
///
/// The engine never schedules itself: the caller delivers [`tick`](Self::tick)
/// and [`click`](Self::click) one at a time. A finished engine stays in
/// [`Phase::Ended`]; play again with a new engine over the same store.
#[derive(Debug)]
pub struct SessionEngine<C: Clock, R: Rng, S: ScoreStore> {
    config: SessionConfig,
    placer: TargetPlacer,
    clock: C,
    rng: R,
    store: S,
    state: SessionState,
    phase_history: Vec<Phase>,
}

impl<C: Clock, R: Rng, S: ScoreStore> SessionEngine<C, R, S> {
    pub fn new(config: SessionConfig, clock: C, rng: R, store: S) -> Result<Self, SessionError> {
        config.validate()?;
        let placer = TargetPlacer::new(config.field_width, config.field_height, config.target_size)?;
        let state = SessionState::new(&config);

        Ok(Self {
            config,
            placer,
            clock,
            rng,
            store,
            state,
            phase_history: vec![Phase::Countdown],
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Phases in the order they were entered
    pub fn phase_history(&self) -> &[Phase] {
        &self.phase_history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn has_finished(&self) -> bool {
        self.state.phase == Phase::Ended
    }

    /// Opening commands for the countdown. A zero-length countdown starts
    /// the run immediately.
    pub fn start(&mut self) -> Vec<RenderCommand> {
        let mut commands = Vec::new();
        if self.state.phase != Phase::Countdown {
            return commands;
        }

        commands.push(RenderCommand::ClearTarget);
        if self.state.countdown_remaining == 0 {
            self.begin_running(&mut commands);
        } else {
            commands.push(RenderCommand::ShowCountdown(self.state.countdown_remaining));
        }
        commands
    }

    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult::default();

        match self.state.phase {
            Phase::Countdown => {
                self.state.countdown_remaining = self.state.countdown_remaining.saturating_sub(1);
                if self.state.countdown_remaining == 0 {
                    self.begin_running(&mut result.commands);
                } else {
                    result
                        .commands
                        .push(RenderCommand::ShowCountdown(self.state.countdown_remaining));
                }
            }
            Phase::Running => {
                let elapsed = self.elapsed_secs();
                let remaining = (self.config.duration_secs - elapsed).max(0.0);
                self.state.seconds_remaining = remaining;
                result
                    .commands
                    .push(RenderCommand::UpdateTimeRemaining(remaining));

                if remaining <= 0.0 {
                    result.store_error = self.end(&mut result.commands);
                }
            }
            Phase::Ended => {}
        }

        result
    }

    /// Classifies a click at field coordinates `(x, y)` against the current target.
    pub fn click(&mut self, x: f64, y: f64) -> ClickResult {
        let mut commands = Vec::new();
        if self.state.phase != Phase::Running {
            return ClickResult {
                outcome: ClickOutcome::Ignored,
                commands,
            };
        }

        let now = self.clock.now();
        let on_target = self
            .state
            .target
            .is_some_and(|t| t.contains(x, y, self.config.target_size));

        let outcome = if on_target {
            let spawned_at = self.state.target_spawned_at.unwrap_or(now);
            let reaction_ms = now.saturating_sub(spawned_at).as_millis() as u64;

            self.state.score += 1;
            self.state.reaction_times.push(reaction_ms);
            debug!(score = self.state.score, reaction_ms, x, y, "hit");

            let target = self.spawn_target();
            commands.push(RenderCommand::UpdateScore(self.state.score));
            commands.push(self.draw(target));

            ClickOutcome::Hit { reaction_ms }
        } else {
            self.state.misses += 1;
            debug!(misses = self.state.misses, x, y, "miss");
            commands.push(RenderCommand::FlashMiss);

            ClickOutcome::Miss
        };

        ClickResult { outcome, commands }
    }

    pub fn summary(&self) -> SessionSummary {
        let samples = &self.state.reaction_times;
        SessionSummary {
            score: self.state.score,
            misses: self.state.misses,
            accuracy: self.state.accuracy(),
            avg_reaction_ms: mean_ms(samples),
            reaction_std_dev_ms: std_dev_ms(samples),
            best_reaction_ms: samples.iter().copied().min(),
        }
    }

    /// Reaction times of this session in hit order
    pub fn reaction_series(&self) -> Vec<ReactionPoint> {
        reaction_series(&self.state.reaction_times)
    }

    fn elapsed_secs(&self) -> f64 {
        match self.state.started_at {
            Some(started) => self.clock.now().saturating_sub(started).as_secs_f64(),
            None => 0.0,
        }
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = %self.state.phase, to = %phase, "session phase change");
        self.state.phase = phase;
        self.phase_history.push(phase);
    }

    fn draw(&self, target: Position) -> RenderCommand {
        RenderCommand::DrawTarget {
            x: target.x,
            y: target.y,
            size: self.config.target_size,
        }
    }

    fn spawn_target(&mut self) -> Position {
        let target = self.placer.place(&mut self.rng);
        self.state.target = Some(target);
        self.state.target_spawned_at = Some(self.clock.now());
        target
    }

    fn begin_running(&mut self, commands: &mut Vec<RenderCommand>) {
        self.enter(Phase::Running);
        self.state.countdown_remaining = 0;
        self.state.score = 0;
        self.state.misses = 0;
        self.state.reaction_times.clear();
        self.state.seconds_remaining = self.config.duration_secs;
        self.state.started_at = Some(self.clock.now());

        let target = self.spawn_target();
        commands.push(RenderCommand::ClearTarget);
        commands.push(RenderCommand::UpdateScore(0));
        commands.push(RenderCommand::UpdateTimeRemaining(self.config.duration_secs));
        commands.push(self.draw(target));
    }

    /// Saves the result and ranks it. Returns the first store failure, if any.
    fn end(&mut self, commands: &mut Vec<RenderCommand>) -> Option<StoreError> {
        self.enter(Phase::Ended);
        self.state.target = None;
        self.state.target_spawned_at = None;
        commands.push(RenderCommand::ClearTarget);

        let record = ScoreRecord::new(
            self.clock.wall(),
            self.state.score,
            self.config.player_name.clone(),
            self.state.misses,
        );

        let mut first_error = None;
        match self.store.append(&record) {
            Ok(id) => self.state.record_id = Some(id),
            Err(e) => {
                warn!(error = %e, "could not save score record");
                first_error = Some(e);
            }
        }

        let leaderboard = match self.store.read_all() {
            Ok(records) => LeaderboardView::Ready(leaderboard::compute(
                &records,
                self.config.leaderboard_limit,
                self.state.record_id,
            )),
            Err(e) => {
                warn!(error = %e, "leaderboard unavailable");
                let view = LeaderboardView::Unavailable(e.to_string());
                first_error.get_or_insert(e);
                view
            }
        };

        let summary = self.summary();
        info!(
            score = summary.score,
            misses = summary.misses,
            accuracy = summary.accuracy,
            record = ?self.state.record_id.map(|RecordId(i)| i),
            "session finished"
        );

        commands.push(RenderCommand::ShowEndScreen(EndScreen {
            final_score: summary.score,
            accuracy: summary.accuracy,
            avg_reaction_secs: summary.avg_reaction_ms.map(ms_to_secs),
            leaderboard,
        }));

        first_error
    }
}
