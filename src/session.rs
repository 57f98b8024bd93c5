use std::time::Duration;

use crate::error::SessionError;
use crate::placement::{check_bounds, Position};
use crate::record::RecordId;

/// Fixed parameters of one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub field_width: u32,
    pub field_height: u32,
    pub target_size: u32,
    /// Countdown length in ticks
    pub countdown: u32,
    pub duration_secs: f64,
    pub player_name: String,
    pub leaderboard_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            field_width: 700,
            field_height: 700,
            target_size: 10,
            countdown: 5,
            duration_secs: 15.0,
            player_name: String::new(),
            leaderboard_limit: crate::leaderboard::DEFAULT_LIMIT,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        check_bounds(self.field_width, self.field_height, self.target_size)?;
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            return Err(SessionError::InvalidDuration(self.duration_secs));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Countdown,
    Running,
    Ended,
}

/// Everything the engine mutates during a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub countdown_remaining: u32,
    pub started_at: Option<Duration>,
    pub seconds_remaining: f64,
    pub score: u32,
    pub misses: u32,
    pub target: Option<Position>,
    pub target_spawned_at: Option<Duration>,
    /// One sample per hit, in milliseconds
    pub reaction_times: Vec<u64>,
    pub record_id: Option<RecordId>,
}

impl SessionState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            phase: Phase::Countdown,
            countdown_remaining: config.countdown,
            started_at: None,
            seconds_remaining: config.duration_secs,
            score: 0,
            misses: 0,
            target: None,
            target_spawned_at: None,
            reaction_times: Vec::new(),
            record_id: None,
        }
    }

    pub fn accuracy(&self) -> f64 {
        crate::record::accuracy(self.score, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn target_must_be_smaller_than_field() {
        let config = SessionConfig {
            field_width: 10,
            target_size: 10,
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(SessionError::InvalidBounds(_)));
    }

    #[test]
    fn duration_must_be_positive() {
        let config = SessionConfig {
            duration_secs: 0.0,
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(SessionError::InvalidDuration(_)));
    }

    #[test]
    fn new_state_starts_in_countdown() {
        let state = SessionState::new(&SessionConfig::default());
        assert_eq!(state.phase, Phase::Countdown);
        assert_eq!(state.countdown_remaining, 5);
        assert_eq!(state.target, None);
        assert_eq!(state.accuracy(), 0.0);
    }
}
