use crate::interpreter::constants::{DEFAULT_LOG_CAPACITY, DEFAULT_MAX_STEPS};

/// What a replay does when it reaches a `lire` that was already answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplayPolicy {
    /// Re-use the recorded answer; only unanswered reads prompt
    #[default]
    Recorded,
    /// Prompt again every time and overwrite the recording
    Reprompt,
}

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_steps: usize,
    pub replay_policy: ReplayPolicy,
    pub log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_steps: DEFAULT_MAX_STEPS,
            replay_policy: ReplayPolicy::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}
