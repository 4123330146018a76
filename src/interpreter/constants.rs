// Defaults for the execution engine

/// Advances allowed in one run, replays included, before the engine stops
/// with `StepLimitExceeded`
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Execution log entries kept before the oldest are dropped
pub const DEFAULT_LOG_CAPACITY: usize = 10_000;

/// Source lines shown on each side of the cursor
pub const DEFAULT_WINDOW_RADIUS: usize = 15;
