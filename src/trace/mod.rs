//! Execution trace
//!
//! Three records are kept side by side:
//! - the execution log: rendered `ecrire` output, `lire` answers and reported
//!   errors, bounded to a fixed number of entries (oldest dropped first)
//! - the traced history: a frozen copy of a traced variable each time it
//!   changes
//! - the navigation journal: every command the user issued
//!
//! The first two describe the program run and are rebuilt by every replay.
//! The journal describes the user and is only ever appended to.
//!
//! Entries are stamped with the engine's step counter rather than wall-clock
//! time, so replaying the same commands produces identical records.

use crate::variables::store::Variable;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Output,
    Input,
    Error,
}

/// One observable action of the program
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub kind: EntryKind,
    pub text: String,
    /// Source line that produced the entry
    pub line: usize,
    /// Engine step counter when the entry was recorded
    pub step: usize,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Output => write!(f, "{}", self.text),
            EntryKind::Input => write!(f, "> {}", self.text),
            EntryKind::Error => write!(f, "! {}", self.text),
        }
    }
}

/// Frozen copy of a traced variable, taken right after it changed
#[derive(Debug, Clone, PartialEq)]
pub struct TracedSnapshot {
    pub variable: Variable,
    pub line: usize,
    pub step: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCommand {
    Advance,
    StepBack,
    JumpTo(usize),
    Restart,
    Quit,
}

impl fmt::Display for NavigationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationCommand::Advance => write!(f, "advance"),
            NavigationCommand::StepBack => write!(f, "step back"),
            NavigationCommand::JumpTo(line) => write!(f, "jump to line {}", line + 1),
            NavigationCommand::Restart => write!(f, "restart"),
            NavigationCommand::Quit => write!(f, "quit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEntry {
    /// Position in the journal, starting at 0
    pub sequence: usize,
    pub command: NavigationCommand,
    pub from_line: usize,
    pub to_line: usize,
    /// Error message when the command failed
    pub outcome: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TraceRecorder {
    log: VecDeque<TraceEntry>,
    capacity: usize,
    dropped: usize,
    history: Vec<TracedSnapshot>,
    journal: Vec<NavigationEntry>,
}

impl TraceRecorder {
    /// `capacity` bounds the execution log; it is raised to 1 if zero.
    pub fn new(capacity: usize) -> Self {
        TraceRecorder {
            log: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
            history: Vec::new(),
            journal: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: EntryKind, text: impl Into<String>, line: usize, step: usize) {
        if self.log.len() == self.capacity {
            self.log.pop_front();
            self.dropped += 1;
        }
        self.log.push_back(TraceEntry {
            kind,
            text: text.into(),
            line,
            step,
        });
    }

    pub fn record_snapshot(&mut self, variable: Variable, line: usize, step: usize) {
        self.history.push(TracedSnapshot {
            variable,
            line,
            step,
        });
    }

    pub fn record_navigation(
        &mut self,
        command: NavigationCommand,
        from_line: usize,
        to_line: usize,
        outcome: Option<String>,
    ) {
        self.journal.push(NavigationEntry {
            sequence: self.journal.len(),
            command,
            from_line,
            to_line,
            outcome,
        });
    }

    /// Forget the log and the traced history before a replay. The journal
    /// is kept.
    pub fn clear_program_trace(&mut self) {
        self.log.clear();
        self.dropped = 0;
        self.history.clear();
    }

    /// Execution log, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &TraceEntry> {
        self.log.iter()
    }

    /// The last `n` log entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<&TraceEntry> {
        let skip = self.log.len().saturating_sub(n);
        self.log.iter().skip(skip).collect()
    }

    /// Entries evicted from the log since the last replay
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn traced_history(&self) -> &[TracedSnapshot] {
        &self.history
    }

    pub fn traced_at(&self, index: usize) -> Option<&TracedSnapshot> {
        self.history.get(index)
    }

    pub fn journal(&self) -> &[NavigationEntry] {
        &self.journal
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new(crate::interpreter::constants::DEFAULT_LOG_CAPACITY)
    }
}
