//! # Introduction
//!
//! algotrace steps through programs written in the French teaching
//! pseudocode (`si … alors … sinon … fsi`, `tant que … faire … ftq`,
//! `ecrire(…)`, `lire(…)`) one line at a time, and can move backward to any
//! earlier point of the run.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Program (declaration scan, classified lines, block targets)
//!        → Interpreter (+ Evaluator, InputProvider) → Trace → TUI
//! ```
//!
//! 1. [`program`]: raw lines, the declaration scan before `DEBUT`, one
//!    [`program::Statement`] per line with its jump targets resolved.
//! 2. [`variables`]: typed cells with defaults, constants and trace flags.
//! 3. [`evaluator`]: the [`evaluator::Evaluator`] trait the engine consumes,
//!    and [`evaluator::ScriptEvaluator`], its expression implementation.
//! 4. [`interpreter`]: cursor, dispatch and rewind-and-replay navigation.
//! 5. [`trace`]: execution log, traced variable history, navigation journal.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported pseudocode
//!
//! Types: `chaine`, `entier`, `reel`, `booleen`, `caractere`.
//! Control flow: `si/alors/sinon/fsi`, `tant que/faire/ftq`, nested freely.
//! Statements: assignment `x <- expr`, `ecrire(…)`, `lire(…)`.

pub mod evaluator;
pub mod interpreter;
pub mod program;
pub mod text;
pub mod trace;
pub mod ui;
pub mod variables;
