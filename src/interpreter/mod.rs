//! Pseudocode execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`], its navigation commands and queries
//! - [`statements`]: dispatch of one line, assignments, `ecrire` and `lire`
//! - [`blocks`]: `si`/`sinon`/`fsi` and `tant que`/`ftq`
//! - [`input`]: where `lire` gets its answers
//! - [`config`] and [`constants`]: engine settings
//! - [`errors`]: engine error types
//!
//! # Execution Model
//!
//! The cursor moves forward one line per advance. Moving backward (or to an
//! arbitrary line) never undoes anything: the engine resets to the initial
//! state and replays from line 0 until it reaches the requested point. Since
//! `lire` answers are recorded and trace entries carry logical step stamps,
//! replaying the same commands rebuilds exactly the same state.

pub mod blocks;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod input;
pub mod statements;

pub use config::{EngineConfig, ReplayPolicy};
pub use engine::{EngineState, Interpreter};
pub use errors::EngineError;
pub use input::{InputJournal, InputProvider, ScriptedInput, StdinInput};
