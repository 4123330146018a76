//! Input for `lire`
//!
//! The engine never reads from a terminal itself. Each navigation call is
//! given an [`InputProvider`], asked for one line of text per `lire`. Answers
//! are kept in an [`InputJournal`] so that a replay can feed the same answers
//! back instead of asking again (see [`ReplayPolicy`]).

use crate::interpreter::config::ReplayPolicy;
use crate::variables::value::VarType;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of answers for `lire`
pub trait InputProvider {
    /// One line of text for `name`, or `None` when input is closed. Blocks
    /// until an answer is available.
    fn prompt_for_input(&mut self, name: &str, var_type: VarType) -> Option<String>;
}

/// Answers queued in advance, for tests and batch runs
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: usize,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: 0,
        }
    }

    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    /// How many times the engine asked for input
    pub fn prompts(&self) -> usize {
        self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputProvider for ScriptedInput {
    fn prompt_for_input(&mut self, _name: &str, _var_type: VarType) -> Option<String> {
        self.prompts += 1;
        self.answers.pop_front()
    }
}

/// Reads answers from standard input, one line each
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputProvider for StdinInput {
    fn prompt_for_input(&mut self, name: &str, var_type: VarType) -> Option<String> {
        print!("{} ({}) ? ", name, var_type);
        io::stdout().flush().ok()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Answers given to `lire` during the current run, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputJournal {
    answers: Vec<String>,
    cursor: usize,
}

impl InputJournal {
    /// Start handing out answers from the first one again.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Answer for the next `lire`, from the recording or from `provider`.
    pub fn next_answer(
        &mut self,
        name: &str,
        var_type: VarType,
        policy: ReplayPolicy,
        provider: &mut dyn InputProvider,
    ) -> Option<String> {
        let answer = match self.answers.get(self.cursor) {
            Some(recorded) if policy == ReplayPolicy::Recorded => {
                log::debug!("replaying answer #{} for '{}'", self.cursor + 1, name);
                recorded.clone()
            }
            _ => {
                let fresh = provider.prompt_for_input(name, var_type)?;
                if self.cursor < self.answers.len() {
                    self.answers[self.cursor] = fresh.clone();
                } else {
                    self.answers.push(fresh.clone());
                }
                fresh
            }
        };

        self.cursor += 1;
        Some(answer)
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }
}
