// Execution engine for the pseudocode interpreter

use crate::evaluator::Evaluator;
use crate::interpreter::config::EngineConfig;
use crate::interpreter::errors::EngineError;
use crate::interpreter::input::{InputJournal, InputProvider};
use crate::program::{DeclarationKind, Program, ScanError};
use crate::trace::{NavigationCommand, NavigationEntry, TraceEntry, TraceRecorder, TracedSnapshot};
use crate::variables::store::{StoreError, Variable, VariableStore};

/// Where the cursor goes after a statement ran
pub(crate) enum Flow {
    /// The next line
    Next,
    /// A resolved block target
    Jump(usize),
    /// Stay on this line and return the error to the caller
    Halt(EngineError),
    /// Input was closed: the run ends here
    Stop,
}

/// Comparable copy of everything a replay rebuilds
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub variables: Vec<Variable>,
    pub traced_history: Vec<TracedSnapshot>,
    pub execution_log: Vec<TraceEntry>,
    pub current_line: usize,
    pub steps: usize,
}

/// Steps through a [`Program`], forward by execution and backward by replay
pub struct Interpreter {
    pub(crate) program: Program,
    pub(crate) variables: VariableStore,
    pub(crate) evaluator: Box<dyn Evaluator>,
    pub(crate) trace: TraceRecorder,
    pub(crate) inputs: InputJournal,
    pub(crate) config: EngineConfig,

    pub(crate) current_line: usize,
    /// Successful advances since the start of the run
    pub(crate) steps: usize,
    /// Input closed during a `lire`
    pub(crate) halted: bool,
    pub(crate) quit: bool,

    diagnostics: Vec<ScanError>,
}

impl Interpreter {
    pub fn new(program: Program, evaluator: Box<dyn Evaluator>) -> Self {
        Self::with_config(program, evaluator, EngineConfig::default())
    }

    /// Build the variable table from the declaration scan and bind it.
    pub fn with_config(
        program: Program,
        mut evaluator: Box<dyn Evaluator>,
        config: EngineConfig,
    ) -> Self {
        let mut variables = VariableStore::new();
        let mut diagnostics = program.declarations().errors.clone();

        for decl in &program.declarations().declarations {
            let declared = match &decl.kind {
                DeclarationKind::Variable => {
                    variables.declare(&decl.name, decl.var_type, evaluator.as_mut())
                }
                DeclarationKind::Constant { literal, .. } => variables.declare_constant(
                    &decl.name,
                    decl.var_type,
                    literal,
                    evaluator.as_mut(),
                ),
            };
            if let Err(source) = declared {
                log::warn!("line {}: {}", decl.line + 1, source);
                diagnostics.push(ScanError::Rejected {
                    line: decl.line,
                    source,
                });
            }
        }

        log::info!(
            "engine ready: {} lines, {} variables, {} diagnostics",
            program.len(),
            variables.len(),
            diagnostics.len()
        );

        Interpreter {
            trace: TraceRecorder::new(config.log_capacity),
            program,
            variables,
            evaluator,
            inputs: InputJournal::default(),
            config,
            current_line: 0,
            steps: 0,
            halted: false,
            quit: false,
            diagnostics,
        }
    }

    // ===== Navigation =====

    /// Execute the line under the cursor and move to the next one or to its
    /// block target.
    pub fn advance(&mut self, input: &mut dyn InputProvider) -> Result<(), EngineError> {
        let from = self.current_line;
        let result = self.advance_once(input);
        self.journal(NavigationCommand::Advance, from, &result);
        result
    }

    /// Go back one advance by replaying the run from the start.
    pub fn step_back(&mut self, input: &mut dyn InputProvider) -> Result<(), EngineError> {
        let from = self.current_line;
        let result = if self.quit {
            Err(EngineError::ExecutionFinished)
        } else if self.steps == 0 {
            Err(EngineError::AtStart)
        } else {
            let target = self.steps - 1;
            self.replay_until(input, |engine| engine.steps >= target)
        };
        self.journal(NavigationCommand::StepBack, from, &result);
        result
    }

    /// Rewind and replay until the cursor first reaches `target` or a later
    /// line, or the run ends.
    ///
    /// The cursor is only ever placed where the replay actually stopped: a
    /// target that control flow skips over gives `UnreachableJumpTarget`,
    /// and an unterminated block met on the way gives `StructuralBlock` with
    /// the cursor on its header.
    pub fn jump_to(
        &mut self,
        target: usize,
        input: &mut dyn InputProvider,
    ) -> Result<(), EngineError> {
        let from = self.current_line;
        let result = self.jump_once(target, input);
        self.journal(NavigationCommand::JumpTo(target), from, &result);
        result
    }

    pub fn restart(&mut self, input: &mut dyn InputProvider) -> Result<(), EngineError> {
        let from = self.current_line;
        let result = self.jump_once(0, input);
        self.journal(NavigationCommand::Restart, from, &result);
        result
    }

    /// End the run; every later navigation reports `ExecutionFinished`.
    pub fn quit(&mut self) {
        self.quit = true;
        let line = self.current_line;
        self.journal(NavigationCommand::Quit, line, &Ok(()));
    }

    /// Opt a variable in or out of the traced history. `Ok(false)` for
    /// constants.
    pub fn set_traced(&mut self, name: &str, traced: bool) -> Result<bool, StoreError> {
        self.variables.set_traced(name, traced)
    }

    fn advance_once(&mut self, input: &mut dyn InputProvider) -> Result<(), EngineError> {
        if self.is_finished() {
            return Err(EngineError::ExecutionFinished);
        }
        if self.steps >= self.config.max_steps {
            return Err(EngineError::StepLimitExceeded {
                limit: self.config.max_steps,
            });
        }

        self.steps += 1;
        match self.step(input) {
            Flow::Next => self.current_line += 1,
            Flow::Jump(target) => self.current_line = target,
            Flow::Halt(err) => {
                self.steps -= 1;
                log::warn!("{}", err);
                return Err(err);
            }
            Flow::Stop => {
                log::info!("input closed at line {}, run ends", self.current_line + 1);
                self.halted = true;
            }
        }
        Ok(())
    }

    fn jump_once(&mut self, target: usize, input: &mut dyn InputProvider) -> Result<(), EngineError> {
        if self.quit {
            return Err(EngineError::ExecutionFinished);
        }
        if target > self.program.len() {
            return Err(EngineError::InvalidJumpTarget {
                target,
                len: self.program.len(),
            });
        }

        self.replay_until(input, |engine| engine.current_line >= target)?;
        if self.current_line != target {
            return Err(EngineError::UnreachableJumpTarget {
                target,
                reached: self.current_line,
            });
        }
        Ok(())
    }

    /// Reset everything a run builds: variables, evaluator bindings, log,
    /// traced history and cursor. Trace flags and recorded answers survive.
    fn rewind(&mut self) {
        self.evaluator.reset();
        self.variables.reset_all(self.evaluator.as_mut());
        self.trace.clear_program_trace();
        self.inputs.rewind();
        self.current_line = 0;
        self.steps = 0;
        self.halted = false;
    }

    fn replay_until(
        &mut self,
        input: &mut dyn InputProvider,
        done: impl Fn(&Self) -> bool,
    ) -> Result<(), EngineError> {
        self.rewind();

        while !done(self) && !self.is_finished() {
            // an unterminated block leaves the cursor on its header
            self.advance_once(input)?;
        }

        log::info!(
            "replayed {} steps, cursor on line {}",
            self.steps,
            self.current_line + 1
        );
        Ok(())
    }

    fn journal(
        &mut self,
        command: NavigationCommand,
        from: usize,
        result: &Result<(), EngineError>,
    ) {
        let outcome = result.as_ref().err().map(ToString::to_string);
        self.trace
            .record_navigation(command, from, self.current_line, outcome);
    }

    // ===== Queries =====

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Numbered source lines around the cursor
    pub fn visible_line_window(&self, radius: usize) -> Vec<(usize, &str)> {
        self.program
            .visible_window(self.current_line, radius)
            .filter_map(|index| self.program.line(index).map(|line| (index, line)))
            .collect()
    }

    pub fn traced_variable_at(&self, index: usize) -> Option<&TracedSnapshot> {
        self.trace.traced_at(index)
    }

    pub fn recent_execution_log(&self, n: usize) -> Vec<&TraceEntry> {
        self.trace.recent(n)
    }

    pub fn execution_log(&self) -> impl Iterator<Item = &TraceEntry> {
        self.trace.entries()
    }

    /// Oldest log entries evicted because the log was full
    pub fn dropped_log_entries(&self) -> usize {
        self.trace.dropped()
    }

    pub fn traced_history(&self) -> &[TracedSnapshot] {
        self.trace.traced_history()
    }

    pub fn navigation_journal(&self) -> &[NavigationEntry] {
        self.trace.journal()
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Declaration problems found while loading
    pub fn diagnostics(&self) -> &[ScanError] {
        &self.diagnostics
    }

    /// Answers recorded for `lire`, in order
    pub fn recorded_inputs(&self) -> &[String] {
        self.inputs.answers()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.quit || self.halted || self.current_line >= self.program.len()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            variables: self.variables.iter().cloned().collect(),
            traced_history: self.trace.traced_history().to_vec(),
            execution_log: self.trace.entries().cloned().collect(),
            current_line: self.current_line,
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ScriptEvaluator;
    use crate::interpreter::input::ScriptedInput;
    use crate::variables::value::Value;

    fn engine(source: &str) -> Interpreter {
        Interpreter::new(
            Program::from_source(source),
            Box::new(ScriptEvaluator::new()),
        )
    }

    #[test]
    fn starts_on_line_zero_with_defaults() {
        let engine = engine("n : entier\nDEBUT\nn <- 2\nFIN");
        assert_eq!(engine.current_line(), 0);
        assert_eq!(engine.steps(), 0);
        assert_eq!(engine.variables().get("n").unwrap().value(), &Value::Int(0));
        assert!(!engine.is_finished());
    }

    #[test]
    fn advancing_past_the_end_is_an_error() {
        let mut engine = engine("DEBUT\nFIN");
        let mut input = ScriptedInput::default();
        engine.advance(&mut input).unwrap();
        engine.advance(&mut input).unwrap();
        assert!(engine.is_finished());
        assert_eq!(engine.advance(&mut input), Err(EngineError::ExecutionFinished));
        assert_eq!(engine.steps(), 2);
    }

    #[test]
    fn step_back_at_start() {
        let mut engine = engine("DEBUT\nFIN");
        let mut input = ScriptedInput::default();
        assert_eq!(engine.step_back(&mut input), Err(EngineError::AtStart));
        assert_eq!(
            engine.navigation_journal()[0].outcome.as_deref(),
            Some("already at the start of the program")
        );
    }

    #[test]
    fn quit_blocks_navigation() {
        let mut engine = engine("DEBUT\nFIN");
        let mut input = ScriptedInput::default();
        engine.quit();
        assert!(engine.is_finished());
        assert_eq!(engine.advance(&mut input), Err(EngineError::ExecutionFinished));
        assert_eq!(engine.jump_to(0, &mut input), Err(EngineError::ExecutionFinished));
        assert_eq!(engine.navigation_journal().len(), 3);
    }

    #[test]
    fn jump_target_must_be_inside_the_program() {
        let mut engine = engine("DEBUT\nFIN");
        let mut input = ScriptedInput::default();
        assert_eq!(
            engine.jump_to(3, &mut input),
            Err(EngineError::InvalidJumpTarget { target: 3, len: 2 })
        );
        assert!(engine.jump_to(2, &mut input).is_ok());
        assert!(engine.is_finished());
    }

    #[test]
    fn window_follows_the_cursor() {
        let source: Vec<String> = (0..50).map(|i| format!("// {}", i)).collect();
        let mut engine = engine(&source.join("\n"));
        let mut input = ScriptedInput::default();
        engine.jump_to(30, &mut input).unwrap();

        let window = engine.visible_line_window(5);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0], (25, "// 25"));
    }
}
