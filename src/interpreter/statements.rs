//! Statement execution
//!
//! Dispatch of one classified line, plus the two statement kinds that touch
//! variables:
//!
//! - assignments `name <- expression`
//! - calls: `ecrire`/`write` and `lire`/`read`
//!
//! Block statements live in [`super::blocks`]. Every error raised here is
//! reported (execution log plus a `warn!`) and the cursor moves on.

use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::EngineError;
use crate::interpreter::input::InputProvider;
use crate::program::Statement;
use crate::text::{fold_accents, split_top_level};
use crate::trace::EntryKind;

impl Interpreter {
    /// Execute the line under the cursor.
    pub(crate) fn step(&mut self, input: &mut dyn InputProvider) -> Flow {
        let line = self.current_line;
        let Some(statement) = self.program.statement(line).cloned() else {
            return Flow::Next;
        };
        log::debug!(
            "step {} line {}: {}",
            self.steps,
            line + 1,
            statement.construct()
        );

        match statement {
            Statement::Declaration | Statement::NoOp => Flow::Next,
            Statement::Assignment { target, expression } => {
                self.execute_assignment(line, &target, &expression);
                Flow::Next
            }
            Statement::Call { name, arguments } => {
                self.execute_call(line, &name, &arguments, input)
            }
            Statement::If {
                condition,
                else_line,
                end_line,
            } => self.enter_if(line, &condition, else_line, end_line),
            Statement::Else { header, end_line } => self.reach_else(line, header, end_line),
            Statement::EndIf { header } => self.reach_end_if(line, header),
            Statement::While {
                condition,
                end_line,
            } => self.enter_while(line, &condition, end_line),
            Statement::EndWhile { header } => self.reach_end_while(line, header),
        }
    }

    /// Append an error to the execution log; the run continues.
    pub(crate) fn report(&mut self, err: EngineError) {
        log::warn!("{}", err);
        let line = err.line().unwrap_or(self.current_line);
        self.trace
            .record(EntryKind::Error, err.to_string(), line, self.steps);
    }

    fn execute_assignment(&mut self, line: usize, target: &str, expression: &str) {
        let Some(is_constant) = self.variables.get(target).map(|v| v.is_constant()) else {
            self.report(EngineError::UnknownVariable {
                line,
                name: target.to_string(),
            });
            return;
        };
        if is_constant {
            self.report(EngineError::ConstantAssignment {
                line,
                name: target.to_string(),
            });
            return;
        }

        let value = match self.evaluator.evaluate_expression(expression) {
            Ok(value) => value,
            Err(source) => {
                self.report(EngineError::Evaluation { line, source });
                return;
            }
        };

        match self
            .variables
            .assign(target, value, self.evaluator.as_mut())
        {
            Ok(_) => self.snapshot_if_traced(target, line),
            Err(source) => self.report(EngineError::Store { line, source }),
        }
    }

    fn execute_call(
        &mut self,
        line: usize,
        name: &str,
        arguments: &str,
        input: &mut dyn InputProvider,
    ) -> Flow {
        match fold_accents(name).as_str() {
            "ecrire" | "write" => {
                self.execute_write(line, arguments);
                Flow::Next
            }
            "lire" | "read" => self.execute_read(line, arguments, input),
            _ => {
                self.report(EngineError::UnknownCall {
                    line,
                    name: name.to_string(),
                });
                Flow::Next
            }
        }
    }

    /// Evaluate each top-level argument and print their concatenation. Any
    /// failing argument cancels the whole output.
    fn execute_write(&mut self, line: usize, arguments: &str) {
        let mut output = String::new();

        for argument in split_top_level(arguments) {
            match self.evaluator.evaluate_expression(argument) {
                Ok(value) => output.push_str(&value.to_string()),
                Err(source) => {
                    self.report(EngineError::Evaluation { line, source });
                    return;
                }
            }
        }

        self.trace
            .record(EntryKind::Output, output, line, self.steps);
    }

    /// One answer per named variable, converted with the variable's type.
    /// All answers are collected before any is stored: if input closes
    /// halfway, no variable of the call changes.
    fn execute_read(
        &mut self,
        line: usize,
        arguments: &str,
        input: &mut dyn InputProvider,
    ) -> Flow {
        let mut answers = Vec::new();

        for name in split_top_level(arguments) {
            let Some((var_type, is_constant)) = self
                .variables
                .get(name)
                .map(|v| (v.var_type(), v.is_constant()))
            else {
                self.report(EngineError::UnknownVariable {
                    line,
                    name: name.to_string(),
                });
                continue;
            };
            if is_constant {
                self.report(EngineError::ConstantAssignment {
                    line,
                    name: name.to_string(),
                });
                continue;
            }

            let Some(answer) =
                self.inputs
                    .next_answer(name, var_type, self.config.replay_policy, input)
            else {
                return Flow::Stop;
            };
            answers.push((name, answer));
        }

        for (name, answer) in answers {
            self.trace.record(
                EntryKind::Input,
                format!("{} <- {}", name, answer),
                line,
                self.steps,
            );

            match self
                .variables
                .set_value(name, &answer, self.evaluator.as_mut())
            {
                Ok(_) => self.snapshot_if_traced(name, line),
                Err(source) => self.report(EngineError::Store { line, source }),
            }
        }

        Flow::Next
    }

    fn snapshot_if_traced(&mut self, name: &str, line: usize) {
        let traced = self.variables.get(name).is_some_and(|v| v.is_traced());
        if !traced {
            return;
        }
        if let Ok(snapshot) = self.variables.snapshot(name) {
            self.trace.record_snapshot(snapshot, line, self.steps);
        }
    }
}
