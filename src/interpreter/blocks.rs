//! Conditional and loop execution (`si`/`sinon`/`fsi`, `tant que`/`ftq`).
//!
//! Jump targets were resolved when the program was loaded, so every method
//! here is a constant-time decision. A header whose terminator is missing
//! halts with `StructuralBlock` and leaves the cursor on the header; a stray
//! marker is reported and skipped.

use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::EngineError;
use crate::text::replace_words;

/// Rewrite the word operators of a condition into symbols.
pub fn rewrite_condition(condition: &str) -> String {
    replace_words(condition, &[("ou", "||"), ("et", "&&"), ("non", "!")])
}

impl Interpreter {
    /// Evaluate a condition; evaluation errors are reported and count as
    /// false.
    fn test_condition(&mut self, line: usize, condition: &str) -> bool {
        let rewritten = rewrite_condition(condition);
        match self.evaluator.evaluate_condition(&rewritten) {
            Ok(result) => result,
            Err(source) => {
                self.report(EngineError::Evaluation { line, source });
                false
            }
        }
    }

    pub(crate) fn enter_if(
        &mut self,
        line: usize,
        condition: &str,
        else_line: Option<usize>,
        end_line: Option<usize>,
    ) -> Flow {
        let Some(end) = end_line else {
            return Flow::Halt(EngineError::StructuralBlock {
                line,
                construct: "si",
            });
        };

        if self.test_condition(line, condition) {
            Flow::Next
        } else {
            Flow::Jump(else_line.unwrap_or(end) + 1)
        }
    }

    /// Reaching `sinon` means the true branch is done.
    pub(crate) fn reach_else(
        &mut self,
        line: usize,
        header: Option<usize>,
        end_line: Option<usize>,
    ) -> Flow {
        match (header, end_line) {
            (Some(_), Some(end)) => Flow::Jump(end + 1),
            _ => {
                self.report(EngineError::StructuralBlock {
                    line,
                    construct: "sinon",
                });
                Flow::Next
            }
        }
    }

    pub(crate) fn reach_end_if(&mut self, line: usize, header: Option<usize>) -> Flow {
        if header.is_none() {
            self.report(EngineError::StructuralBlock {
                line,
                construct: "fsi",
            });
        }
        Flow::Next
    }

    pub(crate) fn enter_while(
        &mut self,
        line: usize,
        condition: &str,
        end_line: Option<usize>,
    ) -> Flow {
        let Some(end) = end_line else {
            return Flow::Halt(EngineError::StructuralBlock {
                line,
                construct: "tant que",
            });
        };

        if self.test_condition(line, condition) {
            Flow::Next
        } else {
            Flow::Jump(end + 1)
        }
    }

    /// `ftq` goes back to its header, which tests the condition again.
    pub(crate) fn reach_end_while(&mut self, line: usize, header: Option<usize>) -> Flow {
        match header {
            Some(header) => Flow::Jump(header),
            None => {
                self.report(EngineError::StructuralBlock {
                    line,
                    construct: "ftq",
                });
                Flow::Next
            }
        }
    }
}
