//! Block resolution
//!
//! Pairs `si`/`sinon`/`fsi` and `tant que`/`ftq` with a block stack, so blocks
//! may nest in any combination. A marker only closes the innermost open block
//! of its own kind; anything else is stray and keeps `header: None`. Headers
//! still open at the end of the program keep `end_line: None`.

use super::statement::Statement;

#[derive(Debug, Clone, Copy)]
enum OpenBlock {
    If { line: usize, else_line: Option<usize> },
    While { line: usize },
}

/// Fill in every jump target of `statements`.
pub fn resolve_blocks(statements: &mut [Statement]) {
    let mut stack: Vec<OpenBlock> = Vec::new();

    for index in 0..statements.len() {
        match statements[index] {
            Statement::If { .. } => stack.push(OpenBlock::If {
                line: index,
                else_line: None,
            }),

            Statement::While { .. } => stack.push(OpenBlock::While { line: index }),

            Statement::Else { .. } => {
                if let Some(OpenBlock::If { line, else_line }) = stack.last_mut() {
                    if else_line.is_none() {
                        *else_line = Some(index);
                        statements[index] = Statement::Else {
                            header: Some(*line),
                            end_line: None,
                        };
                    }
                }
            }

            Statement::EndIf { .. } => {
                if let Some(&OpenBlock::If { line, else_line }) = stack.last() {
                    stack.pop();
                    close_if(statements, line, else_line, index);
                }
            }

            Statement::EndWhile { .. } => {
                if let Some(&OpenBlock::While { line }) = stack.last() {
                    stack.pop();
                    if let Statement::While { end_line, .. } = &mut statements[line] {
                        *end_line = Some(index);
                    }
                    statements[index] = Statement::EndWhile { header: Some(line) };
                }
            }

            _ => {}
        }
    }

    // Unterminated headers: an `if` that found its `sinon` still points at it
    for open in stack {
        if let OpenBlock::If {
            line,
            else_line: Some(else_index),
        } = open
        {
            if let Statement::If { else_line, .. } = &mut statements[line] {
                *else_line = Some(else_index);
            }
        }
    }
}

fn close_if(statements: &mut [Statement], header: usize, else_index: Option<usize>, end: usize) {
    if let Statement::If {
        else_line,
        end_line,
        ..
    } = &mut statements[header]
    {
        *else_line = else_index;
        *end_line = Some(end);
    }

    if let Some(else_index) = else_index {
        statements[else_index] = Statement::Else {
            header: Some(header),
            end_line: Some(end),
        };
    }

    statements[end] = Statement::EndIf {
        header: Some(header),
    };
}
