//! Tree-walking evaluator over bound variables
//!
//! # Semantics
//!
//! - `+` concatenates as soon as one side is a string
//! - integers and characters (as their code) mix with reals, widening to real
//! - `/` between two integers truncates, `div` is integer division, `mod`/`%`
//!   is the remainder
//! - `et`/`ou` short-circuit and only accept booleans
//! - integer overflow and division by zero are errors, never wraps or infinities

use crate::evaluator::ast::{BinOp, Expr, UnaryOp};
use crate::evaluator::builtins::call_builtin;
use crate::evaluator::parser::parse_expression;
use crate::evaluator::{EvalError, Evaluator};
use crate::variables::value::Value;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// The bundled [`Evaluator`]: parses each expression and walks the tree.
#[derive(Debug, Default, Clone)]
pub struct ScriptEvaluator {
    bindings: FxHashMap<String, Value>,
}

impl ScriptEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current binding of a variable, if any.
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),

            Expr::Variable(name) => {
                self.bindings
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnknownIdentifier {
                        name: name.clone(),
                    })
            }

            Expr::Call { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                call_builtin(name, &values)
            }

            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Int(n)) => {
                        n.checked_neg().map(Value::Int).ok_or(EvalError::Overflow {
                            operation: "negation".to_string(),
                        })
                    }
                    (UnaryOp::Neg, Value::Real(r)) => Ok(Value::Real(-r)),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Neg, other) => Err(operand_error("-", &other)),
                    (UnaryOp::Not, other) => Err(operand_error("non", &other)),
                }
            }

            Expr::Binary { op, left, right } => match op {
                BinOp::And | BinOp::Or => self.eval_logical(*op, left, right),
                _ => {
                    let lhs = self.eval(left)?;
                    let rhs = self.eval(right)?;
                    eval_binary(*op, lhs, rhs)
                }
            },
        }
    }

    fn eval_logical(&self, op: BinOp, left: &Expr, right: &Expr) -> Result<Value, EvalError> {
        let lhs = self.eval(left)?;
        let lhs = lhs.as_bool().ok_or_else(|| operand_error(op.symbol(), &lhs))?;

        // short-circuit
        match (op, lhs) {
            (BinOp::And, false) => return Ok(Value::Bool(false)),
            (BinOp::Or, true) => return Ok(Value::Bool(true)),
            _ => {}
        }

        let rhs = self.eval(right)?;
        eval_binary(op, Value::Bool(lhs), rhs)
    }
}

impl Evaluator for ScriptEvaluator {
    fn bind(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    fn evaluate_condition(&mut self, text: &str) -> Result<bool, EvalError> {
        let value = self.evaluate_expression(text)?;
        value.as_bool().ok_or_else(|| EvalError::TypeError {
            message: format!("condition must be a boolean, got {} {}", value.var_type(), value),
        })
    }

    fn evaluate_expression(&mut self, text: &str) -> Result<Value, EvalError> {
        let expr = parse_expression(text)?;
        self.eval(&expr)
    }

    fn reset(&mut self) {
        self.bindings.clear();
    }
}

/// Numeric view of a value for arithmetic and ordering
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Real(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        match value {
            Value::Int(n) => Some(Num::Int(*n)),
            Value::Real(r) => Some(Num::Real(*r)),
            Value::Char(c) => Some(Num::Int(*c as i64)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Real(r) => r,
        }
    }
}

fn operand_error(op: &str, value: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!("'{}' cannot apply to {} {}", op, value.var_type(), value),
    }
}

fn operands_error(op: BinOp, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!(
            "'{}' cannot combine {} and {}",
            op.symbol(),
            lhs.var_type(),
            rhs.var_type()
        ),
    }
}

fn overflow(op: BinOp) -> EvalError {
    EvalError::Overflow {
        operation: format!("'{}'", op.symbol()),
    }
}

fn eval_binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    if op == BinOp::Add && (matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_))) {
        return Ok(Value::Str(format!("{}{}", lhs, rhs)));
    }

    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::IntDiv | BinOp::Mod => {
            let (a, b) = match (Num::of(&lhs), Num::of(&rhs)) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(operands_error(op, &lhs, &rhs)),
            };
            arithmetic(op, a, b)
        }
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let ordering = compare(op, &lhs, &rhs)?;
            let result = match op {
                BinOp::Eq => ordering == Ordering::Equal,
                BinOp::Ne => ordering != Ordering::Equal,
                BinOp::Lt => ordering == Ordering::Less,
                BinOp::Le => ordering != Ordering::Greater,
                BinOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Bool(result))
        }
        BinOp::And | BinOp::Or => {
            match (lhs.as_bool(), rhs.as_bool()) {
                (Some(a), Some(b)) if op == BinOp::And => Ok(Value::Bool(a && b)),
                (Some(a), Some(b)) => Ok(Value::Bool(a || b)),
                _ => Err(operands_error(op, &lhs, &rhs)),
            }
        }
    }
}

fn arithmetic(op: BinOp, a: Num, b: Num) -> Result<Value, EvalError> {
    if let (Num::Int(x), Num::Int(y)) = (a, b) {
        let result = match op {
            BinOp::Add => x.checked_add(y),
            BinOp::Sub => x.checked_sub(y),
            BinOp::Mul => x.checked_mul(y),
            BinOp::Div | BinOp::IntDiv | BinOp::Mod if y == 0 => {
                return Err(EvalError::DivisionByZero)
            }
            BinOp::Div | BinOp::IntDiv => x.checked_div(y),
            _ => x.checked_rem(y),
        };
        return result.map(Value::Int).ok_or_else(|| overflow(op));
    }

    if op == BinOp::IntDiv {
        return Err(EvalError::TypeError {
            message: "'div' needs two integers".to_string(),
        });
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    let result = match op {
        BinOp::Add => x + y,
        BinOp::Sub => x - y,
        BinOp::Mul => x * y,
        BinOp::Div | BinOp::Mod if y == 0.0 => return Err(EvalError::DivisionByZero),
        BinOp::Div => x / y,
        _ => x % y,
    };

    if result.is_finite() {
        Ok(Value::Real(result))
    } else {
        Err(overflow(op))
    }
}

fn compare(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Ordering, EvalError> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Char(b)) => Ok(a.as_str().cmp(b.to_string().as_str())),
        (Value::Char(a), Value::Str(b)) => Ok(a.to_string().as_str().cmp(b.as_str())),
        (Value::Bool(a), Value::Bool(b)) if matches!(op, BinOp::Eq | BinOp::Ne) => Ok(a.cmp(b)),
        _ => match (Num::of(lhs), Num::of(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a.cmp(&b)),
            (Some(a), Some(b)) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .ok_or_else(|| operands_error(op, lhs, rhs)),
            _ => Err(operands_error(op, lhs, rhs)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> ScriptEvaluator {
        let mut ev = ScriptEvaluator::new();
        ev.bind("x", Value::Int(10));
        ev.bind("nom", Value::Str("Ada".into()));
        ev.bind("r", Value::Real(1.5));
        ev
    }

    #[test]
    fn arithmetic_follows_precedence() {
        let mut ev = evaluator();
        assert_eq!(ev.evaluate_expression("x + 2 * 3").unwrap(), Value::Int(16));
        assert_eq!(ev.evaluate_expression("(x + 2) * 3").unwrap(), Value::Int(36));
        assert_eq!(ev.evaluate_expression("7 / 2").unwrap(), Value::Int(3));
        assert_eq!(ev.evaluate_expression("7 mod 4").unwrap(), Value::Int(3));
        assert_eq!(ev.evaluate_expression("x * r").unwrap(), Value::Real(15.0));
        assert_eq!(ev.evaluate_expression("-x + 1").unwrap(), Value::Int(-9));
    }

    #[test]
    fn plus_concatenates_strings() {
        let mut ev = evaluator();
        assert_eq!(
            ev.evaluate_expression("\"Bonjour \" + nom + \" \" + x").unwrap(),
            Value::Str("Bonjour Ada 10".into())
        );
    }

    #[test]
    fn conditions() {
        let mut ev = evaluator();
        assert!(ev.evaluate_condition("x > 5 && nom = \"Ada\"").unwrap());
        assert!(ev.evaluate_condition("x < 5 ou non (x = 3)").unwrap());
        assert!(!ev.evaluate_condition("x <> 10").unwrap());
        assert!(ev.evaluate_condition("'a' < 'b'").unwrap());
    }

    #[test]
    fn short_circuit_skips_errors() {
        let mut ev = evaluator();
        assert!(!ev.evaluate_condition("faux et inconnu > 1").unwrap());
        assert!(ev.evaluate_condition("vrai ou 1 / 0 = 1").unwrap());
    }

    #[test]
    fn logic_needs_booleans_on_both_sides() {
        let mut ev = evaluator();
        assert!(ev.evaluate_condition("faux ou x = 10").unwrap());
        assert!(!ev.evaluate_condition("vrai et faux").unwrap());
        assert!(matches!(
            ev.evaluate_condition("vrai et x"),
            Err(EvalError::TypeError { .. })
        ));
        assert!(matches!(
            ev.evaluate_condition("faux ou \"oui\""),
            Err(EvalError::TypeError { .. })
        ));
    }

    #[test]
    fn errors() {
        let mut ev = evaluator();
        assert_eq!(ev.evaluate_expression("1 / 0"), Err(EvalError::DivisionByZero));
        assert!(matches!(
            ev.evaluate_expression("y + 1"),
            Err(EvalError::UnknownIdentifier { .. })
        ));
        assert!(matches!(
            ev.evaluate_condition("x + 1"),
            Err(EvalError::TypeError { .. })
        ));
        assert!(matches!(
            ev.evaluate_expression("vrai + 1"),
            Err(EvalError::TypeError { .. })
        ));
        assert!(matches!(
            ev.evaluate_expression("9223372036854775807 + 1"),
            Err(EvalError::Overflow { .. })
        ));
    }

    #[test]
    fn reset_forgets_bindings() {
        let mut ev = evaluator();
        ev.reset();
        assert!(ev.binding("x").is_none());
        assert!(ev.evaluate_expression("x").is_err());
    }
}
