//! Variable table
//!
//! - [`Variable`]: one typed cell with its constant, traced and frozen flags
//! - [`VariableStore`]: the table of a run, iterated in declaration order
//!
//! # Evaluator synchronisation
//!
//! Every mutation that changes a value pushes the new value to the
//! [`Evaluator`] passed in by the engine, so evaluated expressions always see
//! the same values as the table. The store never keeps a handle on the
//! evaluator itself.

use super::value::{Value, VarType};
use crate::evaluator::Evaluator;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("variable '{name}' is already declared")]
    DuplicateDeclaration { name: String },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("'{text}' is not a valid {var_type} for '{name}'")]
    InvalidLiteral {
        name: String,
        var_type: VarType,
        text: String,
    },

    #[error("cannot store {got} {value} in {var_type} variable '{name}'")]
    TypeMismatch {
        name: String,
        var_type: VarType,
        got: VarType,
        value: String,
    },
}

/// A typed variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    var_type: VarType,
    value: Value,
    is_constant: bool,
    is_traced: bool,
    is_frozen: bool,
}

impl Variable {
    /// A non-constant variable holding its type's default.
    pub fn new(name: impl Into<String>, var_type: VarType) -> Self {
        Variable {
            name: name.into(),
            var_type,
            value: var_type.default_value(),
            is_constant: false,
            is_traced: false,
            is_frozen: false,
        }
    }

    /// A constant. Its value is fixed for the lifetime of the variable.
    pub fn constant(name: impl Into<String>, var_type: VarType, value: Value) -> Self {
        Variable {
            name: name.into(),
            var_type,
            value,
            is_constant: true,
            is_traced: false,
            is_frozen: false,
        }
    }

    /// Point-in-time copy for the trace history. Rejects every mutation.
    pub fn frozen_copy(&self) -> Self {
        Variable {
            is_frozen: true,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_constant(&self) -> bool {
        self.is_constant
    }

    pub fn is_traced(&self) -> bool {
        self.is_traced
    }

    pub fn is_frozen(&self) -> bool {
        self.is_frozen
    }

    fn is_locked(&self) -> bool {
        self.is_constant || self.is_frozen
    }

    /// Replace the value. Returns false (and changes nothing) on constants
    /// and frozen copies.
    pub fn set(&mut self, value: Value) -> bool {
        if self.is_locked() {
            return false;
        }
        self.value = value;
        true
    }

    /// Returns false (and changes nothing) on constants and frozen copies.
    pub fn set_traced(&mut self, traced: bool) -> bool {
        if self.is_locked() {
            return false;
        }
        self.is_traced = traced;
        true
    }

    pub fn reset_to_default(&mut self) -> bool {
        self.set(self.var_type.default_value())
    }
}

/// The variable table of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    vars: FxHashMap<String, Variable>,
    insertion_order: Vec<String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable holding its type's default, and bind it.
    pub fn declare(
        &mut self,
        name: &str,
        var_type: VarType,
        evaluator: &mut dyn Evaluator,
    ) -> Result<&Variable, StoreError> {
        self.insert(Variable::new(name, var_type), evaluator)
    }

    /// Declare a constant from its literal text, and bind it right away so
    /// that expressions see it from the first line on.
    pub fn declare_constant(
        &mut self,
        name: &str,
        var_type: VarType,
        literal: &str,
        evaluator: &mut dyn Evaluator,
    ) -> Result<&Variable, StoreError> {
        let value = var_type
            .parse_literal(literal)
            .ok_or_else(|| StoreError::InvalidLiteral {
                name: name.to_string(),
                var_type,
                text: literal.to_string(),
            })?;
        self.insert(Variable::constant(name, var_type, value), evaluator)
    }

    fn insert(
        &mut self,
        variable: Variable,
        evaluator: &mut dyn Evaluator,
    ) -> Result<&Variable, StoreError> {
        let name = variable.name.clone();
        if self.vars.contains_key(&name) {
            return Err(StoreError::DuplicateDeclaration { name });
        }

        evaluator.bind(&name, variable.value.clone());
        self.insertion_order.push(name.clone());
        Ok(self.vars.entry(name).or_insert(variable))
    }

    /// Convert raw text with the declared type's textual conventions and
    /// store it. Returns `Ok(false)` for constants, which are left untouched.
    pub fn set_value(
        &mut self,
        name: &str,
        raw_text: &str,
        evaluator: &mut dyn Evaluator,
    ) -> Result<bool, StoreError> {
        let var = self.get_mut(name)?;
        if var.is_locked() {
            return Ok(false);
        }

        let value = var
            .var_type
            .parse_literal(raw_text)
            .ok_or_else(|| StoreError::InvalidLiteral {
                name: name.to_string(),
                var_type: var.var_type,
                text: raw_text.to_string(),
            })?;

        var.set(value.clone());
        evaluator.bind(name, value);
        Ok(true)
    }

    /// Store an evaluated value, widening it to the declared type when
    /// allowed. Returns `Ok(false)` for constants.
    pub fn assign(
        &mut self,
        name: &str,
        value: Value,
        evaluator: &mut dyn Evaluator,
    ) -> Result<bool, StoreError> {
        let var = self.get_mut(name)?;
        if var.is_locked() {
            return Ok(false);
        }

        let got = value.var_type();
        let shown = value.to_string();
        let coerced = var
            .var_type
            .coerce(value)
            .ok_or_else(|| StoreError::TypeMismatch {
                name: name.to_string(),
                var_type: var.var_type,
                got,
                value: shown,
            })?;

        var.set(coerced.clone());
        evaluator.bind(name, coerced);
        Ok(true)
    }

    /// Returns `Ok(false)` for constants.
    pub fn set_traced(&mut self, name: &str, traced: bool) -> Result<bool, StoreError> {
        Ok(self.get_mut(name)?.set_traced(traced))
    }

    /// Frozen copy of a variable for the trace history
    pub fn snapshot(&self, name: &str) -> Result<Variable, StoreError> {
        self.get(name)
            .map(Variable::frozen_copy)
            .ok_or_else(|| StoreError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Restore the type default and re-bind it. Returns `Ok(false)` for
    /// constants.
    pub fn reset_to_default(
        &mut self,
        name: &str,
        evaluator: &mut dyn Evaluator,
    ) -> Result<bool, StoreError> {
        let var = self.get_mut(name)?;
        if !var.reset_to_default() {
            return Ok(false);
        }
        evaluator.bind(name, var.value.clone());
        Ok(true)
    }

    /// Put every non-constant variable back to its default and bind every
    /// variable (constants included) again. Trace flags are kept.
    pub fn reset_all(&mut self, evaluator: &mut dyn Evaluator) {
        for var in self.vars.values_mut() {
            var.reset_to_default();
        }
        self.rebind_all(evaluator);
    }

    /// Bind every current value again, e.g. after [`Evaluator::reset`].
    pub fn rebind_all(&self, evaluator: &mut dyn Evaluator) {
        for var in self.iter() {
            evaluator.bind(&var.name, var.value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Variable, StoreError> {
        self.vars
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Variables in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.insertion_order
            .iter()
            .filter_map(move |name| self.vars.get(name))
    }

    pub fn len(&self) -> usize {
        self.insertion_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertion_order.is_empty()
    }
}
