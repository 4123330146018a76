//! Runtime value representation
//!
//! [`Value`] is the type-tagged scalar held by every variable and produced by
//! the evaluator. [`VarType`] is the declared type of a variable; it owns the
//! type-directed defaults and the textual conventions used to convert user
//! input into values.
//!
//! # Textual conventions
//!
//! - booleans: `vrai`/`vraie`/`true` and `faux`/`fausse`/`false`, any case
//! - reals: `,` or `.` as decimal separator
//! - strings and characters: surrounding quotes are optional

use crate::text::fold_accents;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Real(f64),
    Bool(bool),
    Char(char),
}

impl Value {
    /// The declared type this value naturally belongs to.
    pub fn var_type(&self) -> VarType {
        match self {
            Value::Str(_) => VarType::String,
            Value::Int(_) => VarType::Integer,
            Value::Real(_) => VarType::Real,
            Value::Bool(_) => VarType::Boolean,
            Value::Char(_) => VarType::Character,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            // Debug keeps the trailing `.0` on integral reals
            Value::Real(r) => write!(f, "{:?}", r),
            Value::Bool(true) => write!(f, "vrai"),
            Value::Bool(false) => write!(f, "faux"),
            Value::Char('\0') => write!(f, "\\0"),
            Value::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    String,
    Integer,
    Real,
    Boolean,
    Character,
}

impl VarType {
    /// Resolve a type name as written in a declaration (`entier`, `réel`,
    /// `chaîne`, ...). English names are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        match fold_accents(name.trim()).as_str() {
            "chaine" | "string" => Some(VarType::String),
            "entier" | "integer" => Some(VarType::Integer),
            "reel" | "real" => Some(VarType::Real),
            "booleen" | "boolean" => Some(VarType::Boolean),
            "caractere" | "character" => Some(VarType::Character),
            _ => None,
        }
    }

    /// Display name, in the vocabulary of the pseudocode.
    pub fn name(self) -> &'static str {
        match self {
            VarType::String => "chaine",
            VarType::Integer => "entier",
            VarType::Real => "reel",
            VarType::Boolean => "booleen",
            VarType::Character => "caractere",
        }
    }

    pub fn default_value(self) -> Value {
        match self {
            VarType::String => Value::Str(String::new()),
            VarType::Integer => Value::Int(0),
            VarType::Real => Value::Real(0.0),
            VarType::Boolean => Value::Bool(false),
            VarType::Character => Value::Char('\0'),
        }
    }

    /// Convert raw text (a literal or a line of user input) into a value of
    /// this type. Returns `None` when the text does not fit the type.
    pub fn parse_literal(self, text: &str) -> Option<Value> {
        let trimmed = text.trim();
        match self {
            VarType::String => Some(Value::Str(unquote(trimmed, '"').to_string())),
            VarType::Integer => trimmed.parse::<i64>().ok().map(Value::Int),
            VarType::Real => parse_real(trimmed).map(Value::Real),
            VarType::Boolean => parse_bool(trimmed).map(Value::Bool),
            VarType::Character => {
                let inner = unquote(trimmed, '\'');
                let mut chars = inner.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
        }
    }

    /// Infer the type of a constant from the shape of its literal: double
    /// quotes make a string, single quotes a character, a boolean word a
    /// boolean, an integer an integer, anything else that parses a real.
    pub fn infer_literal(literal: &str) -> Option<(VarType, Value)> {
        let trimmed = literal.trim();
        let quoted = |q: char| trimmed.len() >= 2 && trimmed.starts_with(q) && trimmed.ends_with(q);

        let var_type = if quoted('"') {
            VarType::String
        } else if quoted('\'') {
            VarType::Character
        } else if parse_bool(trimmed).is_some() {
            VarType::Boolean
        } else if trimmed.parse::<i64>().is_ok() {
            VarType::Integer
        } else {
            VarType::Real
        };

        var_type
            .parse_literal(trimmed)
            .map(|value| (var_type, value))
    }

    /// Fit an evaluated value into a variable of this type.
    ///
    /// Widening is allowed (`entier` into `reel`, `caractere` into `chaine`,
    /// a one-character `chaine` into `caractere`); anything else is refused.
    pub fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (VarType::String, Value::Str(s)) => Some(Value::Str(s)),
            (VarType::String, Value::Char(c)) => Some(Value::Str(c.to_string())),
            (VarType::Integer, Value::Int(n)) => Some(Value::Int(n)),
            (VarType::Real, Value::Real(r)) => Some(Value::Real(r)),
            (VarType::Real, Value::Int(n)) => Some(Value::Real(n as f64)),
            (VarType::Boolean, Value::Bool(b)) => Some(Value::Bool(b)),
            (VarType::Character, Value::Char(c)) => Some(Value::Char(c)),
            (VarType::Character, Value::Str(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn unquote(text: &str, quote: char) -> &str {
    if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Recognize a boolean word
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "vrai" | "vraie" | "true" => Some(true),
        "faux" | "fausse" | "false" => Some(false),
        _ => None,
    }
}

/// Parse a real accepting `,` as decimal separator. Non-finite results
/// (`inf`, `NaN`) are rejected.
pub fn parse_real(text: &str) -> Option<f64> {
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
}
