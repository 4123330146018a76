//! Built-in function library
//!
//! The pseudocode ships a handful of conversion and inspection helpers. Names
//! are matched after accent folding and lowercasing, so `enEntier`,
//! `ENENTIER` and `année` all resolve.
//!
//! # Supported Built-ins
//!
//! - `estEntier(x)`, `estReel(x)`: whether the text of `x` parses
//! - `enChaine(x)`, `enEntier(x)`, `enReel(x)`: conversions
//! - `car(n)`, `ord(c)`: character code conversions
//! - `plafond(r)`, `plancher(r)`, `arrondi(r)`: rounding to an integer
//! - `jour(d)`, `mois(d)`, `annee(d)`: fields of a `jj/mm/aaaa` date
//! - `longueur(s)`: number of characters
//!
//! Random numbers and the current date are deliberately absent: replaying a
//! program must always reproduce the same state.

use crate::evaluator::EvalError;
use crate::text::fold_accents;
use crate::variables::value::{parse_real, Value};

/// Call a built-in by name. `UnknownFunction` if the name is not part of the
/// library.
pub fn call_builtin(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    let key = fold_accents(name);
    let builtin: fn(&Value) -> Result<Value, EvalError> = match key.as_str() {
        "estentier" => |v| Ok(Value::Bool(v.to_string().trim().parse::<i64>().is_ok())),
        "estreel" => |v| Ok(Value::Bool(parse_real(v.to_string().trim()).is_some())),
        "enchaine" => |v| Ok(Value::Str(v.to_string())),
        "enentier" => to_integer,
        "enreel" => to_real,
        "car" => to_char,
        "ord" => to_code,
        "plafond" => |v| round_with(v, "plafond", f64::ceil),
        "plancher" => |v| round_with(v, "plancher", f64::floor),
        "arrondi" => |v| round_with(v, "arrondi", f64::round),
        "jour" => |v| date_field(v, 0),
        "mois" => |v| date_field(v, 1),
        "annee" => |v| date_field(v, 2),
        "longueur" => |v| match v {
            Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
            Value::Char(_) => Ok(Value::Int(1)),
            other => Err(type_error("longueur", "a string", other)),
        },
        _ => {
            return Err(EvalError::UnknownFunction {
                name: name.to_string(),
            })
        }
    };

    match args {
        [arg] => builtin(arg),
        _ => Err(EvalError::Arity {
            function: name.to_string(),
            expected: 1,
            got: args.len(),
        }),
    }
}

fn type_error(function: &str, expected: &str, got: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!("{} expects {}, got {} {}", function, expected, got.var_type(), got),
    }
}

fn to_integer(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Real(r) => real_to_int(r.trunc(), "enEntier").map(Value::Int),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| type_error("enEntier", "an integer text", value)),
        other => Err(type_error("enEntier", "an integer text", other)),
    }
}

fn to_real(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(n) => Ok(Value::Real(*n as f64)),
        Value::Real(r) => Ok(Value::Real(*r)),
        Value::Str(s) => parse_real(s.trim())
            .map(Value::Real)
            .ok_or_else(|| type_error("enReel", "a real text", value)),
        other => Err(type_error("enReel", "a real text", other)),
    }
}

fn to_char(value: &Value) -> Result<Value, EvalError> {
    let code = match value {
        Value::Int(n) => *n,
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| type_error("car", "a character code", value))?,
        other => return Err(type_error("car", "a character code", other)),
    };

    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(Value::Char)
        .ok_or_else(|| type_error("car", "a valid character code", value))
}

fn to_code(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Char(c) => Ok(Value::Int(*c as i64)),
        Value::Str(s) => s
            .chars()
            .next()
            .map(|c| Value::Int(c as i64))
            .ok_or_else(|| type_error("ord", "a non-empty string", value)),
        other => Err(type_error("ord", "a character", other)),
    }
}

fn round_with(value: &Value, function: &str, op: fn(f64) -> f64) -> Result<Value, EvalError> {
    let real = match value {
        Value::Int(n) => return Ok(Value::Int(*n)),
        Value::Real(r) => *r,
        Value::Str(s) => {
            parse_real(s.trim()).ok_or_else(|| type_error(function, "a real", value))?
        }
        other => return Err(type_error(function, "a real", other)),
    };
    real_to_int(op(real), function).map(Value::Int)
}

/// Convert an already rounded real, refusing values outside `i64`.
fn real_to_int(real: f64, function: &str) -> Result<i64, EvalError> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if real.is_finite() && real >= i64::MIN as f64 && real < i64::MAX as f64 {
        Ok(real as i64)
    } else {
        Err(EvalError::Overflow {
            operation: function.to_string(),
        })
    }
}

fn date_field(value: &Value, index: usize) -> Result<Value, EvalError> {
    let text = match value {
        Value::Str(s) => s,
        other => return Err(type_error("jour/mois/annee", "a jj/mm/aaaa date", other)),
    };

    let fields: Vec<&str> = text.trim().split('/').collect();
    if fields.len() != 3 {
        return Err(type_error("jour/mois/annee", "a jj/mm/aaaa date", value));
    }
    Ok(Value::Str(fields[index].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arg: Value) -> Value {
        call_builtin(name, &[arg]).expect("builtin failed")
    }

    #[test]
    fn conversions() {
        assert_eq!(call("enEntier", Value::Str(" 42 ".into())), Value::Int(42));
        assert_eq!(call("enReel", Value::Str("2,5".into())), Value::Real(2.5));
        assert_eq!(call("enChaine", Value::Int(7)), Value::Str("7".into()));
        assert_eq!(call("estEntier", Value::Str("x1".into())), Value::Bool(false));
        assert_eq!(call("estRéel", Value::Str("1,5".into())), Value::Bool(true));
    }

    #[test]
    fn character_codes() {
        assert_eq!(call("car", Value::Int(65)), Value::Char('A'));
        assert_eq!(call("ord", Value::Char('a')), Value::Int(97));
        assert!(call_builtin("car", &[Value::Int(-1)]).is_err());
    }

    #[test]
    fn rounding() {
        assert_eq!(call("plafond", Value::Real(2.1)), Value::Int(3));
        assert_eq!(call("plancher", Value::Real(2.9)), Value::Int(2));
        assert_eq!(call("arrondi", Value::Real(2.5)), Value::Int(3));
        assert_eq!(call("plafond", Value::Int(4)), Value::Int(4));
    }

    #[test]
    fn oversized_reals_overflow() {
        assert_eq!(
            call("enEntier", Value::Real(-9.2e18)),
            Value::Int(-9_200_000_000_000_000_000)
        );
        for (name, real) in [
            ("enEntier", 1e30),
            ("plafond", 9.3e18),
            ("arrondi", f64::NAN),
            ("plancher", f64::NEG_INFINITY),
        ] {
            assert!(matches!(
                call_builtin(name, &[Value::Real(real)]),
                Err(EvalError::Overflow { .. })
            ));
        }
    }

    #[test]
    fn dates_and_lengths() {
        let date = Value::Str("14/07/1789".into());
        assert_eq!(call("jour", date.clone()), Value::Str("14".into()));
        assert_eq!(call("mois", date.clone()), Value::Str("07".into()));
        assert_eq!(call("année", date), Value::Str("1789".into()));
        assert_eq!(call("longueur", Value::Str("été".into())), Value::Int(3));
    }

    #[test]
    fn arity_and_unknown_names() {
        assert!(matches!(
            call_builtin("ord", &[]),
            Err(EvalError::Arity { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            call_builtin("hasard", &[Value::Int(3)]),
            Err(EvalError::UnknownFunction { .. })
        ));
    }
}
