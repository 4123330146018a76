// Integration tests for loading programs: declarations, classification and typed values

use algotrace::evaluator::{Evaluator, ScriptEvaluator};
use algotrace::program::{DeclarationKind, Program, ScanError, Statement};
use algotrace::variables::{StoreError, Value, VarType, VariableStore};

#[test]
fn test_declaration_diagnostics() {
    let program = Program::from_lines([
        "algorithme Essai",
        "variables",
        "a, b : entier",
        "PI <- 3,14",
        "nom : chaine",
        "a : reel",
        "n'importe quoi",
        "z : bidule",
        "",
        "DEBUT",
        "FIN",
    ]);

    let scan = program.declarations();
    assert_eq!(scan.begin_line, Some(9));

    let names: Vec<&str> = scan.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "PI", "nom"]);
    assert_eq!(
        scan.declarations[2].kind,
        DeclarationKind::Constant {
            literal: "3,14".to_string(),
            value: Value::Real(3.14)
        }
    );

    let lines: Vec<usize> = scan.errors.iter().map(ScanError::line).collect();
    assert_eq!(lines, vec![5, 6, 7]);
    assert_eq!(
        scan.errors[0],
        ScanError::DuplicateDeclaration {
            line: 5,
            name: "a".to_string()
        }
    );
}

#[test]
fn test_missing_begin_marker_declares_nothing() {
    let program = Program::from_lines(["x : entier", "x <- 1"]);
    assert_eq!(program.begin_line(), None);
    assert!(program.declarations().declarations.is_empty());
}

#[test]
fn test_lines_are_classified_with_block_targets() {
    let program = Program::from_source(
        "DEBUT\nsi a alors // test\nsinon\nfsi\ntant que b faire\nftq\nFIN",
    );

    assert_eq!(
        program.statement(1),
        Some(&Statement::If {
            condition: "a".to_string(),
            else_line: Some(2),
            end_line: Some(3)
        })
    );
    assert_eq!(
        program.statement(5),
        Some(&Statement::EndWhile { header: Some(4) })
    );
    assert_eq!(program.statement(6), Some(&Statement::NoOp));
}

#[test]
fn test_typed_set_value() {
    let mut evaluator = ScriptEvaluator::new();
    let mut store = VariableStore::new();
    for (name, ty) in [
        ("b", VarType::Boolean),
        ("r", VarType::Real),
        ("s", VarType::String),
        ("c", VarType::Character),
        ("n", VarType::Integer),
    ] {
        store.declare(name, ty, &mut evaluator).unwrap();
    }

    assert_eq!(store.set_value("b", "Vraie", &mut evaluator), Ok(true));
    assert_eq!(store.set_value("r", "2,5", &mut evaluator), Ok(true));
    assert_eq!(store.set_value("s", "\"abc\"", &mut evaluator), Ok(true));
    assert_eq!(store.set_value("c", "'z'", &mut evaluator), Ok(true));
    assert!(matches!(
        store.set_value("n", "douze", &mut evaluator),
        Err(StoreError::InvalidLiteral { .. })
    ));

    assert_eq!(store.get("b").unwrap().value(), &Value::Bool(true));
    assert_eq!(store.get("r").unwrap().value(), &Value::Real(2.5));
    assert_eq!(store.get("s").unwrap().value(), &Value::Str("abc".into()));
    assert_eq!(store.get("c").unwrap().value(), &Value::Char('z'));
    assert_eq!(store.get("n").unwrap().value(), &Value::Int(0));

    // the evaluator sees what the store holds
    assert_eq!(evaluator.evaluate_expression("r * 2"), Ok(Value::Real(5.0)));
    assert_eq!(evaluator.evaluate_condition("b et non faux"), Ok(true));
}

#[test]
fn test_evaluator_precedence_and_builtins() {
    let mut evaluator = ScriptEvaluator::new();
    evaluator.bind("x", Value::Int(7));

    assert_eq!(evaluator.evaluate_expression("1 + 2 * 3"), Ok(Value::Int(7)));
    assert_eq!(evaluator.evaluate_expression("x div 2"), Ok(Value::Int(3)));
    assert_eq!(
        evaluator.evaluate_expression("\"n=\" + x"),
        Ok(Value::Str("n=7".into()))
    );
    assert_eq!(
        evaluator.evaluate_expression("longueur(\"été\") + arrondi(2.5)"),
        Ok(Value::Int(6))
    );
    assert!(evaluator.evaluate_expression("x / 0").is_err());
}
