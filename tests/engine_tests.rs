// Integration tests for the pseudocode engine: control flow and navigation

use algotrace::evaluator::ScriptEvaluator;
use algotrace::interpreter::{
    EngineConfig, EngineError, Interpreter, ReplayPolicy, ScriptedInput,
};
use algotrace::program::Program;
use algotrace::trace::EntryKind;
use algotrace::variables::Value;

fn engine(lines: &[&str]) -> Interpreter {
    engine_with(lines, EngineConfig::default())
}

fn engine_with(lines: &[&str], config: EngineConfig) -> Interpreter {
    Interpreter::with_config(
        Program::from_lines(lines.iter().copied()),
        Box::new(ScriptEvaluator::new()),
        config,
    )
}

fn run_to_end(engine: &mut Interpreter, input: &mut ScriptedInput) {
    while !engine.is_finished() {
        engine.advance(input).expect("advance failed");
    }
}

fn outputs(engine: &Interpreter) -> Vec<String> {
    engine
        .execution_log()
        .filter(|e| e.kind == EntryKind::Output)
        .map(|e| e.text.clone())
        .collect()
}

fn value(engine: &Interpreter, name: &str) -> Value {
    engine
        .variables()
        .get(name)
        .unwrap_or_else(|| panic!("no variable {}", name))
        .value()
        .clone()
}

const COUNTER: &[&str] = &[
    "i : entier",
    "DEBUT",
    "i <- 0",
    "tant que i < 3 faire",
    "    ecrire(i)",
    "    i <- i + 1",
    "ftq",
    "FIN",
];

fn conditional_engine(x: i64) -> Interpreter {
    let assignment = format!("x <- {}", x);
    let lines = [
        "x : entier",
        "DEBUT",
        assignment.as_str(),
        "si x > 5 alors",
        "    ecrire(\"gros\")",
        "sinon",
        "    ecrire(\"petit\")",
        "fsi",
        "FIN",
    ];
    engine(&lines)
}

fn conditional(x: i64) -> Vec<String> {
    let mut engine = conditional_engine(x);
    run_to_end(&mut engine, &mut ScriptedInput::default());
    outputs(&engine)
}

#[test]
fn test_defaults_after_scan() {
    let engine = engine(&[
        "s : chaîne",
        "n : entier",
        "r : réel",
        "b : booléen",
        "c : caractère",
        "DEBUT",
        "FIN",
    ]);

    assert_eq!(value(&engine, "s"), Value::Str(String::new()));
    assert_eq!(value(&engine, "n"), Value::Int(0));
    assert_eq!(value(&engine, "r"), Value::Real(0.0));
    assert_eq!(value(&engine, "b"), Value::Bool(false));
    assert_eq!(value(&engine, "c"), Value::Char('\0'));
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn test_conditional_branches() {
    assert_eq!(conditional(7), vec!["gros"]);
    assert_eq!(conditional(3), vec!["petit"]);
}

#[test]
fn test_loop_runs_body_three_times() {
    let mut engine = engine(COUNTER);
    run_to_end(&mut engine, &mut ScriptedInput::default());

    assert_eq!(outputs(&engine), vec!["0", "1", "2"]);
    assert_eq!(value(&engine, "i"), Value::Int(3));
    assert_eq!(engine.steps(), 17);
}

#[test]
fn test_nested_blocks() {
    let mut engine = engine(&[
        "n : entier",
        "DEBUT",
        "n <- 0",
        "tant que n < 4 faire",
        "    si n mod 2 = 0 alors",
        "        ecrire(n, \" pair\")",
        "    sinon",
        "        ecrire(n, \" impair\")",
        "    fsi",
        "    n <- n + 1",
        "ftq",
        "FIN",
    ]);
    run_to_end(&mut engine, &mut ScriptedInput::default());

    assert_eq!(
        outputs(&engine),
        vec!["0 pair", "1 impair", "2 pair", "3 impair"]
    );
}

#[test]
fn test_unterminated_si_halts_on_header() {
    let mut engine = engine(&["DEBUT", "si vrai alors", "ecrire(\"x\")", "FIN"]);
    let mut input = ScriptedInput::default();

    engine.advance(&mut input).unwrap();
    for _ in 0..3 {
        assert_eq!(
            engine.advance(&mut input),
            Err(EngineError::StructuralBlock {
                line: 1,
                construct: "si"
            })
        );
        assert_eq!(engine.current_line(), 1);
        assert_eq!(engine.steps(), 1);
    }
    assert!(outputs(&engine).is_empty());
}

#[test]
fn test_jump_past_unterminated_si_stops_on_header() {
    let mut engine = engine(&["DEBUT", "si vrai alors", "ecrire(\"dedans\")", "FIN"]);
    let mut input = ScriptedInput::default();
    let unmatched = EngineError::StructuralBlock {
        line: 1,
        construct: "si",
    };

    assert_eq!(engine.jump_to(2, &mut input), Err(unmatched.clone()));
    assert_eq!(engine.current_line(), 1);
    assert_eq!(engine.steps(), 1);
    assert_eq!(engine.advance(&mut input), Err(unmatched));
    assert!(outputs(&engine).is_empty());
    assert!(engine.navigation_journal()[0].outcome.is_some());
}

#[test]
fn test_jump_into_skipped_branch_is_refused() {
    let mut engine = conditional_engine(10);
    let mut input = ScriptedInput::default();

    // the `sinon` branch on line 6 is never taken when x > 5
    assert_eq!(
        engine.jump_to(6, &mut input),
        Err(EngineError::UnreachableJumpTarget {
            target: 6,
            reached: 8
        })
    );
    assert_eq!(engine.current_line(), 8);

    run_to_end(&mut engine, &mut input);
    assert_eq!(outputs(&engine), vec!["gros"]);
}

#[test]
fn test_jump_to_unreached_line_after_closed_input() {
    let mut engine = engine(&["x : entier", "DEBUT", "lire(x)", "ecrire(x)", "FIN"]);
    let mut input = ScriptedInput::default();

    assert_eq!(
        engine.jump_to(4, &mut input),
        Err(EngineError::UnreachableJumpTarget {
            target: 4,
            reached: 2
        })
    );
    assert!(engine.is_finished());
}

#[test]
fn test_stray_marker_is_reported_and_skipped() {
    let mut engine = engine(&["DEBUT", "fsi", "ecrire(\"ok\")", "FIN"]);
    run_to_end(&mut engine, &mut ScriptedInput::default());

    let errors: Vec<_> = engine
        .execution_log()
        .filter(|e| e.kind == EntryKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 1);
    assert_eq!(outputs(&engine), vec!["ok"]);
}

#[test]
fn test_unknown_call_does_not_stop_the_run() {
    let mut engine = engine(&["DEBUT", "afficher(\"x\")", "ecrire(\"suite\")", "FIN"]);
    run_to_end(&mut engine, &mut ScriptedInput::default());

    assert!(engine
        .execution_log()
        .any(|e| e.kind == EntryKind::Error && e.text.contains("afficher")));
    assert_eq!(outputs(&engine), vec!["suite"]);
}

#[test]
fn test_constant_is_protected() {
    let mut engine = engine(&["MAX <- 10", "DEBUT", "MAX <- 3", "FIN"]);
    run_to_end(&mut engine, &mut ScriptedInput::default());

    assert_eq!(value(&engine, "MAX"), Value::Int(10));
    let refused = EngineError::ConstantAssignment {
        line: 2,
        name: "MAX".to_string(),
    };
    assert!(engine
        .execution_log()
        .any(|e| e.kind == EntryKind::Error && e.line == 2 && e.text == refused.to_string()));
    assert_eq!(engine.set_traced("MAX", true), Ok(false));
}

#[test]
fn test_rewind_is_idempotent() {
    let mut engine = engine(COUNTER);
    let mut input = ScriptedInput::default();

    engine.jump_to(5, &mut input).unwrap();
    let first = engine.state();
    engine.advance(&mut input).unwrap();
    engine.advance(&mut input).unwrap();
    engine.jump_to(5, &mut input).unwrap();

    assert_eq!(engine.state(), first);
    assert_eq!(first.current_line, 5);
    assert_eq!(first.steps, 5);
}

#[test]
fn test_jump_round_trip() {
    let mut engine = engine(COUNTER);
    let mut input = ScriptedInput::default();

    run_to_end(&mut engine, &mut input);
    let finished = engine.state();

    engine.jump_to(0, &mut input).unwrap();
    assert_eq!(engine.current_line(), 0);
    assert_eq!(value(&engine, "i"), Value::Int(0));
    assert!(outputs(&engine).is_empty());

    engine.jump_to(COUNTER.len(), &mut input).unwrap();
    assert_eq!(engine.state(), finished);
    assert_eq!(
        engine.jump_to(COUNTER.len() + 1, &mut input),
        Err(EngineError::InvalidJumpTarget {
            target: COUNTER.len() + 1,
            len: COUNTER.len()
        })
    );
}

#[test]
fn test_jump_back_and_forth_matches_single_jump() {
    let mut input = ScriptedInput::default();
    let mut fresh = engine(COUNTER);
    fresh.jump_to(4, &mut input).unwrap();

    let mut engine = engine(COUNTER);
    engine.jump_to(4, &mut input).unwrap();
    engine.jump_to(6, &mut input).unwrap();
    assert_eq!(value(&engine, "i"), Value::Int(1));
    engine.jump_to(4, &mut input).unwrap();

    assert_eq!(engine.state(), fresh.state());
    assert_eq!(outputs(&engine), Vec::<String>::new());
}

#[test]
fn test_step_back_through_loop_iterations() {
    let mut engine = engine(COUNTER);
    let mut input = ScriptedInput::default();
    run_to_end(&mut engine, &mut input);

    for _ in 0..4 {
        engine.step_back(&mut input).unwrap();
    }

    assert_eq!(engine.steps(), 13);
    assert_eq!(engine.current_line(), 5);
    assert_eq!(value(&engine, "i"), Value::Int(2));
    assert_eq!(outputs(&engine), vec!["0", "1", "2"]);
}

#[test]
fn test_restart_then_step_back_is_at_start() {
    let mut engine = engine(COUNTER);
    let mut input = ScriptedInput::default();
    engine.advance(&mut input).unwrap();
    engine.restart(&mut input).unwrap();

    assert_eq!(engine.steps(), 0);
    assert_eq!(engine.step_back(&mut input), Err(EngineError::AtStart));
}

const DOUBLER: &[&str] = &["x : entier", "DEBUT", "lire(x)", "ecrire(x * 2)", "FIN"];

#[test]
fn test_recorded_input_is_replayed() {
    let mut engine = engine(DOUBLER);
    let mut input = ScriptedInput::new(["21"]);
    run_to_end(&mut engine, &mut input);

    assert_eq!(outputs(&engine), vec!["42"]);
    assert_eq!(engine.recorded_inputs(), ["21".to_string()]);

    engine.step_back(&mut input).unwrap();
    engine.step_back(&mut input).unwrap();
    assert_eq!(input.prompts(), 1);
    assert_eq!(value(&engine, "x"), Value::Int(21));
    assert!(engine
        .execution_log()
        .any(|e| e.kind == EntryKind::Input && e.text == "x <- 21"));
}

#[test]
fn test_reprompt_asks_again_on_replay() {
    let config = EngineConfig {
        replay_policy: ReplayPolicy::Reprompt,
        ..EngineConfig::default()
    };
    let mut engine = engine_with(DOUBLER, config);
    let mut input = ScriptedInput::new(["21", "5"]);
    run_to_end(&mut engine, &mut input);

    engine.step_back(&mut input).unwrap();
    assert_eq!(input.prompts(), 2);
    assert_eq!(value(&engine, "x"), Value::Int(5));
    assert_eq!(engine.recorded_inputs(), ["5".to_string()]);
}

#[test]
fn test_closed_input_ends_the_run() {
    let mut engine = engine(DOUBLER);
    let mut input = ScriptedInput::default();
    run_to_end(&mut engine, &mut input);

    assert_eq!(engine.current_line(), 2);
    assert!(engine.is_finished());
    assert!(outputs(&engine).is_empty());
    assert_eq!(engine.advance(&mut input), Err(EngineError::ExecutionFinished));
}

#[test]
fn test_closed_input_leaves_multi_read_untouched() {
    let mut engine = engine(&[
        "a, b : entier",
        "DEBUT",
        "lire(a, b)",
        "ecrire(a + b)",
        "FIN",
    ]);
    let mut input = ScriptedInput::new(["4"]);
    run_to_end(&mut engine, &mut input);

    assert!(engine.is_finished());
    assert_eq!(engine.current_line(), 2);
    assert_eq!(value(&engine, "a"), Value::Int(0));
    assert_eq!(value(&engine, "b"), Value::Int(0));
    assert!(!engine.execution_log().any(|e| e.kind == EntryKind::Input));
}

#[test]
fn test_multi_read_assigns_in_order() {
    let mut engine = engine(&[
        "a, b : entier",
        "DEBUT",
        "lire(a, b)",
        "ecrire(a + b)",
        "FIN",
    ]);
    run_to_end(&mut engine, &mut ScriptedInput::new(["4", "5"]));

    assert_eq!(value(&engine, "a"), Value::Int(4));
    assert_eq!(value(&engine, "b"), Value::Int(5));
    assert_eq!(outputs(&engine), vec!["9"]);
}

#[test]
fn test_step_limit_stops_endless_loop() {
    let config = EngineConfig {
        max_steps: 50,
        ..EngineConfig::default()
    };
    let mut engine = engine_with(&["DEBUT", "tant que vrai faire", "ftq", "FIN"], config);
    let mut input = ScriptedInput::default();

    let err = loop {
        if let Err(err) = engine.advance(&mut input) {
            break err;
        }
    };
    assert_eq!(err, EngineError::StepLimitExceeded { limit: 50 });
    assert_eq!(engine.steps(), 50);
}

#[test]
fn test_execution_log_is_bounded() {
    let config = EngineConfig {
        log_capacity: 2,
        ..EngineConfig::default()
    };
    let lines = [
        "i : entier",
        "DEBUT",
        "tant que i < 5 faire",
        "    ecrire(\"tour \", i)",
        "    i <- i + 1",
        "ftq",
        "FIN",
    ];
    let mut engine = engine_with(&lines, config);
    run_to_end(&mut engine, &mut ScriptedInput::default());

    assert_eq!(outputs(&engine), vec!["tour 3", "tour 4"]);
    assert_eq!(engine.dropped_log_entries(), 3);
}

#[test]
fn test_traced_history_follows_replay() {
    let mut engine = engine(COUNTER);
    let mut input = ScriptedInput::default();
    assert_eq!(engine.set_traced("i", true), Ok(true));
    run_to_end(&mut engine, &mut input);

    let values: Vec<Value> = engine
        .traced_history()
        .iter()
        .map(|s| s.variable.value().clone())
        .collect();
    assert_eq!(
        values,
        vec![Value::Int(0), Value::Int(1), Value::Int(2), Value::Int(3)]
    );
    let first = engine.traced_variable_at(0).unwrap();
    assert_eq!(first.line, 2);
    assert!(first.variable.is_frozen());

    engine.restart(&mut input).unwrap();
    assert!(engine.traced_history().is_empty());
    assert!(engine.variables().get("i").unwrap().is_traced());
}

#[test]
fn test_navigation_is_journaled() {
    let mut engine = engine(COUNTER);
    let mut input = ScriptedInput::default();
    engine.advance(&mut input).unwrap();
    engine.jump_to(4, &mut input).unwrap();
    let _ = engine.step_back(&mut input);
    engine.quit();

    let journal = engine.navigation_journal();
    assert_eq!(journal.len(), 4);
    assert_eq!(journal[1].from_line, 1);
    assert_eq!(journal[1].to_line, 4);
    assert_eq!(journal[3].command.to_string(), "quit");
}
