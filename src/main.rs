// algotrace: time-travel stepper for French teaching pseudocode

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use ratatui::{backend::CrosstermBackend, Terminal};

use algotrace::evaluator::ScriptEvaluator;
use algotrace::interpreter::{
    EngineConfig, InputProvider, Interpreter, ReplayPolicy, ScriptedInput, StdinInput,
};
use algotrace::program::Program;
use algotrace::ui::App;

#[derive(Parser)]
#[command(name = "algotrace")]
#[command(about = "Step through a pseudocode algorithm, forward and backward")]
struct Cli {
    /// Pseudocode source file
    file: PathBuf,

    /// Advances allowed in one run before it is stopped
    #[arg(long, default_value_t = EngineConfig::default().max_steps)]
    max_steps: usize,

    /// Ask `lire` again on every replay instead of reusing recorded answers
    #[arg(long)]
    reprompt: bool,

    /// Entries kept in the execution log
    #[arg(long, default_value_t = EngineConfig::default().log_capacity)]
    log_capacity: usize,

    /// Trace a variable (repeatable)
    #[arg(long = "trace", value_name = "NAME")]
    traced: Vec<String>,

    /// Trace every non-constant variable
    #[arg(long)]
    trace_all: bool,

    /// Ask which variables to trace before starting
    #[arg(long)]
    ask_trace: bool,

    /// Run to the end without the TUI, printing the execution log
    #[arg(long)]
    batch: bool,

    /// Answer for `lire`, in order (repeatable); batch mode reads stdin otherwise
    #[arg(long = "input", value_name = "TEXT")]
    inputs: Vec<String>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_steps: self.max_steps,
            replay_policy: if self.reprompt {
                ReplayPolicy::Reprompt
            } else {
                ReplayPolicy::Recorded
            },
            log_capacity: self.log_capacity,
        }
    }
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    // The TUI owns the terminal: stay quiet unless asked for a log file
    let default_filter = if cli.batch || cli.log_file.is_some() {
        "warn"
    } else {
        "off"
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(path) = &cli.log_file {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn select_traced(cli: &Cli, interpreter: &mut Interpreter) -> io::Result<()> {
    let candidates: Vec<String> = interpreter
        .variables()
        .iter()
        .filter(|v| !v.is_constant())
        .map(|v| v.name().to_string())
        .collect();

    let mut chosen: Vec<String> = cli.traced.clone();
    if cli.trace_all {
        chosen.extend(candidates.iter().cloned());
    } else if cli.ask_trace {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        for name in &candidates {
            write!(stdout, "trace {} ? (o/n) ", name)?;
            stdout.flush()?;
            let mut answer = String::new();
            stdin.lock().read_line(&mut answer)?;
            if matches!(answer.trim().to_lowercase().as_str(), "o" | "oui" | "y" | "yes") {
                chosen.push(name.clone());
            }
        }
    }

    for name in chosen {
        match interpreter.set_traced(&name, true) {
            Ok(true) => log::info!("tracing '{}'", name),
            Ok(false) => eprintln!("Warning: '{}' is a constant and cannot be traced", name),
            Err(e) => eprintln!("Warning: {}", e),
        }
    }
    Ok(())
}

fn run_batch(
    interpreter: &mut Interpreter,
    input: &mut dyn InputProvider,
) -> Result<(), Box<dyn std::error::Error>> {
    while !interpreter.is_finished() {
        interpreter.advance(input)?;
        let step = interpreter.steps();
        for entry in interpreter.execution_log().filter(|e| e.step == step) {
            println!("{}", entry);
        }
    }

    for snapshot in interpreter.traced_history() {
        eprintln!(
            "[step {} line {}] {} = {}",
            snapshot.step,
            snapshot.line + 1,
            snapshot.variable.name(),
            snapshot.variable.value()
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let program = match Program::from_file(&cli.file) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut interpreter =
        Interpreter::with_config(program, Box::new(ScriptEvaluator::new()), cli.engine_config());

    for diagnostic in interpreter.diagnostics() {
        eprintln!("Warning: {}", diagnostic);
    }

    select_traced(&cli, &mut interpreter)?;

    if cli.batch {
        return if cli.inputs.is_empty() {
            run_batch(&mut interpreter, &mut StdinInput)
        } else {
            run_batch(&mut interpreter, &mut ScriptedInput::new(cli.inputs.clone()))
        };
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(interpreter);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
