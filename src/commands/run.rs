use clap::Args;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use tape_bf::cli_util::{load_source, print_error};
use tape_bf::config::RunSettings;
use tape_bf::theme::DiagnosticStyle;
use tape_bf::{write_tape_dump, BrainfuckError, Compiled, Compiler, Machine, StepControl, Tape};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Also write a step-by-step table of operations to stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Wall-clock timeout in milliseconds (fallback BF_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        file,
        code,
        timeout_ms,
        max_steps,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    let source = match load_source(program, file.as_deref(), &code) {
        Ok(s) => s,
        Err(2) => usage_and_exit(program, 2),
        Err(exit_code) => return exit_code,
    };

    let settings = RunSettings::load().with_flags(max_steps, timeout_ms);
    let style = DiagnosticStyle::pick(settings.color && io::stderr().is_terminal());
    debug!("run settings: {settings:?}");

    // `.` flushes every character, so Ctrl+C has nothing left to flush. The
    // handler must not touch the std streams: the machine may be mid-write.
    if let Err(e) = ctrlc::set_handler(|| std::process::exit(130)) {
        warn!("failed to set ctrl+c handler: {e}");
    }

    // The input line, if any, is captured here, before anything executes.
    let compiled = match Compiler::new(io::stdin().lock()).compile(&source) {
        Ok(c) => c,
        Err(err) => {
            print_error(Some(program), &source, &err, style);
            return 1;
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let control = StepControl::new(settings.max_steps, cancel.clone());

    let result = match settings.timeout_ms {
        None => execute(compiled, control, debug),
        Some(timeout_ms) => {
            // Execute on a worker thread with cooperative cancellation
            let (tx, rx) = mpsc::channel::<Result<Tape, BrainfuckError>>();
            thread::spawn(move || {
                let _ = tx.send(execute(compiled, control, debug));
            });

            match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
                Ok(res) => res,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    // The worker may be mid-write on stdout; leave stdout alone.
                    cancel.store(true, Ordering::Relaxed);
                    eprintln!(
                        "{}",
                        style.abort.paint(format!(
                            "{program}: Execution aborted: wall-clock timeout exceeded ({timeout_ms} ms)"
                        ))
                    );
                    let _ = io::stderr().flush();
                    return 1;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => return 1,
            }
        }
    };

    match result {
        Ok(tape) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = write_tape_dump(&mut stdout, &tape) {
                print_error(Some(program), &source, &BrainfuckError::from(e), style);
                return 1;
            }
            0
        }
        Err(err) => {
            let _ = io::stdout().flush();
            print_error(Some(program), &source, &err, style);
            1
        }
    }
}

fn execute(compiled: Compiled, control: StepControl, debug: bool) -> Result<Tape, BrainfuckError> {
    let mut machine = Machine::new(compiled).with_control(control);
    // Unlocked handles: each write takes the lock only for its own duration.
    let mut out = io::stdout();
    if debug {
        machine.run_traced(&mut out, &mut io::stderr())?;
    } else {
        machine.run(&mut out)?;
    }
    Ok(machine.into_tape())
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--debug|-d] [--max-steps N] [--timeout MS] "<code>"
  {0} run [--debug|-d] [--max-steps N] [--timeout MS] --file <PATH>

Options:
  --file,  -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --debug, -d         Also write a step-by-step table of operations to stderr
  --max-steps <N>     Abort after N instructions (fallback BF_MAX_STEPS)
  --timeout <MS>      Abort after MS milliseconds of wall-clock time (fallback BF_TIMEOUT_MS)
  --help,  -h         Show this help

Notes:
- If the code contains `,`, one line is read from stdin before execution starts.
  Each executed `,` takes the next character of that line; once the line is
  used up `,` leaves the cell unchanged.
- Characters outside of Brainfuck's ><+-.,[] are comments.
- After a clean halt the tape is printed as `tape: (v1,v2,...)`.

Examples:
- Load Brainfuck code from a file:
    {0} run --file ./program.bf
- Feed the input line from a file:
    {0} run --max-steps 1000 ",[.,]" < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
