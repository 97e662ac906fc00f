use clap::Args;
use std::io::{self, IsTerminal, Write};

use tape_bf::cli_util::{load_source, print_error};
use tape_bf::config::RunSettings;
use tape_bf::theme::DiagnosticStyle;
use tape_bf::Compiler;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct DumpArgs {
    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// Compile without executing and print the instruction listing.
pub fn run(program: &str, args: DumpArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let DumpArgs { file, code, .. } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    let source = match load_source(program, file.as_deref(), &code) {
        Ok(s) => s,
        Err(2) => usage_and_exit(program, 2),
        Err(exit_code) => return exit_code,
    };

    // Nothing runs, so the pending input read is satisfied from an empty source.
    match Compiler::new(io::empty()).compile(&source) {
        Ok(compiled) => {
            print!("{}", compiled.program);
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            let color = RunSettings::load().color && io::stderr().is_terminal();
            print_error(Some(program), &source, &err, DiagnosticStyle::pick(color));
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} dump "<code>"
  {0} dump --file <PATH>

Options:
  --file,  -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --help,  -h         Show this help

Description:
  Compiles the code without running it and prints one row per instruction:
  its 1-based address, the operator, and for brackets the address of the
  matching bracket. Stdin is never read.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
