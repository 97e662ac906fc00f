mod commands;

use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, Write};
use std::path::Path;

use commands::dump::DumpArgs;
use commands::run::RunArgs;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run  [--debug|-d] "<code>"      # Run Brainfuck code (args are concatenated)
  {0} run  [--debug|-d] --file <PATH> # Run Brainfuck code loaded from file
  {0} dump "<code>"                   # Print the compiled instruction listing
  {0} dump --file <PATH>              # Same, for code loaded from file

Environment:
  BF_LOG         Log filter (default: warn)
  BF_CONFIG      Settings file (default: $XDG_CONFIG_HOME/bf.toml)
  BF_MAX_STEPS   Default step limit for `run`
  BF_TIMEOUT_MS  Default wall-clock timeout for `run`
  BF_COLOR       Set to 0 to disable colored diagnostics

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
    Dump(DumpArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("BF_LOG", "warn")).init();

    // Program name for help rendering and diagnostics prefixes
    let program = env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .map_or_else(|| String::from("bf"), str::to_string);

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_top_usage_and_exit(&program, if cli.help { 0 } else { 2 });
    };
    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match command {
        Command::Run(args) => commands::run::run(&program, args),
        Command::Dump(args) => commands::dump::run(&program, args),
    };

    std::process::exit(code);
}
