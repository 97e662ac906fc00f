//! A small Brainfuck compiler and tape machine.
//!
//! Programs are compiled in one pass into a flat instruction arena with
//! resolved jump targets, then run against a byte tape that starts as a
//! single zero cell and grows to the right on demand.
//!
//! Features and behaviors:
//! - Cells wrap modulo 256 in both directions.
//! - Moving left of the first cell is a fatal `negative index` error.
//! - Any character outside `><+-.,[]` is a comment.
//! - Input is captured once, at compile time: the first `,` in the source
//!   reads one line from the input source. At run time `,` takes the next
//!   character of that line (code point modulo 256) and does nothing once the
//!   line is used up; it never stores an EOF marker.
//! - Output `.` writes the cell as the Unicode character with that code point.
//! - After a clean halt the tape is dumped as `tape: (v1,v2,...)`.
//!
//! Quick start:
//!
//! ```
//! use tape_bf::interpret;
//!
//! let mut out = Vec::new();
//! interpret("++++++++[>++++++++<-]>+.", std::io::empty(), &mut out).expect("program should run");
//! assert_eq!(String::from_utf8(out).unwrap(), "Atape: (0,65)\n");
//! ```

use std::io::{self, BufRead, Write};

pub mod cli_util;
pub mod compiler;
pub mod config;
pub mod error;
pub mod machine;
pub mod tape;
pub mod theme;

pub use compiler::{compile, Compiled, Compiler, Instruction, Program};
pub use error::BrainfuckError;
pub use machine::{InputBuffer, Machine, StepControl};
pub use tape::Tape;

/// Write the final tape line, `tape: (v1,v2,...)`.
pub fn write_tape_dump<W: Write + ?Sized>(out: &mut W, tape: &Tape) -> io::Result<()> {
    writeln!(out, "tape: {tape}")?;
    out.flush()
}

/// Compile and run `source`, then dump the tape to `out`.
///
/// `stdin` is only read from when the source contains a `,`. On error the
/// tape dump is not written.
pub fn interpret<R: BufRead, W: Write + ?Sized>(
    source: &str,
    stdin: R,
    out: &mut W,
) -> Result<Tape, BrainfuckError> {
    let compiled = compile(source, stdin)?;
    let mut machine = Machine::new(compiled);
    machine.run(out)?;
    let tape = machine.into_tape();
    write_tape_dump(out, &tape)?;
    Ok(tape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn interpret_str(source: &str, stdin: &str) -> (Result<Tape, BrainfuckError>, String) {
        let mut out = Vec::new();
        let result = interpret(source, Cursor::new(stdin.as_bytes()), &mut out);
        (result, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn empty_source_dumps_single_cell() {
        let (result, out) = interpret_str("", "");
        assert!(result.is_ok());
        assert_eq!(out, "tape: (0)\n");
    }

    #[test]
    fn echo_one_character() {
        let (_, out) = interpret_str(",.", "A\n");
        assert_eq!(out, "Atape: (65)\n");
    }

    #[test]
    fn empty_input_prints_nul() {
        let (_, out) = interpret_str(",.", "");
        assert_eq!(out, "\0tape: (0)\n");
    }

    #[test]
    fn growth_shows_in_dump() {
        let (_, out) = interpret_str(">+", "");
        assert_eq!(out, "tape: (0,1)\n");
    }

    #[test]
    fn compile_errors_write_nothing() {
        let (result, out) = interpret_str("]", "");
        assert_eq!(result.unwrap_err().to_string(), "mismatched brackets at character 1");
        assert!(out.is_empty());

        let (result, out) = interpret_str("[", "");
        assert_eq!(result.unwrap_err().to_string(), "unexpected end of file");
        assert!(out.is_empty());
    }

    #[test]
    fn underflow_skips_tape_dump() {
        let (result, out) = interpret_str("+.<", "");
        assert!(matches!(result, Err(BrainfuckError::NegativeIndex { .. })));
        assert_eq!(out, "\u{1}");
    }
}
