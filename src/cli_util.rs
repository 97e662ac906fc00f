use std::fs;
use std::io::{self, Write};

use crate::BrainfuckError;
use crate::theme::DiagnosticStyle;

/// Show a short window around the position for context.
const WINDOW_CHARS: usize = 32;

/// Pretty-print a [`BrainfuckError`] to stderr.
///
/// The first line is always `<program>: <message>` (or just the message when
/// `program` is `None`). Errors that point into the source get a caret
/// context window underneath.
pub fn print_error(program: Option<&str>, code: &str, err: &BrainfuckError, style: DiagnosticStyle) {
    let message = match program {
        Some(p) => format!("{p}: {err}"),
        None => err.to_string(),
    };

    let headline = match err {
        BrainfuckError::StepLimitExceeded { .. } | BrainfuckError::Canceled => style.abort,
        _ => style.headline,
    };
    eprintln!("{}", headline.paint(message));

    if let Some(position) = err.source_position() {
        print_context(code, position.saturating_sub(1), style);
    }
    let _ = io::stderr().flush();
}

/// Print the source around the 0-based char index `pos` with a caret under it,
/// slicing by char indices so multi-byte UTF-8 stays intact.
pub fn print_context(code: &str, pos: usize, style: DiagnosticStyle) {
    let (slice, caret_offset) = context_window(code, pos);
    // Keep the window on one line.
    let slice: String = slice.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();

    let gutter = style.gutter.paint("  ");
    eprintln!("{gutter}{}", style.context.paint(slice));
    eprintln!("{gutter}{}{}", " ".repeat(caret_offset), style.caret.paint("^"));
}

/// The slice of `code` around char index `pos` and the caret column within it.
fn context_window(code: &str, pos: usize) -> (&str, usize) {
    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);

    (&code[start_byte..end_byte], pos.saturating_sub(start_char))
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Resolve program source from either `--file PATH` or positional parts.
///
/// On failure the problem has already been reported and the exit code to use
/// is returned.
pub fn load_source(program: &str, file: Option<&str>, code: &[String]) -> Result<String, i32> {
    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        let _ = io::stderr().flush();
        return Err(2);
    }

    match file {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            eprintln!("{program}: failed to read code file as UTF-8: {e}");
            let _ = io::stderr().flush();
            1
        }),
        None => Ok(code.join("")),
    }
}
