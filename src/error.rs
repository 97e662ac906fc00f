/// Errors that can occur while compiling or executing Brainfuck code.
///
/// Every variant is terminal for the run: nothing is retried and no tape
/// dump is produced once one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// A `]` was scanned with no open `[` pending.
    #[error("mismatched brackets at character {position}")]
    MismatchedBracket { position: usize },

    /// The source ended while at least one `[` was still open.
    ///
    /// `position` points at the innermost unclosed `[` and is only used for
    /// diagnostics context.
    #[error("unexpected end of file")]
    UnexpectedEof { position: usize },

    /// The data pointer was moved left of the first cell.
    #[error("negative index")]
    NegativeIndex { ip: usize },

    /// Reading the input line or writing program output failed.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

impl BrainfuckError {
    /// 1-based source character offset this error refers to, if any.
    pub fn source_position(&self) -> Option<usize> {
        match self {
            BrainfuckError::MismatchedBracket { position }
            | BrainfuckError::UnexpectedEof { position } => Some(*position),
            _ => None,
        }
    }
}
