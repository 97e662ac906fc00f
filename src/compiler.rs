//! Source scanning and bracket resolution.
//!
//! Compilation is a single left-to-right pass over the source characters:
//! the eight Brainfuck operators become [`Instruction`]s, everything else is a
//! comment. Each `[` is pushed as a placeholder and back-patched once its `]`
//! is scanned, so matched brackets end up pointing at each other's index in
//! the instruction arena.
//!
//! Scanning the first `,` also captures one line from the input source. That
//! read happens here, before any instruction runs, and never again.

use std::fmt;
use std::io::BufRead;
use std::ops::Index;

use log::debug;

use crate::error::BrainfuckError;
use crate::machine::InputBuffer;

/// A compiled Brainfuck instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `+`: add one to the current cell, wrapping at 256.
    Incr,
    /// `-`: subtract one from the current cell, wrapping at 0.
    Decr,
    /// `>`: move the data pointer right, growing the tape if needed.
    Next,
    /// `<`: move the data pointer left.
    Prev,
    /// `.`: emit the current cell as a character.
    Print,
    /// `,`: take the next character from the input buffer, if any.
    Read,
    /// `[`: when the current cell is 0, jump to the matching `]` (index).
    JumpIfZero(usize),
    /// `]`: when the current cell is not 0, jump to the matching `[` (index).
    JumpIfNonZero(usize),
}

impl Instruction {
    /// The source character this instruction was compiled from.
    pub fn symbol(&self) -> char {
        match self {
            Instruction::Incr => '+',
            Instruction::Decr => '-',
            Instruction::Next => '>',
            Instruction::Prev => '<',
            Instruction::Print => '.',
            Instruction::Read => ',',
            Instruction::JumpIfZero(_) => '[',
            Instruction::JumpIfNonZero(_) => ']',
        }
    }

    /// Jump target for bracket instructions.
    pub fn target(&self) -> Option<usize> {
        match self {
            Instruction::JumpIfZero(t) | Instruction::JumpIfNonZero(t) => Some(*t),
            _ => None,
        }
    }
}

/// An immutable, index-addressed sequence of instructions.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Instruction {
        &self.instructions[index]
    }
}

/// Listing with 1-based addresses, one instruction per row.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Addr\tInstr\tTarget")?;

        for (pos, instr) in self.instructions.iter().enumerate() {
            match instr.target() {
                Some(target) => writeln!(f, "0x{:04X}\t{}\t0x{:04X}", pos + 1, instr.symbol(), target + 1)?,
                None => writeln!(f, "0x{:04X}\t{}", pos + 1, instr.symbol())?,
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Output of a successful compilation: the program plus whatever input was
/// captured while scanning it.
#[derive(Debug)]
pub struct Compiled {
    pub program: Program,
    pub input: InputBuffer,
}

/// Single-pass compiler reading at most one line from `stdin`.
pub struct Compiler<R> {
    stdin: R,
    /// True until the first `,` has been scanned.
    pending_read: bool,
}

impl<R: BufRead> Compiler<R> {
    pub fn new(stdin: R) -> Self {
        Self {
            stdin,
            pending_read: true,
        }
    }

    /// Whether the one-shot input read is still outstanding.
    pub fn pending_read(&self) -> bool {
        self.pending_read
    }

    /// Compile `source` into a [`Program`].
    ///
    /// Fails with [`BrainfuckError::MismatchedBracket`] on a stray `]` and
    /// with [`BrainfuckError::UnexpectedEof`] when a `[` is never closed.
    pub fn compile(&mut self, source: &str) -> Result<Compiled, BrainfuckError> {
        let mut instructions: Vec<Instruction> = Vec::new();
        let mut input = InputBuffer::default();

        // (instruction index, 1-based source position) of each open `[`
        let mut open: Vec<(usize, usize)> = Vec::new();

        for (offset, c) in source.chars().enumerate() {
            let position = offset + 1;
            match c {
                '+' => instructions.push(Instruction::Incr),
                '-' => instructions.push(Instruction::Decr),
                '>' => instructions.push(Instruction::Next),
                '<' => instructions.push(Instruction::Prev),
                '.' => instructions.push(Instruction::Print),
                ',' => {
                    instructions.push(Instruction::Read);
                    if self.pending_read {
                        self.pending_read = false;
                        input = self.read_line()?;
                    }
                }
                '[' => {
                    let loc = instructions.len();
                    // Placeholder, patched when the matching `]` arrives.
                    instructions.push(Instruction::JumpIfZero(loc));
                    open.push((loc, position));
                }
                ']' => {
                    let Some((loc, _)) = open.pop() else {
                        return Err(BrainfuckError::MismatchedBracket { position });
                    };
                    let here = instructions.len();
                    instructions.push(Instruction::JumpIfNonZero(loc));
                    instructions[loc] = Instruction::JumpIfZero(here);
                }
                _ => {}
            }
        }

        if let Some(&(_, position)) = open.last() {
            return Err(BrainfuckError::UnexpectedEof { position });
        }

        debug!(
            "compiled {} instructions, input line {}",
            instructions.len(),
            if self.pending_read { "not requested" } else { "captured" }
        );

        Ok(Compiled {
            program: Program { instructions },
            input,
        })
    }

    fn read_line(&mut self) -> Result<InputBuffer, BrainfuckError> {
        let mut line = String::new();
        // Ok(0) is end of stream; the buffer simply stays empty.
        self.stdin.read_line(&mut line)?;
        debug!("captured {} input characters", line.chars().count());
        Ok(InputBuffer::new(&line))
    }
}

/// Compile `source`, capturing one line from `stdin` if it contains a `,`.
pub fn compile<R: BufRead>(source: &str, stdin: R) -> Result<Compiled, BrainfuckError> {
    Compiler::new(stdin).compile(source)
}
