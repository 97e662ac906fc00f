use std::collections::VecDeque;
use std::io::Write;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::debug;

use crate::compiler::{Compiled, Instruction, Program};
use crate::error::BrainfuckError;
use crate::tape::Tape;

/// Characters captured at compile time, consumed from the front by `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    chars: VecDeque<char>,
}

impl InputBuffer {
    pub fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
        }
    }

    /// Remove and return the first character, if any.
    pub fn next_char(&mut self) -> Option<char> {
        self.chars.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// What has not been consumed yet.
    pub fn remaining(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<u64>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<u64>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// The tape virtual machine.
///
/// Owns the compiled program, the input buffer, and the tape for the whole
/// run. `ip` walks the instruction arena; a taken jump lands on the matching
/// bracket and the unconditional advance at the end of each cycle moves one
/// past it.
pub struct Machine {
    program: Program,
    input: InputBuffer,
    tape: Tape,
    ip: usize,
    steps: u64,
    control: Option<StepControl>,
}

impl Machine {
    pub fn new(compiled: Compiled) -> Self {
        Self {
            program: compiled.program,
            input: compiled.input,
            tape: Tape::new(),
            ip: 0,
            steps: 0,
            control: None,
        }
    }

    /// Attach a step limit and/or cancellation flag.
    pub fn with_control(mut self, control: StepControl) -> Self {
        self.control = Some(control);
        self
    }

    /// Execute until `ip` runs off the end of the program.
    ///
    /// `.` output is written to `out` and flushed one character at a time.
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<(), BrainfuckError> {
        self.execute(out, None)
    }

    /// Like [`Machine::run`], additionally writing a step-by-step table of
    /// operations to `trace`. Program output and state are unaffected.
    pub fn run_traced<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        trace: &mut dyn Write,
    ) -> Result<(), BrainfuckError> {
        self.execute(out, Some(trace))
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn into_tape(self) -> Tape {
        self.tape
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn execute<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        mut trace: Option<&mut dyn Write>,
    ) -> Result<(), BrainfuckError> {
        if let Some(t) = trace.as_deref_mut() {
            writeln!(t, "STEP | IP  | PTR | CELL | INSTR | ACTION")?;
            writeln!(t, "-----+-----+-----+------+-------+------------------------------------------------")?;
        }

        while self.ip < self.program.len() {
            if let Some(ctrl) = self.control.as_ref() {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(BrainfuckError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if self.steps >= max {
                        return Err(BrainfuckError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let instr = self.program[self.ip];
            let (ip_before, ptr_before, cell) = (self.ip, self.tape.pointer(), self.tape.get());
            let mut action: Option<String> = trace.is_some().then(String::new);

            match instr {
                Instruction::Incr => {
                    self.tape.increment();
                    if let Some(a) = action.as_mut() {
                        *a = format!("Increment cell[{}] from {} to {}", ptr_before + 1, cell, self.tape.get());
                    }
                }
                Instruction::Decr => {
                    self.tape.decrement();
                    if let Some(a) = action.as_mut() {
                        *a = format!("Decrement cell[{}] from {} to {}", ptr_before + 1, cell, self.tape.get());
                    }
                }
                Instruction::Next => {
                    self.tape.move_right();
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved pointer head to index {}", self.tape.pointer() + 1);
                    }
                }
                Instruction::Prev => {
                    if !self.tape.move_left() {
                        return Err(BrainfuckError::NegativeIndex { ip: self.ip + 1 });
                    }
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved pointer head to index {}", self.tape.pointer() + 1);
                    }
                }
                Instruction::Print => {
                    let mut buf = [0u8; 4];
                    out.write_all(char::from(cell).encode_utf8(&mut buf).as_bytes())?;
                    out.flush()?;
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output {:?}", char::from(cell));
                    }
                }
                Instruction::Read => {
                    // Exhausted input leaves the cell untouched.
                    if let Some(ch) = self.input.next_char() {
                        self.tape.set((u32::from(ch) % 256) as u8);
                        if let Some(a) = action.as_mut() {
                            *a = format!("Read {:?} -> {}", ch, self.tape.get());
                        }
                    } else if let Some(a) = action.as_mut() {
                        *a = "Input exhausted; cell unchanged".to_string();
                    }
                }
                Instruction::JumpIfZero(target) => {
                    if cell == 0 {
                        self.ip = target;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Cell is 0; jump past matching ']' at IP {}", target + 1);
                        }
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                Instruction::JumpIfNonZero(target) => {
                    if cell != 0 {
                        self.ip = target;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Cell != 0; jump past matching '[' at IP {}", target + 1);
                        }
                    } else if let Some(a) = action.as_mut() {
                        *a = "Exit loop (cell is 0)".to_string();
                    }
                }
            }

            if let Some(t) = trace.as_deref_mut() {
                writeln!(
                    t,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    self.steps,
                    ip_before + 1,
                    ptr_before + 1,
                    cell,
                    instr.symbol(),
                    action.unwrap_or_default()
                )?;
            }

            self.steps += 1;
            self.ip += 1;
        }

        debug!("halted after {} steps, tape length {}", self.steps, self.tape.len());
        Ok(())
    }
}
