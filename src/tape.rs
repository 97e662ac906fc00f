use std::fmt;

/// Byte tape that only grows to the right, one zero cell at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// A tape holding a single zero cell, pointer on it.
    pub fn new() -> Self {
        Self {
            cells: vec![0],
            pointer: 0,
        }
    }

    /// Current cell value.
    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn increment(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }

    /// Move right, appending exactly one zero cell when stepping past the end.
    pub fn move_right(&mut self) {
        self.pointer += 1;
        if self.pointer == self.cells.len() {
            self.cells.push(0);
        }
    }

    /// Move left. Returns `false`, leaving the pointer where it was, when
    /// already on the first cell.
    #[must_use]
    pub fn move_left(&mut self) -> bool {
        match self.pointer.checked_sub(1) {
            Some(p) => {
                self.pointer = p;
                true
            }
            None => false,
        }
    }

    /// 0-based index of the current cell.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the tape has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Renders as `(v1,v2,...)`.
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut iter = self.cells.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
        }
        for cell in iter {
            write!(f, ",{cell}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_zero_cell() {
        let tape = Tape::new();
        assert_eq!(tape.cells(), &[0]);
        assert_eq!(tape.pointer(), 0);
        assert_eq!(tape.to_string(), "(0)");
        assert_eq!(tape.len(), 1);
        assert!(!tape.is_empty());
    }

    #[test]
    fn grows_one_cell_per_step() {
        let mut tape = Tape::new();
        for expected_len in 2..=5 {
            tape.move_right();
            assert_eq!(tape.len(), expected_len);
            assert_eq!(tape.pointer(), expected_len - 1);
        }
    }

    #[test]
    fn revisiting_cells_does_not_grow() {
        let mut tape = Tape::new();
        tape.move_right();
        tape.move_right();
        assert!(tape.move_left());
        assert!(tape.move_left());
        tape.move_right();
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn left_of_first_cell_is_refused() {
        let mut tape = Tape::new();
        assert!(!tape.move_left());
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn cells_wrap_both_ways() {
        let mut tape = Tape::new();
        tape.decrement();
        assert_eq!(tape.get(), 255);
        tape.increment();
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn display_lists_every_cell() {
        let mut tape = Tape::new();
        tape.set(72);
        tape.move_right();
        tape.move_right();
        tape.set(255);
        assert_eq!(tape.to_string(), "(72,0,255)");
    }
}
