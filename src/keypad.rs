// Logical keypad: the fixed list of calculator keys and the highlighted selection.
// Rendering and physical buttons are the host's business; this only knows
// which key sits at which index and what it does.

use crate::calculator::{Command, Operator};
use crate::config::DEFAULT_SELECTED_KEY;

pub const ROWS: usize = 5;
pub const COLUMNS: usize = 4;
pub const KEY_COUNT: usize = ROWS * COLUMNS;

/// A key on the logical keypad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Key {
    label: &'static str,
    command: Command,
}

impl Key {
    const fn new(label: &'static str, command: Command) -> Self {
        Self { label, command }
    }

    /// Text printed on the key
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Command issued when the key is activated
    pub const fn command(&self) -> Command {
        self.command
    }
}

const fn digit(label: &'static str, d: u8) -> Key {
    Key::new(label, Command::Digit(d))
}

const fn operator(op: Operator) -> Key {
    Key::new(op.symbol(), Command::Operator(op))
}

/// Keys in row-major order, 5 rows of 4.
///
/// "C" is the backspace ([`Command::ClearEntry`]), "CE" zeroes the operand
/// being edited ([`Command::ClearAll`]).
pub static KEYPAD: [Key; KEY_COUNT] = [
    // Row 0: +, -, *, /
    operator(Operator::Add),
    operator(Operator::Sub),
    operator(Operator::Mul),
    operator(Operator::Div),
    // Row 1: 0, ^, C, CE
    digit("0", 0),
    operator(Operator::Pow),
    Key::new("C", Command::ClearEntry),
    Key::new("CE", Command::ClearAll),
    // Row 2: 1, 2, 3, +/-
    digit("1", 1),
    digit("2", 2),
    digit("3", 3),
    Key::new("+/-", Command::Sign),
    // Row 3: 4, 5, 6, .
    digit("4", 4),
    digit("5", 5),
    digit("6", 6),
    Key::new(".", Command::Decimal),
    // Row 4: 7, 8, 9, =
    digit("7", 7),
    digit("8", 8),
    digit("9", 9),
    Key::new("=", Command::Equals),
];

/// Navigation step through the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// One key back (-1)
    Up,
    /// One key forward (+1)
    Down,
}

/// Index of the highlighted key, always within the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection(usize);

impl Selection {
    /// Select `index`, wrapped onto the keypad
    pub const fn new(index: usize) -> Self {
        Self(index % KEY_COUNT)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn row(self) -> usize {
        self.0 / COLUMNS
    }

    pub const fn column(self) -> usize {
        self.0 % COLUMNS
    }

    pub fn key(self) -> &'static Key {
        &KEYPAD[self.0]
    }

    /// Move one key, wrapping around both ends. Returns the new index.
    pub fn step(&mut self, direction: Direction) -> usize {
        self.0 = match direction {
            Direction::Up => (self.0 + KEY_COUNT - 1) % KEY_COUNT,
            Direction::Down => (self.0 + 1) % KEY_COUNT,
        };
        self.0
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(DEFAULT_SELECTED_KEY)
    }
}
