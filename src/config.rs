// Calculator configuration: compile-time constants and the behaviours that
// can be chosen per session.

use crate::fixed::FixedValue;

/// Key highlighted when a session starts (the "5" key).
pub const DEFAULT_SELECTED_KEY: usize = 13;

/// Capacity of a display line. Fits the widest value ("-21474836.48")
/// and every error message.
pub const DISPLAY_CAPACITY: usize = 16;

/// Fractional digits accepted during entry before further keystrokes are ignored.
pub const FRACTION_DIGIT_CAP: u8 = FixedValue::FRACTION_DIGITS;

/// What a digit does right after a result has been shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChainPolicy {
    /// Start a new first operand; the result is only reused if an operator follows.
    #[default]
    FreshOperand,
    /// Keep typing onto the result as if it had been entered by hand.
    Append,
}

/// What pressing "." does while a fraction is already being entered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecimalPolicy {
    /// Stay in fraction entry.
    #[default]
    Latch,
    /// Leave fraction entry again, as long as no fractional digit was typed yet.
    Toggle,
}

/// Per-session calculator behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalculatorConfig {
    pub chain: ChainPolicy,
    pub decimal: DecimalPolicy,
}

impl CalculatorConfig {
    pub const fn new(chain: ChainPolicy, decimal: DecimalPolicy) -> Self {
        Self { chain, decimal }
    }
}
