// Calculator input state machine
// Turns keypad events into two operands, an operator and a result, using
// the fixed-point engine for every computation.

use core::fmt::Write;

use log::{debug, info, warn};

use crate::config::{CalculatorConfig, ChainPolicy, DecimalPolicy, FRACTION_DIGIT_CAP};
use crate::error::CalcError;
use crate::fixed::{DisplayText, FixedValue};
use crate::keypad::{Direction, Selection};

/// Binary operators available on the keypad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// Symbol shown on the key and on screen once entered
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
        }
    }

    /// Apply the operator through the fixed-point engine.
    ///
    /// The exponent of `Pow` is `rhs` truncated to an integer: `2.5` becomes `2`.
    pub fn apply(self, lhs: FixedValue, rhs: FixedValue) -> Result<FixedValue, CalcError> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Sub => lhs.checked_sub(rhs),
            Operator::Mul => lhs.checked_mul(rhs),
            Operator::Div => lhs.checked_div(rhs),
            Operator::Pow => lhs.checked_pow(rhs.to_int()),
        }
    }
}

/// What an activated key means to the calculator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Sign,
    /// Backspace: drops the last integer digit, or leaves an empty fraction entry
    ClearEntry,
    /// Zeroes the operand being edited
    ClearAll,
    Equals,
}

/// Input delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    MoveSelection(Direction),
    /// Press the currently selected key
    Activate,
}

/// What the host should show after an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayUpdate {
    pub text: DisplayText,
    /// Newly highlighted key, only set for navigation
    pub selected: Option<usize>,
}

/// Receiver of display updates. Implementations must not block.
pub trait DisplaySink {
    fn show(&mut self, update: &DisplayUpdate);
}

/// Which operand receives input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    First,
    Second,
}

/// Calculator session state
pub struct Calculator {
    config: CalculatorConfig,
    operand_a: FixedValue,
    operand_b: FixedValue,
    pending_operator: Option<Operator>,
    /// Second operand is being edited
    operator_entered: bool,
    /// Digits go after the decimal point
    entering_fraction: bool,
    /// Fractional places of the active operand already filled
    fraction_digits: u8,
    /// `operand_a` holds the last result
    previous_result_pending: bool,
    selection: Selection,
    /// Last text pushed to the display
    display: DisplayText,
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_config(CalculatorConfig::default())
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self {
            config,
            operand_a: FixedValue::ZERO,
            operand_b: FixedValue::ZERO,
            pending_operator: None,
            operator_entered: false,
            entering_fraction: false,
            fraction_digits: 0,
            previous_result_pending: false,
            selection: Selection::default(),
            display: FixedValue::ZERO.format(),
        }
    }

    /// Handle one input event and return what should be displayed
    pub fn handle_event(&mut self, event: Event) -> DisplayUpdate {
        match event {
            Event::MoveSelection(direction) => {
                let selected = self.selection.step(direction);
                DisplayUpdate {
                    text: self.display.clone(),
                    selected: Some(selected),
                }
            }
            Event::Activate => {
                let key = self.selection.key();
                debug!("Activate '{}' -> {:?}", key.label(), key.command());
                self.apply(key.command())
            }
        }
    }

    /// Handle an event and push the resulting update to `sink`
    pub fn dispatch<S: DisplaySink + ?Sized>(&mut self, event: Event, sink: &mut S) {
        let update = self.handle_event(event);
        sink.show(&update);
    }

    /// Execute a command directly, bypassing the selection
    pub fn apply(&mut self, command: Command) -> DisplayUpdate {
        match command {
            Command::Digit(d) => self.enter_digit(d),
            Command::Decimal => self.enter_decimal(),
            Command::Operator(op) => self.enter_operator(op),
            Command::Sign => self.switch_sign(),
            Command::ClearEntry => self.clear_entry(),
            Command::ClearAll => self.clear_all(),
            Command::Equals => self.calculate(),
        }

        DisplayUpdate {
            text: self.display.clone(),
            selected: None,
        }
    }

    pub fn config(&self) -> CalculatorConfig {
        self.config
    }

    pub fn operand_a(&self) -> FixedValue {
        self.operand_a
    }

    pub fn operand_b(&self) -> FixedValue {
        self.operand_b
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn operator_entered(&self) -> bool {
        self.operator_entered
    }

    pub fn entering_fraction(&self) -> bool {
        self.entering_fraction
    }

    pub fn previous_result_pending(&self) -> bool {
        self.previous_result_pending
    }

    pub fn selected_key(&self) -> usize {
        self.selection.index()
    }

    /// Text currently on the display
    pub fn display(&self) -> &str {
        self.display.as_str()
    }

    fn active_slot(&self) -> Slot {
        if self.operator_entered {
            Slot::Second
        } else {
            Slot::First
        }
    }

    fn operand(&self, slot: Slot) -> FixedValue {
        match slot {
            Slot::First => self.operand_a,
            Slot::Second => self.operand_b,
        }
    }

    fn set_operand(&mut self, slot: Slot, value: FixedValue) {
        match slot {
            Slot::First => self.operand_a = value,
            Slot::Second => self.operand_b = value,
        }
    }

    fn show_active(&mut self) {
        self.display = self.operand(self.active_slot()).format();
    }

    fn show_text(&mut self, text: &str) {
        self.display.clear();
        let pushed = self.display.push_str(text);
        debug_assert!(pushed.is_ok(), "display text too long: {text}");
    }

    /// Drop a carried-over result before new input, if the chain policy says so
    fn start_entry(&mut self) {
        if self.previous_result_pending
            && !self.operator_entered
            && self.config.chain == ChainPolicy::FreshOperand
        {
            debug!("Starting a new operand over the previous result");
            self.operand_a = FixedValue::ZERO;
            self.entering_fraction = false;
        }
        self.previous_result_pending = false;
    }

    fn enter_digit(&mut self, d: u8) {
        self.start_entry();

        let slot = self.active_slot();
        let current = self.operand(slot);
        let digit = FixedValue::from_int(i16::from(d));

        let next = if self.entering_fraction {
            if self.fraction_digits >= FRACTION_DIGIT_CAP {
                debug!("Fraction digit cap reached, ignoring {d}");
                self.show_active();
                return;
            }
            // Place value of the next fractional position: 0.1, then 0.01
            let divisor = 10_i32.pow(u32::from(self.fraction_digits) + 1);
            let place = FixedValue::from_raw(FixedValue::SCALE / divisor);
            digit
                .checked_mul(place)
                .and_then(|step| grow(current, step))
        } else {
            current
                .checked_mul(FixedValue::TEN)
                .and_then(|shifted| grow(shifted, digit))
        };

        match next {
            Ok(value) => {
                self.set_operand(slot, value);
                if self.entering_fraction {
                    self.fraction_digits += 1;
                }
            }
            Err(e) => warn!("Digit {d} dropped: {e}"),
        }

        self.show_active();
    }

    fn enter_decimal(&mut self) {
        self.start_entry();

        if !self.entering_fraction {
            // Continue after the fractional digits the operand already has,
            // e.g. a carried-over result
            self.fraction_digits = fraction_places(self.operand(self.active_slot()));
            self.entering_fraction = true;
        } else if self.config.decimal == DecimalPolicy::Toggle && self.fraction_digits == 0 {
            self.entering_fraction = false;
        }

        self.show_active();
    }

    fn enter_operator(&mut self, op: Operator) {
        self.pending_operator = Some(op);
        self.operator_entered = true;
        self.entering_fraction = false;
        self.fraction_digits = 0;
        self.previous_result_pending = false;

        self.show_text(op.symbol());
    }

    fn switch_sign(&mut self) {
        let slot = self.active_slot();

        match self.operand(slot).checked_mul(FixedValue::from_int(-1)) {
            Ok(value) => self.set_operand(slot, value),
            Err(e) => warn!("Sign change dropped: {e}"),
        }

        self.show_active();
    }

    fn clear_entry(&mut self) {
        self.previous_result_pending = false;

        if self.entering_fraction && self.fraction_digits == 0 {
            self.entering_fraction = false;
        } else {
            // Strip the fraction, then remove the last integer digit
            let slot = self.active_slot();
            let integer = self.operand(slot).to_int() / 10;
            self.set_operand(slot, FixedValue::from_raw(integer * FixedValue::SCALE));
            self.fraction_digits = 0;
        }

        self.show_active();
    }

    fn clear_all(&mut self) {
        self.previous_result_pending = false;
        self.set_operand(self.active_slot(), FixedValue::ZERO);
        self.fraction_digits = 0;

        self.show_active();
    }

    /// Evaluate the pending operation without touching state
    fn evaluate(&self) -> Result<FixedValue, CalcError> {
        match self.pending_operator {
            Some(op) => op.apply(self.operand_a, self.operand_b),
            None => Ok(self.operand_a),
        }
    }

    fn calculate(&mut self) {
        let result = self.evaluate();

        debug!(
            "a: {} b: {} op: {:?} result: {:?}",
            self.operand_a, self.operand_b, self.pending_operator, result
        );

        // Reset operands, operator and entry flags
        self.operand_a = FixedValue::ZERO;
        self.operand_b = FixedValue::ZERO;
        self.pending_operator = None;
        self.operator_entered = false;
        self.entering_fraction = false;
        self.fraction_digits = 0;

        match result {
            Ok(value) => {
                info!("Result: {value}");
                // Keep the result as the first operand for chaining
                self.operand_a = value;
                self.previous_result_pending = true;
                self.display = value.format();
            }
            Err(e) => {
                warn!("Calculation failed: {e}");
                self.previous_result_pending = false;
                self.display.clear();
                let written = write!(&mut self.display, "{e}");
                debug_assert!(written.is_ok(), "error text too long: {e}");
            }
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fractional places `value` shows once trailing zeros are dropped
fn fraction_places(value: FixedValue) -> u8 {
    let mut fraction = value.fraction_raw().unsigned_abs();
    if fraction == 0 {
        return 0;
    }

    let mut places = FRACTION_DIGIT_CAP;
    while fraction % 10 == 0 {
        fraction /= 10;
        places -= 1;
    }
    places
}

/// Extend `value` by `step` away from zero, so negative operands keep their sign
fn grow(value: FixedValue, step: FixedValue) -> Result<FixedValue, CalcError> {
    if value.is_negative() {
        value.checked_sub(step)
    } else {
        value.checked_add(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(calc: &mut Calculator, commands: &[Command]) -> DisplayUpdate {
        let mut last = None;
        for command in commands {
            last = Some(calc.apply(*command));
        }
        last.unwrap()
    }

    #[test]
    fn test_initial_state() {
        let calc = Calculator::new();
        assert_eq!(calc.display(), "0.00");
        assert_eq!(calc.selected_key(), 13);
        assert_eq!(calc.operand_a(), FixedValue::ZERO);
        assert_eq!(calc.operand_b(), FixedValue::ZERO);
        assert_eq!(calc.pending_operator(), None);
        assert!(!calc.operator_entered());
        assert!(!calc.entering_fraction());
        assert!(!calc.previous_result_pending());
    }

    #[test]
    fn test_digits_shift_left() {
        let mut calc = Calculator::new();
        let update = press(&mut calc, &[Command::Digit(1), Command::Digit(2), Command::Digit(3)]);
        assert_eq!(update.text.as_str(), "123.00");
        assert_eq!(update.selected, None);
    }

    #[test]
    fn test_fraction_digits_capped() {
        let mut calc = Calculator::new();
        press(
            &mut calc,
            &[
                Command::Digit(3),
                Command::Decimal,
                Command::Digit(1),
                Command::Digit(4),
                Command::Digit(1),
            ],
        );
        assert_eq!(calc.display(), "3.14");
    }

    #[test]
    fn test_fraction_zero_digit_counts() {
        let mut calc = Calculator::new();
        press(
            &mut calc,
            &[Command::Digit(5), Command::Decimal, Command::Digit(0), Command::Digit(5)],
        );
        assert_eq!(calc.display(), "5.05");
    }

    #[test]
    fn test_digit_on_negative_grows_magnitude() {
        let mut calc = Calculator::new();
        press(
            &mut calc,
            &[
                Command::Digit(5),
                Command::Sign,
                Command::Digit(3),
                Command::Decimal,
                Command::Digit(2),
            ],
        );
        assert_eq!(calc.display(), "-53.20");
    }

    #[test]
    fn test_operator_switches_operand() {
        let mut calc = Calculator::new();
        let update = press(&mut calc, &[Command::Digit(4), Command::Operator(Operator::Mul)]);
        assert_eq!(update.text.as_str(), "*");
        assert!(calc.operator_entered());

        press(&mut calc, &[Command::Digit(2)]);
        assert_eq!(calc.operand_a(), FixedValue::from_int(4));
        assert_eq!(calc.operand_b(), FixedValue::from_int(2));
        assert_eq!(calc.display(), "2.00");
    }

    #[test]
    fn test_clear_entry_is_backspace() {
        let mut calc = Calculator::new();
        press(
            &mut calc,
            &[
                Command::Digit(1),
                Command::Digit(2),
                Command::Decimal,
                Command::Digit(3),
                Command::Digit(4),
                Command::ClearEntry,
            ],
        );
        assert_eq!(calc.display(), "1.00");
        // Still in fraction entry, counting from the first place again
        press(&mut calc, &[Command::Digit(5)]);
        assert_eq!(calc.display(), "1.50");
    }

    #[test]
    fn test_clear_entry_leaves_empty_fraction() {
        let mut calc = Calculator::new();
        press(&mut calc, &[Command::Digit(4), Command::Decimal, Command::ClearEntry]);
        assert!(!calc.entering_fraction());
        assert_eq!(calc.display(), "4.00");
        press(&mut calc, &[Command::Digit(2)]);
        assert_eq!(calc.display(), "42.00");
    }

    #[test]
    fn test_clear_all_only_active_operand() {
        let mut calc = Calculator::new();
        press(
            &mut calc,
            &[
                Command::Digit(9),
                Command::Operator(Operator::Sub),
                Command::Digit(4),
                Command::ClearAll,
            ],
        );
        assert_eq!(calc.operand_a(), FixedValue::from_int(9));
        assert_eq!(calc.operand_b(), FixedValue::ZERO);
        assert_eq!(calc.display(), "0.00");
    }

    #[test]
    fn test_sign_overflow_is_dropped() {
        let mut calc = Calculator::new();
        // -21474836.48 can only be reached by calculation
        press(
            &mut calc,
            &[
                Command::Digit(2),
                Command::Digit(1),
                Command::Digit(4),
                Command::Digit(7),
                Command::Digit(4),
                Command::Digit(8),
                Command::Digit(3),
                Command::Digit(6),
                Command::Decimal,
                Command::Digit(4),
                Command::Digit(8),
                Command::Sign,
            ],
        );
        // 21474836.48 is out of range, so the last digit was dropped
        assert_eq!(calc.display(), "-21474836.40");
        press(
            &mut calc,
            &[
                Command::Operator(Operator::Sub),
                Command::Decimal,
                Command::Digit(0),
                Command::Digit(8),
                Command::Equals,
                Command::Sign,
            ],
        );
        assert_eq!(calc.operand_a(), FixedValue::MIN);
        assert_eq!(calc.display(), "-21474836.48");
    }

    #[test]
    fn test_equals_without_operator_keeps_value() {
        let mut calc = Calculator::new();
        let update = press(&mut calc, &[Command::Digit(6), Command::Equals]);
        assert_eq!(update.text.as_str(), "6.00");
        assert!(calc.previous_result_pending());
        assert_eq!(calc.operand_a(), FixedValue::from_int(6));
    }

    #[test]
    fn test_error_literals() {
        let mut calc = Calculator::new();
        let update = press(
            &mut calc,
            &[Command::Digit(1), Command::Operator(Operator::Div), Command::Equals],
        );
        assert_eq!(update.text.as_str(), "Div By Zero");

        let update = press(
            &mut calc,
            &[
                Command::Digit(9),
                Command::Digit(9),
                Command::Operator(Operator::Pow),
                Command::Digit(9),
                Command::Equals,
            ],
        );
        assert_eq!(update.text.as_str(), "Overflow Error");
        assert_eq!(calc.operand_a(), FixedValue::ZERO);
        assert!(!calc.previous_result_pending());
    }

    #[test]
    fn test_fraction_places() {
        assert_eq!(fraction_places(FixedValue::from_int(7)), 0);
        assert_eq!(fraction_places(FixedValue::from_raw(750)), 1);
        assert_eq!(fraction_places(FixedValue::from_raw(-753)), 2);
        assert_eq!(fraction_places(FixedValue::from_raw(-5)), 2);
    }

    #[test]
    fn test_toggle_stays_in_fraction_of_result() {
        let config = CalculatorConfig::new(ChainPolicy::Append, DecimalPolicy::Toggle);
        let mut calc = Calculator::with_config(config);
        press(
            &mut calc,
            &[Command::Digit(7), Command::Decimal, Command::Digit(5), Command::Equals],
        );
        press(&mut calc, &[Command::Decimal, Command::Decimal]);
        assert!(calc.entering_fraction());
        press(&mut calc, &[Command::Digit(3)]);
        assert_eq!(calc.display(), "7.53");
    }

    #[test]
    fn test_navigation_keeps_display() {
        let mut calc = Calculator::new();
        press(&mut calc, &[Command::Digit(8)]);
        let update = calc.handle_event(Event::MoveSelection(Direction::Down));
        assert_eq!(update.text.as_str(), "8.00");
        assert_eq!(update.selected, Some(14));
        assert_eq!(calc.operand_a(), FixedValue::from_int(8));
    }
}
