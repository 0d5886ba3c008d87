// Decimal fixed-point arithmetic for the calculator.
// Values are i32 integers scaled by 100, so two fractional digits are kept.
// Every operation that can leave the representable range reports it through
// its Result instead of wrapping.

use core::fmt::{self, Write};
use core::str::FromStr;

use crate::config::DISPLAY_CAPACITY;
use crate::error::CalcError;

/// Text buffer holding one display line.
pub type DisplayText = heapless::String<DISPLAY_CAPACITY>;

/// Signed decimal number with a fixed number of fractional digits.
///
/// The raw integer divided by [`FixedValue::SCALE`] is the represented value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedValue(i32);

const SCALE_WIDE: i64 = FixedValue::SCALE as i64;

impl FixedValue {
    /// Divisor between the raw integer and the represented value.
    pub const SCALE: i32 = 100;

    /// Number of fractional digits implied by the scale.
    pub const FRACTION_DIGITS: u8 = 2;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(Self::SCALE);
    pub const TEN: Self = Self(10 * Self::SCALE);

    /// -21474836.48
    pub const MIN: Self = Self(i32::MIN);

    /// 21474836.47
    pub const MAX: Self = Self(i32::MAX);

    /// Build a value from its scaled representation.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> i32 {
        self.0
    }

    /// Exact conversion from an integer. Every `i16` is in range, wider
    /// integers go through `TryFrom<i32>`.
    pub const fn from_int(n: i16) -> Self {
        Self(n as i32 * Self::SCALE)
    }

    /// Integer part, truncated toward zero.
    pub const fn to_int(self) -> i32 {
        self.0 / Self::SCALE
    }

    /// Scaled remainder below one unit; carries the sign of the value.
    pub const fn fraction_raw(self) -> i32 {
        self.0 % Self::SCALE
    }

    /// Drop the fractional part.
    pub const fn trunc(self) -> Self {
        Self(self.0 - self.fraction_raw())
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Narrow a widened raw result back into range.
    fn narrow(wide: i64) -> Result<Self, CalcError> {
        i32::try_from(wide)
            .map(Self)
            .map_err(|_| CalcError::ArithmeticOverflow)
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, CalcError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(CalcError::ArithmeticOverflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, CalcError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(CalcError::ArithmeticOverflow)
    }

    /// Negation. Fails only for [`FixedValue::MIN`].
    pub fn checked_neg(self) -> Result<Self, CalcError> {
        self.0
            .checked_neg()
            .map(Self)
            .ok_or(CalcError::ArithmeticOverflow)
    }

    /// Multiply, truncating the extra fractional digits toward zero.
    ///
    /// The raw product is computed in 64 bits and only narrowed after
    /// rescaling, so both steps are checked.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, CalcError> {
        let product = i64::from(self.0)
            .checked_mul(i64::from(rhs.0))
            .ok_or(CalcError::ArithmeticOverflow)?;

        Self::narrow(product / SCALE_WIDE)
    }

    /// Divide, truncating toward zero.
    ///
    /// A zero divisor yields [`CalcError::DivisionByZero`]; a quotient out of
    /// range (e.g. `MIN / -0.01`) yields [`CalcError::ArithmeticOverflow`].
    pub fn checked_div(self, rhs: Self) -> Result<Self, CalcError> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }

        let dividend = i64::from(self.0)
            .checked_mul(SCALE_WIDE)
            .ok_or(CalcError::ArithmeticOverflow)?;

        Self::narrow(dividend / i64::from(rhs.0))
    }

    /// Integer power by repeated multiplication.
    ///
    /// Each intermediate product is truncated like [`FixedValue::checked_mul`]
    /// and overflow from any step is returned. A negative exponent computes
    /// `1 / base^|exponent|`, so a zero base then fails with
    /// [`CalcError::DivisionByZero`].
    pub fn checked_pow(self, exponent: i32) -> Result<Self, CalcError> {
        if exponent < 0 {
            let denominator = self.pow_unsigned(exponent.unsigned_abs())?;
            return Self::ONE.checked_div(denominator);
        }

        self.pow_unsigned(exponent.unsigned_abs())
    }

    fn pow_unsigned(self, exponent: u32) -> Result<Self, CalcError> {
        if exponent == 0 {
            return Ok(Self::ONE);
        }

        // |base| == 1 never changes magnitude; answer by parity instead of looping.
        if self.0.unsigned_abs() == Self::SCALE.unsigned_abs() {
            return Ok(if self.is_negative() && exponent % 2 == 1 {
                self
            } else {
                Self::ONE
            });
        }

        let mut acc = self;
        for _ in 1..exponent {
            if acc.is_zero() {
                break;
            }
            acc = acc.checked_mul(self)?;
        }

        Ok(acc)
    }

    /// Render into a display buffer, see the `Display` impl for the format.
    pub fn format(self) -> DisplayText {
        let mut text = DisplayText::new();
        let written = write!(&mut text, "{self}");
        // The widest value is 12 characters
        debug_assert!(written.is_ok(), "display buffer too small for {self:?}");
        text
    }

    /// Parse `[+|-]digits[.digits]`.
    ///
    /// At least one digit must be present and at most
    /// [`FixedValue::FRACTION_DIGITS`] may follow the point. Anything else is
    /// [`CalcError::MalformedInput`]; a well-formed number outside the range is
    /// [`CalcError::ArithmeticOverflow`].
    pub fn parse(text: &str) -> Result<Self, CalcError> {
        let (negative, body) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (integer, fraction) = body.split_once('.').unwrap_or((body, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty())
            || fraction.len() > usize::from(Self::FRACTION_DIGITS)
            || !all_digits(integer)
            || !all_digits(fraction)
        {
            return Err(CalcError::MalformedInput);
        }

        let mut raw: i64 = 0;
        for b in integer.bytes() {
            raw = raw
                .checked_mul(10)
                .and_then(|r| r.checked_add(i64::from(b - b'0')))
                .ok_or(CalcError::ArithmeticOverflow)?;
        }
        raw = raw
            .checked_mul(SCALE_WIDE)
            .ok_or(CalcError::ArithmeticOverflow)?;

        let mut place = SCALE_WIDE / 10;
        for b in fraction.bytes() {
            raw = raw
                .checked_add(i64::from(b - b'0') * place)
                .ok_or(CalcError::ArithmeticOverflow)?;
            place /= 10;
        }

        Self::narrow(if negative { -raw } else { raw })
    }
}

impl TryFrom<i32> for FixedValue {
    type Error = CalcError;

    fn try_from(n: i32) -> Result<Self, Self::Error> {
        n.checked_mul(Self::SCALE)
            .map(Self)
            .ok_or(CalcError::ArithmeticOverflow)
    }
}

impl From<i16> for FixedValue {
    fn from(n: i16) -> Self {
        Self::from_int(n)
    }
}

/// `[-]digits.dd`, always with every fractional digit of the scale.
impl fmt::Display for FixedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let scale = Self::SCALE.unsigned_abs();

        if self.is_negative() {
            f.write_char('-')?;
        }

        write!(
            f,
            "{}.{:0width$}",
            magnitude / scale,
            magnitude % scale,
            width = usize::from(Self::FRACTION_DIGITS)
        )
    }
}

impl FromStr for FixedValue {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
