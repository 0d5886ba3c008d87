/// Failure conditions of the fixed-point engine.
///
/// The `Display` text of each variant is exactly what the calculator shows
/// on screen when an evaluation fails.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    /// The mathematical result does not fit the representable range.
    #[error("Overflow Error")]
    ArithmeticOverflow,
    /// Divisor was zero.
    #[error("Div By Zero")]
    DivisionByZero,
    /// Text could not be parsed as a decimal number.
    #[error("Input Error")]
    MalformedInput,
}
