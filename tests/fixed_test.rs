// Fixed-point engine checked against rust_decimal as a reference.

use core::str::FromStr;

use fixcalc::{CalcError, FixedValue};
use rust_decimal::prelude::*;

/// Deterministic raw values spread over the whole range
fn samples() -> Vec<i32> {
    let mut state: u32 = 0x2545_f491;
    let mut values = vec![0, 1, -1, 99, -99, 100, -100, 12_345, -67_890, i32::MAX, i32::MIN];
    for shift in [0, 8, 16, 24] {
        for _ in 0..64 {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            values.push((state as i32) >> shift);
        }
    }
    values
}

fn to_decimal(value: FixedValue) -> Decimal {
    Decimal::new(i64::from(value.to_raw()), 2)
}

/// Reference result truncated to two places, or None when out of range
fn expected(reference: Decimal) -> Option<FixedValue> {
    let truncated = reference.round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let raw = (truncated * Decimal::ONE_HUNDRED).to_i64()?;
    i32::try_from(raw).ok().map(FixedValue::from_raw)
}

fn check(actual: Result<FixedValue, CalcError>, reference: Option<Decimal>, what: &str) {
    match reference.and_then(expected) {
        Some(value) => assert_eq!(actual, Ok(value), "{what}"),
        None => assert_eq!(actual, Err(CalcError::ArithmeticOverflow), "{what}"),
    }
}

#[test]
fn test_round_trip() {
    for raw in samples() {
        let value = FixedValue::from_raw(raw);
        let text = value.format();
        assert_eq!(FixedValue::parse(&text), Ok(value), "{text}");
        assert_eq!(text.parse::<FixedValue>(), Ok(value));
    }
}

#[test]
fn test_format_matches_reference() {
    for raw in samples() {
        let value = FixedValue::from_raw(raw);
        assert_eq!(value.to_string(), to_decimal(value).to_string());
    }
}

#[test]
fn test_add_sub_against_reference() {
    let values = samples();
    for &a in &values {
        for &b in values.iter().step_by(7) {
            let (x, y) = (FixedValue::from_raw(a), FixedValue::from_raw(b));
            let (dx, dy) = (to_decimal(x), to_decimal(y));
            check(x.checked_add(y), dx.checked_add(dy), &format!("{x} + {y}"));
            check(x.checked_sub(y), dx.checked_sub(dy), &format!("{x} - {y}"));
        }
    }
}

#[test]
fn test_mul_div_against_reference() {
    let values = samples();
    for &a in &values {
        for &b in values.iter().step_by(5) {
            let (x, y) = (FixedValue::from_raw(a), FixedValue::from_raw(b));
            let (dx, dy) = (to_decimal(x), to_decimal(y));
            check(x.checked_mul(y), dx.checked_mul(dy), &format!("{x} * {y}"));

            if y.is_zero() {
                assert_eq!(x.checked_div(y), Err(CalcError::DivisionByZero));
            } else {
                check(x.checked_div(y), dx.checked_div(dy), &format!("{x} / {y}"));
            }
        }
    }
}

#[test]
fn test_overflow_detection() {
    assert_eq!(
        FixedValue::MAX.checked_mul(FixedValue::from_int(2)),
        Err(CalcError::ArithmeticOverflow)
    );
    assert_eq!(
        FixedValue::MAX.checked_add(FixedValue::from_int(1)),
        Err(CalcError::ArithmeticOverflow)
    );
}

#[test]
fn test_small_powers_against_reference() {
    // Squares of these bases are exact, so only the last multiplication truncates
    for base in ["2", "-3", "1.1", "0.9", "12.5", "-0.5"] {
        let x = FixedValue::from_str(base).unwrap();
        for exponent in 0..=3 {
            let reference = to_decimal(x).checked_powi(exponent);
            check(
                x.checked_pow(exponent as i32),
                reference,
                &format!("{base} ^ {exponent}"),
            );
        }
    }
}

#[test]
fn test_malformed_input() {
    assert_eq!(FixedValue::parse("1.2.3"), Err(CalcError::MalformedInput));
    assert_eq!("".parse::<FixedValue>(), Err(CalcError::MalformedInput));
    assert_eq!(CalcError::MalformedInput.to_string(), "Input Error");
}
