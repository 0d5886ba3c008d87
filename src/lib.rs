#![cfg_attr(not(test), no_std)]

// Portable calculator core: builds for the RP2040 firmware and for host tests.

pub mod calculator;
pub mod config;
pub mod error;
pub mod fixed;
pub mod keypad;

pub use calculator::{Calculator, Command, DisplaySink, DisplayUpdate, Event, Operator};
pub use config::{CalculatorConfig, ChainPolicy, DecimalPolicy};
pub use error::CalcError;
pub use fixed::{DisplayText, FixedValue};
pub use keypad::{Direction, KEYPAD, Key, Selection};
