//! Line-driven stand-in for the firmware when built for a desktop target.
//!
//! Reads whitespace separated tokens from stdin: `u`/`up` and `d`/`down` move
//! the selection, `s`/`select` activates it, and any key label (`7`, `+/-`,
//! `=`) walks the selection to that key and activates it.

use std::io::{self, BufRead, Write};

use fixcalc::{Calculator, Direction, DisplaySink, DisplayUpdate, Event, KEYPAD};

/// Prints every update on its own line
struct Terminal<W> {
    out: W,
}

impl<W: Write> DisplaySink for Terminal<W> {
    fn show(&mut self, update: &DisplayUpdate) {
        let written = match update.selected {
            Some(index) => writeln!(self.out, "[{}] {}", KEYPAD[index].label(), update.text),
            None => writeln!(self.out, "{}", update.text),
        };

        if let Err(e) = written {
            log::error!("Terminal write failed: {e}");
        }
    }
}

pub fn run() -> io::Result<()> {
    let mut calculator = Calculator::new();
    let mut terminal = Terminal { out: io::stdout().lock() };

    writeln!(terminal.out, "{}", calculator.display())?;

    for line in io::stdin().lock().lines() {
        let line = line?;

        for token in line.split_whitespace() {
            match token {
                "u" | "up" => calculator.dispatch(Event::MoveSelection(Direction::Up), &mut terminal),
                "d" | "down" => calculator.dispatch(Event::MoveSelection(Direction::Down), &mut terminal),
                "s" | "select" => calculator.dispatch(Event::Activate, &mut terminal),
                label => match KEYPAD.iter().position(|key| key.label() == label) {
                    Some(target) => {
                        while calculator.selected_key() != target {
                            calculator.handle_event(Event::MoveSelection(Direction::Down));
                        }
                        calculator.dispatch(Event::Activate, &mut terminal);
                    }
                    None => writeln!(io::stderr(), "unknown key: {label}")?,
                },
            }
        }
    }

    Ok(())
}
