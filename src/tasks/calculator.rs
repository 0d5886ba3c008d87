use crate::tasks::display::DisplayAction;
use crate::tasks::{DisplayProxy, EVENT_CHANNEL};
use embassy_executor::Spawner;
use embassy_sync::channel::TrySendError;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_7X13_BOLD};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use fixcalc::{Calculator, DisplaySink, DisplayText, DisplayUpdate, Selection, KEYPAD};
use log::{error, info};

// Screen layout: one result line on top, the 5x4 keypad below it
const RESULT_ANCHOR: Point = Point::new(126, 1);
const GRID_TOP: i32 = 14;
const CELL_WIDTH: u32 = 32;
const CELL_HEIGHT: u32 = 10;

/// Draws the calculator screen whenever the state machine reports a change
struct Screen {
    proxy: DisplayProxy,
    text: DisplayText,
    selected: usize,
}

impl Screen {
    fn new(calculator: &Calculator) -> Self {
        let mut text = DisplayText::new();
        let pushed = text.push_str(calculator.display());
        debug_assert!(pushed.is_ok());

        Self {
            proxy: DisplayProxy::new(),
            text,
            selected: calculator.selected_key(),
        }
    }

    fn redraw(&mut self) -> Result<(), TrySendError<DisplayAction>> {
        self.proxy.clear(BinaryColor::Off)?;

        let right_top: TextStyle = TextStyleBuilder::new()
            .alignment(Alignment::Right)
            .baseline(Baseline::Top)
            .build();
        let centered: TextStyle = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(
            &self.text,
            RESULT_ANCHOR,
            MonoTextStyle::new(&FONT_7X13_BOLD, BinaryColor::On),
            right_top,
        )
        .draw(&mut self.proxy)?;

        for (index, key) in KEYPAD.iter().enumerate() {
            let cell = Selection::new(index);
            let bounds = Rectangle::new(
                Point::new(
                    cell.column() as i32 * CELL_WIDTH as i32,
                    GRID_TOP + cell.row() as i32 * CELL_HEIGHT as i32,
                ),
                Size::new(CELL_WIDTH - 2, CELL_HEIGHT),
            );

            // Highlight the selected key by inverting it
            let ink = if index == self.selected {
                bounds
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(&mut self.proxy)?;
                BinaryColor::Off
            } else {
                BinaryColor::On
            };

            Text::with_text_style(
                key.label(),
                bounds.center(),
                MonoTextStyle::new(&FONT_6X10, ink),
                centered,
            )
            .draw(&mut self.proxy)?;
        }

        self.proxy.flush()
    }
}

impl DisplaySink for Screen {
    fn show(&mut self, update: &DisplayUpdate) {
        self.text = update.text.clone();
        if let Some(selected) = update.selected {
            self.selected = selected;
        }

        if let Err(e) = self.redraw() {
            error!("Display queue full, frame dropped: {e:?}");
        }
    }
}

pub async fn init(spawner: &Spawner) {
    spawner.spawn(calculator_task().unwrap());
}

#[embassy_executor::task]
async fn calculator_task() {
    info!("Calculator task started");

    let mut calculator = Calculator::new();
    let mut screen = Screen::new(&calculator);
    let receiver = EVENT_CHANNEL.receiver();

    if let Err(e) = screen.redraw() {
        error!("Initial draw failed: {e:?}");
    }

    loop {
        let event = receiver.receive().await;
        calculator.dispatch(event, &mut screen);
    }
}
