use crate::tasks::EVENT_CHANNEL;
use crate::utils::debounce::Debounce;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pin, Pull};
use embassy_rp::Peri;
use embassy_time::{Duration, Timer};
use fixcalc::{Direction, Event};
use log::{debug, info};

/// How long a button level must hold before it counts
const DEBOUNCE_DELAY: Duration = Duration::from_millis(20);

/// Button poll rate
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A push button wired to ground, with the event it produces when pressed
struct Button {
    input: Input<'static>,
    pressed: Debounce<bool>,
    event: Event,
}

impl Button {
    fn new(input: Input<'static>, event: Event) -> Self {
        Self {
            input,
            pressed: Debounce::new(false, DEBOUNCE_DELAY),
            event,
        }
    }

    /// Sample the pin, returning the event on a debounced press
    fn poll(&mut self) -> Option<Event> {
        match self.pressed.update(self.input.is_low()) {
            Some(true) => Some(self.event),
            _ => None,
        }
    }
}

pub async fn init(
    spawner: &Spawner,
    pin_up: Peri<'static, impl Pin>,
    pin_down: Peri<'static, impl Pin>,
    pin_select: Peri<'static, impl Pin>,
) {
    let buttons = [
        Button::new(Input::new(pin_up, Pull::Up), Event::MoveSelection(Direction::Up)),
        Button::new(Input::new(pin_down, Pull::Up), Event::MoveSelection(Direction::Down)),
        Button::new(Input::new(pin_select, Pull::Up), Event::Activate),
    ];

    spawner.spawn(buttons_task(buttons).unwrap());
}

#[embassy_executor::task]
async fn buttons_task(mut buttons: [Button; 3]) {
    info!("Button task started");

    let sender = EVENT_CHANNEL.sender();

    loop {
        for button in buttons.iter_mut() {
            if let Some(event) = button.poll() {
                debug!("Button event: {event:?}");
                sender.send(event).await;
            }
        }

        Timer::after(POLL_INTERVAL).await;
    }
}
