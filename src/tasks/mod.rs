mod buttons;
mod calculator;
mod display;
mod usb;

use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::Channel;
use fixcalc::Event;

pub use buttons::init as init_buttons;
pub use calculator::init as init_calculator;
pub use display::init as init_display;
pub use display::DisplayProxy;
pub use usb::init as init_usb;

/// Button events waiting for the calculator task
pub static EVENT_CHANNEL: Channel<ThreadModeRawMutex, Event, 16> = Channel::new();
