#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod tasks;
#[cfg(target_os = "none")]
mod utils;

#[cfg(not(target_os = "none"))]
mod host;

#[cfg(target_os = "none")]
use {
    crate::tasks::{init_buttons, init_calculator, init_display, init_usb, DisplayProxy},
    defmt_rtt as _,
    embassy_executor::Spawner,
    embassy_rp::config::Config,
    embassy_time::Timer,
    embedded_graphics::mono_font::ascii::FONT_6X10,
    embedded_graphics::mono_font::MonoTextStyleBuilder,
    embedded_graphics::pixelcolor::BinaryColor,
    embedded_graphics::prelude::{DrawTarget, Point},
    embedded_graphics::text::{Baseline, Text},
    embedded_graphics::Drawable,
    panic_probe as _,
};

#[cfg(target_os = "none")]
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_rp::init(Config::default());

    init_usb(
        &spawner,
        peripherals.USB
    ).await;

    init_display(
        &spawner,
        peripherals.SPI1,
        peripherals.PIN_14,
        peripherals.PIN_15,
        peripherals.PIN_13,
        peripherals.PIN_3,
        peripherals.PIN_10,
    ).await;

    show_text("FixCalc");

    init_buttons(
        &spawner,
        peripherals.PIN_26,
        peripherals.PIN_27,
        peripherals.PIN_28,
    ).await;

    // Let the splash stay up for a moment before the keypad replaces it
    Timer::after_millis(500).await;

    init_calculator(&spawner).await;

    log::info!("Ready");

    // Busy loop
    loop {
        Timer::after_secs(1).await;
    }
}

#[cfg(target_os = "none")]
fn show_text(text: &str) {
    let mut display = DisplayProxy::new();

    let text_style = MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build();

    let drawn = display
        .clear(BinaryColor::Off)
        .and_then(|()| {
            Text::with_baseline(text, Point::new(5, 38), text_style, Baseline::Middle)
                .draw(&mut display)
                .map(|_| ())
        })
        .and_then(|()| display.flush());

    if let Err(e) = drawn {
        log::error!("Splash screen dropped: {e:?}");
    }
}

#[cfg(not(target_os = "none"))]
fn main() -> std::io::Result<()> {
    host::run()
}
