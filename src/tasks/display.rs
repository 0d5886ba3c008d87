use display_interface::DisplayError;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{ClkPin, Config as SpiConfig, MosiPin, Spi};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::{Channel, Sender, TrySendError};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::Pixel;
use embedded_hal_bus::spi::ExclusiveDevice;
use log::{error, info};
use ssd1306::command::Command;
use ssd1306::prelude::*;
use ssd1306::size::DisplaySize as DisplaySizeTrait;
use ssd1306::Ssd1306;
use static_cell::StaticCell;

const PANEL_WIDTH: u8 = 132;
const PANEL_HEIGHT: u8 = 64;

/// 132x64 SH1106-style panel; only the COM pin layout differs from the defaults
#[derive(Debug, Copy, Clone)]
pub struct Panel;
impl DisplaySizeTrait for Panel {
    const WIDTH: u8 = PANEL_WIDTH;
    const HEIGHT: u8 = PANEL_HEIGHT;
    type Buffer = [u8; PANEL_WIDTH as usize * PANEL_HEIGHT as usize / 8];

    fn configure(&self, iface: &mut impl WriteOnlyDataCommand) -> Result<(), DisplayError> {
        Command::ComPinConfig(true, false).send(iface)
    }
}

type PanelSpi = ExclusiveDevice<
    Spi<'static, SPI1, embassy_rp::spi::Blocking>,
    Output<'static>,
    embedded_hal_bus::spi::NoDelay,
>;
type PanelDriver =
    Ssd1306<SPIInterface<PanelSpi, Output<'static>>, Panel, ssd1306::mode::BufferedGraphicsMode<Panel>>;

/// SPI clock for the panel
const SPI_FREQUENCY: u32 = 8_000_000;

/// Pixels per queued draw chunk
const DRAW_BUFFER_SIZE: usize = 128;

/// Drawing commands executed by the display task
#[derive(Debug)]
pub enum DisplayAction {
    Clear(BinaryColor),
    FillSolid(Rectangle, BinaryColor),
    Draw(heapless::Vec<Pixel<BinaryColor>, DRAW_BUFFER_SIZE>),
    Flush,
}

type ActionSender = Sender<'static, ThreadModeRawMutex, DisplayAction, 64>;

static DISPLAY: StaticCell<PanelDriver> = StaticCell::new();
const DISPLAY_SIZE: Rectangle = Rectangle::new(
    Point::zero(),
    Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32),
);
static DISPLAY_CHANNEL: Channel<ThreadModeRawMutex, DisplayAction, 64> = Channel::new();

pub async fn init(
    spawner: &Spawner,
    pin_spi: Peri<'static, SPI1>,
    pin_clk: Peri<'static, impl ClkPin<SPI1>>,
    pin_mosi: Peri<'static, impl MosiPin<SPI1>>,
    pin_dc: Peri<'static, impl Pin>,
    pin_rst: Peri<'static, impl Pin>,
    pin_cs: Peri<'static, impl Pin>,
) {
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY;

    let spi = Spi::new_blocking_txonly(pin_spi, pin_clk, pin_mosi, spi_config);

    let dc_pin = Output::new(pin_dc, Level::Low);
    let mut rst_pin = Output::new(pin_rst, Level::High);
    let cs_pin = Output::new(pin_cs, Level::High);

    // Hardware reset pulse
    for level in [Level::Low, Level::High] {
        rst_pin.set_level(level);
        Timer::after_millis(10).await;
    }

    let spi_device = match ExclusiveDevice::new_no_delay(spi, cs_pin) {
        Ok(device) => device,
        Err(_) => {
            error!("Display SPI device setup failed!");
            return;
        }
    };
    let interface = SPIInterface::new(spi_device, dc_pin);

    let display = DISPLAY.init(
        Ssd1306::new(interface, Panel, DisplayRotation::Rotate0).into_buffered_graphics_mode(),
    );

    if let Err(e) = display.init() {
        error!("Panel {PANEL_WIDTH}x{PANEL_HEIGHT} did not initialize: {e:?}");
        return;
    }

    spawner.spawn(display_task(display).unwrap());
    info!("Panel {PANEL_WIDTH}x{PANEL_HEIGHT} ready");
}

#[embassy_executor::task]
async fn display_task(display: &'static mut PanelDriver) {
    info!("Display rendering task started");

    let receiver = DISPLAY_CHANNEL.receiver();

    loop {
        let result = match receiver.receive().await {
            DisplayAction::Clear(color) => DrawTarget::clear(&mut *display, color),
            DisplayAction::FillSolid(rect, color) => display.fill_solid(&rect, color),
            DisplayAction::Draw(pixels) => display.draw_iter(pixels),
            DisplayAction::Flush => display.flush(),
        };

        if let Err(e) = result {
            error!("Display error: {e:?}");
        }
    }
}

/// Draw target that queues actions for the display task instead of
/// touching the panel. Never blocks: a full queue is reported as an error.
pub struct DisplayProxy {
    channel: ActionSender,
}

impl DisplayProxy {
    pub fn new() -> Self {
        Self {
            channel: DISPLAY_CHANNEL.sender(),
        }
    }

    /// Push the frame drawn so far to the panel
    pub fn flush(&mut self) -> Result<(), TrySendError<DisplayAction>> {
        self.channel.try_send(DisplayAction::Flush)
    }
}

impl Dimensions for DisplayProxy {
    fn bounding_box(&self) -> Rectangle {
        DISPLAY_SIZE
    }
}

impl DrawTarget for DisplayProxy {
    type Color = BinaryColor;
    type Error = TrySendError<DisplayAction>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let mut chunk: heapless::Vec<Pixel<BinaryColor>, DRAW_BUFFER_SIZE> = heapless::Vec::new();

        for pixel in pixels {
            if chunk.push(pixel).is_err() {
                self.channel.try_send(DisplayAction::Draw(chunk))?;
                chunk = heapless::Vec::new();
                // A fresh chunk always has room
                let _ = chunk.push(pixel);
            }
        }

        if !chunk.is_empty() {
            self.channel.try_send(DisplayAction::Draw(chunk))?;
        }

        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.channel.try_send(DisplayAction::FillSolid(*area, color))
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.channel.try_send(DisplayAction::Clear(color))
    }
}
