//! Submenu and Widget - firmware entry point.
//!
//! nRF52840 with an SSD1306 128×64 OLED on TWIM0 and six buttons. The
//! buttons feed a channel; the application pulls events from it through
//! [`Frontend`], which also pushes each finished frame to the panel
//! before waiting.

#![no_std]
#![no_main]
#![allow(async_fn_in_trait)]

mod ui;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use static_cell::StaticCell;

use submenu_widget::config::INPUT_CHANNEL_DEPTH;
use submenu_widget::gui::input::{InputEvent, InputKey, InputSource};
use submenu_widget::{submenu_and_widget_app_main, Gui};

use ui::display::{self, Display};

use defmt_rtt as _;
use panic_probe as _;

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

static GUI: StaticCell<Gui> = StaticCell::new();
static INPUT: Channel<CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_DEPTH> = Channel::new();

type Panel = Display<Twim<'static, peripherals::TWISPI0>>;

/// Input source of the application: flushes the pending frame, then
/// waits for the next button event.
struct Frontend {
    gui: &'static Gui,
    display: Panel,
    events: Receiver<'static, CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_DEPTH>,
}

impl InputSource for Frontend {
    async fn next_event(&mut self) -> Option<InputEvent> {
        let panel = &mut self.display;
        if let Some(Err(error)) = self.gui.take_frame(|canvas| display::present(panel, canvas)) {
            warn!("Display: frame dropped: {}", error);
        }
        Some(self.events.receive().await)
    }
}

#[embassy_executor::task(pool_size = 6)]
async fn button(pin: AnyPin, key: InputKey) -> ! {
    ui::buttons::button_task(pin, key, INPUT.sender()).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("submenu-widget v{=str}", env!("CARGO_PKG_VERSION"));

    let p = embassy_nrf::init(Default::default());

    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let display = match display::init(i2c) {
        Ok(display) => display,
        Err(error) => panic!("SSD1306 init failed: {:?}", error),
    };

    let keys = [
        (p.P0_11.degrade(), InputKey::Up),
        (p.P0_12.degrade(), InputKey::Down),
        (p.P0_24.degrade(), InputKey::Left),
        (p.P0_25.degrade(), InputKey::Right),
        (p.P1_08.degrade(), InputKey::Ok),
        (p.P1_07.degrade(), InputKey::Back),
    ];
    for (pin, key) in keys {
        if spawner.spawn(button(pin, key)).is_err() {
            warn!("Button: task for {} not spawned", key);
        }
    }

    let gui: &'static Gui = GUI.init(Gui::new());
    let mut frontend = Frontend {
        gui,
        display,
        events: INPUT.receiver(),
    };

    let code = submenu_and_widget_app_main(gui, &mut frontend, None).await;
    info!("App exited with {}; restarting", code);

    // Show the blank frame left behind by the app before resetting.
    let panel = &mut frontend.display;
    if let Some(Err(error)) = gui.take_frame(|canvas| display::present(panel, canvas)) {
        warn!("Display: final frame dropped: {}", error);
    }
    cortex_m::peripheral::SCB::sys_reset();
}
