//! Tessera - E-ink Badge Firmware
//!
//! Firmware for the Badger 2040 name badge. Five front-panel buttons flip
//! between contact cards, a QR page and inverted colours on the 2.9" e-ink
//! panel.
//!
//! Button edges are handled on a high-priority interrupt executor that does
//! nothing but timestamp and queue them. All debouncing, handler calls and
//! panel refreshes run on the thread executor.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tessera_core::badge::Badge;
use tessera_core::card::CardStore;
use tessera_core::input::ButtonId;

mod channels;
mod config;
mod display;
mod tasks;

use display::{EinkRenderer, QrImage, Uc8151};
use tasks::{BadgeApp, BatteryPins};

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Panel SPI clock
const SPI_FREQUENCY_HZ: u32 = 12_000_000;

/// Runs the button tasks in interrupt context
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

// Application context (must live forever for the dispatch task)
static BADGE: StaticCell<BadgeApp> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tessera firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Keep the 3V3 rail up while running on battery
    let _power = Output::new(p.PIN_10, Level::High);
    info!("Peripherals initialized");

    unwrap!(config::INPUT.validate());

    // Setup SPI0 for the e-ink panel
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let spi = ExclusiveDevice::new(spi, cs, Delay).unwrap_or_else(|e| match e {});

    let panel = Uc8151::new(
        spi,
        Output::new(p.PIN_20, Level::Low),
        Output::new(p.PIN_21, Level::High),
        Input::new(p.PIN_26, Pull::None),
        Delay,
    );
    let renderer = EinkRenderer::new(
        panel,
        QrImage {
            bitmap: config::QR_BITMAP,
            width: config::QR_WIDTH,
            height: config::QR_HEIGHT,
        },
    );
    info!("Panel initialized");

    let cards = unwrap!(CardStore::new(config::CARDS));
    info!("{} cards loaded", cards.len());

    let badge = BADGE.init(Badge::new(cards, renderer));
    badge.install_default_keymap();

    // Setup ADC for battery sensing
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let battery = BatteryPins {
        adc,
        vbat: Channel::new_pin(p.PIN_29, Pull::None),
        vref: Channel::new_pin(p.PIN_28, Pull::None),
        vref_enable: Output::new(p.PIN_27, Level::Low),
    };

    spawner.spawn(tasks::battery_task(battery)).unwrap();
    spawner.spawn(tasks::dispatch_task(badge)).unwrap();

    // Button edges preempt everything on the thread executor
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    let buttons = [
        (ButtonId::A, Input::new(p.PIN_12, Pull::Down)),
        (ButtonId::B, Input::new(p.PIN_13, Pull::Down)),
        (ButtonId::C, Input::new(p.PIN_14, Pull::Down)),
        (ButtonId::Up, Input::new(p.PIN_15, Pull::Down)),
        (ButtonId::Down, Input::new(p.PIN_11, Pull::Down)),
    ];
    for (button, pin) in buttons {
        high_spawner.spawn(tasks::button_task(button, pin)).unwrap();
    }

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
