//! MediBox - Medication Reminder Firmware
//!
//! Main firmware binary for RP2040-based MediBox appliances: SSD1306
//! status display, four push buttons, buzzer and indicator LED, DHT22
//! hygrometer, and a W5500 Ethernet module for clock synchronization.
//!
//! The appliance is deliberately single-minded: one sequential control
//! loop owns every user-facing peripheral and runs on the second core,
//! while the first core keeps the Embassy executor for the network
//! stack and periodic SNTP resync.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::multicore::{spawn_core1, Stack as CoreStack};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use medibox_core::app::MediBox;
use medibox_core::traits::DisplaySink;
use medibox_drivers::sensor::Dht22;

use crate::board::{BuzzerLed, ButtonPad, DhtLine, MicroDelay, NtpClock, Oled, TimerDelay};
use crate::channels::TIME_SYNC;
use crate::display::ssd1306::Ssd1306;

mod board;
mod channels;
mod display;
mod net;

/// Locally administered MAC address for the W5500
const MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

/// Stack for the UI core
static mut CORE1_STACK: CoreStack<8192> = CoreStack::new();

static ETH_STATE: StaticCell<embassy_net_wiznet::State<8, 8>> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("MediBox firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Status display on I2C0; a dead panel is fatal since nothing can
    // be shown without it
    let panel_i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut panel = Ssd1306::new(panel_i2c);
    if panel.init().is_err() {
        error!("SSD1306 initialization failed");
        loop {
            cortex_m::asm::wfe();
        }
    }
    let mut oled = Oled::new(panel);
    info!("Display initialized");

    // W5500 Ethernet on SPI0
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 20_000_000;
    let spi = Spi::new(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        p.PIN_20,
        p.DMA_CH0,
        p.DMA_CH1,
        spi_config,
    );
    let cs = Output::new(p.PIN_17, Level::High);
    let spi_device = ExclusiveDevice::new(spi, cs, Delay).unwrap();
    let eth_int = Input::new(p.PIN_21, Pull::Up);
    let eth_reset = Output::new(p.PIN_22, Level::High);

    let eth_state = ETH_STATE.init(embassy_net_wiznet::State::new());
    let (device, eth_runner) =
        embassy_net_wiznet::new(MAC_ADDR, eth_state, spi_device, eth_int, eth_reset)
            .await
            .unwrap();
    info!("Ethernet initialized");

    // DHCP network stack; fixed seed, no RNG wired on this board
    let seed = 0x4d65_6469_426f_78u64;
    let (stack, net_runner) = embassy_net::new(
        device,
        NetConfig::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );

    spawner.spawn(net::ethernet_task(eth_runner)).unwrap();
    spawner.spawn(net::net_task(net_runner)).unwrap();
    spawner.spawn(net::time_sync_task(stack)).unwrap();

    // Everything waits for the first clock sync; the appliance is
    // useless without wall-clock time
    while TIME_SYNC.lock(|cell| cell.get()).is_none() {
        oled.clear();
        oled.print_line("Connecting", 0, 0, 2);
        Timer::after_millis(100).await;
    }
    oled.clear();
    oled.print_line("Connected", 0, 0, 2);
    Timer::after_millis(200).await;

    oled.clear();
    oled.print_line("Welcome to MediBox", 10, 18, 2);
    Timer::after_millis(200).await;
    oled.clear();

    // Remaining peripherals belong to the UI core
    let buttons = ButtonPad::new(
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
    );
    let buzzer = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, PwmConfig::default());
    let alert = BuzzerLed::new(buzzer, Output::new(p.PIN_14, Level::Low));
    let sensor = Dht22::new(DhtLine::new(Flex::new(p.PIN_16)), MicroDelay);

    // The control loop blocks freely on its own core; this core keeps
    // serving the network executor
    #[allow(static_mut_refs)]
    let core1_stack = unsafe { &mut CORE1_STACK };
    spawn_core1(p.CORE1, core1_stack, move || {
        info!("Control loop started");
        let mut medibox = MediBox::new(NtpClock::new(), buttons, oled, alert, sensor, TimerDelay);
        medibox.run()
    });

    loop {
        Timer::after_secs(60).await;
        trace!("net core heartbeat");
    }
}
