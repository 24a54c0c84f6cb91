//! W5500 Ethernet bring-up and clock synchronization
//!
//! The network runs on its own core: the Ethernet runner, the network
//! stack, and the periodic SNTP resync task all live here and publish
//! sync points through `channels::TIME_SYNC`.

pub mod sntp;

use defmt::{info, warn};
use embassy_net::Stack;
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::spi::{Async, Spi};
use embassy_time::{Delay, Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;

use crate::channels::{SyncPoint, TIME_SYNC};

/// Interval between successful synchronizations (15 minutes)
const RESYNC_INTERVAL_SECS: u64 = 900;

/// Backoff between failed synchronization attempts
const RETRY_BACKOFF_MS: u64 = 2000;

/// SPI device handed to the W5500 driver
pub type EthSpi = ExclusiveDevice<Spi<'static, Async>, Output<'static>, Delay>;

/// Drives the W5500 MAC
#[embassy_executor::task]
pub async fn ethernet_task(
    runner: Runner<'static, W5500, EthSpi, Input<'static>, Output<'static>>,
) -> ! {
    runner.run().await
}

/// Drives the network stack (DHCP, sockets)
#[embassy_executor::task]
pub async fn net_task(mut runner: embassy_net::Runner<'static, Device<'static>>) -> ! {
    runner.run().await
}

/// Periodic SNTP synchronization
///
/// Retries indefinitely until the first sync lands, then refreshes the
/// shared sync point every `RESYNC_INTERVAL_SECS`.
#[embassy_executor::task]
pub async fn time_sync_task(stack: Stack<'static>) -> ! {
    stack.wait_config_up().await;
    info!("Network configured");

    loop {
        match sntp::sync(&stack).await {
            Ok(unix_secs) => {
                TIME_SYNC.lock(|cell| {
                    cell.set(Some(SyncPoint { unix_secs, at: Instant::now() }));
                });
                info!("Clock synchronized: {} s since epoch", unix_secs);
                Timer::after_secs(RESYNC_INTERVAL_SECS).await;
            }
            Err(e) => {
                warn!("Clock sync failed: {:?}, retrying", e);
                Timer::after_millis(RETRY_BACKOFF_MS).await;
            }
        }
    }
}
