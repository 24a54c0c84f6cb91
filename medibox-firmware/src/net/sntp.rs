//! Minimal SNTP client
//!
//! Sends a 48-byte mode-3 request over UDP and extracts the transmit
//! timestamp from the response.

use defmt::{info, warn, Debug2Format, Format};
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Stack};
use embassy_time::{Duration, Timer};

/// NTP servers tried in order
const NTP_SERVERS: &[&str] = &["pool.ntp.org", "time.google.com"];

/// SNTP port (UDP 123)
const SNTP_PORT: u16 = 123;

/// Response timeout per attempt
const SNTP_TIMEOUT_MS: u64 = 5000;

/// Seconds between the NTP era origin (1900) and the Unix epoch (1970)
const NTP_UNIX_DELTA: u64 = 2_208_988_800;

/// SNTP client errors
#[derive(Debug, Clone, Copy, Format)]
pub enum SntpError {
    /// Network communication error
    Network,
    /// Request timeout
    Timeout,
    /// Malformed or unsynchronized response
    InvalidResponse,
    /// All configured servers failed
    AllServersFailed,
}

/// Query each configured server until one answers
///
/// Returns seconds since the Unix epoch.
pub async fn sync(stack: &Stack<'static>) -> Result<u64, SntpError> {
    for server in NTP_SERVERS {
        match request(stack, server).await {
            Ok(unix_secs) => return Ok(unix_secs),
            Err(e) => warn!("SNTP request to {} failed: {:?}", server, e),
        }
    }
    Err(SntpError::AllServersFailed)
}

/// Send one SNTP request and parse the response
async fn request(stack: &Stack<'static>, server: &str) -> Result<u64, SntpError> {
    // Resolve DNS hostname to IP
    let server_ip = match stack
        .dns_query(server, DnsQueryType::A)
        .await
        .map_err(|_| SntpError::Network)?
        .first()
    {
        Some(ip) => *ip,
        None => return Err(SntpError::Network),
    };
    let endpoint = IpEndpoint::new(server_ip, SNTP_PORT);
    info!("Resolved {} to {}", server, Debug2Format(&endpoint));

    // NTP packets are 48 bytes; small buffers suffice
    let mut rx_meta = [PacketMetadata::EMPTY; 2];
    let mut rx_buffer = [0u8; 64];
    let mut tx_meta = [PacketMetadata::EMPTY; 2];
    let mut tx_buffer = [0u8; 64];
    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(0).map_err(|_| SntpError::Network)?;

    // Request packet: LI=0, VN=3, Mode=3 (client)
    let mut packet = [0u8; 48];
    packet[0] = 0x1B;
    socket
        .send_to(&packet, endpoint)
        .await
        .map_err(|_| SntpError::Network)?;

    // Receive response with timeout
    let mut response = [0u8; 48];
    let timeout = Timer::after(Duration::from_millis(SNTP_TIMEOUT_MS));
    let (len, from) = match select(timeout, socket.recv_from(&mut response)).await {
        Either::First(_) => return Err(SntpError::Timeout),
        Either::Second(result) => result.map_err(|_| SntpError::Network)?,
    };

    if len < 48 || from.endpoint.addr != server_ip {
        return Err(SntpError::InvalidResponse);
    }

    // Stratum 0 means the server itself is unsynchronized
    if response[1] == 0 {
        return Err(SntpError::InvalidResponse);
    }

    // Transmit timestamp seconds, bytes 40-43
    let ntp_secs =
        u32::from_be_bytes([response[40], response[41], response[42], response[43]]) as u64;
    if ntp_secs < NTP_UNIX_DELTA {
        return Err(SntpError::InvalidResponse);
    }

    Ok(ntp_secs - NTP_UNIX_DELTA)
}
