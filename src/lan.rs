//! Best-effort LAN address detection.
//!
//! Phones join by URL, so the relay needs the address of whichever
//! interface the rest of the network can reach. A UDP socket "connected"
//! to a public address reveals that interface without sending a single
//! datagram; the connect call only performs a routing lookup.

use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Public address used for the routing probe. Never actually contacted.
const PROBE_ADDR: (&str, u16) = ("8.8.8.8", 80);

/// Returns the machine's LAN IP address, or the loopback address when
/// detection fails (no interfaces up, no route, sandboxed, ...).
/// Never fatal.
#[must_use]
pub fn detect_lan_ip() -> IpAddr {
    match probe_outbound_interface() {
        Ok(ip) => ip,
        Err(err) => {
            tracing::warn!(%err, "LAN address detection failed, falling back to loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn probe_outbound_interface() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(PROBE_ADDR)?;
    Ok(socket.local_addr()?.ip())
}

/// Builds the HTTP join URL for the chat page.
#[must_use]
pub fn build_join_url(ip: IpAddr, port: u16) -> String {
    format!("http://{ip}:{port}/")
}
