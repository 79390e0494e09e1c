//! UDP transport for ACN PDU blocks.
//!
//! ACN over UDP has whole-datagram semantics: each datagram is the 16 byte
//! preamble followed by exactly one root PDU block, and a datagram is
//! processed or dropped as a unit. [UdpTransport] is a thin shim over a
//! `socket2` configured socket; packing and preamble handling stay in
//! `acn-core`.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use log::debug;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::error::Error;

/// A UDP socket set up for ACN traffic.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds a reusable UDP socket to `addr`, normally the wildcard address
    /// on [ACN_SDT_MULTICAST_PORT](acn_core::acn_definitions::ACN_SDT_MULTICAST_PORT).
    ///
    /// Address reuse is enabled so several ACN components on one host can
    /// listen to the same port.
    pub fn bind(addr: SocketAddr) -> Result<Self, Error> {
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&SockAddr::from(addr))?;
        Ok(Self { socket: socket.into() })
    }

    /// Joins the multicast group for an E1.31 universe.
    ///
    /// The group is derived per ANSI E1.31-2018 Section 9.3.1 Table 9-10:
    /// 239.255.high_byte.low_byte of the universe number.
    pub fn join_universe(&self, universe: u16) -> Result<(), Error> {
        let group = Self::universe_multicast_addr(universe);
        debug!("joining multicast group {group} for universe {universe}");
        self.socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED).map_err(Error::JoinMulticast)
    }

    /// Leaves the multicast group for an E1.31 universe.
    pub fn leave_universe(&self, universe: u16) -> Result<(), Error> {
        let group = Self::universe_multicast_addr(universe);
        Ok(self.socket.leave_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?)
    }

    /// The IPv4 multicast group an E1.31 universe maps to.
    pub fn universe_multicast_addr(universe: u16) -> Ipv4Addr {
        let high_byte = ((universe >> 8) & 0xff) as u8;
        let low_byte = (universe & 0xff) as u8;
        Ipv4Addr::new(239, 255, high_byte, low_byte)
    }

    /// Sends one preformed datagram (preamble plus root PDU block) to
    /// `dest`.
    pub fn send_to(&self, data: &[u8], dest: SocketAddr) -> Result<usize, Error> {
        self.socket.send_to(data, dest).map_err(Error::SendBlock)
    }

    /// Receives one datagram. Returns the payload length and the sender's
    /// address; the caller runs [strip_udp_preamble](acn_core::preamble::strip_udp_preamble)
    /// and an inflator chain over `buf[..len]`.
    pub fn receive(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), Error> {
        Ok(self.socket.recv_from(buf)?)
    }

    /// The underlying socket, e.g. to set timeouts.
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }
}
