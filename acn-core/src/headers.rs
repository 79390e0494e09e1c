//! The per-layer header types and the [HeaderSet] threaded through a
//! recursive decode.
//!
//! Each ACN sub-protocol contributes one typed header. A [HeaderSet] is
//! created per inbound packet at the transport boundary and passed by
//! mutable reference down the inflator chain so each layer can read headers
//! set by enclosing layers and set its own. It is pure data carriage: no
//! slot validates anything.

use core::net::SocketAddr;

use crate::cid::Cid;
use crate::source_name::SourceName;

/// How a packet reached us.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TransportType {
    /// Datagram transport, the common case for E1.31 and LLRP.
    #[default]
    Udp,
    /// Stream transport, used by E1.33 broker connections.
    Tcp,
}

/// The transport level pseudo header: where the packet came from and over
/// which transport. `source` is `None` until the transport layer fills it in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TransportHeader {
    /// The peer the packet was received from.
    pub source: Option<SocketAddr>,
    /// The transport the packet arrived over.
    pub transport: TransportType,
}

impl TransportHeader {
    /// Creates a transport header for a packet received from `source`.
    pub fn new(source: SocketAddr, transport: TransportType) -> Self {
        Self {
            source: Some(source),
            transport,
        }
    }
}

/// The ACN root layer header: the sender's CID.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct RootHeader {
    /// The CID of the component that sent the packet.
    pub cid: Cid,
}

impl RootHeader {
    /// Creates a root header carrying `cid`.
    pub const fn new(cid: Cid) -> Self {
        Self { cid }
    }
}

/// The E1.31 framing layer header, shared by the current (ANSI E1.31-2018)
/// and rev 2 draft layouts. `rev2` records which layout the header was
/// decoded from; two otherwise identical headers of different revisions do
/// not compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct E131Header {
    /// The name of the source.
    pub source: SourceName,
    /// Data priority, 0-200.
    pub priority: u8,
    /// The packet sequence number.
    pub sequence: u8,
    /// The universe the data is for.
    pub universe: u16,
    /// Bit 7 of the options field: this data is preview only.
    pub preview_data: bool,
    /// Bit 6 of the options field: transmission on this universe has ended.
    pub stream_terminated: bool,
    /// True if this header uses the rev 2 draft layout.
    pub rev2: bool,
}

impl E131Header {
    /// Creates a current revision header with no option bits set.
    pub fn new(source: SourceName, priority: u8, sequence: u8, universe: u16) -> Self {
        Self {
            source,
            priority,
            sequence,
            universe,
            preview_data: false,
            stream_terminated: false,
            rev2: false,
        }
    }

    /// Creates a rev 2 draft header. The draft layout has no options field.
    pub fn new_rev2(source: SourceName, priority: u8, sequence: u8, universe: u16) -> Self {
        Self {
            rev2: true,
            ..Self::new(source, priority, sequence, universe)
        }
    }
}

/// The E1.33 framing layer header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct E133Header {
    /// The name of the source.
    pub source: SourceName,
    /// The packet sequence number.
    pub sequence: u32,
    /// The endpoint the message is addressed to.
    pub endpoint: u16,
}

/// DMP address range type, bits 5-4 of the DMP header byte.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum DmpRangeType {
    /// A single address.
    #[default]
    NonRange = 0,
    /// A range: single data item.
    RangeSingle = 1,
    /// A range: one data item per address.
    RangeEqual = 2,
    /// A range: mixed size data items.
    RangeMixed = 3,
}

/// DMP address/data size, bits 1-0 of the DMP header byte.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum DmpAddressSize {
    /// One byte addresses.
    #[default]
    OneBytes = 0,
    /// Two byte addresses.
    TwoBytes = 1,
    /// Four byte addresses.
    FourBytes = 2,
}

/// The single byte DMP header, as per ANSI E1.17-2015 DMP Section 5.1.4.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct DmpHeader {
    /// Addresses are virtual rather than actual.
    pub is_virtual: bool,
    /// Addresses are relative to the previous message.
    pub is_relative: bool,
    /// The address range type.
    pub range_type: DmpRangeType,
    /// The address size.
    pub address_size: DmpAddressSize,
}

impl DmpHeader {
    /// Creates a DMP header from its fields.
    pub const fn new(is_virtual: bool, is_relative: bool, range_type: DmpRangeType, address_size: DmpAddressSize) -> Self {
        Self {
            is_virtual,
            is_relative,
            range_type,
            address_size,
        }
    }

    /// Packs the header into its wire byte.
    pub const fn header_byte(&self) -> u8 {
        ((self.is_virtual as u8) << 7) | ((self.is_relative as u8) << 6) | ((self.range_type as u8) << 4) | self.address_size as u8
    }

    /// Parses a wire byte into a DMP header. Returns None for a reserved
    /// address size code.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        let range_type = match (byte >> 4) & 0x3 {
            0 => DmpRangeType::NonRange,
            1 => DmpRangeType::RangeSingle,
            2 => DmpRangeType::RangeEqual,
            _ => DmpRangeType::RangeMixed,
        };
        let address_size = match byte & 0x3 {
            0 => DmpAddressSize::OneBytes,
            1 => DmpAddressSize::TwoBytes,
            2 => DmpAddressSize::FourBytes,
            _ => return None,
        };
        Some(Self {
            is_virtual: byte & 0x80 != 0,
            is_relative: byte & 0x40 != 0,
            range_type,
            address_size,
        })
    }
}

/// The LLRP PDU header: who the message is for and which transaction it
/// belongs to, as per ANSI E1.33-2019 Section 5.4.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct LlrpHeader {
    /// The CID of the component the message is addressed to.
    pub destination_cid: Cid,
    /// The transaction number tying replies to requests.
    pub transaction_number: u32,
}

impl LlrpHeader {
    /// Creates an LLRP header.
    pub const fn new(destination_cid: Cid, transaction_number: u32) -> Self {
        Self {
            destination_cid,
            transaction_number,
        }
    }
}

/// An RDM unique identifier: a 2 byte manufacturer id and a 4 byte device
/// id, as per ANSI E1.20.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid {
    /// The ESTA manufacturer id.
    pub manufacturer_id: u16,
    /// The device id, unique per manufacturer.
    pub device_id: u32,
}

impl Uid {
    /// Creates a UID from its parts.
    pub const fn new(manufacturer_id: u16, device_id: u32) -> Self {
        Self {
            manufacturer_id,
            device_id,
        }
    }
}

/// The E1.33 RPT layer header.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct RptHeader {
    /// The UID of the RPT component the message is from.
    pub source_uid: Uid,
    /// The endpoint the message is from.
    pub source_endpoint: u16,
    /// The UID of the RPT component the message is for.
    pub destination_uid: Uid,
    /// The endpoint the message is for.
    pub destination_endpoint: u16,
    /// The packet sequence number.
    pub sequence: u32,
}

/// One typed slot per ACN sub-protocol, filled in as the inflator chain
/// descends through the layers of a packet.
///
/// This is deliberately a fixed struct rather than a generic map: the set of
/// layers is closed and each slot defaults to its header type's default
/// value. Equality compares every slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    /// Where the packet came from.
    pub transport: TransportHeader,
    /// The root layer header.
    pub root: RootHeader,
    /// The E1.31 framing layer header.
    pub e131: E131Header,
    /// The E1.33 framing layer header.
    pub e133: E133Header,
    /// The DMP layer header.
    pub dmp: DmpHeader,
    /// The LLRP layer header.
    pub llrp: LlrpHeader,
    /// The RPT layer header.
    pub rpt: RptHeader,
}

impl HeaderSet {
    /// Creates a header set with every slot at its default value.
    pub fn new() -> Self {
        Self::default()
    }
}
