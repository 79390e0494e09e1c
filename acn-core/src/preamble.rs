//! The ACN pre/postamble framing that wraps a root PDU block on the wire,
//! ANSI E1.17-2015 SDT/UDP Section and ANSI E1.31-2018 Section 5.
//!
//! UDP datagrams open with a fixed 16 byte preamble: the preamble size
//! (0x0010), the postamble size (always zero) and the 12 byte packet
//! identifier `"ASC-E1.17\0\0\0"`. TCP streams instead prefix each root PDU
//! block with the packet identifier and a 4 byte big-endian block length so
//! a reader can frame the stream. The on-wire order is identifier first,
//! then the block length, per the E1.33 stream framing: bytes 0-11 are the
//! marker, bytes 12-15 the length, and the block follows at byte 16.

use byteorder::{ByteOrder, NetworkEndian};

use crate::acn_definitions::{ACN_PACKET_IDENTIFIER, POSTAMBLE_SIZE, PREAMBLE_SIZE};
use crate::acn_parse_pack_error::{InflateError, PackError};

/// The UDP preamble length in bytes.
pub const UDP_PREAMBLE_LENGTH: usize = PREAMBLE_SIZE as usize;
/// The TCP block prefix length in bytes: packet identifier + block size.
pub const TCP_PREAMBLE_LENGTH: usize = ACN_PACKET_IDENTIFIER.len() + 4;

/// Packs the fixed 16 byte UDP preamble at the start of `buf` and returns
/// the number of bytes written.
///
/// # Errors
/// BufferTooSmall: if `buf` cannot hold the preamble.
pub fn pack_udp_preamble(buf: &mut [u8]) -> Result<usize, PackError> {
    if buf.len() < UDP_PREAMBLE_LENGTH {
        return Err(PackError::BufferTooSmall {
            available: buf.len(),
            required: UDP_PREAMBLE_LENGTH,
        });
    }
    NetworkEndian::write_u16(&mut buf[0..2], PREAMBLE_SIZE);
    NetworkEndian::write_u16(&mut buf[2..4], POSTAMBLE_SIZE);
    buf[4..UDP_PREAMBLE_LENGTH].copy_from_slice(&ACN_PACKET_IDENTIFIER);
    Ok(UDP_PREAMBLE_LENGTH)
}

/// Validates the UDP preamble at the start of `data` and returns the root
/// PDU block region that follows it.
///
/// # Errors
/// PreambleTooShort: fewer than 16 bytes in the datagram.
/// InvalidPreamble: a size field or the packet identifier did not match.
pub fn strip_udp_preamble(data: &[u8]) -> Result<&[u8], InflateError> {
    if data.len() < UDP_PREAMBLE_LENGTH {
        return Err(InflateError::PreambleTooShort {
            available: data.len(),
            required: UDP_PREAMBLE_LENGTH,
        });
    }
    if NetworkEndian::read_u16(&data[0..2]) != PREAMBLE_SIZE {
        return Err(InflateError::InvalidPreamble("preamble size mismatch"));
    }
    if NetworkEndian::read_u16(&data[2..4]) != POSTAMBLE_SIZE {
        return Err(InflateError::InvalidPreamble("postamble size mismatch"));
    }
    if data[4..UDP_PREAMBLE_LENGTH] != ACN_PACKET_IDENTIFIER {
        return Err(InflateError::InvalidPreamble("packet identifier mismatch"));
    }
    Ok(&data[UDP_PREAMBLE_LENGTH..])
}

/// Packs the TCP block prefix for a root PDU block of `block_size` bytes
/// and returns the number of bytes written.
///
/// # Errors
/// BufferTooSmall: if `buf` cannot hold the prefix.
pub fn pack_tcp_preamble(buf: &mut [u8], block_size: u32) -> Result<usize, PackError> {
    if buf.len() < TCP_PREAMBLE_LENGTH {
        return Err(PackError::BufferTooSmall {
            available: buf.len(),
            required: TCP_PREAMBLE_LENGTH,
        });
    }
    buf[..ACN_PACKET_IDENTIFIER.len()].copy_from_slice(&ACN_PACKET_IDENTIFIER);
    NetworkEndian::write_u32(&mut buf[ACN_PACKET_IDENTIFIER.len()..TCP_PREAMBLE_LENGTH], block_size);
    Ok(TCP_PREAMBLE_LENGTH)
}

/// Parses the TCP block prefix at the start of `data` and returns the root
/// PDU block size together with the number of prefix bytes consumed.
///
/// Unlike the UDP path a short read here can simply mean more stream data
/// is pending; the caller decides whether to wait or drop.
///
/// # Errors
/// PreambleTooShort: fewer than 16 bytes available.
/// InvalidPreamble: the packet identifier did not match.
pub fn parse_tcp_preamble(data: &[u8]) -> Result<(usize, usize), InflateError> {
    if data.len() < TCP_PREAMBLE_LENGTH {
        return Err(InflateError::PreambleTooShort {
            available: data.len(),
            required: TCP_PREAMBLE_LENGTH,
        });
    }
    if data[..ACN_PACKET_IDENTIFIER.len()] != ACN_PACKET_IDENTIFIER {
        return Err(InflateError::InvalidPreamble("packet identifier mismatch"));
    }
    let block_size = NetworkEndian::read_u32(&data[ACN_PACKET_IDENTIFIER.len()..TCP_PREAMBLE_LENGTH]);
    Ok((block_size as usize, TCP_PREAMBLE_LENGTH))
}
