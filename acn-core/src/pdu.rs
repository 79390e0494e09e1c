//! The PDU encoding side of the ACN framing format.
//!
//! Every ACN PDU is encoded as
//! `[flags:4 bits][length:12 or 20 bits][vector:0/1/2/4 bytes][header][data]`
//! where the flags occupy the top nibble of the first length byte, as per
//! ANSI E1.17-2015 Section 2.4. The length field counts every byte of the
//! PDU including itself.
//!
//! Note that encoding never exploits the vector/header inheritance the
//! decode side supports: sibling PDUs in a block always carry their full
//! vector and header fields. The decode side still accepts inherited fields
//! from other implementations.

use alloc::vec::Vec;

use byteorder::{ByteOrder, NetworkEndian};

use crate::acn_definitions::{
    ACN_PDU_FLAGS, PDU_EXTENDED_LENGTH_FLAGS_LENGTH, PDU_LENGTH_FLAGS_LENGTH, PDU_TWELVE_BIT_LENGTH_MAX,
    PDU_TWENTY_BIT_LENGTH_MAX,
};
use crate::acn_parse_pack_error::PackError;

/// Bit 7 of the flags nibble: the 20 bit extended length encoding is in use.
pub const LFLAG_MASK: u8 = 0x80;
/// Bit 6 of the flags nibble: the vector field is present.
pub const VFLAG_MASK: u8 = 0x40;
/// Bit 5 of the flags nibble: the header field is present.
pub const HFLAG_MASK: u8 = 0x20;
/// Bit 4 of the flags nibble: the data field is present.
pub const DFLAG_MASK: u8 = 0x10;

/// The width of a PDU's vector field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VectorSize {
    /// A one byte vector, e.g. the DMP and RDM layers.
    OneByte,
    /// A two byte vector.
    TwoBytes,
    /// A four byte vector, e.g. the root and framing layers.
    FourBytes,
}

impl VectorSize {
    /// The width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            VectorSize::OneByte => 1,
            VectorSize::TwoBytes => 2,
            VectorSize::FourBytes => 4,
        }
    }
}

/// Packs the flags nibble and length field for a PDU of `total_length`
/// bytes (the length counts the field itself). The 12 bit form is used
/// unless `force_length_flag` is set or the length needs 20 bits.
///
/// Returns the number of bytes written.
///
/// # Errors
/// LengthExceedsRange: if `total_length` needs more than 20 bits.
/// BufferTooSmall: if `buf` cannot hold the field.
pub fn pack_flags_and_length(buf: &mut [u8], total_length: usize, force_length_flag: bool) -> Result<usize, PackError> {
    if total_length > PDU_TWENTY_BIT_LENGTH_MAX {
        return Err(PackError::LengthExceedsRange(total_length));
    }

    if force_length_flag || total_length > PDU_TWELVE_BIT_LENGTH_MAX {
        if buf.len() < PDU_EXTENDED_LENGTH_FLAGS_LENGTH {
            return Err(PackError::BufferTooSmall {
                available: buf.len(),
                required: PDU_EXTENDED_LENGTH_FLAGS_LENGTH,
            });
        }
        buf[0] = ACN_PDU_FLAGS | LFLAG_MASK | ((total_length >> 16) as u8);
        buf[1] = (total_length >> 8) as u8;
        buf[2] = total_length as u8;
        Ok(PDU_EXTENDED_LENGTH_FLAGS_LENGTH)
    } else {
        if buf.len() < PDU_LENGTH_FLAGS_LENGTH {
            return Err(PackError::BufferTooSmall {
                available: buf.len(),
                required: PDU_LENGTH_FLAGS_LENGTH,
            });
        }
        buf[0] = ACN_PDU_FLAGS | ((total_length >> 8) as u8);
        buf[1] = total_length as u8;
        Ok(PDU_LENGTH_FLAGS_LENGTH)
    }
}

/// Packs a big-endian vector of the given width.
///
/// Returns the number of bytes written.
///
/// # Errors
/// VectorTooWide: if `vector` does not fit the field.
/// BufferTooSmall: if `buf` cannot hold the field.
pub fn pack_vector(buf: &mut [u8], vector: u32, size: VectorSize) -> Result<usize, PackError> {
    let width = size.bytes();
    if width < 4 && u64::from(vector) >= 1u64 << (8 * width) {
        return Err(PackError::VectorTooWide { vector, width });
    }
    if buf.len() < width {
        return Err(PackError::BufferTooSmall {
            available: buf.len(),
            required: width,
        });
    }
    NetworkEndian::write_uint(&mut buf[..width], u64::from(vector), width);
    Ok(width)
}

/// One length prefixed, flag tagged protocol unit.
///
/// Implementations supply the vector identity and the header/data packing
/// hooks; the provided [size](Pdu::size) and [pack](Pdu::pack) methods take
/// care of the shared flags/length/vector framing. A PDU is stateless and
/// may be packed repeatedly.
pub trait Pdu {
    /// The vector selecting the next-layer interpretation of the data.
    fn vector(&self) -> u32;

    /// The width of the vector field.
    fn vector_size(&self) -> VectorSize;

    /// Forces the 20 bit length encoding even when the 12 bit form would
    /// fit. Some protocols mandate this for stable framing.
    fn force_length_flag(&self) -> bool {
        false
    }

    /// The size of the protocol specific header region in bytes.
    fn header_size(&self) -> usize;

    /// The size of the data region in bytes.
    fn data_size(&self) -> usize;

    /// Packs the header region into `buf`, which is exactly
    /// [header_size](Pdu::header_size) bytes.
    fn pack_header(&self, buf: &mut [u8]) -> Result<(), PackError>;

    /// Packs the data region into `buf`, which is exactly
    /// [data_size](Pdu::data_size) bytes.
    fn pack_data(&self, buf: &mut [u8]) -> Result<(), PackError>;

    /// The total encoded size: flags/length field, vector, header and data.
    fn size(&self) -> usize {
        let content = self.vector_size().bytes() + self.header_size() + self.data_size();
        let twelve_bit_total = content + PDU_LENGTH_FLAGS_LENGTH;
        if self.force_length_flag() || twelve_bit_total > PDU_TWELVE_BIT_LENGTH_MAX {
            content + PDU_EXTENDED_LENGTH_FLAGS_LENGTH
        } else {
            twelve_bit_total
        }
    }

    /// Packs the whole PDU into `buf` and returns the number of bytes
    /// written, which always equals [size](Pdu::size).
    ///
    /// # Errors
    /// BufferTooSmall: if `buf` is shorter than [size](Pdu::size).
    fn pack(&self, buf: &mut [u8]) -> Result<usize, PackError> {
        let size = self.size();
        if buf.len() < size {
            return Err(PackError::BufferTooSmall {
                available: buf.len(),
                required: size,
            });
        }

        let mut offset = pack_flags_and_length(buf, size, self.force_length_flag())?;
        offset += pack_vector(&mut buf[offset..], self.vector(), self.vector_size())?;

        let header_end = offset + self.header_size();
        self.pack_header(&mut buf[offset..header_end])?;

        let data_end = header_end + self.data_size();
        self.pack_data(&mut buf[header_end..data_end])?;

        Ok(data_end)
    }
}

/// An ordered sequence of PDUs whose encodings are concatenated on the wire.
///
/// The block borrows its PDUs; ownership stays with the caller. A block can
/// be built fresh per send or kept long lived and reused via
/// [clear](PduBlock::clear) and [add_pdu](PduBlock::add_pdu).
#[derive(Debug)]
pub struct PduBlock<'a, P: Pdu + ?Sized> {
    pdus: Vec<&'a P>,
}

impl<P: Pdu + ?Sized> Default for PduBlock<'_, P> {
    fn default() -> Self {
        Self { pdus: Vec::new() }
    }
}

impl<'a, P: Pdu + ?Sized> PduBlock<'a, P> {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a PDU to the block.
    pub fn add_pdu(&mut self, pdu: &'a P) {
        self.pdus.push(pdu);
    }

    /// Removes all PDUs from the block.
    pub fn clear(&mut self) {
        self.pdus.clear();
    }

    /// The number of PDUs in the block.
    pub fn len(&self) -> usize {
        self.pdus.len()
    }

    /// True if the block holds no PDUs.
    pub fn is_empty(&self) -> bool {
        self.pdus.is_empty()
    }

    /// The total encoded size: the sum of the member PDU sizes.
    pub fn size(&self) -> usize {
        self.pdus.iter().map(|pdu| pdu.size()).sum()
    }

    /// Packs every PDU in order and returns the total bytes written.
    ///
    /// # Errors
    /// BufferTooSmall: if `buf` cannot hold the whole block.
    pub fn pack(&self, buf: &mut [u8]) -> Result<usize, PackError> {
        let size = self.size();
        if buf.len() < size {
            return Err(PackError::BufferTooSmall {
                available: buf.len(),
                required: size,
            });
        }
        let mut offset = 0;
        for pdu in &self.pdus {
            offset += pdu.pack(&mut buf[offset..])?;
        }
        Ok(offset)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct TestPdu {
        vector: u32,
        vector_size: VectorSize,
        force_length_flag: bool,
        data: Vec<u8>,
    }

    impl TestPdu {
        fn new(vector: u32, vector_size: VectorSize, data: &[u8]) -> Self {
            Self {
                vector,
                vector_size,
                force_length_flag: false,
                data: data.to_vec(),
            }
        }
    }

    impl Pdu for TestPdu {
        fn vector(&self) -> u32 {
            self.vector
        }

        fn vector_size(&self) -> VectorSize {
            self.vector_size
        }

        fn force_length_flag(&self) -> bool {
            self.force_length_flag
        }

        fn header_size(&self) -> usize {
            0
        }

        fn data_size(&self) -> usize {
            self.data.len()
        }

        fn pack_header(&self, _buf: &mut [u8]) -> Result<(), PackError> {
            Ok(())
        }

        fn pack_data(&self, buf: &mut [u8]) -> Result<(), PackError> {
            buf.copy_from_slice(&self.data);
            Ok(())
        }
    }

    #[test]
    fn twelve_bit_length_encoding() {
        let pdu = TestPdu::new(0x0121, VectorSize::TwoBytes, b"abcd");
        assert_eq!(pdu.size(), 2 + 2 + 4);

        let mut buf = [0u8; 8];
        assert_eq!(pdu.pack(&mut buf).unwrap(), 8);
        assert_eq!(buf, [0x70, 8, 0x01, 0x21, b'a', b'b', b'c', b'd']);
    }

    #[test]
    fn forced_twenty_bit_length_encoding() {
        let mut pdu = TestPdu::new(0x0121, VectorSize::TwoBytes, b"abcd");
        pdu.force_length_flag = true;
        assert_eq!(pdu.size(), 3 + 2 + 4);

        let mut buf = [0u8; 9];
        assert_eq!(pdu.pack(&mut buf).unwrap(), 9);
        assert_eq!(buf, [0xf0, 0, 9, 0x01, 0x21, b'a', b'b', b'c', b'd']);
    }

    #[test]
    fn large_pdu_switches_to_twenty_bit_length() {
        let data = alloc::vec![0xaa; 0x0fff];
        let pdu = TestPdu::new(7, VectorSize::OneByte, &data);
        // 2 + 1 + 0x0fff exceeds the 12 bit range, so three length bytes
        let size = 3 + 1 + 0x0fff;
        assert_eq!(pdu.size(), size);

        let mut buf = alloc::vec![0; size];
        pdu.pack(&mut buf).unwrap();
        assert_eq!(buf[0], 0xf0 | ((size >> 16) as u8));
        assert_eq!(buf[1], (size >> 8) as u8);
        assert_eq!(buf[2], size as u8);
        assert_eq!(buf[3], 7);
    }

    #[test]
    fn vector_widths() {
        let pdu = TestPdu::new(0xcc, VectorSize::OneByte, b"");
        let mut buf = [0u8; 3];
        pdu.pack(&mut buf).unwrap();
        assert_eq!(buf, [0x70, 3, 0xcc]);

        let pdu = TestPdu::new(0x01213245, VectorSize::FourBytes, b"");
        let mut buf = [0u8; 6];
        pdu.pack(&mut buf).unwrap();
        assert_eq!(buf, [0x70, 6, 0x01, 0x21, 0x32, 0x45]);
    }

    #[test]
    fn vector_must_fit_field() {
        let pdu = TestPdu::new(0x0121, VectorSize::OneByte, b"");
        let mut buf = [0u8; 8];
        assert_eq!(
            pdu.pack(&mut buf),
            Err(PackError::VectorTooWide {
                vector: 0x0121,
                width: 1,
            })
        );
    }

    #[test]
    fn pack_rejects_short_buffer() {
        let pdu = TestPdu::new(1, VectorSize::TwoBytes, b"abcd");
        let mut buf = [0u8; 7];
        assert_eq!(
            pdu.pack(&mut buf),
            Err(PackError::BufferTooSmall {
                available: 7,
                required: 8,
            })
        );
    }

    #[test]
    fn block_concatenates_member_encodings() {
        let first = TestPdu::new(0x0121, VectorSize::TwoBytes, b"one");
        let second = TestPdu::new(0x0121, VectorSize::TwoBytes, b"two!");

        let mut block = PduBlock::new();
        assert!(block.is_empty());
        block.add_pdu(&first);
        block.add_pdu(&second);
        assert_eq!(block.len(), 2);

        // no header/vector coalescing across siblings: sizes just add up
        assert_eq!(block.size(), first.size() + second.size());

        let mut buf = [0u8; 15];
        assert_eq!(block.pack(&mut buf).unwrap(), 15);
        assert_eq!(&buf[..7], &[0x70, 7, 0x01, 0x21, b'o', b'n', b'e']);
        assert_eq!(&buf[7..], &[0x70, 8, 0x01, 0x21, b't', b'w', b'o', b'!']);

        block.clear();
        assert_eq!(block.size(), 0);
        assert!(block.is_empty());
    }
}
