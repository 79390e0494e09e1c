//! The E1.31 (streaming ACN) framing layer, carried inside a root PDU with
//! vector [VECTOR_ROOT_E131] or, for the pre-ratification draft,
//! [VECTOR_ROOT_E131_REV2].
//!
//! The two revisions share the PDU shape and differ only in their fixed
//! header layout. Current (ANSI E1.31-2018 Section 6.2): a 64 byte null
//! padded source name, priority, a 2 byte reserved field, sequence number,
//! options and a 2 byte universe, 71 bytes in all. Rev 2 draft: a 32 byte
//! source name, priority, sequence and universe, 36 bytes, no options.

use byteorder::{ByteOrder, NetworkEndian};

use crate::acn_definitions::{
    E131_PREVIEW_DATA_OPTION_BIT_MASK, E131_REV2_SOURCE_NAME_FIELD_LENGTH, E131_SOURCE_NAME_FIELD_LENGTH,
    E131_STREAM_TERMINATION_OPTION_BIT_MASK, VECTOR_ROOT_E131, VECTOR_ROOT_E131_REV2,
};
use crate::acn_parse_pack_error::{InflateError, PackError};
use crate::headers::{E131Header, HeaderSet};
use crate::inflator::{Inflator, InflatorLayer};
use crate::pdu::{Pdu, PduBlock, VectorSize};
use crate::source_name::SourceName;

/// Current layout: name + priority + reserved(2) + sequence + options +
/// universe(2).
const E131_HEADER_LENGTH: usize = E131_SOURCE_NAME_FIELD_LENGTH + 7;
/// Rev 2 layout: name + priority + sequence + universe(2).
const E131_REV2_HEADER_LENGTH: usize = E131_REV2_SOURCE_NAME_FIELD_LENGTH + 4;

/// The E1.31 framing layer hooks for an [Inflator]. Use
/// [E131Inflator::new] / [E131Inflator::new_rev2] rather than constructing
/// this directly.
pub struct E131Layer {
    rev2: bool,
    last_header: Option<E131Header>,
}

impl E131Layer {
    fn decode_current(data: &[u8]) -> Result<E131Header, InflateError> {
        if data.len() < E131_HEADER_LENGTH {
            return Err(InflateError::HeaderTooShort {
                layer: "E1.31",
                available: data.len(),
                required: E131_HEADER_LENGTH,
            });
        }
        let source: SourceName = data[..E131_SOURCE_NAME_FIELD_LENGTH].try_into()?;
        let mut offset = E131_SOURCE_NAME_FIELD_LENGTH;
        let priority = data[offset];
        // 2 reserved bytes (the former rev 2 sequence position)
        offset += 3;
        let sequence = data[offset];
        let options = data[offset + 1];
        let universe = NetworkEndian::read_u16(&data[offset + 2..offset + 4]);

        let mut header = E131Header::new(source, priority, sequence, universe);
        header.preview_data = options & E131_PREVIEW_DATA_OPTION_BIT_MASK != 0;
        header.stream_terminated = options & E131_STREAM_TERMINATION_OPTION_BIT_MASK != 0;
        Ok(header)
    }

    fn decode_rev2(data: &[u8]) -> Result<E131Header, InflateError> {
        if data.len() < E131_REV2_HEADER_LENGTH {
            return Err(InflateError::HeaderTooShort {
                layer: "E1.31 rev 2",
                available: data.len(),
                required: E131_REV2_HEADER_LENGTH,
            });
        }
        let source: SourceName = data[..E131_REV2_SOURCE_NAME_FIELD_LENGTH].try_into()?;
        let offset = E131_REV2_SOURCE_NAME_FIELD_LENGTH;
        let priority = data[offset];
        let sequence = data[offset + 1];
        let universe = NetworkEndian::read_u16(&data[offset + 2..offset + 4]);
        Ok(E131Header::new_rev2(source, priority, sequence, universe))
    }
}

impl InflatorLayer for E131Layer {
    fn vector_size(&self) -> VectorSize {
        VectorSize::FourBytes
    }

    fn id(&self) -> u32 {
        if self.rev2 { VECTOR_ROOT_E131_REV2 } else { VECTOR_ROOT_E131 }
    }

    fn decode_header(&mut self, headers: &mut HeaderSet, data: Option<&[u8]>) -> Result<usize, InflateError> {
        match data {
            Some(data) => {
                let (header, used) = if self.rev2 {
                    (Self::decode_rev2(data)?, E131_REV2_HEADER_LENGTH)
                } else {
                    (Self::decode_current(data)?, E131_HEADER_LENGTH)
                };
                headers.e131 = header.clone();
                self.last_header = Some(header);
                Ok(used)
            }
            None => {
                let header = self.last_header.clone().ok_or(InflateError::MissingInheritedHeader)?;
                headers.e131 = header;
                Ok(0)
            }
        }
    }

    fn reset_header_field(&mut self) {
        self.last_header = None;
    }
}

/// The inflator for the E1.31 framing layer. Register it as a child of a
/// [RootInflator](crate::root_layer::RootInflator).
pub type E131Inflator = Inflator<E131Layer>;

impl E131Inflator {
    /// Creates an inflator for the current (ANSI E1.31-2018) layout.
    pub fn new() -> Self {
        Inflator::with_layer(E131Layer {
            rev2: false,
            last_header: None,
        })
    }

    /// Creates an inflator for the rev 2 draft layout.
    pub fn new_rev2() -> Self {
        Inflator::with_layer(E131Layer {
            rev2: true,
            last_header: None,
        })
    }
}

impl Default for E131Inflator {
    fn default() -> Self {
        Self::new()
    }
}

/// An E1.31 framing PDU for encoding. The header's `rev2` flag selects
/// which layout is packed.
pub struct E131Pdu<'a, P: Pdu + ?Sized> {
    vector: u32,
    header: E131Header,
    block: Option<&'a PduBlock<'a, P>>,
}

impl<'a, P: Pdu + ?Sized> E131Pdu<'a, P> {
    /// Creates a framing PDU with the given vector (e.g.
    /// [VECTOR_E131_DATA_PACKET](crate::acn_definitions::VECTOR_E131_DATA_PACKET))
    /// and header and no data.
    pub fn new(vector: u32, header: E131Header) -> Self {
        Self {
            vector,
            header,
            block: None,
        }
    }

    /// Sets the nested PDU block forming the data region.
    pub fn set_block(&mut self, block: &'a PduBlock<'a, P>) {
        self.block = Some(block);
    }

    /// The framing header this PDU packs.
    pub fn header(&self) -> &E131Header {
        &self.header
    }
}

impl<P: Pdu + ?Sized> Pdu for E131Pdu<'_, P> {
    fn vector(&self) -> u32 {
        self.vector
    }

    fn vector_size(&self) -> VectorSize {
        VectorSize::FourBytes
    }

    fn header_size(&self) -> usize {
        if self.header.rev2 { E131_REV2_HEADER_LENGTH } else { E131_HEADER_LENGTH }
    }

    fn data_size(&self) -> usize {
        self.block.map_or(0, PduBlock::size)
    }

    fn pack_header(&self, buf: &mut [u8]) -> Result<(), PackError> {
        if self.header.rev2 {
            self.header.source.pack_into(&mut buf[..E131_REV2_SOURCE_NAME_FIELD_LENGTH])?;
            let offset = E131_REV2_SOURCE_NAME_FIELD_LENGTH;
            buf[offset] = self.header.priority;
            buf[offset + 1] = self.header.sequence;
            NetworkEndian::write_u16(&mut buf[offset + 2..offset + 4], self.header.universe);
        } else {
            self.header.source.pack_into(&mut buf[..E131_SOURCE_NAME_FIELD_LENGTH])?;
            let mut offset = E131_SOURCE_NAME_FIELD_LENGTH;
            buf[offset] = self.header.priority;
            buf[offset + 1] = 0;
            buf[offset + 2] = 0;
            offset += 3;
            buf[offset] = self.header.sequence;
            let mut options = 0;
            if self.header.preview_data {
                options |= E131_PREVIEW_DATA_OPTION_BIT_MASK;
            }
            if self.header.stream_terminated {
                options |= E131_STREAM_TERMINATION_OPTION_BIT_MASK;
            }
            buf[offset + 1] = options;
            NetworkEndian::write_u16(&mut buf[offset + 2..offset + 4], self.header.universe);
        }
        Ok(())
    }

    fn pack_data(&self, buf: &mut [u8]) -> Result<(), PackError> {
        if let Some(block) = self.block {
            block.pack(buf)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::*;
    use crate::acn_definitions::VECTOR_E131_DATA_PACKET;
    use crate::inflator::InflatorInterface;

    /// Stand-in for the DMP PDU the framing layer normally carries.
    struct InnerPdu;

    impl Pdu for InnerPdu {
        fn vector(&self) -> u32 {
            7
        }

        fn vector_size(&self) -> VectorSize {
            VectorSize::FourBytes
        }

        fn header_size(&self) -> usize {
            0
        }

        fn data_size(&self) -> usize {
            2
        }

        fn pack_header(&self, _buf: &mut [u8]) -> Result<(), PackError> {
            Ok(())
        }

        fn pack_data(&self, buf: &mut [u8]) -> Result<(), PackError> {
            buf.copy_from_slice(b"xy");
            Ok(())
        }
    }

    fn sample_header() -> E131Header {
        let source = SourceName::new("foobar").unwrap();
        let mut header = E131Header::new(source, 99, 10, 42);
        header.preview_data = true;
        header
    }

    #[test]
    fn pack_current_header_layout() {
        let pdu: E131Pdu<'_, InnerPdu> = E131Pdu::new(VECTOR_E131_DATA_PACKET, sample_header());
        // 2 length + 4 vector + 71 header
        assert_eq!(pdu.size(), 77);

        let mut buf = [0u8; 77];
        assert_eq!(pdu.pack(&mut buf).unwrap(), 77);
        assert_eq!(&buf[..2], &[0x70, 77]);
        assert_eq!(&buf[2..6], &[0x00, 0x00, 0x00, 0x02]);
        assert_eq!(&buf[6..12], b"foobar");
        assert!(buf[12..70].iter().all(|&b| b == 0));
        assert_eq!(buf[70], 99); // priority
        assert_eq!(&buf[71..73], &[0, 0]); // reserved
        assert_eq!(buf[73], 10); // sequence
        assert_eq!(buf[74], E131_PREVIEW_DATA_OPTION_BIT_MASK);
        assert_eq!(&buf[75..77], &[0, 42]);
    }

    #[test]
    fn pack_rev2_header_layout() {
        let source = SourceName::new("foobar").unwrap();
        let header = E131Header::new_rev2(source, 99, 10, 42);
        let pdu: E131Pdu<'_, InnerPdu> = E131Pdu::new(VECTOR_E131_DATA_PACKET, header);
        // 2 length + 4 vector + 36 header
        assert_eq!(pdu.size(), 42);

        let mut buf = [0u8; 42];
        assert_eq!(pdu.pack(&mut buf).unwrap(), 42);
        assert_eq!(&buf[..2], &[0x70, 42]);
        assert_eq!(&buf[6..12], b"foobar");
        assert!(buf[12..38].iter().all(|&b| b == 0));
        assert_eq!(buf[38], 99);
        assert_eq!(buf[39], 10);
        assert_eq!(&buf[40..42], &[0, 42]);
    }

    /// Captures the framing header seen one layer below E1.31.
    struct DataLayer {
        handled: Rc<Cell<u32>>,
        expected: E131Header,
    }

    impl InflatorLayer for DataLayer {
        fn vector_size(&self) -> VectorSize {
            VectorSize::FourBytes
        }

        fn id(&self) -> u32 {
            VECTOR_E131_DATA_PACKET
        }

        fn decode_header(&mut self, _headers: &mut HeaderSet, _data: Option<&[u8]>) -> Result<usize, InflateError> {
            Ok(0)
        }

        fn reset_header_field(&mut self) {}

        fn handle_pdu_data(&mut self, _vector: u32, headers: &HeaderSet, data: &[u8]) -> bool {
            assert_eq!(headers.e131, self.expected);
            assert_eq!(data, b"xy");
            self.handled.set(self.handled.get() + 1);
            true
        }
    }

    fn packed_framing_pdu(header: &E131Header) -> Vec<u8> {
        let inner = InnerPdu;
        let mut block = PduBlock::new();
        block.add_pdu(&inner);
        let mut pdu = E131Pdu::new(VECTOR_E131_DATA_PACKET, header.clone());
        pdu.set_block(&block);
        let mut buf = alloc::vec![0; pdu.size()];
        pdu.pack(&mut buf).unwrap();
        buf
    }

    #[test]
    fn inflate_current_header_round_trip() {
        let header = sample_header();
        let packed = packed_framing_pdu(&header);

        let mut inflator = E131Inflator::new();
        let mut headers = HeaderSet::new();
        assert_eq!(inflator.inflate_pdu_block(&mut headers, &packed), packed.len());
        assert_eq!(headers.e131, header);
        assert!(!headers.e131.rev2);
    }

    #[test]
    fn inflate_rev2_header_round_trip() {
        let source = SourceName::new("foobar").unwrap();
        let header = E131Header::new_rev2(source, 99, 10, 42);
        let packed = packed_framing_pdu(&header);

        let mut inflator = E131Inflator::new_rev2();
        let mut headers = HeaderSet::new();
        assert_eq!(inflator.inflate_pdu_block(&mut headers, &packed), packed.len());
        assert_eq!(headers.e131, header);
        assert!(headers.e131.rev2);
    }

    #[test]
    fn framing_header_is_inherited_within_a_block() {
        let header = sample_header();
        let mut packed = packed_framing_pdu(&header);
        let first_len = packed.len();

        // second PDU: VFLAG only, framing header inherited, fresh payload
        let inner = InnerPdu;
        let mut inner_buf = alloc::vec![0; inner.size()];
        inner.pack(&mut inner_buf).unwrap();
        packed.push(0x40);
        packed.push((2 + 4 + inner_buf.len()) as u8);
        packed.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);
        packed.extend_from_slice(&inner_buf);

        let handled = Rc::new(Cell::new(0));
        let leaf = Inflator::with_layer(DataLayer {
            handled: Rc::clone(&handled),
            expected: header.clone(),
        });
        let mut inflator = E131Inflator::new();
        inflator.add_inflator(Box::new(leaf)).unwrap();

        let mut headers = HeaderSet::new();
        assert_eq!(inflator.inflate_pdu_block(&mut headers, &packed), packed.len());
        assert_eq!(handled.get(), 2);

        // the bare PDU alone has no header to inherit
        let stray = &packed[first_len..];
        assert_eq!(inflator.inflate_pdu_block(&mut headers, stray), stray.len());
        assert_eq!(handled.get(), 2);
    }

    #[test]
    fn truncated_header_is_rejected() {
        assert_eq!(
            E131Layer::decode_current(&[0u8; 70]),
            Err(InflateError::HeaderTooShort {
                layer: "E1.31",
                available: 70,
                required: 71,
            })
        );
        assert_eq!(
            E131Layer::decode_rev2(&[0u8; 35]),
            Err(InflateError::HeaderTooShort {
                layer: "E1.31 rev 2",
                available: 35,
                required: 36,
            })
        );
    }
}
