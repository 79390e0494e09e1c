//! The LLRP (Low Level Recovery Protocol) layer of E1.33, carried inside a
//! root PDU with vector [VECTOR_ROOT_LLRP].
//!
//! The LLRP header is the 16 byte CID of the component the message is
//! addressed to followed by a 4 byte big-endian transaction number. E1.33
//! requires the 20 bit length encoding on LLRP PDUs regardless of size, so
//! [LlrpPdu] forces the length flag.

use byteorder::{ByteOrder, NetworkEndian};

use crate::acn_definitions::{CID_FIELD_LENGTH, VECTOR_ROOT_LLRP};
use crate::acn_parse_pack_error::{InflateError, PackError};
use crate::cid::Cid;
use crate::headers::{HeaderSet, LlrpHeader};
use crate::inflator::{Inflator, InflatorLayer};
use crate::pdu::{Pdu, PduBlock, VectorSize};

const LLRP_HEADER_LENGTH: usize = CID_FIELD_LENGTH + 4;

/// The LLRP layer hooks for an [Inflator]. Use [LlrpInflator::new] rather
/// than constructing this directly.
pub struct LlrpLayer {
    last_header: Option<LlrpHeader>,
}

impl InflatorLayer for LlrpLayer {
    fn vector_size(&self) -> VectorSize {
        VectorSize::FourBytes
    }

    fn id(&self) -> u32 {
        VECTOR_ROOT_LLRP
    }

    fn decode_header(&mut self, headers: &mut HeaderSet, data: Option<&[u8]>) -> Result<usize, InflateError> {
        match data {
            Some(data) => {
                if data.len() < LLRP_HEADER_LENGTH {
                    return Err(InflateError::HeaderTooShort {
                        layer: "LLRP",
                        available: data.len(),
                        required: LLRP_HEADER_LENGTH,
                    });
                }
                let destination_cid = Cid::from_slice(&data[..CID_FIELD_LENGTH])?;
                let transaction_number = NetworkEndian::read_u32(&data[CID_FIELD_LENGTH..LLRP_HEADER_LENGTH]);
                let header = LlrpHeader::new(destination_cid, transaction_number);
                headers.llrp = header;
                self.last_header = Some(header);
                Ok(LLRP_HEADER_LENGTH)
            }
            None => {
                let header = self.last_header.ok_or(InflateError::MissingInheritedHeader)?;
                headers.llrp = header;
                Ok(0)
            }
        }
    }

    fn reset_header_field(&mut self) {
        self.last_header = None;
    }
}

/// The inflator for the LLRP layer. Register it as a child of a
/// [RootInflator](crate::root_layer::RootInflator).
pub type LlrpInflator = Inflator<LlrpLayer>;

impl LlrpInflator {
    /// Creates an LLRP inflator with no children registered.
    pub fn new() -> Self {
        Inflator::with_layer(LlrpLayer { last_header: None })
    }
}

impl Default for LlrpInflator {
    fn default() -> Self {
        Self::new()
    }
}

/// An LLRP PDU for encoding: destination CID and transaction number as
/// header, a nested PDU block (probe request/reply or RDM command) as data.
pub struct LlrpPdu<'a, P: Pdu + ?Sized> {
    vector: u32,
    header: LlrpHeader,
    block: Option<&'a PduBlock<'a, P>>,
}

impl<'a, P: Pdu + ?Sized> LlrpPdu<'a, P> {
    /// Creates an LLRP PDU with the given vector (e.g.
    /// [VECTOR_LLRP_PROBE_REQUEST](crate::acn_definitions::VECTOR_LLRP_PROBE_REQUEST))
    /// and header and no data.
    pub fn new(vector: u32, header: LlrpHeader) -> Self {
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

    /// The LLRP header this PDU packs.
    pub fn header(&self) -> &LlrpHeader {
        &self.header
    }
}

impl<P: Pdu + ?Sized> Pdu for LlrpPdu<'_, P> {
    fn vector(&self) -> u32 {
        self.vector
    }

    fn vector_size(&self) -> VectorSize {
        VectorSize::FourBytes
    }

    fn force_length_flag(&self) -> bool {
        true
    }

    fn header_size(&self) -> usize {
        LLRP_HEADER_LENGTH
    }

    fn data_size(&self) -> usize {
        self.block.map_or(0, PduBlock::size)
    }

    fn pack_header(&self, buf: &mut [u8]) -> Result<(), PackError> {
        self.header.destination_cid.pack(&mut buf[..CID_FIELD_LENGTH])?;
        NetworkEndian::write_u32(&mut buf[CID_FIELD_LENGTH..], self.header.transaction_number);
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
    use super::*;
    use crate::acn_definitions::VECTOR_LLRP_PROBE_REQUEST;
    use crate::inflator::InflatorInterface;

    const DEST_CID: [u8; 16] = [
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10,
    ];

    struct NoData;

    impl Pdu for NoData {
        fn vector(&self) -> u32 {
            0
        }

        fn vector_size(&self) -> VectorSize {
            VectorSize::OneByte
        }

        fn header_size(&self) -> usize {
            0
        }

        fn data_size(&self) -> usize {
            0
        }

        fn pack_header(&self, _buf: &mut [u8]) -> Result<(), PackError> {
            Ok(())
        }

        fn pack_data(&self, _buf: &mut [u8]) -> Result<(), PackError> {
            Ok(())
        }
    }

    #[test]
    fn pack_uses_forced_twenty_bit_length() {
        let header = LlrpHeader::new(Cid::from_data(DEST_CID), 0x11223344);
        let pdu: LlrpPdu<'_, NoData> = LlrpPdu::new(VECTOR_LLRP_PROBE_REQUEST, header);
        // 3 length + 4 vector + 20 header
        assert_eq!(pdu.size(), 27);

        let mut buf = [0u8; 27];
        assert_eq!(pdu.pack(&mut buf).unwrap(), 27);
        assert_eq!(&buf[..3], &[0xf0, 0, 27]);
        assert_eq!(&buf[3..7], &[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(&buf[7..23], &DEST_CID);
        assert_eq!(&buf[23..27], &[0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn inflate_llrp_header_round_trip() {
        let header = LlrpHeader::new(Cid::from_data(DEST_CID), 0x11223344);
        let pdu: LlrpPdu<'_, NoData> = LlrpPdu::new(VECTOR_LLRP_PROBE_REQUEST, header);
        let mut packed = alloc::vec![0; pdu.size()];
        pdu.pack(&mut packed).unwrap();

        let mut inflator = LlrpInflator::new();
        let mut headers = HeaderSet::new();
        assert_eq!(inflator.inflate_pdu_block(&mut headers, &packed), packed.len());
        assert_eq!(headers.llrp.destination_cid, Cid::from_data(DEST_CID));
        assert_eq!(headers.llrp.transaction_number, 0x11223344);
    }

    #[test]
    fn truncated_llrp_header_is_rejected() {
        let mut layer = LlrpLayer { last_header: None };
        let mut headers = HeaderSet::new();
        assert_eq!(
            layer.decode_header(&mut headers, Some(&[0u8; 19])),
            Err(InflateError::HeaderTooShort {
                layer: "LLRP",
                available: 19,
                required: 20,
            })
        );
        // a failed decode leaves nothing to inherit
        assert_eq!(layer.decode_header(&mut headers, None), Err(InflateError::MissingInheritedHeader));
    }
}
