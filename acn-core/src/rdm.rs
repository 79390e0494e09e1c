//! The RDM command PDU carried inside LLRP or E1.33 RPT messages.
//!
//! The PDU's one byte vector is the RDM start code (0xCC) and its data is
//! the RDM message with the start code stripped. The message content is
//! opaque at this layer; RDM parameter semantics belong to the consumer.

use crate::acn_definitions::VECTOR_RDM_CMD_RDM_DATA;
use crate::acn_parse_pack_error::PackError;
use crate::pdu::{Pdu, VectorSize};

/// An RDM command PDU for encoding. Borrows the RDM message bytes (without
/// the start code) from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdmPdu<'a> {
    data: &'a [u8],
}

impl<'a> RdmPdu<'a> {
    /// Creates an RDM PDU around a start-code-stripped RDM message.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// The RDM message bytes this PDU carries.
    pub fn data(&self) -> &[u8] {
        self.data
    }
}

impl Pdu for RdmPdu<'_> {
    fn vector(&self) -> u32 {
        u32::from(VECTOR_RDM_CMD_RDM_DATA)
    }

    fn vector_size(&self) -> VectorSize {
        VectorSize::OneByte
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
        buf.copy_from_slice(self.data);
        Ok(())
    }
}
