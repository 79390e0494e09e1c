//! The ACN root layer, ANSI E1.17-2015 Section 5.
//!
//! The root layer carries a 4 byte protocol vector and a header holding the
//! 16 byte CID of the sending component. Its data region is a PDU block of
//! the protocol the vector selects, e.g. E1.31 framing or LLRP.

use alloc::vec::Vec;

use crate::acn_definitions::CID_FIELD_LENGTH;
use crate::acn_parse_pack_error::{InflateError, PackError};
use crate::cid::Cid;
use crate::headers::{HeaderSet, RootHeader};
use crate::inflator::{Inflator, InflatorLayer};
use crate::pdu::{Pdu, PduBlock, VectorSize};

/// The root layer hooks for an [Inflator]. Use [RootInflator::new] rather
/// than constructing this directly.
pub struct RootLayer {
    last_header: Option<RootHeader>,
}

impl InflatorLayer for RootLayer {
    fn vector_size(&self) -> VectorSize {
        VectorSize::FourBytes
    }

    fn id(&self) -> u32 {
        // the root layer sits above every vector and is never a child
        0
    }

    fn decode_header(&mut self, headers: &mut HeaderSet, data: Option<&[u8]>) -> Result<usize, InflateError> {
        match data {
            Some(data) => {
                if data.len() < CID_FIELD_LENGTH {
                    return Err(InflateError::HeaderTooShort {
                        layer: "root",
                        available: data.len(),
                        required: CID_FIELD_LENGTH,
                    });
                }
                let cid = Cid::from_slice(&data[..CID_FIELD_LENGTH])?;
                let header = RootHeader::new(cid);
                headers.root = header;
                self.last_header = Some(header);
                Ok(CID_FIELD_LENGTH)
            }
            None => {
                let header = self.last_header.ok_or(InflateError::MissingInheritedHeader)?;
                headers.root = header;
                Ok(0)
            }
        }
    }

    fn reset_header_field(&mut self) {
        self.last_header = None;
    }
}

/// The inflator for the ACN root layer. Register a child per root vector,
/// e.g. an E1.31 inflator for [VECTOR_ROOT_E131](crate::acn_definitions::VECTOR_ROOT_E131).
pub type RootInflator = Inflator<RootLayer>;

impl RootInflator {
    /// Creates a root inflator with no children registered.
    pub fn new() -> Self {
        Inflator::with_layer(RootLayer { last_header: None })
    }
}

impl Default for RootInflator {
    fn default() -> Self {
        Self::new()
    }
}

/// A root layer PDU for encoding: the sender's CID as header and a nested
/// PDU block as data.
pub struct RootPdu<'a, P: Pdu + ?Sized> {
    vector: u32,
    cid: Cid,
    block: Option<&'a PduBlock<'a, P>>,
}

impl<'a, P: Pdu + ?Sized> RootPdu<'a, P> {
    /// Creates a root PDU with the given protocol vector and sender CID and
    /// no data.
    pub fn new(vector: u32, cid: Cid) -> Self {
        Self {
            vector,
            cid,
            block: None,
        }
    }

    /// Replaces the protocol vector.
    pub fn set_vector(&mut self, vector: u32) {
        self.vector = vector;
    }

    /// Sets the nested PDU block forming the data region.
    pub fn set_block(&mut self, block: &'a PduBlock<'a, P>) {
        self.block = Some(block);
    }

    /// The sender CID carried in the header.
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// Packs this PDU into a freshly allocated buffer.
    pub fn to_vec(&self) -> Result<Vec<u8>, PackError> {
        let mut buf = alloc::vec![0; self.size()];
        self.pack(&mut buf)?;
        Ok(buf)
    }
}

impl<P: Pdu + ?Sized> Pdu for RootPdu<'_, P> {
    fn vector(&self) -> u32 {
        self.vector
    }

    fn vector_size(&self) -> VectorSize {
        VectorSize::FourBytes
    }

    fn header_size(&self) -> usize {
        CID_FIELD_LENGTH
    }

    fn data_size(&self) -> usize {
        self.block.map_or(0, PduBlock::size)
    }

    fn pack_header(&self, buf: &mut [u8]) -> Result<(), PackError> {
        self.cid.pack(buf)
    }

    fn pack_data(&self, buf: &mut [u8]) -> Result<(), PackError> {
        if let Some(block) = self.block {
            block.pack(buf)?;
        }
        Ok(())
    }
}
