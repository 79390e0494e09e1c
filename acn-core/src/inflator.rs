//! The recursive PDU decode ("inflation") machinery.
//!
//! An [Inflator] decodes one protocol layer: it walks a PDU block, decodes
//! each PDU's length, vector and header, and then either recurses into a
//! registered child inflator for that vector or hands the payload to the
//! layer's terminal handler. Chaining inflators (Root -> E1.31 -> DMP, or
//! Root -> LLRP -> RDM) reproduces the nested structure of an ACN packet.
//!
//! Decode failures are never fatal: a malformed PDU is dropped with a logged
//! warning and, since the following offsets are unrecoverable without a
//! valid length field, so is the rest of its block. One bad datagram must
//! not affect other traffic.
//!
//! Vector and header inheritance state lives inside each inflator instance,
//! so an inflator must not be shared across concurrent decode calls. The
//! expected deployment is one inflator chain per socket, driven by a single
//! threaded event loop.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;

use byteorder::{ByteOrder, NetworkEndian};
use log::warn;

use crate::acn_definitions::{PDU_EXTENDED_LENGTH_FLAGS_LENGTH, PDU_LENGTH_FLAGS_LENGTH, PDU_LENGTH_HIGH_MASK};
use crate::acn_parse_pack_error::InflateError;
use crate::headers::HeaderSet;
use crate::pdu::{HFLAG_MASK, LFLAG_MASK, VFLAG_MASK, VectorSize};

/// The object safe face of an inflator, used for child registration and
/// recursion.
pub trait InflatorInterface {
    /// The vector value this inflator handles when registered with a
    /// parent. The root inflator has no enclosing vector and returns 0.
    fn id(&self) -> u32;

    /// Decodes a block of PDUs, invoking child inflators and terminal
    /// handlers as it goes. Returns the number of bytes consumed, which is
    /// less than `data.len()` when a malformed PDU forced the rest of the
    /// block to be dropped.
    fn inflate_pdu_block(&mut self, headers: &mut HeaderSet, data: &[u8]) -> usize;
}

impl core::fmt::Debug for dyn InflatorInterface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InflatorInterface").field("id", &self.id()).finish()
    }
}

/// The per-protocol hooks an [Inflator] is parameterised over.
///
/// This is the part a concrete layer (Root, E1.31, LLRP, ...) supplies; the
/// shared length/vector/dispatch logic lives in [Inflator].
pub trait InflatorLayer {
    /// The width of this layer's vector field.
    fn vector_size(&self) -> VectorSize;

    /// The vector value identifying this layer to its parent, see
    /// [InflatorInterface::id].
    fn id(&self) -> u32;

    /// Decodes this layer's header region into `headers` and returns the
    /// number of bytes consumed.
    ///
    /// `data` is `None` when the PDU omitted its header field (HFLAG
    /// clear): the layer must then reuse the last header it decoded in this
    /// block, or fail with [InflateError::MissingInheritedHeader] if there
    /// is none.
    fn decode_header(&mut self, headers: &mut HeaderSet, data: Option<&[u8]>) -> Result<usize, InflateError>;

    /// Clears the stored last-header state. Called at the start of every
    /// top level block decode; a fresh block must not inherit from a stale
    /// prior block.
    fn reset_header_field(&mut self);

    /// Hook called after the header is decoded but before dispatch, e.g.
    /// for keepalive detection. Returning false stops processing this PDU
    /// without it counting as an error.
    fn post_header(&mut self, vector: u32, headers: &HeaderSet) -> bool {
        let _ = (vector, headers);
        true
    }

    /// Terminal handler invoked when no child inflator is registered for
    /// `vector`. The default warns: a vector with neither a child nor a
    /// handler is a wiring gap.
    fn handle_pdu_data(&mut self, vector: u32, headers: &HeaderSet, data: &[u8]) -> bool {
        let _ = (headers, data);
        warn!("no handler for PDU data, vector id {vector}");
        false
    }
}

/// Decodes the flags/length field at the start of `data`.
///
/// Returns `(pdu_length, bytes_used)`. The 12 bit form needs 2 bytes, the
/// 20 bit form (LFLAG set) needs 3, and the decoded length must be at least
/// the width of the field itself since it counts every byte of the PDU.
///
/// # Errors
/// LengthTooShort: the buffer ended inside the length field. For a UDP
/// framed protocol this means a malformed packet to drop, not data to wait
/// for.
/// LengthBelowMinimum: the decoded length cannot contain its own field.
pub fn decode_length(data: &[u8]) -> Result<(usize, usize), InflateError> {
    let Some(&flags) = data.first() else {
        return Err(InflateError::LengthTooShort {
            available: 0,
            required: PDU_LENGTH_FLAGS_LENGTH,
        });
    };

    let (pdu_length, bytes_used) = if flags & LFLAG_MASK != 0 {
        if data.len() < PDU_EXTENDED_LENGTH_FLAGS_LENGTH {
            return Err(InflateError::LengthTooShort {
                available: data.len(),
                required: PDU_EXTENDED_LENGTH_FLAGS_LENGTH,
            });
        }
        let length = usize::from(flags & PDU_LENGTH_HIGH_MASK) << 16 | usize::from(data[1]) << 8 | usize::from(data[2]);
        (length, PDU_EXTENDED_LENGTH_FLAGS_LENGTH)
    } else {
        if data.len() < PDU_LENGTH_FLAGS_LENGTH {
            return Err(InflateError::LengthTooShort {
                available: data.len(),
                required: PDU_LENGTH_FLAGS_LENGTH,
            });
        }
        let length = usize::from(flags & PDU_LENGTH_HIGH_MASK) << 8 | usize::from(data[1]);
        (length, PDU_LENGTH_FLAGS_LENGTH)
    };

    if pdu_length < bytes_used {
        return Err(InflateError::LengthBelowMinimum { pdu_length, bytes_used });
    }
    Ok((pdu_length, bytes_used))
}

/// The generic recursive decoder for one protocol layer.
///
/// Holds the layer hooks, the inherited-vector state and the child map.
/// Children are registered by vector value, at most once per vector, and
/// are owned by their parent for the lifetime of the chain.
pub struct Inflator<L: InflatorLayer> {
    layer: L,
    last_vector: Option<u32>,
    children: BTreeMap<u32, Box<dyn InflatorInterface>>,
}

impl<L: InflatorLayer> Inflator<L> {
    /// Creates an inflator around the given layer hooks.
    pub fn with_layer(layer: L) -> Self {
        Self {
            layer,
            last_vector: None,
            children: BTreeMap::new(),
        }
    }

    /// Returns the layer hooks, e.g. to read handler state.
    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Returns the layer hooks mutably, e.g. to install a callback.
    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    /// Registers a child inflator for the vector `inflator.id()`.
    ///
    /// At most one child per vector: a duplicate registration leaves the
    /// existing child in place and hands the new one back, so wiring bugs
    /// surface at setup time instead of silently shadowing a handler.
    pub fn add_inflator(&mut self, inflator: Box<dyn InflatorInterface>) -> Result<(), Box<dyn InflatorInterface>> {
        let vector = inflator.id();
        if self.children.contains_key(&vector) {
            return Err(inflator);
        }
        self.children.insert(vector, inflator);
        Ok(())
    }

    /// Returns the child inflator registered for `vector`, if any.
    pub fn get_inflator(&self, vector: u32) -> Option<&dyn InflatorInterface> {
        self.children.get(&vector).map(Box::as_ref)
    }

    /// Clears the vector and header inheritance state. Called at the start
    /// of every [inflate_pdu_block](InflatorInterface::inflate_pdu_block).
    pub fn reset_pdu_fields(&mut self) {
        self.last_vector = None;
        self.layer.reset_header_field();
    }

    /// Decodes the vector field of a PDU whose flags byte is `flags`.
    ///
    /// With VFLAG set, reads a big-endian vector of this layer's width and
    /// remembers it. With VFLAG clear, returns the remembered vector with
    /// zero bytes used so a PDU can reuse its predecessor's vector.
    ///
    /// # Errors
    /// VectorTooShort: VFLAG set but the buffer ended inside the field.
    /// MissingInheritedVector: VFLAG clear and nothing to inherit.
    pub fn decode_vector(&mut self, flags: u8, data: &[u8]) -> Result<(u32, usize), InflateError> {
        if flags & VFLAG_MASK != 0 {
            let width = self.layer.vector_size().bytes();
            if data.len() < width {
                return Err(InflateError::VectorTooShort {
                    available: data.len(),
                    required: width,
                });
            }
            let vector = NetworkEndian::read_uint(&data[..width], width) as u32;
            self.last_vector = Some(vector);
            Ok((vector, width))
        } else {
            match self.last_vector {
                Some(vector) => Ok((vector, 0)),
                None => Err(InflateError::MissingInheritedVector),
            }
        }
    }

    /// Decodes one PDU. `data` is the PDU's contents after the length
    /// field: vector (if present), header (if present) and data region.
    ///
    /// After the vector and header are decoded the payload goes to the
    /// registered child inflator for the vector, or failing that to the
    /// layer's terminal handler.
    pub fn inflate_pdu(&mut self, headers: &mut HeaderSet, flags: u8, data: &[u8]) -> Result<(), InflateError> {
        let (vector, vector_used) = self.decode_vector(flags, data)?;

        let header_used = if flags & HFLAG_MASK != 0 {
            self.layer.decode_header(headers, Some(&data[vector_used..]))?
        } else {
            self.layer.decode_header(headers, None)?;
            0
        };

        if !self.layer.post_header(vector, headers) {
            return Ok(());
        }

        let payload = &data[vector_used + header_used..];
        match self.children.get_mut(&vector) {
            Some(child) => {
                child.inflate_pdu_block(headers, payload);
            }
            None => {
                self.layer.handle_pdu_data(vector, headers, payload);
            }
        }
        Ok(())
    }
}

impl<L: InflatorLayer> InflatorInterface for Inflator<L> {
    fn id(&self) -> u32 {
        self.layer.id()
    }

    fn inflate_pdu_block(&mut self, headers: &mut HeaderSet, data: &[u8]) -> usize {
        self.reset_pdu_fields();
        if data.is_empty() {
            return 0;
        }

        let mut offset = 0;
        while offset < data.len() {
            let (pdu_length, bytes_used) = match decode_length(&data[offset..]) {
                Ok(decoded) => decoded,
                Err(error) => {
                    warn!("dropping remainder of PDU block at offset {offset}: {error}");
                    return offset;
                }
            };

            // A PDU claiming more bytes than remain is skipped; the cursor
            // still advances so the loop terminates.
            if offset + pdu_length <= data.len() {
                let flags = data[offset];
                if let Err(error) = self.inflate_pdu(headers, flags, &data[offset + bytes_used..offset + pdu_length]) {
                    warn!("dropping PDU at offset {offset}: {error}");
                }
            }
            offset += pdu_length;
        }
        offset.min(data.len())
    }
}
