#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! Core wire codec for the ACN family of protocols (ANSI E1.17-2015).
//!
//! This crate implements the recursive PDU framing shared by E1.31 (Streaming
//! ACN), E1.33 (RDMnet) and LLRP: the flags/length/vector encoding, the
//! inflator dispatch chain used to decode nested PDU blocks, and the concrete
//! Root, E1.31 and LLRP layers. It performs no I/O; everything operates on
//! caller supplied buffers.

extern crate alloc;

pub mod acn_definitions;
pub mod acn_parse_pack_error;
pub mod cid;
pub mod e131;
pub mod headers;
pub mod inflator;
pub mod llrp;
pub mod pdu;
pub mod preamble;
pub mod rdm;
pub mod root_layer;
pub mod source_name;
