#![warn(missing_docs)]

//! Implementation of the ACN (ANSI E1.17-2015) PDU framing protocols.
//!
//! This crate pairs the `acn-core` wire codec with std transport plumbing.
//! `acn-core` holds the recursive PDU encode/decode machinery shared by
//! E1.31 (Streaming ACN), E1.33 (RDMnet) and LLRP; this crate adds the UDP
//! socket shim and a root layer sender so a component can put packets on
//! the wire.
//!
//! # Examples
//!
//! Sending an empty LLRP RDM command and decoding it on the receive side:
//! ```
//! use acn::acn_definitions::{ACN_SDT_MULTICAST_PORT, VECTOR_ROOT_LLRP};
//! use acn::cid::Cid;
//! use acn::inflator::InflatorInterface;
//! use acn::headers::HeaderSet;
//! use acn::preamble::strip_udp_preamble;
//! use acn::rdm::RdmPdu;
//! use acn::root_layer::RootInflator;
//! use acn::RootSender;
//!
//! let cid = Cid::generate();
//! let mut sender = RootSender::new(cid);
//! let rdm = RdmPdu::new(&[]);
//! let datagram = sender.pack(VECTOR_ROOT_LLRP, &rdm).unwrap().to_vec();
//!
//! // on the receive side: strip the preamble, run the inflator chain
//! let block = strip_udp_preamble(&datagram).unwrap();
//! let mut inflator = RootInflator::new();
//! let mut headers = HeaderSet::new();
//! assert_eq!(inflator.inflate_pdu_block(&mut headers, block), block.len());
//! assert_eq!(headers.root.cid, cid);
//! ```

pub use acn_core::{acn_definitions, acn_parse_pack_error, cid, e131, headers, inflator, llrp, pdu, preamble, rdm, root_layer, source_name};

pub mod error;
pub mod root_sender;
pub mod udp;

pub use error::Error;
pub use root_sender::RootSender;
pub use udp::UdpTransport;
