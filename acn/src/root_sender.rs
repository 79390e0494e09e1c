//! Packing and sending root layer messages.
//!
//! [RootSender] owns a CID and a reusable scratch buffer: each send packs
//! the UDP preamble, a root PDU carrying the given vector and CID, and the
//! caller's PDU as the nested block, then hands the datagram to a
//! [UdpTransport]. The buffer is overwritten per send, so a sender belongs
//! to one thread; create one per sending component.

use std::net::SocketAddr;

use acn_core::cid::Cid;
use acn_core::pdu::{Pdu, PduBlock};
use acn_core::preamble::{UDP_PREAMBLE_LENGTH, pack_udp_preamble};
use acn_core::root_layer::RootPdu;

use crate::error::Error;
use crate::udp::UdpTransport;

/// Packs root layer messages for one sending component.
pub struct RootSender {
    cid: Cid,
    buffer: Vec<u8>,
}

impl RootSender {
    /// Creates a sender for the component identified by `cid`.
    pub fn new(cid: Cid) -> Self {
        Self {
            cid,
            buffer: Vec::new(),
        }
    }

    /// The CID stamped into every root PDU this sender packs.
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// Packs the preamble and a root PDU wrapping `pdu` into the internal
    /// buffer and returns the finished datagram. The buffer is reused; the
    /// returned slice is valid until the next pack.
    pub fn pack(&mut self, vector: u32, pdu: &dyn Pdu) -> Result<&[u8], Error> {
        let mut block = PduBlock::new();
        block.add_pdu(pdu);
        let mut root = RootPdu::new(vector, self.cid);
        root.set_block(&block);

        let total = UDP_PREAMBLE_LENGTH + root.size();
        self.buffer.clear();
        self.buffer.resize(total, 0);

        let offset = pack_udp_preamble(&mut self.buffer)?;
        root.pack(&mut self.buffer[offset..])?;
        Ok(&self.buffer)
    }

    /// Packs `pdu` under the given root vector and sends it to `dest`.
    pub fn send_pdu(&mut self, vector: u32, pdu: &dyn Pdu, transport: &UdpTransport, dest: SocketAddr) -> Result<(), Error> {
        self.pack(vector, pdu)?;
        transport.send_to(&self.buffer, dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use acn_core::acn_definitions::VECTOR_ROOT_LLRP;
    use acn_core::rdm::RdmPdu;

    use super::*;

    const TEST_CID: [u8; 16] = [
        0xef, 0x07, 0xc4, 0xd4, 0x95, 0x4c, 0x41, 0x8d, 0x90, 0x36, 0xa5, 0x2a, 0x8f, 0xff, 0xf7, 0x97,
    ];

    #[test]
    fn packed_datagram_layout() {
        let mut sender = RootSender::new(Cid::from_data(TEST_CID));
        let rdm = RdmPdu::new(&[]);
        let datagram = sender.pack(VECTOR_ROOT_LLRP, &rdm).unwrap();

        // preamble, then root PDU: 2 + 4 + 16 + nested 3 = 25 bytes
        assert_eq!(datagram.len(), 16 + 25);
        assert_eq!(&datagram[..4], &[0x00, 0x10, 0x00, 0x00]);
        assert_eq!(&datagram[4..16], b"ASC-E1.17\0\0\0");
        assert_eq!(&datagram[16..18], &[0x70, 25]);
        assert_eq!(&datagram[18..22], &[0x00, 0x00, 0x00, 0x0a]);
        assert_eq!(&datagram[22..38], &TEST_CID);
        assert_eq!(&datagram[38..], &[0x70, 3, 0xcc]);
    }

    #[test]
    fn buffer_is_reused_across_packs() {
        let mut sender = RootSender::new(Cid::from_data(TEST_CID));
        let message = [0x01u8, 0x18];
        let rdm = RdmPdu::new(&message);
        let first_len = sender.pack(VECTOR_ROOT_LLRP, &rdm).unwrap().len();
        assert_eq!(first_len, 16 + 22 + 5);

        // a smaller PDU must not leave stale trailing bytes
        let empty = RdmPdu::new(&[]);
        let datagram = sender.pack(VECTOR_ROOT_LLRP, &empty).unwrap();
        assert_eq!(datagram.len(), 16 + 25);
        assert_eq!(&datagram[38..], &[0x70, 3, 0xcc]);
    }
}
