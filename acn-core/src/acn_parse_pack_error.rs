//! The errors within the acn crates related to inflate (decode) and pack
//! (encode) failures.
//!
//! Inflate failures are expected on a network facing codec and are never
//! fatal: one bad datagram must not affect other traffic, so every decode
//! primitive reports failure as a `Result` and the caller drops the
//! offending PDU or block with a logged warning.

/// The errors raised while inflating a PDU block received from the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InflateError {
    /// The buffer ended before the PDU length field. The 12 bit encoding
    /// needs 2 bytes, the 20 bit encoding (LFLAG set) needs 3.
    ///
    /// # Arguments
    /// available: the number of bytes remaining in the buffer.
    /// required: the number of bytes the length field needs.
    #[error("Insufficient data for the PDU length field, have {available} bytes but need {required}")]
    LengthTooShort {
        /// Bytes remaining in the buffer.
        available: usize,
        /// Bytes the length field needs.
        required: usize,
    },

    /// The decoded PDU length is smaller than the length field itself. The
    /// length counts every byte of the PDU including the flags and length
    /// field, so a value below the field width can never be valid.
    #[error("PDU length field claims {pdu_length} bytes but the length field alone occupies {bytes_used}")]
    LengthBelowMinimum {
        /// The decoded length value.
        pdu_length: usize,
        /// The width of the length field that produced it.
        bytes_used: usize,
    },

    /// The buffer ended before the vector field.
    #[error("Insufficient data for a {required} byte vector field, have {available} bytes")]
    VectorTooShort {
        /// Bytes remaining in the buffer.
        available: usize,
        /// The vector width this inflator expects.
        required: usize,
    },

    /// VFLAG was clear but no previous PDU in this block supplied a vector
    /// to inherit.
    #[error("Vector field omitted and no previous vector to inherit from")]
    MissingInheritedVector,

    /// HFLAG was clear but no previous PDU in this block supplied a header
    /// to inherit.
    #[error("Header field omitted and no previous header to inherit from")]
    MissingInheritedHeader,

    /// The buffer ended before the protocol specific header.
    #[error("Insufficient data for the {layer} header, have {available} bytes but need {required}")]
    HeaderTooShort {
        /// The layer whose header could not be decoded.
        layer: &'static str,
        /// Bytes remaining in the buffer.
        available: usize,
        /// Bytes the header needs.
        required: usize,
    },

    /// A preamble did not match the fixed ACN byte sequence.
    ///
    /// # Arguments
    /// msg: which preamble field was wrong.
    #[error("Invalid ACN preamble, msg: {0}")]
    InvalidPreamble(&'static str),

    /// The buffer ended before the preamble.
    #[error("Insufficient data for the ACN preamble, have {available} bytes but need {required}")]
    PreambleTooShort {
        /// Bytes remaining in the buffer.
        available: usize,
        /// Bytes the preamble needs.
        required: usize,
    },

    /// A CID field could not be parsed.
    #[error("Error parsing the received CID, msg: {0}")]
    Cid(#[from] uuid::Error),

    /// A source name field was not valid, for example not null terminated.
    #[error("Attempted to parse invalid source name, msg: {0}")]
    SourceName(#[from] crate::source_name::SourceNameError),
}

/// The errors raised while packing a PDU into a caller supplied buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// The supplied buffer is not large enough to pack the PDU into.
    #[error("Supplied buffer is not large enough to pack the PDU into, have {available} bytes but need {required}")]
    BufferTooSmall {
        /// Bytes available in the buffer.
        available: usize,
        /// Bytes the packed PDU needs.
        required: usize,
    },

    /// The PDU is too large for even the 20 bit length encoding.
    #[error("PDU length {0} exceeds the 20 bit length field")]
    LengthExceedsRange(usize),

    /// The vector value does not fit the vector field width of this PDU.
    #[error("Vector {vector:#x} does not fit in a {width} byte vector field")]
    VectorTooWide {
        /// The vector value.
        vector: u32,
        /// The field width in bytes.
        width: usize,
    },

    /// A source name does not fit the fixed size field of the target layout.
    #[error("Source name of {length} bytes does not fit a {capacity} byte field")]
    SourceNameTooLong {
        /// The source name length in bytes.
        length: usize,
        /// The field capacity, which must also hold a null terminator.
        capacity: usize,
    },
}
