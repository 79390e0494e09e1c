#![warn(missing_docs)]
//! The errors used within the acn crate.

use acn_core::acn_parse_pack_error::{InflateError, PackError};
use acn_core::source_name::SourceNameError;

/// Error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO errors
    #[error("std error: {0:?}")]
    Io(#[from] std::io::Error),

    /// UUID errors
    #[error("uuid error: {0:?}")]
    Uuid(#[from] uuid::Error),

    /// A PDU or preamble could not be decoded.
    #[error("acn inflate error: {0:?}")]
    Inflate(#[from] InflateError),

    /// A PDU could not be packed.
    #[error("acn pack error: {0:?}")]
    Pack(#[from] PackError),

    /// Error with source name
    #[error("source name error: {0:?}")]
    SourceName(#[from] SourceNameError),

    /// Failed to join a multicast group
    #[error("Failed to join multicast group")]
    JoinMulticast(#[source] std::io::Error),

    /// Failed to send a packed PDU block
    #[error("Failed to send PDU block")]
    SendBlock(#[source] std::io::Error),
}
