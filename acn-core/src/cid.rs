//! The Component Identifier (CID) used throughout the ACN suite.
//!
//! Every ACN component carries a 16 byte UUID shaped identifier which the
//! root layer repeats in each packet, as per ANSI E1.17-2015 and
//! ANSI E1.31-2018 Section 5.6. The CID only needs to be unique enough to
//! distinguish components on a LAN; it is not a secret.

use core::fmt::{self, Display};
use core::str::FromStr;

use uuid::Uuid;

use crate::acn_definitions::CID_FIELD_LENGTH;
use crate::acn_parse_pack_error::PackError;

/// A 16 byte component identifier.
///
/// The all zero ("nil") CID is a sentinel meaning "no CID decoded yet" and is
/// what [Default] produces. Comparison and ordering are byte-wise so a [Cid]
/// can be used directly as a map key.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cid(Uuid);

impl Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Cid {
    /// The length of a packed CID in bytes.
    pub const LENGTH: usize = CID_FIELD_LENGTH;

    /// Generates a new random CID (a version 4 UUID).
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil CID, all 16 bytes zero.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Creates a CID from 16 raw bytes. Any 16 bytes form a valid CID so
    /// this cannot fail.
    pub const fn from_data(bytes: [u8; Self::LENGTH]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Creates a CID from a byte slice.
    ///
    /// # Errors
    /// Returns a [uuid::Error] if the slice is not exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, uuid::Error> {
        Uuid::from_slice(bytes).map(Self)
    }

    /// Returns the 16 raw bytes of this CID.
    pub const fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        self.0.as_bytes()
    }

    /// Packs the 16 raw bytes of this CID into the start of `buf`.
    ///
    /// # Errors
    /// BufferTooSmall: if `buf` is shorter than 16 bytes.
    pub fn pack(&self, buf: &mut [u8]) -> Result<(), PackError> {
        if buf.len() < Self::LENGTH {
            return Err(PackError::BufferTooSmall {
                available: buf.len(),
                required: Self::LENGTH,
            });
        }
        buf[..Self::LENGTH].copy_from_slice(self.0.as_bytes());
        Ok(())
    }

    /// Returns true iff all 16 bytes are zero, i.e. this is the "no CID
    /// decoded yet" sentinel.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl FromStr for Cid {
    type Err = uuid::Error;

    /// Parses the standard UUID text form. On failure no usable value is
    /// produced, so a half parsed CID can never leak into a header.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for Cid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<Cid> for Uuid {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generate_pack_from_data_round_trip() {
        let cid = Cid::generate();
        let mut buf = [0u8; Cid::LENGTH];
        cid.pack(&mut buf).unwrap();
        assert_eq!(Cid::from_data(buf), cid);
        assert_eq!(Cid::from_slice(&buf).unwrap(), cid);
    }

    #[test]
    fn nil_is_only_all_zero() {
        assert!(Cid::nil().is_nil());
        assert!(Cid::default().is_nil());
        assert!(Cid::from_data([0; 16]).is_nil());

        let mut bytes = [0u8; 16];
        bytes[15] = 1;
        assert!(!Cid::from_data(bytes).is_nil());
        assert!(!Cid::generate().is_nil());
    }

    #[test]
    fn pack_rejects_short_buffer() {
        let cid = Cid::generate();
        let mut buf = [0u8; Cid::LENGTH - 1];
        assert_eq!(
            cid.pack(&mut buf),
            Err(PackError::BufferTooSmall {
                available: 15,
                required: 16,
            })
        );
    }

    #[test]
    fn parse_from_string() {
        let cid: Cid = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        assert_eq!(
            cid.as_bytes(),
            &[0x67, 0xe5, 0x50, 0x44, 0x10, 0xb1, 0x42, 0x6f, 0x92, 0x47, 0xbb, 0x68, 0x0e, 0x5f, 0xe0, 0xc8]
        );

        assert!("not-a-uuid".parse::<Cid>().is_err());
        assert!("67e55044-10b1-426f-9247".parse::<Cid>().is_err());
    }

    #[test]
    fn byte_wise_ordering() {
        let low = Cid::from_data([0; 16]);
        let mut high_bytes = [0u8; 16];
        high_bytes[0] = 1;
        let high = Cid::from_data(high_bytes);
        assert!(low < high);
        assert_eq!(low, Cid::nil());
    }
}
