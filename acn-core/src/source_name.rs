//! The user assigned name an E1.31/E1.33 component advertises in its framing
//! layer, stored without heap allocation.

use core::fmt::{self, Display};
use core::str::FromStr;

use heapless::{String, Vec};

use crate::acn_parse_pack_error::PackError;

/// The name of a source.
///
/// On the wire this occupies a fixed size null padded field: 64 bytes in the
/// current E1.31 framing layer, 32 bytes in the rev 2 draft layout. The name
/// itself must be UTF-8 and null terminated as per ANSI E1.31-2018
/// Section 6.2.2.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceName {
    inner: String<{ Self::CAPACITY }>,
}

impl Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl SourceName {
    /// The storage capacity, matching the 64 byte field of the current
    /// framing layout. Packing additionally requires room for the null
    /// terminator, so the longest packable name is one byte shorter.
    pub const CAPACITY: usize = 64;

    /// Creates a new [SourceName].
    ///
    /// # Errors
    /// SourceNameTooLong: if the name exceeds [Self::CAPACITY] bytes.
    pub fn new<S: AsRef<str>>(s: S) -> Result<Self, SourceNameError> {
        let value = s.as_ref();
        let inner = String::from_str(value).map_err(|_| SourceNameError::SourceNameTooLong(value.len()))?;
        Ok(Self { inner })
    }

    /// Returns a [str] reference.
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns the length of the source name in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the source name is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the bytes this source name is made out of.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Packs the name into the fixed size field `field`, padded with nulls
    /// up to the field length. The field length is taken from `field.len()`
    /// so the same routine serves the 64 and 32 byte layouts.
    ///
    /// # Errors
    /// SourceNameTooLong: if the name plus its null terminator does not fit.
    pub fn pack_into(&self, field: &mut [u8]) -> Result<(), PackError> {
        if self.inner.len() >= field.len() {
            return Err(PackError::SourceNameTooLong {
                length: self.inner.len(),
                capacity: field.len(),
            });
        }
        field[..self.inner.len()].copy_from_slice(self.inner.as_bytes());
        field[self.inner.len()..].fill(0);
        Ok(())
    }
}

impl FromStr for SourceName {
    type Err = SourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&[u8]> for SourceName {
    type Error = SourceNameError;

    /// Parses a fixed size null padded field as received off the wire.
    ///
    /// # Errors
    /// MissingNullTermination: if no null byte appears in the field, as
    /// required by ANSI E1.31-2018 Section 6.2.2.
    /// SourceNameTooLong: if the name before the null exceeds the capacity.
    /// Utf8: if the name is not valid UTF-8.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let first_null_pos = value.iter().position(|&b| b == 0).ok_or(SourceNameError::MissingNullTermination)?;

        let as_vec = Vec::from_slice(&value[..first_null_pos]).map_err(|_| SourceNameError::SourceNameTooLong(first_null_pos))?;
        let inner = String::from_utf8(as_vec)?;

        Ok(Self { inner })
    }
}

/// For any source name specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceNameError {
    /// A source name that's too long was encountered.
    /// Maximum length is [`SourceName::CAPACITY`].
    ///
    /// # Arguments
    /// Length of the too long source name.
    #[error("Given source name is too long. Maximum is {} but current name is: {}", SourceName::CAPACITY, .0)]
    SourceNameTooLong(usize),

    /// A source name is invalid utf8.
    #[error("Given source name is invalid utf-8 error: {0:?}")]
    Utf8(#[from] core::str::Utf8Error),

    /// Given source name is not null terminated.
    #[error("Given source name is not null terminated")]
    MissingNullTermination,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pack_and_parse_round_trip() {
        let name = SourceName::new("Source_A").unwrap();
        let mut field = [0xffu8; 64];
        name.pack_into(&mut field).unwrap();

        assert_eq!(&field[..8], b"Source_A");
        assert!(field[8..].iter().all(|&b| b == 0));
        assert_eq!(SourceName::try_from(&field[..]).unwrap(), name);
    }

    #[test]
    fn pack_requires_room_for_terminator() {
        let name = SourceName::new("0123456789abcdef0123456789abcdef").unwrap();
        let mut field = [0u8; 32];
        // 32 byte name in a 32 byte field leaves no room for the null.
        assert!(name.pack_into(&mut field).is_err());

        let mut field = [0u8; 33];
        name.pack_into(&mut field).unwrap();
    }

    #[test]
    fn parse_rejects_unterminated_field() {
        let field = [b'x'; 64];
        assert_eq!(
            SourceName::try_from(&field[..]),
            Err(SourceNameError::MissingNullTermination)
        );
    }
}
