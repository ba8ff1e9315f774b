use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a full hex-encoded [`ObjectId`].
pub const HEX_LEN: usize = 64;

/// Content-addressed identifier for a stored blob or commit.
///
/// An `ObjectId` is the BLAKE3 digest of an object's canonical encoding,
/// computed through a [`ContentHasher`](crate::ContentHasher). Identical
/// content always produces the same `ObjectId`, which is what lets the store
/// deduplicate writes for free.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    /// Wrap a pre-computed 32-byte digest.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex representation (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated hex representation (first 7 characters), as shown on
    /// merge lines in the log.
    pub fn short_hex(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(7);
        hex
    }

    /// Returns `true` if the hex form of this id starts with `prefix`.
    ///
    /// Matching is case-insensitive; an empty prefix matches nothing so that
    /// `""` can never resolve to an arbitrary object.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty()
            && prefix.len() <= HEX_LEN
            && self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// Parse a full 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| TypeError::InvalidLength {
            expected: 32,
            actual: b.len(),
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for ObjectId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ObjectId {
        ObjectId::from_hash(*blake3::hash(b"sample").as_bytes())
    }

    #[test]
    fn hex_roundtrip() {
        let id = sample();
        let parsed = ObjectId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.to_hex().len(), HEX_LEN);
    }

    #[test]
    fn from_str_parses_display() {
        let id = sample();
        let parsed: ObjectId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn short_hex_is_7_chars() {
        let id = sample();
        assert_eq!(id.short_hex().len(), 7);
        assert!(id.to_hex().starts_with(&id.short_hex()));
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(
            ObjectId::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert_eq!(
            ObjectId::from_hex("abcd"),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn prefix_matching() {
        let id = sample();
        let hex = id.to_hex();
        assert!(id.matches_prefix(&hex[..6]));
        assert!(id.matches_prefix(&hex[..6].to_ascii_uppercase()));
        assert!(id.matches_prefix(&hex));
        assert!(!id.matches_prefix(""));
        assert!(!id.matches_prefix(&format!("{hex}0")));
    }

    #[test]
    fn bincode_encoding_is_fixed_width() {
        let bytes = bincode::serialize(&sample()).unwrap();
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn ordering_follows_bytes() {
        let a = ObjectId::from_hash([0; 32]);
        let b = ObjectId::from_hash([1; 32]);
        assert!(a < b);
    }
}
