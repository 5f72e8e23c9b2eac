use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Length of an address derived by [`Address::derive`]
pub const ADDRESS_LENGTH: usize = 20;

/// An account address, stored as raw bytes and rendered as lowercase hex
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(Vec<u8>);

impl Address {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Address(bytes.into())
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s).map(Address)
    }

    /// Deterministically derive an address from arbitrary seed bytes
    pub fn derive(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        Address(digest[..ADDRESS_LENGTH].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = Address::derive(b"member-1");
        let b = Address::derive(b"member-1");
        let c = Address::derive(b"member-2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_bytes().len(), ADDRESS_LENGTH);
    }

    #[test]
    fn test_hex_round_trip() {
        let addr = Address::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(addr.to_string(), "deadbeef");
        assert_eq!(Address::from_hex("deadbeef").unwrap(), addr);

        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"deadbeef\"");
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), addr);
    }
}
