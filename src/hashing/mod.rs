//! Identity derivation for indexed records.
//!
//! A record's content address is the BLAKE3-256 digest of its URL's UTF-8
//! bytes. The address doubles as the dedup key and the index storage key, so
//! [`IDENTITY_SCHEME_VERSION`] must be bumped whenever [`derive_content_address`]
//! changes; the versioned collection name then points at a fresh index.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Version of the URL -> content-address derivation.
pub const IDENTITY_SCHEME_VERSION: u32 = 1;

/// Length of the hex rendering of a [`ContentAddress`].
pub const CONTENT_ADDRESS_HEX_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentAddressError {
    #[error("invalid content address '{value}': expected {CONTENT_ADDRESS_HEX_LEN} hex characters")]
    InvalidHex { value: String },
}

/// Deterministic identifier derived from a record URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentAddress([u8; 32]);

impl ContentAddress {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    /// Qdrant point id: a UUID built from the first 16 bytes of the address.
    pub fn point_uuid(&self) -> uuid::Uuid {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&self.0[..16]);
        uuid::Uuid::from_bytes(bytes)
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ContentAddress {
    type Err = ContentAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != CONTENT_ADDRESS_HEX_LEN {
            return Err(ContentAddressError::InvalidHex {
                value: s.to_string(),
            });
        }
        blake3::Hash::from_hex(s)
            .map(|hash| Self(*hash.as_bytes()))
            .map_err(|_| ContentAddressError::InvalidHex {
                value: s.to_string(),
            })
    }
}

impl serde::Serialize for ContentAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Derives the content address of `url`.
#[inline]
pub fn derive_content_address(url: &str) -> ContentAddress {
    ContentAddress(*blake3::hash(url.as_bytes()).as_bytes())
}

/// Physical collection name for a logical collection under the current scheme.
pub fn versioned_collection_name(base: &str) -> String {
    format!("{}_v{}", base, IDENTITY_SCHEME_VERSION)
}
