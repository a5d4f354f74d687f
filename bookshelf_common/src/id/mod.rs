//! # Id
//!
//! Opaque, sortable identifiers assigned by the store to every entity.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use ulid::Ulid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Unexpected};

/// Worker-scoped identifier generation.
pub mod worker;

/// A 128-bit sortable identifier.
///
/// Rendered and parsed in the ULID text encoding, so identifiers created by a
/// [`worker::WorkerIdGenerator`] and random ones share one textual form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u128);

/// Errors that can occur when parsing an `Id` from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("invalid id string")]
    InvalidString,
}

const TIMESTAMP_BITS: u32 = 64;
const WORKER_BITS: u32 = 16;
const SEQUENCE_BITS: u32 = 16;

impl Id {
    #[must_use]
    pub const fn new(id: u128) -> Self {
        Self(id)
    }

    /// Generates a new random sortable ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().0)
    }

    /// Packs a millisecond timestamp, worker number and sequence number.
    ///
    /// # Panics
    ///
    /// Panics if the timestamp does not fit into 64 bits.
    #[must_use]
    pub fn from_worker_parts(time: OffsetDateTime, worker: u16, sequence: u16) -> Self {
        let timestamp_ms = (time.unix_timestamp_nanos() / 1_000_000) as u128;
        assert!(timestamp_ms < (1 << TIMESTAMP_BITS));

        Self(
            (timestamp_ms << (WORKER_BITS + SEQUENCE_BITS))
                | (u128::from(worker) << SEQUENCE_BITS)
                | u128::from(sequence),
        )
    }

    /// Inverse of [`Self::from_worker_parts`].
    #[must_use]
    pub fn decode_worker(self) -> (OffsetDateTime, u16, u16) {
        let milliseconds = (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) as i64;
        let timestamp = OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(milliseconds);

        let worker = ((self.0 >> SEQUENCE_BITS) & ((1 << WORKER_BITS) - 1)) as u16;
        let sequence = (self.0 & ((1 << SEQUENCE_BITS) - 1)) as u16;

        (timestamp, worker, sequence)
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Ulid(self.0).fmt(f)
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_str(s.trim())
            .map(|ulid| Self(ulid.0))
            .map_err(|_| ParseIdError::InvalidString)
    }
}

impl From<u128> for Id {
    fn from(id: u128) -> Self {
        Self(id)
    }
}

impl From<Id> for u128 {
    fn from(id: Id) -> Self {
        id.0
    }
}

#[cfg(feature = "serde")]
impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let value = String::deserialize(deserializer)?;
        value
            .parse::<Self>()
            .map_err(|_| D::Error::invalid_value(Unexpected::Str(value.as_str()), &"Id"))
    }
}
