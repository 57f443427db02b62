// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Errors returned by the bit map and the filter.
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when building or using a filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested false positive rate has no registered preset.
    #[error("no false positive preset registered for {0}")]
    ConfigurationNotFound(String),

    /// The digest or seeded hash could not be computed.
    #[error("hash computation failed for seed {seed}: {reason}")]
    HashComputation {
        /// Seed being hashed when the failure happened.
        seed: u32,
        /// What went wrong.
        reason: String,
    },

    /// A bit position is not addressable in the bit map.
    #[error("bit position out of range: the capacity is {capacity} but the position is {pos}")]
    OutOfRange {
        /// The offending position.
        pos: u64,
        /// Capacity of the bit map, in bits.
        capacity: u64,
    },

    /// The filter was closed and its storage released.
    #[error("filter is closed")]
    ClosedFilter,

    /// The expected element count can't be turned into a bit map size.
    #[error("invalid expected element count {count} for {bits_per_element} bits per element")]
    InvalidElementCount {
        /// Expected number of elements requested.
        count: u64,
        /// Bits per element of the chosen preset.
        bits_per_element: u64,
    },
}
