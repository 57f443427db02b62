//! An in-memory Bloom filter for rejecting likely duplicates cheaply.
//!
//! # Bloom Filters
//!
//! A Bloom filter is a space-efficient probabilistic data structure that is
//! used to test whether an element is a member of a set. It allows for queries
//! to return: "possibly in set" or "definitely not in set". Elements can be
//! added to the set, but not removed; the more elements that are added to the
//! set, the larger the probability of false positives.
//!
//! # Presets
//!
//! Filters are sized from an expected element count and one of a few tuned
//! [`Preset`]s, each fixing the bits allocated per element (`m/n`) and the
//! number of hash positions (`k`):
//!
//! | preset                      | target rate | m/n | k |
//! |-----------------------------|-------------|-----|---|
//! | `OneInTenThousand`          | 1e-4        | 28  | 5 |
//! | `EightInHundredThousand`    | 8.53e-5     | 30  | 5 |
//! | `FiveInAMillion`            | 5.73e-6     | 32  | 8 |
//!
//! # Hashing
//!
//! Each element is reduced to a SHA-256 digest, and position `i` is the
//! 128-bit SipHash-1-3 of that digest keyed by seed `i`, modulo the bit map
//! capacity.
//!
//! # Example
//!
//! ```
//! use dedup_bloom::{Bloom, MemBloomFilter, Preset};
//!
//! # fn main() -> dedup_bloom::Result<()> {
//! let mut filter = MemBloomFilter::new(Preset::OneInTenThousand, 1024)?;
//!
//! filter.put(b"foo")?;
//! filter.put(b"bar")?;
//!
//! assert!(filter.exist(b"foo")?);
//! assert!(filter.exist(b"bar")?);
//! filter.exist(b"baz")?; // most likely false
//!
//! filter.close()?;
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]
#![allow(clippy::bool_assert_comparison)]

pub mod bitmap;
pub mod bloom;
pub mod config;
pub mod error;
pub mod hash;

pub use bitmap::BitMap;
pub use bloom::{Bloom, MemBloomFilter};
pub use config::{FalseRateConfig, Preset};
pub use error::{Error, Result};
