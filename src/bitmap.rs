// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Word-packed bit map functionality.
use std::fmt::Debug;

use crate::error::{Error, Result};

/// Width of a storage word, in bits.
pub const WORD_BITS: u64 = u64::BITS as u64;

/// A fixed-capacity bit map packed into 64-bit words.
///
/// The capacity is always a multiple of [`WORD_BITS`]. Every position taking
/// operation checks `pos < capacity` and fails with [`Error::OutOfRange`]
/// otherwise.
///
/// Mutation goes through `&mut self` and performs plain read-modify-write on
/// the containing word; there is no internal synchronization.
#[derive(Clone, PartialEq, Eq)]
pub struct BitMap {
    words: Vec<u64>,
    capacity: u64,
}

impl BitMap {
    /// Create a new, zeroed bit map holding at least `requested` bits.
    /// The capacity is rounded up to a whole number of words.
    pub fn new(requested: u64) -> Self {
        let nwords = requested.div_ceil(WORD_BITS);

        Self {
            words: vec![0; nwords as usize],
            capacity: nwords * WORD_BITS,
        }
    }

    /// Number of addressable bits.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Set a single bit to `1`. Setting a bit twice is a no-op.
    pub fn set(&mut self, pos: u64) -> Result<()> {
        let (word, mask) = self.locate(pos)?;
        self.words[word] |= mask;

        Ok(())
    }

    /// Check whether a bit is set.
    pub fn is_set(&self, pos: u64) -> Result<bool> {
        let (word, mask) = self.locate(pos)?;

        Ok(self.words[word] & mask == mask)
    }

    /// Clear a single bit to `0`.
    ///
    /// Bloom filters never call this: a bit may be shared by several
    /// elements, and clearing it would drop evidence for all of them.
    pub fn unset(&mut self, pos: u64) -> Result<()> {
        let (word, mask) = self.locate(pos)?;
        self.words[word] &= !mask;

        Ok(())
    }

    /// Footprint of the bit map, in kilobytes.
    pub fn applied_space(&self) -> f64 {
        self.capacity as f64 / 8. / 1024.
    }

    /// Count the number of `1` bits.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Count the number of `0` bits.
    pub fn count_zeros(&self) -> u64 {
        self.capacity - self.count_ones()
    }

    /// Set all bits to zero.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Return the underlying word storage.
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    /// Release the storage. The bit map is consumed, so it can't be used
    /// afterwards.
    pub fn close(self) {
        drop(self.words);
    }

    fn locate(&self, pos: u64) -> Result<(usize, u64)> {
        if pos >= self.capacity {
            return Err(Error::OutOfRange {
                pos,
                capacity: self.capacity,
            });
        }
        Ok(((pos / WORD_BITS) as usize, 1 << (pos % WORD_BITS)))
    }
}

impl Debug for BitMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitMap")
            .field("capacity", &self.capacity)
            .field("ones", &self.count_ones())
            .finish()
    }
}
