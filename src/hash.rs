// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Derivation of bit positions from raw elements.
//!
//! Each element is first reduced to a SHA-256 digest, so that structured
//! inputs (sequential integers, common prefixes) don't produce correlated
//! positions. The digest is then fed to a 128-bit SipHash-1-3 keyed by the
//! seed, once per seed, and the result is reduced modulo the bit map
//! capacity.
use std::hash::Hasher;

use sha2::{Digest, Sha256};
use siphasher::sip128::{Hasher128, SipHasher13};

use crate::error::{Error, Result};

/// Fixed-size digest of an element.
pub type ElementDigest = [u8; 32];

/// Second half of the SipHash key. The first half is the seed.
const SEED_KEY: u64 = 0x8a6f_e5d1_3c47_b209;

/// Compute the fixed digest of a raw element.
pub fn digest(element: &[u8]) -> ElementDigest {
    Sha256::digest(element).into()
}

/// Hash a digest with the given seed into a 128-bit value.
pub fn seeded_hash(digest: &ElementDigest, seed: u32) -> u128 {
    let mut hasher = SipHasher13::new_with_keys(u64::from(seed), SEED_KEY);
    hasher.write(digest);

    let h = hasher.finish128();
    (u128::from(h.h2) << 64) | u128::from(h.h1)
}

/// Lazily yields the `k` positions of an element in a bit map of the given
/// capacity, one per seed in `0..k`.
///
/// The digest is computed once, up front. Positions are a pure function of
/// `(element, seed, capacity)` and stable across processes.
pub fn positions(element: &[u8], k: u32, capacity: u64) -> Positions {
    Positions {
        digest: digest(element),
        seed: 0,
        k,
        capacity,
    }
}

/// Iterator returned by [`positions`].
#[derive(Debug, Clone)]
pub struct Positions {
    digest: ElementDigest,
    seed: u32,
    k: u32,
    capacity: u64,
}

impl Iterator for Positions {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.seed >= self.k {
            return None;
        }
        let seed = self.seed;
        self.seed += 1;

        if self.capacity == 0 {
            return Some(Err(Error::HashComputation {
                seed,
                reason: String::from("cannot reduce a hash into an empty bit map"),
            }));
        }
        let pos = seeded_hash(&self.digest, seed) % u128::from(self.capacity);

        Some(Ok(pos as u64))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.k - self.seed) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Positions {}
