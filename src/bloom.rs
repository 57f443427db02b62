// Copyright (c) 2018 Aleksandr Bezobchuk
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! An in-memory Bloom filter over raw byte elements.

use crate::bitmap::BitMap;
use crate::config::{FalseRateConfig, Preset};
use crate::error::{Error, Result};
use crate::hash;

/// Operations every Bloom filter backend provides.
///
/// Elements are raw bytes. The empty element is a sentinel: [`Bloom::put`]
/// ignores it and [`Bloom::exist`] always reports it as present.
pub trait Bloom {
    /// Add an element. Putting the same element again has no further effect.
    fn put(&mut self, element: &[u8]) -> Result<()>;

    /// Return whether the element was possibly added before. A `false` is
    /// definite; a `true` may be a false positive.
    fn exist(&self, element: &[u8]) -> Result<bool>;

    /// Release the filter's storage. Every later call fails with
    /// [`Error::ClosedFilter`].
    fn close(&mut self) -> Result<()>;

    /// Footprint of the filter's storage, in kilobytes.
    fn applied_space(&self) -> Result<f64>;
}

/// A Bloom filter backed by a [`BitMap`] held in memory.
///
/// `put` and `close` take `&mut self`, `exist` takes `&self`, so a single
/// writer and any number of readers are enforced by the borrow checker.
/// To share a filter between threads, wrap it in a `Mutex` or `RwLock`.
#[derive(Clone, Debug)]
pub struct MemBloomFilter {
    preset: Preset,
    config: FalseRateConfig,
    bits: Option<BitMap>,
}

impl MemBloomFilter {
    /// Return a new filter sized for `expected_elements` at the given preset.
    /// The bit map holds `expected_elements × bits_per_element` bits, rounded up
    /// to a whole word.
    pub fn new(preset: Preset, expected_elements: u64) -> Result<Self> {
        let config = preset.config();
        let capacity = expected_elements
            .checked_mul(config.bits_per_element)
            .filter(|c| *c > 0)
            .ok_or(Error::InvalidElementCount {
                count: expected_elements,
                bits_per_element: config.bits_per_element,
            })?;
        let bits = BitMap::new(capacity);

        tracing::debug!(
            preset = %preset,
            expected_elements,
            capacity = bits.capacity(),
            hashes = config.hashes,
            "bloom filter created"
        );

        Ok(Self {
            preset,
            config,
            bits: Some(bits),
        })
    }

    /// Return a new filter for a numeric false positive rate. The rate must
    /// match one of the registered presets.
    pub fn with_rate(fp_rate: f64, expected_elements: u64) -> Result<Self> {
        let preset = Preset::lookup(fp_rate)
            .ok_or_else(|| Error::ConfigurationNotFound(fp_rate.to_string()))?;

        Self::new(preset, expected_elements)
    }

    /// The preset this filter was built with.
    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// Number of hashes used (`k` parameter).
    pub fn hashes(&self) -> u32 {
        self.config.hashes
    }

    /// Return the number of bits in this filter.
    pub fn bits(&self) -> Result<u64> {
        Ok(self.bitmap()?.capacity())
    }

    /// Whether [`Bloom::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.bits.is_none()
    }

    /// Count the approximate number of distinct elements in the filter.
    pub fn count(&self) -> Result<u64> {
        let bits = self.bitmap()?;
        let nbits = bits.capacity() as f64;
        let nbits_set = bits.count_ones() as f64;
        let nhashes = self.config.hashes as f64;
        let count = -(nbits / nhashes) * (1. - (nbits_set / nbits)).ln();

        Ok(count.round() as u64)
    }

    fn bitmap(&self) -> Result<&BitMap> {
        self.bits.as_ref().ok_or(Error::ClosedFilter)
    }
}

impl Bloom for MemBloomFilter {
    fn put(&mut self, element: &[u8]) -> Result<()> {
        let k = self.config.hashes;
        let bits = self.bits.as_mut().ok_or(Error::ClosedFilter)?;

        if element.is_empty() {
            return Ok(());
        }
        // Every position is computed before the first bit is set, so a
        // failed put leaves the filter untouched.
        let positions = hash::positions(element, k, bits.capacity())
            .collect::<Result<Vec<_>>>()?;
        for pos in positions {
            bits.set(pos)?;
        }
        Ok(())
    }

    fn exist(&self, element: &[u8]) -> Result<bool> {
        let bits = self.bitmap()?;

        if element.is_empty() {
            return Ok(true);
        }
        for pos in hash::positions(element, self.config.hashes, bits.capacity()) {
            if !bits.is_set(pos?)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn close(&mut self) -> Result<()> {
        let bits = self.bits.take().ok_or(Error::ClosedFilter)?;

        tracing::debug!(capacity = bits.capacity(), "bloom filter closed");
        bits.close();

        Ok(())
    }

    fn applied_space(&self) -> Result<f64> {
        Ok(self.bitmap()?.applied_space())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::iter;
    use std::sync::RwLock;
    use std::thread;

    fn key() -> String {
        let rng = fastrand::Rng::new();
        iter::repeat_with(|| rng.alphanumeric()).take(32).collect()
    }

    fn items(size: usize) -> Vec<String> {
        let mut items = HashSet::<String>::new();
        for _ in 0..size {
            items.insert(key());
        }
        items.into_iter().collect()
    }

    #[test]
    fn test_bloom_filter() {
        let n = 1024;
        let items = items(n);
        let mut bf = MemBloomFilter::new(Preset::OneInTenThousand, n as u64).unwrap();

        // Test inclusion.
        for item in items.iter() {
            bf.put(item.as_bytes()).unwrap();

            assert_eq!(
                bf.exist(item.as_bytes()).unwrap(),
                true,
                "item {} should result in a positive inclusion",
                item,
            );
        }

        // Test false negatives.
        for item in items.iter() {
            assert_eq!(
                bf.exist(item.as_bytes()).unwrap(),
                true,
                "item {} resulted in a false negative",
                item
            );
        }
    }

    #[test]
    fn test_absent_items() {
        let mut bf = MemBloomFilter::new(Preset::FiveInAMillion, 256).unwrap();

        for i in 0u64..128 {
            bf.put(&i.to_be_bytes()).unwrap();
        }
        let false_positives = (128u64..10_128)
            .filter(|i| bf.exist(&i.to_be_bytes()).unwrap())
            .count();

        assert!(false_positives <= 1, "{} false positives", false_positives);
    }

    #[test]
    fn test_put_is_idempotent() {
        let mut once = MemBloomFilter::new(Preset::EightInHundredThousand, 64).unwrap();
        let mut twice = once.clone();

        once.put(b"foo").unwrap();
        twice.put(b"foo").unwrap();
        twice.put(b"foo").unwrap();

        assert_eq!(
            once.bitmap().unwrap().as_words(),
            twice.bitmap().unwrap().as_words()
        );
        assert_eq!(once.exist(b"foo"), twice.exist(b"foo"));
        assert!(twice.bitmap().unwrap().count_ones() <= 5);
    }

    #[test]
    fn test_empty_element() {
        let mut bf = MemBloomFilter::new(Preset::OneInTenThousand, 16).unwrap();

        assert_eq!(bf.exist(b"").unwrap(), true);
        bf.put(b"").unwrap();
        assert_eq!(bf.bitmap().unwrap().count_ones(), 0);
        assert_eq!(bf.exist(b"").unwrap(), true);
    }

    #[test]
    fn test_closed() {
        let mut bf = MemBloomFilter::new(Preset::OneInTenThousand, 16).unwrap();
        bf.put(b"foo").unwrap();
        bf.close().unwrap();

        assert!(bf.is_closed());
        assert_eq!(bf.put(b"foo"), Err(Error::ClosedFilter));
        assert_eq!(bf.put(b""), Err(Error::ClosedFilter));
        assert_eq!(bf.exist(b"foo"), Err(Error::ClosedFilter));
        assert_eq!(bf.exist(b""), Err(Error::ClosedFilter));
        assert_eq!(bf.applied_space(), Err(Error::ClosedFilter));
        assert_eq!(bf.bits(), Err(Error::ClosedFilter));
        assert_eq!(bf.count(), Err(Error::ClosedFilter));
        assert_eq!(bf.close(), Err(Error::ClosedFilter));
    }

    #[test]
    fn test_with_rate() {
        let bf = MemBloomFilter::with_rate(5.73e-6, 100).unwrap();
        assert_eq!(bf.preset(), Preset::FiveInAMillion);
        assert_eq!(bf.hashes(), 8);

        assert!(matches!(
            MemBloomFilter::with_rate(0.01, 100),
            Err(Error::ConfigurationNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_element_count() {
        assert_eq!(
            MemBloomFilter::new(Preset::OneInTenThousand, 0).unwrap_err(),
            Error::InvalidElementCount {
                count: 0,
                bits_per_element: 28
            }
        );
        assert!(matches!(
            MemBloomFilter::new(Preset::FiveInAMillion, u64::MAX / 2),
            Err(Error::InvalidElementCount { .. })
        ));
    }

    #[test]
    fn test_sizing() {
        let bf = MemBloomFilter::new(Preset::OneInTenThousand, 1 << 20).unwrap();
        assert_eq!(bf.bits().unwrap(), 28 << 20);
        assert_eq!(bf.applied_space().unwrap(), 3584.);

        // 3 × 28 = 84 bits, rounded up to two words.
        let bf = MemBloomFilter::new(Preset::OneInTenThousand, 3).unwrap();
        assert_eq!(bf.bits().unwrap(), 128);
    }

    #[test]
    fn test_count() {
        let mut bf = MemBloomFilter::new(Preset::OneInTenThousand, 4096).unwrap();

        for i in 0u32..12 {
            bf.put(&i.to_be_bytes()).unwrap();
        }
        assert_eq!(bf.count().unwrap(), 12);

        for i in 0u32..2048 {
            bf.put(&i.to_be_bytes()).unwrap();
        }
        let count = bf.count().unwrap();
        assert!((1950..=2150).contains(&count), "count was {}", count);
    }

    #[test]
    fn test_trait_object() {
        let mut filters: Vec<Box<dyn Bloom>> = Preset::ALL
            .into_iter()
            .map(|p| Box::new(MemBloomFilter::new(p, 128).unwrap()) as Box<dyn Bloom>)
            .collect();

        for bf in filters.iter_mut() {
            bf.put(b"bar").unwrap();
            assert!(bf.exist(b"bar").unwrap());
            assert!(bf.applied_space().unwrap() > 0.);
            bf.close().unwrap();
        }
    }

    #[test]
    fn test_shared_between_threads() {
        let bf = RwLock::new(MemBloomFilter::new(Preset::OneInTenThousand, 4096).unwrap());

        thread::scope(|s| {
            for t in 0u64..4 {
                let bf = &bf;
                s.spawn(move || {
                    for i in 0..512 {
                        let element = (t * 512 + i).to_be_bytes();
                        bf.write().unwrap().put(&element).unwrap();
                        assert!(bf.read().unwrap().exist(&element).unwrap());
                    }
                });
            }
        });

        let bf = bf.into_inner().unwrap();
        for i in 0u64..2048 {
            assert!(bf.exist(&i.to_be_bytes()).unwrap());
        }
    }
}
