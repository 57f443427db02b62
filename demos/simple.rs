//! A simple example showing the use of a Bloom filter to drop duplicates.
use dedup_bloom::{Bloom, MemBloomFilter, Preset};

fn main() -> dedup_bloom::Result<()> {
    let preset: Preset = "1e-4".parse()?;
    let mut bf = MemBloomFilter::new(preset, 128)?;

    for item in ["foo", "bar", "foo", "baz", "bar"] {
        if bf.exist(item.as_bytes())? {
            println!("{item}: possible duplicate");
        } else {
            bf.put(item.as_bytes())?;
            println!("{item}: new");
        }
    }
    println!("{} kB, ~{} items", bf.applied_space()?, bf.count()?);

    bf.close()
}
