//! Measures the false positive rate of every preset on sequential integers.
use dedup_bloom::{Bloom, MemBloomFilter, Preset};

const ELEMENTS: u64 = 1 << 20;

fn check_preset(preset: Preset) {
    let mut bf = MemBloomFilter::new(preset, ELEMENTS).unwrap();

    for i in (0..ELEMENTS).step_by(2) {
        bf.put(&i.to_be_bytes()).unwrap();
    }

    let mut false_positives = 0u64;
    for i in 0..ELEMENTS {
        let exists = bf.exist(&i.to_be_bytes()).unwrap();

        if i % 2 == 0 {
            assert!(exists, "[{}] {} resulted in a false negative", preset, i);
        } else if exists {
            false_positives += 1;
        }
    }
    let rate = false_positives as f64 / (ELEMENTS / 2) as f64;

    assert!(
        rate <= preset.target_rate(),
        "[{}] false positive rate {} exceeds {}",
        preset,
        rate,
        preset.target_rate()
    );
    bf.close().unwrap();
}

#[test]
fn one_in_ten_thousand() {
    check_preset(Preset::OneInTenThousand);
}

#[test]
fn eight_in_hundred_thousand() {
    check_preset(Preset::EightInHundredThousand);
}

#[test]
fn five_in_a_million() {
    check_preset(Preset::FiveInAMillion);
}
