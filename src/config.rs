// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Registry of tuned false positive rate presets.
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Relative tolerance used when resolving a numeric rate to a preset.
const RATE_TOLERANCE: f64 = 1e-3;

/// A tuned pair of bit map sizing ratio and hash count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FalseRateConfig {
    /// Bit map bits allocated per expected element (`m/n`).
    pub bits_per_element: u64,
    /// Number of hash positions per element (`k`).
    pub hashes: u32,
}

impl FalseRateConfig {
    /// Theoretical false positive rate, `(1 - e^(-k·n/m))^k`, when the filter
    /// holds `load` times its expected element count.
    pub fn expected_rate(&self, load: f64) -> f64 {
        let k = self.hashes as f64;
        let exponent = -k * load / self.bits_per_element as f64;

        (1. - exponent.exp()).powf(k)
    }
}

/// One of the registered false positive rate targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// About `1e-4`.
    OneInTenThousand,
    /// About `8.53e-5`.
    EightInHundredThousand,
    /// About `5.73e-6`.
    FiveInAMillion,
}

impl Preset {
    /// All registered presets.
    pub const ALL: [Preset; 3] = [
        Preset::OneInTenThousand,
        Preset::EightInHundredThousand,
        Preset::FiveInAMillion,
    ];

    /// The tuned pair for this preset.
    pub const fn config(self) -> FalseRateConfig {
        match self {
            Preset::OneInTenThousand => FalseRateConfig {
                bits_per_element: 28,
                hashes: 5,
            },
            Preset::EightInHundredThousand => FalseRateConfig {
                bits_per_element: 30,
                hashes: 5,
            },
            Preset::FiveInAMillion => FalseRateConfig {
                bits_per_element: 32,
                hashes: 8,
            },
        }
    }

    /// Nominal false positive rate this preset targets.
    pub const fn target_rate(self) -> f64 {
        match self {
            Preset::OneInTenThousand => 1e-4,
            Preset::EightInHundredThousand => 8.53e-5,
            Preset::FiveInAMillion => 5.73e-6,
        }
    }

    /// Stable name of the preset, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Preset::OneInTenThousand => "one-in-ten-thousand",
            Preset::EightInHundredThousand => "eight-in-hundred-thousand",
            Preset::FiveInAMillion => "five-in-a-million",
        }
    }

    /// Resolve a numeric rate to a preset. Returns `None` when no preset's
    /// target rate is within a relative tolerance of `rate`.
    pub fn lookup(rate: f64) -> Option<Preset> {
        if !rate.is_finite() || rate <= 0. {
            return None;
        }
        Preset::ALL
            .into_iter()
            .find(|p| ((p.target_rate() - rate) / p.target_rate()).abs() < RATE_TOLERANCE)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(preset) = Preset::ALL.into_iter().find(|p| p.name() == s) {
            return Ok(preset);
        }
        s.parse::<f64>()
            .ok()
            .and_then(Preset::lookup)
            .ok_or_else(|| Error::ConfigurationNotFound(s.to_owned()))
    }
}
