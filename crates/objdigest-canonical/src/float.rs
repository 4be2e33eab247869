//! Float normalization.
//!
//! Floats are digested as their IEEE-754 binary64 bit pattern, big-endian.
//! Every NaN payload collapses to the canonical quiet NaN; `+0.0` and `-0.0`
//! stay distinct. Changing any of this changes every digest that contains a
//! float, so the rule is versioned by [`FLOAT_FORMAT_VERSION`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Version of the float canonical form.
pub const FLOAT_FORMAT_VERSION: u32 = 1;

const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// Canonical representation of a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalFloat {
    bits: u64,
}

impl CanonicalFloat {
    /// Raw canonical bit pattern.
    pub fn bits(self) -> u64 {
        self.bits
    }

    /// Fixed-width big-endian bytes fed to the encoder.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.bits.to_be_bytes()
    }

    /// Lowercase 16-digit hex rendering of the bit pattern.
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.bits)
    }

    /// Value this canonical form stands for.
    pub fn to_f64(self) -> f64 {
        f64::from_bits(self.bits)
    }
}

/// Normalizes `x` into its canonical form.
pub fn normalize(x: f64) -> CanonicalFloat {
    let bits = if x.is_nan() {
        CANONICAL_NAN_BITS
    } else {
        x.to_bits()
    };
    CanonicalFloat { bits }
}

impl fmt::Display for CanonicalFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.bits)
    }
}

impl Serialize for CanonicalFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CanonicalFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.len() != 16 {
            return Err(serde::de::Error::custom(format!(
                "expected 16 hex digits, got {:?}",
                s
            )));
        }
        let bits = u64::from_str_radix(&s, 16).map_err(serde::de::Error::custom)?;
        Ok(normalize(f64::from_bits(bits)))
    }
}
