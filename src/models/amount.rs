use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AmountRange — Disclosure value brackets
// ---------------------------------------------------------------------------

/// A disclosed value bracket. Disclosures report a range instead of an exact
/// trade value; each bracket maps to a fixed midpoint used for volume
/// estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountRange {
    #[serde(rename = "$1K-$15K")]
    From1KTo15K,
    #[serde(rename = "$15K-$50K")]
    From15KTo50K,
    #[serde(rename = "$50K-$100K")]
    From50KTo100K,
    #[serde(rename = "$100K-$250K")]
    From100KTo250K,
    #[serde(rename = "$250K-$500K")]
    From250KTo500K,
    #[serde(rename = "$500K-$1M")]
    From500KTo1M,
    #[serde(rename = "$1M-$5M")]
    From1MTo5M,
}

impl AmountRange {
    /// All brackets, largest first. [`AmountRange::parse`] checks in this order.
    pub const ALL: [AmountRange; 7] = [
        AmountRange::From1MTo5M,
        AmountRange::From500KTo1M,
        AmountRange::From250KTo500K,
        AmountRange::From100KTo250K,
        AmountRange::From50KTo100K,
        AmountRange::From15KTo50K,
        AmountRange::From1KTo15K,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AmountRange::From1KTo15K => "$1K-$15K",
            AmountRange::From15KTo50K => "$15K-$50K",
            AmountRange::From50KTo100K => "$50K-$100K",
            AmountRange::From100KTo250K => "$100K-$250K",
            AmountRange::From250KTo500K => "$250K-$500K",
            AmountRange::From500KTo1M => "$500K-$1M",
            AmountRange::From1MTo5M => "$1M-$5M",
        }
    }

    /// Midpoint dollar value of the bracket.
    pub fn midpoint(&self) -> u64 {
        match self {
            AmountRange::From1KTo15K => 8_000,
            AmountRange::From15KTo50K => 32_500,
            AmountRange::From50KTo100K => 75_000,
            AmountRange::From100KTo250K => 175_000,
            AmountRange::From250KTo500K => 375_000,
            AmountRange::From500KTo1M => 750_000,
            AmountRange::From1MTo5M => 3_000_000,
        }
    }

    /// Match a label against the bracket table.
    ///
    /// A label matches when it contains a bracket label, so decorated labels
    /// such as `"$1M-$5M (joint)"` still resolve.
    pub fn parse(label: &str) -> Option<AmountRange> {
        Self::ALL
            .iter()
            .copied()
            .find(|range| label.contains(range.label()))
    }

    /// Midpoint for a raw label; unrecognized labels contribute 0.
    pub fn midpoint_of(label: &str) -> u64 {
        Self::parse(label).map(|r| r.midpoint()).unwrap_or(0)
    }
}

impl fmt::Display for AmountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_parses_to_itself() {
        for range in AmountRange::ALL {
            assert_eq!(AmountRange::parse(range.label()), Some(range));
        }
    }

    #[test]
    fn largest_bracket_is_three_million() {
        assert_eq!(AmountRange::midpoint_of("$1M-$5M"), 3_000_000);
    }

    #[test]
    fn decorated_label_still_matches() {
        assert_eq!(
            AmountRange::parse("Spouse: $15K-$50K"),
            Some(AmountRange::From15KTo50K)
        );
    }

    #[test]
    fn unknown_label_contributes_zero() {
        assert_eq!(AmountRange::parse("$5M-$25M"), None);
        assert_eq!(AmountRange::midpoint_of(""), 0);
        assert_eq!(AmountRange::midpoint_of("1K-15K"), 0);
    }
}
