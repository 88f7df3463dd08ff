//! Fixed-point probabilities.
//!
//! Weights are stored as integer basis points so that repeated overrides and
//! resets never drift: a sibling set either sums to exactly [`Weight::ONE`]
//! or it does not.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TreeError, TreeResult};

/// A probability in `[0, 1]` with four fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(u32);

impl Weight {
    /// Basis points in a whole.
    pub const SCALE: u32 = 10_000;
    /// Probability zero.
    pub const ZERO: Self = Self(0);
    /// Certainty.
    pub const ONE: Self = Self(Self::SCALE);

    /// Build a weight from basis points (1/10000ths).
    pub fn from_basis_points(bp: u32) -> TreeResult<Self> {
        if bp > Self::SCALE {
            return Err(TreeError::InvalidWeight(format!("{bp} basis points")));
        }
        Ok(Self(bp))
    }

    /// Build a weight from whole percent, e.g. `2` for 0.02.
    pub fn from_percent(percent: u32) -> TreeResult<Self> {
        Self::from_basis_points(percent.saturating_mul(100))
    }

    /// Round a float to the nearest basis point.
    pub fn from_f64(value: f64) -> TreeResult<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(TreeError::InvalidWeight(value.to_string()));
        }
        Ok(Self((value * f64::from(Self::SCALE)).round() as u32))
    }

    /// The weight in basis points.
    pub fn basis_points(self) -> u32 {
        self.0
    }

    /// The weight as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(Self::SCALE)
    }

    /// `1 - self`.
    pub fn complement(self) -> Self {
        Self(Self::SCALE - self.0)
    }

    /// True for probability zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Sum of weights in basis points. Never overflows for realistic sibling counts.
    pub fn total<'a>(weights: impl IntoIterator<Item = &'a Weight>) -> u64 {
        weights.into_iter().map(|w| u64::from(w.0)).sum()
    }
}

impl TryFrom<f64> for Weight {
    type Error = TreeError;

    fn try_from(value: f64) -> TreeResult<Self> {
        Self::from_f64(value)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.as_f64()
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = format!("{:04}", self.0 % Self::SCALE);
        let trimmed = frac.trim_end_matches('0');
        let digits = if trimmed.len() < 2 { &frac[..2] } else { trimmed };
        write!(f, "{whole}.{digits}")
    }
}
