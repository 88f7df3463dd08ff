//! Engine configuration.

use crate::rarity::Rarity;

/// What `set_banner` does with a name that is not in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BannerLookup {
    /// Fall back to the standard banner.
    #[default]
    Fallback,
    /// Report the miss and keep the current banner.
    Strict,
}

/// How the guarantee draw weights the tiers at or above the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PityPolicy {
    /// Higher tiers keep their base rate; the threshold tier takes the rest.
    #[default]
    HoldTopRate,
    /// Eligible tiers share the whole probability in proportion to their base rates.
    Proportional,
}

/// Configuration for a gacha engine.
#[derive(Debug, Clone)]
pub struct GachaConfig {
    /// RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Draws per `pull_ten` batch.
    pub batch_size: usize,
    /// Whether `pull_ten` applies the batch guarantee.
    pub guarantee: bool,
    /// Minimum rarity the guarantee promises.
    pub guarantee_threshold: Rarity,
    /// Weighting of the forced draw.
    pub pity_policy: PityPolicy,
    /// Default lookup mode for `set_banner`.
    pub banner_lookup: BannerLookup,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            seed: None,
            batch_size: 10,
            guarantee: false,
            guarantee_threshold: Rarity::FIVE,
            pity_policy: PityPolicy::default(),
            banner_lookup: BannerLookup::default(),
        }
    }
}

impl GachaConfig {
    /// Seed the RNG for reproducible draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the `pull_ten` batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Turn the batch guarantee on or off.
    pub fn with_guarantee(mut self, on: bool) -> Self {
        self.guarantee = on;
        self
    }

    /// Set the guaranteed minimum rarity.
    pub fn with_guarantee_threshold(mut self, rarity: Rarity) -> Self {
        self.guarantee_threshold = rarity;
        self
    }

    /// Set the forced-draw weighting.
    pub fn with_pity_policy(mut self, policy: PityPolicy) -> Self {
        self.pity_policy = policy;
        self
    }

    /// Set the default banner lookup mode.
    pub fn with_banner_lookup(mut self, lookup: BannerLookup) -> Self {
        self.banner_lookup = lookup;
        self
    }
}
