//! Banner configuration: tier rates, rate-up split, cutoff, featured operators.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use exu_tree::{Weight, normalize};

use crate::catalog::{BannerSpec, Catalog};
use crate::error::{GachaError, GachaResult};
use crate::operator::Operator;
use crate::rarity::Rarity;

/// Name of the synthesized banner used when no named banner applies.
pub const STANDARD_BANNER: &str = "Standard Headhunting";

/// Rate-up share used when a banner does not specify one.
pub const DEFAULT_RATE_UP_SPLIT: u32 = 50;

/// Base probability of each drawable tier, top tier first. Always sums to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u8, Weight>", into = "BTreeMap<u8, Weight>")]
pub struct TierRates(Vec<(Rarity, Weight)>);

impl Default for TierRates {
    fn default() -> Self {
        let pct = |p: u32| Weight::from_basis_points(p * 100).unwrap_or_default();
        Self(vec![
            (Rarity::SIX, pct(2)),
            (Rarity::FIVE, pct(8)),
            (Rarity::FOUR, pct(50)),
            (Rarity::THREE, pct(40)),
        ])
    }
}

impl TierRates {
    /// Validate and order a set of tier rates.
    ///
    /// Every rarity must be drawable (3★-6★) and appear once, and the rates
    /// must sum to exactly one.
    pub fn new(rates: impl IntoIterator<Item = (Rarity, Weight)>) -> GachaResult<Self> {
        let mut seen = BTreeSet::new();
        let mut rates: Vec<(Rarity, Weight)> = rates.into_iter().collect();
        for (rarity, _) in &rates {
            if !rarity.is_drawable() {
                return Err(GachaError::InvalidBannerConfig(format!(
                    "{rarity} is not a drawable tier"
                )));
            }
            if !seen.insert(*rarity) {
                return Err(GachaError::InvalidBannerConfig(format!(
                    "{rarity} listed twice"
                )));
            }
        }
        let sum = Weight::total(rates.iter().map(|(_, w)| w));
        if sum != u64::from(Weight::SCALE) {
            return Err(GachaError::InvalidBannerConfig(format!(
                "tier rates sum to {sum} basis points, expected 10000"
            )));
        }
        rates.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(Self(rates))
    }

    /// Rate of one tier, if present.
    pub fn rate(&self, rarity: Rarity) -> Option<Weight> {
        self.0.iter().find(|(r, _)| *r == rarity).map(|(_, w)| *w)
    }

    /// `(rarity, rate)` pairs, top tier first.
    pub fn iter(&self) -> impl Iterator<Item = &(Rarity, Weight)> {
        self.0.iter()
    }

    /// The tiers, top tier first.
    pub fn tiers(&self) -> Vec<Rarity> {
        self.0.iter().map(|(r, _)| *r).collect()
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no tiers are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop the given tiers and rescale the rest proportionally.
    pub fn without(&self, excluded: &[Rarity]) -> GachaResult<Self> {
        if excluded.is_empty() {
            return Ok(self.clone());
        }
        let kept: Vec<(Rarity, Weight)> = self
            .0
            .iter()
            .filter(|(r, _)| !excluded.contains(r))
            .copied()
            .collect();
        let weights: Vec<Weight> = kept.iter().map(|(_, w)| *w).collect();
        let scaled = normalize(&weights).map_err(|_| {
            GachaError::EmptyPool("no tier with a non-zero rate has anything to draw".to_string())
        })?;
        Ok(Self(
            kept.into_iter()
                .zip(scaled)
                .map(|((r, _), w)| (r, w))
                .collect(),
        ))
    }
}

impl TryFrom<BTreeMap<u8, Weight>> for TierRates {
    type Error = GachaError;

    fn try_from(map: BTreeMap<u8, Weight>) -> GachaResult<Self> {
        let rates = map
            .into_iter()
            .map(|(stars, w)| Ok((Rarity::new(stars)?, w)))
            .collect::<GachaResult<Vec<_>>>()?;
        Self::new(rates)
    }
}

impl From<TierRates> for BTreeMap<u8, Weight> {
    fn from(rates: TierRates) -> Self {
        rates.0.into_iter().map(|(r, w)| (r.stars(), w)).collect()
    }
}

/// A resolved banner: everything the engine needs to build a draw tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    name: String,
    tier_rates: TierRates,
    rate_up_split: Weight,
    cutoff: NaiveDate,
    rate_ups: BTreeMap<Rarity, Vec<Operator>>,
}

impl Banner {
    /// Build a banner directly.
    pub fn new(name: impl Into<String>, tier_rates: TierRates, cutoff: NaiveDate) -> Self {
        Self {
            name: name.into(),
            tier_rates,
            rate_up_split: default_split(),
            cutoff,
            rate_ups: BTreeMap::new(),
        }
    }

    /// Set the share of a rate-up tier given to the featured operators.
    pub fn with_rate_up_split(mut self, split: Weight) -> Self {
        self.rate_up_split = split;
        self
    }

    /// Feature an operator. Rejects non-drawable rarities and repeats.
    pub fn with_rate_up(mut self, operator: Operator) -> GachaResult<Self> {
        if !operator.rarity.is_drawable() {
            return Err(GachaError::InvalidBannerConfig(format!(
                "rate-up \"{}\" is {}, not a drawable tier",
                operator.name, operator.rarity
            )));
        }
        let tier = self.rate_ups.entry(operator.rarity).or_default();
        if tier.iter().any(|op| op.name == operator.name) {
            return Err(GachaError::InvalidBannerConfig(format!(
                "rate-up \"{}\" listed twice",
                operator.name
            )));
        }
        tier.push(operator);
        Ok(self)
    }

    /// Resolve a catalog entry. Every rate-up must name a catalog operator.
    pub fn resolve(spec: &BannerSpec, catalog: &Catalog) -> GachaResult<Self> {
        let rates = spec.tier_rates.clone().unwrap_or_default();
        let mut banner = Self::new(&spec.name, rates, spec.cutoff)
            .with_rate_up_split(spec.rate_up_split.unwrap_or_else(default_split));
        for name in &spec.rate_ups {
            let operator = catalog.operator(name).ok_or_else(|| {
                GachaError::InvalidBannerConfig(format!(
                    "rate-up \"{name}\" of banner \"{}\" is not in the catalog",
                    spec.name
                ))
            })?;
            banner = banner.with_rate_up(operator.clone())?;
        }
        Ok(banner)
    }

    /// The default banner: default rates, no rate-ups, every released operator.
    pub fn standard(catalog: &Catalog) -> Self {
        let cutoff = catalog.latest_release().unwrap_or(NaiveDate::MAX);
        Self::new(STANDARD_BANNER, TierRates::default(), cutoff)
    }

    /// Banner name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base tier rates.
    pub fn tier_rates(&self) -> &TierRates {
        &self.tier_rates
    }

    /// Share of a rate-up tier given to the featured operators.
    pub fn rate_up_split(&self) -> Weight {
        self.rate_up_split
    }

    /// Availability cutoff.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Featured operators of one tier.
    pub fn rate_ups(&self, rarity: Rarity) -> &[Operator] {
        self.rate_ups.get(&rarity).map_or(&[], Vec::as_slice)
    }

    /// All featured operators, top tier first.
    pub fn all_rate_ups(&self) -> Vec<&Operator> {
        self.rate_ups.values().rev().flatten().collect()
    }
}

fn default_split() -> Weight {
    Weight::from_basis_points(DEFAULT_RATE_UP_SPLIT * 100).unwrap_or_default()
}
