//! Per-tier item pools for one banner.

use std::collections::{BTreeMap, HashSet};

use crate::banner::Banner;
use crate::catalog::Catalog;
use crate::operator::Operator;
use crate::rarity::{Channel, Rarity};

/// Drawable operators of a banner, split by tier into standard and rate-up lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPools {
    standard: BTreeMap<Rarity, Vec<Operator>>,
    rate_ups: BTreeMap<Rarity, Vec<Operator>>,
}

impl ItemPools {
    /// Collect the pools for `banner`.
    ///
    /// A standard pool holds every regular-headhunting operator of the tier
    /// released on or before the cutoff, minus that tier's rate-ups.
    pub fn build(catalog: &Catalog, banner: &Banner) -> Self {
        let featured: HashSet<&str> = banner
            .all_rate_ups()
            .into_iter()
            .map(|op| op.name.as_str())
            .collect();

        let mut standard: BTreeMap<Rarity, Vec<Operator>> = BTreeMap::new();
        for op in catalog.operators() {
            if op.rarity.is_drawable()
                && op.channel == Channel::Standard
                && op.release <= banner.cutoff()
                && !featured.contains(op.name.as_str())
            {
                standard.entry(op.rarity).or_default().push(op.clone());
            }
        }

        let rate_ups = Rarity::drawable()
            .into_iter()
            .filter(|r| !banner.rate_ups(*r).is_empty())
            .map(|r| (r, banner.rate_ups(r).to_vec()))
            .collect();

        for rarity in Rarity::drawable() {
            log::debug!(
                "{rarity} pool: {} standard, {} rate-up",
                standard.get(&rarity).map_or(0, Vec::len),
                banner.rate_ups(rarity).len()
            );
        }
        Self { standard, rate_ups }
    }

    /// Standard operators of a tier.
    pub fn standard(&self, rarity: Rarity) -> &[Operator] {
        self.standard.get(&rarity).map_or(&[], Vec::as_slice)
    }

    /// Featured operators of a tier.
    pub fn rate_ups(&self, rarity: Rarity) -> &[Operator] {
        self.rate_ups.get(&rarity).map_or(&[], Vec::as_slice)
    }

    /// True when the tier has nothing at all to draw.
    pub fn is_tier_empty(&self, rarity: Rarity) -> bool {
        self.standard(rarity).is_empty() && self.rate_ups(rarity).is_empty()
    }

    /// Total number of drawable operators.
    pub fn len(&self) -> usize {
        self.standard.values().chain(self.rate_ups.values()).map(Vec::len).sum()
    }

    /// True when no tier has anything to draw.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::banner::TierRates;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names(ops: &[Operator]) -> Vec<&str> {
        ops.iter().map(|op| op.name.as_str()).collect()
    }

    #[test]
    fn cutoff_and_channel_filter_the_pools() {
        let catalog = Catalog::bundled().unwrap();
        let banner = Banner::new("Early", TierRates::default(), date(2019, 4, 30));
        let pools = ItemPools::build(&catalog, &banner);
        for rarity in Rarity::drawable() {
            for op in pools.standard(rarity) {
                assert!(op.release <= date(2019, 4, 30), "{} too new", op.name);
                assert_eq!(op.channel, Channel::Standard);
                assert_eq!(op.rarity, rarity);
            }
        }
        assert!(!names(pools.standard(Rarity::SIX)).contains(&"Thorns"));
        assert!(!names(pools.standard(Rarity::SIX)).contains(&"Nian"));
    }

    #[test]
    fn rate_ups_are_removed_from_standard_pools() {
        let catalog = Catalog::bundled().unwrap();
        for spec in catalog.banners() {
            let banner = Banner::resolve(spec, &catalog).unwrap();
            let pools = ItemPools::build(&catalog, &banner);
            for rarity in Rarity::drawable() {
                let standard = names(pools.standard(rarity));
                for op in pools.rate_ups(rarity) {
                    assert!(!standard.contains(&op.name.as_str()));
                }
            }
        }
    }

    #[test]
    fn building_twice_gives_the_same_pools() {
        let catalog = Catalog::bundled().unwrap();
        let banner = Banner::resolve(&catalog.banners()[0], &catalog).unwrap();
        assert_eq!(
            ItemPools::build(&catalog, &banner),
            ItemPools::build(&catalog, &banner)
        );
    }

    #[test]
    fn limited_rate_up_is_only_in_the_rate_up_list() {
        let catalog = Catalog::bundled().unwrap();
        let spec = catalog.banner("Spring Festival").unwrap();
        let banner = Banner::resolve(spec, &catalog).unwrap();
        let pools = ItemPools::build(&catalog, &banner);
        assert!(names(pools.rate_ups(Rarity::SIX)).contains(&"Nian"));
        assert!(!names(pools.standard(Rarity::SIX)).contains(&"Nian"));
    }

    #[test]
    fn empty_catalog_gives_empty_pools() {
        let catalog = Catalog::default();
        let pools = ItemPools::build(&catalog, &Banner::standard(&catalog));
        assert!(pools.is_empty());
        assert!(pools.is_tier_empty(Rarity::SIX));
    }
}
