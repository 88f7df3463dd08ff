//! The gacha engine: banner state, draw tree, and batch draws.
//!
//! An engine owns everything a session mutates: the active banner, its pools,
//! the draw tree and the RNG. Draw methods take `&mut self`, so the
//! override, draw, reset sequence of a guaranteed batch cannot interleave
//! with another caller's draws on the same engine.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use exu_tree::{ProbabilityTree, TreeError, Weight, WeightOverride, normalize};

use crate::banner::{Banner, TierRates};
use crate::catalog::Catalog;
use crate::config::{BannerLookup, GachaConfig, PityPolicy};
use crate::error::{GachaError, GachaResult};
use crate::operator::Operator;
use crate::pool::ItemPools;
use crate::rarity::Rarity;

/// Label of the featured branch under a rate-up tier.
pub const RATE_UP_LABEL: &str = "rate_up";
/// Label of the regular branch under a rate-up tier.
pub const STANDARD_LABEL: &str = "standard";

/// Leaf payload: the operators a leaf picks from uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPool {
    /// Tier of every item in the pool.
    pub rarity: Rarity,
    /// True for a featured list.
    pub rate_up: bool,
    /// Candidates; never empty in a built tree.
    pub items: Vec<Operator>,
}

/// One drawn operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Pull {
    /// Snapshot of the drawn operator.
    pub operator: Operator,
    /// Whether it came from a rate-up list.
    pub rate_up: bool,
    /// Whether it was the guarantee's forced draw.
    pub forced: bool,
}

impl Pull {
    /// Rarity of the drawn operator.
    pub fn rarity(&self) -> Rarity {
        self.operator.rarity
    }
}

/// The result of one batch, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// The draws.
    pub pulls: Vec<Pull>,
    /// True when the last draw was forced by the guarantee.
    pub guarantee_triggered: bool,
}

impl Batch {
    /// Number of draws.
    pub fn len(&self) -> usize {
        self.pulls.len()
    }

    /// True for a zero-size batch.
    pub fn is_empty(&self) -> bool {
        self.pulls.is_empty()
    }

    /// Iterate the draws in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pull> {
        self.pulls.iter()
    }

    /// Highest rarity drawn.
    pub fn best(&self) -> Option<Rarity> {
        self.pulls.iter().map(Pull::rarity).max()
    }

    /// Number of draws of one rarity.
    pub fn count(&self, rarity: Rarity) -> usize {
        self.pulls.iter().filter(|p| p.rarity() == rarity).count()
    }
}

/// What a banner switch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerOutcome {
    /// The named banner is now active.
    Applied,
    /// The name was unknown; the standard banner is now active.
    UsedDefault,
    /// The name was unknown; nothing changed.
    NotFound,
}

/// Build the draw tree for a banner.
///
/// Tiers with nothing to draw are dropped and the remaining rates rescaled.
/// Returns the rates actually in the tree alongside it.
pub fn build_tree(
    banner: &Banner,
    pools: &ItemPools,
) -> GachaResult<(TierRates, ProbabilityTree<DrawPool>)> {
    let excluded: Vec<Rarity> = banner
        .tier_rates()
        .tiers()
        .into_iter()
        .filter(|r| pools.is_tier_empty(*r))
        .collect();
    for rarity in &excluded {
        log::warn!(
            "banner \"{}\": {rarity} pool is empty, tier excluded",
            banner.name()
        );
    }
    let rates = banner.tier_rates().without(&excluded).map_err(|_| {
        GachaError::EmptyPool(format!("banner \"{}\" has nothing to draw", banner.name()))
    })?;

    let mut tree = ProbabilityTree::new();
    let root = tree.root();
    for &(rarity, weight) in rates.iter() {
        let featured = pools.rate_ups(rarity);
        let standard = pools.standard(rarity);
        if featured.is_empty() {
            tree.add_child(root, rarity.label(), weight, Some(leaf(rarity, false, standard)))?;
        } else if standard.is_empty() {
            log::debug!("{rarity} has only rate-ups, collapsing");
            tree.add_child(root, rarity.label(), weight, Some(leaf(rarity, true, featured)))?;
        } else {
            let tier = tree.add_child(root, rarity.label(), weight, None)?;
            let split = banner.rate_up_split();
            tree.add_child(tier, RATE_UP_LABEL, split, Some(leaf(rarity, true, featured)))?;
            tree.add_child(
                tier,
                STANDARD_LABEL,
                split.complement(),
                Some(leaf(rarity, false, standard)),
            )?;
        }
    }
    tree.validate()?;
    Ok((rates, tree))
}

fn leaf(rarity: Rarity, rate_up: bool, items: &[Operator]) -> DrawPool {
    DrawPool {
        rarity,
        rate_up,
        items: items.to_vec(),
    }
}

/// A gacha session: active banner, draw tree and RNG.
#[derive(Debug)]
pub struct GachaEngine {
    catalog: Arc<Catalog>,
    config: GachaConfig,
    banner: Banner,
    pools: ItemPools,
    active_rates: TierRates,
    tree: ProbabilityTree<DrawPool>,
    rng: StdRng,
}

impl GachaEngine {
    /// Create an engine on the standard banner.
    pub fn new(catalog: Arc<Catalog>, config: GachaConfig) -> GachaResult<Self> {
        let banner = Banner::standard(&catalog);
        Self::from_banner(catalog, banner, config)
    }

    /// Create an engine on a given banner.
    pub fn from_banner(
        catalog: Arc<Catalog>,
        banner: Banner,
        config: GachaConfig,
    ) -> GachaResult<Self> {
        let pools = ItemPools::build(&catalog, &banner);
        let (active_rates, tree) = build_tree(&banner, &pools)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            catalog,
            config,
            banner,
            pools,
            active_rates,
            tree,
            rng,
        })
    }

    /// Switch banner using the configured lookup mode.
    pub fn set_banner(&mut self, name: &str) -> GachaResult<BannerOutcome> {
        self.set_banner_with(name, self.config.banner_lookup)
    }

    /// Switch banner by name.
    ///
    /// The new tree is built before anything is replaced, so on error or on
    /// [`BannerOutcome::NotFound`] the previous banner stays active.
    pub fn set_banner_with(
        &mut self,
        name: &str,
        lookup: BannerLookup,
    ) -> GachaResult<BannerOutcome> {
        let catalog = Arc::clone(&self.catalog);
        if let Some(spec) = catalog.find_banner(name) {
            self.apply_banner(Banner::resolve(spec, &catalog)?)?;
            return Ok(BannerOutcome::Applied);
        }
        match lookup {
            BannerLookup::Fallback => {
                log::warn!("banner \"{name}\" not found, using the standard banner");
                self.apply_banner(Banner::standard(&catalog))?;
                Ok(BannerOutcome::UsedDefault)
            }
            BannerLookup::Strict => {
                log::warn!(
                    "banner \"{name}\" not found, keeping \"{}\"",
                    self.banner.name()
                );
                Ok(BannerOutcome::NotFound)
            }
        }
    }

    /// Make `banner` active, replacing pools and tree together.
    pub fn apply_banner(&mut self, banner: Banner) -> GachaResult<()> {
        let pools = ItemPools::build(&self.catalog, &banner);
        let (active_rates, tree) = build_tree(&banner, &pools)?;
        log::info!("banner set to \"{}\"", banner.name());
        self.banner = banner;
        self.pools = pools;
        self.active_rates = active_rates;
        self.tree = tree;
        Ok(())
    }

    /// Draw a single operator.
    pub fn draw_one(&mut self) -> GachaResult<Pull> {
        self.draw(false)
    }

    /// Draw `size` operators.
    ///
    /// With `guarantee` on, the last draw is forced to the guarantee
    /// threshold or above unless an earlier draw already reached it. The
    /// root weights are restored before returning either way.
    pub fn draw_batch(&mut self, size: usize, guarantee: bool) -> GachaResult<Batch> {
        let mut batch = Batch::default();
        if size == 0 {
            return Ok(batch);
        }
        let normal = if guarantee { size - 1 } else { size };
        for _ in 0..normal {
            batch.pulls.push(self.draw(false)?);
        }
        if guarantee {
            let threshold = self.config.guarantee_threshold;
            if batch.pulls.iter().any(|p| p.rarity() >= threshold) {
                batch.pulls.push(self.draw(false)?);
            } else {
                batch.pulls.push(self.forced_draw()?);
                batch.guarantee_triggered = true;
            }
        }
        Ok(batch)
    }

    /// Draw one batch as configured (`batch_size`, `guarantee`).
    pub fn pull_ten(&mut self) -> GachaResult<Batch> {
        self.draw_batch(self.config.batch_size, self.config.guarantee)
    }

    /// Root weights used for the forced draw, by tier label.
    pub fn guarantee_weights(&self) -> GachaResult<Vec<(String, Weight)>> {
        let threshold = self.config.guarantee_threshold;
        let eligible: Vec<(Rarity, Weight)> = self
            .active_rates
            .iter()
            .filter(|(r, _)| *r >= threshold)
            .copied()
            .collect();
        let Some(&(absorber, _)) = eligible.iter().min_by_key(|(r, _)| *r) else {
            return Err(GachaError::EmptyPool(format!(
                "no tier at or above {threshold} in banner \"{}\"",
                self.banner.name()
            )));
        };

        let mut forced: Vec<(Rarity, Weight)> = Vec::with_capacity(eligible.len());
        match self.config.pity_policy {
            PityPolicy::HoldTopRate => {
                let above = Weight::total(
                    eligible
                        .iter()
                        .filter(|(r, _)| *r != absorber)
                        .map(|(_, w)| w),
                );
                let rest = u64::from(Weight::SCALE).saturating_sub(above);
                for &(rarity, weight) in &eligible {
                    if rarity == absorber {
                        let bp = u32::try_from(rest).unwrap_or(Weight::SCALE);
                        forced.push((rarity, Weight::from_basis_points(bp)?));
                    } else {
                        forced.push((rarity, weight));
                    }
                }
            }
            PityPolicy::Proportional => {
                let weights: Vec<Weight> = eligible.iter().map(|(_, w)| *w).collect();
                if weights.iter().all(|w| w.is_zero()) {
                    for &(rarity, _) in &eligible {
                        let weight = if rarity == absorber { Weight::ONE } else { Weight::ZERO };
                        forced.push((rarity, weight));
                    }
                } else {
                    let scaled = normalize(&weights)?;
                    forced.extend(eligible.iter().map(|(r, _)| *r).zip(scaled));
                }
            }
        }

        Ok(self
            .active_rates
            .iter()
            .map(|(rarity, _)| {
                let weight = forced
                    .iter()
                    .find(|(r, _)| r == rarity)
                    .map_or(Weight::ZERO, |(_, w)| *w);
                (rarity.label(), weight)
            })
            .collect())
    }

    fn forced_draw(&mut self) -> GachaResult<Pull> {
        let weights = self.guarantee_weights()?;
        let root = self.tree.root();
        log::debug!("guarantee triggered, forcing root weights {weights:?}");
        self.tree
            .override_child_weights(root, WeightOverride::by_label(weights))?;
        let pull = self.draw(true);
        self.tree.reset_children(root)?;
        pull
    }

    fn draw(&mut self, forced: bool) -> GachaResult<Pull> {
        let leaf = self.tree.sample_recursive(self.tree.root(), &mut self.rng)?;
        let node = self.tree.node(leaf)?;
        let pool = node
            .payload()
            .ok_or_else(|| TreeError::MissingPayload(node.label().to_string()))?;
        if pool.items.is_empty() {
            return Err(GachaError::EmptyPool(format!("{} pool", pool.rarity)));
        }
        let pick = self.rng.random_range(0..pool.items.len());
        let operator = pool.items[pick].clone();
        log::debug!("drew {} ({})", operator.name, operator.rarity);
        Ok(Pull {
            operator,
            rate_up: pool.rate_up,
            forced,
        })
    }

    /// The active banner.
    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    /// Featured operators of the active banner, top tier first.
    pub fn rate_ups(&self) -> Vec<&Operator> {
        self.banner.all_rate_ups()
    }

    /// Tier rates actually in the tree (after empty tiers are dropped).
    pub fn tier_rates(&self) -> &TierRates {
        &self.active_rates
    }

    /// The active draw tree.
    pub fn tree(&self) -> &ProbabilityTree<DrawPool> {
        &self.tree
    }

    /// The active banner's pools.
    pub fn pools(&self) -> &ItemPools {
        &self.pools
    }

    /// The catalog this engine draws from.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Engine configuration.
    pub fn config(&self) -> &GachaConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::rarity::Channel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bundled() -> Arc<Catalog> {
        Arc::new(Catalog::bundled().unwrap())
    }

    fn seeded() -> GachaConfig {
        GachaConfig::default().with_seed(42)
    }

    fn rates(bp: [u32; 4]) -> TierRates {
        TierRates::new(
            Rarity::drawable()
                .into_iter()
                .zip(bp)
                .map(|(r, b)| (r, Weight::from_basis_points(b).unwrap())),
        )
        .unwrap()
    }

    fn root_weights(engine: &GachaEngine) -> Vec<u32> {
        let tree = engine.tree();
        tree.child_weights(tree.root())
            .unwrap()
            .into_iter()
            .map(Weight::basis_points)
            .collect()
    }

    fn root_labels(engine: &GachaEngine) -> Vec<String> {
        let tree = engine.tree();
        let root = tree.node(tree.root()).unwrap();
        root.children()
            .iter()
            .map(|c| tree.node(*c).unwrap().label().to_string())
            .collect()
    }

    fn op(name: &str, stars: u8) -> Operator {
        Operator::new(
            name,
            Rarity::new(stars).unwrap(),
            "Guard",
            date(2019, 4, 30),
            Channel::Standard,
        )
    }

    #[test]
    fn standard_banner_tree_is_valid() {
        let engine = GachaEngine::new(bundled(), seeded()).unwrap();
        engine.tree().validate().unwrap();
        assert_eq!(root_labels(&engine), vec!["6", "5", "4", "3"]);
        assert_eq!(root_weights(&engine), vec![200, 800, 5000, 4000]);
        assert!(engine.rate_ups().is_empty());
    }

    #[test]
    fn rate_up_tier_gets_two_branches() {
        let mut engine = GachaEngine::new(bundled(), seeded()).unwrap();
        assert_eq!(
            engine.set_banner("Spring Festival").unwrap(),
            BannerOutcome::Applied
        );
        let tree = engine.tree();
        let six = tree.child_by_label(tree.root(), "6").unwrap();
        let up = tree.child_by_label(six, RATE_UP_LABEL).unwrap();
        let standard = tree.child_by_label(six, STANDARD_LABEL).unwrap();
        assert_eq!(tree.weight(up).unwrap().basis_points(), 7000);
        assert_eq!(tree.weight(standard).unwrap().basis_points(), 3000);
        assert!(tree.payload(up).unwrap().rate_up);
        assert!(engine.rate_ups().iter().any(|op| op.name == "Nian"));
    }

    #[test]
    fn guarantee_forces_a_high_tier_on_a_zero_rate_banner() {
        let banner = Banner::new("No luck", rates([0, 0, 5000, 5000]), date(2020, 12, 31));
        let mut engine = GachaEngine::from_banner(bundled(), banner, seeded()).unwrap();
        let before = root_weights(&engine);
        for _ in 0..20 {
            let batch = engine.draw_batch(10, true).unwrap();
            assert_eq!(batch.len(), 10);
            assert!(batch.guarantee_triggered);
            let last = batch.pulls.last().unwrap();
            assert!(last.forced);
            assert!(last.rarity() >= Rarity::FIVE);
            assert!(batch.pulls[..9].iter().all(|p| !p.forced));
            assert_eq!(root_weights(&engine), before);
        }
        engine.tree().validate().unwrap();
    }

    #[test]
    fn guarantee_not_needed_when_already_met() {
        let banner = Banner::new("Lucky", rates([10_000, 0, 0, 0]), date(2020, 12, 31));
        let mut engine = GachaEngine::from_banner(bundled(), banner, seeded()).unwrap();
        let batch = engine.draw_batch(10, true).unwrap();
        assert_eq!(batch.len(), 10);
        assert!(!batch.guarantee_triggered);
        assert!(batch.iter().all(|p| !p.forced && p.rarity() == Rarity::SIX));
    }

    #[test]
    fn batches_without_guarantee_are_exact_and_unforced() {
        let mut engine = GachaEngine::new(bundled(), seeded()).unwrap();
        for size in [0, 1, 7, 10, 25] {
            let batch = engine.draw_batch(size, false).unwrap();
            assert_eq!(batch.len(), size);
            assert!(!batch.guarantee_triggered);
            assert!(batch.iter().all(|p| !p.forced));
        }
    }

    #[test]
    fn single_draw_batch_with_guarantee_is_forced() {
        let banner = Banner::new("No luck", rates([0, 0, 5000, 5000]), date(2020, 12, 31));
        let mut engine = GachaEngine::from_banner(bundled(), banner, seeded()).unwrap();
        let batch = engine.draw_batch(1, true).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.pulls[0].forced);
    }

    #[test]
    fn pull_ten_follows_config() {
        let config = seeded().with_batch_size(5).with_guarantee(true);
        let banner = Banner::new("No luck", rates([0, 0, 5000, 5000]), date(2020, 12, 31));
        let mut engine = GachaEngine::from_banner(bundled(), banner, config).unwrap();
        let batch = engine.pull_ten().unwrap();
        assert_eq!(batch.len(), 5);
        assert!(batch.guarantee_triggered);
    }

    #[test]
    fn hold_top_rate_weights() {
        let engine = GachaEngine::new(bundled(), seeded()).unwrap();
        let weights: Vec<(String, u32)> = engine
            .guarantee_weights()
            .unwrap()
            .into_iter()
            .map(|(l, w)| (l, w.basis_points()))
            .collect();
        assert_eq!(
            weights,
            vec![
                ("6".to_string(), 200),
                ("5".to_string(), 9800),
                ("4".to_string(), 0),
                ("3".to_string(), 0),
            ]
        );
    }

    #[test]
    fn proportional_weights() {
        let config = seeded().with_pity_policy(PityPolicy::Proportional);
        let engine = GachaEngine::new(bundled(), config).unwrap();
        let weights: Vec<u32> = engine
            .guarantee_weights()
            .unwrap()
            .into_iter()
            .map(|(_, w)| w.basis_points())
            .collect();
        assert_eq!(weights, vec![2000, 8000, 0, 0]);
    }

    #[test]
    fn proportional_with_zero_rates_goes_to_threshold_tier() {
        let config = seeded().with_pity_policy(PityPolicy::Proportional);
        let banner = Banner::new("No luck", rates([0, 0, 5000, 5000]), date(2020, 12, 31));
        let engine = GachaEngine::from_banner(bundled(), banner, config).unwrap();
        let weights: Vec<u32> = engine
            .guarantee_weights()
            .unwrap()
            .into_iter()
            .map(|(_, w)| w.basis_points())
            .collect();
        assert_eq!(weights, vec![0, 10_000, 0, 0]);
    }

    #[test]
    fn unknown_banner_falls_back_to_standard() {
        let mut engine = GachaEngine::new(bundled(), seeded()).unwrap();
        engine.set_banner("Spring Festival").unwrap();
        let outcome = engine.set_banner("nonexistent").unwrap();
        assert_eq!(outcome, BannerOutcome::UsedDefault);
        assert_eq!(engine.banner().name(), crate::banner::STANDARD_BANNER);
        engine.tree().validate().unwrap();
    }

    #[test]
    fn unknown_banner_in_strict_mode_changes_nothing() {
        let mut engine = GachaEngine::new(bundled(), seeded()).unwrap();
        engine.set_banner("Spring Festival").unwrap();
        let labels = root_labels(&engine);
        let weights = root_weights(&engine);
        let outcome = engine
            .set_banner_with("nonexistent", BannerLookup::Strict)
            .unwrap();
        assert_eq!(outcome, BannerOutcome::NotFound);
        assert_eq!(engine.banner().name(), "Spring Festival");
        assert_eq!(root_labels(&engine), labels);
        assert_eq!(root_weights(&engine), weights);
    }

    #[test]
    fn standard_branch_never_yields_a_rate_up() {
        let catalog = bundled();
        for spec in catalog.banners() {
            let mut engine = GachaEngine::new(Arc::clone(&catalog), seeded()).unwrap();
            engine.set_banner(&spec.name).unwrap();
            let featured: Vec<String> =
                engine.rate_ups().iter().map(|op| op.name.clone()).collect();
            let tree = engine.tree();
            for leaf in tree.leaves() {
                let pool = tree.payload(leaf).unwrap();
                if !pool.rate_up {
                    assert!(pool.items.iter().all(|op| !featured.contains(&op.name)));
                }
            }
            let batch = engine.draw_batch(200, false).unwrap();
            for pull in batch.iter().filter(|p| !p.rate_up) {
                assert!(!featured.contains(&pull.operator.name));
            }
        }
    }

    #[test]
    fn empty_tiers_are_dropped_and_rates_rescaled() {
        let catalog = Catalog::new(vec![op("Fang", 3), op("Gravel", 4)], Vec::new()).unwrap();
        let engine = GachaEngine::new(Arc::new(catalog), seeded()).unwrap();
        assert_eq!(root_labels(&engine), vec!["4", "3"]);
        assert_eq!(root_weights(&engine), vec![5556, 4444]);
        assert!(matches!(
            engine.guarantee_weights(),
            Err(GachaError::EmptyPool(_))
        ));
    }

    #[test]
    fn empty_catalog_is_an_empty_pool() {
        let err = GachaEngine::new(Arc::new(Catalog::default()), seeded()).unwrap_err();
        assert!(matches!(err, GachaError::EmptyPool(_)));
    }

    #[test]
    fn rate_up_tier_without_standard_pool_collapses() {
        let catalog = Catalog::new(
            vec![op("Exusiai", 6), op("Texas", 5), op("Gravel", 4), op("Fang", 3)],
            Vec::new(),
        )
        .unwrap();
        let banner = Banner::new("Solo", TierRates::default(), date(2019, 4, 30))
            .with_rate_up(op("Exusiai", 6))
            .unwrap();
        let engine = GachaEngine::from_banner(Arc::new(catalog), banner, seeded()).unwrap();
        let tree = engine.tree();
        let six = tree.child_by_label(tree.root(), "6").unwrap();
        assert!(tree.node(six).unwrap().is_leaf());
        let pool = tree.payload(six).unwrap();
        assert!(pool.rate_up);
        assert_eq!(pool.items.len(), 1);
    }

    #[test]
    fn same_seed_same_draws() {
        let names = |engine: &mut GachaEngine| -> Vec<String> {
            engine
                .draw_batch(30, false)
                .unwrap()
                .pulls
                .into_iter()
                .map(|p| p.operator.name)
                .collect()
        };
        let mut a = GachaEngine::new(bundled(), seeded()).unwrap();
        let mut b = GachaEngine::new(bundled(), seeded()).unwrap();
        assert_eq!(names(&mut a), names(&mut b));
    }

    #[test]
    fn failed_banner_build_keeps_previous_banner() {
        let mut engine = GachaEngine::new(bundled(), seeded()).unwrap();
        let dead = Banner::new("Dead", rates([10_000, 0, 0, 0]), date(2000, 1, 1));
        assert!(engine.apply_banner(dead).is_err());
        assert_eq!(engine.banner().name(), crate::banner::STANDARD_BANNER);
        engine.tree().validate().unwrap();
    }
}
