//! Gacha simulation for Exusiai.
//!
//! Loads an operator catalog, resolves banners with tier rates and rate-ups,
//! and draws through a [`exu_tree::ProbabilityTree`] built per banner.
//! Batches can carry a guarantee that forces the last draw to a minimum
//! rarity; the forced weights are undone before the batch returns.

pub mod banner;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod operator;
pub mod pool;
pub mod rarity;
pub mod session;

pub use banner::{Banner, STANDARD_BANNER, TierRates};
pub use catalog::{BannerSpec, Catalog};
pub use config::{BannerLookup, GachaConfig, PityPolicy};
pub use engine::{Batch, BannerOutcome, DrawPool, GachaEngine, Pull, build_tree};
pub use error::{GachaError, GachaResult};
pub use operator::Operator;
pub use pool::ItemPools;
pub use rarity::{Channel, Rarity};
pub use session::SessionRegistry;
