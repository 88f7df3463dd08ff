//! Error types for the gacha engine.

use thiserror::Error;

use exu_tree::TreeError;

/// Result type for gacha operations.
pub type GachaResult<T> = Result<T, GachaError>;

/// Errors that can occur while loading catalogs, building banners, or drawing.
#[derive(Debug, Error)]
pub enum GachaError {
    /// Tier rates do not sum to one, or a rate-up names an unknown operator.
    #[error("invalid banner config: {0}")]
    InvalidBannerConfig(String),

    /// The requested banner is not in the catalog.
    #[error("banner not found: \"{0}\"")]
    BannerNotFound(String),

    /// A tier (or every tier) has nothing to draw.
    #[error("empty pool: {0}")]
    EmptyPool(String),

    /// A star count outside 1-6.
    #[error("invalid rarity: {0}")]
    InvalidRarity(u8),

    /// The catalog itself is inconsistent.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A session lock was poisoned by a panicking holder.
    #[error("session lock poisoned")]
    LockPoisoned,

    /// Probability tree error (includes rejected redistributions).
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Catalog JSON could not be parsed.
    #[error("catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// Catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
