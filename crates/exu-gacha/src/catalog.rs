//! Operator and banner catalog.
//!
//! The catalog is the only input the engine needs from the outside: a list
//! of operators and a list of named banners. It is read from JSON; a small
//! sample catalog is bundled for the CLI and tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use exu_tree::Weight;

use crate::banner::TierRates;
use crate::error::{GachaError, GachaResult};
use crate::operator::{Operator, compact_date};

const BUNDLED: &str = include_str!("../assets/catalog.json");

/// A named banner as listed in the catalog, before rate-ups are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerSpec {
    /// Banner name.
    pub name: String,
    /// Operators released after this date are not in the pools.
    #[serde(with = "compact_date", alias = "time")]
    pub cutoff: NaiveDate,
    /// Names of the featured operators.
    #[serde(default, alias = "rateups")]
    pub rate_ups: Vec<String>,
    /// Share of a rate-up tier that goes to the featured operators (default 0.5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_up_split: Option<Weight>,
    /// Base tier rates (default 6★ 2%, 5★ 8%, 4★ 50%, 3★ 40%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_rates: Option<TierRates>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogData {
    operators: Vec<Operator>,
    #[serde(default)]
    banners: Vec<BannerSpec>,
}

/// Operators and banners, indexed by name (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operators: Vec<Operator>,
    banners: Vec<BannerSpec>,
    by_name: HashMap<String, usize>,
    banner_by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate operator or banner names.
    pub fn new(operators: Vec<Operator>, banners: Vec<BannerSpec>) -> GachaResult<Self> {
        let mut by_name = HashMap::new();
        for (i, op) in operators.iter().enumerate() {
            if by_name.insert(op.name.trim().to_lowercase(), i).is_some() {
                return Err(GachaError::InvalidCatalog(format!(
                    "duplicate operator \"{}\"",
                    op.name
                )));
            }
        }
        let mut banner_by_name = HashMap::new();
        for (i, spec) in banners.iter().enumerate() {
            if banner_by_name.insert(spec.name.trim().to_lowercase(), i).is_some() {
                return Err(GachaError::InvalidCatalog(format!(
                    "duplicate banner \"{}\"",
                    spec.name
                )));
            }
        }
        Ok(Self {
            operators,
            banners,
            by_name,
            banner_by_name,
        })
    }

    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> GachaResult<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data.operators, data.banners)
    }

    /// Read a catalog from a JSON file.
    pub fn load(path: &Path) -> GachaResult<Self> {
        let json = fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        log::info!(
            "loaded {} operators and {} banners from {}",
            catalog.operators.len(),
            catalog.banners.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The sample catalog compiled into the crate.
    pub fn bundled() -> GachaResult<Self> {
        Self::from_json(BUNDLED)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json(&self) -> GachaResult<String> {
        let data = CatalogData {
            operators: self.operators.clone(),
            banners: self.banners.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// All operators in catalog order.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// All banners in catalog order.
    pub fn banners(&self) -> &[BannerSpec] {
        &self.banners
    }

    /// Find an operator by name (case-insensitive, surrounding spaces ignored).
    pub fn operator(&self, name: &str) -> Option<&Operator> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|i| &self.operators[*i])
    }

    /// Find a banner by name (case-insensitive, surrounding spaces ignored).
    pub fn find_banner(&self, name: &str) -> Option<&BannerSpec> {
        self.banner_by_name
            .get(&name.trim().to_lowercase())
            .map(|i| &self.banners[*i])
    }

    /// Find a banner by name, failing with [`GachaError::BannerNotFound`].
    pub fn banner(&self, name: &str) -> GachaResult<&BannerSpec> {
        self.find_banner(name)
            .ok_or_else(|| GachaError::BannerNotFound(name.to_string()))
    }

    /// The most recent release date, used as the standard banner's cutoff.
    pub fn latest_release(&self) -> Option<NaiveDate> {
        self.operators.iter().map(|op| op.release).max()
    }
}
