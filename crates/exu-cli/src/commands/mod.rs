pub mod banners;
pub mod luck;
pub mod pull;
pub mod rates;
pub mod roll;

use std::path::Path;
use std::sync::Arc;

use colored::{ColoredString, Colorize};

use exu_gacha::{Catalog, Rarity};

/// Load a catalog file, or the bundled catalog when no path is given.
fn load_catalog(path: Option<&Path>) -> Result<Arc<Catalog>, String> {
    let catalog = match path {
        Some(path) => Catalog::load(path)
            .map_err(|e| format!("cannot load catalog '{}': {e}", path.display()))?,
        None => Catalog::bundled().map_err(|e| format!("bundled catalog is broken: {e}"))?,
    };
    Ok(Arc::new(catalog))
}

/// Star label colored by tier.
fn stars(rarity: Rarity) -> ColoredString {
    let label = rarity.to_string();
    match rarity.stars() {
        6 => label.yellow().bold(),
        5 => label.yellow(),
        4 => label.magenta(),
        _ => label.normal(),
    }
}

/// Percentage with two decimals, e.g. `2.00%`.
fn percent(weight: exu_tree::Weight) -> String {
    format!("{:.2}%", weight.as_f64() * 100.0)
}
