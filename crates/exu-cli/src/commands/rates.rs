use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use exu_gacha::{BannerLookup, BannerOutcome, GachaConfig, GachaEngine, STANDARD_BANNER};

pub fn run(catalog: Option<&Path>, banner: Option<&str>) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let mut engine = GachaEngine::new(catalog, GachaConfig::default().with_seed(0))
        .map_err(|e| e.to_string())?;
    if let Some(name) = banner {
        let outcome = engine
            .set_banner_with(name, BannerLookup::Fallback)
            .map_err(|e| e.to_string())?;
        if outcome == BannerOutcome::UsedDefault {
            eprintln!(
                "  {} banner '{name}' not found, using '{STANDARD_BANNER}'",
                "warning:".yellow().bold()
            );
        }
    }

    let guarantee = engine.guarantee_weights().ok();
    let tree = engine.tree();
    let root = tree.node(tree.root()).map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Tier", "Rate", "Guaranteed draw", "Branch", "Share", "Pool"]);

    for &tier_id in root.children() {
        let tier = tree.node(tier_id).map_err(|e| e.to_string())?;
        let forced = guarantee
            .as_ref()
            .and_then(|g| g.iter().find(|(label, _)| label == tier.label()))
            .map_or_else(|| "—".to_string(), |(_, w)| super::percent(*w));
        let stars = format!("{}★", tier.label());

        if let Some(pool) = tier.payload() {
            let branch = if pool.rate_up { "rate-up only" } else { "standard" };
            table.add_row(vec![
                stars,
                super::percent(tier.weight()),
                forced,
                branch.to_string(),
                super::percent(exu_tree::Weight::ONE),
                pool.items.len().to_string(),
            ]);
            continue;
        }
        for (i, &branch_id) in tier.children().iter().enumerate() {
            let branch = tree.node(branch_id).map_err(|e| e.to_string())?;
            let size = branch.payload().map_or(0, |p| p.items.len());
            let (stars, rate, forced) = if i == 0 {
                (stars.clone(), super::percent(tier.weight()), forced.clone())
            } else {
                (String::new(), String::new(), String::new())
            };
            table.add_row(vec![
                stars,
                rate,
                forced,
                branch.label().to_string(),
                super::percent(branch.weight()),
                size.to_string(),
            ]);
        }
    }

    println!(
        "  {} '{}' {}",
        "Banner".bold(),
        engine.banner().name(),
        format!("(cutoff {})", engine.banner().cutoff().format("%Y-%m-%d")).dimmed()
    );
    println!("{table}");

    let rate_ups = engine.rate_ups();
    if !rate_ups.is_empty() {
        println!();
        println!("  {}", "Rate-ups".bold().underline());
        for op in rate_ups {
            println!("  {} {}", super::stars(op.rarity), op.name);
        }
    }
    Ok(())
}
