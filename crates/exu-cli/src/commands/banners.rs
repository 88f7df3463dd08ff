use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use exu_gacha::Banner;

pub fn run(catalog: Option<&Path>) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;

    if catalog.banners().is_empty() {
        println!("  No banners found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Cutoff", "Rate-up split", "Rate-ups"]);

    for spec in catalog.banners() {
        let banner = Banner::resolve(spec, &catalog).map_err(|e| e.to_string())?;
        let rate_ups = banner
            .all_rate_ups()
            .iter()
            .map(|op| format!("{} ({})", op.name, op.rarity))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            banner.name().to_string(),
            banner.cutoff().format("%Y-%m-%d").to_string(),
            super::percent(banner.rate_up_split()),
            if rate_ups.is_empty() { "—".to_string() } else { rate_ups },
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} banners", catalog.banners().len());
    Ok(())
}
