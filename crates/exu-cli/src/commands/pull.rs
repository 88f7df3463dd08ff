use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use exu_gacha::{
    BannerLookup, BannerOutcome, Batch, GachaConfig, GachaEngine, PityPolicy, Rarity,
    STANDARD_BANNER,
};

pub struct PullArgs<'a> {
    pub catalog: Option<&'a Path>,
    pub banner: Option<&'a str>,
    pub count: usize,
    pub size: usize,
    pub guarantee: bool,
    pub proportional: bool,
    pub strict: bool,
    pub seed: Option<u64>,
}

pub fn run(args: &PullArgs<'_>) -> Result<(), String> {
    if args.size == 0 {
        return Err("batch size must be at least 1".into());
    }
    let catalog = super::load_catalog(args.catalog)?;

    let mut config = GachaConfig::default()
        .with_batch_size(args.size)
        .with_guarantee(args.guarantee);
    if args.proportional {
        config = config.with_pity_policy(PityPolicy::Proportional);
    }
    if args.strict {
        config = config.with_banner_lookup(BannerLookup::Strict);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut engine = GachaEngine::new(catalog, config).map_err(|e| e.to_string())?;
    if let Some(name) = args.banner {
        match engine.set_banner(name).map_err(|e| e.to_string())? {
            BannerOutcome::Applied => {}
            BannerOutcome::UsedDefault => eprintln!(
                "  {} banner '{name}' not found, using '{STANDARD_BANNER}'",
                "warning:".yellow().bold()
            ),
            BannerOutcome::NotFound => return Err(format!("banner not found: '{name}'")),
        }
    }

    let seed = args
        .seed
        .map_or_else(String::new, |s| format!(" (seed={s})"));
    println!(
        "  {} on '{}'{}",
        "Headhunting".bold(),
        engine.banner().name(),
        seed.dimmed()
    );
    println!();

    let mut totals = Batch::default();
    for i in 1..=args.count {
        let batch = engine.pull_ten().map_err(|e| e.to_string())?;
        print_batch(i, &batch);
        totals.pulls.extend(batch.pulls);
    }

    if args.count > 1 {
        println!("  {}", "Total".bold().underline());
        print_summary(&totals);
    }
    Ok(())
}

fn print_batch(index: usize, batch: &Batch) {
    let mark = if batch.guarantee_triggered {
        " [guarantee]".cyan().to_string()
    } else {
        String::new()
    };
    println!("  {}{mark}", format!("Batch {index}").bold());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Operator", "Rarity", "Class", "Note"]);
    for (n, pull) in batch.iter().enumerate() {
        let note = match (pull.rate_up, pull.forced) {
            (true, true) => "rate-up, guaranteed",
            (true, false) => "rate-up",
            (false, true) => "guaranteed",
            (false, false) => "",
        };
        table.add_row(vec![
            (n + 1).to_string(),
            pull.operator.name.clone(),
            pull.rarity().to_string(),
            pull.operator.class.clone(),
            note.to_string(),
        ]);
    }
    println!("{table}");
    print_summary(batch);
}

fn print_summary(batch: &Batch) {
    let counts: Vec<String> = Rarity::drawable()
        .into_iter()
        .map(|r| format!("{} ×{}", super::stars(r), batch.count(r)))
        .collect();
    println!("  {}", counts.join("  "));
    println!();
}
