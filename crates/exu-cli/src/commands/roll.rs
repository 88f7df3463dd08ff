use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

use exu_dice::{DiceCode, DiceConfig, DiceError};

/// Roll `code` (1d100 when absent). With two arguments the one that looks
/// like a dice code is the code and the other is the purpose.
pub fn run(code: Option<&str>, purpose: Option<&str>, seed: Option<u64>) -> Result<(), String> {
    let (code, purpose) = match (code, purpose) {
        (Some(a), Some(b)) if !DiceCode::is_valid(a) && DiceCode::is_valid(b) => (Some(b), Some(a)),
        pair => pair,
    };

    let config = DiceConfig::default();
    let dice = match code {
        Some(code) => DiceCode::parse(code, &config).map_err(|e| match e {
            DiceError::Syntax(_) => format!(
                "{e}\n  usage: [repeats#]throws(d|D)sides[(*|x|X)multiplier][(+|-)bonus], e.g. 2#3d6*2+1"
            ),
            _ if e.is_zero() => format!("{e} (nothing to roll)"),
            _ => e.to_string(),
        })?,
        None => DiceCode::default(),
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let roll = dice.roll(&mut rng);

    println!("  {}", format!("{}=", roll.headline(purpose)).bold());
    for line in roll.render(&config).lines() {
        println!("  {line}");
    }
    Ok(())
}
