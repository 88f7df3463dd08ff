use chrono::{NaiveDate, Utc};
use colored::Colorize;

use exu_dice::daily_luck;

pub fn run(user: &str, date: Option<NaiveDate>) -> Result<(), String> {
    let user = user.trim();
    if user.is_empty() {
        return Err("user name must not be empty".to_string());
    }
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let luck = daily_luck(user, date);

    let value = match luck {
        90..=100 => luck.to_string().green().bold(),
        0..=10 => luck.to_string().red(),
        _ => luck.to_string().normal(),
    };
    println!("  {} luck on {date}: {value}", user.bold());
    Ok(())
}
