//! Daily luck: one stable value per user per day.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Luck of `user` on `date`, in `0..=100`.
///
/// The RNG is seeded from a SHA-256 of the user name and the ISO week date,
/// so asking twice on the same day gives the same answer.
pub fn daily_luck(user: &str, date: NaiveDate) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(user.as_bytes());
    hasher.update(date.format("%G-W%V-%u").to_string().as_bytes());
    let seed: [u8; 32] = hasher.finalize().into();
    let luck = StdRng::from_seed(seed).random_range(0..=100);
    log::debug!("luck of {user} on {date}: {luck}");
    luck
}
