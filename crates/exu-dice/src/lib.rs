//! Dice codes for Exusiai.
//!
//! Parses codes of the form `[R#]TdS[*M][+-B]`, rolls them with any
//! [`rand::Rng`], and renders each repeat as a single line such as
//! `(3+5)*2+1=17`. [`daily_luck`] gives each user one stable 0 to 100
//! value per day.

pub mod code;
pub mod config;
pub mod error;
pub mod luck;
pub mod roll;

pub use code::DiceCode;
pub use config::DiceConfig;
pub use error::{DiceError, DiceResult};
pub use luck::daily_luck;
pub use roll::{DiceRoll, RepeatRoll};
