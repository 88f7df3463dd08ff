//! Rarity tiers and acquisition channels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GachaError, GachaResult};

/// A star rating from 1★ to 6★.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rarity(u8);

impl Rarity {
    /// 3★, the lowest drawable tier.
    pub const THREE: Self = Self(3);
    /// 4★.
    pub const FOUR: Self = Self(4);
    /// 5★, the default guarantee threshold.
    pub const FIVE: Self = Self(5);
    /// 6★, the top tier.
    pub const SIX: Self = Self(6);

    /// Validate a star count.
    pub fn new(stars: u8) -> GachaResult<Self> {
        if (1..=6).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(GachaError::InvalidRarity(stars))
        }
    }

    /// The star count.
    pub fn stars(self) -> u8 {
        self.0
    }

    /// Tiers that headhunting can produce, top tier first.
    pub fn drawable() -> [Self; 4] {
        [Self::SIX, Self::FIVE, Self::FOUR, Self::THREE]
    }

    /// True for 3★ to 6★.
    pub fn is_drawable(self) -> bool {
        (Self::THREE..=Self::SIX).contains(&self)
    }

    /// Label used for this tier's node in the draw tree.
    pub fn label(self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<u8> for Rarity {
    type Error = GachaError;

    fn try_from(stars: u8) -> GachaResult<Self> {
        Self::new(stars)
    }
}

impl From<Rarity> for u8 {
    fn from(rarity: Rarity) -> Self {
        rarity.0
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}★", self.0)
    }
}

/// How an operator is obtained. Only [`Channel::Standard`] operators enter
/// the regular headhunting pools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    /// Regular headhunting.
    Standard,
    /// Limited-time headhunting only.
    Limited,
    /// Recruitment.
    Recruitment,
    /// Event rewards.
    Event,
    /// Anything else (story rewards, shop, ...).
    Other(String),
}

impl Channel {
    /// Parse a channel tag. Accepts English names and the wiki's tags.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "standard" | "标准寻访" => Self::Standard,
            "limited" | "限定寻访" => Self::Limited,
            "recruitment" | "公开招募" => Self::Recruitment,
            "event" | "活动获得" => Self::Event,
            _ => Self::Other(tag.trim().to_string()),
        }
    }
}

impl From<String> for Channel {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.to_string()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Limited => write!(f, "limited"),
            Self::Recruitment => write!(f, "recruitment"),
            Self::Event => write!(f, "event"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_range() {
        assert!(Rarity::new(0).is_err());
        assert!(Rarity::new(7).is_err());
        assert_eq!(Rarity::new(6).unwrap(), Rarity::SIX);
        assert!(!Rarity::new(2).unwrap().is_drawable());
        assert!(Rarity::FIVE.is_drawable());
    }

    #[test]
    fn rarity_ordering_and_display() {
        assert!(Rarity::SIX > Rarity::FIVE);
        assert_eq!(Rarity::drawable()[0], Rarity::SIX);
        assert_eq!(Rarity::FIVE.to_string(), "5★");
        assert_eq!(Rarity::FIVE.label(), "5");
    }

    #[test]
    fn channel_parse() {
        assert_eq!(Channel::parse("Standard"), Channel::Standard);
        assert_eq!(Channel::parse("标准寻访"), Channel::Standard);
        assert_eq!(Channel::parse("限定寻访"), Channel::Limited);
        assert_eq!(Channel::parse("main story"), Channel::Other("main story".into()));
        assert_eq!(Channel::Event.to_string(), "event");
    }
}
