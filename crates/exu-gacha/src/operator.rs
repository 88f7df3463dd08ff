//! Drawable item records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rarity::{Channel, Rarity};

/// A drawable operator. Pulls hand out clones, so a drawn operator is a
/// snapshot unaffected by later banner switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Display name, unique within a catalog.
    pub name: String,
    /// Star rating.
    pub rarity: Rarity,
    /// Class, e.g. "Sniper".
    #[serde(default)]
    pub class: String,
    /// Release date; operators released after a banner's cutoff are excluded.
    #[serde(with = "compact_date")]
    pub release: NaiveDate,
    /// How the operator is obtained.
    pub channel: Channel,
}

impl Operator {
    /// Build an operator record.
    pub fn new(
        name: impl Into<String>,
        rarity: Rarity,
        class: impl Into<String>,
        release: NaiveDate,
        channel: Channel,
    ) -> Self {
        Self {
            name: name.into(),
            rarity,
            class: class.into(),
            release,
            channel,
        }
    }
}

/// Dates serialized as `YYYYMMDD`, the format of the scraped catalog.
pub(crate) mod compact_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y%m%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}
