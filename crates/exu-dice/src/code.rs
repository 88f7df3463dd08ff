//! Dice code parsing: `[R#]TdS[*M][+-B]`.

use std::fmt;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::config::DiceConfig;
use crate::error::{DiceError, DiceResult};
use crate::roll::{DiceRoll, RepeatRoll};

static DICE_CODE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<repeats>[0-9]+)#)?(?P<throws>[0-9]+)[dD](?P<sides>[0-9]+)(?:[*xX](?P<multiplier>[0-9]+))?(?P<bonus>[+-][0-9]+)?$",
    )
});

fn pattern() -> DiceResult<&'static Regex> {
    DICE_CODE
        .as_ref()
        .map_err(|e| DiceError::Syntax(e.to_string()))
}

/// A validated dice code.
///
/// `2#3d6*2+1` rolls three six-sided dice twice; each repeat totals
/// `sum * 2 + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceCode {
    repeats: u32,
    throws: u32,
    sides: u32,
    multiplier: Option<u32>,
    bonus: Option<i64>,
}

impl DiceCode {
    /// Parse and range-check a dice code.
    pub fn parse(code: &str, config: &DiceConfig) -> DiceResult<Self> {
        let syntax = || DiceError::Syntax(code.to_string());
        let caps = pattern()?.captures(code).ok_or_else(syntax)?;
        let number = |name: &str| caps.name(name).map(|m| saturating_number(m.as_str()));

        let repeats = number("repeats").unwrap_or(1);
        let throws = number("throws").ok_or_else(syntax)?;
        let sides = number("sides").ok_or_else(syntax)?;

        let repeats = in_range(repeats, 1, config.max_repeats).ok_or(DiceError::RepeatsOutOfRange {
            value: repeats,
            max: config.max_repeats,
        })?;
        let throws = in_range(throws, 1, config.max_throws).ok_or(DiceError::ThrowsOutOfRange {
            value: throws,
            max: config.max_throws,
        })?;
        let sides = in_range(sides, 1, config.max_sides).ok_or(DiceError::SidesOutOfRange {
            value: sides,
            max: config.max_sides,
        })?;
        let multiplier = number("multiplier")
            .map(|value| {
                in_range(value, 0, config.max_multiplier).ok_or(DiceError::MultiplierOutOfRange {
                    value,
                    max: config.max_multiplier,
                })
            })
            .transpose()?;
        let bonus = caps
            .name("bonus")
            .map(|m| {
                let (sign, digits) = m.as_str().split_at(1);
                let magnitude = saturating_number(digits);
                let value = i64::try_from(magnitude).unwrap_or(i64::MAX);
                let value = if sign == "-" { -value } else { value };
                in_range(magnitude, 0, config.max_bonus)
                    .map(|_| value)
                    .ok_or(DiceError::BonusOutOfRange {
                        value,
                        max: config.max_bonus,
                    })
            })
            .transpose()?;

        Ok(Self {
            repeats,
            throws,
            sides,
            multiplier,
            bonus,
        })
    }

    /// True when `code` is syntactically a dice code. Limits are not checked.
    pub fn is_valid(code: &str) -> bool {
        pattern().is_ok_and(|re| re.is_match(code))
    }

    /// Roll every repeat.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> DiceRoll {
        let mut repeats = Vec::with_capacity(self.repeats as usize);
        for _ in 0..self.repeats {
            let dice = (0..self.throws)
                .map(|_| rng.random_range(1..=self.sides))
                .collect();
            repeats.push(RepeatRoll::new(dice, self.multiplier, self.bonus));
        }
        log::debug!("rolled {self}");
        DiceRoll::new(self.clone(), repeats)
    }

    /// Number of repeats (1 when no `R#` prefix is given).
    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Dice per repeat.
    pub fn throws(&self) -> u32 {
        self.throws
    }

    /// Faces per die.
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Multiplier applied to each repeat's sum.
    pub fn multiplier(&self) -> Option<u32> {
        self.multiplier
    }

    /// Bonus added after the multiplier.
    pub fn bonus(&self) -> Option<i64> {
        self.bonus
    }
}

/// Digits the pattern already matched; only overflow can fail, and that saturates.
fn saturating_number(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

fn in_range(value: u64, min: u32, max: u32) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| (min..=max).contains(v))
}

/// One hundred-sided die, rolled when no code is given.
impl Default for DiceCode {
    fn default() -> Self {
        Self {
            repeats: 1,
            throws: 1,
            sides: 100,
            multiplier: None,
            bonus: None,
        }
    }
}

impl fmt::Display for DiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeats > 1 {
            write!(f, "{}#", self.repeats)?;
        }
        write!(f, "{}d{}", self.throws, self.sides)?;
        if let Some(m) = self.multiplier {
            write!(f, "*{m}")?;
        }
        if let Some(b) = self.bonus {
            write!(f, "{b:+}")?;
        }
        Ok(())
    }
}
