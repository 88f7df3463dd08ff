//! Rolled dice and their one-line rendering.

use std::fmt;

use crate::code::DiceCode;
use crate::config::DiceConfig;

/// One repeat of a dice code: the dice and their total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatRoll {
    dice: Vec<u32>,
    multiplier: Option<u32>,
    bonus: Option<i64>,
    total: i64,
}

impl RepeatRoll {
    /// Total a repeat as `sum * multiplier + bonus`. A missing multiplier
    /// counts as 1, a missing bonus as 0. The arithmetic saturates at the
    /// `i64` bounds.
    pub fn new(dice: Vec<u32>, multiplier: Option<u32>, bonus: Option<i64>) -> Self {
        let sum = dice
            .iter()
            .fold(0i64, |acc, d| acc.saturating_add(i64::from(*d)));
        let total = sum
            .saturating_mul(i64::from(multiplier.unwrap_or(1)))
            .saturating_add(bonus.unwrap_or(0));
        Self {
            dice,
            multiplier,
            bonus,
            total,
        }
    }

    /// The face values in roll order.
    pub fn dice(&self) -> &[u32] {
        &self.dice
    }

    /// The repeat's total.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Render as `a+b+c=total`, `(a+b)*M+B=total`, or just `a` for a single
    /// unmodified die. Lines over the configured length lose their middle.
    pub fn render(&self, config: &DiceConfig) -> String {
        let mut expr = self
            .dice
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("+");
        if let Some(m) = self.multiplier {
            expr = format!("({expr})*{m}");
        }
        if let Some(b) = self.bonus {
            expr = format!("{expr}{b:+}");
        }
        let sum = if self.dice.len() > 1 || self.multiplier.is_some() || self.bonus.is_some() {
            format!("={}", self.total)
        } else {
            String::new()
        };

        if expr.len() + sum.len() > config.max_line_length {
            let room = config.max_line_length.saturating_sub(sum.len());
            let head = (room / 2).saturating_sub(config.filler.len()).min(expr.len());
            let tail = (room / 2 + room % 2).min(expr.len() - head);
            expr = format!(
                "{}{}{}",
                &expr[..head],
                config.filler,
                &expr[expr.len() - tail..]
            );
        }
        expr + &sum
    }
}

impl fmt::Display for RepeatRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DiceConfig::default()))
    }
}

/// Every repeat of a rolled dice code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    code: DiceCode,
    repeats: Vec<RepeatRoll>,
}

impl DiceRoll {
    /// Pair a code with its rolled repeats.
    pub fn new(code: DiceCode, repeats: Vec<RepeatRoll>) -> Self {
        Self { code, repeats }
    }

    /// The code that was rolled.
    pub fn code(&self) -> &DiceCode {
        &self.code
    }

    /// The repeats in roll order.
    pub fn repeats(&self) -> &[RepeatRoll] {
        &self.repeats
    }

    /// Each repeat's total.
    pub fn totals(&self) -> Vec<i64> {
        self.repeats.iter().map(RepeatRoll::total).collect()
    }

    /// Header line naming the code, prefixed with the purpose when given.
    pub fn headline(&self, purpose: Option<&str>) -> String {
        match purpose.map(str::trim).filter(|p| !p.is_empty()) {
            Some(purpose) => format!("{purpose}: {}", self.code),
            None => self.code.to_string(),
        }
    }

    /// One rendered line per repeat.
    pub fn render(&self, config: &DiceConfig) -> String {
        self.repeats
            .iter()
            .map(|r| r.render(config))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DiceConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(dice: Vec<u32>, multiplier: Option<u32>, bonus: Option<i64>) -> String {
        RepeatRoll::new(dice, multiplier, bonus).render(&DiceConfig::default())
    }

    #[test]
    fn single_die_has_no_total() {
        insta::assert_snapshot!(render(vec![4], None, None), @"4");
    }

    #[test]
    fn several_dice_show_the_total() {
        insta::assert_snapshot!(render(vec![3, 5], None, None), @"3+5=8");
    }

    #[test]
    fn multiplier_wraps_the_sum() {
        insta::assert_snapshot!(render(vec![1, 2, 3], Some(2), Some(1)), @"(1+2+3)*2+1=13");
    }

    #[test]
    fn negative_bonus_keeps_its_sign() {
        insta::assert_snapshot!(render(vec![4], None, Some(-2)), @"4-2=2");
    }

    #[test]
    fn missing_bonus_adds_nothing() {
        assert_eq!(RepeatRoll::new(vec![6, 6], Some(3), None).total(), 36);
    }

    #[test]
    fn extreme_modifiers_saturate_instead_of_overflowing() {
        let high = RepeatRoll::new(vec![6], Some(u32::MAX), Some(i64::MAX));
        assert_eq!(high.total(), i64::MAX);
        let low = RepeatRoll::new(vec![1], Some(1), Some(i64::MIN));
        assert_eq!(low.total(), i64::MIN + 1);
    }

    #[test]
    fn long_lines_lose_their_middle() {
        let line = render(vec![100; 30], None, None);
        assert_eq!(line.len(), 47);
        insta::assert_snapshot!(line, @"100+100+100+100+10...0+100+100+100+100+100=3000");
    }

    #[test]
    fn custom_filler_and_length() {
        let config = DiceConfig::default()
            .with_max_line_length(12)
            .with_filler("~");
        let line = RepeatRoll::new(vec![1; 10], None, None).render(&config);
        assert_eq!(line.len(), 12);
        assert!(line.ends_with("=10"));
        assert!(line.contains('~'));
    }

    #[test]
    fn repeats_render_one_per_line() {
        let code = DiceCode::parse("2#2d6", &DiceConfig::default()).unwrap();
        let roll = DiceRoll::new(
            code,
            vec![
                RepeatRoll::new(vec![1, 2], None, None),
                RepeatRoll::new(vec![6, 6], None, None),
            ],
        );
        assert_eq!(roll.totals(), vec![3, 12]);
        assert_eq!(roll.headline(None), "2#2d6");
        assert_eq!(roll.headline(Some(" ")), "2#2d6");
        assert_eq!(roll.headline(Some("stealth check")), "stealth check: 2#2d6");
        insta::assert_snapshot!(roll.to_string(), @r"
        1+2=3
        6+6=12
        ");
    }
}
