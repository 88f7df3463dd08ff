//! Limits and rendering settings for dice codes.

/// Configuration for parsing and rendering dice codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceConfig {
    /// Maximum repeat count (`R#`).
    pub max_repeats: u32,
    /// Maximum dice per repeat.
    pub max_throws: u32,
    /// Maximum faces per die.
    pub max_sides: u32,
    /// Maximum multiplier (`*M`).
    pub max_multiplier: u32,
    /// Maximum bonus magnitude (`+B` or `-B`).
    pub max_bonus: u32,
    /// Rendered lines longer than this are elided in the middle.
    pub max_line_length: usize,
    /// Text inserted where a line is elided.
    pub filler: String,
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            max_repeats: 10,
            max_throws: 100,
            max_sides: 1000,
            max_multiplier: 1000,
            max_bonus: 1000,
            max_line_length: 47,
            filler: "...".to_string(),
        }
    }
}

impl DiceConfig {
    /// Set the maximum repeat count.
    pub fn with_max_repeats(mut self, max: u32) -> Self {
        self.max_repeats = max;
        self
    }

    /// Set the maximum dice per repeat.
    pub fn with_max_throws(mut self, max: u32) -> Self {
        self.max_throws = max;
        self
    }

    /// Set the maximum faces per die.
    pub fn with_max_sides(mut self, max: u32) -> Self {
        self.max_sides = max;
        self
    }

    /// Set the maximum multiplier.
    pub fn with_max_multiplier(mut self, max: u32) -> Self {
        self.max_multiplier = max;
        self
    }

    /// Set the maximum bonus magnitude.
    pub fn with_max_bonus(mut self, max: u32) -> Self {
        self.max_bonus = max;
        self
    }

    /// Set the rendered line length limit.
    pub fn with_max_line_length(mut self, len: usize) -> Self {
        self.max_line_length = len;
        self
    }

    /// Set the elision filler.
    pub fn with_filler(mut self, filler: impl Into<String>) -> Self {
        self.filler = filler.into();
        self
    }
}
