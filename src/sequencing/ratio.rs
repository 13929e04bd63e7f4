#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Musical rate as an exact fraction of the host's fundamental cycle.
///
/// The fundamental is one cycle per `time_sig_denominator` beats, so a ratio
/// of 4/1 in 4/4 fires on every quarter note and 1/1 once per bar.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempoRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl TempoRatio {
    pub const ONE: TempoRatio = TempoRatio::new(1, 1);

    /// A zero denominator is treated as 1.
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator: if denominator == 0 { 1 } else { denominator },
        }
    }

    /// Scale `value` by this ratio as `(value * n) / d`.
    ///
    /// Multiplying first keeps very large values (absolute sample positions)
    /// and very small ones (rates in cycles per sample) away from an early
    /// rounding step.
    #[inline]
    pub fn multiply(self, value: f64) -> f64 {
        (value * self.numerator as f64) / self.denominator as f64
    }

    pub fn as_f64(self) -> f64 {
        self.multiply(1.0)
    }
}

impl Default for TempoRatio {
    fn default() -> Self {
        Self::ONE
    }
}

/// The selectable tempo-sync rates, longest cycle first.
///
/// Names read as note lengths relative to the fundamental ("1/4" is a
/// quarter of it, i.e. four times as fast).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rate {
    Eight,
    Six,
    Four,
    Three,
    Two,
    OneAndHalf,
    One,
    ThreeQuarters,
    Half,
    ThreeEighths,
    Third,
    FiveSixteenths,
    Quarter,
    ThreeSixteenths,
    Sixth,
    Eighth,
    Twelfth,
    Sixteenth,
    TwentyFourth,
    ThirtySecond,
    FortyEighth,
    SixtyFourth,
}

impl Rate {
    pub const ALL: [Rate; 22] = [
        Rate::Eight,
        Rate::Six,
        Rate::Four,
        Rate::Three,
        Rate::Two,
        Rate::OneAndHalf,
        Rate::One,
        Rate::ThreeQuarters,
        Rate::Half,
        Rate::ThreeEighths,
        Rate::Third,
        Rate::FiveSixteenths,
        Rate::Quarter,
        Rate::ThreeSixteenths,
        Rate::Sixth,
        Rate::Eighth,
        Rate::Twelfth,
        Rate::Sixteenth,
        Rate::TwentyFourth,
        Rate::ThirtySecond,
        Rate::FortyEighth,
        Rate::SixtyFourth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rate::Eight => "8",
            Rate::Six => "6",
            Rate::Four => "4",
            Rate::Three => "3",
            Rate::Two => "2",
            Rate::OneAndHalf => "1.5",
            Rate::One => "1",
            Rate::ThreeQuarters => "3/4",
            Rate::Half => "1/2",
            Rate::ThreeEighths => "3/8",
            Rate::Third => "1/3",
            Rate::FiveSixteenths => "5/16",
            Rate::Quarter => "1/4",
            Rate::ThreeSixteenths => "3/16",
            Rate::Sixth => "1/6",
            Rate::Eighth => "1/8",
            Rate::Twelfth => "1/12",
            Rate::Sixteenth => "1/16",
            Rate::TwentyFourth => "1/24",
            Rate::ThirtySecond => "1/32",
            Rate::FortyEighth => "1/48",
            Rate::SixtyFourth => "1/64",
        }
    }

    /// Parse a display name such as `"3/16"` or `"1.5"`.
    pub fn from_name(name: &str) -> Option<Rate> {
        Rate::ALL.into_iter().find(|rate| rate.name() == name.trim())
    }

    /// Cycles of this rate per fundamental cycle (the inverse of the name).
    pub const fn ratio(self) -> TempoRatio {
        match self {
            Rate::Eight => TempoRatio::new(1, 8),
            Rate::Six => TempoRatio::new(1, 6),
            Rate::Four => TempoRatio::new(1, 4),
            Rate::Three => TempoRatio::new(1, 3),
            Rate::Two => TempoRatio::new(1, 2),
            Rate::OneAndHalf => TempoRatio::new(2, 3),
            Rate::One => TempoRatio::new(1, 1),
            Rate::ThreeQuarters => TempoRatio::new(4, 3),
            Rate::Half => TempoRatio::new(2, 1),
            Rate::ThreeEighths => TempoRatio::new(8, 3),
            Rate::Third => TempoRatio::new(3, 1),
            Rate::FiveSixteenths => TempoRatio::new(16, 5),
            Rate::Quarter => TempoRatio::new(4, 1),
            Rate::ThreeSixteenths => TempoRatio::new(16, 3),
            Rate::Sixth => TempoRatio::new(6, 1),
            Rate::Eighth => TempoRatio::new(8, 1),
            Rate::Twelfth => TempoRatio::new(12, 1),
            Rate::Sixteenth => TempoRatio::new(16, 1),
            Rate::TwentyFourth => TempoRatio::new(24, 1),
            Rate::ThirtySecond => TempoRatio::new(32, 1),
            Rate::FortyEighth => TempoRatio::new(48, 1),
            Rate::SixtyFourth => TempoRatio::new(64, 1),
        }
    }
}

impl From<Rate> for TempoRatio {
    fn from(rate: Rate) -> Self {
        rate.ratio()
    }
}
