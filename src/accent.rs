use crate::verse::VerseRef;

/// Vedic pitch accent classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accent {
    Udatta,
    Anudatta,
    Svarita,
}

impl Accent {
    pub const ALL: [Accent; 3] = [Accent::Udatta, Accent::Anudatta, Accent::Svarita];

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Udatta => "udātta",
            Self::Anudatta => "anudātta",
            Self::Svarita => "svarita",
        }
    }

    /// Relative pitch used when drawing the contour: high, low, falling.
    pub fn pitch(self) -> f64 {
        match self {
            Self::Udatta => 1.0,
            Self::Anudatta => 0.0,
            Self::Svarita => 0.5,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Udatta => "#d62828",
            Self::Anudatta => "#457b9d",
            Self::Svarita => "#f77f00",
        }
    }
}

pub fn seed(r: VerseRef) -> u32 {
    r.mandala as u32 * 10_000 + r.hymn as u32 * 100 + r.verse as u32
}

/// Deterministic pseudo-random categories derived from `seed`.
///
/// Index `i` maps to `floor(frac(sin(seed + i) * 10000) * categories)`.
/// No statistical quality is implied; only repeatability.
pub fn category_pattern(seed: u32, len: usize, categories: usize) -> Vec<usize> {
    if categories == 0 {
        return Vec::new();
    }
    (0..len)
        .map(|i| {
            let x = ((seed as f64) + i as f64).sin() * 10_000.0;
            let frac = x - x.floor();
            ((frac * categories as f64) as usize).min(categories - 1)
        })
        .collect()
}

pub fn accent_pattern(r: VerseRef, len: usize) -> Vec<Accent> {
    category_pattern(seed(r), len, Accent::ALL.len())
        .into_iter()
        .filter_map(Accent::from_index)
        .collect()
}

const UDATTA_MARK: char = '\u{0951}';
const ANUDATTA_MARK: char = '\u{0952}';
const DOUBLE_SVARITA: char = '\u{1cda}';

/// Accent marks actually written in Devanagari text, in order.
pub fn marked_accents(sanskrit: &str) -> Vec<Accent> {
    sanskrit
        .chars()
        .filter_map(|c| match c {
            UDATTA_MARK => Some(Accent::Udatta),
            ANUDATTA_MARK => Some(Accent::Anudatta),
            DOUBLE_SVARITA => Some(Accent::Svarita),
            _ => None,
        })
        .collect()
}
