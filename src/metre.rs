//! Metrical notation (laghu/guru sequences) and the metre table.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetreError {
    #[error("Malformed metrical data: unexpected {found:?} in pāda {pada} at syllable {position}")]
    Malformed {
        found: char,
        pada: usize,
        position: usize,
    },
    #[error("Guru multiplier must be a positive finite number, got {0}")]
    Multiplier(f64),
}

/// Syllable weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syllable {
    Laghu,
    Guru,
}

impl Syllable {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'L' => Some(Self::Laghu),
            'G' | 'S' => Some(Self::Guru),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Laghu => 'L',
            Self::Guru => 'G',
        }
    }

    /// Weight in morae: light counts one, heavy counts two.
    pub fn morae(self) -> u32 {
        match self {
            Self::Laghu => 1,
            Self::Guru => 2,
        }
    }
}

/// One metrical line of a verse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pada {
    pub syllables: Vec<Syllable>,
}

impl Pada {
    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }

    pub fn morae(&self) -> u32 {
        self.syllables.iter().map(|s| s.morae()).sum()
    }

    /// Duration of each syllable: light gets `base`, heavy gets `base * guru_multiplier`.
    pub fn timings(
        &self,
        base: Duration,
        guru_multiplier: f64,
    ) -> Result<Vec<(Syllable, Duration)>, MetreError> {
        if !guru_multiplier.is_finite() || guru_multiplier <= 0.0 {
            return Err(MetreError::Multiplier(guru_multiplier));
        }
        let guru = Duration::try_from_secs_f64(base.as_secs_f64() * guru_multiplier)
            .map_err(|_| MetreError::Multiplier(guru_multiplier))?;
        Ok(self
            .syllables
            .iter()
            .map(|&s| match s {
                Syllable::Laghu => (s, base),
                Syllable::Guru => (s, guru),
            })
            .collect())
    }

    pub fn notation(&self) -> String {
        self.syllables.iter().map(|s| s.symbol()).collect()
    }
}

const BREAK_MARKERS: [&str; 3] = ["<br />", "<br/>", "<br>"];

/// Parse `"LGGL<br />LLGG"` style notation into pādas.
///
/// Whitespace is ignored and empty segments are skipped, so an empty string
/// yields no pādas.
pub fn parse_metrical_data(input: &str) -> Result<Vec<Pada>, MetreError> {
    let mut normalized = input.to_string();
    for marker in BREAK_MARKERS {
        normalized = normalized.replace(marker, "\n");
    }

    let mut padas = Vec::new();
    for segment in normalized.lines() {
        let mut syllables = Vec::new();
        for c in segment.chars().filter(|c| !c.is_whitespace()) {
            match Syllable::from_char(c) {
                Some(s) => syllables.push(s),
                None => {
                    return Err(MetreError::Malformed {
                        found: c,
                        pada: padas.len() + 1,
                        position: syllables.len() + 1,
                    });
                }
            }
        }
        if !syllables.is_empty() {
            padas.push(Pada { syllables });
        }
    }
    Ok(padas)
}

/// Named Vedic metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chandas {
    Gayatri,
    Ushnih,
    Anushtubh,
    Brihati,
    Pankti,
    Trishtubh,
    Jagati,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChandasInfo {
    pub name: &'static str,
    pub padas: &'static [usize],
    pub color: &'static str,
    pub icon: &'static str,
}

impl ChandasInfo {
    pub fn syllables(&self) -> usize {
        self.padas.iter().sum()
    }
}

impl Chandas {
    pub const ALL: [Chandas; 7] = [
        Chandas::Gayatri,
        Chandas::Ushnih,
        Chandas::Anushtubh,
        Chandas::Brihati,
        Chandas::Pankti,
        Chandas::Trishtubh,
        Chandas::Jagati,
    ];

    pub fn info(self) -> ChandasInfo {
        match self {
            Self::Gayatri => ChandasInfo { name: "Gāyatrī", padas: &[8, 8, 8], color: "#f4a261", icon: "triangle" },
            Self::Ushnih => ChandasInfo { name: "Uṣṇih", padas: &[8, 8, 12], color: "#e9c46a", icon: "feather" },
            Self::Anushtubh => ChandasInfo { name: "Anuṣṭubh", padas: &[8, 8, 8, 8], color: "#2a9d8f", icon: "square" },
            Self::Brihati => ChandasInfo { name: "Bṛhatī", padas: &[8, 8, 12, 8], color: "#264653", icon: "layers" },
            Self::Pankti => ChandasInfo { name: "Paṅkti", padas: &[8, 8, 8, 8, 8], color: "#6d597a", icon: "pentagon" },
            Self::Trishtubh => ChandasInfo { name: "Triṣṭubh", padas: &[11, 11, 11, 11], color: "#e76f51", icon: "zap" },
            Self::Jagati => ChandasInfo { name: "Jagatī", padas: &[12, 12, 12, 12], color: "#457b9d", icon: "globe" },
        }
    }

    /// Recognise a metre from the syllable count of each pāda.
    pub fn identify(padas: &[Pada]) -> Option<Self> {
        let counts: Vec<usize> = padas.iter().map(Pada::len).collect();
        Self::ALL.into_iter().find(|c| c.info().padas == counts.as_slice())
    }

    /// Match a metre name as written by the API ("Gayatri", "Triṣṭubh", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = crate::catalog::fold(name);
        Self::ALL
            .into_iter()
            .find(|c| crate::catalog::fold(c.info().name) == wanted)
    }
}
