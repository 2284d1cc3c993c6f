//! Static reference tables: hymn counts, deities and family-book seers.
//!
//! Counts attached to deities are illustrative figures for display, not
//! corpus statistics.

/// Number of hymns in each mandala, indexed by `mandala - 1`.
const HYMN_COUNTS: [u16; 10] = [191, 43, 62, 58, 87, 75, 104, 103, 114, 191];

pub fn hymn_count(mandala: u8) -> Option<u16> {
    HYMN_COUNTS.get((mandala as usize).checked_sub(1)?).copied()
}

pub fn total_hymns() -> u32 {
    HYMN_COUNTS.iter().map(|&n| n as u32).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeityKind {
    Fire,
    Storm,
    Ritual,
    Cosmic,
    Solar,
    Dawn,
    Wind,
    River,
    Healer,
}

/// Display metadata for a deity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

impl DeityKind {
    pub fn style(self) -> KindStyle {
        let (color, icon) = match self {
            Self::Fire => ("#e4572e", "flame"),
            Self::Storm => ("#3a86ff", "zap"),
            Self::Ritual => ("#8338ec", "droplet"),
            Self::Cosmic => ("#1d3557", "globe"),
            Self::Solar => ("#ffbe0b", "sun"),
            Self::Dawn => ("#ff7f51", "sunrise"),
            Self::Wind => ("#90be6d", "wind"),
            Self::River => ("#00a6a6", "waves"),
            Self::Healer => ("#f15bb5", "heart"),
        };
        KindStyle { color, icon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deity {
    pub name: &'static str,
    pub epithet: &'static str,
    pub domain: &'static str,
    pub kind: DeityKind,
    pub hymns: u16,
}

pub const DEITIES: &[Deity] = &[
    Deity { name: "Agni", epithet: "Hotṛ", domain: "sacrificial fire", kind: DeityKind::Fire, hymns: 200 },
    Deity { name: "Indra", epithet: "Vṛtrahan", domain: "thunder and war", kind: DeityKind::Storm, hymns: 250 },
    Deity { name: "Soma", epithet: "Pavamāna", domain: "the pressed drink", kind: DeityKind::Ritual, hymns: 120 },
    Deity { name: "Varuṇa", epithet: "Samrāj", domain: "cosmic order", kind: DeityKind::Cosmic, hymns: 12 },
    Deity { name: "Mitra", epithet: "Yātayajjana", domain: "contracts and friendship", kind: DeityKind::Cosmic, hymns: 1 },
    Deity { name: "Aśvins", epithet: "Nāsatya", domain: "healing and rescue", kind: DeityKind::Healer, hymns: 54 },
    Deity { name: "Uṣas", epithet: "Maghonī", domain: "dawn", kind: DeityKind::Dawn, hymns: 21 },
    Deity { name: "Sūrya", epithet: "Vibhrāj", domain: "the sun", kind: DeityKind::Solar, hymns: 10 },
    Deity { name: "Vāyu", epithet: "Niyutvat", domain: "wind", kind: DeityKind::Wind, hymns: 3 },
    Deity { name: "Maruts", epithet: "Rudriya", domain: "storm troop", kind: DeityKind::Storm, hymns: 33 },
    Deity { name: "Rudra", epithet: "Kapardin", domain: "wild healing", kind: DeityKind::Healer, hymns: 3 },
    Deity { name: "Viṣṇu", epithet: "Urukrama", domain: "the three strides", kind: DeityKind::Solar, hymns: 5 },
    Deity { name: "Sarasvatī", epithet: "Ambitamā", domain: "the river", kind: DeityKind::River, hymns: 3 },
    Deity { name: "Bṛhaspati", epithet: "Brahmaṇaspati", domain: "sacred speech", kind: DeityKind::Ritual, hymns: 11 },
    Deity { name: "Savitṛ", epithet: "Hiraṇyapāṇi", domain: "impulse of the sun", kind: DeityKind::Solar, hymns: 11 },
];

/// Look up a deity by name, ignoring case and diacritic-free spelling.
pub fn deity(name: &str) -> Option<&'static Deity> {
    let wanted = fold(name);
    DEITIES.iter().find(|d| fold(d.name) == wanted)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rishi {
    pub name: &'static str,
    pub family: &'static str,
    pub mandala: u8,
}

/// Seers of the family books (mandalas 2 to 8).
pub const RISHIS: &[Rishi] = &[
    Rishi { name: "Gṛtsamada", family: "Bhārgava", mandala: 2 },
    Rishi { name: "Viśvāmitra", family: "Kauśika", mandala: 3 },
    Rishi { name: "Vāmadeva", family: "Gautama", mandala: 4 },
    Rishi { name: "Atri", family: "Ātreya", mandala: 5 },
    Rishi { name: "Bharadvāja", family: "Āṅgirasa", mandala: 6 },
    Rishi { name: "Vasiṣṭha", family: "Vāsiṣṭha", mandala: 7 },
    Rishi { name: "Kaṇva", family: "Kāṇva", mandala: 8 },
];

pub fn rishi_for_mandala(mandala: u8) -> Option<&'static Rishi> {
    RISHIS.iter().find(|r| r.mandala == mandala)
}

/// Lowercase and strip IAST diacritics so "Varuna" matches "Varuṇa".
pub(crate) fn fold(s: &str) -> String {
    s.trim()
        .chars()
        .filter_map(|c| {
            let base = match c {
                'ā' | 'Ā' => 'a',
                'ī' | 'Ī' => 'i',
                'ū' | 'Ū' => 'u',
                'ṛ' | 'Ṛ' | 'ṝ' => 'r',
                'ḷ' => 'l',
                'ṅ' | 'ñ' | 'ṇ' | 'Ṇ' => 'n',
                'ṭ' => 't',
                'ḍ' => 'd',
                'ś' | 'Ś' | 'ṣ' | 'Ṣ' => 's',
                'ṃ' | 'ṁ' => 'm',
                'ḥ' => 'h',
                '\u{0300}'..='\u{036f}' => return None,
                c => c,
            };
            Some(base.to_ascii_lowercase())
        })
        .collect()
}
