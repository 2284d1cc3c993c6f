use crate::catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordError {
    #[error("Mandala must be between 1 and 10, got {0}")]
    Mandala(i64),
    #[error("Mandala {mandala} has {max} hymns, got {hymn}")]
    Hymn { mandala: u8, hymn: i64, max: u16 },
    #[error("Verse must be at least 1, got {0}")]
    Verse(i64),
    #[error("Invalid verse reference: {0}")]
    Syntax(String),
}

/// Address of a single stanza: mandala, hymn (sūkta) and verse (ṛc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerseRef {
    pub mandala: u8,
    pub hymn: u16,
    pub verse: u16,
}

impl VerseRef {
    pub fn new(mandala: i64, hymn: i64, verse: i64) -> Result<Self, CoordError> {
        if !(1..=10).contains(&mandala) {
            return Err(CoordError::Mandala(mandala));
        }
        let mandala = mandala as u8;
        let max = catalog::hymn_count(mandala).unwrap_or(0);
        if hymn < 1 || hymn > max as i64 {
            return Err(CoordError::Hymn { mandala, hymn, max });
        }
        if verse < 1 || verse > u16::MAX as i64 {
            return Err(CoordError::Verse(verse));
        }
        Ok(Self {
            mandala,
            hymn: hymn as u16,
            verse: verse as u16,
        })
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.mandala, self.hymn, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(CoordError::Syntax(s.to_string()));
        }
        let mut nums = [0i64; 3];
        for (slot, part) in nums.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| CoordError::Syntax(s.to_string()))?;
        }
        Self::new(nums[0], nums[1], nums[2])
    }
}

/// A translation, optionally attributed to a translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TranslationRepr")]
pub struct Translation {
    pub text: String,
    pub author: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranslationRepr {
    Plain(String),
    Attributed {
        text: String,
        #[serde(default)]
        author: Option<String>,
    },
}

impl From<TranslationRepr> for Translation {
    fn from(repr: TranslationRepr) -> Self {
        match repr {
            TranslationRepr::Plain(text) => Self { text, author: None },
            TranslationRepr::Attributed { text, author } => Self { text, author },
        }
    }
}

/// Morphological annotation of one word form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordAnnotation {
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub lemma: Option<String>,
    #[serde(default)]
    pub grammar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PadaAnnotation {
    #[serde(default)]
    pub index: Option<u8>,
    #[serde(default)]
    pub words: Vec<WordAnnotation>,
}

/// A verse as returned by the verse API. Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub mandala: u8,
    pub hymn: u16,
    pub verse: u16,
    #[serde(default)]
    pub sanskrit: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub translations: BTreeMap<String, Translation>,
    #[serde(default, alias = "hymnAddressee")]
    pub deity: Option<String>,
    #[serde(default, alias = "hymnGroup")]
    pub poet_family: Option<String>,
    #[serde(default, alias = "stanzaType")]
    pub meter_type: Option<String>,
    #[serde(default, alias = "metricalData")]
    pub metrical_data: Option<String>,
    #[serde(default)]
    pub padas: Vec<PadaAnnotation>,
}

impl Verse {
    pub fn reference(&self) -> VerseRef {
        VerseRef {
            mandala: self.mandala,
            hymn: self.hymn,
            verse: self.verse,
        }
    }

    pub fn translation(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(|t| t.text.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_verse() -> Verse {
        serde_json::from_str(
            r#"{
                "mandala": 1,
                "hymn": 1,
                "verse": 1,
                "sanskrit": "अ॒ग्निमी॑ळे पु॒रोहि॑तं य॒ज्ञस्य॑ दे॒वमृ॒त्विज॑म् । होता॑रं रत्न॒धात॑मम् ॥",
                "transliteration": "agním īḷe puróhitaṃ yajñásya devám ṛtvíjam hótāraṃ ratnadhā́tamam",
                "translations": {
                    "english": { "text": "I praise Agni, the household priest", "author": "Griffith" },
                    "german": "Agni preise ich"
                },
                "hymnAddressee": "Agni",
                "hymnGroup": "Madhuchchhandas Vaishvamitra",
                "stanzaType": "Gayatri",
                "metricalData": "LGGLGLGL<br />GLGLGLGL<br />GLGLLGLG",
                "padas": [
                    { "index": 1, "words": [ { "form": "agním", "lemma": "agni", "grammar": "acc. sg. m." } ] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_verse_ref_valid() {
        let r = VerseRef::new(3, 62, 10).unwrap();
        assert_eq!(r.to_string(), "3.62.10");
    }

    #[test]
    fn test_verse_ref_mandala_out_of_range() {
        assert_eq!(VerseRef::new(11, 1, 1), Err(CoordError::Mandala(11)));
        assert_eq!(VerseRef::new(0, 1, 1), Err(CoordError::Mandala(0)));
    }

    #[test]
    fn test_verse_ref_hymn_beyond_mandala() {
        // Mandala 2 has 43 hymns
        assert!(VerseRef::new(2, 43, 1).is_ok());
        assert!(matches!(
            VerseRef::new(2, 44, 1),
            Err(CoordError::Hymn { max: 43, .. })
        ));
    }

    #[test]
    fn test_verse_ref_negative_verse() {
        assert_eq!(VerseRef::new(1, 1, -2), Err(CoordError::Verse(-2)));
    }

    #[test]
    fn test_verse_ref_from_str() {
        let r: VerseRef = "10.129.7".parse().unwrap();
        assert_eq!(r, VerseRef { mandala: 10, hymn: 129, verse: 7 });
        assert!("10.129".parse::<VerseRef>().is_err());
        assert!("a.b.c".parse::<VerseRef>().is_err());
    }

    #[test]
    fn test_deserialize_alias_fields() {
        let v = sample_verse();
        assert_eq!(v.deity.as_deref(), Some("Agni"));
        assert_eq!(v.meter_type.as_deref(), Some("Gayatri"));
        assert_eq!(v.poet_family.as_deref(), Some("Madhuchchhandas Vaishvamitra"));
        assert!(v.metrical_data.is_some());
        assert_eq!(v.padas[0].words[0].lemma.as_deref(), Some("agni"));
    }

    #[test]
    fn test_translations_plain_and_attributed() {
        let v = sample_verse();
        let en = &v.translations["english"];
        assert_eq!(en.author.as_deref(), Some("Griffith"));
        assert_eq!(v.translation("german"), Some("Agni preise ich"));
        assert_eq!(v.translations["german"].author, None);
    }

    #[test]
    fn test_snake_case_fields() {
        let v: Verse = serde_json::from_str(
            r#"{ "mandala": 7, "hymn": 86, "verse": 1, "deity": "Varuna", "meter_type": "Tristubh" }"#,
        )
        .unwrap();
        assert_eq!(v.reference(), VerseRef { mandala: 7, hymn: 86, verse: 1 });
        assert_eq!(v.deity.as_deref(), Some("Varuna"));
        assert!(v.translations.is_empty());
    }
}
