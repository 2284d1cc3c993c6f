//! Illustrative verse similarity: weighted categorical matches plus shared
//! vocabulary. Not a linguistic measure.

use crate::verse::Verse;
use std::collections::HashSet;

const METRE_WEIGHT: u8 = 25;
const DEITY_WEIGHT: u8 = 25;
const GROUP_WEIGHT: u8 = 15;
const MANDALA_WEIGHT: u8 = 10;
const WORD_WEIGHT: usize = 5;
const VOCABULARY_CAP: usize = 25;
const MIN_WORD_CHARS: usize = 4;

/// Score breakdown; every field is the points awarded for that feature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Similarity {
    pub metre: u8,
    pub deity: u8,
    pub group: u8,
    pub mandala: u8,
    pub vocabulary: u8,
    pub shared_words: Vec<String>,
}

impl Similarity {
    pub fn total(&self) -> u8 {
        self.metre + self.deity + self.group + self.mandala + self.vocabulary
    }
}

pub fn score(a: &Verse, b: &Verse) -> Similarity {
    let shared_words = shared_vocabulary(&a.transliteration, &b.transliteration);
    let vocabulary = (shared_words.len() * WORD_WEIGHT).min(VOCABULARY_CAP) as u8;

    Similarity {
        metre: award(same(&a.meter_type, &b.meter_type), METRE_WEIGHT),
        deity: award(same(&a.deity, &b.deity), DEITY_WEIGHT),
        group: award(same(&a.poet_family, &b.poet_family), GROUP_WEIGHT),
        mandala: award(a.mandala == b.mandala, MANDALA_WEIGHT),
        vocabulary,
        shared_words,
    }
}

/// Candidates ordered by descending score; ties keep input order.
pub fn rank<'a>(target: &Verse, candidates: &'a [Verse]) -> Vec<(&'a Verse, u8)> {
    let mut ranked: Vec<(&Verse, u8)> = candidates
        .iter()
        .map(|c| (c, score(target, c).total()))
        .collect();
    ranked.sort_by_key(|&(_, s)| std::cmp::Reverse(s));
    ranked
}

fn award(matched: bool, weight: u8) -> u8 {
    if matched { weight } else { 0 }
}

/// Case-insensitive equality where absent and blank are the same value.
fn same(a: &Option<String>, b: &Option<String>) -> bool {
    let norm = |v: &Option<String>| v.as_deref().unwrap_or("").trim().to_lowercase();
    norm(a) == norm(b)
}

fn words(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect()
}

/// Distinct words of four or more characters present in both texts, sorted.
fn shared_vocabulary(a: &str, b: &str) -> Vec<String> {
    let right = words(b);
    let mut shared: Vec<String> = words(a).into_iter().filter(|w| right.contains(w)).collect();
    shared.sort();
    shared
}
