//! Shared types for Sloleks lexicon data.
//!
//! The crate mirrors the shape of a Sloleks `<entry>`: a lemma with its
//! lemma-level features, a list of word forms, and for every word form one or
//! more surface representations. On top of the raw records it defines the
//! grammatical vocabulary ([`Vocabulary`], [`Category`]) and the canonical
//! [`GrammarName`] key that ties table cells to word forms.
//!
//! ```rust
//! use sloleks_types::{Category, Classification, GrammarName, Vocabulary};
//!
//! let vocab = Vocabulary::standard();
//! assert_eq!(
//!     vocab.classify("genitive"),
//!     Some(Classification::Unique(Category::Case))
//! );
//!
//! let key = GrammarName::new()
//!     .with(Category::Number, "plural")
//!     .with(Category::Case, "genitive");
//! assert_eq!(key.to_string(), "genitive_plural");
//! ```

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

mod grammar_name;
mod record;
mod vocab;

pub use grammar_name::{GrammarName, KEY_ORDER, resolve_grammar_name};
pub use record::{Entry, RepRef, Representation, Weirdness, WordForm};
pub use vocab::{Category, Classification, Vocabulary};

/// Part of speech as written in the `<category>` element of a Sloleks entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Numeral,
    Preposition,
    Conjunction,
    Particle,
    Interjection,
    Abbreviation,
    Residual,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 12] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Numeral,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Particle,
        PartOfSpeech::Interjection,
        PartOfSpeech::Abbreviation,
        PartOfSpeech::Residual,
    ];

    /// Parse a category name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|pos| pos.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Numeral => "numeral",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Particle => "particle",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Abbreviation => "abbreviation",
            PartOfSpeech::Residual => "residual",
        }
    }

    /// Parts of speech whose forms are declined per gender. Forms of these
    /// without an explicit gender are filed under [`AGENDER`].
    pub fn declines_by_gender(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Adjective | PartOfSpeech::Pronoun | PartOfSpeech::Numeral
        )
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gender value given to genderless forms of gender-declined parts of speech.
pub const AGENDER: &str = "agender";

/// Ordered `name -> value` feature mapping, as read from `<grammarFeature>`
/// elements. Setting an existing name replaces its value in place.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeatureSet {
    pairs: Vec<(String, String)>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when `name` is present with exactly `value`.
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (name, value) in &self.pairs {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
