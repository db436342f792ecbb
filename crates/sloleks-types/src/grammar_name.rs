use std::fmt;

use serde::{Serialize, Serializer};

use crate::{Category, FeatureSet};

/// Categories that make up a grammar name, in canonical order.
pub const KEY_ORDER: [Category; 7] = [
    Category::VForm,
    Category::Case,
    Category::Person,
    Category::Number,
    Category::Gender,
    Category::Degree,
    Category::Clitic,
];

fn slot(category: Category) -> Option<usize> {
    KEY_ORDER.iter().position(|c| *c == category)
}

/// Canonical identifier of a grammatical feature combination.
///
/// Values live in fixed slots (see [`KEY_ORDER`]), so two names built from
/// the same values are equal no matter in which order they were supplied.
/// Blank values are treated as unset.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GrammarName {
    slots: [Option<String>; 7],
}

impl GrammarName {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`GrammarName::set`].
    pub fn with(mut self, category: Category, value: impl Into<String>) -> Self {
        self.set(category, value);
        self
    }

    /// Store `value` under `category`. Returns `false` when the category is
    /// not part of a grammar name or the value is blank.
    pub fn set(&mut self, category: Category, value: impl Into<String>) -> bool {
        let value = value.into();
        let value = value.trim();
        match slot(category) {
            Some(idx) if !value.is_empty() => {
                self.slots[idx] = Some(value.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        slot(category).and_then(|idx| self.slots[idx].as_deref())
    }

    /// Key-relevant features of a raw feature mapping.
    pub fn from_features(features: &FeatureSet) -> Self {
        let mut name = GrammarName::new();
        for category in KEY_ORDER {
            if let Some(value) = features.get(category.name()) {
                name.set(category, value);
            }
        }
        name
    }

    /// Set values in canonical order; this is the key's tuple form.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|s| s.as_deref())
    }

    /// Set `(category, value)` pairs in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (Category, &str)> {
        KEY_ORDER
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(c, s)| s.as_deref().map(|v| (*c, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// True when every value set here is present and equal in `candidate`.
    /// Extra values on the candidate are ignored.
    pub fn is_satisfied_by(&self, candidate: &GrammarName) -> bool {
        self.slots
            .iter()
            .zip(candidate.slots.iter())
            .all(|(required, actual)| match required {
                Some(value) => actual.as_deref() == Some(value.as_str()),
                None => true,
            })
    }
}

impl fmt::Display for GrammarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, value) in self.values().enumerate() {
            if idx > 0 {
                f.write_str("_")?;
            }
            f.write_str(value)?;
        }
        Ok(())
    }
}

impl Serialize for GrammarName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Build a grammar name from the seven optional key features.
pub fn resolve_grammar_name(
    v_form: Option<&str>,
    case: Option<&str>,
    person: Option<&str>,
    number: Option<&str>,
    gender: Option<&str>,
    degree: Option<&str>,
    clitic: Option<&str>,
) -> GrammarName {
    let mut name = GrammarName::new();
    let fields = [v_form, case, person, number, gender, degree, clitic];
    for (category, value) in KEY_ORDER.into_iter().zip(fields) {
        if let Some(value) = value {
            name.set(category, value);
        }
    }
    name
}
