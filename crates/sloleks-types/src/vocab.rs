use std::fmt;

use serde::{Deserialize, Serialize};

/// Grammatical category a feature value belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "v_form")]
    VForm,
    Case,
    Person,
    Number,
    Gender,
    Degree,
    Clitic,
    Animate,
    Definiteness,
    Negative,
    Aspect,
    #[serde(alias = "word_type")]
    Type,
    Form,
}

impl Category {
    /// Feature name as used in `<grammarFeature name="...">`.
    pub fn name(self) -> &'static str {
        match self {
            Category::VForm => "vform",
            Category::Case => "case",
            Category::Person => "person",
            Category::Number => "number",
            Category::Gender => "gender",
            Category::Degree => "degree",
            Category::Clitic => "clitic",
            Category::Animate => "animate",
            Category::Definiteness => "definiteness",
            Category::Negative => "negative",
            Category::Aspect => "aspect",
            Category::Type => "type",
            Category::Form => "form",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "vform" | "v_form" => Some(Category::VForm),
            "case" => Some(Category::Case),
            "person" => Some(Category::Person),
            "number" => Some(Category::Number),
            "gender" => Some(Category::Gender),
            "degree" => Some(Category::Degree),
            "clitic" => Some(Category::Clitic),
            "animate" => Some(Category::Animate),
            "definiteness" => Some(Category::Definiteness),
            "negative" => Some(Category::Negative),
            "aspect" => Some(Category::Aspect),
            "type" | "word_type" => Some(Category::Type),
            "form" => Some(Category::Form),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of classifying a bare feature value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Classification {
    /// The value belongs to exactly one category.
    Unique(Category),
    /// The value is shared by several categories (`yes`, `no`). Callers must
    /// resolve it from context instead of guessing.
    Ambiguous(Vec<Category>),
}

/// Immutable table of categories and their allowed values.
///
/// The standard table is a process-wide static; callers pass it explicitly
/// to whatever needs to classify values.
#[derive(Debug)]
pub struct Vocabulary {
    categories: &'static [(Category, &'static [&'static str])],
}

const STANDARD_CATEGORIES: &[(Category, &[&str])] = &[
    (
        Category::VForm,
        &[
            "present",
            "imperative",
            "participle",
            "conditional",
            "future",
            "infinitive",
            "supine",
        ],
    ),
    (
        Category::Case,
        &[
            "nominative",
            "genitive",
            "dative",
            "accusative",
            "locative",
            "instrumental",
        ],
    ),
    (Category::Person, &["first", "second", "third"]),
    (Category::Number, &["singular", "dual", "plural"]),
    (Category::Gender, &["masculine", "feminine", "neuter"]),
    (Category::Degree, &["positive", "comparative", "superlative"]),
    (Category::Clitic, &["yes", "bound"]),
    (Category::Animate, &["yes", "no"]),
    (Category::Definiteness, &["yes", "no"]),
    (Category::Negative, &["yes", "no"]),
    (Category::Aspect, &["perfective", "progressive", "biaspectual"]),
    // "participle" is a verb form only, never a word type.
    (
        Category::Type,
        &[
            "special",
            "personal",
            "relative",
            "general",
            "auxiliary",
            "cardinal",
            "proper",
            "ordinal",
            "reflexive",
            "pronominal",
            "possessive",
            "coordinating",
            "negative",
            "interrogative",
            "subordinating",
            "main",
            "demonstrative",
            "indefinite",
            "common",
        ],
    ),
    (Category::Form, &["letter", "roman", "digit"]),
];

static STANDARD: Vocabulary = Vocabulary::new(STANDARD_CATEGORIES);

impl Vocabulary {
    pub const fn new(categories: &'static [(Category, &'static [&'static str])]) -> Self {
        Self { categories }
    }

    /// The Sloleks feature vocabulary.
    pub fn standard() -> &'static Vocabulary {
        &STANDARD
    }

    /// Allowed values of `category`, in declaration order.
    pub fn values(&self, category: Category) -> &'static [&'static str] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, values)| *values)
            .unwrap_or(&[])
    }

    /// Classify a bare value. `None` for values no category knows about.
    pub fn classify(&self, value: &str) -> Option<Classification> {
        let value = value.trim();
        let mut owners: Vec<Category> = self
            .categories
            .iter()
            .filter(|(_, values)| values.contains(&value))
            .map(|(category, _)| *category)
            .collect();
        match owners.len() {
            0 => None,
            1 => owners.pop().map(Classification::Unique),
            _ => Some(Classification::Ambiguous(owners)),
        }
    }
}
