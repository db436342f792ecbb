//! Axis layouts: which tables a part of speech gets and how they are laid out.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sloleks_types::{AGENDER, Category, PartOfSpeech, Vocabulary};
use thiserror::Error;

/// Label of an axis that only exists to hold a flat list of forms.
pub const PSEUDO_LABEL: &str = "form";

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown part of speech {0:?}")]
    UnknownPartOfSpeech(String),
    #[error("table {table:?}: unknown category {name:?}")]
    UnknownCategory { table: String, name: String },
    #[error("table {table:?}: {axis} axis has no labels")]
    EmptyAxis { table: String, axis: &'static str },
}

/// Ordered labels along one side of a table.
///
/// `category`, when set, says which category every label belongs to. It is
/// how a table disambiguates bare `yes`/`no` labels.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Axis {
    pub category: Option<Category>,
    pub labels: Vec<String>,
}

impl Axis {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            category: None,
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn of(category: Category, labels: &[&str]) -> Self {
        Self {
            category: Some(category),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// All values of `category` in vocabulary order.
    pub fn all(category: Category, vocab: &Vocabulary) -> Self {
        Self::of(category, vocab.values(category))
    }

    /// A single `form` label: no header, no constraint.
    pub fn pseudo() -> Self {
        Self::new([PSEUDO_LABEL])
    }

    pub fn is_pseudo(&self) -> bool {
        self.labels.len() == 1 && self.labels[0] == PSEUDO_LABEL
    }
}

/// One table: name, column axis, row axis and features fixed for every cell.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TableLayout {
    pub name: String,
    pub columns: Axis,
    pub rows: Axis,
    pub fixed: BTreeMap<Category, String>,
}

impl TableLayout {
    pub fn new(name: impl Into<String>, columns: Axis, rows: Axis) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
            fixed: BTreeMap::new(),
        }
    }

    pub fn fix(mut self, category: Category, value: impl Into<String>) -> Self {
        self.fixed.insert(category, value.into());
        self
    }
}

/// Part-of-speech indexed layouts.
#[derive(Clone, Debug, Default)]
pub struct LayoutTable {
    tables: BTreeMap<PartOfSpeech, Vec<TableLayout>>,
}

impl LayoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: PartOfSpeech, layout: TableLayout) {
        self.tables.entry(pos).or_default().push(layout);
    }

    /// Layouts for `pos`, in display order. Empty when none are configured.
    pub fn for_pos(&self, pos: PartOfSpeech) -> &[TableLayout] {
        self.tables.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parts of speech without any layout.
    pub fn unhandled(&self) -> Vec<PartOfSpeech> {
        PartOfSpeech::ALL
            .into_iter()
            .filter(|pos| self.for_pos(*pos).is_empty())
            .collect()
    }

    /// Layouts for every part of speech in the Sloleks lexicon.
    pub fn standard(vocab: &Vocabulary) -> Self {
        let number = || Axis::all(Category::Number, vocab);
        let case = || Axis::all(Category::Case, vocab);
        let mut table = Self::new();

        table.insert(
            PartOfSpeech::Noun,
            TableLayout::new("declension", number(), case()),
        );

        table.insert(
            PartOfSpeech::Verb,
            TableLayout::new("present", number(), Axis::all(Category::Person, vocab))
                .fix(Category::VForm, "present"),
        );
        table.insert(
            PartOfSpeech::Verb,
            TableLayout::new("future", number(), Axis::all(Category::Person, vocab))
                .fix(Category::VForm, "future"),
        );
        table.insert(
            PartOfSpeech::Verb,
            TableLayout::new(
                "imperative",
                number(),
                Axis::of(Category::Person, &["first", "second"]),
            )
            .fix(Category::VForm, "imperative"),
        );
        table.insert(
            PartOfSpeech::Verb,
            TableLayout::new("participle", number(), Axis::all(Category::Gender, vocab))
                .fix(Category::VForm, "participle"),
        );
        table.insert(
            PartOfSpeech::Verb,
            TableLayout::new("conditional", Axis::pseudo(), Axis::pseudo())
                .fix(Category::VForm, "conditional"),
        );
        table.insert(
            PartOfSpeech::Verb,
            TableLayout::new(
                "non-finite",
                Axis::pseudo(),
                Axis::of(Category::VForm, &["infinitive", "supine"]),
            ),
        );

        let genders: Vec<&str> = std::iter::once(AGENDER)
            .chain(vocab.values(Category::Gender).iter().copied())
            .collect();
        for degree in vocab.values(Category::Degree) {
            for gender in &genders {
                table.insert(
                    PartOfSpeech::Adjective,
                    TableLayout::new(format!("{gender} {degree}"), number(), case())
                        .fix(Category::Gender, *gender)
                        .fix(Category::Degree, *degree),
                );
            }
        }
        for pos in [PartOfSpeech::Pronoun, PartOfSpeech::Numeral] {
            for gender in &genders {
                table.insert(
                    pos,
                    TableLayout::new(*gender, number(), case()).fix(Category::Gender, *gender),
                );
            }
        }

        for pos in [
            PartOfSpeech::Adverb,
            PartOfSpeech::Preposition,
            PartOfSpeech::Conjunction,
            PartOfSpeech::Particle,
            PartOfSpeech::Interjection,
            PartOfSpeech::Abbreviation,
            PartOfSpeech::Residual,
        ] {
            table.insert(pos, TableLayout::new("forms", Axis::pseudo(), Axis::pseudo()));
        }
        table
    }

    /// Parse a layout file:
    ///
    /// ```json
    /// { "noun": [ { "name": "declension",
    ///               "columns": { "category": "number", "labels": ["singular", "dual", "plural"] },
    ///               "rows": { "labels": ["nominative", "genitive"] },
    ///               "fixed": {} } ] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let raw: HashMap<String, Vec<RawTable>> = serde_json::from_str(json)?;
        let mut table = Self::new();
        let mut parts: Vec<_> = raw.into_iter().collect();
        parts.sort_by(|a, b| a.0.cmp(&b.0));
        for (pos_name, layouts) in parts {
            let pos = PartOfSpeech::from_name(&pos_name)
                .ok_or(LayoutError::UnknownPartOfSpeech(pos_name))?;
            for raw in layouts {
                table.insert(pos, raw.validate()?);
            }
        }
        Ok(table)
    }
}

#[derive(Deserialize)]
struct RawAxis {
    #[serde(default)]
    category: Option<String>,
    labels: Vec<String>,
}

#[derive(Deserialize)]
struct RawTable {
    name: String,
    columns: RawAxis,
    rows: RawAxis,
    #[serde(default)]
    fixed: BTreeMap<String, String>,
}

impl RawTable {
    fn validate(self) -> Result<TableLayout, LayoutError> {
        let name = self.name;
        let category = |raw: &str| {
            Category::from_name(raw).ok_or_else(|| LayoutError::UnknownCategory {
                table: name.clone(),
                name: raw.to_string(),
            })
        };
        let axis = |raw: RawAxis, side: &'static str| -> Result<Axis, LayoutError> {
            if raw.labels.is_empty() {
                return Err(LayoutError::EmptyAxis {
                    table: name.clone(),
                    axis: side,
                });
            }
            Ok(Axis {
                category: raw.category.as_deref().map(category).transpose()?,
                labels: raw.labels,
            })
        };
        let columns = axis(self.columns, "column")?;
        let rows = axis(self.rows, "row")?;
        let fixed = self
            .fixed
            .iter()
            .map(|(k, v)| -> Result<(Category, String), LayoutError> {
                Ok((category(k.as_str())?, v.clone()))
            })
            .collect::<Result<BTreeMap<_, _>, LayoutError>>()?;
        Ok(TableLayout {
            name,
            columns,
            rows,
            fixed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layouts_cover_every_part_of_speech() {
        let table = LayoutTable::standard(Vocabulary::standard());
        assert!(table.unhandled().is_empty());
        assert_eq!(table.for_pos(PartOfSpeech::Noun).len(), 1);
        let verb: Vec<_> = table
            .for_pos(PartOfSpeech::Verb)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            verb,
            vec![
                "present",
                "future",
                "imperative",
                "participle",
                "conditional",
                "non-finite"
            ]
        );
        assert_eq!(table.for_pos(PartOfSpeech::Adjective).len(), 12);
        let pronoun = &table.for_pos(PartOfSpeech::Pronoun)[0];
        assert_eq!(pronoun.name, AGENDER);
        assert_eq!(
            pronoun.fixed.get(&Category::Gender).map(String::as_str),
            Some(AGENDER)
        );
    }

    #[test]
    fn pseudo_axis_is_a_single_form_label() {
        assert!(Axis::pseudo().is_pseudo());
        assert!(!Axis::new(["form", "digit"]).is_pseudo());
        assert!(!Axis::new(["singular"]).is_pseudo());
    }

    #[test]
    fn parses_json_layouts() {
        let json = r#"{
            "noun": [{
                "name": "animacy",
                "columns": { "category": "animate", "labels": ["yes", "no"] },
                "rows": { "labels": ["accusative"] },
                "fixed": { "number": "singular" }
            }]
        }"#;
        let table = LayoutTable::from_json(json).unwrap();
        let layout = &table.for_pos(PartOfSpeech::Noun)[0];
        assert_eq!(layout.columns.category, Some(Category::Animate));
        assert_eq!(layout.rows.category, None);
        assert_eq!(
            layout.fixed.get(&Category::Number).map(String::as_str),
            Some("singular")
        );
        assert!(table.for_pos(PartOfSpeech::Verb).is_empty());
        assert_eq!(table.unhandled().len(), PartOfSpeech::ALL.len() - 1);
    }

    #[test]
    fn rejects_unknown_names_and_empty_axes() {
        let bad_pos = r#"{ "gerund": [] }"#;
        assert!(matches!(
            LayoutTable::from_json(bad_pos),
            Err(LayoutError::UnknownPartOfSpeech(p)) if p == "gerund"
        ));
        let bad_category = r#"{ "noun": [{ "name": "t",
            "columns": { "category": "mood", "labels": ["x"] },
            "rows": { "labels": ["y"] } }] }"#;
        assert!(matches!(
            LayoutTable::from_json(bad_category),
            Err(LayoutError::UnknownCategory { name, .. }) if name == "mood"
        ));
        let empty = r#"{ "noun": [{ "name": "t",
            "columns": { "labels": [] }, "rows": { "labels": ["y"] } }] }"#;
        assert!(matches!(
            LayoutTable::from_json(empty),
            Err(LayoutError::EmptyAxis { axis: "column", .. })
        ));
        assert!(matches!(
            LayoutTable::from_json("not json"),
            Err(LayoutError::Json(_))
        ));
    }
}
