//! Inflection tables for Sloleks entries.
//!
//! Given an [`Entry`](sloleks_types::Entry) and the axis layouts for its part
//! of speech, every interior cell of every table gets a cell key (row label,
//! column label and the table's fixed features), and is filled with each
//! representation whose word form's grammar name contains that key. Empty
//! rows and then empty columns are dropped, and what remains is annotated
//! for display. The crate only depends on the record model; loading lives in
//! `sloleks-db`.
//!
//! # Example
//! ```
//! use sloleks_inflect::{LayoutTable, assemble};
//! use sloleks_types::{Entry, FeatureSet, PartOfSpeech, Representation, Vocabulary, WordForm};
//!
//! let vocab = Vocabulary::standard();
//! let forms = vec![
//!     WordForm::new(
//!         Some(PartOfSpeech::Noun),
//!         None,
//!         [("case", "nominative"), ("number", "singular")].into_iter().collect(),
//!         vec![Representation::new("hiša").with_frequency(120)],
//!     ),
//!     WordForm::new(
//!         Some(PartOfSpeech::Noun),
//!         None,
//!         [("case", "genitive"), ("number", "plural")].into_iter().collect(),
//!         vec![Representation::new("hiš").with_frequency(0)],
//!     ),
//! ];
//! let entry = Entry::new("hiša", "noun", FeatureSet::new(), forms);
//!
//! let section = assemble(&entry, &LayoutTable::standard(vocab), vocab);
//! let table = &section.tables[0];
//! assert_eq!(table.rows, vec!["nominative", "genitive"]);
//! assert_eq!(table.columns, vec!["singular", "plural"]);
//! assert!(table.cells[1][1].forms[0].deemphasized);
//! ```

mod annotate;
mod assemble;
mod layout;

pub use annotate::{AnnotatedForm, Segment, annotate, common_prefix, stem_segments};
pub use assemble::{
    Cell, CellKey, Grid, InflectionSection, Slot, Table, assemble, cell_key, resolve_label,
};
pub use layout::{Axis, LayoutError, LayoutTable, PSEUDO_LABEL, TableLayout};
