//! Sloleks entries rendered as HTML inflection tables.
//!
//! A [`Catalog`] ties a loaded [`Lexicon`], the optional explanatory
//! dictionary and the axis layouts together. It builds per-lemma records for
//! the batch sinks in [`sink`] and the preview service in [`handlers`].

use std::collections::HashSet;

use anyhow::Result;
use sloleks_db::{ExplanatoryDictionary, Lexicon, SskjEntry};
use sloleks_inflect::{LayoutTable, assemble};
use sloleks_types::Vocabulary;
use tracing::{info, warn};

pub mod handlers;
pub mod render;
pub mod sink;

pub use handlers::{AppState, router};
pub use render::{RenderedEntry, render_lemma_page};
pub use sink::{EntrySink, HtmlDirSink, JsonLinesSink};

/// Every homograph of a lemma with its tables, plus matching definitions.
pub struct LemmaRecord<'a> {
    pub lemma: &'a str,
    pub entries: Vec<RenderedEntry<'a>>,
    pub definitions: Vec<&'a SskjEntry>,
}

impl LemmaRecord<'_> {
    pub fn incomplete(&self) -> usize {
        self.entries
            .iter()
            .filter(|r| !r.section.is_complete())
            .count()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExportSummary {
    pub lemmas: usize,
    pub entries: usize,
    /// Entries with at least one representation outside every table.
    pub incomplete: usize,
}

pub struct Catalog {
    lexicon: Lexicon,
    definitions: Option<ExplanatoryDictionary>,
    layouts: LayoutTable,
    vocab: &'static Vocabulary,
}

impl Catalog {
    pub fn new(lexicon: Lexicon, layouts: LayoutTable) -> Self {
        Self {
            lexicon,
            definitions: None,
            layouts,
            vocab: Vocabulary::standard(),
        }
    }

    pub fn with_definitions(mut self, definitions: ExplanatoryDictionary) -> Self {
        self.definitions = Some(definitions);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Distinct lemmas in load order.
    pub fn lemmas(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.lexicon
            .entries()
            .iter()
            .map(|e| e.lemma())
            .filter(|lemma| seen.insert(*lemma))
            .collect()
    }

    /// Assemble every entry of `lemma`; `None` when the lemma is unknown.
    pub fn record<'a>(&'a self, lemma: &'a str) -> Option<LemmaRecord<'a>> {
        let entries: Vec<RenderedEntry<'a>> = self
            .lexicon
            .lookup(lemma)
            .map(|entry| RenderedEntry {
                entry,
                section: assemble(entry, &self.layouts, self.vocab),
            })
            .collect();
        if entries.is_empty() {
            return None;
        }
        let definitions = self
            .definitions
            .as_ref()
            .map(|d| d.lookup(lemma).collect())
            .unwrap_or_default();
        Some(LemmaRecord {
            lemma,
            entries,
            definitions,
        })
    }

    /// Full HTML page for `lemma`.
    pub fn page(&self, lemma: &str) -> Option<String> {
        self.record(lemma)
            .map(|r| render_lemma_page(r.lemma, &r.entries, &r.definitions))
    }

    /// Feed every lemma to `sink`, then finish it.
    pub fn export(&self, sink: &mut dyn EntrySink) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();
        for lemma in self.lemmas() {
            let Some(record) = self.record(lemma) else {
                continue;
            };
            summary.lemmas += 1;
            summary.entries += record.entries.len();
            summary.incomplete += record.incomplete();
            sink.accept(&record)?;
        }
        sink.finish()?;
        if summary.incomplete > 0 {
            warn!(
                "{} of {} entries have representations outside every table",
                summary.incomplete, summary.entries
            );
        }
        info!(
            "exported {} lemmas ({} entries)",
            summary.lemmas, summary.entries
        );
        Ok(summary)
    }
}
