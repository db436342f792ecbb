//! Table assembly: fill a layout's cells with the representations whose
//! grammar name matches, prune empty rows and columns, annotate.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};
use sloleks_types::{
    Category, Classification, Entry, GrammarName, RepRef, Vocabulary, WordForm,
};
use tracing::{debug, warn};

use crate::annotate::{AnnotatedForm, annotate, common_prefix};
use crate::layout::{Axis, LayoutTable, PSEUDO_LABEL, TableLayout};

/// What a word form must carry to land in a cell.
///
/// Key categories go into a [`GrammarName`] matched as a subset of the form's
/// name; any other category (animacy, definiteness, ...) is checked against
/// the form's raw features.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CellKey {
    grammar_name: GrammarName,
    features: Vec<(Category, String)>,
}

impl CellKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, category: Category, value: &str) {
        if !self.grammar_name.set(category, value) {
            self.features.retain(|(c, _)| *c != category);
            self.features.push((category, value.to_string()));
        }
    }

    pub fn grammar_name(&self) -> &GrammarName {
        &self.grammar_name
    }

    pub fn matches(&self, form: &WordForm) -> bool {
        self.grammar_name.is_satisfied_by(form.grammar_name())
            && self
                .features
                .iter()
                .all(|(c, v)| form.grammatical_features().is(c.name(), v))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grammar_name)?;
        for (category, value) in &self.features {
            write!(f, " {category}={value}")?;
        }
        Ok(())
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which category a label constrains, if any.
///
/// The axis category wins over classification, so a table can place bare
/// `yes`/`no` labels. Ambiguous labels without that context, pseudo labels
/// and unknown values constrain nothing.
pub fn resolve_label(axis: &Axis, label: &str, vocab: &Vocabulary) -> Option<Category> {
    if label == PSEUDO_LABEL {
        return None;
    }
    if let Some(category) = axis.category {
        return Some(category);
    }
    match vocab.classify(label) {
        Some(Classification::Unique(category)) => Some(category),
        Some(Classification::Ambiguous(owners)) => {
            debug!(label, ?owners, "ambiguous axis label without a category; ignored");
            None
        }
        None => {
            debug!(label, "unknown axis label; ignored");
            None
        }
    }
}

/// Cell key for one interior cell of `layout`.
pub fn cell_key(layout: &TableLayout, row: &str, column: &str, vocab: &Vocabulary) -> CellKey {
    let mut key = CellKey::new();
    for (category, value) in &layout.fixed {
        key.require(*category, value);
    }
    if let Some(category) = resolve_label(&layout.rows, row, vocab) {
        key.require(category, row);
    }
    if let Some(category) = resolve_label(&layout.columns, column, vocab) {
        key.require(category, column);
    }
    key
}

#[derive(Clone, Debug)]
pub struct Slot {
    pub key: CellKey,
    pub refs: Vec<RepRef>,
}

/// Matrix of slots with its row and column labels.
#[derive(Clone, Debug)]
pub struct Grid {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub slots: Vec<Vec<Slot>>,
}

impl Grid {
    /// Fill every cell of `layout` from `entry`, in source order.
    pub fn fill(entry: &Entry, layout: &TableLayout, vocab: &Vocabulary) -> Self {
        let slots = layout
            .rows
            .labels
            .iter()
            .map(|row| {
                layout
                    .columns
                    .labels
                    .iter()
                    .map(|column| {
                        let key = cell_key(layout, row, column, vocab);
                        let refs = entry
                            .all_representations()
                            .filter(|(at, _)| key.matches(&entry.all_forms()[at.form]))
                            .map(|(at, _)| at)
                            .collect();
                        Slot { key, refs }
                    })
                    .collect()
            })
            .collect();
        Self {
            rows: layout.rows.labels.clone(),
            columns: layout.columns.labels.clone(),
            slots,
        }
    }

    /// Drop all-empty rows, then all-empty columns of what remains. Returns
    /// whether anything was removed; a second call never removes anything.
    pub fn prune(&mut self) -> bool {
        let before = (self.rows.len(), self.columns.len());

        let keep_rows: Vec<bool> = self
            .slots
            .iter()
            .map(|row| row.iter().any(|slot| !slot.refs.is_empty()))
            .collect();
        retain_by(&mut self.rows, &keep_rows);
        retain_by(&mut self.slots, &keep_rows);

        let keep_columns: Vec<bool> = (0..self.columns.len())
            .map(|col| self.slots.iter().any(|row| !row[col].refs.is_empty()))
            .collect();
        retain_by(&mut self.columns, &keep_columns);
        for row in &mut self.slots {
            retain_by(row, &keep_columns);
        }

        before != (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn refs(&self) -> impl Iterator<Item = RepRef> + '_ {
        self.slots.iter().flatten().flat_map(|s| s.refs.iter().copied())
    }
}

fn retain_by<T>(items: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter();
    items.retain(|_| flags.next().copied().unwrap_or(false));
}

#[derive(Clone, Debug, Serialize)]
pub struct Cell {
    pub key: CellKey,
    pub forms: Vec<AnnotatedForm>,
}

/// One rendered table after pruning.
#[derive(Clone, Debug, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    pub column_headers: bool,
    pub row_headers: bool,
    pub cells: Vec<Vec<Cell>>,
    /// Representations placed for the first time by this table.
    pub added: usize,
}

/// Every table of one entry plus completeness counts.
#[derive(Clone, Debug, Serialize)]
pub struct InflectionSection {
    pub lemma: String,
    pub part_of_speech: String,
    pub tables: Vec<Table>,
    /// Distinct representations shown in at least one table.
    pub placed: usize,
    /// Representations of the entry.
    pub total: usize,
}

impl InflectionSection {
    pub fn unplaced(&self) -> usize {
        self.total - self.placed
    }

    pub fn is_complete(&self) -> bool {
        self.placed == self.total
    }
}

/// Build the inflection section of `entry`.
///
/// A part of speech without layouts yields no tables. Representations that
/// fit no cell are left out and reported as a completeness warning.
pub fn assemble(entry: &Entry, layouts: &LayoutTable, vocab: &Vocabulary) -> InflectionSection {
    let total = entry.representation_count();
    let mut section = InflectionSection {
        lemma: entry.lemma().to_string(),
        part_of_speech: entry.part_of_speech().to_string(),
        tables: Vec::new(),
        placed: 0,
        total,
    };
    let layouts: &[TableLayout] = match entry.pos() {
        Some(pos) => layouts.for_pos(pos),
        None => &[],
    };
    if layouts.is_empty() {
        debug!(
            lemma = entry.lemma(),
            part_of_speech = entry.part_of_speech(),
            "no table layout for part of speech"
        );
        return section;
    }

    let stem = common_prefix(entry.non_weird_forms());
    let mut placed: HashSet<RepRef> = HashSet::with_capacity(total);
    for layout in layouts {
        let mut grid = Grid::fill(entry, layout, vocab);
        grid.prune();
        if grid.is_empty() {
            continue;
        }
        let added = grid.refs().filter(|at| placed.insert(*at)).count();
        section.tables.push(render_grid(entry, layout, grid, &stem, added));
    }
    section.placed = placed.len();

    if !section.is_complete() {
        warn!(
            lemma = entry.lemma(),
            placed = section.placed,
            total,
            "{} representation(s) fit no table cell",
            section.unplaced()
        );
    }
    section
}

fn render_grid(entry: &Entry, layout: &TableLayout, grid: Grid, stem: &str, added: usize) -> Table {
    let cells = grid
        .slots
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|slot| Cell {
                    forms: slot
                        .refs
                        .iter()
                        .filter_map(|at| annotate(entry, *at, stem))
                        .collect(),
                    key: slot.key,
                })
                .collect()
        })
        .collect();
    Table {
        name: layout.name.clone(),
        column_headers: !layout.columns.is_pseudo(),
        row_headers: !layout.rows.is_pseudo(),
        columns: grid.columns,
        rows: grid.rows,
        cells,
        added,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sloleks_types::{FeatureSet, PartOfSpeech, Representation};

    fn noun(forms: &[(&str, &str, &str)]) -> Entry {
        let forms = forms
            .iter()
            .map(|(case, number, surface)| {
                WordForm::new(
                    Some(PartOfSpeech::Noun),
                    None,
                    [("case", *case), ("number", *number)].into_iter().collect(),
                    vec![Representation::new(*surface)],
                )
            })
            .collect();
        Entry::new("hiša", "noun", FeatureSet::new(), forms)
    }

    #[test]
    fn table_context_resolves_ambiguous_labels() {
        let vocab = Vocabulary::standard();
        let plain = Axis::new(["yes"]);
        assert_eq!(resolve_label(&plain, "yes", vocab), None);
        let animate = Axis::of(Category::Animate, &["yes", "no"]);
        assert_eq!(resolve_label(&animate, "yes", vocab), Some(Category::Animate));
        assert_eq!(resolve_label(&plain, "dual", vocab), Some(Category::Number));
        assert_eq!(resolve_label(&Axis::pseudo(), PSEUDO_LABEL, vocab), None);
    }

    #[test]
    fn cell_keys_combine_fixed_and_axis_features() {
        let vocab = Vocabulary::standard();
        let layout = TableLayout::new(
            "present",
            Axis::all(Category::Number, vocab),
            Axis::all(Category::Person, vocab),
        )
        .fix(Category::VForm, "present");
        let key = cell_key(&layout, "third", "plural", vocab);
        assert_eq!(key.to_string(), "present_third_plural");

        let animacy = TableLayout::new(
            "animacy",
            Axis::of(Category::Animate, &["yes", "no"]),
            Axis::all(Category::Case, vocab),
        );
        let key = cell_key(&animacy, "accusative", "no", vocab);
        assert_eq!(key.to_string(), "accusative animate=no");
    }

    #[test]
    fn pruning_is_a_single_idempotent_pass() {
        let vocab = Vocabulary::standard();
        let entry = noun(&[
            ("nominative", "singular", "hiša"),
            ("genitive", "plural", "hiš"),
        ]);
        let layout = TableLayout::new(
            "declension",
            Axis::all(Category::Number, vocab),
            Axis::all(Category::Case, vocab),
        );
        let mut grid = Grid::fill(&entry, &layout, vocab);
        assert_eq!((grid.rows.len(), grid.columns.len()), (6, 3));
        assert!(grid.prune());
        assert_eq!(grid.rows, vec!["nominative", "genitive"]);
        assert_eq!(grid.columns, vec!["singular", "plural"]);
        let snapshot = (grid.rows.clone(), grid.columns.clone());
        assert!(!grid.prune());
        assert_eq!((grid.rows.clone(), grid.columns.clone()), snapshot);
        assert_eq!(grid.refs().count(), 2);
    }

    #[test]
    fn every_row_and_column_left_after_pruning_has_content() {
        let vocab = Vocabulary::standard();
        let entry = noun(&[
            ("dative", "dual", "hišama"),
            ("locative", "plural", "hišah"),
        ]);
        let layout = TableLayout::new(
            "declension",
            Axis::all(Category::Number, vocab),
            Axis::all(Category::Case, vocab),
        );
        let mut grid = Grid::fill(&entry, &layout, vocab);
        grid.prune();
        for row in &grid.slots {
            assert!(row.iter().any(|s| !s.refs.is_empty()));
        }
        for col in 0..grid.columns.len() {
            assert!(grid.slots.iter().any(|row| !row[col].refs.is_empty()));
        }
    }

    #[test]
    fn unknown_part_of_speech_yields_no_tables() {
        let entry = Entry::new(
            "x",
            "gerund",
            FeatureSet::new(),
            vec![WordForm::new(
                None,
                None,
                FeatureSet::new(),
                vec![Representation::new("x")],
            )],
        );
        let vocab = Vocabulary::standard();
        let section = assemble(&entry, &LayoutTable::standard(vocab), vocab);
        assert!(section.tables.is_empty());
        assert_eq!(section.total, 1);
        assert_eq!(section.unplaced(), 1);
    }

    #[test]
    fn flat_tables_hide_pseudo_headers() {
        let vocab = Vocabulary::standard();
        let entry = Entry::new(
            "zelo",
            "adverb",
            FeatureSet::new(),
            vec![WordForm::new(
                Some(PartOfSpeech::Adverb),
                None,
                [("degree", "positive")].into_iter().collect(),
                vec![Representation::new("zelo").with_frequency(10)],
            )],
        );
        let section = assemble(&entry, &LayoutTable::standard(vocab), vocab);
        assert_eq!(section.tables.len(), 1);
        let table = &section.tables[0];
        assert!(!table.column_headers);
        assert!(!table.row_headers);
        assert_eq!(table.cells[0][0].forms[0].surface_form, "zelo");
        assert!(section.is_complete());
    }
}
