//! Load Sloleks lexicon dumps and saved SSKJ dictionary pages.
//!
//! A lexicon path is either one XML file or a directory of `*.xml` files,
//! read in file-name order. Each `<entry>` becomes an immutable
//! [`sloleks_types::Entry`]; records that cannot be built are logged, counted
//! in the [`IngestReport`] and skipped without stopping the batch. Callers
//! choose between memory-mapped files or owned buffers via [`LoadMode`].
//!
//! # Example
//! ```no_run
//! use sloleks_db::{Lexicon, LoadMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let lexicon = Lexicon::load_with_mode("/path/to/Sloleks.3.0", LoadMode::Mmap)?;
//! for entry in lexicon.lookup("hiša") {
//!     println!("{} ({}): {} forms", entry.lemma(), entry.part_of_speech(), entry.all_forms().len());
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use memmap2::Mmap;
use sloleks_types::Entry;
use tracing::{info, warn};

mod source;
pub mod sskj;
mod xml;

pub use source::{
    EntryReader, EntryRecord, IssueKind, RecordError, RepresentationIssue, SourceError,
    derive_norms,
};
pub use sskj::{ExplanatoryDictionary, SskjEntry, de_critic, parse_sskj_html};

/// Strategy for reading source files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file.
    #[default]
    Mmap,
    /// Read each file into an owned buffer.
    Owned,
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mmap" => Ok(LoadMode::Mmap),
            "owned" => Ok(LoadMode::Owned),
            other => Err(format!("unknown load mode {other:?} (expected mmap or owned)")),
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

/// Bytes of one source file, validated as UTF-8 on access.
pub(crate) struct SourceText {
    path: PathBuf,
    buffer: Buffer,
}

impl SourceText {
    pub(crate) fn load(path: &Path, mode: LoadMode) -> Result<Self> {
        let buffer = match mode {
            LoadMode::Mmap => {
                let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
                unsafe { Mmap::map(&file) }
                    .map(Buffer::Mmap)
                    .with_context(|| format!("mmap {}", path.display()))?
            }
            LoadMode::Owned => {
                let mut file =
                    File::open(path).with_context(|| format!("open {}", path.display()))?;
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)
                    .with_context(|| format!("read {}", path.display()))?;
                Buffer::Owned(buf)
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            buffer,
        })
    }

    pub(crate) fn as_str(&self) -> Result<&str> {
        let bytes = match &self.buffer {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        };
        std::str::from_utf8(bytes).with_context(|| format!("{} is not utf-8", self.path.display()))
    }
}

/// `path` itself when it is a file, otherwise its `*.{extension}` children
/// sorted by name.
pub(crate) fn source_files(path: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("missing source: {}", path.display());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for dirent in fs::read_dir(path).with_context(|| format!("list {}", path.display()))? {
        let file = dirent.with_context(|| format!("list {}", path.display()))?.path();
        let matches = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && file.is_file() {
            files.push(file);
        }
    }
    files.sort();
    if files.is_empty() {
        warn!("no *.{} files in {}", extension, path.display());
    }
    Ok(files)
}

/// Counts and problems collected while loading a lexicon.
#[derive(Clone, Debug, Default)]
pub struct IngestReport {
    pub files: usize,
    pub records_seen: usize,
    pub entries_built: usize,
    pub skipped: Vec<RecordError>,
    pub issues: Vec<RepresentationIssue>,
}

impl IngestReport {
    pub fn records_skipped(&self) -> usize {
        self.skipped.len()
    }

    pub fn log_summary(&self) {
        info!(
            "ingested {} of {} records from {} file(s); {} skipped, {} representation issue(s)",
            self.entries_built,
            self.records_seen,
            self.files,
            self.records_skipped(),
            self.issues.len()
        );
    }
}

/// All entries of a lexicon, with lookup by lemma.
pub struct Lexicon {
    entries: Vec<Entry>,
    by_lemma: HashMap<String, Vec<usize>>,
    report: IngestReport,
}

impl Lexicon {
    /// Load from a file or directory, memory-mapping the files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Mmap)
    }

    pub fn load_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref();
        let mut lexicon = Self::empty();
        for file in source_files(path, "xml")? {
            let text = SourceText::load(&file, mode)?;
            lexicon
                .ingest(text.as_str()?)
                .with_context(|| format!("parse {}", file.display()))?;
            lexicon.report.files += 1;
        }
        lexicon.report.log_summary();
        Ok(lexicon)
    }

    /// Build from one in-memory XML document.
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        let mut lexicon = Self::empty();
        lexicon.ingest(xml)?;
        lexicon.report.files = 1;
        Ok(lexicon)
    }

    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            by_lemma: HashMap::new(),
            report: IngestReport::default(),
        }
    }

    fn ingest(&mut self, xml: &str) -> Result<(), SourceError> {
        for record in EntryReader::new(xml) {
            match record {
                Ok(EntryRecord { entry, issues }) => {
                    self.report.records_seen += 1;
                    self.report.entries_built += 1;
                    self.report.issues.extend(issues);
                    self.by_lemma
                        .entry(entry.lemma().to_string())
                        .or_default()
                        .push(self.entries.len());
                    self.entries.push(entry);
                }
                Err(SourceError::Record { position, error }) => {
                    self.report.records_seen += 1;
                    warn!("skipping record {position}: {error}");
                    self.report.skipped.push(error);
                }
                Err(err @ SourceError::Xml(_)) => return Err(err),
            }
        }
        Ok(())
    }

    /// Entries in load order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Every entry with this lemma (homographs share a lemma).
    pub fn lookup(&self, lemma: &str) -> impl Iterator<Item = &Entry> {
        self.by_lemma
            .get(lemma)
            .into_iter()
            .flatten()
            .map(|idx| &self.entries[*idx])
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.by_lemma.contains_key(lemma)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn lemma_count(&self) -> usize {
        self.by_lemma.len()
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }
}
