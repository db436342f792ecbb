//! Output sinks for batch export.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use sloleks_inflect::InflectionSection;
use sloleks_types::Entry;
use tracing::warn;

use crate::LemmaRecord;
use crate::render::render_lemma_page;

/// Receives every lemma of an export, in load order.
pub trait EntrySink {
    fn accept(&mut self, record: &LemmaRecord<'_>) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    entry: &'a Entry,
    section: &'a InflectionSection,
}

/// One JSON object per entry and line: the entry itself and its assembled
/// tables.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EntrySink for JsonLinesSink<W> {
    fn accept(&mut self, record: &LemmaRecord<'_>) -> Result<()> {
        for rendered in &record.entries {
            let line = JsonLine {
                entry: rendered.entry,
                section: &rendered.section,
            };
            serde_json::to_writer(&mut self.writer, &line)
                .with_context(|| format!("serialize {}", record.lemma))?;
            self.writer.write_all(b"\n")?;
            self.written += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("flush json lines")
    }
}

/// One `<lemma>.html` page per lemma under a directory. Lemmas whose file
/// names collide get a `-2`, `-3`, ... suffix.
pub struct HtmlDirSink {
    dir: PathBuf,
    written: usize,
    pages: HashMap<String, String>,
    taken: HashSet<String>,
}

impl HtmlDirSink {
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        Ok(Self {
            dir,
            written: 0,
            pages: HashMap::new(),
            taken: HashSet::new(),
        })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Where the page of `lemma` was, or would be, written.
    pub fn page_path(&self, lemma: &str) -> PathBuf {
        let stem = match self.pages.get(lemma) {
            Some(stem) => stem.clone(),
            None => file_stem(lemma),
        };
        self.dir.join(format!("{stem}.html"))
    }

    fn assign(&mut self, lemma: &str) -> PathBuf {
        if !self.pages.contains_key(lemma) {
            let base = file_stem(lemma);
            let mut stem = base.clone();
            let mut n = 1;
            while !self.taken.insert(stem.clone()) {
                n += 1;
                stem = format!("{base}-{n}");
            }
            if n > 1 {
                warn!("page for {lemma:?} collides with another lemma; writing {stem}.html");
            }
            self.pages.insert(lemma.to_string(), stem);
        }
        self.page_path(lemma)
    }
}

impl EntrySink for HtmlDirSink {
    fn accept(&mut self, record: &LemmaRecord<'_>) -> Result<()> {
        let path = self.assign(record.lemma);
        let html = render_lemma_page(record.lemma, &record.entries, &record.definitions);
        fs::write(&path, html).with_context(|| format!("write {}", path.display()))?;
        self.written += 1;
        Ok(())
    }
}

/// Lemma as a file name: path separators, control characters and a leading
/// dot become `_`.
fn file_stem(lemma: &str) -> String {
    let mut stem: String = lemma
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.starts_with('.') {
        stem.replace_range(..1, "_");
    }
    if stem.is_empty() {
        stem.push('_');
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_are_safe() {
        assert_eq!(file_stem("hiša"), "hiša");
        assert_eq!(file_stem("a/b"), "a_b");
        assert_eq!(file_stem("..etc"), "_.etc");
        assert_eq!(file_stem(""), "_");
        assert_eq!(file_stem("t.i."), "t.i.");
    }
}
