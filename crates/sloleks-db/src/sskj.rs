//! Reader for saved SSKJ (explanatory dictionary) result pages.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::{LoadMode, SourceText, source_files};

static ENTRY: LazyLock<Selector> = LazyLock::new(|| selector("div.list-group-item.entry"));
static SUB_WORD: LazyLock<Selector> = LazyLock::new(|| selector("ul.manual"));
static HEADWORD: LazyLock<Selector> = LazyLock::new(|| selector("span.font_xlarge"));
static HEADWORD_FALLBACK: LazyLock<Selector> = LazyLock::new(|| selector("span.color_orange"));
static EXPLANATION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[data-group~="explanation"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// One headword (or sub-word) of the explanatory dictionary.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SskjEntry {
    /// Headword with accent marks stripped, carons kept.
    pub lemma: String,
    /// Headword as printed, with accent marks.
    pub accentuation: String,
    pub definitions: Vec<String>,
    pub sub_words: Vec<SskjEntry>,
}

/// Parse every entry on a saved result page.
///
/// Sub-words listed under an entry are returned both nested in their parent
/// and as entries of their own.
pub fn parse_sskj_html(html: &str) -> Vec<SskjEntry> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();
    for entry in document.select(&ENTRY) {
        let sub_words: Vec<SskjEntry> = entry
            .select(&SUB_WORD)
            .filter_map(|ul| parse_block(ul, None))
            .collect();
        let Some(head) = parse_block(entry, Some(sub_words.clone())) else {
            continue;
        };
        out.push(head);
        out.extend(sub_words);
    }
    out
}

/// Parse one block. With `sub_words` set, the block is a whole entry and any
/// `ul.manual` content inside it is ignored.
fn parse_block(block: ElementRef<'_>, sub_words: Option<Vec<SskjEntry>>) -> Option<SskjEntry> {
    let top_level = sub_words.is_some();
    let keep = |el: &ElementRef<'_>| !top_level || !inside_sub_word(el, &block);

    let accentuation = block
        .select(&HEADWORD)
        .find(keep)
        .or_else(|| block.select(&HEADWORD_FALLBACK).find(keep))
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|a| !a.is_empty());
    let Some(accentuation) = accentuation else {
        warn!("dictionary block without a headword");
        return None;
    };

    let definitions = block
        .select(&EXPLANATION)
        .filter(keep)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|d| !d.is_empty())
        .collect();

    Some(SskjEntry {
        lemma: de_critic(&accentuation),
        accentuation,
        definitions,
        sub_words: sub_words.unwrap_or_default(),
    })
}

fn inside_sub_word(el: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(|node| node.value().as_element())
        .any(|e| e.name() == "ul" && e.classes().any(|c| c == "manual"))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip accent marks, keeping the carons of č, š and ž.
pub fn de_critic(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for ch in word.chars() {
        if matches!(ch, 'č' | 'š' | 'ž' | 'Č' | 'Š' | 'Ž') {
            out.push(ch);
            continue;
        }
        out.extend(
            std::iter::once(ch)
                .nfd()
                .filter(|c| !unicode_normalization::char::is_combining_mark(*c)),
        );
    }
    out
}

/// Explanatory dictionary entries indexed by lemma.
#[derive(Debug, Default)]
pub struct ExplanatoryDictionary {
    entries: Vec<SskjEntry>,
    by_lemma: HashMap<String, Vec<usize>>,
}

impl ExplanatoryDictionary {
    /// Load a saved page, or every `*.html` page of a directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Owned)
    }

    pub fn load_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref();
        let mut dictionary = Self::default();
        for file in source_files(path, "html")? {
            let text = SourceText::load(&file, mode)?;
            let parsed = parse_sskj_html(text.as_str()?);
            if parsed.is_empty() {
                warn!("no dictionary entries in {}", file.display());
            }
            dictionary.extend(parsed);
        }
        info!(
            "loaded {} dictionary entries from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn from_html(html: &str) -> Self {
        let mut dictionary = Self::default();
        dictionary.extend(parse_sskj_html(html));
        dictionary
    }

    fn extend(&mut self, entries: Vec<SskjEntry>) {
        for entry in entries {
            self.by_lemma
                .entry(entry.lemma.clone())
                .or_default()
                .push(self.entries.len());
            self.entries.push(entry);
        }
    }

    pub fn lookup(&self, lemma: &str) -> impl Iterator<Item = &SskjEntry> {
        self.by_lemma
            .get(lemma)
            .into_iter()
            .flatten()
            .map(|idx| &self.entries[*idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
