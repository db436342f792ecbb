//! Turns Sloleks `<entry>` elements into [`Entry`] records.
//!
//! Every record is parsed in isolation: a record without a lemma or part of
//! speech is reported and skipped, a representation with an unreadable
//! frequency is dropped, and the reader moves on to the next `<entry>`.

use std::collections::BTreeMap;
use std::fmt;

use sloleks_types::{Entry, FeatureSet, GrammarName, PartOfSpeech, Representation, WordForm};
use thiserror::Error;
use tracing::{debug, warn};

use crate::xml::{SubtreeReader, XmlNode};

/// Fatal problems with a single `<entry>`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RecordError {
    #[error("entry has no lemma")]
    MissingLemma,
    #[error("entry {lemma:?} has no part of speech")]
    MissingPartOfSpeech { lemma: String },
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The document itself is malformed; nothing after this point is read.
    #[error("xml syntax: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("record {position}: {error}")]
    Record {
        position: usize,
        #[source]
        error: RecordError,
    },
}

/// Recoverable problem with one representation of one word form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepresentationIssue {
    pub lemma: String,
    pub grammar_name: String,
    pub surface_form: Option<String>,
    pub kind: IssueKind,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum IssueKind {
    /// Representation dropped.
    #[error("malformed frequency {0:?}")]
    MalformedFrequency(String),
    /// Representation kept with an unknown frequency.
    #[error("missing frequency")]
    MissingFrequency,
    /// Representation dropped.
    #[error("orthography without a surface form")]
    MissingSurfaceForm,
    /// That pronunciation string omitted.
    #[error("pronunciation without a script")]
    PronunciationWithoutScript,
}

impl fmt::Display for RepresentationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.lemma, self.grammar_name)?;
        if let Some(surface) = &self.surface_form {
            write!(f, " {surface:?}")?;
        }
        write!(f, ": {}", self.kind)
    }
}

/// One successfully built entry with the issues met while building it.
#[derive(Debug)]
pub struct EntryRecord {
    pub entry: Entry,
    pub issues: Vec<RepresentationIssue>,
}

/// Streams entries out of one lexicon document.
///
/// Yields `Err(SourceError::Record { .. })` for a skipped record and keeps
/// going; after `Err(SourceError::Xml(..))` the iterator is exhausted.
pub struct EntryReader<'a> {
    inner: SubtreeReader<'a>,
    position: usize,
    done: bool,
}

impl<'a> EntryReader<'a> {
    pub fn new(xml: &'a str) -> Self {
        Self {
            inner: SubtreeReader::new(xml, "entry"),
            position: 0,
            done: false,
        }
    }
}

impl Iterator for EntryReader<'_> {
    type Item = Result<EntryRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next_subtree() {
            Ok(Some(node)) => {
                let position = self.position;
                self.position += 1;
                Some(parse_entry(&node).map_err(|error| SourceError::Record { position, error }))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(SourceError::Xml(err)))
            }
        }
    }
}

fn parse_entry(node: &XmlNode) -> Result<EntryRecord, RecordError> {
    let lemma = node
        .find("lemma")
        .map(XmlNode::text)
        .filter(|l| !l.is_empty())
        .ok_or(RecordError::MissingLemma)?;
    let part_of_speech = node
        .find("category")
        .map(XmlNode::text)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| RecordError::MissingPartOfSpeech {
            lemma: lemma.to_string(),
        })?
        .to_ascii_lowercase();
    let pos = PartOfSpeech::from_name(&part_of_speech);
    if pos.is_none() {
        debug!(lemma, part_of_speech = %part_of_speech, "unrecognised part of speech");
    }

    let lemma_features = node
        .path(&["head", "grammar"])
        .map(grammar_features)
        .unwrap_or_default();

    let mut issues = Vec::new();
    let forms = node
        .descendants("wordForm")
        .into_iter()
        .map(|wf| parse_word_form(wf, lemma, pos, &mut issues))
        .collect();

    Ok(EntryRecord {
        entry: Entry::new(lemma, part_of_speech, lemma_features, forms),
        issues,
    })
}

fn grammar_features(node: &XmlNode) -> FeatureSet {
    node.children("grammarFeature")
        .filter_map(|f| f.attr("name").map(|name| (name, f.text())))
        .collect()
}

fn parse_word_form(
    node: &XmlNode,
    lemma: &str,
    pos: Option<PartOfSpeech>,
    issues: &mut Vec<RepresentationIssue>,
) -> WordForm {
    let msd = node
        .child("msd")
        .map(XmlNode::text)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let features = grammar_features(node);
    let grammar_name = GrammarName::from_features(&features).to_string();

    let orthographies = node.descendants("orthography");
    let accentuations = node.descendants("accentuation");
    let pronunciations = node.descendants("pronunciation");
    let accent_share = blocks_per_orthography(orthographies.len(), accentuations.len());
    let pron_share = blocks_per_orthography(orthographies.len(), pronunciations.len());

    let mut representations = Vec::with_capacity(orthographies.len());
    for (idx, orthography) in orthographies.iter().enumerate() {
        let mut issue = |surface_form: Option<&str>, kind: IssueKind| {
            let issue = RepresentationIssue {
                lemma: lemma.to_string(),
                grammar_name: grammar_name.clone(),
                surface_form: surface_form.map(str::to_string),
                kind,
            };
            warn!("{issue}");
            issues.push(issue);
        };

        let Some(surface) = orthography
            .child("form")
            .map(XmlNode::text)
            .filter(|s| !s.is_empty())
        else {
            issue(None, IssueKind::MissingSurfaceForm);
            continue;
        };

        let frequency = match frequency_text(orthography) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(freq) => Some(freq),
                Err(_) => {
                    issue(Some(surface), IssueKind::MalformedFrequency(raw.to_string()));
                    continue;
                }
            },
            None => {
                issue(Some(surface), IssueKind::MissingFrequency);
                None
            }
        };

        let accentuations = share(&accentuations, idx, accent_share)
            .iter()
            .flat_map(|block| block.descendants("form"))
            .map(XmlNode::text)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();

        let mut pronunciation: BTreeMap<String, String> = BTreeMap::new();
        for form in share(&pronunciations, idx, pron_share)
            .iter()
            .flat_map(|block| block.descendants("form"))
        {
            let text = form.text();
            let Some(script) = form.attr("script").filter(|s| !s.is_empty()) else {
                issue(Some(surface), IssueKind::PronunciationWithoutScript);
                continue;
            };
            if text.is_empty() {
                continue;
            }
            pronunciation
                .entry(script.to_string())
                .and_modify(|existing| {
                    existing.push('\n');
                    existing.push_str(text);
                })
                .or_insert_with(|| text.to_string());
        }

        representations.push(Representation {
            surface_form: surface.to_string(),
            norms: derive_norms(pos, orthography.attr("norm"), &features),
            frequency,
            accentuations,
            pronunciation,
        });
    }

    WordForm::new(pos, msd, features, representations)
}

fn frequency_text(orthography: &XmlNode) -> Option<&str> {
    orthography
        .descendants("measure")
        .into_iter()
        .find(|m| m.attr("type") == Some("frequency"))
        .map(XmlNode::text)
}

/// Accentuation and pronunciation blocks per orthography: `k` when there
/// are exactly `k` times as many blocks as orthographies, otherwise one.
fn blocks_per_orthography(orthographies: usize, blocks: usize) -> usize {
    if orthographies > 0 && blocks > orthographies && blocks % orthographies == 0 {
        blocks / orthographies
    } else {
        1
    }
}

fn share<'n, 'a>(blocks: &'n [&'a XmlNode], idx: usize, per: usize) -> &'n [&'a XmlNode] {
    let start = (idx * per).min(blocks.len());
    let end = (start + per).min(blocks.len());
    &blocks[start..end]
}

/// Display tags for one representation, in a fixed order.
pub fn derive_norms(
    pos: Option<PartOfSpeech>,
    orthography_norm: Option<&str>,
    features: &FeatureSet,
) -> Vec<String> {
    let mut norms = Vec::new();
    if pos.is_some_and(PartOfSpeech::declines_by_gender) {
        norms.push(
            features
                .get("gender")
                .unwrap_or(sloleks_types::AGENDER)
                .to_string(),
        );
    }
    if let Some(norm) = orthography_norm.map(str::trim).filter(|n| !n.is_empty()) {
        norms.push(norm.to_string());
    }
    if features.is("negative", "yes") {
        norms.push("negative".to_string());
    }
    match features.get("definiteness") {
        Some("yes") => norms.push("definite".to_string()),
        Some("no") => norms.push("indefinite".to_string()),
        _ => {}
    }
    match features.get("animate") {
        Some("yes") => norms.push("animate".to_string()),
        Some("no") => norms.push("inanimate".to_string()),
        _ => {}
    }
    if let Some(degree @ ("positive" | "comparative" | "superlative")) = features.get("degree") {
        norms.push(degree.to_string());
    }
    norms
}
