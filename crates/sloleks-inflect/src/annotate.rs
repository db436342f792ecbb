//! Per-form display metadata: stem bolding, graying, weirdness labels and
//! pronunciation popups.

use std::collections::BTreeMap;

use serde::Serialize;
use sloleks_types::{Entry, RepRef, Weirdness};

/// A run of a surface form; `emphasized` runs are rendered bold.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: false,
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: true,
        }
    }
}

/// Longest common prefix, compared by character.
pub fn common_prefix<S: AsRef<str>>(strings: &[S]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };
    let first = first.as_ref();
    let mut len = first.len();
    for other in rest {
        len = first
            .char_indices()
            .zip(other.as_ref().chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((idx, ch), _)| idx + ch.len_utf8())
            .unwrap_or(0)
            .min(len);
        if len == 0 {
            break;
        }
    }
    first[..len].to_string()
}

/// Split `word` around the first occurrence of `stem`, emphasizing what
/// comes before and after it. A word without the stem, or an empty stem,
/// yields the word unmarked.
pub fn stem_segments(word: &str, stem: &str) -> Vec<Segment> {
    let Some(at) = (!stem.is_empty()).then(|| word.find(stem)).flatten() else {
        return vec![Segment::plain(word)];
    };
    let before = &word[..at];
    let after = &word[at + stem.len()..];
    let mut segments = Vec::with_capacity(3);
    if !before.is_empty() {
        segments.push(Segment::bold(before));
    }
    segments.push(Segment::plain(stem));
    if !after.is_empty() {
        segments.push(Segment::bold(after));
    }
    segments
}

/// One representation ready for rendering.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AnnotatedForm {
    pub surface_form: String,
    pub segments: Vec<Segment>,
    /// Attested-correct but absent from the corpus.
    pub deemphasized: bool,
    pub weirdness: Option<Weirdness>,
    pub norms: Vec<String>,
    pub frequency: Option<u64>,
    /// Accentuation variants, one per line.
    pub accentuation: String,
    pub pronunciation: BTreeMap<String, String>,
    pub grammar_name: String,
    pub msd: Option<String>,
}

impl AnnotatedForm {
    pub fn is_emphasized(&self) -> bool {
        self.segments.iter().any(|s| s.emphasized)
    }
}

/// Annotate the representation at `at`, bolding around `stem`.
pub fn annotate(entry: &Entry, at: RepRef, stem: &str) -> Option<AnnotatedForm> {
    let form = entry.all_forms().get(at.form)?;
    let rep = form.representations().get(at.representation)?;
    Some(AnnotatedForm {
        surface_form: rep.surface_form.clone(),
        segments: stem_segments(&rep.surface_form, stem),
        deemphasized: rep.is_unattested(),
        weirdness: entry.weirdness_of(&rep.surface_form),
        norms: rep.norms.clone(),
        frequency: rep.frequency,
        accentuation: rep.accentuations.join("\n"),
        pronunciation: rep.pronunciation.clone(),
        grammar_name: form.grammar_name().to_string(),
        msd: form.msd().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| {
                if s.emphasized {
                    format!("<b>{}</b>", s.text)
                } else {
                    s.text.clone()
                }
            })
            .collect()
    }

    #[test]
    fn common_prefix_is_char_aware() {
        assert_eq!(common_prefix(&["hiša", "hiše", "hiši"]), "hiš");
        assert_eq!(common_prefix(&["čas", "čez"]), "č");
        assert_eq!(common_prefix(&["hiš"]), "hiš");
        assert_eq!(common_prefix(&["abc", "xyz"]), "");
        assert_eq!(common_prefix::<&str>(&[]), "");
        assert_eq!(common_prefix(&["hiša", "hiš"]), "hiš");
    }

    #[test]
    fn bolds_everything_but_the_stem() {
        let stem = common_prefix(&["hiša", "hiše", "hiši"]);
        assert_eq!(rendered(&stem_segments("hiša", &stem)), "hiš<b>a</b>");
        assert_eq!(rendered(&stem_segments("hiše", &stem)), "hiš<b>e</b>");
        assert_eq!(rendered(&stem_segments("nehiša", &stem)), "<b>ne</b>hiš<b>a</b>");
    }

    #[test]
    fn stem_alone_or_missing_is_unmarked() {
        let only = stem_segments("hiš", &common_prefix(&["hiš"]));
        assert_eq!(only, vec![Segment::plain("hiš")]);
        assert_eq!(stem_segments("sem", "bi"), vec![Segment::plain("sem")]);
        assert_eq!(stem_segments("sem", ""), vec![Segment::plain("sem")]);
    }
}
