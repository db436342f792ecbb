use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::{AGENDER, Category, FeatureSet, GrammarName, PartOfSpeech};

/// One concrete spelling of a word form.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Representation {
    pub surface_form: String,
    /// Display tags such as `feminine`, `negative`, `definite`, `comparative`.
    pub norms: Vec<String>,
    /// Corpus count. `Some(0)` means correct but never observed; `None`
    /// means the source carried no count at all.
    pub frequency: Option<u64>,
    pub accentuations: Vec<String>,
    /// Notation system (`IPA`, `SAMPA`) to pronunciation, one variant per line.
    pub pronunciation: BTreeMap<String, String>,
}

impl Representation {
    pub fn new(surface_form: impl Into<String>) -> Self {
        Self {
            surface_form: surface_form.into(),
            ..Self::default()
        }
    }

    pub fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Attested as correct but absent from the corpus.
    pub fn is_unattested(&self) -> bool {
        self.frequency == Some(0)
    }
}

/// Why a form is flagged as irregular relative to the main stem.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weirdness {
    Negative,
    Inanimate,
    Animate,
}

impl Weirdness {
    /// Fixed precedence: negative, then inanimate, then animate.
    pub fn of(features: &FeatureSet) -> Option<Self> {
        if features.is("negative", "yes") {
            Some(Weirdness::Negative)
        } else if features.is("animate", "no") {
            Some(Weirdness::Inanimate)
        } else if features.is("animate", "yes") {
            Some(Weirdness::Animate)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weirdness::Negative => "negative",
            Weirdness::Inanimate => "inanimate",
            Weirdness::Animate => "animate",
        }
    }
}

impl fmt::Display for Weirdness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One morphological slot of an entry, e.g. "genitive plural".
#[derive(Clone, Debug, Serialize)]
pub struct WordForm {
    msd: Option<String>,
    grammatical_features: FeatureSet,
    grammar_name: GrammarName,
    representations: Vec<Representation>,
}

impl WordForm {
    /// Build a word form; the grammar name is derived from `features`.
    ///
    /// Genderless forms of gender-declined parts of speech get the
    /// [`AGENDER`] gender in their grammar name.
    pub fn new(
        pos: Option<PartOfSpeech>,
        msd: Option<String>,
        features: FeatureSet,
        representations: Vec<Representation>,
    ) -> Self {
        let mut grammar_name = GrammarName::from_features(&features);
        if grammar_name.get(Category::Gender).is_none()
            && pos.is_some_and(PartOfSpeech::declines_by_gender)
        {
            grammar_name.set(Category::Gender, AGENDER);
        }
        Self {
            msd,
            grammatical_features: features,
            grammar_name,
            representations,
        }
    }

    pub fn msd(&self) -> Option<&str> {
        self.msd.as_deref()
    }

    pub fn grammatical_features(&self) -> &FeatureSet {
        &self.grammatical_features
    }

    pub fn grammar_name(&self) -> &GrammarName {
        &self.grammar_name
    }

    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    pub fn v_form(&self) -> Option<&str> {
        self.grammar_name.get(Category::VForm)
    }

    pub fn case(&self) -> Option<&str> {
        self.grammar_name.get(Category::Case)
    }

    pub fn person(&self) -> Option<&str> {
        self.grammar_name.get(Category::Person)
    }

    pub fn number(&self) -> Option<&str> {
        self.grammar_name.get(Category::Number)
    }

    pub fn gender(&self) -> Option<&str> {
        self.grammar_name.get(Category::Gender)
    }

    pub fn degree(&self) -> Option<&str> {
        self.grammar_name.get(Category::Degree)
    }

    pub fn clitic(&self) -> Option<&str> {
        self.grammar_name.get(Category::Clitic)
    }

    pub fn weirdness(&self) -> Option<Weirdness> {
        Weirdness::of(&self.grammatical_features)
    }
}

/// Address of a representation inside an [`Entry`]: form index, then
/// representation index within that form.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
pub struct RepRef {
    pub form: usize,
    pub representation: usize,
}

/// One lemma with all of its word forms.
///
/// Built once; every index is derived from `all_forms` in [`Entry::new`] and
/// there is no way to mutate either afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct Entry {
    lemma: String,
    part_of_speech: String,
    lemma_features: FeatureSet,
    all_forms: Vec<WordForm>,
    #[serde(skip)]
    pos: Option<PartOfSpeech>,
    #[serde(skip)]
    forms_by_grammar_name: HashMap<GrammarName, Vec<usize>>,
    #[serde(skip)]
    representations_by_grammar_name: HashMap<GrammarName, Vec<RepRef>>,
    #[serde(skip)]
    non_weird_forms: Vec<String>,
    #[serde(skip)]
    weirdness_reasons: HashMap<String, Weirdness>,
}

impl Entry {
    pub fn new(
        lemma: impl Into<String>,
        part_of_speech: impl Into<String>,
        lemma_features: FeatureSet,
        all_forms: Vec<WordForm>,
    ) -> Self {
        let part_of_speech = part_of_speech.into().trim().to_ascii_lowercase();
        let pos = PartOfSpeech::from_name(&part_of_speech);

        let mut forms_by_grammar_name: HashMap<GrammarName, Vec<usize>> = HashMap::new();
        let mut representations_by_grammar_name: HashMap<GrammarName, Vec<RepRef>> =
            HashMap::new();
        let mut non_weird_forms = Vec::new();
        let mut weirdness_reasons = HashMap::new();

        for (form_idx, form) in all_forms.iter().enumerate() {
            forms_by_grammar_name
                .entry(form.grammar_name().clone())
                .or_default()
                .push(form_idx);
            let weirdness = form.weirdness();
            for (rep_idx, rep) in form.representations().iter().enumerate() {
                representations_by_grammar_name
                    .entry(form.grammar_name().clone())
                    .or_default()
                    .push(RepRef {
                        form: form_idx,
                        representation: rep_idx,
                    });
                match weirdness {
                    Some(reason) => {
                        weirdness_reasons.insert(rep.surface_form.clone(), reason);
                    }
                    None => non_weird_forms.push(rep.surface_form.clone()),
                }
            }
        }

        Self {
            lemma: lemma.into(),
            part_of_speech,
            lemma_features,
            all_forms,
            pos,
            forms_by_grammar_name,
            representations_by_grammar_name,
            non_weird_forms,
            weirdness_reasons,
        }
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    /// Part of speech as written in the source, lowercased.
    pub fn part_of_speech(&self) -> &str {
        &self.part_of_speech
    }

    /// Parsed part of speech; `None` for categories this crate does not know.
    pub fn pos(&self) -> Option<PartOfSpeech> {
        self.pos
    }

    pub fn lemma_features(&self) -> &FeatureSet {
        &self.lemma_features
    }

    pub fn all_forms(&self) -> &[WordForm] {
        &self.all_forms
    }

    /// Distinct grammar names, in no particular order.
    pub fn grammar_names(&self) -> impl Iterator<Item = &GrammarName> {
        self.forms_by_grammar_name.keys()
    }

    pub fn forms_by_grammar_name(&self, name: &GrammarName) -> impl Iterator<Item = &WordForm> {
        self.forms_by_grammar_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|idx| &self.all_forms[*idx])
    }

    pub fn representations_by_grammar_name(
        &self,
        name: &GrammarName,
    ) -> impl Iterator<Item = &Representation> {
        self.representations_by_grammar_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|r| self.representation(*r))
    }

    /// Every representation with its address, in source order.
    pub fn all_representations(&self) -> impl Iterator<Item = (RepRef, &Representation)> {
        self.all_forms.iter().enumerate().flat_map(|(form, wf)| {
            wf.representations()
                .iter()
                .enumerate()
                .map(move |(representation, rep)| {
                    (
                        RepRef {
                            form,
                            representation,
                        },
                        rep,
                    )
                })
        })
    }

    pub fn representation(&self, at: RepRef) -> Option<&Representation> {
        self.all_forms
            .get(at.form)
            .and_then(|f| f.representations().get(at.representation))
    }

    pub fn representation_count(&self) -> usize {
        self.all_forms.iter().map(|f| f.representations().len()).sum()
    }

    /// Surface forms of representations without a weirdness reason.
    pub fn non_weird_forms(&self) -> &[String] {
        &self.non_weird_forms
    }

    pub fn weirdness_reasons(&self) -> &HashMap<String, Weirdness> {
        &self.weirdness_reasons
    }

    pub fn weirdness_of(&self, surface_form: &str) -> Option<Weirdness> {
        self.weirdness_reasons.get(surface_form).copied()
    }
}
