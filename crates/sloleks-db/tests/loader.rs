use std::path::PathBuf;

use sloleks_db::{ExplanatoryDictionary, IssueKind, Lexicon, LoadMode, RecordError};
use sloleks_types::{AGENDER, Category, GrammarName, PartOfSpeech};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn loads_entries_and_skips_broken_records() {
    let lexicon = Lexicon::load(fixture("sloleks_sample.xml")).expect("load fixture");
    assert_eq!(lexicon.entry_count(), 2);
    let report = lexicon.report();
    assert_eq!(report.files, 1);
    assert_eq!(report.records_seen, 3);
    assert_eq!(report.entries_built, 2);
    assert_eq!(report.skipped, vec![RecordError::MissingLemma]);
}

#[test]
fn parses_word_forms_with_features_and_representations() {
    let lexicon = Lexicon::load_with_mode(fixture("sloleks_sample.xml"), LoadMode::Owned)
        .expect("load fixture");
    let hisa = lexicon.lookup("hiša").next().expect("hiša present");
    assert_eq!(hisa.pos(), Some(PartOfSpeech::Noun));
    assert_eq!(hisa.lemma_features().get("gender"), Some("feminine"));
    assert_eq!(hisa.lemma_features().get("type"), Some("common"));
    assert_eq!(hisa.all_forms().len(), 5);

    let nom_sg = GrammarName::new()
        .with(Category::Case, "nominative")
        .with(Category::Number, "singular");
    let rep = hisa
        .representations_by_grammar_name(&nom_sg)
        .next()
        .expect("nominative singular");
    assert_eq!(rep.surface_form, "hiša");
    assert_eq!(rep.frequency, Some(120));
    assert_eq!(rep.accentuations, vec!["híša"]);
    assert_eq!(rep.pronunciation.get("IPA").map(String::as_str), Some("ˈxiːʃa"));
    assert_eq!(rep.pronunciation.get("SAMPA").map(String::as_str), Some("\"xi:Sa"));

    let gen_pl = GrammarName::new()
        .with(Category::Case, "genitive")
        .with(Category::Number, "plural");
    let rep = hisa
        .representations_by_grammar_name(&gen_pl)
        .next()
        .expect("genitive plural");
    assert!(rep.is_unattested());
    assert_eq!(rep.accentuations, vec!["híš", "hîš"]);
    assert_eq!(
        rep.pronunciation.get("IPA").map(String::as_str),
        Some("ˈxiːʃ\nˈxîːʃ")
    );
}

#[test]
fn representation_issues_are_recorded_not_fatal() {
    let lexicon = Lexicon::load(fixture("sloleks_sample.xml")).expect("load fixture");
    let kinds: Vec<_> = lexicon
        .report()
        .issues
        .iter()
        .map(|i| i.kind.clone())
        .collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::PronunciationWithoutScript,
            IssueKind::MalformedFrequency("n/a".to_string()),
            IssueKind::MissingFrequency,
        ]
    );

    let hisa = lexicon.lookup("hiša").next().unwrap();
    let ins_du = GrammarName::new()
        .with(Category::Case, "instrumental")
        .with(Category::Number, "dual");
    assert_eq!(hisa.forms_by_grammar_name(&ins_du).count(), 1);
    assert_eq!(hisa.representations_by_grammar_name(&ins_du).count(), 0);
}

#[test]
fn adjective_forms_get_gender_norms_and_agender_default() {
    let lexicon = Lexicon::load(fixture("sloleks_sample.xml")).expect("load fixture");
    let lep = lexicon.lookup("lep").next().expect("lep present");
    let forms = lep.all_forms();
    assert_eq!(forms[0].representations()[0].norms, vec!["masculine", "indefinite", "positive"]);
    assert_eq!(forms[1].representations()[0].norms, vec!["masculine", "definite", "positive"]);

    let adverbial = &forms[2];
    assert_eq!(adverbial.gender(), Some(AGENDER));
    assert_eq!(adverbial.msd(), Some("Rsn"));
    let rep = &adverbial.representations()[0];
    assert_eq!(rep.frequency, None);
    assert_eq!(rep.norms, vec!["agender", "dialect", "positive"]);
}

#[test]
fn loads_every_xml_file_of_a_directory_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let second = r#"<lexicon><entry><head><headword><lemma>miza</lemma></headword>
        <grammar><category>noun</category></grammar></head></entry></lexicon>"#;
    std::fs::copy(fixture("sloleks_sample.xml"), dir.path().join("a_sample.xml")).unwrap();
    std::fs::write(dir.path().join("b_more.xml"), second).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not xml").unwrap();

    let lexicon = Lexicon::load(dir.path()).expect("load directory");
    assert_eq!(lexicon.report().files, 2);
    let lemmas: Vec<_> = lexicon.entries().iter().map(|e| e.lemma()).collect();
    assert_eq!(lemmas, vec!["hiša", "lep", "miza"]);
}

#[test]
fn malformed_document_fails_with_file_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(&path, "<lexicon><entry><head></entry></lexicon>").unwrap();
    let err = Lexicon::load(&path).err().expect("malformed xml is an error");
    assert!(format!("{err:#}").contains("broken.xml"));
}

#[test]
fn missing_path_is_an_error() {
    assert!(Lexicon::load(fixture("does_not_exist.xml")).is_err());
}

#[test]
fn loads_explanatory_dictionary_pages() {
    let dictionary = ExplanatoryDictionary::load(fixture("sskj_h.html")).expect("load page");
    assert_eq!(dictionary.len(), 3);
    let hisa = dictionary.lookup("hiša").next().expect("hiša defined");
    assert_eq!(hisa.accentuation, "híša");
    assert_eq!(
        hisa.definitions,
        vec!["stavba, namenjena za bivanje", "prostori, v katerih kdo živi"]
    );
    assert_eq!(hisa.sub_words[0].lemma, "hišica");
    assert!(dictionary.lookup("hišica").next().is_some());
    assert_eq!(
        dictionary.lookup("lep").next().map(|e| e.definitions.clone()),
        Some(vec!["ki vzbuja ugodje".to_string()])
    );
    assert!(dictionary.lookup("ignored").next().is_none());
}
