use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use sloleks_db::{ExplanatoryDictionary, Lexicon};
use sloleks_inflect::LayoutTable;
use sloleks_types::Vocabulary;
use slodict::{AppState, Catalog, router};

const LEXICON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lexicon>
  <entry>
    <head>
      <headword><lemma>hiša</lemma></headword>
      <grammar><category>noun</category></grammar>
    </head>
    <body><wordFormList>
      <wordForm>
        <grammarFeature name="case">nominative</grammarFeature>
        <grammarFeature name="number">singular</grammarFeature>
        <formRepresentations><orthographyList><orthography>
          <form>hiša</form>
          <measureList><measure type="frequency">120</measure></measureList>
        </orthography></orthographyList></formRepresentations>
      </wordForm>
      <wordForm>
        <grammarFeature name="case">genitive</grammarFeature>
        <grammarFeature name="number">plural</grammarFeature>
        <formRepresentations><orthographyList><orthography>
          <form>hiš</form>
          <measureList><measure type="frequency">0</measure></measureList>
        </orthography></orthographyList></formRepresentations>
      </wordForm>
    </wordFormList></body>
  </entry>
</lexicon>
"#;

const SSKJ: &str = r#"<html><body>
<div class="list-group-item entry">
  <span class="font_xlarge">híša</span>
  <span data-group="explanation ">stavba za bivanje</span>
</div>
</body></html>"#;

fn make_state() -> AppState {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("sloleks.xml");
    std::fs::write(&path, LEXICON).unwrap();
    let lexicon = Lexicon::load(&path).unwrap();
    let catalog = Catalog::new(lexicon, LayoutTable::standard(Vocabulary::standard()))
        .with_definitions(ExplanatoryDictionary::from_html(SSKJ));
    AppState {
        catalog: Arc::new(catalog),
    }
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn healthz_ok() {
    let (status, body) = get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn entry_page_renders_tables_and_definitions() {
    let (status, body) = get("/entries/hi%C5%A1a").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>hiša</title>"));
    assert!(html.contains("<b>noun-2</b>"));
    assert!(html.contains("hiš<b>a</b>"));
    assert!(html.contains(r#"<span class="gray">hiš</span>"#));
    assert!(html.contains("<th>nominative</th>"));
    assert!(html.contains("stavba za bivanje"));
}

#[tokio::test]
async fn entry_tables_endpoint_returns_json() {
    let (status, body) = get("/v1/entries/hi%C5%A1a").await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["lemma"], "hiša");
    let table = &body["sections"][0]["tables"][0];
    assert_eq!(table["name"], "declension");
    assert_eq!(table["rows"], serde_json::json!(["nominative", "genitive"]));
    assert_eq!(table["cells"][1][1]["forms"][0]["deemphasized"], true);
    assert_eq!(body["sections"][0]["placed"], 2);
    assert_eq!(body["definitions"][0], "stavba za bivanje");
}

#[tokio::test]
async fn unknown_lemma_is_not_found() {
    let (status, body) = get("/v1/entries/miza").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("miza"));

    let (status, _) = get("/entries/miza").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_lemma_is_rejected() {
    let (status, body) = get("/entries/%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "lemma is required");
}
