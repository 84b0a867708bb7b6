//! Ingestion Integration Tests
//!
//! Extraction responses flow through the extractor into the product table.

use spec_rag::{AppError, RagConfig};

use crate::common::{item_json, state_with, text, xbo_2000, xbo_4000, MemoryReader, ScriptedProvider};

fn reader() -> MemoryReader {
    MemoryReader::default()
        .with("xbo_2000.pdf", "XBO 2000 W/SHSC OFR datasheet")
        .with("xbo_4000.pdf", "XBO 4000 W/HS XL OFR datasheet")
}

#[tokio::test]
async fn test_first_run_populates_all_documents() {
    let provider = ScriptedProvider::new(vec![
        text(&item_json(&xbo_2000())),
        text(&item_json(&xbo_4000())),
    ]);
    let (state, db) = state_with(reader(), provider.clone(), &RagConfig::default());

    state.ensure_populated().await.unwrap();

    assert_eq!(db.count_items().unwrap(), 2);
    let record = db.get_item("xbo_4000.pdf").unwrap().unwrap();
    assert_eq!(record.item, xbo_4000());

    let options = provider.options();
    assert!(options
        .iter()
        .all(|o| o.model_override.as_deref() == Some("gpt-4o-2024-08-06")));
    assert!(options.iter().all(|o| o.response_format.is_some()));
}

#[tokio::test]
async fn test_second_run_does_not_call_the_model() {
    let provider = ScriptedProvider::new(vec![
        text(&item_json(&xbo_2000())),
        text(&item_json(&xbo_4000())),
    ]);
    let (state, _) = state_with(reader(), provider.clone(), &RagConfig::default());

    state.ensure_populated().await.unwrap();
    state.ensure_populated().await.unwrap();
    assert_eq!(provider.conversations().len(), 2);

    // Explicit ingest only picks up new files
    assert_eq!(state.ingest().await.unwrap(), 0);
}

#[tokio::test]
async fn test_repaired_extraction_is_stored() {
    let provider = ScriptedProvider::new(vec![
        text("I think this is an XBO lamp."),
        text(&format!("```json\n{}\n```", item_json(&xbo_4000()))),
    ]);
    let reader = MemoryReader::default().with("xbo_4000.pdf", "datasheet");
    let (state, db) = state_with(reader, provider.clone(), &RagConfig::default());

    assert_eq!(state.ingest().await.unwrap(), 1);
    assert_eq!(
        db.get_item("xbo_4000.pdf").unwrap().unwrap().item.product_name,
        "XBO 4000 W/HS XL OFR"
    );
    assert_eq!(provider.conversations()[1].len(), 3);
}

#[tokio::test]
async fn test_failed_extraction_skips_document() {
    let provider = ScriptedProvider::new(vec![
        text("no json"),
        text("still no json"),
        text(&item_json(&xbo_4000())),
    ]);
    let (state, db) = state_with(reader(), provider, &RagConfig::default());

    assert_eq!(state.ingest().await.unwrap(), 1);
    assert!(!db.contains("xbo_2000.pdf").unwrap());
    assert!(db.contains("xbo_4000.pdf").unwrap());
}

#[tokio::test]
async fn test_all_documents_failing_is_an_error() {
    let provider = ScriptedProvider::new(vec![]);
    let (state, db) = state_with(reader(), provider, &RagConfig::default());

    let err = state.ensure_populated().await.unwrap_err();
    assert!(matches!(err, AppError::Extraction(_)));
    assert_eq!(db.count_items().unwrap(), 0);
}
