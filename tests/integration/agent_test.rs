//! Agent Integration Tests
//!
//! Runs the question-answering loop over the real tools, a seeded SQLite
//! table and scripted model responses.

use serde_json::json;

use spec_rag::{AppError, ProductRecord, RagConfig};
use spec_rag_llm::{MessageContent, MessageRole};

use crate::common::{calls, state_with, text, xbo_2000, xbo_4000, MemoryReader, ScriptedProvider};

fn seeded(
    provider: std::sync::Arc<ScriptedProvider>,
    config: &RagConfig,
) -> spec_rag::AppState {
    let reader = MemoryReader::default().with("xbo_4000.pdf", "Suitable for home theater");
    let (state, db) = state_with(reader, provider, config);
    db.insert_many(&[
        ProductRecord::new("xbo_2000.pdf", xbo_2000()),
        ProductRecord::new("xbo_4000.pdf", xbo_4000()),
    ])
    .unwrap();
    state
}

/// (call id, content, is_error) of every tool result in a conversation
fn results(conversation: &[spec_rag_llm::Message]) -> Vec<(String, String, bool)> {
    conversation
        .iter()
        .flat_map(|m| m.content.iter())
        .filter_map(|c| match c {
            MessageContent::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => Some((tool_use_id.clone(), content.clone(), *is_error)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_weight_question_uses_sql_tool() {
    let provider = ScriptedProvider::new(vec![
        calls(&[(
            "call_1",
            "tool_execute_sql",
            json!({"sql_query": "SELECT product_weight FROM DatabaseItem WHERE product_name like \"%XBO 4000%\""}),
        )]),
        text("The XBO 4000 W/HS XL OFR weighs 391 g."),
    ]);
    let state = seeded(provider.clone(), &RagConfig::default());

    let answer = state
        .answer("How much does the XBO 4000 W/HS XL OFR weigh?")
        .await
        .unwrap();
    assert_eq!(answer, "The XBO 4000 W/HS XL OFR weighs 391 g.");

    let conversations = provider.conversations();
    assert_eq!(
        results(&conversations[1]),
        vec![(
            "call_1".to_string(),
            r#"query results: [{"product_weight":391.0}]"#.to_string(),
            false
        )]
    );
}

#[tokio::test]
async fn test_filter_question_returns_matching_rows() {
    let provider = ScriptedProvider::new(vec![
        calls(&[(
            "call_1",
            "tool_execute_sql",
            json!({"sql_query": "SELECT product_name FROM DatabaseItem WHERE rated_power >= 1500 AND lifespan > 2500"}),
        )]),
        text("XBO 4000 W/HS XL OFR"),
    ]);
    let state = seeded(provider.clone(), &RagConfig::default());

    state.answer("Give me all lamps").await.unwrap();

    let (_, content, _) = &results(&provider.conversations()[1])[0];
    assert_eq!(content, r#"query results: [{"product_name":"XBO 4000 W/HS XL OFR"}]"#);
}

#[tokio::test]
async fn test_every_call_gets_one_result_in_order() {
    let provider = ScriptedProvider::new(vec![
        calls(&[
            ("call_a", "tool_read_pdf_content", json!({"filename": "xbo_4000.pdf"})),
            ("call_b", "tool_read_pdf_content", json!({"filename": "missing.pdf"})),
            ("call_c", "tool_execute_sql", json!({"sql_query": "SELECT min(packaging_unit) AS unit FROM DatabaseItem"})),
        ]),
        calls(&[(
            "call_d",
            "tool_execute_sql",
            json!({"sql_query": "SELECT scip_declaration_number FROM DatabaseItem LIMIT 0"}),
        )]),
        text("The XBO 4000 suits a home theater."),
    ]);
    let state = seeded(provider.clone(), &RagConfig::default());

    let answer = state
        .answer("Which luminaire is best suited for my home theater?")
        .await
        .unwrap();
    assert_eq!(answer, "The XBO 4000 suits a home theater.");

    let final_conversation = provider.conversations().pop().unwrap();
    let assistant_turns: Vec<_> = final_conversation
        .iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .collect();
    assert_eq!(assistant_turns.len(), 2);

    let results = results(&final_conversation);
    let ids: Vec<&str> = results.iter().map(|(id, _, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["call_a", "call_b", "call_c", "call_d"]);
    assert_eq!(results[0].1, "Filename: xbo_4000.pdf\nSuitable for home theater");
    assert_eq!(results[1].1, "read pdf error: given file does not exist");
    assert!(results[1].2);
    assert_eq!(results[2].1, r#"query results: [{"unit":1}]"#);
    assert_eq!(results[3].1, "query results: []");
}

#[tokio::test]
async fn test_bad_sql_is_recoverable() {
    let provider = ScriptedProvider::new(vec![
        calls(&[("call_1", "tool_execute_sql", json!({"sql_query": "SELECT * FROM Products"}))]),
        calls(&[(
            "call_2",
            "tool_execute_sql",
            json!({"sql_query": "SELECT product_name FROM DatabaseItem WHERE scip_declaration_number like \"%dd2ddf15%\""}),
        )]),
        text("XBO 4000 W/HS XL OFR"),
    ]);
    let state = seeded(provider.clone(), &RagConfig::default());

    let answer = state.answer("Which luminaire has the SCIP number ...?").await.unwrap();
    assert_eq!(answer, "XBO 4000 W/HS XL OFR");

    let results = results(&provider.conversations()[2]);
    assert!(results[0].1.starts_with("query error: "));
    assert!(results[0].2);
    assert!(results[1].1.contains("XBO 4000 W/HS XL OFR"));
}

#[tokio::test]
async fn test_unknown_tool_aborts_answer() {
    let provider = ScriptedProvider::new(vec![
        calls(&[("call_1", "tool_send_email", json!({"to": "sales"}))]),
        text("never reached"),
    ]);
    let state = seeded(provider.clone(), &RagConfig::default());

    let err = state.answer("q").await.unwrap_err();
    assert!(matches!(err, AppError::UnknownTool(ref name) if name == "tool_send_email"));
    assert_eq!(provider.remaining(), 1);
}

#[tokio::test]
async fn test_extra_argument_is_rejected_as_tool_error() {
    let provider = ScriptedProvider::new(vec![
        calls(&[(
            "call_1",
            "tool_execute_sql",
            json!({"sql_query": "SELECT 1", "limit": 5}),
        )]),
        text("ok"),
    ]);
    let state = seeded(provider.clone(), &RagConfig::default());

    assert_eq!(state.answer("q").await.unwrap(), "ok");
    let results = results(&provider.conversations()[1]);
    assert!(results[0].1.contains("unexpected argument `limit`"));
    assert!(results[0].2);
}

#[tokio::test]
async fn test_round_limit_from_config() {
    let config = RagConfig {
        max_tool_rounds: 1,
        temperature: 0.0,
        ..Default::default()
    };
    let provider = ScriptedProvider::new(vec![
        calls(&[("call_1", "tool_execute_sql", json!({"sql_query": "SELECT 1"}))]),
        calls(&[("call_2", "tool_execute_sql", json!({"sql_query": "SELECT 2"}))]),
        text("too late"),
    ]);
    let state = seeded(provider.clone(), &config);

    let err = state.answer("q").await.unwrap_err();
    assert!(matches!(err, AppError::ToolLoopLimit(1)));
    assert_eq!(provider.conversations().len(), 2);
    assert_eq!(provider.remaining(), 1);
    assert_eq!(provider.options()[0].temperature_override, Some(0.0));
}

#[tokio::test]
async fn test_last_allowed_round_results_reach_the_model() {
    let config = RagConfig {
        max_tool_rounds: 1,
        ..Default::default()
    };
    let provider = ScriptedProvider::new(vec![
        calls(&[(
            "call_1",
            "tool_execute_sql",
            json!({"sql_query": "SELECT min(packaging_unit) AS unit FROM DatabaseItem"}),
        )]),
        text("You can order a single piece."),
    ]);
    let state = seeded(provider.clone(), &config);

    let answer = state.answer("What is the smallest unit I can order?").await.unwrap();
    assert_eq!(answer, "You can order a single piece.");
    assert_eq!(
        results(&provider.conversations()[1]),
        vec![(
            "call_1".to_string(),
            r#"query results: [{"unit":1}]"#.to_string(),
            false
        )]
    );
}
