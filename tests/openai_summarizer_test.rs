//! Chat-completions summarizer against a mock HTTP server

#![cfg(feature = "ai")]

mod common;

use common::january_csv;
use energy_dashboard::{DashboardSession, OpenAiSummarizer, Summarizer, SummaryOutcome, UnitMode};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn completion(content: &str) -> String {
    json!({
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
    .to_string()
}

fn session() -> DashboardSession {
    let mut session = DashboardSession::new();
    session.load_payload(&january_csv(10, 500.0)).unwrap();
    session
}

#[tokio::test]
async fn test_summarize_sends_monthly_data() {
    let mut server = Server::new_async().await;
    let content = json!({
        "insights": [
            { "title": "Evening peak", "description": "Most use is after 6pm", "icon": "schedule" },
            { "title": "Steady base load", "description": "Idle draw is high" }
        ]
    })
    .to_string();
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test_key")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "response_format": { "type": "json_object" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&content))
        .create_async()
        .await;

    let summarizer = OpenAiSummarizer::new(server.url(), "gpt-3.5-turbo", Some("test_key".into()));
    let session = session();
    let insights = summarizer
        .summarize(session.daily(), UnitMode::Consumption)
        .await
        .unwrap();

    assert_eq!(insights.len(), 2);
    assert_eq!(insights[0].icon, "schedule");
    assert_eq!(insights[1].icon, "lightbulb");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fenced_reply_is_accepted() {
    let mut server = Server::new_async().await;
    let content = "Here you go:\n```json\n[{\"title\": \"Weekend spike\", \"description\": \"Saturdays double\"}]\n```";
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion(content))
        .create_async()
        .await;

    let summarizer = OpenAiSummarizer::new(server.url(), "gpt-3.5-turbo", None);
    let insights = summarizer
        .summarize(session().daily(), UnitMode::Cost)
        .await
        .unwrap();

    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].title, "Weekend spike");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_becomes_unavailable_and_is_not_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let summarizer = OpenAiSummarizer::new(server.url(), "gpt-3.5-turbo", None);
    let mut session = session();

    let outcome = session.insights(&summarizer, Duration::from_secs(5)).await;
    assert!(matches!(outcome, SummaryOutcome::Unavailable(_)));
    assert!(session.cached_insights().is_none());

    let outcome = session.insights(&summarizer, Duration::from_secs(5)).await;
    assert!(matches!(outcome, SummaryOutcome::Unavailable(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_reply_is_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion("I could not find anything interesting."))
        .create_async()
        .await;

    let summarizer = OpenAiSummarizer::new(server.url(), "gpt-3.5-turbo", None);
    let mut session = session();

    let outcome = session.insights(&summarizer, Duration::from_secs(5)).await;
    assert_eq!(outcome, SummaryOutcome::Empty);
}
