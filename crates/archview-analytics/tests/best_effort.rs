//! The client must degrade to no-ops and `None` instead of surfacing errors.

use archview_analytics::{
    AnalyticsEvent, AnalyticsSettings, HealthState, InteractionType, KeywordsAiClient, LogData,
    MemoryOperation, SearchType, TimeRange,
};
use serde_json::Map;

fn unreachable_client() -> KeywordsAiClient {
    let mut settings = AnalyticsSettings::with_api_key("sk-test");
    // Port 9 (discard) is closed on test machines; connects are refused fast.
    settings.base_url = "http://127.0.0.1:9/api".into();
    KeywordsAiClient::new(settings)
}

#[tokio::test]
async fn unconfigured_reads_return_none() {
    let client = KeywordsAiClient::new(AnalyticsSettings::default());
    assert!(!client.is_configured());
    assert!(client.user_metrics("u1").await.is_none());
    assert!(client.application_metrics(TimeRange::default()).await.is_none());
    assert!(client.conversation_insights("t1").await.is_none());
}

#[tokio::test]
async fn unconfigured_health_reports_missing_key() {
    let client = KeywordsAiClient::new(AnalyticsSettings::default());
    let health = client.health_status().await;
    assert_eq!(health.status, HealthState::Error);
    assert_eq!(health.message, "API key not configured");
}

#[tokio::test]
async fn unconfigured_writes_are_noops() {
    let client = KeywordsAiClient::new(AnalyticsSettings::default());
    client.log_conversation(&LogData::default()).await;
    client.track_event(&AnalyticsEvent::new("x")).await;
    client.track_habit_completion("u", "h", "Walk", 5).await;
}

#[tokio::test]
async fn transport_failures_are_swallowed() {
    let client = unreachable_client();
    assert!(client.user_metrics("u1").await.is_none());
    assert!(client.application_metrics(TimeRange::Month).await.is_none());
    assert!(client.conversation_insights("t1").await.is_none());

    client.log_conversation(&LogData::default()).await;
    client
        .track_memory_operation("u1", MemoryOperation::Search, Map::new())
        .await;
    client
        .track_search_operation("u1", SearchType::QuickAnswer, "weather", Some(3))
        .await;
    client
        .track_agent_interaction("u1", "habit-coach", InteractionType::ToolUse, Map::new())
        .await;
}

#[tokio::test]
async fn transport_failure_marks_health_as_error() {
    let health = unreachable_client().health_status().await;
    assert!(!health.is_healthy());
    assert!(health.message.starts_with("Connection failed"));
}
