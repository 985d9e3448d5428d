use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::settings::AnalyticsSettings;
use crate::types::{
    AnalyticsEvent, HealthStatus, InteractionType, LogData, MemoryOperation, Metrics, SearchType,
    TimeRange,
};
use crate::AnalyticsError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the gateway's logging and analytics endpoints.
///
/// Every public method swallows failures: writes log and return, reads log and
/// return `None`. An unconfigured client performs no requests at all.
#[derive(Debug, Clone)]
pub struct KeywordsAiClient {
    http: reqwest::Client,
    settings: AnalyticsSettings,
}

impl KeywordsAiClient {
    pub fn new(settings: AnalyticsSettings) -> Self {
        if !settings.is_configured() {
            tracing::warn!("KEYWORDS_AI_API_KEY not configured; analytics disabled");
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { http, settings }
    }

    /// Settings from `~/.archview/settings.json` and the environment.
    pub fn from_env() -> Self {
        Self::new(AnalyticsSettings::load())
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    /// Extra parameters to attach to a completion request routed via the gateway.
    pub fn completion_params(
        &self,
        user_id: Option<&str>,
        conversation_id: Option<&str>,
        metadata: Map<String, Value>,
    ) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert(
            "customer_identifier".into(),
            Value::from(user_id.unwrap_or("anonymous_user")),
        );
        let thread_id = match conversation_id {
            Some(id) => id.to_string(),
            None => format!("conversation_{}", Utc::now().timestamp_millis()),
        };
        params.insert("thread_id".into(), Value::from(thread_id));
        if let Some(user_id) = user_id {
            params.insert("customer_user_id".into(), Value::from(user_id));
        }
        params.extend(metadata);
        params
    }

    pub async fn log_conversation(&self, data: &LogData) {
        if !self.is_configured() {
            tracing::warn!("analytics not configured, skipping conversation log");
            return;
        }
        let body = match log_payload(data, &now_iso(), &self.settings.source) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode conversation log");
                return;
            }
        };
        if let Err(e) = self.post_json("/logs", &body).await {
            tracing::error!(error = %e, "failed to log conversation");
        }
    }

    pub async fn track_event(&self, event: &AnalyticsEvent) {
        if !self.is_configured() {
            return;
        }
        let body = event_payload(event, &now_iso(), &self.settings.source);
        if let Err(e) = self.post_json("/events", &body).await {
            tracing::error!(event = %event.event, error = %e, "failed to track event");
        }
    }

    pub async fn track_habit_completion(
        &self,
        user_id: &str,
        habit_id: &str,
        habit_name: &str,
        points_earned: i64,
    ) {
        self.track_event(&habit_event(user_id, habit_id, habit_name, points_earned))
            .await;
    }

    pub async fn track_memory_operation(
        &self,
        user_id: &str,
        operation: MemoryOperation,
        metadata: Map<String, Value>,
    ) {
        self.track_event(&memory_event(user_id, operation, metadata))
            .await;
    }

    /// Only the query length is reported, never the query text.
    pub async fn track_search_operation(
        &self,
        user_id: &str,
        search_type: SearchType,
        query: &str,
        results_count: Option<u64>,
    ) {
        self.track_event(&search_event(user_id, search_type, query, results_count))
            .await;
    }

    pub async fn track_agent_interaction(
        &self,
        user_id: &str,
        agent_name: &str,
        interaction_type: InteractionType,
        metadata: Map<String, Value>,
    ) {
        self.track_event(&agent_event(user_id, agent_name, interaction_type, metadata))
            .await;
    }

    pub async fn user_metrics(&self, user_id: &str) -> Option<Metrics> {
        self.read(&format!("/analytics/users/{user_id}/metrics"), "user metrics")
            .await
    }

    pub async fn application_metrics(&self, range: TimeRange) -> Option<Metrics> {
        self.read(
            &format!("/analytics/metrics?range={}", range.as_str()),
            "application metrics",
        )
        .await
    }

    pub async fn conversation_insights(&self, thread_id: &str) -> Option<Value> {
        self.read(
            &format!("/analytics/conversations/{thread_id}/insights"),
            "conversation insights",
        )
        .await
    }

    pub async fn health_status(&self) -> HealthStatus {
        if !self.is_configured() {
            return HealthStatus::error("API key not configured");
        }
        let request = self
            .http
            .get(self.url("/health"))
            .bearer_auth(&self.settings.api_key);
        match request.send().await {
            Ok(resp) if resp.status().is_success() => {
                HealthStatus::healthy("Keywords AI is operational")
            }
            Ok(resp) => HealthStatus::error(format!("API responded with {}", resp.status().as_u16())),
            Err(e) => HealthStatus::error(format!("Connection failed: {e}")),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn read<T: DeserializeOwned>(&self, path: &str, what: &str) -> Option<T> {
        if !self.is_configured() {
            tracing::warn!("analytics not configured, cannot fetch {what}");
            return None;
        }
        match self.get_json(path).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch {what}");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AnalyticsError> {
        if !self.is_configured() {
            return Err(AnalyticsError::NotConfigured);
        }
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.settings.api_key)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AnalyticsError::Status {
                status: resp.status(),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<(), AnalyticsError> {
        if !self.is_configured() {
            return Err(AnalyticsError::NotConfigured);
        }
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.settings.api_key)
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AnalyticsError::Status {
                status: resp.status(),
            });
        }
        Ok(())
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn to_value<T: serde::Serialize>(v: T) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}

/// `/logs` body: the record with `timestamp` and `source` merged in.
pub(crate) fn log_payload(
    data: &LogData,
    timestamp: &str,
    source: &str,
) -> Result<Value, serde_json::Error> {
    let mut body = serde_json::to_value(data)?;
    if let Value::Object(map) = &mut body {
        map.insert("timestamp".into(), Value::from(timestamp));
        map.insert("source".into(), Value::from(source));
    }
    Ok(body)
}

/// `/events` body: `timestamp` and `source` go inside `properties`. An
/// anonymous event carries no `user_id` key at all.
pub(crate) fn event_payload(event: &AnalyticsEvent, timestamp: &str, source: &str) -> Value {
    let mut properties = event.properties.clone();
    properties.insert("timestamp".into(), Value::from(timestamp));
    properties.insert("source".into(), Value::from(source));

    let mut body = Map::new();
    body.insert("event".into(), Value::from(event.event.as_str()));
    if let Some(user_id) = &event.user_id {
        body.insert("user_id".into(), Value::from(user_id.as_str()));
    }
    body.insert("properties".into(), Value::Object(properties));
    Value::Object(body)
}

pub(crate) fn habit_event(
    user_id: &str,
    habit_id: &str,
    habit_name: &str,
    points_earned: i64,
) -> AnalyticsEvent {
    AnalyticsEvent::new("habit_completed")
        .user(user_id)
        .property("habit_id", habit_id)
        .property("habit_name", habit_name)
        .property("points_earned", points_earned)
        .property("category", "wellness")
}

/// Caller metadata may replace `operation`; `category` always wins.
pub(crate) fn memory_event(
    user_id: &str,
    operation: MemoryOperation,
    metadata: Map<String, Value>,
) -> AnalyticsEvent {
    let mut event = AnalyticsEvent::new("memory_operation")
        .user(user_id)
        .property("operation", to_value(operation));
    event.properties.extend(metadata);
    event.property("category", "memory")
}

/// `query_length` counts UTF-16 code units, as browsers report string length.
pub(crate) fn search_event(
    user_id: &str,
    search_type: SearchType,
    query: &str,
    results_count: Option<u64>,
) -> AnalyticsEvent {
    let mut event = AnalyticsEvent::new("search_operation")
        .user(user_id)
        .property("search_type", to_value(search_type))
        .property("query_length", query.encode_utf16().count());
    if let Some(count) = results_count {
        event = event.property("results_count", count);
    }
    event.property("category", "search")
}

pub(crate) fn agent_event(
    user_id: &str,
    agent_name: &str,
    interaction_type: InteractionType,
    metadata: Map<String, Value>,
) -> AnalyticsEvent {
    let mut event = AnalyticsEvent::new("agent_interaction")
        .user(user_id)
        .property("agent_name", agent_name)
        .property("interaction_type", to_value(interaction_type));
    event.properties.extend(metadata);
    event.property("category", "agents")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogMessage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn configured() -> KeywordsAiClient {
        KeywordsAiClient::new(AnalyticsSettings::with_api_key("sk-test"))
    }

    #[test]
    fn completion_params_default_to_anonymous() {
        let params = configured().completion_params(None, None, Map::new());
        assert_eq!(params["customer_identifier"], "anonymous_user");
        assert!(params.get("customer_user_id").is_none());
        assert!(params["thread_id"]
            .as_str()
            .unwrap()
            .starts_with("conversation_"));
    }

    #[test]
    fn completion_params_merge_metadata_last() {
        let mut metadata = Map::new();
        metadata.insert("thread_id".into(), Value::from("override"));
        metadata.insert("plan".into(), Value::from("pro"));
        let params = configured().completion_params(Some("u1"), Some("c1"), metadata);
        assert_eq!(params["customer_identifier"], "u1");
        assert_eq!(params["customer_user_id"], "u1");
        assert_eq!(params["thread_id"], "override");
        assert_eq!(params["plan"], "pro");
    }

    #[test]
    fn log_payload_adds_timestamp_and_source() {
        let data = LogData {
            model: "gpt-4o".into(),
            messages: vec![LogMessage {
                role: "user".into(),
                content: "hi".into(),
                timestamp: None,
            }],
            tokens_used: Some(12),
            ..Default::default()
        };
        let body = log_payload(&data, "2026-01-01T00:00:00.000Z", "wei-ai-assistant").unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}],
                "tokens_used": 12,
                "timestamp": "2026-01-01T00:00:00.000Z",
                "source": "wei-ai-assistant",
            })
        );
    }

    #[test]
    fn event_payload_nests_stamp_in_properties() {
        let event = AnalyticsEvent::new("diagram_reset")
            .user("u9")
            .property("scope", "layout");
        let body = event_payload(&event, "t", "s");
        assert_eq!(
            body,
            json!({
                "event": "diagram_reset",
                "user_id": "u9",
                "properties": {"scope": "layout", "timestamp": "t", "source": "s"},
            })
        );
    }

    #[test]
    fn anonymous_event_omits_user_id() {
        let event = AnalyticsEvent::new("diagram_interaction").property("action", "reset_view");
        let body = event_payload(&event, "t", "s");
        assert!(body.get("user_id").is_none());
        assert_eq!(
            body,
            json!({
                "event": "diagram_interaction",
                "properties": {"action": "reset_view", "timestamp": "t", "source": "s"},
            })
        );
    }

    #[test]
    fn habit_event_properties() {
        let event = habit_event("u1", "h7", "Walk", 5);
        assert_eq!(event.event, "habit_completed");
        assert_eq!(event.user_id.as_deref(), Some("u1"));
        assert_eq!(
            Value::Object(event.properties),
            json!({
                "habit_id": "h7",
                "habit_name": "Walk",
                "points_earned": 5,
                "category": "wellness",
            })
        );
    }

    #[test]
    fn memory_event_metadata_cannot_override_category() {
        let mut metadata = Map::new();
        metadata.insert("operation".into(), Value::from("bulk_add"));
        metadata.insert("category".into(), Value::from("spoofed"));
        metadata.insert("count".into(), Value::from(3));
        let event = memory_event("u1", MemoryOperation::Add, metadata);
        assert_eq!(event.event, "memory_operation");
        assert_eq!(
            Value::Object(event.properties),
            json!({
                "operation": "bulk_add",
                "count": 3,
                "category": "memory",
            })
        );
    }

    #[test]
    fn search_event_reports_length_not_text() {
        let event = search_event("u1", SearchType::QuickAnswer, "café 😀", Some(4));
        assert_eq!(event.event, "search_operation");
        assert_eq!(
            Value::Object(event.properties.clone()),
            json!({
                "search_type": "quick_answer",
                "query_length": 7,
                "results_count": 4,
                "category": "search",
            })
        );
        assert!(!serde_json::to_string(&event).unwrap().contains("café"));
    }

    #[test]
    fn search_event_without_results_count_omits_key() {
        let event = search_event("u1", SearchType::Web, "rust", None);
        assert_eq!(
            Value::Object(event.properties),
            json!({
                "search_type": "web",
                "query_length": 4,
                "category": "search",
            })
        );
    }

    #[test]
    fn agent_event_metadata_overrides_name_but_not_category() {
        let mut metadata = Map::new();
        metadata.insert("agent_name".into(), Value::from("renamed"));
        metadata.insert("category".into(), Value::from("other"));
        let event = agent_event("u1", "habit-coach", InteractionType::ToolUse, metadata);
        assert_eq!(event.event, "agent_interaction");
        assert_eq!(
            Value::Object(event.properties),
            json!({
                "agent_name": "renamed",
                "interaction_type": "tool_use",
                "category": "agents",
            })
        );
    }

    #[test]
    fn url_joins_without_double_slash() {
        let mut settings = AnalyticsSettings::with_api_key("k");
        settings.base_url = "http://localhost:1234/api/".into();
        let client = KeywordsAiClient::new(settings);
        assert_eq!(client.url("/health"), "http://localhost:1234/api/health");
    }

    #[test]
    fn timestamps_are_millisecond_utc() {
        let ts = now_iso();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
    }
}
