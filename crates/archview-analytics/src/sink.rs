//! Fire-and-forget delivery of analytics events.

use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;

use crate::client::KeywordsAiClient;
use crate::types::AnalyticsEvent;

/// Accepts events without blocking, failing, or telling the caller what happened.
pub trait AnalyticsSink: Send + Sync {
    fn report(&self, event: AnalyticsEvent);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn report(&self, _event: AnalyticsEvent) {}
}

/// Keeps events in memory, for tests and local inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AnalyticsSink for MemorySink {
    fn report(&self, event: AnalyticsEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Posts each event on a background task of the runtime it was built on.
#[derive(Debug, Clone)]
pub struct BestEffortSink {
    client: Arc<KeywordsAiClient>,
    runtime: Handle,
}

impl BestEffortSink {
    pub fn new(client: KeywordsAiClient, runtime: Handle) -> Self {
        Self {
            client: Arc::new(client),
            runtime,
        }
    }

    /// Bind to the runtime of the calling context, if there is one.
    pub fn on_current_runtime(client: KeywordsAiClient) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|runtime| Self::new(client, runtime))
    }
}

impl AnalyticsSink for BestEffortSink {
    fn report(&self, event: AnalyticsEvent) {
        if !self.client.is_configured() {
            tracing::trace!(event = %event.event, "analytics disabled, dropping event");
            return;
        }
        let client = Arc::clone(&self.client);
        self.runtime.spawn(async move {
            client.track_event(&event).await;
        });
    }
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSink for Arc<S> {
    fn report(&self, event: AnalyticsEvent) {
        (**self).report(event)
    }
}
