pub mod client;
mod error;
pub mod settings;
pub mod sink;
pub mod types;

pub use client::KeywordsAiClient;
pub use error::AnalyticsError;
pub use settings::AnalyticsSettings;
pub use sink::{AnalyticsSink, BestEffortSink, MemorySink, NullSink};
pub use types::{
    AnalyticsEvent, HealthState, HealthStatus, InteractionType, LogData, LogMessage,
    MemoryOperation, Metrics, SearchType, TimeRange,
};
