use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ArchitectureNode, Category, Connection, Position};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),
}

/// Immutable seed data: the nodes and connections the canvas starts from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub nodes: Vec<ArchitectureNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate node ids. Dangling connections are kept.
    pub fn new(
        nodes: Vec<ArchitectureNode>,
        connections: Vec<Connection>,
    ) -> Result<Self, DatasetError> {
        let dataset = Self { nodes, connections };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_str(raw)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(DatasetError::DuplicateNodeId(node.id.clone()));
            }
        }
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&ArchitectureNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The reference architecture shipped with the viewer.
    pub fn builtin() -> Self {
        let nodes = vec![
            node(
                "keywords-ai",
                "Keywords AI Gateway",
                "Primary LLM provider with 250+ models",
                Category::Core,
                (0.0, 0.0),
                &["general-agent", "habit-coach", "analytics"],
                &["Load balancing & retries", "GPT-4o, Claude, Gemini, Llama", "Real-time analytics", "Cost tracking"],
                "bg-blue-500",
            ),
            node(
                "mem0",
                "Mem0 Memory System",
                "Persistent conversation memory",
                Category::Core,
                (300.0, -100.0),
                &["supabase", "general-agent"],
                &["OpenAI embeddings", "1536-dimension vectors", "Context retrieval", "User preferences"],
                "bg-purple-500",
            ),
            node(
                "tavily",
                "Tavily Search",
                "Real-time web search",
                Category::Core,
                (-300.0, -100.0),
                &["general-agent", "habit-coach"],
                &["Web & news search", "AI-generated summaries", "Source attribution", "Recency filtering"],
                "bg-green-500",
            ),
            node(
                "general-agent",
                "General Agent",
                "Primary wellness assistant",
                Category::Agents,
                (0.0, 200.0),
                &["indexeddb", "chat-api", "habit-coach"],
                &["Habit tracking", "Points management", "Memory operations", "Web search integration"],
                "bg-orange-500",
            ),
            node(
                "habit-coach",
                "Habit Coach Agent",
                "Evidence-based coaching",
                Category::Agents,
                (300.0, 200.0),
                &["general-agent", "tavily"],
                &["Personalized strategies", "Scientific research", "Progress tracking", "Memory-based continuity"],
                "bg-indigo-500",
            ),
            node(
                "supabase",
                "Supabase Database",
                "Primary PostgreSQL database",
                Category::Storage,
                (600.0, 0.0),
                &["mem0", "auth-api"],
                &["User profiles", "Memory history", "Row Level Security", "Real-time subscriptions"],
                "bg-emerald-500",
            ),
            node(
                "indexeddb",
                "IndexedDB",
                "Local browser storage",
                Category::Storage,
                (0.0, 400.0),
                &["general-agent", "ui-layer"],
                &["Offline capability", "Habits & completions", "Rewards & redemptions", "Real-time sync"],
                "bg-cyan-500",
            ),
            node(
                "chat-api",
                "Chat API",
                "/api/chat/completions",
                Category::Api,
                (-300.0, 200.0),
                &["keywords-ai", "general-agent"],
                &["Function calling support", "User tracking", "Memory integration", "Analytics tracking"],
                "bg-red-500",
            ),
            node(
                "auth-api",
                "Auth API",
                "Authentication endpoints",
                Category::Api,
                (600.0, 200.0),
                &["supabase", "ui-layer"],
                &["Supabase Auth", "JWT tokens", "Session management", "CSRF protection"],
                "bg-yellow-500",
            ),
            node(
                "ui-layer",
                "React UI Layer",
                "Next.js frontend",
                Category::Ui,
                (300.0, 400.0),
                &["indexeddb", "auth-api", "realtime"],
                &["Mobile-first responsive", "Context providers", "Real-time updates", "Voice streaming"],
                "bg-pink-500",
            ),
            node(
                "realtime",
                "Real-time Features",
                "WebRTC & live updates",
                Category::Ui,
                (600.0, 400.0),
                &["ui-layer"],
                &["Voice streaming", "Live habit updates", "Real-time analytics", "WebRTC connection"],
                "bg-violet-500",
            ),
            node(
                "analytics",
                "Analytics Dashboard",
                "Keywords AI monitoring",
                Category::Integration,
                (-600.0, 0.0),
                &["keywords-ai"],
                &["Request patterns", "Token usage & costs", "User behavior", "Performance metrics"],
                "bg-teal-500",
            ),
            node(
                "security",
                "Security Layer",
                "Multi-layer protection",
                Category::Security,
                (-600.0, 200.0),
                &["auth-api"],
                &["Encryption in-transit", "Row Level Security", "Rate limiting", "Input validation"],
                "bg-slate-500",
            ),
        ];

        let connections = vec![
            connection("keywords-ai", "general-agent", "LLM Requests"),
            connection("keywords-ai", "habit-coach", "AI Processing"),
            connection("mem0", "supabase", "Memory Storage"),
            connection("tavily", "general-agent", "Search Results"),
            connection("general-agent", "indexeddb", "Data Updates"),
            connection("chat-api", "keywords-ai", "Proxy Requests"),
            connection("supabase", "auth-api", "User Data"),
            connection("ui-layer", "indexeddb", "Local Storage"),
            connection("keywords-ai", "analytics", "Metrics"),
        ];

        Self { nodes, connections }
    }
}

#[allow(clippy::too_many_arguments)]
fn node(
    id: &str,
    title: &str,
    description: &str,
    category: Category,
    (x, y): (f64, f64),
    connections: &[&str],
    details: &[&str],
    color: &str,
) -> ArchitectureNode {
    ArchitectureNode {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        position: Position { x, y },
        connections: connections.iter().map(|s| s.to_string()).collect(),
        details: details.iter().map(|s| s.to_string()).collect(),
        color: color.to_string(),
    }
}

fn connection(from: &str, to: &str, label: &str) -> Connection {
    Connection {
        from: from.to_string(),
        to: to.to_string(),
        label: Some(label.to_string()),
    }
}

/// Read and validate a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Dataset::from_json(&raw)
}

/// Mutable working copy of the dataset's nodes. Order is paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NodeSet {
    nodes: Vec<ArchitectureNode>,
}

impl NodeSet {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            nodes: dataset.nodes.clone(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ArchitectureNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.get(id).map(|n| n.position)
    }

    /// Move one node. Returns false when the id is unknown.
    pub fn set_position(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Put every node back where the dataset had it.
    pub fn restore(&mut self, dataset: &Dataset) {
        self.nodes = dataset.nodes.clone();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchitectureNode> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[ArchitectureNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
