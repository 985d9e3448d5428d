mod session;

use std::path::PathBuf;
use std::sync::Arc;

use archview_analytics::{AnalyticsSink, BestEffortSink, KeywordsAiClient, NullSink};
use archview_core::{Canvas, CanvasMode, Dataset, Frame, InputEvent, PointerTarget};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use session::ViewerSession;

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct PointerDownRequest {
    /// Screen-space x of the pointer
    x: f64,
    /// Screen-space y of the pointer
    y: f64,
    /// What was struck: {"kind": "background"} or {"kind": "node", "id": "<node id>"}
    target: PointerTarget,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct PointerMoveRequest {
    /// Screen-space x of the pointer
    x: f64,
    /// Screen-space y of the pointer
    y: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct WheelRequest {
    /// Wheel delta. Positive scrolls down and zooms out one 10% step; anything else zooms in.
    delta_y: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct NodeRequest {
    /// ID of the node (e.g. "keywords-ai")
    node_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ReplayRequest {
    /// Events applied in order, e.g. [{"type": "pointerDown", "x": 0, "y": 0, "target": {"kind": "background"}}, {"type": "pointerMove", "x": 40, "y": 0}, {"type": "pointerUp"}]
    events: Vec<InputEvent>,
}

// --- Server ---

#[derive(Clone)]
pub struct ArchviewServer {
    tool_router: ToolRouter<Self>,
    session: Arc<ViewerSession>,
}

#[tool_router]
impl ArchviewServer {
    pub fn new(canvas: Canvas, sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            session: Arc::new(ViewerSession::new(canvas, sink)),
        }
    }

    #[tool(
        description = "Get the current render frame: viewport {translateX, translateY, scale}, CSS transform, node cards with canvas-space positions, routed connections (dangling ones omitted), selection, active drag, stats and legend."
    )]
    fn get_frame(&self) -> Result<CallToolResult, McpError> {
        Ok(frame_result(&self.session.frame()))
    }

    #[tool(description = "Get one node card, including its details list, at its current position")]
    fn get_node(&self, Parameters(req): Parameters<NodeRequest>) -> Result<CallToolResult, McpError> {
        match self.session.node(&req.node_id) {
            Some(node) => Ok(json_result(&node)),
            None => Ok(CallToolResult::error(vec![Content::text(format!(
                "Node '{}' not found",
                req.node_id
            ))])),
        }
    }

    #[tool(
        description = "Press the pointer. A background target starts panning the canvas; a node target starts dragging that node. Unknown node ids are ignored."
    )]
    fn pointer_down(
        &self,
        Parameters(req): Parameters<PointerDownRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::PointerDown {
            x: req.x,
            y: req.y,
            target: req.target,
        })
    }

    #[tool(description = "Move the pointer. Pans or drags when a gesture is in progress, otherwise does nothing.")]
    fn pointer_move(
        &self,
        Parameters(req): Parameters<PointerMoveRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::PointerMove { x: req.x, y: req.y })
    }

    #[tool(description = "Release the pointer, ending any pan or drag")]
    fn pointer_up(&self) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::PointerUp)
    }

    #[tool(description = "The pointer left the canvas. Ends any pan or drag like a release.")]
    fn pointer_leave(&self) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::PointerLeave)
    }

    #[tool(description = "Scroll the wheel over the canvas to zoom by one step, clamped to the zoom range")]
    fn wheel(&self, Parameters(req): Parameters<WheelRequest>) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::Wheel {
            delta_y: req.delta_y,
        })
    }

    #[tool(description = "Click a node to toggle its selection")]
    fn click_node(&self, Parameters(req): Parameters<NodeRequest>) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::Click {
            target: PointerTarget::Node { id: req.node_id },
        })
    }

    #[tool(description = "Reset pan and zoom to identity and clear the selection. Node positions are kept.")]
    fn reset_view(&self) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::ResetView)
    }

    #[tool(description = "Move every node back to its original position, reset pan and zoom, and clear the selection")]
    fn reset_layout(&self) -> Result<CallToolResult, McpError> {
        self.dispatch(InputEvent::ResetLayout)
    }

    #[tool(description = "Apply a sequence of input events in order and return the final frame")]
    fn replay(&self, Parameters(req): Parameters<ReplayRequest>) -> Result<CallToolResult, McpError> {
        Ok(frame_result(&self.session.apply(req.events)))
    }
}

impl ArchviewServer {
    fn dispatch(&self, event: InputEvent) -> Result<CallToolResult, McpError> {
        Ok(frame_result(&self.session.apply([event])))
    }
}

#[tool_handler]
impl ServerHandler for ArchviewServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

const INSTRUCTIONS: &str = r#"Interactive architecture diagram canvas.

Coordinates passed to pointer tools are screen-space pixels. Node positions in frames are canvas-space: the viewport transform (translate, then scale) maps them to the screen.

- Pan: pointer_down on {"kind": "background"}, pointer_move, pointer_up. Panning follows the pointer 1:1 at every zoom level.
- Drag a node: pointer_down on {"kind": "node", "id": ...}, pointer_move, pointer_up. Screen movement is divided by the zoom so the card tracks the pointer.
- Zoom: wheel. 10% per tick, clamped to the canvas zoom range.
- Only one gesture is ever active. pointer_leave cancels it.
- Use replay to send many events in one call."#;

// --- Helpers ---

fn json_result<T: serde::Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!("Serialization error: {}", e))]),
    }
}

fn frame_result(frame: &Frame) -> CallToolResult {
    json_result(frame)
}

struct Options {
    dataset: Option<PathBuf>,
    mode: CanvasMode,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        dataset: std::env::var_os("ARCHVIEW_DATASET").map(PathBuf::from),
        mode: CanvasMode::Diagram,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dataset" => {
                let path = args.next().ok_or("--dataset needs a path")?;
                options.dataset = Some(PathBuf::from(path));
            }
            "--image" => options.mode = CanvasMode::Image,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn build_canvas(options: &Options) -> Result<Canvas, archview_core::DatasetError> {
    if options.mode == CanvasMode::Image {
        return Ok(Canvas::image());
    }
    let dataset = match &options.dataset {
        Some(path) => archview_core::load_dataset(path)?,
        None => Dataset::builtin(),
    };
    tracing::info!(
        nodes = dataset.nodes.len(),
        connections = dataset.connections.len(),
        "dataset loaded"
    );
    Ok(Canvas::with_mode(dataset, options.mode))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args().map_err(|e| {
        eprintln!("Usage: archview-mcp [--dataset <path>] [--image]");
        e
    })?;
    let canvas = build_canvas(&options)?;

    let sink: Arc<dyn AnalyticsSink> = match BestEffortSink::on_current_runtime(KeywordsAiClient::from_env()) {
        Some(sink) => Arc::new(sink),
        None => Arc::new(NullSink),
    };

    let service = ArchviewServer::new(canvas, sink)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {}", e))?;
    service.waiting().await?;
    Ok(())
}
