//! Page editor backend.
//!
//! A lightweight HTTP server for the drag-and-drop page editor, built on
//! `tiny_http`:
//!
//! - the editor UI, rendered from `editor.html` in the template directory
//! - page document CRUD (JSON snapshots + companion static HTML)
//! - hubdb table CRUD (CSV)
//! - a raw file browser/publisher scoped to the workspace directory
//! - static previews of saved pages
//!
//! Every API response is a JSON envelope
//! `{"status": "success"|"error", "message"?, "data"?}`; only the editor
//! UI and preview routes return markup directly. Requests are handled
//! sequentially on the main thread, so access to any given JSON/CSV file
//! is serialized by construction.

mod api;
mod files;

use crate::{
    config::SiteConfig,
    data::{StoreError, pages::PageStore, table::TableStore},
    log,
};
use anyhow::{Context as _, Result};
use files::Workspace;
use serde_json::{Value, json};
use std::{borrow::Cow, net::SocketAddr, sync::Arc};
use tera::Tera;
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Everything a request handler needs, created once at startup.
pub struct EditorState {
    tera: Tera,
    pages: PageStore,
    tables: TableStore,
    workspace: Workspace,
}

/// Successful handler outcome.
pub enum Reply {
    /// JSON success envelope
    Envelope {
        message: Option<String>,
        data: Option<Value>,
    },
    /// Markup returned directly (editor UI, static previews)
    Markup(Vec<u8>),
}

impl Reply {
    fn message(message: impl Into<String>) -> Self {
        Reply::Envelope {
            message: Some(message.into()),
            data: None,
        }
    }

    fn data(data: Value) -> Self {
        Reply::Envelope {
            message: None,
            data: Some(data),
        }
    }
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the editor backend.
///
/// Binds to the configured interface and port (with auto-retry on port
/// conflict), sets up Ctrl+C for graceful shutdown and enters the request
/// loop. Blocks until Ctrl+C is received.
pub fn serve_editor(config: &'static SiteConfig) -> Result<()> {
    let interface: std::net::IpAddr = config.editor.interface.parse()?;
    let (server, addr) = try_bind_port(interface, config.editor.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("editor"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    let state = EditorState::new(config)?;
    log!("editor"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &state) {
            log!("editor"; "request error: {e}");
        }
    }

    Ok(())
}

impl EditorState {
    fn new(config: &'static SiteConfig) -> Result<Self> {
        let glob = format!("{}/**/*.html", config.build.templates.display());
        let tera = Tera::new(&glob).context("Failed to load editor templates")?;

        let workspace_root = config
            .editor
            .workspace
            .as_deref()
            .unwrap_or_else(|| config.get_root());

        Ok(Self {
            tera,
            pages: PageStore::new(&config.editor.data),
            tables: TableStore::new(&config.build.hubdb),
            workspace: Workspace::new(workspace_root)?,
        })
    }
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("editor"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => {
                // Will retry silently
                continue;
            }
            Err(e) => {
                // Last attempt failed
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    max_retries,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

// ============================================================================
// Request Handling
// ============================================================================

/// Handle a single HTTP request: route it, then translate the outcome into
/// an HTTP response. Failures never cross this boundary unhandled.
fn handle_request(mut request: Request, state: &EditorState) -> Result<()> {
    // Decode URL-encoded characters (e.g., %20 → space)
    let url = urlencoding::decode(request.url())
        .map(Cow::into_owned)
        .unwrap_or_default();

    let path = url
        .split('?')
        .next()
        .unwrap_or(&url)
        .trim_matches('/')
        .to_string();
    let query = url.split_once('?').map(|(_, q)| q.to_string());

    let outcome = api::route(&mut request, state, &path, query.as_deref());
    respond(request, outcome)
}

/// Translate a handler outcome into an HTTP response.
fn respond(request: Request, outcome: Result<Reply, StoreError>) -> Result<()> {
    match outcome {
        Ok(Reply::Envelope { message, data }) => {
            let mut envelope = json!({"status": "success"});
            if let Some(message) = message {
                envelope["message"] = json!(message);
            }
            if let Some(data) = data {
                envelope["data"] = data;
            }
            respond_json(request, 200, &envelope)
        }
        Ok(Reply::Markup(body)) => {
            let response = Response::from_data(body).with_header(
                Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap(),
            );
            request.respond(response)?;
            Ok(())
        }
        Err(err) => {
            let envelope = json!({"status": "error", "message": err.to_string()});
            respond_json(request, status_for(&err), &envelope)
        }
    }
}

fn respond_json(request: Request, status: u16, body: &Value) -> Result<()> {
    let response = Response::from_string(body.to_string())
        .with_status_code(StatusCode(status))
        .with_header(
            Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap(),
        );
    request.respond(response)?;
    Ok(())
}

/// HTTP status code for each error kind.
fn status_for(err: &StoreError) -> u16 {
    match err {
        StoreError::NotFound(_) => 404,
        StoreError::Validation(_) | StoreError::Decode(_) => 400,
        StoreError::Io(_) | StoreError::Unexpected(_) => 500,
    }
}

// ============================================================================
// Tests
// ============================================================================
