//! Editor API routes.
//!
//! Thin handlers over the page and table stores. Handlers return
//! `Result<Reply, StoreError>`; the transport layer in `mod.rs` turns
//! both arms into HTTP responses.

use super::{EditorState, Reply};
use crate::data::StoreError;
use serde_json::{Value, json};
use std::io::Read;
use tera::Context;
use tiny_http::{Method, Request};

/// Route one request to its handler.
///
/// `path` is the decoded URL path without leading/trailing slashes;
/// `query` is the raw query string, if any.
pub fn route(
    request: &mut Request,
    state: &EditorState,
    path: &str,
    query: Option<&str>,
) -> Result<Reply, StoreError> {
    let method = request.method().clone();
    let segments: Vec<&str> = if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    };

    match (&method, segments.as_slice()) {
        // Editor UI (markup, not an envelope)
        (Method::Get, []) => serve_ui(state),

        // Page documents
        (Method::Get, ["api", "pages"]) => list_pages(state),
        (Method::Post, ["api", "pages"]) => save_page(request, state),
        (Method::Post, ["api", "pages", "create"]) => create_page(request, state),
        (Method::Get, ["api", "pages", name]) => load_page(state, name),
        (Method::Delete, ["api", "pages", name]) => delete_page(state, name),

        // Hubdb tables
        (Method::Get, ["api", "tables"]) => list_tables(state),
        (Method::Get, ["api", "tables", name]) => read_table(state, name, query),
        (Method::Post, ["api", "tables", name]) => write_table(request, state, name),
        (Method::Delete, ["api", "tables", name]) => delete_table(state, name),

        // Workspace file browser
        (Method::Get, ["api", "files"]) => list_files(state, query),
        (Method::Get, ["api", "files", "read"]) => read_file(state, query),
        (Method::Post, ["api", "files", "write"]) => write_file(request, state),

        // Static preview of a saved page (markup, not an envelope)
        (Method::Get, ["preview", name]) => preview_page(state, name),

        _ => Err(StoreError::NotFound(format!("route `/{path}`"))),
    }
}

// ============================================================================
// Editor UI & Previews
// ============================================================================

fn serve_ui(state: &EditorState) -> Result<Reply, StoreError> {
    let html = state
        .tera
        .render("editor.html", &Context::new())
        .map_err(|err| match err.kind {
            tera::ErrorKind::TemplateNotFound(name) => {
                StoreError::NotFound(format!("template `{name}`"))
            }
            _ => StoreError::Unexpected(err.to_string()),
        })?;
    Ok(Reply::Markup(html.into_bytes()))
}

fn preview_page(state: &EditorState, name: &str) -> Result<Reply, StoreError> {
    // Allow "/preview/contact" and "/preview/contact.html" alike
    let name = name.strip_suffix(".html").unwrap_or(name);
    Ok(Reply::Markup(state.pages.static_html(name)?))
}

// ============================================================================
// Page Handlers
// ============================================================================

fn list_pages(state: &EditorState) -> Result<Reply, StoreError> {
    let names = state.pages.list()?;
    Ok(Reply::data(json!(names)))
}

fn save_page(request: &mut Request, state: &EditorState) -> Result<Reply, StoreError> {
    let body = read_json_body(request)?;
    let name = state.pages.save(&body)?;
    Ok(Reply::message(format!("Data saved to {name}.json")))
}

fn load_page(state: &EditorState, name: &str) -> Result<Reply, StoreError> {
    let document = state.pages.load(name)?;
    Ok(Reply::data(document))
}

fn create_page(request: &mut Request, state: &EditorState) -> Result<Reply, StoreError> {
    let body = read_json_body(request)?;
    let page_name = required_str(&body, "pageName")?;
    let internal_name = required_str(&body, "internalName")?;

    state.pages.create(page_name, internal_name)?;
    Ok(Reply::message(format!("Page `{internal_name}` created")))
}

fn delete_page(state: &EditorState, name: &str) -> Result<Reply, StoreError> {
    state.pages.delete(name)?;
    Ok(Reply::message(format!("Page `{name}` deleted")))
}

// ============================================================================
// Table Handlers
// ============================================================================

fn list_tables(state: &EditorState) -> Result<Reply, StoreError> {
    let names = state.tables.list()?;
    Ok(Reply::data(json!(names)))
}

fn read_table(
    state: &EditorState,
    name: &str,
    query: Option<&str>,
) -> Result<Reply, StoreError> {
    let filter = query_param(query, "filter");
    let rows = state.tables.read(name, filter.as_deref())?;
    Ok(Reply::data(json!(rows)))
}

fn write_table(
    request: &mut Request,
    state: &EditorState,
    name: &str,
) -> Result<Reply, StoreError> {
    let body = read_json_body(request)?;
    let rows: Vec<Vec<String>> = body
        .get("rows")
        .cloned()
        .ok_or_else(|| StoreError::Validation("rows is required".into()))
        .and_then(|rows| {
            serde_json::from_value(rows)
                .map_err(|_| StoreError::Validation("rows must be an array of string rows".into()))
        })?;

    state.tables.write(name, &rows)?;
    Ok(Reply::message(format!("Table `{name}` saved")))
}

fn delete_table(state: &EditorState, name: &str) -> Result<Reply, StoreError> {
    state.tables.delete(name)?;
    Ok(Reply::message(format!("Table `{name}` deleted")))
}

// ============================================================================
// File Browser Handlers
// ============================================================================

fn list_files(state: &EditorState, query: Option<&str>) -> Result<Reply, StoreError> {
    let path = query_param(query, "path").unwrap_or_default();
    let entries = state.workspace.list(&path)?;
    Ok(Reply::data(serde_json::to_value(entries).map_err(|e| {
        StoreError::Unexpected(e.to_string())
    })?))
}

fn read_file(state: &EditorState, query: Option<&str>) -> Result<Reply, StoreError> {
    let path = query_param(query, "path")
        .ok_or_else(|| StoreError::Validation("path is required".into()))?;
    let content = state.workspace.read(&path)?;
    Ok(Reply::data(json!({"path": path, "content": content})))
}

fn write_file(request: &mut Request, state: &EditorState) -> Result<Reply, StoreError> {
    let body = read_json_body(request)?;
    let path = required_str(&body, "path")?;
    let content = required_str(&body, "content")?;

    state.workspace.write(path, content)?;
    Ok(Reply::message(format!("File `{path}` written")))
}

// ============================================================================
// Request Helpers
// ============================================================================

/// Read and parse the request body as JSON.
fn read_json_body(request: &mut Request) -> Result<Value, StoreError> {
    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(format!("invalid JSON body: {e}")))
}

/// Pull a required string field from a JSON body.
fn required_str<'a>(body: &'a Value, key: &str) -> Result<&'a str, StoreError> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| StoreError::Validation(format!("{key} is required")))
}

/// Extract one parameter from a query string.
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
}

// ============================================================================
// Tests
// ============================================================================
