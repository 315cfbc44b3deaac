//! Page document persistence.
//!
//! A saved page is two artifacts side by side: a JSON snapshot
//! (`<name>.json`) and a flattened static HTML file (`<name>.html`).
//! The JSON snapshot is an envelope around the editable document:
//!
//! ```json
//! {
//!   "pageName": "contact",
//!   "html": "<section>...</section>",
//!   "css": ".hero { ... }",
//!   "usedModules": ["module__footer"],
//!   "document": { "title": "Contact Us", "components": [...] }
//! }
//! ```
//!
//! `usedModules` is computed on save and stored inline; it is never
//! recomputed at load time. Every save overwrites the whole record.

use super::{StoreError, validate_name};
use crate::data::document::extract_module_ids;
use serde_json::{Map, Value, json};
use std::{fs, io, path::PathBuf};

/// Envelope fields stripped from the document on save and never returned
/// by load.
const ENVELOPE_FIELDS: &[&str] = &["pageName", "html", "css", "usedModules"];

/// File-backed store for page documents.
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save a page document sent by the editor.
    ///
    /// The incoming value must be a JSON object carrying a non-empty
    /// `pageName` (the internal name used as the file stem). Returns the
    /// internal name the record was saved under.
    pub fn save(&self, incoming: &Value) -> Result<String, StoreError> {
        let Some(fields) = incoming.as_object() else {
            return Err(StoreError::Validation(
                "page document must be a JSON object".into(),
            ));
        };

        let name = fields
            .get("pageName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(StoreError::Validation("pageName is required".into()));
        }
        validate_name(&name)?;

        let html = fields
            .get("html")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let css = fields
            .get("css")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        // Everything that is not envelope data is the editable document
        let mut document = Map::new();
        for (key, value) in fields {
            if !ENVELOPE_FIELDS.contains(&key.as_str()) {
                document.insert(key.clone(), value.clone());
            }
        }
        let document = Value::Object(document);

        let used_modules: Vec<String> = extract_module_ids(&document).into_iter().collect();

        let title = document
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&name)
            .to_string();

        let record = json!({
            "pageName": name,
            "html": html,
            "css": css,
            "usedModules": used_modules,
            "document": document,
        });

        fs::create_dir_all(&self.dir)?;
        let serialized = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        fs::write(self.json_path(&name), serialized)?;
        fs::write(self.html_path(&name), static_page(&title, &html, &css))?;

        Ok(name)
    }

    /// Load the editable document for a page.
    ///
    /// The envelope fields are stripped; the nested document's fields come
    /// back at the top level.
    pub fn load(&self, name: &str) -> Result<Value, StoreError> {
        validate_name(name)?;

        let path = self.json_path(name);
        let raw = fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(format!("page `{name}`")),
            _ => StoreError::Io(err),
        })?;

        let record: Value =
            serde_json::from_str(&raw).map_err(|e| StoreError::Decode(e.to_string()))?;
        record
            .get("document")
            .cloned()
            .ok_or_else(|| StoreError::Decode(format!("page `{name}` has no document")))
    }

    /// Create a page seeded with the default two-section document.
    ///
    /// `page_name` is the display title; `internal_name` becomes the file
    /// stem for both artifacts.
    pub fn create(&self, page_name: &str, internal_name: &str) -> Result<(), StoreError> {
        if page_name.trim().is_empty() {
            return Err(StoreError::Validation("pageName is required".into()));
        }
        if internal_name.trim().is_empty() {
            return Err(StoreError::Validation("internalName is required".into()));
        }

        let seeded = json!({
            "pageName": internal_name,
            "title": page_name,
            "html": format!(
                "<section class=\"pt-section\"><h1>{page_name}</h1></section>\
                 <section class=\"pt-section\"><p>Start editing this page.</p></section>"
            ),
            "css": ".pt-section { padding: 2rem; }",
            "components": [
                {
                    "type": "wrapper",
                    "id": "section-1",
                    "components": [{ "type": "textnode", "content": page_name }],
                },
                {
                    "type": "wrapper",
                    "id": "section-2",
                    "components": [
                        { "type": "textnode", "content": "Start editing this page." },
                    ],
                },
            ],
        });

        self.save(&seeded)?;
        Ok(())
    }

    /// Delete a page record and its companion static HTML.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;

        let json_path = self.json_path(name);
        fs::remove_file(&json_path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(format!("page `{name}`")),
            _ => StoreError::Io(err),
        })?;

        // The companion file may already be gone; that is not an error
        let html_path = self.html_path(name);
        if html_path.exists() {
            fs::remove_file(html_path)?;
        }
        Ok(())
    }

    /// List saved page names, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    path.file_stem().map(|s| s.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Raw bytes of the companion static HTML file.
    pub fn static_html(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        validate_name(name)?;

        fs::read(self.html_path(name)).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(format!("page `{name}`")),
            _ => StoreError::Io(err),
        })
    }

    fn json_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn html_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.html"))
    }
}

/// Compose the flattened static page: markup with the stylesheet inlined.
fn static_page(title: &str, html: &str, css: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{css}</style>\n</head>\n\
         <body>\n{html}\n</body>\n</html>\n"
    )
}

// ============================================================================
// Tests
// ============================================================================
