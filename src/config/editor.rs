//! `[editor]` section configuration.
//!
//! Contains page editor backend settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[editor]` section in portico.toml - page editor backend settings.
///
/// # Example
/// ```toml
/// [editor]
/// interface = "0.0.0.0"  # Listen on all interfaces
/// port = 8088
/// data = "editor/pages"  # Saved page documents
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct EditorConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    #[serde(default = "defaults::editor::interface")]
    #[educe(Default = defaults::editor::interface())]
    pub interface: String,

    /// HTTP port number (default: 5173).
    #[serde(default = "defaults::editor::port")]
    #[educe(Default = defaults::editor::port())]
    pub port: u16,

    /// Directory holding saved page documents (JSON + companion HTML).
    #[serde(default = "defaults::editor::data")]
    #[educe(Default = defaults::editor::data())]
    pub data: PathBuf,

    /// Root of the raw file browser. Defaults to the project root.
    /// Supports `~` expansion.
    #[serde(default = "defaults::editor::workspace")]
    #[educe(Default = defaults::editor::workspace())]
    pub workspace: Option<PathBuf>,
}
