//! Site configuration management for `portico.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[base]`    | Site metadata (title, description, url)        |
//! | `[build]`   | Build paths, minify, scss, sitemap, garbage    |
//! | `[editor]`  | Page editor backend (port, data, workspace)    |
//! | `[extra]`   | User-defined custom fields                     |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "My Portfolio"
//! description = "A design portfolio"
//! url = "https://example.com"
//!
//! [build]
//! templates = "templates"
//! output = "public"
//! minify = true
//!
//! [build.sitemap]
//! enable = true
//!
//! [editor]
//! port = 5173
//!
//! [extra]
//! analytics_id = "UA-12345"
//! ```

mod base;
mod build;
pub mod defaults;
mod editor;
mod error;

// Internal imports used in this module
use base::BaseConfig;
use build::BuildConfig;
use editor::EditorConfig;
use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing portico.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Page editor backend settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Get CLI arguments reference
    pub fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        // Determine the final root path based on command
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                let base = cli
                    .root
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| self.get_root().to_owned());
                base.join(name)
            }
            _ => cli
                .root
                .as_ref()
                .cloned()
                .unwrap_or_else(|| self.get_root().to_owned()),
        };

        self.set_root(&root);

        match &cli.command {
            Commands::Build { build_args } => {
                self.build.preview = build_args.preview;
                if build_args.preview {
                    // Preview builds land in their own tree, unminified
                    self.build.output = self.build.preview_output.clone();
                    self.build.minify = false;
                    self.build.sitemap.enable = false;
                }
                Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
                Self::update_option(&mut self.build.sitemap.enable, build_args.sitemap.as_ref());
            }
            Commands::Editor { interface, port } => {
                Self::update_option(&mut self.editor.interface, interface.as_ref());
                Self::update_option(&mut self.editor.port, port.as_ref());
            }
            _ => {}
        }

        self.update_path_with_root(&root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path) {
        let cli = self.get_cli();

        // Apply CLI overrides first
        Self::update_option(&mut self.build.templates, cli.templates.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        // Normalize root to absolute path
        let root = Self::normalize_path(root);
        self.set_root(&root);

        // Normalize config path
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        // Normalize all directory paths
        self.build.templates = Self::normalize_path(&root.join(&self.build.templates));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.preview_output = Self::normalize_path(&root.join(&self.build.preview_output));
        self.build.hubdb = Self::normalize_path(&root.join(&self.build.hubdb));
        self.build.scss.source = Self::normalize_path(&root.join(&self.build.scss.source));
        self.build.scss.output = Self::normalize_path(&root.join(&self.build.scss.output));
        self.build.sitemap.path = self.build.output.join(&self.build.sitemap.path);
        self.editor.data = Self::normalize_path(&root.join(&self.editor.data));

        // Garbage paths are dev-only leftovers under the root
        self.build.garbage = self
            .build
            .garbage
            .iter()
            .map(|p| Self::normalize_path(&root.join(p)))
            .collect();

        // Normalize workspace path (with tilde expansion); default to root
        let workspace = match &self.editor.workspace {
            Some(path) => {
                let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
                let path = PathBuf::from(expanded);
                if path.is_relative() {
                    Self::normalize_path(&root.join(path))
                } else {
                    Self::normalize_path(&path)
                }
            }
            None => root.clone(),
        };
        self.editor.workspace = Some(workspace);
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if self.build.sitemap.enable && self.base.url.is_none() {
            bail!("[base.url] is required for sitemap generation");
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.build.scss.enable {
            Self::check_command_installed("[build.scss.command]", &self.build.scss.command)?;
        }

        if let Commands::Init { .. } = &self.get_cli().command
            && self.get_root().exists()
        {
            bail!("Path already exists");
        }

        Ok(())
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        if command.is_empty() {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        }

        let cmd = &command[0];
        which::which(cmd).with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let config_str = r#"
            [base]
            title = "My Portfolio"
            description = "A test portfolio"
        "#;
        let result = SiteConfig::from_str(config_str);

        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.base.title, "My Portfolio");
        assert_eq!(config.base.description, "A test portfolio");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let invalid_config = r#"
            [base
            title = "My Portfolio"
        "#;
        let result = SiteConfig::from_str(invalid_config);

        assert!(result.is_err());
    }

    #[test]
    fn test_get_root_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
    }

    #[test]
    fn test_set_root() {
        let mut config = SiteConfig::default();
        config.set_root(Path::new("/custom/path"));
        assert_eq!(config.get_root(), Path::new("/custom/path"));
    }

    #[test]
    fn test_extra_fields() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"

            [extra]
            custom_field = "custom_value"
            number_field = 42
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(
            config.extra.get("custom_field").and_then(|v| v.as_str()),
            Some("custom_value")
        );
        assert_eq!(
            config.extra.get("number_field").and_then(|v| v.as_integer()),
            Some(42)
        );
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();

        assert!(config.cli.is_none());
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.base.title, "");
        assert!(config.build.minify);
        assert!(!config.build.preview);
        assert_eq!(config.editor.port, 5173);
    }

    #[test]
    fn test_full_config_all_sections() {
        let config = r#"
            [base]
            title = "My Portfolio"
            description = "A personal portfolio"
            url = "https://myportfolio.com"
            language = "en-US"

            [build]
            templates = "templates"
            output = "dist"
            minify = true
            garbage = ["_partials", "editor.html"]

            [build.scss]
            enable = false

            [build.sitemap]
            enable = true
            changefreq = "weekly"
            priority = "0.8"

            [editor]
            interface = "127.0.0.1"
            port = 3000
            data = "editor/pages"

            [extra]
            analytics_id = "UA-12345"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "My Portfolio");
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(config.build.sitemap.enable);
        assert_eq!(config.editor.port, 3000);
        assert!(config.extra.contains_key("analytics_id"));
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [unknown_section]
            field = "value"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
