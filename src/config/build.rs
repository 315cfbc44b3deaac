//! `[build]` section configuration.
//!
//! Contains build settings: paths, minification, SCSS, sitemap and the
//! garbage-collection list.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in portico.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// templates = "templates"   # Source directory
/// output = "public"         # Output directory
/// minify = true             # Minify HTML
///
/// [build.scss]
/// enable = true
/// command = ["sass"]
///
/// [build.sitemap]
/// enable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Template source directory.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Preview build output directory.
    #[serde(default = "defaults::build::preview_output")]
    #[educe(Default = defaults::build::preview_output())]
    pub preview_output: PathBuf,

    /// Directory holding the hubdb CSV tables.
    #[serde(default = "defaults::build::hubdb")]
    #[educe(Default = defaults::build::hubdb())]
    pub hubdb: PathBuf,

    /// Minify HTML output (removes whitespace, minifies inline CSS/JS).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Strip the `.html` extension from sitemap and canonical URLs.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub strip_html_extension: bool,

    /// Header template rendered in place of case-study pages.
    #[serde(default = "defaults::build::case_study_header")]
    #[educe(Default = defaults::build::case_study_header())]
    pub case_study_header: Option<String>,

    /// Dev-only paths (relative to root) removed after a production build.
    #[serde(default = "defaults::build::garbage")]
    #[educe(Default = defaults::build::garbage())]
    pub garbage: Vec<PathBuf>,

    /// Preview mode (set via CLI `build --preview`, never from the file).
    #[serde(skip)]
    pub preview: bool,

    /// SCSS compilation settings.
    #[serde(default)]
    pub scss: ScssConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.scss]` section - SCSS compilation via an external compiler.
///
/// The compiler is invoked once per `.scss` file found under `source`,
/// writing a compressed `.css` next to it under `output`.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ScssConfig {
    /// Enable SCSS compilation before rendering.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub enable: bool,

    /// SCSS compiler command and leading arguments.
    #[serde(default = "defaults::build::scss::command")]
    #[educe(Default = defaults::build::scss::command())]
    pub command: Vec<String>,

    /// Directory scanned for `.scss` files.
    #[serde(default = "defaults::build::scss::source")]
    #[educe(Default = defaults::build::scss::source())]
    pub source: PathBuf,

    /// Directory receiving compiled `.css` files.
    #[serde(default = "defaults::build::scss::output")]
    #[educe(Default = defaults::build::scss::output())]
    pub output: PathBuf,
}

/// `[build.sitemap]` section - sitemap generation configuration.
///
/// Sitemap generation is skipped in preview mode regardless of `enable`.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Enable sitemap.xml generation (production builds only).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub enable: bool,

    /// Output path for the sitemap file, relative to the output directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,

    /// Value written to every `<changefreq>` element.
    #[serde(default = "defaults::build::sitemap::changefreq")]
    #[educe(Default = defaults::build::sitemap::changefreq())]
    pub changefreq: String,

    /// Value written to every `<priority>` element.
    #[serde(default = "defaults::build::sitemap::priority")]
    #[educe(Default = defaults::build::sitemap::priority())]
    pub priority: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.templates, PathBuf::from("templates"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.preview_output, PathBuf::from("preview"));
        assert_eq!(config.build.hubdb, PathBuf::from("editor/hubdb"));
        assert!(config.build.minify);
        assert!(config.build.strip_html_extension);
        assert!(!config.build.preview);
        assert!(config.build.garbage.is_empty());
    }

    #[test]
    fn test_build_config_override() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [build]
            templates = "src-templates"
            output = "dist"
            minify = false
            garbage = ["_partials", "editor.html"]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.templates, PathBuf::from("src-templates"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(!config.build.minify);
        assert_eq!(
            config.build.garbage,
            vec![PathBuf::from("_partials"), PathBuf::from("editor.html")]
        );
    }

    #[test]
    fn test_scss_config() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [build.scss]
            enable = true
            command = ["dart-sass", "--no-source-map"]
            source = "styles"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert!(config.build.scss.enable);
        assert_eq!(config.build.scss.command[0], "dart-sass");
        assert_eq!(config.build.scss.source, PathBuf::from("styles"));
        // output keeps its default
        assert_eq!(
            config.build.scss.output,
            PathBuf::from("static/styles/compiled")
        );
    }

    #[test]
    fn test_sitemap_config() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [build.sitemap]
            enable = true
            changefreq = "daily"
            priority = "0.5"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert!(config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("sitemap.xml"));
        assert_eq!(config.build.sitemap.changefreq, "daily");
        assert_eq!(config.build.sitemap.priority, "0.5");
    }

    #[test]
    fn test_case_study_header() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [build]
            case_study_header = "_partials/case-study-header.html"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(
            config.build.case_study_header.as_deref(),
            Some("_partials/case-study-header.html")
        );
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [build]
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
