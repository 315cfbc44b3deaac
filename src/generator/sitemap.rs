//! Sitemap generation.
//!
//! Generates a sitemap.xml file listing the pages found in the build
//! output, for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/aboutme</loc>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.8</priority>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    log,
    utils::minify::{MinifyType, minify},
};
use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::{DirEntry, WalkDir};

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Build sitemap if enabled in config.
///
/// Scans the output directory for `.html` files, skipping internal
/// directories (names starting with `_`, `.` or `@`).
pub fn build_sitemap(config: &SiteConfig) -> Result<()> {
    if !config.build.sitemap.enable {
        return Ok(());
    }
    let sitemap = Sitemap::from_output(config);
    sitemap.write(config)
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
    /// Value for every `<changefreq>` element
    changefreq: String,
    /// Value for every `<priority>` element
    priority: String,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
}

impl Sitemap {
    /// Collect URL entries by walking the build output.
    fn from_output(config: &SiteConfig) -> Self {
        let output = &config.build.output;
        let base_url = config.base.url_with_slash();

        let mut urls: Vec<UrlEntry> = WalkDir::new(output)
            .into_iter()
            .filter_entry(|entry| !is_internal_dir(entry))
            .filter_map(Result::ok)
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "html")
            })
            .filter_map(|entry| {
                let loc = page_url(
                    entry.path(),
                    output,
                    &base_url,
                    config.build.strip_html_extension,
                )?;
                Some(UrlEntry { loc })
            })
            .collect();
        urls.sort_by(|a, b| a.loc.cmp(&b.loc));

        Self {
            urls,
            changefreq: config.build.sitemap.changefreq.clone(),
            priority: config.build.sitemap.priority.clone(),
        }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                self.changefreq
            ));
            xml.push_str(&format!("    <priority>{}</priority>\n", self.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to output file.
    fn write(self, config: &SiteConfig) -> Result<()> {
        let sitemap_path = config.build.sitemap.path.clone();
        let count = self.urls.len();
        let xml = self.into_xml();
        let xml = minify(MinifyType::Xml(xml.as_bytes()), config);

        fs::write(&sitemap_path, &*xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{} urls", count);
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Directories skipped during the output walk.
fn is_internal_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(['_', '.', '@']))
}

/// Page URL for one output file, relative to the output root.
fn page_url(path: &Path, output: &Path, base_url: &str, strip_html: bool) -> Option<String> {
    let relative = path.strip_prefix(output).ok()?;
    let mut url = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if strip_html {
        url.truncate(url.len().saturating_sub(".html".len()));
    }
    Some(format!("{base_url}{url}"))
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
