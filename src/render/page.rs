//! Conditional page rendering.
//!
//! Decides, per template, whether it should land in the output tree and
//! delegates the actual substitution to the template engine. The gate is
//! the `isAvailableForNewContent` metadata key: anything other than a
//! literal (case-insensitive) `true` keeps the template out of the build.

use crate::config::SiteConfig;
use crate::render::meta::extract_metadata;
use chrono::Datelike;
use std::{fs, io, path::PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

/// Metadata key gating rendering.
const AVAILABLE_KEY: &str = "isAvailableForNewContent";

/// Path segment marking case-study pages.
const CASE_STUDY_SEGMENT: &str = "case-studies";

/// Rendering-related errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read template `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("template engine error")]
    Engine(#[from] tera::Error),
}

/// Outcome of a conditional render. `Skipped` is a signal, not a failure.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The template was available and produced this markup.
    Rendered(String),
    /// The template opted out via its metadata block.
    Skipped,
}

/// Check whether a template should be rendered, based on its metadata.
///
/// Reads the raw template source from disk; a missing file is
/// `RenderError::NotFound`.
pub fn should_render(config: &SiteConfig, template_id: &str) -> Result<bool, RenderError> {
    let path = config.build.templates.join(template_id);
    let source = fs::read_to_string(&path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => RenderError::NotFound(path.clone()),
        _ => RenderError::Io(path.clone(), err),
    })?;

    let metadata = extract_metadata(&source);
    Ok(metadata
        .get(AVAILABLE_KEY)
        .is_some_and(|v| v.to_lowercase() == "true"))
}

/// Conditionally render one template.
///
/// The base context (page name, canonical URL, site root, current year) is
/// merged with `extra`; caller-supplied keys win on conflict. Case-study
/// pages are routed to the configured header template instead, with the
/// same merged context.
pub fn render_page(
    tera: &Tera,
    config: &SiteConfig,
    template_id: &str,
    extra: &Context,
) -> Result<RenderOutcome, RenderError> {
    if !should_render(config, template_id)? {
        return Ok(RenderOutcome::Skipped);
    }

    let site_url = config.base.url_with_slash();
    let page_url = canonical_url(&site_url, template_id, config.build.strip_html_extension);

    let mut context = Context::new();
    context.insert("current_page_name", template_id);
    context.insert("current_page_url", &page_url);
    context.insert("raw_url", &site_url);
    context.insert("year", &chrono::Local::now().year());
    context.extend(extra.clone());

    // Routing override, not a metadata distinction: case-study pages are
    // rendered through the shared header template.
    let target = match &config.build.case_study_header {
        Some(header) if is_case_study(template_id) => header.as_str(),
        _ => template_id,
    };

    let html = tera.render(target, &context)?;
    Ok(RenderOutcome::Rendered(html))
}

/// Canonical URL of a rendered page.
fn canonical_url(site_url: &str, template_id: &str, strip_html_extension: bool) -> String {
    let path = if strip_html_extension {
        template_id.strip_suffix(".html").unwrap_or(template_id)
    } else {
        template_id
    };
    format!("{site_url}{path}")
}

/// Whether a template id addresses a case-study page.
fn is_case_study(template_id: &str) -> bool {
    template_id.split('/').any(|seg| seg == CASE_STUDY_SEGMENT)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_with_templates(dir: &std::path::Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.templates = dir.to_path_buf();
        config.base.url = Some("https://example.com".to_string());
        config
    }

    fn tera_for(dir: &std::path::Path) -> Tera {
        Tera::new(&format!("{}/**/*.html", dir.display())).unwrap()
    }

    #[test]
    fn test_should_render_true() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<!--\nisAvailableForNewContent: true\n-->\n<html></html>",
        )
        .unwrap();

        let config = config_with_templates(dir.path());
        assert!(should_render(&config, "index.html").unwrap());
    }

    #[test]
    fn test_should_render_case_insensitive() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<!--\nisAvailableForNewContent: TRUE\n-->",
        )
        .unwrap();

        let config = config_with_templates(dir.path());
        assert!(should_render(&config, "index.html").unwrap());
    }

    #[test]
    fn test_should_render_false_or_absent() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("off.html"),
            "<!--\nisAvailableForNewContent: false\n-->",
        )
        .unwrap();
        fs::write(dir.path().join("bare.html"), "<html></html>").unwrap();
        fs::write(
            dir.path().join("other.html"),
            "<!--\nisAvailableForNewContent: yes\n-->",
        )
        .unwrap();

        let config = config_with_templates(dir.path());
        assert!(!should_render(&config, "off.html").unwrap());
        assert!(!should_render(&config, "bare.html").unwrap());
        assert!(!should_render(&config, "other.html").unwrap());
    }

    #[test]
    fn test_should_render_missing_template() {
        let dir = tempdir().unwrap();
        let config = config_with_templates(dir.path());

        let err = should_render(&config, "ghost.html").unwrap_err();
        assert!(matches!(err, RenderError::NotFound(_)));
    }

    #[test]
    fn test_render_skipped_is_not_an_error() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("off.html"),
            "<!--\nisAvailableForNewContent: false\n-->\n<html></html>",
        )
        .unwrap();

        let config = config_with_templates(dir.path());
        let tera = tera_for(dir.path());
        let outcome = render_page(&tera, &config, "off.html", &Context::new()).unwrap();
        assert!(matches!(outcome, RenderOutcome::Skipped));
    }

    #[test]
    fn test_render_base_context() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("about.html"),
            "<!--\nisAvailableForNewContent: true\n-->\n{{ current_page_name }}|{{ current_page_url }}|{{ raw_url }}",
        )
        .unwrap();

        let config = config_with_templates(dir.path());
        let tera = tera_for(dir.path());
        let outcome = render_page(&tera, &config, "about.html", &Context::new()).unwrap();

        match outcome {
            RenderOutcome::Rendered(html) => {
                assert!(html.contains("about.html"));
                assert!(html.contains("https://example.com/about"));
                assert!(html.contains("https://example.com/"));
            }
            RenderOutcome::Skipped => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_caller_context_wins() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("page.html"),
            "<!--\nisAvailableForNewContent: true\n-->\n{{ raw_url }}",
        )
        .unwrap();

        let config = config_with_templates(dir.path());
        let tera = tera_for(dir.path());

        let mut extra = Context::new();
        extra.insert("raw_url", "overridden");
        let outcome = render_page(&tera, &config, "page.html", &extra).unwrap();

        match outcome {
            RenderOutcome::Rendered(html) => assert!(html.contains("overridden")),
            RenderOutcome::Skipped => panic!("expected render"),
        }
    }

    #[test]
    fn test_case_study_header_override() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("case-studies")).unwrap();
        fs::create_dir_all(dir.path().join("_partials")).unwrap();
        fs::write(
            dir.path().join("case-studies/alpha.html"),
            "<!--\nisAvailableForNewContent: true\n-->\nstudy body",
        )
        .unwrap();
        fs::write(
            dir.path().join("_partials/cs-header.html"),
            "header for {{ current_page_name }}",
        )
        .unwrap();

        let mut config = config_with_templates(dir.path());
        config.build.case_study_header = Some("_partials/cs-header.html".to_string());
        let tera = tera_for(dir.path());

        let outcome =
            render_page(&tera, &config, "case-studies/alpha.html", &Context::new()).unwrap();
        match outcome {
            RenderOutcome::Rendered(html) => {
                assert!(html.contains("header for case-studies/alpha.html"));
                assert!(!html.contains("study body"));
            }
            RenderOutcome::Skipped => panic!("expected render"),
        }
    }

    #[test]
    fn test_canonical_url() {
        assert_eq!(
            canonical_url("https://example.com/", "about.html", true),
            "https://example.com/about"
        );
        assert_eq!(
            canonical_url("https://example.com/", "about.html", false),
            "https://example.com/about.html"
        );
    }

    #[test]
    fn test_is_case_study() {
        assert!(is_case_study("case-studies/alpha.html"));
        assert!(!is_case_study("index.html"));
        assert!(!is_case_study("my-case-studies.html"));
    }
}
