//! Site building orchestration.
//!
//! Drives the full pipeline:
//!
//! ```text
//! build_site()
//!     │
//!     ├── compile_scss()     ──► external `sass` per .scss file
//!     ├── render_pages()     ──► metadata gate + tera render per template
//!     ├── minify_output()    ──► minify .html files in place (prod only)
//!     ├── garbage_collect()  ──► drop dev-only paths (prod only)
//!     └── build_sitemap()    ──► sitemap.xml (prod only)
//! ```
//!
//! A single failing page or a missing garbage target is logged and
//! skipped; the build only aborts on infrastructure failures (unreadable
//! template directory, broken output tree).

use crate::{
    config::SiteConfig,
    data::table::TableStore,
    generator::sitemap::build_sitemap,
    log,
    render::{
        RenderOutcome,
        page::render_page,
    },
    utils::{
        exec::exec,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::{fs, path::PathBuf};
use tera::Tera;
use walkdir::WalkDir;

/// Table holding the portfolio projects.
const PROJECTS_TABLE: &str = "hubdb_projects";

/// Column partitioning project rows into case studies.
const CASE_STUDY_COLUMN: &str = "is_case_study";

/// Build the entire site into the configured output directory.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    if config.build.scss.enable {
        compile_scss(config)?;
    }

    fs::create_dir_all(&config.build.output).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.build.output.display()
        )
    })?;

    let rendered = render_pages(config)?;
    log!("render"; "{rendered} pages rendered");

    if config.build.minify {
        minify_output(config)?;
    }

    if config.build.preview {
        log!("build"; "preview mode, skipping cleanup and sitemap");
    } else {
        garbage_collect(&config.build.garbage);
        build_sitemap(config)?;
        // A production build invalidates any earlier preview tree
        garbage_collect(std::slice::from_ref(&config.build.preview_output));
    }

    log!("build"; "done");
    Ok(())
}

/// Delete all generated dev-only files plus the preview tree.
pub fn clean_site(config: &SiteConfig) -> Result<()> {
    garbage_collect(&config.build.garbage);
    garbage_collect(std::slice::from_ref(&config.build.preview_output));
    log!("gc"; "done");
    Ok(())
}

// ============================================================================
// SCSS Compilation
// ============================================================================

/// Compile every `.scss` file under the source directory with the
/// external compiler, writing compressed `.css` files to the output
/// directory. Per-file failures are logged and skipped.
fn compile_scss(config: &SiteConfig) -> Result<()> {
    let scss = &config.build.scss;
    fs::create_dir_all(&scss.output)
        .with_context(|| format!("Failed to create {}", scss.output.display()))?;

    for entry in WalkDir::new(&scss.source)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "scss")
        })
    {
        let input = entry.path();
        let Some(stem) = input.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let output = scss.output.join(format!("{stem}.css"));
        let input_arg = input.to_string_lossy();
        let output_arg = output.to_string_lossy();

        log!("scss"; "{stem}.scss");
        if let Err(e) = exec(
            &scss.command,
            &["--style=compressed", input_arg.as_ref(), output_arg.as_ref()],
            None,
        ) {
            log!("error"; "{}: {e:#}", input.display());
        }
    }

    Ok(())
}

// ============================================================================
// Page Rendering
// ============================================================================

/// Render every available template into the output tree.
///
/// All templates are walked; each decides via its own metadata block
/// whether it lands in the output. Returns the number of pages written.
fn render_pages(config: &SiteConfig) -> Result<usize> {
    let templates_dir = &config.build.templates;
    let glob = format!("{}/**/*.html", templates_dir.display());
    let tera = Tera::new(&glob).context("Failed to load templates")?;

    let extra = hubdb_context(config);

    let mut rendered = 0;
    for entry in WalkDir::new(templates_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "html")
        })
    {
        let Ok(relative) = entry.path().strip_prefix(templates_dir) else {
            continue;
        };
        let template_id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        match render_page(&tera, config, &template_id, &extra) {
            Ok(RenderOutcome::Rendered(html)) => {
                let target = config.build.output.join(relative);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&target, html)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                rendered += 1;
            }
            Ok(RenderOutcome::Skipped) => {
                log!("render"; "skipped {template_id}");
            }
            // One broken page never aborts the whole build
            Err(e) => {
                log!("error"; "{template_id}: {e:#}");
            }
        }
    }

    Ok(rendered)
}

/// Template context from the hubdb tables: all projects plus the
/// case-study subset.
fn hubdb_context(config: &SiteConfig) -> tera::Context {
    let tables = TableStore::new(&config.build.hubdb);
    let projects = match tables.read(PROJECTS_TABLE, None) {
        Ok(projects) => projects,
        Err(e) => {
            log!("error"; "{PROJECTS_TABLE}: {e}");
            Vec::new()
        }
    };

    let case_studies: Vec<_> = projects
        .iter()
        .filter(|row| {
            row.get(CASE_STUDY_COLUMN)
                .is_some_and(|v| v.to_lowercase() == "true")
        })
        .cloned()
        .collect();

    let mut context = tera::Context::new();
    context.insert("projects", &projects);
    context.insert("case_study_projects", &case_studies);
    context
}

// ============================================================================
// Minification Pass
// ============================================================================

/// Minify every `.html` file in the output tree, in place.
fn minify_output(config: &SiteConfig) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(&config.build.output)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "html")
        })
        .map(|e| e.into_path())
        .collect();

    log!("minify"; "{} files", files.len());

    files.par_iter().try_for_each(|path| {
        let content =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let minified = minify(MinifyType::Html(&content), config);
        fs::write(path, &*minified)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    })
}

// ============================================================================
// Garbage Collection
// ============================================================================

/// Delete dev-only files and directories.
///
/// Missing targets are logged and skipped; so are deletion failures. The
/// build never aborts here.
fn garbage_collect(paths: &[PathBuf]) {
    for path in paths {
        if !path.exists() {
            log!("gc"; "{} doesn't exist, skipping", path.display());
            continue;
        }

        log!("gc"; "deleting {}", path.display());
        let result = if path.is_file() {
            fs::remove_file(path)
        } else {
            fs::remove_dir_all(path)
        };
        if let Err(e) = result {
            log!("error"; "{}: {e}", path.display());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
