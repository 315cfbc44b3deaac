//! Site initialization module.
//!
//! Creates new site structure with default configuration.

use crate::{cli::Commands, config::SiteConfig};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "portico.toml";

/// Default site directory structure
const SITE_DIRS: &[&str] = &[
    "templates",
    "templates/_partials",
    "templates/_layouts",
    "templates/case-studies",
    "static/styles",
    "static/engine",
    "editor/hubdb",
    "editor/pages",
];

/// Starter home page template, opted into the build via its metadata block
const STARTER_INDEX: &str = "\
<!--
isAvailableForNewContent: true
description: Home page
-->
<html lang=\"en\">
<head>
  <meta charset=\"utf-8\">
  <title>{{ current_page_name }}</title>
  <link rel=\"canonical\" href=\"{{ current_page_url }}\">
</head>
<body>
  <h1>Welcome</h1>
  <footer>&copy; {{ year }}</footer>
</body>
</html>
";

/// Header row for the seeded projects table
const STARTER_PROJECTS: &str = "name,blurb,is_case_study\n";

/// Starter editor UI. Carries no metadata block, so it never lands in the
/// build output; the editor backend serves it at `/`.
const STARTER_EDITOR: &str = r#"<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Page Editor</title>
  <style>
    body { font-family: sans-serif; margin: 2rem; }
    li { margin: 0.25rem 0; }
  </style>
</head>
<body>
  <h1>Page Editor</h1>
  <form id="create">
    <input name="pageName" placeholder="Page name" required>
    <input name="internalName" placeholder="internal-name" required>
    <button>Create</button>
  </form>
  <ul id="pages"></ul>
  <script>
    async function refresh() {
      const res = await fetch('/api/pages');
      const body = await res.json();
      const list = document.getElementById('pages');
      list.innerHTML = '';
      for (const name of body.data || []) {
        const item = document.createElement('li');
        item.innerHTML =
          `<a href="/preview/${name}">${name}</a> ` +
          `<button data-name="${name}">delete</button>`;
        item.querySelector('button').onclick = async () => {
          await fetch(`/api/pages/${name}`, { method: 'DELETE' });
          refresh();
        };
        list.appendChild(item);
      }
    }
    document.getElementById('create').onsubmit = async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      await fetch('/api/pages/create', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          pageName: form.get('pageName'),
          internalName: form.get('internalName'),
        }),
      });
      event.target.reset();
      refresh();
    };
    refresh();
  </script>
</body>
</html>
"#;

/// Create a new site with default structure
pub fn new_site(config: &SiteConfig) -> Result<()> {
    let root = config.get_root();
    let has_name = matches!(
        &config.get_cli().command,
        Commands::Init { name: Some(_) }
    );

    // Safety check: if no name was provided (init in current dir),
    // the directory must be completely empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `portico init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    init_default_config(root)?;

    fs::write(root.join("templates/index.html"), STARTER_INDEX)?;
    fs::write(root.join("templates/editor.html"), STARTER_EDITOR)?;
    fs::write(root.join("editor/hubdb/hubdb_projects.csv"), STARTER_PROJECTS)?;

    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Create site directory structure
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `portico init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}
