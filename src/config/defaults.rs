//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn preview_output() -> PathBuf {
        "preview".into()
    }

    pub fn hubdb() -> PathBuf {
        "editor/hubdb".into()
    }

    pub fn case_study_header() -> Option<String> {
        None
    }

    pub fn garbage() -> Vec<PathBuf> {
        Vec::new()
    }

    pub mod scss {
        use std::path::PathBuf;

        pub fn command() -> Vec<String> {
            vec!["sass".into()]
        }

        pub fn source() -> PathBuf {
            "static/styles".into()
        }

        pub fn output() -> PathBuf {
            "static/styles/compiled".into()
        }
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }

        pub fn changefreq() -> String {
            "weekly".into()
        }

        pub fn priority() -> String {
            "0.8".into()
        }
    }
}

// ============================================================================
// [editor] Section Defaults
// ============================================================================

pub mod editor {
    use std::path::PathBuf;

    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5173
    }

    pub fn data() -> PathBuf {
        "editor/pages".into()
    }

    pub fn workspace() -> Option<PathBuf> {
        None
    }
}
