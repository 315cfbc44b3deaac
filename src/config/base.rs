//! `[base]` section configuration.
//!
//! Contains basic site information like title, description and canonical URL.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in portico.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Nick's Portfolio"
/// description = "Product design portfolio"
/// url = "https://nickdesign.example.com/"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title displayed in browser tab and headers.
    pub title: String,

    /// Site description for SEO meta tags.
    pub description: String,

    /// Base URL for canonical page links and the sitemap.
    /// Required when `[build.sitemap].enable = true`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code (e.g., "en", "pt-BR").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,
}

impl BaseConfig {
    /// Base URL with a guaranteed trailing slash, defaulting to `/`.
    pub fn url_with_slash(&self) -> String {
        match &self.url {
            Some(url) if url.ends_with('/') => url.clone(),
            Some(url) => format!("{url}/"),
            None => "/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Portfolio"
            description = "A design portfolio"
            url = "https://example.com"
            language = "en-US"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Portfolio");
        assert_eq!(config.base.description, "A design portfolio");
        assert_eq!(config.base.url, Some("https://example.com".to_string()));
        assert_eq!(config.base.language, "en-US");
    }

    #[test]
    fn test_base_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.url, None);
        assert_eq!(config.base.language, "en");
    }

    #[test]
    fn test_url_with_slash() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"
            url = "https://example.com"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert_eq!(config.base.url_with_slash(), "https://example.com/");

        let config = r#"
            [base]
            title = "Test"
            description = "Test"
            url = "https://example.com/"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert_eq!(config.base.url_with_slash(), "https://example.com/");
    }

    #[test]
    fn test_url_with_slash_missing() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert_eq!(config.base.url_with_slash(), "/");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }
}
