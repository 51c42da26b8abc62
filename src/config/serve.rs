//! `[serve]` section configuration.
//!
//! Contains local preview server settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[serve]` section in tufted.toml - preview server settings.
///
/// # Example
/// ```toml
/// [serve]
/// port = 3000
/// open = false   # Do not launch the browser
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// HTTP port number (default: 8000).
    #[serde(default = "defaults::serve::port")]
    #[educe(Default = defaults::serve::port())]
    pub port: u16,

    /// Open the site in the browser once the server is up.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub open: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_serve_config() {
        let config = r#"
            [serve]
            port = 3000
            open = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.serve.port, 3000);
        assert!(!config.serve.open);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.serve.port, 8000);
        assert!(config.serve.open);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [serve]
            interface = "0.0.0.0"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
    }
}
