use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub organization: String,
    pub package_name: String,
    pub type_name: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            organization: "ballerina".to_string(),
            package_name: "ftp".to_string(),
            type_name: "WatchEvent".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Name of the service method that receives change notifications.
    pub handler_name: String,
    /// Signature accepted verbatim as an error return member.
    pub error_signature: String,
    pub marker: MarkerConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            handler_name: "onFileChange".to_string(),
            error_signature: "error".to_string(),
            marker: MarkerConfig::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), handler = %config.handler_name, "loaded validator config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerConfig, ValidatorConfig};
    use crate::error::LoadError;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ValidatorConfig::from_toml_str("").expect("should parse");
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(config.handler_name, "onFileChange");
        assert_eq!(config.marker.organization, "ballerina");
        assert_eq!(config.marker.package_name, "ftp");
    }

    #[test]
    fn overrides_marker_fields_individually() {
        let config = ValidatorConfig::from_toml_str(
            r#"
handler_name = "onChange"

[marker]
package_name = "sftp"
"#,
        )
        .expect("should parse");
        assert_eq!(config.handler_name, "onChange");
        assert_eq!(config.error_signature, "error");
        assert_eq!(
            config.marker,
            MarkerConfig {
                package_name: "sftp".to_string(),
                ..MarkerConfig::default()
            }
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = ValidatorConfig::from_toml_str("handler = \"x\"").expect_err("should fail");
        assert!(matches!(error, LoadError::Toml(_)), "unexpected error: {error}");
    }
}
