use parambind::{Dialect, RenderConfig};
use serde::Deserialize;
use std::path::Path;

/// Contents of `parambind.toml`.
///
/// ```toml
/// dialect = "mssql"
///
/// [render]
/// empty_list = "reject"
/// max_params = 2100
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub dialect: Option<Dialect>,
    pub render: RenderConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
        Self::parse(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))
    }

    /// Load `path`, or fall back to defaults when the implicit default file
    /// does not exist.
    pub fn load_or_default(path: &Path, explicit: bool) -> anyhow::Result<Self> {
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parambind::EmptyListPolicy;

    #[test]
    fn parses_dialect_and_render_section() {
        let file = ConfigFile::parse(
            r#"
dialect = "sqlserver"

[render]
empty_list = "reject"
max_params = 2100
"#,
        )
        .unwrap();
        assert_eq!(file.dialect, Some(Dialect::SqlServer));
        assert_eq!(file.render.empty_list, EmptyListPolicy::Reject);
        assert_eq!(file.render.max_params, Some(2100));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = ConfigFile::parse("").unwrap();
        assert_eq!(file.dialect, None);
        assert_eq!(file.render, RenderConfig::default());
    }

    #[test]
    fn unknown_dialect_and_keys_are_errors() {
        assert!(ConfigFile::parse(r#"dialect = "db2""#).is_err());
        assert!(ConfigFile::parse(r#"database = "x""#).is_err());
    }

    #[test]
    fn missing_default_file_is_fine() {
        let path = Path::new("definitely-missing-parambind.toml");
        assert!(ConfigFile::load_or_default(path, false).is_ok());
        assert!(ConfigFile::load_or_default(path, true).is_err());
    }
}
