use std::path::{Path, PathBuf};

use tickroll_core::Tick;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub(crate) struct OutputConfig {
    /// Indent written song files
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: default_pretty() }
    }
}

fn default_pretty() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
pub(crate) struct EditorConfig {
    /// Grid that `info` snaps the selected range to
    #[serde(default)]
    pub grid_ticks: Option<Tick>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
pub(crate) struct LoggingConfig {
    /// Extra `EnvFilter` directives, e.g. "tickroll_core=trace"
    #[serde(default)]
    pub filter: Option<String>,
}

pub(crate) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tickroll")
        .join("config.toml")
}

/// Read the config. A missing file yields the defaults; a malformed one is an
/// error so the caller can report it once logging is up.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig, toml::de::Error> {
    match std::fs::read_to_string(path) {
        Ok(s) => parse_config(&s),
        Err(_) => Ok(AppConfig::default()),
    }
}

fn parse_config(s: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.output.pretty);
        assert_eq!(config.editor.grid_ticks, None);
    }

    #[test]
    fn test_partial_config() {
        let text = "[editor]\ngrid_ticks = 4\n\n[logging]\nfilter = \"tickroll_core=trace\"\n";
        let config = parse_config(text).unwrap();
        assert!(config.output.pretty);
        assert_eq!(config.editor.grid_ticks, Some(4));
        assert_eq!(config.logging.filter.as_deref(), Some("tickroll_core=trace"));
    }

    #[test]
    fn test_malformed_config_is_reported() {
        assert!(parse_config("[output]\npretty = \"yes\"").is_err());

        let name = format!("tickroll-config-{}.toml", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "[editor\ngrid_ticks = 4").unwrap();
        let res = load_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(res.is_err());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/tickroll.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
