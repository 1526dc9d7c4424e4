use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

/// Optional settings from a `Config.toml` next to the working directory.
/// CLI flags take precedence over everything here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Glob patterns excluded from every scan, matched against
    /// root-relative paths.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Identification level used when no `-L` flag is given to `inventory`.
    #[serde(default)]
    pub default_level: Option<u8>,
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
