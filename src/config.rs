use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use license_expr::license::{ReferenceMatcher, Strictness};

/// Root configuration structure, deserialized from `.license-expr/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How scanner `LicenseRef-` identifiers are recognized.
    pub matcher: ReferenceMatcher,
    /// How expressions are parsed and validated.
    pub parser: ParserConfig,
}

/// Defines how `check` parses and validates expressions.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept `/` as `OR`, common license names, and resolvable scanner references.
    pub lenient: bool,
    /// Validation level applied after a successful parse.
    /// Defaults to `allow-deprecated`.
    pub strictness: Strictness,
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-expr/config.toml`
/// 3. `~/.config/license-expr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-expr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("license-expr").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
