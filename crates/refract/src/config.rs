//! refract.toml loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use refract_pipeline::ConvertOptions;
use serde::Deserialize;

/// Configuration file structure (refract.toml).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub convert: ConvertOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("converted")
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub const DEFAULT_CONFIG: &str = r#"# Refract Configuration

[convert]
# Emit TypeScript (lang="ts") script blocks
typescript_output = true

# Run prettier over generated files
emit_formatted = false

# Module the cn() helper is imported from
class_merge_import_path = "$lib/utils"

[convert.framework]
# Svelte 5 runes; set to false for Svelte 4 syntax
svelte_runes = true

[output]
# Directory converted components are written to
dir = "converted"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("refract.toml")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.output.dir, PathBuf::from("converted"));
        assert!(config.convert.framework.svelte_runes);
    }

    #[test]
    fn default_config_round_trips_to_defaults() {
        let config: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn partial_tables_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refract.toml");
        fs::write(&path, "[convert.framework]\nsvelte_runes = false\n").unwrap();

        let config = load(&path).unwrap();
        assert!(!config.convert.framework.svelte_runes);
        assert!(config.convert.typescript_output);
        assert_eq!(config.output.dir, PathBuf::from("converted"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refract.toml");
        fs::write(&path, "[convert\ntypescript_output = 1").unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
