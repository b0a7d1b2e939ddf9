//! Initialize refract in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DEFAULT_CONFIG;

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing refract...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'refract convert <path> --target svelte' to convert components.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn writes_a_loadable_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refract.toml");
        run(&path, false).unwrap();

        let loaded = config::load(&path).unwrap();
        assert_eq!(loaded, config::ConfigFile::default());
    }

    #[test]
    fn keeps_existing_config_without_yes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refract.toml");
        fs::write(&path, "[output]\ndir = \"svelte\"\n").unwrap();

        run(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[output]\ndir = \"svelte\"\n");

        run(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
