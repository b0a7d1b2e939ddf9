//! Component conversion command.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use refract_adapters::Target;
use refract_pipeline::Converter;
use tokio::runtime::Handle;
use walkdir::WalkDir;

use crate::config;
use crate::format::PrettierFormatter;

/// Arguments of `refract convert`.
#[derive(Debug)]
pub struct ConvertArgs {
    pub path: PathBuf,
    pub target: Target,
    pub out: Option<PathBuf>,
    pub legacy: bool,
    pub format: bool,
}

/// Totals over one run.
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub files: usize,
    pub components: usize,
    pub failed: usize,
}

/// Run the convert command.
pub async fn run(config_path: &Path, args: ConvertArgs) -> Result<()> {
    let start = Instant::now();
    let file_config = config::load(config_path)?;

    let mut options = file_config.convert;
    if args.legacy {
        options.framework.svelte_runes = false;
    }
    if args.format {
        options.emit_formatted = true;
    }
    let out_dir = args.out.unwrap_or(file_config.output.dir);

    let files = collect_sources(&args.path)?;
    if files.is_empty() {
        tracing::warn!("No component sources found under {}", args.path.display());
        return Ok(());
    }
    tracing::info!("Converting {} files to {}...", files.len(), args.target);

    let mut converter = Converter::new(options);
    if converter.options().emit_formatted {
        converter = converter.with_formatter(Box::new(PrettierFormatter::new(Handle::current())));
    }

    let target = args.target;
    let output = out_dir.clone();
    let summary =
        tokio::task::spawn_blocking(move || convert_files(&converter, &files, target, &output))
            .await
            .context("Conversion task panicked")?;

    tracing::info!(
        "Converted {} components from {} files in {}ms",
        summary.components,
        summary.files - summary.failed,
        start.elapsed().as_millis()
    );
    tracing::info!("Output: {}", out_dir.display());

    if summary.failed > 0 {
        anyhow::bail!("{} of {} files failed to convert", summary.failed, summary.files);
    }
    Ok(())
}

/// Source files under `path`. A file path is taken as given.
pub fn collect_sources(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("{} does not exist", path.display());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_component_source(p))
        .collect();
    files.sort();
    Ok(files)
}

/// `.tsx`/`.jsx` files that are not tests, stories or index files.
fn is_component_source(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if ext != "tsx" && ext != "jsx" {
        return false;
    }

    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    !(filename.contains(".test.")
        || filename.contains(".spec.")
        || filename.contains(".stories.")
        || filename == "index.tsx"
        || filename == "index.jsx")
}

/// Convert files in parallel. A failing file is logged and counted.
pub fn convert_files(converter: &Converter, files: &[PathBuf], target: Target, out_dir: &Path) -> Summary {
    let results: Vec<Result<usize>> = files
        .par_iter()
        .map(|path| convert_file(converter, path, target, out_dir))
        .collect();

    let mut summary = Summary {
        files: files.len(),
        ..Summary::default()
    };
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(count) => summary.components += count,
            Err(err) => {
                tracing::error!("{}: {:#}", path.display(), err);
                summary.failed += 1;
            }
        }
    }
    summary
}

fn convert_file(converter: &Converter, path: &Path, target: Target, out_dir: &Path) -> Result<usize> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let outputs = converter.convert_all(&source, target)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    for result in outputs.values() {
        for warning in &result.warnings {
            tracing::warn!("{}: {}", path.display(), warning);
        }
        let dest = out_dir.join(&result.filename);
        fs::write(&dest, &result.code).with_context(|| format!("Failed to write {}", dest.display()))?;
        tracing::debug!("Wrote {}", dest.display());
    }
    Ok(outputs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CARD: &str = r#"
export function Card({ title }: { title: string }) {
  return <div className="card">{title}</div>
}
"#;

    #[test]
    fn skips_tests_stories_and_index_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("ui");
        fs::create_dir_all(&nested).unwrap();
        for name in [
            "button.tsx",
            "button.test.tsx",
            "button.stories.tsx",
            "index.tsx",
            "utils.ts",
        ] {
            fs::write(nested.join(name), "").unwrap();
        }
        fs::write(dir.path().join("card.jsx"), "").unwrap();

        let files = collect_sources(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["card.jsx", "button.tsx"]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_sources(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn writes_one_file_per_component_and_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("card.tsx");
        let bad = dir.path().join("broken.tsx");
        fs::write(&good, CARD).unwrap();
        fs::write(&bad, "const = <").unwrap();
        let out = dir.path().join("out");

        let summary = convert_files(&Converter::default(), &[good, bad], Target::Svelte, &out);
        assert_eq!(
            summary,
            Summary {
                files: 2,
                components: 1,
                failed: 1
            }
        );

        let written = fs::read_to_string(out.join("Card.svelte")).unwrap();
        assert!(written.contains("<div class=\"card\">{title}</div>"));
    }
}
