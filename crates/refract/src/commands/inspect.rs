//! Print the parse result of one file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use refract_parser::{parse_component_source, ParseResult};

/// Run the inspect command.
pub fn run(file: &Path) -> Result<()> {
    let source = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let result = parse_component_source(&source)?;
    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }
    println!("{}", render(&result)?);
    Ok(())
}

fn render(result: &ParseResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize parse result")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_components_as_json() {
        let result = parse_component_source(
            "const Dialog = DialogPrimitive.Root\nexport function Card() { return <div /> }",
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&render(&result).unwrap()).unwrap();

        assert_eq!(json["primary"], "Card");
        let names: Vec<_> = json["components"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Dialog", "Card"]);
        assert_eq!(json["components"][0]["isReExport"], true);
    }
}
