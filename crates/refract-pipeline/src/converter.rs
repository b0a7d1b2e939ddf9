//! End-to-end conversion of one source unit.

use std::collections::BTreeMap;

use refract_adapters::{adapter_for, GenerateOptions, Target};
use refract_parser::{ComponentDefinition, ComponentParser, ParseResult, Warning};
use serde::{Deserialize, Serialize};

use crate::context::PluginContext;
use crate::error::{ConvertError, FormatError};
use crate::pipeline::Pipeline;

/// Conversion options, loadable from the `[convert]` table of a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Emit TypeScript script blocks.
    pub typescript_output: bool,

    /// Run the configured formatter over the assembled file.
    pub emit_formatted: bool,

    /// Module the class-merge helper is imported from.
    pub class_merge_import_path: String,

    pub framework: FrameworkOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            typescript_output: true,
            emit_formatted: false,
            class_merge_import_path: "$lib/utils".to_string(),
            framework: FrameworkOptions::default(),
        }
    }
}

impl ConvertOptions {
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            typescript: self.typescript_output,
            class_merge_import_path: self.class_merge_import_path.clone(),
            svelte_runes: self.framework.svelte_runes,
        }
    }
}

/// Per-framework switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkOptions {
    /// Svelte 5 runes instead of Svelte 4 syntax.
    pub svelte_runes: bool,
}

impl Default for FrameworkOptions {
    fn default() -> Self {
        Self { svelte_runes: true }
    }
}

/// Pretty-printer applied to assembled output.
pub trait Formatter: Send + Sync {
    fn format(&self, text: &str, target: Target) -> Result<String, FormatError>;
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub code: String,
    /// `<ComponentName>.<extension>`.
    pub filename: String,
    pub warnings: Vec<Warning>,
}

/// Drives the parser, plugin pipeline and target adapters.
pub struct Converter {
    parser: ComponentParser,
    pipeline: Pipeline,
    options: ConvertOptions,
    formatter: Option<Box<dyn Formatter>>,
}

impl Converter {
    /// A converter with the built-in plugins.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            parser: ComponentParser::new(),
            pipeline: Pipeline::with_defaults(),
            options,
            formatter: None,
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_parser(mut self, parser: ComponentParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert the primary component of `source`.
    pub fn convert(&self, source: &str, target: Target) -> Result<ConversionResult, ConvertError> {
        let (result, mut ctx) = self.parse(source, target, true)?;
        let Some(primary) = result.primary() else {
            return Err(ConvertError::NoComponent(no_component_reason(&result)));
        };
        if primary.is_re_export {
            return Err(ConvertError::NoComponent(format!(
                "`{}` re-exports {}",
                primary.name,
                primary.re_export_target.as_deref().unwrap_or("another component")
            )));
        }

        let base = unit_warnings(&result, &mut ctx);
        self.generate(primary, target, &mut ctx, base)
    }

    /// Convert every component of `source` that is not a re-export.
    ///
    /// A component that fails to generate is skipped with a `generate`
    /// warning on every other output. The call only fails when no component
    /// converts.
    pub fn convert_all(
        &self,
        source: &str,
        target: Target,
    ) -> Result<BTreeMap<String, ConversionResult>, ConvertError> {
        let (result, mut ctx) = self.parse(source, target, false)?;
        if result.convertible().next().is_none() {
            return Err(ConvertError::NoComponent(no_component_reason(&result)));
        }

        let base = unit_warnings(&result, &mut ctx);
        let mut outputs = BTreeMap::new();
        let mut skipped = Vec::new();
        let mut first_error = None;
        for component in result.convertible() {
            match self.generate(component, target, &mut ctx, base.clone()) {
                Ok(converted) => {
                    outputs.insert(component.name.clone(), converted);
                }
                Err(err) => {
                    ctx.warn("generate", format!("{} skipped: {err}", component.name));
                    skipped.append(&mut ctx.warnings);
                    first_error.get_or_insert(err);
                }
            }
        }

        if outputs.is_empty() {
            if let Some(err) = first_error {
                return Err(err);
            }
        }
        for converted in outputs.values_mut() {
            converted.warnings.extend(skipped.iter().cloned());
        }
        Ok(outputs)
    }

    /// Parse `source` through the pre- and post-parse phases.
    pub fn parse(
        &self,
        source: &str,
        target: Target,
        primary_only: bool,
    ) -> Result<(ParseResult, PluginContext), ConvertError> {
        let mut ctx = PluginContext::new(source, target, self.options.generate_options());
        let mut source = source.to_string();
        self.pipeline.run_pre_parse(&mut source, &mut ctx);

        let mut result = self.parser.parse(&source)?;
        if primary_only {
            ctx.component_filter = result.primary.clone().map(|name| vec![name]);
        }
        self.pipeline.run_post_parse(&mut result, &mut ctx);
        Ok((result, ctx))
    }

    fn generate(
        &self,
        component: &ComponentDefinition,
        target: Target,
        ctx: &mut PluginContext,
        mut warnings: Vec<Warning>,
    ) -> Result<ConversionResult, ConvertError> {
        let adapter = adapter_for(target);
        let options = ctx.options.clone();
        let mut component = component.clone();

        self.pipeline.run_pre_generate(&mut component, ctx);
        let mut code = adapter.generate(&component, &component.props, &options)?;
        self.pipeline.run_post_generate(&mut code, &component, ctx);
        let mut text = adapter.assemble(&code, &options);

        if self.options.emit_formatted {
            if let Some(formatter) = &self.formatter {
                match formatter.format(&text, target) {
                    Ok(formatted) => text = formatted,
                    Err(err) => ctx.warn("format", format!("{}: {err}", component.name)),
                }
            }
        }

        warnings.append(&mut ctx.warnings);
        tracing::debug!("Generated {}.{}", component.name, adapter.extension());
        Ok(ConversionResult {
            code: text,
            filename: format!("{}.{}", component.name, adapter.extension()),
            warnings,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

/// Parser warnings plus everything the parse phases recorded so far.
fn unit_warnings(result: &ParseResult, ctx: &mut PluginContext) -> Vec<Warning> {
    let mut warnings = result.warnings.clone();
    warnings.append(&mut ctx.warnings);
    warnings
}

fn no_component_reason(result: &ParseResult) -> String {
    if result.errors.is_empty() {
        "no component found".to_string()
    } else {
        result.errors.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Upper;

    impl Formatter for Upper {
        fn format(&self, text: &str, _target: Target) -> Result<String, FormatError> {
            Ok(text.to_uppercase())
        }
    }

    struct Broken;

    impl Formatter for Broken {
        fn format(&self, _text: &str, _target: Target) -> Result<String, FormatError> {
            Err(FormatError::new("timed out"))
        }
    }

    const CARD: &str = r#"
export function Card({ title }: { title: string }) {
  return <div className="card">{title}</div>
}
"#;

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ConvertOptions = toml::from_str(
            r#"
typescript_output = false

[framework]
svelte_runes = false
"#,
        )
        .unwrap();
        assert!(!options.typescript_output);
        assert!(!options.framework.svelte_runes);
        assert_eq!(options.class_merge_import_path, "$lib/utils");
    }

    #[test]
    fn names_output_after_component() {
        let result = Converter::default().convert(CARD, Target::Vue).unwrap();
        assert_eq!(result.filename, "Card.vue");
        assert!(result.code.contains("<div class=\"card\">{{ props.title }}</div>"));
    }

    #[test]
    fn formatter_runs_when_enabled() {
        let options = ConvertOptions {
            emit_formatted: true,
            ..ConvertOptions::default()
        };
        let converter = Converter::new(options).with_formatter(Box::new(Upper));
        let result = converter.convert(CARD, Target::Svelte).unwrap();
        assert!(result.code.contains("<DIV CLASS=\"CARD\">"));
    }

    #[test]
    fn formatter_failure_keeps_unformatted_text() {
        let options = ConvertOptions {
            emit_formatted: true,
            ..ConvertOptions::default()
        };
        let converter = Converter::new(options).with_formatter(Box::new(Broken));
        let result = converter.convert(CARD, Target::Svelte).unwrap();
        assert!(result.code.contains("<div class=\"card\">{title}</div>"));
        assert!(result.warnings.iter().any(|w| w.code == "format"));
    }

    #[test]
    fn missing_component_is_an_error() {
        let err = Converter::default()
            .convert("export const x = 1", Target::Svelte)
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoComponent(reason) if reason == "no component found"));
    }

    #[test]
    fn one_failing_component_does_not_sink_the_unit() {
        let source = "const A = React.forwardRef(() => null)\nexport function B() { return <div /> }";
        let outputs = Converter::default().convert_all(source, Target::Svelte).unwrap();

        assert_eq!(outputs.keys().collect::<Vec<_>>(), vec!["B"]);
        let warnings = &outputs["B"].warnings;
        assert!(warnings
            .iter()
            .any(|w| w.code == "generate" && w.message.starts_with("A skipped:")));
    }

    #[test]
    fn unit_fails_when_nothing_converts() {
        let err = Converter::default()
            .convert_all("const A = React.forwardRef(() => null)", Target::Vue)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Generate(_)));
    }

    #[test]
    fn syntax_errors_are_fatal() {
        let err = Converter::default().convert("const = <", Target::Vue).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }
}
