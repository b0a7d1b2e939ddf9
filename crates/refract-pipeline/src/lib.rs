//! Conversion pipeline for refract.
//!
//! A [`Converter`] parses a source unit, runs the registered [`Plugin`]s
//! around parsing and generation, and assembles one output file per
//! component. The built-in plugins consolidate metadata, repair wrapped
//! primitive markup, apply markup fixups and convert Svelte output to runes.

pub mod consolidate;
pub mod context;
pub mod converter;
pub mod error;
pub mod fixups;
pub mod markup;
pub mod pipeline;
pub mod repair;
pub mod runes;

pub use consolidate::MetadataConsolidation;
pub use context::PluginContext;
pub use converter::{ConversionResult, ConvertOptions, Converter, Formatter, FrameworkOptions};
pub use error::{ConvertError, FormatError, PluginError};
pub use fixups::MarkupFixups;
pub use pipeline::{Pipeline, Plugin};
pub use repair::StructuralRepair;
pub use runes::ReactiveSyntax;

pub use refract_adapters::Target;
