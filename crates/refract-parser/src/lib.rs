//! TSX component parsing for refract.
//!
//! This crate turns a shadcn-style React component source unit into a
//! framework-agnostic [`ParseResult`]: an IR tree per component plus the
//! variant, ref, import and state-prop metadata the target adapters need.

pub mod error;
pub mod ir;
pub mod metadata;
pub mod parser;
pub mod state;
pub mod tables;

pub use error::ParseError;
pub use ir::{Binding, BindingKind, ConditionalNode, ElementNode, IrNode, TextNode};
pub use metadata::{
    ComponentDefinition, ComponentMetadata, CompoundVariant, Effect, ImportCategory, ImportInfo, LocalState,
    MetadataField, ParseResult, PropDefinition, RefForwardConfig, SharedMetadata, StateLabels,
    StateProp, VariantAxis, VariantConfig, Warning,
};
pub use parser::{parse_component_source, ComponentParser};
pub use state::{BooleanStateDetector, StateDetector};
