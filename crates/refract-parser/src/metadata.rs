//! Typed records extracted from a source unit and attached to components.

use serde::Serialize;

use crate::ir::IrNode;
use crate::tables::element_type_tag;

/// A named `cva(...)` configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantConfig {
    /// Binding name, e.g. `buttonVariants`.
    pub name: String,

    /// First argument of the builder call. Template interpolations are kept
    /// verbatim as `${...}`.
    pub base_classes: String,

    /// Axis name → ordered (value, classes) pairs.
    pub variants: Vec<VariantAxis>,

    /// Axis name → default value.
    pub default_variants: Vec<(String, String)>,

    pub compound_variants: Vec<CompoundVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantAxis {
    pub name: String,
    pub values: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundVariant {
    /// Axis → value (or opaque array text) conditions.
    pub conditions: Vec<(String, String)>,
    pub classes: String,
}

impl VariantConfig {
    pub fn axis(&self, name: &str) -> Option<&VariantAxis> {
        self.variants.iter().find(|a| a.name == name)
    }

    pub fn has_axis(&self, name: &str) -> bool {
        self.axis(name).is_some()
    }

    pub fn default_for(&self, axis: &str) -> Option<&str> {
        self.default_variants
            .iter()
            .find(|(k, _)| k == axis)
            .map(|(_, v)| v.as_str())
    }

    /// Default-variant keys that name no axis.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let unknown: Vec<String> = self
            .default_variants
            .iter()
            .filter(|(k, _)| !self.has_axis(k))
            .map(|(k, _)| k.clone())
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(unknown)
        }
    }
}

impl VariantAxis {
    pub fn value_names(&self) -> Vec<String> {
        self.values.iter().map(|(k, _)| k.clone()).collect()
    }
}

/// Element type and parameter name of a `forwardRef` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefForwardConfig {
    /// DOM interface name, e.g. `HTMLButtonElement`.
    pub element_type: String,
    pub param_name: String,
}

impl RefForwardConfig {
    pub fn native_tag(&self) -> &'static str {
        element_type_tag(&self.element_type)
    }
}

/// The two labels a boolean state prop maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateLabels {
    #[serde(rename = "true")]
    pub on: String,
    #[serde(rename = "false")]
    pub off: String,
}

/// A prop as seen by generators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDefinition {
    pub name: String,

    /// Opaque type text.
    #[serde(rename = "type")]
    pub ty: String,

    pub optional: bool,

    /// Opaque literal text of the default.
    pub default_value: Option<String>,

    pub is_variant: bool,

    pub allowed_values: Option<Vec<String>>,

    /// Present iff the prop drives a data-state attribute.
    pub data_state_values: Option<StateLabels>,

    /// Local binding when destructured under another name (`className: cls`).
    pub local_name: Option<String>,
}

impl PropDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: true,
            default_value: None,
            is_variant: false,
            allowed_values: None,
            data_state_values: None,
            local_name: None,
        }
    }

    /// Identifier the component body uses for this prop.
    pub fn local(&self) -> &str {
        self.local_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_state_prop(&self) -> bool {
        self.data_state_values.is_some()
    }

    /// Change callbacks are not rendered as plain props by the targets.
    pub fn is_callback(&self) -> bool {
        is_event_name(&self.name)
    }
}

/// `onClick`, `onCheckedChange`, ...
pub fn is_event_name(name: &str) -> bool {
    name.len() > 2 && name.starts_with("on") && name[2..].starts_with(|c: char| c.is_ascii_uppercase())
}

/// A boolean prop paired with its change callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateProp {
    pub prop: String,
    pub change_handler: Option<String>,
    pub labels: StateLabels,
    /// ARIA attribute mirroring the value, e.g. `aria-checked`.
    pub aria_attribute: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportCategory {
    FrameworkNative,
    ComponentPrimitive,
    Utility,
    Style,
    Icon,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    pub source: String,
    pub default: Option<String>,
    pub namespace: Option<String>,
    /// (imported, local) pairs.
    pub named: Vec<(String, String)>,
    pub type_only: bool,
    pub category: ImportCategory,
}

impl ImportInfo {
    /// Every local binding introduced by the import.
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.default
            .iter()
            .chain(self.namespace.iter())
            .map(String::as_str)
            .chain(self.named.iter().map(|(_, local)| local.as_str()))
    }
}

/// `const [open, setOpen] = useState(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalState {
    pub name: String,
    pub setter: Option<String>,
    pub initial: String,
}

/// Body of a `useEffect` / `useLayoutEffect` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub body: String,
    pub dependencies: Option<Vec<String>>,
}

/// Per-component metadata visible to generators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub variant: Option<VariantConfig>,
    pub ref_forward: Option<RefForwardConfig>,
    pub imports: Vec<ImportInfo>,
    pub state_props: Vec<StateProp>,
    pub uses_class_merge: bool,
}

/// Metadata concerns a plugin may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetadataField {
    Variant,
    RefForward,
    Imports,
    StateProps,
    ClassMerge,
}

impl ComponentMetadata {
    /// Fields whose values differ between `self` and `other`.
    pub fn changed_fields(&self, other: &ComponentMetadata) -> Vec<MetadataField> {
        let mut changed = Vec::new();
        if self.variant != other.variant {
            changed.push(MetadataField::Variant);
        }
        if self.ref_forward != other.ref_forward {
            changed.push(MetadataField::RefForward);
        }
        if self.imports != other.imports {
            changed.push(MetadataField::Imports);
        }
        if self.state_props != other.state_props {
            changed.push(MetadataField::StateProps);
        }
        if self.uses_class_merge != other.uses_class_merge {
            changed.push(MetadataField::ClassMerge);
        }
        changed
    }
}

/// One component found in a source unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub name: String,
    pub root: IrNode,
    pub metadata: ComponentMetadata,
    pub props: Vec<PropDefinition>,
    pub is_re_export: bool,
    pub re_export_target: Option<String>,
    pub local_state: Vec<LocalState>,
    pub effects: Vec<Effect>,
}

impl ComponentDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: IrNode::empty(),
            metadata: ComponentMetadata::default(),
            props: Vec::new(),
            is_re_export: false,
            re_export_target: None,
            local_state: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn prop(&self, name: &str) -> Option<&PropDefinition> {
        self.props.iter().find(|p| p.name == name)
    }
}

/// A non-fatal extraction problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    /// Stable identifier such as `variant-config` or `plugin:consolidate`.
    pub code: String,
    pub message: String,
}

impl Warning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Unit-wide metadata shared by every component.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedMetadata {
    pub variant_configs: Vec<VariantConfig>,
    pub imports: Vec<ImportInfo>,
    pub uses_class_merge: bool,
}

impl SharedMetadata {
    pub fn variant_config(&self, name: &str) -> Option<&VariantConfig> {
        self.variant_configs.iter().find(|v| v.name == name)
    }
}

/// Everything parsed out of one source unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Name of the primary component.
    pub primary: Option<String>,
    pub components: Vec<ComponentDefinition>,
    pub warnings: Vec<Warning>,
    pub errors: Vec<String>,
    pub shared: SharedMetadata,
}

impl ParseResult {
    pub fn primary(&self) -> Option<&ComponentDefinition> {
        let name = self.primary.as_deref()?;
        self.component(name)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut ComponentDefinition> {
        self.components.iter_mut().find(|c| c.name == name)
    }

    /// Components with extracted markup, excluding re-exports.
    pub fn convertible(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.iter().filter(|c| !c.is_re_export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button_variants() -> VariantConfig {
        VariantConfig {
            name: "buttonVariants".to_string(),
            base_classes: "inline-flex".to_string(),
            variants: vec![VariantAxis {
                name: "variant".to_string(),
                values: vec![
                    ("default".to_string(), "A".to_string()),
                    ("destructive".to_string(), "B".to_string()),
                ],
            }],
            default_variants: vec![("variant".to_string(), "default".to_string())],
            compound_variants: Vec::new(),
        }
    }

    #[test]
    fn validates_default_variants() {
        let mut config = button_variants();
        assert!(config.validate().is_ok());

        config
            .default_variants
            .push(("size".to_string(), "lg".to_string()));
        assert_eq!(config.validate(), Err(vec!["size".to_string()]));
    }

    #[test]
    fn detects_event_names() {
        assert!(is_event_name("onClick"));
        assert!(is_event_name("onCheckedChange"));
        assert!(!is_event_name("one"));
        assert!(!is_event_name("on"));
    }

    #[test]
    fn reports_changed_metadata_fields() {
        let before = ComponentMetadata::default();
        let mut after = before.clone();
        after.uses_class_merge = true;
        after.variant = Some(button_variants());

        assert_eq!(
            before.changed_fields(&after),
            vec![MetadataField::Variant, MetadataField::ClassMerge]
        );
    }
}
