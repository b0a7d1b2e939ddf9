//! Boolean state-prop detection.
//!
//! A detector recognizes a prop pair such as `checked` / `onCheckedChange`
//! and describes the attributes a generator should synthesize for it.

use crate::metadata::{PropDefinition, StateLabels, StateProp};

/// Class fragment that selects on the synthesized `data-state` attribute.
pub const STATE_SELECTOR_MARKER: &str = "data-[state=";

/// Recognizes one family of state props.
pub trait StateDetector: Send + Sync {
    /// Prop name this detector reacts to.
    fn prop_name(&self) -> &'static str;

    /// Returns the state description when `prop` is present in `props`.
    fn detect(&self, component: &str, props: &[PropDefinition]) -> Option<StateProp>;
}

/// A `value` / `onValueChange` pair with fixed labels and ARIA mirror.
#[derive(Debug, Clone)]
pub struct BooleanStateDetector {
    pub prop: &'static str,
    pub change_handler: &'static str,
    pub on: &'static str,
    pub off: &'static str,
    pub aria: &'static str,
    /// Role chooser keyed on the component name.
    pub role: fn(&str) -> Option<&'static str>,
}

impl StateDetector for BooleanStateDetector {
    fn prop_name(&self) -> &'static str {
        self.prop
    }

    fn detect(&self, component: &str, props: &[PropDefinition]) -> Option<StateProp> {
        props.iter().find(|p| p.name == self.prop)?;
        let change_handler = props
            .iter()
            .find(|p| p.name == self.change_handler)
            .map(|p| p.name.clone());

        Some(StateProp {
            prop: self.prop.to_string(),
            change_handler,
            labels: StateLabels {
                on: self.on.to_string(),
                off: self.off.to_string(),
            },
            aria_attribute: self.aria.to_string(),
            role: (self.role)(component).map(str::to_string),
        })
    }
}

fn checkable_role(component: &str) -> Option<&'static str> {
    if component.contains("Switch") {
        Some("switch")
    } else {
        Some("checkbox")
    }
}

fn no_role(_component: &str) -> Option<&'static str> {
    None
}

/// Detectors applied when no custom set is configured.
pub fn default_detectors() -> Vec<Box<dyn StateDetector>> {
    vec![
        Box::new(BooleanStateDetector {
            prop: "checked",
            change_handler: "onCheckedChange",
            on: "checked",
            off: "unchecked",
            aria: "aria-checked",
            role: checkable_role,
        }),
        Box::new(BooleanStateDetector {
            prop: "pressed",
            change_handler: "onPressedChange",
            on: "on",
            off: "off",
            aria: "aria-pressed",
            role: no_role,
        }),
        Box::new(BooleanStateDetector {
            prop: "open",
            change_handler: "onOpenChange",
            on: "open",
            off: "closed",
            aria: "aria-expanded",
            role: no_role,
        }),
    ]
}

/// Run `detectors` over `props`, marking detected props in place.
pub fn detect_state_props(
    component: &str,
    props: &mut [PropDefinition],
    detectors: &[Box<dyn StateDetector>],
) -> Vec<StateProp> {
    let mut found = Vec::new();
    for detector in detectors {
        if let Some(state) = detector.detect(component, props) {
            if let Some(prop) = props.iter_mut().find(|p| p.name == state.prop) {
                prop.data_state_values = Some(state.labels.clone());
                if prop.ty.is_empty() || prop.ty == "unknown" {
                    prop.ty = "boolean".to_string();
                }
            }
            found.push(state);
        }
    }
    found
}

/// True if a class string selects on `data-state`.
pub fn has_state_selector(class_text: &str) -> bool {
    class_text.contains(STATE_SELECTOR_MARKER)
}
