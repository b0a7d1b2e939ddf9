//! TSX component source → [`ParseResult`].
//!
//! The parser runs oxc over the whole unit once, then:
//! - collects imports, variant configurations and `*Props` declarations,
//! - discovers components (forwardRef wrappers, plain functions, re-exports),
//! - lowers each component's returned markup to IR and resolves its props,
//!   ref configuration, local state, effects and state props.

mod discover;
mod hooks;
mod imports;
mod markup;
mod props;
mod refs;
mod syntax;
mod variants;

use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingPatternKind, Declaration, Statement, VariableDeclaration};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::ParseError;
use crate::ir::IrNode;
use crate::metadata::{ComponentDefinition, ParseResult, SharedMetadata, VariantConfig, Warning};
use crate::state::{default_detectors, detect_state_props, StateDetector};

use discover::{discover, Candidate, CandidateKind};
use markup::MarkupLowering;
use props::{collect_props_declarations, resolve_props, PropsDeclaration};

pub use imports::{categorize, CLASS_MERGE_FUNCTIONS};

/// Parses component source units.
pub struct ComponentParser {
    detectors: Vec<Box<dyn StateDetector>>,
}

impl Default for ComponentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentParser {
    /// Parser with the built-in state detectors.
    pub fn new() -> Self {
        Self {
            detectors: default_detectors(),
        }
    }

    /// Parser with a custom set of state detectors.
    pub fn with_detectors(detectors: Vec<Box<dyn StateDetector>>) -> Self {
        Self { detectors }
    }

    /// Parse one source unit. Syntax errors are fatal; everything else
    /// degrades to warnings.
    pub fn parse(&self, source: &str) -> Result<ParseResult, ParseError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::tsx()).parse();

        if ret.panicked {
            return Err(ParseError::Panicked);
        }
        if let Some(error) = ret.errors.first() {
            return Err(ParseError::Syntax(error.to_string()));
        }

        let statements = &ret.program.body;
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        let imports = imports::collect_imports(statements);
        let uses_class_merge = imports::uses_class_merge(source, &imports);
        let variant_configs = collect_variant_configs(source, statements, &mut warnings);
        let decls = collect_props_declarations(source, statements);

        let shared = SharedMetadata {
            variant_configs,
            imports,
            uses_class_merge,
        };

        let discovery = discover(source, statements);
        let mut components = Vec::new();
        for candidate in &discovery.candidates {
            if let Some(component) = self.extract(source, candidate, &decls, &shared, &mut warnings) {
                components.push(component);
            }
        }

        let primary = discovery
            .default_export
            .as_ref()
            .filter(|name| components.iter().any(|c| &c.name == *name && !c.is_re_export))
            .cloned()
            .or_else(|| {
                components
                    .iter()
                    .find(|c| !c.is_re_export)
                    .map(|c| c.name.clone())
            });

        if let Some(default) = &discovery.default_export {
            if primary.as_ref() != Some(default) {
                errors.push(format!("default export `{default}` is not a convertible component"));
            }
        }
        if primary.is_none() {
            errors.push("no component found".to_string());
        }

        tracing::debug!(
            "Parsed {} components ({} warnings)",
            components.len(),
            warnings.len()
        );

        Ok(ParseResult {
            primary,
            components,
            warnings,
            errors,
            shared,
        })
    }

    fn extract(
        &self,
        source: &str,
        candidate: &Candidate,
        decls: &[PropsDeclaration],
        shared: &SharedMetadata,
        warnings: &mut Vec<Warning>,
    ) -> Option<ComponentDefinition> {
        let mut component = ComponentDefinition::new(&candidate.name);

        let (callback, call) = match &candidate.kind {
            CandidateKind::ReExport(target) => {
                component.is_re_export = true;
                component.re_export_target = Some(target.clone());
                return Some(component);
            }
            CandidateKind::ForwardRef { call, callback } => (*callback, Some(*call)),
            CandidateKind::Plain(callback) => (*callback, None),
        };

        let mut lowering = MarkupLowering::new(source);
        lowering.collect_tag_aliases(callback.statements());
        let root = callback
            .returned_expression()
            .and_then(|expr| lowering.lower_expression(expr));

        match root {
            Some(root) => component.root = root,
            // Uppercase helpers that render nothing are not components.
            None if call.is_none() => {
                tracing::debug!("Skipping {}: no markup returned", candidate.name);
                return None;
            }
            None => {
                warnings.push(Warning::new(
                    "markup",
                    format!("{}: no markup found, using the ref element", candidate.name),
                ));
                component.root = IrNode::empty();
            }
        }

        if let Some(call) = call {
            component.metadata.ref_forward =
                refs::extract_ref_config(source, &candidate.name, call, callback, warnings);
        }

        component.props = resolve_props(
            source,
            &candidate.name,
            Some(callback),
            decls,
            &shared.variant_configs,
            warnings,
        );
        component.metadata.state_props =
            detect_state_props(&candidate.name, &mut component.props, &self.detectors);

        let statements = callback.statements();
        component.local_state = hooks::collect_local_state(source, statements);
        component.effects = hooks::collect_effects(source, statements);

        Some(component)
    }
}

/// Parse with the default detectors.
pub fn parse_component_source(source: &str) -> Result<ParseResult, ParseError> {
    ComponentParser::new().parse(source)
}

fn collect_variant_configs(
    source: &str,
    statements: &[Statement],
    warnings: &mut Vec<Warning>,
) -> Vec<VariantConfig> {
    let mut configs = Vec::new();
    let mut visit = |decl: &VariableDeclaration| {
        for declarator in &decl.declarations {
            let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
                continue;
            };
            if let Some(init) = &declarator.init {
                if let Some(config) =
                    variants::extract_variant_config(source, id.name.as_str(), init, warnings)
                {
                    configs.push(config);
                }
            }
        }
    };

    for stmt in statements {
        match stmt {
            Statement::VariableDeclaration(decl) => visit(decl),
            Statement::ExportNamedDeclaration(export) => {
                if let Some(Declaration::VariableDeclaration(decl)) = &export.declaration {
                    visit(decl);
                }
            }
            _ => {}
        }
    }
    configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BindingKind;
    use pretty_assertions::assert_eq;

    const BUTTON: &str = r#"
import * as React from "react"
import { Slot } from "@radix-ui/react-slot"
import { cva, type VariantProps } from "class-variance-authority"
import { cn } from "@/lib/utils"

const buttonVariants = cva(
  "inline-flex items-center justify-center",
  {
    variants: {
      variant: {
        default: "bg-primary text-primary-foreground",
        destructive: "bg-destructive text-destructive-foreground",
      },
      size: {
        default: "h-10 px-4 py-2",
        sm: "h-9 px-3",
      },
    },
    defaultVariants: {
      variant: "default",
      size: "default",
    },
  }
)

export interface ButtonProps
  extends React.ButtonHTMLAttributes<HTMLButtonElement>,
    VariantProps<typeof buttonVariants> {
  asChild?: boolean
}

const Button = React.forwardRef<HTMLButtonElement, ButtonProps>(
  ({ className, variant, size, asChild = false, ...props }, ref) => {
    const Comp = asChild ? Slot : "button"
    return (
      <Comp
        className={cn(buttonVariants({ variant, size, className }))}
        ref={ref}
        {...props}
      />
    )
  }
)
Button.displayName = "Button"

export { Button, buttonVariants }
"#;

    #[test]
    fn parses_button() {
        let result = parse_component_source(BUTTON).unwrap();
        assert_eq!(result.primary.as_deref(), Some("Button"));
        assert!(result.errors.is_empty());
        assert!(result.shared.uses_class_merge);
        assert_eq!(result.shared.variant_configs.len(), 1);

        let button = result.primary().unwrap();
        let root = button.root.root_element().unwrap();
        assert_eq!(root.tag, "button");
        assert_eq!(root.binding("ref").unwrap().expression, "ref");
        assert_eq!(root.binding("...spread").unwrap().kind, BindingKind::Spread);
        assert!(root.class_text().unwrap().contains("buttonVariants("));

        let ref_forward = button.metadata.ref_forward.as_ref().unwrap();
        assert_eq!(ref_forward.element_type, "HTMLButtonElement");
        assert_eq!(ref_forward.param_name, "ref");

        let variant = button.prop("variant").unwrap();
        assert!(variant.is_variant);
        assert_eq!(variant.default_value.as_deref(), Some("\"default\""));
        assert_eq!(
            variant.allowed_values,
            Some(vec!["default".to_string(), "destructive".to_string()])
        );
        assert_eq!(button.prop("asChild").unwrap().default_value.as_deref(), Some("false"));
        assert!(button.prop("className").is_none());
    }

    #[test]
    fn syntax_error_is_fatal() {
        let err = parse_component_source("const X = (").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_) | ParseError::Panicked));
    }

    #[test]
    fn records_missing_component() {
        let result = parse_component_source("export const value = 1").unwrap();
        assert!(result.primary.is_none());
        assert_eq!(result.errors, vec!["no component found".to_string()]);
    }

    #[test]
    fn default_export_selects_primary() {
        let source = r#"
function Helper() { return <span /> }
export default function Card({ title }: { title: string }) {
  return <div className="card">{title}</div>
}
"#;
        let result = parse_component_source(source).unwrap();
        assert_eq!(result.primary.as_deref(), Some("Card"));
        assert_eq!(result.components.len(), 2);
    }

    #[test]
    fn captures_local_state_and_effects() {
        let source = r#"
export function Counter() {
  const [count, setCount] = React.useState(0)
  React.useEffect(() => {
    document.title = String(count)
  }, [count])
  return <button onClick={() => setCount(count + 1)}>{count}</button>
}
"#;
        let result = parse_component_source(source).unwrap();
        let counter = result.primary().unwrap();
        assert_eq!(counter.local_state[0].name, "count");
        assert_eq!(counter.local_state[0].setter.as_deref(), Some("setCount"));
        assert_eq!(counter.local_state[0].initial, "0");
        assert_eq!(counter.effects[0].body, "document.title = String(count)");
        assert_eq!(counter.effects[0].dependencies, Some(vec!["count".to_string()]));

        let root = counter.root.root_element().unwrap();
        assert_eq!(root.binding("onClick").unwrap().kind, BindingKind::Event);
    }

    #[test]
    fn conditional_markup_keeps_guard() {
        let source = r#"
export function Badge({ icon }: { icon?: string }) {
  return <span>{icon && <i className={icon} />}text</span>
}
"#;
        let result = parse_component_source(source).unwrap();
        let root = result.primary().unwrap().root.root_element().unwrap();
        match &root.children()[0] {
            IrNode::ConditionalShow(cond) => {
                assert_eq!(cond.guard, "icon");
                assert!(cond.otherwise.is_none());
            }
            other => panic!("expected conditional, got {other:?}"),
        }
    }
}
