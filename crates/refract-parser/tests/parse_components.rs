use pretty_assertions::assert_eq;
use refract_parser::{parse_component_source, IrNode};

const SWITCH: &str = r#"
import * as React from "react"
import * as SwitchPrimitives from "@radix-ui/react-switch"
import { cn } from "@/lib/utils"

const Switch = React.forwardRef<
  React.ElementRef<typeof SwitchPrimitives.Root>,
  SwitchProps
>(({ className, checked, onCheckedChange, disabled, ...rest }, ref) => (
  <SwitchPrimitives.Root
    className={cn(
      "peer inline-flex h-6 w-11 data-[state=checked]:bg-primary data-[state=unchecked]:bg-input",
      className
    )}
    {...rest}
    ref={ref}
  >
    <SwitchPrimitives.Thumb
      className={cn(
        "pointer-events-none block h-5 w-5 data-[state=checked]:translate-x-5"
      )}
    />
  </SwitchPrimitives.Root>
))
Switch.displayName = SwitchPrimitives.Root.displayName

export { Switch }
"#;

const DIALOG: &str = r#"
import * as React from "react"
import * as DialogPrimitive from "@radix-ui/react-dialog"
import { X } from "lucide-react"
import { cn } from "@/lib/utils"

const Dialog = DialogPrimitive.Root

const DialogHeader = ({
  className,
  ...props
}: React.HTMLAttributes<HTMLDivElement>) => (
  <div className={cn("flex flex-col space-y-1.5", className)} {...props} />
)

const DialogContent = React.forwardRef<
  React.ElementRef<typeof DialogPrimitive.Content>,
  React.ComponentPropsWithoutRef<typeof DialogPrimitive.Content>
>(({ className, children, ...props }, ref) => (
  <DialogPrimitive.Content ref={ref} className={cn("fixed grid", className)} {...props}>
    {children}
    <DialogPrimitive.Close className="absolute right-4 top-4">
      <X className="h-4 w-4" />
    </DialogPrimitive.Close>
  </DialogPrimitive.Content>
))

export { Dialog, DialogHeader, DialogContent }
"#;

#[test]
fn switch_state_props_are_detected() {
    let result = parse_component_source(SWITCH).unwrap();
    let switch = result.primary().unwrap();

    assert_eq!(switch.name, "Switch");
    let names: Vec<&str> = switch.props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["checked", "onCheckedChange", "disabled"]);

    let checked = switch.prop("checked").unwrap();
    assert!(checked.is_state_prop());
    assert_eq!(checked.ty, "boolean");

    let state = &switch.metadata.state_props[0];
    assert_eq!(state.role.as_deref(), Some("switch"));
    assert_eq!(state.change_handler.as_deref(), Some("onCheckedChange"));

    let ref_forward = switch.metadata.ref_forward.as_ref().unwrap();
    assert_eq!(ref_forward.element_type, "HTMLButtonElement");

    // Wrapped primitives stay dotted until structural repair.
    let root = switch.root.root_element().unwrap();
    assert_eq!(root.tag, "SwitchPrimitives.Root");
    assert!(root.is_primitive());
    match &root.children()[0] {
        IrNode::Element(thumb) => assert_eq!(thumb.tag, "SwitchPrimitives.Thumb"),
        other => panic!("expected thumb element, got {other:?}"),
    }
}

#[test]
fn re_exports_are_recorded_but_not_convertible() {
    let result = parse_component_source(DIALOG).unwrap();

    let names: Vec<&str> = result.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Dialog", "DialogHeader", "DialogContent"]);

    let dialog = result.component("Dialog").unwrap();
    assert!(dialog.is_re_export);
    assert_eq!(dialog.re_export_target.as_deref(), Some("DialogPrimitive.Root"));
    assert!(dialog.root.is_empty());

    let convertible: Vec<&str> = result.convertible().map(|c| c.name.as_str()).collect();
    assert_eq!(convertible, vec!["DialogHeader", "DialogContent"]);
    assert_eq!(result.primary.as_deref(), Some("DialogHeader"));
}

#[test]
fn children_become_slots() {
    let result = parse_component_source(DIALOG).unwrap();
    let content = result.component("DialogContent").unwrap();
    let root = content.root.root_element().unwrap();

    assert_eq!(root.children()[0], IrNode::Slot);
    assert!(content.root.contains_slot());
    assert_eq!(
        content.metadata.ref_forward.as_ref().unwrap().element_type,
        "HTMLDivElement"
    );
}

#[test]
fn imports_are_categorized() {
    use refract_parser::ImportCategory;

    let result = parse_component_source(DIALOG).unwrap();
    let categories: Vec<ImportCategory> =
        result.shared.imports.iter().map(|i| i.category).collect();
    assert_eq!(
        categories,
        vec![
            ImportCategory::FrameworkNative,
            ImportCategory::ComponentPrimitive,
            ImportCategory::Icon,
            ImportCategory::Utility,
        ]
    );
    assert!(result.shared.uses_class_merge);
}
