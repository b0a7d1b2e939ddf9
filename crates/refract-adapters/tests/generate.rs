use pretty_assertions::assert_eq;
use refract_adapters::{
    Declaration, GenerateOptions, SvelteAdapter, TargetAdapter, VueAdapter,
};
use refract_parser::{parse_component_source, ComponentDefinition};

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
        default: "bg-primary",
        destructive: "bg-destructive",
      },
      size: {
        default: "h-10 px-4",
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
    VariantProps<typeof buttonVariants> {}

const Button = React.forwardRef<HTMLButtonElement, ButtonProps>(
  ({ className, variant, size, ...props }, ref) => (
    <button
      className={cn(buttonVariants({ variant, size, className }))}
      ref={ref}
      {...props}
    />
  )
)

export { Button, buttonVariants }
"#;

const SWITCH: &str = r#"
import * as React from "react"
import * as SwitchPrimitives from "@radix-ui/react-switch"
import { cn } from "@/lib/utils"

const Switch = React.forwardRef<
  React.ElementRef<typeof SwitchPrimitives.Root>,
  SwitchProps
>(({ className, checked, onCheckedChange, disabled, ...rest }, ref) => (
  <SwitchPrimitives.Root
    className={cn("peer inline-flex data-[state=checked]:bg-primary", className)}
    {...rest}
    ref={ref}
  >
    <SwitchPrimitives.Thumb className="block data-[state=checked]:translate-x-5" />
  </SwitchPrimitives.Root>
))

export { Switch }
"#;

/// Parse and attach the unit's variant configuration the way the
/// consolidation plugin does.
fn component(source: &str) -> ComponentDefinition {
    let result = parse_component_source(source).unwrap();
    let mut component = result.primary().unwrap().clone();
    component.metadata.variant = result.shared.variant_configs.first().cloned();
    component
}

fn legacy() -> GenerateOptions {
    GenerateOptions {
        svelte_runes: false,
        ..GenerateOptions::default()
    }
}

#[test]
fn button_svelte_declares_class_and_variant_props() {
    let button = component(BUTTON);
    let code = SvelteAdapter.generate(&button, &button.props, &legacy()).unwrap();
    let script = code.script(true);

    assert!(script.contains("import { cva } from \"class-variance-authority\";"));
    assert!(script.contains("import { cn } from \"$lib/utils\";"));
    assert!(script.contains("const buttonVariants = cva(\"inline-flex items-center justify-center\", {"));
    assert!(script.contains("export { className as class };"));
    assert!(script.contains("export let variant: \"default\" | \"destructive\" = \"default\";"));
    assert!(script.contains("export let size: \"default\" | \"sm\" = \"default\";"));
    assert_eq!(
        code.markup,
        "<button class={cn(buttonVariants({ variant, size }), className)} bind:this={ref} {...$$restProps}></button>"
    );
}

#[test]
fn button_vue_declares_class_and_variant_props() {
    let button = component(BUTTON);
    let code = VueAdapter
        .generate(&button, &button.props, &GenerateOptions::default())
        .unwrap();
    let script = code.script(true);

    assert!(script.starts_with("import { shallowRef } from \"vue\";"));
    assert!(script.contains("  class?: string;"));
    assert!(script.contains(
        "const props = withDefaults(defineProps<Props>(), {\n  variant: \"default\",\n  size: \"default\",\n});"
    ));
    assert_eq!(
        code.markup,
        "<button :class=\"cn(buttonVariants({ variant: props.variant, size: props.size }), props.class)\" ref=\"elementRef\" v-bind=\"$attrs\"></button>"
    );
}

#[test]
fn forwarded_ref_is_declared_once() {
    let button = component(BUTTON);

    let svelte = SvelteAdapter.generate(&button, &button.props, &legacy()).unwrap();
    let ref_bindings: Vec<_> = svelte
        .declarations
        .unwrap()
        .into_iter()
        .filter_map(|d| match d {
            Declaration::Props { bindings, .. } => Some(bindings),
            _ => None,
        })
        .flatten()
        .filter(|b| b.name == "ref")
        .collect();
    assert_eq!(ref_bindings.len(), 1);
    assert_eq!(ref_bindings[0].local, "ref");
    assert!(ref_bindings[0].bindable);

    let vue = VueAdapter
        .generate(&button, &button.props, &GenerateOptions::default())
        .unwrap();
    let refs = vue
        .declarations
        .unwrap()
        .iter()
        .filter(|d| matches!(d, Declaration::Ref { .. }))
        .count();
    assert_eq!(refs, 1);
}

#[test]
fn switch_gets_state_attributes_on_root_only() {
    let switch = component(SWITCH);
    let code = SvelteAdapter.generate(&switch, &switch.props, &legacy()).unwrap();

    assert_eq!(
        code.markup,
        "<SwitchPrimitives.Root class={cn(\"peer inline-flex data-[state=checked]:bg-primary\", className)} \
bind:this={ref} type=\"button\" role=\"switch\" aria-checked={checked} data-state={checkedState} \
disabled={disabled} on:click={toggle} {...$$restProps}>\n  \
<SwitchPrimitives.Thumb class=\"block data-[state=checked]:translate-x-5\" data-state={checkedState} />\n\
</SwitchPrimitives.Root>"
    );

    let script = code.script(true);
    assert!(script.contains("$: checkedState = checked ? \"checked\" : \"unchecked\";"));
    assert!(script.contains(
        "function toggle() {\n  if (disabled) return;\n  checked = !checked;\n  onCheckedChange?.(checked);\n}"
    ));
}

#[test]
fn switch_vue_emits_state_changes() {
    let switch = component(SWITCH);
    let code = VueAdapter
        .generate(&switch, &switch.props, &GenerateOptions::default())
        .unwrap();
    let script = code.script(true);

    assert!(script.starts_with("import { computed } from \"vue\";"));
    assert!(script.contains("\"update:checked\": [value: boolean];"));
    assert!(script.contains(
        "const checkedState = computed(() => (props.checked ? \"checked\" : \"unchecked\"));"
    ));
    assert!(script.contains("emit(\"update:checked\", !props.checked);"));
    assert!(!script.contains("onCheckedChange?:"));
    assert!(code.markup.contains(":aria-checked=\"props.checked\""));
    assert!(code.markup.contains("@click=\"toggle\""));
}

#[test]
fn void_fallback_has_no_closing_tag_or_slot() {
    let source = r#"
import * as React from "react"
import { cn } from "@/lib/utils"

const Input = React.forwardRef<HTMLInputElement, React.InputHTMLAttributes<HTMLInputElement>>(
  ({ className, type, ...props }, ref) => {
    return renderInput({ className, type, ref, ...props })
  }
)

export { Input }
"#;
    let input = component(source);
    let code = SvelteAdapter.generate(&input, &input.props, &legacy()).unwrap();
    assert!(code.declarations.is_none());
    assert!(code.markup.starts_with("<input "));
    assert!(code.markup.ends_with(" />"));
    assert!(!code.markup.contains("</input>"));
    assert!(!code.markup.contains("<slot"));
}

#[test]
fn vue_arrow_parameters_shadow_props() {
    let source = r#"
export function Choice({ selected, onChange }: { selected: boolean; onChange: (value: boolean) => void }) {
  return (
    <button onClick={() => [true].forEach((selected: boolean) => onChange(selected))}>
      {selected ? "on" : "off"}
    </button>
  )
}
"#;
    let choice = component(source);
    let code = VueAdapter
        .generate(&choice, &choice.props, &GenerateOptions::default())
        .unwrap();

    assert!(code.markup.contains(
        "@click=\"() => [true].forEach((selected: boolean) => props.onChange(selected))\""
    ));
    assert!(!code.markup.contains("(props.selected"));
    assert!(code.markup.contains("props.selected ?"));
}
