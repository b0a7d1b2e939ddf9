//! Structured script declarations and their serialization.
//!
//! Generators build a `Vec<Declaration>` in the fixed block order and keep it
//! structured until assembly, so post-generate plugins can rewrite bindings
//! without re-parsing script text.

/// Reactive idiom a declaration is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idiom {
    /// `export let`, `$:` and lifecycle functions.
    SvelteLegacy,
    /// `$props()`, `$derived`, `$state` and `$effect`.
    SvelteRunes,
    /// `<script setup>` with `defineProps`, `computed` and `ref`.
    Vue,
}

/// One prop in a prop-binding declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropBinding {
    /// Name seen by consumers (`class`).
    pub name: String,
    /// Local identifier (`className`).
    pub local: String,
    pub ty: Option<String>,
    /// Literal default text.
    pub default: Option<String>,
    pub optional: bool,
    /// Two-way bindable (`bind:checked`, forwarded refs).
    pub bindable: bool,
}

impl PropBinding {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            local: name.clone(),
            name,
            ty: None,
            default: None,
            optional: true,
            bindable: false,
        }
    }

    pub fn local(mut self, local: impl Into<String>) -> Self {
        self.local = local.into();
        self
    }

    pub fn ty(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn default_value(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }

    pub fn bindable(mut self) -> Self {
        self.bindable = true;
        self
    }
}

/// A member of a generated props interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    pub name: String,
    pub ty: String,
    pub optional: bool,
}

/// A single script declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Import(String),
    /// Verbatim statement, e.g. a variant configuration.
    Statement(String),
    PropsType {
        name: String,
        members: Vec<TypeMember>,
    },
    Props {
        idiom: Idiom,
        bindings: Vec<PropBinding>,
        /// Identifier receiving the remaining attributes.
        rest: Option<String>,
        /// Interface annotating the binding.
        type_name: Option<String>,
    },
    /// Vue `defineEmits`: (event, payload type).
    Emits(Vec<(String, String)>),
    Derived {
        idiom: Idiom,
        name: String,
        expression: String,
    },
    /// Vue template ref.
    Ref {
        name: String,
        element_type: String,
    },
    State {
        idiom: Idiom,
        name: String,
        initial: String,
        setter: Option<String>,
    },
    Function {
        name: String,
        params: String,
        body: String,
    },
    Effect {
        idiom: Idiom,
        body: String,
        dependencies: Option<Vec<String>>,
    },
    /// Vue `defineExpose`.
    Expose(Vec<String>),
}

impl Declaration {
    pub fn is_import(&self) -> bool {
        matches!(self, Declaration::Import(_))
    }

    /// Serialize one declaration. Returns `None` for declarations that have
    /// no JavaScript form (type declarations without TypeScript).
    pub fn render(&self, typescript: bool) -> Option<String> {
        match self {
            Declaration::Import(line) => {
                if !typescript && line.starts_with("import type ") {
                    None
                } else {
                    Some(line.clone())
                }
            }
            Declaration::Statement(text) => Some(text.clone()),
            Declaration::PropsType { name, members } => {
                if !typescript {
                    return None;
                }
                let body = members
                    .iter()
                    .map(|m| {
                        let optional = if m.optional { "?" } else { "" };
                        format!("  {}{}: {};", property_key(&m.name), optional, m.ty)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Some(format!("interface {name} {{\n{body}\n}}"))
            }
            Declaration::Props {
                idiom,
                bindings,
                rest,
                type_name,
            } => Some(render_props(*idiom, bindings, rest.as_deref(), type_name.as_deref(), typescript)),
            Declaration::Emits(events) => {
                if typescript {
                    let body = events
                        .iter()
                        .map(|(event, payload)| format!("  \"{event}\": [value: {payload}];"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    Some(format!("const emit = defineEmits<{{\n{body}\n}}>();"))
                } else {
                    let names = events
                        .iter()
                        .map(|(event, _)| format!("\"{event}\""))
                        .collect::<Vec<_>>()
                        .join(", ");
                    Some(format!("const emit = defineEmits([{names}]);"))
                }
            }
            Declaration::Derived {
                idiom,
                name,
                expression,
            } => Some(match idiom {
                Idiom::SvelteLegacy => format!("$: {name} = {expression};"),
                Idiom::SvelteRunes => format!("const {name} = $derived({expression});"),
                Idiom::Vue => format!("const {name} = computed(() => {expression});"),
            }),
            Declaration::Ref { name, element_type } => Some(if typescript {
                format!("const {name} = shallowRef<{element_type} | null>(null);")
            } else {
                format!("const {name} = shallowRef(null);")
            }),
            Declaration::State {
                idiom,
                name,
                initial,
                setter,
            } => {
                let mut out = match idiom {
                    Idiom::SvelteLegacy => format!("let {name} = {initial};"),
                    Idiom::SvelteRunes => format!("let {name} = $state({initial});"),
                    Idiom::Vue => format!("const {name} = ref({initial});"),
                };
                if let Some(setter) = setter {
                    let (target, ty) = match idiom {
                        Idiom::Vue => (format!("{name}.value"), format!("typeof {name}.value")),
                        _ => (name.clone(), format!("typeof {name}")),
                    };
                    let param = if typescript {
                        format!("value: {ty}")
                    } else {
                        "value".to_string()
                    };
                    out.push_str(&format!(
                        "\n\nfunction {setter}({param}) {{\n  {target} = value;\n}}"
                    ));
                }
                Some(out)
            }
            Declaration::Function { name, params, body } => Some(format!(
                "function {name}({params}) {{\n{}\n}}",
                indent(body, 1)
            )),
            Declaration::Effect {
                idiom,
                body,
                dependencies,
            } => {
                let body = indent(body, 1);
                Some(match (idiom, dependencies) {
                    (Idiom::SvelteLegacy, Some(deps)) if deps.is_empty() => {
                        format!("onMount(() => {{\n{body}\n}});")
                    }
                    (Idiom::SvelteLegacy, _) => format!("afterUpdate(() => {{\n{body}\n}});"),
                    (Idiom::SvelteRunes, _) => format!("$effect(() => {{\n{body}\n}});"),
                    (Idiom::Vue, Some(deps)) if deps.is_empty() => {
                        format!("onMounted(() => {{\n{body}\n}});")
                    }
                    (Idiom::Vue, Some(deps)) => format!(
                        "watch([{}], () => {{\n{body}\n}}, {{ immediate: true }});",
                        deps.join(", ")
                    ),
                    (Idiom::Vue, None) => format!("watchEffect(() => {{\n{body}\n}});"),
                })
            }
            Declaration::Expose(names) => Some(format!("defineExpose({{ {} }});", names.join(", "))),
        }
    }
}

fn render_props(
    idiom: Idiom,
    bindings: &[PropBinding],
    rest: Option<&str>,
    type_name: Option<&str>,
    typescript: bool,
) -> String {
    match idiom {
        Idiom::SvelteLegacy => bindings
            .iter()
            .map(|b| {
                let ty = match (&b.ty, typescript) {
                    (Some(ty), true) if b.optional && b.default.is_none() => {
                        if ty.contains("=>") {
                            format!(": ({ty}) | undefined")
                        } else {
                            format!(": {ty} | undefined")
                        }
                    }
                    (Some(ty), true) => format!(": {ty}"),
                    _ => String::new(),
                };
                let default = match &b.default {
                    Some(d) => format!(" = {d}"),
                    None if b.optional => " = undefined".to_string(),
                    None => String::new(),
                };
                if b.name == b.local {
                    format!("export let {}{ty}{default};", b.local)
                } else {
                    format!(
                        "let {}{ty}{default};\nexport {{ {} as {} }};",
                        b.local, b.local, b.name
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Idiom::SvelteRunes => {
            let mut entries: Vec<String> = bindings
                .iter()
                .map(|b| {
                    let key = if b.name == b.local {
                        b.local.clone()
                    } else {
                        format!("{}: {}", property_key(&b.name), b.local)
                    };
                    match (&b.default, b.bindable) {
                        (Some(d), true) => format!("{key} = $bindable({d})"),
                        (None, true) => format!("{key} = $bindable()"),
                        (Some(d), false) => format!("{key} = {d}"),
                        (None, false) => key,
                    }
                })
                .collect();
            if let Some(rest) = rest {
                entries.push(format!("...{rest}"));
            }
            let annotation = match (type_name, typescript) {
                (Some(name), true) => format!(": {name}"),
                _ => String::new(),
            };
            if entries.is_empty() {
                return format!("let {{}}{annotation} = $props();");
            }
            format!(
                "let {{\n{}\n}}{annotation} = $props();",
                entries
                    .iter()
                    .map(|e| format!("  {e},"))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        }
        Idiom::Vue => {
            let defaults: Vec<&PropBinding> =
                bindings.iter().filter(|b| b.default.is_some()).collect();
            if typescript {
                let name = type_name.unwrap_or("Props");
                if defaults.is_empty() {
                    return format!("const props = defineProps<{name}>();");
                }
                let entries = defaults
                    .iter()
                    .filter_map(|b| {
                        b.default
                            .as_ref()
                            .map(|d| format!("  {}: {},", property_key(&b.name), d))
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("const props = withDefaults(defineProps<{name}>(), {{\n{entries}\n}});")
            } else {
                let entries = bindings
                    .iter()
                    .map(|b| match &b.default {
                        Some(d) => format!("  {}: {{ default: {} }},", property_key(&b.name), d),
                        None => format!("  {}: null,", property_key(&b.name)),
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("const props = defineProps({{\n{entries}\n}});")
            }
        }
    }
}

/// Serialize a declaration list. Consecutive imports are kept together,
/// other declarations are separated by a blank line.
pub fn render(decls: &[Declaration], typescript: bool) -> String {
    let mut out = String::new();
    let mut previous_import = false;
    for decl in decls {
        let Some(text) = decl.render(typescript) else {
            continue;
        };
        if !out.is_empty() {
            out.push_str(if previous_import && decl.is_import() {
                "\n"
            } else {
                "\n\n"
            });
        }
        out.push_str(&text);
        previous_import = decl.is_import();
    }
    out
}

/// Quote object keys that are not plain identifiers.
pub fn property_key(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

/// Indent every non-empty line by `level` two-space steps.
pub fn indent(text: &str, level: usize) -> String {
    let pad = "  ".repeat(level);
    text.lines()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                format!("{pad}{l}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bindings() -> Vec<PropBinding> {
        vec![
            PropBinding::new("class").local("className").ty("string"),
            PropBinding::new("variant")
                .ty("\"default\" | \"destructive\"")
                .default_value(Some("\"default\"".to_string())),
            PropBinding::new("checked")
                .ty("boolean")
                .default_value(Some("false".to_string()))
                .bindable(),
        ]
    }

    #[test]
    fn renders_legacy_svelte_props() {
        let decl = Declaration::Props {
            idiom: Idiom::SvelteLegacy,
            bindings: bindings(),
            rest: None,
            type_name: None,
        };
        assert_eq!(
            decl.render(true).unwrap(),
            "let className: string | undefined = undefined;\n\
             export { className as class };\n\
             export let variant: \"default\" | \"destructive\" = \"default\";\n\
             export let checked: boolean = false;"
        );
    }

    #[test]
    fn renders_runes_props() {
        let decl = Declaration::Props {
            idiom: Idiom::SvelteRunes,
            bindings: bindings(),
            rest: Some("restProps".to_string()),
            type_name: Some("Props".to_string()),
        };
        assert_eq!(
            decl.render(true).unwrap(),
            "let {\n  class: className,\n  variant = \"default\",\n  checked = $bindable(false),\n  ...restProps,\n}: Props = $props();"
        );
    }

    #[test]
    fn renders_vue_props_with_defaults() {
        let decl = Declaration::Props {
            idiom: Idiom::Vue,
            bindings: bindings(),
            rest: None,
            type_name: Some("Props".to_string()),
        };
        assert_eq!(
            decl.render(true).unwrap(),
            "const props = withDefaults(defineProps<Props>(), {\n  variant: \"default\",\n  checked: false,\n});"
        );
        assert_eq!(
            decl.render(false).unwrap(),
            "const props = defineProps({\n  class: null,\n  variant: { default: \"default\" },\n  checked: { default: false },\n});"
        );
    }

    #[test]
    fn types_are_dropped_without_typescript() {
        let decl = Declaration::PropsType {
            name: "Props".to_string(),
            members: vec![TypeMember {
                name: "class".to_string(),
                ty: "string".to_string(),
                optional: true,
            }],
        };
        assert_eq!(decl.render(true).unwrap(), "interface Props {\n  class?: string;\n}");
        assert_eq!(decl.render(false), None);
    }

    #[test]
    fn groups_imports() {
        let decls = vec![
            Declaration::Import("import a from \"a\";".to_string()),
            Declaration::Import("import b from \"b\";".to_string()),
            Declaration::Derived {
                idiom: Idiom::SvelteRunes,
                name: "x".to_string(),
                expression: "1".to_string(),
            },
        ];
        assert_eq!(
            render(&decls, true),
            "import a from \"a\";\nimport b from \"b\";\n\nconst x = $derived(1);"
        );
    }

    #[test]
    fn renders_effects_per_idiom() {
        let effect = |idiom, dependencies| Declaration::Effect {
            idiom,
            body: "run();".to_string(),
            dependencies,
        };
        assert_eq!(
            effect(Idiom::SvelteLegacy, Some(vec![])).render(true).unwrap(),
            "onMount(() => {\n  run();\n});"
        );
        assert_eq!(
            effect(Idiom::SvelteRunes, None).render(true).unwrap(),
            "$effect(() => {\n  run();\n});"
        );
        assert_eq!(
            effect(Idiom::Vue, Some(vec!["count".to_string()]))
                .render(true)
                .unwrap(),
            "watch([count], () => {\n  run();\n}, { immediate: true });"
        );
    }
}
