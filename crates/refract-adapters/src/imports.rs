//! Import rewriting for generated components.

use refract_parser::parser::CLASS_MERGE_FUNCTIONS;
use refract_parser::tables::icon_package;
use refract_parser::{ImportCategory, ImportInfo};

use crate::traits::{GenerateOptions, Target};

const VARIANT_PACKAGES: &[&str] = &["class-variance-authority", "tailwind-variants"];
const VARIANT_BUILDERS: &[&str] = &["cva", "tv"];

/// What the generated script references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportNeeds {
    pub class_merge: bool,
    pub variants: bool,
}

/// Rewrite source imports for `target`. Framework and primitive imports are
/// dropped, the utility import moves to the configured path and icon
/// packages are swapped for the target's.
pub fn rewrite_imports(
    imports: &[ImportInfo],
    target: Target,
    options: &GenerateOptions,
    needs: ImportNeeds,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut has_merge = false;
    let mut has_builder = false;

    for import in imports {
        if import.type_only && !options.typescript {
            continue;
        }
        match import.category {
            ImportCategory::FrameworkNative | ImportCategory::ComponentPrimitive => {
                tracing::debug!("Dropping import from {}", import.source);
            }
            ImportCategory::Utility if VARIANT_PACKAGES.contains(&import.source.as_str()) => {
                if !needs.variants {
                    continue;
                }
                let named: Vec<(String, String)> = import
                    .named
                    .iter()
                    .filter(|(imported, _)| VARIANT_BUILDERS.contains(&imported.as_str()))
                    .cloned()
                    .collect();
                if !named.is_empty() {
                    has_builder = true;
                    lines.push(render_import(&import.source, None, None, &named, false));
                }
            }
            ImportCategory::Utility => {
                let (merge, other): (Vec<_>, Vec<_>) = import
                    .named
                    .iter()
                    .cloned()
                    .partition(|(imported, _)| CLASS_MERGE_FUNCTIONS.contains(&imported.as_str()));
                let mut named = other;
                if needs.class_merge && !merge.is_empty() {
                    has_merge = true;
                    named.extend(merge);
                }
                if named.is_empty() && import.default.is_none() {
                    continue;
                }
                let source = if import.source.ends_with("utils") {
                    options.class_merge_import_path.as_str()
                } else {
                    import.source.as_str()
                };
                lines.push(render_import(
                    source,
                    import.default.as_deref(),
                    None,
                    &named,
                    import.type_only,
                ));
            }
            ImportCategory::Icon => {
                let source = match (icon_package(&import.source), target) {
                    (Some((svelte, _)), Target::Svelte) => svelte,
                    (Some((_, vue)), Target::Vue) => vue,
                    (None, _) => import.source.as_str(),
                };
                lines.push(render_import(
                    source,
                    import.default.as_deref(),
                    import.namespace.as_deref(),
                    &import.named,
                    import.type_only,
                ));
            }
            ImportCategory::Style | ImportCategory::Other => {
                lines.push(render_import(
                    &import.source,
                    import.default.as_deref(),
                    import.namespace.as_deref(),
                    &import.named,
                    import.type_only,
                ));
            }
        }
    }

    if needs.variants && !has_builder {
        lines.push(render_import(
            "class-variance-authority",
            None,
            None,
            &[("cva".to_string(), "cva".to_string())],
            false,
        ));
    }
    if needs.class_merge && !has_merge {
        lines.push(render_import(
            &options.class_merge_import_path,
            None,
            None,
            &[("cn".to_string(), "cn".to_string())],
            false,
        ));
    }

    lines
}

/// `import Default, { a, b as c } from "source";`
pub fn render_import(
    source: &str,
    default: Option<&str>,
    namespace: Option<&str>,
    named: &[(String, String)],
    type_only: bool,
) -> String {
    let mut clauses = Vec::new();
    if let Some(default) = default {
        clauses.push(default.to_string());
    }
    if let Some(namespace) = namespace {
        clauses.push(format!("* as {namespace}"));
    }
    if !named.is_empty() {
        let names = named
            .iter()
            .map(|(imported, local)| {
                if imported == local {
                    imported.clone()
                } else {
                    format!("{imported} as {local}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        clauses.push(format!("{{ {names} }}"));
    }

    if clauses.is_empty() {
        return format!("import \"{source}\";");
    }
    let keyword = if type_only { "import type" } else { "import" };
    format!("{keyword} {} from \"{source}\";", clauses.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn import(source: &str, named: &[&str], category: ImportCategory) -> ImportInfo {
        ImportInfo {
            source: source.to_string(),
            default: None,
            namespace: None,
            named: named.iter().map(|n| (n.to_string(), n.to_string())).collect(),
            type_only: false,
            category,
        }
    }

    fn button_imports() -> Vec<ImportInfo> {
        vec![
            ImportInfo {
                namespace: Some("React".to_string()),
                ..import("react", &[], ImportCategory::FrameworkNative)
            },
            import("@radix-ui/react-slot", &["Slot"], ImportCategory::ComponentPrimitive),
            import(
                "class-variance-authority",
                &["cva", "VariantProps"],
                ImportCategory::Utility,
            ),
            import("@/lib/utils", &["cn"], ImportCategory::Utility),
            import("lucide-react", &["Check"], ImportCategory::Icon),
        ]
    }

    #[test]
    fn rewrites_for_svelte() {
        let lines = rewrite_imports(
            &button_imports(),
            Target::Svelte,
            &GenerateOptions::default(),
            ImportNeeds {
                class_merge: true,
                variants: true,
            },
        );
        assert_eq!(
            lines,
            vec![
                "import { cva } from \"class-variance-authority\";",
                "import { cn } from \"$lib/utils\";",
                "import { Check } from \"@lucide/svelte\";",
            ]
        );
    }

    #[test]
    fn vue_icons_and_unused_helpers() {
        let lines = rewrite_imports(
            &button_imports(),
            Target::Vue,
            &GenerateOptions::default(),
            ImportNeeds::default(),
        );
        assert_eq!(lines, vec!["import { Check } from \"lucide-vue-next\";"]);
    }

    #[test]
    fn adds_missing_helpers() {
        let lines = rewrite_imports(
            &[],
            Target::Vue,
            &GenerateOptions {
                class_merge_import_path: "@/lib/utils".to_string(),
                ..GenerateOptions::default()
            },
            ImportNeeds {
                class_merge: true,
                variants: true,
            },
        );
        assert_eq!(
            lines,
            vec![
                "import { cva } from \"class-variance-authority\";",
                "import { cn } from \"@/lib/utils\";",
            ]
        );
    }

    #[test]
    fn renders_import_forms() {
        assert_eq!(render_import("./a.css", None, None, &[], false), "import \"./a.css\";");
        assert_eq!(
            render_import("x", Some("X"), None, &[("a".into(), "b".into())], true),
            "import type X, { a as b } from \"x\";"
        );
    }
}
