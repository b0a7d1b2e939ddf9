//! Import analysis.

use std::sync::LazyLock;

use oxc_ast::ast::{ImportDeclaration, ImportDeclarationSpecifier, Statement};
use regex::Regex;

use crate::metadata::{ImportCategory, ImportInfo};
use crate::tables::icon_package;

/// Local names of class-merge helpers.
pub const CLASS_MERGE_FUNCTIONS: &[&str] = &["cn", "clsx", "twMerge"];

const FRAMEWORK_SOURCES: &[&str] = &["react", "react-dom"];

const PRIMITIVE_PREFIXES: &[&str] = &["@radix-ui/", "@headlessui/", "@ark-ui/", "vaul", "cmdk"];

const UTILITY_SOURCES: &[&str] = &["class-variance-authority", "clsx", "tailwind-merge", "tailwind-variants"];

const STYLE_EXTENSIONS: &[&str] = &[".css", ".scss", ".sass", ".less", ".pcss"];

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w.$])(cn|clsx|twMerge)\s*\(").expect("Invalid class merge call regex")
});

/// Collect and categorize every top-level import.
pub(crate) fn collect_imports(statements: &[Statement]) -> Vec<ImportInfo> {
    statements
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ImportDeclaration(decl) => Some(import_info(decl)),
            _ => None,
        })
        .collect()
}

fn import_info(decl: &ImportDeclaration) -> ImportInfo {
    let mut info = ImportInfo {
        source: decl.source.value.to_string(),
        default: None,
        namespace: None,
        named: Vec::new(),
        type_only: decl.import_kind.is_type(),
        category: ImportCategory::Other,
    };

    for specifier in decl.specifiers.iter().flatten() {
        match specifier {
            ImportDeclarationSpecifier::ImportSpecifier(s) => {
                info.named
                    .push((s.imported.name().to_string(), s.local.name.to_string()));
            }
            ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                info.default = Some(s.local.name.to_string());
            }
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                info.namespace = Some(s.local.name.to_string());
            }
        }
    }

    info.category = categorize(&info);
    info
}

/// Classify an import by its source path, falling back to the imported
/// symbols.
pub fn categorize(info: &ImportInfo) -> ImportCategory {
    let source = info.source.as_str();

    if FRAMEWORK_SOURCES.contains(&source) || source.starts_with("react/") {
        return ImportCategory::FrameworkNative;
    }
    if STYLE_EXTENSIONS.iter().any(|ext| source.ends_with(ext)) {
        return ImportCategory::Style;
    }
    if PRIMITIVE_PREFIXES.iter().any(|p| source.starts_with(p)) {
        return ImportCategory::ComponentPrimitive;
    }
    if icon_package(source).is_some() || source.contains("icons") {
        return ImportCategory::Icon;
    }
    if UTILITY_SOURCES.contains(&source)
        || source.ends_with("/utils")
        || source.ends_with("/lib/utils")
    {
        return ImportCategory::Utility;
    }

    // `import { Slot } from "./slot"` style local re-wrappers.
    let names: Vec<&str> = info.named.iter().map(|(imported, _)| imported.as_str()).collect();
    if !names.is_empty() && names.iter().all(|n| CLASS_MERGE_FUNCTIONS.contains(n)) {
        return ImportCategory::Utility;
    }
    if names.contains(&"Slot") {
        return ImportCategory::ComponentPrimitive;
    }

    ImportCategory::Other
}

/// True when a class-merge helper is both imported and called somewhere in
/// `source`.
pub(crate) fn uses_class_merge(source: &str, imports: &[ImportInfo]) -> bool {
    let imported: Vec<&str> = imports
        .iter()
        .filter(|i| !i.type_only)
        .flat_map(ImportInfo::locals)
        .filter(|local| CLASS_MERGE_FUNCTIONS.contains(local))
        .collect();
    if imported.is_empty() {
        return false;
    }
    CALL_RE
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .any(|m| imported.contains(&m.as_str()))
}
