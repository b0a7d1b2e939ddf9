//! `forwardRef` configuration extraction.

use oxc_ast::ast::CallExpression;

use crate::metadata::{RefForwardConfig, Warning};
use crate::parser::syntax::{type_arguments, Callback};
use crate::tables::{normalize_element_type, GENERIC_ELEMENT_TYPE};

/// Read the element type from the first type argument and the ref name from
/// the callback's second parameter.
pub(crate) fn extract_ref_config(
    source: &str,
    component: &str,
    call: &CallExpression,
    callback: Callback,
    warnings: &mut Vec<Warning>,
) -> Option<RefForwardConfig> {
    let Some(param_name) = callback.param_name(1) else {
        warnings.push(Warning::new(
            "ref-config",
            format!("{component}: forwardRef callback has no ref parameter"),
        ));
        return None;
    };

    let element_type = match type_arguments(source, call).first() {
        Some(first) => normalize_element_type(first),
        None => {
            warnings.push(Warning::new(
                "ref-config",
                format!("{component}: forwardRef has no type arguments, using {GENERIC_ELEMENT_TYPE}"),
            ));
            GENERIC_ELEMENT_TYPE.to_string()
        }
    };

    Some(RefForwardConfig {
        element_type,
        param_name,
    })
}
