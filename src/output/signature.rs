// Method signature rendering

use crate::metadata::{in_namespace, DefaultValue, MethodMetadata, ParameterMetadata};
use crate::parser::docblock::return_type;

/// Type shown for a parameter without a `@param` tag
const UNKNOWN_TYPE: &str = "unknown";

/// Render one parameter as `*type* $name`, plus ` = literal` for optional
/// parameters of library classes
pub fn render_parameter(param: &ParameterMetadata, owner_in_namespace: bool) -> String {
    let type_name = param.type_annotation.as_deref().unwrap_or(UNKNOWN_TYPE);
    let mut out = format!("*{}* ${}", type_name, param.name);

    if param.is_optional && owner_in_namespace {
        if let Some(literal) = default_literal(param) {
            out.push_str(" = ");
            out.push_str(&literal);
        }
    }

    out
}

/// Literal text for a parameter default; integers prefer the constant they
/// were declared with
fn default_literal(param: &ParameterMetadata) -> Option<String> {
    match (&param.default, &param.default_constant) {
        (Some(DefaultValue::Int(_)), Some(constant)) => Some(constant.clone()),
        (Some(value), _) => Some(value.to_literal()),
        (None, Some(constant)) => Some(constant.clone()),
        (None, None) => None,
    }
}

/// Render `modifiers returnType **name** (params)`
pub fn render_method(method: &MethodMetadata, namespace: &str) -> String {
    let owner_in_namespace = in_namespace(&method.declaring_class, namespace);

    let mut parts: Vec<String> = method.modifiers.iter().map(|m| m.to_string()).collect();
    if let Some(returns) = method.doc_comment.as_deref().and_then(return_type) {
        parts.push(returns);
    }
    parts.push(format!("**{}**", method.name));

    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| render_parameter(p, owner_in_namespace))
        .collect();

    format!("{} ({})", parts.join(" "), params.join(", "))
}
