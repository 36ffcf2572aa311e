use serde_json::{Map, Value};

use crate::resolve::resolve_ref;
use crate::types::{ModelParameter, ParameterType};

/// Internal or system fields that never surface as tunable parameters
pub const EXCLUDED_PROPERTIES: &[&str] = &[
    "webhook",
    "webhook_events_filter",
    "sync_mode",
    "enable_safety_checker",
    "disable_safety_checker",
    "safety_checker",
    "output_format",
    "output_quality",
    "request_id",
];

/// Convert one raw schema property into a parameter descriptor
///
/// Returns `None` for excluded properties. The declared type wins; when a
/// property instead composes sub-schemas via `allOf`, each `$ref` entry is
/// resolved and merged first-wins (type, enum, default, description, in
/// encounter order). A direct `enum` on the property overrides any enum
/// discovered through references. Numeric bounds are copied verbatim.
pub fn classify_property(
    name: &str,
    property: &Value,
    required: bool,
    components: Option<&Map<String, Value>>,
) -> Option<ModelParameter> {
    if EXCLUDED_PROPERTIES.contains(&name) {
        return None;
    }

    let mut param_type = property
        .get("type")
        .and_then(Value::as_str)
        .map(ParameterType::from_schema_type);
    let mut enum_values = None;
    let mut default = property.get("default").cloned();
    let mut description = property
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_owned);

    if let Some(entries) = property.get("allOf").and_then(Value::as_array) {
        for entry in entries {
            let Some(reference) = entry.get("$ref").and_then(Value::as_str) else {
                continue;
            };
            let Some(resolved) = components.and_then(|table| resolve_ref(reference, table)) else {
                continue;
            };

            if param_type.is_none() {
                param_type = resolved
                    .get("type")
                    .and_then(Value::as_str)
                    .map(ParameterType::from_schema_type);
            }
            if enum_values.is_none() {
                enum_values = resolved.get("enum").and_then(Value::as_array).cloned();
            }
            if default.is_none() {
                default = resolved.get("default").cloned();
            }
            if description.is_none() {
                description = resolved
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
            }
        }
    }

    // Direct enum beats anything found through reference resolution
    if let Some(direct) = property.get("enum").and_then(Value::as_array) {
        enum_values = Some(direct.clone());
    }

    Some(ModelParameter {
        name: name.to_owned(),
        param_type: param_type.unwrap_or(ParameterType::String),
        description,
        default,
        required,
        minimum: property.get("minimum").and_then(Value::as_f64),
        maximum: property.get("maximum").and_then(Value::as_f64),
        enum_values,
    })
}
