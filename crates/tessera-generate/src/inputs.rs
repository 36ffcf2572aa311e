use serde_json::{Map, Value};
use tessera_schema::map::map_input_names;

use crate::types::GenerationRequest;

/// Build the provider-side input payload for an HTTP adapter
///
/// Tunable parameters already carry provider field names and go in first.
/// An explicit `dynamicInputs` map then takes precedence over heuristic
/// mapping: its entries are merged directly (dropping null and empty-string
/// values). Without one, the prompt and first image are placed at the
/// field names the input mapper resolves against the provider's declared
/// properties, falling back to the adapter's default names.
pub fn build_payload(
    request: &GenerationRequest,
    property_names: &[String],
    default_prompt_field: &str,
    default_image_field: &str,
) -> Map<String, Value> {
    let mut payload = Map::new();

    if let Some(parameters) = &request.parameters {
        for (name, value) in parameters {
            if value.is_null() {
                continue;
            }
            payload.insert(name.clone(), value.clone());
        }
    }

    if let Some(dynamic) = request.dynamic_inputs.as_ref().filter(|map| !map.is_empty()) {
        for (name, value) in dynamic {
            if value.is_null() || value.as_str().is_some_and(str::is_empty) {
                continue;
            }
            payload.insert(name.clone(), value.clone());
        }
        return payload;
    }

    let mapping = map_input_names(property_names);

    if !request.prompt.is_empty() {
        let field = mapping.get("prompt").map_or(default_prompt_field, String::as_str);
        payload.insert(field.to_owned(), Value::String(request.prompt.clone()));
    }

    if let Some(image) = request.images.first() {
        let field = mapping.get("image").map_or(default_image_field, String::as_str);
        payload.insert(field.to_owned(), Value::String(image.clone()));
    }

    payload
}
