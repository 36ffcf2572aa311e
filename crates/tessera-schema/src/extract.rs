use serde_json::{Map, Value};

use crate::classify::classify_property;
use crate::types::{InputType, ModelInput, SchemaExtraction};

/// Names that classify a property as an image socket
///
/// Matched by exact name, by the suffix after the last underscore, or by
/// case-insensitive substring containment of "image". The substring rule is
/// intentionally greedy: a parameter literally named `image_style` becomes
/// an image input, matching the heuristic the canvas relies on.
const IMAGE_INPUT_NAMES: &[&str] = &["image", "img", "mask", "image_url"];

/// Names that classify a property as a text socket (exact match only)
const TEXT_INPUT_NAMES: &[&str] = &["prompt", "negative_prompt"];

/// Parameters rendered above all others in the canvas inspector
const PRIORITY_PARAMETERS: &[&str] = &[
    "seed",
    "steps",
    "num_inference_steps",
    "guidance",
    "guidance_scale",
    "cfg_scale",
    "width",
    "height",
    "scheduler",
    "num_outputs",
    "aspect_ratio",
    "duration",
    "fps",
];

/// Walk a schema's properties and classify each into an input or parameter
///
/// Classification by name happens first (image patterns, then text names);
/// everything else goes through the parameter classifier, which may still
/// exclude it. Output ordering is deterministic: parameters sort
/// priority-group-first then alphabetically, inputs sort required-first,
/// then image-before-text, then alphabetically.
pub fn extract_schema(schema: &Value, components: Option<&Map<String, Value>>) -> SchemaExtraction {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return SchemaExtraction::default();
    };

    let required_names: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut extraction = SchemaExtraction::default();

    for (name, property) in properties {
        let required = required_names.contains(&name.as_str());
        let description = property
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_owned);

        if is_image_input(name) {
            extraction.inputs.push(ModelInput {
                name: name.clone(),
                input_type: InputType::Image,
                required,
                label: humanize(name),
                description,
            });
        } else if TEXT_INPUT_NAMES.contains(&name.as_str()) {
            extraction.inputs.push(ModelInput {
                name: name.clone(),
                input_type: InputType::Text,
                required,
                label: humanize(name),
                description,
            });
        } else if let Some(parameter) = classify_property(name, property, required, components) {
            extraction.parameters.push(parameter);
        }
    }

    extraction.parameters.sort_by(|a, b| {
        let a_priority = PRIORITY_PARAMETERS.contains(&a.name.as_str());
        let b_priority = PRIORITY_PARAMETERS.contains(&b.name.as_str());
        b_priority.cmp(&a_priority).then_with(|| a.name.cmp(&b.name))
    });

    extraction.inputs.sort_by(|a, b| {
        b.required
            .cmp(&a.required)
            .then_with(|| type_rank(a.input_type).cmp(&type_rank(b.input_type)))
            .then_with(|| a.name.cmp(&b.name))
    });

    extraction
}

/// Whether a property name matches the image-socket patterns
fn is_image_input(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if IMAGE_INPUT_NAMES.contains(&lower.as_str()) {
        return true;
    }
    if let Some(suffix) = lower.rsplit('_').next()
        && IMAGE_INPUT_NAMES.contains(&suffix)
    {
        return true;
    }
    lower.contains("image")
}

const fn type_rank(input_type: InputType) -> u8 {
    match input_type {
        InputType::Image => 0,
        InputType::Text => 1,
    }
}

/// Turn a snake_case field name into a display label
fn humanize(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
