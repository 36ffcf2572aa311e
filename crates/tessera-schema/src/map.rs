use std::collections::HashMap;

/// Generic semantic names and their candidate provider field names,
/// highest priority first
pub const INPUT_CANDIDATES: &[(&str, &[&str])] = &[
    ("prompt", &["prompt", "text", "caption"]),
    ("negative_prompt", &["negative_prompt"]),
    (
        "image",
        &["image", "image_url", "input_image", "img", "start_image", "first_frame_image"],
    ),
    ("aspect_ratio", &["aspect_ratio", "ratio"]),
    ("duration", &["duration", "duration_seconds", "video_length", "num_frames"]),
    ("fps", &["fps", "frames_per_second", "framerate"]),
    ("audio", &["audio", "audio_url", "input_audio"]),
    ("seed", &["seed"]),
    ("steps", &["steps", "num_inference_steps", "num_steps"]),
    ("guidance", &["guidance", "guidance_scale", "cfg_scale", "cfg"]),
    ("scheduler", &["scheduler", "sampler", "sampler_name"]),
    ("strength", &["strength", "prompt_strength", "denoising_strength"]),
];

/// Map generic semantic names onto a provider's declared field names
///
/// For each generic name, an exact match against its candidates (in
/// priority order) wins; failing that, a case-insensitive substring match
/// in either direction between any candidate and any declared property
/// resolves it. First match wins; unresolved names are simply absent.
pub fn map_input_names(property_names: &[String]) -> HashMap<&'static str, String> {
    let mut mapping = HashMap::new();

    for (generic, candidates) in INPUT_CANDIDATES {
        if let Some(exact) = candidates
            .iter()
            .find_map(|candidate| property_names.iter().find(|property| property == candidate))
        {
            mapping.insert(*generic, exact.clone());
            continue;
        }

        'fallback: for candidate in *candidates {
            let candidate_lower = candidate.to_ascii_lowercase();
            for property in property_names {
                let property_lower = property.to_ascii_lowercase();
                if property_lower.contains(&candidate_lower) || candidate_lower.contains(&property_lower) {
                    mapping.insert(*generic, property.clone());
                    break 'fallback;
                }
            }
        }
    }

    mapping
}
