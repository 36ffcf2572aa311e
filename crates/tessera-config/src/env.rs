use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback can be given via `{{ env.VAR | default("value") }}`;
/// it is used when the variable is unset instead of returning an error.
/// Comment lines are passed through untouched so commented-out secrets
/// don't have to resolve.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn placeholder() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        // Group 1: dotted key (e.g. `env.API_KEY`), group 2: default value
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut cursor = 0;
        for captures in placeholder().captures_iter(line) {
            let whole = captures.get(0).expect("group 0 always present");
            let key = captures.get(1).expect("key group always present").as_str();
            let fallback = captures.get(2).map(|m| m.as_str());

            output.push_str(&line[cursor..whole.start()]);

            let var_name = key
                .strip_prefix("env.")
                .filter(|rest| !rest.contains('.'))
                .ok_or_else(|| format!("only variables scoped with 'env.' are supported: `{key}`"))?;

            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => match fallback {
                    Some(default) => output.push_str(default),
                    None => return Err(format!("environment variable not found: `{var_name}`")),
                },
            }

            cursor = whole.end();
        }

        output.push_str(&line[cursor..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
