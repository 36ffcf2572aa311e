use serde_json::{Map, Value};

/// Prefix every resolvable reference must carry
const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Resolve a schema-internal reference against a components table
///
/// Returns the referenced definition, or `None` when the prefix does not
/// match or the name is absent. Absence is not an error; the caller just
/// proceeds without the extra metadata.
pub fn resolve_ref<'a>(reference: &str, components: &'a Map<String, Value>) -> Option<&'a Value> {
    let name = reference.strip_prefix(SCHEMA_REF_PREFIX)?;
    components.get(name)
}
