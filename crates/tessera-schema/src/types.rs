use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider whose schemas can be introspected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaProvider {
    /// Replicate (OpenAPI schema nested in the model's latest version)
    Replicate,
    /// fal (queue OpenAPI document per endpoint)
    Fal,
}

impl SchemaProvider {
    /// Parse the `provider` query parameter value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "replicate" => Some(Self::Replicate),
            "fal" => Some(Self::Fal),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchemaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replicate => f.write_str("replicate"),
            Self::Fal => f.write_str("fal"),
        }
    }
}

/// Base type of a tunable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ParameterType {
    /// Map a JSON-schema `type` string onto the closed set
    ///
    /// Anything unrecognized falls back to string
    pub fn from_schema_type(value: &str) -> Self {
        match value {
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            _ => Self::String,
        }
    }
}

/// A tunable, non-connectable generation setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameter {
    /// Provider-side field name
    pub name: String,
    /// Base type
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether the schema lists this field as required
    pub required: bool,
    /// Lower numeric bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper numeric bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

/// Kind of a graph-connectable slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Image,
    Text,
}

/// A schema field exposed to the canvas as a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInput {
    /// Provider-side field name
    pub name: String,
    /// Socket kind
    #[serde(rename = "type")]
    pub input_type: InputType,
    /// Whether the schema lists this field as required
    pub required: bool,
    /// Display label derived from the field name
    pub label: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The resolved result of one schema extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaExtraction {
    /// Tunable parameters in render order
    pub parameters: Vec<ModelParameter>,
    /// Connectable inputs in render order
    pub inputs: Vec<ModelInput>,
}

impl SchemaExtraction {
    /// Names of every extracted field, parameters and inputs alike
    ///
    /// Used for heuristic mapping of generic input names onto the
    /// provider's declared fields
    pub fn property_names(&self) -> Vec<String> {
        self.inputs
            .iter()
            .map(|input| input.name.clone())
            .chain(self.parameters.iter().map(|parameter| parameter.name.clone()))
            .collect()
    }
}
