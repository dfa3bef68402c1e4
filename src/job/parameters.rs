use std::fmt;

use jsonschema::JSONSchema;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// Validation hook applied when a parameter mapping is accepted
///
/// The builder never validates parameters itself; callers pick a policy.
/// [`PassThrough`] accepts anything, [`SchemaValidator`] checks the mapping
/// against a JSON schema. Stricter policies slot in here without touching
/// the builder.
pub trait ParameterValidator {
    fn validate(&self, mapping: Mapping) -> Result<Mapping, ParameterError>;
}

/// Accepts any mapping unchanged
pub struct PassThrough;

impl ParameterValidator for PassThrough {
    fn validate(&self, mapping: Mapping) -> Result<Mapping, ParameterError> {
        Ok(mapping)
    }
}

/// Validates the mapping against a compiled JSON schema
pub struct SchemaValidator {
    compiled: JSONSchema,
}

impl SchemaValidator {
    pub fn new(schema: &serde_json::Value) -> Result<Self, ParameterError> {
        let compiled = JSONSchema::compile(schema)
            .map_err(|err| ParameterError::BadSchema(err.to_string()))?;
        Ok(SchemaValidator { compiled })
    }

    /// Build a validator from the schema bundled with the crate
    pub fn bundled() -> Self {
        /// included parameter schema
        static SCHEMA: &str = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/schema/parameters.json"
        ));
        let schema: serde_json::Value = serde_json::from_str(SCHEMA).expect("Valid JSON");
        SchemaValidator::new(&schema).expect("Valid schema")
    }
}

impl ParameterValidator for SchemaValidator {
    fn validate(&self, mapping: Mapping) -> Result<Mapping, ParameterError> {
        info!("Validating parameter mapping against JSON schema");
        let json = serde_json::to_value(&mapping)
            .map_err(|err| ParameterError::Invalid(err.to_string()))?;
        let valid = self.compiled.validate(&json).is_ok();
        if valid {
            Ok(mapping)
        } else {
            warn!("Parameter mapping fails schema validation");
            Err(ParameterError::Invalid(
                "mapping does not match parameter schema".to_string(),
            ))
        }
    }
}

/// A validated BigDFT input parameter mapping
///
/// Arbitrarily nested YAML mapping (`dft`, `output`, ... sections). Round-trips
/// losslessly through [`to_yaml`](Self::to_yaml) / [`from_yaml`](Self::from_yaml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationParameters(Mapping);

impl SimulationParameters {
    pub fn new(
        mapping: Mapping,
        validator: &dyn ParameterValidator,
    ) -> Result<Self, ParameterError> {
        Ok(SimulationParameters(validator.validate(mapping)?))
    }

    pub fn empty() -> Self {
        SimulationParameters(Mapping::new())
    }

    pub fn mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn to_yaml(&self) -> Result<String, ParameterError> {
        serde_yaml::to_string(&self.0).map_err(|err| ParameterError::Yaml(err.to_string()))
    }

    pub fn from_yaml(text: &str) -> Result<Self, ParameterError> {
        let mapping: Mapping =
            serde_yaml::from_str(text).map_err(|err| ParameterError::Yaml(err.to_string()))?;
        Ok(SimulationParameters(mapping))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParameterError {
    Invalid(String),
    BadSchema(String),
    Yaml(String),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParameterError::Invalid(msg) => write!(f, "invalid parameters: {msg}"),
            ParameterError::BadSchema(msg) => write!(f, "invalid parameter schema: {msg}"),
            ParameterError::Yaml(msg) => write!(f, "parameter serialisation failed: {msg}"),
        }
    }
}

impl std::error::Error for ParameterError {}
