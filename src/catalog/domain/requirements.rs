//! Runtime and environment requirements declared by a catalogue entry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Literal marker used in catalogue documents for variables without a default.
const REQUIRED_MARKER: &str = "required";

/// How an environment variable must be supplied at launch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum EnvironmentRequirement {
    /// The user must supply a value.
    Required,
    /// The catalogue supplies a default used verbatim.
    Default(String),
}

impl EnvironmentRequirement {
    /// Interprets a raw catalogue value.
    ///
    /// The literal string `"required"` marks a mandatory variable. Any other
    /// string is a default; non-string JSON values are kept in their JSON text
    /// form.
    #[must_use]
    pub fn from_raw(value: &Value) -> Self {
        match value {
            Value::String(text) if text == REQUIRED_MARKER => Self::Required,
            Value::String(text) => Self::Default(text.clone()),
            other => Self::Default(other.to_string()),
        }
    }

    /// Returns whether the variable must be collected from the user.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }

    fn to_raw(&self) -> Value {
        match self {
            Self::Required => Value::String(REQUIRED_MARKER.to_owned()),
            Self::Default(text) => Value::String(text.clone()),
        }
    }
}

/// A named environment variable declared by a catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentVariable {
    name: String,
    requirement: EnvironmentRequirement,
}

impl EnvironmentVariable {
    /// Creates an environment variable declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, requirement: EnvironmentRequirement) -> Self {
        Self {
            name: name.into(),
            requirement,
        }
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns how the variable is supplied.
    #[must_use]
    pub const fn requirement(&self) -> &EnvironmentRequirement {
        &self.requirement
    }
}

/// Requirements block of a catalogue entry.
///
/// Runtime constraints are advisory. Environment declarations keep the order
/// in which the catalogue document lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    python: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    system: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_environment",
        serialize_with = "serialize_environment"
    )]
    environment: Vec<EnvironmentVariable>,
}

impl Requirements {
    /// Creates an empty requirements block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the advisory node version constraint.
    #[must_use]
    pub fn with_node(mut self, constraint: impl Into<String>) -> Self {
        self.node = Some(constraint.into());
        self
    }

    /// Sets the advisory python version constraint.
    #[must_use]
    pub fn with_python(mut self, constraint: impl Into<String>) -> Self {
        self.python = Some(constraint.into());
        self
    }

    /// Appends an environment variable declaration.
    #[must_use]
    pub fn with_environment(
        mut self,
        name: impl Into<String>,
        requirement: EnvironmentRequirement,
    ) -> Self {
        self.environment
            .push(EnvironmentVariable::new(name, requirement));
        self
    }

    /// Returns the advisory node version constraint.
    #[must_use]
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Returns the advisory python version constraint.
    #[must_use]
    pub fn python(&self) -> Option<&str> {
        self.python.as_deref()
    }

    /// Returns advisory system package names.
    #[must_use]
    pub fn system(&self) -> &[String] {
        &self.system
    }

    /// Returns advisory dependency names.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns environment declarations in document order.
    #[must_use]
    pub fn environment(&self) -> &[EnvironmentVariable] {
        &self.environment
    }

    /// Returns the declarations whose value must be collected from the user.
    pub fn required_variables(&self) -> impl Iterator<Item = &EnvironmentVariable> {
        self.environment
            .iter()
            .filter(|variable| variable.requirement().is_required())
    }
}

fn deserialize_environment<'de, D>(deserializer: D) -> Result<Vec<EnvironmentVariable>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .iter()
        .map(|(name, value)| {
            EnvironmentVariable::new(name.clone(), EnvironmentRequirement::from_raw(value))
        })
        .collect())
}

fn serialize_environment<S>(
    environment: &[EnvironmentVariable],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let raw: Map<String, Value> = environment
        .iter()
        .map(|variable| (variable.name.clone(), variable.requirement.to_raw()))
        .collect();
    raw.serialize(serializer)
}
