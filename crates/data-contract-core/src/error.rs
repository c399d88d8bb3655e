//! Error types for contract construction and validation.

use std::fmt;

use thiserror::Error;

/// Errors raised while building or querying a contract.
///
/// Validation failures are not contract errors: [`crate::Schema::safe_parse`]
/// returns them as [`ValidationIssues`]. They only show up here when a caller
/// goes through a name-based helper such as [`crate::DataValidator::parse_input`].
#[derive(Debug, Error)]
pub enum ContractError {
    /// Two definitions in one list share a method name.
    #[error("duplicate method '{name}': method names must be unique within a contract")]
    DuplicateMethod { name: String },

    /// No method with this name exists in the contract.
    #[error("unknown method '{name}'")]
    UnknownMethod { name: String },

    /// Schema conflict: same definition name, different content.
    #[error("schema conflict for '{name}': defined differently by multiple methods")]
    SchemaConflict { name: String },

    /// Candidate data did not conform to a method schema.
    #[error(transparent)]
    Validation(#[from] ValidationIssues),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be parsed.
    #[cfg(feature = "config")]
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// A single validation issue with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// JSON Pointer to the violating value in the candidate.
    pub instance_path: String,
    /// JSON Pointer within the schema that rejected it.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Create an issue anchored at the root of the candidate.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            instance_path: String::new(),
            schema_path: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// The failure branch of a parse: every issue found for one schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed against '{schema}':\n{}", render(.issues))]
pub struct ValidationIssues {
    schema: String,
    issues: Vec<Issue>,
}

fn render(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationIssues {
    pub fn new(schema: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            schema: schema.into(),
            issues,
        }
    }

    /// Name of the schema the candidate was checked against.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_inner(self) -> Vec<Issue> {
        self.issues
    }
}
