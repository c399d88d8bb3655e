//! Assembly options.
//!
//! ```toml
//! duplicates = "reject"
//! draft = "https://json-schema.org/draft/2020-12/schema"
//! ```

use serde::{Deserialize, Serialize};

use crate::describe::DEFAULT_DRAFT;

/// What the validator assembler does with a repeated method name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later definition replaces the earlier one.
    #[default]
    LastWins,
    /// Fail with `ContractError::DuplicateMethod`.
    Reject,
}

/// Options for [`crate::DataValidator::assemble_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssembleOptions {
    pub duplicates: DuplicatePolicy,
    /// `$schema` URI written by `describe()`.
    pub draft: String,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            draft: DEFAULT_DRAFT.to_string(),
        }
    }
}

impl AssembleOptions {
    /// Options that reject repeated method names.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            ..Self::default()
        }
    }

    /// Load options from TOML. Missing keys keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_toml_str(source: &str) -> crate::Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
