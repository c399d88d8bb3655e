//! Validator assembly: every method name mapped to its raw schema triple.
//!
//! The assembled [`DataValidator`] does not validate anything up front.
//! Consumers pick a schema and parse candidates on demand:
//!
//! ```ignore
//! let validator = EntityMethods::validator();
//! let parsed = validator.get("findEntityByName").unwrap().input.safe_parse(&candidate);
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::Result;
use crate::config::{AssembleOptions, DuplicatePolicy};
use crate::describe::{DEFAULT_DRAFT, DescriptionBuilder};
use crate::error::ContractError;
use crate::method::{DataMethod, MethodDefinition, MethodSchemas};

/// Flat runtime object: method name to `{input, output, errors}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataValidator {
    methods: BTreeMap<Cow<'static, str>, MethodSchemas>,
    draft: String,
}

impl Default for DataValidator {
    fn default() -> Self {
        Self {
            methods: BTreeMap::new(),
            draft: DEFAULT_DRAFT.to_string(),
        }
    }
}

impl DataValidator {
    /// Merge definitions by name. A repeated name overwrites the earlier
    /// entry (last wins) and logs a warning.
    pub fn assemble(definitions: impl IntoIterator<Item = MethodDefinition>) -> Self {
        let mut methods = BTreeMap::new();
        for definition in definitions {
            let (name, schemas) = definition.into_entry();
            if let Some(previous) = methods.insert(name.clone(), schemas) {
                tracing::warn!(
                    method = %name,
                    previous_input = %previous.input.name(),
                    "duplicate method definition overwrites earlier entry"
                );
            }
        }
        tracing::debug!(methods = methods.len(), "assembled data validator");
        Self {
            methods,
            ..Self::default()
        }
    }

    /// Like [`assemble`](Self::assemble), but a repeated name is an error.
    pub fn try_assemble(definitions: impl IntoIterator<Item = MethodDefinition>) -> Result<Self> {
        Self::assemble_with(definitions, &AssembleOptions::strict())
    }

    pub fn assemble_with(
        definitions: impl IntoIterator<Item = MethodDefinition>,
        options: &AssembleOptions,
    ) -> Result<Self> {
        let definitions: Vec<MethodDefinition> = definitions.into_iter().collect();

        if options.duplicates == DuplicatePolicy::Reject {
            let mut seen = BTreeSet::new();
            for definition in &definitions {
                if !seen.insert(definition.name()) {
                    return Err(ContractError::DuplicateMethod {
                        name: definition.name().to_string(),
                    });
                }
            }
        }

        let mut validator = Self::assemble(definitions);
        validator.draft = options.draft.clone();
        Ok(validator)
    }

    /// `$schema` URI written by [`describe`](Self::describe).
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn get(&self, name: &str) -> Option<&MethodSchemas> {
        self.methods.get(name)
    }

    /// Typed lookup by method marker.
    pub fn method<M: DataMethod>(&self) -> Option<&MethodSchemas> {
        self.get(M::NAME)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(|name| name.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MethodSchemas)> {
        self.methods
            .iter()
            .map(|(name, schemas)| (name.as_ref(), schemas))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    fn require(&self, name: &str) -> Result<&MethodSchemas> {
        self.get(name).ok_or_else(|| ContractError::UnknownMethod {
            name: name.to_string(),
        })
    }

    /// Parse `candidate` against the input schema of `name`.
    pub fn parse_input(&self, name: &str, candidate: &Value) -> Result<Value> {
        Ok(self.require(name)?.input.safe_parse(candidate)?)
    }

    /// Parse `candidate` against the output schema of `name`.
    pub fn parse_output(&self, name: &str, candidate: &Value) -> Result<Value> {
        Ok(self.require(name)?.output.safe_parse(candidate)?)
    }

    /// Parse `candidate` against the errors schema of `name`.
    ///
    /// Fails for every candidate when the method declares no errors.
    pub fn parse_error(&self, name: &str, candidate: &Value) -> Result<Value> {
        Ok(self.require(name)?.errors.safe_parse(candidate)?)
    }

    /// Describe every method as `{input, output, errors}` in one document.
    ///
    /// Methods without declared errors describe `errors` as `false`.
    pub fn describe(&self) -> Result<Value> {
        self.describe_with(DescriptionBuilder::new().draft(self.draft.clone()))
    }

    pub fn describe_with(&self, mut builder: DescriptionBuilder) -> Result<Value> {
        for (name, schemas) in self.iter() {
            let mut entry = Map::new();
            entry.insert("input".to_string(), builder.hoist(&schemas.input)?);
            entry.insert("output".to_string(), builder.hoist(&schemas.output)?);
            entry.insert("errors".to_string(), builder.hoist(&schemas.errors)?);
            builder.method(name, Value::Object(entry));
        }
        Ok(builder.build())
    }
}

impl FromIterator<MethodDefinition> for DataValidator {
    fn from_iter<I: IntoIterator<Item = MethodDefinition>>(iter: I) -> Self {
        Self::assemble(iter)
    }
}
