//! Definition merging: from a list of method definitions to the operation
//! signatures a data provider must satisfy.
//!
//! The compile-time half of this merge is the provider trait generated by
//! `data_contract!`, whose operations return [`Outcome<M>`](crate::Outcome).
//! [`ProviderSignature`] is the same derivation kept as data, for code that
//! needs to inspect or check a provider's shape at runtime.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde_json::{Map, Value, json};

use crate::Result;
use crate::describe::DescriptionBuilder;
use crate::error::{ContractError, Issue, ValidationIssues};
use crate::method::{DataMethod, MethodDefinition, MethodSchemas};
use crate::schema::Schema;

/// What a derived operation resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnShape {
    /// The method declares no errors: the bare output.
    Bare(Schema),
    /// `{ value }` or `{ hasError: true, error }`.
    Result { value: Schema, error: Schema },
}

impl ReturnShape {
    /// Select the shape from an output schema and an errors schema.
    pub fn derive(output: Schema, errors: Schema) -> Self {
        if errors.is_no_errors() {
            ReturnShape::Bare(output)
        } else {
            ReturnShape::Result {
                value: output,
                error: errors,
            }
        }
    }

    pub fn is_bare(&self) -> bool {
        matches!(self, ReturnShape::Bare(_))
    }

    /// Schema of the success payload.
    pub fn value(&self) -> &Schema {
        match self {
            ReturnShape::Bare(value) | ReturnShape::Result { value, .. } => value,
        }
    }

    /// Schema of the error payload, if the method declares one.
    pub fn error(&self) -> Option<&Schema> {
        match self {
            ReturnShape::Bare(_) => None,
            ReturnShape::Result { error, .. } => Some(error),
        }
    }

    fn label(&self) -> String {
        match self {
            ReturnShape::Bare(value) => value.name().to_string(),
            ReturnShape::Result { value, error } => {
                format!("Res<{}, {}>", value.name(), error.name())
            }
        }
    }

    /// Validate what an operation resolved to.
    ///
    /// For [`ReturnShape::Result`] the candidate must be in wire form; the
    /// error flag is read first and only the matching payload is checked.
    pub fn safe_parse(&self, candidate: &Value) -> std::result::Result<Value, ValidationIssues> {
        let (value, error) = match self {
            ReturnShape::Bare(value) => return value.safe_parse(candidate),
            ReturnShape::Result { value, error } => (value, error),
        };

        let Some(fields) = candidate.as_object() else {
            return Err(self.fail(vec![Issue::root(format!(
                "{candidate} is not an object with `value` or `hasError`"
            ))]));
        };

        let has_error = match fields.get("hasError") {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(self.fail(vec![Issue {
                    instance_path: "/hasError".to_string(),
                    schema_path: String::new(),
                    message: format!("{other} is not of type \"boolean\""),
                }]));
            }
        };

        let (field, schema) = if has_error {
            ("error", error)
        } else {
            ("value", value)
        };
        let Some(payload) = fields.get(field) else {
            return Err(self.fail(vec![Issue::root(format!(
                "\"{field}\" is a required property"
            ))]));
        };

        match schema.safe_parse(payload) {
            Ok(decoded) if has_error => Ok(json!({"hasError": true, "error": decoded})),
            Ok(decoded) => Ok(json!({"value": decoded})),
            Err(issues) => {
                let nested = issues
                    .into_inner()
                    .into_iter()
                    .map(|issue| Issue {
                        instance_path: format!("/{field}{}", issue.instance_path),
                        ..issue
                    })
                    .collect();
                Err(self.fail(nested))
            }
        }
    }

    fn fail(&self, issues: Vec<Issue>) -> ValidationIssues {
        ValidationIssues::new(self.label(), issues)
    }

    /// JSON Schema of the resolved value, definitions hoisted into `builder`.
    pub fn json_schema(&self, builder: &mut DescriptionBuilder) -> Result<Value> {
        match self {
            ReturnShape::Bare(value) => builder.hoist(value),
            ReturnShape::Result { value, error } => {
                let value = builder.hoist(value)?;
                let error = builder.hoist(error)?;
                Ok(json!({
                    "oneOf": [
                        {
                            "type": "object",
                            "properties": {
                                "hasError": {"const": false},
                                "value": value
                            },
                            "required": ["value"]
                        },
                        {
                            "type": "object",
                            "properties": {
                                "hasError": {"const": true},
                                "error": error
                            },
                            "required": ["hasError", "error"]
                        }
                    ]
                }))
            }
        }
    }
}

/// Signature of one derived operation: validated input in, outcome out.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSignature {
    pub input: Schema,
    pub returns: ReturnShape,
}

impl OperationSignature {
    pub fn derive(schemas: MethodSchemas) -> Self {
        Self {
            input: schemas.input,
            returns: ReturnShape::derive(schemas.output, schemas.errors),
        }
    }
}

/// Every method name mapped to its derived operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSignature {
    operations: BTreeMap<Cow<'static, str>, OperationSignature>,
}

impl ProviderSignature {
    /// Merge definitions by name.
    ///
    /// Names must be unique; a repeated name is rejected with
    /// [`ContractError::DuplicateMethod`] instead of being resolved by order.
    pub fn merge(definitions: impl IntoIterator<Item = MethodDefinition>) -> Result<Self> {
        let mut operations = BTreeMap::new();
        for definition in definitions {
            let (name, schemas) = definition.into_entry();
            match operations.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(ContractError::DuplicateMethod {
                        name: entry.key().to_string(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(OperationSignature::derive(schemas));
                }
            }
        }
        tracing::debug!(operations = operations.len(), "merged provider signature");
        Ok(Self { operations })
    }

    pub fn get(&self, name: &str) -> Option<&OperationSignature> {
        self.operations.get(name)
    }

    /// Typed lookup by method marker.
    pub fn operation<M: DataMethod>(&self) -> Option<&OperationSignature> {
        self.get(M::NAME)
    }

    /// Method names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(|name| name.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperationSignature)> {
        self.operations
            .iter()
            .map(|(name, operation)| (name.as_ref(), operation))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Describe every operation as `{input, returns}` in one document.
    pub fn describe(&self) -> Result<Value> {
        self.describe_with(DescriptionBuilder::new())
    }

    pub fn describe_with(&self, mut builder: DescriptionBuilder) -> Result<Value> {
        for (name, operation) in self.iter() {
            let mut entry = Map::new();
            entry.insert("input".to_string(), builder.hoist(&operation.input)?);
            entry.insert(
                "returns".to_string(),
                operation.returns.json_schema(&mut builder)?,
            );
            builder.method(name, Value::Object(entry));
        }
        Ok(builder.build())
    }
}
