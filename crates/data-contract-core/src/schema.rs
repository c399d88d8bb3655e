//! Schema handles.
//!
//! A [`Schema`] pairs the compile-time half of a shape (a Rust type) with its
//! runtime half: a JSON Schema document generated by `schemars` and a
//! `jsonschema` validator used to report structured issues on untrusted data.
//!
//! A conforming candidate must also decode through serde. The parsed value
//! is the candidate itself with unknown object keys dropped, so it deep-equals
//! any input that carries no extra keys.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

use jsonschema::{Draft, Validator};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Issue, ValidationIssues};
use crate::strip::strip_unknown;

/// A type that can stand behind a [`Schema`].
pub trait SchemaType: JsonSchema + Serialize + DeserializeOwned + 'static {}

impl<T> SchemaType for T where T: JsonSchema + Serialize + DeserializeOwned + 'static {}

/// Marker for methods that declare no error variant.
///
/// Uninhabited: an operation on such a method can only succeed, so its
/// outcome is the bare output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoErrors {}

type DecodeFn = fn(&Value) -> Result<(), serde_json::Error>;

fn decode<T: SchemaType>(candidate: &Value) -> Result<(), serde_json::Error> {
    T::deserialize(candidate).map(drop)
}

/// Cheap-to-clone handle to a data shape.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

struct SchemaInner {
    name: Cow<'static, str>,
    document: Value,
    // None only for the no-errors marker
    decode: Option<DecodeFn>,
    compiled: OnceLock<Result<Validator, String>>,
}

impl Schema {
    /// Build the schema for `T`.
    pub fn of<T: SchemaType>() -> Self {
        let document = schemars::schema_for!(T).to_value();
        Self::from_parts(T::schema_name(), document, Some(decode::<T>))
    }

    /// The empty-error marker: a schema that accepts nothing.
    pub fn no_errors() -> Self {
        Self::from_parts(Cow::Borrowed("NoErrors"), Value::Bool(false), None)
    }

    fn from_parts(name: Cow<'static, str>, document: Value, decode: Option<DecodeFn>) -> Self {
        Self {
            inner: Arc::new(SchemaInner {
                name,
                document,
                decode,
                compiled: OnceLock::new(),
            }),
        }
    }

    /// Type name reported by `schemars`.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The JSON Schema document, including its `$defs`.
    pub fn json_schema(&self) -> &Value {
        &self.inner.document
    }

    /// Whether this is the empty-error marker.
    pub fn is_no_errors(&self) -> bool {
        self.inner.decode.is_none()
    }

    /// Attempt to parse untrusted data.
    ///
    /// Returns the candidate without unknown keys, or every issue the
    /// validator found. This is a normal return value: nothing here panics or
    /// logs above `trace`.
    pub fn safe_parse(&self, candidate: &Value) -> Result<Value, ValidationIssues> {
        let Some(decode) = self.inner.decode else {
            return Err(self.fail(vec![Issue::root(
                "method declares no errors; no payload can match",
            )]));
        };

        let validator = match self.validator() {
            Ok(validator) => validator,
            Err(reason) => {
                return Err(self.fail(vec![Issue::root(format!(
                    "schema could not be compiled: {reason}"
                ))]));
            }
        };

        let issues: Vec<Issue> = validator
            .iter_errors(candidate)
            .map(|e| Issue {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        if !issues.is_empty() {
            return Err(self.fail(issues));
        }

        // Serde can still reject what the JSON Schema accepted (custom
        // deserializers, integer ranges).
        decode(candidate).map_err(|e| self.fail(vec![Issue::root(e.to_string())]))?;
        Ok(strip_unknown(&self.inner.document, candidate))
    }

    /// Like [`safe_parse`](Self::safe_parse), decoding into `T`.
    pub fn safe_parse_as<T: DeserializeOwned>(
        &self,
        candidate: &Value,
    ) -> Result<T, ValidationIssues> {
        let decoded = self.safe_parse(candidate)?;
        serde_json::from_value(decoded).map_err(|e| self.fail(vec![Issue::root(e.to_string())]))
    }

    /// Whether both handles share one document and compiled validator.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    fn validator(&self) -> Result<&Validator, &str> {
        self.inner
            .compiled
            .get_or_init(|| {
                jsonschema::options()
                    .with_draft(Draft::Draft202012)
                    .build(&self.inner.document)
                    .map_err(|e| {
                        tracing::error!(schema = %self.name(), error = %e, "schema failed to compile");
                        e.to_string()
                    })
            })
            .as_ref()
            .map_err(String::as_str)
    }

    fn fail(&self, issues: Vec<Issue>) -> ValidationIssues {
        tracing::trace!(schema = %self.name(), issues = issues.len(), "candidate rejected");
        ValidationIssues::new(self.name(), issues)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        Schema::ptr_eq(self, other)
            || (self.name() == other.name()
                && self.is_no_errors() == other.is_no_errors()
                && self.json_schema() == other.json_schema())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name())
            .field("document", self.json_schema())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct Entity {
        entity_id: String,
        entity_name: String,
    }

    #[test]
    fn test_parse_conforming_value() {
        let schema = Schema::of::<Entity>();
        let candidate = json!({"entityId": "1", "entityName": "test"});

        assert_eq!(schema.safe_parse(&candidate).unwrap(), candidate);
        assert_eq!(
            schema.safe_parse_as::<Entity>(&candidate).unwrap(),
            Entity {
                entity_id: "1".to_string(),
                entity_name: "test".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_reports_structured_issues() {
        let schema = Schema::of::<Entity>();
        let err = schema
            .safe_parse(&json!({"entityId": 17, "entityName": "test"}))
            .unwrap_err();

        assert_eq!(err.schema(), "Entity");
        assert_eq!(err.len(), 1);
        assert_eq!(err.issues()[0].instance_path, "/entityId");
    }

    #[test]
    fn test_parse_reports_missing_fields() {
        let schema = Schema::of::<Entity>();
        let err = schema.safe_parse(&json!({})).unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn test_primitive_schema() {
        let schema = Schema::of::<String>();
        assert!(schema.safe_parse(&json!(17)).is_err());
        assert_eq!(schema.safe_parse(&json!("abc")).unwrap(), json!("abc"));
    }

    #[test]
    fn test_unknown_keys_are_stripped() {
        let schema = Schema::of::<Entity>();
        let decoded = schema
            .safe_parse(&json!({"entityId": "1", "entityName": "a", "extra": true}))
            .unwrap();
        assert_eq!(decoded, json!({"entityId": "1", "entityName": "a"}));
    }

    #[test]
    fn test_no_errors_marker_rejects_everything() {
        let marker = Schema::no_errors();
        assert!(marker.is_no_errors());
        assert_eq!(marker.json_schema(), &Value::Bool(false));
        assert!(marker.safe_parse(&Value::Null).is_err());
        assert!(marker.safe_parse(&json!({"reason": "x"})).is_err());
        assert!(!Schema::of::<String>().is_no_errors());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Schema::of::<Entity>(), Schema::of::<Entity>());
        assert_eq!(Schema::no_errors(), Schema::no_errors());
        assert_ne!(Schema::of::<String>(), Schema::of::<u64>());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct Filter {
        name: Option<String>,
        #[serde(default)]
        limit: u32,
        min_score: Option<f64>,
    }

    #[test]
    fn test_absent_optional_fields_stay_absent() {
        let schema = Schema::of::<Filter>();
        assert_eq!(schema.safe_parse(&json!({})).unwrap(), json!({}));
        assert_eq!(
            schema.safe_parse(&json!({"name": "a"})).unwrap(),
            json!({"name": "a"})
        );
        // Typed decoding still fills in defaults
        assert_eq!(
            schema.safe_parse_as::<Filter>(&json!({})).unwrap(),
            Filter {
                name: None,
                limit: 0,
                min_score: None,
            }
        );
    }

    #[test]
    fn test_number_representation_preserved() {
        assert_eq!(Schema::of::<f64>().safe_parse(&json!(1)).unwrap(), json!(1));
        assert_eq!(
            Schema::of::<Filter>()
                .safe_parse(&json!({"minScore": 2, "limit": 3}))
                .unwrap(),
            json!({"minScore": 2, "limit": 3})
        );
    }

    #[test]
    fn test_conforming_values_round_trip() {
        let schema = Schema::of::<Filter>();
        for candidate in [
            json!({}),
            json!({"name": null}),
            json!({"limit": 0}),
            json!({"name": "a", "limit": 10, "minScore": 0.5}),
        ] {
            assert_eq!(schema.safe_parse(&candidate).unwrap(), candidate);
        }
    }

    #[test]
    fn test_out_of_range_integer_rejected() {
        assert!(Schema::of::<u8>().safe_parse(&json!(256)).is_err());
        assert_eq!(Schema::of::<u8>().safe_parse(&json!(255)).unwrap(), json!(255));
    }

    #[test]
    fn test_ptr_eq() {
        let schema = Schema::of::<Entity>();
        assert!(Schema::ptr_eq(&schema, &schema.clone()));
        assert!(!Schema::ptr_eq(&schema, &Schema::of::<Entity>()));
    }
}
