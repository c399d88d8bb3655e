//! Contract description documents.
//!
//! Every [`Schema`](crate::Schema) carries a self-contained JSON Schema with its
//! own `$defs`. A description puts many of them side by side, so the
//! definitions are hoisted into one shared `$defs` map at the document root,
//! where the existing `#/$defs/...` references still resolve.
//!
//! # Conflict Resolution
//!
//! - **Methods**: Last write wins.
//! - **Definitions**: Identical definitions are deduplicated; different
//!   definitions with the same name cause an error.

use serde_json::{Map, Value};

use crate::Result;
use crate::error::ContractError;
use crate::schema::Schema;

/// Default `$schema` URI for described documents.
pub const DEFAULT_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Builder for a contract description document.
#[derive(Debug, Clone)]
pub struct DescriptionBuilder {
    draft: String,
    title: Option<String>,
    methods: Map<String, Value>,
    defs: Map<String, Value>,
}

impl Default for DescriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptionBuilder {
    pub fn new() -> Self {
        Self {
            draft: DEFAULT_DRAFT.to_string(),
            title: None,
            methods: Map::new(),
            defs: Map::new(),
        }
    }

    /// Set the `$schema` URI.
    pub fn draft(mut self, draft: impl Into<String>) -> Self {
        self.draft = draft.into();
        self
    }

    /// Set the document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Hoist the definitions of `schema` and return what is left of it.
    pub fn hoist(&mut self, schema: &Schema) -> Result<Value> {
        self.hoist_value(schema.json_schema().clone())
    }

    fn hoist_value(&mut self, mut document: Value) -> Result<Value> {
        if let Some(object) = document.as_object_mut() {
            object.remove("$schema");
            if let Some(Value::Object(defs)) = object.remove("$defs") {
                for (name, def) in defs {
                    self.merge_def(name, def)?;
                }
            }
        }
        Ok(document)
    }

    /// Record one method entry. Last write wins.
    pub fn method(&mut self, name: impl Into<String>, entry: Value) -> &mut Self {
        self.methods.insert(name.into(), entry);
        self
    }

    /// Merge a single definition with conflict detection.
    fn merge_def(&mut self, name: String, def: Value) -> Result<()> {
        if let Some(existing) = self.defs.get(&name) {
            if existing != &def {
                return Err(ContractError::SchemaConflict { name });
            }
        } else {
            self.defs.insert(name, def);
        }
        Ok(())
    }

    /// Build the final document.
    pub fn build(self) -> Value {
        let mut doc = Map::new();
        doc.insert("$schema".to_string(), Value::String(self.draft));
        if let Some(title) = self.title {
            doc.insert("title".to_string(), Value::String(title));
        }
        doc.insert("methods".to_string(), Value::Object(self.methods));
        if !self.defs.is_empty() {
            doc.insert("$defs".to_string(), Value::Object(self.defs));
        }
        Value::Object(doc)
    }
}
