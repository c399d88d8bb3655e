//! Data-contract - schema-driven method contracts for Rust
//!
//! Declare a closed list of methods, each with an input type, an output
//! type and optional error type. The `data_contract!` macro projects that
//! list into two views:
//!
//! - a **provider trait**: what a backing implementation (network client,
//!   in-memory store, ...) must satisfy. Every operation takes validated
//!   input and resolves to the bare output, or to [`Res`] when the method
//!   declares errors.
//! - a **validator**: every method name mapped to its raw input, output and
//!   errors [`Schema`], for parsing untrusted data.
//!
//! # Quick Start
//!
//! ```ignore
//! use data_contract::prelude::*;
//!
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! #[serde(rename_all = "camelCase")]
//! pub struct Entity {
//!     entity_id: String,
//!     entity_name: String,
//! }
//!
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! pub enum EntityNotFound {
//!     EntityNotFound,
//! }
//!
//! data_contract! {
//!     pub contract EntityMethods => EntityDataProvider {
//!         fn find_entity_by_name(String) -> Entity, errors = EntityNotFound;
//!         fn count_entities() -> u64;
//!     }
//! }
//!
//! struct Store;
//!
//! impl EntityDataProvider for Store {
//!     async fn find_entity_by_name(&self, name: String) -> Res<Entity, EntityNotFound> {
//!         res_err(EntityNotFound::EntityNotFound)
//!     }
//!
//!     async fn count_entities(&self, _: ()) -> u64 {
//!         0
//!     }
//! }
//!
//! let validator = EntityMethods::validator();
//! let parsed = validator.get("findEntityByName").unwrap().input.safe_parse(&json!(17));
//! assert!(parsed.is_err());
//! ```
//!
//! # Outcomes
//!
//! | Declaration | Operation resolves to | Wire form |
//! |-------------|-----------------------|-----------|
//! | `-> T` | `T` | `T` |
//! | `-> T, errors = E` | `Res<T, E>` | `{"value": T}` or `{"hasError": true, "error": E}` |
//! | `-> Result<T, E>` | `Res<T, E>` | same as above |
//!
//! # Duplicate Method Names
//!
//! | Where | Policy |
//! |-------|--------|
//! | `data_contract!` | compile error |
//! | [`ProviderSignature::merge`] | `ContractError::DuplicateMethod` |
//! | [`DataValidator::assemble`] | last wins, logged at `warn` |
//! | [`DataValidator::try_assemble`] | `ContractError::DuplicateMethod` |
//!
//! # Feature Flags
//!
//! - `config` - load [`AssembleOptions`] from TOML

pub use data_contract_macros::data_contract;

pub use data_contract_core::*;

// Re-export for users and generated code
pub use schemars;
pub use serde;
pub use serde_json;

/// Everything needed to declare and implement a contract.
pub mod prelude {
    pub use data_contract_macros::data_contract;
    pub use data_contract_core::{
        DataContract, DataMethod, DataValidator, Declared, NoErrors, Outcome, ProviderSignature,
        Res, Schema, res_err, res_ok,
    };
    pub use schemars::JsonSchema;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::json;
}
