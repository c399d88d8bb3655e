//! Core types for data-contract.
//!
//! This crate provides the runtime half of a contract: the [`Res`] outcome,
//! [`Schema`] handles, [`MethodDefinition`]s, and the two merged views of a
//! method list, [`ProviderSignature`] and [`DataValidator`]. The
//! `data_contract!` macro generates code against these types.

pub mod config;
pub mod contract;
pub mod describe;
pub mod error;
pub mod method;
pub mod provider;
pub mod result;
pub mod schema;
mod strip;
pub mod validator;

pub use config::{AssembleOptions, DuplicatePolicy};
pub use contract::DataContract;
pub use describe::{DEFAULT_DRAFT, DescriptionBuilder};
pub use error::{ContractError, Issue, ValidationIssues};
pub use method::{DataMethod, Declared, ErrorSpec, MethodDefinition, MethodSchemas, Outcome};
pub use provider::{OperationSignature, ProviderSignature, ReturnShape};
pub use result::{Res, res_err, res_ok};
pub use schema::{NoErrors, Schema, SchemaType};
pub use validator::DataValidator;

/// Result type for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;
