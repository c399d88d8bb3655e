//! Proc macros for data-contract.
//!
//! This crate provides `data_contract!`, which turns a closed list of method
//! declarations into marker types, a contract type and a provider trait.

use proc_macro::TokenStream;
use syn::parse_macro_input;

use data_contract_parse::ContractDef;

mod contract;

/// Declare a contract: a closed list of methods with input, output and
/// optional error types.
///
/// # Basic Usage
///
/// ```ignore
/// use data_contract::data_contract;
///
/// data_contract! {
///     pub contract EntityMethods => EntityDataProvider {
///         /// Look up an entity by its exact name
///         fn find_entity_by_name(String) -> Entity, errors = EntityNotFound;
///         fn create_entity(NewEntity) -> Entity, errors = CreateEntityError;
///         fn count_entities() -> u64;
///     }
/// }
/// ```
///
/// Every input, output and error type must implement `schemars::JsonSchema`,
/// `serde::Serialize` and `serde::de::DeserializeOwned`.
///
/// # Method Names
///
/// The merge key of a method is the lowerCamelCase of its identifier
/// (`find_entity_by_name` -> `findEntityByName`). Override it with a string
/// literal:
///
/// ```ignore
/// #[method(name = "find")]
/// fn find_entity_by_name(String) -> Entity;
/// ```
///
/// Names must be unique; a repeated name is a compile error.
///
/// # Errors
///
/// `-> T, errors = E` and `-> Result<T, E>` are equivalent. The provider
/// operation then returns `Res<T, E>`. Without declared errors it returns
/// the bare `T`.
///
/// # Generated Items
/// - `struct EntityMethods` - implements `DataContract` (`validator()`, `signature()`)
/// - `mod entity_methods` - one marker type per method, implementing `DataMethod`
/// - `trait EntityDataProvider` - one `async` operation per method
#[proc_macro]
pub fn data_contract(input: TokenStream) -> TokenStream {
    let def = parse_macro_input!(input as ContractDef);

    match contract::expand_data_contract(def) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
