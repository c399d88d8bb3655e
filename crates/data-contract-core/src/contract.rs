//! Closed method lists.

use serde_json::Value;

use crate::Result;
use crate::method::MethodDefinition;
use crate::provider::ProviderSignature;
use crate::validator::DataValidator;

/// A closed list of methods, usually generated by `data_contract!`.
pub trait DataContract {
    /// Method names in declaration order.
    const METHOD_NAMES: &'static [&'static str];

    /// One definition per method, in declaration order.
    fn definitions() -> Vec<MethodDefinition>;

    /// Assemble the runtime validator.
    fn validator() -> DataValidator {
        DataValidator::assemble(Self::definitions())
    }

    /// Merge the runtime provider signature.
    fn signature() -> Result<ProviderSignature> {
        ProviderSignature::merge(Self::definitions())
    }

    /// Description document of every method schema.
    fn describe() -> Result<Value> {
        Self::validator().describe()
    }
}
