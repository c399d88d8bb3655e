//! Method definitions: one name bound to an input/output/errors schema triple.

use std::borrow::Cow;
use std::marker::PhantomData;

use serde_json::Value;

use crate::error::ValidationIssues;
use crate::result::Res;
use crate::schema::{NoErrors, Schema, SchemaType};

/// The schema triple of one method.
///
/// `errors` is never absent: methods without declared errors carry
/// [`Schema::no_errors`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSchemas {
    pub input: Schema,
    pub output: Schema,
    pub errors: Schema,
}

impl MethodSchemas {
    /// Whether the method declares an error variant.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_no_errors()
    }
}

/// A single-entry mapping from a method name to its schema triple.
///
/// The name should be a literal. Runtime strings are accepted, but nothing
/// checks that two definitions built from them stay distinct; the
/// `data_contract!` macro is the checked path.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    name: Cow<'static, str>,
    schemas: MethodSchemas,
}

impl MethodDefinition {
    /// Bind `name` to its schemas. Missing `errors` becomes the empty-error marker.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        input: Schema,
        output: Schema,
        errors: Option<Schema>,
    ) -> Self {
        Self {
            name: name.into(),
            schemas: MethodSchemas {
                input,
                output,
                errors: errors.unwrap_or_else(Schema::no_errors),
            },
        }
    }

    /// Build the definition described by a method marker type.
    pub fn of<M: DataMethod>() -> Self {
        Self::new(
            M::NAME,
            M::input_schema(),
            M::output_schema(),
            M::errors_schema(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schemas(&self) -> &MethodSchemas {
        &self.schemas
    }

    /// Split into the mapping's only key and value.
    pub fn into_entry(self) -> (Cow<'static, str>, MethodSchemas) {
        (self.name, self.schemas)
    }
}

/// Type-level error declaration of a method.
///
/// Selects the outcome shape: [`NoErrors`] yields the bare output,
/// [`Declared<E>`] yields [`Res<Output, E>`].
pub trait ErrorSpec: 'static {
    /// What an operation returns for output `T`.
    type Outcome<T>;

    /// Runtime error schema; `None` for [`NoErrors`].
    fn schema() -> Option<Schema>;
}

impl ErrorSpec for NoErrors {
    type Outcome<T> = T;

    fn schema() -> Option<Schema> {
        None
    }
}

/// Declares `E` as a method's error payload.
pub struct Declared<E>(PhantomData<fn() -> E>);

impl<E: SchemaType> ErrorSpec for Declared<E> {
    type Outcome<T> = Res<T, E>;

    fn schema() -> Option<Schema> {
        Some(Schema::of::<E>())
    }
}

/// A method known at compile time.
///
/// Implemented by the marker types `data_contract!` generates; can also be
/// implemented by hand.
///
/// The schema accessors build a fresh [`Schema`] (document and validator) on
/// every call. Generated markers override them to hand out one cached handle
/// per marker.
pub trait DataMethod: Sized + 'static {
    /// Literal method name, the key used by every merged mapping.
    const NAME: &'static str;

    type Input: SchemaType;
    type Output: SchemaType;
    type Errors: ErrorSpec;

    fn input_schema() -> Schema {
        Schema::of::<Self::Input>()
    }

    fn output_schema() -> Schema {
        Schema::of::<Self::Output>()
    }

    /// `None` when the method declares no errors.
    fn errors_schema() -> Option<Schema> {
        <Self::Errors as ErrorSpec>::schema()
    }

    /// The runtime definition of this method.
    fn definition() -> MethodDefinition {
        MethodDefinition::of::<Self>()
    }

    /// Parse untrusted data as this method's input.
    fn parse_input(candidate: &Value) -> Result<Self::Input, ValidationIssues> {
        Self::input_schema().safe_parse_as(candidate)
    }

    /// Parse untrusted data as this method's bare output.
    fn parse_output(candidate: &Value) -> Result<Self::Output, ValidationIssues> {
        Self::output_schema().safe_parse_as(candidate)
    }
}

/// Return type of the derived operation for method `M`.
pub type Outcome<M> = <<M as DataMethod>::Errors as ErrorSpec>::Outcome<<M as DataMethod>::Output>;
