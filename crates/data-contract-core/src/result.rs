//! The two-variant outcome returned by operations that declare errors.
//!
//! On the wire a success is `{"value": ...}` and an error is
//! `{"hasError": true, "error": ...}`. The `hasError` flag is the only
//! discriminant: consumers check it first and ignore the other field.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const HAS_ERROR: &str = "hasError";
const VALUE: &str = "value";
const ERROR: &str = "error";

/// Success-with-value or error-with-payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Res<T, E> {
    /// `{ value }`, error flag absent.
    Value(T),
    /// `{ hasError: true, error }`.
    Error(E),
}

/// Build the success variant.
pub fn res_ok<T, E>(value: T) -> Res<T, E> {
    Res::Value(value)
}

/// Build the error variant.
pub fn res_err<T, E>(error: E) -> Res<T, E> {
    Res::Error(error)
}

impl<T, E> Res<T, E> {
    /// The error flag.
    pub fn has_error(&self) -> bool {
        matches!(self, Res::Error(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Res::Value(value) => Some(value),
            Res::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Res::Value(_) => None,
            Res::Error(error) => Some(error),
        }
    }

    /// Convert into a std `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Res::Value(value) => Ok(value),
            Res::Error(error) => Err(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Res<U, E> {
        match self {
            Res::Value(value) => Res::Value(f(value)),
            Res::Error(error) => Res::Error(error),
        }
    }

    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Res<T, F> {
        match self {
            Res::Value(value) => Res::Value(value),
            Res::Error(error) => Res::Error(f(error)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Res<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Res::Value(value),
            Err(error) => Res::Error(error),
        }
    }
}

impl<T, E> From<Res<T, E>> for Result<T, E> {
    fn from(res: Res<T, E>) -> Self {
        res.into_result()
    }
}

impl<T: Serialize, E: Serialize> Serialize for Res<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Res::Value(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(VALUE, value)?;
                map.end()
            }
            Res::Error(error) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(HAS_ERROR, &true)?;
                map.serialize_entry(ERROR, error)?;
                map.end()
            }
        }
    }
}

impl<'de, T, E> Deserialize<'de> for Res<T, E>
where
    T: de::DeserializeOwned,
    E: de::DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let Value::Object(mut fields) = raw else {
            return Err(de::Error::custom("expected an object with `value` or `hasError`"));
        };

        let has_error = match fields.remove(HAS_ERROR) {
            None => false,
            Some(Value::Bool(flag)) => flag,
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "`{HAS_ERROR}` must be a boolean, found {other}"
                )));
            }
        };

        if has_error {
            let error = fields
                .remove(ERROR)
                .ok_or_else(|| de::Error::missing_field(ERROR))?;
            E::deserialize(error).map(Res::Error).map_err(de::Error::custom)
        } else {
            let value = fields
                .remove(VALUE)
                .ok_or_else(|| de::Error::missing_field(VALUE))?;
            T::deserialize(value).map(Res::Value).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_has_no_error_flag() {
        let ok: Res<u32, String> = res_ok(7);
        assert!(!ok.has_error());
        assert_eq!(ok.value(), Some(&7));
        assert_eq!(ok.error(), None);
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"value": 7}));
    }

    #[test]
    fn test_error_sets_flag() {
        let err: Res<u32, String> = res_err("NotFound".to_string());
        assert!(err.has_error());
        assert_eq!(err.value(), None);
        assert_eq!(err.error().map(String::as_str), Some("NotFound"));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"hasError": true, "error": "NotFound"})
        );
    }

    #[test]
    fn test_variants_are_exclusive() {
        let results: Vec<Res<u32, u32>> = vec![res_ok(1), res_err(2)];
        for res in results {
            assert_ne!(res.value().is_some(), res.error().is_some());
            assert_eq!(res.has_error(), res.error().is_some());
        }
    }

    #[test]
    fn test_deserialize_reads_flag_first() {
        let ok: Res<u32, String> = serde_json::from_value(json!({"value": 3})).unwrap();
        assert_eq!(ok, Res::Value(3));

        let explicit: Res<u32, String> =
            serde_json::from_value(json!({"hasError": false, "value": 3})).unwrap();
        assert_eq!(explicit, Res::Value(3));

        // `value` is ignored once the flag is set
        let err: Res<u32, String> =
            serde_json::from_value(json!({"hasError": true, "error": "x", "value": 3})).unwrap();
        assert_eq!(err, Res::Error("x".to_string()));
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        assert!(serde_json::from_value::<Res<u32, String>>(json!({})).is_err());
        assert!(serde_json::from_value::<Res<u32, String>>(json!({"hasError": true})).is_err());
        assert!(
            serde_json::from_value::<Res<u32, String>>(json!({"hasError": "yes", "error": "x"}))
                .is_err()
        );
        assert!(serde_json::from_value::<Res<u32, String>>(json!(5)).is_err());
    }

    #[test]
    fn test_std_result_conversion() {
        let res: Res<u32, String> = Ok::<_, String>(4).into();
        assert_eq!(res.into_result(), Ok(4));

        let res: Res<u32, String> = res_err("e".to_string());
        let mapped = res.map(|v| v + 1).map_err(|e| e.len());
        assert_eq!(Result::from(mapped), Err(1));
    }
}
