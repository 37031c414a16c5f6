//! JSON body decoding.
//!
//! The body is decoded once per binding, before any tagged field is resolved.
//! Whether a decode failure is fatal is decided by the caller: with no
//! alternate sources declared it is, otherwise the binder starts from the
//! target's default value.

use crate::BindError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Default maximum body size accepted by the decoder (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Decodes a JSON body into `T`.
///
/// The payload is laid over `T::default()`: fields present in the body are
/// taken from it, fields absent at any depth keep their default value. The
/// target does not need `#[serde(default)]`.
///
/// # Errors
///
/// Returns [`BindError::BodyDecode`] when the body is empty, larger than
/// `max_bytes`, not valid JSON, or not shaped like `T`.
///
/// # Example
///
/// ```rust
/// use tessera_bind::body::{decode_body, DEFAULT_MAX_BODY_BYTES};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Deserialize, Serialize)]
/// struct CreateUser {
///     name: String,
///     age: i32,
/// }
///
/// let user: CreateUser = decode_body(br#"{"name": "Alice"}"#, DEFAULT_MAX_BODY_BYTES).unwrap();
/// assert_eq!(user.name, "Alice");
/// assert_eq!(user.age, 0);
///
/// assert!(decode_body::<CreateUser>(b"not json", DEFAULT_MAX_BODY_BYTES).is_err());
/// ```
pub fn decode_body<T>(body: &[u8], max_bytes: usize) -> Result<T, BindError>
where
    T: Serialize + DeserializeOwned + Default,
{
    if body.len() > max_bytes {
        return Err(BindError::body_decode(format!(
            "body of {} bytes exceeds the limit of {max_bytes} bytes",
            body.len()
        )));
    }

    if body.is_empty() {
        return Err(BindError::body_decode("empty request body"));
    }

    let payload: Value =
        serde_json::from_slice(body).map_err(|e| BindError::body_decode(e.to_string()))?;
    let mut merged = serde_json::to_value(T::default())
        .map_err(|e| BindError::body_decode(format!("target default not representable: {e}")))?;
    overlay(&mut merged, payload);

    serde_json::from_value(merged).map_err(|e| BindError::body_decode(e.to_string()))
}

// Objects merge key by key; any other payload value replaces the base.
fn overlay(base: &mut Value, payload: Value) {
    match (base, payload) {
        (Value::Object(base), Value::Object(payload)) => {
            for (key, value) in payload {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, payload) => *base = payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BindErrorKind;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    #[serde(default)]
    struct Order {
        id: String,
        quantity: i32,
        express: bool,
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Shipment {
        carrier: String,
        address: Address,
        tracking: Option<String>,
    }

    impl Default for Shipment {
        fn default() -> Self {
            Self {
                carrier: "post".into(),
                address: Address::default(),
                tracking: None,
            }
        }
    }

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct Address {
        city: String,
        zip: String,
    }

    #[test]
    fn test_decode_valid_body() {
        let order: Order = decode_body(
            br#"{"id": "o-1", "quantity": 3}"#,
            DEFAULT_MAX_BODY_BYTES,
        )
        .unwrap();

        assert_eq!(
            order,
            Order {
                id: "o-1".into(),
                quantity: 3,
                express: false,
            }
        );
    }

    #[test]
    fn test_decode_empty_object_uses_defaults() {
        let order: Order = decode_body(b"{}", DEFAULT_MAX_BODY_BYTES).unwrap();
        assert_eq!(order, Order::default());
    }

    #[test]
    fn test_absent_fields_keep_defaults_without_serde_default() {
        let shipment: Shipment = decode_body(
            br#"{"address": {"city": "Oslo"}, "tracking": "T-1"}"#,
            DEFAULT_MAX_BODY_BYTES,
        )
        .unwrap();

        assert_eq!(
            shipment,
            Shipment {
                carrier: "post".into(),
                address: Address {
                    city: "Oslo".into(),
                    zip: String::new(),
                },
                tracking: Some("T-1".into()),
            }
        );
    }

    #[test]
    fn test_non_object_body_for_struct_is_an_error() {
        let err = decode_body::<Shipment>(b"[1, 2]", DEFAULT_MAX_BODY_BYTES).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::BodyDecode);
    }

    #[test]
    fn test_empty_body_is_an_error() {
        let err = decode_body::<Order>(b"", DEFAULT_MAX_BODY_BYTES).unwrap_err();

        assert_eq!(err.kind(), BindErrorKind::BodyDecode);
        assert!(err.to_string().contains("empty request body"));
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        let err = decode_body::<Order>(br#"{"id": "#, DEFAULT_MAX_BODY_BYTES).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::BodyDecode);
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let err =
            decode_body::<Order>(br#"{"quantity": "three"}"#, DEFAULT_MAX_BODY_BYTES).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::BodyDecode);
    }

    #[test]
    fn test_body_over_limit() {
        let body = br#"{"id": "o-1"}"#;

        let err = decode_body::<Order>(body, 4).unwrap_err();
        assert!(err.to_string().contains("exceeds the limit of 4 bytes"));

        assert!(decode_body::<Order>(body, body.len()).is_ok());
    }
}
