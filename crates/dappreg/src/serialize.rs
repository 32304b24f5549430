//!
//! CBOR serialization helpers ensuring a deterministic codec for every value
//! placed in stable structures. Thin wrapper with shared error handling so
//! storable impls can bubble codec failures up uniformly.
//!

use serde::{Serialize, de::DeserializeOwned};
use serde_cbor::{from_slice, to_vec};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),
}

///
/// Serialize a value into CBOR bytes.
///
pub fn serialize<T>(t: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    let bytes = to_vec(t).map_err(|e| SerializeError::Serialize(e.to_string()))?;

    Ok(bytes)
}

///
/// Deserialize CBOR bytes into a value.
///
pub fn deserialize<T>(bytes: &[u8]) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    let t: T = from_slice(bytes).map_err(|e| SerializeError::Deserialize(e.to_string()))?;

    Ok(t)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct Sample {
        id: u64,
        name: String,
    }

    #[test]
    fn round_trips_a_struct() {
        let sample = Sample {
            id: 42,
            name: "foo".to_string(),
        };

        let bytes = serialize(&sample).unwrap();
        let back: Sample = deserialize(&bytes).unwrap();

        assert_eq!(back, sample);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let res: Result<Sample, _> = deserialize(&[0xff, 0x00, 0x13]);
        assert!(matches!(res, Err(SerializeError::Deserialize(_))));
    }
}
