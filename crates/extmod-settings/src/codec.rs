//! Tagged storage codec for setting values
//!
//! The stored form is JSON in which every node names its own type:
//!
//! ```text
//! {"type":"integer","value":1}
//! {"type":"list","value":[{"type":"string","value":"1"},{"type":"null"}]}
//! ```
//!
//! Decoding never infers a type from the payload, so `"1"`, `1` and `1.0`
//! come back exactly as written, as do `[]` and `null`.

use crate::errors::CodecError;
use crate::value::SettingValue;
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::io;

/// Owned decode target, mirroring the layout [`Tagged`] writes
#[derive(Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum StoredValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<StoredValue>),
    Null,
}

impl From<StoredValue> for SettingValue {
    fn from(stored: StoredValue) -> Self {
        match stored {
            StoredValue::Boolean(b) => SettingValue::Bool(b),
            StoredValue::Integer(i) => SettingValue::Int(i),
            StoredValue::Float(f) => SettingValue::Float(f),
            StoredValue::String(s) => SettingValue::String(s),
            StoredValue::List(items) => {
                SettingValue::List(items.into_iter().map(SettingValue::from).collect())
            }
            StoredValue::Null => SettingValue::Null,
        }
    }
}

/// Borrowing encoder, avoids cloning the value tree
struct Tagged<'a>(&'a SettingValue);

struct TaggedItems<'a>(&'a [SettingValue]);

impl Serialize for Tagged<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = match self.0 {
            SettingValue::Bool(_) => "boolean",
            SettingValue::Int(_) => "integer",
            SettingValue::Float(_) => "float",
            SettingValue::String(_) => "string",
            SettingValue::List(_) => "list",
            SettingValue::Null => "null",
        };
        let len = if self.0.is_null() { 1 } else { 2 };
        let mut node = serializer.serialize_struct("Tagged", len)?;
        node.serialize_field("type", tag)?;
        match self.0 {
            SettingValue::Bool(b) => node.serialize_field("value", b)?,
            SettingValue::Int(i) => node.serialize_field("value", i)?,
            SettingValue::Float(f) => node.serialize_field("value", f)?,
            SettingValue::String(s) => node.serialize_field("value", s)?,
            SettingValue::List(items) => node.serialize_field("value", &TaggedItems(items))?,
            SettingValue::Null => {}
        }
        node.end()
    }
}

impl Serialize for TaggedItems<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(&Tagged(item))?;
        }
        seq.end()
    }
}

/// JSON has no representation for NaN or infinities
fn ensure_finite(value: &SettingValue) -> Result<(), CodecError> {
    match value {
        SettingValue::Float(f) if !f.is_finite() => Err(CodecError::NonFiniteFloat(*f)),
        SettingValue::List(items) => items.iter().try_for_each(ensure_finite),
        _ => Ok(()),
    }
}

/// Encode a value into its stored form
pub fn encode(value: &SettingValue) -> Result<Vec<u8>, CodecError> {
    ensure_finite(value)?;
    Ok(serde_json::to_vec(&Tagged(value))?)
}

/// Decode a stored form back into a value
pub fn decode(bytes: &[u8]) -> Result<SettingValue, CodecError> {
    let stored: StoredValue = serde_json::from_slice(bytes)?;
    Ok(stored.into())
}

/// Size in bytes of the stored form, computed without building it
pub fn encoded_size(value: &SettingValue) -> Result<usize, CodecError> {
    ensure_finite(value)?;
    let mut counter = ByteCounter(0);
    serde_json::to_writer(&mut counter, &Tagged(value))?;
    Ok(counter.0)
}

struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: &SettingValue) -> Option<SettingValue> {
        let bytes = encode(value).ok()?;
        decode(&bytes).ok()
    }

    #[test]
    fn test_stored_form_is_tagged() {
        let bytes = encode(&SettingValue::from(vec![1])).unwrap_or_default();
        assert_eq!(
            String::from_utf8_lossy(&bytes),
            r#"{"type":"list","value":[{"type":"integer","value":1}]}"#
        );
        let bytes = encode(&SettingValue::Null).unwrap_or_default();
        assert_eq!(String::from_utf8_lossy(&bytes), r#"{"type":"null"}"#);
    }

    #[test]
    fn test_numeric_string_stays_string() {
        assert_eq!(
            round_trip(&SettingValue::from("1")),
            Some(SettingValue::String("1".to_string()))
        );
        assert_eq!(round_trip(&SettingValue::from(1)), Some(SettingValue::Int(1)));
    }

    #[test]
    fn test_whole_float_stays_float() {
        assert_eq!(round_trip(&SettingValue::from(1.0)), Some(SettingValue::Float(1.0)));
        assert_eq!(round_trip(&SettingValue::from(1.1)), Some(SettingValue::Float(1.1)));
    }

    #[test]
    fn test_float_bits_survive_round_trip() {
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut samples = vec![
            1.071_566_039_146_582_6e-75,
            -1.819_967_304_027_17e-179,
            -1.603_964_615_428_183e143,
            f64::MIN_POSITIVE,
            f64::MAX,
        ];
        while samples.len() < 2000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let f = f64::from_bits(state);
            if f.is_finite() {
                samples.push(f);
            }
        }

        let mismatches: Vec<f64> = samples
            .into_iter()
            .filter(|f| {
                round_trip(&SettingValue::Float(*f))
                    .and_then(|v| v.as_f64())
                    .map_or(true, |back| back.to_bits() != f.to_bits())
            })
            .collect();
        assert!(mismatches.is_empty(), "floats changed in storage: {:?}", mismatches);
    }

    #[test]
    fn test_empty_list_distinct_from_null() {
        assert_eq!(
            round_trip(&SettingValue::List(Vec::new())),
            Some(SettingValue::List(Vec::new()))
        );
        assert_eq!(round_trip(&SettingValue::Null), Some(SettingValue::Null));
    }

    #[test]
    fn test_nested_list_element_types() {
        let value = SettingValue::List(vec![
            SettingValue::Bool(false),
            SettingValue::String("2".to_string()),
            SettingValue::List(vec![SettingValue::Float(0.5), SettingValue::Null]),
        ]);
        assert_eq!(round_trip(&value), Some(value));
    }

    #[test]
    fn test_encoded_size_matches_encoding() {
        let value = SettingValue::from(vec!["alpha", "beta"]);
        let size = encoded_size(&value).unwrap_or(0);
        assert_eq!(size, encode(&value).map(|b| b.len()).unwrap_or(usize::MAX));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        assert!(matches!(
            encode(&SettingValue::Float(f64::NAN)),
            Err(CodecError::NonFiniteFloat(_))
        ));
        assert!(matches!(
            encoded_size(&SettingValue::from(vec![f64::INFINITY])),
            Err(CodecError::NonFiniteFloat(_))
        ));
    }

    #[test]
    fn test_untagged_payload_rejected() {
        assert!(decode(b"1").is_err());
        assert!(decode(br#"{"type":"integer","value":"1"}"#).is_err());
    }
}
