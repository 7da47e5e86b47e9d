//! Canonical encoding of records for signing and hashing
//!
//! Every byte that gets signed or hashed goes through [`to_canonical_bytes`].
//! The output is compact JSON with object keys written in sorted order at every
//! nesting level, so logically equal records always produce identical bytes no
//! matter how the value was built.

use crate::error::{ChainError, Result};
use serde::{ser, Serialize, Serializer};
use serde_json::Value;

/// Encode any serializable record into its canonical byte form.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(record: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(record)?;
    let mut out = Vec::new();
    write_value(&value, &mut out)?;
    Ok(out)
}

/// Same as [`to_canonical_bytes`], returned as text for display.
pub fn to_canonical_string<T: Serialize + ?Sized>(record: &T) -> Result<String> {
    let bytes = to_canonical_bytes(record)?;
    String::from_utf8(bytes).map_err(|e| ChainError::EncodingError(e.to_string()))
}

/// `serialize_with` guard for every `f64` field of a signed or hashed record.
///
/// NaN and infinities have no JSON form; `serde_json::to_value` would write
/// them all as `null`, so they are refused here instead.
pub fn finite_f64<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(ser::Error::custom(format!(
            "non-finite number {} has no canonical encoding",
            value
        )));
    }
    serializer.serialize_f64(*value)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, key)?;
                out.push(b':');
                write_value(item, out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
        }
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }
    Ok(())
}
