//! Per-kind value conversion.
//!
//! [`FieldCodec`] is the conversion rule for one declared field kind, in both
//! directions: a value turns into a [`StoredValue`] on the way out and is
//! rebuilt from the stored string on the way in. One implementation exists
//! per supported kind:
//!
//! - signed and unsigned integers of every width (widened to 64 bits)
//! - floats (widened to `f64`)
//! - `bool`, `String`
//! - `chrono` date-times, formatted `YYYY-MM-DD HH:MM:SS` in local time
//! - `Option<T>` around any supported kind (`None` becomes [`StoredValue::Nil`])
//! - sequences and maps, carried as JSON text
//! - [`StoredValue`] itself, for dynamically-typed fields
//!
//! Composite record types get their implementation from
//! `#[derive(JsonField)]`, which routes through [`json_to_stored`] and
//! [`json_from_stored`].
//!
//! `i128`/`u128` are wider than the stored integer scalars and are rejected
//! in both directions rather than silently truncated.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::ValueError;
use super::value::StoredValue;

/// Text format for stored date-times.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Conversion between one field value and its stored scalar.
pub trait FieldCodec: Sized {
    /// Converts the value into its stored representation.
    fn to_stored(&self) -> Result<StoredValue, ValueError>;

    /// Rebuilds the value from the stored string.
    fn from_stored(raw: &str) -> Result<Self, ValueError>;
}

macro_rules! int_codec {
    ($($ty:ty),+ $(,)?) => {$(
        impl FieldCodec for $ty {
            fn to_stored(&self) -> Result<StoredValue, ValueError> {
                Ok(StoredValue::Int(*self as i64))
            }

            fn from_stored(raw: &str) -> Result<Self, ValueError> {
                let wide = raw
                    .parse::<i64>()
                    .map_err(|_| ValueError::parse("integer", raw))?;
                Ok(wide as $ty)
            }
        }
    )+};
}

macro_rules! uint_codec {
    ($($ty:ty),+ $(,)?) => {$(
        impl FieldCodec for $ty {
            fn to_stored(&self) -> Result<StoredValue, ValueError> {
                Ok(StoredValue::Uint(*self as u64))
            }

            fn from_stored(raw: &str) -> Result<Self, ValueError> {
                let wide = raw
                    .parse::<u64>()
                    .map_err(|_| ValueError::parse("unsigned integer", raw))?;
                Ok(wide as $ty)
            }
        }
    )+};
}

macro_rules! float_codec {
    ($($ty:ty),+ $(,)?) => {$(
        impl FieldCodec for $ty {
            fn to_stored(&self) -> Result<StoredValue, ValueError> {
                Ok(StoredValue::Float(*self as f64))
            }

            fn from_stored(raw: &str) -> Result<Self, ValueError> {
                let wide = raw
                    .parse::<f64>()
                    .map_err(|_| ValueError::parse("float", raw))?;
                Ok(wide as $ty)
            }
        }
    )+};
}

// 128-bit integers do not fit the stored integer scalars.
macro_rules! unsupported_codec {
    ($($ty:ty),+ $(,)?) => {$(
        impl FieldCodec for $ty {
            fn to_stored(&self) -> Result<StoredValue, ValueError> {
                Err(ValueError::Unsupported)
            }

            fn from_stored(_raw: &str) -> Result<Self, ValueError> {
                Err(ValueError::Unsupported)
            }
        }
    )+};
}

int_codec!(i8, i16, i32, i64, isize);
uint_codec!(u8, u16, u32, u64, usize);
float_codec!(f32, f64);
unsupported_codec!(i128, u128);

impl FieldCodec for bool {
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        Ok(StoredValue::Bool(*self))
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        parse_bool_literal(raw).ok_or_else(|| ValueError::parse("boolean", raw))
    }
}

/// Recognized boolean literals, matching what hash stores hand back.
fn parse_bool_literal(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl FieldCodec for String {
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        Ok(StoredValue::Str(self.clone()))
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        Ok(raw.to_owned())
    }
}

impl FieldCodec for NaiveDateTime {
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        Ok(StoredValue::Str(self.format(DATETIME_FORMAT).to_string()))
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
            .map_err(|_| ValueError::parse("date-time", raw))
    }
}

impl FieldCodec for DateTime<Local> {
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        Ok(StoredValue::Str(self.format(DATETIME_FORMAT).to_string()))
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        let naive = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
            .map_err(|_| ValueError::parse("date-time", raw))?;
        // Wall times that do not exist in the local zone are a parse failure;
        // ambiguous ones resolve to the earlier instant.
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| ValueError::parse("date-time", raw))
    }
}

impl<T: FieldCodec> FieldCodec for Option<T> {
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        match self {
            Some(value) => value.to_stored(),
            None => Ok(StoredValue::Nil),
        }
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        T::from_stored(raw).map(Some)
    }
}

impl<T> FieldCodec for Vec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        json_to_stored(self)
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        json_from_stored(raw)
    }
}

impl<K, V> FieldCodec for HashMap<K, V>
where
    K: Eq + Hash + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        json_to_stored(self)
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        json_from_stored(raw)
    }
}

/// Dynamically-typed field: the value passes through unconverted on encode,
/// and the raw stored string is kept as-is on decode.
impl FieldCodec for StoredValue {
    fn to_stored(&self) -> Result<StoredValue, ValueError> {
        Ok(self.clone())
    }

    fn from_stored(raw: &str) -> Result<Self, ValueError> {
        Ok(StoredValue::Str(raw.to_owned()))
    }
}

/// Serializes a composite value into one stored field as JSON text.
pub fn json_to_stored<T: Serialize>(value: &T) -> Result<StoredValue, ValueError> {
    Ok(StoredValue::Str(serde_json::to_string(value)?))
}

/// Rebuilds a composite value from JSON text stored in one field.
pub fn json_from_stored<T: DeserializeOwned>(raw: &str) -> Result<T, ValueError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_int_widths_round_trip() {
        assert_eq!(i8::from_stored("-7").unwrap(), -7);
        assert_eq!(i64::from_stored("42").unwrap(), 42);
        assert_eq!(42_i32.to_stored().unwrap(), StoredValue::Int(42));
    }

    #[test]
    fn test_int_decode_truncates_to_width() {
        // 300 does not fit an i8; the cast keeps the low bits.
        assert_eq!(i8::from_stored("300").unwrap(), 300_i64 as i8);
    }

    #[test]
    fn test_int_rejects_non_numeric() {
        let err = i64::from_stored("abc").unwrap_err();
        assert!(matches!(err, ValueError::Parse { .. }));
    }

    #[test]
    fn test_uint_rejects_negative() {
        assert!(u32::from_stored("-1").is_err());
        assert_eq!(u32::from_stored("1").unwrap(), 1);
    }

    #[test]
    fn test_float_round_trip() {
        let stored = 3.1415_f64.to_stored().unwrap();
        assert_eq!(stored, StoredValue::Float(3.1415));
        assert_eq!(f64::from_stored("3.1415").unwrap(), 3.1415);
        assert_eq!(f32::from_stored("2.5").unwrap(), 2.5_f32);
    }

    #[test]
    fn test_bool_literal_set() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(bool::from_stored(raw).unwrap(), true, "raw={}", raw);
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(bool::from_stored(raw).unwrap(), false, "raw={}", raw);
        }
        assert!(bool::from_stored("yes").is_err());
        assert!(bool::from_stored("").is_err());
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(String::from_stored("william").unwrap(), "william");
        assert_eq!(
            "wade".to_string().to_stored().unwrap(),
            StoredValue::Str("wade".into())
        );
    }

    #[test]
    fn test_naive_datetime_format() {
        let parsed = NaiveDateTime::from_stored("2019-05-23 10:20:30").unwrap();
        assert_eq!(parsed.year(), 2019);
        assert_eq!(parsed.hour(), 10);
        assert_eq!(
            parsed.to_stored().unwrap(),
            StoredValue::Str("2019-05-23 10:20:30".into())
        );
    }

    #[test]
    fn test_local_datetime_parses_in_local_zone() {
        let parsed = <DateTime<Local>>::from_stored("2019-05-23 10:20:30").unwrap();
        assert_eq!(parsed.year(), 2019);
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn test_datetime_rejects_wrong_format() {
        assert!(NaiveDateTime::from_stored("2019-05-23T10:20:30").is_err());
        assert!(NaiveDateTime::from_stored("not a time").is_err());
    }

    #[test]
    fn test_option_none_is_nil() {
        let absent: Option<i64> = None;
        assert_eq!(absent.to_stored().unwrap(), StoredValue::Nil);
        assert_eq!(Some(5_i64).to_stored().unwrap(), StoredValue::Int(5));
        assert_eq!(<Option<i64>>::from_stored("5").unwrap(), Some(5));
    }

    #[test]
    fn test_option_propagates_inner_failure() {
        assert!(<Option<i64>>::from_stored("abc").is_err());
    }

    #[test]
    fn test_vec_as_json() {
        let tags = vec!["william".to_string(), "wade".to_string()];
        assert_eq!(
            tags.to_stored().unwrap(),
            StoredValue::Str(r#"["william","wade"]"#.into())
        );

        let back = <Vec<String>>::from_stored(r#"["william", "wade"]"#).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[1], "wade");
    }

    #[test]
    fn test_map_as_json() {
        let mut scores: HashMap<String, i64> = HashMap::new();
        scores.insert("wade".into(), 100);

        let stored = scores.to_stored().unwrap();
        let back = <HashMap<String, i64>>::from_stored(&stored.to_string()).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = <Vec<String>>::from_stored("[truncated").unwrap_err();
        assert!(matches!(err, ValueError::Json(_)));
    }

    #[test]
    fn test_dynamic_value_passes_through() {
        let dynamic = StoredValue::Int(42);
        assert_eq!(dynamic.to_stored().unwrap(), StoredValue::Int(42));
        assert_eq!(
            StoredValue::from_stored("anything").unwrap(),
            StoredValue::Str("anything".into())
        );
    }

    #[test]
    fn test_128_bit_integers_are_unsupported() {
        assert!(matches!(
            1_i128.to_stored().unwrap_err(),
            ValueError::Unsupported
        ));
        assert!(matches!(
            u128::from_stored("1").unwrap_err(),
            ValueError::Unsupported
        ));
    }
}
