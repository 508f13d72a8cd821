//! Integer request field, accepted leniently and type-checked during validation.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

/// An integer field as a client sent it.
///
/// Whole numbers and numeric strings (`5`, `"5"`, `5.0`) become `Value`.
/// Any other JSON value becomes `Invalid`, so validation can name the field
/// instead of failing the whole body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegerInput {
    #[default]
    Missing,
    Value(i64),
    Invalid,
}

impl IntegerInput {
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(IntegerInput::Value)
            .unwrap_or(IntegerInput::Invalid)
    }

    fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
            IntegerInput::Value(value as i64)
        } else {
            IntegerInput::Invalid
        }
    }
}

impl From<i32> for IntegerInput {
    fn from(value: i32) -> Self {
        IntegerInput::Value(i64::from(value))
    }
}

impl From<Option<i64>> for IntegerInput {
    fn from(value: Option<i64>) -> Self {
        value.map_or(IntegerInput::Missing, IntegerInput::Value)
    }
}

struct IntegerInputVisitor;

impl<'de> Visitor<'de> for IntegerInputVisitor {
    type Value = IntegerInput;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(IntegerInput::Value(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).map_or(IntegerInput::Invalid, IntegerInput::Value))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(IntegerInput::from_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(IntegerInput::parse(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(IntegerInput::Invalid)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(IntegerInput::Missing)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(IntegerInput::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(IntegerInput::Invalid)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(IntegerInput::Invalid)
    }
}

impl<'de> Deserialize<'de> for IntegerInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IntegerInputVisitor)
    }
}
