//! Typed numeric identifiers

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::ParseIntError,
    str::FromStr,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error as DeError, Visitor},
};

/// An entity identifier tagged with the entity type it belongs to.
///
/// The Iris API identifies everything by numeric id; the tag keeps a
/// `VariantId` from being passed where an `OrderId` is expected.
pub struct TypedId<T>(i64, PhantomData<T>);

impl<T> TypedId<T> {
    pub const fn new(raw: i64) -> Self {
        Self(raw, PhantomData)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<i64> for TypedId<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T> From<TypedId<T>> for i64 {
    fn from(value: TypedId<T>) -> Self {
        value.get()
    }
}

impl<T> FromStr for TypedId<T> {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse::<i64>().map(Self::new)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

// Ids arrive as JSON numbers from most endpoints and as numeric strings from
// a few older ones, so both are accepted. Non-numeric input is a decode
// error: an identifier is never coerced to a fallback value.
impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor<T>(PhantomData<T>);

        impl<T> Visitor<'_> for IdVisitor<T> {
            type Value = TypedId<T>;

            fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str("an integer id or a numeric string")
            }

            fn visit_i64<E: DeError>(self, value: i64) -> Result<Self::Value, E> {
                Ok(TypedId::new(value))
            }

            fn visit_u64<E: DeError>(self, value: u64) -> Result<Self::Value, E> {
                i64::try_from(value)
                    .map(TypedId::new)
                    .map_err(|_| E::custom(format!("id {value} out of range")))
            }

            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .parse::<i64>()
                    .map(TypedId::new)
                    .map_err(|_| E::custom(format!("invalid numeric id: {value:?}")))
            }
        }

        deserializer.deserialize_any(IdVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    struct Widget;

    type WidgetId = TypedId<Widget>;

    #[test]
    fn ids_with_same_value_are_equal() {
        assert_eq!(WidgetId::new(42), WidgetId::new(42));
        assert_ne!(WidgetId::new(42), WidgetId::new(43));
    }

    #[test]
    fn display_formats_the_raw_value() {
        assert_eq!(WidgetId::new(7).to_string(), "7");
    }

    #[test]
    fn parses_from_str() -> TestResult {
        let id: WidgetId = "42".parse()?;

        assert_eq!(id, WidgetId::new(42));

        Ok(())
    }

    #[test]
    fn deserializes_from_json_number() -> TestResult {
        let id: WidgetId = serde_json::from_str("42")?;

        assert_eq!(id, WidgetId::new(42));

        Ok(())
    }

    #[test]
    fn deserializes_from_numeric_string() -> TestResult {
        let id: WidgetId = serde_json::from_str("\"42\"")?;

        assert_eq!(id, WidgetId::new(42));

        Ok(())
    }

    #[test]
    fn rejects_non_numeric_string() {
        let result = serde_json::from_str::<WidgetId>("\"SKU-42\"");

        assert!(result.is_err(), "expected decode error, got {result:?}");
    }

    #[test]
    fn serializes_as_number() -> TestResult {
        let json = serde_json::to_string(&WidgetId::new(9))?;

        assert_eq!(json, "9");

        Ok(())
    }
}
