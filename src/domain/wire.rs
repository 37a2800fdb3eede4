//! Serde helpers for loosely-typed wire fields.
//!
//! Different generations of the Iris API disagree about whether numeric
//! fields are numbers or strings. These helpers coerce either form, and
//! map null, absent, and unparseable values to zero instead of letting
//! garbage propagate.

use jiff::{Timestamp, civil, tz::TimeZone};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    fn into_decimal(self) -> Decimal {
        match self {
            Self::Int(value) => Decimal::from(value),
            Self::Float(value) => Decimal::from_f64_retain(value)
                .map(|decimal| decimal.round_dp(4))
                .unwrap_or_default(),
            Self::Text(value) => value.trim().parse().unwrap_or_default(),
        }
    }

    fn into_int(self) -> i64 {
        match self {
            Self::Int(value) => value,
            other => other.into_decimal().trunc().to_i64().unwrap_or_default(),
        }
    }
}

pub(crate) fn loose_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseNumber>::deserialize(deserializer)?
        .map(LooseNumber::into_decimal)
        .unwrap_or_default())
}

pub(crate) fn loose_decimal_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseNumber>::deserialize(deserializer)?.map(LooseNumber::into_decimal))
}

pub(crate) fn loose_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseNumber>::deserialize(deserializer)?
        .map(LooseNumber::into_int)
        .unwrap_or_default())
}

pub(crate) fn loose_int_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseNumber>::deserialize(deserializer)?.map(LooseNumber::into_int))
}

/// Truthiness for flags that may arrive as a bool, a 0/1 integer, or a
/// string; null means "not specified" and reads as active.
pub(crate) fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LooseBool {
        Flag(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<LooseBool>::deserialize(deserializer)? {
        None => true,
        Some(LooseBool::Flag(value)) => value,
        Some(LooseBool::Int(value)) => value != 0,
        Some(LooseBool::Text(value)) => !value.is_empty(),
    })
}

pub(crate) const fn default_true() -> bool {
    true
}

/// Timestamps usually arrive as RFC 3339; a few older deployments send
/// bare datetimes, which are taken as UTC. Unparseable input reads as
/// "no timestamp" rather than failing the whole payload.
pub(crate) fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Some(timestamp);
    }

    raw.parse::<civil::DateTime>()
        .ok()
        .and_then(|datetime| datetime.to_zoned(TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "loose_decimal")]
        price: Decimal,
        #[serde(default, deserialize_with = "loose_int_opt")]
        stock: Option<i64>,
        #[serde(default = "default_true", deserialize_with = "loose_bool")]
        active: bool,
    }

    fn probe(json: &str) -> Result<Probe, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn decimal_accepts_numbers_and_numeric_strings() -> TestResult {
        assert_eq!(probe(r#"{"price": 199.5}"#)?.price, Decimal::new(1995, 1));
        assert_eq!(probe(r#"{"price": "199.50"}"#)?.price, Decimal::new(19950, 2));
        assert_eq!(probe(r#"{"price": 120}"#)?.price, Decimal::from(120));

        Ok(())
    }

    #[test]
    fn decimal_falls_back_to_zero_on_garbage() -> TestResult {
        assert_eq!(probe(r#"{"price": "N/A"}"#)?.price, Decimal::ZERO);
        assert_eq!(probe(r#"{"price": null}"#)?.price, Decimal::ZERO);
        assert_eq!(probe(r"{}")?.price, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn int_coerces_strings_and_floats() -> TestResult {
        assert_eq!(probe(r#"{"stock": "12"}"#)?.stock, Some(12));
        assert_eq!(probe(r#"{"stock": 3.9}"#)?.stock, Some(3));
        assert_eq!(probe(r#"{"stock": "soon"}"#)?.stock, Some(0));
        assert_eq!(probe(r"{}")?.stock, None);

        Ok(())
    }

    #[test]
    fn bool_reads_flags_ints_and_absence() -> TestResult {
        assert!(probe(r"{}")?.active);
        assert!(probe(r#"{"active": null}"#)?.active);
        assert!(probe(r#"{"active": 1}"#)?.active);
        assert!(!probe(r#"{"active": 0}"#)?.active);
        assert!(!probe(r#"{"active": false}"#)?.active);

        Ok(())
    }

    #[test]
    fn rfc3339_and_bare_datetimes_parse_to_the_same_instant() {
        let rfc = parse_timestamp("2025-09-30T07:23:45.000Z");
        let bare = parse_timestamp("2025-09-30 07:23:45");

        assert_eq!(rfc, bare);
        assert!(rfc.is_some());
    }

    #[test]
    fn an_unparseable_timestamp_reads_as_none() {
        assert_eq!(parse_timestamp("yesterday-ish"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
