use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Fractional-second digits kept; `TIMESTAMPTZ` stores microseconds.
pub const STORED_SUBSEC_DIGITS: u16 = 6;

/// Parses an RFC 3339 timestamp and requires it to be expressed in UTC.
///
/// Naive timestamps (no offset) fail RFC 3339 parsing; timestamps carrying a
/// non-zero offset are rejected instead of being silently converted.
/// Sub-microsecond digits are truncated so a parsed value compares equal to
/// the same value read back from the store.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("`{raw}` is not an RFC 3339 timestamp with timezone: {e}"))?;
    if parsed.offset().local_minus_utc() != 0 {
        return Err(format!("`{raw}` is not a UTC timestamp"));
    }
    Ok(parsed.with_timezone(&Utc).trunc_subsecs(STORED_SUBSEC_DIGITS))
}

pub fn format_utc(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Serde adapter for required UTC timestamps.
pub mod utc_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_utc(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_utc(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for nullable UTC timestamps. `None` is written as `null`.
pub mod option_utc_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format_utc(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|raw| super::parse_utc(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_utc_accepts_zulu_and_zero_offset() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_utc("2024-05-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_utc("2024-05-01T12:30:00+00:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_utc_rejects_naive_and_offset_timestamps() {
        assert!(parse_utc("2024-05-01T12:30:00").is_err());
        assert!(parse_utc("2024-05-01T12:30:00+02:00").is_err());
        assert!(parse_utc("yesterday").is_err());
    }

    #[test]
    fn test_parse_utc_truncates_to_microseconds() {
        let parsed = parse_utc("2024-01-02T10:00:00.1234567Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(parsed, parse_utc("2024-01-02T10:00:00.123456Z").unwrap());

        let nanos = parse_utc("2024-01-02T10:00:00.999999999Z").unwrap();
        assert_eq!(nanos.timestamp_subsec_nanos(), 999_999_000);
        assert_eq!(nanos.timestamp(), parse_utc("2024-01-02T10:00:00Z").unwrap().timestamp());
    }

    #[test]
    fn test_format_utc_is_parseable() {
        let value = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let formatted = format_utc(&value);
        assert_eq!(formatted, "2023-12-31T23:59:59Z");
        assert_eq!(parse_utc(&formatted).unwrap(), value);
    }
}
