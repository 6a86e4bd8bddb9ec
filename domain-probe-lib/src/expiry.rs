//! Expiry date extraction from raw WHOIS text.
//!
//! WHOIS servers don't agree on a date format, so parsing happens in two
//! steps: a general pass over the ISO 8601 / RFC 3339 family plus the layouts
//! registries commonly use, then a strict `yyyy-MM-ddTHH` pass for responses
//! that truncate the time after the hour. Nothing else is attempted.

use crate::error::ProbeError;
use crate::types::{ExpiryLookup, ParseMethod};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

/// Labels that mark an expiry line, checked with a case-sensitive `contains`.
pub const EXPIRY_LABELS: &[&str] = &["Expiry Date", "Expiration Date", "Registry Expiry Date"];

lazy_static::lazy_static! {
    static ref STRICT_HOUR: Regex =
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})T(\d{2})$").expect("static regex is valid");
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Find the expiry field in a WHOIS response and parse it.
///
/// The first line containing any of [`EXPIRY_LABELS`] wins, even if a later
/// line carries a more specific label. The value is whatever follows the
/// first `:` on that line.
///
/// # Returns
///
/// * `Ok(ExpiryLookup::NotFound)` when no line carries a label, or the value is empty
/// * `Ok(ExpiryLookup::Found { .. })` with the parse method that succeeded
///
/// # Errors
///
/// Returns `ProbeError::ParseError` when the value matches neither the
/// general layouts nor the strict `yyyy-MM-ddTHH` layout.
pub fn extract_expiry(raw: &str) -> Result<ExpiryLookup, ProbeError> {
    let Some(line) = find_expiry_line(raw) else {
        return Ok(ExpiryLookup::NotFound);
    };

    let Some((_, value)) = line.split_once(':') else {
        return Err(ProbeError::parse(
            "expiry line has no ':' separator",
            line.trim(),
        ));
    };

    let value = value.trim();
    if value.is_empty() {
        return Ok(ExpiryLookup::NotFound);
    }

    let (expires_at, method) = parse_expiry_date(value)?;
    debug!("Parsed expiry '{}' with {} parser", value, method);
    Ok(ExpiryLookup::Found { expires_at, method })
}

/// First line of `raw` carrying an expiry label. Handles `\r\n`, `\r` and `\n`.
pub fn find_expiry_line(raw: &str) -> Option<&str> {
    raw.split(['\r', '\n'])
        .find(|line| EXPIRY_LABELS.iter().any(|label| line.contains(label)))
}

/// Parse an expiry value: general layouts first, then the strict hour-only layout.
pub fn parse_expiry_date(value: &str) -> Result<(DateTime<Utc>, ParseMethod), ProbeError> {
    if let Some(dt) = parse_standard(value) {
        return Ok((dt, ParseMethod::Standard));
    }

    if let Some(dt) = parse_strict_hour(value) {
        return Ok((dt, ParseMethod::Fallback));
    }

    Err(ProbeError::parse(
        "expiry date matches no known format",
        value,
    ))
}

/// Locale-independent general parse. Values without an offset are taken as UTC.
fn parse_standard(value: &str) -> Option<DateTime<Utc>> {
    let cleaned = value
        .trim()
        .trim_end_matches(" (UTC)")
        .trim_end_matches(" UTC")
        .trim_end_matches(" GMT");

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

/// Exactly `yyyy-MM-ddTHH`, nothing before or after.
fn parse_strict_hour(value: &str) -> Option<DateTime<Utc>> {
    let caps = STRICT_HOUR.captures(value)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;

    Some(
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, 0, 0)?
            .and_utc(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_registry_expiry_standard_parse() {
        let raw = "   Domain Name: EXAMPLE.COM\r\n   Registry Expiry Date: 2025-03-01T00:00:00Z\r\n   Registrar: RESERVED-Internet Assigned Numbers Authority\r\n";

        assert_eq!(
            extract_expiry(raw).unwrap(),
            ExpiryLookup::Found {
                expires_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
                method: ParseMethod::Standard,
            }
        );
    }

    #[test]
    fn test_hour_only_value_uses_fallback() {
        let raw = "Domain: example.com\nExpiry Date: 2025-03-01T00\n";

        assert_eq!(
            extract_expiry(raw).unwrap(),
            ExpiryLookup::Found {
                expires_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
                method: ParseMethod::Fallback,
            }
        );

        let (dt, method) = parse_expiry_date("2031-12-09T17").unwrap();
        assert_eq!(method, ParseMethod::Fallback);
        assert_eq!(dt, Utc.with_ymd_and_hms(2031, 12, 9, 17, 0, 0).unwrap());
    }

    #[test]
    fn test_no_label_is_not_found() {
        let raw = "Domain Name: EXAMPLE.COM\nCreation Date: 1995-08-14T04:00:00Z\n";
        assert_eq!(extract_expiry(raw).unwrap(), ExpiryLookup::NotFound);
        assert_eq!(extract_expiry("").unwrap(), ExpiryLookup::NotFound);
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let raw = "registry expiry date: 2025-03-01T00:00:00Z\n";
        assert_eq!(extract_expiry(raw).unwrap(), ExpiryLookup::NotFound);
    }

    #[test]
    fn test_empty_value_is_not_found() {
        let raw = "Registry Expiry Date:   \n";
        assert_eq!(extract_expiry(raw).unwrap(), ExpiryLookup::NotFound);
    }

    #[test]
    fn test_unparsable_value_is_error() {
        let err = extract_expiry("Expiration Date: not-a-date\n").unwrap_err();
        match err {
            ProbeError::ParseError { content, .. } => assert_eq!(content, "not-a-date"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_label_without_colon_is_error() {
        assert!(matches!(
            extract_expiry("Expiry Date 2025-03-01\n"),
            Err(ProbeError::ParseError { .. })
        ));
    }

    #[test]
    fn test_first_matching_line_wins() {
        // The earlier registrar line is used even though a registry line follows.
        let raw = "Registrar Registration Expiration Date: 2026-01-02\rRegistry Expiry Date: 2027-05-06T00:00:00Z\r";
        let ExpiryLookup::Found { expires_at, .. } = extract_expiry(raw).unwrap() else {
            panic!("expected a date");
        };
        assert_eq!(expires_at, Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let line = find_expiry_line("x\nRegistry Expiry Date: 2025-03-01T10:20:30Z\n").unwrap();
        assert_eq!(line, "Registry Expiry Date: 2025-03-01T10:20:30Z");

        let ExpiryLookup::Found { expires_at, .. } = extract_expiry(line).unwrap() else {
            panic!("expected a date");
        };
        assert_eq!(expires_at, Utc.with_ymd_and_hms(2025, 3, 1, 10, 20, 30).unwrap());
    }

    #[test]
    fn test_standard_layouts() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        for value in [
            "2025-03-01T00:00:00Z",
            "2025-03-01T00:00:00.000Z",
            "2025-03-01T03:00:00+03:00",
            "2025-03-01 00:00:00",
            "2025-03-01 00:00:00 UTC",
            "2025-03-01",
            "2025.03.01",
            "01-Mar-2025",
            "03/01/2025",
        ] {
            assert_eq!(
                parse_expiry_date(value).unwrap(),
                (expected, ParseMethod::Standard),
                "value: {}",
                value
            );
        }
    }

    #[test]
    fn test_strict_layout_rejects_near_misses() {
        assert!(parse_expiry_date("2025-3-1T00").is_err());
        assert!(parse_expiry_date("2025-13-01T00").is_err());
        assert!(parse_expiry_date("2025-03-01T7").is_err());
        assert!(parse_expiry_date("x2025-03-01T00").is_err());
    }
}
