//! Time utilities: placing calendar dates at local hours.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Place a calendar date at a local hour in `tz` and return the UTC instant.
pub fn local_date_at_hour_to_utc(date: NaiveDate, hour: u32, tz: Tz) -> Result<DateTime<Utc>> {
    let ndt = date
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid hour of day: {hour}"))?;

    let local = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {ndt} {tz}"))?;

    Ok(local.with_timezone(&Utc))
}

/// Parse an IANA timezone name like "Asia/Kolkata".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kolkata_morning_maps_to_utc() {
        // IST is UTC+5:30 year-round.
        let tz = parse_timezone("Asia/Kolkata").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let utc = local_date_at_hour_to_utc(date, 9, tz).unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-06-09T03:30:00+00:00");
    }

    #[test]
    fn test_invalid_hour_is_rejected() {
        let tz = parse_timezone("UTC").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert!(local_date_at_hour_to_utc(date, 24, tz).is_err());
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        assert!(parse_timezone("Mars/Olympus").is_err());
    }
}
