//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct used to stamp log lines and
//! to name the dated log file.
//!
//! # Examples
//!
//! ```ignore
//! let dt = DateTimeUtc::from_unix(1_718_461_845);
//! assert_eq!(dt.to_compact_date(), "20240615");
//! assert_eq!(dt.to_clock(), "14:30:45");
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Current wall-clock time (UTC).
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(secs)
    }

    /// Convert seconds since the Unix epoch into a civil date.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;

        // Howard Hinnant's days-to-civil
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as u16;

        Self::new(
            year,
            month,
            day,
            (rem / 3600) as u8,
            ((rem % 3600) / 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Format as `YYYYMMDD`, the suffix of the dated log file.
    pub fn to_compact_date(self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    /// Format as `HH:MM:SS`.
    pub fn to_clock(self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unix_epoch() {
        assert_eq!(DateTimeUtc::from_unix(0), DateTimeUtc::new(1970, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_from_unix_known_date() {
        // 2024-06-15T14:30:45Z
        let dt = DateTimeUtc::from_unix(1_718_461_845);
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
        assert_eq!(dt.to_compact_date(), "20240615");
        assert_eq!(dt.to_clock(), "14:30:45");
    }

    #[test]
    fn test_from_unix_leap_day() {
        // 2024-02-29T00:00:00Z
        let dt = DateTimeUtc::from_unix(1_709_164_800);
        assert_eq!((dt.year, dt.month, dt.day), (2024, 2, 29));
    }

    #[test]
    fn test_from_unix_year_end() {
        // 2023-12-31T23:59:59Z
        let dt = DateTimeUtc::from_unix(1_704_067_199);
        assert_eq!(dt, DateTimeUtc::new(2023, 12, 31, 23, 59, 59));
    }
}
