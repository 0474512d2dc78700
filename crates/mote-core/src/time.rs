//! Clock digits and time formatting.

use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Number of digit positions on the clock face (HH MM SS).
pub const DIGIT_COUNT: usize = 6;

/// Time format for the clock display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl TimeFormat {
    /// Toggle between 12-hour and 24-hour format.
    pub fn toggle(&self) -> Self {
        match self {
            TimeFormat::TwentyFourHour => TimeFormat::TwelveHour,
            TimeFormat::TwelveHour => TimeFormat::TwentyFourHour,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "24h",
            TimeFormat::TwelveHour => "12h",
        }
    }
}

/// The six digits currently shown on the clock, hour tens first.
///
/// Every digit is always within 0-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedTime([u8; DIGIT_COUNT]);

impl DisplayedTime {
    /// All nines. Used as the initial state so the first real sample
    /// transitions every position that does not literally show a 9.
    pub const SENTINEL: DisplayedTime = DisplayedTime([9; DIGIT_COUNT]);

    /// Build from raw digits, rejecting anything above 9.
    pub fn new(digits: [u8; DIGIT_COUNT]) -> Option<Self> {
        digits.iter().all(|d| *d <= 9).then_some(Self(digits))
    }

    /// Sample the digits of a wall-clock time.
    pub fn from_time<T: Timelike>(time: &T, format: TimeFormat) -> Self {
        let hours = match format {
            TimeFormat::TwentyFourHour => time.hour(),
            TimeFormat::TwelveHour => time.hour12().1,
        };
        Self::from_hms(hours, time.minute(), time.second())
    }

    fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        // Leap seconds surface as 60 in some sources
        let (h, m, s) = (hours.min(23), minutes.min(59), seconds.min(59));
        Self([
            (h / 10) as u8,
            (h % 10) as u8,
            (m / 10) as u8,
            (m % 10) as u8,
            (s / 10) as u8,
            (s % 10) as u8,
        ])
    }

    pub fn digit(&self, position: usize) -> u8 {
        self.0[position]
    }

    pub fn digits(&self) -> [u8; DIGIT_COUNT] {
        self.0
    }

    /// Positions whose digit differs in `next`, in ascending order.
    pub fn changed_positions<'a>(
        &'a self,
        next: &'a DisplayedTime,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..DIGIT_COUNT).filter(move |&i| self.0[i] != next.0[i])
    }
}

impl Default for DisplayedTime {
    fn default() -> Self {
        Self::SENTINEL
    }
}

impl fmt::Display for DisplayedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        write!(f, "{}{}:{}{}:{}{}", d[0], d[1], d[2], d[3], d[4], d[5])
    }
}

/// Error returned when a digit string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeError(String);

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected six digits (HHMMSS or HH:MM:SS), got {:?}", self.0)
    }
}

impl std::error::Error for ParseTimeError {}

impl FromStr for DisplayedTime {
    type Err = ParseTimeError;

    /// Accepts `"123456"` as well as `"12:34:56"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());
        let digits: Vec<u8> = s
            .chars()
            .filter(|c| *c != ':')
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(err)?;
        let digits: [u8; DIGIT_COUNT] = digits.try_into().map_err(|_| err())?;
        Ok(Self(digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(s: &str) -> DisplayedTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_only_changed_positions_reported() {
        let prev = t("123456");
        let next = t("123457");
        assert_eq!(prev.changed_positions(&next).collect::<Vec<_>>(), vec![5]);

        let prev = t("095959");
        let next = t("100000");
        assert_eq!(
            prev.changed_positions(&next).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_identical_times_have_no_changes() {
        let a = t("23:59:59");
        assert_eq!(a.changed_positions(&a).count(), 0);
    }

    #[test]
    fn test_sentinel_first_sample() {
        let first = DisplayedTime::from_time(
            &NaiveTime::from_hms_opt(2, 7, 59).unwrap(),
            TimeFormat::TwentyFourHour,
        );
        assert_eq!(first.digits(), [0, 2, 0, 7, 5, 9]);
        // The trailing 9 already matches the sentinel
        assert_eq!(
            DisplayedTime::SENTINEL
                .changed_positions(&first)
                .collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_twelve_hour_format() {
        let afternoon = NaiveTime::from_hms_opt(15, 4, 5).unwrap();
        assert_eq!(
            DisplayedTime::from_time(&afternoon, TimeFormat::TwelveHour).to_string(),
            "03:04:05"
        );
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(
            DisplayedTime::from_time(&midnight, TimeFormat::TwelveHour).to_string(),
            "12:00:00"
        );
        assert_eq!(
            DisplayedTime::from_time(&midnight, TimeFormat::TwentyFourHour).to_string(),
            "00:00:00"
        );
    }

    #[test]
    fn test_leap_second_is_clamped() {
        let leap = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        let shown = DisplayedTime::from_time(&leap, TimeFormat::TwentyFourHour);
        assert!(shown.digits().iter().all(|d| *d <= 9));
        assert_eq!(shown.to_string(), "23:59:59");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("12345".parse::<DisplayedTime>().is_err());
        assert!("12:34:5a".parse::<DisplayedTime>().is_err());
        assert!("1234567".parse::<DisplayedTime>().is_err());
        assert!(DisplayedTime::new([1, 2, 3, 4, 5, 10]).is_none());
    }

    #[test]
    fn test_toggle_format() {
        assert_eq!(TimeFormat::default().toggle(), TimeFormat::TwelveHour);
        assert_eq!(TimeFormat::TwelveHour.toggle(), TimeFormat::TwentyFourHour);
    }
}
