//! Time keeping module for the clock face

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike, Utc};
use embassy_time::Instant;

/// Wall-clock source
pub trait Clock {
    /// Current local time
    fn now(&self) -> NaiveDateTime;
}

/// Hours and minutes shown by the hands
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct ClockReading {
    /// Hours in 12-hour form
    pub hours: u8,
    pub minutes: u8,
}

impl ClockReading {
    /// Sample hours and minutes from a calendar time
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self {
            hours: fold_hour(time.hour() as u8),
            minutes: time.minute() as u8,
        }
    }
}

/// Fold a 24-hour value onto the 12-hour dial.
///
/// Midnight stays 0 and noon stays 12, both point straight up.
pub fn fold_hour(hour: u8) -> u8 {
    if hour > 12 {
        hour - 12
    } else {
        hour
    }
}

/// Scale an hour out of 12 to the 0–60 range of the minute hand
pub fn hours_to_minutes(hours: u8) -> u8 {
    (hours as u16 * 60 / 12) as u8
}

/// Wall-clock time paired with the system time it was taken at
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime, taken at `instant`
    pub fn new(time: NaiveDateTime, instant: Instant) -> Self {
        Self { time, instant }
    }

    /// Create new time reference from seconds since the epoch plus a timezone offset
    pub fn from_timestamp(epoch: i64, offset_secs: i32, instant: Instant) -> Self {
        let unix_epoch = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
        let time = unix_epoch
            .checked_add_signed(TimeDelta::seconds(epoch + offset_secs as i64))
            .unwrap_or(unix_epoch);
        Self { time, instant }
    }
}

pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement from a known reference
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Clock time at the given system time
    pub fn time_at(&self, now: Instant) -> NaiveDateTime {
        let elapsed = now.saturating_duration_since(self.reference.instant);
        self.reference
            .time
            .checked_add_signed(TimeDelta::microseconds(elapsed.as_micros() as i64))
            .unwrap_or(self.reference.time)
    }
}

impl Clock for TimeManager {
    fn now(&self) -> NaiveDateTime {
        self.time_at(Instant::now())
    }
}

/// Turns frequent wall-clock polling into one notification per elapsed minute
#[derive(Debug, Default)]
pub struct MinuteTicker {
    /// Hour and minute of the last notification
    last: Option<(u32, u32)>,
}

impl MinuteTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticker that stays quiet until the minute after `time`
    pub fn starting_at(time: NaiveDateTime) -> Self {
        Self {
            last: Some((time.hour(), time.minute())),
        }
    }

    /// Return the time if a new minute started since the last notification.
    ///
    /// The first poll always notifies.
    pub fn poll(&mut self, time: NaiveDateTime) -> Option<NaiveDateTime> {
        let current = (time.hour(), time.minute());
        if self.last == Some(current) {
            return None;
        }
        self.last = Some(current);
        Some(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use embassy_time::Duration;
    use rstest::rstest;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(11, 11)]
    #[case(12, 12)]
    #[case(13, 1)]
    #[case(18, 6)]
    #[case(23, 11)]
    fn folds_afternoon_hours(#[case] hour: u8, #[case] expected: u8) {
        assert_eq!(fold_hour(hour), expected);
    }

    #[test]
    fn folded_hours_stay_on_dial() {
        for hour in 0..24 {
            assert!(fold_hour(hour) <= 12);
        }
    }

    #[test]
    fn hours_to_minutes_is_exact_and_monotonic() {
        let mut previous = 0;
        for hours in 0..=12u8 {
            let scaled = hours_to_minutes(hours);
            assert_eq!(scaled as u32 * 12, hours as u32 * 60);
            assert!(scaled >= previous);
            previous = scaled;
        }
        assert_eq!(hours_to_minutes(12), 60);
    }

    #[test]
    fn reading_from_afternoon_time() {
        assert_eq!(
            ClockReading::from_time(&at(3, 15, 0)),
            ClockReading { hours: 3, minutes: 15 }
        );
        assert_eq!(
            ClockReading::from_time(&at(13, 0, 0)),
            ClockReading { hours: 1, minutes: 0 }
        );
    }

    #[test]
    fn reference_advances_with_system_time() {
        let manager = TimeManager::init(TimeReference::new(at(9, 59, 30), Instant::from_secs(5)));
        assert_eq!(manager.time_at(Instant::from_secs(5)), at(9, 59, 30));
        assert_eq!(
            manager.time_at(Instant::from_secs(5) + Duration::from_secs(45)),
            at(10, 0, 15)
        );
    }

    #[test]
    fn time_before_reference_is_clamped() {
        let manager = TimeManager::init(TimeReference::new(at(7, 0, 0), Instant::from_secs(10)));
        assert_eq!(manager.time_at(Instant::from_secs(2)), at(7, 0, 0));
    }

    #[test]
    fn timestamp_reference_applies_offset() {
        let reference = TimeReference::from_timestamp(0, 3_600, Instant::from_ticks(0));
        let manager = TimeManager::init(reference);
        assert_eq!(
            manager.time_at(Instant::from_ticks(0)),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(1, 0, 0).unwrap()
        );
    }

    #[test]
    fn ticker_fires_once_per_minute() {
        let mut ticker = MinuteTicker::new();
        assert_eq!(ticker.poll(at(8, 30, 10)), Some(at(8, 30, 10)));
        assert_eq!(ticker.poll(at(8, 30, 11)), None);
        assert_eq!(ticker.poll(at(8, 30, 59)), None);
        assert_eq!(ticker.poll(at(8, 31, 0)), Some(at(8, 31, 0)));
        assert_eq!(ticker.poll(at(8, 31, 1)), None);
    }

    #[test]
    fn ticker_started_mid_minute_waits_for_next() {
        let mut ticker = MinuteTicker::starting_at(at(23, 59, 40));
        assert_eq!(ticker.poll(at(23, 59, 41)), None);
        assert_eq!(ticker.poll(at(0, 0, 0)), Some(at(0, 0, 0)));
    }
}
