use chrono::prelude::*;
use chrono_tz::Tz;

pub fn is_valid_date(datestr: &str) -> anyhow::Result<(i32, u32, u32)> {
    let datestr = String::from(datestr);
    let dates = datestr.split('-').collect::<Vec<_>>();
    if dates.len() != 3 {
        return Err(anyhow::Error::msg(datestr));
    }
    let year = dates[0].parse();
    let month = dates[1].parse();
    let day = dates[2].parse();

    if year.is_err() || month.is_err() || day.is_err() {
        return Err(anyhow::Error::msg(datestr));
    }

    let year = year.unwrap();
    let month = month.unwrap();
    let day = day.unwrap();
    if !(1900..=2100).contains(&year) || month < 1 || month > 12 {
        return Err(anyhow::Error::msg(datestr));
    }

    let month_length = get_month_length(year, month);

    if day < 1 || day > month_length {
        return Err(anyhow::Error::msg(datestr));
    }

    Ok((year, month, day))
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month - 1 {
        0 => 31,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        2 => 31,
        3 => 30,
        4 => 31,
        5 => 30,
        6 => 31,
        7 => 31,
        8 => 30,
        9 => 31,
        10 => 30,
        11 => 31,
        _ => panic!("Invalid month"),
    }
}

/// The set of (month, day) pairs that make an event "upcoming" relative to
/// `reference`: one pair per day of the look-ahead window. When the current
/// year is not a leap year and Feb 29 would fall inside the window, a
/// synthetic Feb 29 pair is appended so that leap-day events still match.
pub fn reference_window(reference: NaiveDate, window_days: u32) -> Vec<(u32, u32)> {
    let mut month_day_set = Vec::with_capacity(window_days as usize + 1);

    for offset in 0..window_days {
        let date = reference + chrono::Duration::days(offset as i64);
        month_day_set.push((date.month(), date.day()));
    }

    if !is_leap_year(reference.year())
        && reference.month() == 2
        && reference.day() <= 29
        && 29 - reference.day() < window_days
    {
        month_day_set.push((2, 29));
    }

    month_day_set
}

/// The next occurrence date of a recurring (month, day) relative to
/// `reference`: same month/day in the reference year, or one year later when
/// that date has already passed. Feb 29 collapses to Feb 28 in years where
/// it does not exist.
pub fn upcoming_event_date(month: u32, day: u32, reference: NaiveDate) -> NaiveDate {
    let compose = |year: i32| {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| NaiveDate::from_ymd(year, 2, 28))
    };

    let candidate = compose(reference.year());
    if candidate < reference {
        compose(reference.year() + 1)
    } else {
        candidate
    }
}

/// UTC timestamp in millis of `date` at `post_time` in the given timezone.
/// An ambiguous local time (DST fold) resolves to the earliest valid
/// instant, a nonexistent one falls back to reading the local time as UTC.
pub fn occurrence_instant(date: NaiveDate, post_time: NaiveTime, tz: Tz) -> i64 {
    let local = date.and_time(post_time);
    match tz.from_local_datetime(&local).earliest() {
        Some(datetime) => datetime.timestamp_millis(),
        None => Utc.from_utc_datetime(&local).timestamp_millis(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_dates() {
        let valid_dates = vec![
            "2018-1-1",
            "2025-12-31",
            "2020-1-12",
            "2020-2-29",
            "2020-02-2",
            "2020-02-02",
            "2020-2-09",
        ];

        for date in &valid_dates {
            assert!(is_valid_date(date).is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_dates() {
        let invalid_dates = vec![
            "2018--1-1",
            "2020-1-32",
            "2020-2-30",
            "2021-2-29",
            "2020-0-1",
            "2020-1-0",
        ];

        for date in &invalid_dates {
            assert!(is_valid_date(date).is_err());
        }
    }

    #[test]
    fn upcoming_date_stays_in_year_when_not_passed() {
        let reference = NaiveDate::from_ymd(2024, 3, 15);
        assert_eq!(
            upcoming_event_date(3, 15, reference),
            NaiveDate::from_ymd(2024, 3, 15)
        );
        assert_eq!(
            upcoming_event_date(12, 1, reference),
            NaiveDate::from_ymd(2024, 12, 1)
        );
    }

    #[test]
    fn upcoming_date_rolls_over_when_passed() {
        let reference = NaiveDate::from_ymd(2024, 3, 15);
        assert_eq!(
            upcoming_event_date(3, 1, reference),
            NaiveDate::from_ymd(2025, 3, 1)
        );
    }

    #[test]
    fn upcoming_leap_day_collapses_in_non_leap_year() {
        let reference = NaiveDate::from_ymd(2025, 3, 1);
        assert_eq!(
            upcoming_event_date(2, 29, reference),
            NaiveDate::from_ymd(2026, 2, 28)
        );

        let reference = NaiveDate::from_ymd(2024, 1, 10);
        assert_eq!(
            upcoming_event_date(2, 29, reference),
            NaiveDate::from_ymd(2024, 2, 29)
        );
    }

    #[test]
    fn window_covers_consecutive_days() {
        let reference = NaiveDate::from_ymd(2024, 3, 30);
        assert_eq!(
            reference_window(reference, 3),
            vec![(3, 30), (3, 31), (4, 1)]
        );
    }

    #[test]
    fn window_injects_leap_day_in_non_leap_year() {
        // 2025 is not a leap year and Feb 29 falls inside the 3 day window
        let reference = NaiveDate::from_ymd(2025, 2, 27);
        assert_eq!(
            reference_window(reference, 3),
            vec![(2, 27), (2, 28), (3, 1), (2, 29)]
        );

        // Outside the window: no synthetic entry
        let reference = NaiveDate::from_ymd(2025, 2, 20);
        assert!(!reference_window(reference, 3).contains(&(2, 29)));

        // Leap year: Feb 29 is a real window day, no synthetic entry needed
        let reference = NaiveDate::from_ymd(2024, 2, 28);
        assert_eq!(
            reference_window(reference, 3),
            vec![(2, 28), (2, 29), (3, 1)]
        );
    }

    #[test]
    fn occurrence_instant_converts_local_post_time_to_utc() {
        let date = NaiveDate::from_ymd(2024, 6, 1);
        let post_time = NaiveTime::from_hms(10, 0, 0);
        let ts = occurrence_instant(date, post_time, chrono_tz::Europe::Oslo);

        // 10:00 Oslo summer time is 08:00 UTC
        let expected = Utc.ymd(2024, 6, 1).and_hms(8, 0, 0).timestamp_millis();
        assert_eq!(ts, expected);
    }
}
