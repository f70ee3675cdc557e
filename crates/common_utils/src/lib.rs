//! Utilities shared across the membership billing crates.

#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::expect_used,
    clippy::panic,
    clippy::unwrap_used
)]

pub mod consts;
pub mod enums;
pub mod errors;
pub mod types;

/// Generate a nanoid with the given prefix and length.
#[inline]
pub fn generate_id(length: usize, prefix: &str) -> String {
    format!("{}_{}", prefix, nanoid::nanoid!(length, &consts::ALPHABETS))
}

/// Generate a nanoid with the given prefix and a default length.
#[inline]
pub fn generate_id_with_default_len(prefix: &str) -> String {
    generate_id(consts::ID_LENGTH, prefix)
}

/// Date-time utilities.
pub mod date_time {
    use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

    use crate::errors::{CustomResult, ParsingError};

    /// Create a new [`PrimitiveDateTime`] with the current date and time in UTC.
    pub fn now() -> PrimitiveDateTime {
        let utc_date_time = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(utc_date_time.date(), utc_date_time.time())
    }

    /// Add whole calendar months to a date, clamping the day of month to the
    /// length of the target month (Jan 31 + 1 month resolves to Feb 28/29).
    pub fn add_calendar_months(date: Date, months: u32) -> CustomResult<Date, ParsingError> {
        let zero_based_month = i64::from(u8::from(date.month())) - 1 + i64::from(months);
        let year = date.year() + i32::try_from(zero_based_month / 12).unwrap_or_default();
        let month = Month::try_from(u8::try_from(zero_based_month % 12 + 1).unwrap_or(1))
            .map_err(|_| error_stack::report!(ParsingError))?;
        let day = date.day().min(days_in_month(year, month));
        Date::from_calendar_date(year, month, day)
            .map_err(|_| error_stack::report!(ParsingError))
    }

    /// Render a date as `YYYY-MM-DD`.
    pub fn format_ymd(date: Date) -> CustomResult<String, ParsingError> {
        date.format(&time::macros::format_description!(
            "[year]-[month]-[day]"
        ))
        .map_err(|_| error_stack::report!(ParsingError))
    }

    fn days_in_month(year: i32, month: Month) -> u8 {
        match month {
            Month::January
            | Month::March
            | Month::May
            | Month::July
            | Month::August
            | Month::October
            | Month::December => 31,
            Month::April | Month::June | Month::September | Month::November => 30,
            Month::February => {
                if time::util::is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use time::macros::date;

        use super::*;

        #[test]
        fn month_addition_clamps_day_of_month() {
            let next = add_calendar_months(date!(2026 - 01 - 31), 1).unwrap();
            assert_eq!(next, date!(2026 - 02 - 28));

            let leap = add_calendar_months(date!(2024 - 01 - 31), 1).unwrap();
            assert_eq!(leap, date!(2024 - 02 - 29));
        }

        #[test]
        fn month_addition_rolls_over_year() {
            let next = add_calendar_months(date!(2025 - 12 - 15), 1).unwrap();
            assert_eq!(next, date!(2026 - 01 - 15));
        }

        #[test]
        fn ymd_format_is_zero_padded() {
            assert_eq!(format_ymd(date!(2026 - 03 - 05)).unwrap(), "2026-03-05");
        }
    }
}
