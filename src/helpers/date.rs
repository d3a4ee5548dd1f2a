//! Date helper functions

use chrono::NaiveDateTime;

/// Format a date in long English form (like "January 5, 2024")
pub fn long_date(date: &NaiveDateTime) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date(&at(2024, 1, 15)), "January 15, 2024");
        assert_eq!(long_date(&at(2023, 7, 4)), "July 4, 2023");
        assert_eq!(long_date(&at(1999, 12, 31)), "December 31, 1999");
    }
}
