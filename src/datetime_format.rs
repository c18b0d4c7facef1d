use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
    /// `Tue 05, 21, 2019 9:30PM`
    #[default]
    Medium,
}

pub fn format_datetime(value: &DateTime<Utc>, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
    };
    value.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::utc;

    #[test]
    fn test_full_format() {
        let value = utc(2019, 5, 21, 21, 30);
        assert_eq!(
            format_datetime(&value, DateFormat::Full),
            "Tuesday May, 21, 2019 at 9:30PM"
        );
    }

    #[test]
    fn test_medium_format() {
        let value = utc(2035, 4, 1, 8, 5);
        assert_eq!(
            format_datetime(&value, DateFormat::Medium),
            "Sun 04, 01, 2035 8:05AM"
        );
    }
}
