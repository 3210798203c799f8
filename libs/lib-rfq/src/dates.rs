use chrono::NaiveDate;

struct DateFormat {
    pattern: &'static str,
    separator: char,
    year_digits: usize,
}

/// Two-digit years from here up are 19xx, below it 20xx.
const CENTURY_PIVOT: i32 = 69;

/// Tried in order, first full parse wins. Two-digit years are widened to four
/// digits before parsing, so every pattern takes `%Y`.
const DATE_FORMATS: [DateFormat; 5] = [
    DateFormat { pattern: "%d/%m/%Y", separator: '/', year_digits: 4 },
    DateFormat { pattern: "%d-%m-%Y", separator: '-', year_digits: 4 },
    DateFormat { pattern: "%d.%m.%Y", separator: '.', year_digits: 4 },
    DateFormat { pattern: "%d/%m/%Y", separator: '/', year_digits: 2 },
    DateFormat { pattern: "%d-%m-%Y", separator: '-', year_digits: 2 },
];

impl DateFormat {
    fn parse(&self, text: &str) -> Option<NaiveDate> {
        // chrono accepts 1-4 digit years for %Y, so pin the width explicitly
        let year = text.rsplit(self.separator).next()?;
        if year.len() != self.year_digits || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        if self.year_digits == 2 {
            let short: i32 = year.parse().ok()?;
            let full = if short >= CENTURY_PIVOT { 1900 + short } else { 2000 + short };
            let widened = format!("{}{}", &text[..text.len() - year.len()], full);
            return NaiveDate::parse_from_str(&widened, self.pattern).ok();
        }

        NaiveDate::parse_from_str(text, self.pattern).ok()
    }
}

/// Parse a day-first sheet date such as `05/03/2024`, `5-3-24` or `05.03.2024`.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().find_map(|format| format.parse(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first_formats() {
        assert_eq!(parse_flexible_date("05/03/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_flexible_date("05-03-2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_flexible_date("05.03.2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_flexible_date(" 5/3/2024 "), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(parse_flexible_date("05/03/24"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_flexible_date("31-12-99"), Some(ymd(1999, 12, 31)));
        assert_eq!(parse_flexible_date("5-3-24"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_two_digit_year_century_boundary() {
        assert_eq!(parse_flexible_date("01/01/69"), Some(ymd(1969, 1, 1)));
        assert_eq!(parse_flexible_date("01/01/68"), Some(ymd(2068, 1, 1)));
        assert_eq!(parse_flexible_date("01-01-70"), Some(ymd(1970, 1, 1)));
        assert_eq!(parse_flexible_date("01/01/00"), Some(ymd(2000, 1, 1)));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_flexible_date("not a date"), None);
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("   "), None);
        assert_eq!(parse_flexible_date("2024-01-01"), None);
        assert_eq!(parse_flexible_date("31/02/2024"), None);
        assert_eq!(parse_flexible_date("05.03.24"), None);
        assert_eq!(parse_flexible_date("05/03/2024 10:00"), None);
    }
}
