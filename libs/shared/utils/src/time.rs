use chrono::{NaiveDate, Utc};

/// Today in the server's clock, used to default the intake form's requested
/// date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn today_string() -> String {
    today().format("%Y-%m-%d").to_string()
}

/// Strict `YYYY-MM-DD` parse for client-entered dates.
pub fn parse_request_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_date_accepts_iso_dates() {
        let parsed = parse_request_date("2024-06-01").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_parse_request_date_trims_whitespace() {
        assert!(parse_request_date("  2024-06-01 ").is_ok());
    }

    #[test]
    fn test_parse_request_date_rejects_other_formats() {
        assert!(parse_request_date("01/06/2024").is_err());
        assert!(parse_request_date("June 1st").is_err());
        assert!(parse_request_date("").is_err());
    }

    #[test]
    fn test_today_string_is_iso_formatted() {
        let today = today_string();
        assert!(parse_request_date(&today).is_ok());
    }
}
