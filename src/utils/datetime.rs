use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};

/// Parse a publish date as sent by the feed.
///
/// Accepts ISO dates (`2024-01-01`), ISO datetimes with or without an offset,
/// and RFC 2822 dates as found in RSS (`Mon, 01 Jan 2024 10:00:00 GMT`).
/// Anything else, including the producer's `"Unknown"`, is `None`.
pub fn parse_pub_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = raw.parse::<Date>() {
        return Some(date);
    }
    if let Ok(dt) = raw.parse::<DateTime>() {
        return Some(dt.date());
    }
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts.to_zoned(TimeZone::UTC).date());
    }
    if let Ok(zdt) = jiff::fmt::rfc2822::parse(raw) {
        return Some(zdt.date());
    }

    None
}

/// Short card date like "Jan 1, 2024", or `None` when the value does not parse.
pub fn format_pub_date(raw: &str) -> Option<String> {
    parse_pub_date(raw).map(|d| d.strftime("%b %-d, %Y").to_string())
}

/// Masthead line like "Sunday, October 18, 2026".
pub fn format_masthead_date(now: &Zoned) -> String {
    now.strftime("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn parses_plain_iso_date() {
        assert_eq!(parse_pub_date("2024-01-01"), Some(date(2024, 1, 1)));
        assert_eq!(format_pub_date("2024-01-01").as_deref(), Some("Jan 1, 2024"));
    }

    #[test]
    fn parses_iso_datetimes() {
        assert_eq!(
            parse_pub_date("2024-03-15T08:30:00"),
            Some(date(2024, 3, 15))
        );
        assert_eq!(
            parse_pub_date("2024-03-15T08:30:00Z"),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn parses_rss_dates() {
        assert_eq!(
            format_pub_date("Mon, 01 Jan 2024 10:00:00 GMT").as_deref(),
            Some("Jan 1, 2024")
        );
        assert_eq!(
            format_pub_date("Tue, 12 Nov 2024 23:15:00 +0000").as_deref(),
            Some("Nov 12, 2024")
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_pub_date("not-a-date"), None);
        assert_eq!(parse_pub_date("Unknown"), None);
        assert_eq!(parse_pub_date(""), None);
        assert_eq!(format_pub_date("2024-13-45"), None);
    }

    #[test]
    fn masthead_uses_long_form() {
        let now = date(2026, 10, 18)
            .at(9, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap();
        assert_eq!(format_masthead_date(&now), "Sunday, October 18, 2026");
    }
}
