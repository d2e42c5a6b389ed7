//! 人类可读的相对时间（"for 5 minutes", "since yesterday", "in 3 days"）
//! 月、年固定按 30 天、365 天计算

use chrono::{DateTime, Utc};

const SECS_PER_MIN: i64 = 60;
const MINS_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;
const DAYS_PER_WEEK: i64 = 7;
const MONTH_DAYS: i64 = 30;
const YEAR_DAYS: i64 = 365;

/// Describe how long ago `past` was, relative to `now`.
pub fn humanize(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - past).num_seconds();
    if seconds < 0 {
        return humanize_future(-seconds);
    }

    if seconds < SECS_PER_MIN {
        return format!("for {} seconds", seconds);
    }

    let minutes = seconds / SECS_PER_MIN;
    if minutes < MINS_PER_HOUR {
        return plural("for", minutes, "minute");
    }

    let hours = minutes / MINS_PER_HOUR;
    if hours < HOURS_PER_DAY {
        return plural("for", hours, "hour");
    }

    let days = hours / HOURS_PER_DAY;
    if days == 1 {
        return "since yesterday".to_string();
    }
    if days < DAYS_PER_WEEK {
        return format!("for {} days", days);
    }

    calendar("for", days)
}

/// Mirror of [`humanize`] for instants `seconds` into the future.
pub fn humanize_future(seconds: i64) -> String {
    if seconds < SECS_PER_MIN {
        return format!("in {} seconds", seconds);
    }

    let minutes = seconds / SECS_PER_MIN;
    if minutes < MINS_PER_HOUR {
        return plural("in", minutes, "minute");
    }

    let hours = minutes / MINS_PER_HOUR;
    if hours < HOURS_PER_DAY {
        return plural("in", hours, "hour");
    }

    let days = hours / HOURS_PER_DAY;
    if days == 1 {
        return "tomorrow".to_string();
    }
    if days < DAYS_PER_WEEK {
        return format!("in {} days", days);
    }

    calendar("in", days)
}

/// Phrase for "last checked" columns: "5 minutes ago", "yesterday", "in 2 hours".
pub fn ago(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let phrase = humanize(past, now);
    if phrase == "since yesterday" {
        return "yesterday".to_string();
    }
    match phrase.strip_prefix("for ") {
        Some(rest) => format!("{} ago", rest),
        None => phrase,
    }
}

fn calendar(prefix: &str, days: i64) -> String {
    let weeks = days / DAYS_PER_WEEK;
    if weeks < 5 {
        return plural(prefix, weeks, "week");
    }

    let months = days / MONTH_DAYS;
    if months < 12 {
        return plural(prefix, months, "month");
    }

    plural(prefix, days / YEAR_DAYS, "year")
}

fn plural(prefix: &str, n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} 1 {}", prefix, unit)
    } else {
        format!("{} {} {}s", prefix, n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn before(secs: i64) -> String {
        humanize(now() - Duration::seconds(secs), now())
    }

    #[test]
    fn past_buckets() {
        assert_eq!(before(0), "for 0 seconds");
        assert_eq!(before(45), "for 45 seconds");
        assert_eq!(before(90), "for 1 minute");
        assert_eq!(before(59 * 60), "for 59 minutes");
        assert_eq!(before(3600), "for 1 hour");
        assert_eq!(before(5 * 3600), "for 5 hours");
        assert_eq!(before(25 * 3600), "since yesterday");
        assert_eq!(before(3 * 86400), "for 3 days");
        assert_eq!(before(7 * 86400), "for 1 week");
        assert_eq!(before(20 * 86400), "for 2 weeks");
        assert_eq!(before(35 * 86400), "for 1 month");
        assert_eq!(before(200 * 86400), "for 6 months");
        assert_eq!(before(365 * 86400), "for 1 year");
        assert_eq!(before(800 * 86400), "for 2 years");
    }

    #[test]
    fn month_and_year_use_fixed_spans() {
        // 34 days is still weeks; 360 days is 12 thirty-day months but under a 365-day year.
        assert_eq!(before(34 * 86400), "for 4 weeks");
        assert_eq!(before(360 * 86400), "for 0 years");
    }

    #[test]
    fn future_buckets() {
        let after = |secs: i64| humanize(now() + Duration::seconds(secs), now());
        assert_eq!(after(30), "in 30 seconds");
        assert_eq!(after(60), "in 1 minute");
        assert_eq!(after(2 * 3600), "in 2 hours");
        assert_eq!(after(86400), "tomorrow");
        assert_eq!(after(3 * 86400), "in 3 days");
        assert_eq!(after(14 * 86400), "in 2 weeks");
        assert_eq!(after(400 * 86400), "in 1 year");
    }

    #[test]
    fn ago_rewrites_past_phrases() {
        assert_eq!(ago(now() - Duration::seconds(300), now()), "5 minutes ago");
        assert_eq!(ago(now() - Duration::hours(30), now()), "yesterday");
        assert_eq!(ago(now() + Duration::hours(2), now()), "in 2 hours");
    }
}
