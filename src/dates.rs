use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

/// Timezone the backend uses for naive timestamps and the site displays in.
pub const TIMEZONE: Tz = chrono_tz::Europe::Istanbul;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a backend timestamp into UTC.
///
/// RFC 3339 values carry their own offset. Naive date-times and bare dates are
/// read as Istanbul local time; a bare date means local midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS.iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return to_utc(naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| NaiveTime::from_hms_opt(0, 0, 0).map(|t| NaiveDateTime::new(date, t)))
        .and_then(to_utc)
}

fn to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match TIMEZONE.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

pub fn local(dt: &DateTime<Utc>) -> DateTime<Tz> {
    dt.with_timezone(&TIMEZONE)
}

/// `01.06.2025 Pazar`
pub fn date_label(dt: &DateTime<Utc>) -> String {
    let local = local(dt);
    format!(
        "{} {}",
        local.format("%d.%m.%Y"),
        weekday_name(local.weekday())
    )
}

/// `20:00`
pub fn time_label(dt: &DateTime<Utc>) -> String {
    local(dt).format("%H:%M").to_string()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Pazartesi",
        Weekday::Tue => "Salı",
        Weekday::Wed => "Çarşamba",
        Weekday::Thu => "Perşembe",
        Weekday::Fri => "Cuma",
        Weekday::Sat => "Cumartesi",
        Weekday::Sun => "Pazar",
    }
}
