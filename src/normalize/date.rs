//! UTC datetime normalization without timezone dependencies.
//!
//! Source dates arrive as ISO strings, slash-separated dates, or locale
//! strings with a parenthesized timezone name glued on (in ASCII or
//! full-width parentheses). Everything is normalized to the canonical
//! `YYYY-MM-DDTHH:MM:SSZ` form.
//!
//! [`normalize_date`] never fails: totally unparseable input falls back to
//! the current processing time, so the only non-determinism is on garbage
//! input. Tests assert "any valid timestamp" for that branch.

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Parse a date string: `YYYY-MM-DD` or `YYYY/MM/DD`, optionally
    /// followed by `HH:MM` or `HH:MM:SS` (separated by `T` or a space),
    /// optionally followed by `Z` or a numeric offset (the offset is
    /// accepted and dropped).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (date_part, time_part) = match s.find(['T', ' ']) {
            Some(pos) => (&s[..pos], Some(s[pos + 1..].trim())),
            None => (s, None),
        };

        let mut date_fields = date_part.split(['-', '/']);
        let year: u16 = date_fields.next()?.parse().ok()?;
        let month: u8 = date_fields.next()?.parse().ok()?;
        let day: u8 = date_fields.next()?.parse().ok()?;
        if date_fields.next().is_some() || year < 1000 {
            return None;
        }

        let (hour, minute, second) = match time_part {
            Some(t) if !t.is_empty() => parse_time(t)?,
            _ => (0, 0, 0),
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.is_valid().then_some(dt)
    }

    /// Current time in UTC.
    pub fn now() -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(secs)
    }

    /// Convert a Unix timestamp to civil UTC time.
    pub fn from_unix(secs: u64) -> Self {
        let days = secs / 86_400;
        let rem = secs % 86_400;

        // Civil-from-days (Howard Hinnant's algorithm)
        let z = days as i64 + 719_468;
        let era = z / 146_097;
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let y = yoe + era * 400;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let d = doy - (153 * mp + 2) / 5 + 1;
        let m = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = if m <= 2 { y + 1 } else { y };

        Self::new(
            year as u16,
            m as u8,
            d as u8,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= Self::days_in_month(self.year, self.month)
            && self.hour <= 23
            && self.minute <= 59
            && self.second <= 59
    }

    #[inline]
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Format as RFC 3339 (ISO 8601): `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Parse `HH:MM` or `HH:MM:SS`, tolerating a trailing `Z` or numeric
/// offset (`+08:00`, `-0500`).
fn parse_time(t: &str) -> Option<(u8, u8, u8)> {
    let t = t.trim_end_matches('Z');
    let t = match t.find(['+', '-']) {
        Some(pos) => &t[..pos],
        None => t,
    };
    let t = t.trim();

    let mut fields = t.split(':');
    let hour: u8 = fields.next()?.trim().parse().ok()?;
    let minute: u8 = fields.next()?.trim().parse().ok()?;
    let second: u8 = match fields.next() {
        Some(sec) => {
            // Drop fractional seconds ("45.123")
            let sec = sec.split('.').next()?.trim();
            sec.parse().ok()?
        }
        None => 0,
    };
    if fields.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}

/// Strip parenthesized annotations like `(中国标准时间)` or `（GMT+8）`,
/// in both ASCII and full-width parentheses.
fn strip_annotations(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' | '（' => depth += 1,
            ')' | '）' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Normalize any raw date string to canonical `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Attempts in order: direct parse; parse after stripping parenthesized
/// annotations; current processing time. Never fails.
pub fn normalize_date(raw: &str) -> String {
    if let Some(dt) = DateTimeUtc::parse(raw) {
        return dt.to_rfc3339();
    }
    let stripped = strip_annotations(raw);
    if let Some(dt) = DateTimeUtc::parse(&stripped) {
        return dt.to_rfc3339();
    }
    DateTimeUtc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_canonical(s: &str) -> bool {
        DateTimeUtc::parse(s).is_some() && s.len() == 20 && s.ends_with('Z')
    }

    #[test]
    fn test_parse_date_only() {
        let dt = DateTimeUtc::parse("2024-06-15").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 0, 0, 0));
        assert_eq!(
            DateTimeUtc::parse("2024/06/15"),
            DateTimeUtc::parse("2024-06-15")
        );
    }

    #[test]
    fn test_parse_with_time() {
        let dt = DateTimeUtc::parse("2024-06-15T14:30:45Z").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
        let dt = DateTimeUtc::parse("2024-06-15 14:30").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 0));
    }

    #[test]
    fn test_parse_offset_dropped() {
        let dt = DateTimeUtc::parse("2024-06-15T14:30:45+08:00").unwrap();
        assert_eq!(dt.hour, 14);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = DateTimeUtc::parse("2024-06-15T14:30:45.123Z").unwrap();
        assert_eq!(dt.second, 45);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DateTimeUtc::parse("").is_none());
        assert!(DateTimeUtc::parse("yesterday").is_none());
        assert!(DateTimeUtc::parse("2024-13-01").is_none());
        assert!(DateTimeUtc::parse("2024-02-30").is_none());
        assert!(DateTimeUtc::parse("2023-02-29").is_none());
    }

    #[test]
    fn test_leap_year() {
        assert!(DateTimeUtc::parse("2024-02-29").is_some());
        assert!(DateTimeUtc::parse("2000-02-29").is_some());
        assert!(DateTimeUtc::parse("1900-02-29").is_none());
    }

    #[test]
    fn test_from_unix() {
        // 2024-01-15T10:00:00Z
        let dt = DateTimeUtc::from_unix(1_705_312_800);
        assert_eq!(dt, DateTimeUtc::new(2024, 1, 15, 10, 0, 0));
        // Epoch
        assert_eq!(DateTimeUtc::from_unix(0), DateTimeUtc::new(1970, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_normalize_canonical() {
        assert_eq!(normalize_date("2024-01-15"), "2024-01-15T00:00:00Z");
        assert_eq!(
            normalize_date("2024-01-15 10:00:00"),
            "2024-01-15T10:00:00Z"
        );
    }

    #[test]
    fn test_normalize_strips_ascii_annotation() {
        assert_eq!(
            normalize_date("2024-01-15 10:00:00 (China Standard Time)"),
            "2024-01-15T10:00:00Z"
        );
    }

    #[test]
    fn test_normalize_strips_fullwidth_annotation() {
        assert_eq!(
            normalize_date("2024-01-15 10:00:00 （中国标准时间）"),
            "2024-01-15T10:00:00Z"
        );
        assert_eq!(
            normalize_date("2024-01-15 10:00:00 (中国标准时间)"),
            "2024-01-15T10:00:00Z"
        );
    }

    #[test]
    fn test_normalize_never_fails() {
        // Fallback branch: any valid timestamp is acceptable
        for garbage in ["", "not a date", "（）", "((((", "明天"] {
            let out = normalize_date(garbage);
            assert!(is_canonical(&out), "not canonical: {out:?}");
        }
    }

    #[test]
    fn test_normalize_idempotent_on_canonical() {
        let once = normalize_date("2024-06-15T14:30:45Z");
        assert_eq!(normalize_date(&once), once);
    }
}
