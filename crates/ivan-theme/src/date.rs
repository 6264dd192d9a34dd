//! Date formatting.

use chrono::{DateTime, Utc};

/// Medium date style in US English, e.g. `Jan 2, 2020`.
const MEDIUM_DATE: &str = "%b %-d, %Y";

/// Formats publish dates the same way on every page.
///
/// The pattern is fixed and chrono's month names are always English, so the
/// output never depends on the locale of the machine running the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFormatter;

impl DateFormatter {
    /// Create the formatter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Format `date` as given, without timezone conversion.
    #[must_use]
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        date.format(MEDIUM_DATE).to_string()
    }
}

/// Whole days elapsed from `date` to `now`.
///
/// Partial days are truncated and dates after `now` count as zero days.
#[must_use]
pub fn days_since(date: &DateTime<Utc>, now: &DateTime<Utc>) -> i64 {
    now.signed_duration_since(*date).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn test_medium_style() {
        let formatter = DateFormatter::new();
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(formatter.format(&date), "Jan 2, 2020");

        let date = Utc.with_ymd_and_hms(2023, 11, 28, 0, 0, 0).unwrap();
        assert_eq!(formatter.format(&date), "Nov 28, 2023");
    }

    #[test]
    fn test_new_and_default_agree() {
        let date = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let first = DateFormatter::new().format(&date);
        let second = DateFormatter::default().format(&date);
        assert_eq!(first, second);
        assert_eq!(first, "Feb 29, 2024");
    }

    /// Set in the child process spawned by `test_format_ignores_host_locale`.
    const LOCALE_CHILD: &str = "IVAN_THEME_LOCALE_CHILD";

    #[test]
    fn test_format_ignores_host_locale() {
        let date = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let formatted = DateFormatter::new().format(&date);

        if std::env::var_os(LOCALE_CHILD).is_some() {
            println!("formatted={formatted}");
            return;
        }
        assert_eq!(formatted, "Feb 29, 2024");

        // Re-run this test under other locales and compare.
        let exe = std::env::current_exe().unwrap();
        for locale in ["de_DE.UTF-8", "fr_FR.UTF-8", "ja_JP.UTF-8", "C"] {
            let output = Command::new(&exe)
                .args([
                    "--exact",
                    "date::tests::test_format_ignores_host_locale",
                    "--nocapture",
                    "--test-threads=1",
                ])
                .env(LOCALE_CHILD, "1")
                .env("LC_ALL", locale)
                .env("LC_TIME", locale)
                .env("LANG", locale)
                .output()
                .unwrap();

            let stdout = String::from_utf8_lossy(&output.stdout);
            assert!(output.status.success(), "{locale}: {stdout}");
            assert!(stdout.contains("formatted=Feb 29, 2024"), "{locale}: {stdout}");
        }
    }

    #[test]
    fn test_days_since() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        assert_eq!(days_since(&(now - Duration::days(14)), &now), 14);
        assert_eq!(days_since(&(now - Duration::hours(23)), &now), 0);
        assert_eq!(days_since(&(now - Duration::hours(25)), &now), 1);
        assert_eq!(days_since(&(now + Duration::days(3)), &now), 0);
    }
}
