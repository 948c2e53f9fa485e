//! Month picker options.

use chrono::{DateTime, Locale, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::{
    domain::MonthKey,
    errors::{BudgetError, Result},
};

/// One selectable month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub key: MonthKey,
    pub label: String,
    pub is_current: bool,
}

/// Consecutive months from `months_before` before the reference month through
/// `months_after` after it, oldest first.
///
/// Windows reaching outside years 0000..=9999 are rejected with `InvalidMonth`.
pub fn month_options(
    reference: NaiveDate,
    months_before: u32,
    months_after: u32,
    locale: &str,
) -> Result<Vec<MonthOption>> {
    let current = MonthKey::from_date(reference);
    let window_error = || {
        BudgetError::InvalidMonth(format!(
            "{months_before} months before and {months_after} after {current}"
        ))
    };
    let before = i32::try_from(months_before).map_err(|_| window_error())?;
    let after = i32::try_from(months_after).map_err(|_| window_error())?;
    let first = current.shift(-before).map_err(|_| window_error())?;
    current.shift(after).map_err(|_| window_error())?;
    build_options(first, before + after + 1, current, locale)
}

/// January through December of `year`.
pub fn year_month_options(year: i32, reference: NaiveDate, locale: &str) -> Vec<MonthOption> {
    let current = MonthKey::from_date(reference);
    MonthKey::new(year, 1)
        .and_then(|first| build_options(first, 12, current, locale))
        .unwrap_or_default()
}

/// Localised "Month Year" label, e.g. `June 2024` or `Juni 2024`.
pub fn month_label(month: &MonthKey, locale: &str) -> String {
    let midnight = month.first_day().and_time(NaiveTime::MIN);
    DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc)
        .format_localized("%B %Y", resolve_locale(locale))
        .to_string()
}

/// Maps tags such as `de-DE` or `de_DE` to a chrono locale, falling back to `en_US`.
pub fn resolve_locale(tag: &str) -> Locale {
    let normalized = tag.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).unwrap_or(Locale::en_US)
}

fn build_options(
    first: MonthKey,
    count: i32,
    current: MonthKey,
    locale: &str,
) -> Result<Vec<MonthOption>> {
    (0..count)
        .map(|offset| {
            let key = first.shift(offset)?;
            Ok(MonthOption {
                key,
                label: month_label(&key, locale),
                is_current: key == current,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn zero_window_yields_only_current_month() {
        let options = month_options(date(2024, 6, 15), 0, 0, "en-US").unwrap();
        assert_eq!(options.len(), 1);
        assert!(options[0].is_current);
        assert_eq!(options[0].label, "June 2024");
    }

    #[test]
    fn oversized_windows_are_rejected() {
        for (before, after) in [(u32::MAX, 0), (0, u32::MAX), (u32::MAX, u32::MAX), (30_000, 0)] {
            assert!(
                matches!(
                    month_options(date(2024, 6, 1), before, after, "en-US"),
                    Err(BudgetError::InvalidMonth(_))
                ),
                "{before}/{after} should be rejected"
            );
        }
    }

    #[test]
    fn window_may_end_at_the_last_representable_month() {
        let options = month_options(date(9999, 10, 1), 0, 2, "en-US").unwrap();
        assert_eq!(options.last().unwrap().key.to_string(), "9999-12");
        assert!(month_options(date(9999, 10, 1), 0, 3, "en-US").is_err());

        let options = month_options(date(0, 3, 1), 2, 0, "en-US").unwrap();
        assert_eq!(options[0].key.to_string(), "0000-01");
        assert!(month_options(date(0, 3, 1), 3, 0, "en-US").is_err());
    }

    #[test]
    fn labels_follow_locale() {
        let key: MonthKey = "2024-03".parse().unwrap();
        assert_eq!(month_label(&key, "de-DE"), "März 2024");
        assert_eq!(month_label(&key, "de_DE"), "März 2024");
        assert_eq!(month_label(&key, "xx-YY"), "March 2024");
    }

    #[test]
    fn year_options_flag_current_only_in_reference_year() {
        let options = year_month_options(2024, date(2024, 6, 1), "en-US");
        assert_eq!(options.len(), 12);
        assert_eq!(options[0].key.to_string(), "2024-01");
        assert_eq!(options[11].key.to_string(), "2024-12");
        assert_eq!(options.iter().filter(|o| o.is_current).count(), 1);
        assert!(options[5].is_current);

        let other_year = year_month_options(2023, date(2024, 6, 1), "en-US");
        assert!(other_year.iter().all(|o| !o.is_current));
    }
}
