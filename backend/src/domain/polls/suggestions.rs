//! Candidate-slot suggestions for coordinators who want sensible defaults
//! instead of hand-entering every window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

use super::slot::SlotDraft;

/// Meeting hours proposed on each suggested day, in UTC.
pub const PREFERRED_HOURS: [u32; 6] = [9, 10, 11, 14, 15, 16];

/// Propose candidate slots on upcoming weekdays at the preferred hours.
///
/// Scans `days_ahead` calendar days starting at `from`, skipping Saturdays
/// and Sundays, and proposes one window per preferred hour lasting
/// `duration_minutes`. Deterministic for a given input.
///
/// # Examples
/// ```
/// use backend::domain::suggest_slots;
/// use chrono::NaiveDate;
///
/// // 2024-01-08 is a Monday; one weekday yields six suggestions.
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 8).expect("valid date");
/// let slots = suggest_slots(monday, 1, 30);
/// assert_eq!(slots.len(), 6);
/// ```
pub fn suggest_slots(from: NaiveDate, days_ahead: u32, duration_minutes: u32) -> Vec<SlotDraft> {
    let duration = Duration::minutes(i64::from(duration_minutes));
    (0..days_ahead)
        .filter_map(|offset| from.checked_add_days(chrono::Days::new(u64::from(offset))))
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .flat_map(|day| {
            PREFERRED_HOURS
                .iter()
                .filter_map(move |&hour| day.and_hms_opt(hour, 0, 0))
                .map(move |naive| {
                    let start: DateTime<Utc> = Utc.from_utc_datetime(&naive);
                    SlotDraft::new(start, start + duration)
                })
        })
        .collect()
}
