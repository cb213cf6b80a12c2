//! Slot scoring and winner selection.
//!
//! The single source of truth for the ranking rules: every caller that needs
//! a score or a winner goes through these functions, so the tie-break cannot
//! drift between endpoints.

use super::polls::TimeSlot;

/// Desirability score for a slot, in `[0, 100]`.
///
/// `0` when no responses were received; otherwise the percentage of
/// respondents who marked themselves available, rounded half-up. Purely for
/// display and ranking; winner selection compares raw counts.
///
/// # Examples
/// ```
/// use backend::domain::scoring::availability_score;
///
/// assert_eq!(availability_score(0, 0), 0);
/// assert_eq!(availability_score(1, 2), 50);
/// assert_eq!(availability_score(2, 3), 67);
/// assert_eq!(availability_score(3, 3), 100);
/// ```
pub fn availability_score(available: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (200 * u64::from(available) + u64::from(total)) / (2 * u64::from(total));
    scaled.min(100) as u8
}

/// Pick the winning slot: maximum `available_count`, ties broken by the
/// earliest `start_time`.
///
/// Always selects a winner from a non-empty candidate set, even when nobody
/// marked any slot available; returns `None` only for an empty slice.
pub fn select_winning_slot(slots: &[TimeSlot]) -> Option<&TimeSlot> {
    slots.iter().max_by(|a, b| {
        a.available_count()
            .cmp(&b.available_count())
            // Earlier starts rank higher, so they win the tie under max_by.
            .then_with(|| b.start_time().cmp(&a.start_time()))
    })
}
