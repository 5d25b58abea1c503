//! The unified due-check and work-week enumeration.
//!
//! Every "should this template produce an instance" question funnels through
//! [`is_due`] with an explicit [`Reference`], so realtime queries and
//! week-targeted planning apply the same cadence rules to different anchor
//! points.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};

use hearth_core::{Frequency, WeekSlot, time};

/// The point a due-check measures against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// An ad-hoc "is it due right now" query.
    Instant(DateTime<Utc>),
    /// A planned slot date; compared as midnight UTC of that date.
    Planned(NaiveDate),
}

impl Reference {
    #[must_use]
    pub fn instant(self) -> DateTime<Utc> {
        match self {
            Self::Instant(instant) => instant,
            Self::Planned(date) => time::midnight_utc(date),
        }
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        match self {
            Self::Instant(instant) => instant.date_naive(),
            Self::Planned(date) => date,
        }
    }
}

/// Whether a template with the given cadence is due at `reference`.
///
/// `None` frequency (unrecognized label) and `None` last-completion are both
/// always due. Month-based cadences use calendar-aware addition, so a
/// Jan 31 completion is next due Feb 28/29, not a fixed day count later.
#[must_use]
pub fn is_due(
    frequency: Option<Frequency>,
    last_completed: Option<DateTime<Utc>>,
    reference: Reference,
) -> bool {
    let Some(frequency) = frequency else {
        return true;
    };
    let Some(last) = last_completed else {
        return true;
    };

    match frequency {
        Frequency::Daily | Frequency::TwoDay => reference.date() > last.date_naive(),
        Frequency::Weekly => match reference {
            Reference::Instant(now) => now - last >= chrono::Duration::days(7),
            Reference::Planned(date) => last < time::midnight_utc(monday_of(date)),
        },
        Frequency::Monthly => due_after_months(last, reference, 1),
        Frequency::Quarterly => due_after_months(last, reference, 3),
        Frequency::Yearly => due_after_months(last, reference, 12),
    }
}

fn due_after_months(last: DateTime<Utc>, reference: Reference, months: u32) -> bool {
    last.checked_add_months(Months::new(months))
        .is_none_or(|next| reference.instant() >= next)
}

/// Slots of the two-day pattern that are due at this instant.
///
/// The pattern has fixed weekdays, so at most one slot matches: the Monday
/// slot on a Monday, the Friday slot on a Friday, neither otherwise. The
/// daily rule still applies, so a completion earlier the same day clears it.
#[must_use]
pub fn due_slots_now(last_completed: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Vec<WeekSlot> {
    WeekSlot::TWO_DAY
        .into_iter()
        .filter(|slot| {
            slot.weekday() == now.weekday()
                && is_due(Some(Frequency::TwoDay), last_completed, Reference::Instant(now))
        })
        .collect()
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The planning slots for the week `today` rolls into.
///
/// On a weekend the whole coming week is planned: all three slots, based on
/// next Monday. On a weekday the current week is topped up: slots whose
/// date has already passed are dropped.
#[must_use]
pub fn week_slots(today: NaiveDate) -> BTreeMap<WeekSlot, NaiveDate> {
    let weekend = matches!(today.weekday(), Weekday::Sat | Weekday::Sun);
    let monday = if weekend {
        monday_of(today) + Days::new(7)
    } else {
        monday_of(today)
    };

    WeekSlot::ALL
        .into_iter()
        .map(|slot| (slot, monday + Days::new(slot.offset_from_monday())))
        .filter(|(_, date)| weekend || *date >= today)
        .collect()
}

/// Next occurrence of the late-week slot's weekday, strictly after `today`.
#[must_use]
pub fn next_late_week_date(today: NaiveDate) -> NaiveDate {
    let target = u64::from(WeekSlot::LATE_WEEK.weekday().num_days_from_monday());
    let current = u64::from(today.weekday().num_days_from_monday());
    let ahead = (target + 7 - current) % 7;
    today + Days::new(if ahead == 0 { 7 } else { ahead })
}
