//! Month-by-month display timeline of a contract's schedule.

use common::Date;
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    domain::{payment::MonthNumber, Payment},
    read::installment::{Status, StoredField},
};
#[cfg(doc)]
use crate::{domain::Contract, read::installment::DateDerived};

/// Spanish short month names, as rendered by the admin UI.
const MONTH_NAMES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct",
    "Nov", "Dic",
];

/// One month slot of a [`Contract`]'s display timeline.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MonthSlot {
    /// Position of this slot within the schedule.
    pub month_number: MonthNumber,

    /// Human-facing label of this slot, e.g. `"Ene 2026"`.
    pub label: String,

    /// [`Date`] the slot's installment is owed: the matched [`Payment`]'s
    /// due date, or the first day of the slot's calendar month when no
    /// installment exists.
    pub due_date: Date,

    /// Display [`Status`] of this slot.
    pub status: Status,
}

/// Builds the twelve-slot display timeline of one contract's `year`.
///
/// Slots are matched against the provided [`Payment`]s by month number, and
/// classified **solely** via [`StoredField`]: the stored status field is
/// trusted as-is, and a slot with no matching installment is [`Status::Due`].
/// No clock and no date comparison is involved, unlike [`DateDerived`] — the
/// two views of the same schedule can disagree.
///
/// `payments` are expected to be pre-filtered to the installments whose due
/// dates fall within `year`.
#[expect(clippy::missing_panics_doc, reason = "infallible")]
#[must_use]
pub fn build(year: i32, payments: &[Payment]) -> Vec<MonthSlot> {
    MonthNumber::all()
        .map(|month| {
            let matched =
                payments.iter().find(|p| p.month_number == Some(month));
            MonthSlot {
                month_number: month,
                label: format!(
                    "{} {year}",
                    MONTH_NAMES[usize::from(month.get()) - 1],
                ),
                due_date: matched.map_or_else(
                    || {
                        Date::from_ymd(year, month.get(), 1)
                            .expect("first of month always exists")
                    },
                    |p| p.due_date,
                ),
                status: matched
                    .map_or(Status::Due, |p| StoredField.classify(p)),
            }
        })
        .collect()
}
