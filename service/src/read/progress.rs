//! Aggregate payment progress of a contract.

use common::Date;
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    domain::{schedule, Payment},
    read::installment::{DateDerived, Status},
};
#[cfg(doc)]
use crate::{domain::Contract, read::installment::StoredField};

/// Date-driven paid/pending/overdue breakdown of a [`Contract`]'s schedule.
///
/// Derived via [`DateDerived`] over the contract's persisted installments;
/// the stored status fields play no part here (they feed [`StoredField`]
/// instead, and the two views can disagree).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Progress {
    /// Number of persisted installments.
    ///
    /// Equals [`schedule::TERM_MONTHS`] whenever the schedule-completeness
    /// invariant holds; any other value is an anomaly, see
    /// [`Progress::is_complete()`].
    pub total_months: usize,

    /// Number of installments already paid.
    pub paid_months: usize,

    /// Number of installments not due yet.
    pub pending_months: usize,

    /// Number of installments past due and unpaid.
    pub overdue_months: usize,
}

impl Progress {
    /// Derives the [`Progress`] of the provided installments, classifying
    /// each against the provided `today`.
    #[must_use]
    pub fn derive(payments: &[Payment], today: Date) -> Self {
        let strategy = DateDerived { today };

        let mut this = Self {
            total_months: payments.len(),
            paid_months: 0,
            pending_months: 0,
            overdue_months: 0,
        };
        for payment in payments {
            match strategy.classify(payment) {
                Status::Paid => this.paid_months += 1,
                Status::Due => this.overdue_months += 1,
                Status::Future => this.pending_months += 1,
            }
        }
        this
    }

    /// Indicates whether the underlying schedule satisfies the completeness
    /// invariant of exactly [`schedule::TERM_MONTHS`] installments.
    ///
    /// A `false` here means the schedule was tampered with (e.g. an
    /// installment row was deleted directly) and the counts no longer
    /// describe a full term.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_months == schedule::TERM_MONTHS
    }
}
