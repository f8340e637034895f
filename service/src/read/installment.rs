//! Installment status derivation.
//!
//! Two deliberately divergent strategies share the same result shape:
//! [`DateDerived`] classifies from dates and "now", while [`StoredField`] is
//! a pure projection of the [`Payment`]'s stored status field. They can
//! disagree about the same row, and callers pick the one they rely on; do not
//! unify them.

use common::Date;
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::domain::{payment, Payment};

/// Derived display status of one installment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Status {
    /// The installment is paid.
    Paid,

    /// The installment is owed and unpaid.
    Due,

    /// The installment is not due yet.
    Future,
}

/// Date-driven classification strategy.
///
/// Compares the [`Payment`]'s dates against a reference "today" and ignores
/// the stored status field entirely:
/// - paid on or before today → [`Status::Paid`];
/// - otherwise, due strictly before today → [`Status::Due`] (overdue);
/// - otherwise → [`Status::Future`] (pending).
#[derive(Clone, Copy, Debug)]
pub struct DateDerived {
    /// Reference date standing in for "now".
    pub today: Date,
}

impl DateDerived {
    /// Classifies the provided [`Payment`].
    #[must_use]
    pub fn classify(&self, payment: &Payment) -> Status {
        if payment.payment_date <= self.today {
            Status::Paid
        } else if payment.due_date < self.today {
            Status::Due
        } else {
            Status::Future
        }
    }
}

/// Stored-field classification strategy.
///
/// A pure projection of the [`Payment`]'s stored status field, trusting
/// whoever maintains it: no date and no clock is ever consulted. An absent or
/// unrecognized stored value maps to [`Status::Due`], biasing toward flagging
/// an installment rather than silently hiding it.
#[derive(Clone, Copy, Debug)]
pub struct StoredField;

impl StoredField {
    /// Classifies the provided [`Payment`].
    #[must_use]
    pub fn classify(&self, payment: &Payment) -> Status {
        match payment.status {
            Some(payment::Status::Paid) => Status::Paid,
            Some(payment::Status::Future) => Status::Future,
            Some(payment::Status::Overdue) | None => Status::Due,
        }
    }
}
