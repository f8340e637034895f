//! [`Payment`] definitions.

use std::fmt;

use common::{define_kind, unit, Date, DateTime, DateTimeOf, Money};
use derive_more::{
    AsRef, Display, Error as StdError, From, FromStr, Into,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::domain::{contract, property, tenant};
#[cfg(doc)]
use crate::{domain::Contract, read};

/// One scheduled rent installment (or a standalone payment record).
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`], assigned by the persistence layer.
    ///
    /// [`None`] until the first save.
    pub id: Option<Id>,

    /// ID of the paying tenant.
    ///
    /// Nullable: a [`Payment`] can outlive or precede a tenant assignment.
    pub tenant_id: Option<tenant::Id>,

    /// ID of the property the payment is for.
    pub property_id: Option<property::Id>,

    /// Weak back-reference to the owning [`Contract`], used for grouping
    /// only. Deleting a [`Contract`] never cascades into its [`Payment`]s.
    pub contract_id: Option<contract::Id>,

    /// Position of this installment within its [`Contract`]'s generated
    /// schedule. Required whenever [`Payment::contract_id`] is set.
    pub month_number: Option<MonthNumber>,

    /// Amount of this [`Payment`]. Always positive.
    pub amount: Money,

    /// [`Date`] the installment was (or will be) paid.
    pub payment_date: Date,

    /// [`Date`] the installment is owed.
    pub due_date: Date,

    /// Channel this [`Payment`] goes through.
    pub method: Method,

    /// Stored display [`Status`], mutated only by explicit update operations
    /// and never recomputed from dates by this engine.
    ///
    /// [`None`] covers both "never set" and "unrecognized stored value";
    /// [`read::installment::StoredField`] treats it as due.
    pub status: Option<Status>,

    /// Free-text notes attached to this [`Payment`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Payment`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Payment {
    /// Creates a new transient [`Payment`] (not yet persisted, no ID).
    ///
    /// `payment_date` defaults to `today` when unspecified. No stored
    /// [`Status`] is assigned.
    #[must_use]
    pub fn new(args: NewPayment) -> Self {
        let NewPayment {
            tenant_id,
            property_id,
            contract_id,
            month_number,
            amount,
            payment_date,
            due_date,
            method,
            notes,
            today,
        } = args;

        let now = DateTime::now();
        Self {
            id: None,
            tenant_id,
            property_id,
            contract_id,
            month_number,
            amount,
            payment_date: payment_date.unwrap_or(today),
            due_date,
            method: method.unwrap_or(Method::Yape),
            status: None,
            notes,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    /// Merges the provided [`Patch`] into this [`Payment`], stamps
    /// [`Payment::updated_at`] and re-validates the result.
    ///
    /// Fields absent from the [`Patch`] are left untouched.
    ///
    /// # Errors
    ///
    /// If the patched [`Payment`] violates validation rules (e.g. an edit
    /// marking an installment paid after its due date). The entity is still
    /// mutated in that case; callers must not persist it.
    pub fn apply(&mut self, patch: Patch) -> Result<(), ValidationError> {
        let Patch {
            tenant_id,
            property_id,
            contract_id,
            month_number,
            amount,
            payment_date,
            due_date,
            method,
            status,
            notes,
        } = patch;

        if let Some(tenant_id) = tenant_id {
            self.tenant_id = tenant_id;
        }
        if let Some(property_id) = property_id {
            self.property_id = property_id;
        }
        if let Some(contract_id) = contract_id {
            self.contract_id = contract_id;
        }
        if let Some(month_number) = month_number {
            self.month_number = month_number;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(payment_date) = payment_date {
            self.payment_date = payment_date;
        }
        if let Some(due_date) = due_date {
            self.due_date = due_date;
        }
        if let Some(method) = method {
            self.method = method;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        self.updated_at = DateTime::now().coerce();

        self.validate()
    }

    /// Validates this [`Payment`], reporting all the violated rules at once.
    ///
    /// # Errors
    ///
    /// If any of the validation rules is violated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if !self.amount.is_positive() {
            violations.push(Violation::NonPositiveAmount);
        }
        if self.contract_id.is_some() && self.month_number.is_none() {
            violations.push(Violation::MissingMonthNumber);
        }
        if self.payment_date > self.due_date {
            violations.push(Violation::PaidAfterDue);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

/// Arguments of [`Payment::new()`].
#[derive(Clone, Debug)]
pub struct NewPayment {
    /// ID of the paying tenant, if known.
    pub tenant_id: Option<tenant::Id>,

    /// ID of the property the payment is for, if known.
    pub property_id: Option<property::Id>,

    /// ID of the owning [`Contract`], if any.
    pub contract_id: Option<contract::Id>,

    /// Position within the owning [`Contract`]'s schedule.
    pub month_number: Option<MonthNumber>,

    /// Amount of the [`Payment`].
    pub amount: Money,

    /// [`Date`] the installment was (or will be) paid.
    ///
    /// Defaults to [`NewPayment::today`] when omitted.
    pub payment_date: Option<Date>,

    /// [`Date`] the installment is owed.
    pub due_date: Date,

    /// Channel of the [`Payment`]. Defaults to [`Method::Yape`].
    pub method: Option<Method>,

    /// Free-text notes.
    pub notes: Option<Notes>,

    /// Reference "today" used to default [`Payment::payment_date`].
    pub today: Date,
}

/// ID of a [`Payment`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, Ord,
    PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Id(i64);

/// Position of an installment within its contract's generated schedule:
/// an integer in `1..=12`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MonthNumber(u8);

impl MonthNumber {
    /// Creates a new [`MonthNumber`] if the given `month` is in `1..=12`.
    #[must_use]
    pub fn new(month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self(month))
    }

    /// Returns the underlying `1..=12` value.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns all the [`MonthNumber`]s of a schedule, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=12).map(Self)
    }
}

define_kind! {
    #[doc = "Channel a [`Payment`] goes through."]
    enum Method {
        #[doc = "Yape e-wallet transfer (the default channel)."]
        Yape = 1,

        #[doc = "Plin e-wallet transfer."]
        Plin = 2,

        #[doc = "Bank transfer."]
        BankTransfer = 3,

        #[doc = "Cash."]
        Cash = 4,

        #[doc = "Card payment."]
        Card = 5,
    }
}

/// Stored display state of a [`Payment`].
///
/// Kept verbatim in its lowercase wire form: parsing (via [`FromStr`])
/// rejects anything else, and an unrecognized stored value is represented as
/// [`None`] on the entity.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "lowercase")
)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// The installment has been paid.
    Paid,

    /// The installment is overdue.
    Overdue,

    /// The installment is not due yet.
    Future,
}

/// Free-text notes attached to a [`Payment`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Notes(String);

impl Notes {
    /// Creates new [`Notes`] if the given `notes` are valid.
    #[must_use]
    pub fn new(notes: impl Into<String>) -> Option<Self> {
        let notes = notes.into();
        Self::check(&notes).then_some(Self(notes))
    }

    /// Checks whether the given `notes` are valid [`Notes`].
    fn check(notes: impl AsRef<str>) -> bool {
        let notes = notes.as_ref();
        !notes.is_empty() && notes.len() <= 2048
    }
}

impl std::str::FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Notes`")
    }
}

/// Partial update of a [`Payment`].
///
/// An outer [`None`] means "leave the field untouched"; for nullable fields
/// the inner [`Option`] distinguishes "set to null" from "not present".
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New paying tenant, if any.
    pub tenant_id: Option<Option<tenant::Id>>,

    /// New property, if any.
    pub property_id: Option<Option<property::Id>>,

    /// New owning [`Contract`], if any.
    pub contract_id: Option<Option<contract::Id>>,

    /// New schedule position, if any.
    pub month_number: Option<Option<MonthNumber>>,

    /// New amount, if any.
    pub amount: Option<Money>,

    /// New payment [`Date`], if any.
    pub payment_date: Option<Date>,

    /// New due [`Date`], if any.
    pub due_date: Option<Date>,

    /// New [`Method`], if any.
    pub method: Option<Method>,

    /// New stored [`Status`], if any (inner [`None`] clears it).
    pub status: Option<Option<Status>>,

    /// New [`Notes`], if any (inner [`None`] clears them).
    pub notes: Option<Option<Notes>>,
}

/// Error of validating a [`Payment`].
///
/// Carries every [`Violation`] found, not only the first one.
#[derive(Clone, Debug, StdError)]
pub struct ValidationError {
    /// All the violated rules.
    #[error(not(source))]
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Single violated [`Payment`] validation rule.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Violation {
    /// [`Payment::amount`] is zero or negative.
    #[display("Payment amount must be greater than 0")]
    NonPositiveAmount,

    /// [`Payment::contract_id`] is set without a [`Payment::month_number`].
    #[display("Month number must be set when a contract is set")]
    MissingMonthNumber,

    /// [`Payment::payment_date`] is after [`Payment::due_date`].
    #[display("Payment date must not be after due date")]
    PaidAfterDue,
}

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;

/// [`DateTime`] when a [`Payment`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Payment, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{
        MonthNumber, NewPayment, Patch, Payment, Status, Violation,
    };
    use crate::domain::contract;

    fn amount(s: &str) -> Money {
        Money::soles(s.parse().unwrap())
    }

    fn payment() -> Payment {
        Payment::new(NewPayment {
            tenant_id: None,
            property_id: None,
            contract_id: Some(contract::Id::from(7)),
            month_number: MonthNumber::new(3),
            amount: amount("1200"),
            payment_date: None,
            due_date: "2026-06-01".parse().unwrap(),
            method: None,
            notes: None,
            today: "2026-05-20".parse().unwrap(),
        })
    }

    #[test]
    fn defaults_payment_date_to_today_and_leaves_status_unset() {
        let p = payment();
        assert_eq!(p.payment_date, "2026-05-20".parse().unwrap());
        assert_eq!(p.method, super::Method::Yape);
        assert_eq!(p.status, None);
        assert!(p.id.is_none());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn month_number_stays_within_a_schedule() {
        assert!(MonthNumber::new(0).is_none());
        assert!(MonthNumber::new(13).is_none());
        assert_eq!(MonthNumber::new(12).map(MonthNumber::get), Some(12));
        assert_eq!(MonthNumber::all().count(), 12);
    }

    #[test]
    fn month_number_is_required_when_contract_is_set() {
        let mut p = payment();
        p.month_number = None;
        assert_eq!(
            p.validate().unwrap_err().violations,
            vec![Violation::MissingMonthNumber],
        );

        p.contract_id = None;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_edit_marking_payment_late() {
        let mut p = payment();
        let err = p
            .apply(Patch {
                payment_date: Some("2026-06-02".parse().unwrap()),
                ..Patch::default()
            })
            .unwrap_err();
        assert_eq!(err.violations, vec![Violation::PaidAfterDue]);
        assert_eq!(
            err.to_string(),
            "Payment date must not be after due date",
        );
    }

    #[test]
    fn status_is_only_ever_set_explicitly() {
        let mut p = payment();
        p.apply(Patch {
            status: Some(Some(Status::Paid)),
            ..Patch::default()
        })
        .unwrap();
        assert_eq!(p.status, Some(Status::Paid));

        p.apply(Patch {
            status: Some(None),
            ..Patch::default()
        })
        .unwrap();
        assert_eq!(p.status, None);
    }

    #[test]
    fn unrecognized_stored_status_parses_to_none() {
        assert_eq!("paid".parse().ok(), Some(Status::Paid));
        assert_eq!("overdue".parse().ok(), Some(Status::Overdue));
        assert_eq!("future".parse().ok(), Some(Status::Future));
        assert_eq!("PAID".parse::<Status>().ok(), None);
        assert_eq!("cancelled".parse::<Status>().ok(), None);
        assert_eq!("".parse::<Status>().ok(), None);
    }
}
