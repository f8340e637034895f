//! [`Contract`] definitions.

use std::fmt;

use common::{define_kind, unit, Date, DateTime, DateTimeOf, Money};
use derive_more::{Display, Error as StdError, From, FromStr, Into};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::domain::{payment, property, tenant};
#[cfg(doc)]
use crate::domain::{schedule, Payment};

/// Lease agreement between a tenant and a property.
///
/// The nominal term is one year; the actual payment obligations live in the
/// [`Payment`] rows generated by [`schedule`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`], assigned by the persistence layer.
    ///
    /// [`None`] until the first save.
    pub id: Option<Id>,

    /// ID of the tenant renting the property.
    ///
    /// [`None`] only as an internal transient state: validation rejects it.
    pub tenant_id: Option<tenant::Id>,

    /// ID of the rented property.
    ///
    /// [`None`] only as an internal transient state: validation rejects it.
    pub property_id: Option<property::Id>,

    /// Denormalized full name of the tenant, for display only.
    pub tenant_full_name: Option<tenant::FullName>,

    /// First day of the lease term.
    pub start_date: Date,

    /// Last day of the lease term. Always after [`Contract::start_date`].
    pub end_date: Date,

    /// Monthly rent amount. Always positive.
    pub monthly_rent: Money,

    /// [`Status`] of this [`Contract`].
    ///
    /// Never transitioned automatically by this engine.
    pub status: Status,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Contract {
    /// Number of calendar months in the default lease term.
    const DEFAULT_TERM_MONTHS: u32 = 12;

    /// Creates a new transient [`Contract`] (not yet persisted, no ID).
    ///
    /// When `end_date` is omitted, it defaults to `start_date + 1 calendar
    /// year` (day clamped by [`Date::advance_months()`]).
    #[must_use]
    pub fn new(
        tenant_id: tenant::Id,
        property_id: property::Id,
        start_date: Date,
        monthly_rent: Money,
        end_date: Option<Date>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            tenant_id: Some(tenant_id),
            property_id: Some(property_id),
            tenant_full_name: None,
            start_date,
            end_date: end_date.unwrap_or_else(|| {
                start_date.advance_months(Self::DEFAULT_TERM_MONTHS)
            }),
            monthly_rent,
            status: Status::Active,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    /// Merges the provided [`Patch`] into this [`Contract`], stamps
    /// [`Contract::updated_at`] and re-validates the result.
    ///
    /// Fields absent from the [`Patch`] are left untouched. When the patch
    /// carries a new [`Contract::start_date`] and `recompute_end_date` is
    /// `true`, [`Contract::end_date`] is recomputed as `start date + 1 year`,
    /// overwriting any previously customized end date.
    ///
    /// # Errors
    ///
    /// If the patched [`Contract`] violates validation rules. The entity is
    /// still mutated in that case; callers must not persist it.
    pub fn apply(
        &mut self,
        patch: Patch,
        recompute_end_date: bool,
    ) -> Result<(), ValidationError> {
        let Patch {
            tenant_id,
            property_id,
            tenant_full_name,
            start_date,
            monthly_rent,
            status,
        } = patch;

        if let Some(tenant_id) = tenant_id {
            self.tenant_id = tenant_id;
        }
        if let Some(property_id) = property_id {
            self.property_id = property_id;
        }
        if let Some(tenant_full_name) = tenant_full_name {
            self.tenant_full_name = tenant_full_name;
        }
        if let Some(start_date) = start_date {
            self.start_date = start_date;
            if recompute_end_date {
                self.end_date =
                    start_date.advance_months(Self::DEFAULT_TERM_MONTHS);
            }
        }
        if let Some(monthly_rent) = monthly_rent {
            self.monthly_rent = monthly_rent;
        }
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = DateTime::now().coerce();

        self.validate()
    }

    /// Validates this [`Contract`], reporting all the violated rules at once.
    ///
    /// There is intentionally no minimum or maximum term length rule.
    ///
    /// # Errors
    ///
    /// If any of the validation rules is violated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.tenant_id.is_none() {
            violations.push(Violation::MissingTenant);
        }
        if self.property_id.is_none() {
            violations.push(Violation::MissingProperty);
        }
        if !self.monthly_rent.is_positive() {
            violations.push(Violation::NonPositiveRent);
        }
        if self.start_date >= self.end_date {
            violations.push(Violation::TermOrder);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

/// ID of a [`Contract`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, Ord,
    PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Id(i64);

define_kind! {
    #[doc = "Status of a [`Contract`]."]
    enum Status {
        #[doc = "The [`Contract`] is in force."]
        Active = 1,

        #[doc = "The [`Contract`] ran its full term."]
        Completed = 2,

        #[doc = "The [`Contract`] was cancelled before taking effect."]
        Cancelled = 3,

        #[doc = "The [`Contract`] was terminated before its full term."]
        Terminated = 4,
    }
}

/// Partial update of a [`Contract`].
///
/// An outer [`None`] means "leave the field untouched"; for nullable fields
/// the inner [`Option`] distinguishes "set to null" from "not present".
///
/// The end date is deliberately not patchable: it is either derived from the
/// start date or set at creation.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New tenant of the [`Contract`], if any.
    pub tenant_id: Option<Option<tenant::Id>>,

    /// New property of the [`Contract`], if any.
    pub property_id: Option<Option<property::Id>>,

    /// New denormalized tenant name, if any.
    pub tenant_full_name: Option<Option<tenant::FullName>>,

    /// New first day of the lease term, if any.
    pub start_date: Option<Date>,

    /// New monthly rent, if any.
    ///
    /// Already generated [`Payment`] amounts are not affected.
    pub monthly_rent: Option<Money>,

    /// New [`Status`], if any.
    pub status: Option<Status>,
}

/// Error of validating a [`Contract`].
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

/// Single violated [`Contract`] validation rule.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Violation {
    /// [`Contract::tenant_id`] is not set.
    #[display("Contract must have a tenant")]
    MissingTenant,

    /// [`Contract::property_id`] is not set.
    #[display("Contract must have a property")]
    MissingProperty,

    /// [`Contract::monthly_rent`] is zero or negative.
    #[display("Monthly rent must be greater than 0")]
    NonPositiveRent,

    /// [`Contract::start_date`] is not before [`Contract::end_date`].
    #[display("Start date must be before end date")]
    TermOrder,
}

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Contract, unit::Modification)>;

/// Checks whether the provided [`Payment`] belongs to the [`Contract`] with
/// the provided ID.
#[must_use]
pub fn owns(id: Id, payment: &payment::Payment) -> bool {
    payment.contract_id == Some(id)
}

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{Contract, Patch, Status, Violation};
    use crate::domain::{property, tenant};

    fn rent(s: &str) -> Money {
        Money::soles(s.parse().unwrap())
    }

    fn contract(start: &str) -> Contract {
        Contract::new(
            tenant::Id::from(1),
            property::Id::from(2),
            start.parse().unwrap(),
            rent("1200"),
            None,
        )
    }

    #[test]
    fn defaults_end_date_to_one_year_after_start() {
        let c = contract("2026-03-15");
        assert_eq!(c.end_date, "2027-03-15".parse().unwrap());
        assert_eq!(c.status, Status::Active);
        assert!(c.id.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn keeps_explicit_end_date_on_creation() {
        let c = Contract::new(
            tenant::Id::from(1),
            property::Id::from(2),
            "2026-03-15".parse().unwrap(),
            rent("1200"),
            Some("2026-09-15".parse().unwrap()),
        );
        assert_eq!(c.end_date, "2026-09-15".parse().unwrap());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn start_date_edit_overwrites_customized_end_date() {
        // Regression guard: the recompute is unconditional by default, even
        // when the end date had been customized.
        let mut c = Contract::new(
            tenant::Id::from(1),
            property::Id::from(2),
            "2026-01-01".parse().unwrap(),
            rent("1200"),
            Some("2026-06-30".parse().unwrap()),
        );

        c.apply(
            Patch {
                start_date: Some("2026-02-01".parse().unwrap()),
                ..Patch::default()
            },
            true,
        )
        .unwrap();

        assert_eq!(c.start_date, "2026-02-01".parse().unwrap());
        assert_eq!(c.end_date, "2027-02-01".parse().unwrap());
    }

    #[test]
    fn start_date_edit_preserves_end_date_when_recompute_disabled() {
        let mut c = Contract::new(
            tenant::Id::from(1),
            property::Id::from(2),
            "2026-01-01".parse().unwrap(),
            rent("1200"),
            Some("2026-06-30".parse().unwrap()),
        );

        c.apply(
            Patch {
                start_date: Some("2026-02-01".parse().unwrap()),
                ..Patch::default()
            },
            false,
        )
        .unwrap();

        assert_eq!(c.end_date, "2026-06-30".parse().unwrap());
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let mut c = contract("2026-01-01");

        // Absent field: untouched.
        c.apply(
            Patch {
                monthly_rent: Some(rent("1500")),
                tenant_full_name: Some(tenant::FullName::new("Ana Quispe")),
                ..Patch::default()
            },
            true,
        )
        .unwrap();
        assert_eq!(c.tenant_id, Some(tenant::Id::from(1)));
        assert_eq!(c.tenant_full_name, tenant::FullName::new("Ana Quispe"));

        // Explicit null: cleared, which then fails validation.
        let err = c
            .apply(
                Patch {
                    tenant_id: Some(None),
                    ..Patch::default()
                },
                true,
            )
            .unwrap_err();
        assert_eq!(err.violations, vec![Violation::MissingTenant]);
    }

    #[test]
    fn validation_reports_all_violations_at_once() {
        let mut c = contract("2026-01-01");
        c.tenant_id = None;
        c.monthly_rent = rent("0");
        c.end_date = "2025-12-31".parse().unwrap();

        let err = c.validate().unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                Violation::MissingTenant,
                Violation::NonPositiveRent,
                Violation::TermOrder,
            ],
        );
        assert_eq!(
            err.to_string(),
            "Contract must have a tenant; \
             Monthly rent must be greater than 0; \
             Start date must be before end date",
        );
    }

    #[test]
    fn status_is_never_transitioned_by_updates() {
        let mut c = contract("2026-01-01");
        c.apply(
            Patch {
                monthly_rent: Some(rent("1300")),
                ..Patch::default()
            },
            true,
        )
        .unwrap();
        assert_eq!(c.status, Status::Active);

        c.apply(
            Patch {
                status: Some(Status::Terminated),
                ..Patch::default()
            },
            true,
        )
        .unwrap();
        assert_eq!(c.status, Status::Terminated);
    }
}
