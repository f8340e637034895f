//! Payment schedule of a [`Contract`].

use common::Date;

use crate::domain::{
    payment::{MonthNumber, NewPayment},
    Contract, Payment,
};

/// Number of installments a [`Contract`]'s schedule always consists of.
///
/// Fixed by design: it is not derived from the contract's actual term length.
pub const TERM_MONTHS: usize = 12;

/// Builds the twelve installments of the provided [`Contract`]'s schedule.
///
/// Installment `m` (1-based) is due on `start_date` advanced by `m - 1`
/// calendar months, with the day-of-month clamped by
/// [`Date::advance_months()`]. Every installment carries the contract's
/// current monthly rent and the default payment channel, and has no stored
/// status.
///
/// `today` is the reference date the installments' payment dates default to.
#[must_use]
pub fn installments(contract: &Contract, today: Date) -> Vec<Payment> {
    MonthNumber::all()
        .map(|month| {
            Payment::new(NewPayment {
                tenant_id: contract.tenant_id,
                property_id: contract.property_id,
                contract_id: contract.id,
                month_number: Some(month),
                amount: contract.monthly_rent,
                payment_date: None,
                due_date: contract
                    .start_date
                    .advance_months(u32::from(month.get()) - 1),
                method: None,
                notes: None,
                today,
            })
        })
        .collect()
}

/// Returns the [`MonthNumber`]s of a [`Contract`]'s schedule that have no
/// matching installment among the provided [`Payment`]s.
#[must_use]
pub fn missing_months(payments: &[Payment]) -> Vec<MonthNumber> {
    MonthNumber::all()
        .filter(|month| {
            !payments.iter().any(|p| p.month_number == Some(*month))
        })
        .collect()
}
