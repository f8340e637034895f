//! [`Command`] definition.

pub mod create_contract;
pub mod create_payment;
pub mod delete_contract;
pub mod delete_payment;
pub mod repair_schedule;
pub mod update_contract;
pub mod update_payment;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_contract::CreateContract, create_payment::CreatePayment,
    delete_contract::DeleteContract, delete_payment::DeletePayment,
    repair_schedule::RepairSchedule, update_contract::UpdateContract,
    update_payment::UpdatePayment,
};
