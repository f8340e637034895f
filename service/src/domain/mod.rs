//! Domain definitions.

pub mod contract;
pub mod payment;
pub mod property;
pub mod schedule;
pub mod tenant;

pub use self::{contract::Contract, payment::Payment};
