//! Read model definitions.

pub mod installment;
pub mod progress;
pub mod timeline;

pub use self::{progress::Progress, timeline::MonthSlot};
