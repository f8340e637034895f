//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use smart_default::SmartDefault;

#[cfg(doc)]
use crate::{command::CreateContract, domain::Contract, infra::Database};

pub use self::{command::Command, query::Query};

/// Durability mode of the payment schedule generation performed by
/// [`CreateContract`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub enum Generation {
    /// Each of the twelve installment writes is independent: a failure at
    /// installment `k` leaves installments `1..k-1` persisted and `k..12`
    /// missing.
    #[default]
    Independent,

    /// All twelve installment writes happen within a single transaction:
    /// either the whole schedule is persisted, or none of it is.
    Atomic,
}

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Durability mode of payment schedule generation.
    pub generation: Generation,

    /// Whether editing a [`Contract`]'s start date recomputes its end date as
    /// `start date + 1 year`, overwriting any customized end date.
    ///
    /// Enabled by default, reproducing the behavior of the legacy system.
    #[default(true)]
    pub recompute_end_date: bool,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }
}
