//! [`Query`] collection related to [`Payment`] listings.

use common::operations::By;

use crate::domain::{contract, Payment};
#[cfg(doc)]
use crate::{domain::Contract, Query};

use super::DatabaseQuery;

/// Queries all the [`Payment`]s referencing a [`Contract`] by its
/// [`contract::Id`].
pub type ByContract = DatabaseQuery<By<Vec<Payment>, contract::Id>>;
