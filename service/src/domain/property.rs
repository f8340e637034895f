//! Property definitions.
//!
//! Properties are managed outside this engine; only their identity is
//! referenced here.

use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// ID of a property, assigned by the persistence layer.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, Ord,
    PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Id(i64);
