//! Tenant definitions.
//!
//! Tenants are managed outside this engine; only their identity and a
//! denormalized display name are referenced here.


use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Contract;

/// ID of a tenant, assigned by the persistence layer.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, Ord,
    PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Id(i64);

/// Full name of a tenant, denormalized onto a [`Contract`] for display.
///
/// Never authoritative: the tenant record owns the real name.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct FullName(String);

impl FullName {
    /// Creates a new [`FullName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`FullName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl std::str::FromStr for FullName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FullName`")
    }
}
