//! Calendar date utilities.

use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Debug, Display, Error};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, util,
    Month,
};

/// Format of a [`Date`] in its string representation (ISO 8601 date).
const FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date without any time-of-day semantics.
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`Date`] representing the current day in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc().date(),
            _of: PhantomData,
        }
    }

    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        Some(Self {
            inner: time::Date::from_calendar_date(year, month, day).ok()?,
            _of: PhantomData,
        })
    }

    /// Parses a [`Date`] from its ISO 8601 (`YYYY-MM-DD`) representation.
    ///
    /// # Errors
    ///
    /// If the provided string is not a valid ISO 8601 date.
    pub fn from_iso8601(input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            inner: time::Date::parse(input, FORMAT).map_err(ParseError)?,
            _of: PhantomData,
        })
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    /// Returns the month of this [`Date`] (1 is January).
    #[must_use]
    pub fn month(&self) -> u8 {
        u8::from(self.inner.month())
    }

    /// Returns the day-of-month of this [`Date`].
    #[must_use]
    pub fn day(&self) -> u8 {
        self.inner.day()
    }

    /// Advances this [`Date`] by the provided number of calendar months.
    ///
    /// The day-of-month is preserved whenever the target month is long
    /// enough, and is clamped to the last day of the target month otherwise:
    /// `2026-01-31` advanced by 1 month is `2026-02-28`, while advanced by
    /// 3 months it is `2026-04-30`.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn advance_months(self, months: u32) -> Self {
        let zero_based = u32::from(self.month()) - 1 + months;
        let year = self.inner.year()
            + i32::try_from(zero_based / 12).expect("months in `i32` range");
        let month = Month::try_from(u8::try_from(zero_based % 12 + 1).expect("< 13"))
            .expect("1..=12");
        let day = self.day().min(util::days_in_year_month(year, month));
        Self {
            inner: time::Date::from_calendar_date(year, month, day)
                .expect("clamped day always exists"),
            _of: PhantomData,
        }
    }

    /// Advances this [`Date`] by the provided number of calendar years,
    /// with the same day clamping as [`DateOf::advance_months()`].
    #[must_use]
    pub fn advance_years(self, years: u32) -> Self {
        self.advance_months(years * 12)
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `Date`: {_0}")]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .inner
            .format(FORMAT)
            .unwrap_or_else(|e| panic!("cannot format `Date`: {e}"));
        write!(f, "{s}")
    }
}

impl<Of: ?Sized> FromStr for DateOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso8601(s)
    }
}

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::DateOf;

    impl<Of: ?Sized> serde::Serialize for DateOf<Of> {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for DateOf<Of> {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            Self::from_iso8601(&String::deserialize(deserializer)?)
                .map_err(D::Error::custom)
        }
    }
}
