use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "pkr";
pub const PAISA_PER_RUPEE: i64 = 100;

//--------------------------------------        Pkr          ---------------------------------------------------------
/// A Pakistani rupee amount, held as a whole number of paisa (minor units).
///
/// Stored in the database as minor units. Serialized to JSON in major units (rupees), which is what the web client
/// and reports deal in. The payment provider works in minor units, so the only places that cross the ×100 boundary are
/// [`Pkr::from_minor_units`] and [`Pkr::to_minor_units`].
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash)]
#[sqlx(transparent)]
pub struct Pkr(i64);

op!(binary Pkr, Add, add);
op!(binary Pkr, Sub, sub);
op!(inplace Pkr, AddAssign, add_assign);
op!(inplace Pkr, SubAssign, sub_assign);
op!(unary Pkr, Neg, neg);

impl Mul<i64> for Pkr {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Pkr {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in rupees: {0}")]
pub struct PkrConversionError(String);

impl Pkr {
    pub fn from_rupees(rupees: i64) -> Self {
        Self(rupees * PAISA_PER_RUPEE)
    }

    pub fn from_minor_units(paisa: i64) -> Self {
        Self(paisa)
    }

    pub fn to_minor_units(&self) -> i64 {
        self.0
    }

    /// The amount in rupees, as a float. Only for display and JSON output.
    pub fn as_rupees(&self) -> f64 {
        self.0 as f64 / PAISA_PER_RUPEE as f64
    }

    pub fn try_from_rupees_f64(rupees: f64) -> Result<Self, PkrConversionError> {
        if !rupees.is_finite() {
            return Err(PkrConversionError(format!("{rupees} is not a finite number")));
        }
        let paisa = (rupees * PAISA_PER_RUPEE as f64).round();
        if paisa.abs() >= i64::MAX as f64 {
            return Err(PkrConversionError(format!("{rupees} is too large")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(paisa as i64))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Divides the amount evenly, truncating to the paisa. Returns zero when `n` is zero.
    pub fn div_or_zero(&self, n: i64) -> Self {
        if n == 0 {
            Self::default()
        } else {
            Self(self.0 / n)
        }
    }
}

impl Display for Pkr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}Rs {}.{:02}", abs / PAISA_PER_RUPEE as u64, abs % PAISA_PER_RUPEE as u64)
    }
}

impl Serialize for Pkr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % PAISA_PER_RUPEE == 0 {
            serializer.serialize_i64(self.0 / PAISA_PER_RUPEE)
        } else {
            serializer.serialize_f64(self.as_rupees())
        }
    }
}

impl<'de> Deserialize<'de> for Pkr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rupees = f64::deserialize(deserializer)?;
        Pkr::try_from_rupees_f64(rupees).map_err(serde::de::Error::custom)
    }
}
