//! Unit-tagged quantities for the energy/emission figures.
//!
//! Consumption is reported in terajoules, the simulated generation is also
//! expressed in kilowatt-hours for pricing, and emissions are in tonnes of
//! CO2. Wrapping them keeps a TJ figure from being priced as if it were kWh.
//!
//! ```
//! use enersim_core::units::{KilowattHours, Terajoules};
//!
//! let energy = Terajoules(2.0);
//! assert_eq!(energy.to_kwh(), KilowattHours(555_556.0));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Fixed conversion used by the simulation: 1 TJ = 277 778 kWh.
pub const KWH_PER_TJ: f64 = 277_778.0;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.2} {}", self.0, $unit_name)
            }
        }

        impl $type {
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Energy in terajoules (TJ)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Terajoules(pub f64);

impl_unit_ops!(Terajoules, "TJ");

impl Terajoules {
    /// Convert to kilowatt-hours using [`KWH_PER_TJ`].
    #[inline]
    pub fn to_kwh(self) -> KilowattHours {
        KilowattHours(self.0 * KWH_PER_TJ)
    }
}

/// Energy in kilowatt-hours (kWh)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct KilowattHours(pub f64);

impl_unit_ops!(KilowattHours, "kWh");

impl KilowattHours {
    /// Monetary value at a flat price per kWh.
    #[inline]
    pub fn priced_at(self, unit_price_per_kwh: f64) -> f64 {
        self.0 * unit_price_per_kwh
    }
}

/// Mass of CO2 in metric tonnes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Tonnes(pub f64);

impl_unit_ops!(Tonnes, "t");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tj_to_kwh() {
        assert_eq!(Terajoules(1.0).to_kwh().value(), 277_778.0);
        assert_eq!(Terajoules(300.0).to_kwh().value(), 83_333_400.0);
    }

    #[test]
    fn test_ratio_of_same_unit_is_plain() {
        let ratio = Terajoules(500.0) / Terajoules(1000.0);
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Tonnes(12.5).to_string(), "12.50 t");
        assert_eq!(Terajoules(1.0).to_string(), "1.00 TJ");
    }

    #[test]
    fn test_sum() {
        let total: Terajoules = [Terajoules(1.5), Terajoules(2.5)].into_iter().sum();
        assert_eq!(total, Terajoules(4.0));
    }
}
