//! Volume units and conversions.
//!
//! The analytics work in US fluid ounces; this table lets callers accept and
//! display other units. Every unit is defined by its size in milliliters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum VolumeUnit {
    Liter,
    Milliliter,
    Ounce,
    Pint,
    UsGallon,
    ImperialGallon,
    TwelveOunceBeer,
    HalfBarrelKeg,
    PonyKeg,
    Cup,
    Quart,
}

impl VolumeUnit {
    pub const ALL: [VolumeUnit; 11] = [
        VolumeUnit::Liter,
        VolumeUnit::Milliliter,
        VolumeUnit::Ounce,
        VolumeUnit::Pint,
        VolumeUnit::UsGallon,
        VolumeUnit::ImperialGallon,
        VolumeUnit::TwelveOunceBeer,
        VolumeUnit::HalfBarrelKeg,
        VolumeUnit::PonyKeg,
        VolumeUnit::Cup,
        VolumeUnit::Quart,
    ];

    /// Size of one unit in milliliters.
    pub fn milliliters(&self) -> f64 {
        match self {
            VolumeUnit::Liter => 1000.0,
            VolumeUnit::Milliliter => 1.0,
            VolumeUnit::Ounce => 29.57353,
            VolumeUnit::Pint => 473.17648,
            VolumeUnit::UsGallon => 3785.411784,
            VolumeUnit::ImperialGallon => 4546.09,
            VolumeUnit::TwelveOunceBeer => 354.882,
            VolumeUnit::HalfBarrelKeg => 58673.88,
            VolumeUnit::PonyKeg => 29336.94,
            VolumeUnit::Cup => 236.588,
            VolumeUnit::Quart => 946.353,
        }
    }

    /// Short name used on the command line and in config.
    pub fn short_name(&self) -> &'static str {
        match self {
            VolumeUnit::Liter => "l",
            VolumeUnit::Milliliter => "ml",
            VolumeUnit::Ounce => "oz",
            VolumeUnit::Pint => "pint",
            VolumeUnit::UsGallon => "gal",
            VolumeUnit::ImperialGallon => "imp-gal",
            VolumeUnit::TwelveOunceBeer => "beer",
            VolumeUnit::HalfBarrelKeg => "half-barrel",
            VolumeUnit::PonyKeg => "pony",
            VolumeUnit::Cup => "cup",
            VolumeUnit::Quart => "quart",
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for VolumeUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "l" | "liter" | "liters" | "litre" => VolumeUnit::Liter,
            "ml" | "milliliter" | "milliliters" => VolumeUnit::Milliliter,
            "oz" | "ounce" | "ounces" => VolumeUnit::Ounce,
            "pint" | "pints" => VolumeUnit::Pint,
            "gal" | "gallon" | "us-gal" | "us_gallon" => VolumeUnit::UsGallon,
            "imp-gal" | "imperial_gallon" => VolumeUnit::ImperialGallon,
            "beer" | "twelve_ounce_beer" => VolumeUnit::TwelveOunceBeer,
            "half-barrel" | "half_barrel_keg" => VolumeUnit::HalfBarrelKeg,
            "pony" | "pony_keg" => VolumeUnit::PonyKeg,
            "cup" | "cups" => VolumeUnit::Cup,
            "quart" | "quarts" => VolumeUnit::Quart,
            other => {
                return Err(ValidationError::invalid_value(
                    "unit",
                    format!("unknown volume unit '{other}'"),
                ))
            }
        };
        Ok(unit)
    }
}

impl TryFrom<String> for VolumeUnit {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An amount tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: VolumeUnit,
}

impl Quantity {
    pub fn new(amount: f64, unit: VolumeUnit) -> Self {
        Self { amount, unit }
    }

    pub fn ounces(amount: f64) -> Self {
        Self::new(amount, VolumeUnit::Ounce)
    }

    pub fn convert_to(&self, unit: VolumeUnit) -> Quantity {
        let ml = self.amount * self.unit.milliliters();
        Quantity::new(ml / unit.milliliters(), unit)
    }

    pub fn in_ounces(&self) -> f64 {
        self.convert_to(VolumeUnit::Ounce).amount
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn pint_is_sixteen_ounces() {
        assert!(close(Quantity::new(1.0, VolumeUnit::Pint).in_ounces(), 16.0));
    }

    #[test]
    fn liter_to_milliliters() {
        let q = Quantity::new(1.5, VolumeUnit::Liter).convert_to(VolumeUnit::Milliliter);
        assert!(close(q.amount, 1500.0));
        assert_eq!(q.unit, VolumeUnit::Milliliter);
    }

    #[test]
    fn half_barrel_holds_about_124_pints() {
        let pints = Quantity::new(1.0, VolumeUnit::HalfBarrelKeg)
            .convert_to(VolumeUnit::Pint)
            .amount;
        assert!((pints - 124.0).abs() < 0.01);
    }

    #[test]
    fn short_names_parse_back() {
        for unit in VolumeUnit::ALL {
            assert_eq!(unit.short_name().parse::<VolumeUnit>().unwrap(), unit);
        }
        assert!("hogsheads".parse::<VolumeUnit>().is_err());
    }

    #[test]
    fn deserializes_short_and_long_names() {
        let short: VolumeUnit = serde_json::from_str("\"oz\"").unwrap();
        let long: VolumeUnit = serde_json::from_str("\"half_barrel_keg\"").unwrap();
        assert_eq!(short, VolumeUnit::Ounce);
        assert_eq!(long, VolumeUnit::HalfBarrelKeg);
        assert_eq!(serde_json::to_string(&VolumeUnit::UsGallon).unwrap(), "\"us_gallon\"");
        assert!(serde_json::from_str::<VolumeUnit>("\"hogsheads\"").is_err());
    }
}
