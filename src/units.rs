//! # Physical Quantities and Unit Conversion
//!
//! Weather providers report everything in base units (kelvin, metres, metres per
//! second, hectopascals) while the display shows whatever the user configured.
//! This module keeps the two apart with a unit tag on every value.
//!
//! ## Design
//!
//! - Each physical dimension is a closed enum of units ([`Temperature`],
//!   [`Distance`], [`Speed`], [`Pressure`]). A [`Quantity`] is generic over the
//!   dimension, so converting a temperature into a speed does not compile.
//! - Every unit resolves to a [`UnitDescriptor`] holding its display symbol and
//!   its relation to the base unit of the dimension.
//! - A single [`convert`] function handles all pairs. Linear units use
//!   `(value - from.offset) / from.factor * to.factor + to.offset`; the Beaufort
//!   scale is the only non-linear unit and is special-cased there.
//!
//! Converting a unit to itself returns the input untouched, so repeated
//! round trips through the same unit never drift.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Empirical Beaufort coefficient: `v = 0.836 · B^(3/2)` m/s.
const BEAUFORT_COEFFICIENT: f32 = 0.836;

/// Highest step of the Beaufort scale (hurricane force).
pub const BEAUFORT_MAX: f32 = 12.0;

/// How a unit relates to the base unit of its dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scale {
    /// `unit = base * factor + offset`
    Linear { factor: f32, offset: f32 },
    /// Stepped wind force scale, only meaningful for speeds.
    Beaufort,
}

/// Static description of a unit: display symbol and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitDescriptor {
    pub symbol: &'static str,
    pub scale: Scale,
}

impl UnitDescriptor {
    const fn linear(symbol: &'static str, factor: f32, offset: f32) -> Self {
        Self {
            symbol,
            scale: Scale::Linear { factor, offset },
        }
    }
}

/// A unit tag belonging to one physical dimension.
pub trait Unit: Copy + PartialEq + Debug {
    /// Descriptor used by [`convert`].
    fn descriptor(self) -> UnitDescriptor;

    /// Display symbol, e.g. `"km/h"`.
    fn symbol(self) -> &'static str {
        self.descriptor().symbol
    }
}

/// Convert `value` from one unit to another unit of the same dimension.
///
/// Total over every unit pair: the type system rules out mixing dimensions,
/// and every unit of a dimension shares one base unit.
pub fn convert<U: Unit>(value: f32, from: U, to: U) -> f32 {
    if from == to {
        return value;
    }

    let base = match from.descriptor().scale {
        Scale::Linear { factor, offset } => (value - offset) / factor,
        Scale::Beaufort => beaufort_to_mps(value),
    };

    match to.descriptor().scale {
        Scale::Linear { factor, offset } => base * factor + offset,
        Scale::Beaufort => mps_to_beaufort(base),
    }
}

/// Beaufort step for a wind speed in m/s, saturating at 12.
///
/// Negative or NaN speeds count as calm.
fn mps_to_beaufort(mps: f32) -> f32 {
    let mps = mps.max(0.0);
    let step = ((1.0 / BEAUFORT_COEFFICIENT).powf(2.0 / 3.0) * mps.powf(2.0 / 3.0) + 0.5).trunc();
    step.min(BEAUFORT_MAX)
}

/// Nominal wind speed in m/s for a Beaufort step.
fn beaufort_to_mps(step: f32) -> f32 {
    BEAUFORT_COEFFICIENT * step.clamp(0.0, BEAUFORT_MAX).powf(1.5)
}

/// A scalar tagged with a unit of dimension `U`.
///
/// # Example
/// ```
/// use weather_epd::units::{Quantity, Temperature};
///
/// let reading = Quantity::new(293.15, Temperature::Kelvin);
/// assert!((reading.in_unit(Temperature::Celsius) - 20.0).abs() < 1e-4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity<U: Unit> {
    value: f32,
    unit: U,
}

impl<U: Unit> Quantity<U> {
    pub const fn new(value: f32, unit: U) -> Self {
        Self { value, unit }
    }

    pub fn value(self) -> f32 {
        self.value
    }

    pub fn unit(self) -> U {
        self.unit
    }

    /// Replace the raw value, keeping the unit tag.
    pub fn set(&mut self, value: f32) {
        self.value = value;
    }

    /// The same quantity expressed in `unit`.
    pub fn to(self, unit: U) -> Self {
        Self::new(convert(self.value, self.unit, unit), unit)
    }

    /// Numeric value in `unit`.
    pub fn in_unit(self, unit: U) -> f32 {
        convert(self.value, self.unit, unit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl Temperature {
    pub const ALL: [Temperature; 3] = [Self::Kelvin, Self::Celsius, Self::Fahrenheit];

    /// Compact suffix for tight labels ("21°" rather than "21°C").
    pub fn short_symbol(self) -> &'static str {
        match self {
            Self::Kelvin => "K",
            Self::Celsius | Self::Fahrenheit => "\u{B0}",
        }
    }
}

impl Unit for Temperature {
    fn descriptor(self) -> UnitDescriptor {
        match self {
            Self::Kelvin => UnitDescriptor::linear("K", 1.0, 0.0),
            Self::Celsius => UnitDescriptor::linear("\u{B0}C", 1.0, -273.15),
            Self::Fahrenheit => UnitDescriptor::linear("\u{B0}F", 9.0 / 5.0, -459.67),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Meters,
    Kilometers,
    Miles,
}

impl Distance {
    pub const ALL: [Distance; 3] = [Self::Meters, Self::Kilometers, Self::Miles];

    /// Largest visibility the provider reports, in this unit.
    ///
    /// Readings at or above it are shown as "> value".
    pub fn max_visibility(self) -> f32 {
        match self {
            Self::Meters => 10_000.0,
            Self::Kilometers => 10.0,
            Self::Miles => 6.0,
        }
    }
}

impl Unit for Distance {
    fn descriptor(self) -> UnitDescriptor {
        match self {
            Self::Meters => UnitDescriptor::linear("m", 1.0, 0.0),
            Self::Kilometers => UnitDescriptor::linear("km", 1.0 / 1000.0, 0.0),
            Self::Miles => UnitDescriptor::linear("mi", 1.0 / 1609.344, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knots,
    Beaufort,
}

impl Speed {
    pub const ALL: [Speed; 5] = [
        Self::MetersPerSecond,
        Self::KilometersPerHour,
        Self::MilesPerHour,
        Self::Knots,
        Self::Beaufort,
    ];
}

impl Unit for Speed {
    fn descriptor(self) -> UnitDescriptor {
        match self {
            Self::MetersPerSecond => UnitDescriptor::linear("m/s", 1.0, 0.0),
            Self::KilometersPerHour => UnitDescriptor::linear("km/h", 3.6, 0.0),
            Self::MilesPerHour => UnitDescriptor::linear("mi/h", 3.6 / 1.609_344, 0.0),
            Self::Knots => UnitDescriptor::linear("kn", 3.6 / 1.852, 0.0),
            Self::Beaufort => UnitDescriptor {
                symbol: "Bft",
                scale: Scale::Beaufort,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pressure {
    Hectopascals,
    Pascals,
    Millibars,
    MillimetersOfMercury,
    InchesOfMercury,
    Atmospheres,
    GramsPerSquareCentimeter,
    PoundsPerSquareInch,
}

impl Pressure {
    pub const ALL: [Pressure; 8] = [
        Self::Hectopascals,
        Self::Pascals,
        Self::Millibars,
        Self::MillimetersOfMercury,
        Self::InchesOfMercury,
        Self::Atmospheres,
        Self::GramsPerSquareCentimeter,
        Self::PoundsPerSquareInch,
    ];

    /// Decimal places worth showing for a typical sea-level reading.
    pub fn display_precision(self) -> usize {
        match self {
            Self::InchesOfMercury => 1,
            Self::PoundsPerSquareInch => 2,
            Self::Atmospheres => 3,
            _ => 0,
        }
    }
}

impl Unit for Pressure {
    fn descriptor(self) -> UnitDescriptor {
        match self {
            Self::Hectopascals => UnitDescriptor::linear("hPa", 1.0, 0.0),
            Self::Pascals => UnitDescriptor::linear("Pa", 100.0, 0.0),
            Self::Millibars => UnitDescriptor::linear("mbar", 1.0, 0.0),
            Self::MillimetersOfMercury => UnitDescriptor::linear("mmHg", 0.7501, 0.0),
            Self::InchesOfMercury => UnitDescriptor::linear("inHg", 0.029_53, 0.0),
            Self::Atmospheres => UnitDescriptor::linear("atm", 9.869e-4, 0.0),
            Self::GramsPerSquareCentimeter => UnitDescriptor::linear("g/cm\u{B2}", 1.02, 0.0),
            Self::PoundsPerSquareInch => UnitDescriptor::linear("psi", 0.0145, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn linear_speeds() -> Vec<Speed> {
        Speed::ALL
            .into_iter()
            .filter(|unit| *unit != Speed::Beaufort)
            .collect()
    }

    #[test]
    fn test_temperature_conversions() {
        let freezing = Quantity::new(273.15, Temperature::Kelvin);
        assert_relative_eq!(freezing.in_unit(Temperature::Celsius), 0.0, epsilon = 1e-4);
        assert_relative_eq!(freezing.in_unit(Temperature::Fahrenheit), 32.0, epsilon = 1e-3);

        let body = Quantity::new(98.6, Temperature::Fahrenheit);
        assert_relative_eq!(body.in_unit(Temperature::Celsius), 37.0, epsilon = 1e-3);
    }

    #[test]
    fn test_distance_and_visibility() {
        let mile = Quantity::new(1609.344, Distance::Meters);
        assert_relative_eq!(mile.in_unit(Distance::Miles), 1.0, epsilon = 1e-5);
        assert_relative_eq!(mile.in_unit(Distance::Kilometers), 1.609_344, epsilon = 1e-5);

        // The provider caps visibility at 10 km.
        let capped = Quantity::new(10_000.0, Distance::Meters);
        for unit in [Distance::Meters, Distance::Kilometers] {
            assert!(capped.in_unit(unit) >= unit.max_visibility());
        }
        assert!(capped.in_unit(Distance::Miles) >= Distance::Miles.max_visibility());
    }

    #[test]
    fn test_speed_conversions() {
        let wind = Quantity::new(10.0, Speed::MetersPerSecond);
        assert_relative_eq!(wind.in_unit(Speed::KilometersPerHour), 36.0, epsilon = 1e-4);
        assert_relative_eq!(wind.in_unit(Speed::MilesPerHour), 22.369, epsilon = 1e-3);
        assert_relative_eq!(wind.in_unit(Speed::Knots), 19.438, epsilon = 1e-3);
    }

    #[test]
    fn test_beaufort_table() {
        let bft = |mps: f32| convert(mps, Speed::MetersPerSecond, Speed::Beaufort);
        assert_eq!(bft(0.0), 0.0);
        assert_eq!(bft(0.3), 1.0);
        assert_eq!(bft(10.0), 5.0);
        assert_eq!(bft(32.7), 12.0);
        assert_eq!(bft(60.0), 12.0);
        assert_eq!(bft(-4.0), 0.0);

        // Non-base source units are normalised to m/s first.
        assert_eq!(convert(36.0, Speed::KilometersPerHour, Speed::Beaufort), 5.0);
    }

    #[test]
    fn test_beaufort_source_is_total() {
        let calm = convert(0.0, Speed::Beaufort, Speed::MetersPerSecond);
        assert_eq!(calm, 0.0);

        let gale = convert(8.0, Speed::Beaufort, Speed::MetersPerSecond);
        assert_eq!(convert(gale, Speed::MetersPerSecond, Speed::Beaufort), 8.0);
    }

    #[test]
    fn test_pressure_factors() {
        let standard = Quantity::new(1013.25, Pressure::Hectopascals);
        assert_relative_eq!(standard.in_unit(Pressure::Pascals), 101_325.0, epsilon = 0.5);
        assert_relative_eq!(standard.in_unit(Pressure::Millibars), 1013.25);
        assert_relative_eq!(standard.in_unit(Pressure::InchesOfMercury), 29.921, epsilon = 1e-3);
        assert_relative_eq!(standard.in_unit(Pressure::MillimetersOfMercury), 760.04, epsilon = 1e-2);
        assert_relative_eq!(standard.in_unit(Pressure::Atmospheres), 1.0, epsilon = 1e-3);
        assert_relative_eq!(standard.in_unit(Pressure::PoundsPerSquareInch), 14.69, epsilon = 1e-2);
        assert_relative_eq!(standard.in_unit(Pressure::GramsPerSquareCentimeter), 1033.5, epsilon = 0.1);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Temperature::Celsius.symbol(), "\u{B0}C");
        assert_eq!(Temperature::Fahrenheit.short_symbol(), "\u{B0}");
        assert_eq!(Temperature::Kelvin.short_symbol(), "K");
        assert_eq!(Speed::Beaufort.symbol(), "Bft");
        assert_eq!(Speed::MilesPerHour.symbol(), "mi/h");
        assert_eq!(Pressure::InchesOfMercury.symbol(), "inHg");
    }

    #[test]
    fn test_quantity_reassignment_keeps_unit() {
        let mut reading = Quantity::new(280.0, Temperature::Kelvin);
        reading.set(290.0);
        assert_eq!(reading.unit(), Temperature::Kelvin);
        assert_eq!(reading.value(), 290.0);
        assert_eq!(reading.to(Temperature::Kelvin), reading);
    }

    #[test]
    fn test_units_parse_from_config_names() {
        #[derive(Deserialize)]
        struct Units {
            speed: Speed,
            pressure: Pressure,
        }
        let units: Units =
            toml::from_str("speed = \"kilometers_per_hour\"\npressure = \"inches_of_mercury\"")
                .unwrap();
        assert_eq!(units.speed, Speed::KilometersPerHour);
        assert_eq!(units.pressure, Pressure::InchesOfMercury);
    }

    fn close(actual: f32, expected: f32) -> bool {
        (actual - expected).abs() <= 1e-3 * (1.0 + expected.abs())
    }

    proptest! {
        #[test]
        fn same_unit_conversion_is_exact(value in -1.0e6f32..1.0e6) {
            for unit in Temperature::ALL {
                prop_assert_eq!(convert(value, unit, unit), value);
            }
            for unit in Distance::ALL {
                prop_assert_eq!(convert(value, unit, unit), value);
            }
            for unit in Speed::ALL {
                prop_assert_eq!(convert(value, unit, unit), value);
            }
            for unit in Pressure::ALL {
                prop_assert_eq!(convert(value, unit, unit), value);
            }
        }

        #[test]
        fn linear_conversions_compose(value in -1000.0f32..1000.0) {
            for a in Temperature::ALL {
                for b in Temperature::ALL {
                    for c in Temperature::ALL {
                        let chained = convert(convert(value, a, b), b, c);
                        prop_assert!(close(chained, convert(value, a, c)));
                    }
                }
            }
            for a in Distance::ALL {
                for b in Distance::ALL {
                    for c in Distance::ALL {
                        let chained = convert(convert(value, a, b), b, c);
                        prop_assert!(close(chained, convert(value, a, c)));
                    }
                }
            }
            for a in Pressure::ALL {
                for b in Pressure::ALL {
                    for c in Pressure::ALL {
                        let chained = convert(convert(value, a, b), b, c);
                        prop_assert!(close(chained, convert(value, a, c)));
                    }
                }
            }
            let speeds = linear_speeds();
            for &a in &speeds {
                for &b in &speeds {
                    for &c in &speeds {
                        let chained = convert(convert(value, a, b), b, c);
                        prop_assert!(close(chained, convert(value, a, c)));
                    }
                }
            }
        }

        #[test]
        fn beaufort_is_monotonic_and_bounded(a in 0.0f32..100.0, b in 0.0f32..100.0) {
            let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
            let slow_bft = convert(slow, Speed::MetersPerSecond, Speed::Beaufort);
            let fast_bft = convert(fast, Speed::MetersPerSecond, Speed::Beaufort);
            prop_assert!(slow_bft <= fast_bft);
            prop_assert!(fast_bft <= BEAUFORT_MAX);
            prop_assert!(slow_bft >= 0.0);
        }
    }
}
