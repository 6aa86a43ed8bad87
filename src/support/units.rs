//! Extensions to [`uom`].
//!
//! Loop temperatures are absolute ([`ThermodynamicTemperature`]) while duties
//! are computed from temperature *differences*. [`uom`] does not subtract two
//! absolute temperatures, so [`TemperatureDifference::minus`] fills that gap:
//!
//! ```
//! use uom::si::f64::ThermodynamicTemperature;
//! use uom::si::{temperature_interval, thermodynamic_temperature::degree_celsius};
//! use twine_central_plant::support::units::TemperatureDifference;
//!
//! let entering = ThermodynamicTemperature::new::<degree_celsius>(12.0);
//! let leaving = ThermodynamicTemperature::new::<degree_celsius>(6.7);
//! let delta_t = entering.minus(leaving);
//! assert!((delta_t.get::<temperature_interval::kelvin>() - 5.3).abs() < 1e-12);
//! ```
//!
//! [`ThermodynamicTemperature`]: uom::si::f64::ThermodynamicTemperature

mod temperature_difference;

pub use temperature_difference::TemperatureDifference;
