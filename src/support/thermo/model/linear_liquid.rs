//! Liquid with density and specific heat linear in temperature.
//!
//! Around a reference point `T₀`:
//!
//! - `ρ(T) = ρ₀ · (1 − β · (T − T₀))`
//! - `cp(T) = cp₀ + γ · (T − T₀)`
//!
//! where `β` is the volumetric expansion coefficient (1/K) and `γ` the slope
//! of specific heat (J/kg·K²). This is enough to reproduce the density
//! corrections applied to design flows without a full equation of state.

use thiserror::Error;
use uom::si::{
    f64::{MassDensity, SpecificHeatCapacity, ThermodynamicTemperature},
    specific_heat_capacity::joule_per_kilogram_kelvin,
    temperature_interval::kelvin as delta_kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{
        PropertyError,
        capability::{HasCp, HasDensity},
    },
    units::TemperatureDifference,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinearLiquidError {
    #[error("reference density must be positive: {0:?}")]
    Density(MassDensity),
    #[error("reference cp must be positive: {0:?}")]
    Cp(SpecificHeatCapacity),
    #[error("coefficient must be finite: {0}")]
    Coefficient(f64),
}

/// A liquid whose properties vary linearly about a reference temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearLiquid {
    reference_temperature: ThermodynamicTemperature,
    reference_density: MassDensity,
    reference_cp: SpecificHeatCapacity,
    expansion: f64,
    cp_slope: f64,
}

impl LinearLiquid {
    /// Creates a linear liquid model.
    ///
    /// `expansion` is `β` in 1/K and `cp_slope` is `γ` in J/(kg·K²).
    ///
    /// # Errors
    ///
    /// Returns [`LinearLiquidError`] for non-positive reference properties or
    /// non-finite coefficients.
    pub fn new(
        reference_temperature: ThermodynamicTemperature,
        reference_density: MassDensity,
        reference_cp: SpecificHeatCapacity,
        expansion: f64,
        cp_slope: f64,
    ) -> Result<Self, LinearLiquidError> {
        if StrictlyPositive::check(&reference_density.value).is_err() {
            return Err(LinearLiquidError::Density(reference_density));
        }
        if StrictlyPositive::check(&reference_cp.value).is_err() {
            return Err(LinearLiquidError::Cp(reference_cp));
        }
        for coefficient in [expansion, cp_slope] {
            if !coefficient.is_finite() {
                return Err(LinearLiquidError::Coefficient(coefficient));
            }
        }

        Ok(Self {
            reference_temperature,
            reference_density,
            reference_cp,
            expansion,
            cp_slope,
        })
    }

    fn offset(&self, temperature: ThermodynamicTemperature) -> f64 {
        temperature
            .minus(self.reference_temperature)
            .get::<delta_kelvin>()
    }
}

impl HasDensity for LinearLiquid {
    fn density(&self, temperature: ThermodynamicTemperature) -> Result<MassDensity, PropertyError> {
        let factor = 1.0 - self.expansion * self.offset(temperature);
        if factor <= 0.0 {
            return Err(PropertyError::OutOfDomain {
                context: format!("density is non-positive at {temperature:?}"),
            });
        }
        Ok(self.reference_density * factor)
    }
}

impl HasCp for LinearLiquid {
    fn cp(
        &self,
        temperature: ThermodynamicTemperature,
    ) -> Result<SpecificHeatCapacity, PropertyError> {
        let cp = self.reference_cp
            + SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(
                self.cp_slope * self.offset(temperature),
            );
        if cp.value <= 0.0 {
            return Err(PropertyError::OutOfDomain {
                context: format!("specific heat is non-positive at {temperature:?}"),
            });
        }
        Ok(cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        mass_density::kilogram_per_cubic_meter, thermodynamic_temperature::degree_celsius,
    };

    use crate::support::thermo::capability::LoopFluid;

    fn glycol_like() -> LinearLiquid {
        LinearLiquid::new(
            ThermodynamicTemperature::new::<degree_celsius>(5.05),
            MassDensity::new::<kilogram_per_cubic_meter>(1000.0),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4000.0),
            4e-4,
            2.0,
        )
        .expect("valid coefficients")
    }

    #[test]
    fn density_falls_with_temperature() -> Result<(), PropertyError> {
        let fluid = glycol_like();
        let reference = ThermodynamicTemperature::new::<degree_celsius>(5.05);
        let warm = ThermodynamicTemperature::new::<degree_celsius>(15.05);

        assert_relative_eq!(
            fluid.density(warm)?.get::<kilogram_per_cubic_meter>(),
            996.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(fluid.density_ratio(warm, reference)?, 0.996, epsilon = 1e-12);
        assert_relative_eq!(
            fluid.cp(warm)?.get::<joule_per_kilogram_kelvin>(),
            4020.0,
            epsilon = 1e-9
        );

        Ok(())
    }

    #[test]
    fn far_extrapolation_is_out_of_domain() {
        let fluid = glycol_like();
        let absurd = ThermodynamicTemperature::new::<degree_celsius>(5000.0);
        assert!(matches!(
            fluid.density(absurd),
            Err(PropertyError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn rejects_bad_coefficients() {
        let result = LinearLiquid::new(
            ThermodynamicTemperature::new::<degree_celsius>(20.0),
            MassDensity::new::<kilogram_per_cubic_meter>(1000.0),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4180.0),
            f64::NAN,
            0.0,
        );
        assert!(matches!(result, Err(LinearLiquidError::Coefficient(_))));
    }
}
