//! Incompressible liquid model with constant properties.
//!
//! `Incompressible` treats a loop liquid as having constant density and a
//! constant specific heat. Density ratios against any reference temperature
//! are therefore exactly one, so design volume flows convert to the same
//! mass flow at every inlet temperature.
//!
//! Use [`LinearLiquid`](super::LinearLiquid) when the density correction of
//! a real loop fluid matters.

use std::marker::PhantomData;

use thiserror::Error;
use uom::si::f64::{MassDensity, SpecificHeatCapacity, ThermodynamicTemperature};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{
        PropertyError,
        capability::{HasCp, HasDensity},
    },
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IncompressibleParametersError {
    #[error("invalid cp: {cp:?}")]
    Cp { cp: SpecificHeatCapacity },
    #[error("invalid density: {density:?}")]
    Density { density: MassDensity },
}

/// Constant parameters for the [`Incompressible`] model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncompressibleParameters {
    pub cp: SpecificHeatCapacity,
    pub density: MassDensity,
}

impl IncompressibleParameters {
    #[must_use]
    pub fn new(cp: SpecificHeatCapacity, density: MassDensity) -> Self {
        Self { cp, density }
    }
}

/// Fluid constants required by the [`Incompressible`] model.
pub trait IncompressibleFluid {
    /// Returns the constant parameters for use with [`Incompressible`].
    fn parameters() -> IncompressibleParameters;
}

/// Incompressible liquid model with constant density and heat capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incompressible<Fluid> {
    cp: SpecificHeatCapacity,
    density: MassDensity,
    _marker: PhantomData<Fluid>,
}

impl<Fluid> Incompressible<Fluid> {
    /// Creates an incompressible model using constants defined by `Fluid`.
    ///
    /// # Errors
    ///
    /// Returns [`IncompressibleParametersError`] if a constant is not strictly positive.
    pub fn new() -> Result<Self, IncompressibleParametersError>
    where
        Fluid: IncompressibleFluid,
    {
        Self::with_parameters(Fluid::parameters())
    }

    /// Creates an incompressible model from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`IncompressibleParametersError`] if a constant is not strictly positive.
    pub fn with_parameters(
        parameters: IncompressibleParameters,
    ) -> Result<Self, IncompressibleParametersError> {
        let IncompressibleParameters { cp, density } = parameters;
        if StrictlyPositive::check(&cp.value).is_err() {
            return Err(IncompressibleParametersError::Cp { cp });
        }
        if StrictlyPositive::check(&density.value).is_err() {
            return Err(IncompressibleParametersError::Density { density });
        }

        Ok(Self {
            cp,
            density,
            _marker: PhantomData,
        })
    }
}

impl<Fluid> HasDensity for Incompressible<Fluid> {
    fn density(&self, _temperature: ThermodynamicTemperature) -> Result<MassDensity, PropertyError> {
        Ok(self.density)
    }
}

impl<Fluid> HasCp for Incompressible<Fluid> {
    fn cp(
        &self,
        _temperature: ThermodynamicTemperature,
    ) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(self.cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        mass_density::kilogram_per_cubic_meter,
        specific_heat_capacity::{joule_per_kilogram_kelvin, kilojoule_per_kilogram_kelvin},
        thermodynamic_temperature::degree_celsius,
    };

    use crate::support::thermo::{capability::LoopFluid, fluid::Water};

    #[test]
    fn water_properties_are_constant() -> Result<(), PropertyError> {
        let water = Incompressible::<Water>::new().expect("water parameters are valid");
        let cold = ThermodynamicTemperature::new::<degree_celsius>(5.0);
        let hot = ThermodynamicTemperature::new::<degree_celsius>(60.0);

        assert_relative_eq!(water.cp(cold)?.get::<kilojoule_per_kilogram_kelvin>(), 4.184);
        assert_eq!(water.cp(cold)?, water.cp(hot)?);
        assert_relative_eq!(
            water.density(hot)?.get::<kilogram_per_cubic_meter>(),
            997.047
        );
        assert_relative_eq!(water.density_ratio(hot, cold)?, 1.0);

        Ok(())
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let parameters = IncompressibleParameters::new(
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(0.0),
            MassDensity::new::<kilogram_per_cubic_meter>(1000.0),
        );
        assert!(matches!(
            Incompressible::<Water>::with_parameters(parameters),
            Err(IncompressibleParametersError::Cp { .. })
        ));
    }
}
