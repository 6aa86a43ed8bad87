//! Capability traits for temperature-dependent liquid properties.

use uom::si::f64::{MassDensity, SpecificHeatCapacity, ThermodynamicTemperature};

use super::PropertyError;

pub trait HasDensity {
    /// Returns the density at the given temperature.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the density cannot be calculated.
    fn density(&self, temperature: ThermodynamicTemperature) -> Result<MassDensity, PropertyError>;
}

pub trait HasCp {
    /// Returns the isobaric specific heat at the given temperature.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the specific heat cannot be calculated.
    fn cp(
        &self,
        temperature: ThermodynamicTemperature,
    ) -> Result<SpecificHeatCapacity, PropertyError>;
}

/// Everything a plant loop needs from its working fluid.
///
/// Implemented automatically for any model providing both density and
/// specific heat.
pub trait LoopFluid: HasDensity + HasCp {
    /// Returns `ρ(T) / ρ(T_ref)`.
    ///
    /// Design volume flows are converted to mass flows at a reference
    /// temperature, and this ratio rescales them to the actual inlet state.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if either density fails or the reference
    /// density is not positive.
    fn density_ratio(
        &self,
        temperature: ThermodynamicTemperature,
        reference: ThermodynamicTemperature,
    ) -> Result<f64, PropertyError> {
        let reference_density = self.density(reference)?;
        if reference_density.value <= 0.0 {
            return Err(PropertyError::Calculation {
                context: format!("non-positive reference density {reference_density:?}"),
            });
        }
        Ok((self.density(temperature)? / reference_density).value)
    }
}

impl<T: HasDensity + HasCp> LoopFluid for T {}
