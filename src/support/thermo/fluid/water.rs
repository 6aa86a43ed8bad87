use uom::si::{
    f64::{MassDensity, SpecificHeatCapacity, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::{joule_per_kilogram_kelvin, kilojoule_per_kilogram_kelvin},
    thermodynamic_temperature::degree_celsius,
};

use crate::support::thermo::model::{
    LinearLiquid, LinearLiquidError,
    incompressible::{IncompressibleFluid, IncompressibleParameters},
};

/// Liquid water as it circulates in chilled- and hot-water loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Water;

impl Water {
    /// Water with density falling linearly from 20 °C.
    ///
    /// The expansion coefficient is fitted over 5–60 °C, the span between a
    /// chilled-water supply and a hot-water return, so design flows pick up
    /// the density correction without a full equation of state.
    ///
    /// # Errors
    ///
    /// Never fails for these constants; the result type is the model's.
    pub fn linear() -> Result<LinearLiquid, LinearLiquidError> {
        LinearLiquid::new(
            ThermodynamicTemperature::new::<degree_celsius>(20.0),
            MassDensity::new::<kilogram_per_cubic_meter>(998.2),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4182.0),
            3.2e-4,
            0.0,
        )
    }
}

impl IncompressibleFluid for Water {
    fn parameters() -> IncompressibleParameters {
        IncompressibleParameters::new(
            SpecificHeatCapacity::new::<kilojoule_per_kilogram_kelvin>(4.184),
            MassDensity::new::<kilogram_per_cubic_meter>(997.047),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::thermo::capability::HasDensity;

    #[test]
    fn linear_water_tracks_loop_temperatures() {
        let water = Water::linear().expect("water constants are valid");
        let density = |celsius: f64| {
            water
                .density(ThermodynamicTemperature::new::<degree_celsius>(celsius))
                .expect("inside the fitted range")
                .get::<kilogram_per_cubic_meter>()
        };

        assert_relative_eq!(density(20.0), 998.2, epsilon = 1e-9);
        // Tabulated: 1000.0 kg/m³ at 5 °C, 983.2 kg/m³ at 60 °C.
        assert_relative_eq!(density(5.0), 1000.0, max_relative = 5e-3);
        assert_relative_eq!(density(60.0), 983.2, max_relative = 5e-3);
    }
}
