use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin as abs_kelvin,
};

/// Subtracts two absolute temperatures into a [`TemperatureInterval`].
///
/// See [uom#380](https://github.com/iliekturtles/uom/issues/380) for why this
/// is not provided by [`uom`] itself.
pub trait TemperatureDifference {
    /// Returns the temperature difference `self - other`.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        temperature_interval::kelvin as delta_kelvin,
        thermodynamic_temperature::degree_celsius,
    };

    #[test]
    fn evaporator_approach() {
        let inlet = ThermodynamicTemperature::new::<degree_celsius>(12.2);
        let outlet = ThermodynamicTemperature::new::<degree_celsius>(6.7);

        assert_relative_eq!(inlet.minus(outlet).get::<delta_kelvin>(), 5.5, epsilon = 1e-12);
        assert_relative_eq!(outlet.minus(inlet).get::<delta_kelvin>(), -5.5, epsilon = 1e-12);
    }
}
