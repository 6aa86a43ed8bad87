use twine_solvers::equation::bisection;
use uom::si::{
    f64::{MassRate, Power, TemperatureInterval, ThermodynamicTemperature, VolumeRate},
    mass_rate::kilogram_per_second,
    power::watt,
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::degree_celsius,
    volume_rate::cubic_meter_per_second,
};

/// Numeric thresholds shared by every wrapper solve.
#[derive(Debug, Clone, Copy)]
pub struct PlantTolerances {
    /// Mass flow at or below which a stream is treated as stopped.
    pub mass_flow: MassRate,

    /// Temperature difference below which a clamped approach is negligible.
    pub temperature: TemperatureInterval,

    /// False-load rates below this are reported as zero.
    pub small_load: Power,

    /// Load magnitude that triggers a flow request on a loop.
    pub flow_request_load: Power,

    /// Temperature at which design volume flows are converted to mass flows.
    pub reference_temperature: ThermodynamicTemperature,

    /// Smallest design volume flow accepted from plant sizing data.
    pub small_volume_flow: VolumeRate,

    /// Settings for the heating-only duty match.
    pub heating_solve: HeatingSolveConfig,
}

impl Default for PlantTolerances {
    fn default() -> Self {
        Self {
            mass_flow: MassRate::new::<kilogram_per_second>(1e-9),
            temperature: TemperatureInterval::new::<delta_kelvin>(1e-4),
            small_load: Power::new::<watt>(1.0),
            flow_request_load: Power::new::<watt>(1.0),
            reference_temperature: ThermodynamicTemperature::new::<degree_celsius>(5.05),
            small_volume_flow: VolumeRate::new::<cubic_meter_per_second>(1e-9),
            heating_solve: HeatingSolveConfig::default(),
        }
    }
}

/// Solver configuration for matching a heating-only condenser duty.
///
/// The search variable is the operating part-load ratio.
#[derive(Debug, Clone, Copy)]
pub struct HeatingSolveConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the part-load ratio.
    pub plr_tol: f64,

    /// Absolute tolerance on the condenser duty residual.
    pub duty_tol: Power,
}

impl Default for HeatingSolveConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            plr_tol: 1e-12,
            duty_tol: Power::new::<watt>(1e-6),
        }
    }
}

impl HeatingSolveConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(crate) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.plr_tol,
            x_rel_tol: 0.0,
            residual_tol: self.duty_tol.get::<watt>(),
        }
    }
}
