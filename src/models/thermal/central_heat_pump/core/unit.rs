//! Operating-point solves for a single chiller-heater unit.
//!
//! These functions are pure: they read a performance record and inlet
//! streams and return an [`OperatingPoint`] along with any conditions the
//! caller should report. Diagnostics, residual bookkeeping and snapshot
//! staging belong to the dispatcher.

mod cooling;
mod heating;
mod performance;

pub use cooling::{CoolingConditions, CoolingSolution, solve_cooling};
pub use heating::{HeatingConditions, HeatingSolution, solve_heating_only};
pub use performance::OperatingPoint;
pub(crate) use performance::cop;

use uom::si::f64::{MassRate, SpecificHeatCapacity, ThermodynamicTemperature};

/// A water stream entering one side of a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stream {
    pub temperature: ThermodynamicTemperature,
    /// Largest flow the unit may draw on this side.
    pub mass_flow: MassRate,
    pub cp: SpecificHeatCapacity,
}
