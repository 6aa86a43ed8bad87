//! Problem formulation for matching a heating-only condenser duty.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use uom::si::{
    f64::{Power, TemperatureInterval, ThermodynamicTemperature},
    power::watt,
};

use super::super::super::{
    config::{ReferenceSet, UnitPerformanceRecord},
    curves::PerformanceCurves,
    state::{CurveOutputs, SideState},
    tolerances::PlantTolerances,
};
use super::super::{
    Stream,
    performance::{Capacity, OperatingPoint, apply_floors, cop, electric, part_load},
};

/// Model adapter exposing the operating part-load ratio as the only input.
///
/// The evaporator draws `available capacity × ratio` from the source loop,
/// subject to its temperature floors, and the condenser rejects that plus
/// motor heat and false load. The condenser outlet is left for the caller.
pub(super) struct HeatingOnlyModel<'a, C> {
    pub(super) record: &'a UnitPerformanceRecord,
    pub(super) set: &'a ReferenceSet,
    pub(super) evaporator: Stream,
    pub(super) condenser_inlet: ThermodynamicTemperature,
    pub(super) node_minimum: Option<ThermodynamicTemperature>,
    pub(super) capacity: Capacity,
    pub(super) condenser_temperature: f64,
    pub(super) curves: &'a C,
    pub(super) tolerances: &'a PlantTolerances,
}

impl<C: PerformanceCurves> HeatingOnlyModel<'_, C> {
    pub(super) fn operating_point(&self, ratio: f64) -> OperatingPoint {
        let evap = self.evaporator;
        let duty = self.capacity.available * ratio;
        let drop: TemperatureInterval = duty / (evap.mass_flow * evap.cp);
        let (outlet, duty) = apply_floors(
            evap.temperature,
            evap.temperature - drop,
            duty,
            evap.mass_flow,
            evap.cp,
            &[Some(self.record.evaporator_low_limit), self.node_minimum],
            self.tolerances.temperature,
        );

        let part_load = part_load(
            duty,
            self.capacity.available,
            self.set,
            self.tolerances.small_load,
        );
        let electric = electric(
            self.curves,
            self.set,
            self.capacity.available,
            &part_load,
            outlet,
            self.condenser_temperature,
        );

        OperatingPoint {
            evaporator: SideState {
                inlet_temperature: evap.temperature,
                outlet_temperature: outlet,
                mass_flow: evap.mass_flow,
                duty,
                ..SideState::idle(evap.temperature)
            },
            condenser: SideState {
                duty: electric.power * self.record.motor_efficiency.into_inner() + duty + part_load.false_load,
                ..SideState::idle(self.condenser_inlet)
            },
            part_load,
            power: electric.power,
            cop: cop(duty, part_load.false_load, electric.power),
            curves: CurveOutputs {
                capacity_ratio: self.capacity.ratio,
                eir_temperature: electric.eir_temperature,
                eir_plr: electric.eir_plr,
            },
        }
    }
}

impl<C: PerformanceCurves> Model for HeatingOnlyModel<'_, C> {
    type Input = f64;
    type Output = OperatingPoint;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.operating_point(*input))
    }
}

/// Residual is `condenser duty − target`.
pub(super) struct CondenserDutyProblem {
    pub(super) target: Power,
}

impl EquationProblem<1> for CondenserDutyProblem {
    type Input = f64;
    type Output = OperatingPoint;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([(output.condenser.duty - self.target).get::<watt>()])
    }
}
