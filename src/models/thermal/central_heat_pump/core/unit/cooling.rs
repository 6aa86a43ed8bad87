use uom::{
    ConstZero,
    si::f64::{MassRate, Power, TemperatureInterval, ThermodynamicTemperature},
};

use crate::support::units::TemperatureDifference;

use super::super::{
    config::{FlowMode, UnitPerformanceRecord},
    curves::PerformanceCurves,
    state::{CurveOutputs, Dominance, SideState},
    tolerances::PlantTolerances,
};
use super::{
    Stream,
    performance::{
        OperatingPoint, apply_floors, available_capacity, cop, curve_condenser_temperature,
        electric, part_load,
    },
};

/// Inputs to a cooling solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingConditions {
    /// Chilled-water stream.
    pub evaporator: Stream,
    /// Source-loop stream taking the rejected heat.
    pub condenser: Stream,
    /// Residual cooling load still to be met.
    pub load: Power,
    /// Chilled-water outlet setpoint.
    pub setpoint: ThermodynamicTemperature,
    /// Minimum temperature of the evaporator outlet node, if any.
    pub node_minimum: Option<ThermodynamicTemperature>,
    pub flow_mode: FlowMode,
    pub dominance: Dominance,
}

/// Result of a cooling solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingSolution {
    pub point: OperatingPoint,
    /// Capacity curve output, when it came out negative and was clamped.
    pub negative_capacity_ratio: Option<f64>,
    /// The unit ran without condenser flow to reject its heat.
    pub condenser_starved: bool,
}

/// Solves a unit's cooling operating point against a residual load.
///
/// While the wrapper recovers heat the combined cooling-and-heating
/// reference set applies. When heating dominates, the evaporator is a
/// by-product and runs at the part-load ratio the heating side implies,
/// regardless of the residual cooling load.
///
/// Otherwise the unit is asked for the residual load, floored at its minimum
/// stable load and capped at its nameplate and available capacity, then
/// limited by the evaporator flow and the approach to `setpoint`:
///
/// - Variable flow: flow is sized to hold the setpoint and only the
///   available flow limits duty.
/// - Constant flow: the full available flow passes and the outlet may not
///   drop below the setpoint.
///
/// Delivered duty never exceeds the residual load; a unit asked for less than
/// its minimum stable load cycles.
pub fn solve_cooling(
    record: &UnitPerformanceRecord,
    conditions: &CoolingConditions,
    curves: &impl PerformanceCurves,
    tolerances: &PlantTolerances,
) -> CoolingSolution {
    let evap = conditions.evaporator;
    let cond = conditions.condenser;
    let set = record.reference(conditions.dominance.is_simultaneous());

    let condenser_temperature = curve_condenser_temperature(
        set.condenser_basis,
        cond.temperature,
        record.cooling.condenser_leaving,
    );
    let capacity = available_capacity(
        curves,
        set,
        record.cooling.evaporator_leaving,
        condenser_temperature,
    );
    let negative_capacity_ratio = (capacity.raw_ratio < 0.0).then_some(capacity.raw_ratio);

    let idle = CoolingSolution {
        point: OperatingPoint::idle(evap.temperature, cond.temperature),
        negative_capacity_ratio,
        condenser_starved: false,
    };
    if evap.mass_flow <= tolerances.mass_flow {
        return idle;
    }

    let minimum = record.cooling.capacity * record.cooling.min_plr;
    let to_meet = record
        .cooling
        .capacity
        .min(conditions.load.max(minimum));
    let mut duty = to_meet.min(capacity.available * set.max_plr);
    let mut mass_flow = evap.mass_flow;
    let approach = evap.temperature.minus(conditions.setpoint);

    if conditions.dominance.is_heating() {
        let ratio = if capacity.available > Power::ZERO {
            (set.capacity / capacity.available)
                .value
                .clamp(0.0, set.max_plr)
        } else {
            0.0
        };
        duty = capacity.available * ratio;
    } else if approach <= TemperatureInterval::ZERO {
        duty = Power::ZERO;
    } else {
        let deliverable = mass_flow * evap.cp * approach;
        match conditions.flow_mode {
            FlowMode::Variable => {
                let needed: MassRate = duty / (evap.cp * approach);
                if needed < mass_flow {
                    mass_flow = needed;
                } else {
                    duty = duty.min(deliverable);
                }
            }
            FlowMode::Constant => duty = duty.min(deliverable),
        }
        duty = duty.min(conditions.load);
    }

    if duty <= Power::ZERO {
        return idle;
    }

    let drop: TemperatureInterval = duty / (mass_flow * evap.cp);
    let (outlet, duty) = apply_floors(
        evap.temperature,
        evap.temperature - drop,
        duty,
        mass_flow,
        evap.cp,
        &[Some(record.evaporator_low_limit), conditions.node_minimum],
        tolerances.temperature,
    );
    if duty <= Power::ZERO {
        return idle;
    }

    let part_load = part_load(duty, capacity.available, set, tolerances.small_load);
    let electric = electric(
        curves,
        set,
        capacity.available,
        &part_load,
        outlet,
        condenser_temperature,
    );
    let condenser_duty = electric.power * record.motor_efficiency.into_inner() + duty + part_load.false_load;

    let condenser_starved = cond.mass_flow <= tolerances.mass_flow;
    let condenser_outlet = if condenser_starved {
        cond.temperature
    } else {
        let rise: TemperatureInterval = condenser_duty / (cond.mass_flow * cond.cp);
        cond.temperature + rise
    };

    CoolingSolution {
        point: OperatingPoint {
            evaporator: SideState {
                inlet_temperature: evap.temperature,
                outlet_temperature: outlet,
                mass_flow,
                duty,
                ..SideState::idle(evap.temperature)
            },
            condenser: SideState {
                inlet_temperature: cond.temperature,
                outlet_temperature: condenser_outlet,
                mass_flow: cond.mass_flow,
                duty: condenser_duty,
                ..SideState::idle(cond.temperature)
            },
            part_load,
            power: electric.power,
            cop: cop(duty, part_load.false_load, electric.power),
            curves: CurveOutputs {
                capacity_ratio: capacity.ratio,
                eir_temperature: electric.eir_temperature,
                eir_plr: electric.eir_plr,
            },
        },
        negative_capacity_ratio,
        condenser_starved,
    }
}
