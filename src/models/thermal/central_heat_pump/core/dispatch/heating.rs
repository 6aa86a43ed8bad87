use uom::{
    ConstZero,
    si::{
        f64::{MassRate, Power, SpecificHeatCapacity, TemperatureInterval},
        temperature_interval::kelvin as delta_kelvin,
    },
};

use crate::support::{thermo::capability::LoopFluid, units::TemperatureDifference};

use super::super::{
    config::FlowMode,
    curves::PerformanceCurves,
    diagnostics::{DiagnosticKind, DiagnosticLog, RuntimeDiagnostic},
    error::SimulateError,
    loops::PlantNodes,
    mode::{SnapshotField, UnitMode},
    schedule::ScheduleLookup,
    snapshot::SnapshotValues,
    state::{Dominance, SideState, UnitRuntimeState, WrapperRuntimeState},
    tolerances::PlantTolerances,
    unit::{HeatingConditions, Stream, cop, solve_heating_only},
};
use super::{PassContext, PassFlows, apply_point, remaining, report_negative_capacity};

/// Serves the held heating load with each instance in turn.
///
/// Heat-recovery instances take their condenser duty from the snapshot the
/// cooling pass staged; only the hot-water flow and outlet are solved here.
/// Snapshots are read, never written. Returns the residual load after each
/// instance.
///
/// # Errors
///
/// Returns [`SimulateError`] if a fluid lookup or a heating-only duty match
/// fails.
pub(crate) fn dispatch_heating<F, C, S>(
    ctx: &PassContext<'_, F, C, S>,
    state: &mut WrapperRuntimeState,
    nodes: &PlantNodes,
    flows: PassFlows,
    log: &mut DiagnosticLog,
) -> Result<Vec<Power>, SimulateError>
where
    F: LoopFluid,
    C: PerformanceCurves,
    S: ScheduleLookup,
{
    let hot_inlet = nodes.hot.inlet.temperature;
    let source_inlet = nodes.source.inlet.temperature;
    let reference = ctx.tolerances.reference_temperature;

    let hot_ratio = ctx.fluids.hot.density_ratio(hot_inlet, reference)?;
    let source_ratio = ctx.fluids.source.density_ratio(source_inlet, reference)?;
    let hot_cp = ctx.fluids.hot.cp(hot_inlet)?;
    let source_cp = ctx.fluids.source.cp(source_inlet)?;

    let dominance = state.dominance;
    let node_minimum = nodes.source.outlet.temperature_min;

    let mut residual = state.heating_load.max(Power::ZERO);
    let mut claimed_hot = MassRate::ZERO;
    let mut claimed_source = MassRate::ZERO;
    let mut trace = Vec::with_capacity(ctx.config.unit_count());

    for (index, instance) in ctx.config.instances().iter().enumerate() {
        let record = ctx.config.record(index);
        let limits = state.limits[index];
        let unit = &mut state.units[index];

        let lift = record.heating.condenser_leaving.minus(hot_inlet);
        if residual > Power::ZERO && lift < TemperatureInterval::ZERO {
            log.record(
                RuntimeDiagnostic::new(
                    DiagnosticKind::NegativeHeatingDeltaT,
                    &instance.label,
                    "reference heating leaving temperature is below the hot water inlet",
                )
                .with_value(lift.get::<delta_kelvin>()),
            );
        }

        let running = residual > Power::ZERO
            && ctx.schedules.is_active(instance.schedule)
            && lift >= TemperatureInterval::ZERO;
        let recovered = unit.snapshot.evaporator_duty() > Power::ZERO;
        let staged = unit.snapshot.values().copied();

        let hot = Stream {
            temperature: hot_inlet,
            mass_flow: remaining(flows.hot, claimed_hot, limits.hot_water * hot_ratio),
            cp: hot_cp,
        };

        match (select_mode(dominance, running, recovered), staged) {
            (mode @ (UnitMode::HeatingOnly | UnitMode::HeatingWhileRecovery), _) => {
                let conditions = HeatingConditions {
                    evaporator: Stream {
                        temperature: source_inlet,
                        mass_flow: remaining(
                            flows.source,
                            claimed_source,
                            limits.source_evaporator * source_ratio,
                        ),
                        cp: source_cp,
                    },
                    condenser: hot,
                    load: residual,
                    node_minimum,
                    flow_mode: ctx.config.flow_mode,
                };
                let solution = solve_heating_only(record, &conditions, ctx.curves, ctx.tolerances)?;
                report_negative_capacity(log, &instance.label, solution.negative_capacity_ratio);

                let point = solution.point;
                if point.condenser.duty > Power::ZERO {
                    apply_point(unit, mode, &point);
                    residual = (residual - point.condenser.duty).max(Power::ZERO);
                    claimed_hot += point.condenser.mass_flow;
                    claimed_source += point.evaporator.mass_flow;
                } else {
                    unit.reset(source_inlet, hot_inlet);
                    residual = Power::ZERO;
                }
            }
            (UnitMode::HeatRecovery, Some(values)) => {
                match recovered_condenser(
                    values.condenser.duty,
                    hot,
                    lift,
                    ctx.config.flow_mode,
                    ctx.tolerances,
                ) {
                    Some(condenser) => {
                        copy_snapshot(unit, UnitMode::HeatRecovery, &values);
                        unit.condenser = condenser;
                        unit.rejected =
                            undelivered(&values, condenser.duty, source_cp, ctx.tolerances);
                        residual = (residual - condenser.duty).max(Power::ZERO);
                        claimed_hot += condenser.mass_flow;
                        claimed_source += unit.rejected.mass_flow;
                    }
                    None => {
                        copy_snapshot(unit, UnitMode::CoolingWhileRecovery, &values);
                        claimed_source += values.condenser.mass_flow;
                    }
                }
            }
            (UnitMode::CoolingWhileRecovery, Some(values)) => {
                copy_snapshot(unit, UnitMode::CoolingWhileRecovery, &values);
                claimed_source += values.condenser.mass_flow;
            }
            _ => unit.reset(source_inlet, hot_inlet),
        }

        unit.record_energies(ctx.time_step);
        trace.push(residual);
    }

    Ok(trace)
}

/// Picks a unit's heating-pass mode.
///
/// `running` means heating load remains, the unit is scheduled and its
/// reference leaving temperature is above the hot-water inlet. `recovered`
/// means the cooling pass staged a positive evaporator duty for it.
fn select_mode(dominance: Dominance, running: bool, recovered: bool) -> UnitMode {
    match dominance {
        Dominance::None if running => UnitMode::HeatingOnly,
        Dominance::None => UnitMode::Off,
        Dominance::Cooling | Dominance::Heating if running && recovered => UnitMode::HeatRecovery,
        Dominance::Cooling | Dominance::Heating if recovered => UnitMode::CoolingWhileRecovery,
        Dominance::Heating if running => UnitMode::HeatingWhileRecovery,
        Dominance::Cooling | Dominance::Heating => UnitMode::Off,
    }
}

/// Takes the fields a mode reads from the cooling pass.
///
/// Heat recovery books the compressor power as heating electricity.
fn copy_snapshot(unit: &mut UnitRuntimeState, mode: UnitMode, values: &SnapshotValues) {
    *unit = UnitRuntimeState {
        mode,
        snapshot: unit.snapshot,
        ..UnitRuntimeState::off(values.evaporator.inlet_temperature, values.condenser.inlet_temperature)
    };
    for field in mode.role().reads_snapshot {
        match field {
            SnapshotField::PartLoad => unit.part_load = values.part_load,
            SnapshotField::CurveOutputs => unit.curves = values.curves,
            SnapshotField::Evaporator => unit.evaporator = values.evaporator,
            SnapshotField::Condenser => unit.condenser = values.condenser,
            SnapshotField::CoolingPower if mode == UnitMode::HeatRecovery => {
                unit.heating_power = values.cooling_power;
            }
            SnapshotField::CoolingPower => unit.cooling_power = values.cooling_power,
        }
    }
    unit.cop = cop(
        values.evaporator.duty,
        values.part_load.false_load,
        values.cooling_power,
    );
}

/// Hot-water side of a heat-recovery unit rejecting `duty`.
///
/// Returns `None` when nothing can be delivered: no flow, no lift, or no
/// recovered duty.
fn recovered_condenser(
    duty: Power,
    hot: Stream,
    lift: TemperatureInterval,
    flow_mode: FlowMode,
    tolerances: &PlantTolerances,
) -> Option<SideState> {
    if duty <= Power::ZERO || hot.mass_flow <= tolerances.mass_flow || lift <= tolerances.temperature
    {
        return None;
    }

    let deliverable = hot.mass_flow * hot.cp * lift;
    let (mass_flow, duty) = match flow_mode {
        FlowMode::Variable => {
            let needed: MassRate = duty / (hot.cp * lift);
            if needed > hot.mass_flow {
                (hot.mass_flow, duty.min(deliverable))
            } else {
                (needed, duty)
            }
        }
        FlowMode::Constant => (hot.mass_flow, duty.min(deliverable)),
    };

    let rise: TemperatureInterval = duty / (mass_flow * hot.cp);
    Some(SideState {
        inlet_temperature: hot.temperature,
        outlet_temperature: hot.temperature + rise,
        mass_flow,
        duty,
        ..SideState::idle(hot.temperature)
    })
}

/// Source side of a recovering unit for the staged condenser heat the
/// hot-water loop did not take.
///
/// The heat leaves through the condenser flow the cooling pass claimed on
/// the source loop, so the unit's condenser duties still sum to the staged
/// energy balance.
fn undelivered(
    values: &SnapshotValues,
    delivered: Power,
    cp: SpecificHeatCapacity,
    tolerances: &PlantTolerances,
) -> SideState {
    let inlet = values.condenser.inlet_temperature;
    let duty = values.condenser.duty - delivered;
    if duty <= Power::ZERO {
        return SideState::idle(inlet);
    }

    let mass_flow = values.condenser.mass_flow;
    let outlet_temperature = if mass_flow > tolerances.mass_flow {
        let rise: TemperatureInterval = duty / (mass_flow * cp);
        inlet + rise
    } else {
        inlet
    };
    SideState {
        outlet_temperature,
        mass_flow,
        duty,
        ..SideState::idle(inlet)
    }
}
