use uom::{
    ConstZero,
    si::f64::{MassRate, Power},
};

use crate::support::thermo::capability::LoopFluid;

use super::super::{
    curves::PerformanceCurves,
    diagnostics::{DiagnosticKind, DiagnosticLog, RuntimeDiagnostic},
    error::SimulateError,
    loops::PlantNodes,
    mode::UnitMode,
    schedule::ScheduleLookup,
    snapshot::SnapshotValues,
    state::WrapperRuntimeState,
    unit::{CoolingConditions, Stream, solve_cooling},
};
use super::{PassContext, PassFlows, apply_point, remaining, report_negative_capacity};

/// Serves the held cooling load with each instance in turn.
///
/// While the wrapper recovers heat, every instance stages its result in its
/// snapshot for the hot-water pass, running or not. Otherwise snapshots are
/// cleared. Returns the residual load after each instance.
///
/// # Errors
///
/// Returns [`SimulateError::Property`] if a loop fluid lookup fails.
pub(crate) fn dispatch_cooling<F, C, S>(
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
    let chilled_inlet = nodes.chilled.inlet.temperature;
    let source_inlet = nodes.source.inlet.temperature;
    let reference = ctx.tolerances.reference_temperature;

    let evaporator_ratio = ctx.fluids.chilled.density_ratio(chilled_inlet, reference)?;
    let condenser_ratio = ctx.fluids.source.density_ratio(source_inlet, reference)?;
    let evaporator_cp = ctx.fluids.chilled.cp(chilled_inlet)?;
    let condenser_cp = ctx.fluids.source.cp(source_inlet)?;

    let dominance = state.dominance;
    let setpoint = nodes.chilled.outlet_setpoint();
    let node_minimum = nodes.chilled.outlet.temperature_min;

    let mut residual = state.cooling_load.max(Power::ZERO);
    let mut claimed_evaporator = MassRate::ZERO;
    let mut claimed_condenser = MassRate::ZERO;
    let mut trace = Vec::with_capacity(ctx.config.unit_count());

    for (index, instance) in ctx.config.instances().iter().enumerate() {
        let record = ctx.config.record(index);
        let limits = state.limits[index];
        let unit = &mut state.units[index];

        if residual > Power::ZERO && ctx.schedules.is_active(instance.schedule) {
            let conditions = CoolingConditions {
                evaporator: Stream {
                    temperature: chilled_inlet,
                    mass_flow: remaining(
                        flows.chilled,
                        claimed_evaporator,
                        limits.evaporator * evaporator_ratio,
                    ),
                    cp: evaporator_cp,
                },
                condenser: Stream {
                    temperature: source_inlet,
                    mass_flow: remaining(
                        flows.source,
                        claimed_condenser,
                        limits.condenser * condenser_ratio,
                    ),
                    cp: condenser_cp,
                },
                load: residual,
                setpoint,
                node_minimum,
                flow_mode: ctx.config.flow_mode,
                dominance,
            };
            let solution = solve_cooling(record, &conditions, ctx.curves, ctx.tolerances);
            report_negative_capacity(log, &instance.label, solution.negative_capacity_ratio);

            let point = solution.point;
            if point.evaporator.duty > Power::ZERO {
                if solution.condenser_starved {
                    log.record(RuntimeDiagnostic::new(
                        DiagnosticKind::CondenserFlowStarved,
                        &instance.label,
                        "no condenser flow to reject cooling-mode heat",
                    ));
                }
                apply_point(unit, UnitMode::CoolingOnly, &point);
                residual = (residual - point.evaporator.duty).max(Power::ZERO);
                claimed_evaporator += point.evaporator.mass_flow;
                claimed_condenser += point.condenser.mass_flow;
            } else {
                unit.reset(chilled_inlet, source_inlet);
                residual = Power::ZERO;
            }
        } else {
            unit.reset(chilled_inlet, source_inlet);
        }

        unit.record_energies(ctx.time_step);
        if dominance.is_simultaneous() {
            let values = SnapshotValues::from(&*unit);
            unit.snapshot.stage(values);
        } else {
            unit.snapshot.clear();
        }
        trace.push(residual);
    }

    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{mass_rate::kilogram_per_second, power::watt};

    use crate::models::thermal::central_heat_pump::core::{
        schedule::{AlwaysOn, ScheduleId},
        state::Dominance,
        test_support::{Fixture, kg_per_s, wrapper_spec},
    };

    fn flows(chilled: f64, source: f64) -> PassFlows {
        PassFlows {
            chilled: kg_per_s(chilled),
            hot: MassRate::ZERO,
            source: kg_per_s(source),
        }
    }

    #[test]
    fn residual_falls_in_slot_order() {
        let mut fixture = Fixture::new(&[("A", 2), ("B", 1)]);
        fixture.state.cooling_load = Power::new::<watt>(180_000.0);

        let trace = dispatch_cooling(
            &fixture.plant.context(&AlwaysOn),
            &mut fixture.state,
            &fixture.nodes,
            flows(30.0, 30.0),
            &mut fixture.log,
        )
        .expect("dispatch should succeed");

        let residuals: Vec<f64> = trace.iter().map(|r| r.get::<watt>()).collect();
        assert_relative_eq!(residuals[0], 80_000.0, epsilon = 1e-6);
        assert_relative_eq!(residuals[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(residuals[2], 0.0, epsilon = 1e-6);
        assert!(trace.windows(2).all(|pair| pair[1] <= pair[0]));

        let modes: Vec<_> = fixture.state.units.iter().map(|unit| unit.mode).collect();
        assert_eq!(modes, [UnitMode::CoolingOnly, UnitMode::CoolingOnly, UnitMode::Off]);
    }

    #[test]
    fn claimed_flow_never_exceeds_the_loop() {
        for (units, load, loop_flow) in [(1, 50_000.0, 3.0), (3, 250_000.0, 7.5), (4, 20_000.0, 0.5)] {
            let mut fixture = Fixture::new(&[("A", units)]);
            fixture.state.cooling_load = Power::new::<watt>(load);

            dispatch_cooling(
                &fixture.plant.context(&AlwaysOn),
                &mut fixture.state,
                &fixture.nodes,
                flows(loop_flow, 30.0),
                &mut fixture.log,
            )
            .expect("dispatch should succeed");

            let claimed: f64 = fixture
                .state
                .units
                .iter()
                .map(|unit| unit.evaporator.mass_flow.get::<kilogram_per_second>())
                .sum();
            assert!(claimed <= loop_flow + 1e-12, "{claimed} > {loop_flow}");
        }
    }

    #[test]
    fn unscheduled_slots_are_skipped() {
        let mut spec = wrapper_spec(&[("A", 1), ("B", 1)]);
        spec.components[0].schedule = Some(ScheduleId(3));
        let mut fixture = Fixture::from_spec(spec);
        fixture.state.cooling_load = Power::new::<watt>(50_000.0);
        let schedules = |id: ScheduleId| if id.0 == 3 { 0.0 } else { 1.0 };

        dispatch_cooling(
            &fixture.plant.context(&schedules),
            &mut fixture.state,
            &fixture.nodes,
            flows(30.0, 30.0),
            &mut fixture.log,
        )
        .expect("dispatch should succeed");

        assert_eq!(fixture.state.units[0].mode, UnitMode::Off);
        assert_eq!(fixture.state.units[1].mode, UnitMode::CoolingOnly);
    }

    #[test]
    fn snapshots_follow_dominance() {
        let mut fixture = Fixture::new(&[("A", 2)]);
        fixture.state.cooling_load = Power::new::<watt>(60_000.0);
        fixture.state.dominance = Dominance::Cooling;

        dispatch_cooling(
            &fixture.plant.context(&AlwaysOn),
            &mut fixture.state,
            &fixture.nodes,
            flows(30.0, 30.0),
            &mut fixture.log,
        )
        .expect("dispatch should succeed");

        let first = &fixture.state.units[0];
        assert!(first.snapshot.is_staged());
        assert_eq!(first.snapshot.evaporator_duty(), first.evaporator.duty);
        // The idle second unit stages zeros rather than nothing.
        assert!(fixture.state.units[1].snapshot.is_staged());
        assert_eq!(fixture.state.units[1].snapshot.evaporator_duty(), Power::ZERO);

        fixture.state.dominance = Dominance::None;
        dispatch_cooling(
            &fixture.plant.context(&AlwaysOn),
            &mut fixture.state,
            &fixture.nodes,
            flows(30.0, 30.0),
            &mut fixture.log,
        )
        .expect("dispatch should succeed");
        assert!(fixture.state.units.iter().all(|unit| !unit.snapshot.is_staged()));
    }

    #[test]
    fn starved_condenser_is_reported_once_per_unit() {
        let mut fixture = Fixture::new(&[("A", 1)]);
        fixture.state.cooling_load = Power::new::<watt>(50_000.0);

        for _ in 0..3 {
            dispatch_cooling(
                &fixture.plant.context(&AlwaysOn),
                &mut fixture.state,
                &fixture.nodes,
                flows(30.0, 0.0),
                &mut fixture.log,
            )
            .expect("dispatch should succeed");
        }

        assert_eq!(fixture.log.emitted().len(), 1);
        assert_eq!(
            fixture.log.count(DiagnosticKind::CondenserFlowStarved, "A #1"),
            3
        );
    }
}
