//! Central heat-pump plant models.
//!
//! This module provides a [`twine_core::Model`] implementation for a central
//! heat-pump wrapper. The computational core is in the internal [`core`]
//! module; hosts that keep their own per-call state can drive
//! [`WrapperOrchestrator`] directly instead.

pub(crate) mod core;

pub use self::core::{
    AlwaysOn, Authority, Autosizable, CapacityRange, ComponentSlot, CondenserBasis,
    CondenserSideUpdate, ConfigError, CoolingConditions, CoolingSolution, CrossLoopSnapshot,
    Curve, CurveId, CurveLibrary, CurveOutputs, CurveSet, CurveShape, DiagnosticKind,
    DiagnosticLog, DiagnosticSummary, Dominance, FlowMode, FlowPriority, HeatingConditions,
    HeatingSolution, HeatingSolveConfig, InitReport, InstanceFlowLimits, LoopFlows, LoopFluids,
    LoopKind, LoopNode, LoopReport, LoopRequest, LoopSide, ModeRole, OperatingPoint, PartLoad,
    PerformanceCurves, PlantDesign, PlantNodes, PlantTolerances, ReferenceSet, ReferenceSpec,
    RuntimeDiagnostic, ScheduleId, ScheduleLookup, ScheduleValues, Severity, SideState,
    SimulateError, SimulateOutcome, SizingData, SnapshotField, SnapshotValues, Stream,
    UnitInstance, UnitMode, UnitPerformanceRecord, UnitRuntimeState, UnitSpec, WrapperConfig,
    WrapperOrchestrator, WrapperPlant, WrapperReport, WrapperRuntimeState, WrapperSession,
    WrapperSpec, size_unit, solve_cooling, solve_heating_only,
};

use twine_core::Model;

use crate::support::thermo::capability::LoopFluid;

/// Everything one wrapper call reads.
#[derive(Debug, Clone)]
pub struct CentralHeatPumpInput {
    pub session: WrapperSession,
    pub nodes: PlantNodes,
    pub request: LoopRequest,
    /// Schedule values for the current timestep.
    pub schedules: ScheduleValues,
}

/// Everything one wrapper call produces.
#[derive(Debug, Clone)]
pub struct CentralHeatPumpOutput {
    /// Session to pass into the next call.
    pub session: WrapperSession,
    /// Nodes with the wrapper's outlet temperatures and flow requests applied.
    pub nodes: PlantNodes,
    pub outcome: SimulateOutcome,
}

/// A sized central heat-pump wrapper as a [`Model`].
///
/// The model itself is immutable. Per-call state travels in the input and
/// comes back, updated, in the output.
#[derive(Debug, Clone)]
pub struct CentralHeatPump<F, C> {
    plant: WrapperPlant<F, C>,
}

impl<F: LoopFluid, C: PerformanceCurves> CentralHeatPump<F, C> {
    /// Sizes the plant's autosized fields and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`SimulateError::Config`] if a field is autosized without
    /// design data for its loop.
    pub fn new(mut plant: WrapperPlant<F, C>) -> Result<Self, SimulateError> {
        plant.size()?;
        Ok(Self { plant })
    }

    /// A fresh session for this wrapper.
    #[must_use]
    pub fn session(&self, nodes: &PlantNodes) -> WrapperSession {
        WrapperSession::new(self.plant.config(), nodes)
    }

    #[must_use]
    pub fn plant(&self) -> &WrapperPlant<F, C> {
        &self.plant
    }
}

impl<F: LoopFluid, C: PerformanceCurves> Model for CentralHeatPump<F, C> {
    type Input = CentralHeatPumpInput;
    type Output = CentralHeatPumpOutput;
    type Error = SimulateError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let mut session = input.session.clone();
        let mut nodes = input.nodes;
        let outcome =
            self.plant
                .simulate(&mut session, &input.request, &mut nodes, &input.schedules)?;
        Ok(CentralHeatPumpOutput {
            session,
            nodes,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Power, Time},
        mass_rate::kilogram_per_second,
        power::watt,
        thermodynamic_temperature::degree_celsius,
        time::second,
    };

    use crate::{
        models::thermal::central_heat_pump::core::test_support::{
            TestFluid, identity_curves, plant, plant_nodes, record, unit_spec, wrapper_spec,
        },
        support::thermo::{fluid::Water, model::Incompressible},
    };

    fn input(
        session: WrapperSession,
        nodes: PlantNodes,
        request: LoopRequest,
    ) -> CentralHeatPumpInput {
        CentralHeatPumpInput {
            session,
            nodes,
            request,
            schedules: ScheduleValues::default(),
        }
    }

    #[test]
    fn model_threads_session_through_calls() {
        let model: CentralHeatPump<TestFluid, CurveLibrary> =
            CentralHeatPump::new(plant(wrapper_spec(&[("A", 1)]), unit_spec))
                .expect("fixed-size plant needs no sizing data");
        let mut nodes = plant_nodes();
        let mut session = model.session(&nodes);

        for kind in [LoopKind::Chilled, LoopKind::Hot, LoopKind::Source] {
            let output = model
                .call(&input(session, nodes, LoopRequest::initialize(kind)))
                .expect("initialization should succeed");
            assert!(matches!(output.outcome, SimulateOutcome::Initialized(_)));
            session = output.session;
            nodes = output.nodes;
        }

        let request = LoopRequest::solve(
            LoopKind::Chilled,
            Power::new::<watt>(-50_000.0),
            Time::new::<second>(900.0),
        );
        let before = input(session, nodes, request);
        let output = model.call(&before).expect("call should succeed");

        assert_eq!(output.outcome, SimulateOutcome::Solved);
        assert_relative_eq!(
            output.nodes.chilled.outlet.temperature.get::<degree_celsius>(),
            9.5,
            epsilon = 1e-9
        );
        assert_eq!(output.session.runtime.units[0].mode, UnitMode::CoolingOnly);
        // The input is left untouched.
        assert_eq!(before.session.runtime.units[0].mode, UnitMode::Off);
    }

    #[test]
    fn water_loops_convert_design_flow_with_water_density() {
        let curves = identity_curves();
        let config = WrapperConfig::new(
            wrapper_spec(&[("A", 1)]),
            vec![record("A", &curves)],
            &mut DiagnosticLog::new(),
        )
        .expect("test wrapper should load");
        let water = Incompressible::<Water>::new().expect("water constants are positive");
        let model = CentralHeatPump::new(WrapperPlant::new(
            config,
            curves,
            LoopFluids::uniform(water),
        ))
        .expect("fixed-size plant needs no sizing data");

        let mut nodes = plant_nodes();
        let mut session = model.session(&nodes);
        for request in [
            LoopRequest::initialize(LoopKind::Chilled),
            LoopRequest::initialize(LoopKind::Hot),
            LoopRequest::initialize(LoopKind::Source),
            LoopRequest::solve(
                LoopKind::Chilled,
                Power::new::<watt>(-50_000.0),
                Time::new::<second>(900.0),
            ),
        ] {
            let output = model
                .call(&input(session, nodes, request))
                .expect("call should succeed");
            session = output.session;
            nodes = output.nodes;
        }

        // 0.005 m³/s of water at 997.047 kg/m³ and 4184 J/kg·K.
        let mass_flow = 0.005 * 997.047;
        assert_relative_eq!(
            nodes.chilled.outlet.temperature.get::<degree_celsius>(),
            12.0 - 50_000.0 / (mass_flow * 4184.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            session.runtime.report.chilled.rate.get::<watt>(),
            50_000.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn design_flows_use_the_reference_density() {
        let curves = identity_curves();
        let config = WrapperConfig::new(
            wrapper_spec(&[("A", 1)]),
            vec![record("A", &curves)],
            &mut DiagnosticLog::new(),
        )
        .expect("test wrapper should load");
        let water = Water::linear().expect("water constants are valid");
        let model = CentralHeatPump::new(WrapperPlant::new(
            config,
            curves,
            LoopFluids::uniform(water),
        ))
        .expect("fixed-size plant needs no sizing data");

        let nodes = plant_nodes();
        let output = model
            .call(&input(
                model.session(&nodes),
                nodes,
                LoopRequest::initialize(LoopKind::Chilled),
            ))
            .expect("initialization should succeed");

        // 0.005 m³/s at 5.05 °C, 14.95 K below the 20 °C fit point.
        let density = 998.2 * (1.0 + 3.2e-4 * 14.95);
        assert_relative_eq!(
            output.nodes.chilled.inlet.mass_flow_max.get::<kilogram_per_second>(),
            0.005 * density,
            epsilon = 1e-9
        );
    }

    #[test]
    fn autosized_plant_without_design_data_is_rejected() {
        let autosized = |name: &str| {
            let mut spec = unit_spec(name);
            spec.reference_capacity = Autosizable::Autosize;
            spec
        };
        let result = CentralHeatPump::new(plant(wrapper_spec(&[("A", 1)]), autosized));
        assert!(matches!(
            result,
            Err(SimulateError::Config(ConfigError::AutosizeWithoutDesign { .. }))
        ));
    }
}
