//! Entry point the host calls once per loop per plant iteration.
//!
//! A wrapper is split in two. [`WrapperPlant`] holds what never changes
//! during a run: validated configuration, curves, fluids and tolerances.
//! [`WrapperSession`] holds everything a call mutates: runtime state, the
//! diagnostic log and initialization bookkeeping. [`WrapperOrchestrator`]
//! owns one of each.
//!
//! Within one plant iteration the host solves the chilled-water loop before
//! the hot-water loop. The chilled-water pass stages what heat-recovering
//! units produce, and the hot-water pass consumes it.

mod outcome;

pub use outcome::{
    CapacityRange, CondenserSideUpdate, FlowPriority, InitReport, LoopRequest, SimulateOutcome,
};

use uom::{
    ConstZero,
    si::f64::{Energy, MassRate, Power},
};

use crate::support::thermo::capability::LoopFluid;

use super::{
    aggregate::{cooling_report, heating_report, idle_report, simultaneous_report},
    config::{FlowMode, WrapperConfig},
    curves::PerformanceCurves,
    diagnostics::{DiagnosticKind, DiagnosticLog, RuntimeDiagnostic},
    dispatch::{PassContext, PassFlows, dispatch_cooling, dispatch_heating},
    error::SimulateError,
    loops::{LoopFluids, LoopKind, LoopSide, PlantNodes},
    mode::UnitMode,
    schedule::ScheduleLookup,
    sizing::{SizingData, design_flows, size_unit},
    snapshot::SnapshotValues,
    state::{Dominance, LoopReport, WrapperRuntimeState},
    tolerances::PlantTolerances,
};

/// Loop pairs coupled through the wrapper, reported at initialization.
const INTERCONNECTS: [(LoopKind, LoopKind); 3] = [
    (LoopKind::Chilled, LoopKind::Source),
    (LoopKind::Hot, LoopKind::Source),
    (LoopKind::Chilled, LoopKind::Hot),
];

/// The fixed half of a wrapper.
#[derive(Debug, Clone)]
pub struct WrapperPlant<F, C> {
    config: WrapperConfig,
    curves: C,
    fluids: LoopFluids<F>,
    tolerances: PlantTolerances,
    sizing: SizingData,
    sized: bool,
}

impl<F: LoopFluid, C: PerformanceCurves> WrapperPlant<F, C> {
    #[must_use]
    pub fn new(config: WrapperConfig, curves: C, fluids: LoopFluids<F>) -> Self {
        let sized = !config.records().iter().any(|record| {
            record.capacity_autosized
                || record.evaporator_flow_autosized
                || record.condenser_flow_autosized
        });
        Self {
            config,
            curves,
            fluids,
            tolerances: PlantTolerances::default(),
            sizing: SizingData::default(),
            sized,
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: PlantTolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Plant design data used to size autosized unit fields.
    #[must_use]
    pub fn with_sizing(mut self, sizing: SizingData) -> Self {
        self.sizing = sizing;
        self
    }

    #[must_use]
    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    /// Sizes every autosized unit field. Later calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SimulateError::Config`] when a field is autosized without
    /// design data for its loop.
    pub fn size(&mut self) -> Result<(), SimulateError> {
        if self.sized {
            return Ok(());
        }
        for record in self.config.records_mut() {
            size_unit(record, &self.sizing, &self.fluids, &self.tolerances)?;
        }
        self.sized = true;
        Ok(())
    }

    /// Handles one host call.
    ///
    /// Initialization calls report the wrapper's capacity range for the
    /// loop. Chilled- and hot-water calls dispatch the loop's load across the
    /// units and write the outlet nodes. Source-loop calls publish the
    /// condenser side and recompute dominance.
    ///
    /// # Errors
    ///
    /// Returns [`SimulateError::NotSized`] before sizing,
    /// [`SimulateError::NotInitialized`] for a solve on a loop that was never
    /// initialized, or any error raised by a pass.
    pub fn simulate<S: ScheduleLookup>(
        &self,
        session: &mut WrapperSession,
        request: &LoopRequest,
        nodes: &mut PlantNodes,
        schedules: &S,
    ) -> Result<SimulateOutcome, SimulateError> {
        if !self.sized {
            return Err(SimulateError::NotSized(self.config.name.clone()));
        }
        session.log.set_suppressed(request.warmup);
        self.prepare(session, request, nodes)?;

        if request.initialize_only {
            session.initialized.insert(request.loop_kind);
            return Ok(SimulateOutcome::Initialized(
                self.init_report(request.loop_kind),
            ));
        }
        if !session.initialized.contains(request.loop_kind) {
            return Err(SimulateError::NotInitialized(request.loop_kind));
        }

        request_flows(
            request.loop_kind,
            request.load,
            &session.runtime,
            nodes,
            self.tolerances.flow_request_load,
        );

        let ctx = PassContext {
            config: &self.config,
            curves: &self.curves,
            fluids: &self.fluids,
            tolerances: &self.tolerances,
            schedules,
            time_step: request.time_step,
        };
        match request.loop_kind {
            LoopKind::Chilled => {
                chilled_call(&ctx, session, request.load, nodes)?;
                Ok(SimulateOutcome::Solved)
            }
            LoopKind::Hot => {
                hot_call(&ctx, session, request.load, nodes)?;
                Ok(SimulateOutcome::Solved)
            }
            LoopKind::Source => Ok(SimulateOutcome::SourceSide(source_call(
                &self.config,
                &mut session.runtime,
            ))),
        }
    }

    /// One-time connection, environment setup and setpoint fallback.
    fn prepare(
        &self,
        session: &mut WrapperSession,
        request: &LoopRequest,
        nodes: &mut PlantNodes,
    ) -> Result<(), SimulateError> {
        if !session.connected {
            let (max_flows, limits) = design_flows(&self.config, &self.fluids, &self.tolerances)?;
            session.runtime.max_flows = max_flows;
            session.runtime.limits = limits;

            if self.config.flow_mode == FlowMode::Variable {
                session.setpoint_from_loop = SetpointFallback {
                    chilled: nodes.chilled.outlet.setpoint.is_none(),
                    hot: nodes.hot.outlet.setpoint.is_none(),
                };
                for (missing, side) in [
                    (session.setpoint_from_loop.chilled, "cooling"),
                    (session.setpoint_from_loop.hot, "heating"),
                ] {
                    if missing {
                        session.log.record(RuntimeDiagnostic::new(
                            DiagnosticKind::MissingSetpoint,
                            format!("{} {side} side", self.config.name),
                            "outlet node has no temperature setpoint, using the loop setpoint",
                        ));
                    }
                }
            }
            session.connected = true;
        }

        if request.begin_environment {
            if session.environment_armed {
                let (max_flows, limits) =
                    design_flows(&self.config, &self.fluids, &self.tolerances)?;
                nodes.chilled.register_design_flow(max_flows.chilled);
                nodes.hot.register_design_flow(max_flows.hot);
                nodes.source.register_design_flow(max_flows.source);
                session.runtime.max_flows = max_flows;
                session.runtime.limits = limits;
                session.environment_armed = false;
                tracing::debug!(
                    wrapper = %self.config.name,
                    units = self.config.unit_count(),
                    "registered design flows"
                );
            }
        } else {
            session.environment_armed = true;
        }

        if session.setpoint_from_loop.chilled {
            nodes.chilled.outlet.setpoint = Some(nodes.chilled.loop_setpoint);
        }
        if session.setpoint_from_loop.hot {
            nodes.hot.outlet.setpoint = Some(nodes.hot.loop_setpoint);
        }
        Ok(())
    }

    fn init_report(&self, loop_kind: LoopKind) -> InitReport {
        let records = (0..self.config.unit_count()).map(|index| self.config.record(index));
        let capacity = match loop_kind {
            LoopKind::Chilled => records.fold(CapacityRange::ZERO, |range, record| {
                range.add(&record.cooling)
            }),
            LoopKind::Hot => records.fold(CapacityRange::ZERO, |range, record| {
                range.add(&record.heating)
            }),
            LoopKind::Source => CapacityRange::ZERO,
        };
        let flow_priority = (self.config.flow_mode == FlowMode::Variable
            && loop_kind != LoopKind::Source)
            .then_some(FlowPriority::NeedyIfLoopOn);

        InitReport {
            capacity,
            sizing_factor: 1.0,
            interconnects: INTERCONNECTS,
            flow_priority,
        }
    }
}

/// Loops whose initialization call has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InitializedLoops {
    chilled: bool,
    hot: bool,
    source: bool,
}

impl InitializedLoops {
    fn insert(&mut self, kind: LoopKind) {
        match kind {
            LoopKind::Chilled => self.chilled = true,
            LoopKind::Hot => self.hot = true,
            LoopKind::Source => self.source = true,
        }
    }

    fn contains(self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Chilled => self.chilled,
            LoopKind::Hot => self.hot,
            LoopKind::Source => self.source,
        }
    }
}

/// Outlet sides whose setpoint is copied from the loop every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SetpointFallback {
    chilled: bool,
    hot: bool,
}

/// The mutable half of a wrapper.
#[derive(Debug, Clone)]
pub struct WrapperSession {
    pub runtime: WrapperRuntimeState,
    pub log: DiagnosticLog,
    connected: bool,
    environment_armed: bool,
    initialized: InitializedLoops,
    setpoint_from_loop: SetpointFallback,
}

impl WrapperSession {
    /// A fresh session with every unit off at the chilled-water inlet
    /// temperature.
    #[must_use]
    pub fn new(config: &WrapperConfig, nodes: &PlantNodes) -> Self {
        Self {
            runtime: WrapperRuntimeState::new(config.unit_count(), nodes.chilled.inlet.temperature),
            log: DiagnosticLog::new(),
            connected: false,
            environment_armed: true,
            initialized: InitializedLoops::default(),
            setpoint_from_loop: SetpointFallback::default(),
        }
    }
}

/// A wrapper plant together with its session.
#[derive(Debug, Clone)]
pub struct WrapperOrchestrator<F, C> {
    plant: WrapperPlant<F, C>,
    session: WrapperSession,
}

impl<F: LoopFluid, C: PerformanceCurves> WrapperOrchestrator<F, C> {
    #[must_use]
    pub fn new(plant: WrapperPlant<F, C>, nodes: &PlantNodes) -> Self {
        let session = WrapperSession::new(plant.config(), nodes);
        Self { plant, session }
    }

    /// Keeps diagnostics raised while the configuration was loaded.
    #[must_use]
    pub fn with_diagnostics(mut self, log: DiagnosticLog) -> Self {
        self.session.log = log;
        self
    }

    /// Handles one host call, sizing the units on the chilled-water
    /// initialization call.
    ///
    /// # Errors
    ///
    /// See [`WrapperPlant::simulate`] and [`WrapperPlant::size`].
    pub fn simulate<S: ScheduleLookup>(
        &mut self,
        request: &LoopRequest,
        nodes: &mut PlantNodes,
        schedules: &S,
    ) -> Result<SimulateOutcome, SimulateError> {
        if request.initialize_only && request.loop_kind == LoopKind::Chilled {
            self.plant.size()?;
        }
        self.plant
            .simulate(&mut self.session, request, nodes, schedules)
    }

    #[must_use]
    pub fn plant(&self) -> &WrapperPlant<F, C> {
        &self.plant
    }

    #[must_use]
    pub fn state(&self) -> &WrapperRuntimeState {
        &self.session.runtime
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.session.log
    }

    /// Emits the recurring-diagnostic summary, typically at the end of a run.
    pub fn flush_diagnostics(&self) {
        self.session.log.flush_summaries();
    }
}

/// Asks each loop for its design flow when the wrapper has work on it.
///
/// A chilled-water call reads cooling demand from its own load and heating
/// from the held load; a hot-water call the reverse. The source loop runs
/// whenever either does.
fn request_flows(
    loop_kind: LoopKind,
    load: Power,
    runtime: &WrapperRuntimeState,
    nodes: &mut PlantNodes,
    threshold: Power,
) {
    let (cooling, heating) = match loop_kind {
        LoopKind::Chilled => (load < -threshold, runtime.heating_load > threshold),
        LoopKind::Hot => (runtime.cooling_load > threshold, load > threshold),
        LoopKind::Source => (
            runtime.cooling_load > threshold,
            runtime.heating_load > threshold,
        ),
    };

    let demand = |side: &LoopSide, on: bool| {
        if on {
            side.inlet.mass_flow_max
        } else {
            MassRate::ZERO
        }
    };
    let chilled = demand(&nodes.chilled, cooling);
    let hot = demand(&nodes.hot, heating);
    let source = demand(&nodes.source, cooling || heating);
    nodes.chilled.request_flow(chilled);
    nodes.hot.request_flow(hot);
    nodes.source.request_flow(source);
}

fn settle_flows(nodes: &mut PlantNodes, flows: PassFlows) {
    nodes.chilled.request_flow(flows.chilled);
    nodes.hot.request_flow(flows.hot);
    nodes.source.request_flow(flows.source);
}

fn write_outlets(nodes: &mut PlantNodes, chilled: &LoopReport, hot: &LoopReport, source: &LoopReport) {
    nodes.chilled.outlet.temperature = chilled.outlet_temperature;
    nodes.hot.outlet.temperature = hot.outlet_temperature;
    nodes.source.outlet.temperature = source.outlet_temperature;
}

/// Chilled-water call.
///
/// With nothing to serve, cooling-only units are switched off. All units
/// are switched off, and all three outlets reset, only when no heating is
/// held and heating does not dominate. While the wrapper recovers heat the
/// results go to the shadow copy and only the chilled-water outlet is
/// written; the hot-water pass completes the report.
fn chilled_call<F, C, S>(
    ctx: &PassContext<'_, F, C, S>,
    session: &mut WrapperSession,
    load: Power,
    nodes: &mut PlantNodes,
) -> Result<(), SimulateError>
where
    F: LoopFluid,
    C: PerformanceCurves,
    S: ScheduleLookup,
{
    let state = &mut session.runtime;
    state.cooling_load = load.abs();

    let chilled = nodes.chilled.available_flow();
    let flows = PassFlows {
        chilled,
        hot: nodes.hot.inlet.mass_flow,
        source: if chilled > MassRate::ZERO {
            nodes.source.available_flow()
        } else {
            MassRate::ZERO
        },
    };
    let dominance = state.dominance;
    let running = state.cooling_load > Power::ZERO
        && flows.chilled > MassRate::ZERO
        && flows.source > MassRate::ZERO;

    let mut full_reset = false;
    let report = if running {
        dispatch_cooling(ctx, state, nodes, flows, &mut session.log)?;
        cooling_report(&state.units, nodes, flows, ctx.ancillary_power(), ctx.time_step)
    } else {
        let chilled_inlet = nodes.chilled.inlet.temperature;
        let source_inlet = nodes.source.inlet.temperature;
        full_reset = state.heating_load <= Power::ZERO && !dominance.is_heating();
        for unit in &mut state.units {
            if full_reset || unit.mode == UnitMode::CoolingOnly {
                unit.reset(chilled_inlet, source_inlet);
            }
            if dominance.is_simultaneous() {
                unit.snapshot
                    .stage(SnapshotValues::idle(chilled_inlet, source_inlet));
            } else {
                unit.snapshot.clear();
            }
        }
        idle_report(nodes, flows, ctx.time_step)
    };

    if dominance.is_simultaneous() {
        nodes.chilled.outlet.temperature = report.chilled.outlet_temperature;
        state.simultaneous = report;
    } else if running || full_reset {
        write_outlets(nodes, &report.chilled, &report.hot, &report.source);
        state.report = report;
    } else {
        nodes.chilled.outlet.temperature = report.chilled.outlet_temperature;
        state.report.chilled = report.chilled;
        state.report.cooling_electric_power = Power::ZERO;
        state.report.cooling_electric_energy = Energy::ZERO;
    }

    settle_flows(nodes, flows);
    Ok(())
}

/// Hot-water call.
///
/// Mirrors [`chilled_call`]: with nothing to serve, heating-only units are
/// switched off, and everything only when no cooling is held and heating
/// does not dominate.
fn hot_call<F, C, S>(
    ctx: &PassContext<'_, F, C, S>,
    session: &mut WrapperSession,
    load: Power,
    nodes: &mut PlantNodes,
) -> Result<(), SimulateError>
where
    F: LoopFluid,
    C: PerformanceCurves,
    S: ScheduleLookup,
{
    let state = &mut session.runtime;
    state.heating_load = load.max(Power::ZERO);

    let hot = nodes.hot.available_flow();
    let flows = PassFlows {
        chilled: nodes.chilled.inlet.mass_flow,
        hot,
        source: if hot > MassRate::ZERO {
            nodes.source.available_flow()
        } else {
            MassRate::ZERO
        },
    };
    let dominance = state.dominance;

    if state.heating_load > Power::ZERO && flows.hot > MassRate::ZERO {
        dispatch_heating(ctx, state, nodes, flows, &mut session.log)?;
        let ancillary = ctx.ancillary_power();
        let report = if dominance.is_simultaneous() {
            simultaneous_report(
                &state.units,
                nodes,
                flows,
                &state.simultaneous,
                dominance,
                ancillary,
                ctx.time_step,
            )
        } else {
            heating_report(&state.units, nodes, flows, ancillary, ctx.time_step)
        };
        write_outlets(nodes, &report.chilled, &report.hot, &report.source);
        state.report = report;
    } else {
        let chilled_inlet = nodes.chilled.inlet.temperature;
        let source_inlet = nodes.source.inlet.temperature;
        let full_reset = state.cooling_load <= Power::ZERO && !dominance.is_heating();
        for unit in &mut state.units {
            let heating_only = matches!(
                unit.mode,
                UnitMode::HeatingOnly | UnitMode::HeatingWhileRecovery
            );
            if full_reset || heating_only {
                unit.reset(chilled_inlet, source_inlet);
            }
        }

        let report = idle_report(nodes, flows, ctx.time_step);
        nodes.hot.outlet.temperature = report.hot.outlet_temperature;
        if full_reset {
            write_outlets(nodes, &report.chilled, &report.hot, &report.source);
            state.report = report;
        } else {
            state.report.hot = report.hot;
            state.report.heating_electric_power = Power::ZERO;
            state.report.heating_electric_energy = Energy::ZERO;
        }
    }

    settle_flows(nodes, flows);
    Ok(())
}

/// Source-loop call: publish the condenser side, then settle dominance for
/// the next iteration.
fn source_call(config: &WrapperConfig, state: &mut WrapperRuntimeState) -> CondenserSideUpdate {
    let source = state.report.source;
    state.dominance = Dominance::from_loads(
        state.cooling_load,
        state.heating_load,
        config.dominance_threshold(),
    );
    tracing::trace!(
        wrapper = %config.name,
        dominance = ?state.dominance,
        "source loop call"
    );

    CondenserSideUpdate {
        rate: source.rate,
        inlet_temperature: source.inlet_temperature,
        outlet_temperature: source.outlet_temperature,
        mass_flow: source.mass_flow,
    }
}
