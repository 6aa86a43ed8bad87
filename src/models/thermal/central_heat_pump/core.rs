//! Central heat-pump wrapper: a bank of chiller-heater units serving a
//! chilled-water loop, a hot-water loop and a shared source loop.
//!
//! Each unit is a water-to-water heat pump described by reference capacity,
//! COP and three performance curves per mode. A wrapper holds one or more
//! component slots, each expanding into identical unit instances that are
//! dispatched in slot order.
//!
//! Every plant iteration the host calls the wrapper once per loop:
//!
//! 1. The chilled-water call serves the cooling load. When cooling and
//!    heating are both requested, each unit stages its cooling result in a
//!    [`CrossLoopSnapshot`].
//! 2. The hot-water call serves the heating load. Units that ran in cooling
//!    either recover their condenser heat into the hot-water loop or keep
//!    rejecting it to the source loop, depending on which demand dominates.
//! 3. The source-loop call publishes the condenser side and settles which
//!    demand dominates the next iteration.
//!
//! [`WrapperOrchestrator`] is the entry point. Configuration errors are
//! fatal and surface as [`ConfigError`]; recurring non-fatal conditions are
//! collected in a throttled [`DiagnosticLog`].

mod aggregate;
mod config;
mod curves;
mod diagnostics;
mod dispatch;
mod error;
mod loops;
mod mode;
mod orchestrator;
mod schedule;
mod sizing;
mod snapshot;
mod state;
mod tolerances;
mod unit;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{
    Autosizable, ComponentSlot, CondenserBasis, ConfigError, CurveSet, FlowMode, ReferenceSet,
    ReferenceSpec, UnitInstance, UnitPerformanceRecord, UnitSpec, WrapperConfig, WrapperSpec,
};
pub use curves::{Curve, CurveId, CurveLibrary, CurveShape, PerformanceCurves};
pub use diagnostics::{
    DiagnosticKind, DiagnosticLog, DiagnosticSummary, RuntimeDiagnostic, Severity,
};
pub use error::SimulateError;
pub use loops::{LoopFluids, LoopKind, LoopNode, LoopSide, PlantNodes};
pub use mode::{Authority, ModeRole, SnapshotField, UnitMode};
pub use orchestrator::{
    CapacityRange, CondenserSideUpdate, FlowPriority, InitReport, LoopRequest, SimulateOutcome,
    WrapperOrchestrator, WrapperPlant, WrapperSession,
};
pub use schedule::{AlwaysOn, ScheduleId, ScheduleLookup, ScheduleValues};
pub use sizing::{PlantDesign, SizingData, size_unit};
pub use snapshot::{CrossLoopSnapshot, SnapshotValues};
pub use state::{
    CurveOutputs, Dominance, InstanceFlowLimits, LoopFlows, LoopReport, PartLoad, SideState,
    UnitRuntimeState, WrapperReport, WrapperRuntimeState,
};
pub use tolerances::{HeatingSolveConfig, PlantTolerances};
pub use unit::{
    CoolingConditions, CoolingSolution, HeatingConditions, HeatingSolution, OperatingPoint,
    Stream, solve_cooling, solve_heating_only,
};
