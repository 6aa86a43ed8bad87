use uom::{
    ConstZero,
    si::f64::{MassRate, Power, ThermodynamicTemperature, Time},
};

use super::super::{config::ReferenceSet, loops::LoopKind};

/// One host call into a wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopRequest {
    pub loop_kind: LoopKind,
    /// Loop demand: negative for cooling on the chilled-water loop, positive
    /// for heating on the hot-water loop. Ignored on the source loop.
    pub load: Power,
    /// System timestep used to integrate energies.
    pub time_step: Time,
    /// Set on the host's initialization sweep; nothing is solved.
    pub initialize_only: bool,
    /// Set while the host begins a new environment.
    pub begin_environment: bool,
    /// Set during warm-up iterations; diagnostics are suppressed.
    pub warmup: bool,
}

impl LoopRequest {
    /// An initialization call at the start of an environment.
    #[must_use]
    pub fn initialize(loop_kind: LoopKind) -> Self {
        Self {
            loop_kind,
            load: Power::ZERO,
            time_step: Time::ZERO,
            initialize_only: true,
            begin_environment: true,
            warmup: false,
        }
    }

    /// A solve call carrying `load` for one timestep.
    #[must_use]
    pub fn solve(loop_kind: LoopKind, load: Power, time_step: Time) -> Self {
        Self {
            loop_kind,
            load,
            time_step,
            initialize_only: false,
            begin_environment: false,
            warmup: false,
        }
    }

    #[must_use]
    pub fn with_warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }
}

/// Summed capacity of the wrapper at its minimum, maximum and optimal
/// part-load ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityRange {
    pub min: Power,
    pub max: Power,
    pub optimal: Power,
}

impl CapacityRange {
    pub const ZERO: Self = Self {
        min: Power::ZERO,
        max: Power::ZERO,
        optimal: Power::ZERO,
    };

    pub(crate) fn add(self, set: &ReferenceSet) -> Self {
        Self {
            min: self.min + set.capacity * set.min_plr,
            max: self.max + set.capacity * set.max_plr,
            optimal: self.optimal + set.capacity * set.optimal_plr,
        }
    }
}

/// How the host should prioritize flow to this component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPriority {
    /// Request flow whenever the loop runs.
    NeedyIfLoopOn,
}

/// Result of an initialization call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitReport {
    /// Zero on the source loop.
    pub capacity: CapacityRange,
    /// Always one; each unit carries its own sizing factor.
    pub sizing_factor: f64,
    /// Loop pairs the host must treat as coupled through this wrapper.
    pub interconnects: [(LoopKind, LoopKind); 3],
    /// Set for variable-flow wrappers on the chilled- and hot-water loops.
    pub flow_priority: Option<FlowPriority>,
}

/// Condenser-side state published to the host on a source-loop call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondenserSideUpdate {
    /// Heat added to the source loop; negative when heat is drawn from it.
    pub rate: Power,
    pub inlet_temperature: ThermodynamicTemperature,
    pub outlet_temperature: ThermodynamicTemperature,
    pub mass_flow: MassRate,
}

/// What a wrapper call produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulateOutcome {
    Initialized(InitReport),
    /// Outlet nodes and runtime state were updated.
    Solved,
    SourceSide(CondenserSideUpdate),
}
