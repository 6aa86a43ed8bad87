//! Mutable per-call state of a wrapper and its unit instances.

use uom::{
    ConstZero,
    si::f64::{Energy, MassRate, Power, ThermodynamicTemperature, Time},
};

use super::{mode::UnitMode, snapshot::CrossLoopSnapshot};

/// One side (evaporator or condenser) of a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideState {
    pub inlet_temperature: ThermodynamicTemperature,
    pub outlet_temperature: ThermodynamicTemperature,
    pub mass_flow: MassRate,
    /// Heat transfer rate, always non-negative.
    pub duty: Power,
    pub energy: Energy,
}

impl SideState {
    /// No flow and no duty; the outlet sits at the inlet temperature.
    #[must_use]
    pub fn idle(inlet: ThermodynamicTemperature) -> Self {
        Self {
            inlet_temperature: inlet,
            outlet_temperature: inlet,
            mass_flow: MassRate::ZERO,
            duty: Power::ZERO,
            energy: Energy::ZERO,
        }
    }
}

/// Part-load operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartLoad {
    /// Part-load ratio used for energy, held at the minimum when cycling.
    pub ratio: f64,
    /// Fraction of the timestep the unit runs.
    pub cycling: f64,
    /// Capacity spent holding the minimum unloading point.
    pub false_load: Power,
}

impl PartLoad {
    pub const OFF: Self = Self {
        ratio: 0.0,
        cycling: 0.0,
        false_load: Power::ZERO,
    };
}

/// Curve outputs at the solved operating point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurveOutputs {
    pub capacity_ratio: f64,
    pub eir_temperature: f64,
    pub eir_plr: f64,
}

/// Runtime state of one unit instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRuntimeState {
    pub mode: UnitMode,
    pub evaporator: SideState,
    pub condenser: SideState,
    /// Recovered condenser heat the hot-water loop could not take, rejected
    /// to the source loop instead. Idle outside heat recovery.
    pub rejected: SideState,
    pub part_load: PartLoad,
    pub false_load_energy: Energy,
    pub cooling_power: Power,
    pub cooling_energy: Energy,
    pub heating_power: Power,
    pub heating_energy: Energy,
    pub cop: f64,
    pub curves: CurveOutputs,
    pub snapshot: CrossLoopSnapshot,
}

impl UnitRuntimeState {
    #[must_use]
    pub fn off(
        evaporator_inlet: ThermodynamicTemperature,
        condenser_inlet: ThermodynamicTemperature,
    ) -> Self {
        Self {
            mode: UnitMode::Off,
            evaporator: SideState::idle(evaporator_inlet),
            condenser: SideState::idle(condenser_inlet),
            rejected: SideState::idle(condenser_inlet),
            part_load: PartLoad::OFF,
            false_load_energy: Energy::ZERO,
            cooling_power: Power::ZERO,
            cooling_energy: Energy::ZERO,
            heating_power: Power::ZERO,
            heating_energy: Energy::ZERO,
            cop: 0.0,
            curves: CurveOutputs::default(),
            snapshot: CrossLoopSnapshot::default(),
        }
    }

    /// Forces the unit off, keeping any staged snapshot.
    pub(crate) fn reset(
        &mut self,
        evaporator_inlet: ThermodynamicTemperature,
        condenser_inlet: ThermodynamicTemperature,
    ) {
        let snapshot = self.snapshot;
        *self = Self::off(evaporator_inlet, condenser_inlet);
        self.snapshot = snapshot;
    }

    /// Integrates every rate over the system timestep.
    pub(crate) fn record_energies(&mut self, time_step: Time) {
        self.false_load_energy = self.part_load.false_load * time_step;
        self.cooling_energy = self.cooling_power * time_step;
        self.heating_energy = self.heating_power * time_step;
        self.evaporator.energy = self.evaporator.duty * time_step;
        self.condenser.energy = self.condenser.duty * time_step;
        self.rejected.energy = self.rejected.duty * time_step;
    }
}

/// Which demand governs a simultaneous timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dominance {
    /// At most one of the two loads is positive.
    #[default]
    None,
    Cooling,
    Heating,
}

impl Dominance {
    /// Decides dominance from the held loads.
    ///
    /// Both loads must be positive. Cooling dominates when
    /// `cooling / heating` exceeds `threshold`.
    #[must_use]
    pub fn from_loads(cooling: Power, heating: Power, threshold: f64) -> Self {
        if cooling > Power::ZERO && heating > Power::ZERO {
            if (cooling / heating).value > threshold {
                Self::Cooling
            } else {
                Self::Heating
            }
        } else {
            Self::None
        }
    }

    #[must_use]
    pub fn is_cooling(self) -> bool {
        self == Self::Cooling
    }

    #[must_use]
    pub fn is_heating(self) -> bool {
        self == Self::Heating
    }

    #[must_use]
    pub fn is_simultaneous(self) -> bool {
        self != Self::None
    }
}

/// Design maximum mass flow per loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopFlows {
    pub chilled: MassRate,
    pub hot: MassRate,
    pub source: MassRate,
}

impl LoopFlows {
    pub const ZERO: Self = Self {
        chilled: MassRate::ZERO,
        hot: MassRate::ZERO,
        source: MassRate::ZERO,
    };
}

/// Design maximum mass flows of one unit instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceFlowLimits {
    /// Evaporator on the chilled-water loop.
    pub evaporator: MassRate,
    /// Condenser on the source loop.
    pub condenser: MassRate,
    /// Condenser on the hot-water loop.
    pub hot_water: MassRate,
    /// Evaporator on the source loop while heating.
    pub source_evaporator: MassRate,
}

impl InstanceFlowLimits {
    pub const ZERO: Self = Self {
        evaporator: MassRate::ZERO,
        condenser: MassRate::ZERO,
        hot_water: MassRate::ZERO,
        source_evaporator: MassRate::ZERO,
    };
}

/// Loop-facing result for one loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopReport {
    pub inlet_temperature: ThermodynamicTemperature,
    pub outlet_temperature: ThermodynamicTemperature,
    pub mass_flow: MassRate,
    /// Cooling, heating or source heat transfer rate.
    pub rate: Power,
    pub energy: Energy,
}

impl LoopReport {
    #[must_use]
    pub fn idle(inlet: ThermodynamicTemperature) -> Self {
        Self {
            inlet_temperature: inlet,
            outlet_temperature: inlet,
            mass_flow: MassRate::ZERO,
            rate: Power::ZERO,
            energy: Energy::ZERO,
        }
    }
}

/// Wrapper-level results after a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapperReport {
    pub chilled: LoopReport,
    pub hot: LoopReport,
    pub source: LoopReport,
    pub cooling_electric_power: Power,
    pub cooling_electric_energy: Energy,
    pub heating_electric_power: Power,
    pub heating_electric_energy: Energy,
}

impl WrapperReport {
    #[must_use]
    pub fn idle(temperature: ThermodynamicTemperature) -> Self {
        Self {
            chilled: LoopReport::idle(temperature),
            hot: LoopReport::idle(temperature),
            source: LoopReport::idle(temperature),
            cooling_electric_power: Power::ZERO,
            cooling_electric_energy: Energy::ZERO,
            heating_electric_power: Power::ZERO,
            heating_electric_energy: Energy::ZERO,
        }
    }
}

/// Runtime state of a wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperRuntimeState {
    /// Cooling demand, held from the last chilled-water call.
    pub cooling_load: Power,
    /// Heating demand, held from the last hot-water call.
    pub heating_load: Power,
    pub dominance: Dominance,
    pub max_flows: LoopFlows,
    pub limits: Vec<InstanceFlowLimits>,
    pub report: WrapperReport,
    /// Copy written by the chilled-water pass while recovering heat.
    pub simultaneous: WrapperReport,
    pub units: Vec<UnitRuntimeState>,
}

impl WrapperRuntimeState {
    #[must_use]
    pub fn new(unit_count: usize, temperature: ThermodynamicTemperature) -> Self {
        Self {
            cooling_load: Power::ZERO,
            heating_load: Power::ZERO,
            dominance: Dominance::None,
            max_flows: LoopFlows::ZERO,
            limits: vec![InstanceFlowLimits::ZERO; unit_count],
            report: WrapperReport::idle(temperature),
            simultaneous: WrapperReport::idle(temperature),
            units: vec![UnitRuntimeState::off(temperature, temperature); unit_count],
        }
    }
}
