//! Allocation of one loop's load across the wrapper's unit instances.
//!
//! Instances are served in slot order. Each pass walks the instances once,
//! solving every scheduled unit against the load left by the ones before it
//! and the flow they have not claimed.

mod cooling;
mod heating;

pub(crate) use cooling::dispatch_cooling;
pub(crate) use heating::dispatch_heating;

use uom::{
    ConstZero,
    si::f64::{MassRate, Power, Time},
};

use super::{
    config::WrapperConfig,
    diagnostics::{DiagnosticKind, DiagnosticLog, RuntimeDiagnostic},
    loops::LoopFluids,
    mode::UnitMode,
    schedule::ScheduleLookup,
    state::UnitRuntimeState,
    tolerances::PlantTolerances,
    unit::OperatingPoint,
};

/// Everything a pass reads but does not change.
pub(crate) struct PassContext<'a, F, C, S> {
    pub config: &'a WrapperConfig,
    pub curves: &'a C,
    pub fluids: &'a LoopFluids<F>,
    pub tolerances: &'a PlantTolerances,
    pub schedules: &'a S,
    pub time_step: Time,
}

impl<F, C, S: ScheduleLookup> PassContext<'_, F, C, S> {
    /// Wrapper ancillary power for this timestep, zero when unscheduled.
    pub(crate) fn ancillary_power(&self) -> Power {
        let power = self.config.ancillary_power.into_inner();
        match self.config.ancillary_schedule {
            None => power,
            Some(id) => {
                let fraction = self.schedules.value(id);
                if fraction > 0.0 {
                    power * fraction
                } else {
                    Power::ZERO
                }
            }
        }
    }
}

/// Loop flows a pass may draw on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PassFlows {
    pub chilled: MassRate,
    pub hot: MassRate,
    pub source: MassRate,
}

/// Flow left on a loop after earlier instances, capped at the unit's limit.
fn remaining(loop_flow: MassRate, claimed: MassRate, limit: MassRate) -> MassRate {
    (loop_flow - claimed).max(MassRate::ZERO).min(limit)
}

/// Writes a freshly solved point into a unit's runtime state.
///
/// Cooling-side modes book the compressor power as cooling electricity,
/// the others as heating electricity.
fn apply_point(unit: &mut UnitRuntimeState, mode: UnitMode, point: &OperatingPoint) {
    let cooling = matches!(mode, UnitMode::CoolingOnly | UnitMode::CoolingWhileRecovery);
    unit.mode = mode;
    unit.evaporator = point.evaporator;
    unit.condenser = point.condenser;
    unit.part_load = point.part_load;
    unit.cop = point.cop;
    unit.curves = point.curves;
    unit.cooling_power = if cooling { point.power } else { Power::ZERO };
    unit.heating_power = if cooling { Power::ZERO } else { point.power };
}

fn report_negative_capacity(log: &mut DiagnosticLog, label: &str, ratio: Option<f64>) {
    if let Some(ratio) = ratio {
        log.record(
            RuntimeDiagnostic::new(
                DiagnosticKind::NegativeCapacityRatio,
                label,
                format!("capacity ratio curve output {ratio:.4} is negative, using zero"),
            )
            .with_value(ratio),
        );
    }
}
