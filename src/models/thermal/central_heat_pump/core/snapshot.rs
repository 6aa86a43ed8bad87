//! Cooling-pass results retained for the heating pass.
//!
//! The chilled-water and hot-water loops are solved by separate host calls,
//! but a heat-recovery unit couples both sides in one energy balance. The
//! cooling pass stages what the heating pass needs here; the heating pass
//! only reads it. Values stay staged until the next cooling pass replaces or
//! clears them.

use uom::{
    ConstZero,
    si::f64::{Energy, Power, ThermodynamicTemperature},
};

use super::state::{CurveOutputs, PartLoad, SideState, UnitRuntimeState};

/// Cooling-pass values of one unit instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotValues {
    pub part_load: PartLoad,
    pub false_load_energy: Energy,
    pub curves: CurveOutputs,
    pub cooling_power: Power,
    pub cooling_energy: Energy,
    pub evaporator: SideState,
    pub condenser: SideState,
}

impl SnapshotValues {
    /// Values of a unit that did not run in the cooling pass.
    #[must_use]
    pub fn idle(
        evaporator_inlet: ThermodynamicTemperature,
        condenser_inlet: ThermodynamicTemperature,
    ) -> Self {
        Self {
            part_load: PartLoad::OFF,
            false_load_energy: Energy::ZERO,
            curves: CurveOutputs::default(),
            cooling_power: Power::ZERO,
            cooling_energy: Energy::ZERO,
            evaporator: SideState::idle(evaporator_inlet),
            condenser: SideState::idle(condenser_inlet),
        }
    }
}

impl From<&UnitRuntimeState> for SnapshotValues {
    fn from(unit: &UnitRuntimeState) -> Self {
        Self {
            part_load: unit.part_load,
            false_load_energy: unit.false_load_energy,
            curves: unit.curves,
            cooling_power: unit.cooling_power,
            cooling_energy: unit.cooling_energy,
            evaporator: unit.evaporator,
            condenser: unit.condenser,
        }
    }
}

/// Per-instance shadow state with an explicit staged flag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CrossLoopSnapshot {
    values: Option<SnapshotValues>,
}

impl CrossLoopSnapshot {
    pub(crate) fn stage(&mut self, values: SnapshotValues) {
        self.values = Some(values);
    }

    pub(crate) fn clear(&mut self) {
        self.values = None;
    }

    #[must_use]
    pub fn is_staged(&self) -> bool {
        self.values.is_some()
    }

    #[must_use]
    pub fn values(&self) -> Option<&SnapshotValues> {
        self.values.as_ref()
    }

    /// Staged evaporator duty, zero when nothing is staged.
    #[must_use]
    pub fn evaporator_duty(&self) -> Power {
        self.values
            .map_or(Power::ZERO, |values| values.evaporator.duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{power::watt, thermodynamic_temperature::degree_celsius};

    #[test]
    fn unstaged_snapshot_reads_as_zero_duty() {
        let mut snapshot = CrossLoopSnapshot::default();
        assert!(!snapshot.is_staged());
        assert_eq!(snapshot.evaporator_duty(), Power::ZERO);

        let inlet = ThermodynamicTemperature::new::<degree_celsius>(12.0);
        let mut values = SnapshotValues::idle(inlet, inlet);
        values.evaporator.duty = Power::new::<watt>(40_000.0);
        snapshot.stage(values);
        assert!(snapshot.is_staged());
        assert_eq!(snapshot.evaporator_duty(), Power::new::<watt>(40_000.0));

        snapshot.clear();
        assert!(snapshot.values().is_none());
    }
}
