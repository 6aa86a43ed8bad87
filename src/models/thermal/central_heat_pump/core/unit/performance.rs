use uom::{
    ConstZero,
    si::{
        f64::{MassRate, Power, SpecificHeatCapacity, TemperatureInterval, ThermodynamicTemperature},
        thermodynamic_temperature::degree_celsius,
    },
};

use crate::support::units::TemperatureDifference;

use super::super::{
    config::{CondenserBasis, ReferenceSet},
    curves::PerformanceCurves,
    state::{CurveOutputs, PartLoad, SideState},
};

/// Solved thermal and electrical operating point of one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub evaporator: SideState,
    pub condenser: SideState,
    pub part_load: PartLoad,
    /// Compressor electric input.
    pub power: Power,
    pub cop: f64,
    pub curves: CurveOutputs,
}

impl OperatingPoint {
    /// A unit that does not run: no flow, no duty, outlets at inlets.
    #[must_use]
    pub fn idle(
        evaporator_inlet: ThermodynamicTemperature,
        condenser_inlet: ThermodynamicTemperature,
    ) -> Self {
        Self {
            evaporator: SideState::idle(evaporator_inlet),
            condenser: SideState::idle(condenser_inlet),
            part_load: PartLoad::OFF,
            power: Power::ZERO,
            cop: 0.0,
            curves: CurveOutputs::default(),
        }
    }

    /// `power · motor efficiency + evaporator duty + false load − condenser duty`.
    ///
    /// Zero for every solved point, up to rounding.
    #[must_use]
    pub fn energy_imbalance(&self, motor_efficiency: f64) -> Power {
        self.power * motor_efficiency + self.evaporator.duty + self.part_load.false_load
            - self.condenser.duty
    }
}

/// Condenser temperature fed to the performance curves, in °C.
pub(super) fn curve_condenser_temperature(
    basis: CondenserBasis,
    entering: ThermodynamicTemperature,
    reference_leaving: ThermodynamicTemperature,
) -> f64 {
    match basis {
        CondenserBasis::Entering => entering.get::<degree_celsius>(),
        CondenserBasis::Leaving => reference_leaving.get::<degree_celsius>(),
    }
}

/// Capacity available at the current temperatures.
#[derive(Debug, Clone, Copy)]
pub(super) struct Capacity {
    /// Curve output before clamping; negative values are reported.
    pub raw_ratio: f64,
    pub ratio: f64,
    pub available: Power,
}

pub(super) fn available_capacity(
    curves: &impl PerformanceCurves,
    set: &ReferenceSet,
    evaporator_leaving: ThermodynamicTemperature,
    condenser_temperature: f64,
) -> Capacity {
    let raw_ratio = curves.evaluate2(
        set.curves.capacity,
        evaporator_leaving.get::<degree_celsius>(),
        condenser_temperature,
    );
    let ratio = raw_ratio.max(0.0);
    Capacity {
        raw_ratio,
        ratio,
        available: set.capacity * ratio,
    }
}

/// Holds an evaporator outlet at or above each floor in turn.
///
/// A floor that leaves only a negligible approach shuts the side off rather
/// than letting it chatter at the limit. Returns the adjusted outlet and duty.
pub(super) fn apply_floors(
    inlet: ThermodynamicTemperature,
    mut outlet: ThermodynamicTemperature,
    mut duty: Power,
    mass_flow: MassRate,
    cp: SpecificHeatCapacity,
    floors: &[Option<ThermodynamicTemperature>],
    tolerance: TemperatureInterval,
) -> (ThermodynamicTemperature, Power) {
    for floor in floors.iter().flatten() {
        if outlet < *floor {
            let approach = inlet.minus(*floor);
            if approach > tolerance {
                outlet = *floor;
                duty = mass_flow * cp * approach;
            } else {
                outlet = inlet;
                duty = Power::ZERO;
            }
        }
    }
    (outlet, duty)
}

/// Part-load ratio, cycling ratio and false load for a delivered duty.
///
/// Below the minimum part-load ratio the unit cycles: the ratio is held at
/// the minimum for energy and the cycling ratio carries the difference.
pub(super) fn part_load(
    duty: Power,
    available: Power,
    set: &ReferenceSet,
    small_load: Power,
) -> PartLoad {
    if available <= Power::ZERO {
        return PartLoad::OFF;
    }

    let mut ratio = (duty / available).value.clamp(0.0, set.max_plr);
    let mut cycling = 1.0;
    if ratio < set.min_plr {
        cycling = (ratio / set.min_plr).min(1.0);
        ratio = set.min_plr;
    }

    let mut false_load = (available * ratio * cycling - duty).max(Power::ZERO);
    if false_load < small_load {
        false_load = Power::ZERO;
    }

    PartLoad {
        ratio,
        cycling,
        false_load,
    }
}

/// Electric input and the EIR curve outputs behind it.
#[derive(Debug, Clone, Copy)]
pub(super) struct Electric {
    pub power: Power,
    pub eir_temperature: f64,
    pub eir_plr: f64,
}

pub(super) fn electric(
    curves: &impl PerformanceCurves,
    set: &ReferenceSet,
    available: Power,
    part_load: &PartLoad,
    evaporator_outlet: ThermodynamicTemperature,
    condenser_temperature: f64,
) -> Electric {
    let eir_temperature = curves
        .evaluate2(
            set.curves.eir_temperature,
            evaporator_outlet.get::<degree_celsius>(),
            condenser_temperature,
        )
        .max(0.0);
    let eir_plr = curves.evaluate(set.curves.eir_plr, part_load.ratio).max(0.0);

    Electric {
        power: available / set.cop * eir_plr * eir_temperature * part_load.cycling,
        eir_temperature,
        eir_plr,
    }
}

/// `(evaporator duty + false load) / power`, zero when nothing is drawn.
pub(crate) fn cop(evaporator_duty: Power, false_load: Power, power: Power) -> f64 {
    if power > Power::ZERO {
        ((evaporator_duty + false_load) / power).value
    } else {
        0.0
    }
}
