//! Loop-level results assembled from the unit states after a pass.
//!
//! Unit outlets are mass-weighted against the loop inlet flow. Whatever part
//! of the inlet flow no unit claimed bypasses the bank and mixes back in at
//! the inlet temperature.

use uom::{
    ConstZero,
    si::{
        f64::{Energy, MassRate, Power, ThermodynamicTemperature, Time},
        thermodynamic_temperature::kelvin,
    },
};

use super::{
    dispatch::PassFlows,
    loops::PlantNodes,
    mode::UnitMode,
    state::{Dominance, LoopReport, SideState, UnitRuntimeState, WrapperReport},
};

/// Running mix of unit outlets on one loop.
#[derive(Debug, Clone, Copy)]
struct LoopMix {
    inlet_temperature: ThermodynamicTemperature,
    inlet_flow: MassRate,
    unit_flow: MassRate,
    /// Sum of unit outlet temperatures in kelvin, weighted by flow fraction.
    weighted: f64,
}

impl LoopMix {
    fn new(inlet_temperature: ThermodynamicTemperature, inlet_flow: MassRate) -> Self {
        Self {
            inlet_temperature,
            inlet_flow,
            unit_flow: MassRate::ZERO,
            weighted: 0.0,
        }
    }

    fn add(&mut self, side: &SideState) {
        if self.inlet_flow > MassRate::ZERO && side.mass_flow > MassRate::ZERO {
            let fraction = (side.mass_flow / self.inlet_flow).value;
            self.weighted += side.outlet_temperature.get::<kelvin>() * fraction;
            self.unit_flow += side.mass_flow;
        }
    }

    fn outlet(&self) -> ThermodynamicTemperature {
        if self.inlet_flow <= MassRate::ZERO {
            return self.inlet_temperature;
        }
        let unit_flow = self.unit_flow.min(self.inlet_flow);
        let bypass = ((self.inlet_flow - unit_flow) / self.inlet_flow).value;
        ThermodynamicTemperature::new::<kelvin>(
            self.weighted + self.inlet_temperature.get::<kelvin>() * bypass,
        )
    }

    /// Report for this loop; a loop without flow carries no rate.
    fn report(&self, rate: Power, time_step: Time) -> LoopReport {
        let rate = if self.inlet_flow > MassRate::ZERO {
            rate
        } else {
            Power::ZERO
        };
        LoopReport {
            inlet_temperature: self.inlet_temperature,
            outlet_temperature: self.outlet(),
            mass_flow: self.inlet_flow,
            rate,
            energy: rate * time_step,
        }
    }
}

/// Electricity totals of one pass.
#[derive(Debug, Clone, Copy)]
struct Electricity {
    cooling_power: Power,
    cooling_energy: Energy,
    heating_power: Power,
    heating_energy: Energy,
}

impl Electricity {
    const ZERO: Self = Self {
        cooling_power: Power::ZERO,
        cooling_energy: Energy::ZERO,
        heating_power: Power::ZERO,
        heating_energy: Energy::ZERO,
    };
}

fn report(
    chilled: LoopReport,
    hot: LoopReport,
    source: LoopReport,
    electricity: Electricity,
) -> WrapperReport {
    WrapperReport {
        chilled,
        hot,
        source,
        cooling_electric_power: electricity.cooling_power,
        cooling_electric_energy: electricity.cooling_energy,
        heating_electric_power: electricity.heating_power,
        heating_electric_energy: electricity.heating_energy,
    }
}

/// A wrapper with nothing running: every outlet at its inlet.
pub(crate) fn idle_report(nodes: &PlantNodes, flows: PassFlows, time_step: Time) -> WrapperReport {
    report(
        LoopMix::new(nodes.chilled.inlet.temperature, flows.chilled).report(Power::ZERO, time_step),
        LoopMix::new(nodes.hot.inlet.temperature, flows.hot).report(Power::ZERO, time_step),
        LoopMix::new(nodes.source.inlet.temperature, flows.source).report(Power::ZERO, time_step),
        Electricity::ZERO,
    )
}

/// Results of a chilled-water pass.
///
/// Evaporators feed the chilled-water loop and condensers the source loop.
/// Hot water passes through untouched.
pub(crate) fn cooling_report(
    units: &[UnitRuntimeState],
    nodes: &PlantNodes,
    flows: PassFlows,
    ancillary: Power,
    time_step: Time,
) -> WrapperReport {
    let mut chilled = LoopMix::new(nodes.chilled.inlet.temperature, flows.chilled);
    let mut source = LoopMix::new(nodes.source.inlet.temperature, flows.source);
    let mut cooling_rate = Power::ZERO;
    let mut source_rate = Power::ZERO;
    let mut electricity = Electricity::ZERO;

    for unit in units {
        chilled.add(&unit.evaporator);
        source.add(&unit.condenser);
        cooling_rate += unit.evaporator.duty;
        source_rate += unit.condenser.duty;
        electricity.cooling_power += unit.cooling_power;
        electricity.cooling_energy += unit.cooling_energy;
    }
    electricity.cooling_power += ancillary;
    electricity.cooling_energy += ancillary * time_step;

    report(
        chilled.report(cooling_rate, time_step),
        LoopMix::new(nodes.hot.inlet.temperature, flows.hot).report(Power::ZERO, time_step),
        source.report(source_rate, time_step),
        electricity,
    )
}

/// Results of a hot-water pass with no simultaneous cooling.
///
/// Condensers feed the hot-water loop and evaporators draw on the source
/// loop, so the source rate is negative.
pub(crate) fn heating_report(
    units: &[UnitRuntimeState],
    nodes: &PlantNodes,
    flows: PassFlows,
    ancillary: Power,
    time_step: Time,
) -> WrapperReport {
    let mut hot = LoopMix::new(nodes.hot.inlet.temperature, flows.hot);
    let mut source = LoopMix::new(nodes.source.inlet.temperature, flows.source);
    let mut heating_rate = Power::ZERO;
    let mut source_rate = Power::ZERO;
    let mut electricity = Electricity::ZERO;

    for unit in units {
        hot.add(&unit.condenser);
        source.add(&unit.evaporator);
        heating_rate += unit.condenser.duty;
        source_rate -= unit.evaporator.duty;
        electricity.heating_power += unit.heating_power;
        electricity.heating_energy += unit.heating_energy;
    }
    electricity.heating_power += ancillary;
    electricity.heating_energy += ancillary * time_step;

    report(
        LoopMix::new(nodes.chilled.inlet.temperature, flows.chilled).report(Power::ZERO, time_step),
        hot.report(heating_rate, time_step),
        source.report(source_rate, time_step),
        electricity,
    )
}

/// Results of a hot-water pass while the wrapper recovers heat.
///
/// The chilled-water side is rebuilt from `shadow`, the copy the
/// chilled-water pass left behind, so both loops appear in one report. When
/// cooling dominates the source loop is read from the shadow as well.
///
/// Electricity is booked once: all of it as cooling when cooling dominates,
/// otherwise the recovering and heating units as heating and any units left
/// cooling as cooling. The source loop only carries flow when some unit
/// exchanges heat with it.
pub(crate) fn simultaneous_report(
    units: &[UnitRuntimeState],
    nodes: &PlantNodes,
    flows: PassFlows,
    shadow: &WrapperReport,
    dominance: Dominance,
    ancillary: Power,
    time_step: Time,
) -> WrapperReport {
    let (source_temperature, source_flow) = if dominance.is_cooling() {
        (shadow.source.inlet_temperature, shadow.source.mass_flow)
    } else {
        (nodes.source.inlet.temperature, flows.source)
    };

    let mut chilled = LoopMix::new(shadow.chilled.inlet_temperature, shadow.chilled.mass_flow);
    let mut hot = LoopMix::new(nodes.hot.inlet.temperature, flows.hot);
    let mut source = LoopMix::new(source_temperature, source_flow);
    let mut cooling_rate = Power::ZERO;
    let mut heating_rate = Power::ZERO;
    let mut source_rate = Power::ZERO;
    let mut source_used = false;

    for unit in units {
        match unit.mode {
            UnitMode::HeatRecovery => {
                chilled.add(&unit.evaporator);
                hot.add(&unit.condenser);
                cooling_rate += unit.evaporator.duty;
                heating_rate += unit.condenser.duty;
                if unit.rejected.duty > Power::ZERO {
                    source.add(&unit.rejected);
                    source_rate += unit.rejected.duty;
                    source_used = true;
                }
            }
            UnitMode::CoolingWhileRecovery => {
                chilled.add(&unit.evaporator);
                source.add(&unit.condenser);
                cooling_rate += unit.evaporator.duty;
                source_rate += unit.condenser.duty;
                source_used = true;
            }
            UnitMode::HeatingOnly | UnitMode::HeatingWhileRecovery => {
                hot.add(&unit.condenser);
                source.add(&unit.evaporator);
                heating_rate += unit.condenser.duty;
                source_rate -= unit.evaporator.duty;
                source_used = true;
            }
            UnitMode::Off | UnitMode::CoolingOnly => {}
        }
    }
    if !source_used {
        source = LoopMix::new(source_temperature, MassRate::ZERO);
    }

    let mut electricity = Electricity::ZERO;
    if dominance.is_cooling() {
        for values in units.iter().filter_map(|unit| unit.snapshot.values()) {
            electricity.cooling_power += values.cooling_power;
            electricity.cooling_energy += values.cooling_energy;
        }
        electricity.cooling_power += ancillary;
        electricity.cooling_energy += ancillary * time_step;
    } else {
        for unit in units {
            electricity.cooling_power += unit.cooling_power;
            electricity.cooling_energy += unit.cooling_energy;
            electricity.heating_power += unit.heating_power;
            electricity.heating_energy += unit.heating_energy;
        }
        electricity.heating_power += ancillary;
        electricity.heating_energy += ancillary * time_step;
    }

    report(
        chilled.report(cooling_rate, time_step),
        hot.report(heating_rate, time_step),
        source.report(source_rate, time_step),
        electricity,
    )
}
