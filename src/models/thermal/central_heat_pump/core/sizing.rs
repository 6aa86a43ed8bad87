//! One-time sizing of autosized unit fields.

use uom::{
    ConstZero,
    si::{
        f64::{Power, TemperatureInterval, VolumeRate},
        power::watt,
        volume_rate::cubic_meter_per_second,
    },
};

use crate::support::thermo::{PropertyError, capability::LoopFluid};

use super::{
    config::{ConfigError, UnitPerformanceRecord, WrapperConfig},
    error::SimulateError,
    loops::LoopFluids,
    state::{InstanceFlowLimits, LoopFlows},
    tolerances::PlantTolerances,
};

/// Plant sizing data for one loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantDesign {
    pub volume_flow: VolumeRate,
    pub delta_t: TemperatureInterval,
}

/// Sizing data available to the wrapper, by loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizingData {
    pub chilled: Option<PlantDesign>,
    pub source: Option<PlantDesign>,
}

/// Fills in the autosized flows and capacity of one unit.
///
/// - Evaporator flow is the chilled-water design flow times the sizing
///   factor, or zero if the design flow is negligible.
/// - Cooling capacity is `cp · ρ · ΔT · evaporator flow` at the reference
///   temperature; the heating set is re-derived from it.
/// - Condenser flow carries the capacity plus motor heat across the source
///   design ΔT.
///
/// # Errors
///
/// Returns [`SimulateError::Config`] when a field is autosized but its loop
/// has no design data, or [`SimulateError::Property`] if a fluid lookup fails.
pub fn size_unit<F: LoopFluid>(
    record: &mut UnitPerformanceRecord,
    design: &SizingData,
    fluids: &LoopFluids<F>,
    tolerances: &PlantTolerances,
) -> Result<(), SimulateError> {
    let reference = tolerances.reference_temperature;

    if record.evaporator_flow_autosized {
        let Some(chilled) = design.chilled else {
            return Err(missing(record, "evaporator flow"));
        };
        record.evaporator_flow = if chilled.volume_flow >= tolerances.small_volume_flow {
            chilled.volume_flow * record.sizing_factor
        } else {
            VolumeRate::ZERO
        };
        tracing::info!(
            unit = %record.name,
            value = record.evaporator_flow.get::<cubic_meter_per_second>(),
            "design size reference chilled water flow [m3/s]"
        );
    }

    if record.capacity_autosized {
        let Some(chilled) = design.chilled else {
            return Err(missing(record, "reference capacity"));
        };
        let capacity = if record.evaporator_flow >= tolerances.small_volume_flow {
            let cp = fluids.chilled.cp(reference)?;
            let density = fluids.chilled.density(reference)?;
            cp * density * record.evaporator_flow * chilled.delta_t
        } else {
            Power::ZERO
        };
        record.set_cooling_capacity(capacity);
        tracing::info!(
            unit = %record.name,
            value = capacity.get::<watt>(),
            "design size reference capacity [W]"
        );
    }

    if record.condenser_flow_autosized {
        let Some(source) = design.source else {
            return Err(missing(record, "condenser flow"));
        };
        let capacity = record.cooling.capacity;
        record.condenser_flow = if capacity > Power::ZERO {
            let density = fluids.source.density(reference)?;
            let cp = fluids.source.cp(record.cooling.condenser_entering)?;
            let rejected = capacity * (1.0 + record.motor_efficiency.into_inner() / record.cooling.cop);
            rejected / (source.delta_t * cp * density)
        } else {
            VolumeRate::ZERO
        };
        tracing::info!(
            unit = %record.name,
            value = record.condenser_flow.get::<cubic_meter_per_second>(),
            "design size reference condenser water flow [m3/s]"
        );
    }

    Ok(())
}

/// Design mass flows of every instance and their per-loop totals.
///
/// Volume flows convert at the reference temperature. A unit heating from
/// the source loop draws its evaporator design flow there.
///
/// # Errors
///
/// Returns [`PropertyError`] if a reference density lookup fails.
pub(crate) fn design_flows<F: LoopFluid>(
    config: &WrapperConfig,
    fluids: &LoopFluids<F>,
    tolerances: &PlantTolerances,
) -> Result<(LoopFlows, Vec<InstanceFlowLimits>), PropertyError> {
    let reference = tolerances.reference_temperature;
    let chilled = fluids.chilled.density(reference)?;
    let hot = fluids.hot.density(reference)?;
    let source = fluids.source.density(reference)?;

    let limits: Vec<_> = (0..config.unit_count())
        .map(|index| {
            let record = config.record(index);
            InstanceFlowLimits {
                evaporator: record.evaporator_flow * chilled,
                condenser: record.condenser_flow * source,
                hot_water: record.hot_water_flow * hot,
                source_evaporator: record.evaporator_flow * source,
            }
        })
        .collect();

    let totals = limits.iter().fold(LoopFlows::ZERO, |total, limit| LoopFlows {
        chilled: total.chilled + limit.evaporator,
        hot: total.hot + limit.hot_water,
        source: total.source + limit.condenser,
    });
    Ok((totals, limits))
}

fn missing(record: &UnitPerformanceRecord, field: &'static str) -> SimulateError {
    ConfigError::AutosizeWithoutDesign {
        unit: record.name.clone(),
        field,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{mass_rate::kilogram_per_second, temperature_interval::kelvin as delta_kelvin};

    use crate::models::thermal::central_heat_pump::core::{
        diagnostics::DiagnosticLog,
        test_support::{identity_curves, record, test_fluids, wrapper_spec},
    };

    fn design(volume: f64, delta_t: f64) -> PlantDesign {
        PlantDesign {
            volume_flow: VolumeRate::new::<cubic_meter_per_second>(volume),
            delta_t: TemperatureInterval::new::<delta_kelvin>(delta_t),
        }
    }

    #[test]
    fn autosized_unit_is_sized_from_plant_data() {
        let mut unit = record("CH-1", &identity_curves());
        unit.evaporator_flow_autosized = true;
        unit.capacity_autosized = true;
        unit.condenser_flow_autosized = true;
        unit.sizing_factor = 1.25;

        let data = SizingData {
            chilled: Some(design(0.004, 5.0)),
            source: Some(design(0.01, 6.0)),
        };
        size_unit(&mut unit, &data, &test_fluids(), &PlantTolerances::default())
            .expect("sizing should succeed");

        // Test fluid: cp = 4000 J/kg·K, ρ = 1000 kg/m³.
        assert_relative_eq!(unit.evaporator_flow.get::<cubic_meter_per_second>(), 0.005);
        assert_relative_eq!(unit.cooling.capacity.get::<watt>(), 100_000.0, epsilon = 1e-6);
        assert_relative_eq!(
            unit.heating.capacity.get::<watt>(),
            100_000.0 * unit.heating_capacity_ratio,
            epsilon = 1e-6
        );
        let rejected = 100_000.0 * (1.0 + unit.motor_efficiency.into_inner() / unit.cooling.cop);
        assert_relative_eq!(
            unit.condenser_flow.get::<cubic_meter_per_second>(),
            rejected / (6.0 * 4000.0 * 1000.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn negligible_design_flow_sizes_to_zero() {
        let mut unit = record("CH-1", &identity_curves());
        unit.evaporator_flow_autosized = true;
        unit.capacity_autosized = true;

        let data = SizingData {
            chilled: Some(design(1e-12, 5.0)),
            source: None,
        };
        size_unit(&mut unit, &data, &test_fluids(), &PlantTolerances::default())
            .expect("sizing should succeed");
        assert_eq!(unit.evaporator_flow, VolumeRate::ZERO);
        assert_eq!(unit.cooling.capacity, Power::ZERO);
    }

    #[test]
    fn autosize_without_design_data_is_fatal() {
        let mut unit = record("CH-1", &identity_curves());
        unit.condenser_flow_autosized = true;

        let result = size_unit(
            &mut unit,
            &SizingData::default(),
            &test_fluids(),
            &PlantTolerances::default(),
        );
        assert!(matches!(
            result,
            Err(SimulateError::Config(ConfigError::AutosizeWithoutDesign {
                field: "condenser flow",
                ..
            }))
        ));
    }

    #[test]
    fn design_flows_sum_over_instances() {
        let curves = identity_curves();
        let spec = wrapper_spec(&[("A", 2), ("B", 1)]);
        let units = vec![record("A", &curves), record("B", &curves)];
        let config = WrapperConfig::new(spec, units, &mut DiagnosticLog::new())
            .expect("test wrapper should load");

        let (totals, limits) = design_flows(&config, &test_fluids(), &PlantTolerances::default())
            .expect("test fluid never fails");

        assert_eq!(limits.len(), 3);
        let first = limits[0];
        assert_relative_eq!(first.evaporator.get::<kilogram_per_second>(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(first.condenser.get::<kilogram_per_second>(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(first.hot_water.get::<kilogram_per_second>(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(
            first.source_evaporator.get::<kilogram_per_second>(),
            5.0,
            epsilon = 1e-9
        );

        assert_relative_eq!(totals.chilled.get::<kilogram_per_second>(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(totals.hot.get::<kilogram_per_second>(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(totals.source.get::<kilogram_per_second>(), 18.0, epsilon = 1e-9);
    }

    #[test]
    fn fixed_values_are_left_alone() {
        let mut unit = record("CH-1", &identity_curves());
        let before = unit.clone();
        size_unit(&mut unit, &SizingData::default(), &test_fluids(), &PlantTolerances::default())
            .expect("nothing to size");
        assert_eq!(unit, before);
    }
}
