use uom::{
    ConstZero,
    si::{
        f64::{Power, ThermodynamicTemperature, VolumeRate},
        power::watt,
        thermodynamic_temperature::degree_celsius,
    },
};

use crate::support::constraint::{Constrained, Constraint, StrictlyPositive, UnitInterval};

use super::super::{
    curves::{CurveId, PerformanceCurves},
    diagnostics::{DiagnosticKind, DiagnosticLog, RuntimeDiagnostic},
};
use super::ConfigError;

/// A value that is either given or left for plant sizing to fill in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Autosizable<T> {
    Autosize,
    Fixed(T),
}

impl<T: Copy> Autosizable<T> {
    #[must_use]
    pub fn is_autosize(&self) -> bool {
        matches!(self, Self::Autosize)
    }

    #[must_use]
    pub fn fixed(&self) -> Option<T> {
        match self {
            Self::Autosize => None,
            Self::Fixed(value) => Some(*value),
        }
    }
}

/// Raw reference conditions for one operating set, as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSpec {
    pub capacity_curve: String,
    pub eir_temperature_curve: String,
    pub eir_plr_curve: String,
    pub evaporator_leaving: ThermodynamicTemperature,
    pub condenser_entering: ThermodynamicTemperature,
    pub condenser_leaving: ThermodynamicTemperature,
    /// `"EnteringCondenser"` or `"LeavingCondenser"`.
    pub condenser_basis: String,
    pub optimal_plr: f64,
}

/// Raw chiller-heater performance definition.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpec {
    pub name: String,
    /// `"ConstantFlow"` or `"VariableFlow"`.
    pub flow_mode: String,
    /// Must be `"WaterCooled"`.
    pub condenser_type: String,
    /// Cooling-mode reference capacity.
    pub reference_capacity: Autosizable<Power>,
    /// Cooling-mode reference COP.
    pub reference_cop: f64,
    pub cooling: ReferenceSpec,
    /// Reference set used for heating-only and simultaneous operation.
    pub heating: ReferenceSpec,
    /// Heating-set capacity as a fraction of cooling capacity.
    pub heating_capacity_ratio: f64,
    /// Heating-set power as a fraction of cooling power.
    pub heating_power_ratio: f64,
    pub evaporator_flow: Autosizable<VolumeRate>,
    pub condenser_flow: Autosizable<VolumeRate>,
    pub hot_water_flow: VolumeRate,
    /// Fraction of compressor power that ends up in the refrigerant, in `[0, 1]`.
    pub motor_efficiency: f64,
    pub evaporator_low_limit: ThermodynamicTemperature,
    pub sizing_factor: f64,
}

/// Water flow control shared by every unit in a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    Constant,
    Variable,
}

/// Which condenser temperature feeds the performance curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondenserBasis {
    /// Actual entering condenser water temperature.
    Entering,
    /// Reference leaving condenser water temperature.
    Leaving,
}

/// Resolved curve handles for one reference set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSet {
    pub capacity: CurveId,
    pub eir_temperature: CurveId,
    pub eir_plr: CurveId,
}

/// Validated reference conditions for one operating set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceSet {
    pub capacity: Power,
    pub cop: f64,
    pub evaporator_leaving: ThermodynamicTemperature,
    pub condenser_entering: ThermodynamicTemperature,
    pub condenser_leaving: ThermodynamicTemperature,
    pub min_plr: f64,
    pub max_plr: f64,
    pub optimal_plr: f64,
    pub curves: CurveSet,
    pub condenser_basis: CondenserBasis,
}

impl ReferenceSet {
    /// Electric input at reference conditions.
    #[must_use]
    pub fn power(&self) -> Power {
        self.capacity / self.cop
    }
}

/// Validated, immutable chiller-heater performance data.
///
/// The only mutation after load is one-time sizing of autosized fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPerformanceRecord {
    pub name: String,
    pub flow_mode: FlowMode,
    pub cooling: ReferenceSet,
    pub heating: ReferenceSet,
    pub heating_capacity_ratio: f64,
    pub heating_power_ratio: f64,
    pub capacity_autosized: bool,
    pub evaporator_flow: VolumeRate,
    pub evaporator_flow_autosized: bool,
    pub condenser_flow: VolumeRate,
    pub condenser_flow_autosized: bool,
    pub hot_water_flow: VolumeRate,
    /// Fraction of compressor power that ends up in the refrigerant.
    pub motor_efficiency: Constrained<f64, UnitInterval>,
    pub evaporator_low_limit: ThermodynamicTemperature,
    pub sizing_factor: f64,
}

impl UnitPerformanceRecord {
    /// Validates a unit definition and resolves its curves.
    ///
    /// Recoverable problems (unknown flow mode or condenser basis, curves
    /// far from 1.0 at reference conditions) are recorded in `log`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for non-positive reference values, a motor
    /// efficiency outside `[0, 1]`, a non-water-cooled condenser, unknown
    /// curves, or an EIR part-load curve that goes negative.
    pub fn from_spec(
        spec: UnitSpec,
        curves: &impl PerformanceCurves,
        log: &mut DiagnosticLog,
    ) -> Result<Self, ConfigError> {
        let name = spec.name;

        if !spec.condenser_type.eq_ignore_ascii_case("WaterCooled") {
            return Err(ConfigError::CondenserType {
                unit: name,
                condenser_type: spec.condenser_type,
            });
        }

        let capacity = match spec.reference_capacity {
            Autosizable::Autosize => Power::ZERO,
            Autosizable::Fixed(capacity) => {
                positive(&name, "reference capacity", capacity.get::<watt>())?;
                capacity
            }
        };
        positive(&name, "reference COP", spec.reference_cop)?;
        positive(&name, "heating capacity ratio", spec.heating_capacity_ratio)?;
        positive(&name, "heating power ratio", spec.heating_power_ratio)?;

        let Ok(motor_efficiency) = UnitInterval::new(spec.motor_efficiency) else {
            return Err(ConfigError::MotorEfficiency {
                unit: name,
                value: spec.motor_efficiency,
            });
        };

        let flow_mode = if spec.flow_mode.eq_ignore_ascii_case("ConstantFlow") {
            FlowMode::Constant
        } else if spec.flow_mode.eq_ignore_ascii_case("VariableFlow") {
            FlowMode::Variable
        } else {
            log.record(RuntimeDiagnostic::new(
                DiagnosticKind::UnknownFlowMode,
                &name,
                format!("unknown flow mode `{}`, assuming constant flow", spec.flow_mode),
            ));
            FlowMode::Constant
        };

        let cooling = reference_set(&name, &spec.cooling, curves, log)?;
        let heating = reference_set(&name, &spec.heating, curves, log)?;

        let sizing_factor = if spec.sizing_factor <= 0.0 {
            1.0
        } else {
            spec.sizing_factor
        };

        let mut record = Self {
            name,
            flow_mode,
            cooling: ReferenceSet {
                capacity,
                cop: spec.reference_cop,
                ..cooling
            },
            heating: ReferenceSet {
                capacity,
                cop: spec.reference_cop,
                ..heating
            },
            heating_capacity_ratio: spec.heating_capacity_ratio,
            heating_power_ratio: spec.heating_power_ratio,
            capacity_autosized: spec.reference_capacity.is_autosize(),
            evaporator_flow: spec.evaporator_flow.fixed().unwrap_or(VolumeRate::ZERO),
            evaporator_flow_autosized: spec.evaporator_flow.is_autosize(),
            condenser_flow: spec.condenser_flow.fixed().unwrap_or(VolumeRate::ZERO),
            condenser_flow_autosized: spec.condenser_flow.is_autosize(),
            hot_water_flow: spec.hot_water_flow,
            motor_efficiency,
            evaporator_low_limit: spec.evaporator_low_limit,
            sizing_factor,
        };
        record.set_cooling_capacity(capacity);
        Ok(record)
    }

    /// Sets the cooling reference capacity and re-derives the heating set.
    ///
    /// `heating capacity = cooling capacity × capacity ratio` and
    /// `heating power = cooling power × power ratio`.
    pub(crate) fn set_cooling_capacity(&mut self, capacity: Power) {
        self.cooling.capacity = capacity;
        self.heating.capacity = capacity * self.heating_capacity_ratio;
        self.heating.cop = self.cooling.cop * self.heating_capacity_ratio / self.heating_power_ratio;
    }

    /// The reference set in force for the current wrapper state.
    #[must_use]
    pub fn reference(&self, heating_set: bool) -> &ReferenceSet {
        if heating_set { &self.heating } else { &self.cooling }
    }
}

fn positive(unit: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    StrictlyPositive::check(&value).map_err(|_| ConfigError::NonPositiveReference {
        unit: unit.to_owned(),
        field,
        value,
    })
}

fn resolve(unit: &str, name: &str, curves: &impl PerformanceCurves) -> Result<CurveId, ConfigError> {
    curves.find(name).ok_or_else(|| ConfigError::UnknownCurve {
        unit: unit.to_owned(),
        curve: name.to_owned(),
    })
}

/// Resolves and checks one reference set.
///
/// Capacity and COP are placeholders here; the caller fills them in.
fn reference_set(
    unit: &str,
    spec: &ReferenceSpec,
    curves: &impl PerformanceCurves,
    log: &mut DiagnosticLog,
) -> Result<ReferenceSet, ConfigError> {
    let set = CurveSet {
        capacity: resolve(unit, &spec.capacity_curve, curves)?,
        eir_temperature: resolve(unit, &spec.eir_temperature_curve, curves)?,
        eir_plr: resolve(unit, &spec.eir_plr_curve, curves)?,
    };

    let evap = spec.evaporator_leaving.get::<degree_celsius>();
    let cond = spec.condenser_entering.get::<degree_celsius>();
    for (curve, value) in [
        (&spec.capacity_curve, curves.evaluate2(set.capacity, evap, cond)),
        (
            &spec.eir_temperature_curve,
            curves.evaluate2(set.eir_temperature, evap, cond),
        ),
        (&spec.eir_plr_curve, curves.evaluate(set.eir_plr, 1.0)),
    ] {
        if !(0.9..=1.1).contains(&value) {
            log.record(
                RuntimeDiagnostic::new(
                    DiagnosticKind::ReferenceCurveDeviation,
                    format!("{unit}/{curve}"),
                    format!("curve `{curve}` evaluates to {value:.3} at reference conditions"),
                )
                .with_value(value),
            );
        }
    }

    for step in 0..=10 {
        let plr = f64::from(step) / 10.0;
        if curves.evaluate(set.eir_plr, plr) < 0.0 {
            return Err(ConfigError::NegativePartLoadEir {
                unit: unit.to_owned(),
                curve: spec.eir_plr_curve.clone(),
                plr,
            });
        }
    }

    let condenser_basis = if spec.condenser_basis.eq_ignore_ascii_case("EnteringCondenser") {
        CondenserBasis::Entering
    } else if spec.condenser_basis.eq_ignore_ascii_case("LeavingCondenser") {
        CondenserBasis::Leaving
    } else {
        log.record(RuntimeDiagnostic::new(
            DiagnosticKind::UnknownCondenserBasis,
            unit,
            format!(
                "unknown condenser temperature basis `{}`, assuming leaving condenser",
                spec.condenser_basis
            ),
        ));
        CondenserBasis::Leaving
    };

    let (min, max) = curves.domain(set.eir_plr);

    Ok(ReferenceSet {
        capacity: Power::ZERO,
        cop: 1.0,
        evaporator_leaving: spec.evaporator_leaving,
        condenser_entering: spec.condenser_entering,
        condenser_leaving: spec.condenser_leaving,
        min_plr: min.clamp(0.0, 1.0),
        max_plr: max.clamp(0.0, 1.0),
        optimal_plr: spec.optimal_plr,
        curves: set,
        condenser_basis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::thermal::central_heat_pump::core::{
        curves::{Curve, CurveLibrary},
        test_support::{identity_curves, unit_spec},
    };

    #[test]
    fn heating_set_is_derived_from_cooling() {
        let mut log = DiagnosticLog::new();
        let mut spec = unit_spec("CH-1");
        spec.heating_capacity_ratio = 0.75;
        spec.heating_power_ratio = 1.5;

        let record = UnitPerformanceRecord::from_spec(spec, &identity_curves(), &mut log)
            .expect("unit should load");

        assert_relative_eq!(record.heating.capacity.get::<watt>(), 75_000.0);
        assert_relative_eq!(record.heating.power().get::<watt>(), 50_000.0);
        assert_relative_eq!(record.heating.cop, 1.5);
        assert_relative_eq!(record.cooling.min_plr, 0.1);
        assert_relative_eq!(record.cooling.max_plr, 1.0);
        assert!(log.emitted().is_empty());
    }

    #[test]
    fn unknown_strings_fall_back_with_diagnostics() {
        let mut log = DiagnosticLog::new();
        let mut spec = unit_spec("CH-1");
        spec.flow_mode = "Sometimes".into();
        spec.cooling.condenser_basis = "Sideways".into();

        let record = UnitPerformanceRecord::from_spec(spec, &identity_curves(), &mut log)
            .expect("unit should load");

        assert_eq!(record.flow_mode, FlowMode::Constant);
        assert_eq!(record.cooling.condenser_basis, CondenserBasis::Leaving);
        assert!(log.contains(DiagnosticKind::UnknownFlowMode));
        assert!(log.contains(DiagnosticKind::UnknownCondenserBasis));
    }

    #[test]
    fn fatal_problems_are_config_errors() {
        let curves = identity_curves();
        let mut log = DiagnosticLog::new();

        let mut spec = unit_spec("CH-1");
        spec.reference_cop = 0.0;
        assert!(matches!(
            UnitPerformanceRecord::from_spec(spec, &curves, &mut log),
            Err(ConfigError::NonPositiveReference { field: "reference COP", .. })
        ));

        let mut spec = unit_spec("CH-1");
        spec.motor_efficiency = 1.2;
        assert!(matches!(
            UnitPerformanceRecord::from_spec(spec, &curves, &mut log),
            Err(ConfigError::MotorEfficiency { .. })
        ));

        let mut spec = unit_spec("CH-1");
        spec.condenser_type = "AirCooled".into();
        assert!(matches!(
            UnitPerformanceRecord::from_spec(spec, &curves, &mut log),
            Err(ConfigError::CondenserType { .. })
        ));

        let mut spec = unit_spec("CH-1");
        spec.heating.capacity_curve = "nope".into();
        assert!(matches!(
            UnitPerformanceRecord::from_spec(spec, &curves, &mut log),
            Err(ConfigError::UnknownCurve { .. })
        ));

        let mut spec = unit_spec("CH-1");
        spec.heating_power_ratio = 0.0;
        assert!(matches!(
            UnitPerformanceRecord::from_spec(spec, &curves, &mut log),
            Err(ConfigError::NonPositiveReference { .. })
        ));
    }

    #[test]
    fn negative_part_load_curve_is_rejected() {
        let curves = identity_curves().with("eir-plr", Curve::quadratic([-0.1, 1.1, 0.0]));
        let mut log = DiagnosticLog::new();
        let result = UnitPerformanceRecord::from_spec(unit_spec("CH-1"), &curves, &mut log);
        assert!(matches!(
            result,
            Err(ConfigError::NegativePartLoadEir { plr, .. }) if plr == 0.0
        ));
    }

    #[test]
    fn reference_deviation_warns_once_per_curve() {
        let curves = identity_curves().with("capft", Curve::constant(0.8));
        let mut log = DiagnosticLog::new();
        UnitPerformanceRecord::from_spec(unit_spec("CH-1"), &curves, &mut log)
            .expect("deviation is not fatal");

        // Both reference sets share the curve, so the second check is counted.
        assert_eq!(log.emitted().len(), 1);
        assert_eq!(
            log.count(DiagnosticKind::ReferenceCurveDeviation, "CH-1/capft"),
            2
        );
    }

    #[test]
    fn plr_bounds_come_from_the_curve_domain() {
        let curves = CurveLibrary::new()
            .with("capft", Curve::constant(1.0))
            .with("eirft", Curve::constant(1.0))
            .with("eir-plr", Curve::constant(1.0).with_x_limits(0.25, 1.5));
        let mut log = DiagnosticLog::new();
        let record = UnitPerformanceRecord::from_spec(unit_spec("CH-1"), &curves, &mut log)
            .expect("unit should load");
        assert_relative_eq!(record.cooling.min_plr, 0.25);
        assert_relative_eq!(record.cooling.max_plr, 1.0);
    }

    #[test]
    fn sizing_factor_defaults_to_one() {
        let mut spec = unit_spec("CH-1");
        spec.sizing_factor = -2.0;
        let record = UnitPerformanceRecord::from_spec(spec, &identity_curves(), &mut DiagnosticLog::new())
            .expect("unit should load");
        assert_relative_eq!(record.sizing_factor, 1.0);
    }
}
