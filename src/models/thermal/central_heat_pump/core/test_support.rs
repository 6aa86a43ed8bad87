use uom::{
    ConstZero,
    si::{
        f64::{
            MassDensity, MassRate, Power, SpecificHeatCapacity, ThermodynamicTemperature, Time,
            VolumeRate,
        },
        mass_density::kilogram_per_cubic_meter,
        mass_rate::kilogram_per_second,
        power::watt,
        specific_heat_capacity::joule_per_kilogram_kelvin,
        thermodynamic_temperature::degree_celsius,
        time::second,
        volume_rate::cubic_meter_per_second,
    },
};

use crate::support::thermo::{
    PropertyError,
    capability::{HasCp, HasDensity},
};

use super::{
    config::{
        Autosizable, ComponentSlot, ReferenceSpec, UnitPerformanceRecord, UnitSpec,
        WrapperConfig, WrapperSpec,
    },
    curves::{Curve, CurveLibrary},
    diagnostics::DiagnosticLog,
    dispatch::PassContext,
    loops::{LoopFluids, LoopNode, LoopSide, PlantNodes},
    orchestrator::WrapperPlant,
    sizing::design_flows,
    state::WrapperRuntimeState,
    tolerances::PlantTolerances,
    unit::Stream,
};

/// Constant-property liquid: cp = 4000 J/kg·K, ρ = 1000 kg/m³.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TestFluid;

impl TestFluid {
    pub(crate) fn specific_heat() -> SpecificHeatCapacity {
        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4000.0)
    }
}

impl HasDensity for TestFluid {
    fn density(&self, _temperature: ThermodynamicTemperature) -> Result<MassDensity, PropertyError> {
        Ok(MassDensity::new::<kilogram_per_cubic_meter>(1000.0))
    }
}

impl HasCp for TestFluid {
    fn cp(
        &self,
        _temperature: ThermodynamicTemperature,
    ) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(Self::specific_heat())
    }
}

pub(crate) fn test_fluids() -> LoopFluids<TestFluid> {
    LoopFluids::uniform(TestFluid)
}

pub(crate) fn celsius(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(value)
}

pub(crate) fn kg_per_s(value: f64) -> MassRate {
    MassRate::new::<kilogram_per_second>(value)
}

/// A test-fluid stream.
pub(crate) fn stream(temperature: f64, mass_flow: f64) -> Stream {
    Stream {
        temperature: celsius(temperature),
        mass_flow: kg_per_s(mass_flow),
        cp: TestFluid::specific_heat(),
    }
}

/// Capacity and EIR-temperature curves ≡ 1, EIR-vs-PLR = PLR on `[0.1, 1]`.
pub(crate) fn identity_curves() -> CurveLibrary {
    CurveLibrary::new()
        .with("capft", Curve::constant(1.0))
        .with("eirft", Curve::constant(1.0))
        .with(
            "eir-plr",
            Curve::quadratic([0.0, 1.0, 0.0]).with_x_limits(0.1, 1.0),
        )
}

fn reference(condenser_leaving: f64) -> ReferenceSpec {
    ReferenceSpec {
        capacity_curve: "capft".into(),
        eir_temperature_curve: "eirft".into(),
        eir_plr_curve: "eir-plr".into(),
        evaporator_leaving: celsius(6.67),
        condenser_entering: celsius(29.4),
        condenser_leaving: celsius(condenser_leaving),
        condenser_basis: "EnteringCondenser".into(),
        optimal_plr: 0.8,
    }
}

/// 100 kW at COP 3 in cooling; the heating set gives 80 kW at COP 2,
/// leaving at 50 °C.
pub(crate) fn unit_spec(name: &str) -> UnitSpec {
    UnitSpec {
        name: name.into(),
        flow_mode: "ConstantFlow".into(),
        condenser_type: "WaterCooled".into(),
        reference_capacity: Autosizable::Fixed(Power::new::<watt>(100_000.0)),
        reference_cop: 3.0,
        cooling: reference(35.0),
        heating: reference(50.0),
        heating_capacity_ratio: 0.8,
        heating_power_ratio: 1.2,
        evaporator_flow: Autosizable::Fixed(VolumeRate::new::<cubic_meter_per_second>(0.005)),
        condenser_flow: Autosizable::Fixed(VolumeRate::new::<cubic_meter_per_second>(0.006)),
        hot_water_flow: VolumeRate::new::<cubic_meter_per_second>(0.005),
        motor_efficiency: 1.0,
        evaporator_low_limit: celsius(2.0),
        sizing_factor: 1.0,
    }
}

pub(crate) fn record(name: &str, curves: &CurveLibrary) -> UnitPerformanceRecord {
    UnitPerformanceRecord::from_spec(unit_spec(name), curves, &mut DiagnosticLog::new())
        .expect("test unit should load")
}

pub(crate) fn wrapper_spec(slots: &[(&str, usize)]) -> WrapperSpec {
    WrapperSpec {
        name: "Wrapper".into(),
        control_mode: "SmartMixing".into(),
        ancillary_power: Power::ZERO,
        ancillary_schedule: None,
        components: slots
            .iter()
            .map(|&(unit, identical_count)| ComponentSlot {
                unit: unit.into(),
                schedule: None,
                identical_count,
            })
            .collect(),
    }
}

/// A wrapper plant whose units are built by `unit` from each slot's name.
pub(crate) fn plant(
    spec: WrapperSpec,
    unit: impl Fn(&str) -> UnitSpec,
) -> WrapperPlant<TestFluid, CurveLibrary> {
    let curves = identity_curves();
    let mut log = DiagnosticLog::new();
    let units = spec
        .components
        .iter()
        .map(|slot| {
            UnitPerformanceRecord::from_spec(unit(&slot.unit), &curves, &mut log)
                .expect("test unit should load")
        })
        .collect();
    let config = WrapperConfig::new(spec, units, &mut log).expect("test wrapper should load");
    WrapperPlant::new(config, curves, test_fluids())
}

fn side(inlet: f64, setpoint: f64, max_flow: f64) -> LoopSide {
    let mut node = LoopNode::at(celsius(inlet));
    node.mass_flow_max = kg_per_s(max_flow);
    node.mass_flow_max_avail = kg_per_s(max_flow);
    let mut outlet = LoopNode::at(celsius(inlet));
    outlet.setpoint = Some(celsius(setpoint));
    LoopSide {
        inlet: node,
        outlet,
        loop_setpoint: celsius(setpoint),
        flow_locked: false,
    }
}

/// Chilled water at 12 °C, hot water at 40 °C, source at 25 °C, 30 kg/s each.
pub(crate) fn plant_nodes() -> PlantNodes {
    PlantNodes {
        chilled: side(12.0, 6.67, 30.0),
        hot: side(40.0, 45.0, 30.0),
        source: side(25.0, 25.0, 30.0),
    }
}

/// The read-only half of a dispatch fixture.
pub(crate) struct Plant {
    pub(crate) config: WrapperConfig,
    pub(crate) curves: CurveLibrary,
    pub(crate) fluids: LoopFluids<TestFluid>,
    pub(crate) tolerances: PlantTolerances,
}

impl Plant {
    pub(crate) fn context<'a, S>(
        &'a self,
        schedules: &'a S,
    ) -> PassContext<'a, TestFluid, CurveLibrary, S> {
        PassContext {
            config: &self.config,
            curves: &self.curves,
            fluids: &self.fluids,
            tolerances: &self.tolerances,
            schedules,
            time_step: Time::new::<second>(900.0),
        }
    }
}

/// A wrapper of identity-curve test units with design flows in place.
pub(crate) struct Fixture {
    pub(crate) plant: Plant,
    pub(crate) state: WrapperRuntimeState,
    pub(crate) nodes: PlantNodes,
    pub(crate) log: DiagnosticLog,
}

impl Fixture {
    pub(crate) fn new(slots: &[(&str, usize)]) -> Self {
        Self::from_spec(wrapper_spec(slots))
    }

    pub(crate) fn from_spec(spec: WrapperSpec) -> Self {
        let curves = identity_curves();
        let units = spec
            .components
            .iter()
            .map(|slot| record(&slot.unit, &curves))
            .collect();
        let mut log = DiagnosticLog::new();
        let config = WrapperConfig::new(spec, units, &mut log).expect("test wrapper should load");

        let fluids = test_fluids();
        let tolerances = PlantTolerances::default();
        let nodes = plant_nodes();

        let mut state = WrapperRuntimeState::new(config.unit_count(), nodes.chilled.inlet.temperature);
        let (max_flows, limits) =
            design_flows(&config, &fluids, &tolerances).expect("test fluid never fails");
        state.max_flows = max_flows;
        state.limits = limits;

        Self {
            plant: Plant {
                config,
                curves,
                fluids,
                tolerances,
            },
            state,
            nodes,
            log,
        }
    }
}
